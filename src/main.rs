use clap::Parser;
use issue_tracker::cli::commands::{self, OutputOptions};
use issue_tracker::cli::{Cli, Commands};
use issue_tracker::config;
use issue_tracker::logging::init_logging;
use issue_tracker::{StructuredError, TrackerError};
use std::io::{self, IsTerminal};

fn main() {
    let cli = Cli::parse();

    let log_file = config::configured_log_file();
    if let Err(e) = init_logging(cli.verbose, cli.quiet, log_file.as_deref()) {
        eprintln!("Failed to initialize logging: {e}");
    }

    let overrides = build_cli_overrides(&cli);
    let output = OutputOptions {
        json: cli.json,
        use_color: !cli.no_color && io::stdout().is_terminal(),
        quiet: cli.quiet,
    };

    let result = match &cli.command {
        Commands::Init { force } => commands::init::execute(*force, None, &overrides),
        Commands::Create(args) => commands::create::execute(args, &overrides, output),
        Commands::Show { id } => commands::show::execute(id, &overrides, output),
        Commands::List(args) => commands::list::execute(args, &overrides, output),
        Commands::Update(args) => commands::update::execute(args, &overrides, output),
        Commands::Delete { id } => commands::delete::execute(id, &overrides, output),
        Commands::Import(args) => commands::import::execute(args, &overrides, output),
        Commands::Export(args) => commands::export::execute(args, &overrides, output),
        Commands::BulkUpdate(args) => commands::bulk_update::execute(args, &overrides, output),
        Commands::BulkDelete(args) => commands::bulk_delete::execute(args, &overrides, output),
        Commands::Stats => commands::stats::execute(&overrides, output),
        Commands::Summary => commands::stats::execute_summary(&overrides, output),
        Commands::Completions(args) => commands::completions::execute(args),
    };

    if let Err(e) = result {
        handle_error(&e, cli.json);
    }
}

/// Handle errors with structured output support.
///
/// When --json is set or stdout is not a TTY, outputs structured JSON to stderr.
/// Otherwise, outputs human-readable error with optional color.
fn handle_error(err: &TrackerError, json_mode: bool) -> ! {
    let structured = StructuredError::from_error(err);
    let exit_code = structured.code.exit_code();

    let use_json = json_mode || !io::stdout().is_terminal();

    if use_json {
        let json = structured.to_json();
        eprintln!(
            "{}",
            serde_json::to_string_pretty(&json).unwrap_or_else(|_| json.to_string())
        );
    } else {
        let use_color = io::stderr().is_terminal();
        eprintln!("{}", structured.to_human(use_color));
    }

    std::process::exit(exit_code);
}

fn build_cli_overrides(cli: &Cli) -> config::CliOverrides {
    config::CliOverrides {
        db: cli.db.clone(),
        json: cli.json.then_some(true),
        lock_timeout: cli.lock_timeout,
    }
}
