//! Shell completions generation command.
//!
//! ```bash
//! itr completions bash > ~/.local/share/bash-completion/completions/itr
//! itr completions zsh -o ~/.zsh/completions/_itr
//! ```

use crate::cli::{Cli, CompletionsArgs, ShellType};
use crate::error::Result;
use clap::CommandFactory;
use clap_complete::{Shell, generate};
use std::io;
use tracing::info;

const BIN_NAME: &str = "itr";

/// Execute the completions command.
///
/// # Errors
///
/// Returns an error if file I/O fails.
pub fn execute(args: &CompletionsArgs) -> Result<()> {
    info!(shell = ?args.shell, output = ?args.output, "Generating shell completions");

    let mut cmd = Cli::command();
    let shell = convert_shell_type(args.shell);

    if let Some(output_path) = &args.output {
        let mut file = std::fs::File::create(output_path)?;
        generate(shell, &mut cmd, BIN_NAME, &mut file);
        eprintln!("Generated {shell} completions to {}", output_path.display());
    } else {
        generate(shell, &mut cmd, BIN_NAME, &mut io::stdout());
    }

    Ok(())
}

const fn convert_shell_type(shell: ShellType) -> Shell {
    match shell {
        ShellType::Bash => Shell::Bash,
        ShellType::Zsh => Shell::Zsh,
        ShellType::Fish => Shell::Fish,
        ShellType::PowerShell => Shell::PowerShell,
        ShellType::Elvish => Shell::Elvish,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn script(shell: Shell) -> String {
        let mut cmd = Cli::command();
        let mut output = Vec::new();
        generate(shell, &mut cmd, BIN_NAME, &mut output);
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn test_convert_shell_type() {
        assert_eq!(convert_shell_type(ShellType::Bash), Shell::Bash);
        assert_eq!(convert_shell_type(ShellType::PowerShell), Shell::PowerShell);
    }

    #[test]
    fn test_completion_contains_commands() {
        let script = script(Shell::Bash);
        for command in ["import", "export", "bulk-update", "bulk-delete", "stats"] {
            assert!(script.contains(command), "missing {command}");
        }
        assert!(script.contains("--json"));
    }

    #[test]
    fn test_zsh_completion_generation() {
        assert!(script(Shell::Zsh).contains("#compdef itr"));
    }
}
