#![allow(dead_code)]

use assert_cmd::Command;
use std::ffi::OsStr;
use std::fs;
use std::path::PathBuf;
use std::time::{Duration, Instant, SystemTime};
use tempfile::TempDir;

#[derive(Debug)]
pub struct ItrRun {
    pub stdout: String,
    pub stderr: String,
    pub status: std::process::ExitStatus,
    pub duration: Duration,
    pub log_path: PathBuf,
}

impl ItrRun {
    pub fn code(&self) -> Option<i32> {
        self.status.code()
    }
}

pub struct ItrWorkspace {
    pub temp_dir: TempDir,
    pub root: PathBuf,
    pub log_dir: PathBuf,
}

impl ItrWorkspace {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("temp dir");
        let root = temp_dir.path().to_path_buf();
        let log_dir = root.join("logs");
        fs::create_dir_all(&log_dir).expect("log dir");
        Self {
            temp_dir,
            root,
            log_dir,
        }
    }

    /// New workspace with `itr init` already run.
    pub fn initialized() -> Self {
        let workspace = Self::new();
        let init = run_itr(&workspace, ["init"], "init");
        assert!(init.status.success(), "init failed: {}", init.stderr);
        workspace
    }

    pub fn write_file(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.root.join(name);
        fs::write(&path, contents).expect("write file");
        path
    }
}

pub fn itr_command(workspace: &ItrWorkspace) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("itr"));
    cmd.current_dir(&workspace.root);
    cmd.env("NO_COLOR", "1");
    cmd.env("RUST_LOG", "issue_tracker=debug");
    cmd.env("RUST_BACKTRACE", "1");
    cmd.env("HOME", &workspace.root);
    cmd.env_remove("TRACKER_DIR");
    cmd.env_remove("TRACKER_DB");
    cmd
}

pub fn run_itr<I, S>(workspace: &ItrWorkspace, args: I, label: &str) -> ItrRun
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    run_itr_with_env(
        workspace,
        args,
        std::iter::empty::<(String, String)>(),
        label,
    )
}

pub fn run_itr_with_env<I, S, E, K, V>(
    workspace: &ItrWorkspace,
    args: I,
    env_vars: E,
    label: &str,
) -> ItrRun
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
    E: IntoIterator<Item = (K, V)>,
    K: AsRef<OsStr>,
    V: AsRef<OsStr>,
{
    let mut cmd = itr_command(workspace);
    cmd.args(args);
    cmd.envs(env_vars);

    let start = Instant::now();
    let output = cmd.output().expect("run itr");
    let duration = start.elapsed();

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();

    let log_path = workspace.log_dir.join(format!("{label}.log"));
    let log_body = format!(
        "label: {label}\nstarted: {:?}\nduration: {:?}\nstatus: {}\nargs: {:?}\ncwd: {}\n\nstdout:\n{}\n\nstderr:\n{}\n",
        SystemTime::now(),
        duration,
        output.status,
        cmd.get_args().collect::<Vec<_>>(),
        workspace.root.display(),
        stdout,
        stderr
    );
    fs::write(&log_path, log_body).expect("write log");

    ItrRun {
        stdout,
        stderr,
        status: output.status,
        duration,
        log_path,
    }
}

pub fn extract_json_payload(stdout: &str) -> String {
    let lines: Vec<&str> = stdout.lines().collect();
    for (idx, line) in lines.iter().enumerate() {
        let trimmed = line.trim_start();
        if trimmed.starts_with('[') || trimmed.starts_with('{') {
            return lines[idx..].join("\n").trim().to_string();
        }
    }
    stdout.trim().to_string()
}

/// Parse the id from `Created #12: title`.
pub fn parse_created_id(stdout: &str) -> String {
    stdout
        .lines()
        .next()
        .and_then(|line| line.strip_prefix("Created #"))
        .and_then(|rest| rest.split(':').next())
        .unwrap_or("")
        .trim()
        .to_string()
}

pub fn create_issue(workspace: &ItrWorkspace, args: &[&str], label: &str) -> String {
    let mut full = vec!["create"];
    full.extend_from_slice(args);
    let run = run_itr(workspace, full, label);
    assert!(run.status.success(), "create failed: {}", run.stderr);
    let id = parse_created_id(&run.stdout);
    assert!(!id.is_empty(), "no id in: {}", run.stdout);
    id
}
