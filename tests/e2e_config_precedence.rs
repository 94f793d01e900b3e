//! End-to-end configuration precedence: CLI > env > project > user.

mod common;

use common::cli::{ItrWorkspace, create_issue, extract_json_payload, run_itr, run_itr_with_env};
use serde_json::Value;
use std::fs;

fn list_len(stdout: &str) -> usize {
    let issues: Vec<Value> = serde_json::from_str(&extract_json_payload(stdout)).unwrap();
    issues.len()
}

#[test]
fn e2e_default_limit_layers() {
    let _log = common::test_log("e2e_default_limit_layers");
    let workspace = ItrWorkspace::initialized();
    for i in 0..6 {
        create_issue(&workspace, &[&format!("issue {i}")], &format!("create_{i}"));
    }

    let user_dir = workspace.root.join(".config").join("itr");
    fs::create_dir_all(&user_dir).unwrap();
    fs::write(user_dir.join("config.yaml"), "default-limit: 5\n").unwrap();
    let run = run_itr(&workspace, ["list", "--json"], "list_user");
    assert_eq!(list_len(&run.stdout), 5);

    fs::write(
        workspace.root.join(".tracker").join("config.yaml"),
        "default_limit: 4\n",
    )
    .unwrap();
    let run = run_itr(&workspace, ["list", "--json"], "list_project");
    assert_eq!(list_len(&run.stdout), 4);

    let run = run_itr_with_env(
        &workspace,
        ["list", "--json"],
        [("TRACKER_DEFAULT_LIMIT", "3")],
        "list_env",
    );
    assert_eq!(list_len(&run.stdout), 3);

    let run = run_itr_with_env(
        &workspace,
        ["list", "--json", "--limit", "2"],
        [("TRACKER_DEFAULT_LIMIT", "3")],
        "list_cli",
    );
    assert_eq!(list_len(&run.stdout), 2);
}

#[test]
fn e2e_db_override() {
    let _log = common::test_log("e2e_db_override");
    let workspace = ItrWorkspace::initialized();
    let other = workspace.root.join("other.db");

    let create = run_itr(
        &workspace,
        ["--db", other.to_str().unwrap(), "create", "elsewhere"],
        "create_other",
    );
    assert!(create.status.success(), "create failed: {}", create.stderr);
    assert!(other.exists());

    let default_list = run_itr(&workspace, ["list", "--json"], "list_default");
    assert_eq!(list_len(&default_list.stdout), 0);

    let env_list = run_itr_with_env(
        &workspace,
        ["list", "--json"],
        [("TRACKER_DB", other.to_str().unwrap())],
        "list_env_db",
    );
    assert_eq!(list_len(&env_list.stdout), 1);
}

#[test]
fn e2e_tracker_dir_env_and_subdirectory() {
    let _log = common::test_log("e2e_tracker_dir_env_and_subdirectory");
    let workspace = ItrWorkspace::initialized();
    create_issue(&workspace, &["root issue"], "create_root");

    let nested = workspace.root.join("src").join("deep");
    fs::create_dir_all(&nested).unwrap();
    let mut cmd = common::cli::itr_command(&workspace);
    let output = cmd.current_dir(&nested).args(["list", "--json"]).output().unwrap();
    assert!(output.status.success());
    assert_eq!(list_len(&String::from_utf8_lossy(&output.stdout)), 1);

    let elsewhere = ItrWorkspace::new();
    let run = run_itr_with_env(
        &elsewhere,
        ["list", "--json"],
        [("TRACKER_DIR", workspace.root.join(".tracker"))],
        "list_tracker_dir",
    );
    assert!(run.status.success(), "list failed: {}", run.stderr);
    assert_eq!(list_len(&run.stdout), 1);
}

#[test]
fn e2e_malformed_config_is_config_error() {
    let _log = common::test_log("e2e_malformed_config_is_config_error");
    let workspace = ItrWorkspace::initialized();
    fs::write(
        workspace.root.join(".tracker").join("config.yaml"),
        "lock-timeout: soon\n",
    )
    .unwrap();

    let run = run_itr(&workspace, ["list"], "list_bad_config");
    assert_eq!(run.code(), Some(7));
}

#[test]
fn e2e_log_file_receives_json_lines() {
    let _log = common::test_log("e2e_log_file_receives_json_lines");
    let workspace = ItrWorkspace::initialized();
    fs::write(
        workspace.root.join(".tracker").join("config.yaml"),
        "log-file: itr.log\n",
    )
    .unwrap();

    create_issue(&workspace, &["logged"], "create_logged");

    let log = fs::read_to_string(workspace.root.join(".tracker").join("itr.log")).unwrap();
    let first = log.lines().next().expect("log line");
    let event: Value = serde_json::from_str(first).unwrap();
    assert!(event.get("level").is_some());
}
