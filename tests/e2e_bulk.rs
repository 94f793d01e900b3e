//! End-to-end bulk update and bulk delete through the binary.

mod common;

use common::cli::{ItrWorkspace, create_issue, extract_json_payload, run_itr};
use serde_json::Value;

fn json(stdout: &str) -> Value {
    serde_json::from_str(&extract_json_payload(stdout)).expect("parse json")
}

#[test]
fn e2e_bulk_update_partial_success() {
    let _log = common::test_log("e2e_bulk_update_partial_success");
    let workspace = ItrWorkspace::initialized();
    let a = create_issue(&workspace, &["a"], "create_a");
    let b = create_issue(&workspace, &["b", "-a", "amy"], "create_b");

    let run = run_itr(
        &workspace,
        ["bulk-update", &a, &b, "999", "--status", "closed", "--json"],
        "bulk_update",
    );
    assert!(run.status.success(), "bulk-update failed: {}", run.stderr);

    let result = json(&run.stdout);
    assert_eq!(result["requested_ids"].as_array().unwrap().len(), 3);
    assert_eq!(result["succeeded"].as_array().unwrap().len(), 2);
    assert_eq!(result["failed"]["999"], "not_found");

    let shown = json(&run_itr(&workspace, ["show", &b, "--json"], "show_b").stdout);
    assert_eq!(shown["status"], "closed");
    assert_eq!(shown["assignee"], "amy");
}

#[test]
fn e2e_bulk_update_invalid_patch_changes_nothing() {
    let _log = common::test_log("e2e_bulk_update_invalid_patch_changes_nothing");
    let workspace = ItrWorkspace::initialized();
    let a = create_issue(&workspace, &["a"], "create_a");

    let bad = run_itr(
        &workspace,
        ["bulk-update", &a, "--priority", "urgent"],
        "bulk_update_bad",
    );
    assert_eq!(bad.code(), Some(4));
    assert!(bad.stderr.contains("INVALID_PATCH"));

    let empty = run_itr(&workspace, ["bulk-update", &a], "bulk_update_empty");
    assert_eq!(empty.code(), Some(4));

    let shown = json(&run_itr(&workspace, ["show", &a, "--json"], "show_a").stdout);
    assert_eq!(shown["priority"], "medium");
}

#[test]
fn e2e_bulk_delete_from_file() {
    let _log = common::test_log("e2e_bulk_delete_from_file");
    let workspace = ItrWorkspace::initialized();
    let a = create_issue(&workspace, &["a"], "create_a");
    let b = create_issue(&workspace, &["b"], "create_b");
    let keep = create_issue(&workspace, &["keep"], "create_keep");
    workspace.write_file("ids.txt", &format!("# stale\n{b}\n\n{a}\n"));

    let run = run_itr(
        &workspace,
        ["bulk-delete", &a, "--from-file", "ids.txt"],
        "bulk_delete",
    );
    assert!(run.status.success(), "bulk-delete failed: {}", run.stderr);
    assert!(run.stdout.contains("Deleted 2 of 2 issues"));

    let list = json(&run_itr(&workspace, ["list", "--json"], "list").stdout);
    let ids: Vec<String> = list
        .as_array()
        .unwrap()
        .iter()
        .map(|i| i["id"].to_string())
        .collect();
    assert_eq!(ids, vec![keep]);
}

#[test]
fn e2e_bulk_delete_reports_missing() {
    let _log = common::test_log("e2e_bulk_delete_reports_missing");
    let workspace = ItrWorkspace::initialized();

    let run = run_itr(&workspace, ["bulk-delete", "41", "42"], "bulk_delete_missing");
    assert!(run.status.success());
    assert!(run.stdout.contains("Deleted 0 of 2 issues"));
    assert!(run.stdout.contains("#41: not found"));
}
