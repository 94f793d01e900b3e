#![allow(dead_code)]

use issue_tracker::model::{IssueId, IssueInput, Priority, Status};
use issue_tracker::storage::IssueStore;

pub const HEADER: &str = "title,description,status,priority,assignee,reporter";

pub fn input(title: &str) -> IssueInput {
    IssueInput::new(title)
}

pub fn input_with(
    title: &str,
    status: Status,
    priority: Priority,
    assignee: Option<&str>,
) -> IssueInput {
    IssueInput {
        status,
        priority,
        assignee: assignee.map(str::to_string),
        ..IssueInput::new(title)
    }
}

/// Create `n` issues titled `issue 0..n`, returning their ids in creation order.
pub fn seed<S: IssueStore>(store: &mut S, n: usize) -> Vec<IssueId> {
    (0..n)
        .map(|i| store.create(&input(&format!("issue {i}"))).unwrap().id)
        .collect()
}

/// Build CSV bytes from a header and data lines.
pub fn csv_bytes(header: &str, lines: &[&str]) -> Vec<u8> {
    let mut out = String::from(header);
    out.push('\n');
    for line in lines {
        out.push_str(line);
        out.push('\n');
    }
    out.into_bytes()
}

/// A CSV with `n` valid rows using the full import header.
pub fn valid_csv(n: usize) -> Vec<u8> {
    let lines: Vec<String> = (0..n)
        .map(|i| format!("Imported {i},desc {i},open,medium,user{},", i % 3))
        .collect();
    let refs: Vec<&str> = lines.iter().map(String::as_str).collect();
    csv_bytes(HEADER, &refs)
}
