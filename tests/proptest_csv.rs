//! Property-based tests for the CSV codec.

use chrono::{DateTime, TimeZone, Utc};
use issue_tracker::format::csv::{EXPORT_COLUMNS, decode, encode, field_value};
use issue_tracker::model::{Issue, Priority, Status};
use proptest::prelude::*;

/// Text that exercises the quoting rules: commas, quotes and line breaks.
fn awkward_text() -> impl Strategy<Value = String> {
    "[a-z ,\"\r\n]{1,40}".prop_filter("non-blank", |s| !s.trim().is_empty())
}

fn timestamp() -> impl Strategy<Value = DateTime<Utc>> {
    (0i64..4_102_444_800, 0u32..1_000_000)
        .prop_map(|(secs, micros)| Utc.timestamp_opt(secs, micros * 1_000).unwrap())
}

fn arb_issue() -> impl Strategy<Value = Issue> {
    (
        awkward_text(),
        prop::option::of(awkward_text()),
        prop::sample::select(Status::ALL.to_vec()),
        prop::sample::select(Priority::ALL.to_vec()),
        prop::option::of(awkward_text()),
        prop::option::of(awkward_text()),
        timestamp(),
    )
        .prop_map(
            |(title, description, status, priority, assignee, reporter, created_at)| Issue {
                id: 0,
                title,
                description,
                status,
                priority,
                assignee,
                reporter,
                created_at,
                updated_at: created_at,
            },
        )
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 100,
        ..Default::default()
    })]

    /// Whatever the content, a decoded export has one row per issue and
    /// every column equals what was written.
    #[test]
    fn export_decodes_to_same_fields(issues in prop::collection::vec(arb_issue(), 0..8)) {
        let rows = decode(&encode(&issues).unwrap()).unwrap();
        prop_assert_eq!(rows.len(), issues.len());

        for (row, issue) in rows.iter().zip(&issues) {
            let fields = row.fields.as_ref().unwrap();
            prop_assert_eq!(fields.len(), EXPORT_COLUMNS.len());
            for column in EXPORT_COLUMNS {
                prop_assert_eq!(&fields[*column], &field_value(issue, column), "column {}", column);
            }

            let created_at = DateTime::parse_from_rfc3339(&fields["created_at"]).unwrap();
            prop_assert_eq!(created_at.with_timezone(&Utc), issue.created_at);
        }
    }

    /// Row numbers are 1-based and contiguous.
    #[test]
    fn row_numbers_are_contiguous(n in 0usize..30) {
        let mut csv = String::from("title\n");
        for i in 0..n {
            csv.push_str(&format!("row {i}\n"));
        }
        let rows = decode(csv.as_bytes()).unwrap();
        let numbers: Vec<usize> = rows.iter().map(|r| r.row_number).collect();
        prop_assert_eq!(numbers, (1..=n).collect::<Vec<_>>());
    }
}

#[test]
fn header_only_export_for_empty_set() {
    let bytes = encode(&[]).unwrap();
    assert_eq!(
        String::from_utf8(bytes).unwrap(),
        format!("{}\n", EXPORT_COLUMNS.join(","))
    );
}
