//! CSV export of submissions.
//!
//! Columns are the submission time, the submitter IP, then the union of all
//! field names in first-seen order. Every data cell is quoted.

use serde_json::Value;

use super::types::{FieldValue, Submission};

/// Columns prepended to every export.
pub const CSV_FIXED_HEADERS: [&str; 2] = ["Submitted At", "IP Address"];

/// Renders `submissions` as CSV, rows joined with `\n`.
#[must_use]
pub fn export_csv(submissions: &[Submission]) -> String {
    let mut keys: Vec<&str> = Vec::new();
    for submission in submissions {
        for key in submission.data.keys() {
            if !keys.contains(&key.as_str()) {
                keys.push(key);
            }
        }
    }

    let header = CSV_FIXED_HEADERS
        .iter()
        .copied()
        .chain(keys.iter().copied())
        .map(header_cell)
        .collect::<Vec<_>>()
        .join(",");

    let mut lines = vec![header];
    for submission in submissions {
        let mut cells = vec![
            quote(&submission.created_at.to_rfc3339()),
            quote(&submission.ip_address),
        ];
        cells.extend(keys.iter().map(|key| value_cell(submission.data.get(*key))));
        lines.push(cells.join(","));
    }

    lines.join("\n")
}

fn value_cell(value: Option<&Value>) -> String {
    let Some(value) = value.filter(|v| !v.is_null()) else {
        return quote("");
    };

    match FieldValue::from_value(value) {
        Some(FieldValue::Text(text)) => quote(&text),
        #[allow(clippy::cast_precision_loss)]
        Some(FieldValue::File(file)) => quote(&format!(
            "{} ({:.2} KB)",
            file.filename,
            file.size as f64 / 1024.0
        )),
        None => quote(&value.to_string()),
    }
}

/// Quotes a cell, doubling embedded quotes.
fn quote(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

/// Header cells are bare unless they would break the row.
fn header_cell(name: &str) -> String {
    if name.contains([',', '"', '\n', '\r']) {
        quote(name)
    } else {
        name.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use proptest::prelude::*;
    use serde_json::json;
    use uuid::Uuid;

    use crate::test_support::data;

    fn submission(value: Value) -> Submission {
        Submission {
            id: Uuid::new_v4(),
            form_id: Uuid::nil(),
            data: data(value),
            files: None,
            ip_address: "203.0.113.7".to_string(),
            user_agent: "test".to_string(),
            created_at: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_header_is_union_of_keys() {
        let csv = export_csv(&[submission(json!({"a": "x"})), submission(json!({"b": "y"}))]);
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines[0], "Submitted At,IP Address,a,b");
        assert_eq!(
            lines[1],
            r#""2024-05-01T12:00:00+00:00","203.0.113.7","x","""#
        );
        assert_eq!(
            lines[2],
            r#""2024-05-01T12:00:00+00:00","203.0.113.7","","y""#
        );
    }

    #[test]
    fn test_embedded_quotes_are_doubled() {
        let csv = export_csv(&[submission(json!({"msg": r#"say "hi", ok"#}))]);
        assert!(csv.ends_with(r#","say ""hi"", ok""#));
    }

    #[test]
    fn test_file_values_render_name_and_size() {
        let csv = export_csv(&[submission(json!({
            "resume": {"filename": "cv.pdf", "size": 2560, "contentType": "application/pdf"}
        }))]);
        assert!(csv.ends_with(r#","cv.pdf (2.50 KB)""#));
    }

    #[test]
    fn test_other_objects_render_as_json() {
        let csv = export_csv(&[submission(json!({"meta": {"k": 1}}))]);
        assert!(csv.ends_with(r#","{""k"":1}""#));
    }

    #[test]
    fn test_empty_export_is_header_only() {
        assert_eq!(export_csv(&[]), "Submitted At,IP Address");
    }

    #[test]
    fn test_awkward_header_names_are_quoted() {
        let csv = export_csv(&[submission(json!({"first, last": "Ada"}))]);
        assert!(csv.starts_with(r#"Submitted At,IP Address,"first, last""#));
    }

    proptest! {
        #[test]
        fn prop_quoted_cells_round_trip(text in ".*") {
            let cell = quote(&text);
            prop_assert!(cell.starts_with('"') && cell.ends_with('"'));
            let inner = &cell[1..cell.len() - 1];
            prop_assert_eq!(inner.replace("\"\"", "\""), text);
        }
    }
}
