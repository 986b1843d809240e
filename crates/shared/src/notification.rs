//! HTML template for submission notification emails.

use std::fmt::Write as _;

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

const CONTAINER: &str = "font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto; \
    background-color: #ffffff; border: 1px solid #e0e0e0; border-radius: 8px; overflow: hidden;";
const HEADER: &str = "background-color: #0070f3; color: #ffffff; padding: 20px; text-align: center;";
const TITLE: &str = "margin: 0; font-size: 24px; font-weight: bold;";
const CONTENT: &str = "padding: 20px; color: #333333; line-height: 1.6;";
const FIELD: &str = "margin-bottom: 15px; border-bottom: 1px solid #f0f0f0; padding-bottom: 10px;";
const LABEL: &str = "font-weight: bold; color: #555555; display: block; margin-bottom: 5px;";
const VALUE: &str = "color: #000000;";
const CODE_BLOCK: &str = "background-color: #f5f5f5; padding: 10px; border-radius: 4px; \
    font-family: monospace; font-size: 14px; overflow-x: auto;";
const FILES_SECTION: &str = "margin-top: 20px; padding-top: 20px; border-top: 2px solid #e0e0e0;";
const FILE_LINK: &str = "display: inline-block; background-color: #f0f0f0; padding: 8px 12px; \
    border-radius: 4px; text-decoration: none; color: #0070f3; margin-right: 10px; \
    margin-bottom: 10px;";
const FOOTER: &str = "background-color: #f9f9f9; padding: 15px; text-align: center; \
    font-size: 12px; color: #888888; border-top: 1px solid #e0e0e0;";

/// Subject line for a submission notification.
#[must_use]
pub fn subject(form_name: &str) -> String {
    format!("New submission from {form_name}")
}

/// Renders the notification body.
///
/// `data` is the stored field mapping; `files` holds the raw uploader results
/// of successful uploads keyed by field name.
#[must_use]
pub fn render_submission_html(
    form_name: &str,
    data: &Map<String, Value>,
    files: Option<&Map<String, Value>>,
    sent_at: DateTime<Utc>,
) -> String {
    let form_name = escape_html(form_name);

    let mut fields_html = String::new();
    for (key, value) in data {
        let value_html = match value {
            Value::Object(_) | Value::Array(_) => {
                let pretty = serde_json::to_string_pretty(value).unwrap_or_default();
                format!(r#"<pre style="{CODE_BLOCK}">{}</pre>"#, escape_html(&pretty))
            }
            Value::String(s) => format!(r#"<div style="{VALUE}">{}</div>"#, escape_html(s)),
            other => format!(r#"<div style="{VALUE}">{}</div>"#, escape_html(&other.to_string())),
        };
        let _ = write!(
            fields_html,
            r#"<div style="{FIELD}"><span style="{LABEL}">{}</span>{value_html}</div>"#,
            escape_html(key)
        );
    }

    let files_html = match files {
        Some(files) if !files.is_empty() => {
            let mut links = String::new();
            for (key, file) in files {
                let url = file.get("secure_url").and_then(Value::as_str).unwrap_or("#");
                let name = file
                    .get("original_filename")
                    .and_then(Value::as_str)
                    .unwrap_or(key);
                let _ = write!(
                    links,
                    r#"<a href="{}" style="{FILE_LINK}" target="_blank">{} ({})</a>"#,
                    escape_html(url),
                    escape_html(name),
                    escape_html(key)
                );
            }
            format!(
                r#"<div style="{FILES_SECTION}"><h3 style="margin-top: 0; color: #333;">Attachments</h3>{links}</div>"#
            )
        }
        _ => String::new(),
    };

    let sent_at = sent_at.format("%Y-%m-%d %H:%M:%S UTC");

    format!(
        r#"<!DOCTYPE html>
<html>
  <head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>New Submission: {form_name}</title>
  </head>
  <body style="margin: 0; padding: 20px; background-color: #f5f5f5;">
    <div style="{CONTAINER}">
      <div style="{HEADER}">
        <h2 style="{TITLE}">New Submission</h2>
        <div style="font-size: 14px; opacity: 0.9;">{form_name}</div>
      </div>
      <div style="{CONTENT}">
        {fields_html}
        {files_html}
      </div>
      <div style="{FOOTER}">
        <p style="margin: 0;">Sent via FormRelay</p>
        <p style="margin: 5px 0 0 0;">{sent_at}</p>
      </div>
    </div>
  </body>
</html>
"#
    )
}

/// Escapes text for inclusion in HTML content and attribute values.
fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
