//! Text rendering for command output. Every function returns the text so the
//! CLI decides where it goes.

use tabled::builder::Builder;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::backends::{PutReceipt, SecretRef};
use crate::compare::Diff;
use crate::payload::{render_value, value_type, Payload};

const RULE_WIDTH: usize = 100;

#[derive(Tabled)]
struct SecretRow {
    #[tabled(rename = "NAME")]
    name: String,
    #[tabled(rename = "ARN")]
    arn: String,
}

#[derive(Tabled)]
struct TypedValueRow {
    #[tabled(rename = "KEY")]
    key: String,
    #[tabled(rename = "TYPE")]
    kind: &'static str,
    #[tabled(rename = "VALUE")]
    value: String,
}

pub fn rule(ch: char) -> String {
    ch.to_string().repeat(RULE_WIDTH)
}

/// Name/ARN table for a secret listing
pub fn secret_table(secrets: &[SecretRef]) -> String {
    let rows = secrets.iter().map(|s| SecretRow {
        name: s.name.clone(),
        arn: s.arn.clone(),
    });

    let mut table = Table::new(rows);
    table.with(Style::blank());
    table.to_string()
}

/// `key: value`, one per line
pub fn payload_lines(payload: &Payload) -> String {
    payload
        .iter()
        .map(|(key, value)| format!("{}: {}\n", key, render_value(value)))
        .collect()
}

/// Key, JSON type and value of every entry
pub fn payload_types(payload: &Payload) -> String {
    let rows = payload.iter().map(|(key, value)| TypedValueRow {
        key: key.clone(),
        kind: value_type(value),
        value: render_value(value),
    });

    let mut table = Table::new(rows);
    table.with(Style::blank());
    table.to_string()
}

/// Diff of `name_a` against `name_b`, framed by rule lines
pub fn diff_table(name_a: &str, name_b: &str, diff: &Diff) -> String {
    let mut builder = Builder::default();
    builder.push_record([name_a.to_string(), name_b.to_string()]);
    for (a, b) in diff {
        builder.push_record([a.clone(), b.clone()]);
    }

    let mut table = builder.build();
    table.with(Style::blank());

    format!("{}\n{}\n{}\n", rule('*'), table, rule('-'))
}

/// One-line summary of a successful write
pub fn put_summary(name: &str, receipt: &PutReceipt) -> String {
    format!(
        "Updated secret {} (version {}, arn {})",
        name,
        receipt.version_id.as_deref().unwrap_or("unknown"),
        receipt.arn.as_deref().unwrap_or("unknown")
    )
}
