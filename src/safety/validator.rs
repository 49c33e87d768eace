//! Prefix-based read-only validation and LIMIT injection.
//!
//! Statements are never parsed; only their leading keyword is inspected.

use crate::error::{GatewayError, Result};

use super::StatementKind;

/// Leading keywords accepted as read-only, checked in order.
///
/// `DESCRIBE` precedes `DESC` so the longer keyword is reported.
const READ_ONLY_PREFIXES: &[(&str, StatementKind)] = &[
    ("SELECT", StatementKind::Select),
    ("WITH", StatementKind::With),
    ("SHOW", StatementKind::Show),
    ("DESCRIBE", StatementKind::Describe),
    ("DESC", StatementKind::Describe),
];

/// Checks that `sql` starts with a read-only command.
///
/// Matching is case-insensitive and ignores surrounding whitespace. Rejected
/// statements produce a validation error naming their first word.
pub fn validate_read_only(sql: &str) -> Result<StatementKind> {
    let upper = sql.trim().to_uppercase();

    if let Some((_, kind)) = READ_ONLY_PREFIXES
        .iter()
        .find(|(prefix, _)| upper.starts_with(prefix))
    {
        return Ok(*kind);
    }

    let command = upper.split_whitespace().next().unwrap_or("UNKNOWN");
    Err(GatewayError::validation(format!(
        "Only read-only queries allowed: {command}"
    )))
}

/// Appends `LIMIT <limit>` to a SELECT that has no LIMIT of its own.
///
/// A missing or zero limit, a non-SELECT statement, or any occurrence of the
/// word LIMIT in the statement leaves it unchanged. Trailing whitespace and
/// semicolons are removed before the clause is appended.
pub fn apply_limit(sql: &str, limit: Option<u32>) -> String {
    let upper = sql.trim().to_uppercase();

    match limit {
        Some(limit) if limit > 0 && !upper.contains("LIMIT") && upper.starts_with("SELECT") => {
            let body = sql.trim_end().trim_end_matches(';').trim_end();
            format!("{body} LIMIT {limit}")
        }
        _ => sql.to_string(),
    }
}
