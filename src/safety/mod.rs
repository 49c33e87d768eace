//! Read-only statement guard.
//!
//! Checks that a statement starts with a read-only command before it reaches
//! the database, and bounds result size by injecting a LIMIT clause.

mod validator;

pub use validator::{apply_limit, validate_read_only};

use std::fmt;

/// The kind of read-only statement that was accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatementKind {
    Select,
    /// Common table expression (`WITH ... SELECT`).
    With,
    Show,
    /// `DESCRIBE` or its `DESC` shorthand.
    Describe,
}

impl fmt::Display for StatementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Select => write!(f, "SELECT"),
            Self::With => write!(f, "WITH (CTE)"),
            Self::Show => write!(f, "SHOW"),
            Self::Describe => write!(f, "DESCRIBE"),
        }
    }
}
