//! Transient-failure detection.
//!
//! Independent of the signature table: an error can carry a specific hint
//! and still be permanent, or be transient without any hint at all.

use regex::{RegexSet, RegexSetBuilder};
use std::sync::LazyLock;

/// Patterns describing transient conditions, in evaluation order.
const RETRIABLE_PATTERNS: &[&str] = &[
    // Session (with optional ID) has expired
    r"Session.*has expired",
    r"Authentication token has expired",
    r"Connection reset",
    r"Timeout",
    r"Server disconnect",
];

static RETRIABLE: LazyLock<RegexSet> = LazyLock::new(|| {
    RegexSetBuilder::new(RETRIABLE_PATTERNS)
        .case_insensitive(true)
        .build()
        .expect("retriable patterns are valid regular expressions")
});

/// Returns true if the error describes a transient condition worth retrying
/// after reconnecting.
///
/// The raw text is scanned as-is (no trimming).
pub fn is_retriable(error: &str) -> bool {
    RETRIABLE.is_match(error)
}
