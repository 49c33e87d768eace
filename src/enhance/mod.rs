//! Error enhancement for failed queries.
//!
//! Turns raw database error text into a message with a hint, numbered
//! suggestions and the offending query, and decides whether an error is
//! transient. Everything here is pure and safe to call from any thread.

mod retriable;
mod signatures;

pub use retriable::is_retriable;
pub use signatures::{
    find_signature, ErrorCategory, ErrorSignature, HintTemplate, SignatureMatch, SIGNATURES,
};

use std::fmt;

/// Marker placed before every hint line.
pub const HINT_MARKER: &str = "💡";

/// Queries at or above this many characters are not echoed back.
pub const MAX_QUERY_ECHO_CHARS: usize = 200;

/// An error message with the guidance attached to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnhancedError {
    original: String,
    category: ErrorCategory,
    hint: Option<String>,
    guidance: Option<&'static str>,
    suggestions: &'static [&'static str],
    query: Option<String>,
}

impl EnhancedError {
    /// Classifies `error` and collects its hint, suggestions and query echo.
    pub fn from_error(error: &str, query: Option<&str>) -> Self {
        let original = error.trim();
        let query = query
            .filter(|q| !q.is_empty() && q.chars().count() < MAX_QUERY_ECHO_CHARS)
            .map(str::to_string);

        if let Some(matched) = find_signature(original) {
            return Self {
                original: original.to_string(),
                category: matched.signature.category,
                hint: Some(matched.hint()),
                guidance: None,
                suggestions: matched.signature.suggestions,
                query,
            };
        }

        let (category, hint, guidance) = match keyword_hint(&original.to_lowercase()) {
            Some(KeywordHint {
                category,
                hint,
                guidance,
            }) => (category, Some(hint.to_string()), Some(guidance)),
            None => (ErrorCategory::Unrecognized, None, None),
        };

        Self {
            original: original.to_string(),
            category,
            hint,
            guidance,
            suggestions: &[],
            query,
        }
    }

    /// The trimmed original error text.
    pub fn original(&self) -> &str {
        &self.original
    }

    pub fn category(&self) -> ErrorCategory {
        self.category
    }

    pub fn hint(&self) -> Option<&str> {
        self.hint.as_deref()
    }

    pub fn suggestions(&self) -> &[&'static str] {
        self.suggestions
    }

    /// The echoed query, present only when it was short enough.
    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }
}

impl fmt::Display for EnhancedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.original)?;

        if let Some(hint) = &self.hint {
            write!(f, "\n\n{HINT_MARKER} Hint: {hint}")?;
            if let Some(guidance) = self.guidance {
                write!(f, "\n{guidance}")?;
            }
        }

        if !self.suggestions.is_empty() {
            f.write_str("\n\nSuggestions:")?;
            for (i, suggestion) in self.suggestions.iter().enumerate() {
                write!(f, "\n  {}. {}", i + 1, suggestion)?;
            }
        }

        if let Some(query) = &self.query {
            write!(f, "\n\nQuery: {query}")?;
        }

        Ok(())
    }
}

/// Builds the user-facing message for a failed query.
///
/// Never fails: unrecognized, empty or very long input still yields the
/// trimmed original text (plus the query echo when it qualifies).
pub fn enhance(error: &str, query: Option<&str>) -> String {
    EnhancedError::from_error(error, query).to_string()
}

/// Returns the category `enhance` would assign to `error`.
pub fn classify(error: &str) -> ErrorCategory {
    let trimmed = error.trim();
    match find_signature(trimmed) {
        Some(matched) => matched.signature.category,
        None => keyword_hint(&trimmed.to_lowercase())
            .map(|h| h.category)
            .unwrap_or(ErrorCategory::Unrecognized),
    }
}

/// Generic hint used when no signature matched.
struct KeywordHint {
    category: ErrorCategory,
    hint: &'static str,
    guidance: &'static str,
}

/// Keyword fallback, checked in priority order against lowercased text.
fn keyword_hint(lower: &str) -> Option<KeywordHint> {
    if lower.contains("does not exist") {
        Some(KeywordHint {
            category: ErrorCategory::ObjectNotFound,
            hint: "The object you're referencing doesn't exist.",
            guidance: "Try running SHOW TABLES, SHOW SCHEMAS, or SHOW DATABASES to see what's available.",
        })
    } else if lower.contains("syntax") && lower.contains("error") {
        Some(KeywordHint {
            category: ErrorCategory::SyntaxError,
            hint: "There's a syntax error in your SQL query.",
            guidance: "Check for typos, missing commas, or incorrect SQL keywords.",
        })
    } else if lower.contains("permission") || lower.contains("privileges") {
        Some(KeywordHint {
            category: ErrorCategory::PermissionDenied,
            hint: "You don't have permission for this operation.",
            guidance: "Contact your administrator or try a different role: USE ROLE role_name",
        })
    } else {
        None
    }
}
