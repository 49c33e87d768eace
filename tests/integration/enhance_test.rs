//! Error enhancement through the public API.
//!
//! Exercises `enhance`, `classify` and `is_retriable` the way the executor
//! and external retry logic call them.

use db_gateway::enhance::{classify, enhance, is_retriable, ErrorCategory, HINT_MARKER};

const SAMPLE_ERRORS: &[&str] = &[
    "SQL compilation error: Object 'MY_TABLE' does not exist or not authorized.",
    "SQL compilation error: Cannot perform SELECT. No active warehouse selected in the current session.",
    "SQL compilation error: invalid identifier 'UNKNOWN_COLUMN'",
    "SQL compilation error: syntax error line 1 at position 45 unexpected 'FROM'",
    "SQL access control error: Insufficient privileges to operate on table 'CUSTOMERS'",
    "Numeric value 'abc123' is not recognized",
    "Session ABC123 has expired. Please login again.",
    "The database MYDB does not exist",
    "Some completely unknown error occurred",
    "SQL error: Column 'user.name' contains invalid chars: @#$%",
    "  padded error with surrounding whitespace \n\t",
];

#[test]
fn test_output_contains_trimmed_original() {
    for error in SAMPLE_ERRORS {
        let enhanced = enhance(error, None);
        assert!(
            enhanced.contains(error.trim()),
            "missing original text for {error:?}"
        );
        assert!(enhanced.starts_with(error.trim()));
    }
}

#[test]
fn test_object_not_found_names_object() {
    let enhanced = enhance(
        "SQL compilation error: Object 'MY_TABLE' does not exist or not authorized.",
        None,
    );

    assert!(enhanced.contains("MY_TABLE"));
    assert!(enhanced.contains(HINT_MARKER));
    assert!(enhanced.contains("Run SHOW TABLES or SHOW VIEWS to see available objects"));
    assert!(enhanced.contains("Suggestions:\n  1. "));
}

#[test]
fn test_no_warehouse_suggestions() {
    let enhanced = enhance(
        "SQL compilation error: Cannot perform SELECT. No active warehouse selected",
        None,
    );
    assert!(enhanced.contains("USE WAREHOUSE"));
    assert!(enhanced.contains("SHOW WAREHOUSES"));
}

#[test]
fn test_query_section_by_length() {
    let short = "SELECT * FROM TABLE1";
    for error in SAMPLE_ERRORS {
        assert!(enhance(error, Some(short)).contains(&format!("Query: {short}")));
    }

    let long = format!(
        "SELECT {} FROM table",
        (0..100)
            .map(|i| format!("col{i}"))
            .collect::<Vec<_>>()
            .join(", ")
    );
    assert!(long.len() >= 200);
    for error in SAMPLE_ERRORS {
        assert!(!enhance(error, Some(&long)).contains("Query:"));
    }
}

#[test]
fn test_degenerate_inputs_never_fail() {
    assert!(enhance("", None).is_empty());
    assert!(enhance("   \n  ", None).is_empty());

    let long = format!("Error: {}", "x".repeat(10_000));
    assert!(enhance(&long, Some("SELECT 1")).starts_with("Error: "));
}

#[test]
fn test_fallback_precedence() {
    let text = "object does not exist after syntax error; check permission";
    assert_eq!(classify(text), ErrorCategory::ObjectNotFound);

    let text = "syntax error; check permission";
    assert_eq!(classify(text), ErrorCategory::SyntaxError);

    let text = "missing privileges";
    assert_eq!(classify(text), ErrorCategory::PermissionDenied);
}

#[test]
fn test_retriability_examples() {
    assert!(is_retriable("Session ABC123 has expired"));
    assert!(!is_retriable("SQL compilation error: syntax error line 1"));
    assert!(is_retriable("Connection reset by peer"));
    assert!(!is_retriable("Insufficient privileges"));
}

#[test]
fn test_retriability_is_independent_of_enhancement() {
    // Enhanced with a specific hint, but permanent.
    let not_found = "SQL compilation error: Object 'MY_TABLE' does not exist";
    assert_eq!(classify(not_found), ErrorCategory::ObjectNotFound);
    assert!(!is_retriable(not_found));

    // Unrecognized by the enhancer, but transient.
    let disconnect = "Server disconnected while reading response";
    assert_eq!(classify(disconnect), ErrorCategory::Unrecognized);
    assert!(is_retriable(disconnect));
}

#[test]
fn test_concurrent_callers() {
    let handles: Vec<_> = (0..8)
        .map(|i| {
            std::thread::spawn(move || {
                let error = format!("SQL compilation error: invalid identifier 'COL_{i}'");
                (enhance(&error, None), is_retriable(&error))
            })
        })
        .collect();

    for (i, handle) in handles.into_iter().enumerate() {
        let (enhanced, retriable) = handle.join().unwrap();
        assert!(enhanced.contains(&format!("Column 'COL_{i}' does not exist in the table.")));
        assert!(!retriable);
    }
}
