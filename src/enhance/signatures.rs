//! Known error signatures and the table they are matched from.
//!
//! Each signature pairs a case-insensitive pattern with a category, a hint
//! template and remediation steps. The table is ordered: the first matching
//! signature wins and later entries are never consulted.

use regex::{Regex, RegexBuilder};
use std::fmt;
use std::sync::LazyLock;

/// Category of a recognized error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    ObjectNotFound,
    NoWarehouse,
    NoDatabase,
    NoSchema,
    InvalidColumn,
    SyntaxError,
    PermissionDenied,
    TypeConversion,
    DuplicateKey,
    SessionExpired,
    InvalidOperation,
    /// Nothing in the signature table or keyword fallback matched.
    Unrecognized,
}

impl ErrorCategory {
    /// Returns the snake_case tag for this category.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ObjectNotFound => "object_not_found",
            Self::NoWarehouse => "no_warehouse",
            Self::NoDatabase => "no_database",
            Self::NoSchema => "no_schema",
            Self::InvalidColumn => "invalid_column",
            Self::SyntaxError => "syntax_error",
            Self::PermissionDenied => "permission_denied",
            Self::TypeConversion => "type_conversion",
            Self::DuplicateKey => "duplicate_key",
            Self::SessionExpired => "session_expired",
            Self::InvalidOperation => "invalid_operation",
            Self::Unrecognized => "unrecognized",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Hint text attached to a signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HintTemplate {
    /// Used verbatim.
    Static(&'static str),
    /// Contains one `{}` placeholder, replaced by the first captured detail.
    SingleCapture(&'static str),
}

impl HintTemplate {
    /// Renders the hint, substituting `detail` into a single-capture template.
    ///
    /// A single-capture template rendered without a detail keeps its
    /// placeholder untouched.
    pub fn render(&self, detail: Option<&str>) -> String {
        match (self, detail) {
            (Self::Static(text), _) => (*text).to_string(),
            (Self::SingleCapture(text), Some(detail)) => text.replacen("{}", detail, 1),
            (Self::SingleCapture(text), None) => (*text).to_string(),
        }
    }
}

/// A recognizable error shape.
#[derive(Debug)]
pub struct ErrorSignature {
    pub category: ErrorCategory,
    pattern: Regex,
    pub hint: HintTemplate,
    pub suggestions: &'static [&'static str],
}

impl ErrorSignature {
    fn new(
        category: ErrorCategory,
        pattern: &str,
        hint: HintTemplate,
        suggestions: &'static [&'static str],
    ) -> Self {
        let pattern = RegexBuilder::new(pattern)
            .case_insensitive(true)
            .build()
            .expect("signature patterns are valid regular expressions");
        Self {
            category,
            pattern,
            hint,
            suggestions,
        }
    }

    /// Tries this signature against `text`.
    ///
    /// Returns `None` when the pattern does not match, otherwise the first
    /// captured group (if the pattern defines one and it participated).
    pub fn captures<'t>(&self, text: &'t str) -> Option<Option<&'t str>> {
        let caps = self.pattern.captures(text)?;
        Some(caps.get(1).map(|m| m.as_str()))
    }
}

/// A signature that matched, with its captured detail.
#[derive(Debug, Clone, Copy)]
pub struct SignatureMatch<'a> {
    pub signature: &'a ErrorSignature,
    pub detail: Option<&'a str>,
}

impl SignatureMatch<'_> {
    /// Renders the signature's hint with the captured detail.
    pub fn hint(&self) -> String {
        self.signature.hint.render(self.detail)
    }
}

/// Finds the first signature in declaration order that matches `text`.
pub fn find_signature(text: &str) -> Option<SignatureMatch<'_>> {
    SIGNATURES.iter().find_map(|signature| {
        signature
            .captures(text)
            .map(|detail| SignatureMatch { signature, detail })
    })
}

/// The ordered signature table, built once on first use.
pub static SIGNATURES: LazyLock<Vec<ErrorSignature>> = LazyLock::new(|| {
    use ErrorCategory::*;
    use HintTemplate::*;

    vec![
        ErrorSignature::new(
            ObjectNotFound,
            r"SQL compilation error.*Object '([^']+)' does not exist",
            SingleCapture(
                "Check that '{}' is spelled correctly and exists in your current database/schema.",
            ),
            &[
                "Run SHOW TABLES or SHOW VIEWS to see available objects",
                "Check your current context with SHOW PARAMETERS LIKE 'SEARCH_PATH'",
                "Use fully qualified names: database.schema.table",
            ],
        ),
        ErrorSignature::new(
            NoWarehouse,
            r"SQL compilation error.*Cannot perform .* No active warehouse selected",
            Static("No warehouse is selected for query execution."),
            &[
                "Set a warehouse: USE WAREHOUSE your_warehouse",
                "Or specify in query: ALTER SESSION SET WAREHOUSE = 'your_warehouse'",
                "Check available warehouses: SHOW WAREHOUSES",
            ],
        ),
        ErrorSignature::new(
            NoDatabase,
            r"SQL compilation error.*Cannot perform .* No database selected",
            Static("No database is selected. You need to specify which database to use."),
            &[
                "Set a database: USE DATABASE your_database",
                "Use fully qualified names: database.schema.table",
                "Check available databases: SHOW DATABASES",
            ],
        ),
        ErrorSignature::new(
            NoSchema,
            r"SQL compilation error.*Cannot perform .* No schema selected",
            Static("No schema is selected. You need to specify which schema to use."),
            &[
                "Set a schema: USE SCHEMA your_schema",
                "Use qualified names: schema.table",
                "Check available schemas: SHOW SCHEMAS",
            ],
        ),
        ErrorSignature::new(
            InvalidColumn,
            r"SQL compilation error.*invalid identifier '([^']+)'",
            SingleCapture("Column '{}' does not exist in the table."),
            &[
                "Check column name spelling and capitalization",
                "Run DESCRIBE TABLE table_name to see available columns",
                "Column names are case-insensitive but must match definition",
            ],
        ),
        ErrorSignature::new(
            SyntaxError,
            r"SQL compilation error.*syntax error line (\d+) at position (\d+)",
            SingleCapture("SQL syntax error on line {}."),
            &[
                "Check for missing commas, parentheses, or keywords",
                "Verify SQL command spelling and structure",
                "Make sure quotes and brackets are balanced",
            ],
        ),
        ErrorSignature::new(
            PermissionDenied,
            r"SQL access control error.*Insufficient privileges",
            Static("You don't have permission to perform this operation."),
            &[
                "Check your role permissions: SHOW GRANTS TO ROLE your_role",
                "Contact your database administrator for access",
                "Try switching to a role with more privileges: USE ROLE role_name",
            ],
        ),
        ErrorSignature::new(
            TypeConversion,
            r"Numeric value '([^']+)' is not recognized",
            SingleCapture("Cannot convert '{}' to a numeric type."),
            &[
                "Check data type compatibility",
                "Use explicit type casting: CAST(column AS type)",
                "Verify input data format matches expected type",
            ],
        ),
        ErrorSignature::new(
            DuplicateKey,
            r"Duplicate key value violates unique constraint",
            Static("Attempting to insert a duplicate value in a unique column."),
            &[
                "Check for existing records before inserting",
                "Use MERGE or UPDATE instead of INSERT if record might exist",
                "Verify primary key or unique constraint definitions",
            ],
        ),
        ErrorSignature::new(
            SessionExpired,
            r"(Session .* has expired|Authentication token has expired)",
            Static("Your session or authentication has expired."),
            &[
                "The gateway should auto-reconnect; if you see this, please report it",
                "Try running the query again",
                "Restart the gateway daemon if the problem persists",
            ],
        ),
        ErrorSignature::new(
            InvalidOperation,
            r"SQL execution error.*Operation not allowed",
            Static("This operation is not allowed in the current context."),
            &[
                "Check if the operation is supported for this object type",
                "Verify you're using the correct SQL syntax for this database",
                "Some operations require specific privileges or settings",
            ],
        ),
    ]
});
