use thiserror::Error;

/// Convenient alias for fallible results returned throughout the crate.
pub type Result<T> = std::result::Result<T, CalculatorError>;

/// Error type covering the failure cases that can occur while the cost
/// calculator workbook is laid out, written, or read back.
#[derive(Debug, Error)]
pub enum CalculatorError {
    /// Wrapper for IO failures such as reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Raised when the JSON manifest cannot be serialised or parsed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Errors bubbled up from the Excel writer implementation.
    #[error("Excel write error: {0}")]
    ExcelWrite(#[from] rust_xlsxwriter::XlsxError),

    /// Errors bubbled up from the Excel reader implementation.
    #[error("Excel read error: {0}")]
    ExcelRead(#[from] calamine::XlsxError),

    /// Raised when a sheet name cannot be used inside a workbook.
    #[error("invalid sheet name '{name}': {reason}")]
    InvalidSheetName { name: String, reason: &'static str },

    /// Raised when two sheets share a name.
    #[error("duplicate sheet name '{0}'")]
    DuplicateSheet(String),

    /// Raised when two rows in one sheet share a key.
    #[error("duplicate row key '{key}' in sheet '{sheet}'")]
    DuplicateRowKey { sheet: String, key: String },

    /// Raised when a `{...}` token in a formula template cannot be parsed.
    #[error("malformed reference '{token}' in sheet '{sheet}'")]
    MalformedReference { sheet: String, token: String },

    /// Raised when a formula names a sheet that is not part of the workbook.
    #[error("sheet '{sheet}' references unknown sheet '{target}'")]
    UnresolvedSheet { sheet: String, target: String },

    /// Raised when a formula names a row key that the target sheet lacks.
    #[error("sheet '{sheet}' references unknown row '{key}' in sheet '{target}'")]
    UnresolvedRow {
        sheet: String,
        target: String,
        key: String,
    },

    /// Raised when a formula points past the last column of the target sheet.
    #[error("sheet '{sheet}' references column {column} outside sheet '{target}'")]
    ColumnOutOfRange {
        sheet: String,
        target: String,
        column: String,
    },

    /// Raised when a totals row has no data rows to sum.
    #[error("total row '{key}' in sheet '{sheet}' has no data rows above it")]
    EmptyTotal { sheet: String, key: String },

    /// Raised when a written workbook does not match its layout.
    #[error("invalid workbook structure: {0}")]
    InvalidWorkbook(String),

    /// Raised when the tracing subscriber fails to initialise.
    #[error("failed to initialise logging: {0}")]
    Logging(String),
}
