//! Error types for the ledger engine.

use thiserror::Error;

/// Result type alias for ledger operations
pub type Result<T> = std::result::Result<T, LedgerError>;

/// Errors that can occur at the ledger's boundaries.
///
/// Malformed amounts and dates inside a source table are not errors; they
/// are coerced to zero and "missing" respectively.
#[derive(Error, Debug)]
pub enum LedgerError {
    /// Failed to open, read or write a file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV parsing error
    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    /// Spreadsheet encoding error
    #[error("Spreadsheet export error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    /// A mapped column is not present in the source header
    #[error("Column '{name}' not found in source table")]
    MissingColumn { name: String },

    /// The source table has fewer columns than the positional mapping needs
    #[error("Source table has {found} columns, at least {required} required")]
    TooFewColumns { found: usize, required: usize },

    /// A row carries both a debit and a credit amount
    #[error("Row {row} has both a Dr and a Cr amount")]
    AmbiguousAmounts { row: usize },

    /// The exported sheet would exceed the spreadsheet row limit
    #[error("Ledger needs {rows} sheet rows, the spreadsheet limit is {max}")]
    TooManyRows { rows: usize, max: usize },

    /// Manual entry rejected
    #[error("Invalid entry: {message}")]
    InvalidEntry { message: String },

    /// Configured opening balance is not a number
    #[error("Invalid opening balance '{0}'")]
    InvalidOpeningBalance(String),

    /// Missing input file argument
    #[error("Missing input file argument. Usage: ledger-engine <input.csv> [output.xlsx] [--opening-balance <amount>]")]
    MissingArgument,

    /// A flag was given without its value
    #[error("Missing value for {0}")]
    MissingFlagValue(String),
}
