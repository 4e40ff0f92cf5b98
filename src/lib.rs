//! # Ledger Engine
//!
//! Folds an ordered sequence of debit/credit rows into a running balance
//! and exports the annotated ledger as an xlsx spreadsheet.
//!
//! ## Design Principles
//!
//! - **Exact decimal arithmetic**: full parsed precision via `rust_decimal`, rounded to 2 places only for display
//! - **Total over bad data**: unparseable amounts count as zero, unparseable dates are missing
//! - **Full recomputation**: every mutation re-derives balances from the first row
//! - **Insertion order**: rows are never re-sorted, not even by date
//!
//! ## Example
//!
//! ```no_run
//! use ledger_engine::{export_ledger, read_csv, Amount, ColumnMapping, LedgerState};
//! use std::io::Cursor;
//!
//! let csv = "Date,Particulars,Dr,Cr\n2024-01-02,Sales,,500\n";
//! let rows = read_csv(Cursor::new(csv), &ColumnMapping::default()).unwrap();
//!
//! let mut ledger = LedgerState::new(Amount::from(1000));
//! ledger.replace_rows(&rows).unwrap();
//! let bytes = export_ledger(ledger.rows(), ledger.opening_balance()).unwrap();
//! std::fs::write("ledger.xlsx", bytes).unwrap();
//! ```

pub mod balance;
pub mod decimal;
pub mod error;
pub mod export;
pub mod import;
pub mod ledger;
pub mod transaction;
pub mod view;

pub use balance::{annotate, compute_balances, recompute};
pub use decimal::Amount;
pub use error::{LedgerError, Result};
pub use export::{export_filename, export_ledger, LedgerSheet, XLSX_MIME_TYPE};
pub use import::{read_csv, ColumnMapping};
pub use ledger::{LedgerState, LedgerSummary, DEFAULT_OPENING_BALANCE};
pub use transaction::{Direction, Entry, ManualEntry, RawRow, TransactionRow, TxType};
pub use view::{format_currency, write_view};
