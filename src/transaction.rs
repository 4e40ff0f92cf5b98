//! Transaction models: raw source cells, normalized entries and annotated rows.

use crate::decimal::Amount;
use chrono::{NaiveDate, NaiveDateTime};

/// Date-only layouts accepted in source tables, tried in order.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d-%m-%Y", "%d.%m.%Y"];

/// Date-time layouts accepted in source tables; the time part is dropped.
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// Parses a date cell, returning `None` for anything unrecognized.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(trimmed, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
                .map(|dt| dt.date())
        })
}

/// One row of the source table as mapped by the caller, before any coercion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRow {
    pub date: Option<String>,
    pub particulars: String,
    pub carried_forward: Option<String>,
    pub debit: Option<String>,
    pub credit: Option<String>,
}

impl RawRow {
    /// Applies the coercion policy: bad amounts become zero, bad dates become
    /// missing. Never fails.
    pub fn normalize(&self) -> Entry {
        let carried_forward = self
            .carried_forward
            .as_deref()
            .map(str::trim)
            .filter(|cf| !cf.is_empty())
            .map(str::to_string);

        Entry {
            date: self.date.as_deref().and_then(parse_date),
            particulars: self.particulars.clone(),
            carried_forward,
            debit: Amount::coerce_opt(self.debit.as_deref()),
            credit: Amount::coerce_opt(self.credit.as_deref()),
        }
    }
}

/// A ledger entry with typed fields but no derived balance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub date: Option<NaiveDate>,
    pub particulars: String,
    pub carried_forward: Option<String>,
    pub debit: Amount,
    pub credit: Amount,
}

impl Entry {
    /// Both a debit and a credit on the same row.
    pub fn is_ambiguous(&self) -> bool {
        self.debit.is_positive() && self.credit.is_positive()
    }
}

/// Direction derived from a row's amounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TxType {
    /// Decreases the running balance.
    Debit,
    /// Increases the running balance.
    Credit,
    /// Neither amount is positive; balance carried over unchanged.
    None,
}

impl TxType {
    /// Label used in the review view and the exported sheet.
    pub fn label(&self) -> &'static str {
        match self {
            TxType::Debit => "Dr",
            TxType::Credit => "Cr",
            TxType::None => "",
        }
    }
}

/// An entry annotated by the balance engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionRow {
    pub date: Option<NaiveDate>,
    pub particulars: String,
    pub carried_forward: Option<String>,
    pub debit: Amount,
    pub credit: Amount,

    /// Running balance after this row is applied.
    pub balance: Amount,

    pub kind: TxType,
}

impl TransactionRow {
    /// Drops the derived fields, giving back the entry this row was computed from.
    pub fn to_entry(&self) -> Entry {
        Entry {
            date: self.date,
            particulars: self.particulars.clone(),
            carried_forward: self.carried_forward.clone(),
            debit: self.debit,
            credit: self.credit,
        }
    }
}

/// Direction picked for a manually entered transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Debit,
    Credit,
}

/// A single transaction typed in by hand rather than loaded from a table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManualEntry {
    pub date: NaiveDate,
    pub particulars: String,
    pub carried_forward: Option<String>,
    pub direction: Direction,
    pub amount: Amount,
}

impl ManualEntry {
    /// Validates and converts to an [`Entry`].
    ///
    /// Returns `None` when particulars is blank or the amount is not positive.
    pub fn into_entry(self) -> Option<Entry> {
        if self.particulars.trim().is_empty() || !self.amount.is_positive() {
            return None;
        }

        let (debit, credit) = match self.direction {
            Direction::Debit => (self.amount, Amount::ZERO),
            Direction::Credit => (Amount::ZERO, self.amount),
        };

        Some(Entry {
            date: Some(self.date),
            particulars: self.particulars,
            carried_forward: self.carried_forward.filter(|cf| !cf.trim().is_empty()),
            debit,
            credit,
        })
    }
}
