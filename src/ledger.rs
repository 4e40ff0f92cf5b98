//! Caller-owned ledger state.
//!
//! The host owns a [`LedgerState`] and drives it through mutations. Every
//! mutation finishes with [`recompute`], so balances and types are always
//! derived from the top of the ledger, never patched in place.

use crate::balance::{find_ambiguous_row, recompute};
use crate::decimal::Amount;
use crate::error::{LedgerError, Result};
use crate::transaction::{Entry, ManualEntry, RawRow, TransactionRow, TxType};
use log::{debug, info, warn};

/// Opening balance used when none is configured.
pub const DEFAULT_OPENING_BALANCE: i64 = 304_205;

/// Opening balance plus the annotated rows, in insertion order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerState {
    opening_balance: Amount,
    rows: Vec<TransactionRow>,
}

/// Headline figures for a ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LedgerSummary {
    pub opening_balance: Amount,
    pub current_balance: Amount,
    pub net_change: Amount,
    pub transactions: usize,
}

impl LedgerState {
    /// Creates an empty ledger.
    pub fn new(opening_balance: Amount) -> Self {
        LedgerState {
            opening_balance,
            rows: Vec::new(),
        }
    }

    pub(crate) fn from_parts(opening_balance: Amount, rows: Vec<TransactionRow>) -> Self {
        LedgerState {
            opening_balance,
            rows,
        }
    }

    pub(crate) fn into_parts(self) -> (Amount, Vec<TransactionRow>) {
        (self.opening_balance, self.rows)
    }

    /// Replaces all rows with a freshly loaded source table.
    ///
    /// Rows with both amounts positive are rejected and the ledger is left
    /// untouched.
    pub fn replace_rows(&mut self, raw: &[RawRow]) -> Result<()> {
        let entries: Vec<Entry> = raw.iter().map(RawRow::normalize).collect();

        if let Some(idx) = find_ambiguous_row(&entries) {
            warn!("Rejecting source table: row {} has both Dr and Cr", idx + 1);
            return Err(LedgerError::AmbiguousAmounts { row: idx + 1 });
        }

        self.rows = entries.into_iter().map(TransactionRow::from).collect();
        self.refresh();
        info!("Loaded {} rows", self.rows.len());
        Ok(())
    }

    /// Appends one manually entered transaction.
    pub fn append(&mut self, manual: ManualEntry) -> Result<()> {
        let entry = manual.into_entry().ok_or_else(|| LedgerError::InvalidEntry {
            message: "particulars must be filled in and amount must be positive".to_string(),
        })?;
        self.push_entry(entry)
    }

    /// Appends an already-normalized entry.
    pub fn push_entry(&mut self, entry: Entry) -> Result<()> {
        if entry.is_ambiguous() {
            return Err(LedgerError::AmbiguousAmounts {
                row: self.rows.len() + 1,
            });
        }

        debug!("Appending '{}'", entry.particulars);
        self.rows.push(TransactionRow::from(entry));
        self.refresh();
        Ok(())
    }

    /// Changes the opening balance and re-derives every row.
    pub fn set_opening_balance(&mut self, opening_balance: Amount) {
        if opening_balance == self.opening_balance {
            return;
        }
        info!(
            "Opening balance changed from {} to {}",
            self.opening_balance, opening_balance
        );
        self.opening_balance = opening_balance;
        self.refresh();
    }

    /// Removes every row, keeping the opening balance.
    pub fn clear(&mut self) {
        self.rows.clear();
        self.refresh();
    }

    fn refresh(&mut self) {
        let opening_balance = self.opening_balance;
        let state = std::mem::replace(self, LedgerState::new(opening_balance));
        *self = recompute(state);
    }

    pub fn opening_balance(&self) -> Amount {
        self.opening_balance
    }

    pub fn rows(&self) -> &[TransactionRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Balance after the last row, or the opening balance if there are none.
    pub fn current_balance(&self) -> Amount {
        self.rows
            .last()
            .map(|r| r.balance)
            .unwrap_or(self.opening_balance)
    }

    pub fn net_change(&self) -> Amount {
        self.current_balance() - self.opening_balance
    }

    pub fn summary(&self) -> LedgerSummary {
        LedgerSummary {
            opening_balance: self.opening_balance,
            current_balance: self.current_balance(),
            net_change: self.net_change(),
            transactions: self.rows.len(),
        }
    }
}

impl Default for LedgerState {
    fn default() -> Self {
        Self::new(Amount::from(DEFAULT_OPENING_BALANCE))
    }
}

impl From<Entry> for TransactionRow {
    /// Wraps an entry with placeholder derived fields until the next recompute.
    fn from(entry: Entry) -> Self {
        TransactionRow {
            date: entry.date,
            particulars: entry.particulars,
            carried_forward: entry.carried_forward,
            debit: entry.debit,
            credit: entry.credit,
            balance: Amount::ZERO,
            kind: TxType::None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transaction::Direction;
    use chrono::NaiveDate;

    fn raw(debit: &str, credit: &str) -> RawRow {
        RawRow {
            date: Some("2024-01-01".to_string()),
            particulars: "row".to_string(),
            carried_forward: None,
            debit: Some(debit.to_string()),
            credit: Some(credit.to_string()),
        }
    }

    fn manual(direction: Direction, amount: i64) -> ManualEntry {
        ManualEntry {
            date: NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
            particulars: "Manual".to_string(),
            carried_forward: None,
            direction,
            amount: Amount::from(amount),
        }
    }

    #[test]
    fn test_default_opening_balance() {
        let ledger = LedgerState::default();
        assert_eq!(ledger.opening_balance().to_string(), "304205.00");
        assert!(ledger.is_empty());
        assert_eq!(ledger.current_balance(), ledger.opening_balance());
    }

    #[test]
    fn test_replace_rows_computes_balances() {
        let mut ledger = LedgerState::new(Amount::from(1000));
        ledger
            .replace_rows(&[raw("0", "500"), raw("200", "0"), raw("0", "0")])
            .unwrap();

        assert_eq!(ledger.len(), 3);
        assert_eq!(ledger.current_balance(), Amount::from(1300));
        assert_eq!(ledger.net_change(), Amount::from(300));
    }

    #[test]
    fn test_replace_rows_rejects_ambiguous_and_keeps_state() {
        let mut ledger = LedgerState::new(Amount::from(1000));
        ledger.replace_rows(&[raw("0", "500")]).unwrap();
        let before = ledger.clone();

        let err = ledger
            .replace_rows(&[raw("10", ""), raw("5", "5")])
            .unwrap_err();
        assert!(matches!(err, LedgerError::AmbiguousAmounts { row: 2 }));
        assert_eq!(ledger, before);
    }

    #[test]
    fn test_append_recomputes_from_top() {
        let mut ledger = LedgerState::new(Amount::from(100));
        ledger.append(manual(Direction::Credit, 50)).unwrap();
        ledger.append(manual(Direction::Debit, 30)).unwrap();

        let balances: Vec<Amount> = ledger.rows().iter().map(|r| r.balance).collect();
        assert_eq!(balances, [Amount::from(150), Amount::from(120)]);
        assert_eq!(ledger.rows()[1].kind, TxType::Debit);
    }

    #[test]
    fn test_append_invalid_entry_leaves_ledger_unchanged() {
        let mut ledger = LedgerState::new(Amount::from(100));
        ledger.append(manual(Direction::Credit, 50)).unwrap();

        let err = ledger.append(manual(Direction::Debit, 0)).unwrap_err();
        assert!(matches!(err, LedgerError::InvalidEntry { .. }));
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn test_push_ambiguous_entry_rejected() {
        let mut ledger = LedgerState::new(Amount::ZERO);
        let err = ledger.push_entry(raw("1", "1").normalize()).unwrap_err();
        assert!(matches!(err, LedgerError::AmbiguousAmounts { row: 1 }));
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_opening_balance_change_shifts_every_row() {
        let mut ledger = LedgerState::new(Amount::from(1000));
        ledger
            .replace_rows(&[raw("0", "500"), raw("200", "0"), raw("0", "0")])
            .unwrap();
        let before = ledger.rows().to_vec();

        ledger.set_opening_balance(Amount::from(2000));

        for (old, new) in before.iter().zip(ledger.rows()) {
            assert_eq!(new.balance - old.balance, Amount::from(1000));
            assert_eq!(new.kind, old.kind);
        }
    }

    #[test]
    fn test_clear_keeps_opening_balance() {
        let mut ledger = LedgerState::new(Amount::from(42));
        ledger.replace_rows(&[raw("", "8")]).unwrap();
        ledger.clear();

        assert!(ledger.is_empty());
        assert_eq!(ledger.current_balance(), Amount::from(42));
        assert!(ledger.net_change().is_zero());
    }

    #[test]
    fn test_summary() {
        let mut ledger = LedgerState::new(Amount::from(1000));
        ledger.replace_rows(&[raw("250", "")]).unwrap();

        let summary = ledger.summary();
        assert_eq!(summary.opening_balance, Amount::from(1000));
        assert_eq!(summary.current_balance, Amount::from(750));
        assert_eq!(summary.net_change, Amount::from(-250));
        assert_eq!(summary.transactions, 1);
    }
}
