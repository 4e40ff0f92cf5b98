//! Balance engine.
//!
//! A single left fold over the entries in insertion order. Each row records
//! the balance *after* it is applied. The order is never changed: a ledger is
//! accumulated in the order its rows were recorded, not by date.

use crate::decimal::Amount;
use crate::ledger::LedgerState;
use crate::transaction::{Entry, RawRow, TransactionRow, TxType};
use log::debug;

/// Coerces raw rows and annotates them with running balances.
///
/// Total over its input: malformed amounts count as zero and unparseable
/// dates are kept as missing.
pub fn compute_balances(rows: &[RawRow], opening_balance: Amount) -> Vec<TransactionRow> {
    let entries: Vec<Entry> = rows.iter().map(RawRow::normalize).collect();
    annotate(&entries, opening_balance)
}

/// Folds normalized entries into annotated rows.
///
/// A row with both amounts positive is treated as a debit. Callers that
/// need to reject such rows should check with [`find_ambiguous_row`] first.
pub fn annotate(entries: &[Entry], opening_balance: Amount) -> Vec<TransactionRow> {
    let mut current = opening_balance;

    entries
        .iter()
        .enumerate()
        .map(|(idx, entry)| {
            let kind = if entry.debit.is_positive() {
                current -= entry.debit;
                TxType::Debit
            } else if entry.credit.is_positive() {
                current += entry.credit;
                TxType::Credit
            } else {
                TxType::None
            };

            debug!("Row {}: {:?} -> balance {}", idx + 1, kind, current);

            TransactionRow {
                date: entry.date,
                particulars: entry.particulars.clone(),
                carried_forward: entry.carried_forward.clone(),
                debit: entry.debit,
                credit: entry.credit,
                balance: current,
                kind,
            }
        })
        .collect()
}

/// Re-derives every row's balance and type from the top of the ledger.
pub fn recompute(state: LedgerState) -> LedgerState {
    let (opening_balance, rows) = state.into_parts();
    let entries: Vec<Entry> = rows.iter().map(TransactionRow::to_entry).collect();
    let rows = annotate(&entries, opening_balance);
    LedgerState::from_parts(opening_balance, rows)
}

/// Index of the first entry carrying both a debit and a credit, if any.
pub fn find_ambiguous_row(entries: &[Entry]) -> Option<usize> {
    entries.iter().position(Entry::is_ambiguous)
}
