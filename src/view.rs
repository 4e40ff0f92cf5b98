//! Review rendering.
//!
//! Formatting lives only here: values stay numeric in the ledger and are
//! turned into currency strings on the way out.

use crate::decimal::Amount;
use crate::error::Result;
use crate::export::HEADERS;
use crate::ledger::{LedgerState, LedgerSummary};
use crate::transaction::TransactionRow;
use serde::Serialize;
use std::io::Write;

pub const CURRENCY_SYMBOL: &str = "₹";

/// Formats an amount as `₹1,234.50`; zero renders as an empty string.
pub fn format_currency(amount: Amount) -> String {
    if amount.is_zero() {
        return String::new();
    }
    format!("{}{}", CURRENCY_SYMBOL, group_thousands(&amount.to_string()))
}

/// Like [`format_currency`] but zero is shown as `₹0.00`.
pub fn format_currency_always(amount: Amount) -> String {
    format!("{}{}", CURRENCY_SYMBOL, group_thousands(&amount.to_string()))
}

fn group_thousands(plain: &str) -> String {
    let (sign, digits) = match plain.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", plain),
    };
    let (int_part, frac_part) = digits.split_once('.').unwrap_or((digits, ""));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if frac_part.is_empty() {
        format!("{}{}", sign, grouped)
    } else {
        format!("{}{}.{}", sign, grouped, frac_part)
    }
}

#[derive(Debug, Serialize)]
struct ViewRecord {
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "Particulars")]
    particulars: String,
    #[serde(rename = "C/F")]
    carried_forward: String,
    #[serde(rename = "Dr Amount")]
    debit: String,
    #[serde(rename = "Cr Amount")]
    credit: String,
    #[serde(rename = "Balance")]
    balance: String,
    #[serde(rename = "Type")]
    kind: &'static str,
}

impl From<&TransactionRow> for ViewRecord {
    fn from(row: &TransactionRow) -> Self {
        ViewRecord {
            date: row
                .date
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
            particulars: row.particulars.clone(),
            carried_forward: row.carried_forward.clone().unwrap_or_default(),
            debit: format_currency(row.debit),
            credit: format_currency(row.credit),
            balance: format_currency(row.balance),
            kind: row.kind.label(),
        }
    }
}

/// Writes the annotated ledger as CSV for review, in ledger order.
pub fn write_view<W: Write>(ledger: &LedgerState, writer: W) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    if ledger.is_empty() {
        // serialize() only emits the header alongside the first record
        csv_writer.write_record(HEADERS)?;
    }

    for row in ledger.rows() {
        csv_writer.serialize(ViewRecord::from(row))?;
    }

    csv_writer.flush()?;
    Ok(())
}

/// Human-readable headline figures.
pub fn format_summary(summary: &LedgerSummary) -> String {
    format!(
        "Opening balance: {}\nCurrent balance: {}\nNet change: {}\nTransactions: {}",
        format_currency_always(summary.opening_balance),
        format_currency_always(summary.current_balance),
        format_currency_always(summary.net_change),
        summary.transactions
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transaction::RawRow;

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(Amount::ZERO), "");
        assert_eq!(format_currency(Amount::from(5)), "₹5.00");
        assert_eq!(format_currency(Amount::from(1000)), "₹1,000.00");
        assert_eq!(format_currency(Amount::coerce("304205")), "₹304,205.00");
        assert_eq!(format_currency(Amount::coerce("1234567.5")), "₹1,234,567.50");
        assert_eq!(format_currency(Amount::from(-2500)), "₹-2,500.00");
    }

    #[test]
    fn test_format_currency_always_shows_zero() {
        assert_eq!(format_currency_always(Amount::ZERO), "₹0.00");
    }

    #[test]
    fn test_write_view() {
        let mut ledger = LedgerState::new(Amount::from(1000));
        ledger
            .replace_rows(&[
                RawRow {
                    date: Some("2024-01-02".to_string()),
                    particulars: "Sales Revenue".to_string(),
                    carried_forward: None,
                    debit: None,
                    credit: Some("50000".to_string()),
                },
                RawRow {
                    date: None,
                    particulars: "Misc".to_string(),
                    carried_forward: Some("CF-1".to_string()),
                    debit: Some("x".to_string()),
                    credit: None,
                },
            ])
            .unwrap();

        let mut output = Vec::new();
        write_view(&ledger, &mut output).unwrap();
        let output = String::from_utf8(output).unwrap();
        let lines: Vec<&str> = output.lines().collect();

        assert_eq!(lines[0], "Date,Particulars,C/F,Dr Amount,Cr Amount,Balance,Type");
        assert_eq!(
            lines[1],
            "2024-01-02,Sales Revenue,,,\"₹50,000.00\",\"₹51,000.00\",Cr"
        );
        assert_eq!(lines[2], ",Misc,CF-1,,,\"₹51,000.00\",");
    }

    #[test]
    fn test_write_view_empty_ledger_has_header() {
        let ledger = LedgerState::new(Amount::ZERO);
        let mut output = Vec::new();
        write_view(&ledger, &mut output).unwrap();
        assert_eq!(
            String::from_utf8(output).unwrap().trim_end(),
            "Date,Particulars,C/F,Dr Amount,Cr Amount,Balance,Type"
        );
    }

    #[test]
    fn test_format_summary() {
        let ledger = LedgerState::new(Amount::from(1000));
        let text = format_summary(&ledger.summary());
        assert!(text.contains("Opening balance: ₹1,000.00"));
        assert!(text.contains("Net change: ₹0.00"));
        assert!(text.contains("Transactions: 0"));
    }
}
