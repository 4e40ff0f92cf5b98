//! Source-table reader.
//!
//! Reads a CSV table and maps its columns onto [`RawRow`] fields. Cell
//! contents are passed through untouched; coercion happens in the engine.

use crate::error::{LedgerError, Result};
use crate::transaction::RawRow;
use csv::{ReaderBuilder, StringRecord, Trim};
use log::{debug, info};
use std::io::Read;

/// Which source column feeds which ledger field, by header name.
///
/// Unset fields fall back to position: date 0, particulars 1, Dr 2, Cr 3.
/// The C/F column is only read when named.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnMapping {
    pub date: Option<String>,
    pub particulars: Option<String>,
    pub debit: Option<String>,
    pub credit: Option<String>,
    pub carried_forward: Option<String>,
}

/// Column indices resolved against a concrete header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ResolvedColumns {
    date: usize,
    particulars: usize,
    debit: usize,
    credit: usize,
    carried_forward: Option<usize>,
}

impl ColumnMapping {
    fn resolve(&self, headers: &StringRecord) -> Result<ResolvedColumns> {
        let required = [&self.date, &self.particulars, &self.debit, &self.credit]
            .iter()
            .enumerate()
            .filter(|(_, name)| name.is_none())
            .map(|(pos, _)| pos + 1)
            .max()
            .unwrap_or(0);
        if headers.len() < required {
            return Err(LedgerError::TooFewColumns {
                found: headers.len(),
                required,
            });
        }

        let lookup = |name: &Option<String>, fallback: usize| -> Result<usize> {
            match name {
                Some(name) => find_column(headers, name),
                None => Ok(fallback),
            }
        };

        Ok(ResolvedColumns {
            date: lookup(&self.date, 0)?,
            particulars: lookup(&self.particulars, 1)?,
            debit: lookup(&self.debit, 2)?,
            credit: lookup(&self.credit, 3)?,
            carried_forward: self
                .carried_forward
                .as_ref()
                .map(|name| find_column(headers, name))
                .transpose()?,
        })
    }
}

fn find_column(headers: &StringRecord, name: &str) -> Result<usize> {
    headers
        .iter()
        .position(|h| h.eq_ignore_ascii_case(name.trim()))
        .ok_or_else(|| LedgerError::MissingColumn {
            name: name.to_string(),
        })
}

/// Reads every row of a CSV source table.
///
/// Fails as a whole on unreadable input or a mapping that does not fit the
/// header; individual short rows are kept with their missing cells blank.
pub fn read_csv<R: Read>(reader: R, mapping: &ColumnMapping) -> Result<Vec<RawRow>> {
    let mut csv_reader = ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    let columns = mapping.resolve(&headers)?;

    let mut rows = Vec::new();
    for (row_idx, result) in csv_reader.records().enumerate() {
        let row_num = row_idx + 2; // 1-indexed, accounting for header row
        let record = result?;

        if record.iter().all(str::is_empty) {
            debug!("Row {}: all cells blank, kept as a zero row", row_num);
        }

        rows.push(to_raw_row(&record, &columns));
    }

    info!("Read {} rows from source table", rows.len());
    Ok(rows)
}

fn to_raw_row(record: &StringRecord, columns: &ResolvedColumns) -> RawRow {
    let cell = |idx: usize| record.get(idx).filter(|v| !v.is_empty()).map(str::to_string);

    RawRow {
        date: cell(columns.date),
        particulars: cell(columns.particulars).unwrap_or_default(),
        carried_forward: columns.carried_forward.and_then(cell),
        debit: cell(columns.debit),
        credit: cell(columns.credit),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_positional_mapping() {
        let csv = "Date,Particulars,Dr Amount,Cr Amount\n2024-01-02,Sales Revenue,0,50000\n";
        let rows = read_csv(Cursor::new(csv), &ColumnMapping::default()).unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].date.as_deref(), Some("2024-01-02"));
        assert_eq!(rows[0].particulars, "Sales Revenue");
        assert_eq!(rows[0].debit.as_deref(), Some("0"));
        assert_eq!(rows[0].credit.as_deref(), Some("50000"));
        assert_eq!(rows[0].carried_forward, None);
    }

    #[test]
    fn test_named_mapping_with_carried_forward() {
        let csv = "ref,when,what,out,in\nCF-1,2024-01-03,Office Rent,25000,\n";
        let mapping = ColumnMapping {
            date: Some("When".to_string()),
            particulars: Some("what".to_string()),
            debit: Some("out".to_string()),
            credit: Some("in".to_string()),
            carried_forward: Some("ref".to_string()),
        };

        let rows = read_csv(Cursor::new(csv), &mapping).unwrap();
        assert_eq!(rows[0].particulars, "Office Rent");
        assert_eq!(rows[0].debit.as_deref(), Some("25000"));
        assert_eq!(rows[0].credit, None);
        assert_eq!(rows[0].carried_forward.as_deref(), Some("CF-1"));
    }

    #[test]
    fn test_missing_named_column() {
        let csv = "a,b,c,d\n1,2,3,4\n";
        let mapping = ColumnMapping {
            carried_forward: Some("C/F".to_string()),
            ..ColumnMapping::default()
        };

        let err = read_csv(Cursor::new(csv), &mapping).unwrap_err();
        assert!(matches!(err, LedgerError::MissingColumn { ref name } if name == "C/F"));
    }

    #[test]
    fn test_too_few_columns_for_positional_mapping() {
        let csv = "Date,Particulars\n2024-01-01,x\n";
        let err = read_csv(Cursor::new(csv), &ColumnMapping::default()).unwrap_err();
        assert!(matches!(
            err,
            LedgerError::TooFewColumns {
                found: 2,
                required: 4
            }
        ));
    }

    #[test]
    fn test_short_rows_and_blank_records() {
        let csv = "Date,Particulars,Dr,Cr\n2024-01-01,Only particulars\n,,,\n\n2024-01-02,Next,5,\n";
        let rows = read_csv(Cursor::new(csv), &ColumnMapping::default()).unwrap();

        // The empty line is dropped by the reader; the `,,,` record is kept.
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].debit, None);
        assert_eq!(rows[0].credit, None);
        assert_eq!(rows[1].date, None);
        assert_eq!(rows[1].particulars, "");
        assert_eq!(rows[1].debit, None);
        assert_eq!(rows[2].debit.as_deref(), Some("5"));
    }

    #[test]
    fn test_whitespace_trimmed() {
        let csv = "Date, Particulars, Dr, Cr\n 2024-01-01 , Fees , 12.5 , \n";
        let rows = read_csv(Cursor::new(csv), &ColumnMapping::default()).unwrap();
        assert_eq!(rows[0].particulars, "Fees");
        assert_eq!(rows[0].debit.as_deref(), Some("12.5"));
    }
}
