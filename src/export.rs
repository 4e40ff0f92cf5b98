//! Ledger exporter.
//!
//! Rendering is split in two: [`LedgerSheet`] lays out every cell and
//! column width as plain data, and [`LedgerSheet::to_xlsx`] encodes that
//! layout with `rust_xlsxwriter`. The exporter never recomputes balances.
//!
//! A worksheet holds at most [`EXCEL_MAX_ROWS`] rows, so a ledger can carry
//! at most `EXCEL_MAX_ROWS - 2` transactions once the header and the
//! opening-balance marker are counted.

use crate::decimal::Amount;
use crate::error::{LedgerError, Result};
use crate::transaction::TransactionRow;
use chrono::{Datelike, NaiveDate, NaiveDateTime};
use log::{debug, info, warn};
use rust_xlsxwriter::{
    Color, ExcelDateTime, Format, FormatAlign, FormatPattern, Workbook, Worksheet,
};

/// MIME type of the exported document.
pub const XLSX_MIME_TYPE: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Header row, in column order.
pub const HEADERS: [&str; COLUMN_COUNT] = [
    "Date",
    "Particulars",
    "C/F",
    "Dr Amount",
    "Cr Amount",
    "Balance",
    "Type",
];

pub const COLUMN_COUNT: usize = 7;

/// Upper bound on an auto-sized column.
pub const MAX_COLUMN_WIDTH: usize = 50;

/// Rows available in a single worksheet.
pub const EXCEL_MAX_ROWS: usize = 1_048_576;

pub const SHEET_NAME: &str = "Ledger";
pub const OPENING_LABEL: &str = "Opening Balance";
pub const OPENING_TAG: &str = "Opening";

const COL_DATE: usize = 0;
const COL_PARTICULARS: usize = 1;
const COL_CF: usize = 2;
const COL_DEBIT: usize = 3;
const COL_CREDIT: usize = 4;
const COL_BALANCE: usize = 5;
const COL_TYPE: usize = 6;

/// Header fill colour (light grey).
const HEADER_FILL: u32 = 0xD3D3D3;

/// A single written cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellValue {
    Text(String),
    Number(Amount),
    Date(NaiveDate),
}

impl CellValue {
    /// Text used to size the column this cell sits in.
    pub fn display_text(&self) -> String {
        match self {
            CellValue::Text(s) => s.clone(),
            CellValue::Number(a) => a.to_string(),
            // Measured as a midnight timestamp, the way the cell is stored.
            CellValue::Date(d) => d.format("%Y-%m-%d 00:00:00").to_string(),
        }
    }
}

/// One sheet row; `None` means the cell is left blank.
pub type SheetRow = [Option<CellValue>; COLUMN_COUNT];

/// Cell-level layout of an exported ledger.
///
/// Row 0 is the header, row 1 the opening-balance marker, then one row
/// per transaction in ledger order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerSheet {
    rows: Vec<SheetRow>,
}

impl LedgerSheet {
    pub fn build(rows: &[TransactionRow], opening_balance: Amount) -> Self {
        let mut sheet_rows = Vec::with_capacity(rows.len() + 2);
        sheet_rows.push(header_row());
        sheet_rows.push(opening_row(opening_balance));
        sheet_rows.extend(rows.iter().map(data_row));
        LedgerSheet { rows: sheet_rows }
    }

    pub fn rows(&self) -> &[SheetRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&CellValue> {
        self.rows.get(row)?.get(col)?.as_ref()
    }

    /// `min(longest cell text + 2, 50)` per column, header included.
    pub fn column_widths(&self) -> [usize; COLUMN_COUNT] {
        let mut widths = [0usize; COLUMN_COUNT];
        for row in &self.rows {
            for (col, cell) in row.iter().enumerate() {
                if let Some(cell) = cell {
                    widths[col] = widths[col].max(cell.display_text().chars().count());
                }
            }
        }
        widths.map(|w| (w + 2).min(MAX_COLUMN_WIDTH))
    }

    /// Encodes the sheet as an xlsx document.
    ///
    /// Fails with [`LedgerError::TooManyRows`] past [`EXCEL_MAX_ROWS`].
    pub fn to_xlsx(&self) -> Result<Vec<u8>> {
        check_row_limit(self.rows.len())?;

        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(SHEET_NAME)?;

        let formats = SheetFormats::new();
        for (row_idx, row) in self.rows.iter().enumerate() {
            let sheet_row = u32::try_from(row_idx).map_err(|_| LedgerError::TooManyRows {
                rows: self.rows.len(),
                max: EXCEL_MAX_ROWS,
            })?;
            for (col, cell) in (0u16..).zip(row.iter()) {
                if let Some(cell) = cell {
                    write_cell(worksheet, sheet_row, col, cell, &formats)?;
                }
            }
        }

        for (col, width) in (0u16..).zip(self.column_widths()) {
            worksheet.set_column_width(col, width as f64)?;
        }

        let bytes = workbook.save_to_buffer()?;
        debug!("Encoded {} sheet rows into {} bytes", self.rows.len(), bytes.len());
        Ok(bytes)
    }
}

/// Renders annotated rows and the opening balance to xlsx bytes.
///
/// An empty ledger still yields the header and opening-balance rows. The
/// only failure for well-formed rows is a ledger too long for one worksheet.
pub fn export_ledger(rows: &[TransactionRow], opening_balance: Amount) -> Result<Vec<u8>> {
    let sheet = LedgerSheet::build(rows, opening_balance);
    let bytes = sheet.to_xlsx()?;
    info!("Exported {} transactions", rows.len());
    Ok(bytes)
}

/// Download name for an export generated at `generated_at`.
pub fn export_filename(generated_at: NaiveDateTime) -> String {
    format!("ledger_{}.xlsx", generated_at.format("%Y%m%d_%H%M%S"))
}

fn check_row_limit(sheet_rows: usize) -> Result<()> {
    if sheet_rows > EXCEL_MAX_ROWS {
        return Err(LedgerError::TooManyRows {
            rows: sheet_rows,
            max: EXCEL_MAX_ROWS,
        });
    }
    Ok(())
}

fn header_row() -> SheetRow {
    HEADERS.map(|h| Some(CellValue::Text(h.to_string())))
}

fn opening_row(opening_balance: Amount) -> SheetRow {
    let mut row = SheetRow::default();
    row[COL_DATE] = Some(CellValue::Text(OPENING_LABEL.to_string()));
    row[COL_PARTICULARS] = Some(CellValue::Text(OPENING_LABEL.to_string()));
    row[COL_BALANCE] = Some(CellValue::Number(opening_balance));
    row[COL_TYPE] = Some(CellValue::Text(OPENING_TAG.to_string()));
    row
}

fn data_row(tx: &TransactionRow) -> SheetRow {
    let mut row = SheetRow::default();
    row[COL_DATE] = tx.date.map(CellValue::Date);
    row[COL_PARTICULARS] = Some(CellValue::Text(tx.particulars.clone()));
    row[COL_CF] = tx.carried_forward.clone().map(CellValue::Text);
    if tx.debit.is_positive() {
        row[COL_DEBIT] = Some(CellValue::Number(tx.debit));
    }
    if tx.credit.is_positive() {
        row[COL_CREDIT] = Some(CellValue::Number(tx.credit));
    }
    row[COL_BALANCE] = Some(CellValue::Number(tx.balance));
    row[COL_TYPE] = Some(CellValue::Text(tx.kind.label().to_string()));
    row
}

struct SheetFormats {
    header: Format,
    blank: Format,
    money: Format,
    date: Format,
}

impl SheetFormats {
    fn new() -> Self {
        SheetFormats {
            header: Format::new()
                .set_bold()
                .set_pattern(FormatPattern::Solid)
                .set_background_color(Color::RGB(HEADER_FILL)),
            // A blank cell is only stored when it carries a format.
            blank: Format::new().set_align(FormatAlign::Left),
            money: Format::new().set_num_format("#,##0.00"),
            date: Format::new().set_num_format("yyyy-mm-dd"),
        }
    }
}

fn write_cell(
    worksheet: &mut Worksheet,
    row: u32,
    col: u16,
    cell: &CellValue,
    formats: &SheetFormats,
) -> Result<()> {
    match cell {
        CellValue::Text(text) if row == 0 => {
            worksheet.write_string_with_format(row, col, text.as_str(), &formats.header)?;
        }
        CellValue::Text(text) if text.is_empty() => {
            worksheet.write_blank(row, col, &formats.blank)?;
        }
        CellValue::Text(text) => {
            worksheet.write_string(row, col, text.as_str())?;
        }
        CellValue::Number(amount) => {
            worksheet.write_number_with_format(row, col, amount.to_f64(), &formats.money)?;
        }
        CellValue::Date(date) => match excel_date(*date) {
            Some(datetime) => {
                worksheet.write_with_format(row, col, &datetime, &formats.date)?;
            }
            None => {
                warn!("Date {} outside Excel range, written as text", date);
                worksheet.write_string(row, col, date.format("%Y-%m-%d").to_string().as_str())?;
            }
        },
    }

    Ok(())
}

fn excel_date(date: NaiveDate) -> Option<ExcelDateTime> {
    let year = u16::try_from(date.year()).ok()?;
    ExcelDateTime::from_ymd(year, date.month() as u8, date.day() as u8).ok()
}
