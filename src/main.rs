//! Ledger Engine CLI
//!
//! Reads a CSV source table, computes running balances, prints the review
//! view to stdout and writes the ledger as an xlsx file.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- transactions.csv ledger.xlsx --opening-balance 1000
//! ```
//!
//! Column mapping (header names): `--date-col`, `--particulars-col`,
//! `--dr-col`, `--cr-col`, `--cf-col`.
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Set to `debug` or `warn` to control logging verbosity
//! - `LEDGER_OPENING_BALANCE`: Opening balance when the flag is not given

use ledger_engine::view::format_summary;
use ledger_engine::{
    export_filename, export_ledger, read_csv, write_view, Amount, ColumnMapping, LedgerError,
    LedgerState, Result, DEFAULT_OPENING_BALANCE,
};
use log::info;
use std::env;
use std::fs::{self, File};
use std::io::{self, BufReader};
use std::process;
use std::str::FromStr;

const OPENING_BALANCE_ENV: &str = "LEDGER_OPENING_BALANCE";

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

#[derive(Debug)]
struct Config {
    input: String,
    output: Option<String>,
    opening_balance: Option<String>,
    mapping: ColumnMapping,
}

fn parse_args(args: &[String]) -> Result<Config> {
    let mut positional = Vec::new();
    let mut opening_balance = None;
    let mut mapping = ColumnMapping::default();

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        let slot = match arg.as_str() {
            "--opening-balance" => &mut opening_balance,
            "--date-col" => &mut mapping.date,
            "--particulars-col" => &mut mapping.particulars,
            "--dr-col" => &mut mapping.debit,
            "--cr-col" => &mut mapping.credit,
            "--cf-col" => &mut mapping.carried_forward,
            _ => {
                positional.push(arg.clone());
                continue;
            }
        };
        let value = iter
            .next()
            .ok_or_else(|| LedgerError::MissingFlagValue(arg.clone()))?;
        *slot = Some(value.clone());
    }

    let mut positional = positional.into_iter();
    let input = positional.next().ok_or(LedgerError::MissingArgument)?;

    Ok(Config {
        input,
        output: positional.next(),
        opening_balance,
        mapping,
    })
}

/// Flag first, then environment, then the built-in default.
fn resolve_opening_balance(flag: Option<String>) -> Result<Amount> {
    match flag.or_else(|| env::var(OPENING_BALANCE_ENV).ok()) {
        Some(raw) => Amount::from_str(&raw).map_err(|_| LedgerError::InvalidOpeningBalance(raw)),
        None => Ok(Amount::from(DEFAULT_OPENING_BALANCE)),
    }
}

fn run() -> Result<()> {
    let args: Vec<String> = env::args().skip(1).collect();
    let config = parse_args(&args)?;
    let opening_balance = resolve_opening_balance(config.opening_balance)?;

    let file = File::open(&config.input)?;
    let rows = read_csv(BufReader::new(file), &config.mapping)?;

    let mut ledger = LedgerState::new(opening_balance);
    ledger.replace_rows(&rows)?;

    let stdout = io::stdout();
    let handle = stdout.lock();
    write_view(&ledger, handle)?;

    let output = config
        .output
        .unwrap_or_else(|| export_filename(chrono::Local::now().naive_local()));
    let bytes = export_ledger(ledger.rows(), ledger.opening_balance())?;
    fs::write(&output, bytes)?;
    info!("Wrote {}", output);

    eprintln!("{}", format_summary(&ledger.summary()));
    eprintln!("Saved ledger to {}", output);

    Ok(())
}
