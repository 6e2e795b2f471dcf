//! Pix Payload CLI
//!
//! Generates static payment codes from a CSV of requests, or checks a single
//! code the way a banking app would before paying it.
//!
//! # Usage
//!
//! ```bash
//! pix-payload requests.csv > codes.csv
//! pix-payload --verify '00020101021126...6304ABCD'
//! ```
//!
//! Input columns: `payee_key,amount,payee_name,payee_city,reference`.
//! `--verify` prints the decoded fields using the same columns.
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Set to `debug` or `warn` to control logging verbosity

use pix_payload::{decode, PaymentCodeBatch, PayloadError, Result};
use std::env;
use std::fs::File;
use std::io::{self, BufReader};
use std::process;

const USAGE: &str = "Usage: pix-payload <requests.csv>\n       pix-payload --verify <payload>";

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let args: Vec<String> = env::args().skip(1).collect();

    match args.as_slice() {
        [] => Err(PayloadError::MissingArgument),
        [flag, ..] if flag == "-h" || flag == "--help" => {
            println!("{}", USAGE);
            Ok(())
        }
        [flag, payload] if flag == "--verify" => verify(payload),
        [flag, ..] if flag == "--verify" => Err(PayloadError::MissingArgument),
        [input_path, ..] => generate(input_path),
    }
}

fn generate(input_path: &str) -> Result<()> {
    let file = File::open(input_path)?;
    let reader = BufReader::new(file);

    let mut batch = PaymentCodeBatch::new();
    batch.process_csv(reader)?;

    let stdout = io::stdout();
    let handle = stdout.lock();
    batch.write_output(handle)?;

    Ok(())
}

fn verify(payload: &str) -> Result<()> {
    let decoded = decode(payload.trim())?;
    let amount = decoded.amount.map(|a| a.to_string()).unwrap_or_default();

    let stdout = io::stdout();
    let mut csv_writer = csv::Writer::from_writer(stdout.lock());
    csv_writer.write_record(["payee_key", "amount", "payee_name", "payee_city", "reference"])?;
    csv_writer.write_record([
        decoded.payee_key.as_str(),
        amount.as_str(),
        decoded.payee_name.as_str(),
        decoded.payee_city.as_str(),
        decoded.reference.as_deref().unwrap_or(""),
    ])?;
    csv_writer.flush()?;

    Ok(())
}
