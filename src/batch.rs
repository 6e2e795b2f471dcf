//! Batch payment code generation from CSV.
//!
//! Reads request rows in streaming fashion, builds one code per valid row
//! and writes the codes back out in input order.

use crate::amount::Amount;
use crate::error::{PayloadError, Result};
use crate::payload::{build_payment_code, PaymentCodeRequest};
use csv::{ReaderBuilder, Trim};
use log::{debug, warn};
use serde::Deserialize;
use std::io::{Read, Write};
use std::str::FromStr;

/// Raw request row as read from CSV.
///
/// Columns: `payee_key,amount,payee_name,payee_city,reference`. Everything
/// but the key may be empty or missing.
#[derive(Debug, Deserialize)]
pub struct PaymentRecord {
    pub payee_key: String,

    #[serde(default)]
    pub amount: Option<String>,

    #[serde(default)]
    pub payee_name: String,

    #[serde(default)]
    pub payee_city: String,

    #[serde(default)]
    pub reference: String,
}

impl PaymentRecord {
    /// Converts the row into a request, coercing a missing or unparseable
    /// amount to zero.
    pub fn into_request(self, row: usize) -> PaymentCodeRequest {
        let amount = match self.amount.as_deref().map(str::trim) {
            None | Some("") => Amount::ZERO,
            Some(raw) => Amount::from_str(raw).unwrap_or_else(|e| {
                warn!("Row {}: Invalid amount {:?} ({}), using 0.00", row, raw, e);
                Amount::ZERO
            }),
        };

        PaymentCodeRequest {
            payee_key: self.payee_key,
            amount,
            payee_name: self.payee_name,
            payee_city: self.payee_city,
            reference: self.reference,
        }
    }
}

/// A generated payment code with the values it charges.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedCode {
    pub reference: String,
    pub amount: Amount,
    pub payload: String,
}

/// Accumulates generated codes across one or more CSV inputs.
pub struct PaymentCodeBatch {
    codes: Vec<IssuedCode>,
}

impl PaymentCodeBatch {
    /// Creates an empty batch.
    pub fn new() -> Self {
        PaymentCodeBatch { codes: Vec::new() }
    }

    /// Processes requests from a CSV reader.
    ///
    /// Rows that fail to parse or break the request contract are logged at
    /// warn level and skipped.
    pub fn process_csv<R: Read>(&mut self, reader: R) -> Result<()> {
        let mut csv_reader = ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .from_reader(reader);
        let headers = csv_reader.headers()?.clone();

        for (row_idx, result) in csv_reader.records().enumerate() {
            let row_num = row_idx + 2; // 1-indexed, accounting for header row

            let mut raw = match result {
                Ok(raw) => raw,
                Err(e) => {
                    warn!("Row {}: CSV parse error: {}", row_num, e);
                    continue;
                }
            };

            // Rows may stop after the key; missing trailing columns read as empty.
            while raw.len() < headers.len() {
                raw.push_field("");
            }

            match raw.deserialize::<PaymentRecord>(Some(&headers)) {
                Ok(record) => {
                    if let Err(e) = self.process_record(record, row_num) {
                        warn!("{}", e);
                    }
                }
                Err(e) => {
                    warn!("Row {}: CSV parse error: {}", row_num, e);
                }
            }
        }

        Ok(())
    }

    fn process_record(&mut self, record: PaymentRecord, row: usize) -> Result<()> {
        let request = record.into_request(row);
        request
            .validate()
            .map_err(|e| PayloadError::InvalidRecord {
                row,
                message: e.to_string(),
            })?;

        let payload = build_payment_code(&request);
        debug!("Row {}: Issued code for {}", row, request.reference);

        self.codes.push(IssuedCode {
            reference: request.reference,
            amount: request.amount,
            payload,
        });
        Ok(())
    }

    /// Codes generated so far, in input order.
    pub fn codes(&self) -> &[IssuedCode] {
        &self.codes
    }

    /// Writes `reference,amount,payload` rows to CSV.
    pub fn write_output<W: Write>(&self, writer: W) -> Result<()> {
        let mut csv_writer = csv::Writer::from_writer(writer);

        csv_writer.write_record(["reference", "amount", "payload"])?;

        for code in &self.codes {
            csv_writer.write_record([
                code.reference.as_str(),
                code.amount.to_string().as_str(),
                code.payload.as_str(),
            ])?;
        }

        csv_writer.flush()?;
        Ok(())
    }
}

impl Default for PaymentCodeBatch {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::decode;
    use std::io::Cursor;

    fn process_csv_str(csv: &str) -> PaymentCodeBatch {
        let mut batch = PaymentCodeBatch::new();
        batch.process_csv(Cursor::new(csv)).unwrap();
        batch
    }

    #[test]
    fn test_single_row() {
        let csv = r#"payee_key,amount,payee_name,payee_city,reference
11999998888,42.5,João Ação Ltda,São Paulo,CARD123"#;

        let batch = process_csv_str(csv);
        assert_eq!(batch.codes().len(), 1);
        assert!(batch.codes()[0].payload.ends_with("63048B06"));
        assert_eq!(batch.codes()[0].amount.to_string(), "42.50");
    }

    #[test]
    fn test_preserves_input_order() {
        let csv = r#"payee_key,amount,payee_name,payee_city,reference
k1,3,A,X,CARD3
k2,1,B,Y,CARD1
k3,2,C,Z,CARD2"#;

        let batch = process_csv_str(csv);
        let refs: Vec<_> = batch.codes().iter().map(|c| c.reference.as_str()).collect();
        assert_eq!(refs, ["CARD3", "CARD1", "CARD2"]);
    }

    #[test]
    fn test_missing_and_invalid_amounts_become_zero() {
        let csv = r#"payee_key,amount,payee_name,payee_city,reference
k1,,A,X,CARD1
k2,abc,B,Y,CARD2
k3,-10,C,Z,CARD3"#;

        let batch = process_csv_str(csv);
        assert_eq!(batch.codes().len(), 3);
        for code in batch.codes() {
            assert_eq!(code.amount, Amount::ZERO);
            assert!(code.payload.contains("54040.00"));
        }
    }

    #[test]
    fn test_rows_without_key_are_skipped() {
        let csv = r#"payee_key,amount,payee_name,payee_city,reference
,10,A,X,CARD1
k2,20,B,Y,CARD2"#;

        let batch = process_csv_str(csv);
        assert_eq!(batch.codes().len(), 1);
        assert_eq!(batch.codes()[0].reference, "CARD2");
    }

    #[test]
    fn test_short_rows_use_fallbacks() {
        let csv = "payee_key,amount,payee_name,payee_city,reference\nk1,5\n";

        let batch = process_csv_str(csv);
        assert_eq!(batch.codes().len(), 1);
        let decoded = decode(&batch.codes()[0].payload).unwrap();
        assert_eq!(decoded.payee_name, "PAGAMENTO");
        assert_eq!(decoded.payee_city, "BRASIL");
        assert_eq!(decoded.reference.as_deref(), Some("***"));
        assert_eq!(decoded.amount.unwrap().to_string(), "5.00");
    }

    #[test]
    fn test_key_only_row_is_issued() {
        let csv = "payee_key,amount,payee_name,payee_city,reference\nk1\nk2,1,Loja\n";

        let batch = process_csv_str(csv);
        assert_eq!(batch.codes().len(), 2);
        assert_eq!(batch.codes()[0].amount, Amount::ZERO);
        assert!(batch.codes()[0].payload.ends_with("62070503***630472EA"));
        assert!(batch.codes()[1].payload.contains("5904Loja6006BRASIL"));
    }

    #[test]
    fn test_whitespace_handling() {
        let csv = r#"payee_key, amount, payee_name, payee_city, reference
 k1 , 7.5 , Loja , Rio , CARD9 "#;

        let batch = process_csv_str(csv);
        let decoded = decode(&batch.codes()[0].payload).unwrap();
        assert_eq!(decoded.payee_key, "k1");
        assert_eq!(decoded.amount.unwrap().to_string(), "7.50");
        assert_eq!(decoded.reference.as_deref(), Some("CARD9"));
    }

    #[test]
    fn test_output_format() {
        let csv = r#"payee_key,amount,payee_name,payee_city,reference
pix@example.com,12,Carlão BT Online,PORTO ALEGRE,CARD42"#;

        let batch = process_csv_str(csv);
        let mut output = Vec::new();
        batch.write_output(&mut output).unwrap();

        let output_str = String::from_utf8(output).unwrap();
        assert!(output_str.starts_with("reference,amount,payload\n"));
        assert!(output_str.contains(
            "CARD42,12.00,00020101021126370014br.gov.bcb.pix0115pix@example.com\
             520400005303986540512.005802BR5916Carlao BT Online6012PORTO ALEGRE\
             62100506CARD426304355E"
        ));
    }
}
