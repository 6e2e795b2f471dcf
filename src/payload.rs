//! Static Pix payment code assembly.
//!
//! Produces the EMV-style BR Code string for a fixed-amount, reusable code:
//!
//! ```text
//! 00 02 01                                  payload format indicator
//! 01 02 11                                  static point of initiation
//! 26 LL [00 14 br.gov.bcb.pix][01 LL key]   payee account information
//! 52 04 0000                                merchant category code
//! 53 03 986                                 currency (BRL)
//! 54 LL <amount>                            transaction amount
//! 58 02 BR                                  country code
//! 59 LL <name>                              merchant name
//! 60 LL <city>                              merchant city
//! 62 LL [05 LL <reference>]                 additional data
//! 63 04 <crc>                               checksum
//! ```
//!
//! Field order is part of the wire contract.

use crate::amount::Amount;
use crate::crc::crc16;
use crate::error::{PayloadError, Result};
use crate::sanitize::{sanitize_city, sanitize_name};
use crate::tlv::{tlv, value_len};
use log::{debug, warn};

pub const TAG_FORMAT_INDICATOR: &str = "00";
pub const TAG_INITIATION_METHOD: &str = "01";
pub const TAG_MERCHANT_ACCOUNT: &str = "26";
pub const TAG_CATEGORY_CODE: &str = "52";
pub const TAG_CURRENCY: &str = "53";
pub const TAG_AMOUNT: &str = "54";
pub const TAG_COUNTRY: &str = "58";
pub const TAG_MERCHANT_NAME: &str = "59";
pub const TAG_MERCHANT_CITY: &str = "60";
pub const TAG_ADDITIONAL_DATA: &str = "62";
pub const TAG_CRC: &str = "63";

/// Sub-tags of the payee account and additional data groups.
pub const SUBTAG_GUI: &str = "00";
pub const SUBTAG_KEY: &str = "01";
pub const SUBTAG_REFERENCE: &str = "05";

pub const FORMAT_INDICATOR: &str = "01";
/// Static, reusable code.
pub const INITIATION_STATIC: &str = "11";
pub const PIX_GUI: &str = "br.gov.bcb.pix";
pub const CATEGORY_CODE: &str = "0000";
/// ISO 4217 numeric code for the Brazilian Real.
pub const CURRENCY_BRL: &str = "986";
pub const COUNTRY_CODE: &str = "BR";

/// Checksum tag with its fixed declared length, written before the value.
pub const CRC_PREFIX: &str = "6304";

/// Longest payee key that keeps the tag 26 group within 99 characters.
pub const MAX_PAYEE_KEY_LEN: usize = 77;

/// Longest transaction reference kept in the additional data group.
pub const MAX_REFERENCE_LEN: usize = 25;

/// Substituted for an empty reference.
pub const DEFAULT_REFERENCE: &str = "***";

/// Input record for a payment code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentCodeRequest {
    /// Pix key (email, phone, CPF/CNPJ or random key), embedded verbatim.
    pub payee_key: String,

    /// Amount to pay; negatives were already clamped to zero.
    pub amount: Amount,

    /// Free-text merchant name, sanitized on assembly.
    pub payee_name: String,

    /// Free-text merchant city, sanitized on assembly.
    pub payee_city: String,

    /// Transaction reference, truncated to 25 characters on assembly.
    pub reference: String,
}

impl PaymentCodeRequest {
    /// Creates a request from a floating point amount.
    pub fn new(
        payee_key: impl Into<String>,
        amount: f64,
        payee_name: impl Into<String>,
        payee_city: impl Into<String>,
        reference: impl Into<String>,
    ) -> Self {
        PaymentCodeRequest {
            payee_key: payee_key.into(),
            amount: Amount::from_f64(amount),
            payee_name: payee_name.into(),
            payee_city: payee_city.into(),
            reference: reference.into(),
        }
    }

    /// Checks the caller contract the encoder itself does not enforce.
    ///
    /// The key must be non-empty ASCII of at most 77 characters and the
    /// reference must be ASCII. [`build_payment_code`] accepts requests that
    /// fail this check and still produces a structurally valid payload.
    pub fn validate(&self) -> Result<()> {
        if self.payee_key.is_empty() {
            return Err(PayloadError::MissingField("payee key"));
        }
        if !self.payee_key.is_ascii() || self.payee_key.len() > MAX_PAYEE_KEY_LEN {
            return Err(PayloadError::UnexpectedValue {
                tag: TAG_MERCHANT_ACCOUNT,
                value: self.payee_key.clone(),
            });
        }
        if !self.reference.is_ascii() {
            return Err(PayloadError::UnexpectedValue {
                tag: TAG_ADDITIONAL_DATA,
                value: self.reference.clone(),
            });
        }
        Ok(())
    }
}

/// Truncates `value` to at most `max` UTF-16 code units on a char boundary.
fn truncate_units(value: &str, max: usize) -> &str {
    let mut units = 0;
    for (idx, c) in value.char_indices() {
        units += c.len_utf16();
        if units > max {
            return &value[..idx];
        }
    }
    value
}

fn merchant_account(payee_key: &str) -> String {
    let key = truncate_units(payee_key, MAX_PAYEE_KEY_LEN);
    if key.len() < payee_key.len() {
        warn!(
            "Payee key is {} characters long, truncating to {}",
            value_len(payee_key),
            MAX_PAYEE_KEY_LEN
        );
    }
    tlv(
        TAG_MERCHANT_ACCOUNT,
        &(tlv(SUBTAG_GUI, PIX_GUI) + &tlv(SUBTAG_KEY, key)),
    )
}

fn additional_data(reference: &str) -> String {
    let reference = if reference.is_empty() {
        DEFAULT_REFERENCE
    } else {
        truncate_units(reference, MAX_REFERENCE_LEN)
    };
    tlv(TAG_ADDITIONAL_DATA, &tlv(SUBTAG_REFERENCE, reference))
}

/// Assembles every field in order, ending with the `6304` checksum header
/// but without the checksum value.
pub fn assemble(request: &PaymentCodeRequest) -> String {
    let fields = [
        tlv(TAG_FORMAT_INDICATOR, FORMAT_INDICATOR),
        tlv(TAG_INITIATION_METHOD, INITIATION_STATIC),
        merchant_account(&request.payee_key),
        tlv(TAG_CATEGORY_CODE, CATEGORY_CODE),
        tlv(TAG_CURRENCY, CURRENCY_BRL),
        tlv(TAG_AMOUNT, &request.amount.to_string()),
        tlv(TAG_COUNTRY, COUNTRY_CODE),
        tlv(TAG_MERCHANT_NAME, &sanitize_name(&request.payee_name)),
        tlv(TAG_MERCHANT_CITY, &sanitize_city(&request.payee_city)),
        additional_data(&request.reference),
    ];

    let mut payload = fields.concat();
    payload.push_str(CRC_PREFIX);
    payload
}

/// Builds the final payment code: assembled payload plus its checksum.
///
/// Total and deterministic for every input.
///
/// ```
/// use pix_payload::{build_payment_code, PaymentCodeRequest};
///
/// let request = PaymentCodeRequest::new("11999998888", 42.5, "João", "São Paulo", "CARD1");
/// let code = build_payment_code(&request);
/// assert!(code.starts_with("000201"));
/// assert!(code.contains("540542.50"));
/// ```
pub fn build_payment_code(request: &PaymentCodeRequest) -> String {
    let mut payload = assemble(request);
    let checksum = crc16(&payload);
    payload.push_str(&checksum);
    debug!(
        "Built payment code for reference {:?}, amount {}, checksum {}",
        request.reference, request.amount, checksum
    );
    payload
}
