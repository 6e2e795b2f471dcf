//! Payment code verification and field extraction.
//!
//! Parses a payload the way a scanning app does: checks the trailing
//! checksum, then walks the top-level TLV fields and the payee account and
//! additional data groups.

use crate::amount::Amount;
use crate::crc::crc16;
use crate::error::{PayloadError, Result};
use crate::payload::{
    COUNTRY_CODE, CRC_PREFIX, CURRENCY_BRL, FORMAT_INDICATOR, PIX_GUI, SUBTAG_GUI, SUBTAG_KEY,
    SUBTAG_REFERENCE, TAG_ADDITIONAL_DATA, TAG_AMOUNT, TAG_CATEGORY_CODE, TAG_COUNTRY,
    TAG_CURRENCY, TAG_FORMAT_INDICATOR, TAG_INITIATION_METHOD, TAG_MERCHANT_ACCOUNT,
    TAG_MERCHANT_CITY, TAG_MERCHANT_NAME,
};
use crate::tlv::{TlvField, TlvReader};
use log::debug;
use std::str::FromStr;

/// Number of hex digits in the checksum value.
const CRC_DIGITS: usize = 4;

/// Fields recovered from a verified payment code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedPaymentCode {
    /// Point of initiation method (`11` static, `12` dynamic).
    pub initiation_method: Option<String>,

    /// Pix key from the payee account group.
    pub payee_key: String,

    /// Merchant category code.
    pub category_code: Option<String>,

    /// Transaction amount, absent when the payer chooses the value.
    pub amount: Option<Amount>,

    /// Merchant name.
    pub payee_name: String,

    /// Merchant city.
    pub payee_city: String,

    /// Reference from the additional data group.
    pub reference: Option<String>,

    /// Checksum as carried by the payload.
    pub checksum: String,
}

/// Verifies the checksum of a payload without interpreting its fields.
pub fn verify_checksum(payload: &str) -> Result<()> {
    let (body, checksum) = split_checksum(payload)?;
    let expected = crc16(body);
    if !expected.eq_ignore_ascii_case(checksum) {
        return Err(PayloadError::ChecksumMismatch {
            expected,
            actual: checksum.to_string(),
        });
    }
    Ok(())
}

fn split_checksum(payload: &str) -> Result<(&str, &str)> {
    let trailer = CRC_PREFIX.len() + CRC_DIGITS;
    if payload.len() < trailer || !payload.is_char_boundary(payload.len() - CRC_DIGITS) {
        return Err(PayloadError::Truncated {
            offset: payload.len(),
        });
    }

    let (body, checksum) = payload.split_at(payload.len() - CRC_DIGITS);
    if !body.ends_with(CRC_PREFIX) {
        return Err(PayloadError::MissingField("checksum"));
    }
    Ok((body, checksum))
}

fn child_value<'a>(group: &TlvField<'a>, tag: &str) -> Result<Option<&'a str>> {
    for field in group.children() {
        let field = field?;
        if field.tag == tag {
            return Ok(Some(field.value));
        }
    }
    Ok(None)
}

fn expect_value(tag: &'static str, value: &str, expected: &str) -> Result<()> {
    if value != expected {
        return Err(PayloadError::UnexpectedValue {
            tag,
            value: value.to_string(),
        });
    }
    Ok(())
}

/// Verifies and decodes a static Pix payment code.
pub fn decode(payload: &str) -> Result<DecodedPaymentCode> {
    verify_checksum(payload)?;
    let (body, checksum) = split_checksum(payload)?;
    let fields_end = body.len() - CRC_PREFIX.len();

    let mut format_seen = false;
    let mut initiation_method = None;
    let mut payee_key = None;
    let mut category_code = None;
    let mut amount = None;
    let mut currency_seen = false;
    let mut country_seen = false;
    let mut payee_name = None;
    let mut payee_city = None;
    let mut reference = None;

    for (idx, field) in TlvReader::new(&body[..fields_end]).enumerate() {
        let field = field?;
        match field.tag {
            TAG_FORMAT_INDICATOR => {
                if idx != 0 {
                    return Err(PayloadError::UnexpectedValue {
                        tag: TAG_FORMAT_INDICATOR,
                        value: format!("at position {}", idx),
                    });
                }
                expect_value(TAG_FORMAT_INDICATOR, field.value, FORMAT_INDICATOR)?;
                format_seen = true;
            }
            TAG_INITIATION_METHOD => initiation_method = Some(field.value.to_string()),
            TAG_MERCHANT_ACCOUNT => {
                let gui = child_value(&field, SUBTAG_GUI)?
                    .ok_or(PayloadError::MissingField("payee account GUI"))?;
                if !gui.eq_ignore_ascii_case(PIX_GUI) {
                    return Err(PayloadError::UnexpectedValue {
                        tag: TAG_MERCHANT_ACCOUNT,
                        value: gui.to_string(),
                    });
                }
                let key = child_value(&field, SUBTAG_KEY)?
                    .ok_or(PayloadError::MissingField("payee key"))?;
                payee_key = Some(key.to_string());
            }
            TAG_CATEGORY_CODE => category_code = Some(field.value.to_string()),
            TAG_CURRENCY => {
                expect_value(TAG_CURRENCY, field.value, CURRENCY_BRL)?;
                currency_seen = true;
            }
            TAG_AMOUNT => {
                let parsed = Amount::from_str(field.value).map_err(|_| {
                    PayloadError::UnexpectedValue {
                        tag: TAG_AMOUNT,
                        value: field.value.to_string(),
                    }
                })?;
                amount = Some(parsed);
            }
            TAG_COUNTRY => {
                expect_value(TAG_COUNTRY, field.value, COUNTRY_CODE)?;
                country_seen = true;
            }
            TAG_MERCHANT_NAME => payee_name = Some(field.value.to_string()),
            TAG_MERCHANT_CITY => payee_city = Some(field.value.to_string()),
            TAG_ADDITIONAL_DATA => {
                reference = child_value(&field, SUBTAG_REFERENCE)?.map(str::to_string);
            }
            other => debug!("Skipping unrecognized field {} at offset {}", other, field.offset),
        }
    }

    if !format_seen {
        return Err(PayloadError::MissingField("payload format indicator"));
    }
    if !currency_seen {
        return Err(PayloadError::MissingField("transaction currency"));
    }
    if !country_seen {
        return Err(PayloadError::MissingField("country code"));
    }

    Ok(DecodedPaymentCode {
        initiation_method,
        payee_key: payee_key.ok_or(PayloadError::MissingField("payee account information"))?,
        category_code,
        amount,
        payee_name: payee_name.ok_or(PayloadError::MissingField("merchant name"))?,
        payee_city: payee_city.ok_or(PayloadError::MissingField("merchant city"))?,
        reference,
        checksum: checksum.to_string(),
    })
}
