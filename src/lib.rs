//! # Pix Payload
//!
//! Builds and verifies static Pix payment codes (BR Code): the text payload a
//! kiosk renders as a QR code so the payer's banking app can transfer a fixed
//! amount to the merchant's Pix key.
//!
//! ## Pipeline
//!
//! - **Sanitizer**: merchant name/city reduced to safe ASCII and capped
//! - **Amount**: fixed-point, 2 decimals, never negative
//! - **TLV encoder**: `tag + 2-digit length + value`, nested for groups
//! - **Assembler**: fields in the order the standard mandates
//! - **Checksum**: CRC-16/CCITT-FALSE over everything up to `6304`
//!
//! Building a code is a pure function of its request and never fails.
//!
//! ## Example
//!
//! ```
//! use pix_payload::{build_payment_code, decode, PaymentCodeRequest};
//!
//! let request = PaymentCodeRequest::new("11999998888", 42.5, "João Ação Ltda", "São Paulo", "CARD123");
//! let code = build_payment_code(&request);
//! assert!(code.ends_with("8B06"));
//!
//! let decoded = decode(&code).unwrap();
//! assert_eq!(decoded.payee_name, "Joao Acao Ltda");
//! ```

pub mod amount;
pub mod batch;
pub mod crc;
pub mod decode;
pub mod error;
pub mod payload;
pub mod sanitize;
pub mod tab;
pub mod tlv;

pub use amount::{format_amount, Amount};
pub use batch::{IssuedCode, PaymentCodeBatch, PaymentRecord};
pub use crc::crc16;
pub use decode::{decode, verify_checksum, DecodedPaymentCode};
pub use error::{PayloadError, Result};
pub use payload::{assemble, build_payment_code, PaymentCodeRequest};
pub use sanitize::{sanitize_city, sanitize_name};
pub use tab::{MerchantProfile, Tab, TabItem};
pub use tlv::{tlv, TlvField, TlvReader};
