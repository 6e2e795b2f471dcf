//! CRC-16/CCITT-FALSE checksum.
//!
//! Polynomial `0x1021`, initial value `0xFFFF`, no input or output
//! reflection, no final XOR. Check value for `"123456789"` is `0x29B1`.

/// Generator polynomial.
pub const POLYNOMIAL: u16 = 0x1021;

/// Register value before the first unit is processed.
pub const INITIAL: u16 = 0xFFFF;

/// Computes the checksum over a sequence of 16-bit code units.
///
/// Each unit is XORed into the high byte of the register, so only its low
/// 8 bits take part for the ASCII input a payload consists of.
pub fn crc16_ccitt_false<I>(units: I) -> u16
where
    I: IntoIterator<Item = u16>,
{
    let mut crc = INITIAL;
    for unit in units {
        crc ^= unit << 8;
        for _ in 0..8 {
            crc = if crc & 0x8000 != 0 {
                (crc << 1) ^ POLYNOMIAL
            } else {
                crc << 1
            };
        }
    }
    crc
}

/// Checksum of a payload string as 4 uppercase hex digits.
pub fn crc16(payload: &str) -> String {
    format!("{:04X}", crc16_ccitt_false(payload.encode_utf16()))
}
