//! Hex-digit-pair pattern parsing for command line signatures.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatternError {
    #[error("pattern has an odd number of hex digits")]
    OddLength,

    #[error("invalid hex digit {digit:?} at position {index}")]
    InvalidDigit { digit: char, index: usize },
}

/// Parse a string of hex digit pairs such as `"41424344"` into raw bytes.
///
/// Upper and lower case digits are accepted. An empty string yields an
/// empty pattern, which matches nothing.
pub fn parse_hex_pattern(text: &str) -> Result<Vec<u8>, PatternError> {
    hex::decode(text).map_err(|e| match e {
        hex::FromHexError::InvalidHexCharacter { c, index } => {
            PatternError::InvalidDigit { digit: c, index }
        }
        _ => PatternError::OddLength,
    })
}
