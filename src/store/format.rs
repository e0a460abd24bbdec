//! On-disk value encoding for the fjall backend.
//!
//! Each snapshot value is the snapshot content prefixed by a four byte
//! little-endian CRC-32 of that content:
//!
//! ```text
//! +----------------+----------------------+
//! | crc32 (u32 LE) | content (UTF-8 text) |
//! +----------------+----------------------+
//! ```

/// Size of the checksum header.
const HEADER_LEN: usize = 4;

/// Reasons a stored value fails to decode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    Truncated(usize),
    ChecksumMismatch { stored: u32, computed: u32 },
    InvalidUtf8(String),
}

impl std::fmt::Display for DecodeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DecodeError::Truncated(len) => write!(f, "value of {} bytes is shorter than its header", len),
            DecodeError::ChecksumMismatch { stored, computed } => {
                write!(f, "checksum mismatch: stored {:08x}, computed {:08x}", stored, computed)
            }
            DecodeError::InvalidUtf8(msg) => write!(f, "content is not UTF-8: {}", msg),
        }
    }
}

impl std::error::Error for DecodeError {}

pub fn encode(content: &str) -> Vec<u8> {
    let checksum = crc32fast::hash(content.as_bytes());
    let mut buffer = Vec::with_capacity(HEADER_LEN + content.len());
    buffer.extend_from_slice(&checksum.to_le_bytes());
    buffer.extend_from_slice(content.as_bytes());
    buffer
}

pub fn decode(value: &[u8]) -> Result<String, DecodeError> {
    let (header, body) = value
        .split_first_chunk::<HEADER_LEN>()
        .ok_or(DecodeError::Truncated(value.len()))?;

    let stored = u32::from_le_bytes(*header);
    let computed = crc32fast::hash(body);
    if stored != computed {
        return Err(DecodeError::ChecksumMismatch { stored, computed });
    }

    String::from_utf8(body.to_vec()).map_err(|e| DecodeError::InvalidUtf8(e.to_string()))
}
