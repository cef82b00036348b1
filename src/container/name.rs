// Background image name: fixed 32-byte CP932 (Shift_JIS) field, NUL padded.

use encoding_rs::SHIFT_JIS;

/// Width of the name field in bytes.
pub const NAME_FIELD_LEN: usize = 32;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NameError {
    #[error("background image name is {len} bytes in CP932, limit is {NAME_FIELD_LEN}")]
    TooLong { len: usize },
    #[error("background image name {0:?} has characters not representable in CP932")]
    Unmappable(String),
}

/// How to turn the stored field back into text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NameDecoding {
    /// Text up to the first NUL byte.
    #[default]
    Terminated,
    /// Only the leading run of NUL bytes, as older extraction tooling did.
    /// Any non-empty stored name comes back as an empty string.
    Legacy,
}

/// Encoded background image name.
#[derive(Clone, PartialEq, Eq)]
pub struct BackgroundName([u8; NAME_FIELD_LEN]);

impl BackgroundName {
    /// Encode `name` to CP932 and pad it to the field width.
    pub fn new(name: &str) -> Result<Self, NameError> {
        let (bytes, _, had_errors) = SHIFT_JIS.encode(name);
        if had_errors {
            return Err(NameError::Unmappable(name.to_string()));
        }
        if bytes.len() > NAME_FIELD_LEN {
            return Err(NameError::TooLong { len: bytes.len() });
        }
        let mut field = [0u8; NAME_FIELD_LEN];
        field[..bytes.len()].copy_from_slice(&bytes);
        Ok(Self(field))
    }

    /// Wrap a raw field read from a file.
    pub fn from_raw(field: [u8; NAME_FIELD_LEN]) -> Self {
        Self(field)
    }

    pub fn as_bytes(&self) -> &[u8; NAME_FIELD_LEN] {
        &self.0
    }

    /// Decode the field to text.
    pub fn decode(&self, mode: NameDecoding) -> String {
        let stored: &[u8] = match mode {
            NameDecoding::Terminated => {
                let end = self.0.iter().position(|&b| b == 0).unwrap_or(NAME_FIELD_LEN);
                &self.0[..end]
            }
            NameDecoding::Legacy => {
                let end = self.0.iter().position(|&b| b != 0).unwrap_or(NAME_FIELD_LEN);
                &self.0[..end]
            }
        };
        let (text, _, _) = SHIFT_JIS.decode(stored);
        text.into_owned()
    }
}

impl std::fmt::Debug for BackgroundName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("BackgroundName")
            .field(&self.decode(NameDecoding::Terminated))
            .finish()
    }
}
