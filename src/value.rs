//! Runtime value representation.

use std::fmt;

use crate::consts::MAX_STRING_LEN;
use crate::error::RuntimeError;

/// A bounded platform string: up to 255 bytes, each one CODSCII code point.
///
/// The code page is treated as an 8-bit superset of ASCII; a byte converts
/// to and from the Unicode scalar with the same value.
#[derive(Debug, Default, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CodyString {
    bytes: Vec<u8>,
}

impl CodyString {
    /// The empty string.
    pub const fn new() -> Self {
        Self { bytes: Vec::new() }
    }

    /// Wrap raw code points, failing when the capacity is exceeded.
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, RuntimeError> {
        if bytes.len() > MAX_STRING_LEN {
            return Err(RuntimeError::StringTooLong);
        }

        Ok(Self { bytes })
    }

    /// Length in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Return `true` for the empty string.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// The raw code points.
    pub fn bytes(&self) -> &[u8] {
        self.bytes.as_slice()
    }

    /// First code point, if any.
    pub fn first(&self) -> Option<u8> {
        self.bytes.first().copied()
    }

    /// Concatenation, failing when the combined length exceeds the capacity.
    pub fn concat(&self, other: &Self) -> Result<Self, RuntimeError> {
        let mut bytes = Vec::with_capacity(self.len() + other.len());
        bytes.extend_from_slice(&self.bytes);
        bytes.extend_from_slice(&other.bytes);

        Self::from_bytes(bytes)
    }

    /// Copy of the byte range `start..start + len`.
    ///
    /// The caller is responsible for bounds checking.
    pub fn slice(&self, start: usize, len: usize) -> Self {
        Self {
            bytes: self.bytes[start..start + len].to_vec(),
        }
    }
}

impl TryFrom<&str> for CodyString {
    type Error = RuntimeError;

    fn try_from(s: &str) -> Result<Self, RuntimeError> {
        let mut bytes = Vec::with_capacity(s.len());

        for c in s.chars() {
            let code = u8::try_from(u32::from(c))
                .map_err(|_| RuntimeError::UnencodableChar(c))?;
            bytes.push(code);
        }

        Self::from_bytes(bytes)
    }
}

impl fmt::Display for CodyString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for b in &self.bytes {
            write!(f, "{}", *b as char)?;
        }

        Ok(())
    }
}

/// A runtime value: a signed 16-bit integer or a bounded string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Integer(i16),
    String(CodyString),
}

impl Value {
    /// Kind name used in error messages.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Integer(_) => "an integer",
            Self::String(_) => "a string",
        }
    }
}

impl From<i16> for Value {
    fn from(n: i16) -> Self {
        Self::Integer(n)
    }
}

impl From<CodyString> for Value {
    fn from(s: CodyString) -> Self {
        Self::String(s)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(n) => write!(f, "{n}"),
            Self::String(s) => s.fmt(f),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capacity_is_enforced() {
        assert!(CodyString::from_bytes(vec![b'A'; 255]).is_ok());
        assert!(matches!(
            CodyString::from_bytes(vec![b'A'; 256]),
            Err(RuntimeError::StringTooLong)
        ));
    }

    #[test]
    fn concat_checks_combined_length() {
        let a = CodyString::from_bytes(vec![b'A'; 200]).unwrap();
        let b = CodyString::from_bytes(vec![b'B'; 55]).unwrap();
        assert_eq!(a.concat(&b).unwrap().len(), 255);

        let c = CodyString::from_bytes(vec![b'C'; 56]).unwrap();
        assert!(matches!(a.concat(&c), Err(RuntimeError::StringTooLong)));
    }

    #[test]
    fn display_round_trips_code_points() {
        let s = CodyString::from_bytes(vec![72, 73, 222]).unwrap();
        assert_eq!(s.to_string(), "HI\u{de}");
        assert_eq!(CodyString::try_from("HI\u{de}").unwrap(), s);
    }

    #[test]
    fn rejects_wide_chars() {
        assert!(matches!(
            CodyString::try_from("snowman \u{2603}"),
            Err(RuntimeError::UnencodableChar('\u{2603}'))
        ));
    }
}
