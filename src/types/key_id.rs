use std::fmt;

use crate::errors::{ensure_eq, Result};

/// Represents a Key ID.
#[derive(Clone, Copy, Eq, PartialEq)]
pub struct KeyId([u8; 8]);

impl KeyId {
    pub fn from_slice(input: &[u8]) -> Result<KeyId> {
        ensure_eq!(input.len(), 8, "invalid input length");
        let mut r = [0u8; 8];
        r.copy_from_slice(input);

        Ok(KeyId(r))
    }
}

impl AsRef<[u8]> for KeyId {
    fn as_ref(&self) -> &[u8] {
        self.0.as_ref()
    }
}

impl From<[u8; 8]> for KeyId {
    fn from(value: [u8; 8]) -> Self {
        KeyId(value)
    }
}

impl fmt::Debug for KeyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "KeyId({})", hex::encode(self.as_ref()))
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn test_from_slice() {
        let id = KeyId::from_slice(&[0x28, 0x75, 0xD7, 0xC7, 0x39, 0x8E, 0xCF, 0xC4]).unwrap();
        assert_eq!(format!("{:?}", id), "KeyId(2875d7c7398ecfc4)");

        assert!(KeyId::from_slice(&[1, 2, 3]).is_err());
    }
}
