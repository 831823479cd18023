//! Transaction identifier.

use blake2::{Blake2b512, Digest};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A 32-byte transaction id.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TxId([u8; 32]);

impl TxId {
    pub const ZERO: Self = Self([0u8; 32]);

    pub fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Derive a transaction id from the domain-separated digest of the
    /// given byte chunks.
    pub fn digest<'a>(parts: impl IntoIterator<Item = &'a [u8]>) -> Self {
        let mut hasher = Blake2b512::new();
        hasher.update(b"vesta-tx");
        for part in parts {
            hasher.update((part.len() as u64).to_le_bytes());
            hasher.update(part);
        }
        let out = hasher.finalize();
        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(&out[..32]);
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 32]
    }

    /// Parse from a 64-char hex string.
    pub fn from_hex(s: &str) -> Option<Self> {
        let raw = hex::decode(s).ok()?;
        let bytes: [u8; 32] = raw.try_into().ok()?;
        Some(Self(bytes))
    }
}

impl fmt::Debug for TxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TxId({})", hex::encode(&self.0[..4]))
    }
}

impl fmt::Display for TxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digest_is_deterministic() {
        let a = TxId::digest([b"alice".as_slice(), b"bob".as_slice()]);
        let b = TxId::digest([b"alice".as_slice(), b"bob".as_slice()]);
        assert_eq!(a, b);
    }

    #[test]
    fn digest_is_length_prefixed() {
        // "ab" + "c" must not collide with "a" + "bc".
        let a = TxId::digest([b"ab".as_slice(), b"c".as_slice()]);
        let b = TxId::digest([b"a".as_slice(), b"bc".as_slice()]);
        assert_ne!(a, b);
    }

    #[test]
    fn hex_roundtrip() {
        let id = TxId::digest([b"roundtrip".as_slice()]);
        assert_eq!(TxId::from_hex(&id.to_string()), Some(id));
        assert_eq!(TxId::from_hex("abc"), None);
    }
}
