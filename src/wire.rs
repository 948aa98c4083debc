//!    Module for the payloads exchanged between client and custodian
use crate::common::{scalar_to_bytes, wire_scalar};
use crate::error::Result;
use k256::Scalar;

/// The client's signing request: the blinded hash `h2 = a·h + b` and the index it was blinded for.
/// Sent client → custodian.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlindedHash {
    pub(crate) hash: Scalar,
    pub(crate) index: u32,
}

impl BlindedHash {
    pub fn hash(&self) -> [u8; 32] {
        scalar_to_bytes(&self.hash)
    }

    pub fn index(&self) -> u32 {
        self.index
    }

    /// Serialize as `h2 (32 bytes, big-endian) || index (4 bytes, big-endian)`.
    pub fn serialize(&self) -> [u8; 36] {
        let mut output = [0u8; 36];
        output[..32].copy_from_slice(&scalar_to_bytes(&self.hash));
        output[32..].copy_from_slice(&self.index.to_be_bytes());
        output
    }

    /// Deserialize a request, fails with [`Error::Range`](crate::Error::Range) if `h2` is not reduced mod n.
    pub fn deserialize(bytes: [u8; 36]) -> Result<Self> {
        let mut hash = [0u8; 32];
        hash.copy_from_slice(&bytes[..32]);
        let mut index = [0u8; 4];
        index.copy_from_slice(&bytes[32..]);
        Ok(Self {
            hash: wire_scalar(&hash)?,
            index: u32::from_be_bytes(index),
        })
    }
}

/// The custodian's blind signature `s1 = p·h2 + q`. Sent custodian → client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlindSignature(pub(crate) Scalar);

impl BlindSignature {
    /// Serialize the blind signature
    pub fn serialize(&self) -> [u8; 32] {
        scalar_to_bytes(&self.0)
    }

    /// Deserialize the blind signature, fails with [`Error::Range`](crate::Error::Range) if it is not reduced mod n.
    pub fn deserialize(bytes: [u8; 32]) -> Result<Self> {
        wire_scalar(&bytes).map(Self)
    }
}
