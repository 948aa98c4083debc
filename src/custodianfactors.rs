//!    Module for the custodian's per-index offsets, secrets and blind points
use k256::{ProjectivePoint, Scalar};
use std::fmt;
use zeroize::Zeroize;

use crate::common::{invert, point_from_bytes, point_to_bytes};
use crate::derive::{slot_path, ExtendedPrivateKey, ExtendedPublicKey};
use crate::error::Result;

fn derive_slot(custodian_key: &ExtendedPublicKey, slot: u64) -> Result<(Scalar, ExtendedPublicKey)> {
    custodian_key.derive_offset_and_public_key_from_path(&slot_path(slot, false))
}

/// The BIP32 offsets `x, y` of the custodian's non-hardened children at slots `2i` and `2i + 1`.
/// Both parties can compute them from the custodian's extended public key `W`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustodianOffsets {
    pub(crate) x: Scalar,
    pub(crate) y: Scalar,
}

impl CustodianOffsets {
    pub fn derive(custodian_key: &ExtendedPublicKey, index: u32) -> Result<Self> {
        let first_slot = 2 * u64::from(index);
        let (x, _) = derive_slot(custodian_key, first_slot)?;
        let (y, _) = derive_slot(custodian_key, first_slot + 1)?;
        Ok(Self { x, y })
    }

    pub fn x(&self) -> &Scalar {
        &self.x
    }

    pub fn y(&self) -> &Scalar {
        &self.y
    }
}

/// The custodian's secrets for an index: `p = (w + x)^-1` and `q = (w + y)·p`.
///
/// Computing them needs the custodian's private key `w`, and they never leave the custodian.
#[derive(Clone, PartialEq, Eq)]
pub struct CustodianSecrets {
    pub(crate) p: Scalar,
    pub(crate) q: Scalar,
}

impl CustodianSecrets {
    /// Derive `p, q` for `index`.
    ///
    /// Plain BIP32 gives the custodian the child keys `w + x` and `w + y`,
    /// which are the discrete logs of `P` and `Q`:
    /// `P = p^-1·G = (w + x)·G` and `Q = q·p^-1·G = (w + y)·G`.
    pub fn derive(custodian_key: &ExtendedPrivateKey, index: u32) -> Result<Self> {
        let offsets = CustodianOffsets::derive(&custodian_key.public_key(), index)?;
        let w = custodian_key.private_key();
        // w + x is the private key of a child that is not the identity, so it is never zero
        let p = invert(&(w + &offsets.x), "w + x")?;
        let q = (w + &offsets.y) * p;
        Ok(Self { p, q })
    }

    /// Build secrets from explicit scalars, e.g. when they are chosen at random
    /// instead of being derived.
    pub fn from_scalars(p: Scalar, q: Scalar) -> Self {
        Self { p, q }
    }
}

impl fmt::Debug for CustodianSecrets {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CustodianSecrets([redacted])")
    }
}

impl Zeroize for CustodianSecrets {
    fn zeroize(&mut self) {
        self.p.zeroize();
        self.q.zeroize();
    }
}

impl zeroize::ZeroizeOnDrop for CustodianSecrets {}

impl Drop for CustodianSecrets {
    fn drop(&mut self) {
        self.zeroize();
    }
}

/// The custodian's blinded "public keys" for an index, `P = p^-1·G` and `Q = q·p^-1·G`.
#[allow(non_snake_case)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlindPoints {
    pub(crate) P: ProjectivePoint,
    pub(crate) Q: ProjectivePoint,
}

#[allow(non_snake_case)]
impl BlindPoints {
    /// The client's way to get `P, Q`: non-hardened children of `W` at slots `2i` and `2i + 1`.
    pub fn derive(custodian_key: &ExtendedPublicKey, index: u32) -> Result<Self> {
        let first_slot = 2 * u64::from(index);
        let (_, P) = derive_slot(custodian_key, first_slot)?;
        let (_, Q) = derive_slot(custodian_key, first_slot + 1)?;
        Ok(Self {
            P: *P.public_key(),
            Q: *Q.public_key(),
        })
    }

    pub fn P(&self) -> &ProjectivePoint {
        &self.P
    }

    pub fn Q(&self) -> &ProjectivePoint {
        &self.Q
    }

    /// Serialize both points, e.g. when the custodian sends them to the client directly.
    pub fn serialize(&self) -> [u8; 66] {
        let mut output = [0u8; 66];
        output[..33].copy_from_slice(&point_to_bytes(&self.P));
        output[33..].copy_from_slice(&point_to_bytes(&self.Q));
        output
    }

    /// Deserialize the points, returns None if either is not a valid point.
    pub fn deserialize(bytes: [u8; 66]) -> Option<Self> {
        let mut P = [0u8; 33];
        let mut Q = [0u8; 33];
        P.copy_from_slice(&bytes[..33]);
        Q.copy_from_slice(&bytes[33..]);
        Some(Self {
            P: point_from_bytes(&P)?,
            Q: point_from_bytes(&Q)?,
        })
    }
}
