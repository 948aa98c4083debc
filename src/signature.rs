//!    Module handling the final, unblinded ECDSA signature

use crate::common::{hash_to_scalar, scalar_from_bytes, scalar_to_bytes, x_projection};
use crate::error::{Error, Result};
use k256::elliptic_curve::group::Group;
use k256::elliptic_curve::scalar::IsHigh;
use k256::{ProjectivePoint, Scalar};
use tracing::error;

/// An ECDSA signature `(r, s)` over secp256k1, `s` is always low (`s <= n/2`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Signature {
    r: Scalar,
    s: Scalar,
}

/// An invalid signature error
#[derive(thiserror::Error, Debug, Ord, PartialOrd, PartialEq, Eq)]
#[error("Invalid Signature")]
pub struct InvalidSignature;

impl Signature {
    /// Build a signature from `r = Kx` and `s = s2`, normalizing `s` to low-S.
    ///
    /// ECDSA accepts both `s` and `n - s`, relay policy for Bitcoin transactions accepts only the lower one.
    pub fn from_scalars(r: Scalar, s: Scalar) -> Result<Self> {
        if bool::from(r.is_zero()) {
            error!("Signature r component is zero");
            return Err(Error::Domain("Kx"));
        }
        if bool::from(s.is_zero()) {
            error!("Signature s component is zero");
            return Err(Error::Domain("s2"));
        }
        let s = if bool::from(s.is_high()) { -s } else { s };
        Ok(Self { r, s })
    }

    pub fn r(&self) -> &Scalar {
        &self.r
    }

    pub fn s(&self) -> &Scalar {
        &self.s
    }

    /// Verify against a 32 byte message hash and public key.
    /// `R = (h·G + r·T) / s` has to have an x coordinate of `r` (mod n).
    pub fn verify(&self, hash: &[u8; 32], public_key: &ProjectivePoint) -> Result<(), InvalidSignature> {
        if bool::from(public_key.is_identity()) {
            return Err(InvalidSignature);
        }
        let s_inv = Option::<Scalar>::from(self.s.invert()).ok_or(InvalidSignature)?;
        let u1 = hash_to_scalar(hash) * s_inv;
        let u2 = self.r * s_inv;
        let nonce = ProjectivePoint::GENERATOR * u1 + *public_key * u2;
        if bool::from(nonce.is_identity()) || x_projection(&nonce) != self.r {
            return Err(InvalidSignature);
        }
        Ok(())
    }

    /// DER encoding, as used in Bitcoin transactions (without the trailing sighash byte).
    pub fn to_der(&self) -> Result<Vec<u8>> {
        let signature = k256::ecdsa::Signature::from_scalars(self.r.to_bytes(), self.s.to_bytes())
            .map_err(|_| {
                error!("Failed to build an ECDSA signature from (r, s)");
                Error::InvalidEncoding("signature")
            })?;
        Ok(signature.to_der().as_bytes().to_vec())
    }

    /// Serialize the signature as `r || s`
    pub fn serialize(&self) -> [u8; 64] {
        let mut out = [0u8; 64];
        out[..32].copy_from_slice(&scalar_to_bytes(&self.r));
        out[32..].copy_from_slice(&scalar_to_bytes(&self.s));
        out
    }

    /// Deserialize a signature, returns None if the bytes cannot represent a low-S signature.
    pub fn deserialize(bytes: [u8; 64]) -> Option<Self> {
        let mut r = [0u8; 32];
        let mut s = [0u8; 32];
        r.copy_from_slice(&bytes[..32]);
        s.copy_from_slice(&bytes[32..]);
        let (r, s) = (scalar_from_bytes(&r)?, scalar_from_bytes(&s)?);
        if bool::from(r.is_zero() | s.is_zero() | s.is_high()) {
            return None;
        }
        Some(Self { r, s })
    }
}
