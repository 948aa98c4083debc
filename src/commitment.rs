//!    Module for the client's commitment (K, T)
#![allow(non_snake_case)]
use k256::{ProjectivePoint, PublicKey, Scalar};
use tracing::error;

use crate::common::{point_from_bytes, point_to_bytes, x_projection};
use crate::error::{Error, Result};

/// The client's nonce point `K` and blinded public key `T` for one index.
///
/// `T` is safe to publish, e.g. to lock funds in a Bitcoin transaction. `K` has to be kept
/// (or re-derived) until the signature is unblinded, its x coordinate becomes the signature's `r`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientCommitment {
    pub(crate) K: ProjectivePoint,
    pub(crate) T: ProjectivePoint,
}

impl ClientCommitment {
    pub fn K(&self) -> &ProjectivePoint {
        &self.K
    }

    pub fn T(&self) -> &ProjectivePoint {
        &self.T
    }

    /// `Kx`, the x coordinate of `K` reduced mod n.
    pub fn kx(&self) -> Scalar {
        x_projection(&self.K)
    }

    /// `T` as an ECDSA public key.
    pub fn public_key(&self) -> Result<PublicKey> {
        PublicKey::from_affine(self.T.to_affine()).map_err(|_| {
            error!("Blinded public key is the point at infinity");
            Error::Domain("T")
        })
    }

    /// Serialize as `K || T` for storage until the client needs a signature.
    pub fn serialize(&self) -> [u8; 66] {
        let mut output = [0u8; 66];
        output[..33].copy_from_slice(&point_to_bytes(&self.K));
        output[33..].copy_from_slice(&point_to_bytes(&self.T));
        output
    }

    /// Deserialize the commitment, returns None if either point is invalid.
    pub fn deserialize(bytes: [u8; 66]) -> Option<Self> {
        let mut K = [0u8; 33];
        let mut T = [0u8; 33];
        K.copy_from_slice(&bytes[..33]);
        T.copy_from_slice(&bytes[33..]);
        Some(Self {
            K: point_from_bytes(&K)?,
            T: point_from_bytes(&T)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_rejects_identity() {
        assert_eq!(ClientCommitment::deserialize([0u8; 66]), None);

        let generator = point_to_bytes(&ProjectivePoint::GENERATOR);
        let mut bytes = [0u8; 66];
        bytes[..33].copy_from_slice(&generator);
        bytes[33..].copy_from_slice(&generator);
        let commitment = ClientCommitment::deserialize(bytes).unwrap();
        assert_eq!(commitment.K(), &ProjectivePoint::GENERATOR);
        assert_eq!(commitment.serialize(), bytes);

        // identity T
        bytes[33..].copy_from_slice(&[0u8; 33]);
        assert_eq!(ClientCommitment::deserialize(bytes), None);
    }
}
