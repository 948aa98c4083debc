//!    Module for the client's per-index blinding factors
use k256::Scalar;
use std::fmt;
use tracing::error;
use zeroize::Zeroize;

use crate::derive::{slot_path, ExtendedPrivateKey};
use crate::error::Result;

/// The client's secret blinding factors `a, b, c, d` for a single index.
///
/// They are derived with hardened derivation from the client's master key at slots `4i + 0..3`,
/// so nothing but the client's private key can reproduce them.
///
/// SECURITY: an index, and so a set of factors, must be used for a single message only.
#[derive(Clone, PartialEq, Eq)]
pub struct ClientBlindingFactors {
    pub(crate) a: Scalar,
    pub(crate) b: Scalar,
    pub(crate) c: Scalar,
    pub(crate) d: Scalar,
}

impl ClientBlindingFactors {
    /// Derive `a, b, c, d` for `index`.
    ///
    /// Fails with [`Error::Derivation`](crate::Error::Derivation) if any child is invalid,
    /// the index is then unusable and the client has to move on to a fresh one.
    pub fn derive(client_key: &ExtendedPrivateKey, index: u32) -> Result<Self> {
        let first_slot = 4 * u64::from(index);
        let mut factors = [Scalar::ZERO; 4];
        for (slot, factor) in (first_slot..).zip(factors.iter_mut()) {
            let child = client_key
                .derive_path(&slot_path(slot, true))
                .map_err(|e| {
                    error!("Client blinding factors for index {index} are unusable");
                    e
                })?;
            *factor = *child.private_key();
        }
        let [a, b, c, d] = factors;
        factors.zeroize();
        Ok(Self { a, b, c, d })
    }

    /// Build factors from explicit scalars, e.g. when they are chosen at random
    /// instead of being derived.
    pub fn from_scalars(a: Scalar, b: Scalar, c: Scalar, d: Scalar) -> Self {
        Self { a, b, c, d }
    }
}

impl fmt::Debug for ClientBlindingFactors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ClientBlindingFactors([redacted])")
    }
}

impl Zeroize for ClientBlindingFactors {
    fn zeroize(&mut self) {
        self.a.zeroize();
        self.b.zeroize();
        self.c.zeroize();
        self.d.zeroize();
    }
}

impl zeroize::ZeroizeOnDrop for ClientBlindingFactors {}

impl Drop for ClientBlindingFactors {
    fn drop(&mut self) {
        self.zeroize();
    }
}
