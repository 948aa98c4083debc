//! The blind ECDSA algebra.
//!
//! Every function here is pure and deterministic, the derivation of the inputs lives in
//! [`ClientBlindingFactors`](crate::ClientBlindingFactors) and [`CustodianSecrets`](crate::CustodianSecrets),
//! the bookkeeping of indices in [`protocol`](crate::BlindSignatureClient).
//!
//! 1. Alice chooses a, b, c, d within [1, n – 1].
//! 2. Bob chooses p, q within [1, n – 1] and sends Alice `P = p^-1·G` and `Q = q·p^-1·G`.
//! 3. Alice computes `K = (c·a)^-1·P` and her public key `T = (a·Kx)^-1·(b·G + Q + d·c^-1·P)`.
//!    Without a, b, c and d Bob cannot tell whether his parameters were involved in K or T.
//! 4. Alice blinds the hash of her message, `h2 = a·h + b`.
//! 5. Bob signs the blinded hash, `s1 = p·h2 + q`.
//! 6. Alice unblinds, `s2 = c·s1 + d`. `(Kx, s2)` is an ECDSA signature of `h` under `T`.
#![allow(non_snake_case)]
use k256::elliptic_curve::group::Group;
use k256::{ProjectivePoint, Scalar};
use tracing::error;

use crate::commitment::ClientCommitment;
use crate::common::{invert, wire_scalar, x_projection};
use crate::custodianfactors::BlindPoints;
use crate::error::{Error, Result};
use crate::signature::Signature;

/// Step 2: Bob's blinded "public keys" `P = p^-1·G` and `Q = q·p^-1·G`.
pub fn custodian_points(p: &Scalar, q: &Scalar) -> Result<BlindPoints> {
    if bool::from(q.is_zero()) {
        error!("Custodian parameter q is zero");
        return Err(Error::Domain("q"));
    }
    let p_inv = invert(p, "p")?;
    let P = ProjectivePoint::GENERATOR * p_inv;
    Ok(BlindPoints { P, Q: P * *q })
}

/// Step 3: Alice's nonce point `K = (c·a)^-1·P` and public key `T = (a·Kx)^-1·(b·G + Q + d·c^-1·P)`.
///
/// `a`, `c` and `Kx` must be invertible. Any failure means this set of factors is unusable,
/// the client has to start over with a fresh index.
pub fn client_commitment(
    a: &Scalar,
    b: &Scalar,
    c: &Scalar,
    d: &Scalar,
    P: &ProjectivePoint,
    Q: &ProjectivePoint,
) -> Result<ClientCommitment> {
    let a_inv = invert(a, "a")?;
    let c_inv = invert(c, "c")?;

    let K = *P * (c_inv * a_inv);
    let Kx = x_projection(&K);
    let a_Kx_inv = invert(&(*a * Kx), "Kx")?;

    let T = (ProjectivePoint::GENERATOR * *b + *Q + *P * (*d * c_inv)) * a_Kx_inv;
    if bool::from(T.is_identity()) {
        error!("Blinded public key is the point at infinity");
        return Err(Error::Domain("T"));
    }
    Ok(ClientCommitment { K, T })
}

/// Step 4: Alice blinds the message hash, `h2 = a·h + b (mod n)`.
pub fn blind_hash(h: &Scalar, a: &Scalar, b: &Scalar) -> Scalar {
    *a * h + b
}

/// Step 5: Bob signs the blinded hash, `s1 = p·h2 + q (mod n)`.
///
/// `h2` arrives over the wire, values that are not fully reduced are rejected with
/// [`Error::Range`] instead of being reduced.
pub fn sign_blinded(h2: &[u8; 32], p: &Scalar, q: &Scalar) -> Result<Scalar> {
    let h2 = wire_scalar(h2)?;
    Ok(*p * h2 + q)
}

/// Step 6: Alice unblinds Bob's signature, `s2 = c·s1 + d (mod n)`.
pub fn unblind_signature(s1: &Scalar, c: &Scalar, d: &Scalar) -> Scalar {
    *c * s1 + d
}

/// The final DER-encoded ECDSA signature `(Kx, s2)`, with `s2` normalized to low-S.
///
/// Note: Do not forget to append the sighash byte when placing it in a Bitcoin transaction.
pub fn assemble_signature(Kx: &Scalar, s2: &Scalar) -> Result<Vec<u8>> {
    Signature::from_scalars(*Kx, *s2)?.to_der()
}
