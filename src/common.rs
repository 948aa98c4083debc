use k256::elliptic_curve::group::{Group, GroupEncoding};
use k256::elliptic_curve::ops::Reduce;
use k256::elliptic_curve::point::AffineCoordinates;
use k256::elliptic_curve::PrimeField;
use k256::{AffinePoint, CompressedPoint, FieldBytes, ProjectivePoint, Scalar, U256};
use tracing::error;

use crate::error::{Error, Result};

/// Converts 33 bytes of SEC1 compressed encoding into a curve point.
/// Only the `0x02`/`0x03` tags are accepted, so the point at infinity is never returned.
#[inline(always)]
pub fn point_from_bytes(bytes: &[u8; 33]) -> Option<ProjectivePoint> {
    if !matches!(bytes[0], 0x02 | 0x03) {
        return None;
    }
    let point: Option<AffinePoint> =
        AffinePoint::from_bytes(&CompressedPoint::clone_from_slice(bytes)).into();
    point
        .map(ProjectivePoint::from)
        .filter(|point| !bool::from(point.is_identity()))
}

/// SEC1 compressed encoding of a point.
///
/// The identity has no such encoding and comes out as 33 zero bytes, which [`point_from_bytes`] rejects.
/// Points handed out by this crate are never the identity.
#[inline(always)]
pub fn point_to_bytes(point: &ProjectivePoint) -> [u8; 33] {
    let mut out = [0u8; 33];
    out.copy_from_slice(&point.to_affine().to_bytes());
    out
}

/// Converts 32 big-endian bytes into a Scalar, checking that the scalar is fully reduced.
/// Values `>= n` are rejected, never wrapped.
#[inline(always)]
pub fn scalar_from_bytes(bytes: &[u8; 32]) -> Option<Scalar> {
    Scalar::from_repr(FieldBytes::from(*bytes)).into()
}

#[inline(always)]
pub(crate) fn scalar_to_bytes(scalar: &Scalar) -> [u8; 32] {
    let mut out = [0u8; 32];
    out.copy_from_slice(&scalar.to_bytes());
    out
}

/// Like [`scalar_from_bytes`] but reports out of range input as [`Error::Range`].
pub(crate) fn wire_scalar(bytes: &[u8; 32]) -> Result<Scalar> {
    scalar_from_bytes(bytes).ok_or_else(|| {
        error!("Received a scalar that is not reduced modulo the group order");
        Error::Range
    })
}

/// Interprets a 32 byte message digest as an integer mod n, the way ECDSA does for secp256k1.
#[inline(always)]
pub(crate) fn hash_to_scalar(hash: &[u8; 32]) -> Scalar {
    <Scalar as Reduce<U256>>::reduce_bytes(&FieldBytes::from(*hash))
}

/// The x coordinate of `point` reduced mod n, i.e. the `r` of an ECDSA signature with nonce point `point`.
#[inline(always)]
pub(crate) fn x_projection(point: &ProjectivePoint) -> Scalar {
    <Scalar as Reduce<U256>>::reduce_bytes(&point.to_affine().x())
}

/// Inverts `scalar`, naming the quantity in the error if it is zero.
pub(crate) fn invert(scalar: &Scalar, what: &'static str) -> Result<Scalar> {
    Option::<Scalar>::from(scalar.invert()).ok_or_else(|| {
        error!("Failed to invert {what}: congruent to 0 mod n");
        Error::Domain(what)
    })
}
