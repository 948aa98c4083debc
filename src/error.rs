use thiserror::Error;

/// Specialisation of `std::Result`.
pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
/// error variants.
pub enum Error {
    /// A derived child key is zero, not below the group order, or the point at infinity.
    /// The index this child belongs to is unusable and must never be retried.
    #[error("derived child key {0:#x} is invalid, move on to a new index")]
    Derivation(u32),

    /// A quantity that has to be invertible is congruent to 0 mod n.
    #[error("{0} is not invertible modulo the group order")]
    Domain(&'static str),

    /// A scalar received over the wire is not in [0, n-1].
    #[error("scalar is not reduced modulo the group order")]
    Range,

    /// Key material of the wrong kind was handed to a protocol role.
    #[error("role mismatch: {0}")]
    RoleMismatch(&'static str),

    #[error("invalid encoding of {0}")]
    InvalidEncoding(&'static str),
}
