/*
    Two-party blind ECDSA signatures over secp256k1.
    Blind ECDSA draft: (http://oleganza.com/blind-ecdsa-draft-v2.pdf)
    A custodian (Bob) signs a hash for a client (Alice) without learning the hash,
    the final signature or the public key that signature verifies under.

    Instead of storing four random blinding factors per signature, both parties derive
    them from long-term BIP32 keys and a per-signature index:
        a, b, c, d = HD(u, 4i + 0..3)    hardened, client only
        P, Q       = ND(W, 2i + 0..1)    non-hardened, from the custodian's public key
    Bob recovers his matching secrets p = (w + x)^-1 and q = (w + y)·p from the
    BIP32 tweaks x and y of P and Q.

    SECURITY: every index must be used for exactly one message.
    The crate has no way to detect index reuse, callers are responsible for it.
*/

pub mod blinding;
mod clientfactors;
mod commitment;
mod common;
mod custodianfactors;
pub mod derive;
mod error;
mod protocol;
mod serde;
mod signature;
mod wire;

pub use crate::clientfactors::ClientBlindingFactors;
pub use crate::commitment::ClientCommitment;
pub use crate::common::{point_from_bytes, point_to_bytes, scalar_from_bytes};
pub use crate::custodianfactors::{BlindPoints, CustodianOffsets, CustodianSecrets};
pub use crate::derive::{ExtendedKey, ExtendedPrivateKey, ExtendedPublicKey};
pub use crate::error::{Error, Result};
pub use crate::protocol::{BlindSignatureClient, BlindSignatureCustodian};
pub use crate::signature::{InvalidSignature, Signature};
pub use crate::wire::{BlindSignature, BlindedHash};

pub use k256;
