//!    Module for the two protocol roles.
//!
//! The client (Alice) holds her extended private key `u` and the custodian's extended public key `W`,
//! the custodian (Bob) only holds his extended private key `w`.
//! Both re-derive everything they need for a signature from the index,
//! so the only per-signature state is which indices were already used.
//!
//! The roles are separate types, a client cannot sign and a custodian cannot blind:
//! ```compile_fail
//! use blind_ecdsa::{BlindSignatureClient, ExtendedPrivateKey};
//! let (client_key, _) = ExtendedPrivateKey::generate();
//! let (custodian_key, _) = ExtendedPrivateKey::generate();
//! let client = BlindSignatureClient::new(client_key, custodian_key.public_key());
//! client.blind_signature_for_blinded_hash(&[0u8; 32], 0);
//! ```
//! ```compile_fail
//! use blind_ecdsa::{BlindSignatureCustodian, ExtendedPrivateKey};
//! let (custodian_key, _) = ExtendedPrivateKey::generate();
//! let custodian = BlindSignatureCustodian::new(custodian_key);
//! custodian.blinded_hash_for_hash(&[0u8; 32], 0);
//! ```
use k256::PublicKey;
use tracing::{debug, error};

use crate::blinding::{blind_hash, client_commitment, sign_blinded, unblind_signature};
use crate::clientfactors::ClientBlindingFactors;
use crate::commitment::ClientCommitment;
use crate::common::{hash_to_scalar, scalar_to_bytes, wire_scalar};
use crate::custodianfactors::{BlindPoints, CustodianSecrets};
use crate::derive::{ExtendedKey, ExtendedPrivateKey, ExtendedPublicKey, EXTENDED_KEY_LEN};
use crate::error::{Error, Result};
use crate::signature::Signature;
use crate::wire::{BlindSignature, BlindedHash};

/// Alice: blinds hashes for the custodian and unblinds the signatures she gets back.
///
/// SECURITY: Every index must be used for a single message only.
/// This type cannot detect reuse, callers sharing a client have to coordinate indices themselves.
#[derive(Debug, Clone)]
pub struct BlindSignatureClient {
    client_key: ExtendedPrivateKey,
    custodian_key: ExtendedPublicKey,
}

impl BlindSignatureClient {
    /// Alice needs her private extended key and Bob's public extended key.
    pub fn new(client_key: ExtendedPrivateKey, custodian_key: ExtendedPublicKey) -> Self {
        Self {
            client_key,
            custodian_key,
        }
    }

    /// Build a client from keys in the 78 byte BIP32 serialization.
    /// Fails with [`Error::RoleMismatch`] if `client_key` is public or `custodian_key` is private.
    pub fn from_bytes(
        client_key: &[u8; EXTENDED_KEY_LEN],
        custodian_key: &[u8; EXTENDED_KEY_LEN],
    ) -> Result<Self> {
        Self::from_keys(
            ExtendedKey::from_bytes(client_key)?,
            ExtendedKey::from_bytes(custodian_key)?,
        )
    }

    /// Build a client from an `xprv` and the custodian's `xpub`.
    /// Fails with [`Error::RoleMismatch`] if either has the wrong kind.
    pub fn from_base58(client_key: &str, custodian_key: &str) -> Result<Self> {
        Self::from_keys(
            ExtendedKey::from_base58(client_key)?,
            ExtendedKey::from_base58(custodian_key)?,
        )
    }

    fn from_keys(client_key: ExtendedKey, custodian_key: ExtendedKey) -> Result<Self> {
        let client_key = client_key.into_private()?;
        let custodian_key = match custodian_key {
            ExtendedKey::Public(key) => key,
            ExtendedKey::Private(_) => {
                error!("Client was handed the custodian's private key");
                return Err(Error::RoleMismatch(
                    "a client must only hold the custodian's public key",
                ));
            }
        };
        Ok(Self::new(client_key, custodian_key))
    }

    fn factors(&self, index: u32) -> Result<ClientBlindingFactors> {
        ClientBlindingFactors::derive(&self.client_key, index)
    }

    fn commitment(&self, factors: &ClientBlindingFactors, index: u32) -> Result<ClientCommitment> {
        let points = BlindPoints::derive(&self.custodian_key, index)?;
        client_commitment(
            &factors.a, &factors.b, &factors.c, &factors.d, &points.P, &points.Q,
        )
    }

    /// Steps 4-6: the nonce point `K` and public key `T` for `index`.
    pub fn commitment_at_index(&self, index: u32) -> Result<ClientCommitment> {
        let factors = self.factors(index)?;
        self.commitment(&factors, index)
    }

    /// Steps 4-6: the public key `T` to use in a transaction.
    pub fn public_key_at_index(&self, index: u32) -> Result<PublicKey> {
        let public_key = self.commitment_at_index(index)?.public_key()?;
        debug!(index, "Derived blinded public key");
        Ok(public_key)
    }

    /// Steps 7-8: blind a 32 byte message hash, the result is sent to the custodian.
    pub fn blinded_hash_for_hash(&self, hash: &[u8; 32], index: u32) -> Result<BlindedHash> {
        let factors = self.factors(index)?;
        let blinded = blind_hash(&hash_to_scalar(hash), &factors.a, &factors.b);
        debug!(index, "Blinded message hash");
        Ok(BlindedHash {
            hash: blinded,
            index,
        })
    }

    /// Step 11: unblind the custodian's signature into the final signature `(Kx, s2)`.
    pub fn signature_for_blind_signature(
        &self,
        blind_signature: &BlindSignature,
        index: u32,
    ) -> Result<Signature> {
        let factors = self.factors(index)?;
        let commitment = self.commitment(&factors, index)?;
        let s2 = unblind_signature(&blind_signature.0, &factors.c, &factors.d);
        debug!(index, "Unblinded signature");
        Signature::from_scalars(commitment.kx(), s2)
    }

    /// Step 11: unblind the custodian's signature as received over the wire,
    /// returns the final DER-encoded signature.
    ///
    /// Note: Do not forget to append the sighash byte when placing it in a Bitcoin transaction.
    pub fn unblinded_signature_for_blind_signature(
        &self,
        blind_signature: &[u8; 32],
        index: u32,
    ) -> Result<Vec<u8>> {
        let blind_signature = BlindSignature(wire_scalar(blind_signature)?);
        self.signature_for_blind_signature(&blind_signature, index)?
            .to_der()
    }
}

/// Bob: signs blinded hashes without learning the message, the signature or the public key.
///
/// Verifying the client's identity before signing is up to the caller.
#[derive(Debug, Clone)]
pub struct BlindSignatureCustodian {
    custodian_key: ExtendedPrivateKey,
}

impl BlindSignatureCustodian {
    /// Bob only needs his own private extended key.
    pub fn new(custodian_key: ExtendedPrivateKey) -> Self {
        Self { custodian_key }
    }

    /// Build a custodian from a key in the 78 byte BIP32 serialization,
    /// fails with [`Error::RoleMismatch`] if it is public.
    pub fn from_bytes(custodian_key: &[u8; EXTENDED_KEY_LEN]) -> Result<Self> {
        Ok(Self::new(
            ExtendedKey::from_bytes(custodian_key)?.into_private()?,
        ))
    }

    /// Build a custodian from an `xprv`, fails with [`Error::RoleMismatch`] on an `xpub`.
    pub fn from_base58(custodian_key: &str) -> Result<Self> {
        Ok(Self::new(ExtendedPrivateKey::from_base58(custodian_key)?))
    }

    /// The extended public key `W` to hand to clients.
    pub fn extended_public_key(&self) -> ExtendedPublicKey {
        self.custodian_key.public_key()
    }

    /// `P` and `Q` for `index`, the same points the client derives from `W`.
    pub fn blind_points_at_index(&self, index: u32) -> Result<BlindPoints> {
        BlindPoints::derive(&self.custodian_key.public_key(), index)
    }

    /// Steps 9-10: sign a blinded hash as received over the wire.
    /// Fails with [`Error::Range`] if `blinded_hash` is not reduced mod n.
    pub fn blind_signature_for_blinded_hash(
        &self,
        blinded_hash: &[u8; 32],
        index: u32,
    ) -> Result<BlindSignature> {
        // malformed requests are rejected before any secret is derived
        wire_scalar(blinded_hash)?;
        let secrets = CustodianSecrets::derive(&self.custodian_key, index)?;
        let s1 = sign_blinded(blinded_hash, &secrets.p, &secrets.q)?;
        debug!(index, "Signed blinded hash");
        Ok(BlindSignature(s1))
    }

    /// Steps 9-10 for an already decoded request.
    pub fn sign_request(&self, request: &BlindedHash) -> Result<BlindSignature> {
        self.blind_signature_for_blinded_hash(&scalar_to_bytes(&request.hash), request.index)
    }
}
