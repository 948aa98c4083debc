//! # BIP32 keys over secp256k1
//! Hierarchical deterministic key derivation following
//! [BIP-32](https://github.com/bitcoin/bips/blob/master/bip-0032.mediawiki).
//!
//! Given an extended private key $(k, c)$, a child at index $i$ is
//! \\[ k_i = k + I_L \quad\text{where}\quad I = \text{HMAC-SHA512}(c, \text{data}) \\]
//! with `data` being `0x00 || k || i` for hardened children ($i \geq 2^{31}$)
//! and `K || i` for non-hardened ones. The right half $I_R$ becomes the child chain code.
//!
//! For non-hardened children the same $I_L$ can be computed from the public key alone:
//! \\[ K_i = K + I_L\cdot G \\]
//! The blind signature protocol needs exactly that offset $I_L$ (summed over the path),
//! which is why [`ExtendedPublicKey::derive_offset_and_public_key_from_path`] returns it.
//!
//! # Encoding
//! Keys use the standard 78 byte BIP32 serialization, and its base58check form
//! (`xprv...` / `xpub...`) through [`ExtendedPrivateKey::to_base58`] and [`ExtendedPublicKey::to_base58`].
//! Only the mainnet versions are accepted.
use hmac::{Hmac, Mac};
use k256::elliptic_curve::group::Group;
use k256::elliptic_curve::PrimeField;
use k256::{FieldBytes, ProjectivePoint, Scalar};
use rand::{thread_rng, Rng};
use ripemd::Ripemd160;
use sha2::{Digest, Sha256, Sha512};
use std::fmt;
use tracing::error;
use zeroize::{Zeroize, Zeroizing};

use crate::common::{point_from_bytes, point_to_bytes, scalar_from_bytes, scalar_to_bytes};
use crate::error::{Error, Result};

/// Child numbers at or above this offset are hardened.
pub const HARDENED_OFFSET: u32 = 1 << 31;

/// Length of [`ExtendedPrivateKey::serialize`] and [`ExtendedPublicKey::serialize`].
pub const EXTENDED_KEY_LEN: usize = 78;

/// `xprv` version bytes.
pub const XPRV_VERSION: [u8; 4] = [0x04, 0x88, 0xad, 0xe4];
/// `xpub` version bytes.
pub const XPUB_VERSION: [u8; 4] = [0x04, 0x88, 0xb2, 0x1e];

const CHILD_MASK: u64 = (HARDENED_OFFSET - 1) as u64;
const MASTER_KEY_HMAC_KEY: &[u8] = b"Bitcoin seed";
const PRIVATE_KEY_TAG: u8 = 0x00;

type HmacSha512 = Hmac<Sha512>;

/// First 4 bytes of `RIPEMD160(SHA256(K))`, identifies the parent of a derived key.
fn fingerprint(public_key: &ProjectivePoint) -> [u8; 4] {
    let hash = Ripemd160::digest(Sha256::digest(point_to_bytes(public_key)));
    let mut output = [0u8; 4];
    output.copy_from_slice(&hash[..4]);
    output
}

/// `version || depth || parent fingerprint || child number || chain code`, the key goes into `[45..]`.
fn serialize_header(
    version: [u8; 4],
    depth: u8,
    parent_fingerprint: [u8; 4],
    child_number: u32,
    chain_code: &[u8; 32],
) -> [u8; EXTENDED_KEY_LEN] {
    let mut output = [0u8; EXTENDED_KEY_LEN];
    output[..4].copy_from_slice(&version);
    output[4] = depth;
    output[5..9].copy_from_slice(&parent_fingerprint);
    output[9..13].copy_from_slice(&child_number.to_be_bytes());
    output[13..45].copy_from_slice(chain_code);
    output
}

fn hmac_sha512(key: &[u8], data: &[&[u8]]) -> Zeroizing<[u8; 64]> {
    let mut mac = HmacSha512::new_from_slice(key).expect("HMAC can take key of any size");
    for chunk in data {
        mac.update(chunk);
    }
    let mut output = Zeroizing::new([0u8; 64]);
    output.copy_from_slice(&mac.finalize().into_bytes());
    output
}

/// Splits an HMAC output into `(I_L, I_R)`.
/// `I_L` is `None` when it is not below the group order, BIP32 declares such children invalid.
fn split_hmac(i: &[u8; 64]) -> (Option<Scalar>, [u8; 32]) {
    let mut left = Zeroizing::new([0u8; 32]);
    left.copy_from_slice(&i[..32]);
    let mut chain_code = [0u8; 32];
    chain_code.copy_from_slice(&i[32..]);
    (scalar_from_bytes(&left), chain_code)
}

/// Maps a derivation slot onto a BIP32 path.
///
/// Slots below 2^31 are a single child number, larger slots use two levels
/// `[slot >> 31, slot & (2^31 - 1)]`. Slots up to 2^34 - 1 (client slot `4i + 3` for `i = u32::MAX`)
/// fit without overflow.
pub(crate) fn slot_path(slot: u64, hardened: bool) -> Vec<u32> {
    let flag = if hardened { HARDENED_OFFSET } else { 0 };
    let low = (slot & CHILD_MASK) as u32 | flag;
    match slot >> 31 {
        0 => vec![low],
        high => vec![high as u32 | flag, low],
    }
}

/// An extended private key: a secp256k1 private scalar with its chain code.
#[derive(Clone)]
pub struct ExtendedPrivateKey {
    private_key: Scalar,
    chain_code: [u8; 32],
    depth: u8,
    parent_fingerprint: [u8; 4],
    child_number: u32,
}

impl ExtendedPrivateKey {
    /// Create a new random master key,
    /// returns the key and the seed it was generated from.
    /// Restoring the key from the seed can be done using [`ExtendedPrivateKey::from_seed`]
    pub fn generate() -> (Self, [u8; 32]) {
        loop {
            let seed: [u8; 32] = thread_rng().gen();
            // an invalid master key has probability ~2^-127, draw a new seed
            if let Ok(key) = Self::from_seed(&seed) {
                return (key, seed);
            }
        }
    }

    /// BIP32 master key generation.
    pub fn from_seed(seed: &[u8]) -> Result<Self> {
        let i = hmac_sha512(MASTER_KEY_HMAC_KEY, &[seed]);
        let (private_key, chain_code) = split_hmac(&i);
        match private_key {
            Some(private_key) if !bool::from(private_key.is_zero()) => Ok(Self {
                private_key,
                chain_code,
                depth: 0,
                parent_fingerprint: [0u8; 4],
                child_number: 0,
            }),
            _ => {
                error!("Seed produced an invalid master key");
                Err(Error::Derivation(0))
            }
        }
    }

    /// CKDpriv: derive the child at `index`, hardened if `index >= HARDENED_OFFSET`.
    pub fn derive_child(&self, index: u32) -> Result<Self> {
        let point = self.point();
        let i = if index >= HARDENED_OFFSET {
            let private_key = Zeroizing::new(scalar_to_bytes(&self.private_key));
            hmac_sha512(
                &self.chain_code,
                &[&[PRIVATE_KEY_TAG][..], &private_key[..], &index.to_be_bytes()[..]],
            )
        } else {
            hmac_sha512(
                &self.chain_code,
                &[&point_to_bytes(&point)[..], &index.to_be_bytes()[..]],
            )
        };
        let (tweak, chain_code) = split_hmac(&i);
        let private_key = tweak
            .map(|tweak| tweak + self.private_key)
            .filter(|child| !bool::from(child.is_zero()))
            .ok_or_else(|| {
                error!("Invalid BIP32 child {index:#x} at depth {}", self.depth);
                Error::Derivation(index)
            })?;
        Ok(Self {
            private_key,
            chain_code,
            depth: self.depth.wrapping_add(1),
            parent_fingerprint: fingerprint(&point),
            child_number: index,
        })
    }

    /// Derive along `path`, each entry is the next derivation level.
    pub fn derive_path(&self, path: &[u32]) -> Result<Self> {
        path.iter()
            .try_fold(self.clone(), |key, &index| key.derive_child(index))
    }

    /// The extended public key, this is what the custodian shares with clients.
    pub fn public_key(&self) -> ExtendedPublicKey {
        ExtendedPublicKey {
            public_key: self.point(),
            chain_code: self.chain_code,
            depth: self.depth,
            parent_fingerprint: self.parent_fingerprint,
            child_number: self.child_number,
        }
    }

    pub(crate) fn private_key(&self) -> &Scalar {
        &self.private_key
    }

    fn point(&self) -> ProjectivePoint {
        ProjectivePoint::GENERATOR * self.private_key
    }

    pub fn chain_code(&self) -> [u8; 32] {
        self.chain_code
    }

    pub fn depth(&self) -> u8 {
        self.depth
    }

    pub fn parent_fingerprint(&self) -> [u8; 4] {
        self.parent_fingerprint
    }

    pub fn child_number(&self) -> u32 {
        self.child_number
    }

    /// Serialize the key in the 78 byte BIP32 format.
    ///
    /// SECURITY: the output contains the private key.
    pub fn serialize(&self) -> [u8; EXTENDED_KEY_LEN] {
        let mut output = serialize_header(
            XPRV_VERSION,
            self.depth,
            self.parent_fingerprint,
            self.child_number,
            &self.chain_code,
        );
        output[45] = PRIVATE_KEY_TAG;
        output[46..].copy_from_slice(&self.private_key.to_bytes());
        output
    }

    /// Deserialize a private key, fails with [`Error::RoleMismatch`] if `bytes` hold a public key.
    pub fn deserialize(bytes: [u8; EXTENDED_KEY_LEN]) -> Result<Self> {
        ExtendedKey::from_bytes(&bytes)?.into_private()
    }

    /// The `xprv...` string of this key.
    ///
    /// SECURITY: the output contains the private key.
    pub fn to_base58(&self) -> String {
        let bytes = Zeroizing::new(self.serialize());
        bs58::encode(&bytes[..]).with_check().into_string()
    }

    /// Parse an `xprv...` string, fails with [`Error::RoleMismatch`] on an `xpub`.
    pub fn from_base58(encoded: &str) -> Result<Self> {
        ExtendedKey::from_base58(encoded)?.into_private()
    }
}

impl fmt::Debug for ExtendedPrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtendedPrivateKey")
            .field("private_key", &"[redacted]")
            .field("depth", &self.depth)
            .field("child_number", &self.child_number)
            .finish()
    }
}

impl Zeroize for ExtendedPrivateKey {
    fn zeroize(&mut self) {
        self.private_key.zeroize();
        self.chain_code.zeroize();
    }
}

impl zeroize::ZeroizeOnDrop for ExtendedPrivateKey {}

impl Drop for ExtendedPrivateKey {
    fn drop(&mut self) {
        self.zeroize();
    }
}

/// An extended public key: a secp256k1 point with its chain code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtendedPublicKey {
    public_key: ProjectivePoint,
    chain_code: [u8; 32],
    depth: u8,
    parent_fingerprint: [u8; 4],
    child_number: u32,
}

impl ExtendedPublicKey {
    /// CKDpub: derive the non-hardened child at `index`.
    /// Returns the child and the offset `I_L` such that `child = parent + I_L·G`.
    pub fn derive_child(&self, index: u32) -> Result<(Scalar, Self)> {
        if index >= HARDENED_OFFSET {
            error!("Hardened child {index:#x} requested from a public key");
            return Err(Error::RoleMismatch(
                "hardened derivation requires a private key",
            ));
        }
        let i = hmac_sha512(
            &self.chain_code,
            &[&point_to_bytes(&self.public_key)[..], &index.to_be_bytes()[..]],
        );
        let (offset, chain_code) = split_hmac(&i);
        let (offset, public_key) = offset
            .map(|offset| (offset, self.public_key + ProjectivePoint::GENERATOR * offset))
            .filter(|(_, child)| !bool::from(child.is_identity()))
            .ok_or_else(|| {
                error!("Invalid BIP32 child {index:#x} at depth {}", self.depth);
                Error::Derivation(index)
            })?;
        Ok((
            offset,
            Self {
                public_key,
                chain_code,
                depth: self.depth.wrapping_add(1),
                parent_fingerprint: fingerprint(&self.public_key),
                child_number: index,
            },
        ))
    }

    /// Derive along `path`, returning the summed offset of all levels and the derived key.
    /// If `k` is the private key of `self`, `k + offset` is the private key of the result.
    pub fn derive_offset_and_public_key_from_path(&self, path: &[u32]) -> Result<(Scalar, Self)> {
        path.iter()
            .try_fold((Scalar::ZERO, self.clone()), |(offset_sum, key), &index| {
                let (offset, child) = key.derive_child(index)?;
                Ok((offset_sum + offset, child))
            })
    }

    pub fn public_key(&self) -> &ProjectivePoint {
        &self.public_key
    }

    pub fn chain_code(&self) -> [u8; 32] {
        self.chain_code
    }

    pub fn depth(&self) -> u8 {
        self.depth
    }

    pub fn parent_fingerprint(&self) -> [u8; 4] {
        self.parent_fingerprint
    }

    pub fn child_number(&self) -> u32 {
        self.child_number
    }

    /// Serialize the key in the 78 byte BIP32 format, in order to transmit it to clients.
    pub fn serialize(&self) -> [u8; EXTENDED_KEY_LEN] {
        let mut output = serialize_header(
            XPUB_VERSION,
            self.depth,
            self.parent_fingerprint,
            self.child_number,
            &self.chain_code,
        );
        output[45..].copy_from_slice(&point_to_bytes(&self.public_key));
        output
    }

    /// Deserialize a public key, fails with [`Error::RoleMismatch`] if `bytes` hold a private key.
    pub fn deserialize(bytes: [u8; EXTENDED_KEY_LEN]) -> Result<Self> {
        ExtendedKey::from_bytes(&bytes)?.into_public()
    }

    /// The `xpub...` string of this key.
    pub fn to_base58(&self) -> String {
        bs58::encode(self.serialize()).with_check().into_string()
    }

    /// Parse an `xpub...` string, fails with [`Error::RoleMismatch`] on an `xprv`.
    pub fn from_base58(encoded: &str) -> Result<Self> {
        ExtendedKey::from_base58(encoded)?.into_public()
    }
}

/// Either kind of extended key, as read from the 78 byte BIP32 serialization:
/// `version (4) || depth (1) || parent fingerprint (4) || child number (4) || chain code (32) || key (33)`,
/// where the key is `0x00 || k` for `xprv` and the SEC1 compressed point for `xpub`.
#[derive(Debug, Clone)]
pub enum ExtendedKey {
    Private(ExtendedPrivateKey),
    Public(ExtendedPublicKey),
}

impl ExtendedKey {
    pub fn from_bytes(bytes: &[u8; EXTENDED_KEY_LEN]) -> Result<Self> {
        let mut version = [0u8; 4];
        version.copy_from_slice(&bytes[..4]);
        let depth = bytes[4];
        let mut parent_fingerprint = [0u8; 4];
        parent_fingerprint.copy_from_slice(&bytes[5..9]);
        let mut child_number = [0u8; 4];
        child_number.copy_from_slice(&bytes[9..13]);
        let child_number = u32::from_be_bytes(child_number);
        let mut chain_code = [0u8; 32];
        chain_code.copy_from_slice(&bytes[13..45]);

        if depth == 0 && (parent_fingerprint != [0u8; 4] || child_number != 0) {
            error!("Master key with a parent fingerprint or child number");
            return Err(Error::InvalidEncoding("extended key"));
        }

        match version {
            XPRV_VERSION => {
                let mut private_key = Zeroizing::new([0u8; 32]);
                private_key.copy_from_slice(&bytes[46..]);
                let private_key: Option<Scalar> =
                    Scalar::from_repr(FieldBytes::from(*private_key)).into();
                match private_key {
                    Some(private_key)
                        if bytes[45] == PRIVATE_KEY_TAG && !bool::from(private_key.is_zero()) =>
                    {
                        Ok(Self::Private(ExtendedPrivateKey {
                            private_key,
                            chain_code,
                            depth,
                            parent_fingerprint,
                            child_number,
                        }))
                    }
                    _ => {
                        error!("Extended key holds an invalid private key");
                        Err(Error::InvalidEncoding("extended private key"))
                    }
                }
            }
            XPUB_VERSION => {
                let mut point = [0u8; 33];
                point.copy_from_slice(&bytes[45..]);
                let public_key = point_from_bytes(&point).ok_or_else(|| {
                    error!("Extended key holds an invalid public key");
                    Error::InvalidEncoding("extended public key")
                })?;
                Ok(Self::Public(ExtendedPublicKey {
                    public_key,
                    chain_code,
                    depth,
                    parent_fingerprint,
                    child_number,
                }))
            }
            _ => {
                error!("Unknown extended key version {:#010x}", u32::from_be_bytes(version));
                Err(Error::InvalidEncoding("extended key version"))
            }
        }
    }

    /// Parse a base58check `xprv...` or `xpub...` string.
    pub fn from_base58(encoded: &str) -> Result<Self> {
        let decoded = Zeroizing::new(bs58::decode(encoded).with_check(None).into_vec().map_err(
            |e| {
                error!("Invalid base58check extended key: {e}");
                Error::InvalidEncoding("base58check")
            },
        )?);
        let bytes = <&[u8; EXTENDED_KEY_LEN]>::try_from(&decoded[..]).map_err(|_| {
            error!("Extended key has {} bytes", decoded.len());
            Error::InvalidEncoding("extended key length")
        })?;
        Self::from_bytes(bytes)
    }

    pub fn into_private(self) -> Result<ExtendedPrivateKey> {
        match self {
            Self::Private(key) => Ok(key),
            Self::Public(_) => {
                error!("Expected an extended private key, got a public one");
                Err(Error::RoleMismatch("expected an extended private key"))
            }
        }
    }

    pub fn into_public(self) -> Result<ExtendedPublicKey> {
        match self {
            Self::Public(key) => Ok(key),
            Self::Private(_) => {
                error!("Expected an extended public key, got a private one");
                Err(Error::RoleMismatch("expected an extended public key"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex::decode;

    const SEED: &str = "000102030405060708090a0b0c0d0e0f";

    fn assert_key(key: &ExtendedPrivateKey, chain_code: &str, private_key: &str, public_key: &str) {
        assert_eq!(hex::encode(key.chain_code()), chain_code);
        assert_eq!(hex::encode(key.private_key().to_bytes()), private_key);
        assert_eq!(
            hex::encode(point_to_bytes(key.public_key().public_key())),
            public_key
        );
    }

    #[test]
    fn test_bip32_vector_one() {
        let master = ExtendedPrivateKey::from_seed(&decode(SEED).unwrap()).unwrap();
        assert_key(
            &master,
            "873dff81c02f525623fd1fe5167eac3a55a049de3d314bb42ee227ffed37d508",
            "e8f32e723decf4051aefac8e2c93c9c5b214313817cdb01a1494b917c8436b35",
            "0339a36013301597daef41fbe593a02cc513d0b55527ec2df1050e2e8ff49c85c2",
        );

        let m_0h = master.derive_child(HARDENED_OFFSET).unwrap();
        assert_key(
            &m_0h,
            "47fdacbd0f1097043b78c63c20c34ef4ed9a111d980047ad16282c7ae6236141",
            "edb2e14f9ee77d26dd93b4ecede8d16ed408ce149b6cd80b0715a2d911a0afea",
            "035a784662a4a20a65bf6aab9ae98a6c068a81c52e4b032c0fb5400c706cfccc56",
        );
        assert_eq!(m_0h.depth(), 1);
        assert_eq!(m_0h.child_number(), HARDENED_OFFSET);

        let m_0h_1 = master.derive_path(&[HARDENED_OFFSET, 1]).unwrap();
        assert_key(
            &m_0h_1,
            "2a7857631386ba23dacac34180dd1983734e444fdbf774041578e9b6adb37c19",
            "3c6cb8d0f6a264c91ea8b5030fadaa8e538b020f0a387421a12de9319dc93368",
            "03501e454bf00751f24b1b489aa925215d66af2234e3891c3b21a52bedb3cd711c",
        );

        // non-hardened children are reachable from the public key alone
        let (offset, public_child) = m_0h.public_key().derive_child(1).unwrap();
        assert_eq!(public_child, m_0h_1.public_key());
        assert_eq!(*m_0h.private_key() + offset, *m_0h_1.private_key());
    }

    #[test]
    fn test_bip32_base58_vectors() {
        let master = ExtendedPrivateKey::from_seed(&decode(SEED).unwrap()).unwrap();
        assert_eq!(
            master.to_base58(),
            "xprv9s21ZrQH143K3QTDL4LXw2F7HEK3wJUD2nW2nRk4stbPy6cq3jPPqjiChkVvvNKmPGJxWUtg6LnF5kejMRNNU3TGtRBeJgk33yuGBxrMPHi"
        );
        assert_eq!(
            master.public_key().to_base58(),
            "xpub661MyMwAqRbcFtXgS5sYJABqqG9YLmC4Q1Rdap9gSE8NqtwybGhePY2gZ29ESFjqJoCu1Rupje8YtGqsefD265TMg7usUDFdp6W1EGMcet8"
        );

        let m_0h = master.derive_child(HARDENED_OFFSET).unwrap();
        assert_eq!(
            m_0h.to_base58(),
            "xprv9uHRZZhk6KAJC1avXpDAp4MDc3sQKNxDiPvvkX8Br5ngLNv1TxvUxt4cV1rGL5hj6KCesnDYUhd7oWgT11eZG7XnxHrnYeSvkzY7d2bhkJ7"
        );
        assert_eq!(
            m_0h.public_key().to_base58(),
            "xpub68Gmy5EdvgibQVfPdqkBBCHxA5htiqg55crXYuXoQRKfDBFA1WEjWgP6LHhwBZeNK1VTsfTFUHCdrfp1bgwQ9xv5ski8PX9rL2dZXvgGDnw"
        );

        // m/0H/1 derived from the public key only carries the same parent fingerprint
        let (_, m_0h_1) = m_0h.public_key().derive_child(1).unwrap();
        assert_eq!(
            m_0h_1.to_base58(),
            "xpub6ASuArnXKPbfEwhqN6e3mwBcDTgzisQN1wXN9BJcM47sSikHjJf3UFHKkNAWbWMiGj7Wf5uMash7SyYq527Hqck2AxYysAA7xmALppuCkwQ"
        );
        assert_eq!(
            hex::encode(m_0h_1.serialize()),
            "0488b21e025c1bd648000000012a7857631386ba23dacac34180dd1983734e444fdbf774041578e9b6adb37c1903501e454bf00751f24b1b489aa925215d66af2234e3891c3b21a52bedb3cd711c"
        );
        assert_eq!(m_0h_1.parent_fingerprint(), [0x5c, 0x1b, 0xd6, 0x48]);

        let parsed = ExtendedPublicKey::from_base58(&m_0h_1.to_base58()).unwrap();
        assert_eq!(parsed, m_0h_1);
        let parsed = ExtendedPrivateKey::from_base58(&m_0h.to_base58()).unwrap();
        assert_eq!(parsed.serialize(), m_0h.serialize());
    }

    #[test]
    fn test_base58_rejections() {
        let master = ExtendedPrivateKey::from_seed(&decode(SEED).unwrap()).unwrap();
        let xpub = master.public_key().to_base58();
        assert_eq!(
            ExtendedPrivateKey::from_base58(&xpub).unwrap_err(),
            Error::RoleMismatch("expected an extended private key")
        );
        assert_eq!(
            ExtendedPublicKey::from_base58(&master.to_base58()).unwrap_err(),
            Error::RoleMismatch("expected an extended public key")
        );

        // flip the last character, breaking the checksum
        let mut corrupted = xpub.clone();
        let last = corrupted.pop().unwrap();
        corrupted.push(if last == '1' { '2' } else { '1' });
        assert_eq!(
            ExtendedKey::from_base58(&corrupted).unwrap_err(),
            Error::InvalidEncoding("base58check")
        );

        let short = bs58::encode(&master.public_key().serialize()[..77])
            .with_check()
            .into_string();
        assert_eq!(
            ExtendedKey::from_base58(&short).unwrap_err(),
            Error::InvalidEncoding("extended key length")
        );

        let mut testnet = master.public_key().serialize();
        testnet[..4].copy_from_slice(&[0x04, 0x35, 0x87, 0xcf]);
        assert_eq!(
            ExtendedKey::from_bytes(&testnet).unwrap_err(),
            Error::InvalidEncoding("extended key version")
        );

        // a master key cannot have a parent
        let mut orphan = master.public_key().serialize();
        orphan[5] = 1;
        assert_eq!(
            ExtendedKey::from_bytes(&orphan).unwrap_err(),
            Error::InvalidEncoding("extended key")
        );
    }

    #[test]
    fn test_public_and_offset_sanity_empty_path() {
        let (key, _) = ExtendedPrivateKey::generate();
        let (offset, derived) = key
            .public_key()
            .derive_offset_and_public_key_from_path(&[])
            .unwrap();
        assert_eq!(offset, Scalar::ZERO);
        assert_eq!(derived, key.public_key());
    }

    #[test]
    fn test_public_and_offset_sanity_path_length_two() {
        let (key, _) = ExtendedPrivateKey::generate();
        let path = [1, HARDENED_OFFSET - 1];
        let (offset, derived) = key
            .public_key()
            .derive_offset_and_public_key_from_path(&path)
            .unwrap();
        assert_ne!(offset, Scalar::ZERO);
        assert_eq!(
            *derived.public_key(),
            ProjectivePoint::GENERATOR * (*key.private_key() + offset)
        );
        assert_eq!(derived, key.derive_path(&path).unwrap().public_key());
        assert_eq!(derived.depth(), 2);
    }

    #[test]
    fn test_public_key_rejects_hardened() {
        let (key, _) = ExtendedPrivateKey::generate();
        assert!(matches!(
            key.public_key().derive_child(HARDENED_OFFSET),
            Err(Error::RoleMismatch(_))
        ));
    }

    #[test]
    fn test_slot_path() {
        assert_eq!(slot_path(0, false), vec![0]);
        assert_eq!(slot_path(7, true), vec![7 | HARDENED_OFFSET]);
        assert_eq!(slot_path(u64::from(HARDENED_OFFSET) - 1, false), vec![HARDENED_OFFSET - 1]);
        assert_eq!(slot_path(u64::from(HARDENED_OFFSET), false), vec![1, 0]);

        // last custodian and client slots of the largest index
        let max = u64::from(u32::MAX);
        assert_eq!(slot_path(2 * max + 1, false), vec![3, HARDENED_OFFSET - 1]);
        assert_eq!(
            slot_path(4 * max + 3, true),
            vec![7 | HARDENED_OFFSET, u32::MAX]
        );
    }

    #[test]
    fn test_serialize() {
        let master = ExtendedPrivateKey::from_seed(&decode(SEED).unwrap()).unwrap();
        let child = master.derive_child(HARDENED_OFFSET + 5).unwrap();

        let private = ExtendedPrivateKey::deserialize(child.serialize()).unwrap();
        assert_eq!(private.serialize(), child.serialize());
        assert_eq!(private.child_number(), HARDENED_OFFSET + 5);

        let public = ExtendedPublicKey::deserialize(child.public_key().serialize()).unwrap();
        assert_eq!(public, child.public_key());

        assert_eq!(
            ExtendedPublicKey::deserialize(child.serialize()).unwrap_err(),
            Error::RoleMismatch("expected an extended public key")
        );
        assert_eq!(
            ExtendedPrivateKey::deserialize(child.public_key().serialize()).unwrap_err(),
            Error::RoleMismatch("expected an extended private key")
        );

        let mut zero_key = child.serialize();
        zero_key[46..].copy_from_slice(&[0u8; 32]);
        assert_eq!(
            ExtendedKey::from_bytes(&zero_key).unwrap_err(),
            Error::InvalidEncoding("extended private key")
        );

        let mut bad_tag = child.serialize();
        bad_tag[45] = 1;
        assert_eq!(
            ExtendedKey::from_bytes(&bad_tag).unwrap_err(),
            Error::InvalidEncoding("extended private key")
        );

        // SEC1 compact and identity encodings are not valid public keys
        let mut compact = child.public_key().serialize();
        compact[45] = 5;
        assert_eq!(
            ExtendedKey::from_bytes(&compact).unwrap_err(),
            Error::InvalidEncoding("extended public key")
        );
        let mut identity = child.public_key().serialize();
        identity[45..].copy_from_slice(&[0u8; 33]);
        assert_eq!(
            ExtendedKey::from_bytes(&identity).unwrap_err(),
            Error::InvalidEncoding("extended public key")
        );
    }
}
