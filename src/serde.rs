#![cfg(feature = "serde")]

/// Here we implement serde serialization and deserialization in terms of the `serialize`/`deserialize` functions
/// This will promise us stable platform independent serialization that shouldn't break by modifying types
/// It will also make sure that everything passes the right validations (reduced scalars, points on the curve etc.)
use serde::{
    de::{Error, SeqAccess, Visitor},
    ser::SerializeTuple,
    Deserialize, Deserializer, Serialize, Serializer,
};
use std::fmt;

use crate::commitment::ClientCommitment;
use crate::custodianfactors::BlindPoints;
use crate::derive::ExtendedPublicKey;
use crate::signature::Signature;
use crate::wire::{BlindSignature, BlindedHash};

/// Some `deserialize` functions report why they failed, some don't. Serde only needs to know if they did.
trait Validated<T> {
    fn validated(self) -> Option<T>;
}

impl<T> Validated<T> for Option<T> {
    fn validated(self) -> Option<T> {
        self
    }
}

impl<T> Validated<T> for crate::Result<T> {
    fn validated(self) -> Option<T> {
        self.ok()
    }
}

macro_rules! serialization {
    ($({name: $name:ident, len: $len:expr, error: $error:expr}),+ $(,)?) => {
        $(
            impl Serialize for $name {
                fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                    let serialized = self.serialize();
                    let mut tup = serializer.serialize_tuple($len)?;
                    for byte in &serialized {
                        tup.serialize_element(byte)?;
                    }
                    tup.end()
                }
            }
            impl<'de> Deserialize<'de> for $name {
                fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                    let visitor = ArrayVisitor::<$len> {
                        purpose: stringify!($name),
                    };
                    let array = deserializer.deserialize_tuple($len, visitor)?;
                    Self::deserialize(array)
                        .validated()
                        .ok_or_else(|| D::Error::custom($error))
                }
            }
        )+
    }
}

serialization!(
    {name: BlindedHash, len: 36, error: "Invalid blinded hash"},
    {name: BlindSignature, len: 32, error: "Invalid blind signature"},
    {name: BlindPoints, len: 66, error: "Invalid blind points"},
    {name: ClientCommitment, len: 66, error: "Invalid client commitment"},
    {name: Signature, len: 64, error: "Invalid signature"},
    {name: ExtendedPublicKey, len: 78, error: "Invalid extended public key"},
);

/// This is a visitor made to simply deserialize arrays.
/// it is needed because serde doesn't support arrays longer than 32 bytes.
/// Source: https://github.com/serde-rs/serde/issues/631#issuecomment-322677033
struct ArrayVisitor<const N: usize> {
    purpose: &'static str,
}
impl<'de, const N: usize> Visitor<'de> for ArrayVisitor<N> {
    type Value = [u8; N];

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        write!(
            formatter,
            "a valid {} byte array representing a {}",
            N, self.purpose
        )
    }

    #[inline(always)]
    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
        let mut bytes = [0u8; N];
        for (i, byte) in bytes.iter_mut().enumerate() {
            *byte = seq
                .next_element()?
                .ok_or_else(|| A::Error::invalid_length(i, &self))?;
        }
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        BlindSignature, BlindSignatureClient, BlindSignatureCustodian, BlindedHash,
        ClientCommitment, ExtendedPrivateKey, ExtendedPublicKey, Signature,
    };
    use serde::{de::DeserializeOwned, Serialize};
    use serde_test::{assert_de_tokens_error, assert_tokens, Token};
    use std::ops::Range;
    use std::{any::Any, fmt::Debug};

    const HASH: [u8; 32] = [7u8; 32];

    fn parties() -> (BlindSignatureClient, BlindSignatureCustodian) {
        let (client_key, _) = ExtendedPrivateKey::generate();
        let (custodian_key, _) = ExtendedPrivateKey::generate();
        let custodian = BlindSignatureCustodian::new(custodian_key);
        let client = BlindSignatureClient::new(client_key, custodian.extended_public_key());
        (client, custodian)
    }

    /// Checks the token layout of `init`, and that overwriting any of `invalid` with `u8::MAX` fails.
    /// A run of `u8::MAX` is both an unreduced scalar and an invalid point tag.
    fn test_max_u8_is_invalid<T, F, const N: usize>(
        init: [u8; N],
        create: F,
        invalid: &[Range<usize>],
        invalid_err: &str,
    ) where
        T: Serialize + DeserializeOwned + PartialEq + Debug + Any,
        F: FnOnce([u8; N]) -> Option<T>,
    {
        let val = create(init).unwrap();

        // The expected tokens: [Tuple{len}, U8(first), U8(second)....TupleEnd]
        let mut expected_tokens = vec![Token::Tuple { len: N }];
        expected_tokens.extend(init.into_iter().map(Token::U8));
        expected_tokens.push(Token::TupleEnd);
        assert_tokens(&val, &expected_tokens);

        // Error paths:
        for range in invalid {
            let mut bad = expected_tokens.clone();
            for token in &mut bad[range.start + 1..range.end + 1] {
                *token = Token::U8(u8::MAX);
            }
            assert_de_tokens_error::<T>(&bad, invalid_err);
        }

        let invalid_len = [Token::Tuple { len: 1 }, Token::U8(1), Token::TupleEnd];
        let type_name = std::any::type_name::<T>().split("::").last().unwrap();
        assert_de_tokens_error::<T>(
            &invalid_len,
            &format!(
                "invalid length 1, expected a valid {N} byte array representing a {type_name}"
            ),
        );
    }

    #[test]
    fn test_blinded_hash() {
        let (client, _) = parties();
        let request = client.blinded_hash_for_hash(&HASH, 3).unwrap();
        test_max_u8_is_invalid::<BlindedHash, _, 36>(
            request.serialize(),
            |bytes| BlindedHash::deserialize(bytes).ok(),
            &[0..32],
            "Invalid blinded hash",
        );
    }

    #[test]
    fn test_blind_signature() {
        let (client, custodian) = parties();
        let request = client.blinded_hash_for_hash(&HASH, 3).unwrap();
        let blind_signature = custodian.sign_request(&request).unwrap();
        test_max_u8_is_invalid::<BlindSignature, _, 32>(
            blind_signature.serialize(),
            |bytes| BlindSignature::deserialize(bytes).ok(),
            &[0..32],
            "Invalid blind signature",
        );
    }

    #[test]
    fn test_client_commitment() {
        let (client, _) = parties();
        let commitment = client.commitment_at_index(3).unwrap();
        test_max_u8_is_invalid::<ClientCommitment, _, 66>(
            commitment.serialize(),
            ClientCommitment::deserialize,
            &[0..33, 33..66],
            "Invalid client commitment",
        );

        // the identity has no valid encoding
        let mut zeros = vec![Token::Tuple { len: 66 }];
        zeros.extend([Token::U8(0); 66]);
        zeros.push(Token::TupleEnd);
        assert_de_tokens_error::<ClientCommitment>(&zeros, "Invalid client commitment");
    }

    #[test]
    fn test_blind_points() {
        let (_, custodian) = parties();
        let points = custodian.blind_points_at_index(3).unwrap();
        test_max_u8_is_invalid::<crate::BlindPoints, _, 66>(
            points.serialize(),
            crate::BlindPoints::deserialize,
            &[0..33, 33..66],
            "Invalid blind points",
        );
    }

    #[test]
    fn test_signature() {
        let (client, custodian) = parties();
        let request = client.blinded_hash_for_hash(&HASH, 3).unwrap();
        let blind_signature = custodian.sign_request(&request).unwrap();
        let signature = client
            .signature_for_blind_signature(&blind_signature, 3)
            .unwrap();
        test_max_u8_is_invalid::<Signature, _, 64>(
            signature.serialize(),
            Signature::deserialize,
            &[0..32, 32..64],
            "Invalid signature",
        );
    }

    #[test]
    fn test_extended_public_key() {
        let (_, custodian) = parties();
        test_max_u8_is_invalid::<ExtendedPublicKey, _, 78>(
            custodian.extended_public_key().serialize(),
            |bytes| ExtendedPublicKey::deserialize(bytes).ok(),
            &[45..78],
            "Invalid extended public key",
        );
    }
}
