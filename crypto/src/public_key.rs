// SPDX-FileCopyrightText: 2023 Marigold <contact@marigold.dev>
// SPDX-FileCopyrightText: 2024 Trilitech <contact@trili.tech>
//
// SPDX-License-Identifier: MIT

//! Public keys of implicit accounts.

use std::fmt::Display;

use tezos_forge_encoding::enc::BinWriter;
use tezos_forge_encoding::nom::NomReader;

use crate::hash::{HashTrait, PublicKeyBls, PublicKeyEd25519, PublicKeyP256, PublicKeySecp256k1};
use crate::identifier::{Identifier, IdentifierError, IdentifierKind};
use crate::provider::{CryptoProvider, DefaultCryptoProvider};
use crate::public_key_hash::PublicKeyHash;
use crate::PublicKeyWithHash;
#[cfg(feature = "signing")]
use crate::signature::Signature;
#[cfg(feature = "signing")]
use crate::CryptoError;

/// Public key of an implicit account. On the wire: one tag byte, then the
/// raw key (32, 33, 33 or 48 bytes).
#[derive(PartialOrd, Ord, Debug, Clone, PartialEq, Eq, Hash, NomReader, BinWriter)]
#[encoding(tags = "u8")]
pub enum PublicKey {
    /// Tz1 - public key
    #[encoding(tag = 0)]
    Ed25519(PublicKeyEd25519),
    /// Tz2 - public key
    #[encoding(tag = 1)]
    Secp256k1(PublicKeySecp256k1),
    /// Tz3 - public key
    #[encoding(tag = 2)]
    P256(PublicKeyP256),
    /// Tz4 - public key
    #[encoding(tag = 3)]
    Bls(PublicKeyBls),
}

impl Display for PublicKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_b58check())
    }
}

impl PublicKey {
    pub fn from_b58check_with<P: CryptoProvider + ?Sized>(
        provider: &P,
        data: &str,
    ) -> Result<Self, IdentifierError> {
        let id = Identifier::decode_from_text_with(provider, data)?;
        let payload = id.payload();
        Ok(match id.kind() {
            IdentifierKind::PublicKeyEd25519 => {
                Self::Ed25519(PublicKeyEd25519::try_from_bytes(payload)?)
            }
            IdentifierKind::PublicKeySecp256k1 => {
                Self::Secp256k1(PublicKeySecp256k1::try_from_bytes(payload)?)
            }
            IdentifierKind::PublicKeyP256 => Self::P256(PublicKeyP256::try_from_bytes(payload)?),
            IdentifierKind::PublicKeyBls => Self::Bls(PublicKeyBls::try_from_bytes(payload)?),
            _ => return Err(IdentifierError::UnrecognizedIdentifier),
        })
    }

    pub fn from_b58check(data: &str) -> Result<Self, IdentifierError> {
        Self::from_b58check_with(&DefaultCryptoProvider, data)
    }

    pub fn to_b58check_with<P: CryptoProvider + ?Sized>(&self, provider: &P) -> String {
        match self {
            Self::Ed25519(pk) => pk.to_b58check_with(provider),
            Self::Secp256k1(pk) => pk.to_b58check_with(provider),
            Self::P256(pk) => pk.to_b58check_with(provider),
            Self::Bls(pk) => pk.to_b58check_with(provider),
        }
    }

    pub fn to_b58check(&self) -> String {
        self.to_b58check_with(&DefaultCryptoProvider)
    }

    /// Checks `signature` over a 32-byte message digest. A well-formed
    /// signature that does not match yields `Ok(false)`.
    #[cfg(feature = "signing")]
    pub fn verify_digest(
        &self,
        signature: &Signature,
        digest: &[u8; 32],
    ) -> Result<bool, CryptoError> {
        let signature = signature.clone();
        match self {
            Self::Ed25519(pk) => verify::ed25519(pk, &signature.try_into()?, digest),
            Self::Secp256k1(pk) => verify::secp256k1(pk, &signature.try_into()?, digest),
            Self::P256(pk) => verify::p256(pk, &signature.try_into()?, digest),
            Self::Bls(_) => Err(CryptoError::Unsupported(
                "tz4 signature verification not supported",
            )),
        }
    }
}

impl std::str::FromStr for PublicKey {
    type Err = IdentifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_b58check(s)
    }
}

impl PublicKeyWithHash for PublicKey {
    type Hash = PublicKeyHash;

    fn pk_hash(&self) -> PublicKeyHash {
        match self {
            Self::Ed25519(pk) => PublicKeyHash::Ed25519(pk.pk_hash()),
            Self::Secp256k1(pk) => PublicKeyHash::Secp256k1(pk.pk_hash()),
            Self::P256(pk) => PublicKeyHash::P256(pk.pk_hash()),
            Self::Bls(pk) => PublicKeyHash::Bls(pk.pk_hash()),
        }
    }
}

#[cfg(feature = "signing")]
mod verify {
    use crate::hash::{
        Ed25519Signature, P256Signature, PublicKeyEd25519, PublicKeyP256, PublicKeySecp256k1,
        Secp256k1Signature,
    };
    use crate::CryptoError;

    pub(super) fn ed25519(
        pk: &PublicKeyEd25519,
        signature: &Ed25519Signature,
        digest: &[u8; 32],
    ) -> Result<bool, CryptoError> {
        let pk = ed25519_dalek::VerifyingKey::from_bytes(pk)
            .map_err(|_| CryptoError::InvalidPublicKey)?;
        let signature = ed25519_dalek::Signature::from_bytes(signature);
        Ok(pk.verify_strict(digest, &signature).is_ok())
    }

    pub(super) fn secp256k1(
        pk: &PublicKeySecp256k1,
        signature: &Secp256k1Signature,
        digest: &[u8; 32],
    ) -> Result<bool, CryptoError> {
        let pk = libsecp256k1::PublicKey::parse_compressed(pk)
            .map_err(|_| CryptoError::InvalidPublicKey)?;
        let signature = libsecp256k1::Signature::parse_standard(signature)
            .map_err(|_| CryptoError::InvalidSignature)?;
        let message = libsecp256k1::Message::parse(digest);
        Ok(libsecp256k1::verify(&message, &signature, &pk))
    }

    /// The digest is already BLAKE2b, so the prehash API is used to skip the
    /// SHA-256 step.
    pub(super) fn p256(
        pk: &PublicKeyP256,
        signature: &P256Signature,
        digest: &[u8; 32],
    ) -> Result<bool, CryptoError> {
        use p256::ecdsa::signature::hazmat::PrehashVerifier;

        let pk = p256::ecdsa::VerifyingKey::from_sec1_bytes(pk.as_ref())
            .map_err(|_| CryptoError::InvalidPublicKey)?;
        let signature = p256::ecdsa::Signature::from_slice(signature.as_ref())
            .map_err(|_| CryptoError::InvalidSignature)?;
        Ok(pk.verify_prehash(digest, &signature).is_ok())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use tezos_forge_encoding::nom::error::DecodeErrorKind;

    const TZ4_KEY: &str =
        "BLpk1yE462s3cPX5t2HhvGPg3HSEUgqLi9q9Knwx7mbN4VuhEsvBYFvEz5Eu9shR7vZRY1k5PCtV";

    // (key, tag, encoded size, hash)
    const KEYS: [(&str, u8, usize, &str); 4] = [
        (
            "edpkuDMUm7Y53wp4gxeLBXuiAhXZrLn8XB1R83ksvvesH8Lp8bmCfK",
            0,
            33,
            "tz1QFD9WqLWZmmAuqnnTPPUjfauitYEWdshv",
        ),
        (
            "sppk7a2WEfU54QzcQZ2EMjihtcxLeRtNTVxHw4FW2e8W5kEJ8ZargSb",
            1,
            34,
            "tz2DzfieD6mjjYYFqbGwotsW5ivfRogQE6c4",
        ),
        (
            "p2pk65p7HKSGvkMdeK5yckM2nmi59oGNw4ksqdcvwxxF3AV3hopkfGS",
            2,
            34,
            "tz3SYfXSu1mJnKx37BcJvhHyRXM4gbHy8o8i",
        ),
        (TZ4_KEY, 3, 49, "tz4DWZXsrP3bdPaZ5B3M3iLVoRMAyxw9oKLH"),
    ];

    #[test]
    fn text_binary_and_hash() -> Result<(), anyhow::Error> {
        for (text, tag, size, hash) in KEYS {
            let pk: PublicKey = text.parse()?;
            assert_eq!(pk.to_string(), text);

            let bin = pk.to_bytes()?;
            assert_eq!((bin[0], bin.len()), (tag, size), "{text}");
            assert_eq!(PublicKey::from_bytes(&bin)?, pk);

            assert_eq!(pk.pk_hash().to_b58check(), hash);
        }

        Ok(())
    }

    #[test]
    fn tz4_bytes() -> Result<(), anyhow::Error> {
        let pk = PublicKey::from_b58check(TZ4_KEY)?;
        assert_eq!(
            hex::encode(pk.to_bytes()?),
            "03b46a862ef09f7f994c3d3570464dd8ab39305161e27b144ef900fc57e92c9429878b81af9678478d63f2eb36b01b2418"
        );

        Ok(())
    }

    #[test]
    fn not_a_public_key() {
        assert_eq!(
            PublicKey::from_b58check("tz1QFD9WqLWZmmAuqnnTPPUjfauitYEWdshv"),
            Err(IdentifierError::UnrecognizedIdentifier)
        );
    }

    #[test]
    fn truncated_key() {
        let err = PublicKey::from_bytes(&[0x01, 0xaa, 0xbb]).unwrap_err();
        assert_eq!(err.kind(), DecodeErrorKind::TruncatedInput);
    }

    #[test]
    fn unknown_tag() {
        let err = PublicKey::from_bytes(&[0x04; 34]).unwrap_err();
        assert_eq!(err.kind(), DecodeErrorKind::InvalidTag);
    }

    #[cfg(feature = "signing")]
    mod signing {
        use super::*;
        use crate::blake2b::digest_256;

        fn verify(pk: &str, sig: &str, msg: &[u8]) -> Result<bool, CryptoError> {
            let pk = PublicKey::from_b58check(pk).unwrap();
            let sig = Signature::from_b58check(sig).unwrap();
            pk.verify_digest(&sig, &digest_256(msg))
        }

        #[test]
        fn verification() {
            // (key, signature, signed message)
            let cases = [
                (
                    "edpkurrsBe7UjF59ciHHmBRnS76WHx3YNL9m7owYta6ticPrdP9DG4",
                    "edsigtoeXp3xFtGugwCTDSDuifQ9Ka81X4gXFoxRQ6Xao2Ryc3yioptrKMfNy5c9pHhbA9Xn3sYZdx2SPiCGTFXjjXx9xKCPDoq",
                    &b"hello, world"[..],
                ),
                (
                    "sppk7a2WEfU54QzcQZ2EMjihtcxLeRtNTVxHw4FW2e8W5kEJ8ZargSb",
                    "siggWynZ1jzFuv67FWSAvhX8948jgL5szpwT2fZAL5brmU9egqoXd3fDXCLQJ2EBcYVLBkev3HvkQ6xnFxSBjthdonajN8JX",
                    b"hello, test",
                ),
                (
                    "p2pk65p7HKSGvkMdeK5yckM2nmi59oGNw4ksqdcvwxxF3AV3hopkfGS",
                    "sigfMaQ3pkpywf3q5ZqfNzJuKd6apUa1gRpoGb4hK25dBuiTY5u2vVCJcPGdpUqDT1RwfeGy6gvnHuhbTgfKhn2EZVYMatnN",
                    b"hello, message",
                ),
            ];
            for (pk, sig, msg) in cases {
                assert!(verify(pk, sig, msg).unwrap(), "{pk}");
                assert!(!verify(pk, sig, b"tampered").unwrap(), "{pk}");
            }
        }

        #[test]
        fn tz4_verification_is_unsupported() {
            let pk = PublicKey::from_b58check(TZ4_KEY).unwrap();
            let sig = Signature::try_from(&[0u8; 96][..]).unwrap();
            assert!(matches!(
                pk.verify_digest(&sig, &[0; 32]),
                Err(CryptoError::Unsupported(_))
            ));
        }
    }
}
