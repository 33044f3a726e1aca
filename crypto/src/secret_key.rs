// SPDX-FileCopyrightText: 2024 Trilitech <contact@trili.tech>
//
// SPDX-License-Identifier: MIT

//! Unencrypted secret keys.

use std::fmt;

use zeroize::Zeroize;

use crate::hash::{SecretKeyEd25519, SecretKeyP256, SecretKeySecp256k1, SeedEd25519};
use crate::identifier::{IdentifierError, IdentifierKind};
use crate::provider::{CryptoProvider, DefaultCryptoProvider};
#[cfg(feature = "signing")]
use crate::{public_key::PublicKey, signature::Signature, CryptoError};

/// Secret key of an implicit account. Key material is wiped on drop.
#[derive(Clone, PartialEq, Eq)]
pub enum SecretKey {
    /// Ed25519 seed. The 64-byte `edsk` form is reduced to its seed.
    Ed25519(SeedEd25519),
    Secp256k1(SecretKeySecp256k1),
    P256(SecretKeyP256),
}

impl SecretKey {
    pub fn from_b58check_with<P: CryptoProvider + ?Sized>(
        provider: &P,
        data: &str,
    ) -> Result<Self, IdentifierError> {
        if data.starts_with(IdentifierKind::SeedEd25519.text_prefix()) {
            // Both ed25519 forms share the text prefix; the tag tells them apart.
            match SeedEd25519::from_b58check_with(provider, data) {
                Ok(seed) => Ok(SecretKey::Ed25519(seed)),
                Err(_) => SecretKeyEd25519::from_b58check_with(provider, data)
                    .map(|sk| SecretKey::Ed25519(sk.seed())),
            }
        } else if data.starts_with(IdentifierKind::SecretKeySecp256k1.text_prefix()) {
            Ok(SecretKey::Secp256k1(SecretKeySecp256k1::from_b58check_with(
                provider, data,
            )?))
        } else if data.starts_with(IdentifierKind::SecretKeyP256.text_prefix()) {
            Ok(SecretKey::P256(SecretKeyP256::from_b58check_with(
                provider, data,
            )?))
        } else {
            Err(IdentifierError::UnrecognizedIdentifier)
        }
    }

    pub fn from_b58check(data: &str) -> Result<Self, IdentifierError> {
        Self::from_b58check_with(&DefaultCryptoProvider, data)
    }

    pub fn to_b58check_with<P: CryptoProvider + ?Sized>(&self, provider: &P) -> String {
        match self {
            Self::Ed25519(sk) => sk.to_b58check_with(provider),
            Self::Secp256k1(sk) => sk.to_b58check_with(provider),
            Self::P256(sk) => sk.to_b58check_with(provider),
        }
    }

    pub fn to_b58check(&self) -> String {
        self.to_b58check_with(&DefaultCryptoProvider)
    }

    /// Public key matching this secret key.
    #[cfg(feature = "signing")]
    pub fn public_key(&self) -> Result<PublicKey, CryptoError> {
        use crate::hash::{PublicKeyEd25519, PublicKeyP256, PublicKeySecp256k1};

        match self {
            Self::Ed25519(seed) => {
                let sk = ed25519_dalek::SigningKey::from_bytes(seed);
                Ok(PublicKey::Ed25519(PublicKeyEd25519::from(
                    sk.verifying_key().to_bytes(),
                )))
            }
            Self::Secp256k1(sk) => {
                let sk = secp256k1_key(sk)?;
                let pk = libsecp256k1::PublicKey::from_secret_key(&sk);
                Ok(PublicKey::Secp256k1(PublicKeySecp256k1::from(
                    pk.serialize_compressed(),
                )))
            }
            Self::P256(sk) => {
                let sk = p256_key(sk)?;
                let point = sk.verifying_key().to_encoded_point(true);
                let pk = PublicKeyP256::try_from(point.as_bytes())
                    .map_err(|_| CryptoError::InvalidPublicKey)?;
                Ok(PublicKey::P256(pk))
            }
        }
    }

    /// Signs a 32-byte message digest.
    #[cfg(feature = "signing")]
    pub fn sign_digest(&self, digest: &[u8; 32]) -> Result<Signature, CryptoError> {
        use crate::hash::{Ed25519Signature, P256Signature, Secp256k1Signature};

        match self {
            Self::Ed25519(seed) => {
                use ed25519_dalek::Signer;

                let sk = ed25519_dalek::SigningKey::from_bytes(seed);
                let signature = sk.sign(digest);
                Ok(Signature::Ed25519(Ed25519Signature::from(
                    signature.to_bytes(),
                )))
            }
            Self::Secp256k1(sk) => {
                let sk = secp256k1_key(sk)?;
                let msg = libsecp256k1::Message::parse(digest);
                let (signature, _) = libsecp256k1::sign(&msg, &sk);
                Ok(Signature::Secp256k1(Secp256k1Signature::from(
                    signature.serialize(),
                )))
            }
            Self::P256(sk) => {
                use p256::ecdsa::signature::hazmat::PrehashSigner;

                let sk = p256_key(sk)?;
                let signature: p256::ecdsa::Signature = sk
                    .sign_prehash(digest)
                    .map_err(|e| CryptoError::AlgorithmError(e.to_string()))?;
                let mut bytes = [0; 64];
                bytes.copy_from_slice(&signature.to_bytes());
                Ok(Signature::P256(P256Signature::from(bytes)))
            }
        }
    }
}

#[cfg(feature = "signing")]
fn secp256k1_key(sk: &SecretKeySecp256k1) -> Result<libsecp256k1::SecretKey, CryptoError> {
    libsecp256k1::SecretKey::parse(sk).map_err(|e| CryptoError::InvalidKey {
        reason: format!("{e:?}"),
    })
}

#[cfg(feature = "signing")]
fn p256_key(sk: &SecretKeyP256) -> Result<p256::ecdsa::SigningKey, CryptoError> {
    p256::ecdsa::SigningKey::from_slice(sk.as_ref()).map_err(|e| CryptoError::InvalidKey {
        reason: e.to_string(),
    })
}

impl Drop for SecretKey {
    fn drop(&mut self) {
        match self {
            Self::Ed25519(sk) => sk.0.zeroize(),
            Self::Secp256k1(sk) => sk.0.zeroize(),
            Self::P256(sk) => sk.0.zeroize(),
        }
    }
}

impl fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let curve = match self {
            Self::Ed25519(_) => "Ed25519",
            Self::Secp256k1(_) => "Secp256k1",
            Self::P256(_) => "P256",
        };
        write!(f, "SecretKey::{curve}(..)")
    }
}

impl std::str::FromStr for SecretKey {
    type Err = IdentifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_b58check(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn b58check_roundtrip() -> Result<(), anyhow::Error> {
        for sk in [
            "edsk31vznjHSSpGExDMHYASz45VZqXN4DPxvsa4hAyY8dHM28cZzp6",
            "spsk1sheno8Jt8FoBEoamFoNBxUEpjEggNNpepTFc8cEoJBA9QjDJq",
            "p2sk2bixvFTFTuw9HtD4ucuDsktZTcwRJ5V3gDsQauwE2VTuh6hBiP",
        ] {
            assert_eq!(SecretKey::from_b58check(sk)?.to_b58check(), sk);
        }

        Ok(())
    }

    #[test]
    fn expanded_ed25519_key_is_reduced_to_seed() -> Result<(), anyhow::Error> {
        let seed = SeedEd25519::from_b58check("edsk31vznjHSSpGExDMHYASz45VZqXN4DPxvsa4hAyY8dHM28cZzp6")?;
        let mut expanded = [7u8; 64];
        expanded[..32].copy_from_slice(seed.as_ref());
        let expanded = SecretKeyEd25519::from(expanded).to_b58check();
        assert!(expanded.starts_with("edsk"));

        let sk = SecretKey::from_b58check(&expanded)?;
        assert_eq!(sk, SecretKey::Ed25519(seed));

        Ok(())
    }

    #[test]
    fn debug_hides_key_material() -> Result<(), anyhow::Error> {
        let sk = SecretKey::from_b58check("spsk1sheno8Jt8FoBEoamFoNBxUEpjEggNNpepTFc8cEoJBA9QjDJq")?;
        assert_eq!(format!("{sk:?}"), "SecretKey::Secp256k1(..)");

        Ok(())
    }

    #[test]
    fn unknown_prefix() {
        assert_eq!(
            SecretKey::from_b58check("tz1RjtZUVeLhADFHDL8UwDZA6vjWWhojpu5w"),
            Err(IdentifierError::UnrecognizedIdentifier)
        );
    }

    #[cfg(feature = "signing")]
    mod signing {
        use super::*;
        use crate::blake2b::digest_256;

        const KEYS: [(&str, &str); 3] = [
            (
                "edsk3vifWnPCr8jXyhnt1YLa5KeNYTPfHENDq9gxqAA8ERkvEigYMe",
                "edpkurrsBe7UjF59ciHHmBRnS76WHx3YNL9m7owYta6ticPrdP9DG4",
            ),
            (
                "spsk1sheno8Jt8FoBEoamFoNBxUEpjEggNNpepTFc8cEoJBA9QjDJq",
                "sppk7a2WEfU54QzcQZ2EMjihtcxLeRtNTVxHw4FW2e8W5kEJ8ZargSb",
            ),
            (
                "p2sk2bixvFTFTuw9HtD4ucuDsktZTcwRJ5V3gDsQauwE2VTuh6hBiP",
                "p2pk65p7HKSGvkMdeK5yckM2nmi59oGNw4ksqdcvwxxF3AV3hopkfGS",
            ),
        ];

        #[test]
        fn derives_public_key() -> Result<(), anyhow::Error> {
            for (sk, pk) in KEYS {
                let sk = SecretKey::from_b58check(sk)?;
                assert_eq!(sk.public_key()?.to_b58check(), pk);
            }

            Ok(())
        }

        #[test]
        fn sign_then_verify() -> Result<(), anyhow::Error> {
            let digest = digest_256(b"forged operation bytes");
            for (sk, _) in KEYS {
                let sk = SecretKey::from_b58check(sk)?;
                let signature = sk.sign_digest(&digest)?;
                let pk = sk.public_key()?;
                assert!(pk.verify_digest(&signature, &digest)?);
                assert!(!pk.verify_digest(&signature, &digest_256(b"other bytes"))?);
            }

            Ok(())
        }

        #[test]
        fn ed25519_signature_is_deterministic() -> Result<(), anyhow::Error> {
            let sk = SecretKey::from_b58check(KEYS[0].0)?;
            let signature = sk.sign_digest(&digest_256(b"hello, world"))?;
            assert_eq!(
                signature.to_b58check(),
                "edsigtoeXp3xFtGugwCTDSDuifQ9Ka81X4gXFoxRQ6Xao2Ryc3yioptrKMfNy5c9pHhbA9Xn3sYZdx2SPiCGTFXjjXx9xKCPDoq"
            );

            Ok(())
        }
    }
}
