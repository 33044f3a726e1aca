// SPDX-FileCopyrightText: 2023-2024 Trilitech <contact@trili.tech>
// Copyright (c) SimpleStaking, Viable Systems and Tezedge Contributors
//
// SPDX-License-Identifier: MIT

//! Signatures, as found at the end of a signed operation.
//!
//! The curve is only known from the text form (`edsig`, `spsig1`, `p2sig`,
//! `BLsig`). The binary form of operation signatures is 64 bare bytes, read
//! back as [`Signature::Unknown`].

use tezos_forge_encoding::enc::{self, BinResult, BinWriter};
use tezos_forge_encoding::nom::{NomReader, NomResult};
use thiserror::Error;

use crate::hash::{
    BlsSignature, Ed25519Signature, HashTrait, P256Signature, Secp256k1Signature,
    UnknownSignature,
};
use crate::identifier::{Identifier, IdentifierError, IdentifierKind};
use crate::provider::{CryptoProvider, DefaultCryptoProvider};

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Signature {
    Ed25519(Ed25519Signature),
    Secp256k1(Secp256k1Signature),
    P256(P256Signature),
    Bls(BlsSignature),
    Unknown(UnknownSignature),
}

impl Signature {
    pub fn from_b58check_with<P: CryptoProvider + ?Sized>(
        provider: &P,
        data: &str,
    ) -> Result<Self, IdentifierError> {
        let id = Identifier::decode_from_text_with(provider, data)?;
        let payload = id.payload();
        Ok(match id.kind() {
            IdentifierKind::Ed25519Signature => {
                Self::Ed25519(Ed25519Signature::try_from_bytes(payload)?)
            }
            IdentifierKind::Secp256k1Signature => {
                Self::Secp256k1(Secp256k1Signature::try_from_bytes(payload)?)
            }
            IdentifierKind::P256Signature => Self::P256(P256Signature::try_from_bytes(payload)?),
            IdentifierKind::BlsSignature => Self::Bls(BlsSignature::try_from_bytes(payload)?),
            IdentifierKind::UnknownSignature => {
                Self::Unknown(UnknownSignature::try_from_bytes(payload)?)
            }
            _ => return Err(IdentifierError::UnrecognizedIdentifier),
        })
    }

    pub fn to_b58check_with<P: CryptoProvider + ?Sized>(&self, provider: &P) -> String {
        match self {
            Self::Ed25519(s) => s.to_b58check_with(provider),
            Self::Secp256k1(s) => s.to_b58check_with(provider),
            Self::P256(s) => s.to_b58check_with(provider),
            Self::Bls(s) => s.to_b58check_with(provider),
            Self::Unknown(s) => s.to_b58check_with(provider),
        }
    }

    pub fn from_b58check(data: &str) -> Result<Self, IdentifierError> {
        Self::from_b58check_with(&DefaultCryptoProvider, data)
    }

    pub fn to_b58check(&self) -> String {
        self.to_b58check_with(&DefaultCryptoProvider)
    }

    pub fn kind(&self) -> IdentifierKind {
        match self {
            Self::Ed25519(_) => IdentifierKind::Ed25519Signature,
            Self::Secp256k1(_) => IdentifierKind::Secp256k1Signature,
            Self::P256(_) => IdentifierKind::P256Signature,
            Self::Bls(_) => IdentifierKind::BlsSignature,
            Self::Unknown(_) => IdentifierKind::UnknownSignature,
        }
    }
}

impl AsRef<[u8]> for Signature {
    fn as_ref(&self) -> &[u8] {
        match self {
            Self::Ed25519(s) => s.as_ref(),
            Self::Secp256k1(s) => s.as_ref(),
            Self::P256(s) => s.as_ref(),
            Self::Bls(s) => s.as_ref(),
            Self::Unknown(s) => s.as_ref(),
        }
    }
}

/// 96 bytes make a BLS signature, 64 bytes a signature of unknown curve.
impl TryFrom<&[u8]> for Signature {
    type Error = IdentifierError;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        if bytes.len() == BlsSignature::hash_size() {
            Ok(Self::Bls(BlsSignature::try_from_bytes(bytes)?))
        } else {
            Ok(Self::Unknown(UnknownSignature::try_from_bytes(bytes)?))
        }
    }
}

impl std::str::FromStr for Signature {
    type Err = IdentifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_b58check(s)
    }
}

impl std::fmt::Display for Signature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_b58check())
    }
}

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum TryFromSignatureError {
    #[error("expected a {expected:?}, found a {found:?}")]
    InvalidKind {
        expected: IdentifierKind,
        found: IdentifierKind,
    },
}

/// A 64-byte signature of unknown curve converts to any curve; a signature
/// of a known curve only to itself.
macro_rules! curve_signature {
    ($sig:ident, $variant:ident) => {
        impl TryFrom<Signature> for $sig {
            type Error = TryFromSignatureError;

            fn try_from(s: Signature) -> Result<Self, Self::Error> {
                match s {
                    Signature::$variant(s) => Ok(s),
                    Signature::Unknown(s) => Ok(s.into()),
                    s => Err(TryFromSignatureError::InvalidKind {
                        expected: IdentifierKind::$sig,
                        found: s.kind(),
                    }),
                }
            }
        }
    };
}
curve_signature!(Ed25519Signature, Ed25519);
curve_signature!(Secp256k1Signature, Secp256k1);
curve_signature!(P256Signature, P256);

/// The 64-byte form written into signed operations.
impl TryFrom<Signature> for UnknownSignature {
    type Error = TryFromSignatureError;

    fn try_from(s: Signature) -> Result<Self, Self::Error> {
        match s {
            Signature::Ed25519(s) => Ok(s.into()),
            Signature::Secp256k1(s) => Ok(s.into()),
            Signature::P256(s) => Ok(s.into()),
            Signature::Unknown(s) => Ok(s),
            Signature::Bls(_) => Err(TryFromSignatureError::InvalidKind {
                expected: IdentifierKind::UnknownSignature,
                found: IdentifierKind::BlsSignature,
            }),
        }
    }
}

impl BinWriter for Signature {
    fn bin_write(&self, out: &mut Vec<u8>) -> BinResult {
        enc::put_bytes(self.as_ref(), out);
        Ok(())
    }
}

impl<'a> NomReader<'a> for Signature {
    fn nom_read(input: &'a [u8]) -> NomResult<'a, Self> {
        let (rest, sig) = UnknownSignature::nom_read(input)?;
        Ok((rest, Self::Unknown(sig)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EDSIG: &str = "edsigtoeXp3xFtGugwCTDSDuifQ9Ka81X4gXFoxRQ6Xao2Ryc3yioptrKMfNy5c9pHhbA9Xn3sYZdx2SPiCGTFXjjXx9xKCPDoq";

    #[test]
    fn ed25519_text_roundtrip() -> Result<(), anyhow::Error> {
        let sig: Signature = EDSIG.parse()?;
        assert_eq!(sig.kind(), IdentifierKind::Ed25519Signature);
        assert_eq!(sig.to_string(), EDSIG);

        Ok(())
    }

    #[test]
    fn zero_unknown_signature() -> Result<(), anyhow::Error> {
        let sig = Signature::try_from(&[0u8; 64][..])?;
        let text = "sigMzJ4GVAvXEd2RjsKGfG2H9QvqTSKCZsuB2KiHbZRGFz72XgF6KaKADznh674fQgBatxw3xdHqTtMHUZAGRprxy64wg1aq";
        assert_eq!(sig.to_b58check(), text);
        assert_eq!(Signature::from_b58check(text)?, sig);

        Ok(())
    }

    #[test]
    fn not_a_signature() {
        assert_eq!(
            Signature::from_b58check("tz1NyAf1KeeFCCPPAZ9ard9YVshVGFibzVKa"),
            Err(IdentifierError::UnrecognizedIdentifier)
        );
    }

    #[test]
    fn binary_is_bare() -> Result<(), anyhow::Error> {
        let sig = Signature::from_b58check(EDSIG)?;
        let bytes = sig.to_bytes()?;
        assert_eq!(bytes.len(), 64);

        let read = Signature::from_bytes(&bytes)?;
        assert_eq!(read.kind(), IdentifierKind::UnknownSignature);
        assert_eq!(Ed25519Signature::try_from(read)?, Ed25519Signature::try_from(sig)?);

        Ok(())
    }

    #[test]
    fn curves_do_not_mix() -> Result<(), anyhow::Error> {
        let ed25519 = Signature::from_b58check(EDSIG)?;
        assert_eq!(
            P256Signature::try_from(ed25519),
            Err(TryFromSignatureError::InvalidKind {
                expected: IdentifierKind::P256Signature,
                found: IdentifierKind::Ed25519Signature,
            })
        );

        let bls = Signature::Bls(BlsSignature([1; 96]));
        assert!(UnknownSignature::try_from(bls).is_err());

        Ok(())
    }

    #[test]
    fn wrong_length_is_rejected() {
        assert_eq!(
            Signature::try_from(&[0u8; 63][..]),
            Err(IdentifierError::LengthMismatch {
                expected: 64,
                actual: 63
            })
        );
    }
}
