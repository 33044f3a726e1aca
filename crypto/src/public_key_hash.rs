// SPDX-FileCopyrightText: 2022-2023 TriliTech <contact@trili.tech>
//
// SPDX-License-Identifier: MIT

//! Hash of implicit account ids.

use std::fmt::Display;

use serde::{Deserialize, Serialize};
use tezos_forge_encoding::enc::BinWriter;
use tezos_forge_encoding::nom::NomReader;

use crate::hash::{ContractTz1Hash, ContractTz2Hash, ContractTz3Hash, ContractTz4Hash};
use crate::identifier::{IdentifierError, IdentifierKind};
use crate::provider::{CryptoProvider, DefaultCryptoProvider};

/// Hash of implicit account ids. On the wire: one tag byte, then the
/// 20-byte hash.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, NomReader, BinWriter)]
#[encoding(tags = "u8")]
pub enum PublicKeyHash {
    /// Tz1-contract
    #[encoding(tag = 0)]
    Ed25519(ContractTz1Hash),
    /// Tz2-contract
    #[encoding(tag = 1)]
    Secp256k1(ContractTz2Hash),
    /// Tz3-contract
    #[encoding(tag = 2)]
    P256(ContractTz3Hash),
    /// Tz4-contract
    #[encoding(tag = 3)]
    Bls(ContractTz4Hash),
}

impl Display for PublicKeyHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ed25519(tz1) => write!(f, "{tz1}"),
            Self::Secp256k1(tz2) => write!(f, "{tz2}"),
            Self::P256(tz3) => write!(f, "{tz3}"),
            Self::Bls(tz4) => write!(f, "{tz4}"),
        }
    }
}

impl PublicKeyHash {
    /// Size of the underlying byte array.
    pub const SIZE: usize = ContractTz1Hash::SIZE;

    /// Size of the tagged binary form.
    pub const ENCODED_SIZE: usize = Self::SIZE + 1;

    pub fn from_b58check_with<P: CryptoProvider + ?Sized>(
        provider: &P,
        data: &str,
    ) -> Result<Self, IdentifierError> {
        let kind = [
            IdentifierKind::ContractTz1Hash,
            IdentifierKind::ContractTz2Hash,
            IdentifierKind::ContractTz3Hash,
            IdentifierKind::ContractTz4Hash,
        ]
        .into_iter()
        .find(|kind| data.starts_with(kind.text_prefix()))
        .ok_or(IdentifierError::UnrecognizedIdentifier)?;

        match kind {
            IdentifierKind::ContractTz1Hash => Ok(PublicKeyHash::Ed25519(
                ContractTz1Hash::from_b58check_with(provider, data)?,
            )),
            IdentifierKind::ContractTz2Hash => Ok(PublicKeyHash::Secp256k1(
                ContractTz2Hash::from_b58check_with(provider, data)?,
            )),
            IdentifierKind::ContractTz3Hash => Ok(PublicKeyHash::P256(
                ContractTz3Hash::from_b58check_with(provider, data)?,
            )),
            _ => Ok(PublicKeyHash::Bls(ContractTz4Hash::from_b58check_with(
                provider, data,
            )?)),
        }
    }

    /// Conversion from base58-encoding string (with prefix).
    pub fn from_b58check(data: &str) -> Result<Self, IdentifierError> {
        Self::from_b58check_with(&DefaultCryptoProvider, data)
    }

    pub fn to_b58check_with<P: CryptoProvider + ?Sized>(&self, provider: &P) -> String {
        match self {
            Self::Ed25519(tz1) => tz1.to_b58check_with(provider),
            Self::Secp256k1(tz2) => tz2.to_b58check_with(provider),
            Self::P256(tz3) => tz3.to_b58check_with(provider),
            Self::Bls(tz4) => tz4.to_b58check_with(provider),
        }
    }

    /// Conversion to base58-encoding string (with prefix).
    pub fn to_b58check(&self) -> String {
        self.to_b58check_with(&DefaultCryptoProvider)
    }
}

impl From<PublicKeyHash> for [u8; PublicKeyHash::SIZE] {
    fn from(pkh: PublicKeyHash) -> Self {
        match pkh {
            PublicKeyHash::Ed25519(tz1) => tz1.into(),
            PublicKeyHash::Secp256k1(tz2) => tz2.into(),
            PublicKeyHash::P256(tz3) => tz3.into(),
            PublicKeyHash::Bls(tz4) => tz4.into(),
        }
    }
}

impl From<PublicKeyHash> for Vec<u8> {
    fn from(pkh: PublicKeyHash) -> Self {
        match pkh {
            PublicKeyHash::Ed25519(tz1) => tz1.into(),
            PublicKeyHash::Secp256k1(tz2) => tz2.into(),
            PublicKeyHash::P256(tz3) => tz3.into(),
            PublicKeyHash::Bls(tz4) => tz4.into(),
        }
    }
}

impl TryFrom<&str> for PublicKeyHash {
    type Error = IdentifierError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::from_b58check(value)
    }
}

impl std::str::FromStr for PublicKeyHash {
    type Err = IdentifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_b58check(s)
    }
}

impl Serialize for PublicKeyHash {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_b58check())
    }
}

impl<'de> Deserialize<'de> for PublicKeyHash {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_b58check(&s).map_err(serde::de::Error::custom)
    }
}
