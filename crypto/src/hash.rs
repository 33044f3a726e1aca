// Copyright (c) SimpleStaking, Viable Systems and Tezedge Contributors
// SPDX-CopyrightText: 2022-2024 Trilitech <contact@trili.tech>
// SPDX-License-Identifier: MIT

//! One fixed-size wrapper type per identifier kind.

use std::convert::{TryFrom, TryInto};

use serde::{Deserialize, Serialize};

use crate::identifier::{Identifier, IdentifierError, IdentifierKind};
use crate::provider::{CryptoProvider, DefaultCryptoProvider};
use crate::{base58, blake2b, PublicKeyWithHash};

mod encoding;

pub trait HashTrait<const N: usize>:
    Into<Vec<u8>> + Into<[u8; N]> + AsRef<[u8]> + std::ops::Deref<Target = [u8; N]> + From<[u8; N]>
{
    /// Returns this hash type.
    fn hash_type() -> IdentifierKind;

    /// Returns the size of this hash.
    fn hash_size() -> usize {
        Self::hash_type().size()
    }

    /// Tries to create this hash from the `bytes`.
    fn try_from_bytes(bytes: &[u8]) -> Result<Self, IdentifierError>;

    fn from_b58check(data: &str) -> Result<Self, IdentifierError>;

    fn to_b58check(&self) -> String;
}

macro_rules! define_hash {
    ($name:ident) => {
        #[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(pub(crate) [u8; { IdentifierKind::$name.size() }]);

        impl $name {
            pub const SIZE: usize = IdentifierKind::$name.size();

            fn from_slice(data: &[u8]) -> Result<Self, IdentifierError> {
                data.try_into()
                    .map($name)
                    .map_err(|_| IdentifierError::LengthMismatch {
                        expected: Self::SIZE,
                        actual: data.len(),
                    })
            }

            pub fn from_b58check_with<P: CryptoProvider + ?Sized>(
                provider: &P,
                data: &str,
            ) -> Result<Self, IdentifierError> {
                let id = Identifier::decode_from_text_as_with(provider, IdentifierKind::$name, data)?;
                Self::from_slice(id.payload())
            }

            pub fn to_b58check_with<P: CryptoProvider + ?Sized>(&self, provider: &P) -> String {
                base58::encode_tagged(
                    provider,
                    IdentifierKind::$name.base58check_prefix(),
                    &self.0,
                )
            }

            pub fn from_b58check(data: &str) -> Result<Self, IdentifierError> {
                Self::from_b58check_with(&DefaultCryptoProvider, data)
            }

            pub fn to_b58check(&self) -> String {
                self.to_b58check_with(&DefaultCryptoProvider)
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.to_b58check())
            }
        }

        impl ::std::fmt::Debug for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.debug_tuple(stringify!($name))
                    .field(&self.to_b58check())
                    .finish()
            }
        }

        impl std::str::FromStr for $name {
            type Err = IdentifierError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::from_b58check(s)
            }
        }

        impl HashTrait<{ IdentifierKind::$name.size() }> for $name {
            fn hash_type() -> IdentifierKind {
                IdentifierKind::$name
            }

            fn try_from_bytes(bytes: &[u8]) -> Result<Self, IdentifierError> {
                Self::from_slice(bytes)
            }

            fn from_b58check(data: &str) -> Result<Self, IdentifierError> {
                $name::from_b58check(data)
            }

            fn to_b58check(&self) -> String {
                $name::to_b58check(self)
            }
        }

        impl std::ops::Deref for $name {
            type Target = [u8; { IdentifierKind::$name.size() }];

            fn deref(&self) -> &Self::Target {
                &self.0
            }
        }

        impl std::convert::AsRef<[u8]> for $name {
            fn as_ref(&self) -> &[u8] {
                &self.0
            }
        }

        impl std::convert::From<$name> for [u8; { IdentifierKind::$name.size() }] {
            fn from(typed_hash: $name) -> Self {
                typed_hash.0
            }
        }

        impl std::convert::From<$name> for Vec<u8> {
            fn from(typed_hash: $name) -> Self {
                typed_hash.0.to_vec()
            }
        }

        impl std::convert::From<[u8; { IdentifierKind::$name.size() }]> for $name {
            fn from(h: [u8; { IdentifierKind::$name.size() }]) -> Self {
                $name(h)
            }
        }

        impl std::convert::TryFrom<&[u8]> for $name {
            type Error = IdentifierError;
            fn try_from(h: &[u8]) -> Result<Self, Self::Error> {
                Self::from_slice(h)
            }
        }

        impl std::convert::TryFrom<Vec<u8>> for $name {
            type Error = IdentifierError;
            fn try_from(h: Vec<u8>) -> Result<Self, Self::Error> {
                Self::from_slice(&h)
            }
        }

        impl std::convert::TryFrom<&str> for $name {
            type Error = IdentifierError;
            fn try_from(encoded: &str) -> Result<Self, Self::Error> {
                Self::from_b58check(encoded)
            }
        }

        impl std::convert::From<$name> for Identifier {
            fn from(typed_hash: $name) -> Self {
                Identifier::from_sized(IdentifierKind::$name, typed_hash.0.to_vec())
            }
        }

        impl std::convert::TryFrom<Identifier> for $name {
            type Error = IdentifierError;
            fn try_from(id: Identifier) -> Result<Self, Self::Error> {
                if id.kind() == IdentifierKind::$name {
                    Self::from_slice(id.payload())
                } else {
                    Err(IdentifierError::UnrecognizedIdentifier)
                }
            }
        }

        impl Serialize for $name {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: serde::Serializer,
            {
                if serializer.is_human_readable() {
                    serializer.serialize_str(&self.to_b58check())
                } else {
                    self.0.to_vec().serialize(serializer)
                }
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::de::Deserializer<'de>,
            {
                if deserializer.is_human_readable() {
                    let s = String::deserialize(deserializer)?;
                    Self::from_b58check(&s).map_err(serde::de::Error::custom)
                } else {
                    let bytes = Vec::<u8>::deserialize(deserializer)?;
                    Self::try_from(bytes).map_err(serde::de::Error::custom)
                }
            }
        }
    };
}

define_hash!(BlockHash);
define_hash!(OperationHash);
define_hash!(OperationListHash);
define_hash!(OperationListListHash);
define_hash!(ProtocolHash);
define_hash!(ContextHash);
define_hash!(BlockMetadataHash);
define_hash!(OperationMetadataHash);
define_hash!(OperationMetadataListHash);
define_hash!(OperationMetadataListListHash);
define_hash!(ContractTz1Hash);
define_hash!(ContractTz2Hash);
define_hash!(ContractTz3Hash);
define_hash!(ContractTz4Hash);
define_hash!(ContractKt1Hash);
define_hash!(BlindedPublicKeyHash);
define_hash!(CryptoboxPublicKeyHash);
define_hash!(SeedEd25519);
define_hash!(PublicKeyEd25519);
define_hash!(SecretKeySecp256k1);
define_hash!(SecretKeyP256);
define_hash!(EncryptedSecretKeyEd25519);
define_hash!(EncryptedSecretKeySecp256k1);
define_hash!(EncryptedSecretKeyP256);
define_hash!(PublicKeySecp256k1);
define_hash!(PublicKeyP256);
define_hash!(Secp256k1Scalar);
define_hash!(Secp256k1Element);
define_hash!(SecretKeyEd25519);
define_hash!(Ed25519Signature);
define_hash!(Secp256k1Signature);
define_hash!(P256Signature);
define_hash!(UnknownSignature);
define_hash!(ChainId);
define_hash!(PublicKeyBls);
define_hash!(SecretKeyBls);
define_hash!(BlsSignature);
define_hash!(ScriptExprHash);
define_hash!(BlockPayloadHash);
define_hash!(NonceHash);
define_hash!(SmartRollupHash);

macro_rules! unknown_sig {
    ($sig:ident) => {
        impl From<$sig> for UnknownSignature {
            fn from($sig(s): $sig) -> Self {
                UnknownSignature(s)
            }
        }

        impl From<UnknownSignature> for $sig {
            fn from(UnknownSignature(s): UnknownSignature) -> $sig {
                $sig(s)
            }
        }
    };
}
unknown_sig!(Ed25519Signature);
unknown_sig!(Secp256k1Signature);
unknown_sig!(P256Signature);

macro_rules! pk_with_hash {
    ($pk:ident, $pkh:ident) => {
        impl PublicKeyWithHash for $pk {
            type Hash = $pkh;

            fn pk_hash(&self) -> Self::Hash {
                $pkh(blake2b::digest_160(&self.0))
            }
        }

        impl From<$pk> for $pkh {
            fn from(source: $pk) -> Self {
                source.pk_hash()
            }
        }
    };
}

pk_with_hash!(PublicKeyEd25519, ContractTz1Hash);
pk_with_hash!(PublicKeySecp256k1, ContractTz2Hash);
pk_with_hash!(PublicKeyP256, ContractTz3Hash);
pk_with_hash!(PublicKeyBls, ContractTz4Hash);

impl SecretKeyEd25519 {
    /// The 32-byte seed this expanded key starts with.
    pub fn seed(&self) -> SeedEd25519 {
        let mut seed = [0; 32];
        seed.copy_from_slice(&self.0[..32]);
        SeedEd25519(seed)
    }
}

impl OperationHash {
    /// Hash of the signed bytes of an operation.
    pub fn digest<P: CryptoProvider + ?Sized>(
        provider: &P,
        bytes: &[u8],
    ) -> Result<Self, crate::CryptoError> {
        provider.blake2b_256(bytes).map(OperationHash)
    }
}

impl ScriptExprHash {
    /// Hash of a packed Michelson expression.
    pub fn digest<P: CryptoProvider + ?Sized>(
        provider: &P,
        packed: &[u8],
    ) -> Result<Self, crate::CryptoError> {
        provider.blake2b_256(packed).map(ScriptExprHash)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chain_id_to_b58_string() -> Result<(), anyhow::Error> {
        let encoded = ChainId::try_from(hex::decode("8eceda2f")?)?.to_b58check();
        assert_eq!("NetXgtSLGNJvNye", encoded);

        Ok(())
    }

    #[test]
    fn test_encode_block_header_genesis() -> Result<(), anyhow::Error> {
        let encoded = BlockHash::try_from(hex::decode(
            "8fcf233671b6a04fcf679d2a381c2544ea6c1ea29ba6157776ed8424affa610d",
        )?)?
        .to_b58check();
        assert_eq!("BLockGenesisGenesisGenesisGenesisGenesisb83baZgbyZe", encoded);

        Ok(())
    }

    #[test]
    fn test_encode_context() -> Result<(), anyhow::Error> {
        let encoded = ContextHash::try_from(hex::decode(
            "934484026d24be9ad40c98341c20e51092dd62bbf470bb9ff85061fa981ebbd9",
        )?)?
        .to_b58check();
        assert_eq!("CoVmAcMV64uAQo8XvfLr9VDuz7HVZLT4cgK1w1qYmTjQNbGwQwDd", encoded);

        Ok(())
    }

    #[test]
    fn test_encode_contracts() -> Result<(), anyhow::Error> {
        let tz1 = ContractTz1Hash::try_from(hex::decode("83846eddd5d3c5ed96e962506253958649c84a74")?)?;
        assert_eq!("tz1XdRrrqrMfsFKA8iuw53xHzug9ipr6MuHq", tz1.to_b58check());

        let tz2 = ContractTz2Hash::try_from(hex::decode("2fcb1d9307f0b1f94c048ff586c09f46614c7e90")?)?;
        assert_eq!("tz2Cfwk4ortcaqAGcVJKSxLiAdcFxXBLBoyY", tz2.to_b58check());

        let tz3 = ContractTz3Hash::try_from(hex::decode("193b2b3f6b8f8e1e6b39b4d442fc2b432f6427a8")?)?;
        assert_eq!("tz3NdTPb3Ax2rVW2Kq9QEdzfYFkRwhrQRPhX", tz3.to_b58check());

        let kt1 = ContractKt1Hash::try_from(hex::decode("42b419240509ddacd12839700b7f720b4aa55e4e")?)?;
        assert_eq!("KT1EfTusMLoeCAAGd9MZJn5yKzFr6kJU5U91", kt1.to_b58check());

        Ok(())
    }

    #[test]
    fn test_decode_protocol_hash() -> Result<(), anyhow::Error> {
        let decoded =
            ProtocolHash::from_b58check("PsCARTHAGazKbHtnKfLzQg3kms52kSRpgnDY982a9oYsSXRLQEb")?;
        assert_eq!(
            "3e5e3a606afab74a59ca09e333633e2770b6492c5e594455b71e9a2f0ea92afb",
            hex::encode(decoded.as_ref())
        );

        Ok(())
    }

    #[test]
    fn test_decode_operations_hash() -> Result<(), anyhow::Error> {
        let decoded = OperationListListHash::from_b58check(
            "LLoaGLRPRx3Zf8kB4ACtgku8F4feeBiskeb41J1ciwfcXB3KzHKXc",
        )?;
        assert_eq!(
            "7c09f7c4d76ace86e1a7e1c7dc0a0c7edcaa8b284949320081131976a87760c3",
            hex::encode(decoded.as_ref())
        );

        Ok(())
    }

    #[test]
    fn test_generic_signature() -> Result<(), anyhow::Error> {
        let encoded = "sigbQ5ZNvkjvGssJgoAnUAfY4Wvvg3QZqawBYB1j1VDBNTMBAALnCzRHWzer34bnfmzgHg3EvwdzQKdxgSghB897cono6gbQ";
        let decoded = UnknownSignature::from_b58check(encoded)?;
        assert_eq!(
            "66804fe735e06e97e26da8236b6341b91c625d5e82b3524ec0a88cc982365e70f8a5b9bc65df2ea6d21ee244cc3a96fb33031c394c78b1179ff1b8a44237740c",
            hex::encode(decoded.as_ref())
        );
        assert_eq!(encoded, decoded.to_b58check());

        Ok(())
    }

    #[test]
    fn wrong_kind_is_rejected() {
        let h = ContractTz1Hash::from_b58check("tz4FENGt5zkiGaHPm1ya4MgLomgkL1k7Dy7q");
        assert_eq!(h, Err(IdentifierError::UnrecognizedIdentifier));

        let h = ContractTz4Hash::from_b58check("tz1ei4WtWEMEJekSv8qDnu9PExG6Q8HgRGr3");
        assert_eq!(h, Err(IdentifierError::UnrecognizedIdentifier));
    }

    #[test]
    fn wrong_size_is_rejected() {
        assert_eq!(
            ChainId::try_from(&[0u8; 5][..]),
            Err(IdentifierError::LengthMismatch {
                expected: 4,
                actual: 5
            })
        );
    }

    #[test]
    fn identifier_conversions() -> Result<(), anyhow::Error> {
        let block = BlockHash::from_b58check("BLockGenesisGenesisGenesisGenesisGenesisb83baZgbyZe")?;
        let id = Identifier::from(block.clone());
        assert_eq!(id.kind(), IdentifierKind::BlockHash);
        assert_eq!(BlockHash::try_from(id.clone())?, block);
        assert!(ContextHash::try_from(id).is_err());

        Ok(())
    }

    #[test]
    fn serde_json_uses_base58() -> Result<(), anyhow::Error> {
        let chain_id = ChainId::from_b58check("NetXgtSLGNJvNye")?;
        let json = serde_json::to_string(&chain_id)?;
        assert_eq!(json, "\"NetXgtSLGNJvNye\"");
        assert_eq!(serde_json::from_str::<ChainId>(&json)?, chain_id);

        Ok(())
    }

    #[test]
    fn debug_shows_base58() -> Result<(), anyhow::Error> {
        let chain_id = ChainId::from_b58check("NetXgtSLGNJvNye")?;
        assert_eq!(format!("{chain_id:?}"), "ChainId(\"NetXgtSLGNJvNye\")");

        Ok(())
    }
}
