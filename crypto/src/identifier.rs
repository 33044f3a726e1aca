// Copyright (c) SimpleStaking, Viable Systems and Tezedge Contributors
// SPDX-License-Identifier: MIT

//! Checksummed identifiers.
//!
//! Every identifier kind has one row in [`IDENTIFIER_TABLE`]: the text
//! prefix its base58 form starts with, the byte tag prepended before base58
//! encoding, and the fixed length of the raw payload.
//!
//! Three representations are supported:
//! - text: `base58(tag ++ payload ++ checksum)`, checksum being the first
//!   four bytes of a double SHA-256;
//! - tagged bytes: `tag ++ payload`, without checksum;
//! - bare bytes: `payload` alone, when the surrounding layout already fixes
//!   the kind.

use std::fmt;

use nom::bytes::complete::take;
use tezos_forge_encoding::nom::error::{DecodeError, DecodeErrorKind};
use tezos_forge_encoding::nom::NomResult;
use thiserror::Error;
use tracing::trace;

use crate::base58;
use crate::provider::{CryptoProvider, DefaultCryptoProvider};

/// Note: see Tezos ocaml lib_crypto/base58.ml
#[derive(
    Debug, Copy, Clone, PartialEq, Eq, Hash, strum_macros::AsRefStr, strum_macros::IntoStaticStr,
)]
pub enum IdentifierKind {
    BlockHash,
    OperationHash,
    OperationListHash,
    OperationListListHash,
    ProtocolHash,
    ContextHash,
    BlockMetadataHash,
    OperationMetadataHash,
    OperationMetadataListHash,
    OperationMetadataListListHash,
    ContractTz1Hash,
    ContractTz2Hash,
    ContractTz3Hash,
    ContractTz4Hash,
    ContractKt1Hash,
    BlindedPublicKeyHash,
    CryptoboxPublicKeyHash,
    SeedEd25519,
    PublicKeyEd25519,
    SecretKeySecp256k1,
    SecretKeyP256,
    EncryptedSecretKeyEd25519,
    EncryptedSecretKeySecp256k1,
    EncryptedSecretKeyP256,
    PublicKeySecp256k1,
    PublicKeyP256,
    Secp256k1Scalar,
    Secp256k1Element,
    SecretKeyEd25519,
    Ed25519Signature,
    Secp256k1Signature,
    P256Signature,
    UnknownSignature,
    ChainId,
    PublicKeyBls,
    SecretKeyBls,
    BlsSignature,
    ScriptExprHash,
    BlockPayloadHash,
    NonceHash,
    SmartRollupHash,
}

/// One row of the identifier table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdentifierSpec {
    pub kind: IdentifierKind,
    pub text_prefix: &'static str,
    pub tag: &'static [u8],
    pub len: usize,
}

const fn row(
    kind: IdentifierKind,
    text_prefix: &'static str,
    tag: &'static [u8],
    len: usize,
) -> IdentifierSpec {
    IdentifierSpec {
        kind,
        text_prefix,
        tag,
        len,
    }
}

/// Text decoding scans this table in order and keeps the first row whose
/// text prefix and byte tag both match, so the order is significant.
pub static IDENTIFIER_TABLE: &[IdentifierSpec] = TABLE;

const TABLE: &[IdentifierSpec] = {
    use IdentifierKind::*;
    &[
        row(BlockHash, "B", &[1, 52], 32),
        row(OperationHash, "o", &[5, 116], 32),
        row(OperationListHash, "Lo", &[133, 233], 32),
        row(OperationListListHash, "LLo", &[29, 159, 109], 32),
        row(ProtocolHash, "P", &[2, 170], 32),
        row(ContextHash, "Co", &[79, 199], 32),
        row(BlockMetadataHash, "bm", &[234, 249], 32),
        row(OperationMetadataHash, "r", &[5, 183], 32),
        row(OperationMetadataListHash, "Lr", &[134, 39], 32),
        row(OperationMetadataListListHash, "LLr", &[29, 159, 182], 32),
        row(ContractTz1Hash, "tz1", &[6, 161, 159], 20),
        row(ContractTz2Hash, "tz2", &[6, 161, 161], 20),
        row(ContractTz3Hash, "tz3", &[6, 161, 164], 20),
        row(ContractTz4Hash, "tz4", &[6, 161, 166], 20),
        row(ContractKt1Hash, "KT1", &[2, 90, 121], 20),
        row(BlindedPublicKeyHash, "btz1", &[1, 2, 49, 223], 20),
        row(CryptoboxPublicKeyHash, "id", &[153, 103], 16),
        row(SeedEd25519, "edsk", &[13, 15, 58, 7], 32),
        row(PublicKeyEd25519, "edpk", &[13, 15, 37, 217], 32),
        row(SecretKeySecp256k1, "spsk", &[17, 162, 224, 201], 32),
        row(SecretKeyP256, "p2sk", &[16, 81, 238, 189], 32),
        row(EncryptedSecretKeyEd25519, "edesk", &[7, 90, 60, 179, 41], 56),
        row(EncryptedSecretKeySecp256k1, "spesk", &[9, 237, 241, 174, 150], 56),
        row(EncryptedSecretKeyP256, "p2esk", &[9, 48, 57, 115, 171], 56),
        row(PublicKeySecp256k1, "sppk", &[3, 254, 226, 86], 33),
        row(PublicKeyP256, "p2pk", &[3, 178, 139, 127], 33),
        row(Secp256k1Scalar, "SSp", &[38, 248, 136], 33),
        row(Secp256k1Element, "GSp", &[5, 92, 0], 33),
        row(SecretKeyEd25519, "edsk", &[43, 246, 78, 7], 64),
        row(Ed25519Signature, "edsig", &[9, 245, 205, 134, 18], 64),
        row(Secp256k1Signature, "spsig1", &[13, 115, 101, 19, 63], 64),
        row(P256Signature, "p2sig", &[54, 240, 44, 52], 64),
        row(UnknownSignature, "sig", &[4, 130, 43], 64),
        row(ChainId, "Net", &[87, 82, 0], 4),
        row(PublicKeyBls, "BLpk", &[6, 149, 135, 204], 48),
        row(SecretKeyBls, "BLsk", &[3, 150, 192, 40], 32),
        row(BlsSignature, "BLsig", &[40, 171, 64, 207], 96),
        row(ScriptExprHash, "expr", &[13, 44, 64, 27], 32),
        row(BlockPayloadHash, "vh", &[1, 106, 242], 32),
        row(NonceHash, "nce", &[69, 220, 169], 32),
        row(SmartRollupHash, "sr1", &[6, 124, 117], 20),
    ]
};

impl IdentifierKind {
    /// Table row of this kind.
    pub const fn spec(self) -> &'static IdentifierSpec {
        let mut i = 0;
        while i < TABLE.len() {
            if TABLE[i].kind as u8 == self as u8 {
                return &TABLE[i];
            }
            i += 1;
        }
        panic!("identifier kind missing from the table")
    }

    /// Byte tag prepended before base58 encoding.
    #[inline]
    pub const fn base58check_prefix(self) -> &'static [u8] {
        self.spec().tag
    }

    /// Size of the raw payload in bytes.
    pub const fn size(self) -> usize {
        self.spec().len
    }

    pub const fn text_prefix(self) -> &'static str {
        self.spec().text_prefix
    }
}

impl fmt::Display for IdentifierKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

/// Possible errors for identifier decoding.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IdentifierError {
    /// No table row matches the text prefix or byte tag.
    #[error("unrecognized identifier")]
    UnrecognizedIdentifier,
    #[error("invalid checksum")]
    ChecksumMismatch,
    #[error("mismatched data length: expected {expected}, actual {actual}")]
    LengthMismatch { expected: usize, actual: usize },
    #[error("invalid base58")]
    InvalidBase58,
    /// The decoded text is shorter than a checksum.
    #[error("missing checksum")]
    MissingChecksum,
}

impl IdentifierError {
    pub fn kind(&self) -> DecodeErrorKind {
        match self {
            Self::UnrecognizedIdentifier => DecodeErrorKind::UnrecognizedIdentifier,
            Self::ChecksumMismatch | Self::MissingChecksum => DecodeErrorKind::ChecksumMismatch,
            Self::LengthMismatch { .. } => DecodeErrorKind::LengthMismatch,
            Self::InvalidBase58 => DecodeErrorKind::InvalidValue,
        }
    }
}

impl From<IdentifierError> for DecodeError {
    fn from(error: IdentifierError) -> Self {
        DecodeError::from_kind(error.kind()).with_detail(error.to_string())
    }
}

/// Identifier of a known kind with a payload of the right length.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identifier {
    kind: IdentifierKind,
    payload: Vec<u8>,
}

impl Identifier {
    pub fn new(kind: IdentifierKind, payload: impl Into<Vec<u8>>) -> Result<Self, IdentifierError> {
        let payload = payload.into();
        check_len(kind.size(), payload.len())?;
        Ok(Self { kind, payload })
    }

    /// Caller guarantees `payload.len() == kind.size()`.
    pub(crate) fn from_sized(kind: IdentifierKind, payload: Vec<u8>) -> Self {
        debug_assert_eq!(kind.size(), payload.len());
        Self { kind, payload }
    }

    pub fn kind(&self) -> IdentifierKind {
        self.kind
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    pub fn into_payload(self) -> Vec<u8> {
        self.payload
    }

    /// Base58check text, checksummed with `provider`.
    pub fn encode_to_text_with<P: CryptoProvider + ?Sized>(&self, provider: &P) -> String {
        base58::encode_tagged(provider, self.kind.base58check_prefix(), &self.payload)
    }

    pub fn encode_to_text(&self) -> String {
        self.encode_to_text_with(&DefaultCryptoProvider)
    }

    /// Decodes base58check text of any kind in the table.
    pub fn decode_from_text_with<P: CryptoProvider + ?Sized>(
        provider: &P,
        text: &str,
    ) -> Result<Self, IdentifierError> {
        let bytes = base58::from_base58check(provider, text)?;
        let spec = TABLE
            .iter()
            .find(|spec| text.starts_with(spec.text_prefix) && bytes.starts_with(spec.tag))
            .ok_or_else(|| {
                trace!(prefix = text.get(..4).unwrap_or(text), "no identifier kind matches");
                IdentifierError::UnrecognizedIdentifier
            })?;
        check_len(spec.tag.len() + spec.len, bytes.len())?;
        Ok(Self {
            kind: spec.kind,
            payload: bytes[spec.tag.len()..].to_vec(),
        })
    }

    pub fn decode_from_text(text: &str) -> Result<Self, IdentifierError> {
        Self::decode_from_text_with(&DefaultCryptoProvider, text)
    }

    /// Decodes base58check text that must be of the given kind.
    pub fn decode_from_text_as_with<P: CryptoProvider + ?Sized>(
        provider: &P,
        kind: IdentifierKind,
        text: &str,
    ) -> Result<Self, IdentifierError> {
        let bytes = base58::from_base58check(provider, text)?;
        let tag = kind.base58check_prefix();
        if !bytes.starts_with(tag) {
            return Err(IdentifierError::UnrecognizedIdentifier);
        }
        check_len(tag.len() + kind.size(), bytes.len())?;
        Ok(Self {
            kind,
            payload: bytes[tag.len()..].to_vec(),
        })
    }

    pub fn decode_from_text_as(kind: IdentifierKind, text: &str) -> Result<Self, IdentifierError> {
        Self::decode_from_text_as_with(&DefaultCryptoProvider, kind, text)
    }

    /// Wire bytes: `tag ++ payload` when `prefixed`, the bare payload
    /// otherwise.
    pub fn encode_to_bytes(&self, prefixed: bool) -> Vec<u8> {
        let tag: &[u8] = if prefixed {
            self.kind.base58check_prefix()
        } else {
            &[]
        };
        [tag, &self.payload[..]].concat()
    }

    /// Decodes tagged bytes, the kind being selected by the leading tag.
    pub fn decode_from_bytes(bytes: &[u8]) -> Result<Self, IdentifierError> {
        let spec = lookup_tag(bytes)?;
        check_len(spec.tag.len() + spec.len, bytes.len())?;
        Ok(Self {
            kind: spec.kind,
            payload: bytes[spec.tag.len()..].to_vec(),
        })
    }

    /// Decodes either the bare payload or `tag ++ payload` of a known kind.
    pub fn decode_from_bytes_as(kind: IdentifierKind, bytes: &[u8]) -> Result<Self, IdentifierError> {
        let tag = kind.base58check_prefix();
        let payload = if bytes.len() == kind.size() {
            bytes
        } else if bytes.starts_with(tag) {
            check_len(tag.len() + kind.size(), bytes.len())?;
            &bytes[tag.len()..]
        } else {
            return Err(IdentifierError::LengthMismatch {
                expected: kind.size(),
                actual: bytes.len(),
            });
        };
        Ok(Self {
            kind,
            payload: payload.to_vec(),
        })
    }

    /// Reads tagged bytes from the front of `input`.
    pub fn decode_consuming(input: &[u8]) -> NomResult<Self> {
        let spec = lookup_tag(input).map_err(|e| {
            nom::Err::Error(DecodeError::new(input, e.kind()).with_detail(e.to_string()))
        })?;
        let (rest, _) = take(spec.tag.len())(input)?;
        let (rest, payload) = take(spec.len)(rest)?;
        Ok((
            rest,
            Self {
                kind: spec.kind,
                payload: payload.to_vec(),
            },
        ))
    }

    /// Reads the bare payload of a kind fixed by the surrounding layout.
    pub fn decode_consuming_as<'a>(kind: IdentifierKind) -> impl Fn(&'a [u8]) -> NomResult<'a, Self> {
        move |input| {
            let (rest, payload) = take(kind.size())(input)?;
            Ok((
                rest,
                Self {
                    kind,
                    payload: payload.to_vec(),
                },
            ))
        }
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode_to_text())
    }
}

impl std::str::FromStr for Identifier {
    type Err = IdentifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::decode_from_text(s)
    }
}

fn lookup_tag(bytes: &[u8]) -> Result<&'static IdentifierSpec, IdentifierError> {
    TABLE
        .iter()
        .find(|spec| bytes.starts_with(spec.tag))
        .ok_or(IdentifierError::UnrecognizedIdentifier)
}

fn check_len(expected: usize, actual: usize) -> Result<(), IdentifierError> {
    if expected == actual {
        Ok(())
    } else {
        Err(IdentifierError::LengthMismatch { expected, actual })
    }
}
