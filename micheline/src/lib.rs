// SPDX-FileCopyrightText: [2023] Serokell <hi@serokell.io>
// SPDX-FileCopyrightText: 2024 TriliTech <contact@trili.tech>
//
// SPDX-License-Identifier: MIT
#![forbid(unsafe_code)]

//! Micheline expressions and their binary form.
//!
//! [`Micheline`] is an owned expression tree. Its raw binary encoding is
//! provided through [`BinWriter`](tezos_forge_encoding::enc::BinWriter) and
//! [`NomReader`](tezos_forge_encoding::nom::NomReader); [`pack`] adds the
//! type-directed conversions used by `PACK`, where addresses, keys,
//! signatures and timestamps given in their readable form are stored in
//! their optimized binary form.

use thiserror::Error;

use tezos_forge_crypto::{CryptoError, IdentifierError};
use tezos_forge_encoding::enc::BinError;
use tezos_forge_encoding::nom::error::{DecodeError, DecodeErrorKind};

pub mod annotations;
pub mod ast;
mod decode;
mod encode;
pub mod pack;
pub mod prim;

pub use annotations::{Annotation, Annotations};
pub use ast::Micheline;
pub use pack::{pack, pack_expression, script_expr_hash, unpack, unpack_expression};
pub use prim::Prim;

#[derive(Debug, Error)]
pub enum MichelineError {
    #[error("cannot decode expression: {0}")]
    Decode(#[from] DecodeError),
    #[error("cannot encode expression: {0}")]
    Encode(#[from] BinError),
    #[error("unknown primitive `{0}`")]
    UnknownPrimitive(String),
    #[error("invalid annotation {0:?}")]
    InvalidAnnotation(String),
    #[error("expected {expected}, found {found}")]
    SchemaMismatch { expected: String, found: String },
    #[error("invalid `{ty}` literal: {source}")]
    Identifier {
        ty: Prim,
        #[source]
        source: IdentifierError,
    },
    #[error("invalid `{ty}` literal: {reason}")]
    InvalidLiteral { ty: Prim, reason: String },
    #[error("packed data does not start with the 0x05 watermark")]
    MissingWatermark,
    #[error(transparent)]
    Crypto(#[from] CryptoError),
}

impl MichelineError {
    pub(crate) fn mismatch(expected: impl ToString, found: impl ToString) -> Self {
        Self::SchemaMismatch {
            expected: expected.to_string(),
            found: found.to_string(),
        }
    }

    /// Classification of the failure.
    pub fn kind(&self) -> DecodeErrorKind {
        match self {
            Self::Decode(e) => e.kind(),
            Self::UnknownPrimitive(_) => DecodeErrorKind::UnknownPrimitive,
            Self::SchemaMismatch { .. } => DecodeErrorKind::SchemaMismatch,
            Self::Identifier { source, .. } => source.kind(),
            Self::MissingWatermark => DecodeErrorKind::InvalidTag,
            Self::Encode(_)
            | Self::InvalidAnnotation(_)
            | Self::InvalidLiteral { .. }
            | Self::Crypto(_) => DecodeErrorKind::InvalidValue,
        }
    }
}
