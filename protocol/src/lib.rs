// SPDX-FileCopyrightText: 2025 Functori <contact@functori.com>
// SPDX-FileCopyrightText: 2024 TriliTech <contact@trili.tech>
//
// SPDX-License-Identifier: MIT
#![forbid(unsafe_code)]

//! Tezos operations and their binary form.
//!
//! [`operation::OperationContent`] is the tagged union of the sixteen
//! content kinds. [`forge::UnsignedOperation`] and
//! [`forge::SignedOperation`] are the envelopes that get forged, signed,
//! hashed and injected.

use thiserror::Error;

use tezos_forge_crypto::CryptoError;
use tezos_forge_encoding::enc::BinError;
use tezos_forge_encoding::nom::error::{DecodeError, DecodeErrorKind};

pub mod block_header;
pub mod consensus;
pub mod entrypoint;
pub mod forge;
pub mod operation;

pub use entrypoint::{Entrypoint, EntrypointName};
pub use forge::{SignedOperation, UnsignedOperation};
pub use operation::{OperationContent, OperationKind};

#[derive(Debug, Error)]
pub enum ForgeError {
    #[error("cannot decode operation: {0}")]
    Decode(#[from] DecodeError),
    #[error("cannot encode operation: {0}")]
    Encode(#[from] BinError),
    #[error("invalid hex input: {0}")]
    Hex(#[from] hex::FromHexError),
    #[error(transparent)]
    Crypto(#[from] CryptoError),
}

impl ForgeError {
    /// Classification of a decoding failure. `None` for failures that are
    /// not about the input bytes.
    pub fn kind(&self) -> Option<DecodeErrorKind> {
        match self {
            ForgeError::Decode(e) => Some(e.kind()),
            ForgeError::Hex(_) => Some(DecodeErrorKind::InvalidValue),
            ForgeError::Encode(_) | ForgeError::Crypto(_) => None,
        }
    }
}
