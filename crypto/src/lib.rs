// Copyright (c) SimpleStaking, Viable Systems and Tezedge Contributors
// SPDX-CopyrightText: 2023-2024 TriliTech <contact@trili.tech>
// SPDX-CopyrightText: 2023 Nomadic Labs <contact@nomadic-labs.com>
//
// SPDX-License-Identifier: MIT
#![forbid(unsafe_code)]

//! Tezos identifiers, keys and signatures.
//!
//! [`identifier`] holds the table of checksummed identifier kinds and the
//! generic codec. [`hash`] builds one typed wrapper per kind on top of it,
//! and the tagged protocol unions ([`public_key_hash::PublicKeyHash`],
//! [`public_key::PublicKey`], [`contract::Contract`], ...) combine those
//! wrappers the way operations and Michelson values embed them.

use thiserror::Error;

pub mod base58;
pub mod blake2b;
pub mod contract;
pub mod hash;
pub mod identifier;
pub mod provider;
pub mod public_key;
pub mod public_key_hash;
pub mod secret_key;
pub mod signature;

pub use contract::{Address, AddressError, Contract};
pub use identifier::{Identifier, IdentifierError, IdentifierKind};
pub use provider::{CryptoProvider, DefaultCryptoProvider};
pub use public_key::PublicKey;
pub use public_key_hash::PublicKeyHash;
pub use secret_key::SecretKey;
pub use signature::Signature;

#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("Invalid crypto key, reason: {reason}")]
    InvalidKey { reason: String },
    #[error("Invalid crypto key size - expected: {expected}, actual: {actual}")]
    InvalidKeySize { expected: usize, actual: usize },
    #[error("Invalid digest size - expected: {expected}, actual: {actual}")]
    InvalidDigestSize { expected: usize, actual: usize },
    #[error("Failed to construct public key")]
    InvalidPublicKey,
    #[error("Failed to construct signature")]
    InvalidSignature,
    #[error("Failed to construct message")]
    InvalidMessage,
    #[error("Unsupported algorithm `{0}`")]
    Unsupported(&'static str),
    #[error("Algorithm error: `{0}`")]
    AlgorithmError(String),
    #[error("Blake2b digest error: {0}")]
    Blake2b(#[from] blake2b::Blake2bError),
    #[error("Incorrect signature type: {0}")]
    SignatureType(#[from] signature::TryFromSignatureError),
}

/// Public key that support hashing.
pub trait PublicKeyWithHash {
    type Hash;

    fn pk_hash(&self) -> Self::Hash;
}
