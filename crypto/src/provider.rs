// SPDX-FileCopyrightText: 2023-2024 TriliTech <contact@trili.tech>
// Copyright (c) SimpleStaking, Viable Systems and Tezedge Contributors
//
// SPDX-License-Identifier: MIT

//! Hashing and signing backend.
//!
//! The codecs never reach for a global hasher: everything that needs a
//! checksum or a digest takes a [`CryptoProvider`] argument.
//! [`DefaultCryptoProvider`] is a stateless implementation on top of
//! `cryptoxide` and the curve crates.

use cryptoxide::hashing::sha256;

use crate::public_key::PublicKey;
use crate::secret_key::SecretKey;
use crate::signature::Signature;
use crate::{blake2b, CryptoError};

pub trait CryptoProvider {
    fn sha256(&self, data: &[u8]) -> [u8; 32];

    /// BLAKE2b with a digest of `output_len` bytes.
    fn blake2b(&self, data: &[u8], output_len: usize) -> Result<Vec<u8>, CryptoError>;

    /// Signs the BLAKE2b-256 digest of `message`.
    fn sign(&self, secret_key: &SecretKey, message: &[u8]) -> Result<Signature, CryptoError>;

    /// Checks `signature` against the BLAKE2b-256 digest of `message`.
    fn verify(
        &self,
        public_key: &PublicKey,
        signature: &Signature,
        message: &[u8],
    ) -> Result<bool, CryptoError>;

    fn double_sha256(&self, data: &[u8]) -> [u8; 32] {
        let digest = self.sha256(data);
        self.sha256(&digest)
    }

    fn blake2b_256(&self, data: &[u8]) -> Result<[u8; 32], CryptoError> {
        let digest = self.blake2b(data, 32)?;
        digest
            .as_slice()
            .try_into()
            .map_err(|_| CryptoError::InvalidDigestSize {
                expected: 32,
                actual: digest.len(),
            })
    }
}

impl<P: CryptoProvider + ?Sized> CryptoProvider for &P {
    fn sha256(&self, data: &[u8]) -> [u8; 32] {
        (**self).sha256(data)
    }

    fn blake2b(&self, data: &[u8], output_len: usize) -> Result<Vec<u8>, CryptoError> {
        (**self).blake2b(data, output_len)
    }

    fn sign(&self, secret_key: &SecretKey, message: &[u8]) -> Result<Signature, CryptoError> {
        (**self).sign(secret_key, message)
    }

    fn verify(
        &self,
        public_key: &PublicKey,
        signature: &Signature,
        message: &[u8],
    ) -> Result<bool, CryptoError> {
        (**self).verify(public_key, signature, message)
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DefaultCryptoProvider;

impl CryptoProvider for DefaultCryptoProvider {
    fn sha256(&self, data: &[u8]) -> [u8; 32] {
        sha256(data)
    }

    fn blake2b(&self, data: &[u8], output_len: usize) -> Result<Vec<u8>, CryptoError> {
        Ok(blake2b::digest(data, output_len)?)
    }

    #[cfg(feature = "signing")]
    fn sign(&self, secret_key: &SecretKey, message: &[u8]) -> Result<Signature, CryptoError> {
        let digest = blake2b::digest_256(message);
        secret_key.sign_digest(&digest)
    }

    #[cfg(not(feature = "signing"))]
    fn sign(&self, _secret_key: &SecretKey, _message: &[u8]) -> Result<Signature, CryptoError> {
        Err(CryptoError::Unsupported("signing feature disabled"))
    }

    #[cfg(feature = "signing")]
    fn verify(
        &self,
        public_key: &PublicKey,
        signature: &Signature,
        message: &[u8],
    ) -> Result<bool, CryptoError> {
        let digest = blake2b::digest_256(message);
        public_key.verify_digest(signature, &digest)
    }

    #[cfg(not(feature = "signing"))]
    fn verify(
        &self,
        _public_key: &PublicKey,
        _signature: &Signature,
        _message: &[u8],
    ) -> Result<bool, CryptoError> {
        Err(CryptoError::Unsupported("signing feature disabled"))
    }
}
