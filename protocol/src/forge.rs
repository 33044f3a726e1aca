// SPDX-FileCopyrightText: 2025 Functori <contact@functori.com>
//
// SPDX-License-Identifier: MIT

//! Forged operations: a branch followed by a batch of contents, and
//! optionally the signature over them.
//!
//! The bytes of a signed operation do not say whether their last 64 bytes
//! are a signature. Callers pick [`UnsignedOperation::unforge`] or
//! [`SignedOperation::unforge`] depending on what they were given.

use tezos_forge_crypto::hash::{BlockHash, OperationHash, UnknownSignature};
use tezos_forge_crypto::{CryptoError, CryptoProvider, PublicKey, SecretKey, Signature};
use tezos_forge_encoding::enc::{self, BinResult, BinWriter};
use tezos_forge_encoding::nom::error::DecodeError;
use tezos_forge_encoding::nom::{self as nom_enc, NomReader, NomResult};
use tracing::debug;

use crate::operation::OperationContent;
use crate::ForgeError;

/// Watermark of `Generic_operation`, prefixed to the bytes being signed.
pub const GENERIC_OPERATION_WATERMARK: u8 = 0x03;

const SIGNATURE_SIZE: usize = 64;

#[derive(PartialEq, Debug, Clone)]
pub struct UnsignedOperation {
    pub branch: BlockHash,
    pub contents: Vec<OperationContent>,
}

impl BinWriter for UnsignedOperation {
    fn bin_write(&self, output: &mut Vec<u8>) -> BinResult {
        self.branch.bin_write(output)?;
        enc::list(OperationContent::bin_write)(self.contents.as_slice(), output)
    }
}

impl<'a> NomReader<'a> for UnsignedOperation {
    fn nom_read(input: &'a [u8]) -> NomResult<'a, Self> {
        let (input, branch) = BlockHash::nom_read(input)?;
        let (input, contents) = nom_enc::list(OperationContent::nom_read)(input)?;
        Ok((input, Self { branch, contents }))
    }
}

impl UnsignedOperation {
    pub fn new(branch: BlockHash, contents: Vec<OperationContent>) -> Self {
        Self { branch, contents }
    }

    pub fn forge(&self) -> Result<Vec<u8>, ForgeError> {
        let bytes = self.to_bytes()?;
        debug!(
            contents = self.contents.len(),
            size = bytes.len(),
            "forged operation"
        );
        Ok(bytes)
    }

    pub fn forge_hex(&self) -> Result<String, ForgeError> {
        self.forge().map(hex::encode)
    }

    /// Reads a branch then contents until the input is exhausted. A
    /// trailing signature is read as content and most likely rejected.
    pub fn unforge(bytes: &[u8]) -> Result<Self, ForgeError> {
        debug!(size = bytes.len(), "unforging operation");
        Ok(Self::from_bytes(bytes)?)
    }

    pub fn unforge_hex(hex: &str) -> Result<Self, ForgeError> {
        Self::unforge(&hex::decode(hex)?)
    }

    /// Watermarked bytes, as handed to the signer.
    fn signing_bytes(&self) -> Result<Vec<u8>, ForgeError> {
        let mut bytes = vec![GENERIC_OPERATION_WATERMARK];
        self.bin_write(&mut bytes)?;
        Ok(bytes)
    }

    /// BLAKE2b-256 digest of the watermarked forged bytes: what the
    /// signature actually covers.
    pub fn signing_digest<P: CryptoProvider + ?Sized>(
        &self,
        provider: &P,
    ) -> Result<[u8; 32], ForgeError> {
        Ok(provider.blake2b_256(&self.signing_bytes()?)?)
    }

    pub fn sign<P: CryptoProvider + ?Sized>(
        self,
        provider: &P,
        secret_key: &SecretKey,
    ) -> Result<SignedOperation, ForgeError> {
        let signature = provider.sign(secret_key, &self.signing_bytes()?)?;
        let signature = UnknownSignature::try_from(signature)
            .map_err(CryptoError::from)?;
        Ok(SignedOperation {
            unsigned: self,
            signature,
        })
    }
}

#[derive(PartialEq, Debug, Clone)]
pub struct SignedOperation {
    pub unsigned: UnsignedOperation,
    /// The curve is not on the wire, so signatures are kept untyped.
    pub signature: UnknownSignature,
}

impl BinWriter for SignedOperation {
    fn bin_write(&self, output: &mut Vec<u8>) -> BinResult {
        self.unsigned.bin_write(output)?;
        self.signature.bin_write(output)
    }
}

impl<'a> NomReader<'a> for SignedOperation {
    fn nom_read(input: &'a [u8]) -> NomResult<'a, Self> {
        let split = input
            .len()
            .checked_sub(SIGNATURE_SIZE)
            .ok_or_else(|| nom::Err::Error(DecodeError::truncated(input)))?;
        let (operation, signature) = input.split_at(split);
        let unsigned = nom_enc::complete_input(UnsignedOperation::nom_read, operation)
            .map_err(nom::Err::Error)?;
        let (rest, signature) = UnknownSignature::nom_read(signature)?;
        Ok((
            rest,
            Self {
                unsigned,
                signature,
            },
        ))
    }
}

impl SignedOperation {
    pub fn forge(&self) -> Result<Vec<u8>, ForgeError> {
        let bytes = self.to_bytes()?;
        debug!(
            contents = self.unsigned.contents.len(),
            size = bytes.len(),
            "forged signed operation"
        );
        Ok(bytes)
    }

    pub fn forge_hex(&self) -> Result<String, ForgeError> {
        self.forge().map(hex::encode)
    }

    /// Reads an operation whose last 64 bytes are its signature.
    pub fn unforge(bytes: &[u8]) -> Result<Self, ForgeError> {
        debug!(size = bytes.len(), "unforging signed operation");
        Ok(Self::from_bytes(bytes)?)
    }

    pub fn unforge_hex(hex: &str) -> Result<Self, ForgeError> {
        Self::unforge(&hex::decode(hex)?)
    }

    /// Checks the signature against `public_key`. A signature that does not
    /// match is `Ok(false)`, not an error.
    pub fn verify<P: CryptoProvider + ?Sized>(
        &self,
        provider: &P,
        public_key: &PublicKey,
    ) -> Result<bool, ForgeError> {
        let signature = Signature::Unknown(self.signature.clone());
        let bytes = self.unsigned.signing_bytes()?;
        Ok(provider.verify(public_key, &signature, &bytes)?)
    }

    /// Operation hash, as reported by the node once injected.
    pub fn hash<P: CryptoProvider + ?Sized>(
        &self,
        provider: &P,
    ) -> Result<OperationHash, ForgeError> {
        Ok(OperationHash::digest(provider, &self.to_bytes()?)?)
    }
}

#[cfg(test)]
mod tests {
    use tezos_forge_crypto::{DefaultCryptoProvider, PublicKeyHash};
    use tezos_forge_encoding::nom::error::DecodeErrorKind;

    use super::*;
    use crate::consensus::tests::BRANCH;
    use crate::operation::tests::samples;
    use crate::operation::{DelegationContent, ManagerOperationContent};

    fn delegation() -> OperationContent {
        let source = PublicKeyHash::from_b58check("tz1KqTpEZ7Yob7QbPE4Hy4Wo8fHG8LhKxZSx").unwrap();
        OperationContent::Delegation(ManagerOperationContent {
            source: source.clone(),
            fee: 1_257u64.into(),
            counter: 1u64.into(),
            gas_limit: 10_000u64.into(),
            storage_limit: 0u64.into(),
            operation: DelegationContent {
                delegate: Some(source),
            },
        })
    }

    fn unsigned() -> UnsignedOperation {
        UnsignedOperation::new(BlockHash::from_b58check(BRANCH).unwrap(), vec![delegation()])
    }

    #[test]
    fn forge_layout() -> Result<(), anyhow::Error> {
        let forged = unsigned().forge_hex()?;
        let branch = hex::encode(BlockHash::from_b58check(BRANCH)?.to_bytes()?);
        assert_eq!(
            forged,
            format!("{branch}6e0002298c03ed7d454a101eb7022bc95f7e5f41ac78e90901904e00ff0002298c03ed7d454a101eb7022bc95f7e5f41ac78")
        );
        assert_eq!(UnsignedOperation::unforge_hex(&forged)?, unsigned());

        Ok(())
    }

    #[test]
    fn batch_of_every_kind() -> Result<(), anyhow::Error> {
        let batch = UnsignedOperation::new(BlockHash::from_b58check(BRANCH)?, samples());
        let forged = batch.forge()?;
        assert_eq!(UnsignedOperation::unforge(&forged)?, batch);

        Ok(())
    }

    #[test]
    fn empty_batch() -> Result<(), anyhow::Error> {
        let empty = UnsignedOperation::new(BlockHash::from_b58check(BRANCH)?, vec![]);
        let forged = empty.forge()?;
        assert_eq!(forged.len(), 32);
        assert_eq!(UnsignedOperation::unforge(&forged)?, empty);

        Ok(())
    }

    #[test]
    fn signature_is_appended() -> Result<(), anyhow::Error> {
        let signed = SignedOperation {
            unsigned: unsigned(),
            signature: UnknownSignature::from([0x11; 64]),
        };
        let forged = signed.forge()?;
        assert_eq!(forged[..forged.len() - 64], unsigned().forge()?);
        assert_eq!(forged[forged.len() - 64..], [0x11; 64]);
        assert_eq!(SignedOperation::unforge(&forged)?, signed);

        Ok(())
    }

    #[test]
    fn signed_form_is_not_guessed() -> Result<(), anyhow::Error> {
        let signed = SignedOperation {
            unsigned: unsigned(),
            signature: UnknownSignature::from([0x11; 64]),
        };
        let forged = signed.forge()?;
        // 0x11 is the failing noop tag, whose 4-byte length overruns the input.
        let err = UnsignedOperation::unforge(&forged).unwrap_err();
        assert_eq!(err.kind(), Some(DecodeErrorKind::TruncatedInput));

        Ok(())
    }

    #[test]
    fn short_signed_input() {
        let err = SignedOperation::unforge(&[0; 63]).unwrap_err();
        assert_eq!(err.kind(), Some(DecodeErrorKind::TruncatedInput));

        let err = SignedOperation::unforge(&[0; 64]).unwrap_err();
        assert_eq!(err.kind(), Some(DecodeErrorKind::TruncatedInput));
    }

    #[test]
    fn invalid_hex() {
        let err = UnsignedOperation::unforge_hex("6e0").unwrap_err();
        assert_eq!(err.kind(), Some(DecodeErrorKind::InvalidValue));
    }

    #[test]
    fn signing_digest_covers_the_watermark() -> Result<(), anyhow::Error> {
        let provider = DefaultCryptoProvider;
        let mut watermarked = vec![GENERIC_OPERATION_WATERMARK];
        watermarked.extend(unsigned().forge()?);
        assert_eq!(
            unsigned().signing_digest(&provider)?,
            provider.blake2b_256(&watermarked)?
        );
        assert_ne!(
            unsigned().signing_digest(&provider)?,
            provider.blake2b_256(&unsigned().forge()?)?
        );

        Ok(())
    }

    #[test]
    fn hash_of_signed_bytes() -> Result<(), anyhow::Error> {
        let provider = DefaultCryptoProvider;
        let signed = SignedOperation {
            unsigned: unsigned(),
            signature: UnknownSignature::from([0x11; 64]),
        };
        let hash = signed.hash(&provider)?;
        assert_eq!(
            hash,
            OperationHash::digest(&provider, &signed.forge()?)?
        );
        assert!(hash.to_b58check().starts_with('o'));

        Ok(())
    }
}
