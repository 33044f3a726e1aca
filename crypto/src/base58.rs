// Copyright (c) SimpleStaking, Viable Systems and Tezedge Contributors
// SPDX-License-Identifier: MIT

use crate::identifier::IdentifierError;
use crate::provider::CryptoProvider;

/// Size of the checksum appended before base58 encoding.
pub const CHECKSUM_BYTE_SIZE: usize = 4;

/// Base58 of `data ++ checksum(data)`.
pub fn to_base58check<P: CryptoProvider + ?Sized>(provider: &P, data: &[u8]) -> String {
    let mut payload = Vec::with_capacity(data.len() + CHECKSUM_BYTE_SIZE);
    payload.extend_from_slice(data);
    let checksum = provider.double_sha256(data);
    payload.extend_from_slice(&checksum[..CHECKSUM_BYTE_SIZE]);

    bs58::encode(payload).into_string()
}

pub(crate) fn encode_tagged<P: CryptoProvider + ?Sized>(
    provider: &P,
    tag: &[u8],
    payload: &[u8],
) -> String {
    to_base58check(provider, &[tag, payload].concat())
}

/// Decodes base58 text and strips its verified checksum.
pub fn from_base58check<P: CryptoProvider + ?Sized>(
    provider: &P,
    text: &str,
) -> Result<Vec<u8>, IdentifierError> {
    let mut payload = bs58::decode(text)
        .into_vec()
        .map_err(|_| IdentifierError::InvalidBase58)?;
    if payload.len() < CHECKSUM_BYTE_SIZE {
        return Err(IdentifierError::MissingChecksum);
    }

    let data_len = payload.len() - CHECKSUM_BYTE_SIZE;
    let checksum_expected = provider.double_sha256(&payload[..data_len]);
    if checksum_expected[..CHECKSUM_BYTE_SIZE] != payload[data_len..] {
        return Err(IdentifierError::ChecksumMismatch);
    }
    payload.truncate(data_len);
    Ok(payload)
}
