// Copyright (c) SimpleStaking, Viable Systems and Tezedge Contributors
// SPDX-License-Identifier: MIT

//! BLAKE2b digests: 20 bytes for key hashes, 32 bytes for operation and
//! expression hashes, any size in `16..=64` through the provider.

use cryptoxide::blake2b::Blake2b;
use cryptoxide::digest::Digest;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq, Clone, Copy)]
pub enum Blake2bError {
    #[error("digest length {0} is outside 16..=64")]
    InvalidLength(usize),
}

const DIGEST_LEN: std::ops::RangeInclusive<usize> = 16..=64;

pub fn digest_256(data: &[u8]) -> [u8; 32] {
    let mut out = [0; 32];
    hash_into(data, &mut out);
    out
}

pub fn digest_160(data: &[u8]) -> [u8; 20] {
    let mut out = [0; 20];
    hash_into(data, &mut out);
    out
}

/// Digest of `len` bytes.
pub fn digest(data: &[u8], len: usize) -> Result<Vec<u8>, Blake2bError> {
    if !DIGEST_LEN.contains(&len) {
        return Err(Blake2bError::InvalidLength(len));
    }
    let mut out = vec![0; len];
    hash_into(data, &mut out);
    Ok(out)
}

/// The output length is part of the BLAKE2b parameters, so it sets the
/// digest and not only its size.
fn hash_into(data: &[u8], out: &mut [u8]) {
    let mut hasher = Blake2b::new(out.len());
    hasher.input(data);
    hasher.result(out);
}
