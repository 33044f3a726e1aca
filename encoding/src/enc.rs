// Copyright (c) SimpleStaking, Viable Systems and Tezedge Contributors
// SPDX-License-Identifier: MIT

//! Binary writers.
//!
//! Writers append to a caller-owned `Vec<u8>`. Combinators such as
//! [`dynamic`] and [`optional_field`] wrap another writer and return a new
//! one, so nested layouts read the same way they are laid out on the wire.

use std::mem::size_of;

use num_bigint::{BigInt, BigUint, Sign};
use num_traits::Zero;
use thiserror::Error;

pub use tezos_forge_encoding_derive::BinWriter;

/// Error produced while writing a value.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BinError {
    #[error("size of {0} bytes does not fit the length prefix")]
    SizeOverflow(usize),
    #[error("invalid hex string: {0}")]
    InvalidHex(String),
    #[error("invalid value: {0}")]
    InvalidValue(String),
}

impl BinError {
    pub fn invalid_value(msg: impl Into<String>) -> Self {
        BinError::InvalidValue(msg.into())
    }
}

pub type BinResult = Result<(), BinError>;

/// Types that have a canonical binary representation.
pub trait BinWriter {
    fn bin_write(&self, output: &mut Vec<u8>) -> BinResult;

    /// Writes the value into a fresh buffer.
    fn to_bytes(&self) -> Result<Vec<u8>, BinError> {
        let mut out = Vec::new();
        self.bin_write(&mut out)?;
        Ok(out)
    }
}

impl<T: BinWriter + ?Sized> BinWriter for Box<T> {
    fn bin_write(&self, output: &mut Vec<u8>) -> BinResult {
        (**self).bin_write(output)
    }
}

/// Fixed-size byte arrays are written raw: their size is part of the layout.
impl<const N: usize> BinWriter for [u8; N] {
    fn bin_write(&self, output: &mut Vec<u8>) -> BinResult {
        put_bytes(self, output);
        Ok(())
    }
}

impl<T: BinWriter> BinWriter for Option<T> {
    fn bin_write(&self, output: &mut Vec<u8>) -> BinResult {
        optional_field(T::bin_write)(self, output)
    }
}

#[inline]
pub fn put_byte(byte: &u8, out: &mut Vec<u8>) {
    out.push(*byte)
}

#[inline]
pub fn put_bytes(bytes: &[u8], out: &mut Vec<u8>) {
    out.extend_from_slice(bytes)
}

macro_rules! encode_integer {
    ($t:ident) => {
        /// Big-endian fixed-width integer.
        pub fn $t(data: &$t, out: &mut Vec<u8>) -> BinResult {
            put_bytes(&data.to_be_bytes(), out);
            Ok(())
        }

        impl BinWriter for $t {
            fn bin_write(&self, output: &mut Vec<u8>) -> BinResult {
                $t(self, output)
            }
        }
    };
}

encode_integer!(u8);
encode_integer!(i8);
encode_integer!(u16);
encode_integer!(i16);
encode_integer!(u32);
encode_integer!(i32);
encode_integer!(u64);
encode_integer!(i64);

pub const BOOLEAN_TRUE: u8 = 0xff;
pub const BOOLEAN_FALSE: u8 = 0x00;

pub fn boolean(b: &bool, out: &mut Vec<u8>) -> BinResult {
    put_byte(if *b { &BOOLEAN_TRUE } else { &BOOLEAN_FALSE }, out);
    Ok(())
}

impl BinWriter for bool {
    fn bin_write(&self, output: &mut Vec<u8>) -> BinResult {
        boolean(self, output)
    }
}

/// Raw bytes, without any length information.
pub fn bytes<T: AsRef<[u8]> + ?Sized>(data: &T, out: &mut Vec<u8>) -> BinResult {
    put_bytes(data.as_ref(), out);
    Ok(())
}

/// Raw UTF-8 bytes of a string, without any length information.
pub fn string<T: AsRef<str> + ?Sized>(data: &T, out: &mut Vec<u8>) -> BinResult {
    put_bytes(data.as_ref().as_bytes(), out);
    Ok(())
}

/// Bytes given as a hex string, written raw.
pub fn hex_string<T: AsRef<str> + ?Sized>(data: &T, out: &mut Vec<u8>) -> BinResult {
    let data = data.as_ref();
    let data = data.strip_prefix("0x").unwrap_or(data);
    let decoded = hex::decode(data).map_err(|e| BinError::InvalidHex(e.to_string()))?;
    put_bytes(&decoded, out);
    Ok(())
}

/// Length of a dynamically sized value.
type Len = u32;

/// Writes `f`'s output prefixed with its 4-byte big-endian length.
///
/// The length is not known in advance, so a placeholder is written first
/// and patched once the nested value is complete.
pub fn dynamic<T, F>(f: F) -> impl FnOnce(&T, &mut Vec<u8>) -> BinResult
where
    T: ?Sized,
    F: FnOnce(&T, &mut Vec<u8>) -> BinResult,
{
    move |data, out| {
        let start = out.len();
        put_bytes(&[0; size_of::<Len>()], out);
        f(data, out)?;
        let written = out.len() - start - size_of::<Len>();
        let len = Len::try_from(written).map_err(|_| BinError::SizeOverflow(written))?;
        out[start..start + size_of::<Len>()].copy_from_slice(&len.to_be_bytes());
        Ok(())
    }
}

/// Same as [`dynamic`] but with a single length byte.
pub fn short_dynamic<T, F>(f: F) -> impl FnOnce(&T, &mut Vec<u8>) -> BinResult
where
    T: ?Sized,
    F: FnOnce(&T, &mut Vec<u8>) -> BinResult,
{
    move |data, out| {
        let start = out.len();
        out.push(0);
        f(data, out)?;
        let written = out.len() - start - 1;
        let len = u8::try_from(written).map_err(|_| BinError::SizeOverflow(written))?;
        out[start] = len;
        Ok(())
    }
}

/// Presence flag followed by the value, if any.
pub fn optional_field<T, F>(f: F) -> impl FnOnce(&Option<T>, &mut Vec<u8>) -> BinResult
where
    F: FnOnce(&T, &mut Vec<u8>) -> BinResult,
{
    move |data, out| match data {
        Some(data) => {
            boolean(&true, out)?;
            f(data, out)
        }
        None => boolean(&false, out),
    }
}

/// Concatenation of the elements, without a count.
pub fn list<T, F>(f: F) -> impl FnOnce(&[T], &mut Vec<u8>) -> BinResult
where
    F: Fn(&T, &mut Vec<u8>) -> BinResult,
{
    move |data, out| data.iter().try_for_each(|item| f(item, out))
}

/// Natural number as base-128 little-endian groups, the high bit of every
/// byte but the last set.
pub fn n_bignum(n: &BigUint, out: &mut Vec<u8>) -> BinResult {
    if n.is_zero() {
        out.push(0);
        return Ok(());
    }
    let mut groups = n.to_radix_le(0x80);
    while groups.len() > 1 && groups.last() == Some(&0) {
        groups.pop();
    }
    let last = groups.len() - 1;
    for group in &mut groups[..last] {
        *group |= 0x80;
    }
    put_bytes(&groups, out);
    Ok(())
}

/// Signed integer: the first byte carries the sign bit (0x40) and 6 data
/// bits, then the remaining magnitude follows as in [`n_bignum`].
pub fn z_bignum(n: &BigInt, out: &mut Vec<u8>) -> BinResult {
    let magnitude = n.magnitude();
    let low = magnitude.iter_u32_digits().next().unwrap_or(0) & 0x3f;
    let mut first = low as u8;
    if n.sign() == Sign::Minus {
        first |= 0x40;
    }
    let high: BigUint = magnitude >> 6u32;
    if high.is_zero() {
        out.push(first);
        Ok(())
    } else {
        out.push(first | 0x80);
        n_bignum(&high, out)
    }
}
