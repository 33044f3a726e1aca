// Copyright (c) SimpleStaking, Viable Systems and Tezedge Contributors
// SPDX-License-Identifier: MIT

//! Binary readers built on `nom`.
//!
//! The input slice is the decoding cursor: every reader consumes a prefix
//! and hands back the unread tail.

use bitvec::{order::Lsb0, vec::BitVec, view::BitView};
use nom::{
    bytes::complete::take,
    number::complete::{be_i16, be_i32, be_i64, be_i8, be_u16, be_u32, be_u64, be_u8},
    Err,
};
use num_bigint::{BigInt, BigUint, Sign};

pub mod error;

pub use tezos_forge_encoding_derive::NomReader;

use self::error::{convert_error, DecodeError};

pub type NomInput<'a> = &'a [u8];

pub type NomError = DecodeError;

pub type NomResult<'a, T> = nom::IResult<NomInput<'a>, T, DecodeError>;

/// Types that can be read from their binary representation.
pub trait NomReader<'a>: Sized {
    fn nom_read(input: &'a [u8]) -> NomResult<'a, Self>;

    /// Reads a value that must span the whole input.
    fn from_bytes(input: &'a [u8]) -> Result<Self, DecodeError> {
        complete_input(Self::nom_read, input)
    }
}

/// Runs `parser` over `input` and requires that nothing is left over.
pub fn complete_input<'a, O, F>(mut parser: F, input: &'a [u8]) -> Result<O, DecodeError>
where
    F: FnMut(NomInput<'a>) -> NomResult<'a, O>,
{
    let (rest, value) = parser(input).map_err(convert_error)?;
    if rest.is_empty() {
        Ok(value)
    } else {
        Err(DecodeError::trailing_bytes(rest))
    }
}

macro_rules! decode_integer {
    ($t:ident, $parser:ident) => {
        impl<'a> NomReader<'a> for $t {
            fn nom_read(input: &'a [u8]) -> NomResult<'a, Self> {
                $parser(input)
            }
        }
    };
}

decode_integer!(u8, be_u8);
decode_integer!(i8, be_i8);
decode_integer!(u16, be_u16);
decode_integer!(i16, be_i16);
decode_integer!(u32, be_u32);
decode_integer!(i32, be_i32);
decode_integer!(u64, be_u64);
decode_integer!(i64, be_i64);

impl<'a> NomReader<'a> for bool {
    fn nom_read(input: &'a [u8]) -> NomResult<'a, Self> {
        boolean(input)
    }
}

impl<'a, T: NomReader<'a>> NomReader<'a> for Option<T> {
    fn nom_read(input: &'a [u8]) -> NomResult<'a, Self> {
        optional_field(T::nom_read)(input)
    }
}

impl<'a, const N: usize> NomReader<'a> for [u8; N] {
    fn nom_read(input: &'a [u8]) -> NomResult<'a, Self> {
        sized_bytes(input)
    }
}

impl<'a, T: NomReader<'a>> NomReader<'a> for Box<T> {
    fn nom_read(input: &'a [u8]) -> NomResult<'a, Self> {
        let (input, value) = T::nom_read(input)?;
        Ok((input, Box::new(value)))
    }
}

/// `0xff` is true, `0x00` is false; anything else is rejected.
pub fn boolean(input: NomInput) -> NomResult<bool> {
    let (rest, byte) = be_u8(input)?;
    match byte {
        crate::enc::BOOLEAN_TRUE => Ok((rest, true)),
        crate::enc::BOOLEAN_FALSE => Ok((rest, false)),
        other => Err(Err::Error(DecodeError::invalid_value(
            input,
            format!("0x{other:02x} is not a boolean"),
        ))),
    }
}

/// Exactly `len` raw bytes.
pub fn bytes<'a>(len: usize) -> impl Fn(NomInput<'a>) -> NomResult<'a, &'a [u8]> {
    move |input| take(len)(input)
}

/// Fixed-size array of raw bytes.
pub fn sized_bytes<'a, const N: usize>(input: NomInput<'a>) -> NomResult<'a, [u8; N]> {
    let (rest, bytes) = take(N)(input)?;
    let mut out = [0; N];
    out.copy_from_slice(bytes);
    Ok((rest, out))
}

/// Everything that is left in the input.
pub fn rest_bytes(input: NomInput) -> NomResult<Vec<u8>> {
    Ok((&input[input.len()..], input.to_vec()))
}

/// `len` bytes of UTF-8 text.
pub fn string<'a>(len: usize) -> impl Fn(NomInput<'a>) -> NomResult<'a, String> {
    move |input| {
        let (rest, raw) = take(len)(input)?;
        let s = std::str::from_utf8(raw)
            .map_err(|e| Err::Error(DecodeError::invalid_value(input, e.to_string())))?;
        Ok((rest, s.to_owned()))
    }
}

/// `len` bytes rendered as a lowercase hex string.
pub fn hex<'a>(len: usize) -> impl Fn(NomInput<'a>) -> NomResult<'a, String> {
    move |input| {
        let (rest, raw) = take(len)(input)?;
        Ok((rest, hex::encode(raw)))
    }
}

/// Runs `f` over a sub-slice whose length is given by a preceding 4-byte
/// big-endian prefix. `f` must consume the whole sub-slice.
pub fn dynamic<'a, O, F>(mut f: F) -> impl FnMut(NomInput<'a>) -> NomResult<'a, O>
where
    F: FnMut(NomInput<'a>) -> NomResult<'a, O>,
{
    move |input| {
        let (input, len) = be_u32(input)?;
        bounded_by(len as usize, &mut f, input)
    }
}

/// Same as [`dynamic`] with a single length byte.
pub fn short_dynamic<'a, O, F>(mut f: F) -> impl FnMut(NomInput<'a>) -> NomResult<'a, O>
where
    F: FnMut(NomInput<'a>) -> NomResult<'a, O>,
{
    move |input| {
        let (input, len) = be_u8(input)?;
        bounded_by(len as usize, &mut f, input)
    }
}

fn bounded_by<'a, O, F>(len: usize, f: &mut F, input: NomInput<'a>) -> NomResult<'a, O>
where
    F: FnMut(NomInput<'a>) -> NomResult<'a, O>,
{
    let (rest, framed) = take(len)(input)?;
    let (unread, value) = f(framed)?;
    if unread.is_empty() {
        Ok((rest, value))
    } else {
        Err(Err::Error(DecodeError::trailing_bytes(unread)))
    }
}

/// Presence flag followed by the value when the flag is set.
pub fn optional_field<'a, O, F>(mut f: F) -> impl FnMut(NomInput<'a>) -> NomResult<'a, Option<O>>
where
    F: FnMut(NomInput<'a>) -> NomResult<'a, O>,
{
    move |input| {
        let (input, present) = boolean(input)?;
        if present {
            let (input, value) = f(input)?;
            Ok((input, Some(value)))
        } else {
            Ok((input, None))
        }
    }
}

/// Reads elements until the input is exhausted. Usually wrapped in
/// [`dynamic`] to bound the list.
pub fn list<'a, O, F>(mut f: F) -> impl FnMut(NomInput<'a>) -> NomResult<'a, Vec<O>>
where
    F: FnMut(NomInput<'a>) -> NomResult<'a, O>,
{
    move |mut input| {
        let mut items = Vec::new();
        while !input.is_empty() {
            let (rest, item) = f(input)?;
            input = rest;
            items.push(item);
        }
        Ok((input, items))
    }
}

/// Natural number in base-128 little-endian groups. Trailing zero groups
/// are accepted.
pub fn n_bignum(input: NomInput) -> NomResult<BigUint> {
    let mut bits: BitVec<u8, Lsb0> = BitVec::new();
    let mut input = input;
    loop {
        let (rest, byte) = be_u8(input)?;
        input = rest;
        let view = byte.view_bits::<Lsb0>();
        bits.extend_from_bitslice(&view[..7]);
        if !view[7] {
            break;
        }
    }
    bits.set_uninitialized(false);
    Ok((input, BigUint::from_bytes_le(&bits.into_vec())))
}

/// Signed integer: sign bit and 6 data bits in the first byte, then the
/// higher bits as an [`n_bignum`].
pub fn z_bignum(input: NomInput) -> NomResult<BigInt> {
    let (rest, first) = be_u8(input)?;
    let low = BigUint::from(first & 0x3f);
    let (rest, magnitude) = if first & 0x80 != 0 {
        let (rest, high) = n_bignum(rest)?;
        (rest, (high << 6u32) | low)
    } else {
        (rest, low)
    };
    let sign = if first & 0x40 != 0 {
        Sign::Minus
    } else {
        Sign::Plus
    };
    Ok((rest, BigInt::from_biguint(sign, magnitude)))
}
