// Copyright (c) SimpleStaking, Viable Systems and Tezedge Contributors
// SPDX-License-Identifier: MIT

use crate::enc::BinWriter;
use crate::nom::NomReader;
use crate::types::{Narith, Zarith};

use num_bigint::{BigInt, BigUint, Sign};
use proptest::prelude::*;

fn encode<T: BinWriter>(value: &T) -> Vec<u8> {
    value.to_bytes().unwrap()
}

/// Values around the group boundaries: 6 bits in the first Zarith byte,
/// 7 bits in every following one.
#[test]
fn zarith_group_boundaries() {
    let cases: [(i64, &[u8]); 8] = [
        (63, &[0x3f]),
        (64, &[0x80, 0x01]),
        (-63, &[0x7f]),
        (-64, &[0xc0, 0x01]),
        (8191, &[0xbf, 0x7f]),
        (8192, &[0x80, 0x80, 0x01]),
        (-8191, &[0xff, 0x7f]),
        (-8192, &[0xc0, 0x80, 0x01]),
    ];
    for (n, expected) in cases {
        let z = Zarith::from(n);
        assert_eq!(encode(&z), expected, "encoding of {n}");
        assert_eq!(Zarith::from_bytes(expected), Ok(z));
    }
}

#[test]
fn narith_group_boundaries() {
    let cases: [(u64, &[u8]); 4] = [
        (127, &[0x7f]),
        (128, &[0x80, 0x01]),
        (16383, &[0xff, 0x7f]),
        (16384, &[0x80, 0x80, 0x01]),
    ];
    for (n, expected) in cases {
        let value = Narith::from(n);
        assert_eq!(encode(&value), expected, "encoding of {n}");
        assert_eq!(Narith::from_bytes(expected), Ok(value));
    }
}

/// Values wider than 64 bits, with the top group landing at different
/// offsets inside the last byte.
#[test]
fn wide_values() {
    for shift in [58u32, 63, 64, 70, 127, 128, 184, 255] {
        let n = BigUint::from(1u8) << shift;
        let encoded = encode(&Narith(n.clone()));
        assert_eq!(encoded.len() as u32, shift / 7 + 1, "length for 2^{shift}");
        assert_eq!(Narith::from_bytes(&encoded), Ok(Narith(n.clone())));

        let negative = Zarith(-BigInt::from(n));
        assert_eq!(Zarith::from_bytes(&encode(&negative)), Ok(negative));
    }
}

#[test]
fn truncated_zarith() {
    use crate::nom::error::DecodeErrorKind;
    let err = Zarith::from_bytes(&[0x95, 0xb4]).unwrap_err();
    assert_eq!(err.kind(), DecodeErrorKind::TruncatedInput);
}

fn sign_strategy() -> impl Strategy<Value = Sign> {
    prop::sample::select(vec![Sign::Minus, Sign::NoSign, Sign::Plus])
}

proptest! {
    #[test]
    fn narith_roundtrip(digits: Vec<u32>) {
        let n = Narith(BigUint::new(digits));
        let encoded = encode(&n);
        prop_assert_eq!(Narith::from_bytes(&encoded), Ok(n));
    }

    /// The writer never emits a trailing zero group.
    #[test]
    fn narith_is_minimal(digits: Vec<u32>) {
        let encoded = encode(&Narith(BigUint::new(digits)));
        let last = *encoded.last().unwrap();
        prop_assert!(last & 0x80 == 0);
        prop_assert!(encoded.len() == 1 || last != 0);
    }

    #[test]
    fn zarith_roundtrip(sign in sign_strategy(), digits: Vec<u32>) {
        let z = Zarith(BigInt::new(sign, digits));
        let encoded = encode(&z);
        prop_assert_eq!(Zarith::from_bytes(&encoded), Ok(z));
    }

    #[test]
    fn zarith_matches_i64(n: i64) {
        let z = Zarith::from(n);
        let encoded = encode(&z);
        let (rest, decoded) = Zarith::nom_read(&encoded).unwrap();
        prop_assert!(rest.is_empty());
        prop_assert_eq!(decoded.0, BigInt::from(n));
    }

    /// Encodings are self-delimiting: two values written back to back are
    /// read back one after the other.
    #[test]
    fn concatenated_values(a: i64, b: u64) {
        let mut bytes = encode(&Zarith::from(a));
        bytes.extend(encode(&Narith::from(b)));
        let (rest, first) = Zarith::nom_read(&bytes).unwrap();
        let (rest, second) = Narith::nom_read(rest).unwrap();
        prop_assert!(rest.is_empty());
        prop_assert_eq!(first, Zarith::from(a));
        prop_assert_eq!(second, Narith::from(b));
    }
}
