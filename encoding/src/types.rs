// Copyright (c) SimpleStaking, Viable Systems and Tezedge Contributors
// SPDX-License-Identifier: MIT

//! Arbitrary-precision integers in their Tezos variable-length encodings.
//!
//! [`Narith`] holds naturals (fees, counters, gas and storage limits,
//! amounts). [`Zarith`] holds signed integers (Micheline `int` literals).
//! Both serialize to JSON as decimal strings, the way the node RPCs
//! render them.

use std::fmt;
use std::str::FromStr;

use num_bigint::{BigInt, BigUint, ParseBigIntError};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::enc::{self, BinResult, BinWriter};
use crate::nom::{self as nom_enc, NomReader, NomResult};

/// Natural number in the base-128 encoding.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Narith(pub BigUint);

/// Signed integer in the Zarith encoding.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Zarith(pub BigInt);

macro_rules! from_primitive {
    ($target:ident, $inner:ident, $($t:ty),+) => {
        $(
            impl From<$t> for $target {
                fn from(value: $t) -> Self {
                    Self($inner::from(value))
                }
            }
        )+
    };
}

from_primitive!(Narith, BigUint, u8, u16, u32, u64, u128, usize);
from_primitive!(Zarith, BigInt, u8, u16, u32, u64, u128, i8, i16, i32, i64, i128);

impl From<BigUint> for Narith {
    fn from(value: BigUint) -> Self {
        Self(value)
    }
}

impl From<Narith> for BigUint {
    fn from(value: Narith) -> Self {
        value.0
    }
}

impl From<BigInt> for Zarith {
    fn from(value: BigInt) -> Self {
        Self(value)
    }
}

impl From<Zarith> for BigInt {
    fn from(value: Zarith) -> Self {
        value.0
    }
}

impl From<Narith> for Zarith {
    fn from(value: Narith) -> Self {
        Self(BigInt::from(value.0))
    }
}

impl fmt::Display for Narith {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl fmt::Display for Zarith {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for Narith {
    type Err = ParseBigIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BigUint::from_str(s).map(Self)
    }
}

impl FromStr for Zarith {
    type Err = ParseBigIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BigInt::from_str(s).map(Self)
    }
}

impl BinWriter for Narith {
    fn bin_write(&self, output: &mut Vec<u8>) -> BinResult {
        enc::n_bignum(&self.0, output)
    }
}

impl<'a> NomReader<'a> for Narith {
    fn nom_read(input: &'a [u8]) -> NomResult<'a, Self> {
        let (input, n) = nom_enc::n_bignum(input)?;
        Ok((input, Self(n)))
    }
}

impl BinWriter for Zarith {
    fn bin_write(&self, output: &mut Vec<u8>) -> BinResult {
        enc::z_bignum(&self.0, output)
    }
}

impl<'a> NomReader<'a> for Zarith {
    fn nom_read(input: &'a [u8]) -> NomResult<'a, Self> {
        let (input, n) = nom_enc::z_bignum(input)?;
        Ok((input, Self(n)))
    }
}

impl Serialize for Narith {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Narith {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

impl Serialize for Zarith {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Zarith {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
