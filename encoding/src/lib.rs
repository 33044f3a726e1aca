// Copyright (c) SimpleStaking, Viable Systems and Tezedge Contributors
// SPDX-License-Identifier: MIT
#![forbid(unsafe_code)]

//! Primitive binary codec for the Tezos wire format.
//!
//! Values are written with [`enc::BinWriter`] and read back with
//! [`nom::NomReader`]. A reader receives the unread tail of the input and
//! returns the new tail together with the decoded value, so decoding a
//! sequence of fields is a chain of `?` over the same byte slice.
//!
//! You can either implement both traits by hand, or derive them. Derived
//! layouts put the fields one after the other; `#[encoding(...)]` adds
//! length prefixes and list framing around a field.
//!
//! # Examples
//!
//! ```rust
//! use tezos_forge_encoding::enc::BinWriter;
//! use tezos_forge_encoding::nom::NomReader;
//! use tezos_forge_encoding::types::Narith;
//!
//! #[derive(Debug, PartialEq, NomReader, BinWriter)]
//! struct Transfer {
//!     amount: Narith,
//!     #[encoding(dynamic, bytes)]
//!     memo: Option<Vec<u8>>,
//! }
//!
//! #[derive(Debug, PartialEq, NomReader, BinWriter)]
//! #[encoding(tags = "u8")]
//! enum Message {
//!     #[encoding(tag = 1)]
//!     Transfer(Transfer),
//!     #[encoding(tag = 2)]
//!     Ping,
//! }
//!
//! let transfer = Transfer { amount: 505u64.into(), memo: Some(vec![1, 2]) };
//! let bytes = transfer.to_bytes().unwrap();
//! assert_eq!(bytes, [0xf9, 0x03, 0xff, 0, 0, 0, 2, 1, 2]);
//! assert_eq!(Transfer::from_bytes(&bytes).unwrap(), transfer);
//!
//! assert_eq!(Message::Ping.to_bytes().unwrap(), [2]);
//! assert_eq!(Message::from_bytes(&[2]).unwrap(), Message::Ping);
//! ```
//!
//! Layouts the attributes cannot express are written with the combinators
//! of [`enc`] and [`nom`]:
//!
//! ```rust
//! use tezos_forge_encoding::enc::{self, BinResult, BinWriter};
//! use tezos_forge_encoding::nom::{self as nom_enc, NomReader, NomResult};
//!
//! /// A list of byte strings behind a one-byte length.
//! #[derive(Debug, PartialEq)]
//! struct Chunks(Vec<u8>);
//!
//! impl BinWriter for Chunks {
//!     fn bin_write(&self, out: &mut Vec<u8>) -> BinResult {
//!         enc::short_dynamic(enc::bytes)(self.0.as_slice(), out)
//!     }
//! }
//!
//! impl<'a> NomReader<'a> for Chunks {
//!     fn nom_read(input: &'a [u8]) -> NomResult<'a, Self> {
//!         let (input, bytes) = nom_enc::short_dynamic(nom_enc::rest_bytes)(input)?;
//!         Ok((input, Chunks(bytes)))
//!     }
//! }
//!
//! assert_eq!(Chunks(vec![7, 8]).to_bytes().unwrap(), [2, 7, 8]);
//! assert_eq!(Chunks::from_bytes(&[1, 9]).unwrap(), Chunks(vec![9]));
//! ```

pub mod enc;
pub mod nom;
pub mod types;

#[cfg(test)]
mod roundtrip_tests;
