// Copyright (c) SimpleStaking, Viable Systems and Tezedge Contributors
// SPDX-FileCopyrightText: 2023 Nomadic Labs <contact@nomadic-labs.com>
// SPDX-FileCopyrightText: 2023 TriliTech <contact@trili.tech>
// SPDX-License-Identifier: MIT
#![forbid(unsafe_code)]

//! Derivation of `NomReader` and `BinWriter` for structs and tagged enums.
//!
//! Fields are laid out in declaration order. A field without attributes
//! uses its type's own implementation; `#[encoding(...)]` wraps it, outermost
//! first:
//!
//! - `dynamic`, `short_dynamic`: 4-byte or 1-byte length prefix,
//! - `list`: elements of a `Vec<T>` until the input is exhausted,
//! - `bytes`: raw bytes of a `Vec<u8>`, up to the end of the input.
//!
//! On an `Option<T>` field the attributes apply to the value behind the
//! presence flag.
//!
//! Enums carry a `#[encoding(tags = "u8")]` (or `"i8"`) tag; each variant is
//! either a unit or holds a single unnamed field, and takes its tag from
//! `#[encoding(tag = N)]` or from its position.

extern crate proc_macro;

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

mod bin;
mod constraints;
mod encoding;
mod make;
mod nom;
mod symbol;

#[proc_macro_derive(NomReader, attributes(encoding))]
pub fn derive_nom_reader(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let encoding = match crate::make::make_encoding(&input) {
        Ok(encoding) => encoding,
        Err(e) => return e.into_compile_error().into(),
    };
    let tokens = crate::nom::generate_nom_read_for_data(&input.generics, &encoding);
    tokens.into()
}

#[proc_macro_derive(BinWriter, attributes(encoding))]
pub fn derive_bin_writer(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let encoding = match crate::make::make_encoding(&input) {
        Ok(encoding) => encoding,
        Err(e) => return e.into_compile_error().into(),
    };
    let tokens = crate::bin::generate_bin_write_for_data(&input.generics, &encoding);
    tokens.into()
}
