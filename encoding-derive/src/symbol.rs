// SPDX-FileCopyrightText: 2025 Functori <contact@functori.com>
// SPDX-License-Identifier: MIT

//! Words recognized inside `#[encoding(...)]` and in field types.

use std::fmt;

use syn::{Ident, Path};

#[derive(Copy, Clone)]
pub struct Symbol(&'static str);

pub const ENCODING: Symbol = Symbol("encoding");
pub const TAGS: Symbol = Symbol("tags");
pub const TAG: Symbol = Symbol("tag");
pub const DYNAMIC: Symbol = Symbol("dynamic");
pub const SHORT_DYNAMIC: Symbol = Symbol("short_dynamic");
pub const LIST: Symbol = Symbol("list");
pub const BYTES: Symbol = Symbol("bytes");

pub mod rust {
    use super::Symbol;

    pub const U8: Symbol = Symbol("u8");
    pub const I8: Symbol = Symbol("i8");
    pub const OPTION: Symbol = Symbol("Option");
    pub const VEC: Symbol = Symbol("Vec");
}

impl PartialEq<Symbol> for Ident {
    fn eq(&self, word: &Symbol) -> bool {
        self == word.0
    }
}

impl PartialEq<Symbol> for Path {
    fn eq(&self, word: &Symbol) -> bool {
        self.is_ident(word.0)
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}
