// SPDX-FileCopyrightText: 2025 Functori <contact@functori.com>
// SPDX-License-Identifier: MIT

//! Layout of a deriving type, as read from its definition and attributes.

use proc_macro2::Span;

pub struct DataWithEncoding<'a> {
    pub name: &'a syn::Ident,
    pub data: DataEncoding<'a>,
}

pub enum DataEncoding<'a> {
    Struct(StructEncoding<'a>),
    Enum(EnumEncoding<'a>),
}

pub struct StructEncoding<'a> {
    pub fields: Vec<FieldEncoding<'a>>,
}

pub struct FieldEncoding<'a> {
    pub name: &'a syn::Ident,
    pub encoding: Encoding<'a>,
}

pub struct EnumEncoding<'a> {
    /// Either `u8` or `i8`.
    pub tag_type: syn::Ident,
    pub tags: Vec<Tag<'a>>,
}

pub struct Tag<'a> {
    pub id: syn::LitInt,
    pub name: &'a syn::Ident,
    /// `None` for a unit variant: nothing follows the tag.
    pub encoding: Option<Encoding<'a>>,
}

/// Encoding of a single value.
pub enum Encoding<'a> {
    /// The type's own `NomReader` and `BinWriter` implementations.
    Path(&'a syn::Type),
    /// Raw bytes up to the end of the input.
    Bytes(Span),
    OptionField(Box<Encoding<'a>>, Span),
    /// Element type and element encoding of a `Vec`.
    List(&'a syn::Type, Box<Encoding<'a>>, Span),
    ShortDynamic(Box<Encoding<'a>>, Span),
    Dynamic(Box<Encoding<'a>>, Span),
}
