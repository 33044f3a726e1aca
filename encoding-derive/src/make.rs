// SPDX-FileCopyrightText: 2025 Functori <contact@functori.com>
// SPDX-License-Identifier: MIT

use proc_macro2::Span;
use syn::spanned::Spanned;

use crate::encoding::*;
use crate::symbol::{self, Symbol};

pub fn make_encoding(input: &syn::DeriveInput) -> syn::Result<DataWithEncoding<'_>> {
    let data = match &input.data {
        syn::Data::Struct(data) => DataEncoding::Struct(make_struct_encoding(&data.fields)?),
        syn::Data::Enum(data) => DataEncoding::Enum(make_enum_encoding(input, data)?),
        syn::Data::Union(_) => {
            return Err(syn::Error::new(
                input.ident.span(),
                "unions are not supported",
            ))
        }
    };
    Ok(DataWithEncoding {
        name: &input.ident,
        data,
    })
}

fn make_struct_encoding(fields: &syn::Fields) -> syn::Result<StructEncoding<'_>> {
    let syn::Fields::Named(fields) = fields else {
        return Err(syn::Error::new(
            fields.span(),
            "only structs with named fields are supported",
        ));
    };
    let fields = fields
        .named
        .iter()
        .map(|field| -> syn::Result<FieldEncoding> {
            let name = field
                .ident
                .as_ref()
                .ok_or_else(|| syn::Error::new(field.span(), "expected a named field"))?;
            let attrs = field_attributes(&field.attrs)?;
            let encoding = make_type_encoding(&field.ty, &attrs)?;
            Ok(FieldEncoding { name, encoding })
        })
        .collect::<syn::Result<_>>()?;
    Ok(StructEncoding { fields })
}

fn make_enum_encoding<'a>(
    input: &'a syn::DeriveInput,
    data: &'a syn::DataEnum,
) -> syn::Result<EnumEncoding<'a>> {
    if data.variants.is_empty() {
        return Err(syn::Error::new(
            input.ident.span(),
            "enums without variants are not supported",
        ));
    }
    let tag_type = tag_type(&input.attrs)?
        .unwrap_or_else(|| syn::Ident::new(&symbol::rust::U8.to_string(), input.ident.span()));

    let mut tags: Vec<Tag> = Vec::with_capacity(data.variants.len());
    for (index, variant) in data.variants.iter().enumerate() {
        let id = variant_tag(&variant.attrs)?
            .unwrap_or_else(|| syn::LitInt::new(&index.to_string(), variant.ident.span()));
        if let Some(other) = tags
            .iter()
            .find(|tag| tag.id.base10_digits() == id.base10_digits())
        {
            return Err(syn::Error::new(
                id.span(),
                format!("tag {} is already used by `{}`", id, other.name),
            ));
        }
        let encoding = match &variant.fields {
            syn::Fields::Unit => None,
            syn::Fields::Unnamed(fields) if fields.unnamed.len() == 1 => {
                let field = &fields.unnamed[0];
                Some(make_type_encoding(&field.ty, &field_attributes(&field.attrs)?)?)
            }
            fields => {
                return Err(syn::Error::new(
                    fields.span(),
                    "a variant is either a unit or holds a single unnamed field",
                ))
            }
        };
        tags.push(Tag {
            id,
            name: &variant.ident,
            encoding,
        });
    }
    Ok(EnumEncoding { tag_type, tags })
}

fn tag_type(attrs: &[syn::Attribute]) -> syn::Result<Option<syn::Ident>> {
    let mut tag_type = None;
    for attr in attrs.iter().filter(|attr| attr.path() == &symbol::ENCODING) {
        attr.parse_nested_meta(|meta| {
            if meta.path != symbol::TAGS {
                return Err(meta.error("expected `tags`"));
            }
            let lit: syn::LitStr = meta.value()?.parse()?;
            let ident: syn::Ident = lit.parse()?;
            if ident != symbol::rust::U8 && ident != symbol::rust::I8 {
                return Err(syn::Error::new(lit.span(), "tags are either `u8` or `i8`"));
            }
            tag_type = Some(ident);
            Ok(())
        })?;
    }
    Ok(tag_type)
}

fn variant_tag(attrs: &[syn::Attribute]) -> syn::Result<Option<syn::LitInt>> {
    let mut tag = None;
    for attr in attrs.iter().filter(|attr| attr.path() == &symbol::ENCODING) {
        attr.parse_nested_meta(|meta| {
            if meta.path != symbol::TAG {
                return Err(meta.error("expected `tag`"));
            }
            tag = Some(meta.value()?.parse()?);
            Ok(())
        })?;
    }
    Ok(tag)
}

/// One word of a field's `#[encoding(...)]`, outermost first.
#[derive(Clone, Copy)]
enum FieldAttribute {
    Dynamic(Span),
    ShortDynamic(Span),
    List(Span),
    Bytes(Span),
}

fn field_attributes(attrs: &[syn::Attribute]) -> syn::Result<Vec<FieldAttribute>> {
    const WORDS: [Symbol; 4] = [
        symbol::DYNAMIC,
        symbol::SHORT_DYNAMIC,
        symbol::LIST,
        symbol::BYTES,
    ];
    let mut words = Vec::new();
    for attr in attrs.iter().filter(|attr| attr.path() == &symbol::ENCODING) {
        attr.parse_nested_meta(|meta| {
            let span = meta.path.span();
            let word = if meta.path == symbol::DYNAMIC {
                FieldAttribute::Dynamic(span)
            } else if meta.path == symbol::SHORT_DYNAMIC {
                FieldAttribute::ShortDynamic(span)
            } else if meta.path == symbol::LIST {
                FieldAttribute::List(span)
            } else if meta.path == symbol::BYTES {
                FieldAttribute::Bytes(span)
            } else {
                let expected: Vec<_> = WORDS.iter().map(|word| format!("`{word}`")).collect();
                return Err(meta.error(format!("expected one of {}", expected.join(", "))));
            };
            words.push(word);
            Ok(())
        })?;
    }
    Ok(words)
}

fn make_type_encoding<'a>(
    ty: &'a syn::Type,
    attrs: &[FieldAttribute],
) -> syn::Result<Encoding<'a>> {
    if attrs.is_empty() {
        return Ok(Encoding::Path(ty));
    }
    if let Some(inner) = generic_argument(ty, symbol::rust::OPTION) {
        let encoding = make_type_encoding(inner, attrs)?;
        return Ok(Encoding::OptionField(Box::new(encoding), ty.span()));
    }
    match attrs {
        [] => Ok(Encoding::Path(ty)),
        [FieldAttribute::Dynamic(span), rest @ ..] => Ok(Encoding::Dynamic(
            Box::new(make_type_encoding(ty, rest)?),
            *span,
        )),
        [FieldAttribute::ShortDynamic(span), rest @ ..] => Ok(Encoding::ShortDynamic(
            Box::new(make_type_encoding(ty, rest)?),
            *span,
        )),
        [FieldAttribute::List(span), rest @ ..] => {
            let element = generic_argument(ty, symbol::rust::VEC)
                .ok_or_else(|| syn::Error::new(*span, "`list` expects a `Vec<T>` field"))?;
            Ok(Encoding::List(
                element,
                Box::new(make_type_encoding(element, rest)?),
                *span,
            ))
        }
        [FieldAttribute::Bytes(span)] => Ok(Encoding::Bytes(*span)),
        [FieldAttribute::Bytes(span), ..] => Err(syn::Error::new(
            *span,
            "`bytes` reads up to the end of the input and must come last",
        )),
    }
}

/// `T` when `ty` is `Wrapper<T>`.
fn generic_argument(ty: &syn::Type, wrapper: Symbol) -> Option<&syn::Type> {
    let syn::Type::Path(syn::TypePath { qself: None, path }) = ty else {
        return None;
    };
    let segment = path.segments.last()?;
    if segment.ident != wrapper {
        return None;
    }
    let syn::PathArguments::AngleBracketed(args) = &segment.arguments else {
        return None;
    };
    match args.args.first() {
        Some(syn::GenericArgument::Type(inner)) if args.args.len() == 1 => Some(inner),
        _ => None,
    }
}
