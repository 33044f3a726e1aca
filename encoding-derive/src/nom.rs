// Copyright (c) SimpleStaking, Viable Systems and Tezedge Contributors
// SPDX-FileCopyrightText: 2023 Nomadic Labs <contact@nomadic-labs.com>
// SPDX-FileCopyrightText: 2023-2024 TriliTech <contact@trili.tech>
//
// SPDX-License-Identifier: MIT

use proc_macro2::{Span, TokenStream};
use quote::{quote, quote_spanned};
use syn::{parse_quote, punctuated::Punctuated, spanned::Spanned};

use crate::constraints::{add_where_clauses, TokenStreamWithConstraints};
use crate::encoding::*;
use crate::symbol;

pub fn generate_nom_read_for_data(
    generics: &syn::Generics,
    data: &DataWithEncoding,
) -> TokenStream {
    let name = data.name;
    let TokenStreamWithConstraints {
        stream: nom_read,
        constraints,
    } = match &data.data {
        DataEncoding::Struct(encoding) => generate_struct_nom_read(encoding),
        DataEncoding::Enum(encoding) => generate_enum_nom_read(encoding),
    };
    // NomReader<'a> is derived for a fresh 'a, declared ahead of the type's
    // own generic parameters.
    let a: syn::GenericParam = parse_quote!('_a);
    let mut extended_generics = generics.clone();
    extended_generics.params.insert(0, a.clone());
    let (impl_generics, _, _) = extended_generics.split_for_impl();
    let (_, ty_generics, where_clause) = generics.split_for_impl();
    let where_clause = add_where_clauses(where_clause.cloned(), constraints, name.span());
    quote_spanned! {
        name.span()=>
        #[allow(unused_parens)]
        #[allow(clippy::unnecessary_cast)]
        #[allow(clippy::redundant_closure_call)]
        impl #impl_generics tezos_forge_encoding::nom::NomReader<#a> for #name #ty_generics #where_clause {
            fn nom_read(bytes: &#a [u8]) -> tezos_forge_encoding::nom::NomResult<#a, Self> {
                #nom_read
            }
        }
    }
}

/// Reads the fields one after the other, each from the tail left by the
/// previous one.
fn generate_struct_nom_read(encoding: &StructEncoding) -> TokenStreamWithConstraints {
    let field = encoding.fields.iter().map(|field| field.name);
    let field2 = field.clone();
    let mut constraints = Punctuated::new();
    let field_nom_read = encoding.fields.iter().map(|field| {
        let TokenStreamWithConstraints {
            stream,
            constraints: field_constraints,
        } = generate_nom_read(&field.encoding);
        constraints.extend(field_constraints);
        stream
    });
    let stream = quote! {
        let input = bytes;
        #(let (input, #field) = (#field_nom_read)(input)?;)*
        Ok((input, Self { #(#field2),* }))
    };
    TokenStreamWithConstraints {
        stream,
        constraints,
    }
}

fn generate_enum_nom_read(encoding: &EnumEncoding) -> TokenStreamWithConstraints {
    let tag_type = &encoding.tag_type;
    let tag_read = if *tag_type == symbol::rust::I8 {
        quote_spanned!(tag_type.span()=> ::nom::number::complete::i8)
    } else {
        quote_spanned!(tag_type.span()=> ::nom::number::complete::u8)
    };
    let mut constraints = Punctuated::new();
    let tags_nom_read = encoding.tags.iter().map(|tag| {
        let TokenStreamWithConstraints {
            stream,
            constraints: tag_constraints,
        } = generate_tag_nom_read(tag);
        constraints.extend(tag_constraints);
        stream
    });
    let stream = quote_spanned! {
        tag_type.span()=>
        let (input, tag) = #tag_read(bytes)?;
        #(#tags_nom_read)*
        Err(::nom::Err::Error(
            tezos_forge_encoding::nom::error::DecodeError::invalid_tag(bytes, tag as u8),
        ))
    };
    TokenStreamWithConstraints {
        stream,
        constraints,
    }
}

fn generate_tag_nom_read(tag: &Tag<'_>) -> TokenStreamWithConstraints {
    let tag_name = tag.name;
    let tag_id = &tag.id;
    match &tag.encoding {
        None => quote_spanned! {
            tag_name.span()=>
            if tag == #tag_id {
                return Ok((input, Self::#tag_name));
            }
        }
        .into(),
        Some(encoding) => generate_nom_read(encoding).map_stream(|nom_read| {
            quote_spanned! {
                tag_name.span()=>
                if tag == #tag_id {
                    let (input, inner) = (#nom_read)(input)?;
                    return Ok((input, Self::#tag_name(inner)));
                }
            }
        }),
    }
}

fn generate_nom_read(encoding: &Encoding) -> TokenStreamWithConstraints {
    match encoding {
        Encoding::Path(ty) => {
            let mut constraints = Punctuated::new();
            constraints
                .push(parse_quote!(#ty : for<'a> tezos_forge_encoding::nom::NomReader<'a>));
            TokenStreamWithConstraints {
                stream: quote_spanned!(ty.span()=> <#ty as tezos_forge_encoding::nom::NomReader>::nom_read),
                constraints,
            }
        }
        Encoding::Bytes(span) => generate_bytes_nom_read(*span).into(),
        Encoding::OptionField(encoding, span) => generate_optional_field_nom_read(encoding, *span),
        Encoding::List(_, encoding, span) => generate_list_nom_read(encoding, *span),
        Encoding::ShortDynamic(encoding, span) => generate_short_dynamic_nom_read(encoding, *span),
        Encoding::Dynamic(encoding, span) => generate_dynamic_nom_read(encoding, *span),
    }
}

fn generate_bytes_nom_read(span: Span) -> TokenStream {
    quote_spanned!(span=> tezos_forge_encoding::nom::rest_bytes)
}

fn generate_optional_field_nom_read(encoding: &Encoding, span: Span) -> TokenStreamWithConstraints {
    generate_nom_read(encoding).map_stream(
        |nom_read| quote_spanned!(span=> tezos_forge_encoding::nom::optional_field(#nom_read)),
    )
}

fn generate_list_nom_read(encoding: &Encoding, span: Span) -> TokenStreamWithConstraints {
    generate_nom_read(encoding)
        .map_stream(|nom_read| quote_spanned!(span=> tezos_forge_encoding::nom::list(#nom_read)))
}

fn generate_short_dynamic_nom_read(encoding: &Encoding, span: Span) -> TokenStreamWithConstraints {
    generate_nom_read(encoding).map_stream(
        |nom_read| quote_spanned!(span=> tezos_forge_encoding::nom::short_dynamic(#nom_read)),
    )
}

fn generate_dynamic_nom_read(encoding: &Encoding, span: Span) -> TokenStreamWithConstraints {
    generate_nom_read(encoding).map_stream(
        |nom_read| quote_spanned!(span=> tezos_forge_encoding::nom::dynamic(#nom_read)),
    )
}
