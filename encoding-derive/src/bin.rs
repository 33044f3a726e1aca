// Copyright (c) SimpleStaking and Tezedge Contributors
// SPDX-FileCopyrightText: 2023 Nomadic Labs <contact@nomadic-labs.com>
// SPDX-FileCopyrightText: 2023 TriliTech <contact@trili.tech>
// SPDX-License-Identifier: MIT

use proc_macro2::{Span, TokenStream};
use quote::{quote, quote_spanned};
use syn::{parse_quote, punctuated::Punctuated, spanned::Spanned};

use crate::constraints::{add_where_clauses, TokenStreamWithConstraints};
use crate::encoding::*;

pub fn generate_bin_write_for_data(
    generics: &syn::Generics,
    data: &DataWithEncoding,
) -> TokenStream {
    let name = data.name;
    let TokenStreamWithConstraints {
        stream: bin_write,
        constraints,
    } = match &data.data {
        DataEncoding::Struct(encoding) => generate_struct_bin_write(encoding),
        DataEncoding::Enum(encoding) => generate_enum_bin_write(encoding),
    };
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();
    let where_clause = add_where_clauses(where_clause.cloned(), constraints, name.span());
    quote_spanned! {
        name.span()=>
        #[allow(unused_parens)]
        #[allow(clippy::redundant_closure_call)]
        impl #impl_generics tezos_forge_encoding::enc::BinWriter for #name #ty_generics #where_clause {
            fn bin_write(&self, out: &mut Vec<u8>) -> tezos_forge_encoding::enc::BinResult {
                #bin_write
            }
        }
    }
}

fn generate_struct_bin_write(encoding: &StructEncoding) -> TokenStreamWithConstraints {
    let field = encoding.fields.iter().map(|field| field.name);
    let mut constraints = Punctuated::new();
    let field_bin_write = encoding.fields.iter().map(|field| {
        let TokenStreamWithConstraints {
            stream,
            constraints: field_constraints,
        } = generate_bin_write(&field.encoding);
        constraints.extend(field_constraints);
        stream
    });
    let stream = quote! {
        #((#field_bin_write)(&self.#field, out)?;)*
        Ok(())
    };
    TokenStreamWithConstraints {
        stream,
        constraints,
    }
}

fn generate_enum_bin_write(encoding: &EnumEncoding) -> TokenStreamWithConstraints {
    let tag_type = &encoding.tag_type;
    let tag_write = quote_spanned!(tag_type.span()=> tezos_forge_encoding::enc::#tag_type);
    let mut constraints = Punctuated::new();
    let tags_bin_write = encoding.tags.iter().map(|tag| {
        let TokenStreamWithConstraints {
            stream,
            constraints: tag_constraints,
        } = generate_tag_bin_write(tag, &tag_write);
        constraints.extend(tag_constraints);
        stream
    });
    let stream = quote_spanned! {
        tag_type.span()=>
        match self {
            #(#tags_bin_write),*
        }
    };
    TokenStreamWithConstraints {
        stream,
        constraints,
    }
}

fn generate_tag_bin_write(tag: &Tag<'_>, tag_write: &TokenStream) -> TokenStreamWithConstraints {
    let tag_name = tag.name;
    let tag_id = &tag.id;
    match &tag.encoding {
        None => quote_spanned!(tag_name.span()=> Self::#tag_name => #tag_write(&#tag_id, out)).into(),
        Some(encoding) => generate_bin_write(encoding).map_stream(|bin_write| {
            quote_spanned! {
                tag_name.span()=>
                Self::#tag_name(inner) => {
                    #tag_write(&#tag_id, out)?;
                    (#bin_write)(inner, out)
                }
            }
        }),
    }
}

fn generate_bin_write(encoding: &Encoding) -> TokenStreamWithConstraints {
    match encoding {
        Encoding::Path(ty) => {
            let mut constraints = Punctuated::new();
            constraints.push(parse_quote!(#ty : tezos_forge_encoding::enc::BinWriter));
            TokenStreamWithConstraints {
                stream: quote_spanned!(ty.span()=> <#ty as tezos_forge_encoding::enc::BinWriter>::bin_write),
                constraints,
            }
        }
        Encoding::Bytes(span) => generate_bytes_bin_write(*span).into(),
        Encoding::OptionField(encoding, span) => generate_optional_field_bin_write(encoding, *span),
        Encoding::List(element, encoding, span) => generate_list_bin_write(element, encoding, *span),
        Encoding::ShortDynamic(encoding, span) => generate_short_dynamic_bin_write(encoding, *span),
        Encoding::Dynamic(encoding, span) => generate_dynamic_bin_write(encoding, *span),
    }
}

fn generate_bytes_bin_write(span: Span) -> TokenStream {
    quote_spanned!(span=> tezos_forge_encoding::enc::bytes)
}

fn generate_optional_field_bin_write(
    encoding: &Encoding,
    span: Span,
) -> TokenStreamWithConstraints {
    generate_bin_write(encoding).map_stream(
        |bin_write| quote_spanned!(span=> tezos_forge_encoding::enc::optional_field(#bin_write)),
    )
}

/// Element writers may be single-use combinators, so one is built for every
/// element.
fn generate_list_bin_write(
    element: &syn::Type,
    encoding: &Encoding,
    span: Span,
) -> TokenStreamWithConstraints {
    generate_bin_write(encoding).map_stream(|bin_write| {
        quote_spanned! {
            span=>
            |data: &Vec<#element>, out: &mut Vec<u8>| {
                tezos_forge_encoding::enc::list(|item: &#element, out: &mut Vec<u8>| {
                    (#bin_write)(item, out)
                })(data.as_slice(), out)
            }
        }
    })
}

fn generate_short_dynamic_bin_write(encoding: &Encoding, span: Span) -> TokenStreamWithConstraints {
    generate_bin_write(encoding).map_stream(
        |bin_write| quote_spanned!(span=> tezos_forge_encoding::enc::short_dynamic(#bin_write)),
    )
}

fn generate_dynamic_bin_write(encoding: &Encoding, span: Span) -> TokenStreamWithConstraints {
    generate_bin_write(encoding).map_stream(
        |bin_write| quote_spanned!(span=> tezos_forge_encoding::enc::dynamic(#bin_write)),
    )
}
