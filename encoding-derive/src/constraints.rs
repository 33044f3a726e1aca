// SPDX-FileCopyrightText: 2025 Nomadic Labs <contact@nomadic-labs.com>
// SPDX-License-Identifier: MIT

use proc_macro2::{Span, TokenStream};
use syn::{punctuated::Punctuated, Token, WhereClause, WherePredicate};

/// Generated tokens together with the `T: Trait` bounds they rely on,
/// gathered while walking an encoding and added to the impl's where clause.
pub(crate) struct TokenStreamWithConstraints {
    pub stream: TokenStream,
    pub constraints: Punctuated<WherePredicate, Token![,]>,
}

impl TokenStreamWithConstraints {
    pub fn map_stream(self, f: impl FnOnce(TokenStream) -> TokenStream) -> Self {
        let Self {
            stream,
            constraints,
        } = self;
        Self {
            stream: f(stream),
            constraints,
        }
    }
}

impl From<TokenStream> for TokenStreamWithConstraints {
    fn from(stream: TokenStream) -> Self {
        Self {
            stream,
            constraints: Punctuated::new(),
        }
    }
}

/// Extends `where_clause` with `constraints`, creating it when needed.
pub(crate) fn add_where_clauses(
    where_clause: Option<WhereClause>,
    constraints: Punctuated<WherePredicate, Token![,]>,
    span: Span,
) -> Option<WhereClause> {
    if constraints.is_empty() {
        return where_clause;
    }
    let mut where_clause = where_clause.unwrap_or_else(|| WhereClause {
        where_token: Token![where](span),
        predicates: Punctuated::new(),
    });
    where_clause.predicates.extend(constraints);
    Some(where_clause)
}
