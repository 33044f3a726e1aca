// SPDX-FileCopyrightText: [2023] Serokell <hi@serokell.io>
// SPDX-FileCopyrightText: 2024 TriliTech <contact@trili.tech>
//
// SPDX-License-Identifier: MIT

//! Owned Micheline expression tree.

use num_bigint::BigInt;

use crate::annotations::Annotations;
use crate::prim::Prim;

/// Micheline expression: literals, primitive applications and sequences.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Micheline {
    Int(BigInt),
    String(String),
    Bytes(Vec<u8>),
    App(Prim, Vec<Micheline>, Annotations),
    Seq(Vec<Micheline>),
}

impl Micheline {
    pub fn int(value: impl Into<BigInt>) -> Self {
        Micheline::Int(value.into())
    }

    pub fn string(value: impl Into<String>) -> Self {
        Micheline::String(value.into())
    }

    pub fn bytes(value: impl Into<Vec<u8>>) -> Self {
        Micheline::Bytes(value.into())
    }

    pub fn prim0(prim: Prim) -> Self {
        Micheline::App(prim, Vec::new(), Annotations::new())
    }

    pub fn prim1(prim: Prim, arg: Micheline) -> Self {
        Micheline::App(prim, vec![arg], Annotations::new())
    }

    pub fn prim2(prim: Prim, arg1: Micheline, arg2: Micheline) -> Self {
        Micheline::App(prim, vec![arg1, arg2], Annotations::new())
    }

    pub fn app(prim: Prim, args: Vec<Micheline>) -> Self {
        Micheline::App(prim, args, Annotations::new())
    }

    pub fn pair(left: Micheline, right: Micheline) -> Self {
        Self::prim2(Prim::Pair, left, right)
    }

    pub fn seq(items: Vec<Micheline>) -> Self {
        Micheline::Seq(items)
    }

    /// Same expression with `annotations` attached. Literals and sequences
    /// cannot carry annotations and are returned unchanged.
    pub fn with_annotations(self, annotations: Annotations) -> Self {
        match self {
            Micheline::App(prim, args, _) => Micheline::App(prim, args, annotations),
            other => other,
        }
    }

    pub fn prim(&self) -> Option<Prim> {
        match self {
            Micheline::App(prim, ..) => Some(*prim),
            _ => None,
        }
    }

    /// Arguments of an application, or the elements of a sequence.
    pub fn args(&self) -> &[Micheline] {
        match self {
            Micheline::App(_, args, _) | Micheline::Seq(args) => args,
            _ => &[],
        }
    }

    pub fn annotations(&self) -> Option<&Annotations> {
        match self {
            Micheline::App(_, _, annots) => Some(annots),
            _ => None,
        }
    }

    /// Short description of the node, for error messages.
    pub(crate) fn describe(&self) -> String {
        match self {
            Micheline::Int(n) => format!("int literal {n}"),
            Micheline::String(s) => format!("string literal {s:?}"),
            Micheline::Bytes(b) => format!("bytes literal 0x{}", hex::encode(b)),
            Micheline::App(prim, args, _) => format!("`{prim}` with {} arguments", args.len()),
            Micheline::Seq(items) => format!("sequence of {} elements", items.len()),
        }
    }
}

impl From<i64> for Micheline {
    fn from(value: i64) -> Self {
        Micheline::int(value)
    }
}

impl From<BigInt> for Micheline {
    fn from(value: BigInt) -> Self {
        Micheline::Int(value)
    }
}

impl From<&str> for Micheline {
    fn from(value: &str) -> Self {
        Micheline::string(value)
    }
}

impl From<String> for Micheline {
    fn from(value: String) -> Self {
        Micheline::String(value)
    }
}

impl From<Vec<u8>> for Micheline {
    fn from(value: Vec<u8>) -> Self {
        Micheline::Bytes(value)
    }
}

impl From<bool> for Micheline {
    fn from(value: bool) -> Self {
        Micheline::prim0(if value { Prim::True } else { Prim::False })
    }
}

impl From<()> for Micheline {
    fn from(_: ()) -> Self {
        Micheline::prim0(Prim::Unit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Annotation;

    #[test]
    fn accessors() -> Result<(), anyhow::Error> {
        let node = Micheline::prim2(
            Prim::pair,
            Micheline::prim0(Prim::nat),
            Micheline::prim0(Prim::int),
        )
        .with_annotations(Annotations::from(vec![Annotation::field("p")?]));
        assert_eq!(node.prim(), Some(Prim::pair));
        assert_eq!(node.args().len(), 2);
        assert_eq!(node.annotations().and_then(Annotations::field_name), Some("p"));

        let literal = Micheline::from(42i64);
        assert_eq!(literal.prim(), None);
        assert!(literal.args().is_empty());
        assert_eq!(literal.annotations(), None);

        Ok(())
    }

    #[test]
    fn conversions() {
        assert_eq!(Micheline::from(true), Micheline::prim0(Prim::True));
        assert_eq!(Micheline::from(()), Micheline::prim0(Prim::Unit));
        assert_eq!(Micheline::from("a"), Micheline::String("a".into()));
        assert_eq!(Micheline::from(vec![1u8]), Micheline::Bytes(vec![1]));
    }
}
