// SPDX-FileCopyrightText: [2023] Serokell <hi@serokell.io>
// SPDX-FileCopyrightText: [2022-2023] TriliTech <contact@trili.tech>
//
// SPDX-License-Identifier: MIT

//! Micheline deserialization.

use nom::combinator::map;
use nom::number::complete::u8 as tag_byte;
use tezos_forge_encoding::nom::error::DecodeError;
use tezos_forge_encoding::nom::{self as nom_enc, NomInput, NomReader, NomResult};

use crate::annotations::Annotations;
use crate::ast::Micheline;
use crate::encode::*;
use crate::prim::Prim;

/// Deepest nesting accepted from untrusted input.
pub(crate) const MAX_NESTING: usize = 512;

impl<'a> NomReader<'a> for Micheline {
    fn nom_read(input: &'a [u8]) -> NomResult<'a, Self> {
        decode_micheline(input, 0)
    }
}

fn decode_micheline(input: NomInput, depth: usize) -> NomResult<Micheline> {
    if depth > MAX_NESTING {
        return Err(nom::Err::Failure(DecodeError::invalid_value(
            input,
            "expression nested too deeply",
        )));
    }
    let (rest, tag) = tag_byte(input)?;
    match tag {
        NUMBER_TAG => map(nom_enc::z_bignum, Micheline::Int)(rest),
        STRING_TAG => map(nom_enc::dynamic(michelson_string), Micheline::String)(rest),
        BYTES_TAG => map(nom_enc::dynamic(nom_enc::rest_bytes), Micheline::Bytes)(rest),
        SEQ_TAG => map(nom_enc::dynamic(elements(depth)), Micheline::Seq)(rest),
        APP_NO_ARGS_NO_ANNOTS_TAG => decode_app(rest, depth, 0, false),
        APP_NO_ARGS_WITH_ANNOTS_TAG => decode_app(rest, depth, 0, true),
        APP_ONE_ARG_NO_ANNOTS_TAG => decode_app(rest, depth, 1, false),
        APP_ONE_ARG_WITH_ANNOTS_TAG => decode_app(rest, depth, 1, true),
        APP_TWO_ARGS_NO_ANNOTS_TAG => decode_app(rest, depth, 2, false),
        APP_TWO_ARGS_WITH_ANNOTS_TAG => decode_app(rest, depth, 2, true),
        APP_GENERIC => {
            let (rest, prim) = Prim::nom_read(rest)?;
            let (rest, args) = nom_enc::dynamic(elements(depth))(rest)?;
            let (rest, annots) = annotations(rest)?;
            Ok((rest, Micheline::App(prim, args, annots)))
        }
        tag => Err(nom::Err::Error(DecodeError::invalid_tag(input, tag))),
    }
}

fn elements<'a>(depth: usize) -> impl FnMut(NomInput<'a>) -> NomResult<'a, Vec<Micheline>> {
    nom_enc::list(move |input| decode_micheline(input, depth + 1))
}

fn decode_app(
    input: NomInput,
    depth: usize,
    arity: usize,
    annotated: bool,
) -> NomResult<Micheline> {
    let (mut input, prim) = Prim::nom_read(input)?;
    let mut args = Vec::with_capacity(arity);
    for _ in 0..arity {
        let (rest, arg) = decode_micheline(input, depth + 1)?;
        input = rest;
        args.push(arg);
    }
    let (input, annots) = if annotated {
        annotations(input)?
    } else {
        (input, Annotations::new())
    };
    Ok((input, Micheline::App(prim, args, annots)))
}

fn michelson_string(input: NomInput) -> NomResult<String> {
    match input.iter().position(|c| !is_michelson_char(c)) {
        Some(pos) => Err(nom::Err::Error(DecodeError::invalid_value(
            &input[pos..],
            "forbidden character in string",
        ))),
        None => nom_enc::string(input.len())(input),
    }
}

fn annotations(input: NomInput) -> NomResult<Annotations> {
    let (rest, raw) = nom_enc::dynamic(michelson_string)(input)?;
    let annots = Annotations::parse(&raw)
        .map_err(|e| nom::Err::Error(DecodeError::invalid_value(input, e.to_string())))?;
    Ok((rest, annots))
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use tezos_forge_encoding::enc::BinWriter;
    use tezos_forge_encoding::nom::error::DecodeErrorKind;

    use super::*;

    // To figure out the expected bytes, use
    // octez-client convert data 'VALUE' from michelson to binary
    #[track_caller]
    fn check(expected: impl Into<Micheline>, bytes: &str) {
        let expected = expected.into();
        let decoded = Micheline::from_bytes(&hex::decode(bytes).unwrap()).unwrap();
        assert_eq!(decoded, expected);
        assert_eq!(hex::encode(decoded.to_bytes().unwrap()), bytes);
    }

    #[track_caller]
    fn check_err(bytes: &str, kind: DecodeErrorKind) {
        let err = Micheline::from_bytes(&hex::decode(bytes).unwrap()).unwrap_err();
        assert_eq!(err.kind(), kind, "{err}");
    }

    #[test]
    fn primitive_values() {
        check((), "030b");
        check(true, "030a");
        check(false, "0303");
    }

    #[test]
    fn numbers() {
        check(Micheline::int(0), "0000");
        check(Micheline::int(-36), "0064");
        check(Micheline::int(-63), "007f");
        check(Micheline::int(123456789), "0095b4de75");
        check(Micheline::int(-987654321), "00f1a2f3ad07");
    }

    #[test]
    fn literals() {
        check("abc", "0100000003616263");
        check(vec![0x00u8, 0x12, 0x34, 0xab, 0xff], "0a00000005001234abff");
        check(
            Micheline::seq(vec![
                Micheline::pair(Micheline::int(3), Micheline::int(4)),
                Micheline::pair(Micheline::int(5), Micheline::int(6)),
            ]),
            "020000000c070700030004070700050006",
        );
    }

    #[test]
    fn very_long_list() {
        let units = "030b".repeat(1000);
        check(
            Micheline::seq(vec![().into(); 1000]),
            &format!("02000007d0{units}"),
        );
    }

    #[test]
    fn annotations() -> Result<(), anyhow::Error> {
        check(
            Micheline::App(Prim::int, vec![], Annotations::parse("@abc123")?),
            "045b0000000740616263313233",
        );
        check(
            Micheline::App(
                Prim::LAMBDA,
                vec![
                    Micheline::App(Prim::int, vec![], Annotations::parse("%a")?),
                    Micheline::App(Prim::int, vec![], Annotations::parse(":b")?),
                    Micheline::seq(vec![]),
                ],
                Annotations::new(),
            ),
            "093100000015045b000000022561045b000000023a62020000000000000000",
        );

        Ok(())
    }

    #[test]
    fn errors() {
        check_err("030b00", DecodeErrorKind::TrailingBytes);
        check_err("", DecodeErrorKind::TruncatedInput);
        check_err("03", DecodeErrorKind::TruncatedInput);
        check_err("02", DecodeErrorKind::TruncatedInput);
        check_err("09", DecodeErrorKind::TruncatedInput);
        check_err("0100000005616263", DecodeErrorKind::TruncatedInput);
        check_err("0080", DecodeErrorKind::TruncatedInput);
        check_err("ff", DecodeErrorKind::InvalidTag);
        check_err("03ff", DecodeErrorKind::UnknownPrimitive);
        check_err("010000000100", DecodeErrorKind::InvalidValue);
        check_err("045b00000002257f", DecodeErrorKind::InvalidValue);
        check_err("045b000000026161", DecodeErrorKind::InvalidValue);
    }

    #[test]
    fn sequence_must_fill_its_frame() {
        // The frame announces 3 bytes but holds one full element and a half.
        check_err("0200000003030b03", DecodeErrorKind::TruncatedInput);
    }

    #[test]
    fn nesting_is_bounded() {
        let depth = MAX_NESTING + 2;
        let mut bytes = Vec::new();
        for _ in 0..depth {
            bytes.extend_from_slice(&[APP_ONE_ARG_NO_ANNOTS_TAG, Prim::Some.code()]);
        }
        bytes.extend_from_slice(&[APP_NO_ARGS_NO_ANNOTS_TAG, Prim::Unit.code()]);
        check_err(&hex::encode(&bytes), DecodeErrorKind::InvalidValue);

        let mut node = Micheline::from(());
        for _ in 0..MAX_NESTING {
            node = Micheline::prim1(Prim::Some, node);
        }
        assert_eq!(Micheline::from_bytes(&node.to_bytes().unwrap()), Ok(node));
    }

    fn arb_micheline() -> impl Strategy<Value = Micheline> {
        let leaf = prop_oneof![
            any::<i64>().prop_map(Micheline::int),
            "[a-zA-Z0-9 _%]{0,12}".prop_map(Micheline::string),
            prop::collection::vec(any::<u8>(), 0..8).prop_map(Micheline::bytes),
        ];
        let prims = vec![Prim::Pair, Prim::Some, Prim::Unit, Prim::Elt, Prim::DIP, Prim::pair];
        leaf.prop_recursive(4, 32, 4, move |inner| {
            prop_oneof![
                (
                    prop::sample::select(prims.clone()),
                    prop::collection::vec(inner.clone(), 0..4)
                )
                    .prop_map(|(prim, args)| Micheline::app(prim, args)),
                prop::collection::vec(inner, 0..4).prop_map(Micheline::seq),
            ]
        })
    }

    proptest! {
        #[test]
        fn binary_roundtrip(node in arb_micheline()) {
            let bytes = node.to_bytes().unwrap();
            prop_assert_eq!(Micheline::from_bytes(&bytes), Ok(node));
        }
    }
}
