// SPDX-FileCopyrightText: 2024 TriliTech <contact@trili.tech>
//
// SPDX-License-Identifier: MIT

//! Type-directed `PACK` and `UNPACK`.
//!
//! Michelson values have a readable and an optimized form. Addresses, keys,
//! key hashes, signatures and chain ids are base58 strings in the former and
//! raw bytes in the latter; timestamps are RFC 3339 strings or seconds since
//! the epoch. When a type is supplied, [`pack`] turns readable leaves into
//! their optimized form before encoding, and [`unpack`] turns them back after
//! decoding. Without a type, the expression is encoded as is.
//!
//! Typed unpacking always yields the readable form, which is canonical:
//! timestamps come back as `YYYY-MM-DDTHH:MM:SSZ` and identifiers as
//! base58. A value written with optimized leaves, or with a timestamp
//! offset other than `Z`, unpacks to the same value in readable form, so
//! `unpack(pack(v, ty), ty) == readable(v, ty)`. Timestamps with fractional
//! seconds have no optimized form and are rejected.
//!
//! The shape of the value is preserved: a right comb written as
//! `Pair a b c` stays a three-argument `Pair`, and a comb written as a
//! sequence stays a sequence.

use chrono::DateTime;
use num_bigint::BigInt;
use num_traits::ToPrimitive;
use tezos_forge_crypto::hash::{ChainId, ScriptExprHash};
use tezos_forge_crypto::{
    Address, AddressError, CryptoProvider, IdentifierError, PublicKey, PublicKeyHash, Signature,
};
use tezos_forge_encoding::enc::BinWriter;
use tezos_forge_encoding::nom::error::DecodeError;
use tezos_forge_encoding::nom::NomReader;
use tracing::debug;

use crate::annotations::Annotations;
use crate::ast::Micheline;
use crate::prim::Prim;
use crate::MichelineError;

/// First byte of packed data.
pub const PACK_WATERMARK: u8 = 0x05;

/// Layout of timestamps in their readable form.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Encodes `node`, without the watermark. `pack(0)` is `0x0000`.
pub fn pack(node: &Micheline, schema: Option<&Micheline>) -> Result<Vec<u8>, MichelineError> {
    let bytes = match schema {
        Some(ty) => optimize(node, ty)?.to_bytes()?,
        None => node.to_bytes()?,
    };
    debug!(size = bytes.len(), typed = schema.is_some(), "packed expression");
    Ok(bytes)
}

/// Decodes bytes produced by [`pack`], which must span the whole input.
pub fn unpack(bytes: &[u8], schema: Option<&Micheline>) -> Result<Micheline, MichelineError> {
    debug!(size = bytes.len(), typed = schema.is_some(), "unpacking expression");
    let node = Micheline::from_bytes(bytes)?;
    match schema {
        Some(ty) => readable(&node, ty),
        None => Ok(node),
    }
}

/// Same as [`pack`], prefixed with the `0x05` watermark, as the `PACK`
/// instruction does.
pub fn pack_expression(
    node: &Micheline,
    schema: Option<&Micheline>,
) -> Result<Vec<u8>, MichelineError> {
    let mut bytes = vec![PACK_WATERMARK];
    bytes.extend_from_slice(&pack(node, schema)?);
    Ok(bytes)
}

/// Inverse of [`pack_expression`].
pub fn unpack_expression(
    bytes: &[u8],
    schema: Option<&Micheline>,
) -> Result<Micheline, MichelineError> {
    match bytes.split_first() {
        Some((&PACK_WATERMARK, rest)) => unpack(rest, schema),
        Some(_) => Err(MichelineError::MissingWatermark),
        None => Err(DecodeError::truncated(bytes).into()),
    }
}

/// `expr…` hash of the packed expression, as used for big map keys and
/// global constants.
pub fn script_expr_hash<P: CryptoProvider + ?Sized>(
    provider: &P,
    node: &Micheline,
    schema: Option<&Micheline>,
) -> Result<ScriptExprHash, MichelineError> {
    let packed = pack_expression(node, schema)?;
    Ok(ScriptExprHash::digest(provider, &packed)?)
}

/// Converts the readable leaves of `value` to their optimized form.
pub fn optimize(value: &Micheline, ty: &Micheline) -> Result<Micheline, MichelineError> {
    convert(value, ty, Direction::Optimize)
}

/// Converts the optimized leaves of `value` to their readable form.
pub fn readable(value: &Micheline, ty: &Micheline) -> Result<Micheline, MichelineError> {
    convert(value, ty, Direction::Readable)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Optimize,
    Readable,
}

fn convert(value: &Micheline, ty: &Micheline, dir: Direction) -> Result<Micheline, MichelineError> {
    let Micheline::App(prim, targs, _) = ty else {
        return Err(MichelineError::mismatch("a type", ty.describe()));
    };
    match (prim, targs.as_slice()) {
        // A whole `parameter` or `storage` section stands for its type.
        (Prim::parameter | Prim::storage, [ty]) => convert(value, ty, dir),
        (Prim::pair, targs) if targs.len() >= 2 => match value {
            Micheline::App(Prim::Pair, values, annots) if values.len() >= 2 => Ok(Micheline::App(
                Prim::Pair,
                convert_comb(values, targs, dir)?,
                annots.clone(),
            )),
            Micheline::Seq(values) if values.len() >= 2 => {
                Ok(Micheline::Seq(convert_comb(values, targs, dir)?))
            }
            _ => Err(MichelineError::mismatch("a pair", value.describe())),
        },
        (Prim::option, [inner]) => match value {
            Micheline::App(Prim::Some, args, annots) if args.len() == 1 => Ok(Micheline::App(
                Prim::Some,
                vec![convert(&args[0], inner, dir)?],
                annots.clone(),
            )),
            Micheline::App(Prim::None, args, _) if args.is_empty() => Ok(value.clone()),
            _ => Err(MichelineError::mismatch("an option", value.describe())),
        },
        (Prim::or, [left, right]) => match value {
            Micheline::App(side @ (Prim::Left | Prim::Right), args, annots) if args.len() == 1 => {
                let ty = if *side == Prim::Left { left } else { right };
                Ok(Micheline::App(
                    *side,
                    vec![convert(&args[0], ty, dir)?],
                    annots.clone(),
                ))
            }
            _ => Err(MichelineError::mismatch("a union", value.describe())),
        },
        (Prim::list | Prim::set, [elt]) => match value {
            Micheline::Seq(items) => items
                .iter()
                .map(|item| convert(item, elt, dir))
                .collect::<Result<_, _>>()
                .map(Micheline::Seq),
            _ => Err(MichelineError::mismatch("a sequence", value.describe())),
        },
        (Prim::map | Prim::big_map, [key, val]) => match value {
            Micheline::Seq(items) => items
                .iter()
                .map(|item| convert_elt(item, key, val, dir))
                .collect::<Result<_, _>>()
                .map(Micheline::Seq),
            // Big map id
            Micheline::Int(_) if *prim == Prim::big_map => Ok(value.clone()),
            _ => Err(MichelineError::mismatch("a map", value.describe())),
        },
        // Code is packed as written.
        (Prim::lambda, [_, _]) => Ok(value.clone()),
        (
            Prim::address
            | Prim::key
            | Prim::key_hash
            | Prim::signature
            | Prim::chain_id
            | Prim::timestamp
            | Prim::bytes,
            [],
        )
        | (Prim::contract, [_]) => convert_leaf(*prim, value, dir),
        (Prim::int | Prim::nat | Prim::mutez, []) => match value {
            Micheline::Int(_) => Ok(value.clone()),
            _ => Err(MichelineError::mismatch(prim, value.describe())),
        },
        (Prim::string, []) => match value {
            Micheline::String(_) => Ok(value.clone()),
            _ => Err(MichelineError::mismatch(prim, value.describe())),
        },
        (Prim::bool, []) => match value.prim() {
            Some(Prim::True | Prim::False) => Ok(value.clone()),
            _ => Err(MichelineError::mismatch(prim, value.describe())),
        },
        (Prim::unit, []) => match value.prim() {
            Some(Prim::Unit) => Ok(value.clone()),
            _ => Err(MichelineError::mismatch(prim, value.describe())),
        },
        (
            Prim::pair
            | Prim::option
            | Prim::or
            | Prim::list
            | Prim::set
            | Prim::map
            | Prim::big_map
            | Prim::lambda
            | Prim::address
            | Prim::contract
            | Prim::key
            | Prim::key_hash
            | Prim::signature
            | Prim::chain_id
            | Prim::timestamp
            | Prim::bytes
            | Prim::int
            | Prim::nat
            | Prim::mutez
            | Prim::string
            | Prim::bool
            | Prim::unit,
            _,
        ) => Err(MichelineError::mismatch(
            format!("a well-formed `{prim}` type"),
            ty.describe(),
        )),
        // Types without readable leaves.
        (prim, _) if prim.is_type() => Ok(value.clone()),
        _ => Err(MichelineError::mismatch("a type", ty.describe())),
    }
}

/// Converts the components of a right comb. Either side may be flattened:
/// `Pair a b c` matches `pair ta (pair tb tc)`, and `Pair a (Pair b c)`
/// matches `pair ta tb tc`.
fn convert_comb(
    values: &[Micheline],
    types: &[Micheline],
    dir: Direction,
) -> Result<Vec<Micheline>, MichelineError> {
    let mut out = Vec::with_capacity(values.len());
    for (i, value) in values.iter().enumerate() {
        if i + 1 == values.len() {
            // The last value is the comb of all remaining types.
            match &types[i..] {
                [ty] => out.push(convert(value, ty, dir)?),
                rest => {
                    let comb = Micheline::App(Prim::pair, rest.to_vec(), Annotations::new());
                    out.push(convert(value, &comb, dir)?)
                }
            }
            break;
        }
        if i + 1 == types.len() {
            // The last type is a pair covering all remaining values.
            match &types[i] {
                Micheline::App(Prim::pair, inner, _) if inner.len() >= 2 => {
                    out.extend(convert_comb(&values[i..], inner, dir)?)
                }
                ty => return Err(MichelineError::mismatch(ty.describe(), "a right comb")),
            }
            break;
        }
        out.push(convert(value, &types[i], dir)?);
    }
    Ok(out)
}

fn convert_elt(
    item: &Micheline,
    key: &Micheline,
    val: &Micheline,
    dir: Direction,
) -> Result<Micheline, MichelineError> {
    match item {
        Micheline::App(Prim::Elt, args, annots) if args.len() == 2 => Ok(Micheline::App(
            Prim::Elt,
            vec![convert(&args[0], key, dir)?, convert(&args[1], val, dir)?],
            annots.clone(),
        )),
        _ => Err(MichelineError::mismatch("a map entry", item.describe())),
    }
}

fn convert_leaf(ty: Prim, value: &Micheline, dir: Direction) -> Result<Micheline, MichelineError> {
    match (dir, value) {
        (Direction::Optimize, Micheline::String(text)) => optimize_leaf(ty, text),
        (Direction::Readable, Micheline::Bytes(bytes)) if ty != Prim::bytes => {
            readable_leaf(ty, bytes)
        }
        (Direction::Readable, Micheline::Int(secs)) if ty == Prim::timestamp => {
            Ok(readable_timestamp(secs).map_or_else(|| value.clone(), Micheline::String))
        }
        (_, Micheline::String(_)) => Ok(value.clone()),
        (_, Micheline::Bytes(_)) if ty != Prim::timestamp => Ok(value.clone()),
        (_, Micheline::Int(_)) if ty == Prim::timestamp => Ok(value.clone()),
        _ => Err(MichelineError::mismatch(ty, value.describe())),
    }
}

fn optimize_leaf(ty: Prim, text: &str) -> Result<Micheline, MichelineError> {
    let invalid = |source: IdentifierError| MichelineError::Identifier { ty, source };
    let bytes = match ty {
        Prim::address | Prim::contract => Address::from_b58check(text)
            .map_err(|e| match e {
                AddressError::Identifier(source) => invalid(source),
                e => MichelineError::InvalidLiteral {
                    ty,
                    reason: e.to_string(),
                },
            })?
            .to_bytes()?,
        Prim::key => PublicKey::from_b58check(text).map_err(invalid)?.to_bytes()?,
        Prim::key_hash => PublicKeyHash::from_b58check(text)
            .map_err(invalid)?
            .to_bytes()?,
        Prim::signature => Signature::from_b58check(text)
            .map_err(invalid)?
            .as_ref()
            .to_vec(),
        Prim::chain_id => ChainId::from_b58check(text)
            .map_err(invalid)?
            .as_ref()
            .to_vec(),
        Prim::timestamp => {
            let time =
                DateTime::parse_from_rfc3339(text).map_err(|e| MichelineError::InvalidLiteral {
                    ty,
                    reason: e.to_string(),
                })?;
            if time.timestamp_subsec_nanos() != 0 {
                return Err(MichelineError::InvalidLiteral {
                    ty,
                    reason: format!("{text} has fractional seconds"),
                });
            }
            return Ok(Micheline::int(time.timestamp()));
        }
        _ => {
            let hex = text.strip_prefix("0x").unwrap_or(text);
            hex::decode(hex).map_err(|e| MichelineError::InvalidLiteral {
                ty,
                reason: e.to_string(),
            })?
        }
    };
    Ok(Micheline::Bytes(bytes))
}

fn readable_leaf(ty: Prim, bytes: &[u8]) -> Result<Micheline, MichelineError> {
    let mismatch = |detail: String| {
        MichelineError::mismatch(ty, format!("bytes 0x{} ({detail})", hex::encode(bytes)))
    };
    let text = match ty {
        Prim::address | Prim::contract => Address::from_bytes(bytes)
            .map_err(|e: DecodeError| mismatch(e.to_string()))?
            .to_b58check(),
        Prim::key => PublicKey::from_bytes(bytes)
            .map_err(|e| mismatch(e.to_string()))?
            .to_b58check(),
        Prim::key_hash => PublicKeyHash::from_bytes(bytes)
            .map_err(|e| mismatch(e.to_string()))?
            .to_b58check(),
        Prim::signature => Signature::try_from(bytes)
            .map_err(|e| mismatch(e.to_string()))?
            .to_b58check(),
        Prim::chain_id => ChainId::try_from(bytes)
            .map_err(|e| mismatch(e.to_string()))?
            .to_b58check(),
        _ => return Err(mismatch("not a timestamp".into())),
    };
    Ok(Micheline::String(text))
}

/// `None` when the instant is out of the representable range, in which
/// case the timestamp stays numeric.
fn readable_timestamp(secs: &BigInt) -> Option<String> {
    let time = DateTime::from_timestamp(secs.to_i64()?, 0)?;
    Some(time.format(TIMESTAMP_FORMAT).to_string())
}

#[cfg(test)]
mod tests {
    use tezos_forge_crypto::DefaultCryptoProvider;
    use tezos_forge_encoding::nom::error::DecodeErrorKind;

    use super::*;

    fn ty(prim: Prim) -> Micheline {
        Micheline::prim0(prim)
    }

    fn some(value: Micheline) -> Micheline {
        Micheline::prim1(Prim::Some, value)
    }

    #[track_caller]
    fn roundtrip(value: &Micheline, schema: &Micheline, expected: &str) {
        let packed = pack_expression(value, Some(schema)).unwrap();
        assert_eq!(hex::encode(&packed), expected);
        assert_eq!(&unpack_expression(&packed, Some(schema)).unwrap(), value);
    }

    #[test]
    fn untyped() -> Result<(), anyhow::Error> {
        assert_eq!(pack(&Micheline::int(0), None)?, [0x00, 0x00]);
        assert_eq!(pack(&Micheline::int(-1), None)?, [0x00, 0x41]);
        assert_eq!(pack_expression(&().into(), None)?, [0x05, 0x03, 0x0b]);
        assert_eq!(unpack(&[0x00, 0x41], None)?, Micheline::int(-1));

        Ok(())
    }

    // Expected bytes produced with
    // octez-client --mode mockup run michelson code PACK on stack "{Stack_elt $ty $val}"
    #[test]
    fn address() {
        roundtrip(
            &"tz1NyAf1KeeFCCPPAZ9ard9YVshVGFibzVKa".into(),
            &ty(Prim::address),
            "050a0000001600002486eda3c7bbbe6be511b46d6deeb1594258a7fd",
        );
        roundtrip(
            &"KT1EY9XA4Z5tybQN5zmVUL5cntku1zTCBLTv%transfer".into(),
            &ty(Prim::address),
            "050a0000001e014151d57ddff98da8cd49f0f2cbf89465bcf267a4007472616e73666572",
        );
    }

    #[test]
    fn key_hash() {
        roundtrip(
            &"tz1NyAf1KeeFCCPPAZ9ard9YVshVGFibzVKa".into(),
            &ty(Prim::key_hash),
            "050a00000015002486eda3c7bbbe6be511b46d6deeb1594258a7fd",
        );
    }

    #[test]
    fn key_and_chain_id() {
        roundtrip(
            &"edpkurrsBe7UjF59ciHHmBRnS76WHx3YNL9m7owYta6ticPrdP9DG4".into(),
            &ty(Prim::key),
            "050a0000002100a063a88a8c93f053796a75c5c3a9810f1e1489a9facc6f3d20d44ed1653f9813",
        );
        roundtrip(
            &"NetXdQprcVkpaWU".into(),
            &ty(Prim::chain_id),
            "050a000000047a06a770",
        );
    }

    #[test]
    fn signature_loses_its_curve() -> Result<(), anyhow::Error> {
        let edsig = "edsigtoeXp3xFtGugwCTDSDuifQ9Ka81X4gXFoxRQ6Xao2Ryc3yioptrKMfNy5c9pHhbA9Xn3sYZdx2SPiCGTFXjjXx9xKCPDoq";
        let packed = pack(&edsig.into(), Some(&ty(Prim::signature)))?;
        assert_eq!(&packed[..5], [0x0a, 0, 0, 0, 64]);

        let Micheline::String(generic) = unpack(&packed, Some(&ty(Prim::signature)))? else {
            panic!("expected a string");
        };
        assert!(generic.starts_with("sig"));
        assert_eq!(
            Signature::from_b58check(&generic)?.as_ref(),
            Signature::from_b58check(edsig)?.as_ref()
        );

        Ok(())
    }

    #[test]
    fn timestamp() -> Result<(), anyhow::Error> {
        let schema = ty(Prim::timestamp);
        let value = Micheline::from("2019-09-26T10:59:51Z");
        assert_eq!(optimize(&value, &schema)?, Micheline::int(1569495591));
        assert_eq!(readable(&Micheline::int(1569495591), &schema)?, value);
        roundtrip(&"1970-01-01T00:00:00Z".into(), &schema, "050000");

        let far = Micheline::int(BigInt::from(i64::MAX) * 4);
        assert_eq!(readable(&far, &schema)?, far);

        Ok(())
    }

    #[test]
    fn timestamp_offset_is_normalized() -> Result<(), anyhow::Error> {
        let schema = ty(Prim::timestamp);
        let shifted = Micheline::from("2019-09-26T12:59:51+02:00");
        let packed = pack(&shifted, Some(&schema))?;
        assert_eq!(packed, pack(&Micheline::int(1569495591), None)?);
        assert_eq!(
            unpack(&packed, Some(&schema))?,
            Micheline::from("2019-09-26T10:59:51Z")
        );

        Ok(())
    }

    #[test]
    fn timestamp_fractional_seconds_rejected() {
        let err = pack(&"2019-09-26T10:59:51.5Z".into(), Some(&ty(Prim::timestamp))).unwrap_err();
        assert!(matches!(
            err,
            MichelineError::InvalidLiteral { ty: Prim::timestamp, .. }
        ));
        assert_eq!(err.kind(), DecodeErrorKind::InvalidValue);
    }

    #[test]
    fn typed_unpack_yields_readable_form() -> Result<(), anyhow::Error> {
        let tz1 = "tz1NyAf1KeeFCCPPAZ9ard9YVshVGFibzVKa";
        let schema = Micheline::app(
            Prim::pair,
            vec![ty(Prim::timestamp), ty(Prim::address), ty(Prim::key_hash)],
        );
        let readable_value = Micheline::app(
            Prim::Pair,
            vec!["2019-09-26T10:59:51Z".into(), tz1.into(), tz1.into()],
        );
        let optimized_value = optimize(&readable_value, &schema)?;
        assert_eq!(optimized_value.args()[0], Micheline::int(1569495591));
        assert!(matches!(optimized_value.args()[1], Micheline::Bytes(_)));

        for value in [&readable_value, &optimized_value] {
            let packed = pack(value, Some(&schema))?;
            assert_eq!(unpack(&packed, Some(&schema))?, readable(value, &schema)?);
            assert_eq!(readable(value, &schema)?, readable_value);
        }

        Ok(())
    }

    #[test]
    fn bytes_given_as_hex() -> Result<(), anyhow::Error> {
        let schema = ty(Prim::bytes);
        assert_eq!(
            pack(&"0xcafe".into(), Some(&schema))?,
            pack(&vec![0xcau8, 0xfe].into(), None)?
        );
        let err = pack(&"cafe!".into(), Some(&schema)).unwrap_err();
        assert_eq!(err.kind(), DecodeErrorKind::InvalidValue);

        Ok(())
    }

    #[test]
    fn comb_pair() {
        let nat = || ty(Prim::nat);
        let schema = Micheline::prim2(
            Prim::pair,
            nat(),
            Micheline::prim2(Prim::pair, nat(), nat()),
        );
        // Should be encoded as a tree
        roundtrip(
            &Micheline::pair(
                Micheline::int(1),
                Micheline::pair(Micheline::int(2), Micheline::int(3)),
            ),
            &schema,
            "0507070001070700020003",
        );
    }

    #[test]
    fn flattened_combs() -> Result<(), anyhow::Error> {
        let tz1 = "tz1NyAf1KeeFCCPPAZ9ard9YVshVGFibzVKa";
        let nested_type = Micheline::prim2(
            Prim::pair,
            ty(Prim::nat),
            Micheline::prim2(Prim::pair, ty(Prim::key_hash), ty(Prim::address)),
        );
        let flat_type = Micheline::app(
            Prim::pair,
            vec![ty(Prim::nat), ty(Prim::key_hash), ty(Prim::address)],
        );
        let flat_value = Micheline::app(
            Prim::Pair,
            vec![Micheline::int(7), tz1.into(), tz1.into()],
        );
        let nested_value = Micheline::pair(
            Micheline::int(7),
            Micheline::pair(tz1.into(), tz1.into()),
        );
        let seq_value = Micheline::seq(vec![Micheline::int(7), tz1.into(), tz1.into()]);

        for schema in [&nested_type, &flat_type] {
            for value in [&flat_value, &nested_value, &seq_value] {
                let optimized = optimize(value, schema)?;
                assert_eq!(optimized.args().len(), value.args().len());
                assert_eq!(
                    optimized.args()[0],
                    Micheline::int(7),
                    "nat stays as is"
                );
                assert_eq!(&readable(&optimized, schema)?, value);
            }
        }

        Ok(())
    }

    #[test]
    fn containers() -> Result<(), anyhow::Error> {
        let tz1 = "tz1NyAf1KeeFCCPPAZ9ard9YVshVGFibzVKa";
        let schema = Micheline::prim2(
            Prim::map,
            ty(Prim::key_hash),
            Micheline::prim1(
                Prim::option,
                Micheline::prim2(Prim::or, ty(Prim::timestamp), ty(Prim::string)),
            ),
        );
        let value = Micheline::seq(vec![
            Micheline::prim2(
                Prim::Elt,
                tz1.into(),
                some(Micheline::prim1(Prim::Left, "2020-01-01T00:00:00Z".into())),
            ),
            Micheline::prim2(Prim::Elt, tz1.into(), Micheline::prim0(Prim::None)),
            Micheline::prim2(
                Prim::Elt,
                tz1.into(),
                some(Micheline::prim1(Prim::Right, "not a date".into())),
            ),
        ]);
        let packed = pack(&value, Some(&schema))?;
        assert_eq!(unpack(&packed, Some(&schema))?, value);

        let optimized = optimize(&value, &schema)?;
        assert!(matches!(optimized.args()[0].args()[0], Micheline::Bytes(_)));

        let ids = ty(Prim::nat);
        let big_map = Micheline::prim2(Prim::big_map, ty(Prim::nat), ids);
        assert_eq!(optimize(&Micheline::int(12), &big_map)?, Micheline::int(12));

        Ok(())
    }

    #[test]
    fn lambda_is_untouched() -> Result<(), anyhow::Error> {
        let schema = Micheline::prim2(Prim::lambda, ty(Prim::address), ty(Prim::unit));
        let code = Micheline::seq(vec![
            Micheline::prim0(Prim::DROP),
            Micheline::prim0(Prim::UNIT),
        ]);
        assert_eq!(optimize(&code, &schema)?, code);

        Ok(())
    }

    #[test]
    fn parameter_section_as_schema() -> Result<(), anyhow::Error> {
        let schema = Micheline::prim1(Prim::parameter, ty(Prim::key_hash));
        let packed = pack(&"tz1NyAf1KeeFCCPPAZ9ard9YVshVGFibzVKa".into(), Some(&schema))?;
        assert_eq!(packed.len(), 5 + 21);

        Ok(())
    }

    #[test]
    fn schema_mismatch() {
        let cases = [
            (Micheline::int(1), ty(Prim::address)),
            (Micheline::int(1), ty(Prim::string)),
            ("x".into(), ty(Prim::nat)),
            (Micheline::int(1), Micheline::prim2(Prim::pair, ty(Prim::nat), ty(Prim::nat))),
            (
                Micheline::app(Prim::Pair, vec![Micheline::int(1); 3]),
                Micheline::prim2(Prim::pair, ty(Prim::nat), ty(Prim::nat)),
            ),
            (Micheline::prim0(Prim::Unit), Micheline::prim1(Prim::option, ty(Prim::unit))),
            (Micheline::seq(vec![]), Micheline::prim0(Prim::option)),
            (Micheline::seq(vec![Micheline::int(1)]), Micheline::prim2(Prim::map, ty(Prim::nat), ty(Prim::nat))),
            (Micheline::int(1), Micheline::int(1)),
            (Micheline::int(1), Micheline::prim0(Prim::DROP)),
        ];
        for (value, schema) in cases {
            let err = pack(&value, Some(&schema)).unwrap_err();
            assert_eq!(err.kind(), DecodeErrorKind::SchemaMismatch, "{value:?} : {schema:?}");
        }
    }

    #[test]
    fn undecodable_leaf_is_a_mismatch() {
        let packed = pack(&vec![0x07u8; 22].into(), None).unwrap();
        let err = unpack(&packed, Some(&ty(Prim::address))).unwrap_err();
        assert_eq!(err.kind(), DecodeErrorKind::SchemaMismatch);
    }

    #[test]
    fn invalid_identifier() {
        let err = pack(
            &"tz1NyAf1KeeFCCPPAZ9ard9YVshVGFibzVKb".into(),
            Some(&ty(Prim::key_hash)),
        )
        .unwrap_err();
        assert_eq!(err.kind(), DecodeErrorKind::ChecksumMismatch);
    }

    #[test]
    fn watermark() {
        let err = unpack_expression(&[0x00, 0x00], None).unwrap_err();
        assert!(matches!(err, MichelineError::MissingWatermark));
        let err = unpack_expression(&[], None).unwrap_err();
        assert_eq!(err.kind(), DecodeErrorKind::TruncatedInput);
        let err = unpack_expression(&[0x05, 0x00], None).unwrap_err();
        assert_eq!(err.kind(), DecodeErrorKind::TruncatedInput);
    }

    #[test]
    fn expression_hash() -> Result<(), anyhow::Error> {
        let provider = DefaultCryptoProvider;
        let node = Micheline::from("tz1NyAf1KeeFCCPPAZ9ard9YVshVGFibzVKa");
        let schema = ty(Prim::address);

        let hash = script_expr_hash(&provider, &node, Some(&schema))?;
        let packed = pack_expression(&node, Some(&schema))?;
        assert_eq!(hash, ScriptExprHash::digest(&provider, &packed)?);

        let text = hash.to_b58check();
        assert!(text.starts_with("expr"));
        assert_eq!(text.len(), 54);
        assert_ne!(hash, script_expr_hash(&provider, &node, None)?);

        Ok(())
    }
}
