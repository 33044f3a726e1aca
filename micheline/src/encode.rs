// SPDX-FileCopyrightText: [2023] Serokell <hi@serokell.io>
// SPDX-FileCopyrightText: 2024 TriliTech <contact@trili.tech>
//
// SPDX-License-Identifier: MIT

//! Micheline serialization.

use tezos_forge_encoding::enc::{self, BinError, BinResult, BinWriter};

use crate::annotations::Annotations;
use crate::ast::Micheline;
use crate::decode::MAX_NESTING;
use crate::prim::Prim;

/// Prefix denoting an encoded number.
pub(crate) const NUMBER_TAG: u8 = 0x00;
/// Prefix denoting an encoded string.
pub(crate) const STRING_TAG: u8 = 0x01;
/// Prefix denoting an encoded sequence.
pub(crate) const SEQ_TAG: u8 = 0x02;
/// Prefix denoting an encoded bytes sequence.
pub(crate) const BYTES_TAG: u8 = 0x0a;

// Tags for [Micheline::App].
pub(crate) const APP_NO_ARGS_NO_ANNOTS_TAG: u8 = 0x03;
pub(crate) const APP_NO_ARGS_WITH_ANNOTS_TAG: u8 = 0x04;
pub(crate) const APP_ONE_ARG_NO_ANNOTS_TAG: u8 = 0x05;
pub(crate) const APP_ONE_ARG_WITH_ANNOTS_TAG: u8 = 0x06;
pub(crate) const APP_TWO_ARGS_NO_ANNOTS_TAG: u8 = 0x07;
pub(crate) const APP_TWO_ARGS_WITH_ANNOTS_TAG: u8 = 0x08;
pub(crate) const APP_GENERIC: u8 = 0x09;

/// Michelson strings are printable ASCII plus line breaks.
pub(crate) fn is_michelson_char(c: &u8) -> bool {
    matches!(c, b' '..=b'~' | b'\n' | b'\r')
}

impl BinWriter for Micheline {
    fn bin_write(&self, out: &mut Vec<u8>) -> BinResult {
        encode_micheline(self, 0, out)
    }
}

/// Trees deeper than the decoder accepts are refused, so that everything
/// written can be read back.
fn encode_micheline(node: &Micheline, depth: usize, out: &mut Vec<u8>) -> BinResult {
    if depth > MAX_NESTING {
        return Err(BinError::invalid_value("expression nested too deeply"));
    }
    match node {
        Micheline::Int(n) => {
            enc::put_byte(&NUMBER_TAG, out);
            enc::z_bignum(n, out)
        }
        Micheline::String(s) => {
            if !s.bytes().all(|c| is_michelson_char(&c)) {
                return Err(BinError::invalid_value(format!(
                    "forbidden character in string {s:?}"
                )));
            }
            enc::put_byte(&STRING_TAG, out);
            enc::dynamic(enc::string)(s.as_str(), out)
        }
        Micheline::Bytes(b) => {
            enc::put_byte(&BYTES_TAG, out);
            enc::dynamic(enc::bytes)(b.as_slice(), out)
        }
        Micheline::Seq(items) => {
            enc::put_byte(&SEQ_TAG, out);
            enc::dynamic(enc::list(nested(depth)))(items.as_slice(), out)
        }
        Micheline::App(prim, args, annots) => encode_app(*prim, args, annots, depth, out),
    }
}

/// Applications of up to two arguments get a dedicated tag and no length
/// framing. Larger ones use the generic form, which always carries the
/// annotations blob, even when it is empty.
fn encode_app(
    prim: Prim,
    args: &[Micheline],
    annots: &Annotations,
    depth: usize,
    out: &mut Vec<u8>,
) -> BinResult {
    let tag = match (args.len(), annots.is_empty()) {
        (0, true) => APP_NO_ARGS_NO_ANNOTS_TAG,
        (0, false) => APP_NO_ARGS_WITH_ANNOTS_TAG,
        (1, true) => APP_ONE_ARG_NO_ANNOTS_TAG,
        (1, false) => APP_ONE_ARG_WITH_ANNOTS_TAG,
        (2, true) => APP_TWO_ARGS_NO_ANNOTS_TAG,
        (2, false) => APP_TWO_ARGS_WITH_ANNOTS_TAG,
        _ => APP_GENERIC,
    };
    enc::put_byte(&tag, out);
    prim.bin_write(out)?;
    if tag == APP_GENERIC {
        enc::dynamic(enc::list(nested(depth)))(args, out)?;
        return enc::dynamic(Annotations::bin_write)(annots, out);
    }
    args.iter().try_for_each(|arg| encode_micheline(arg, depth + 1, out))?;
    if !annots.is_empty() {
        enc::dynamic(Annotations::bin_write)(annots, out)?;
    }
    Ok(())
}

fn nested(depth: usize) -> impl Fn(&Micheline, &mut Vec<u8>) -> BinResult {
    move |node, out| encode_micheline(node, depth + 1, out)
}
