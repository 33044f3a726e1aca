// SPDX-FileCopyrightText: [2023] Serokell <hi@serokell.io>
// SPDX-FileCopyrightText: 2024 TriliTech <contact@trili.tech>
//
// SPDX-License-Identifier: MIT

//! Michelson primitives and their protocol codes.

use strum_macros::{Display, EnumCount, EnumString, FromRepr, IntoStaticStr};
use tezos_forge_encoding::enc::{self, BinResult, BinWriter};
use tezos_forge_encoding::nom::error::DecodeError;
use tezos_forge_encoding::nom::{NomReader, NomResult};

use crate::MichelineError;

/// Primitive names, spelled as in Michelson source. The discriminant is the
/// byte written on the wire.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Display,
    EnumCount,
    EnumString,
    FromRepr,
    IntoStaticStr,
)]
#[allow(non_camel_case_types, clippy::upper_case_acronyms)]
#[repr(u8)]
pub enum Prim {
    parameter = 0x00,
    storage = 0x01,
    code = 0x02,
    False = 0x03,
    Elt = 0x04,
    Left = 0x05,
    None = 0x06,
    Pair = 0x07,
    Right = 0x08,
    Some = 0x09,
    True = 0x0a,
    Unit = 0x0b,
    PACK = 0x0c,
    UNPACK = 0x0d,
    BLAKE2B = 0x0e,
    SHA256 = 0x0f,
    SHA512 = 0x10,
    ABS = 0x11,
    ADD = 0x12,
    AMOUNT = 0x13,
    AND = 0x14,
    BALANCE = 0x15,
    CAR = 0x16,
    CDR = 0x17,
    CHECK_SIGNATURE = 0x18,
    COMPARE = 0x19,
    CONCAT = 0x1a,
    CONS = 0x1b,
    CREATE_ACCOUNT = 0x1c,
    CREATE_CONTRACT = 0x1d,
    IMPLICIT_ACCOUNT = 0x1e,
    DIP = 0x1f,
    DROP = 0x20,
    DUP = 0x21,
    EDIV = 0x22,
    EMPTY_MAP = 0x23,
    EMPTY_SET = 0x24,
    EQ = 0x25,
    EXEC = 0x26,
    FAILWITH = 0x27,
    GE = 0x28,
    GET = 0x29,
    GT = 0x2a,
    HASH_KEY = 0x2b,
    IF = 0x2c,
    IF_CONS = 0x2d,
    IF_LEFT = 0x2e,
    IF_NONE = 0x2f,
    INT = 0x30,
    LAMBDA = 0x31,
    LE = 0x32,
    LEFT = 0x33,
    LOOP = 0x34,
    LSL = 0x35,
    LSR = 0x36,
    LT = 0x37,
    MAP = 0x38,
    MEM = 0x39,
    MUL = 0x3a,
    NEG = 0x3b,
    NEQ = 0x3c,
    NIL = 0x3d,
    NONE = 0x3e,
    NOT = 0x3f,
    NOW = 0x40,
    OR = 0x41,
    PAIR = 0x42,
    PUSH = 0x43,
    RIGHT = 0x44,
    SIZE = 0x45,
    SOME = 0x46,
    SOURCE = 0x47,
    SENDER = 0x48,
    SELF = 0x49,
    STEPS_TO_QUOTA = 0x4a,
    SUB = 0x4b,
    SWAP = 0x4c,
    TRANSFER_TOKENS = 0x4d,
    SET_DELEGATE = 0x4e,
    UNIT = 0x4f,
    UPDATE = 0x50,
    XOR = 0x51,
    ITER = 0x52,
    LOOP_LEFT = 0x53,
    ADDRESS = 0x54,
    CONTRACT = 0x55,
    ISNAT = 0x56,
    CAST = 0x57,
    RENAME = 0x58,
    bool = 0x59,
    contract = 0x5a,
    int = 0x5b,
    key = 0x5c,
    key_hash = 0x5d,
    lambda = 0x5e,
    list = 0x5f,
    map = 0x60,
    big_map = 0x61,
    nat = 0x62,
    option = 0x63,
    or = 0x64,
    pair = 0x65,
    set = 0x66,
    signature = 0x67,
    string = 0x68,
    bytes = 0x69,
    mutez = 0x6a,
    timestamp = 0x6b,
    unit = 0x6c,
    operation = 0x6d,
    address = 0x6e,
    SLICE = 0x6f,
    DIG = 0x70,
    DUG = 0x71,
    EMPTY_BIG_MAP = 0x72,
    APPLY = 0x73,
    chain_id = 0x74,
    CHAIN_ID = 0x75,
    LEVEL = 0x76,
    SELF_ADDRESS = 0x77,
    never = 0x78,
    NEVER = 0x79,
    UNPAIR = 0x7a,
    VOTING_POWER = 0x7b,
    TOTAL_VOTING_POWER = 0x7c,
    KECCAK = 0x7d,
    SHA3 = 0x7e,
    PAIRING_CHECK = 0x7f,
    bls12_381_g1 = 0x80,
    bls12_381_g2 = 0x81,
    bls12_381_fr = 0x82,
    sapling_state = 0x83,
    sapling_transaction_deprecated = 0x84,
    SAPLING_EMPTY_STATE = 0x85,
    SAPLING_VERIFY_UPDATE = 0x86,
    ticket = 0x87,
    TICKET_DEPRECATED = 0x88,
    READ_TICKET = 0x89,
    SPLIT_TICKET = 0x8a,
    JOIN_TICKETS = 0x8b,
    GET_AND_UPDATE = 0x8c,
    chest = 0x8d,
    chest_key = 0x8e,
    OPEN_CHEST = 0x8f,
    VIEW = 0x90,
    view = 0x91,
    constant = 0x92,
    SUB_MUTEZ = 0x93,
    tx_rollup_l2_address = 0x94,
    MIN_BLOCK_TIME = 0x95,
    sapling_transaction = 0x96,
    EMIT = 0x97,
    Lambda_rec = 0x98,
    LAMBDA_REC = 0x99,
    TICKET = 0x9a,
    BYTES = 0x9b,
    NAT = 0x9c,
    Ticket = 0x9d,
    IS_IMPLICIT_ACCOUNT = 0x9e,
    INDEX_ADDRESS = 0x9f,
    GET_ADDRESS_INDEX = 0xa0,
}

impl Prim {
    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn from_code(code: u8) -> Option<Self> {
        Self::from_repr(code)
    }

    /// Looks a primitive up by its Michelson spelling, which is case
    /// sensitive: `pair` is a type, `Pair` a value and `PAIR` an instruction.
    pub fn from_name(name: &str) -> Result<Self, MichelineError> {
        name.parse()
            .map_err(|_| MichelineError::UnknownPrimitive(name.to_owned()))
    }

    pub fn as_str(self) -> &'static str {
        self.into()
    }

    /// Type constructors, as opposed to data constructors, instructions
    /// and keywords.
    pub fn is_type(self) -> bool {
        self.as_str().starts_with(|c: char| c.is_ascii_lowercase())
            && !matches!(
                self,
                Prim::parameter | Prim::storage | Prim::code | Prim::view | Prim::constant
            )
    }
}

impl BinWriter for Prim {
    fn bin_write(&self, out: &mut Vec<u8>) -> BinResult {
        enc::put_byte(&self.code(), out);
        Ok(())
    }
}

impl<'a> NomReader<'a> for Prim {
    fn nom_read(input: &'a [u8]) -> NomResult<'a, Self> {
        let (rest, code) = nom::number::complete::u8(input)?;
        match Prim::from_code(code) {
            Some(prim) => Ok((rest, prim)),
            None => Err(nom::Err::Error(DecodeError::unknown_primitive(input, code))),
        }
    }
}
