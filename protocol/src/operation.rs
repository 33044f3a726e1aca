// SPDX-FileCopyrightText: 2025 Functori <contact@functori.com>
//
// SPDX-License-Identifier: MIT

//! Tezos operation contents.
//!
//! Layouts follow `src/proto_alpha/lib_protocol/operation_repr.ml`.

use nom::number::complete::u8 as nom_u8;
use strum_macros::{Display, EnumCount, EnumIter, FromRepr, IntoStaticStr};
use tezos_forge_crypto::hash::{ContractTz1Hash, ProtocolHash};
use tezos_forge_crypto::{Contract, PublicKey, PublicKeyHash};
use tezos_forge_encoding::enc::{self, BinResult, BinWriter};
use tezos_forge_encoding::nom::error::DecodeError;
use tezos_forge_encoding::nom::{NomReader, NomResult};
use tezos_forge_encoding::types::Narith;
use tezos_forge_micheline::Micheline;
use tracing::trace;

use crate::block_header::BlockHeader;
use crate::consensus::{ConsensusContent, InlinedEndorsement, InlinedPreendorsement};
use crate::entrypoint::Entrypoint;

/// Kind of an operation content, with its tag on the wire.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Display,
    IntoStaticStr,
    FromRepr,
    EnumIter,
    EnumCount,
)]
#[strum(serialize_all = "snake_case")]
#[repr(u8)]
pub enum OperationKind {
    SeedNonceRevelation = 1,
    DoubleEndorsementEvidence = 2,
    DoubleBakingEvidence = 3,
    ActivateAccount = 4,
    Proposals = 5,
    Ballot = 6,
    DoublePreendorsementEvidence = 7,
    FailingNoop = 17,
    Preendorsement = 20,
    Endorsement = 21,
    Reveal = 107,
    Transaction = 108,
    Origination = 109,
    Delegation = 110,
    RegisterGlobalConstant = 111,
    SetDepositsLimit = 112,
}

impl OperationKind {
    pub fn tag(self) -> u8 {
        self as u8
    }

    /// Manager operations are paid for by their source.
    pub fn is_manager(self) -> bool {
        self.tag() >= OperationKind::Reveal.tag()
    }
}

#[derive(PartialEq, Debug, Clone)]
pub enum OperationContent {
    SeedNonceRevelation(SeedNonceRevelation),
    DoubleEndorsementEvidence(DoubleEndorsementEvidence),
    DoubleBakingEvidence(DoubleBakingEvidence),
    ActivateAccount(ActivateAccount),
    Proposals(Proposals),
    Ballot(Ballot),
    DoublePreendorsementEvidence(DoublePreendorsementEvidence),
    FailingNoop(FailingNoop),
    Preendorsement(ConsensusContent),
    Endorsement(ConsensusContent),
    Reveal(ManagerOperationContent<RevealContent>),
    Transaction(ManagerOperationContent<TransactionContent>),
    Origination(ManagerOperationContent<OriginationContent>),
    Delegation(ManagerOperationContent<DelegationContent>),
    RegisterGlobalConstant(ManagerOperationContent<RegisterGlobalConstantContent>),
    SetDepositsLimit(ManagerOperationContent<SetDepositsLimitContent>),
}

impl OperationContent {
    pub fn kind(&self) -> OperationKind {
        match self {
            Self::SeedNonceRevelation(_) => OperationKind::SeedNonceRevelation,
            Self::DoubleEndorsementEvidence(_) => OperationKind::DoubleEndorsementEvidence,
            Self::DoubleBakingEvidence(_) => OperationKind::DoubleBakingEvidence,
            Self::ActivateAccount(_) => OperationKind::ActivateAccount,
            Self::Proposals(_) => OperationKind::Proposals,
            Self::Ballot(_) => OperationKind::Ballot,
            Self::DoublePreendorsementEvidence(_) => OperationKind::DoublePreendorsementEvidence,
            Self::FailingNoop(_) => OperationKind::FailingNoop,
            Self::Preendorsement(_) => OperationKind::Preendorsement,
            Self::Endorsement(_) => OperationKind::Endorsement,
            Self::Reveal(_) => OperationKind::Reveal,
            Self::Transaction(_) => OperationKind::Transaction,
            Self::Origination(_) => OperationKind::Origination,
            Self::Delegation(_) => OperationKind::Delegation,
            Self::RegisterGlobalConstant(_) => OperationKind::RegisterGlobalConstant,
            Self::SetDepositsLimit(_) => OperationKind::SetDepositsLimit,
        }
    }
}

impl BinWriter for OperationContent {
    fn bin_write(&self, output: &mut Vec<u8>) -> BinResult {
        enc::put_byte(&self.kind().tag(), output);
        match self {
            Self::SeedNonceRevelation(op) => op.bin_write(output),
            Self::DoubleEndorsementEvidence(op) => op.bin_write(output),
            Self::DoubleBakingEvidence(op) => op.bin_write(output),
            Self::ActivateAccount(op) => op.bin_write(output),
            Self::Proposals(op) => op.bin_write(output),
            Self::Ballot(op) => op.bin_write(output),
            Self::DoublePreendorsementEvidence(op) => op.bin_write(output),
            Self::FailingNoop(op) => op.bin_write(output),
            Self::Preendorsement(op) | Self::Endorsement(op) => op.bin_write(output),
            Self::Reveal(op) => op.bin_write(output),
            Self::Transaction(op) => op.bin_write(output),
            Self::Origination(op) => op.bin_write(output),
            Self::Delegation(op) => op.bin_write(output),
            Self::RegisterGlobalConstant(op) => op.bin_write(output),
            Self::SetDepositsLimit(op) => op.bin_write(output),
        }
    }
}

impl<'a> NomReader<'a> for OperationContent {
    fn nom_read(input: &'a [u8]) -> NomResult<'a, Self> {
        let (rest, tag) = nom_u8(input)?;
        let kind = OperationKind::from_repr(tag).ok_or_else(|| {
            nom::Err::Error(DecodeError::unknown_operation_kind(input, tag))
        })?;
        trace!(%kind, "decoding operation content");
        match kind {
            OperationKind::SeedNonceRevelation => read_as(rest, Self::SeedNonceRevelation),
            OperationKind::DoubleEndorsementEvidence => {
                read_as(rest, Self::DoubleEndorsementEvidence)
            }
            OperationKind::DoubleBakingEvidence => read_as(rest, Self::DoubleBakingEvidence),
            OperationKind::ActivateAccount => read_as(rest, Self::ActivateAccount),
            OperationKind::Proposals => read_as(rest, Self::Proposals),
            OperationKind::Ballot => read_as(rest, Self::Ballot),
            OperationKind::DoublePreendorsementEvidence => {
                read_as(rest, Self::DoublePreendorsementEvidence)
            }
            OperationKind::FailingNoop => read_as(rest, Self::FailingNoop),
            OperationKind::Preendorsement => read_as(rest, Self::Preendorsement),
            OperationKind::Endorsement => read_as(rest, Self::Endorsement),
            OperationKind::Reveal => read_as(rest, Self::Reveal),
            OperationKind::Transaction => read_as(rest, Self::Transaction),
            OperationKind::Origination => read_as(rest, Self::Origination),
            OperationKind::Delegation => read_as(rest, Self::Delegation),
            OperationKind::RegisterGlobalConstant => read_as(rest, Self::RegisterGlobalConstant),
            OperationKind::SetDepositsLimit => read_as(rest, Self::SetDepositsLimit),
        }
    }
}

fn read_as<'a, T, F>(input: &'a [u8], wrap: F) -> NomResult<'a, OperationContent>
where
    T: NomReader<'a>,
    F: FnOnce(T) -> OperationContent,
{
    let (rest, payload) = T::nom_read(input)?;
    Ok((rest, wrap(payload)))
}

#[derive(PartialEq, Debug, Clone, NomReader, BinWriter)]
pub struct SeedNonceRevelation {
    pub level: i32,
    pub nonce: [u8; 32],
}

/// Two conflicting signed items, each framed by its length.
#[derive(PartialEq, Debug, Clone, NomReader, BinWriter)]
pub struct DoubleEvidence<T> {
    #[encoding(dynamic)]
    pub op1: T,
    #[encoding(dynamic)]
    pub op2: T,
}

pub type DoubleEndorsementEvidence = DoubleEvidence<InlinedEndorsement>;
pub type DoublePreendorsementEvidence = DoubleEvidence<InlinedPreendorsement>;
pub type DoubleBakingEvidence = DoubleEvidence<BlockHeader>;

#[derive(PartialEq, Debug, Clone, NomReader, BinWriter)]
pub struct ActivateAccount {
    pub pkh: ContractTz1Hash,
    /// Blinded activation code of the fundraiser account.
    pub secret: [u8; 20],
}

#[derive(PartialEq, Debug, Clone, NomReader, BinWriter)]
pub struct Proposals {
    pub source: PublicKeyHash,
    pub period: i32,
    #[encoding(dynamic, list)]
    pub proposals: Vec<ProtocolHash>,
}

#[derive(PartialEq, Eq, Debug, Clone, Copy, Hash, Display, NomReader, BinWriter)]
#[strum(serialize_all = "snake_case")]
#[encoding(tags = "i8")]
pub enum BallotKind {
    Yay,
    Nay,
    Pass,
}

#[derive(PartialEq, Debug, Clone, NomReader, BinWriter)]
pub struct Ballot {
    pub source: PublicKeyHash,
    pub period: i32,
    pub proposal: ProtocolHash,
    pub ballot: BallotKind,
}

#[derive(PartialEq, Debug, Clone, NomReader, BinWriter)]
pub struct FailingNoop {
    #[encoding(dynamic, bytes)]
    pub arbitrary: Vec<u8>,
}

#[derive(PartialEq, Debug, Clone, NomReader, BinWriter)]
pub struct ManagerOperationContent<Op> {
    pub source: PublicKeyHash,
    pub fee: Narith,
    pub counter: Narith,
    pub gas_limit: Narith,
    pub storage_limit: Narith,
    pub operation: Op,
}

#[derive(PartialEq, Debug, Clone, NomReader, BinWriter)]
pub struct RevealContent {
    pub pk: PublicKey,
}

#[derive(PartialEq, Debug, Clone, NomReader, BinWriter)]
pub struct TransactionContent {
    pub amount: Narith,
    pub destination: Contract,
    pub parameters: Option<Parameters>,
}

/// Argument of a contract call.
#[derive(PartialEq, Debug, Clone, NomReader, BinWriter)]
pub struct Parameters {
    pub entrypoint: Entrypoint,
    #[encoding(dynamic)]
    pub value: Micheline,
}

#[derive(PartialEq, Debug, Clone, NomReader, BinWriter)]
pub struct OriginationContent {
    pub balance: Narith,
    pub delegate: Option<PublicKeyHash>,
    pub script: Script,
}

/// Code and initial storage of an originated contract.
#[derive(PartialEq, Debug, Clone, NomReader, BinWriter)]
pub struct Script {
    #[encoding(dynamic)]
    pub code: Micheline,
    #[encoding(dynamic)]
    pub storage: Micheline,
}

#[derive(PartialEq, Debug, Clone, NomReader, BinWriter)]
pub struct DelegationContent {
    pub delegate: Option<PublicKeyHash>,
}

#[derive(PartialEq, Debug, Clone, NomReader, BinWriter)]
pub struct RegisterGlobalConstantContent {
    #[encoding(dynamic)]
    pub value: Micheline,
}

#[derive(PartialEq, Debug, Clone, NomReader, BinWriter)]
pub struct SetDepositsLimitContent {
    pub limit: Option<Narith>,
}
