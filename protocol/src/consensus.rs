// SPDX-FileCopyrightText: 2025 Functori <contact@functori.com>
//
// SPDX-License-Identifier: MIT

//! Consensus operations, and their inlined form used as evidence of
//! double signing.

use nom::number::complete::u8 as nom_u8;
use tezos_forge_crypto::hash::{BlockHash, BlockPayloadHash, UnknownSignature};
use tezos_forge_encoding::enc::{self, BinResult, BinWriter};
use tezos_forge_encoding::nom::error::DecodeError;
use tezos_forge_encoding::nom::{NomReader, NomResult};

use crate::operation::OperationKind;

/// Fields shared by preendorsements and endorsements.
#[derive(PartialEq, Debug, Clone, NomReader, BinWriter)]
pub struct ConsensusContent {
    pub slot: u16,
    pub level: i32,
    pub round: i32,
    pub block_payload_hash: BlockPayloadHash,
}

/// A signed consensus operation embedded in a denunciation. The inner
/// content keeps its own kind tag.
#[derive(PartialEq, Debug, Clone)]
pub struct InlinedConsensus<const KIND: u8> {
    pub branch: BlockHash,
    pub operations: ConsensusContent,
    pub signature: UnknownSignature,
}

/// Endorsement found in a double endorsement evidence.
pub type InlinedEndorsement = InlinedConsensus<{ OperationKind::Endorsement as u8 }>;

/// Preendorsement found in a double preendorsement evidence.
pub type InlinedPreendorsement = InlinedConsensus<{ OperationKind::Preendorsement as u8 }>;

impl<const KIND: u8> BinWriter for InlinedConsensus<KIND> {
    fn bin_write(&self, output: &mut Vec<u8>) -> BinResult {
        self.branch.bin_write(output)?;
        enc::put_byte(&KIND, output);
        self.operations.bin_write(output)?;
        self.signature.bin_write(output)
    }
}

impl<'a, const KIND: u8> NomReader<'a> for InlinedConsensus<KIND> {
    fn nom_read(input: &'a [u8]) -> NomResult<'a, Self> {
        let (input, branch) = BlockHash::nom_read(input)?;
        let (rest, tag) = nom_u8(input)?;
        if tag != KIND {
            return Err(nom::Err::Error(DecodeError::invalid_tag(input, tag)));
        }
        let (rest, operations) = ConsensusContent::nom_read(rest)?;
        let (rest, signature) = UnknownSignature::nom_read(rest)?;
        Ok((
            rest,
            Self {
                branch,
                operations,
                signature,
            },
        ))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use tezos_forge_encoding::nom::error::DecodeErrorKind;

    use super::*;

    pub(crate) const BRANCH: &str = "BLockGenesisGenesisGenesisGenesisGenesisf79b5d1CoW2";
    pub(crate) const PAYLOAD_HASH: &str = "vh1wp3PKz9qNHuiK9ri8TeC5Du9soVqij779SyuhVdx3STFtrjg7";

    pub(crate) fn consensus() -> ConsensusContent {
        ConsensusContent {
            slot: 3,
            level: 5_000,
            round: 1,
            block_payload_hash: BlockPayloadHash::from_b58check(PAYLOAD_HASH).unwrap(),
        }
    }

    pub(crate) fn inlined<const KIND: u8>() -> InlinedConsensus<KIND> {
        InlinedConsensus {
            branch: BlockHash::from_b58check(BRANCH).unwrap(),
            operations: consensus(),
            signature: UnknownSignature::from([7; 64]),
        }
    }

    #[test]
    fn consensus_layout() -> Result<(), anyhow::Error> {
        let bytes = consensus().to_bytes()?;
        assert_eq!(bytes.len(), 2 + 4 + 4 + 32);
        assert_eq!(hex::encode(&bytes[..10]), "00030000138800000001");
        assert_eq!(ConsensusContent::from_bytes(&bytes)?, consensus());

        Ok(())
    }

    #[test]
    fn inlined_endorsement_keeps_its_tag() -> Result<(), anyhow::Error> {
        let endorsement = inlined::<{ OperationKind::Endorsement as u8 }>();
        let bytes = endorsement.to_bytes()?;
        assert_eq!(bytes.len(), 32 + 1 + 42 + 64);
        assert_eq!(bytes[32], 21);
        assert_eq!(InlinedEndorsement::from_bytes(&bytes)?, endorsement);

        let err = InlinedPreendorsement::from_bytes(&bytes).unwrap_err();
        assert_eq!(err.kind(), DecodeErrorKind::InvalidTag);

        Ok(())
    }
}
