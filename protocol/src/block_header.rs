// SPDX-FileCopyrightText: 2025 Functori <contact@functori.com>
//
// SPDX-License-Identifier: MIT

//! Signed block headers, as carried by double baking evidence.

use tezos_forge_crypto::hash::{
    BlockHash, BlockPayloadHash, ContextHash, NonceHash, OperationListListHash, UnknownSignature,
};
use tezos_forge_encoding::enc::BinWriter;
use tezos_forge_encoding::nom::NomReader;

/// Vote of the baker on the liquidity baking subsidy.
#[derive(PartialEq, Eq, Debug, Clone, Copy, Hash, NomReader, BinWriter)]
#[encoding(tags = "i8")]
pub enum LiquidityBakingToggleVote {
    On,
    Off,
    Pass,
}

#[derive(PartialEq, Debug, Clone, NomReader, BinWriter)]
pub struct BlockHeader {
    pub level: i32,
    pub proto: u8,
    pub predecessor: BlockHash,
    /// Seconds since the epoch.
    pub timestamp: i64,
    pub validation_pass: u8,
    pub operations_hash: OperationListListHash,
    /// Opaque byte strings, compared lexicographically by the protocol.
    #[encoding(dynamic, list, dynamic, bytes)]
    pub fitness: Vec<Vec<u8>>,
    pub context: ContextHash,
    pub payload_hash: BlockPayloadHash,
    pub payload_round: i32,
    pub proof_of_work_nonce: [u8; 8],
    pub seed_nonce_hash: Option<NonceHash>,
    pub liquidity_baking_toggle_vote: LiquidityBakingToggleVote,
    pub signature: UnknownSignature,
}

#[cfg(test)]
pub(crate) mod tests {
    use tezos_forge_encoding::nom::error::DecodeErrorKind;

    use super::*;

    pub(crate) fn header(round: i32) -> BlockHeader {
        BlockHeader {
            level: 1_331_360,
            proto: 2,
            predecessor: BlockHash::from_b58check(
                "BMdM277QRUEGJfNmXJMwXGsfPuTkYkTfGodN9D3BWFYdF4mS2rr",
            )
            .unwrap(),
            timestamp: 1_664_000_000,
            validation_pass: 4,
            operations_hash: OperationListListHash::from_b58check(
                "LLoaDBEPLABrnc6zaiXWTT7Q7mLqMqSSaQ1QCkApQ6A7hYMGzdcM2",
            )
            .unwrap(),
            fitness: vec![
                vec![0x02],
                vec![0x00, 0x14, 0x50, 0xa0],
                vec![],
                vec![0xff, 0xff, 0xff, 0xff],
                vec![0x00, 0x00, 0x00, 0x00],
            ],
            context: ContextHash::from_b58check(
                "CoWRa18ZSLRBLwyCh7j3dhnhaCf2C6Eo4VT9h5KYXoSgax9U6oKG",
            )
            .unwrap(),
            payload_hash: BlockPayloadHash::from_b58check(
                "vh1wp3PKz9qNHuiK9ri8TeC5Du9soVqij779SyuhVdx3STFtrjg7",
            )
            .unwrap(),
            payload_round: round,
            proof_of_work_nonce: [0x61, 0x6e, 0x07, 0x6c, 0x00, 0x00, 0x00, 0x01],
            seed_nonce_hash: Some(
                NonceHash::from_b58check("nceV8toQYTGUhyrDnLitW9Kdk477vnESik5Lb1tUdDCwFTgNWVdFh")
                    .unwrap(),
            ),
            liquidity_baking_toggle_vote: LiquidityBakingToggleVote::Pass,
            signature: UnknownSignature::from([0x5a; 64]),
        }
    }

    #[test]
    fn header_roundtrip() -> Result<(), anyhow::Error> {
        let without_nonce = BlockHeader {
            seed_nonce_hash: None,
            fitness: vec![],
            ..header(3)
        };
        for value in [header(0), without_nonce] {
            let bytes = value.to_bytes()?;
            assert_eq!(BlockHeader::from_bytes(&bytes)?, value);
        }

        Ok(())
    }

    #[test]
    fn fitness_framing() -> Result<(), anyhow::Error> {
        // level, proto, predecessor, timestamp, validation pass, operations hash
        let offset = 4 + 1 + 32 + 8 + 1 + 32;
        let bytes = header(0).to_bytes()?;
        let fitness = "00000021000000010200000004001450a00000000000000004ffffffff0000000400000000";
        assert_eq!(hex::encode(&bytes[offset..offset + fitness.len() / 2]), fitness);

        Ok(())
    }

    #[test]
    fn liquidity_baking_vote() -> Result<(), anyhow::Error> {
        assert_eq!(LiquidityBakingToggleVote::Off.to_bytes()?, [1]);
        assert_eq!(
            LiquidityBakingToggleVote::from_bytes(&[2])?,
            LiquidityBakingToggleVote::Pass
        );
        let err = LiquidityBakingToggleVote::from_bytes(&[3]).unwrap_err();
        assert_eq!(err.kind(), DecodeErrorKind::InvalidTag);

        Ok(())
    }

    #[test]
    fn truncated_header() -> Result<(), anyhow::Error> {
        let bytes = header(0).to_bytes()?;
        let err = BlockHeader::from_bytes(&bytes[..bytes.len() - 1]).unwrap_err();
        assert_eq!(err.kind(), DecodeErrorKind::TruncatedInput);

        Ok(())
    }
}
