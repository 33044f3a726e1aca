// Copyright (c) SimpleStaking, Viable Systems, Nomadic Labs and Tezedge Contributors
// SPDX-CopyrightText: 2022-2024 TriliTech <contact@trili.tech>
//
// SPDX-License-Identifier: MIT

//! Hashes travel as their bare payload: the surrounding layout fixes the
//! kind, so no tag is written.

use super::*;
use tezos_forge_encoding::enc::{BinResult, BinWriter};
use tezos_forge_encoding::nom::{self as nom_enc, NomReader, NomResult};

macro_rules! encode_hash {
    ($hash_name:ident) => {
        impl BinWriter for $hash_name {
            fn bin_write(&self, out: &mut Vec<u8>) -> BinResult {
                tezos_forge_encoding::enc::put_bytes(self.as_ref(), out);
                Ok(())
            }
        }

        impl<'a> NomReader<'a> for $hash_name {
            #[inline(always)]
            fn nom_read(input: &'a [u8]) -> NomResult<'a, Self> {
                let (rest, bytes) =
                    nom_enc::sized_bytes::<{ IdentifierKind::$hash_name.size() }>(input)?;
                Ok((rest, $hash_name(bytes)))
            }
        }
    };
}

encode_hash!(BlockHash);
encode_hash!(OperationHash);
encode_hash!(OperationListListHash);
encode_hash!(ProtocolHash);
encode_hash!(ContextHash);
encode_hash!(ContractTz1Hash);
encode_hash!(ContractTz2Hash);
encode_hash!(ContractTz3Hash);
encode_hash!(ContractTz4Hash);
encode_hash!(ContractKt1Hash);
encode_hash!(PublicKeyEd25519);
encode_hash!(PublicKeySecp256k1);
encode_hash!(PublicKeyP256);
encode_hash!(PublicKeyBls);
encode_hash!(UnknownSignature);
encode_hash!(Ed25519Signature);
encode_hash!(Secp256k1Signature);
encode_hash!(P256Signature);
encode_hash!(BlsSignature);
encode_hash!(ChainId);
encode_hash!(ScriptExprHash);
encode_hash!(BlockPayloadHash);
encode_hash!(NonceHash);
