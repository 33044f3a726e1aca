// SPDX-FileCopyrightText: 2023 TriliTech <contact@trili.tech>
//
// SPDX-License-Identifier: MIT

//! Contract ids and Michelson addresses.

use nom::number::complete::u8 as tag_byte;
use thiserror::Error;
use tezos_forge_encoding::enc::{self, BinResult, BinWriter};
use tezos_forge_encoding::nom::error::DecodeError;
use tezos_forge_encoding::nom::{complete_input, rest_bytes, NomReader, NomResult};

use crate::hash::ContractKt1Hash;
use crate::identifier::{IdentifierError, IdentifierKind};
use crate::provider::{CryptoProvider, DefaultCryptoProvider};
use crate::public_key_hash::PublicKeyHash;

const TAG_IMPLICIT: u8 = 0;
const TAG_ORIGINATED: u8 = 1;
const PADDING_ORIGINATED: u8 = 0;

/// Longest entrypoint name an address may carry.
pub const MAX_ENTRYPOINT_LEN: usize = 31;

/// Contract id - of either an implicit account or originated account.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Contract {
    /// User account
    Implicit(PublicKeyHash),
    /// Smart contract account
    Originated(ContractKt1Hash),
}

impl Contract {
    /// Size of the binary form: one tag byte, 20 hash bytes and either the
    /// curve tag (implicit) or a padding byte (originated).
    pub const ENCODED_SIZE: usize = 22;

    pub fn from_b58check_with<P: CryptoProvider + ?Sized>(
        provider: &P,
        data: &str,
    ) -> Result<Self, IdentifierError> {
        if data.starts_with(IdentifierKind::ContractKt1Hash.text_prefix()) {
            Ok(Self::Originated(ContractKt1Hash::from_b58check_with(
                provider, data,
            )?))
        } else {
            Ok(Self::Implicit(PublicKeyHash::from_b58check_with(
                provider, data,
            )?))
        }
    }

    /// Converts from a *base58-encoded* string, checking for the prefix.
    pub fn from_b58check(data: &str) -> Result<Self, IdentifierError> {
        Self::from_b58check_with(&DefaultCryptoProvider, data)
    }

    pub fn to_b58check_with<P: CryptoProvider + ?Sized>(&self, provider: &P) -> String {
        match self {
            Self::Implicit(pkh) => pkh.to_b58check_with(provider),
            Self::Originated(kt1) => kt1.to_b58check_with(provider),
        }
    }

    /// Converts to a *base58-encoded* string, including the prefix.
    pub fn to_b58check(&self) -> String {
        self.to_b58check_with(&DefaultCryptoProvider)
    }
}

impl std::fmt::Display for Contract {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_b58check())
    }
}

impl std::str::FromStr for Contract {
    type Err = IdentifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_b58check(s)
    }
}

impl From<PublicKeyHash> for Contract {
    fn from(pkh: PublicKeyHash) -> Self {
        Self::Implicit(pkh)
    }
}

impl From<ContractKt1Hash> for Contract {
    fn from(kt1: ContractKt1Hash) -> Self {
        Self::Originated(kt1)
    }
}

impl<'a> NomReader<'a> for Contract {
    fn nom_read(input: &'a [u8]) -> NomResult<'a, Self> {
        let (rest, tag) = tag_byte(input)?;
        match tag {
            TAG_IMPLICIT => {
                let (rest, pkh) = PublicKeyHash::nom_read(rest)?;
                Ok((rest, Contract::Implicit(pkh)))
            }
            TAG_ORIGINATED => {
                let (rest, kt1) = ContractKt1Hash::nom_read(rest)?;
                let (after, padding) = tag_byte(rest)?;
                if padding != PADDING_ORIGINATED {
                    return Err(nom::Err::Error(DecodeError::invalid_value(
                        rest,
                        format!("originated contract padded with 0x{padding:02x}"),
                    )));
                }
                Ok((after, Contract::Originated(kt1)))
            }
            tag => Err(nom::Err::Error(DecodeError::invalid_tag(input, tag))),
        }
    }
}

impl BinWriter for Contract {
    fn bin_write(&self, output: &mut Vec<u8>) -> BinResult {
        match self {
            Self::Implicit(implicit) => {
                enc::put_byte(&TAG_IMPLICIT, output);
                implicit.bin_write(output)
            }
            Self::Originated(originated) => {
                enc::put_byte(&TAG_ORIGINATED, output);
                originated.bin_write(output)?;
                enc::put_byte(&PADDING_ORIGINATED, output);
                Ok(())
            }
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AddressError {
    #[error(transparent)]
    Identifier(#[from] IdentifierError),
    #[error("entrypoint name is {0} bytes long, at most 31 are allowed")]
    EntrypointTooLong(usize),
}

/// Michelson `address`: a contract plus an optional entrypoint.
///
/// Binary form is the contract bytes followed by the raw entrypoint name,
/// text form is `<contract>%<entrypoint>`. `default` and the empty name both
/// mean no entrypoint.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Address {
    pub contract: Contract,
    pub entrypoint: Option<String>,
}

impl Address {
    pub fn new(contract: Contract, entrypoint: Option<String>) -> Result<Self, AddressError> {
        let entrypoint = match entrypoint {
            Some(ep) if ep.is_empty() || ep == "default" => None,
            Some(ep) if ep.len() > MAX_ENTRYPOINT_LEN => {
                return Err(AddressError::EntrypointTooLong(ep.len()))
            }
            ep => ep,
        };
        Ok(Self {
            contract,
            entrypoint,
        })
    }

    pub fn from_b58check_with<P: CryptoProvider + ?Sized>(
        provider: &P,
        data: &str,
    ) -> Result<Self, AddressError> {
        let (contract, entrypoint) = match data.split_once('%') {
            Some((contract, ep)) => (contract, Some(ep.to_owned())),
            None => (data, None),
        };
        Self::new(
            Contract::from_b58check_with(provider, contract)?,
            entrypoint,
        )
    }

    pub fn from_b58check(data: &str) -> Result<Self, AddressError> {
        Self::from_b58check_with(&DefaultCryptoProvider, data)
    }

    pub fn to_b58check_with<P: CryptoProvider + ?Sized>(&self, provider: &P) -> String {
        let contract = self.contract.to_b58check_with(provider);
        match &self.entrypoint {
            Some(ep) => format!("{contract}%{ep}"),
            None => contract,
        }
    }

    pub fn to_b58check(&self) -> String {
        self.to_b58check_with(&DefaultCryptoProvider)
    }

    /// Decodes the binary form, which spans the whole input.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, DecodeError> {
        complete_input(Self::nom_read, bytes)
    }
}

impl From<Contract> for Address {
    fn from(contract: Contract) -> Self {
        Self {
            contract,
            entrypoint: None,
        }
    }
}

impl std::fmt::Display for Address {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_b58check())
    }
}

impl std::str::FromStr for Address {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_b58check(s)
    }
}

/// Consumes the rest of the input: the entrypoint has no length prefix.
impl<'a> NomReader<'a> for Address {
    fn nom_read(input: &'a [u8]) -> NomResult<'a, Self> {
        let (rest, contract) = Contract::nom_read(input)?;
        let (rest, ep) = rest_bytes(rest)?;
        let ep = String::from_utf8(ep)
            .map_err(|e| nom::Err::Error(DecodeError::invalid_value(rest, e.to_string())))?;
        let address = Address::new(contract, Some(ep))
            .map_err(|e| nom::Err::Error(DecodeError::invalid_value(rest, e.to_string())))?;
        Ok((rest, address))
    }
}

impl BinWriter for Address {
    fn bin_write(&self, output: &mut Vec<u8>) -> BinResult {
        self.contract.bin_write(output)?;
        if let Some(ep) = &self.entrypoint {
            enc::put_bytes(ep.as_bytes(), output);
        }
        Ok(())
    }
}
