// SPDX-FileCopyrightText: [2023] Serokell <hi@serokell.io>
// SPDX-FileCopyrightText: 2024 TriliTech <contact@trili.tech>
//
// SPDX-License-Identifier: MIT

//! Structures and utilities for [Tezos
//! entrypoints](https://docs.tezos.com/smart-contracts/entrypoints).

use nom::number::complete::u8 as nom_u8;

use tezos_forge_encoding::enc::{self, BinResult, BinWriter};
use tezos_forge_encoding::nom::error::DecodeError;
use tezos_forge_encoding::nom::{self as nom_enc, NomReader, NomResult};

/// Errors that can happen when validating an entrypoint name.
#[derive(Debug, PartialEq, Eq, Clone, thiserror::Error)]
pub enum EntrypointError {
    #[error("entrypoint name must be at most 31 characters long, but it is {0} characters long")]
    TooLong(usize),
    #[error("forbidden byte in entrypoint name: {0:#04x}")]
    ForbiddenByte(u8),
    #[error("explicit default entrypoint is forbidden in binary encoding")]
    ExplicitDefault,
}

/// Entrypoint targeted by a transaction, in other words, the part after `%`
/// in `KT1BRd2ka5q2cPRdXALtXD1QZ38CPam2j1ye%foo`.
///
/// Entrypoints with a dedicated tag are their own variants. Any other name
/// is [`Entrypoint::Named`], built through [`Entrypoint::new`].
#[derive(Debug, Clone, Default, Eq, PartialOrd, Ord, PartialEq, Hash)]
pub enum Entrypoint {
    #[default]
    Default,
    Root,
    Do,
    SetDelegate,
    RemoveDelegate,
    Named(EntrypointName),
}

/// A valid entrypoint name without a dedicated tag.
#[derive(Debug, Clone, Eq, PartialOrd, Ord, PartialEq, Hash)]
pub struct EntrypointName(String);

impl EntrypointName {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for EntrypointName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// NB: default entrypoint is represented as literal "default", because it
/// affects comparison for addresses.
pub const DEFAULT_EP_NAME: &str = "default";
const MAX_EP_LEN: usize = 31;

const TAG_DEFAULT: u8 = 0;
const TAG_ROOT: u8 = 1;
const TAG_DO: u8 = 2;
const TAG_SET_DELEGATE: u8 = 3;
const TAG_REMOVE_DELEGATE: u8 = 4;
const TAG_NAMED: u8 = 255;

impl Entrypoint {
    /// Builds an entrypoint from its name. The empty name is the default
    /// entrypoint.
    pub fn new(name: &str) -> Result<Self, EntrypointError> {
        if let Some(ep) = Self::reserved(name) {
            return Ok(ep);
        }
        check_ep_name(name.as_bytes())?;
        Ok(Entrypoint::Named(EntrypointName(name.to_owned())))
    }

    fn reserved(name: &str) -> Option<Self> {
        match name {
            "" | DEFAULT_EP_NAME => Some(Self::Default),
            "root" => Some(Self::Root),
            "do" => Some(Self::Do),
            "set_delegate" => Some(Self::SetDelegate),
            "remove_delegate" => Some(Self::RemoveDelegate),
            _ => None,
        }
    }

    /// Returns `true` if entrypoint is the default entrypoint.
    pub fn is_default(&self) -> bool {
        matches!(self, Self::Default)
    }

    /// Returns a reference to the entrypoint name as [str].
    pub fn as_str(&self) -> &str {
        match self {
            Self::Default => DEFAULT_EP_NAME,
            Self::Root => "root",
            Self::Do => "do",
            Self::SetDelegate => "set_delegate",
            Self::RemoveDelegate => "remove_delegate",
            Self::Named(name) => name.as_str(),
        }
    }

    /// Returns a reference to the entrypoint name as bytes.
    pub fn as_bytes(&self) -> &[u8] {
        self.as_str().as_bytes()
    }

    fn tag(&self) -> u8 {
        match self {
            Self::Default => TAG_DEFAULT,
            Self::Root => TAG_ROOT,
            Self::Do => TAG_DO,
            Self::SetDelegate => TAG_SET_DELEGATE,
            Self::RemoveDelegate => TAG_REMOVE_DELEGATE,
            Self::Named(_) => TAG_NAMED,
        }
    }
}

impl std::fmt::Display for Entrypoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for Entrypoint {
    type Error = EntrypointError;
    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Entrypoint::new(s)
    }
}

impl TryFrom<String> for Entrypoint {
    type Error = EntrypointError;
    fn try_from(s: String) -> Result<Self, Self::Error> {
        Entrypoint::new(&s)
    }
}

impl std::str::FromStr for Entrypoint {
    type Err = EntrypointError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Entrypoint::new(s)
    }
}

impl BinWriter for Entrypoint {
    fn bin_write(&self, output: &mut Vec<u8>) -> BinResult {
        enc::put_byte(&self.tag(), output);
        if let Self::Named(name) = self {
            enc::short_dynamic(enc::string)(name.as_str(), output)?;
        }
        Ok(())
    }
}

impl NomReader<'_> for Entrypoint {
    fn nom_read(input: &[u8]) -> NomResult<Self> {
        let (rest, tag) = nom_u8(input)?;
        let ep = match tag {
            TAG_DEFAULT => Self::Default,
            TAG_ROOT => Self::Root,
            TAG_DO => Self::Do,
            TAG_SET_DELEGATE => Self::SetDelegate,
            TAG_REMOVE_DELEGATE => Self::RemoveDelegate,
            TAG_NAMED => {
                let (rest, raw) = nom_enc::short_dynamic(nom_enc::rest_bytes)(rest)?;
                let ep = named_from_bytes(&raw).map_err(|e| {
                    nom::Err::Error(DecodeError::invalid_value(rest, e.to_string()))
                })?;
                return Ok((rest, ep));
            }
            tag => return Err(nom::Err::Error(DecodeError::invalid_tag(input, tag))),
        };
        Ok((rest, ep))
    }
}

/// Name found after the `0xff` tag. Names with a dedicated tag are mapped
/// to it, except `default` which must use tag 0.
fn named_from_bytes(raw: &[u8]) -> Result<Entrypoint, EntrypointError> {
    check_ep_name(raw)?;
    if raw.is_empty() || raw == DEFAULT_EP_NAME.as_bytes() {
        return Err(EntrypointError::ExplicitDefault);
    }
    // Only ASCII left after the check above.
    let name: String = raw.iter().map(|&b| char::from(b)).collect();
    Entrypoint::new(&name)
}

fn check_ep_name(ep: &[u8]) -> Result<(), EntrypointError> {
    if ep.len() > MAX_EP_LEN {
        return Err(EntrypointError::TooLong(ep.len()));
    }
    let mut first_char = true;
    for &c in ep {
        // direct encoding of the regex defined in
        // https://tezos.gitlab.io/alpha/michelson.html#syntax
        match c {
            b'_' | b'0'..=b'9' | b'a'..=b'z' | b'A'..=b'Z' => Ok(()),
            b'.' | b'%' | b'@' if !first_char => Ok(()),
            c => Err(EntrypointError::ForbiddenByte(c)),
        }?;
        first_char = false;
    }
    Ok(())
}
