// SPDX-FileCopyrightText: [2023] Serokell <hi@serokell.io>
// SPDX-FileCopyrightText: 2024 TriliTech <contact@trili.tech>
//
// SPDX-License-Identifier: MIT

//! Validated annotations.

use std::fmt;
use std::str::FromStr;

use tezos_forge_encoding::enc::{self, BinResult, BinWriter};

use crate::MichelineError;

/// Kind of an annotation, selected by its leading character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnnotationKind {
    /// `@%`, `@%%` and `%@`.
    Special,
    /// `%field`
    Field,
    /// `@var`
    Variable,
    /// `:type`
    Type,
}

/// A single annotation, stored with its leading character.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Annotation(String);

impl Annotation {
    pub fn new(text: impl Into<String>) -> Result<Self, MichelineError> {
        let text = text.into();
        if is_valid(text.as_bytes()) {
            Ok(Self(text))
        } else {
            Err(MichelineError::InvalidAnnotation(text))
        }
    }

    pub fn field(name: &str) -> Result<Self, MichelineError> {
        Self::new(format!("%{name}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn kind(&self) -> AnnotationKind {
        match self.0.as_bytes() {
            b"@%" | b"@%%" | b"%@" => AnnotationKind::Special,
            [b'%', ..] => AnnotationKind::Field,
            [b'@', ..] => AnnotationKind::Variable,
            _ => AnnotationKind::Type,
        }
    }

    /// The annotation without its leading character, if it is not special.
    pub fn name(&self) -> Option<&str> {
        match self.kind() {
            AnnotationKind::Special => None,
            _ => Some(&self.0[1..]),
        }
    }
}

/// `@%|@%%|%@|[@:%][_0-9a-zA-Z][_0-9a-zA-Z\.%@]*`
fn is_valid(bytes: &[u8]) -> bool {
    macro_rules! alpha_num {
        () => {
            b'_' | b'0'..=b'9' | b'a'..=b'z' | b'A'..=b'Z'
        };
    }
    match bytes {
        b"@%" | b"@%%" | b"%@" => true,
        [b'@' | b':' | b'%', alpha_num!(), rest @ ..] => rest
            .iter()
            .all(|c| matches!(c, alpha_num!() | b'.' | b'%' | b'@')),
        _ => false,
    }
}

impl fmt::Display for Annotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Annotation {
    type Err = MichelineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<&str> for Annotation {
    type Error = MichelineError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl AsRef<str> for Annotation {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Ordered annotations of a primitive application.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Annotations(Vec<Annotation>);

impl Annotations {
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Parses space-separated annotations, as found on the wire.
    pub fn parse(text: &str) -> Result<Self, MichelineError> {
        if text.is_empty() {
            return Ok(Self::new());
        }
        text.split(' ').map(Annotation::new).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Annotation> {
        self.0.iter()
    }

    pub fn push(&mut self, annotation: Annotation) {
        self.0.push(annotation)
    }

    /// First field annotation, if any.
    pub fn field_name(&self) -> Option<&str> {
        self.iter()
            .find(|a| a.kind() == AnnotationKind::Field)
            .and_then(Annotation::name)
    }
}

impl From<Vec<Annotation>> for Annotations {
    fn from(annotations: Vec<Annotation>) -> Self {
        Self(annotations)
    }
}

impl FromIterator<Annotation> for Annotations {
    fn from_iter<T: IntoIterator<Item = Annotation>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Annotations {
    type Item = &'a Annotation;
    type IntoIter = std::slice::Iter<'a, Annotation>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl fmt::Display for Annotations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, annotation) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{annotation}")?;
        }
        Ok(())
    }
}

/// Space-separated annotations, without a length prefix.
impl BinWriter for Annotations {
    fn bin_write(&self, out: &mut Vec<u8>) -> BinResult {
        for (i, annotation) in self.iter().enumerate() {
            if i > 0 {
                enc::put_byte(&b' ', out);
            }
            enc::string(annotation.as_str(), out)?;
        }
        Ok(())
    }
}
