use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Tier of functional sophistication.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rung {
    /// Density-only functionals.
    #[serde(rename = "LDA", alias = "lda")]
    Lda,
    /// Density plus density-gradient functionals.
    #[serde(rename = "GGA", alias = "gga")]
    Gga,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FunctionalKind {
    #[serde(rename = "SVWN3", alias = "svwn3")]
    Svwn3,
    #[serde(rename = "XALPHA", alias = "xalpha", alias = "x-alpha")]
    XAlpha,
    #[serde(rename = "PBE", alias = "pbe")]
    Pbe,
}

/// A `(rung, functional)` pair as requested by the caller.
///
/// Only some pairs name an actual functional; see
/// [`Functional::resolve`](super::Functional::resolve).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FunctionalSpec {
    pub rung: Rung,
    pub kind: FunctionalKind,
}

impl FunctionalSpec {
    pub const SVWN3: Self = Self::new(Rung::Lda, FunctionalKind::Svwn3);
    pub const XALPHA: Self = Self::new(Rung::Lda, FunctionalKind::XAlpha);
    pub const PBE: Self = Self::new(Rung::Gga, FunctionalKind::Pbe);

    pub const fn new(rung: Rung, kind: FunctionalKind) -> Self {
        Self { rung, kind }
    }
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("Unsupported functional: {kind} is not available on the {rung} rung")]
pub struct UnsupportedFunctional {
    pub rung: Rung,
    pub kind: FunctionalKind,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Unknown {what} '{value}'")]
pub struct ParseFunctionalError {
    what: &'static str,
    value: String,
}

impl fmt::Display for Rung {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Rung::Lda => "LDA",
            Rung::Gga => "GGA",
        })
    }
}

impl fmt::Display for FunctionalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FunctionalKind::Svwn3 => "SVWN3",
            FunctionalKind::XAlpha => "XALPHA",
            FunctionalKind::Pbe => "PBE",
        })
    }
}

impl fmt::Display for FunctionalSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.rung, self.kind)
    }
}

impl FromStr for Rung {
    type Err = ParseFunctionalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "LDA" => Ok(Rung::Lda),
            "GGA" => Ok(Rung::Gga),
            _ => Err(ParseFunctionalError {
                what: "rung",
                value: s.to_string(),
            }),
        }
    }
}

impl FromStr for FunctionalKind {
    type Err = ParseFunctionalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().replace('-', "").as_str() {
            "SVWN3" => Ok(FunctionalKind::Svwn3),
            "XALPHA" => Ok(FunctionalKind::XAlpha),
            "PBE" => Ok(FunctionalKind::Pbe),
            _ => Err(ParseFunctionalError {
                what: "functional",
                value: s.to_string(),
            }),
        }
    }
}
