//! Core data types for nirs-fold

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Anatomical atlas used to label the fOLD landmarks
///
/// Each atlas lives on a fixed sheet of the fOLD workbooks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Atlas {
    /// Automated Anatomical Labeling, version 2
    #[serde(rename = "AAL2")]
    Aal2,
    /// Atlas of Intrinsic Connectivity of Homotopic Areas
    #[serde(rename = "AICHA")]
    Aicha,
    /// Brodmann areas
    Brodmann,
    /// Juelich histological atlas
    #[default]
    Juelich,
    /// LONI probabilistic brain atlas
    Loni,
}

impl Atlas {
    /// All atlases in sheet order
    pub const ALL: [Atlas; 5] = [
        Atlas::Aal2,
        Atlas::Aicha,
        Atlas::Brodmann,
        Atlas::Juelich,
        Atlas::Loni,
    ];

    /// Returns the zero-based sheet index holding this atlas
    pub fn sheet_index(&self) -> usize {
        match self {
            Atlas::Aal2 => 2,
            Atlas::Aicha => 5,
            Atlas::Brodmann => 8,
            Atlas::Juelich => 11,
            Atlas::Loni => 14,
        }
    }

    /// Returns the name of this atlas as written in the fOLD toolbox
    pub fn name(&self) -> &'static str {
        match self {
            Atlas::Aal2 => "AAL2",
            Atlas::Aicha => "AICHA",
            Atlas::Brodmann => "Brodmann",
            Atlas::Juelich => "Juelich",
            Atlas::Loni => "Loni",
        }
    }
}

impl fmt::Display for Atlas {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Atlas {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Atlas::ALL
            .iter()
            .copied()
            .find(|atlas| atlas.name() == s)
            .ok_or_else(|| Error::UnknownAtlas(s.to_string()))
    }
}

/// Standard electrode placement system used as the reference table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum MontageKind {
    /// 10-5 system (includes every 10-10 label)
    #[default]
    #[serde(rename = "standard_1005")]
    Standard1005,
    /// 10-10 system
    #[serde(rename = "standard_1010")]
    Standard1010,
}

impl MontageKind {
    /// Returns the montage name
    pub fn name(&self) -> &'static str {
        match self {
            MontageKind::Standard1005 => "standard_1005",
            MontageKind::Standard1010 => "standard_1010",
        }
    }
}

impl fmt::Display for MontageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for MontageKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "standard_1005" => Ok(MontageKind::Standard1005),
            "standard_1010" => Ok(MontageKind::Standard1010),
            _ => Err(Error::UnknownMontage(s.to_string())),
        }
    }
}
