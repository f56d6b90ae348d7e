//! Stem/branch symbols and the symbol -> element table.
//!
//! # Responsibility
//! - Define the closed 10-stem and 12-branch enumerations.
//! - Provide the fixed, process-wide element lookup for every symbol.
//!
//! # Invariants
//! - The element table is total: every `Stem` and `Branch` maps to exactly
//!   one `ElementCategory`.
//! - Glyph parsing never defaults; an unknown glyph is a `SymbolError`.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// One of the five elemental categories.
///
/// Declaration order is the canonical display order used by every
/// per-category list in core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementCategory {
    Wood,
    Fire,
    Earth,
    Metal,
    Water,
}

impl ElementCategory {
    /// All categories in canonical order.
    pub const ALL: [ElementCategory; 5] = [
        Self::Wood,
        Self::Fire,
        Self::Earth,
        Self::Metal,
        Self::Water,
    ];

    /// Position of this category inside `ALL`.
    pub fn index(self) -> usize {
        match self {
            Self::Wood => 0,
            Self::Fire => 1,
            Self::Earth => 2,
            Self::Metal => 3,
            Self::Water => 4,
        }
    }

    /// Single-glyph label (木火土金水).
    pub fn glyph(self) -> &'static str {
        match self {
            Self::Wood => "木",
            Self::Fire => "火",
            Self::Earth => "土",
            Self::Metal => "金",
            Self::Water => "水",
        }
    }

    /// Stable lowercase English name, matching the serde wire form.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Wood => "wood",
            Self::Fire => "fire",
            Self::Earth => "earth",
            Self::Metal => "metal",
            Self::Water => "water",
        }
    }
}

/// Heavenly stem (天干).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stem {
    Jia,
    Yi,
    Bing,
    Ding,
    Wu,
    Ji,
    Geng,
    Xin,
    Ren,
    Gui,
}

impl Stem {
    pub const ALL: [Stem; 10] = [
        Self::Jia,
        Self::Yi,
        Self::Bing,
        Self::Ding,
        Self::Wu,
        Self::Ji,
        Self::Geng,
        Self::Xin,
        Self::Ren,
        Self::Gui,
    ];

    pub fn glyph(self) -> char {
        match self {
            Self::Jia => '甲',
            Self::Yi => '乙',
            Self::Bing => '丙',
            Self::Ding => '丁',
            Self::Wu => '戊',
            Self::Ji => '己',
            Self::Geng => '庚',
            Self::Xin => '辛',
            Self::Ren => '壬',
            Self::Gui => '癸',
        }
    }

    pub fn from_glyph(glyph: char) -> Result<Self, SymbolError> {
        Self::ALL
            .into_iter()
            .find(|stem| stem.glyph() == glyph)
            .ok_or(SymbolError::UnknownStem(glyph))
    }

    /// Stems pair up by element: 甲乙 wood, 丙丁 fire, 戊己 earth, 庚辛 metal, 壬癸 water.
    pub fn element(self) -> ElementCategory {
        match self {
            Self::Jia | Self::Yi => ElementCategory::Wood,
            Self::Bing | Self::Ding => ElementCategory::Fire,
            Self::Wu | Self::Ji => ElementCategory::Earth,
            Self::Geng | Self::Xin => ElementCategory::Metal,
            Self::Ren | Self::Gui => ElementCategory::Water,
        }
    }
}

/// Earthly branch (地支).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Branch {
    Zi,
    Chou,
    Yin,
    Mao,
    Chen,
    Si,
    Wu,
    Wei,
    Shen,
    You,
    Xu,
    Hai,
}

impl Branch {
    pub const ALL: [Branch; 12] = [
        Self::Zi,
        Self::Chou,
        Self::Yin,
        Self::Mao,
        Self::Chen,
        Self::Si,
        Self::Wu,
        Self::Wei,
        Self::Shen,
        Self::You,
        Self::Xu,
        Self::Hai,
    ];

    pub fn glyph(self) -> char {
        match self {
            Self::Zi => '子',
            Self::Chou => '丑',
            Self::Yin => '寅',
            Self::Mao => '卯',
            Self::Chen => '辰',
            Self::Si => '巳',
            Self::Wu => '午',
            Self::Wei => '未',
            Self::Shen => '申',
            Self::You => '酉',
            Self::Xu => '戌',
            Self::Hai => '亥',
        }
    }

    pub fn from_glyph(glyph: char) -> Result<Self, SymbolError> {
        Self::ALL
            .into_iter()
            .find(|branch| branch.glyph() == glyph)
            .ok_or(SymbolError::UnknownBranch(glyph))
    }

    pub fn element(self) -> ElementCategory {
        match self {
            Self::Yin | Self::Mao => ElementCategory::Wood,
            Self::Si | Self::Wu => ElementCategory::Fire,
            Self::Chou | Self::Chen | Self::Wei | Self::Xu => ElementCategory::Earth,
            Self::Shen | Self::You => ElementCategory::Metal,
            Self::Zi | Self::Hai => ElementCategory::Water,
        }
    }
}

/// Any stem or branch glyph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Symbol {
    Stem(Stem),
    Branch(Branch),
}

impl Symbol {
    pub fn glyph(self) -> char {
        match self {
            Self::Stem(stem) => stem.glyph(),
            Self::Branch(branch) => branch.glyph(),
        }
    }

    /// Looks the glyph up in both symbol sets.
    pub fn from_glyph(glyph: char) -> Result<Self, SymbolError> {
        if let Ok(stem) = Stem::from_glyph(glyph) {
            return Ok(Self::Stem(stem));
        }
        Branch::from_glyph(glyph)
            .map(Self::Branch)
            .map_err(|_| SymbolError::UnknownSymbol(glyph))
    }
}

/// Symbol -> element lookup.
pub fn element_of(symbol: Symbol) -> ElementCategory {
    match symbol {
        Symbol::Stem(stem) => stem.element(),
        Symbol::Branch(branch) => branch.element(),
    }
}

/// Glyph-level parse errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SymbolError {
    UnknownStem(char),
    UnknownBranch(char),
    UnknownSymbol(char),
    /// A pillar must be exactly one stem glyph followed by one branch glyph.
    MalformedPillar(String),
}

impl Display for SymbolError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownStem(glyph) => write!(f, "unknown stem glyph: {glyph}"),
            Self::UnknownBranch(glyph) => write!(f, "unknown branch glyph: {glyph}"),
            Self::UnknownSymbol(glyph) => write!(f, "unknown stem/branch glyph: {glyph}"),
            Self::MalformedPillar(value) => {
                write!(f, "pillar must be one stem and one branch glyph, got `{value}`")
            }
        }
    }
}

impl Error for SymbolError {}
