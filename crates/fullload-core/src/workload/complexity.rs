// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Complexity tiers and the per-tier problem sizes they select.

use super::UnknownKey;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};
use std::str::FromStr;

/// A named preset selecting iteration counts or problem sizes.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum ComplexityTier {
    /// Smallest problem size.
    Easy,
    /// The default problem size.
    #[default]
    Medium,
    /// Largest problem size.
    Hard,
}

impl ComplexityTier {
    /// Every tier, from easiest to hardest.
    pub const ALL: [ComplexityTier; 3] = [
        ComplexityTier::Easy,
        ComplexityTier::Medium,
        ComplexityTier::Hard,
    ];

    /// Returns the lowercase key of this tier.
    pub fn key(&self) -> &'static str {
        match self {
            ComplexityTier::Easy => "easy",
            ComplexityTier::Medium => "medium",
            ComplexityTier::Hard => "hard",
        }
    }
}

impl Display for ComplexityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for ComplexityTier {
    type Err = UnknownKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(ComplexityTier::Easy),
            "medium" => Ok(ComplexityTier::Medium),
            "hard" => Ok(ComplexityTier::Hard),
            _ => Err(UnknownKey {
                what: "complexity",
                key: s.to_owned(),
            }),
        }
    }
}

/// One problem size per [`ComplexityTier`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierSizes {
    /// Size used for [`ComplexityTier::Easy`].
    pub easy: u64,
    /// Size used for [`ComplexityTier::Medium`].
    pub medium: u64,
    /// Size used for [`ComplexityTier::Hard`].
    pub hard: u64,
}

impl TierSizes {
    /// Creates a new size table.
    pub const fn new(easy: u64, medium: u64, hard: u64) -> Self {
        Self { easy, medium, hard }
    }

    /// Returns the same size for every tier.
    pub const fn uniform(size: u64) -> Self {
        Self::new(size, size, size)
    }

    /// Returns the size selected by `tier`.
    pub fn for_tier(&self, tier: ComplexityTier) -> u64 {
        match tier {
            ComplexityTier::Easy => self.easy,
            ComplexityTier::Medium => self.medium,
            ComplexityTier::Hard => self.hard,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tier_selects_matching_size() {
        let sizes = TierSizes::new(1, 2, 3);
        assert_eq!(sizes.for_tier(ComplexityTier::Easy), 1);
        assert_eq!(sizes.for_tier(ComplexityTier::Medium), 2);
        assert_eq!(sizes.for_tier(ComplexityTier::Hard), 3);
    }

    #[test]
    fn unknown_tier_is_rejected() {
        assert!("extreme".parse::<ComplexityTier>().is_err());
        assert_eq!("HARD".parse::<ComplexityTier>(), Ok(ComplexityTier::Hard));
    }
}
