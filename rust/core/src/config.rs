// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Stripification settings.

use crate::error::{Error, Result};
use crate::policy::PolicyRules;

/// Default floor below which a strip is left as independent triangles.
pub const DEFAULT_MIN_STRIP_SIZE: usize = 2;

/// Default number of entries in the simulated post-transform vertex cache.
pub const DEFAULT_CACHE_CAPACITY: usize = 16;

/// How seed triangles are chosen each round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum SeedSearch {
    /// Every round scans all pending triangles in input order and commits
    /// the single best strip found. Quadratic in the triangle count.
    #[default]
    Exhaustive,
    /// Every round grows strips only from the pending triangle with the
    /// fewest pending neighbors (lowest index on ties). Close to linear, so
    /// prefer it once meshes reach a few thousand triangles.
    Loneliest,
}

impl SeedSearch {
    /// Returns the lowercase name used on the command line and in JSON.
    pub fn as_str(&self) -> &'static str {
        match self {
            SeedSearch::Exhaustive => "exhaustive",
            SeedSearch::Loneliest => "loneliest",
        }
    }
}

impl std::fmt::Display for SeedSearch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SeedSearch {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "exhaustive" => Ok(SeedSearch::Exhaustive),
            "loneliest" => Ok(SeedSearch::Loneliest),
            other => Err(Error::InvalidConfig(format!("unknown seed search `{other}`"))),
        }
    }
}

/// Configuration for [`Stripifier`](crate::Stripifier).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct StripifyConfig {
    /// Strips with fewer triangles than this are never committed.
    pub min_strip_size: usize,
    /// Rank candidates by simulated cache hits before size.
    pub cache_simulation: bool,
    /// Capacity of the simulated FIFO cache. Must be positive when
    /// `cache_simulation` is set.
    pub cache_capacity: usize,
    /// Score candidates against the cache state left by the strips already
    /// committed, instead of an empty cache.
    pub carry_cache: bool,
    /// Also grow candidates backward from the seed.
    pub backward_search: bool,
    /// Seed selection strategy.
    pub search: SeedSearch,
}

impl Default for StripifyConfig {
    fn default() -> Self {
        Self {
            min_strip_size: DEFAULT_MIN_STRIP_SIZE,
            cache_simulation: true,
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            carry_cache: true,
            backward_search: true,
            search: SeedSearch::Exhaustive,
        }
    }
}

impl StripifyConfig {
    pub fn with_min_strip_size(mut self, min_strip_size: usize) -> Self {
        self.min_strip_size = min_strip_size;
        self
    }

    pub fn with_cache_simulation(mut self, enabled: bool) -> Self {
        self.cache_simulation = enabled;
        self
    }

    pub fn with_cache_capacity(mut self, capacity: usize) -> Self {
        self.cache_capacity = capacity;
        self
    }

    pub fn with_carry_cache(mut self, carry: bool) -> Self {
        self.carry_cache = carry;
        self
    }

    pub fn with_backward_search(mut self, enabled: bool) -> Self {
        self.backward_search = enabled;
        self
    }

    pub fn with_search(mut self, search: SeedSearch) -> Self {
        self.search = search;
        self
    }

    /// Checks that the settings can be used together.
    pub fn validate(&self) -> Result<()> {
        if self.cache_simulation && self.cache_capacity == 0 {
            return Err(Error::InvalidConfig(
                "cache capacity must be positive when cache simulation is enabled".into(),
            ));
        }
        Ok(())
    }

    /// The subset of settings the selection policy needs.
    pub fn policy_rules(&self) -> PolicyRules {
        PolicyRules {
            min_strip_size: self.min_strip_size,
            cache_simulation: self.cache_simulation,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = StripifyConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.min_strip_size, 2);
        assert_eq!(config.cache_capacity, 16);
        assert_eq!(config.search, SeedSearch::Exhaustive);
    }

    #[test]
    fn zero_capacity_rejected_only_with_simulation() {
        let config = StripifyConfig::default().with_cache_capacity(0);
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));

        let config = config.with_cache_simulation(false);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn seed_search_parsing() {
        assert_eq!("Loneliest".parse::<SeedSearch>().unwrap(), SeedSearch::Loneliest);
        assert_eq!(" exhaustive ".parse::<SeedSearch>().unwrap(), SeedSearch::Exhaustive);
        assert!("greedy".parse::<SeedSearch>().is_err());
        assert_eq!(SeedSearch::Loneliest.to_string(), "loneliest");
    }
}
