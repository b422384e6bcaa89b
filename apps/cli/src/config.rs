// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! CLI configuration loaded from environment variables.
//!
//! Unset or unparsable variables fall back to the library defaults.
//! Command line flags are applied on top (see `main.rs`).

use std::str::FromStr;

use tristrip_core::{SeedSearch, StripifyConfig};

/// CLI configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Settings passed to every stripification.
    pub stripify: StripifyConfig,
    /// Number of worker threads for processing meshes in parallel.
    pub worker_threads: usize,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = StripifyConfig::default();
        Self {
            stripify: StripifyConfig {
                min_strip_size: parse_or(&lookup, "TRISTRIP_MIN_STRIP_SIZE", defaults.min_strip_size),
                cache_simulation: flag_or(&lookup, "TRISTRIP_CACHE", defaults.cache_simulation),
                cache_capacity: parse_or(&lookup, "TRISTRIP_CACHE_SIZE", defaults.cache_capacity),
                carry_cache: flag_or(&lookup, "TRISTRIP_CARRY_CACHE", defaults.carry_cache),
                backward_search: flag_or(&lookup, "TRISTRIP_BACKWARD", defaults.backward_search),
                search: parse_or::<SeedSearch>(&lookup, "TRISTRIP_SEARCH", defaults.search),
            },
            worker_threads: parse_or(&lookup, "WORKER_THREADS", num_cpus::get()).max(1),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

fn parse_or<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T {
    lookup(key)
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

/// Accepts 1/0, true/false, yes/no, on/off.
fn flag_or(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: bool) -> bool {
    match lookup(key).map(|v| v.trim().to_ascii_lowercase()).as_deref() {
        Some("1" | "true" | "yes" | "on") => true,
        Some("0" | "false" | "no" | "off") => false,
        _ => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_without_variables() {
        let config = config_from(&[]);
        assert_eq!(config.stripify, StripifyConfig::default());
        assert!(config.worker_threads >= 1);
    }

    #[test]
    fn reads_variables() {
        let config = config_from(&[
            ("TRISTRIP_MIN_STRIP_SIZE", "3"),
            ("TRISTRIP_CACHE", "off"),
            ("TRISTRIP_CACHE_SIZE", "24"),
            ("TRISTRIP_SEARCH", "loneliest"),
            ("WORKER_THREADS", "2"),
        ]);
        assert_eq!(config.stripify.min_strip_size, 3);
        assert!(!config.stripify.cache_simulation);
        assert_eq!(config.stripify.cache_capacity, 24);
        assert_eq!(config.stripify.search, SeedSearch::Loneliest);
        assert_eq!(config.worker_threads, 2);
    }

    #[test]
    fn bad_values_fall_back() {
        let config = config_from(&[
            ("TRISTRIP_MIN_STRIP_SIZE", "many"),
            ("TRISTRIP_BACKWARD", "maybe"),
            ("WORKER_THREADS", "0"),
        ]);
        assert_eq!(config.stripify.min_strip_size, 2);
        assert!(config.stripify.backward_search);
        assert_eq!(config.worker_threads, 1);
    }
}
