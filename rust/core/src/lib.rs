// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # TriStrip Core
//!
//! Converts indexed triangle lists into GPU triangle strips, ranking
//! candidate strips against a simulated FIFO vertex cache.
//!
//! The pipeline is:
//!
//! 1. [`TriangleGraph`] links every triangle to its edge neighbors.
//! 2. [`StripBuilder`] greedily grows candidate strips from a seed triangle.
//! 3. [`VertexCache`] scores candidates by cache hits.
//! 4. [`Policy`] keeps the best candidate of a round.
//! 5. [`Stripifier`] repeats rounds until no worthwhile strip remains and
//!    returns the strips plus a triangle list of leftovers.
//!
//! ```
//! use tristrip_core::{stripify, StripifyConfig};
//!
//! // Four triangles forming the strip 0 1 2 3 4 5
//! let indices = [0, 1, 2, 2, 1, 3, 2, 3, 4, 4, 3, 5];
//! let result = stripify(&indices, &StripifyConfig::default()).unwrap();
//!
//! assert_eq!(result.strips.len(), 1);
//! assert_eq!(result.strips[0].indices, vec![0, 1, 2, 3, 4, 5]);
//! ```
//!
//! The input is assumed to be final: no welding, simplification or
//! material sorting happens here.

pub mod builder;
pub mod cache;
pub mod config;
pub mod error;
pub mod graph;
pub mod policy;
pub mod strip;
pub mod stripifier;

pub use builder::StripBuilder;
pub use cache::{count_hits, VertexCache};
pub use config::{SeedSearch, StripifyConfig, DEFAULT_CACHE_CAPACITY, DEFAULT_MIN_STRIP_SIZE};
pub use error::{Error, Result};
pub use graph::{GraphStats, Triangle, TriangleGraph, TriangleId};
pub use policy::{prefers, select_best, Policy, PolicyRules, Score, Scored};
pub use strip::Strip;
pub use stripifier::{stripify, Stripification, Stripifier, StripifyStats};
