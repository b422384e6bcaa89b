// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for stripification.
//!
//! Degenerate triangles and non-manifold edges are not errors: the graph
//! builder absorbs them and reports them through [`GraphStats`](crate::GraphStats).

/// Result type alias for stripification operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building a triangle graph or stripifying it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The index list does not describe whole triangles.
    #[error("index count {index_count} is not a multiple of three")]
    InvalidInputShape { index_count: usize },

    /// The configuration cannot be used (e.g. a zero-sized simulated cache).
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The caller's cancellation flag was raised between two rounds.
    #[error("stripification cancelled after {rounds} rounds")]
    Cancelled { rounds: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages() {
        let err = Error::InvalidInputShape { index_count: 7 };
        assert_eq!(err.to_string(), "index count 7 is not a multiple of three");

        let err = Error::Cancelled { rounds: 3 };
        assert_eq!(err.to_string(), "stripification cancelled after 3 rounds");
    }
}
