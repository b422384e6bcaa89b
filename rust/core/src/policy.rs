// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Candidate strip selection.
//!
//! [`prefers`] is the single comparison rule; [`select_best`] folds it over
//! owned candidates and [`Policy`] applies it in place, copying a candidate
//! only when it wins.
//!
//! Rules, in order:
//!
//! 1. A candidate smaller than the minimum strip size is rejected.
//! 2. Without cache simulation, a strictly larger strip wins.
//! 3. With cache simulation, strictly more cache hits win. On equal hits,
//!    the candidate wins if its seed has a strictly lower degree while the
//!    held strip is non-empty, or if it is strictly larger.
//!
//! Every comparison is strict, so the first candidate seen wins exact ties.

use crate::strip::Strip;

/// The settings the selection rule depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PolicyRules {
    pub min_strip_size: usize,
    pub cache_simulation: bool,
}

/// Ranking inputs of one candidate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Score {
    /// Triangle count of the strip.
    pub size: usize,
    /// Pending neighbors of the seed triangle when the strip was grown.
    pub degree: usize,
    /// Simulated cache hits of the strip's vertex sequence.
    pub cache_hits: usize,
}

/// A strip together with its score.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Scored {
    pub strip: Strip,
    pub score: Score,
}

impl Scored {
    pub fn new(strip: Strip, degree: usize, cache_hits: usize) -> Self {
        let score = Score {
            size: strip.size(),
            degree,
            cache_hits,
        };
        Self { strip, score }
    }
}

/// Returns `true` if `candidate` should replace `best`.
pub fn prefers(rules: &PolicyRules, best: &Score, candidate: &Score) -> bool {
    if candidate.size < rules.min_strip_size {
        return false;
    }

    if !rules.cache_simulation {
        return candidate.size > best.size;
    }

    if candidate.cache_hits > best.cache_hits {
        return true;
    }

    candidate.cache_hits == best.cache_hits
        && ((best.size != 0 && candidate.degree < best.degree) || candidate.size > best.size)
}

/// Keeps whichever of `current` and `candidate` the rules prefer.
///
/// Folding a candidate sequence over `Scored::default()` yields the same
/// winner as feeding it to a [`Policy`].
pub fn select_best(current: Scored, candidate: Scored, rules: &PolicyRules) -> Scored {
    if prefers(rules, &current.score, &candidate.score) {
        candidate
    } else {
        current
    }
}

/// Running best-of selection over one group of candidates.
#[derive(Debug, Clone)]
pub struct Policy {
    rules: PolicyRules,
    best: Scored,
}

impl Policy {
    pub fn new(rules: PolicyRules) -> Self {
        Self {
            rules,
            best: Scored::default(),
        }
    }

    /// Offers a candidate. It is copied only if it becomes the new best.
    pub fn challenge(&mut self, strip: &Strip, degree: usize, cache_hits: usize) -> bool {
        let score = Score {
            size: strip.size(),
            degree,
            cache_hits,
        };
        if !prefers(&self.rules, &self.best.score, &score) {
            return false;
        }
        self.best.strip.clone_from(strip);
        self.best.score = score;
        true
    }

    /// The best strip so far; empty if nothing was accepted.
    pub fn best_strip(&self) -> &Strip {
        &self.best.strip
    }

    pub fn best_score(&self) -> &Score {
        &self.best.score
    }

    pub fn best(&self) -> &Scored {
        &self.best
    }

    /// Forgets the held strip so the policy can judge a new group.
    pub fn reset(&mut self) {
        self.best.strip.clear();
        self.best.score = Score::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strip_of(size: usize) -> Strip {
        Strip {
            indices: (0..size as u32 + 2).collect(),
            triangles: (0..size).collect(),
        }
    }

    fn rules(min_strip_size: usize, cache_simulation: bool) -> PolicyRules {
        PolicyRules {
            min_strip_size,
            cache_simulation,
        }
    }

    #[test]
    fn rejects_short_strips() {
        let mut policy = Policy::new(rules(3, false));
        assert!(!policy.challenge(&strip_of(2), 0, 0));
        assert!(policy.best_strip().is_empty());
        assert!(policy.challenge(&strip_of(3), 0, 0));
    }

    #[test]
    fn longest_wins_without_cache() {
        let mut policy = Policy::new(rules(1, false));
        policy.challenge(&strip_of(2), 3, 0);
        policy.challenge(&strip_of(4), 3, 0);
        // Cache hits and degree are ignored
        policy.challenge(&strip_of(3), 0, 10);
        assert_eq!(policy.best_score().size, 4);
    }

    #[test]
    fn first_seen_wins_ties() {
        let mut policy = Policy::new(rules(1, false));
        let mut first = strip_of(2);
        first.indices[0] = 99;
        policy.challenge(&first, 1, 0);
        policy.challenge(&strip_of(2), 1, 0);
        assert_eq!(policy.best_strip().indices[0], 99);
    }

    #[test]
    fn cache_hits_take_priority() {
        let mut policy = Policy::new(rules(1, true));
        policy.challenge(&strip_of(5), 0, 1);
        assert!(policy.challenge(&strip_of(2), 3, 2));
        assert_eq!(policy.best_score().cache_hits, 2);
        assert_eq!(policy.best_score().size, 2);
    }

    #[test]
    fn lower_degree_wins_hit_tie_against_held_strip() {
        let mut policy = Policy::new(rules(1, true));
        policy.challenge(&strip_of(5), 2, 1);
        assert!(policy.challenge(&strip_of(2), 1, 1));
        assert_eq!(policy.best_score().degree, 1);
        assert_eq!(policy.best_score().size, 2);
    }

    #[test]
    fn larger_size_wins_equal_hits_and_degree() {
        let mut policy = Policy::new(rules(1, true));
        policy.challenge(&strip_of(2), 2, 1);
        assert!(policy.challenge(&strip_of(3), 2, 1));
        assert!(!policy.challenge(&strip_of(3), 2, 1));
        assert_eq!(policy.best_score().size, 3);
    }

    #[test]
    fn degree_ignored_against_empty_best() {
        let mut policy = Policy::new(rules(0, true));
        assert!(policy.challenge(&strip_of(1), 3, 0));
        assert_eq!(policy.best_score().degree, 3);
    }

    #[test]
    fn fold_matches_policy() {
        let rules = rules(2, true);
        let candidates = [(3, 2, 0), (1, 1, 4), (4, 2, 1), (2, 1, 1), (5, 3, 1)];

        let mut policy = Policy::new(rules);
        for &(size, degree, hits) in &candidates {
            policy.challenge(&strip_of(size), degree, hits);
        }

        let folded = candidates
            .iter()
            .map(|&(size, degree, hits)| Scored::new(strip_of(size), degree, hits))
            .fold(Scored::default(), |best, c| select_best(best, c, &rules));

        assert_eq!(&folded, policy.best());
        assert_eq!(folded.score.size, 5);
    }

    #[test]
    fn reset_clears_best() {
        let mut policy = Policy::new(rules(1, false));
        policy.challenge(&strip_of(3), 0, 0);
        policy.reset();
        assert!(policy.best_strip().is_empty());
        assert!(policy.challenge(&strip_of(1), 0, 0));
    }
}
