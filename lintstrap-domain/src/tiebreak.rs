//! Pluggable tie-break for conflict resolution.
//!
//! When no principled ranking separates the remaining candidates, one is
//! picked by an injected policy. The default picks uniformly at random;
//! tests substitute [`FirstMatch`] to stay deterministic.

use rand::Rng;

pub trait TieBreak {
    /// An index into `0..count`. `count` is never zero.
    fn pick(&mut self, count: usize) -> usize;
}

/// Uniform random choice among the candidates.
#[derive(Debug, Default)]
pub struct RandomTieBreak;

impl TieBreak for RandomTieBreak {
    fn pick(&mut self, count: usize) -> usize {
        rand::rng().random_range(0..count)
    }
}

/// Always the first candidate, for deterministic tests.
#[derive(Debug, Default)]
pub struct FirstMatch;

impl TieBreak for FirstMatch {
    fn pick(&mut self, _count: usize) -> usize {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_pick_stays_in_range() {
        let mut breaker = RandomTieBreak;
        for _ in 0..64 {
            assert!(breaker.pick(3) < 3);
        }
    }

    #[test]
    fn first_match_is_deterministic() {
        assert_eq!(FirstMatch.pick(5), 0);
    }
}
