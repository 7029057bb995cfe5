//! Threat weights for m,n,k evaluation
//!
//! Each catalog bucket carries one weight for the engine's own threats and a
//! larger one for the adversary's: a near-win left unblocked costs more than
//! an own threat of the same shape earns.

use crate::threats::Bucket;

/// Default weights
pub struct ThreatScore;

impl ThreatScore {
    /// K in a row - terminal
    pub const WIN: i32 = 1_000_000;

    // Own threats
    /// _XXX_ : two ways to complete
    pub const OWN_K1_OPEN: i32 = 250;
    /// OXXX_ or XX_X : one way to complete
    pub const OWN_K1_HALF_OPEN: i32 = 80;
    /// _XX_ : becomes an open k-1
    pub const OWN_K2_OPEN: i32 = 100;

    // Adversary threats
    pub const ADVERSARY_K1_OPEN: i32 = 5_020;
    pub const ADVERSARY_K1_HALF_OPEN: i32 = 2_000;
    pub const ADVERSARY_K2_OPEN: i32 = 1_300;
}

/// One weight per catalog bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BucketWeights {
    pub k_minus_1_open: i32,
    pub k_minus_1_half_open: i32,
    pub k_minus_2_open: i32,
}

impl BucketWeights {
    pub const fn new(k_minus_1_open: i32, k_minus_1_half_open: i32, k_minus_2_open: i32) -> Self {
        Self {
            k_minus_1_open,
            k_minus_1_half_open,
            k_minus_2_open,
        }
    }

    #[inline]
    pub fn weight(&self, bucket: Bucket) -> i32 {
        match bucket {
            Bucket::KMinus1Open => self.k_minus_1_open,
            Bucket::KMinus1HalfOpen => self.k_minus_1_half_open,
            Bucket::KMinus2Open => self.k_minus_2_open,
        }
    }

    /// Weighted sum of counts indexed by [`Bucket::index`]
    #[must_use]
    pub fn score(&self, counts: [usize; 3]) -> i32 {
        Bucket::ALL.iter().fold(0i32, |acc, &bucket| {
            let count = i32::try_from(counts[bucket.index()]).unwrap_or(i32::MAX);
            acc.saturating_add(count.saturating_mul(self.weight(bucket)))
        })
    }
}

/// Weights for the engine's side, the adversary, and terminal positions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThreatWeights {
    pub own: BucketWeights,
    pub adversary: BucketWeights,
    pub win: i32,
}

impl Default for ThreatWeights {
    fn default() -> Self {
        Self {
            own: BucketWeights::new(
                ThreatScore::OWN_K1_OPEN,
                ThreatScore::OWN_K1_HALF_OPEN,
                ThreatScore::OWN_K2_OPEN,
            ),
            adversary: BucketWeights::new(
                ThreatScore::ADVERSARY_K1_OPEN,
                ThreatScore::ADVERSARY_K1_HALF_OPEN,
                ThreatScore::ADVERSARY_K2_OPEN,
            ),
            win: ThreatScore::WIN,
        }
    }
}
