// Deterministic, portable pseudo-random number generator for cave generation.
//
// Implements xoshiro256++ (Blackman & Vigna, 2019) with SplitMix64 seeding,
// plus FNV-1a hashing so that human-readable seed strings ("cavern",
// "level-3", ...) map to the same 64-bit seed on every platform. The string
// hash is part of the contract: changing it changes every generated map.
//
// `cavern_gen` draws all of its randomness from one `CaveRng`: the random
// fill of the cell grid and the probabilistic fringe of the dust scatter
// pass. The automaton owns the generator and advances it in a fixed scan
// order, so the stream length depends only on the grid size and config.
//
// **Critical constraint: determinism.** Every method on `CaveRng` must produce
// identical output given the same prior state, regardless of platform, compiler
// version, or optimization level. Do not use floating-point arithmetic, stdlib
// hashers (`DefaultHasher` is randomly keyed), or OS entropy in this crate.

use serde::{Deserialize, Serialize};

/// FNV-1a 64-bit offset basis.
const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;

/// FNV-1a 64-bit prime.
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// Xoshiro256++ PRNG, the generator's sole source of randomness.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CaveRng {
    s: [u64; 4],
}

impl CaveRng {
    /// Create a new PRNG seeded from a `u64`.
    ///
    /// Uses SplitMix64 to expand the seed into the 256-bit internal state.
    /// Two `CaveRng` instances created with the same seed will produce
    /// identical output sequences.
    pub fn new(seed: u64) -> Self {
        let mut sm = seed;
        Self {
            s: [
                splitmix64(&mut sm),
                splitmix64(&mut sm),
                splitmix64(&mut sm),
                splitmix64(&mut sm),
            ],
        }
    }

    /// Create a PRNG from a seed string, hashed with [`hash_seed`].
    pub fn from_seed_str(seed: &str) -> Self {
        Self::new(hash_seed(seed))
    }

    /// Generate the next `u64` in the sequence.
    pub fn next_u64(&mut self) -> u64 {
        let result = (self.s[0].wrapping_add(self.s[3]))
            .rotate_left(23)
            .wrapping_add(self.s[0]);

        let t = self.s[1] << 17;

        self.s[2] ^= self.s[0];
        self.s[3] ^= self.s[1];
        self.s[1] ^= self.s[2];
        self.s[0] ^= self.s[3];

        self.s[2] ^= t;
        self.s[3] = self.s[3].rotate_left(45);

        result
    }

    /// Generate a uniform random integer in `[low, high)`.
    ///
    /// Uses rejection sampling to avoid modulo bias.
    /// Panics if `low >= high`.
    pub fn range_u64(&mut self, low: u64, high: u64) -> u64 {
        assert!(low < high, "range_u64: low must be less than high");
        let range = high - low;
        if range.is_power_of_two() {
            return low + (self.next_u64() & (range - 1));
        }
        // Rejection sampling to avoid modulo bias.
        let threshold = range.wrapping_neg() % range; // = (2^64 - range) % range
        loop {
            let r = self.next_u64();
            if r >= threshold {
                return low + (r % range);
            }
        }
    }

    /// Roll a percentage: a uniform integer in `[0, 100)`.
    ///
    /// Threshold comparisons in the automaton (`roll < empty_threshold`) are
    /// written against this.
    pub fn roll_percent(&mut self) -> i32 {
        self.range_u64(0, 100) as i32
    }
}

/// Hash a seed string to a `u64` with FNV-1a over its UTF-8 bytes.
///
/// Stable across platforms and releases; the empty string hashes to the
/// FNV offset basis.
pub fn hash_seed(seed: &str) -> u64 {
    seed.bytes().fold(FNV_OFFSET_BASIS, |hash, byte| {
        (hash ^ u64::from(byte)).wrapping_mul(FNV_PRIME)
    })
}

/// SplitMix64, used only for seeding xoshiro256++ from a single `u64`.
///
/// This is the standard recommendation from the xoshiro authors for
/// expanding a small seed into a larger state.
fn splitmix64(state: &mut u64) -> u64 {
    *state = state.wrapping_add(0x9e37_79b9_7f4a_7c15);
    let mut z = *state;
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_stream() {
        let mut a = CaveRng::new(42);
        let mut b = CaveRng::new(42);
        for _ in 0..1000 {
            assert_eq!(a.next_u64(), b.next_u64());
        }
    }

    #[test]
    fn different_seeds_different_stream() {
        let mut a = CaveRng::new(42);
        let mut b = CaveRng::new(43);
        // Extremely unlikely to collide on the first value.
        assert_ne!(a.next_u64(), b.next_u64());
    }

    #[test]
    fn seed_strings_hash_to_reference_values() {
        // Published FNV-1a 64 test vectors.
        assert_eq!(hash_seed(""), 0xcbf2_9ce4_8422_2325);
        assert_eq!(hash_seed("a"), 0xaf63_dc4c_8601_ec8c);
    }

    #[test]
    fn known_answer_streams() {
        // Pinned outputs; any change here changes every generated map.
        let mut zero = CaveRng::new(0);
        assert_eq!(zero.next_u64(), 0x5317_5d61_490b_23df);
        assert_eq!(zero.next_u64(), 0x61da_6f3d_c380_d507);
        assert_eq!(zero.next_u64(), 0x5c0f_df91_ec9a_7bfc);
        assert_eq!(zero.next_u64(), 0x02ee_bf8c_3bbe_5e1a);

        let mut answer = CaveRng::new(42);
        assert_eq!(answer.next_u64(), 0xd076_4d4f_4476_689f);
        assert_eq!(answer.next_u64(), 0x519e_4174_576f_3791);
        assert_eq!(answer.next_u64(), 0xfbe0_7cfb_0c24_ed8c);

        assert_eq!(hash_seed("cavern"), 0x6712_d974_b5e1_c470);
        let mut cavern = CaveRng::from_seed_str("cavern");
        assert_eq!(cavern.next_u64(), 0x6f5c_c405_23de_49ef);
        assert_eq!(cavern.next_u64(), 0xc3e7_e046_cc71_73bc);
        assert_eq!(cavern.next_u64(), 0xa7a7_28ce_d07d_d29c);
    }

    #[test]
    fn known_answer_rolls() {
        let mut rng = CaveRng::from_seed_str("cavern");
        let rolls: Vec<i32> = (0..12).map(|_| rng.roll_percent()).collect();
        assert_eq!(rolls, [3, 60, 24, 3, 89, 91, 53, 26, 6, 58, 11, 59]);

        let mut rng = CaveRng::new(1);
        let draws: Vec<u64> = (0..12).map(|_| rng.range_u64(0, 10)).collect();
        assert_eq!(draws, [7, 5, 4, 0, 0, 5, 3, 5, 0, 2, 1, 7]);
    }

    #[test]
    fn seed_string_streams_match_hashed_seed() {
        let mut from_str = CaveRng::from_seed_str("cavern");
        let mut from_hash = CaveRng::new(hash_seed("cavern"));
        for _ in 0..100 {
            assert_eq!(from_str.next_u64(), from_hash.next_u64());
        }
        assert_ne!(hash_seed("cavern"), hash_seed("Cavern"));
    }

    #[test]
    fn range_u64_within_bounds() {
        let mut rng = CaveRng::new(999);
        for _ in 0..10_000 {
            let v = rng.range_u64(10, 20);
            assert!((10..20).contains(&v), "range_u64 out of range: {v}");
        }
    }

    #[test]
    fn roll_percent_covers_whole_range() {
        let mut rng = CaveRng::new(7);
        let mut seen = [false; 100];
        for _ in 0..20_000 {
            let v = rng.roll_percent();
            assert!((0..100).contains(&v), "roll out of range: {v}");
            seen[v as usize] = true;
        }
        assert!(seen.iter().all(|&s| s), "every percentile should be reachable");
    }

    #[test]
    fn serialization_roundtrip() {
        let mut rng = CaveRng::from_seed_str("resume-me");
        // Advance state
        for _ in 0..100 {
            rng.next_u64();
        }
        let json = serde_json::to_string(&rng).unwrap();
        let mut restored: CaveRng = serde_json::from_str(&json).unwrap();
        // Continued sequences should match.
        for _ in 0..100 {
            assert_eq!(rng.next_u64(), restored.next_u64());
        }
    }
}
