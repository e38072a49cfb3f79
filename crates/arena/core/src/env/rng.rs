//! Deterministic random draws.
//!
//! The kernel never keeps generator state in the oracle: every draw hashes the
//! match seed with a monotonically increasing draw counter stored in the game
//! state, so two runs with the same seed see the same sequence.

/// Stateless random oracle: the same seed always yields the same value.
pub trait RngOracle: Send + Sync {
    fn next_u32(&self, seed: u64) -> u32;

    /// Uniform index in `0..len`. `len == 0` yields 0.
    fn choose_index(&self, seed: u64, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        self.next_u32(seed) as usize % len
    }

    fn flip(&self, seed: u64) -> bool {
        self.next_u32(seed) & 1 == 1
    }
}

/// PCG-XSH-RR: 64-bit LCG state, 32-bit permuted output.
#[derive(Clone, Copy, Debug, Default)]
pub struct PcgRng;

impl PcgRng {
    const MULTIPLIER: u64 = 6364136223846793005;
    const INCREMENT: u64 = 1442695040888963407;

    #[inline]
    fn step(state: u64) -> u64 {
        state
            .wrapping_mul(Self::MULTIPLIER)
            .wrapping_add(Self::INCREMENT)
    }

    #[inline]
    fn output(state: u64) -> u32 {
        let xorshifted = (((state >> 18) ^ state) >> 27) as u32;
        let rotation = (state >> 59) as u32;
        xorshifted.rotate_right(rotation)
    }
}

impl RngOracle for PcgRng {
    fn next_u32(&self, seed: u64) -> u32 {
        Self::output(Self::step(seed))
    }
}

/// What a draw is used for. Mixed into the seed so different uses never
/// share a stream.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u32)]
pub enum DrawPurpose {
    SpawnFacing = 1,
    TieBreak = 2,
}

/// Derives the seed for one draw.
///
/// * `match_seed` - seed supplied by match setup
/// * `draw` - draw counter at the time of the draw
/// * `subject` - entity the draw concerns (0 when none)
pub fn compute_seed(match_seed: u64, draw: u64, subject: u32, purpose: DrawPurpose) -> u64 {
    let mut hash = match_seed;
    hash ^= draw.wrapping_mul(0x9e3779b97f4a7c15);
    hash ^= (subject as u64).wrapping_mul(0x517cc1b727220a95);
    hash ^= (purpose as u32 as u64).wrapping_mul(0x85ebca6b);

    // SplitMix64 finalizer
    hash ^= hash >> 33;
    hash = hash.wrapping_mul(0xff51afd7ed558ccd);
    hash ^= hash >> 33;
    hash
}
