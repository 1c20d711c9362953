//! Seedable randomness for the controller.
//!
//! ## Uses
//!
//! - **Coach release jitter**: each accepted coach message is delayed by a
//!   random amount in `[COACH_MESSAGE_MIN_DELAY, COACH_MESSAGE_MAX_DELAY)`.
//! - **Identity**: a random game id per match and a random instance id per
//!   controller process.
//!
//! Tests seed the generator so coach release times are reproducible:
//!
//! ```
//! use game_controller::core::ControllerRng;
//!
//! let mut a = ControllerRng::new(42);
//! let mut b = ControllerRng::new(42);
//! assert_eq!(a.coach_delay(), b.coach_delay());
//! ```

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use super::coach::{COACH_MESSAGE_MAX_DELAY, COACH_MESSAGE_MIN_DELAY};

/// Deterministic RNG backed by ChaCha8.
#[derive(Clone, Debug)]
pub struct ControllerRng {
    inner: ChaCha8Rng,
}

impl ControllerRng {
    /// Create a new RNG with the given seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Create an RNG seeded from the operating system.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self::new(rand::thread_rng().gen())
    }

    /// Seeded when `seed` is given, otherwise from entropy.
    #[must_use]
    pub fn from_optional_seed(seed: Option<u64>) -> Self {
        seed.map_or_else(Self::from_entropy, Self::new)
    }

    /// Release delay (ms) for an accepted coach message.
    pub fn coach_delay(&mut self) -> i64 {
        self.inner
            .gen_range(COACH_MESSAGE_MIN_DELAY..COACH_MESSAGE_MAX_DELAY)
    }

    /// A random 32-bit identifier.
    pub fn next_id(&mut self) -> u32 {
        self.inner.gen()
    }
}

impl Default for ControllerRng {
    fn default() -> Self {
        Self::from_entropy()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_determinism() {
        let mut rng1 = ControllerRng::new(42);
        let mut rng2 = ControllerRng::new(42);

        for _ in 0..100 {
            assert_eq!(rng1.coach_delay(), rng2.coach_delay());
        }
        assert_eq!(rng1.next_id(), rng2.next_id());
    }

    #[test]
    fn test_different_seeds() {
        let mut rng1 = ControllerRng::new(1);
        let mut rng2 = ControllerRng::new(2);

        let seq1: Vec<_> = (0..10).map(|_| rng1.next_id()).collect();
        let seq2: Vec<_> = (0..10).map(|_| rng2.next_id()).collect();

        assert_ne!(seq1, seq2);
    }

    #[test]
    fn test_coach_delay_range() {
        let mut rng = ControllerRng::new(7);
        for _ in 0..1000 {
            let delay = rng.coach_delay();
            assert!((COACH_MESSAGE_MIN_DELAY..COACH_MESSAGE_MAX_DELAY).contains(&delay));
        }
    }

    #[test]
    fn test_optional_seed() {
        let mut seeded = ControllerRng::from_optional_seed(Some(9));
        assert_eq!(seeded.next_id(), ControllerRng::new(9).next_id());
    }
}
