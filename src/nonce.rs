/// Nonce and timestamp generation
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::{SystemTime, UNIX_EPOCH};

struct NonceState {
    rng: StdRng,
    counter: u64,
}

/// Per-client nonce source
///
/// Each nonce combines a random draw with a strictly increasing counter, so
/// two nonces from the same generator never collide even when the random
/// source repeats or the clock stalls.
pub struct NonceGenerator {
    state: Mutex<NonceState>,
}

impl NonceGenerator {
    /// Create a generator seeded from OS entropy
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Create a generator with an explicit random source
    pub fn with_rng(rng: StdRng) -> Self {
        Self {
            state: Mutex::new(NonceState { rng, counter: 0 }),
        }
    }

    /// Produce the next nonce, formatted as `<random>+<counter>`
    pub fn nonce(&self) -> String {
        let mut state = self.state.lock();
        state.counter += 1;
        let random: u32 = state.rng.gen();
        format!("{}+{}", random, state.counter)
    }
}

impl Default for NonceGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// Current Unix time in seconds
pub fn timestamp() -> String {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
        .to_string()
}
