// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use std::sync::{Arc, Mutex};

/// RNG shared between the components that need randomness (key generation, nonces, seeds).
pub type SharedRng = Arc<Mutex<ChaCha20Rng>>;

/// Shared RNG seeded from the operating system.
pub fn create_shared_rng() -> SharedRng {
    Arc::new(Mutex::new(ChaCha20Rng::from_entropy()))
}

/// Deterministic shared RNG, for tests and reproducible local runs.
pub fn create_shared_rng_from_u64(seed: u64) -> SharedRng {
    Arc::new(Mutex::new(ChaCha20Rng::seed_from_u64(seed)))
}
