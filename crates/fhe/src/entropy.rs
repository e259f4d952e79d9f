// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::{FheError, Principal, Seed};
use alloy_primitives::B256;
use num_bigint::BigUint;
use rand::RngCore;
use sha2::{Digest, Sha256};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::warn;
use veil_utils::SharedRng;
use zeroize::Zeroizing;

/// What the registry knows about the round at the moment a winner is drawn.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DrawContext {
    pub registry: Principal,
    pub round: u64,
    pub participant_count: u64,
    /// Digest over every enrolled handle id, in enrollment order.
    pub transcript: B256,
}

/// Supplies the randomness used to pick a winner.
pub trait EntropySource: Send + Sync {
    fn draw(&self, ctx: &DrawContext) -> Result<Seed, FheError>;

    /// Short name used in logs and status output.
    fn name(&self) -> &'static str;
}

/// Map a seed to an index in `[0, count)`.
///
/// The index is `sha256("veil/winner-index" || seed || count_be64)` read as a big-endian integer,
/// reduced modulo `count`. Returns `None` when there is nothing to pick from.
pub fn index_from_seed(seed: &Seed, count: u64) -> Option<u64> {
    if count == 0 {
        return None;
    }
    let mut hasher = Sha256::new();
    hasher.update(b"veil/winner-index");
    hasher.update(seed.as_bytes());
    hasher.update(count.to_be_bytes());
    let score = BigUint::from_bytes_be(&hasher.finalize());
    let reduced = score % BigUint::from(count);
    Some(reduced.iter_u64_digits().next().unwrap_or(0))
}

/// Wall-clock entropy.
///
/// Anyone who can predict or influence the time of the draw controls the winner. Only for local
/// demos that mimic a block-timestamp draw.
pub struct BlockTimeEntropy {
    clock: fn() -> u64,
}

fn unix_seconds() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

impl BlockTimeEntropy {
    pub fn new() -> Self {
        Self {
            clock: unix_seconds,
        }
    }

    pub fn with_clock(clock: fn() -> u64) -> Self {
        Self { clock }
    }
}

impl Default for BlockTimeEntropy {
    fn default() -> Self {
        Self::new()
    }
}

impl EntropySource for BlockTimeEntropy {
    fn draw(&self, ctx: &DrawContext) -> Result<Seed, FheError> {
        let now = (self.clock)();
        warn!(
            round = ctx.round,
            "drawing winner from wall-clock time; this selection is predictable"
        );
        Ok(Seed::from(now))
    }

    fn name(&self) -> &'static str {
        "block_time"
    }
}

/// ChaCha20 backed entropy. Deterministic when the RNG is seeded deterministically.
pub struct SeededEntropy {
    rng: SharedRng,
}

impl SeededEntropy {
    pub fn new(rng: SharedRng) -> Self {
        Self { rng }
    }
}

impl EntropySource for SeededEntropy {
    fn draw(&self, _ctx: &DrawContext) -> Result<Seed, FheError> {
        let mut bytes = [0u8; 32];
        self.rng
            .lock()
            .map_err(|_| FheError::Entropy("rng lock poisoned".into()))?
            .fill_bytes(&mut bytes);
        Ok(Seed(bytes))
    }

    fn name(&self) -> &'static str {
        "seeded"
    }
}

/// Commit-reveal entropy.
///
/// The operator publishes `commitment()` before enrollment opens. At draw time the secret is
/// mixed with the round transcript, so the operator cannot pick the secret after seeing who
/// enrolled, and participants cannot predict the result without the secret. Once the round is
/// over the secret is revealed and anyone can check it with [`verify_reveal`] and recompute the
/// seed with [`CommitRevealEntropy::seed_for`].
pub struct CommitRevealEntropy {
    secret: Zeroizing<[u8; 32]>,
}

impl CommitRevealEntropy {
    pub fn new(secret: [u8; 32]) -> Self {
        Self {
            secret: Zeroizing::new(secret),
        }
    }

    pub fn from_hex(secret: &str) -> Result<Self, FheError> {
        let trimmed = secret.trim();
        let stripped = trimmed.strip_prefix("0x").unwrap_or(trimmed);
        let bytes = Zeroizing::new(
            hex::decode(stripped).map_err(|e| FheError::Entropy(format!("bad secret: {e}")))?,
        );
        let secret: [u8; 32] = bytes
            .as_slice()
            .try_into()
            .map_err(|_| FheError::Entropy("secret must be exactly 32 bytes".into()))?;
        Ok(Self::new(secret))
    }

    pub fn commitment(&self) -> B256 {
        commitment_for(&self.secret)
    }

    /// Hand out the secret once the round is settled.
    pub fn reveal(&self) -> B256 {
        B256::from(*self.secret)
    }

    /// Seed for a given secret and round; used both for drawing and for public verification.
    pub fn seed_for(secret: &[u8; 32], ctx: &DrawContext) -> Seed {
        let mut hasher = Sha256::new();
        hasher.update(b"veil/commit-reveal");
        hasher.update(secret);
        hasher.update(ctx.registry.as_slice());
        hasher.update(ctx.round.to_be_bytes());
        hasher.update(ctx.participant_count.to_be_bytes());
        hasher.update(ctx.transcript.as_slice());
        Seed(hasher.finalize().into())
    }
}

fn commitment_for(secret: &[u8; 32]) -> B256 {
    let mut hasher = Sha256::new();
    hasher.update(b"veil/commitment");
    hasher.update(secret);
    B256::from(<[u8; 32]>::from(hasher.finalize()))
}

/// Check a revealed secret against the commitment published before the round.
pub fn verify_reveal(commitment: B256, secret: B256) -> bool {
    commitment_for(&secret.0) == commitment
}

impl EntropySource for CommitRevealEntropy {
    fn draw(&self, ctx: &DrawContext) -> Result<Seed, FheError> {
        Ok(Self::seed_for(&self.secret, ctx))
    }

    fn name(&self) -> &'static str {
        "commit_reveal"
    }
}
