// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use serde::{Deserialize, Serialize};

/// Which entropy source draws the winner.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
#[serde(tag = "type")]
pub enum EntropyConfig {
    /// Wall-clock time. Predictable, for demos only.
    BlockTime,
    /// ChaCha20 seeded with `seed`, or from the OS when no seed is given.
    Seeded { seed: Option<u64> },
    /// Commit-reveal with a 32 byte hex secret held by the operator.
    CommitReveal { secret: String },
}

impl Default for EntropyConfig {
    fn default() -> Self {
        EntropyConfig::Seeded { seed: None }
    }
}

impl EntropyConfig {
    pub fn name(&self) -> &'static str {
        match self {
            EntropyConfig::BlockTime => "block_time",
            EntropyConfig::Seeded { .. } => "seeded",
            EntropyConfig::CommitReveal { .. } => "commit_reveal",
        }
    }
}
