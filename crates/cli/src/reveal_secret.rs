// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::deployment::Deployment;
use anyhow::{bail, Context, Result};
use veil_config::{AppConfig, EntropyConfig};
use veil_fhe::{verify_reveal, CommitRevealEntropy};

pub async fn execute(config: &AppConfig) -> Result<()> {
    let EntropyConfig::CommitReveal { secret } = config.entropy() else {
        bail!("This deployment is not configured for commit-reveal entropy");
    };
    let deployment = Deployment::load(config)?;
    let commitment = deployment
        .record
        .commitment
        .context("No commitment was recorded when this registry was deployed")?;

    let secret = CommitRevealEntropy::from_hex(secret)?.reveal();
    if !verify_reveal(commitment, secret) {
        bail!("Secret does not open commitment {}", commitment);
    }

    println!("Commitment: {}", commitment);
    println!("Secret: {}", secret);
    Ok(())
}
