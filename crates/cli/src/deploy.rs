// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::deployment::Deployment;
use crate::helpers::caller_or_owner;
use alloy_primitives::Address;
use anyhow::Result;
use veil_config::AppConfig;

pub async fn execute(config: &AppConfig, owner: Option<Address>, force: bool) -> Result<()> {
    let owner = caller_or_owner(owner, config)?;
    let deployment = Deployment::create(config, owner, force)?;

    println!("Registry deployed at {}", deployment.record.registry);
    println!("Owner: {}", owner);
    println!("Entropy: {}", deployment.record.entropy);
    if let Some(commitment) = deployment.record.commitment {
        println!("Commitment: {}", commitment);
    }
    Ok(())
}
