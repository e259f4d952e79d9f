// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::deployment::Deployment;
use anyhow::Result;
use veil_config::AppConfig;
use veil_registry::GetRoundStatus;

pub async fn execute(config: &AppConfig) -> Result<()> {
    let deployment = Deployment::load(config)?;
    let status = deployment.registry.send(GetRoundStatus).await?;

    println!("Registry: {}", deployment.record.registry);
    println!("Owner: {}", status.owner);
    println!("Entropy: {}", deployment.record.entropy);
    println!("Round: {}", status.round);
    println!("Phase: {}", status.phase);
    println!("Participants: {}", status.participant_count);
    println!("Selection ready: {}", status.selection_ready);
    Ok(())
}
