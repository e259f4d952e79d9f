// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::deployment::Deployment;
use anyhow::Result;
use veil_config::AppConfig;
use veil_registry::GetWinner;

pub async fn execute(config: &AppConfig) -> Result<()> {
    let deployment = Deployment::load(config)?;
    let winner = deployment.registry.send(GetWinner).await??;

    println!("Winner: participant {}", winner.id);
    println!("Record handle: {}", winner.handle.id().0);
    Ok(())
}
