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
use veil_registry::TransferOwnership;

pub async fn execute(config: &AppConfig, to: Address, caller: Option<Address>) -> Result<()> {
    let caller = caller_or_owner(caller, config)?;
    let deployment = Deployment::load(config)?;

    deployment
        .registry
        .send(TransferOwnership {
            caller,
            new_owner: to,
        })
        .await??;
    deployment.save_runtime()?;

    println!("Ownership transferred to {}", to);
    Ok(())
}
