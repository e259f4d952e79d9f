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
use veil_fhe::Decryptor;
use veil_registry::GetEncryptedWinnerIndex;

pub async fn execute(config: &AppConfig, caller: Option<Address>) -> Result<()> {
    let caller = caller_or_owner(caller, config)?;
    let deployment = Deployment::load(config)?;

    let handle = deployment.registry.send(GetEncryptedWinnerIndex).await??;
    let index = deployment.runtime.decrypt(&handle, caller)?;

    println!("Winner index: {}", index);
    Ok(())
}
