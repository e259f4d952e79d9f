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

pub async fn execute(config: &AppConfig, value: u64, caller: Option<Address>) -> Result<()> {
    let caller = caller_or_owner(caller, config)?;
    let deployment = Deployment::load(config)?;
    let (ciphertext, proof) =
        deployment
            .runtime
            .encrypt_input(value, deployment.record.registry, caller)?;

    println!("ciphertext: {}", ciphertext.0.to_hex());
    println!("proof: {}", proof.0.to_hex());
    Ok(())
}
