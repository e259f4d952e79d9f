// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::deployment::Deployment;
use crate::helpers::{caller_or_owner, ensure_hex_bytes};
use alloy_primitives::Address;
use anyhow::{bail, Result};
use veil_config::AppConfig;
use veil_fhe::{ExternalCiphertext, InputProof};
use veil_registry::Enroll;

pub async fn execute(
    config: &AppConfig,
    ciphertext: Option<String>,
    proof: Option<String>,
    value: Option<u64>,
    caller: Option<Address>,
) -> Result<()> {
    let caller = caller_or_owner(caller, config)?;
    let deployment = Deployment::load(config)?;

    let (ciphertext, proof) = match (ciphertext, proof, value) {
        (Some(ciphertext), Some(proof), _) => (
            ExternalCiphertext(ensure_hex_bytes(&ciphertext)?),
            InputProof(ensure_hex_bytes(&proof)?),
        ),
        (_, _, Some(value)) => {
            deployment
                .runtime
                .encrypt_input(value, deployment.record.registry, caller)?
        }
        _ => bail!("Pass either --ciphertext and --proof, or --value"),
    };

    let id = deployment
        .registry
        .send(Enroll {
            caller,
            ciphertext,
            proof,
        })
        .await??;
    deployment.save_runtime()?;

    println!("Enrolled participant {}", id);
    Ok(())
}
