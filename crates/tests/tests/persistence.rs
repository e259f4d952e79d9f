// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

mod common;

use actix::{Actor, Addr};
use anyhow::{Context, Result};
use common::{trace, HarnessBuilder};
use std::sync::Arc;
use tempfile::tempdir;
use veil_data::{DataStore, FromSnapshotWithParams, Repositories, Snapshot};
use veil_events::{EventBus, EventBusConfig, SelectorEvent};
use veil_fhe::{FheCollaborators, LocalFheRuntime, SeededEntropy};
use veil_registry::{
    FheRuntimeRepositoryFactory, GenerateSelection, GetRoundStatus, GetWinner, RegistryDeps,
    RegistryRepositoryFactory, SelectionRegistry,
};
use veil_utils::create_shared_rng_from_u64;

/// Stop a registry half way through a round, bring it back from disk and finish the round.
#[actix::test]
async fn test_round_survives_restart() -> Result<()> {
    let _guard = trace();
    let dir = tempdir()?;
    let repositories = Repositories::new(DataStore::sled(&dir.path().join("db"), "veil")?);

    ///////////////////////////////////////////////////////////////////////////////////
    // 1. Enroll with a registry that writes through to sled
    ///////////////////////////////////////////////////////////////////////////////////
    let h = HarnessBuilder::new(21)
        .with_store(repositories.registry())
        .build()?;
    let ids = h.enroll_many(&[100, 200, 300]).await?;
    repositories.fhe_runtime().write(&h.runtime.snapshot()?)?;
    let before = h.registry.send(GetRoundStatus).await?;

    ///////////////////////////////////////////////////////////////////////////////////
    // 2. Restore runtime and registry into fresh instances
    ///////////////////////////////////////////////////////////////////////////////////
    let runtime = Arc::new(LocalFheRuntime::from_snapshot(
        create_shared_rng_from_u64(99),
        repositories
            .fhe_runtime()
            .read()?
            .context("runtime snapshot")?,
    )?);
    let bus: Addr<EventBus<SelectorEvent>> =
        EventBus::new(EventBusConfig { deduplicate: true }).start();
    let restored = SelectionRegistry::from_snapshot(
        RegistryDeps {
            fhe: FheCollaborators::from_runtime(runtime.clone()),
            entropy: Arc::new(SeededEntropy::new(create_shared_rng_from_u64(5))),
            bus,
            store: Some(repositories.registry()),
        },
        repositories.registry().read()?.context("registry snapshot")?,
    )?
    .attach();

    assert_eq!(restored.send(GetRoundStatus).await?, before);

    ///////////////////////////////////////////////////////////////////////////////////
    // 3. Finish the round on the restored registry
    ///////////////////////////////////////////////////////////////////////////////////
    restored
        .send(GenerateSelection { caller: h.owner })
        .await??;
    let winner = restored.send(GetWinner).await??;
    assert!(ids.contains(&winner.id));

    let saved = repositories.registry().read()?.context("registry snapshot")?;
    assert!(saved.round.is_selection_ready());
    Ok(())
}
