// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use actix::{Actor, Addr};
use alloy_primitives::{Address, B256};
use anyhow::{anyhow, bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};
use veil_config::{AppConfig, EntropyConfig, StoreKeys};
use veil_data::{DataStore, FromSnapshotWithParams, Repositories, Repository, Snapshot};
use veil_events::{EventBus, EventBusConfig, SelectorEvent};
use veil_fhe::{
    BlockTimeEntropy, CommitRevealEntropy, EntropySource, FheCollaborators, LocalFheRuntime,
    SeededEntropy,
};
use veil_logger::SimpleLogger;
use veil_registry::{
    FheRuntimeRepositoryFactory, RegistryDeps, RegistryRepositoryFactory, SelectionRegistry,
};
use veil_utils::{create_shared_rng, create_shared_rng_from_u64, major_issue, rand_eth_addr, SharedRng};

/// What `veil deploy` wrote, read back by every later command.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentRecord {
    pub registry: Address,
    pub entropy: String,
    /// Set when the winner is drawn with commit-reveal entropy.
    pub commitment: Option<B256>,
}

pub trait DeploymentRepositoryFactory {
    fn deployment(&self) -> Repository<DeploymentRecord>;
}

impl DeploymentRepositoryFactory for Repositories {
    fn deployment(&self) -> Repository<DeploymentRecord> {
        Repository::new(self.store.scope(StoreKeys::deployment()))
    }
}

/// A registry running inside this process, backed by the deployment database.
pub struct Deployment {
    pub record: DeploymentRecord,
    pub runtime: Arc<LocalFheRuntime>,
    pub registry: Addr<SelectionRegistry>,
    repositories: Repositories,
}

impl Deployment {
    /// Deploy a fresh registry. Refuses to replace an existing one unless `force` is set.
    pub fn create(config: &AppConfig, owner: Address, force: bool) -> Result<Self> {
        let repositories = open_repositories(config)?;
        if repositories.deployment().has()? && !force {
            bail!(
                "A registry is already deployed as '{}'. Pass --force to replace it.",
                config.name()
            );
        }

        let rng = create_shared_rng();
        let runtime = Arc::new(LocalFheRuntime::new(rng.clone())?);
        let address = rand_eth_addr(&rng)?;
        let deps = RegistryDeps {
            fhe: FheCollaborators::from_runtime(runtime.clone()),
            entropy: entropy_source(config.entropy(), rng)?,
            bus: start_bus(&config.name()),
            store: Some(repositories.registry()),
        };
        let registry = SelectionRegistry::deploy(address, owner, deps)?;

        let record = DeploymentRecord {
            registry: address,
            entropy: config.entropy().name().to_owned(),
            commitment: commitment_for(config.entropy())?,
        };
        repositories.deployment().write(&record)?;

        let deployment = Self {
            record,
            runtime,
            registry: registry.attach(),
            repositories,
        };
        deployment.save_runtime()?;
        Ok(deployment)
    }

    /// Bring back the registry deployed under the configured name.
    pub fn load(config: &AppConfig) -> Result<Self> {
        let repositories = open_repositories(config)?;
        let record = repositories.deployment().read()?.with_context(|| {
            format!(
                "No registry deployed as '{}'. Run `veil deploy` first.",
                config.name()
            )
        })?;
        check_entropy(&record, config.entropy())?;

        let rng = create_shared_rng();
        let runtime_snapshot = repositories
            .fhe_runtime()
            .read()?
            .context("FHE runtime state is missing from the database")?;
        let runtime = Arc::new(LocalFheRuntime::from_snapshot(
            rng.clone(),
            runtime_snapshot,
        )?);

        let registry_snapshot = repositories
            .registry()
            .read()?
            .context("Registry state is missing from the database")?;
        let deps = RegistryDeps {
            fhe: FheCollaborators::from_runtime(runtime.clone()),
            entropy: entropy_source(config.entropy(), rng)?,
            bus: start_bus(&config.name()),
            store: Some(repositories.registry()),
        };
        let registry = SelectionRegistry::from_snapshot(deps, registry_snapshot)?;

        Ok(Self {
            record,
            runtime,
            registry: registry.attach(),
            repositories,
        })
    }

    /// Write the runtime handles out after an operation that may have created some.
    pub fn save_runtime(&self) -> Result<()> {
        let snapshot = self.runtime.snapshot()?;
        self.repositories
            .fhe_runtime()
            .write(&snapshot)
            .map_err(|e| {
                anyhow!(major_issue(
                    "Registry state was saved but the FHE runtime state was not",
                    e
                ))
            })
    }
}

fn open_repositories(config: &AppConfig) -> Result<Repositories> {
    let db_file = config.db_file();
    let store = DataStore::sled(&db_file, "veil")
        .with_context(|| format!("Could not open database at {:?}", db_file))?;
    Ok(Repositories::new(store))
}

fn start_bus(name: &str) -> Addr<EventBus<SelectorEvent>> {
    let bus = EventBus::<SelectorEvent>::new(EventBusConfig { deduplicate: true }).start();
    SimpleLogger::<SelectorEvent>::attach(name, bus.clone());
    bus
}

/// Build the entropy source named by the configuration.
pub fn entropy_source(config: &EntropyConfig, rng: SharedRng) -> Result<Arc<dyn EntropySource>> {
    Ok(match config {
        EntropyConfig::BlockTime => Arc::new(BlockTimeEntropy::new()),
        EntropyConfig::Seeded { seed: Some(seed) } => {
            Arc::new(SeededEntropy::new(create_shared_rng_from_u64(*seed)))
        }
        EntropyConfig::Seeded { seed: None } => Arc::new(SeededEntropy::new(rng)),
        EntropyConfig::CommitReveal { secret } => Arc::new(CommitRevealEntropy::from_hex(secret)?),
    })
}

fn commitment_for(config: &EntropyConfig) -> Result<Option<B256>> {
    match config {
        EntropyConfig::CommitReveal { secret } => {
            Ok(Some(CommitRevealEntropy::from_hex(secret)?.commitment()))
        }
        _ => Ok(None),
    }
}

fn check_entropy(record: &DeploymentRecord, config: &EntropyConfig) -> Result<()> {
    if record.entropy != config.name() {
        warn!(
            deployed = %record.entropy,
            configured = config.name(),
            "Entropy source differs from the one used at deploy time"
        );
    }
    if let Some(commitment) = record.commitment {
        match commitment_for(config)? {
            Some(configured) if configured == commitment => {
                info!(commitment = %commitment, "Commit-reveal secret matches the deployment")
            }
            Some(_) => bail!(
                "The configured secret does not match the commitment {} recorded at deploy time",
                commitment
            ),
            None => warn!(commitment = %commitment, "Deployed with commit-reveal but no secret is configured"),
        }
    }
    Ok(())
}
