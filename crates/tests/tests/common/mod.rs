// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

#![allow(dead_code)]

use actix::{Actor, Addr};
use alloy_primitives::Address;
use anyhow::Result;
use std::sync::Arc;
use tracing::subscriber::DefaultGuard;
use tracing_subscriber::{fmt, EnvFilter};
use veil_data::Repository;
use veil_events::{EventBus, EventBusConfig, HistoryCollector, SelectorEvent};
use veil_fhe::{EntropySource, FheCollaborators, LocalFheRuntime, SeededEntropy};
use veil_logger::SimpleLogger;
use veil_registry::{
    Enroll, ParticipantId, RegistryDeps, RegistryError, RegistrySnapshot, SelectionRegistry,
};
use veil_utils::{create_shared_rng_from_u64, rand_eth_addr, SharedRng};

pub fn trace() -> DefaultGuard {
    let subscriber = fmt()
        .with_env_filter(EnvFilter::new("info"))
        .with_test_writer()
        .finish();
    tracing::subscriber::set_default(subscriber)
}

/// A registry wired to an in-process runtime, with collectors on its bus.
pub struct Harness {
    pub rng: SharedRng,
    pub runtime: Arc<LocalFheRuntime>,
    pub bus: Addr<EventBus<SelectorEvent>>,
    pub history: Addr<HistoryCollector<SelectorEvent>>,
    pub errors: Addr<HistoryCollector<SelectorEvent>>,
    pub registry: Addr<SelectionRegistry>,
    pub address: Address,
    pub owner: Address,
    pub stranger: Address,
}

pub struct HarnessBuilder {
    seed: u64,
    entropy: Option<Arc<dyn EntropySource>>,
    store: Option<Repository<RegistrySnapshot>>,
}

impl HarnessBuilder {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            entropy: None,
            store: None,
        }
    }

    pub fn with_entropy(mut self, entropy: Arc<dyn EntropySource>) -> Self {
        self.entropy = Some(entropy);
        self
    }

    pub fn with_store(mut self, store: Repository<RegistrySnapshot>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn build(self) -> Result<Harness> {
        let rng = create_shared_rng_from_u64(self.seed);
        let runtime = Arc::new(LocalFheRuntime::new(rng.clone())?);
        let bus = EventBus::<SelectorEvent>::new(EventBusConfig { deduplicate: false }).start();
        let history = EventBus::history(&bus);
        let errors = EventBus::error(&bus);
        SimpleLogger::<SelectorEvent>::attach("test", bus.clone());

        let address = rand_eth_addr(&rng)?;
        let owner = rand_eth_addr(&rng)?;
        let stranger = rand_eth_addr(&rng)?;
        let entropy = match self.entropy {
            Some(entropy) => entropy,
            None => Arc::new(SeededEntropy::new(create_shared_rng_from_u64(
                self.seed.wrapping_add(1),
            ))),
        };

        let registry = SelectionRegistry::deploy(
            address,
            owner,
            RegistryDeps {
                fhe: FheCollaborators::from_runtime(runtime.clone()),
                entropy,
                bus: bus.clone(),
                store: self.store,
            },
        )?
        .attach();

        Ok(Harness {
            rng,
            runtime,
            bus,
            history,
            errors,
            registry,
            address,
            owner,
            stranger,
        })
    }
}

impl Harness {
    /// Encrypt `value` as `caller` and submit it.
    pub async fn enroll(
        &self,
        caller: Address,
        value: u64,
    ) -> Result<Result<ParticipantId, RegistryError>> {
        let (ciphertext, proof) = self.runtime.encrypt_input(value, self.address, caller)?;
        Ok(self
            .registry
            .send(Enroll {
                caller,
                ciphertext,
                proof,
            })
            .await?)
    }

    pub async fn enroll_many(&self, values: &[u64]) -> Result<Vec<ParticipantId>> {
        let mut ids = Vec::with_capacity(values.len());
        for value in values {
            ids.push(self.enroll(self.owner, *value).await??);
        }
        Ok(ids)
    }
}
