// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::Round;
use alloy_primitives::Address;
use serde::{Deserialize, Serialize};
use veil_config::StoreKeys;
use veil_data::{Repositories, Repository};
use veil_fhe::RuntimeSnapshot;

/// Everything needed to bring a registry back after a restart.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrySnapshot {
    pub address: Address,
    pub owner: Address,
    pub round: Round,
    /// Last event sequence number handed out by the registry.
    pub seq: u64,
}

pub trait RegistryRepositoryFactory {
    fn registry(&self) -> Repository<RegistrySnapshot>;
}

impl RegistryRepositoryFactory for Repositories {
    fn registry(&self) -> Repository<RegistrySnapshot> {
        Repository::new(self.store.scope(StoreKeys::registry()))
    }
}

pub trait FheRuntimeRepositoryFactory {
    fn fhe_runtime(&self) -> Repository<RuntimeSnapshot>;
}

impl FheRuntimeRepositoryFactory for Repositories {
    fn fhe_runtime(&self) -> Repository<RuntimeSnapshot> {
        Repository::new(self.store.scope(StoreKeys::fhe_runtime()))
    }
}
