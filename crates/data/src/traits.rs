// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use anyhow::Result;
use serde::{de::DeserializeOwned, Serialize};

use crate::{Get, Insert, Remove};

pub trait KeyValStore: Send {
    fn insert(&mut self, msg: Insert) -> Result<()>;
    fn remove(&mut self, msg: Remove) -> Result<()>;
    fn get(&self, msg: Get) -> Result<Option<Vec<u8>>>;
}

/// Something that can be captured as plain serializable state.
pub trait Snapshot {
    type Snapshot: Serialize + DeserializeOwned;

    fn snapshot(&self) -> Result<Self::Snapshot>;
}

/// Rebuild a value from its snapshot plus the live dependencies that are not part of the
/// snapshot.
pub trait FromSnapshotWithParams: Snapshot + Sized {
    type Params;

    fn from_snapshot(params: Self::Params, snapshot: Self::Snapshot) -> Result<Self>;
}
