// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// Content address of an event: sha256 over the bincode encoding of its payload.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventId(pub [u8; 32]);

impl EventId {
    pub fn hash<T: Serialize>(value: &T) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(type_tag::<T>().as_bytes());
        // Payloads are plain data structs, serialization cannot fail for them.
        if let Ok(bytes) = bincode::serialize(value) {
            hasher.update(bytes);
        }
        EventId(hasher.finalize().into())
    }
}

fn type_tag<T>() -> &'static str {
    std::any::type_name::<T>()
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let base58_string = bs58::encode(&self.0).into_string();
        write!(f, "evt:{}", &base58_string[0..8])
    }
}
