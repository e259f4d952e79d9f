// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use alloy_primitives::B256;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a ciphertext held by the FHE runtime.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct HandleId(pub B256);

/// Token issued by the runtime alongside a handle. The runtime refuses to operate on a handle
/// whose token it did not issue.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CapabilityToken(pub B256);

/// Opaque reference to an encrypted value.
///
/// Nothing about the plaintext can be learned from a handle; the only way to a value is through
/// the runtime's decryption under an access grant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CiphertextHandle {
    id: HandleId,
    token: CapabilityToken,
}

impl CiphertextHandle {
    pub fn new(id: HandleId, token: CapabilityToken) -> Self {
        Self { id, token }
    }

    pub fn id(&self) -> HandleId {
        self.id
    }

    pub fn token(&self) -> CapabilityToken {
        self.token
    }
}

impl fmt::Display for HandleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let encoded = hex::encode(self.0.as_slice());
        write!(f, "ct:0x{}", &encoded[..12])
    }
}

impl fmt::Display for CiphertextHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}
