// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use actix::Message;
use alloy_primitives::Address;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};

#[derive(Message, Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[rtype(result = "()")]
pub struct OwnershipTransferred {
    pub registry: Address,
    pub previous_owner: Address,
    pub new_owner: Address,
    /// Registry event sequence. Keeps a transfer back to an earlier owner distinct from the
    /// first one.
    pub seq: u64,
}

impl Display for OwnershipTransferred {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.previous_owner, self.new_owner)
    }
}
