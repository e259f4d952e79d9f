// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::CiphertextHandle;
use actix::Message;
use alloy_primitives::Address;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};

/// The winner has been drawn. The index is still encrypted.
#[derive(Message, Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[rtype(result = "()")]
pub struct SelectionGenerated {
    pub registry: Address,
    pub round: u64,
    pub winner_index: CiphertextHandle,
}

impl Display for SelectionGenerated {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "round: {}, winner_index: {}", self.round, self.winner_index)
    }
}
