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

#[derive(Message, Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[rtype(result = "()")]
pub struct ParticipantEnrolled {
    pub registry: Address,
    pub round: u64,
    pub participant_id: u64,
    pub handle: CiphertextHandle,
}

impl Display for ParticipantEnrolled {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "round: {}, participant_id: {}, handle: {}",
            self.round, self.participant_id, self.handle
        )
    }
}
