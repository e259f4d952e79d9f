// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use actix::Message;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};

/// A rejected or failed registry operation, broadcast so that loggers can surface it.
#[derive(Message, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[rtype(result = "()")]
pub struct SelectorError {
    pub err_type: SelectorErrorType,
    pub message: String,
    /// Sequence of the reporting source, `0` when it does not keep one. Repeated identical
    /// failures need distinct numbers to survive bus deduplication.
    pub seq: u64,
}

impl Display for SelectorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}: {}", self.err_type, self.message)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SelectorErrorType {
    Enrollment,
    Selection,
    Reveal,
    Reset,
    Ownership,
}

impl SelectorError {
    pub fn new(err_type: SelectorErrorType, message: impl Display) -> Self {
        Self {
            err_type,
            message: message.to_string(),
            seq: 0,
        }
    }

    pub fn with_seq(mut self, seq: u64) -> Self {
        self.seq = seq;
        self
    }
}
