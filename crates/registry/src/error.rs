// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::ParticipantId;
use alloy_primitives::Address;
use thiserror::Error;
use veil_fhe::FheError;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("caller {caller} is not the registry owner")]
    Unauthorized { caller: Address },
    #[error("no participants enrolled in this round")]
    NoCandidates,
    #[error("selection has not been generated for this round")]
    DecryptionNotReady,
    #[error("selection already generated; reset the round first")]
    SelectionLocked,
    #[error("unknown participant {0}")]
    UnknownParticipant(ParticipantId),
    #[error(transparent)]
    Fhe(#[from] FheError),
    #[error("could not persist registry state: {0}")]
    Storage(String),
}
