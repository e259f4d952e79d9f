// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

mod ownership_transferred;
mod participant_enrolled;
mod round_reset;
mod selection_generated;
mod selector_error;
mod shutdown;

pub use ownership_transferred::*;
pub use participant_enrolled::*;
pub use round_reset::*;
pub use selection_generated::*;
pub use selector_error::*;
pub use shutdown::*;

use crate::{ErrorEvent, Event, EventId};
use actix::Message;
use alloy_primitives::Address;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};

/// Macro to help define From traits for SelectorEvent
macro_rules! impl_from_event {
    ($($variant:ident),*) => {
        $(
            impl From<$variant> for SelectorEvent {
                fn from(data: $variant) -> Self {
                    SelectorEvent::$variant {
                        id: EventId::hash(&data),
                        data,
                    }
                }
            }
        )*
    };
}

/// Envelope for everything published on the selector bus.
#[derive(Message, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[rtype(result = "()")]
pub enum SelectorEvent {
    ParticipantEnrolled {
        id: EventId,
        data: ParticipantEnrolled,
    },
    SelectionGenerated {
        id: EventId,
        data: SelectionGenerated,
    },
    RoundReset {
        id: EventId,
        data: RoundReset,
    },
    OwnershipTransferred {
        id: EventId,
        data: OwnershipTransferred,
    },
    SelectorError {
        id: EventId,
        data: SelectorError,
    },
    Shutdown {
        id: EventId,
        data: Shutdown,
    },
}

impl_from_event!(
    ParticipantEnrolled,
    SelectionGenerated,
    RoundReset,
    OwnershipTransferred,
    SelectorError,
    Shutdown
);

impl SelectorEvent {
    pub fn to_bytes(&self) -> Result<Vec<u8>, bincode::Error> {
        bincode::serialize(self)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, bincode::Error> {
        bincode::deserialize(bytes)
    }

    pub fn get_id(&self) -> EventId {
        match self {
            SelectorEvent::ParticipantEnrolled { id, .. }
            | SelectorEvent::SelectionGenerated { id, .. }
            | SelectorEvent::RoundReset { id, .. }
            | SelectorEvent::OwnershipTransferred { id, .. }
            | SelectorEvent::SelectorError { id, .. }
            | SelectorEvent::Shutdown { id, .. } => id.clone(),
        }
    }

    /// Registry that emitted the event, if it came from one.
    pub fn get_registry(&self) -> Option<Address> {
        match self {
            SelectorEvent::ParticipantEnrolled { data, .. } => Some(data.registry),
            SelectorEvent::SelectionGenerated { data, .. } => Some(data.registry),
            SelectorEvent::RoundReset { data, .. } => Some(data.registry),
            SelectorEvent::OwnershipTransferred { data, .. } => Some(data.registry),
            _ => None,
        }
    }

    pub fn get_data(&self) -> String {
        match self {
            SelectorEvent::ParticipantEnrolled { data, .. } => data.to_string(),
            SelectorEvent::SelectionGenerated { data, .. } => data.to_string(),
            SelectorEvent::RoundReset { data, .. } => data.to_string(),
            SelectorEvent::OwnershipTransferred { data, .. } => data.to_string(),
            SelectorEvent::SelectorError { data, .. } => data.to_string(),
            SelectorEvent::Shutdown { data, .. } => data.to_string(),
        }
    }
}

impl Event for SelectorEvent {
    type Id = EventId;

    fn event_type(&self) -> String {
        match self {
            SelectorEvent::ParticipantEnrolled { .. } => "ParticipantEnrolled",
            SelectorEvent::SelectionGenerated { .. } => "SelectionGenerated",
            SelectorEvent::RoundReset { .. } => "RoundReset",
            SelectorEvent::OwnershipTransferred { .. } => "OwnershipTransferred",
            SelectorEvent::SelectorError { .. } => "SelectorError",
            SelectorEvent::Shutdown { .. } => "Shutdown",
        }
        .to_string()
    }

    fn event_id(&self) -> Self::Id {
        self.get_id()
    }
}

impl ErrorEvent for SelectorEvent {
    type Error = SelectorError;
    type ErrorType = SelectorErrorType;

    fn as_error(&self) -> Option<&Self::Error> {
        match self {
            SelectorEvent::SelectorError { data, .. } => Some(data),
            _ => None,
        }
    }

    fn from_error(err_type: Self::ErrorType, error: impl Display) -> Self {
        SelectorEvent::from(SelectorError::new(err_type, error))
    }
}

impl Display for SelectorEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.event_type(), self.get_data())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CapabilityToken, CiphertextHandle, HandleId};
    use alloy_primitives::B256;

    fn handle(n: u8) -> CiphertextHandle {
        CiphertextHandle::new(
            HandleId(B256::repeat_byte(n)),
            CapabilityToken(B256::repeat_byte(n.wrapping_add(1))),
        )
    }

    #[test]
    fn event_type_names_the_variant() {
        let evt = SelectorEvent::from(RoundReset {
            registry: Address::ZERO,
            round: 3,
        });
        assert_eq!(evt.event_type(), "RoundReset");
        assert_eq!(evt.to_string(), "RoundReset(round: 3)");
    }

    #[test]
    fn ids_follow_payload() {
        let a = SelectorEvent::from(ParticipantEnrolled {
            registry: Address::ZERO,
            round: 0,
            participant_id: 0,
            handle: handle(1),
        });
        let b = SelectorEvent::from(ParticipantEnrolled {
            registry: Address::ZERO,
            round: 0,
            participant_id: 1,
            handle: handle(1),
        });
        let resets = (
            SelectorEvent::from(RoundReset {
                registry: Address::ZERO,
                round: 0,
            }),
            SelectorEvent::from(RoundReset {
                registry: Address::ZERO,
                round: 1,
            }),
        );
        assert_ne!(a.event_id(), b.event_id());
        assert_ne!(resets.0.event_id(), resets.1.event_id());
    }

    #[test]
    fn sequence_separates_repeated_payloads() {
        let transfer = |seq| {
            SelectorEvent::from(OwnershipTransferred {
                registry: Address::ZERO,
                previous_owner: Address::ZERO,
                new_owner: Address::repeat_byte(1),
                seq,
            })
        };
        assert_eq!(transfer(1).event_id(), transfer(1).event_id());
        assert_ne!(transfer(1).event_id(), transfer(3).event_id());

        let failure = |seq| {
            SelectorEvent::from(SelectorError::new(SelectorErrorType::Reset, "denied").with_seq(seq))
        };
        assert_ne!(failure(1).event_id(), failure(2).event_id());
    }

    #[test]
    fn errors_are_recognised() {
        let evt = SelectorEvent::from_error(SelectorErrorType::Selection, "no candidates");
        let err = evt.as_error().expect("error event");
        assert_eq!(err.err_type, SelectorErrorType::Selection);
        assert_eq!(err.message, "no candidates");
        assert!(SelectorEvent::from(Shutdown).as_error().is_none());
    }

    #[test]
    fn bytes_roundtrip() -> anyhow::Result<()> {
        let evt = SelectorEvent::from(SelectionGenerated {
            registry: Address::ZERO,
            round: 7,
            winner_index: handle(9),
        });
        assert_eq!(SelectorEvent::from_bytes(&evt.to_bytes()?)?, evt);
        Ok(())
    }
}
