// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

mod event_id;
mod eventbus;
mod handle;
mod seed;
mod selector_event;
mod traits;

pub use event_id::*;
pub use eventbus::*;
pub use handle::*;
pub use seed::*;
pub use selector_event::*;
pub use traits::*;
