// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

mod alloy;
pub mod error;
pub mod formatters;
mod rng;
pub mod utility_types;

pub use alloy::*;
pub use error::*;
pub use formatters::*;
pub use rng::*;
pub use utility_types::*;
