// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

mod entropy;
mod error;
mod local_runtime;
mod traits;
mod types;

pub use entropy::*;
pub use error::*;
pub use local_runtime::*;
pub use traits::*;
pub use types::*;
