// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use tracing::error;

/// Log an unrecoverable failure loudly and return the message used to abort the process.
pub fn major_issue(msg: &str, e: impl Into<anyhow::Error>) -> String {
    error!(
        "\n\n\nMAJOR ISSUE: {msg}.\n\nThe error supplied was: {:?}\n\nThe selector cannot continue safely and will exit.\n\n\n",
        e.into()
    );
    format!("Selector halted: {msg}")
}
