// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use alloy_primitives::Address;
use anyhow::{bail, Result};
use veil_config::AppConfig;
use veil_utils::ArcBytes;

pub mod telemetry;

/// Ensure hex is of the form 0x12435687abcdef...
pub fn ensure_hex_bytes(s: &str) -> Result<ArcBytes> {
    if !s.starts_with("0x") {
        bail!("hex value must start with '0x'")
    }
    if !s[2..].chars().all(|c| c.is_ascii_hexdigit()) {
        bail!("hex value must only contain hex characters [0-9a-fA-F]");
    }
    ArcBytes::from_hex(s)
}

/// Use the explicit caller, otherwise the configured owner.
pub fn caller_or_owner(caller: Option<Address>, config: &AppConfig) -> Result<Address> {
    match caller.or(config.owner()) {
        Some(caller) => Ok(caller),
        None => bail!("No caller given and no `owner` set in the configuration. Pass --caller."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_values_need_a_prefix() -> Result<()> {
        assert_eq!(&*ensure_hex_bytes("0x00ff")?, &[0u8, 255]);
        assert!(ensure_hex_bytes("00ff").is_err());
        assert!(ensure_hex_bytes("0xgg").is_err());
        assert!(ensure_hex_bytes("0x0").is_err());
        Ok(())
    }
}
