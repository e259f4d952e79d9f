// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::SharedRng;
use alloy_primitives::Address;
use anyhow::{anyhow, Result};
use rand::Rng;

/// Random address, used to mint principals in tests and for throwaway deployments.
pub fn rand_eth_addr(rng: &SharedRng) -> Result<Address> {
    let bytes = rng
        .lock()
        .map_err(|_| anyhow!("rng lock poisoned"))?
        .gen::<[u8; 20]>();
    Ok(Address::from(bytes))
}

/// Parse a `0x` prefixed (or bare) hex address.
pub fn parse_address(value: &str) -> Result<Address> {
    value
        .trim()
        .parse::<Address>()
        .map_err(|e| anyhow!("'{}' is not a valid address: {}", value, e))
}
