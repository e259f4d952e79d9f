// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use core::fmt;

/// Hex chars kept on either side of the ellipsis when a value is too long to print.
const HEX_EDGE: usize = 25;
/// Values up to this many hex chars are printed in full.
const HEX_FULL_LIMIT: usize = 100;

/// Write bytes as `0x..` hex, shortening long blobs such as ciphertexts so logs stay readable.
pub fn hexf(data: &[u8], f: &mut fmt::Formatter) -> fmt::Result {
    f.write_str(&short_hex(data))
}

/// Hex encode bytes, eliding the middle of anything longer than [`HEX_FULL_LIMIT`] chars.
pub fn short_hex(data: &[u8]) -> String {
    let encoded = hex::encode(data);
    if encoded.len() <= HEX_FULL_LIMIT {
        return format!("0x{encoded}");
    }

    let head = &encoded[..HEX_EDGE];
    let tail = &encoded[encoded.len() - HEX_EDGE..];
    format!("<bytes({}):0x{}..{}>", data.len(), head, tail)
}

#[cfg(test)]
mod tests {
    use super::short_hex;

    #[test]
    fn short_values_are_printed_in_full() {
        assert_eq!(short_hex(&[0xde, 0xad, 0xbe, 0xef]), "0xdeadbeef");
        assert_eq!(short_hex(&[]), "0x");
    }

    #[test]
    fn long_values_are_elided() {
        let data = vec![0xabu8; 64];
        let out = short_hex(&data);
        assert!(out.starts_with("<bytes(64):0xababab"));
        assert!(out.ends_with("abab>"));
        assert!(out.len() < 128);
    }
}
