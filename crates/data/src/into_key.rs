// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

/// Anything that can address a value in a store.
pub trait IntoKey {
    fn into_key(self) -> Vec<u8>;
}

impl IntoKey for Vec<u8> {
    fn into_key(self) -> Vec<u8> {
        self
    }
}

impl IntoKey for &[u8] {
    fn into_key(self) -> Vec<u8> {
        self.to_vec()
    }
}

/// Path-like keys, joined with `/`
impl<'a> IntoKey for Vec<&'a str> {
    fn into_key(self) -> Vec<u8> {
        self.join("/").into_bytes()
    }
}

impl IntoKey for String {
    fn into_key(self) -> Vec<u8> {
        self.into_bytes()
    }
}

impl<'a> IntoKey for &'a str {
    fn into_key(self) -> Vec<u8> {
        self.as_bytes().to_vec()
    }
}
