// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

pub struct StoreKeys;

impl StoreKeys {
    pub fn registry() -> String {
        String::from("//registry")
    }

    pub fn fhe_runtime() -> String {
        String::from("//fhe_runtime")
    }

    pub fn deployment() -> String {
        String::from("//deployment")
    }
}
