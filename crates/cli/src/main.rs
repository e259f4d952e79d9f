// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use clap::Parser;
use cli::Cli;

mod cli;
mod deploy;
mod deployment;
mod encrypt;
mod enroll;
pub mod helpers;
mod reset;
mod reveal_index;
mod reveal_secret;
mod select;
mod status;
mod transfer_owner;
mod winner;

#[actix::main]
pub async fn main() {
    if let Err(err) = Cli::parse().execute().await {
        eprintln!("{:#}", err);
        std::process::exit(1);
    }
}
