// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::helpers::telemetry::setup_tracing;
use crate::{
    deploy, encrypt, enroll, reset, reveal_index, reveal_secret, select, status, transfer_owner,
    winner,
};
use alloy_primitives::Address;
use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use tracing::{info, instrument, Level};
use veil_config::{load_config, AppConfig, DEFAULT_DEPLOYMENT_NAME};
use veil_data::close_all_connections;
use veil_utils::parse_address;

#[derive(Parser, Debug)]
#[command(name = "veil")]
#[command(about = "Confidential random selection over encrypted participant records", long_about = None)]
pub struct Cli {
    /// Path to config file
    #[arg(long, short, global = true)]
    config: Option<String>,

    /// Indicate error levels by adding additional `-v` arguments. Eg. `veil -vvv` will give you
    /// trace level output
    #[arg(
        short,
        long,
        action = ArgAction::Count,
        global = true
    )]
    pub verbose: u8,

    /// Silence all output. This argument cannot be used alongside `-v`
    #[arg(
        short,
        long,
        action = ArgAction::SetTrue,
        conflicts_with = "verbose",
        global = true
    )]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,

    /// The name of the deployment. Each name has its own database.
    #[arg(short, long, global = true)]
    name: Option<String>,

    /// Set the Open Telemetry collector grpc endpoint. Eg. 127.0.0.1:4317
    #[arg(long = "otel", global = true)]
    pub otel: Option<String>,
}

impl Cli {
    pub fn log_level(&self) -> Level {
        if self.quiet {
            Level::ERROR
        } else {
            match self.verbose {
                0 => Level::WARN,
                1 => Level::INFO,
                2 => Level::DEBUG,
                _ => Level::TRACE,
            }
        }
    }

    #[instrument(skip_all)]
    pub async fn execute(self) -> Result<()> {
        let config = self.load_config()?;
        setup_tracing(&config, self.log_level())?;
        info!(config_file = ?config.config_file(), db = ?config.db_file(), "Config loaded");

        match self.command {
            Commands::Deploy { owner, force } => deploy::execute(&config, owner, force).await?,
            Commands::Encrypt { value, caller } => encrypt::execute(&config, value, caller).await?,
            Commands::Enroll {
                ciphertext,
                proof,
                value,
                caller,
            } => enroll::execute(&config, ciphertext, proof, value, caller).await?,
            Commands::Select { caller } => select::execute(&config, caller).await?,
            Commands::Winner => winner::execute(&config).await?,
            Commands::RevealIndex { caller } => reveal_index::execute(&config, caller).await?,
            Commands::Reset { caller } => reset::execute(&config, caller).await?,
            Commands::Status => status::execute(&config).await?,
            Commands::TransferOwner { to, caller } => {
                transfer_owner::execute(&config, to, caller).await?
            }
            Commands::RevealSecret => reveal_secret::execute(&config).await?,
        }

        close_all_connections();
        Ok(())
    }

    fn load_config(&self) -> Result<AppConfig> {
        load_config(&self.get_name(), self.config.clone(), self.otel.clone())
    }

    pub fn get_name(&self) -> String {
        self.name
            .clone()
            .unwrap_or_else(|| DEFAULT_DEPLOYMENT_NAME.to_owned())
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Deploy a new registry for this deployment name
    Deploy {
        /// Owner of the registry. Defaults to `owner` from the config
        #[arg(long, value_parser = parse_address)]
        owner: Option<Address>,

        /// Replace a registry that is already deployed under this name
        #[arg(long)]
        force: bool,
    },

    /// Encrypt a participant record for submission to the registry
    Encrypt {
        #[arg(long)]
        value: u64,

        /// Account that will submit the ciphertext
        #[arg(long, value_parser = parse_address)]
        caller: Option<Address>,
    },

    /// Enroll a participant, from a ciphertext and proof or from a plaintext value
    Enroll {
        /// Hex encoded ciphertext from `veil encrypt`
        #[arg(long, requires = "proof", conflicts_with = "value")]
        ciphertext: Option<String>,

        /// Hex encoded input proof from `veil encrypt`
        #[arg(long, requires = "ciphertext")]
        proof: Option<String>,

        /// Encrypt this value and enroll it in one step
        #[arg(long, required_unless_present = "ciphertext")]
        value: Option<u64>,

        #[arg(long, value_parser = parse_address)]
        caller: Option<Address>,
    },

    /// Draw an encrypted winner index among the enrolled participants
    Select {
        #[arg(long, value_parser = parse_address)]
        caller: Option<Address>,
    },

    /// Decrypt the winner index and show the winning participant
    Winner,

    /// Decrypt the encrypted winner index as the caller
    RevealIndex {
        #[arg(long, value_parser = parse_address)]
        caller: Option<Address>,
    },

    /// Clear the current round
    Reset {
        #[arg(long, value_parser = parse_address)]
        caller: Option<Address>,
    },

    /// Show the state of the current round
    Status,

    /// Hand the registry over to another owner
    TransferOwner {
        #[arg(long, value_parser = parse_address)]
        to: Address,

        #[arg(long, value_parser = parse_address)]
        caller: Option<Address>,
    },

    /// Print the commit-reveal secret so anyone can check the draw against the commitment
    RevealSecret,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn log_levels() -> Result<()> {
        let cli = Cli::try_parse_from(["veil", "status"])?;
        assert_eq!(cli.log_level(), Level::WARN);
        let cli = Cli::try_parse_from(["veil", "-vv", "status"])?;
        assert_eq!(cli.log_level(), Level::DEBUG);
        let cli = Cli::try_parse_from(["veil", "-q", "status"])?;
        assert_eq!(cli.log_level(), Level::ERROR);
        assert!(Cli::try_parse_from(["veil", "-q", "-v", "status"]).is_err());
        Ok(())
    }

    #[test]
    fn enroll_takes_a_ciphertext_pair_or_a_value() {
        assert!(Cli::try_parse_from(["veil", "enroll", "--value", "4"]).is_ok());
        assert!(
            Cli::try_parse_from(["veil", "enroll", "--ciphertext", "0x00", "--proof", "0x01"])
                .is_ok()
        );
        assert!(Cli::try_parse_from(["veil", "enroll", "--ciphertext", "0x00"]).is_err());
        assert!(Cli::try_parse_from(["veil", "enroll"]).is_err());
    }

    #[test]
    fn names_default() -> Result<()> {
        let cli = Cli::try_parse_from(["veil", "status"])?;
        assert_eq!(cli.get_name(), DEFAULT_DEPLOYMENT_NAME);
        let cli = Cli::try_parse_from(["veil", "--name", "raffle", "status"])?;
        assert_eq!(cli.get_name(), "raffle");
        Ok(())
    }
}
