//! Command-line interface definitions.
//!
//! Defines the CLI structure for the greenroom application using `clap`.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Fan engagement levels and token wallet telemetry CLI
#[derive(Parser, Debug)]
#[command(name = "greenroom")]
#[command(version)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(long, global = true, default_value = "greenroom.toml")]
    pub config: PathBuf,

    /// Only log errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level subcommands for the greenroom CLI.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Resolve the fan token's EUR price and show its provenance
    Price,

    /// Show wallet balances, staking state, and EUR value
    Status(WalletArgs),

    /// Show a fan's engagement profile and level progress
    Fan(FanArgs),

    /// Run the like+save boost verification flow
    #[command(subcommand)]
    Boost(BoostCommand),

    /// Submit a mining reward claim
    Claim(ClaimArgs),

    /// Watch balances and price on the refresh cadences
    Watch(WalletArgs),
}

/// Arguments selecting a wallet.
#[derive(Args, Debug)]
pub struct WalletArgs {
    /// 0x-prefixed wallet address
    #[arg(long)]
    pub wallet: String,
}

/// Arguments selecting a fan by campaign id.
#[derive(Args, Debug)]
pub struct FanArgs {
    /// Campaign fan id
    pub fan_id: String,
}

/// Subcommands for `greenroom boost`.
///
/// The flow has two steps: record the post's counters after likes and
/// saves are removed, then verify that both counters grew after they were
/// re-added.
#[derive(Subcommand, Debug)]
pub enum BoostCommand {
    /// Record the current like/save counters as the baseline
    Start(FanArgs),
    /// Fetch the counters again and compare against the baseline
    Verify(FanArgs),
}

/// Arguments for `greenroom claim`.
#[derive(Args, Debug)]
pub struct ClaimArgs {
    /// Campaign fan id
    pub fan_id: String,

    /// Destination wallet; defaults to the wallet on the fan's profile
    #[arg(long)]
    pub wallet: Option<String>,

    /// Skip the confirmation prompt
    #[arg(short = 'y', long)]
    pub yes: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_boost_subcommands() {
        let cli = Cli::try_parse_from(["greenroom", "boost", "start", "fan-123"]).unwrap();
        match cli.command {
            Commands::Boost(BoostCommand::Start(args)) => assert_eq!(args.fan_id, "fan-123"),
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn claim_defaults_to_profile_wallet() {
        let cli = Cli::try_parse_from(["greenroom", "claim", "fan-123"]).unwrap();
        match cli.command {
            Commands::Claim(args) => {
                assert_eq!(args.fan_id, "fan-123");
                assert!(args.wallet.is_none());
                assert!(!args.yes);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}
