//! # CLI Interface
//!
//! Defines the command-line argument structure for `pulse` using `clap`
//! derive. Supports four subcommands: `demo`, `build`, `verify`, and
//! `version`.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::logging::LogFormat;

/// Pulse hash-linked ledger.
///
/// Builds chains of sealed payload readings, writes them out as JSON, and
/// verifies that a stored chain has not been edited since it was sealed.
#[derive(Parser, Debug)]
#[command(
    name = "pulse",
    about = "Pulse hash-linked ledger",
    version,
    propagate_version = true
)]
pub struct PulseCli {
    /// Default log filter when `RUST_LOG` is not set.
    #[arg(long, global = true, env = "PULSE_LOG", default_value = "info")]
    pub log_level: String,

    /// Log output format.
    #[arg(
        long,
        global = true,
        env = "PULSE_LOG_FORMAT",
        value_enum,
        default_value_t = LogFormat::Pretty
    )]
    pub log_format: LogFormat,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level subcommands for the `pulse` binary.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the reference scenario: mint three blocks, validate, tamper with
    /// a sealed block, validate again.
    Demo(DemoArgs),
    /// Build a chain from a list of payloads and write it as JSON.
    Build(BuildArgs),
    /// Load a chain from a JSON file and check its integrity.
    Verify(VerifyArgs),
    /// Print version information and exit.
    Version,
}

/// Arguments for the `demo` subcommand.
#[derive(Parser, Debug)]
pub struct DemoArgs {
    /// Payload written into the sealed second block to simulate tampering.
    #[arg(long, default_value_t = 200, allow_negative_numbers = true)]
    pub tamper_payload: i64,
}

/// Arguments for the `build` subcommand.
#[derive(Parser, Debug)]
pub struct BuildArgs {
    /// Payload for the next block. Repeat once per block, in order.
    #[arg(
        long = "payload",
        short = 'p',
        required = true,
        num_args = 1..,
        allow_negative_numbers = true
    )]
    pub payloads: Vec<i64>,

    /// Where to write the chain. Writes to stdout when omitted.
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
}

/// Arguments for the `verify` subcommand.
#[derive(Parser, Debug)]
pub struct VerifyArgs {
    /// Path to a chain JSON file produced by `pulse build`.
    pub path: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli_structure() {
        // Ensures the derive macros produce a valid CLI definition.
        PulseCli::command().debug_assert();
    }

    #[test]
    fn build_accepts_repeated_and_negative_payloads() {
        let cli = PulseCli::try_parse_from(["pulse", "build", "-p", "42", "-p", "-3", "100"])
            .expect("parse");
        match cli.command {
            Commands::Build(args) => {
                assert_eq!(args.payloads, vec![42, -3, 100]);
                assert!(args.output.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn build_requires_a_payload() {
        assert!(PulseCli::try_parse_from(["pulse", "build"]).is_err());
    }

    #[test]
    fn global_log_flags_parse_after_subcommand() {
        let cli = PulseCli::try_parse_from(["pulse", "demo", "--log-format", "json"])
            .expect("parse");
        assert_eq!(cli.log_format, LogFormat::Json);
        assert!(matches!(
            cli.command,
            Commands::Demo(DemoArgs {
                tamper_payload: 200
            })
        ));
    }
}
