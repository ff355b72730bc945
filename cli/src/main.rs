// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # Pulse CLI
//!
//! Entry point for the `pulse` binary. Parses CLI arguments, initializes
//! logging, and drives the ledger library.
//!
//! The binary supports four subcommands:
//!
//! - `demo`: run the reference mint/validate/tamper scenario
//! - `build`: mint a chain from payloads and write it as JSON
//! - `verify`: load a chain from JSON and check its integrity
//! - `version`: print build version information
//!
//! Exit codes: `0` success, `1` integrity failure, `2` usage, I/O or parse
//! error.

mod cli;
mod logging;

use std::fs;
use std::io::{self, Write};
use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;

use pulse_ledger::config::{HASH_ALGORITHM, HASH_OUTPUT_LENGTH};
use pulse_ledger::{Chain, PendingBlock};

use cli::{BuildArgs, Commands, DemoArgs, PulseCli, VerifyArgs};

/// Outcome of a command that ran to completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Verdict {
    Pass,
    Fail,
}

impl From<Verdict> for ExitCode {
    fn from(verdict: Verdict) -> Self {
        match verdict {
            Verdict::Pass => ExitCode::SUCCESS,
            Verdict::Fail => ExitCode::from(1),
        }
    }
}

fn main() -> ExitCode {
    let cli = PulseCli::parse();
    logging::init_logging(&cli.log_level, cli.log_format);

    match run(cli.command) {
        Ok(verdict) => verdict.into(),
        Err(err) => {
            tracing::error!(error = %format!("{err:#}"), "command failed");
            eprintln!("error: {err:#}");
            ExitCode::from(2)
        }
    }
}

fn run(command: Commands) -> Result<Verdict> {
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match command {
        Commands::Demo(args) => run_demo(args, &mut out),
        Commands::Build(args) => build(args, &mut out),
        Commands::Verify(args) => verify(args, &mut out),
        Commands::Version => {
            print_version(&mut out)?;
            Ok(Verdict::Pass)
        }
    }
}

/// Reference scenario. Passes when the untouched chain validates and the
/// tampered one does not.
fn run_demo(args: DemoArgs, out: &mut impl Write) -> Result<Verdict> {
    tracing::info!(tamper_payload = args.tamper_payload, "running demo scenario");

    let mut chain = Chain::new();
    let block0 = PendingBlock::genesis(42);
    let mut block1 = chain.mint_next(block0)?;
    block1.set_payload(100);
    let mut block2 = chain.mint_next(block1)?;
    block2.set_payload(11);

    for (i, block) in chain.iter().enumerate() {
        writeln!(out, "Block {}: {}", i + 1, block)?;
    }
    writeln!(out, "Block {}: {}", chain.len() + 1, block2)?;
    writeln!(out, "BlockChain {}", chain)?;

    let before = chain.validate();
    writeln!(out, "Blockchain is correct (expect true) {}", before)?;

    let tampered = edit_payload(&chain, 1, args.tamper_payload)?;
    let after = tampered.validate();
    writeln!(out, "Blockchain is correct (expect false) {}", after)?;

    // A tamper payload equal to the sealed one changes nothing.
    let verdict = if before && !after {
        Verdict::Pass
    } else {
        Verdict::Fail
    };
    tracing::info!(before, after, ?verdict, "demo finished");
    Ok(verdict)
}

/// Rewrites one stored payload through the JSON form, leaving the hash as
/// it was sealed.
fn edit_payload(chain: &Chain, position: usize, payload: i64) -> Result<Chain> {
    let mut doc = serde_json::to_value(chain).context("failed to serialize chain")?;
    let block = doc
        .get_mut(position)
        .with_context(|| format!("no block at position {position}"))?;
    block["payload"] = payload.into();
    serde_json::from_value(doc).context("failed to reload edited chain")
}

/// Seals one block per payload, in order. The last block is sealed too, so
/// the returned chain has exactly `payloads.len()` blocks.
fn build_chain(payloads: &[i64]) -> Result<Chain> {
    let mut chain = Chain::new();
    let Some((&first, rest)) = payloads.split_first() else {
        return Ok(chain);
    };

    let mut pending = PendingBlock::genesis(first);
    for &payload in rest {
        pending = chain.mint_next(pending)?;
        pending.set_payload(payload);
    }
    chain.append(pending.seal());
    Ok(chain)
}

fn build(args: BuildArgs, out: &mut impl Write) -> Result<Verdict> {
    let chain = build_chain(&args.payloads)?;
    let json = serde_json::to_string_pretty(&chain).context("failed to serialize chain")?;

    match &args.output {
        Some(path) => {
            fs::write(path, &json)
                .with_context(|| format!("failed to write chain to {}", path.display()))?;
            tracing::info!(blocks = chain.len(), path = %path.display(), "chain written");
        }
        None => writeln!(out, "{json}")?,
    }

    Ok(Verdict::Pass)
}

fn load_chain(path: &Path) -> Result<Chain> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read chain file {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse chain file {}", path.display()))
}

fn verify(args: VerifyArgs, out: &mut impl Write) -> Result<Verdict> {
    let chain = load_chain(&args.path)?;
    tracing::info!(blocks = chain.len(), path = %args.path.display(), "verifying chain");

    match chain.verify() {
        Ok(()) => {
            writeln!(out, "valid ({} blocks)", chain.len())?;
            Ok(Verdict::Pass)
        }
        Err(err) => {
            tracing::warn!(%err, path = %args.path.display(), "chain integrity check failed");
            writeln!(out, "invalid: {err}")?;
            Ok(Verdict::Fail)
        }
    }
}

fn print_version(out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "pulse v{}", env!("CARGO_PKG_VERSION"))?;
    writeln!(
        out,
        "hash: {} ({} bytes, two-stage body/link)",
        HASH_ALGORITHM, HASH_OUTPUT_LENGTH
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn verify_path(path: &Path) -> (Verdict, String) {
        let mut out = Vec::new();
        let verdict = verify(
            VerifyArgs {
                path: path.to_path_buf(),
            },
            &mut out,
        )
        .expect("verify runs");
        (verdict, String::from_utf8(out).unwrap())
    }

    #[test]
    fn build_chain_seals_every_payload() {
        let chain = build_chain(&[42, 100, 11]).unwrap();
        let payloads: Vec<i64> = chain.iter().map(|b| b.payload()).collect();
        assert_eq!(payloads, vec![42, 100, 11]);
        assert!(chain.validate());
    }

    #[test]
    fn build_chain_of_nothing_is_empty() {
        assert!(build_chain(&[]).unwrap().is_empty());
    }

    #[test]
    fn demo_passes_and_reports_both_results() {
        let mut out = Vec::new();
        let verdict = run_demo(DemoArgs { tamper_payload: 200 }, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert_eq!(verdict, Verdict::Pass);
        assert!(text.contains("Blockchain is correct (expect true) true"));
        assert!(text.contains("Blockchain is correct (expect false) false"));
        assert!(text.contains("Block 3: Index: 2"));
    }

    #[test]
    fn demo_fails_when_tamper_is_a_no_op() {
        let mut out = Vec::new();
        let verdict = run_demo(DemoArgs { tamper_payload: 100 }, &mut out).unwrap();
        assert_eq!(verdict, Verdict::Fail);
    }

    #[test]
    fn edit_payload_leaves_source_chain_intact() {
        let chain = build_chain(&[42, 100, 11]).unwrap();
        let tampered = edit_payload(&chain, 1, 200).unwrap();

        assert!(chain.validate());
        assert_eq!(tampered.get(1).unwrap().payload(), 200);
        assert_eq!(tampered.get(1).unwrap().hash(), chain.get(1).unwrap().hash());
        assert!(!tampered.validate());
    }

    #[test]
    fn edit_payload_out_of_range_is_an_error() {
        let chain = build_chain(&[1]).unwrap();
        let err = edit_payload(&chain, 3, 0).unwrap_err();
        assert!(format!("{err:#}").contains("no block at position 3"));
    }

    #[test]
    fn build_then_verify_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chain.json");

        let args = BuildArgs {
            payloads: vec![60, 72, 85],
            output: Some(path.clone()),
        };
        assert_eq!(build(args, &mut Vec::new()).unwrap(), Verdict::Pass);

        let (verdict, text) = verify_path(&path);
        assert_eq!(verdict, Verdict::Pass);
        assert_eq!(text.trim(), "valid (3 blocks)");
    }

    #[test]
    fn verify_reports_edited_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chain.json");

        let chain = build_chain(&[60, 72, 85]).unwrap();
        let mut doc = serde_json::to_value(&chain).unwrap();
        doc[1]["payload"] = 200.into();
        fs::write(&path, serde_json::to_string(&doc).unwrap()).unwrap();

        let (verdict, text) = verify_path(&path);
        assert_eq!(verdict, Verdict::Fail);
        assert!(text.starts_with("invalid: block 1 hash mismatch"));
    }

    #[test]
    fn verify_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = verify(
            VerifyArgs {
                path: dir.path().join("absent.json"),
            },
            &mut Vec::new(),
        );
        let err = result.unwrap_err();
        assert!(format!("{err:#}").contains("failed to read chain file"));
    }

    #[test]
    fn verify_garbage_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chain.json");
        fs::write(&path, "not json").unwrap();

        let err = verify(VerifyArgs { path }, &mut Vec::new()).unwrap_err();
        assert!(format!("{err:#}").contains("failed to parse chain file"));
    }

    #[test]
    fn build_to_stdout_writes_json_array() {
        let mut out = Vec::new();
        build(
            BuildArgs {
                payloads: vec![1, 2],
                output: None,
            },
            &mut out,
        )
        .unwrap();
        let chain: Chain = serde_json::from_slice(&out).unwrap();
        assert_eq!(chain.len(), 2);
        assert!(chain.validate());
    }

    #[test]
    fn version_mentions_hash_algorithm() {
        let mut out = Vec::new();
        print_version(&mut out).unwrap();
        assert!(String::from_utf8(out).unwrap().contains("SHA-256"));
    }
}
