//! attest: witness verification demo CLI
//!
//! Builds sample signed payloads with fixed demo keys and runs them through
//! the program verifier and the direct signature check.
//!
//! Usage:
//!   cargo run -p demo -- run-all
//!   cargo run -p demo -- single-sig
//!   cargo run -p demo -- multi-sig
//!   cargo run -p demo -- tampered
//!   cargo run -p demo -- direct-signature
//!   cargo run -p demo -- --config engine.toml --json run-all

mod scenarios;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use attest_core::ProgramVerifier;
use attest_vm::{EngineConfig, SignatureEngineFactory};

use scenarios::{DemoError, ScenarioReport};

// ── CLI definition ────────────────────────────────────────────────────────────

/// attest: program-hash witness verification demo.
#[derive(Parser)]
#[command(
    name = "demo",
    about = "attest witness verification demo",
    long_about = "Runs demo scenarios showing program hash checks, signature contract\n\
                  execution, and direct signature verification."
)]
struct Cli {
    /// TOML file with engine limits. Defaults apply when omitted.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Print reports as JSON lines instead of text.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run every scenario in sequence.
    RunAll,
    /// One signer with a single-signature contract.
    SingleSig,
    /// A 2-of-3 multi-signature contract.
    MultiSig,
    /// Payloads altered after signing.
    Tampered,
    /// Signature checks over the payload without a VM.
    DirectSignature,
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() {
    // Set RUST_LOG=debug for per-program and per-engine events.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();

    match run(&cli) {
        Ok(reports) => {
            let unexpected = reports.iter().filter(|r| !r.as_expected()).count();
            for r in &reports {
                print_report(r, cli.json);
            }
            if unexpected > 0 {
                eprintln!("{unexpected} case(s) did not match the expected outcome");
                std::process::exit(1);
            }
        }
        Err(e) => {
            eprintln!("Demo error: {}", e);
            std::process::exit(1);
        }
    }
}

fn run(cli: &Cli) -> Result<Vec<ScenarioReport>, DemoError> {
    let config = match &cli.config {
        Some(path) => EngineConfig::from_file(path)?,
        None => EngineConfig::default(),
    };
    let verifier = ProgramVerifier::with_engine(Box::new(SignatureEngineFactory::new(config)));

    match cli.command {
        Command::RunAll => {
            let mut reports = scenarios::single_sig(&verifier)?;
            reports.extend(scenarios::multi_sig(&verifier)?);
            reports.extend(scenarios::tampered(&verifier)?);
            reports.extend(scenarios::direct_signature(&verifier)?);
            Ok(reports)
        }
        Command::SingleSig => scenarios::single_sig(&verifier),
        Command::MultiSig => scenarios::multi_sig(&verifier),
        Command::Tampered => scenarios::tampered(&verifier),
        Command::DirectSignature => scenarios::direct_signature(&verifier),
    }
}

// ── Output ────────────────────────────────────────────────────────────────────

fn print_report(report: &ScenarioReport, json: bool) {
    if json {
        match serde_json::to_string(report) {
            Ok(line) => println!("{line}"),
            Err(e) => eprintln!("could not encode report: {e}"),
        }
        return;
    }

    let verdict = if report.outcome.passed { "AUTHORIZED" } else { "REJECTED" };
    let mark = if report.as_expected() { "ok" } else { "UNEXPECTED" };
    println!("[{mark}] {:<18} {:<20} {verdict}", report.scenario, report.case);
    if let Some(err) = &report.outcome.error {
        println!("       {err}");
    }
}
