//! Command-line entry point: verify one or more hard-part chains against the
//! compiled-in BN254 constants.

use std::path::PathBuf;

use clap::Parser;
use eyre::{bail, Result};
use hardpart_chain::report::{self, MethodReport};
use hardpart_chain::verifier::TraceStep;
use hardpart_chain::{CurveConstants, HardPartMethod};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Registry};

#[derive(Parser, Debug)]
#[command(
    name = "hardpart-verify",
    version,
    about = "Symbolically verify BN254 final-exponentiation hard-part chains"
)]
struct Cli {
    /// Methods to verify: a/devegili, b/fuentes-castaneda, c/naive. Defaults to all three.
    methods: Vec<HardPartMethod>,

    /// Write the reports as JSON to this path
    #[arg(long)]
    json: Option<PathBuf>,

    /// Write the per-operation replay trace as CSV to this path
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Print each selected chain before verifying it
    #[arg(long)]
    render: bool,

    /// Print the exponent written by every operation, with its bit length
    #[arg(long)]
    trace: bool,
}

fn setup_tracing() {
    let env_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();
    let _ = Registry::default()
        .with(env_filter)
        .with(fmt::layer().with_target(false))
        .try_init();
}

fn trace_line(step: &TraceStep) -> String {
    let marker = if step.degenerate { " (degenerate)" } else { "" };
    format!(
        "{:>4}: {:<22} {:>4} bits  {}{}",
        step.op_index,
        step.op.to_string(),
        step.exponent.bits(),
        step.exponent,
        marker
    )
}

fn print_trace(report: &MethodReport) {
    println!("\n--- Trace for {} ---", report.method);
    for step in &report.steps {
        println!("{}", trace_line(step));
    }
}

fn main() -> Result<()> {
    setup_tracing();
    let cli = Cli::parse();

    println!("BN254 Final Exponentiation Hard Part Verifier");
    println!("=============================================");

    let constants = CurveConstants::bn254()?;
    let methods = if cli.methods.is_empty() {
        HardPartMethod::ALL.to_vec()
    } else {
        cli.methods.clone()
    };

    if cli.render {
        for method in &methods {
            println!("\n--- Chain {} ---", method);
            print!("{}", method.chain());
            println!("{}", method.chain().op_counts());
        }
    }

    let reports = report::check_methods(&methods, constants);

    if cli.trace {
        reports.iter().for_each(print_trace);
    }
    report::print_summary(&reports);

    if let Some(path) = &cli.json {
        report::export_json(&reports, path)?;
    }
    if let Some(path) = &cli.csv {
        report::export_trace_csv(&reports, path)?;
    }

    if !report::all_passed(&reports) {
        bail!("one or more hard part chains failed verification");
    }
    Ok(())
}
