//! Verification Reports
//!
//! Collects per-method outcomes of the symbolic verifier into serializable
//! records, checks several methods side by side, and exports the results.
//!
//! Core functionality includes:
//! - Parallel checking of independent methods, each with its own register file
//! - Console summary table
//! - JSON export of the reports and CSV export of the replay traces

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use std::time::Instant;

use chrono::{DateTime, Utc};
use rayon::prelude::*;
use serde::Serialize;
use tracing::{info, warn};

use crate::constants::{CurveConstants, BN254_SEED_SIGNED_DIGITS};
use crate::error::ReportError;
use crate::methods::HardPartMethod;
use crate::ops::{Chain, CyclotomicCost, OpCounts};
use crate::verifier::{DegenerateIntermediate, SymbolicExecutor, TraceStep};

/// Serializable form of a degeneracy diagnostic.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DiagnosticRecord {
    pub op_index: usize,
    pub register: usize,
    pub exponent: String,
}

impl From<&DegenerateIntermediate> for DiagnosticRecord {
    fn from(diagnostic: &DegenerateIntermediate) -> Self {
        Self {
            op_index: diagnostic.op_index,
            register: diagnostic.register,
            exponent: diagnostic.exponent.to_string(),
        }
    }
}

/// Outcome of checking one method.
#[derive(Clone, Debug, Serialize)]
pub struct MethodReport {
    pub method: HardPartMethod,
    pub label: char,
    pub timestamp: DateTime<Utc>,
    pub op_counts: OpCounts,
    pub cyclotomic_cost: CyclotomicCost,
    pub passed: bool,
    pub expected: String,
    pub actual: Option<String>,
    pub diagnostics: Vec<DiagnosticRecord>,
    pub max_exponent_bits: u64,
    pub failure: Option<String>,
    pub verify_time_us: u64,
    #[serde(skip)]
    pub steps: Vec<TraceStep>,
}

/// One replayed operation, as written to the trace CSV.
#[derive(Debug, Serialize)]
struct TraceRow<'a> {
    method: &'a str,
    op_index: usize,
    operation: String,
    dst: usize,
    exponent_bits: u64,
    degenerate: bool,
    exponent: String,
}

/// Check the built-in chain of `method`.
pub fn check_method(method: HardPartMethod, constants: &CurveConstants) -> MethodReport {
    check_chain(method, &method.chain(), constants)
}

/// Check an arbitrary chain, reporting it under `method`.
pub fn check_chain(
    method: HardPartMethod,
    chain: &Chain,
    constants: &CurveConstants,
) -> MethodReport {
    let start_time = Instant::now();
    let op_counts = chain.op_counts();
    let expected = chain.target.exponent(constants);

    let mut report = MethodReport {
        method,
        label: method.label(),
        timestamp: Utc::now(),
        op_counts,
        cyclotomic_cost: op_counts.cyclotomic_cost(&BN254_SEED_SIGNED_DIGITS),
        passed: false,
        expected: expected.to_string(),
        actual: None,
        diagnostics: Vec::new(),
        max_exponent_bits: 0,
        failure: None,
        verify_time_us: 0,
        steps: Vec::new(),
    };

    match SymbolicExecutor::new(constants).run(chain) {
        Ok(trace) => {
            report.actual = Some(trace.result.to_string());
            report.max_exponent_bits = trace.max_exponent_bits;
            report.diagnostics = trace.diagnostics.iter().map(DiagnosticRecord::from).collect();
            report.steps = trace.steps.clone();

            match trace.conclude(expected) {
                Ok(_) => report.passed = true,
                Err(e) => report.failure = Some(e.to_string()),
            }
        }
        Err(e) => report.failure = Some(e.to_string()),
    }
    report.verify_time_us = start_time.elapsed().as_micros() as u64;

    if report.passed {
        info!(
            method = method.name(),
            diagnostics = report.diagnostics.len(),
            "chain verified"
        );
    } else {
        warn!(
            method = method.name(),
            failure = report.failure.as_deref().unwrap_or_default(),
            "chain rejected"
        );
    }
    report
}

/// Check several methods in parallel. Reports come back in input order.
pub fn check_methods(methods: &[HardPartMethod], constants: &CurveConstants) -> Vec<MethodReport> {
    methods
        .par_iter()
        .map(|&method| check_method(method, constants))
        .collect()
}

pub fn all_passed(reports: &[MethodReport]) -> bool {
    reports.iter().all(|report| report.passed)
}

/// Print a summary table followed by diagnostics and failures.
pub fn print_summary(reports: &[MethodReport]) {
    println!("\n=== Hard Part Chain Verification ===");
    println!("| Method | Name              | Ops | Sqr(cyc) | Mul(cyc) | Max bits | Result |");
    println!("|--------|-------------------|-----|----------|----------|----------|--------|");

    for report in reports {
        println!(
            "| {:6} | {:17} | {:3} | {:8} | {:8} | {:8} | {:6} |",
            report.label,
            report.method.name(),
            report.op_counts.total(),
            report.cyclotomic_cost.squarings,
            report.cyclotomic_cost.multiplications,
            report.max_exponent_bits,
            if report.passed { "PASS" } else { "FAIL" }
        );
    }

    for report in reports {
        for diagnostic in &report.diagnostics {
            println!(
                "  warning [{}]: operation {} writes r{} with a divisor of the cofactor ({})",
                report.label, diagnostic.op_index, diagnostic.register, diagnostic.exponent
            );
        }
        if let Some(failure) = &report.failure {
            println!("  error [{}]: {}", report.label, failure);
        }
    }
}

/// Write the reports as a pretty-printed JSON array.
pub fn export_json(reports: &[MethodReport], path: impl AsRef<Path>) -> Result<(), ReportError> {
    let writer = BufWriter::new(File::create(path.as_ref())?);
    serde_json::to_writer_pretty(writer, reports)?;
    info!(path = %path.as_ref().display(), reports = reports.len(), "exported json report");
    Ok(())
}

/// Write one CSV row per replayed operation of every report.
pub fn export_trace_csv(
    reports: &[MethodReport],
    path: impl AsRef<Path>,
) -> Result<(), ReportError> {
    let mut writer = csv::Writer::from_path(path.as_ref())?;
    let mut rows = 0;

    for report in reports {
        for step in &report.steps {
            writer.serialize(TraceRow {
                method: report.method.name(),
                op_index: step.op_index,
                operation: step.op.to_string(),
                dst: step.op.dst(),
                exponent_bits: step.exponent.bits(),
                degenerate: step.degenerate,
                exponent: step.exponent.to_string(),
            })?;
            rows += 1;
        }
    }
    writer.flush()?;

    info!(path = %path.as_ref().display(), rows, "exported trace csv");
    Ok(())
}
