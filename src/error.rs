//! Error types for chain verification and report export.

use num_bigint::BigInt;
use thiserror::Error;

use crate::ops::Register;
use crate::verifier::DegenerateIntermediate;

/// Failures of a single verification run.
///
/// Every variant is definitive: replaying a chain is deterministic, so a
/// failed run never succeeds on retry.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ChainError {
    #[error("invalid curve constants: r does not divide p^4 - p^2 + 1 (remainder {remainder})")]
    InvalidCurveConstants { remainder: BigInt },

    #[error("operation {op_index} reads register r{register} before it is written")]
    UninitializedRegisterRead { op_index: usize, register: Register },

    #[error(
        "operation {op_index} references register r{register} outside the {num_registers}-register file"
    )]
    RegisterOutOfRange {
        op_index: usize,
        register: Register,
        num_registers: usize,
    },

    #[error(
        "chain is incorrect (actual: {actual}, expected: {expected}){}",
        degenerate_note(.diagnostics)
    )]
    ChainIncorrect {
        actual: BigInt,
        expected: BigInt,
        diagnostics: Vec<DegenerateIntermediate>,
    },

    #[error("unknown hard part method `{0}` (expected a, b, c, devegili, fuentes-castaneda or naive)")]
    UnknownMethod(String),
}

fn degenerate_note(diagnostics: &[DegenerateIntermediate]) -> String {
    if diagnostics.is_empty() {
        return String::new();
    }
    let indices: Vec<String> = diagnostics
        .iter()
        .map(|diagnostic| diagnostic.op_index.to_string())
        .collect();
    format!("; degenerate intermediates at operations {}", indices.join(", "))
}

/// Failures while writing verification reports.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("csv serialization error: {0}")]
    Csv(#[from] csv::Error),
}
