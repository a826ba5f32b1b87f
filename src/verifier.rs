//! Symbolic Verifier
//!
//! Replays a [`Chain`] over exponents instead of field elements. A register
//! holding exponent `e` stands for `f^e`, where `f` is the chain input, so
//! every operation becomes integer arithmetic on `e`:
//!
//! | Operation     | Exponent update   |
//! |---------------|-------------------|
//! | `ExpByX`      | `e * x`           |
//! | `Mul`         | `e_lhs + e_rhs`   |
//! | `Square`      | `e * 2`           |
//! | `Conj`        | `-e`              |
//! | `Frob(k)`     | `e * p^k`         |
//!
//! The arithmetic is exact and unbounded. Conjugation is modelled as
//! inversion, which is what it is on the cyclotomic subgroup the hard part
//! operates in.

use std::fmt;

use num_bigint::BigInt;
use num_traits::{One, Zero};
use tracing::{debug, trace, warn};

use crate::constants::CurveConstants;
use crate::error::ChainError;
use crate::ops::{Chain, Operation, Register};

/// An intermediate exponent that divides the cofactor `d`.
///
/// On real field elements such a step may collapse to the identity for some
/// inputs. Reported as a warning; it does not fail verification.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DegenerateIntermediate {
    pub op_index: usize,
    pub register: Register,
    pub exponent: BigInt,
}

impl fmt::Display for DegenerateIntermediate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "operation {} writes r{} with exponent {}, a divisor of the cofactor",
            self.op_index, self.register, self.exponent
        )
    }
}

/// Exponent written by one replayed operation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TraceStep {
    pub op_index: usize,
    pub op: Operation,
    pub exponent: BigInt,
    pub degenerate: bool,
}

/// Full record of one replay.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Trace {
    pub steps: Vec<TraceStep>,
    pub diagnostics: Vec<DegenerateIntermediate>,
    pub result: BigInt,
    pub max_exponent_bits: u64,
}

impl Trace {
    /// Compare the result register against the expected exponent. A failure
    /// keeps the degeneracy diagnostics collected during the replay.
    pub fn conclude(self, expected: BigInt) -> Result<Verification, ChainError> {
        if self.result != expected {
            return Err(ChainError::ChainIncorrect {
                actual: self.result,
                expected,
                diagnostics: self.diagnostics,
            });
        }
        Ok(Verification {
            expected,
            trace: self,
        })
    }
}

/// A successful verification and the trace that proves it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Verification {
    pub expected: BigInt,
    pub trace: Trace,
}

impl Verification {
    pub fn diagnostics(&self) -> &[DegenerateIntermediate] {
        &self.trace.diagnostics
    }
}

/// `exponent` divides `cofactor` and is not the conjugation sentinel `-1`.
/// A zero exponent always counts: the element it stands for is the identity.
pub fn is_degenerate(exponent: &BigInt, cofactor: &BigInt) -> bool {
    if exponent.is_zero() {
        return true;
    }
    if *exponent == -BigInt::one() {
        return false;
    }
    (cofactor % exponent).is_zero()
}

/// Interpreter for chains over symbolic exponents.
///
/// Every [`run`](Self::run) starts from a fresh register file, so one
/// executor can replay any number of chains.
#[derive(Clone, Debug)]
pub struct SymbolicExecutor<'c> {
    constants: &'c CurveConstants,
    initial_exponent: BigInt,
    cofactor: BigInt,
}

impl<'c> SymbolicExecutor<'c> {
    pub fn new(constants: &'c CurveConstants) -> Self {
        Self {
            constants,
            initial_exponent: BigInt::one(),
            cofactor: constants.cofactor().clone(),
        }
    }

    /// Exponent register 0 holds before the first operation.
    pub fn with_initial_exponent(mut self, exponent: BigInt) -> Self {
        self.initial_exponent = exponent;
        self
    }

    /// Value intermediate exponents are tested against for degeneracy.
    pub fn with_cofactor(mut self, cofactor: BigInt) -> Self {
        self.cofactor = cofactor;
        self
    }

    pub fn run(&self, chain: &Chain) -> Result<Trace, ChainError> {
        let mut registers: Vec<Option<BigInt>> = vec![None; chain.num_registers];
        match registers.first_mut() {
            Some(input) => *input = Some(self.initial_exponent.clone()),
            None => {
                return Err(ChainError::RegisterOutOfRange {
                    op_index: 0,
                    register: 0,
                    num_registers: 0,
                })
            }
        }

        let result_write = chain
            .ops
            .iter()
            .rposition(|op| op.dst() == chain.result_register);
        let mut steps = Vec::with_capacity(chain.ops.len());
        let mut diagnostics = Vec::new();
        let mut max_exponent_bits = self.initial_exponent.bits();

        for (op_index, op) in chain.ops.iter().enumerate() {
            let exponent = self.evaluate(op_index, op, &registers)?;
            let dst = op.dst();
            if dst >= registers.len() {
                return Err(ChainError::RegisterOutOfRange {
                    op_index,
                    register: dst,
                    num_registers: registers.len(),
                });
            }

            // the last write to the result register is the result and is never flagged
            let degenerate =
                Some(op_index) != result_write && is_degenerate(&exponent, &self.cofactor);
            if degenerate {
                let diagnostic = DegenerateIntermediate {
                    op_index,
                    register: dst,
                    exponent: exponent.clone(),
                };
                warn!("degenerate intermediate: {}", diagnostic);
                diagnostics.push(diagnostic);
            }

            trace!(op_index, %op, bits = exponent.bits(), "replayed");
            max_exponent_bits = max_exponent_bits.max(exponent.bits());
            steps.push(TraceStep {
                op_index,
                op: *op,
                exponent: exponent.clone(),
                degenerate,
            });
            registers[dst] = Some(exponent);
        }

        let result =
            read_register(&registers, chain.ops.len(), chain.result_register)?.clone();
        debug!(
            ops = chain.ops.len(),
            max_exponent_bits,
            diagnostics = diagnostics.len(),
            "chain replay finished"
        );

        Ok(Trace {
            steps,
            diagnostics,
            result,
            max_exponent_bits,
        })
    }

    fn evaluate(
        &self,
        op_index: usize,
        op: &Operation,
        registers: &[Option<BigInt>],
    ) -> Result<BigInt, ChainError> {
        let read = |register: Register| read_register(registers, op_index, register);

        let exponent = match *op {
            Operation::ExpByX { src, .. } => read(src)? * self.constants.x(),
            Operation::Mul { lhs, rhs, .. } => read(lhs)? + read(rhs)?,
            Operation::Square { src, .. } => read(src)? * 2u32,
            Operation::Conj { src, .. } => -read(src)?,
            Operation::Frob { src, power, .. } => read(src)? * self.constants.p().pow(power),
        };
        Ok(exponent)
    }
}

fn read_register(
    registers: &[Option<BigInt>],
    op_index: usize,
    register: Register,
) -> Result<&BigInt, ChainError> {
    match registers.get(register) {
        Some(Some(exponent)) => Ok(exponent),
        Some(None) => Err(ChainError::UninitializedRegisterRead { op_index, register }),
        None => Err(ChainError::RegisterOutOfRange {
            op_index,
            register,
            num_registers: registers.len(),
        }),
    }
}

/// Replay `chain` from the identity exponent and check that its result
/// register ends up holding the chain's target exponent.
pub fn verify(chain: &Chain, constants: &CurveConstants) -> Result<Verification, ChainError> {
    let trace = SymbolicExecutor::new(constants).run(chain)?;
    trace.conclude(chain.target.exponent(constants))
}
