//! Addition-Chain Model
//!
//! A hard-part chain is a straight-line program over a small register file.
//! Each [`Operation`] mirrors one cheap operation on an element of the
//! cyclotomic subgroup of Fp12 (exponentiation by the seed, multiplication,
//! squaring, conjugation, Frobenius power) and names the register it writes.
//! Register 0 holds the input on entry and, by convention, the result on exit.

use std::fmt;

use num_bigint::BigInt;
use serde::{Deserialize, Serialize};

use crate::constants::CurveConstants;
use crate::error::ChainError;

/// Index into a chain's register file.
pub type Register = usize;

/// One step of a chain. The destination may alias an input.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operation {
    ExpByX { dst: Register, src: Register },
    Mul { dst: Register, lhs: Register, rhs: Register },
    Square { dst: Register, src: Register },
    Conj { dst: Register, src: Register },
    Frob { dst: Register, src: Register, power: u32 },
}

/// Discriminant of an [`Operation`], used for cost accounting.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OpKind {
    ExpByX,
    Mul,
    Square,
    Conj,
    Frob,
}

impl Operation {
    pub fn dst(&self) -> Register {
        match *self {
            Operation::ExpByX { dst, .. }
            | Operation::Mul { dst, .. }
            | Operation::Square { dst, .. }
            | Operation::Conj { dst, .. }
            | Operation::Frob { dst, .. } => dst,
        }
    }

    /// Registers read by this operation, in operand order.
    pub fn sources(&self) -> impl Iterator<Item = Register> {
        let (first, second) = match *self {
            Operation::Mul { lhs, rhs, .. } => (lhs, Some(rhs)),
            Operation::ExpByX { src, .. }
            | Operation::Square { src, .. }
            | Operation::Conj { src, .. }
            | Operation::Frob { src, .. } => (src, None),
        };
        std::iter::once(first).chain(second)
    }

    pub fn kind(&self) -> OpKind {
        match self {
            Operation::ExpByX { .. } => OpKind::ExpByX,
            Operation::Mul { .. } => OpKind::Mul,
            Operation::Square { .. } => OpKind::Square,
            Operation::Conj { .. } => OpKind::Conj,
            Operation::Frob { .. } => OpKind::Frob,
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Operation::ExpByX { dst, src } => write!(f, "r{} <- r{}^x", dst, src),
            Operation::Mul { dst, lhs, rhs } => write!(f, "r{} <- r{} * r{}", dst, lhs, rhs),
            Operation::Square { dst, src } => write!(f, "r{} <- r{}^2", dst, src),
            Operation::Conj { dst, src } => write!(f, "r{} <- conj(r{})", dst, src),
            Operation::Frob { dst, src, power } => {
                write!(f, "r{} <- frob(r{}, {})", dst, src, power)
            }
        }
    }
}

/// The exponent a chain's result register must hold after replay.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Target {
    /// `d / r`
    HardPart,
    /// `(d / r) * m` with `m = 2x(6x^2 + 3x + 1)`
    ScaledHardPart,
}

impl Target {
    pub fn exponent(&self, constants: &CurveConstants) -> BigInt {
        match self {
            Target::HardPart => constants.hard_part_exponent().clone(),
            Target::ScaledHardPart => {
                constants.hard_part_exponent() * constants.fuentes_castaneda_multiplier()
            }
        }
    }
}

/// A straight-line program together with the shape of its register file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chain {
    pub ops: Vec<Operation>,
    pub num_registers: usize,
    pub result_register: Register,
    pub target: Target,
}

impl Chain {
    pub fn new(
        ops: Vec<Operation>,
        num_registers: usize,
        result_register: Register,
        target: Target,
    ) -> Self {
        Self {
            ops,
            num_registers,
            result_register,
            target,
        }
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Check, without evaluating anything, that every register an operation
    /// touches exists and that every read follows a write. Register 0 is
    /// live on entry.
    pub fn check_well_formed(&self) -> Result<(), ChainError> {
        let mut written = vec![false; self.num_registers];
        if let Some(first) = written.first_mut() {
            *first = true;
        }

        for (op_index, op) in self.ops.iter().enumerate() {
            for register in op.sources().chain(std::iter::once(op.dst())) {
                if register >= self.num_registers {
                    return Err(ChainError::RegisterOutOfRange {
                        op_index,
                        register,
                        num_registers: self.num_registers,
                    });
                }
            }
            if let Some(register) = op.sources().find(|&src| !written[src]) {
                return Err(ChainError::UninitializedRegisterRead { op_index, register });
            }
            written[op.dst()] = true;
        }

        if self.result_register >= self.num_registers {
            return Err(ChainError::RegisterOutOfRange {
                op_index: self.ops.len(),
                register: self.result_register,
                num_registers: self.num_registers,
            });
        }
        Ok(())
    }

    pub fn op_counts(&self) -> OpCounts {
        let mut counts = OpCounts::default();
        for op in &self.ops {
            match op.kind() {
                OpKind::ExpByX => counts.exp_by_x += 1,
                OpKind::Mul => counts.mul += 1,
                OpKind::Square => counts.square += 1,
                OpKind::Conj => counts.conj += 1,
                OpKind::Frob => counts.frob += 1,
            }
        }
        counts
    }
}

impl fmt::Display for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} operations over {} registers, result in r{}",
            self.ops.len(),
            self.num_registers,
            self.result_register
        )?;
        for (index, op) in self.ops.iter().enumerate() {
            writeln!(f, "{:>4}: {}", index, op)?;
        }
        Ok(())
    }
}

/// Number of operations of each kind in a chain.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpCounts {
    pub exp_by_x: usize,
    pub mul: usize,
    pub square: usize,
    pub conj: usize,
    pub frob: usize,
}

/// Estimated work to execute a chain on real cyclotomic-subgroup elements.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CyclotomicCost {
    pub squarings: usize,
    pub multiplications: usize,
    pub frobenius_maps: usize,
    pub conjugations: usize,
}

impl OpCounts {
    pub fn total(&self) -> usize {
        self.exp_by_x + self.mul + self.square + self.conj + self.frob
    }

    /// Expand each exponentiation by the seed through its signed digits:
    /// one squaring per digit after the leading one and one multiplication
    /// per non-zero digit after the leading one.
    pub fn cyclotomic_cost(&self, seed_digits: &[i8]) -> CyclotomicCost {
        let exp_squarings = seed_digits.len().saturating_sub(1);
        let exp_multiplications = seed_digits
            .iter()
            .filter(|&&digit| digit != 0)
            .count()
            .saturating_sub(1);

        CyclotomicCost {
            squarings: self.square + self.exp_by_x * exp_squarings,
            multiplications: self.mul + self.exp_by_x * exp_multiplications,
            frobenius_maps: self.frob,
            conjugations: self.conj,
        }
    }
}

impl fmt::Display for OpCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} exp-by-x, {} squarings, {} muls, {} conjugations, {} frobenius ({} total)",
            self.exp_by_x,
            self.square,
            self.mul,
            self.conj,
            self.frob,
            self.total()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_chain() -> Chain {
        Chain::new(
            vec![
                Operation::ExpByX { dst: 1, src: 0 },
                Operation::Square { dst: 2, src: 1 },
                Operation::Mul { dst: 0, lhs: 2, rhs: 0 },
            ],
            3,
            0,
            Target::HardPart,
        )
    }

    #[test]
    fn test_sources_and_destination() {
        let mul = Operation::Mul { dst: 4, lhs: 1, rhs: 2 };
        assert_eq!(mul.dst(), 4);
        assert_eq!(mul.sources().collect::<Vec<_>>(), vec![1, 2]);

        let frob = Operation::Frob { dst: 3, src: 3, power: 2 };
        assert_eq!(frob.sources().collect::<Vec<_>>(), vec![3]);
        assert_eq!(frob.kind(), OpKind::Frob);
    }

    #[test]
    fn test_operation_rendering() {
        assert_eq!(Operation::ExpByX { dst: 2, src: 0 }.to_string(), "r2 <- r0^x");
        assert_eq!(Operation::Conj { dst: 3, src: 0 }.to_string(), "r3 <- conj(r0)");
        assert_eq!(
            Operation::Frob { dst: 3, src: 3, power: 3 }.to_string(),
            "r3 <- frob(r3, 3)"
        );

        let rendered = sample_chain().to_string();
        assert!(rendered.starts_with("3 operations over 3 registers, result in r0"));
        assert!(rendered.contains("   2: r0 <- r2 * r0"));
    }

    #[test]
    fn test_well_formed_chain_passes() {
        assert_eq!(sample_chain().check_well_formed(), Ok(()));
    }

    #[test]
    fn test_read_before_write_is_detected() {
        let mut chain = sample_chain();
        chain.ops[1] = Operation::Square { dst: 2, src: 2 };

        assert_eq!(
            chain.check_well_formed(),
            Err(ChainError::UninitializedRegisterRead { op_index: 1, register: 2 })
        );
    }

    #[test]
    fn test_out_of_range_register_is_detected() {
        let mut chain = sample_chain();
        chain.ops[0] = Operation::ExpByX { dst: 7, src: 0 };

        assert_eq!(
            chain.check_well_formed(),
            Err(ChainError::RegisterOutOfRange {
                op_index: 0,
                register: 7,
                num_registers: 3,
            })
        );
    }

    #[test]
    fn test_op_counts_and_cost() {
        let counts = sample_chain().op_counts();
        assert_eq!(
            counts,
            OpCounts { exp_by_x: 1, mul: 1, square: 1, conj: 0, frob: 0 }
        );
        assert_eq!(counts.total(), 3);

        // x = 0b101: two squarings and one multiplication per exponentiation
        let cost = counts.cyclotomic_cost(&[1, 0, 1]);
        assert_eq!(cost.squarings, 3);
        assert_eq!(cost.multiplications, 2);
    }
}
