//! Hard-Part Chains for BN254
//!
//! Three published ways of raising an element of the cyclotomic subgroup to
//! `(p^4 - p^2 + 1) / r`. They are alternatives: a caller selects exactly one.
//!
//! | Method | Algorithm          | Result exponent    |
//! |--------|--------------------|--------------------|
//! | A      | Devegili et al.    | `d / r`            |
//! | B      | Fuentes-Castaneda  | `(d / r) * m`      |
//! | C      | Scott et al.       | `d / r`            |
//!
//! Method C is the vectorial addition chain of the `pairing` crate.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ChainError;
use crate::ops::{Chain, Operation, Register, Target};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HardPartMethod {
    Devegili,
    FuentesCastaneda,
    Naive,
}

impl HardPartMethod {
    pub const ALL: [HardPartMethod; 3] = [
        HardPartMethod::Devegili,
        HardPartMethod::FuentesCastaneda,
        HardPartMethod::Naive,
    ];

    /// Short configuration label (`A`, `B` or `C`).
    pub fn label(&self) -> char {
        match self {
            HardPartMethod::Devegili => 'A',
            HardPartMethod::FuentesCastaneda => 'B',
            HardPartMethod::Naive => 'C',
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            HardPartMethod::Devegili => "devegili",
            HardPartMethod::FuentesCastaneda => "fuentes-castaneda",
            HardPartMethod::Naive => "naive",
        }
    }

    pub fn target(&self) -> Target {
        match self {
            HardPartMethod::FuentesCastaneda => Target::ScaledHardPart,
            HardPartMethod::Devegili | HardPartMethod::Naive => Target::HardPart,
        }
    }

    pub fn chain(&self) -> Chain {
        match self {
            HardPartMethod::Devegili => devegili(),
            HardPartMethod::FuentesCastaneda => fuentes_castaneda(),
            HardPartMethod::Naive => naive(),
        }
    }
}

impl fmt::Display for HardPartMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.label(), self.name())
    }
}

impl FromStr for HardPartMethod {
    type Err = ChainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "a" | "devegili" => Ok(HardPartMethod::Devegili),
            "b" | "fc" | "fuentes-castaneda" | "fuentescastaneda" => {
                Ok(HardPartMethod::FuentesCastaneda)
            }
            "c" | "naive" => Ok(HardPartMethod::Naive),
            _ => Err(ChainError::UnknownMethod(s.to_string())),
        }
    }
}

/// Devegili, Scott and Dahab: 3 exponentiations by `x`, 10 squarings,
/// 15 multiplications, 4 Frobenius maps and a single conjugation.
fn devegili() -> Chain {
    use Operation::*;
    const F: Register = 0;
    const F2: Register = 1;
    const A: Register = 2;
    const B: Register = 3;
    const TMP: Register = 4;
    const T0: Register = 5;
    const T1: Register = 6;

    let ops = vec![
        // a = (f^{2x} * f^2)^2 * f^{2x} * f, conjugated: f^{-(6x + 5)}
        ExpByX { dst: A, src: F },
        Square { dst: B, src: A },
        Square { dst: F2, src: F },
        Mul { dst: A, lhs: B, rhs: F2 },
        Square { dst: A, src: A },
        Mul { dst: A, lhs: A, rhs: B },
        Mul { dst: A, lhs: A, rhs: F },
        Conj { dst: A, src: A },
        // b = a^p * a, a = a * b
        Frob { dst: B, src: A, power: 1 },
        Mul { dst: B, lhs: A, rhs: B },
        Mul { dst: A, lhs: A, rhs: B },
        // a *= (f^p * f)^9 * f^4
        Frob { dst: T0, src: F, power: 1 },
        Mul { dst: T1, lhs: T0, rhs: F },
        Square { dst: TMP, src: T1 },
        Square { dst: TMP, src: TMP },
        Square { dst: TMP, src: TMP },
        Mul { dst: T1, lhs: TMP, rhs: T1 },
        Mul { dst: A, lhs: T1, rhs: A },
        Square { dst: T1, src: F2 },
        Mul { dst: A, lhs: A, rhs: T1 },
        // b *= f^{2p} * f^{p^2}
        Square { dst: T0, src: T0 },
        Mul { dst: B, lhs: B, rhs: T0 },
        Frob { dst: T0, src: F, power: 2 },
        Mul { dst: B, lhs: B, rhs: T0 },
        // t0 = b^{6x^2 + 1}, then f = f^{p^3} * t0 * a
        ExpByX { dst: T0, src: B },
        Square { dst: T1, src: T0 },
        Square { dst: T0, src: T1 },
        Mul { dst: T0, lhs: T0, rhs: T1 },
        ExpByX { dst: T0, src: T0 },
        Mul { dst: T0, lhs: T0, rhs: B },
        Mul { dst: A, lhs: T0, rhs: A },
        Frob { dst: T0, src: F, power: 3 },
        Mul { dst: F, lhs: T0, rhs: A },
    ];
    Chain::new(ops, 7, F, HardPartMethod::Devegili.target())
}

/// Fuentes-Castaneda, Knapp and Rodriguez-Henriquez: 3 exponentiations by
/// `x`, 3 squarings, 10 multiplications, 4 Frobenius maps, 2 conjugations.
/// Computes the `m`-th power of the hard part rather than the hard part.
fn fuentes_castaneda() -> Chain {
    use Operation::*;
    const F: Register = 0;
    const A: Register = 1;
    const B: Register = 2;
    const TMP: Register = 3;
    const T: Register = 4;

    let ops = vec![
        // a = f^{2x}, b = a^3, t = b^x
        ExpByX { dst: A, src: F },
        Square { dst: A, src: A },
        Square { dst: B, src: A },
        Mul { dst: B, lhs: A, rhs: B },
        ExpByX { dst: T, src: B },
        // f = f * conj(f)^{p^3} * t
        Conj { dst: TMP, src: F },
        Frob { dst: TMP, src: TMP, power: 3 },
        Mul { dst: F, lhs: F, rhs: TMP },
        Mul { dst: F, lhs: F, rhs: T },
        // b = b * t * (t^2)^x
        Mul { dst: B, lhs: B, rhs: T },
        Square { dst: T, src: T },
        ExpByX { dst: T, src: T },
        Mul { dst: B, lhs: B, rhs: T },
        // t = b * conj(a), then f = f * t^{p^3} * t^p * b * b^{p^2}
        Conj { dst: TMP, src: A },
        Mul { dst: T, lhs: B, rhs: TMP },
        Frob { dst: TMP, src: T, power: 3 },
        Mul { dst: F, lhs: F, rhs: TMP },
        Frob { dst: TMP, src: T, power: 1 },
        Mul { dst: F, lhs: F, rhs: TMP },
        Mul { dst: F, lhs: F, rhs: B },
        Frob { dst: TMP, src: B, power: 2 },
        Mul { dst: F, lhs: F, rhs: TMP },
    ];
    Chain::new(ops, 5, F, HardPartMethod::FuentesCastaneda.target())
}

/// Scott, Benger, Charlemagne, Dominguez Perez and Kachisa: computes the
/// `y_i` factors explicitly and combines them with a short vectorial chain.
/// Uses the most registers of the three methods.
fn naive() -> Chain {
    use Operation::*;
    const F: Register = 0;
    const FP: Register = 1;
    const TMP: Register = 2;
    const FP2: Register = 3;
    const FP3: Register = 4;
    const FU: Register = 5;
    const FU2: Register = 6;
    const FU3: Register = 7;
    const Y3: Register = 8;
    const FU2P: Register = 9;
    const FU3P: Register = 10;
    const Y2: Register = 11;
    const Y0: Register = 12;
    const Y1: Register = 13;
    const Y4: Register = 14;
    const Y5: Register = 15;
    const Y6: Register = 16;
    const T0: Register = 17;
    const T1: Register = 18;

    let ops = vec![
        Frob { dst: FP, src: F, power: 1 },
        Frob { dst: FP2, src: F, power: 2 },
        Frob { dst: FP3, src: FP2, power: 1 },
        ExpByX { dst: FU, src: F },
        ExpByX { dst: FU2, src: FU },
        ExpByX { dst: FU3, src: FU2 },
        Frob { dst: TMP, src: FU, power: 1 },
        Conj { dst: Y3, src: TMP },
        Frob { dst: FU2P, src: FU2, power: 1 },
        Frob { dst: FU3P, src: FU3, power: 1 },
        Frob { dst: Y2, src: FU2, power: 2 },
        // y0 = f^{p + p^2 + p^3}
        Mul { dst: TMP, lhs: FP, rhs: FP2 },
        Mul { dst: Y0, lhs: TMP, rhs: FP3 },
        Conj { dst: Y1, src: F },
        Conj { dst: Y5, src: FU2 },
        Mul { dst: TMP, lhs: FU, rhs: FU2P },
        Conj { dst: Y4, src: TMP },
        Mul { dst: TMP, lhs: FU3, rhs: FU3P },
        Conj { dst: Y6, src: TMP },
        // vectorial addition chain over y0..y6
        Square { dst: TMP, src: Y6 },
        Mul { dst: TMP, lhs: TMP, rhs: Y4 },
        Mul { dst: Y6, lhs: TMP, rhs: Y5 },
        Mul { dst: TMP, lhs: Y3, rhs: Y5 },
        Mul { dst: T1, lhs: TMP, rhs: Y6 },
        Mul { dst: Y6, lhs: Y2, rhs: Y6 },
        Square { dst: T1, src: T1 },
        Mul { dst: T1, lhs: T1, rhs: Y6 },
        Square { dst: T1, src: T1 },
        Mul { dst: T0, lhs: T1, rhs: Y1 },
        Mul { dst: T1, lhs: T1, rhs: Y0 },
        Square { dst: T0, src: T0 },
        Mul { dst: F, lhs: T0, rhs: T1 },
    ];
    Chain::new(ops, 19, F, HardPartMethod::Naive.target())
}
