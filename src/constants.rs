//! BN254 Curve Constants
//!
//! Fixed parameters of the BN curve the hard-part chains are written for.
//! All values are arbitrary-precision integers: the exponents a chain
//! produces reach several hundred bits, far outside any machine word.
//!
//! The field characteristic `p` and subgroup order `r` are taken from the
//! moduli of `ark-bn254`, the seed `x` is compiled in, and the consistency
//! requirement `r | p^4 - p^2 + 1` is checked once on first access.

use ark_bn254::{Fq, Fr};
use ark_ff::{BigInteger, PrimeField};
use num_bigint::{BigInt, Sign};
use num_integer::Integer;
use num_traits::Zero;
use once_cell::sync::Lazy;

use crate::error::ChainError;

/// Curve seed `x` of BN254.
pub const BN254_SEED: u64 = 4965661367192848881;

/// Signed binary digits of the seed, most significant first.
///
/// Exponentiation by `x` walks these digits with one cyclotomic squaring per
/// position and one multiplication (by the base or its conjugate) per
/// non-zero digit.
pub const BN254_SEED_SIGNED_DIGITS: [i8; 63] = [
    1, 0, 0, 0, 1, 0, 1, 0, 0, -1, 0, 1, 0, 0, 1, 1, 0, 0, 1, 0, 0, 1, 0, 1, 0, 1, 1, 0, 1, 0, 0,
    0, 1, 0, 0, 1, 0, 1, 0, 0, 1, 1, 0, 1, 0, 0, 1, 0, 0, 0, 0, 1, 0, 1, 0, 0, 0, 0, -1, 0, 0, 0,
    1,
];

static BN254: Lazy<Result<CurveConstants, ChainError>> = Lazy::new(|| {
    CurveConstants::new(
        field_modulus::<Fq>(),
        field_modulus::<Fr>(),
        BigInt::from(BN254_SEED),
    )
});

/// Recompose a most-significant-first signed digit expansion.
pub fn signed_digits_value(digits: &[i8]) -> BigInt {
    digits
        .iter()
        .fold(BigInt::zero(), |acc, &digit| acc * 2 + BigInt::from(digit))
}

fn field_modulus<F: PrimeField>() -> BigInt {
    BigInt::from_bytes_le(Sign::Plus, &F::MODULUS.to_bytes_le())
}

/// Parameters `p`, `r`, `x` together with the derived exponents every
/// verification compares against.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CurveConstants {
    p: BigInt,
    r: BigInt,
    x: BigInt,
    cofactor: BigInt,
    hard_part_exponent: BigInt,
}

impl CurveConstants {
    /// Build a constant set, rejecting it unless `r` divides `p^4 - p^2 + 1`.
    pub fn new(p: BigInt, r: BigInt, x: BigInt) -> Result<Self, ChainError> {
        let p_squared = &p * &p;
        let cofactor = &p_squared * &p_squared - &p_squared + 1;

        if r.is_zero() {
            return Err(ChainError::InvalidCurveConstants {
                remainder: cofactor,
            });
        }

        let (hard_part_exponent, remainder) = cofactor.div_mod_floor(&r);
        if !remainder.is_zero() {
            return Err(ChainError::InvalidCurveConstants { remainder });
        }

        Ok(Self {
            p,
            r,
            x,
            cofactor,
            hard_part_exponent,
        })
    }

    /// Derive `p` and `r` from a BN seed through the family polynomials
    /// `p(x) = 36x^4 + 36x^3 + 24x^2 + 6x + 1` and
    /// `r(x) = 36x^4 + 36x^3 + 18x^2 + 6x + 1`.
    pub fn from_seed(x: BigInt) -> Result<Self, ChainError> {
        let x2 = &x * &x;
        let x3 = &x2 * &x;
        let x4 = &x3 * &x;
        let common = &x4 * 36 + &x3 * 36 + &x * 6 + 1;
        let p = &common + &x2 * 24;
        let r = &common + &x2 * 18;
        Self::new(p, r, x)
    }

    /// The process-wide BN254 constant set.
    pub fn bn254() -> Result<&'static Self, ChainError> {
        BN254.as_ref().map_err(Clone::clone)
    }

    pub fn p(&self) -> &BigInt {
        &self.p
    }

    pub fn r(&self) -> &BigInt {
        &self.r
    }

    pub fn x(&self) -> &BigInt {
        &self.x
    }

    /// `d = p^4 - p^2 + 1`.
    pub fn cofactor(&self) -> &BigInt {
        &self.cofactor
    }

    /// `d / r`, the exponent of the hard part of the final exponentiation.
    pub fn hard_part_exponent(&self) -> &BigInt {
        &self.hard_part_exponent
    }

    /// `m = 2x(6x^2 + 3x + 1)`, the extra power the Fuentes-Castaneda chain
    /// raises its result to.
    pub fn fuentes_castaneda_multiplier(&self) -> BigInt {
        let x = &self.x;
        let inner = x * x * 6 + x * 3 + 1;
        x * 2 * inner
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_bn254_constants_load() {
        let constants = CurveConstants::bn254().unwrap();

        assert_eq!(constants.x(), &BigInt::from(BN254_SEED));
        assert_eq!(
            constants.p().to_string(),
            "21888242871839275222246405745257275088696311157297823662689037894645226208583"
        );
        assert_eq!(
            constants.r().to_string(),
            "21888242871839275222246405745257275088548364400416034343698204186575808495617"
        );
    }

    #[test]
    fn test_field_moduli_match_seed_polynomials() {
        let from_moduli = CurveConstants::bn254().unwrap();
        let from_seed = CurveConstants::from_seed(BigInt::from(BN254_SEED)).unwrap();

        assert_eq!(from_moduli, &from_seed);
    }

    #[test]
    fn test_hard_part_exponent_divides_exactly() {
        let constants = CurveConstants::bn254().unwrap();

        assert_eq!(
            constants.hard_part_exponent() * constants.r(),
            *constants.cofactor()
        );
        assert!(constants.hard_part_exponent().bits() > 64);
    }

    #[test]
    fn test_fuentes_castaneda_multiplier() {
        let constants = CurveConstants::bn254().unwrap();

        assert_eq!(
            constants.fuentes_castaneda_multiplier().to_string(),
            "1469306990098747947464455738335385361638823152381947992820"
        );
    }

    #[test]
    fn test_signed_digits_recompose_to_seed() {
        assert_eq!(
            signed_digits_value(&BN254_SEED_SIGNED_DIGITS),
            BigInt::from(BN254_SEED)
        );
        assert_eq!(signed_digits_value(&[1, 0, -1]), BigInt::from(3));
        assert_eq!(signed_digits_value(&[]), BigInt::zero());
    }

    #[test]
    fn test_subgroup_order_off_by_one_is_rejected() {
        let constants = CurveConstants::bn254().unwrap();
        let result = CurveConstants::new(
            constants.p().clone(),
            constants.r() + 1,
            constants.x().clone(),
        );

        assert!(matches!(
            result,
            Err(ChainError::InvalidCurveConstants { .. })
        ));
    }

    #[test]
    fn test_zero_subgroup_order_is_rejected() {
        let result = CurveConstants::new(BigInt::from(5), BigInt::zero(), BigInt::from(1));

        assert!(matches!(
            result,
            Err(ChainError::InvalidCurveConstants { .. })
        ));
    }

    proptest! {
        #[test]
        fn perturbed_subgroup_order_is_rejected(delta in 1i64..=200, negate in any::<bool>()) {
            let constants = CurveConstants::bn254().unwrap();
            let delta = if negate { -delta } else { delta };
            let result = CurveConstants::new(
                constants.p().clone(),
                constants.r() + delta,
                constants.x().clone(),
            );

            let rejected = matches!(result, Err(ChainError::InvalidCurveConstants { .. }));
            prop_assert!(rejected);
        }
    }
}
