#![warn(clippy::all)]

//! hardpart-chain: Symbolic Verification of BN254 Hard-Part Addition Chains
//!
//! The final exponentiation of the optimal-ate pairing on BN254 raises its
//! input to `(p^12 - 1) / r`. The "hard part" of that power,
//! `(p^4 - p^2 + 1) / r`, is computed by short chains of cheap operations
//! (exponentiation by the seed `x`, multiplication, squaring, conjugation and
//! Frobenius maps). This crate replays such chains over exponents instead of
//! field elements and proves that they compute the intended power.
//!
//! # Architecture
//!
//! - [`constants`]: the BN254 parameters `p`, `r`, `x` and derived exponents
//! - [`ops`]: the chain model (operations, registers, targets, cost counts)
//! - [`methods`]: the Devegili, Fuentes-Castaneda and naive chains
//! - [`verifier`]: the symbolic replay and degeneracy diagnostics
//! - [`report`]: per-method reports, parallel checking and export

pub mod constants;
pub mod error;
pub mod methods;
pub mod ops;
pub mod report;
pub mod verifier;

pub use constants::{CurveConstants, BN254_SEED, BN254_SEED_SIGNED_DIGITS};
pub use error::{ChainError, ReportError};
pub use methods::HardPartMethod;
pub use ops::{Chain, OpCounts, Operation, Register, Target};
pub use report::{check_method, check_methods, MethodReport};
pub use verifier::{verify, DegenerateIntermediate, SymbolicExecutor, Trace, Verification};
