//! The `ndarray-numerics` crate provides two classical numerical kernels
//! for `ndarray`s:
//!
//! - Steepest descent, with an exact line search for quadratic objectives
//!   and a bracketing + bisection line search for general smooth ones
//!   ([`smooth`])
//! - Householder reflectors and the QR factorizations built from them
//!   ([`householder`])
//!
//! Every routine borrows its inputs as views and returns freshly allocated
//! results, including the trace of iterates where one is recorded.
//! Invalid inputs (mismatched shapes, a non-symmetric quadratic form, a
//! line search that never converges) are reported through
//! [`error::NumericsError`]; running out of iterations is not an error and
//! is reported through [`smooth::Termination`] instead.
//!
//! Progress is logged through the [`log`](https://docs.rs/log) facade under
//! the `ndarray_numerics` target.

#![cfg_attr(all(rustc_nightly, test), feature(test))]
#[cfg(all(rustc_nightly, test))]
extern crate test;

#[cfg(test)]
extern crate intel_mkl_src;

pub mod derivative;
pub mod error;
pub mod householder;
pub mod smooth;

pub(crate) const LOG_TARGET: &str = "ndarray_numerics";
