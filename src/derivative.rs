//! Numeric Derivative Oracles
//!
//! The line searches only need a way to evaluate $`\phi'(\alpha)`$ and the
//! descent solvers a way to evaluate $`\nabla f(x)`$. When no analytic
//! derivative is at hand these central-difference oracles can stand in,
//! at the price of roughly $`\sqrt[3]{\epsilon_\mathrm{mach}}`$ relative
//! accuracy, so pair them with a correspondingly loose line search
//! tolerance.

use finitediff::FiniteDiff;
use ndarray::prelude::*;

/// Derivative oracle $`\alpha \mapsto \phi'(\alpha)`$ of a scalar function.
pub fn central_difference(phi: impl Fn(f64) -> f64) -> impl Fn(f64) -> f64 {
    move |alpha| {
        let at = vec![alpha];
        at.central_diff(&|a: &Vec<f64>| phi(a[0]))[0]
    }
}

/// Gradient oracle $`x \mapsto \nabla f(x)`$ of a scalar field.
pub fn numeric_gradient(
    f: impl Fn(ArrayView1<f64>) -> f64,
) -> impl Fn(ArrayView1<f64>) -> Array1<f64> {
    move |x| {
        let at = x.to_vec();
        Array1::from(at.central_diff(&|v: &Vec<f64>| f(aview1(v))))
    }
}
