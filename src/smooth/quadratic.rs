#![allow(non_snake_case)]

use super::{Descent, Termination};
use crate::error::{check_len, NumericsError, Result};
use crate::LOG_TARGET;
use log::{debug, trace, warn};
use ndarray::prelude::*;
use ndarray::NdFloat;

/// Parameters for [`quadratic_steepest_descent`].
#[derive(Debug, Clone)]
pub struct QuadraticParams<S> {
    /// Gradient norm tolerance: stop when `||Qx + q|| <= tol` (default: 1e-6).
    pub tol: S,
    /// Maximum number of updates (default: 1000).
    pub max_iter: usize,
    /// Curvature $`g^TQg`$ at or below which the direction counts as flat (default: 1e-12).
    pub curvature_tol: S,
}

impl Default for QuadraticParams<f64> {
    fn default() -> Self {
        QuadraticParams {
            tol: 1e-6,
            max_iter: 1000,
            curvature_tol: 1e-12,
        }
    }
}

impl Default for QuadraticParams<f32> {
    fn default() -> Self {
        QuadraticParams {
            tol: 1e-4,
            max_iter: 1000,
            curvature_tol: 1e-12,
        }
    }
}

fn check_symmetric<S: NdFloat>(Q: &ArrayView2<S>) -> Result<()> {
    for ((row, col), &v) in Q.indexed_iter() {
        if col > row && v != Q[[col, row]] {
            return Err(NumericsError::NotSymmetric { row, col });
        }
    }
    Ok(())
}

/// Steepest Descent with Exact Line Search for Quadratics
///
/// Minimizes $`f(x) = \frac12 x^TQx + q^Tx`$ for symmetric positive
/// semi-definite $`Q`$. Along the steepest-descent ray the restriction
/// $`\phi(\alpha) = f(x - \alpha g)`$ is a 1D quadratic, so its minimizer
/// is known in closed form.
///
/// Algorithm
/// ---------
/// ```math
/// \begin{aligned}
/// g_i &= Qx_i + q \\
/// \alpha_i &= \frac{\|g_i\|_2^2}{g_i^TQg_i} \\
/// x_{i+1} &= x_i - \alpha_i g_i
/// \end{aligned}
/// ```
/// Stops when $`\|g_i\|_2 \leq \epsilon`$, when $`g_i^TQg_i`$ drops to
/// `curvature_tol` (the objective is flat or unbounded along the ray; the
/// current point is returned as is), or after `max_iter` updates. Only the
/// first is [`Termination::Converged`]; none of them is an error.
///
/// Parameters
/// ----------
/// - __Q:__         symmetric PSD matrix of the quadratic form
/// - __q:__         linear term
/// - __x0:__        initial guess, first entry of the trace
/// - __params:__    tolerances and iteration cap
///
/// Errors
/// ------
/// - [`NumericsError::ShapeMismatch`] if `Q`, `q` and `x0` disagree in size
/// - [`NumericsError::NotSymmetric`] if $`Q \neq Q^T`$
///
/// Both are reported before the first iteration.
pub fn quadratic_steepest_descent<S: NdFloat>(
    Q: ArrayView2<S>,
    q: ArrayView1<S>,
    x0: ArrayView1<S>,
    params: &QuadraticParams<S>,
) -> Result<Descent<S>> {
    let n = x0.len();
    check_len("quadratic form rows", n, Q.nrows())?;
    check_len("quadratic form columns", n, Q.ncols())?;
    check_len("linear term", n, q.len())?;
    check_symmetric(&Q)?;

    let mut x = x0.to_owned();
    let mut trace = vec![x.clone()];
    let mut iter = 0;

    let (termination, grad_norm) = loop {
        let g = Q.dot(&x) + &q;
        let g_norm2 = g.dot(&g);
        let g_norm = g_norm2.sqrt();
        trace!(target: LOG_TARGET, "quadratic descent [{}]: |g| = {:e}", iter, g_norm);
        if g_norm <= params.tol {
            break (Termination::Converged, g_norm);
        }
        if iter == params.max_iter {
            warn!(target: LOG_TARGET, "quadratic descent hit the iteration cap with |g| = {:e}", g_norm);
            break (Termination::MaxIterations, g_norm);
        }

        let curvature = g.dot(&Q.dot(&g));
        if curvature <= params.curvature_tol {
            warn!(
                target: LOG_TARGET,
                "no curvature along the gradient (g'Qg = {:e}), returning current iterate", curvature
            );
            break (Termination::DegenerateCurvature, g_norm);
        }

        let step = g_norm2 / curvature;
        x.scaled_add(-step, &g);
        trace.push(x.clone());
        iter += 1;
    };

    debug!(
        target: LOG_TARGET,
        "quadratic descent stopped after {} iterations: {}", iter, termination
    );
    Ok(Descent {
        x,
        trace,
        iterations: iter,
        grad_norm,
        termination,
    })
}
