//! Private Module

use crate::error::{NumericsError, Result, SearchStage};
use crate::LOG_TARGET;
use log::{debug, trace};
use ndarray::NdFloat;

/// Parameters of the bracket-then-bisect line search.
#[derive(Debug, Clone)]
pub struct LineSearchParams<S> {
    /// Derivative tolerance $`\epsilon`$ (default: 1e-6).
    pub tol: S,
    /// Cap on derivative evaluations of each stage (default: 100).
    pub max_iter: usize,
}

impl Default for LineSearchParams<f64> {
    fn default() -> Self {
        LineSearchParams {
            tol: 1e-6,
            max_iter: 100,
        }
    }
}

impl Default for LineSearchParams<f32> {
    fn default() -> Self {
        LineSearchParams {
            tol: 1e-4,
            max_iter: 100,
        }
    }
}

/// Outcome of [`bisection`].
#[derive(Debug, Clone)]
pub struct Bisection<S> {
    /// Accepted step, $`|\phi'(\alpha)| \leq \epsilon`$.
    pub alpha: S,
    /// Brackets $`(\alpha_-, \alpha_+)`$, starting with $`(0, \bar\alpha)`$.
    pub trace: Vec<(S, S)>,
    /// Number of derivative evaluations.
    pub iterations: usize,
}

/// Bracket a stationary point of $`\phi(\alpha) = f(x + \alpha d)`$
///
/// Starting at $`\alpha = 1`$, doubles $`\alpha`$ while
/// $`\phi'(\alpha) \leq -\epsilon`$ and returns the first $`\alpha`$ where
/// the derivative is no longer strongly negative. For a descent direction
/// ($`\phi'(0) < 0`$) a sign change of $`\phi'`$ then lies in
/// $`(0, \alpha]`$.
///
/// Parameters
/// ----------
/// - __dphi:__      derivative oracle $`\alpha \mapsto \phi'(\alpha)`$
/// - __params:__    tolerance $`\epsilon`$ and cap on doublings
///
/// Errors
/// ------
/// [`NumericsError::SearchDidNotConverge`] if $`\phi`$ is still decreasing
/// after `params.max_iter` evaluations.
pub fn find_interval<S: NdFloat>(dphi: impl Fn(S) -> S, params: &LineSearchParams<S>) -> Result<S> {
    let two = S::one() + S::one();
    let mut alpha = S::one();

    for iter in 0..params.max_iter {
        let slope = dphi(alpha);
        trace!(target: LOG_TARGET, "bracketing [{}]: alpha = {:e}, dphi = {:e}", iter, alpha, slope);
        if slope > -params.tol {
            return Ok(alpha);
        }
        alpha = alpha * two;
    }
    debug!(target: LOG_TARGET, "bracketing gave up at alpha = {:e}", alpha);
    Err(NumericsError::SearchDidNotConverge {
        stage: SearchStage::Bracketing,
        iterations: params.max_iter,
    })
}

/// Bisection on the derivative of $`\phi`$ over $`[0, \bar\alpha]`$
///
/// Algorithm
/// ---------
/// ```math
/// \begin{aligned}
/// \alpha &= (\alpha_- + \alpha_+) / 2 \\
/// \alpha_- &\gets \alpha \quad \text{if } \phi'(\alpha) < 0 \\
/// \alpha_+ &\gets \alpha \quad \text{otherwise}
/// \end{aligned}
/// ```
/// until $`|\phi'(\alpha)| \leq \epsilon`$. The bracket keeps
/// $`\phi'(\alpha_-) < 0 \leq \phi'(\alpha_+)`$ and halves every step, so
/// convergence is linear. Every bracket, the initial one included, is
/// recorded in the returned trace.
///
/// Parameters
/// ----------
/// - __dphi:__       derivative oracle $`\alpha \mapsto \phi'(\alpha)`$
/// - __alpha_bar:__  upper end of the bracket, e.g. from [`find_interval`]
/// - __params:__     tolerance $`\epsilon`$ and cap on midpoint evaluations
///
/// Errors
/// ------
/// [`NumericsError::SearchDidNotConverge`] if $`\epsilon`$ is not reached
/// within `params.max_iter` evaluations.
pub fn bisection<S: NdFloat>(
    dphi: impl Fn(S) -> S,
    alpha_bar: S,
    params: &LineSearchParams<S>,
) -> Result<Bisection<S>> {
    let two = S::one() + S::one();
    let (mut lower, mut upper) = (S::zero(), alpha_bar);
    let mut trace = vec![(lower, upper)];

    for iter in 1..=params.max_iter {
        let alpha = (lower + upper) / two;
        let slope = dphi(alpha);
        if slope.abs() <= params.tol {
            trace!(target: LOG_TARGET, "bisection converged in {} steps: alpha = {:e}", iter, alpha);
            return Ok(Bisection {
                alpha,
                trace,
                iterations: iter,
            });
        }
        if slope < S::zero() {
            lower = alpha;
        } else {
            upper = alpha;
        }
        trace.push((lower, upper));
    }
    debug!(target: LOG_TARGET, "bisection gave up on [{:e}, {:e}]", lower, upper);
    Err(NumericsError::SearchDidNotConverge {
        stage: SearchStage::Bisection,
        iterations: params.max_iter,
    })
}

/// Inexact line search: [`find_interval`] followed by [`bisection`].
pub fn line_search<S: NdFloat>(
    dphi: impl Fn(S) -> S,
    params: &LineSearchParams<S>,
) -> Result<Bisection<S>> {
    let alpha_bar = find_interval(&dphi, params)?;
    bisection(&dphi, alpha_bar, params)
}
