//! Steepest Descent Methods for Smooth Minimization
//!
//! For minimizing a differentiable objective $`f`$ by moving along the
//! steepest-descent direction $`d = -\nabla f(x)`$,
//! ```math
//! x_{i+1} = x_i + \alpha_i d_i, \quad
//! \alpha_i \approx \mathrm{arg}\!\min_{\alpha > 0} \phi_i(\alpha) = f(x_i + \alpha d_i)
//! ```
//! the methods here differ in how the step $`\alpha_i`$ is chosen:
//! - [`quadratic_steepest_descent`]: for $`f(x) = \frac12 x^TQx + q^Tx`$ the
//!   exact minimizer of $`\phi_i`$ is available in closed form.
//! - [`steepest_descent`]: for a general $`f`$, [`line_search`] brackets
//!   a stationary point of $`\phi_i`$ by doubling ([`find_interval`]) and
//!   refines it by [`bisection`] on $`\phi_i'`$.
//!
//! The line search only ever sees a derivative oracle
//! $`\alpha \mapsto \phi'(\alpha)`$, passed as an argument; see
//! [`crate::derivative`] for finite-difference oracles.
//!
//! For more info, see [Gradient descent on Wikipedia](https://en.wikipedia.org/wiki/Gradient_descent)

mod gd;
pub use gd::*;
mod search;
pub use search::*;
mod quadratic;
pub use quadratic::*;

use ndarray::prelude::*;
use std::fmt;

/// Do nothing function for optional user callback (returns false)
#[allow(clippy::needless_pass_by_value)]
pub fn nop<T, D>(_x: ArrayView<T, D>, _itr: usize) -> bool {
    false
}

/// Why a descent solver stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// Gradient norm fell below tolerance.
    Converged,
    /// No curvature along the descent direction; the last iterate is a
    /// best-effort result.
    DegenerateCurvature,
    /// Reached the maximum number of iterations.
    MaxIterations,
    /// The user callback asked to stop.
    Callback,
}

impl fmt::Display for Termination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Termination::Converged => write!(f, "gradient norm below tolerance"),
            Termination::DegenerateCurvature => write!(f, "no curvature along descent direction"),
            Termination::MaxIterations => write!(f, "maximum iterations reached"),
            Termination::Callback => write!(f, "stopped by callback"),
        }
    }
}

/// Result of a descent run.
#[derive(Debug, Clone)]
pub struct Descent<S> {
    /// Final iterate.
    pub x: Array1<S>,
    /// Every iterate in order, starting with the initial guess.
    pub trace: Vec<Array1<S>>,
    /// Number of updates performed.
    pub iterations: usize,
    /// Norm of the gradient at `x`.
    pub grad_norm: S,
    pub termination: Termination,
}
