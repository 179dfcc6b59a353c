use super::{line_search, Descent, LineSearchParams, Termination};
use crate::error::{check_len, Result};
use crate::LOG_TARGET;
use log::{debug, trace, warn};
use ndarray::prelude::*;
use ndarray::NdFloat; // includes LinalgScalar and ScalarOperand

/// Parameters for [`steepest_descent`].
#[derive(Debug, Clone)]
pub struct DescentParams<S> {
    /// Gradient norm tolerance: stop when `||grad f(x)|| <= tol` (default: 1e-6).
    pub tol: S,
    /// Maximum number of outer iterations (default: 1000).
    pub max_iter: usize,
    /// Inner bracket-then-bisect search.
    pub line_search: LineSearchParams<S>,
}

impl Default for DescentParams<f64> {
    fn default() -> Self {
        DescentParams {
            tol: 1e-6,
            max_iter: 1000,
            line_search: LineSearchParams::default(),
        }
    }
}

impl Default for DescentParams<f32> {
    fn default() -> Self {
        DescentParams {
            tol: 1e-4,
            max_iter: 1000,
            line_search: LineSearchParams::default(),
        }
    }
}

/// Steepest Descent with a Bracketing + Bisection Line Search
///
/// Also known as the gradient method with an (inexact) exact line search.
///
/// Algorithm
/// ---------
/// ```math
/// \begin{aligned}
/// d_i &= -\nabla f(x_i) \\
/// \alpha_i &\approx \mathrm{arg}\!\min_{\alpha > 0} f(x_i + \alpha d_i ) \\
/// x_{i+1} &= x_i + \alpha_i d_i
/// \end{aligned}
/// ```
/// The step comes from [`line_search`] on the directional derivative
/// $`\phi'(\alpha) = d_i^T \nabla f(x_i + \alpha d_i)`$, normalized by
/// $`\|d_i\|_2^2`$ so that $`\phi'(0) = -1`$ and the line search
/// tolerance is relative.
///
/// Parameters
/// ----------
/// - __grad:__      function that computes gradient g(x) of the cost function
/// - __x0:__        initial guess
/// - __params:__    outer tolerance, iteration cap and line search parameters
/// - __callback:__  User-defined function to be evaluated with two arguments (x,iter).
///                   It is evaluated at (x0,0) and then after each iteration.
///                   If it returns True, the function terminates early.
///
/// Errors
/// ------
/// - [`NumericsError::ShapeMismatch`](crate::error::NumericsError::ShapeMismatch)
///   if `grad` returns a vector of the wrong length
/// - [`NumericsError::SearchDidNotConverge`](crate::error::NumericsError::SearchDidNotConverge)
///   propagated from the line search
pub fn steepest_descent<S: NdFloat>(
    grad: impl Fn(ArrayView1<S>) -> Array1<S>,
    x0: ArrayView1<S>,
    params: &DescentParams<S>,
    mut callback: impl FnMut(ArrayView1<S>, usize) -> bool,
) -> Result<Descent<S>> {
    let mut x = x0.to_owned();
    let mut trace = vec![x.clone()];
    let mut g = grad(x.view());
    check_len("gradient", x.len(), g.len())?;

    let mut iter = 0;
    let termination = if callback(x.view(), 0) {
        Termination::Callback
    } else {
        loop {
            let g_norm2 = g.dot(&g);
            trace!(target: LOG_TARGET, "steepest descent [{}]: |g| = {:e}", iter, g_norm2.sqrt());
            if g_norm2.sqrt() <= params.tol {
                break Termination::Converged;
            }
            if iter == params.max_iter {
                warn!(target: LOG_TARGET, "steepest descent hit the iteration cap");
                break Termination::MaxIterations;
            }

            let dir = g.mapv(|gi| -gi);
            let step = line_search(
                |alph| dir.dot(&grad((&dir * alph + &x).view())) / g_norm2,
                &params.line_search,
            )?
            .alpha;

            x.scaled_add(step, &dir);
            trace.push(x.clone());
            iter += 1;
            g = grad(x.view());
            if callback(x.view(), iter) {
                break Termination::Callback;
            }
        }
    };

    debug!(
        target: LOG_TARGET,
        "steepest descent stopped after {} iterations: {}", iter, termination
    );
    Ok(Descent {
        grad_norm: g.dot(&g).sqrt(),
        x,
        trace,
        iterations: iter,
        termination,
    })
}

#[allow(non_snake_case)]
#[cfg(test)]
mod tests {
    use super::*;
    use crate::derivative::numeric_gradient;
    use crate::error::{NumericsError, SearchStage};
    use crate::smooth::nop;
    use approx::assert_abs_diff_eq;

    #[test]
    fn steepest_descent_regression() {
        // f(x) = 1/2 |Ax - y|^2
        let A = array![[10., 0.], [0., 20.]];
        let y = array![50., 100.];
        let x0 = array![19., 44.];
        let res = steepest_descent(
            |x| A.t().dot(&(A.dot(&x) - &y)),
            x0.view(),
            &DescentParams::default(),
            nop,
        )
        .unwrap();
        assert_eq!(res.termination, Termination::Converged);
        assert_abs_diff_eq!(res.x, array![5., 5.], epsilon = 1e-6);
        assert_eq!(res.trace[0], x0);
        assert_eq!(res.trace.len(), res.iterations + 1);
    }

    #[test]
    fn non_quadratic_objective() {
        // f(x) = exp(x_0) - x_0 + (x_1 - 1)^2, minimized at (0, 1)
        let grad = |x: ArrayView1<f64>| array![x[0].exp() - 1., 2. * (x[1] - 1.)];
        let res = steepest_descent(grad, array![1.5, -2.].view(), &DescentParams::default(), nop)
            .unwrap();
        assert_eq!(res.termination, Termination::Converged);
        assert_abs_diff_eq!(res.x, array![0., 1.], epsilon = 1e-5);
    }

    #[test]
    fn finite_difference_gradient() {
        let f = |x: ArrayView1<f64>| (x[0] - 2.).powi(2) + 3. * (x[1] + 1.).powi(2) + x[0] * x[1];
        // finite differences are noisy, so only ask for a coarse line search
        let params = DescentParams {
            tol: 1e-4,
            max_iter: 1000,
            line_search: LineSearchParams {
                tol: 1e-2,
                max_iter: 100,
            },
        };
        let res = steepest_descent(numeric_gradient(f), array![0., 0.].view(), &params, nop).unwrap();
        // 2(x0 - 2) + x1 = 0, 6(x1 + 1) + x0 = 0
        let x_star = array![30. / 11., -16. / 11.];
        assert_abs_diff_eq!(res.x, x_star, epsilon = 1e-4);
    }

    #[test]
    fn callback_stops_early() {
        let A = array![[10., 0.], [0., 20.]];
        let y = array![50., 100.];
        let mut seen = Vec::new();
        let res = steepest_descent(
            |x| A.t().dot(&(A.dot(&x) - &y)),
            array![19., 44.].view(),
            &DescentParams::default(),
            |x, iter| {
                seen.push((iter, x.to_owned()));
                iter == 2
            },
        )
        .unwrap();
        assert_eq!(res.termination, Termination::Callback);
        assert_eq!(res.iterations, 2);
        assert_eq!(seen.len(), 3);
        assert_eq!(seen[0], (0, array![19., 44.]));
        assert_eq!(seen[2].1, res.x);
    }

    #[test]
    fn iteration_cap() {
        let params = DescentParams {
            max_iter: 2,
            ..DescentParams::default()
        };
        let res = steepest_descent(
            |x| array![x[0], 50. * x[1]],
            array![50., 1.].view(),
            &params,
            nop,
        )
        .unwrap();
        assert_eq!(res.termination, Termination::MaxIterations);
        assert_eq!(res.trace.len(), 3);
    }

    #[test]
    fn unbounded_objective_fails() {
        // f(x) = -x_0, so every step keeps decreasing
        let params = DescentParams {
            line_search: LineSearchParams {
                tol: 1e-6,
                max_iter: 30,
            },
            ..DescentParams::default()
        };
        let err = steepest_descent(|_x| array![-1.], array![0.].view(), &params, nop).unwrap_err();
        assert_eq!(
            err,
            NumericsError::SearchDidNotConverge {
                stage: SearchStage::Bracketing,
                iterations: 30,
            }
        );
    }

    #[test]
    fn gradient_shape_checked() {
        let err = steepest_descent(|_x| array![1., 2., 3.], array![0., 0.].view(), &DescentParams::default(), nop)
            .unwrap_err();
        assert_eq!(
            err,
            NumericsError::ShapeMismatch {
                what: "gradient",
                expected: 2,
                found: 3
            }
        );
    }
}
