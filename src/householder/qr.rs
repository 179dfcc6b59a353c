//! Private Module

use super::Reflector;
use crate::error::{check_len, NumericsError, Result};
use crate::LOG_TARGET;
use log::debug;
use ndarray::prelude::*;
use ndarray::NdFloat;
use ndarray_linalg::operator::LinearOperator;
use ndarray_linalg::Scalar;

fn square_dim<A>(a: &ArrayView2<A>) -> Result<usize> {
    check_len("matrix columns", a.nrows(), a.ncols())?;
    Ok(a.nrows())
}

/// Naive Householder QR
///
/// Reference version of the factorization: every reflector is embedded in a
/// full $`n \times n`$ identity and applied with dense products,
/// ```math
/// \begin{aligned}
/// Q_i &= \begin{pmatrix} I_i & 0 \\ 0 & H_i \end{pmatrix} \\
/// R &\gets Q_i R \\
/// Q &\gets Q Q_i
/// \end{aligned}
/// ```
/// starting from $`R = A`$, $`Q = I`$, where $`H_i`$ reflects
/// $`R_{i:n,i}`$ onto the first axis. This costs $`O(n^4)`$ and exists as
/// a baseline for [`qr_fast`].
///
/// Rank deficient columns are not special cased; an active column that is
/// already zero below the diagonal, with a nonnegative diagonal, yields the
/// identity reflector and is left as is.
///
/// Errors
/// ------
/// [`NumericsError::ShapeMismatch`] if `a` is not square.
pub fn qr_naive<A>(a: ArrayView2<A>) -> Result<(Array2<A>, Array2<A>)>
where
    A: NdFloat + Scalar,
{
    let n = square_dim(&a)?;
    let mut r = a.to_owned();
    let mut q = Array2::eye(n);

    for i in 0..n {
        let reflector = Reflector::new(r.slice(s![i.., i]))?;
        let qi = reflector.embedded(n)?;
        r = qi.dot(&r);
        q = q.dot(&qi);
    }
    debug!(target: LOG_TARGET, "naive QR of {0}x{0} matrix done", n);
    Ok((q, r))
}

/// Householder QR updating only the trailing block
///
/// Produces the same $`(Q, R)`$ as [`qr_naive`] in $`O(n^3)`$. At step
/// $`i`$ the eliminated column is written directly,
/// $`R_{i,i} = s_i`$ and $`R_{i+1:n,i} = 0`$ with $`s_i`$ the reflector's
/// target, and only the trailing block is updated through
/// ```math
/// M \gets M - 2u(u^TM), \quad M = R_{i:n,\,i+1:n}
/// ```
/// The same expansion accumulates $`Q`$ on its trailing columns,
/// $`Q_{:,i:n} \gets Q_{:,i:n} - 2(Q_{:,i:n}u)u^T`$,
/// so no $`Q_i`$ is ever materialized.
///
/// Errors
/// ------
/// [`NumericsError::ShapeMismatch`] if `a` is not square.
pub fn qr_fast<A>(a: ArrayView2<A>) -> Result<(Array2<A>, Array2<A>)>
where
    A: NdFloat + Scalar,
{
    let n = square_dim(&a)?;
    let mut r = a.to_owned();
    let mut q = Array2::eye(n);

    for i in 0..n {
        let reflector = eliminate_column(&mut r, i)?;
        // Q H = (H Q^T)^T on the trailing columns
        reflector.apply2_mut(&mut q.slice_mut(s![.., i..]).reversed_axes());
    }
    debug!(target: LOG_TARGET, "fast QR of {0}x{0} matrix done", n);
    Ok((q, r))
}

/// One step of the trailing-block update, returning the reflector used.
fn eliminate_column<A>(r: &mut Array2<A>, i: usize) -> Result<Reflector<A>>
where
    A: NdFloat + Scalar,
{
    let n = r.nrows();
    let reflector = Reflector::new(r.slice(s![i.., i]))?;
    r[[i, i]] = reflector.target();
    r.slice_mut(s![i + 1.., i]).fill(A::zero());
    if i + 1 < n {
        reflector.apply_checked(&mut r.slice_mut(s![i.., i + 1..]))?;
    }
    Ok(reflector)
}

/// Householder QR with $`Q`$ kept in factored form
///
/// Stores the reflectors $`H_0, \dots, H_{n-1}`$ (one per column, indexed
/// by step) and the upper-triangular $`R`$. $`Q = Q_0 Q_1 \cdots Q_{n-1}`$
/// is only expanded by [`HouseholderQr::q`]; [`HouseholderQr::apply_qt`]
/// and [`HouseholderQr::solve`] work directly from the reflectors.
#[derive(Debug, Clone)]
pub struct HouseholderQr<A> {
    reflectors: Vec<Reflector<A>>,
    r: Array2<A>,
}

impl<A> HouseholderQr<A>
where
    A: NdFloat + Scalar,
{
    /// Factor the square matrix `a`.
    pub fn new(a: ArrayView2<A>) -> Result<HouseholderQr<A>> {
        let n = square_dim(&a)?;
        let mut r = a.to_owned();
        let mut reflectors = Vec::with_capacity(n);
        for i in 0..n {
            reflectors.push(eliminate_column(&mut r, i)?);
        }
        Ok(HouseholderQr { reflectors, r })
    }

    pub fn dim(&self) -> usize {
        self.r.nrows()
    }

    pub fn r(&self) -> ArrayView2<'_, A> {
        self.r.view()
    }

    /// Reflector of step `i` acts on rows `i..n`.
    pub fn reflectors(&self) -> &[Reflector<A>] {
        &self.reflectors
    }

    /// Expand the orthogonal factor.
    pub fn q(&self) -> Array2<A> {
        let mut q = Array2::eye(self.dim());
        for (i, reflector) in self.reflectors.iter().enumerate() {
            reflector.apply2_mut(&mut q.slice_mut(s![.., i..]).reversed_axes());
        }
        q
    }

    /// Compute $`Q^Tb`$ without forming $`Q`$.
    pub fn apply_qt(&self, b: ArrayView1<A>) -> Result<Array1<A>> {
        check_len("right-hand side", self.dim(), b.len())?;
        let mut y = b.to_owned();
        for (i, reflector) in self.reflectors.iter().enumerate() {
            reflector.apply_mut(&mut y.slice_mut(s![i..]));
        }
        Ok(y)
    }

    /// Solve $`Ax = b`$ by back substitution on $`Rx = Q^Tb`$.
    ///
    /// Errors
    /// ------
    /// - [`NumericsError::ShapeMismatch`] if `b` has the wrong length
    /// - [`NumericsError::Singular`] on an exactly zero diagonal entry of $`R`$
    pub fn solve(&self, b: ArrayView1<A>) -> Result<Array1<A>> {
        let mut x = self.apply_qt(b)?;
        for i in (0..self.dim()).rev() {
            let pivot = self.r[[i, i]];
            if pivot == A::zero() {
                return Err(NumericsError::Singular { index: i });
            }
            let tail = self.r.slice(s![i, i + 1..]).dot(&x.slice(s![i + 1..]));
            x[i] = (x[i] - tail) / pivot;
        }
        Ok(x)
    }

    /// Expand into the dense pair $`(Q, R)`$.
    pub fn into_qr(self) -> (Array2<A>, Array2<A>) {
        let q = self.q();
        (q, self.r)
    }
}

#[allow(non_snake_case)]
#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray_linalg::norm::Norm;
    use ndarray_rand::rand_distr::Normal;
    use ndarray_rand::RandomExt;

    fn assert_factorization(A: &Array2<f64>, Q: &Array2<f64>, R: &Array2<f64>) {
        let n = A.nrows();
        let I = Array2::<f64>::eye(n);
        assert!((&Q.dot(R) - A).norm_l2() < 1e-10);
        assert!((&Q.t().dot(Q) - &I).norm_l2() < 1e-10);
        for i in 0..n {
            for j in 0..i {
                assert_abs_diff_eq!(R[[i, j]], 0., epsilon = 1e-10);
            }
        }
    }

    #[test]
    fn identity_3x3() {
        let A = Array2::<f64>::eye(3);
        for (Q, R) in vec![
            qr_naive(A.view()).unwrap(),
            qr_fast(A.view()).unwrap(),
            HouseholderQr::new(A.view()).unwrap().into_qr(),
        ] {
            assert_abs_diff_eq!(Q, A, epsilon = 1e-15);
            assert_abs_diff_eq!(R, A, epsilon = 1e-15);
        }
    }

    #[test]
    fn upper_triangular_input_is_kept() {
        let A = array![[2., 1., -1.], [0., 3., 4.], [0., 0., 5.]];
        for (Q, R) in vec![qr_naive(A.view()).unwrap(), qr_fast(A.view()).unwrap()] {
            assert_abs_diff_eq!(Q, Array2::<f64>::eye(3), epsilon = 1e-15);
            assert_abs_diff_eq!(R, A, epsilon = 1e-15);
        }
    }

    #[test]
    fn extreme_magnitudes_stay_finite() {
        for &scale in &[1e200, 1e-170] {
            let A = array![[3., 1.], [4., 2.]];
            let (Q, R) = qr_fast((&A * scale).view()).unwrap();
            assert!(Q.iter().chain(R.iter()).all(|v| v.is_finite()));
            assert_factorization(&A, &Q, &(&R / scale));
            assert_abs_diff_eq!(R[[0, 0]] / scale, -5., epsilon = 1e-12);
        }
    }

    #[test]
    fn naive_and_fast_agree() {
        let n = 7;
        let A = Array::random((n, n), Normal::new(0., 1.).unwrap());
        let (Qn, Rn) = qr_naive(A.view()).unwrap();
        let (Qf, Rf) = qr_fast(A.view()).unwrap();
        assert_factorization(&A, &Qn, &Rn);
        assert_factorization(&A, &Qf, &Rf);
        assert_abs_diff_eq!(Qn, Qf, epsilon = 1e-10);
        assert_abs_diff_eq!(Rn, Rf, epsilon = 1e-10);
    }

    #[test]
    fn diagonal_sign_follows_reflector() {
        let A = array![[-2., 1., 0.], [0., 3., 1.], [0., 4., 5.]];
        let (_Q, R) = qr_fast(A.view()).unwrap();
        // negative leading entry keeps its norm positive, then 5 = |(3, 4)|
        assert_abs_diff_eq!(R[[0, 0]], 2., epsilon = 1e-14);
        assert_abs_diff_eq!(R[[1, 1]], -5., epsilon = 1e-14);
        let (_Q, Rn) = qr_naive(A.view()).unwrap();
        assert_abs_diff_eq!(R, Rn, epsilon = 1e-13);
    }

    #[test]
    fn rank_deficient_column() {
        let A = array![[0., 1.], [0., 2.]];
        for (Q, R) in vec![qr_naive(A.view()).unwrap(), qr_fast(A.view()).unwrap()] {
            assert_factorization(&A, &Q, &R);
            assert_eq!(R[[0, 0]], 0.);
        }
    }

    #[test]
    fn non_square_rejected() {
        let A = Array2::<f64>::zeros((3, 2));
        let err = NumericsError::ShapeMismatch {
            what: "matrix columns",
            expected: 3,
            found: 2,
        };
        assert_eq!(qr_naive(A.view()).unwrap_err(), err);
        assert_eq!(qr_fast(A.view()).unwrap_err(), err);
        assert!(HouseholderQr::new(A.view()).is_err());
    }

    #[test]
    fn implicit_q_matches_dense() {
        let n = 6;
        let A = Array::random((n, n), Normal::new(0., 2.).unwrap());
        let qr = HouseholderQr::new(A.view()).unwrap();
        let (Qf, Rf) = qr_fast(A.view()).unwrap();
        assert_eq!(qr.reflectors().len(), n);
        assert_abs_diff_eq!(qr.q(), Qf, epsilon = 1e-12);
        assert_abs_diff_eq!(qr.r(), Rf, epsilon = 1e-12);

        let b = Array::random((n,), Normal::new(0., 1.).unwrap());
        assert_abs_diff_eq!(qr.apply_qt(b.view()).unwrap(), Qf.t().dot(&b), epsilon = 1e-12);
    }

    #[test]
    fn solve_linear_system() {
        let n = 5;
        let A = Array::random((n, n), Normal::new(0., 1.).unwrap()) + Array2::<f64>::eye(n) * 10.;
        let x_true = Array::random((n,), Normal::new(0., 1.).unwrap());
        let b = A.dot(&x_true);
        let x = HouseholderQr::new(A.view()).unwrap().solve(b.view()).unwrap();
        assert_abs_diff_eq!(x, x_true, epsilon = 1e-10);
    }

    #[test]
    fn solve_errors() {
        let qr = HouseholderQr::new(array![[0., 1.], [0., 2.]].view()).unwrap();
        assert_eq!(
            qr.solve(array![1., 1.].view()),
            Err(NumericsError::Singular { index: 0 })
        );
        assert!(qr.solve(array![1., 1., 1.].view()).is_err());
    }
}

#[cfg(all(rustc_nightly, test))]
mod benches {
    use super::*;
    use ndarray_rand::rand_distr::Normal;
    use ndarray_rand::RandomExt;
    use test::Bencher;

    #[bench]
    fn bench_qr_naive_32(b: &mut Bencher) {
        let a = Array::random((32, 32), Normal::new(0., 1.).unwrap());
        b.iter(|| qr_naive(a.view()));
    }

    #[bench]
    fn bench_qr_fast_32(b: &mut Bencher) {
        let a = Array::random((32, 32), Normal::new(0., 1.).unwrap());
        b.iter(|| qr_fast(a.view()));
    }
}
