//! Private Module

use crate::error::{check_len, NumericsError, Result};
use crate::LOG_TARGET;
use log::trace;
use ndarray::prelude::*;
use ndarray::{Data, DataMut, DataOwned, NdFloat};
use ndarray_linalg::operator::LinearOperator;
use ndarray_linalg::Scalar;
use num_traits::Float;

/// Householder Reflector
///
/// Stores the unit generating vector $`u`$ of the reflection
/// ```math
/// H = I - 2uu^T
/// ```
/// together with the target entry $`s`$, so that $`Hx = (s, 0, \dots, 0)^T`$
/// for the vector $`x`$ it was built from. $`H`$ is orthogonal, symmetric
/// and its own inverse, so it is only ever materialized on request;
/// applying it goes through [`LinearOperator`] in $`O(n)`$ per column.
#[derive(Debug, Clone, PartialEq)]
pub struct Reflector<A> {
    u: Array1<A>,
    target: A,
}

impl<A> Reflector<A>
where
    A: NdFloat + Scalar,
{
    /// Build the reflector mapping `x` onto $`(s, 0, \dots, 0)`$.
    ///
    /// A vector already of the form $`(\|x\|_2, 0, \dots, 0)`$ (the zero
    /// vector included) is its own target; the identity reflector with a zero
    /// generating vector and $`s = x_1`$ is returned. Otherwise the sign of
    /// $`s = \pm\|x\|_2`$ is chosen opposite to $`x_1`$
    /// ($`s = -\|x\|_2`$ when $`x_1 \geq 0`$) so that forming $`v = x - y`$
    /// never cancels.
    ///
    /// Norms are taken on $`x / \max_i |x_i|`$, so entries far outside
    /// $`\sqrt{\text{range}}`$ of `A` neither overflow nor flush to zero.
    ///
    /// Errors
    /// ------
    /// [`NumericsError::EmptyInput`] for a zero-length `x`.
    pub fn new(x: ArrayView1<A>) -> Result<Reflector<A>> {
        if x.is_empty() {
            return Err(NumericsError::EmptyInput {
                what: "reflector input vector",
            });
        }
        if x[0] >= A::zero() && x.iter().skip(1).all(|&xi| xi == A::zero()) {
            trace!(target: LOG_TARGET, "vector already on the first axis, using the identity");
            return Ok(Reflector {
                u: Array1::zeros(x.len()),
                target: x[0],
            });
        }

        let scale = x.fold(A::zero(), |m, &xi| Float::max(m, Float::abs(xi)));
        let mut v = x.mapv(|xi| xi / scale);
        let norm = Float::sqrt(v.dot(&v));
        let sign = if v[0] >= A::zero() { -A::one() } else { A::one() };
        v[0] = v[0] - sign * norm;
        let v_norm = Float::sqrt(v.dot(&v));
        v /= v_norm;
        Ok(Reflector {
            u: v,
            target: sign * norm * scale,
        })
    }

    /// Dimension $`n`$ of the reflection.
    pub fn dim(&self) -> usize {
        self.u.len()
    }

    /// Unit generating vector $`u`$ (zero for the identity reflector).
    pub fn vector(&self) -> ArrayView1<'_, A> {
        self.u.view()
    }

    /// First entry $`s`$ of the image $`Hx`$.
    pub fn target(&self) -> A {
        self.target
    }

    pub fn is_identity(&self) -> bool {
        self.u.iter().all(|&ui| ui == A::zero())
    }

    /// Dense $`H = I - 2uu^T`$.
    pub fn matrix(&self) -> Array2<A> {
        let two = A::one() + A::one();
        let mut h = Array2::eye(self.dim());
        let u_col = self.u.view().insert_axis(Axis(1));
        let u_row = self.u.view().insert_axis(Axis(0));
        h.scaled_add(-two, &u_col.dot(&u_row));
        h
    }

    /// $`H`$ placed in the lower-right corner of an $`n \times n`$ identity.
    pub fn embedded(&self, n: usize) -> Result<Array2<A>> {
        let k = self.dim();
        if k > n {
            return Err(NumericsError::ShapeMismatch {
                what: "embedding size",
                expected: k,
                found: n,
            });
        }
        let mut q = Array2::eye(n);
        q.slice_mut(s![n - k.., n - k..]).assign(&self.matrix());
        Ok(q)
    }

    /// Apply $`H`$ in place to every column of `a`, checking that `a`
    /// has as many rows as the reflection has dimensions.
    pub fn apply_checked<S>(&self, a: &mut ArrayBase<S, Ix2>) -> Result<()>
    where
        S: DataMut<Elem = A>,
    {
        check_len("reflector operand rows", self.dim(), a.nrows())?;
        self.apply2_mut(a);
        Ok(())
    }

    pub fn into_vector(self) -> Array1<A> {
        self.u
    }
}

impl<A> LinearOperator for Reflector<A>
where
    A: NdFloat + Scalar,
{
    type Elem = A;

    /// Apply operator out-place
    #[inline]
    fn apply<S>(&self, a: &ArrayBase<S, Ix1>) -> Array1<S::Elem>
    where
        S: Data<Elem = Self::Elem>,
    {
        let mut a = a.to_owned();
        self.apply_mut(&mut a);
        a
    }

    /// Apply operator in-place
    #[inline]
    fn apply_mut<S>(&self, a: &mut ArrayBase<S, Ix1>)
    where
        S: DataMut<Elem = Self::Elem>,
    {
        let two = A::one() + A::one();
        let c = self.u.dot(&a.view()) * two;
        a.scaled_add(-c, &self.u);
    }

    /// Apply operator with move
    #[inline]
    fn apply_into<S>(&self, a: ArrayBase<S, Ix1>) -> ArrayBase<S, Ix1>
    where
        S: DataOwned<Elem = Self::Elem> + DataMut,
    {
        let mut a = a;
        self.apply_mut(&mut a);
        a
    }

    /// Apply operator to matrix out-place
    #[inline]
    fn apply2<S>(&self, a: &ArrayBase<S, Ix2>) -> Array2<S::Elem>
    where
        S: Data<Elem = Self::Elem>,
    {
        let mut a = a.to_owned();
        self.apply2_mut(&mut a);
        a
    }

    /// Apply operator to matrix in-place, $`M \gets M - 2u(u^TM)`$
    #[inline]
    fn apply2_mut<S>(&self, a: &mut ArrayBase<S, Ix2>)
    where
        S: DataMut<Elem = Self::Elem>,
    {
        let two = A::one() + A::one();
        let ut_a = self.u.dot(&a.view());
        let u_col = self.u.view().insert_axis(Axis(1));
        let ut_a_row = ut_a.view().insert_axis(Axis(0));
        a.scaled_add(-two, &u_col.dot(&ut_a_row));
    }

    /// Apply operator to matrix with move
    #[inline]
    fn apply2_into<S>(&self, a: ArrayBase<S, Ix2>) -> ArrayBase<S, Ix2>
    where
        S: DataOwned<Elem = Self::Elem> + DataMut,
    {
        let mut a = a;
        self.apply2_mut(&mut a);
        a
    }
}

/// Householder reflector as a dense matrix and generating vector
///
/// Returns $`(H, u)`$ with $`H = I - 2uu^T`$ and $`Hx = (s, 0, \dots, 0)^T`$,
/// $`|s| = \|x\|_2`$. See [`Reflector::new`] for the sign convention and
/// the degenerate case.
pub fn householder<A>(x: ArrayView1<A>) -> Result<(Array2<A>, Array1<A>)>
where
    A: NdFloat + Scalar,
{
    let reflector = Reflector::new(x)?;
    let h = reflector.matrix();
    Ok((h, reflector.into_vector()))
}
