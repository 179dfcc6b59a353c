//! Orthogonal Factorization with Householder Reflections
//!
//! A Householder reflector for a vector $`x`$ is the orthogonal, symmetric,
//! involutory matrix
//! ```math
//! H = I - 2uu^T, \quad u = \frac{x - y}{\|x - y\|_2}
//! ```
//! mapping $`x`$ onto $`y = (\pm\|x\|_2, 0, \dots, 0)^T`$. Applying one
//! reflector per column zeroes everything below the diagonal, which gives
//! the QR factorization $`A = QR`$ of a square matrix with $`Q`$ orthogonal
//! and $`R`$ upper-triangular.
//!
//! Three factorizations are provided:
//! - [`qr_naive`]: dense products with embedded reflectors, $`O(n^4)`$
//! - [`qr_fast`]: trailing block updates only, $`O(n^3)`$
//! - [`HouseholderQr`]: like [`qr_fast`] but keeps $`Q`$ as its reflectors
//!
//! For more info, see [Householder transformation on Wikipedia](https://en.wikipedia.org/wiki/Householder_transformation)

mod reflector;
pub use reflector::*;
mod qr;
pub use qr::*;
