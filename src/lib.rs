//! Canonica computes canonical normal forms of matrices over Euclidean
//! domains: row and column echelon, Hermite, diagonal and Smith form.
//!
//! Every elementary row and column operation performed during a reduction is
//! logged, so the invertible transformations `L` and `R` with `L·A·R = N`
//! (and their inverses) can be reconstructed exactly, for any coefficient
//! ring that supports division with remainder.
//!
//! For example:
//!
//! ```
//! use canonica::domains::integer::Z;
//! use canonica::elimination::{eliminate, Form};
//! use canonica::tensors::matrix::Matrix;
//!
//! let a = Matrix::from_nested_vec(
//!     vec![vec![2.into(), 4.into()], vec![6.into(), 10.into()]],
//!     Z,
//! )
//! .unwrap();
//!
//! let e = eliminate(&a, Form::Smith);
//! assert_eq!(&(&e.left() * &a) * &e.right(), *e.matrix());
//! ```

pub mod domains;
pub mod elimination;
pub mod tensors;
