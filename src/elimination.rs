//! Reduction of matrices over Euclidean domains to normal forms.
//!
//! The entry point is [eliminate], which reduces a dense [Matrix] to the
//! requested [Form] and returns an [EliminationResult] holding the normal
//! form together with a log of the elementary row and column operations
//! that produced it. The logs can be replayed into the transformation
//! matrices `L` and `R` with `L·A·R = N`, and inverted to recover `A`.
//!
//! ```
//! use canonica::domains::integer::Z;
//! use canonica::elimination::{eliminate, Form};
//! use canonica::tensors::matrix::Matrix;
//!
//! let a = Matrix::from_nested_vec(
//!     vec![vec![4.into(), 6.into()], vec![2.into(), 8.into()]],
//!     Z,
//! )
//! .unwrap();
//! let e = eliminate(&a, Form::Smith);
//! assert_eq!(e.invariant_factors(), vec![2.into(), 10.into()]);
//! ```

pub mod eliminator;
pub mod result;
pub mod sparse_row;
pub mod worker;

pub use eliminator::Eliminator;
pub use result::{Cokernel, EliminationResult};

use crate::domains::{EuclideanDomain, Ring};
use crate::tensors::matrix::Matrix;

/// The normal forms the eliminator can produce.
///
/// Row forms act by row operations only, column forms by column operations
/// only; [Form::Diagonal] and [Form::Smith] use both.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Hash)]
pub enum Form {
    /// Upper echelon by row operations, pivots normalized.
    RowEchelon,
    /// Lower echelon by column operations, pivots normalized.
    ColEchelon,
    /// [Form::RowEchelon] with entries above each pivot reduced modulo the pivot.
    RowHermite,
    /// [Form::ColEchelon] with entries left of each pivot reduced modulo the pivot.
    ColHermite,
    /// Nonzero entries on the main diagonal only.
    Diagonal,
    /// [Form::Diagonal] with each diagonal entry dividing the next.
    Smith,
}

impl Form {
    /// Return true iff reducing to this form may log column operations.
    pub fn uses_col_ops(&self) -> bool {
        matches!(
            self,
            Form::ColEchelon | Form::ColHermite | Form::Diagonal | Form::Smith
        )
    }
}

/// An elementary row operation, acting on a matrix from the left.
#[derive(Clone, PartialEq, Eq, Debug, Hash)]
pub enum RowOp<F: Ring> {
    /// Add `mult` times row `src` to row `dst`.
    Add { src: u32, dst: u32, mult: F::Element },
    /// Multiply row `row` by the unit `unit`.
    Mul { row: u32, unit: F::Element },
    /// Exchange two rows.
    Swap(u32, u32),
}

/// An elementary column operation, acting on a matrix from the right.
#[derive(Clone, PartialEq, Eq, Debug, Hash)]
pub enum ColOp<F: Ring> {
    /// Add `mult` times column `src` to column `dst`.
    Add { src: u32, dst: u32, mult: F::Element },
    /// Multiply column `col` by the unit `unit`.
    Mul { col: u32, unit: F::Element },
    /// Exchange two columns.
    Swap(u32, u32),
}

impl<F: Ring> RowOp<F> {
    /// Reinterpret the operation as the column operation it becomes on the
    /// transposed matrix.
    pub fn transpose(self) -> ColOp<F> {
        match self {
            RowOp::Add { src, dst, mult } => ColOp::Add { src, dst, mult },
            RowOp::Mul { row, unit } => ColOp::Mul { col: row, unit },
            RowOp::Swap(a, b) => ColOp::Swap(a, b),
        }
    }

    /// Return the operation that undoes this one.
    pub fn inverse(&self, field: &F) -> RowOp<F>
    where
        F: EuclideanDomain,
    {
        match self {
            RowOp::Add { src, dst, mult } => RowOp::Add {
                src: *src,
                dst: *dst,
                mult: field.neg(mult),
            },
            RowOp::Mul { row, unit } => RowOp::Mul {
                row: *row,
                unit: field.inv_unit(unit),
            },
            RowOp::Swap(a, b) => RowOp::Swap(*a, *b),
        }
    }

    /// Apply the operation to a dense matrix.
    pub fn apply(&self, m: &mut Matrix<F>) {
        let field = m.field().clone();
        match self {
            RowOp::Add { src, dst, mult } => {
                for c in 0..m.ncols() as u32 {
                    let s = m[(*src, c)].clone();
                    field.add_mul_assign(&mut m[(*dst, c)], mult, &s);
                }
            }
            RowOp::Mul { row, unit } => {
                for c in 0..m.ncols() as u32 {
                    field.mul_assign(&mut m[(*row, c)], unit);
                }
            }
            RowOp::Swap(a, b) => m.swap_rows(*a, *b),
        }
    }
}

impl<F: Ring> ColOp<F> {
    /// Reinterpret the operation as the row operation it becomes on the
    /// transposed matrix.
    pub fn transpose(self) -> RowOp<F> {
        match self {
            ColOp::Add { src, dst, mult } => RowOp::Add { src, dst, mult },
            ColOp::Mul { col, unit } => RowOp::Mul { row: col, unit },
            ColOp::Swap(a, b) => RowOp::Swap(a, b),
        }
    }

    /// Return the operation that undoes this one.
    pub fn inverse(&self, field: &F) -> ColOp<F>
    where
        F: EuclideanDomain,
    {
        match self {
            ColOp::Add { src, dst, mult } => ColOp::Add {
                src: *src,
                dst: *dst,
                mult: field.neg(mult),
            },
            ColOp::Mul { col, unit } => ColOp::Mul {
                col: *col,
                unit: field.inv_unit(unit),
            },
            ColOp::Swap(a, b) => ColOp::Swap(*a, *b),
        }
    }

    /// Apply the operation to a dense matrix.
    pub fn apply(&self, m: &mut Matrix<F>) {
        let field = m.field().clone();
        match self {
            ColOp::Add { src, dst, mult } => {
                for r in 0..m.nrows() as u32 {
                    let s = m[(r, *src)].clone();
                    field.add_mul_assign(&mut m[(r, *dst)], mult, &s);
                }
            }
            ColOp::Mul { col, unit } => {
                for r in 0..m.nrows() as u32 {
                    field.mul_assign(&mut m[(r, *col)], unit);
                }
            }
            ColOp::Swap(a, b) => m.swap_cols(*a, *b),
        }
    }
}

/// Reduce `matrix` to the requested normal form, logging the elementary
/// operations used along the way.
pub fn eliminate<F>(matrix: &Matrix<F>, form: Form) -> EliminationResult<F>
where
    F: EuclideanDomain + Sync,
    F::Element: Send + Sync,
{
    Eliminator::from_matrix(matrix).run(form)
}

#[cfg(test)]
mod test {
    use rug::Integer;

    use crate::domains::integer::{IntegerRing, Z};
    use crate::tensors::matrix::Matrix;

    use super::{ColOp, RowOp};

    fn zmat(rows: &[&[i64]]) -> Matrix<IntegerRing> {
        Matrix::from_nested_vec(
            rows.iter()
                .map(|r| r.iter().map(|&e| Integer::from(e)).collect())
                .collect(),
            Z,
        )
        .unwrap()
    }

    #[test]
    fn op_apply_and_inverse() {
        let a = zmat(&[&[1, 2], &[3, 4]]);

        let ops = [
            RowOp::Add {
                src: 0,
                dst: 1,
                mult: Integer::from(-3),
            },
            RowOp::Mul {
                row: 0,
                unit: Integer::from(-1),
            },
            RowOp::Swap(0, 1),
        ];

        let mut m = a.clone();
        for op in &ops {
            op.apply(&mut m);
        }
        assert_eq!(m, zmat(&[&[0, -2], &[-1, -2]]));

        for op in ops.iter().rev() {
            op.inverse(&Z).apply(&mut m);
        }
        assert_eq!(m, a);
    }

    #[test]
    fn col_op_matches_transposed_row_op() {
        let a = zmat(&[&[1, 2, 3], &[4, 5, 6]]);

        let col = ColOp::Add {
            src: 2,
            dst: 0,
            mult: Integer::from(2),
        };

        let mut direct = a.clone();
        col.apply(&mut direct);

        let mut via_transpose = a.transpose();
        col.clone().transpose().apply(&mut via_transpose);

        assert_eq!(direct, via_transpose.transpose());
    }
}
