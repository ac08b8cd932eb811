//! The outcome of an elimination: the normal form plus the operation logs,
//! from which the transformation matrices and derived subspaces are built
//! on demand.

use crate::domains::{EuclideanDomain, Ring};
use crate::tensors::matrix::Matrix;

use super::{ColOp, Form, RowOp};

/// The normal form `N` of a matrix `A` together with the logged elementary
/// operations realizing `L·A·R = N`.
///
/// The transformation matrices and the kernel, image and cokernel are not
/// stored; they are replayed from the logs when asked for.
#[derive(Clone, Debug)]
pub struct EliminationResult<F: Ring> {
    form: Form,
    matrix: Matrix<F>,
    row_ops: Vec<RowOp<F>>,
    col_ops: Vec<ColOp<F>>,
}

impl<F: EuclideanDomain> EliminationResult<F> {
    pub(crate) fn new(
        form: Form,
        matrix: Matrix<F>,
        row_ops: Vec<RowOp<F>>,
        col_ops: Vec<ColOp<F>>,
    ) -> EliminationResult<F> {
        EliminationResult {
            form,
            matrix,
            row_ops,
            col_ops,
        }
    }

    pub fn form(&self) -> Form {
        self.form
    }

    /// The normal form `N`.
    pub fn matrix(&self) -> &Matrix<F> {
        &self.matrix
    }

    pub fn row_ops(&self) -> &[RowOp<F>] {
        &self.row_ops
    }

    pub fn col_ops(&self) -> &[ColOp<F>] {
        &self.col_ops
    }

    /// The invertible matrix `L` with `L·A·R = N`.
    pub fn left(&self) -> Matrix<F> {
        let mut l = Matrix::identity(self.matrix.nrows() as u32, self.matrix.field().clone());
        for op in &self.row_ops {
            op.apply(&mut l);
        }
        l
    }

    /// The inverse of [left](Self::left), replayed from the inverted log.
    pub fn left_inverse(&self) -> Matrix<F> {
        let field = self.matrix.field().clone();
        let mut l = Matrix::identity(self.matrix.nrows() as u32, field.clone());
        for op in self.row_ops.iter().rev() {
            op.inverse(&field).apply(&mut l);
        }
        l
    }

    /// The invertible matrix `R` with `L·A·R = N`.
    pub fn right(&self) -> Matrix<F> {
        let mut r = Matrix::identity(self.matrix.ncols() as u32, self.matrix.field().clone());
        for op in &self.col_ops {
            op.apply(&mut r);
        }
        r
    }

    /// The inverse of [right](Self::right), replayed from the inverted log.
    pub fn right_inverse(&self) -> Matrix<F> {
        let field = self.matrix.field().clone();
        let mut r = Matrix::identity(self.matrix.ncols() as u32, field.clone());
        for op in self.col_ops.iter().rev() {
            op.inverse(&field).apply(&mut r);
        }
        r
    }

    /// The rank of the original matrix, read off the normal form.
    pub fn rank(&self) -> u32 {
        match self.form {
            Form::RowEchelon | Form::RowHermite => self
                .matrix
                .row_iter()
                .filter(|r| r.iter().any(|e| !F::is_zero(e)))
                .count() as u32,
            Form::ColEchelon | Form::ColHermite => (0..self.matrix.ncols() as u32)
                .filter(|&c| {
                    (0..self.matrix.nrows() as u32).any(|r| !F::is_zero(&self.matrix[(r, c)]))
                })
                .count() as u32,
            Form::Diagonal | Form::Smith => (0..self
                .matrix
                .nrows()
                .min(self.matrix.ncols()) as u32)
                .filter(|&i| !F::is_zero(&self.matrix[(i, i)]))
                .count() as u32,
        }
    }

    /// A basis of the kernel of `A`, one column per basis vector.
    ///
    /// The kernel is cut out of `R`, so it is only available for the forms
    /// that reduce by column operations.
    pub fn kernel(&self) -> Matrix<F> {
        if !self.form.uses_col_ops() {
            panic!(
                "The kernel requires column operations; reduce to a column, diagonal or Smith form instead of {:?}",
                self.form
            );
        }

        let r = self.right();
        let ncols = self.matrix.ncols() as u32;
        r.submatrix(0..ncols, self.rank()..ncols)
    }

    /// A basis of the image (column span) of `A`, one column per basis
    /// vector. Availability matches [kernel](Self::kernel).
    pub fn image(&self) -> Matrix<F> {
        if !self.form.uses_col_ops() {
            panic!(
                "The image requires column operations; reduce to a column, diagonal or Smith form instead of {:?}",
                self.form
            );
        }

        // L⁻¹·N = A·R, whose leading columns span the image
        let m = &self.left_inverse() * &self.matrix;
        m.submatrix(0..self.matrix.nrows() as u32, 0..self.rank())
    }

    /// The diagonal entries of the Smith normal form, nonzero first.
    pub fn invariant_factors(&self) -> Vec<F::Element> {
        if self.form != Form::Smith {
            panic!(
                "Invariant factors are only defined for the Smith form, not {:?}",
                self.form
            );
        }

        (0..self.matrix.nrows().min(self.matrix.ncols()) as u32)
            .map(|i| self.matrix[(i, i)].clone())
            .collect()
    }

    /// The cokernel of `A` as an abstract module: the quotient of the
    /// codomain by the image, decomposed by the Smith form.
    pub fn cokernel(&self) -> Cokernel<F> {
        if self.form != Form::Smith {
            panic!(
                "The cokernel decomposition is only defined for the Smith form, not {:?}",
                self.form
            );
        }

        let field = self.matrix.field();
        Cokernel {
            free_rank: self.matrix.nrows() as u32 - self.rank(),
            torsion: self
                .invariant_factors()
                .into_iter()
                .filter(|d| !F::is_zero(d) && !field.is_one(d))
                .collect(),
        }
    }
}

/// The cokernel `F^m / im(A)`, split into a free part and torsion factors.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Cokernel<F: Ring> {
    /// The rank of the free summand.
    pub free_rank: u32,
    /// The non-unit invariant factors `d`, one summand `F/(d)` each.
    pub torsion: Vec<F::Element>,
}

#[cfg(test)]
mod test {
    use rug::Integer;

    use crate::domains::integer::{IntegerRing, Z};
    use crate::elimination::{eliminate, Form};
    use crate::tensors::matrix::Matrix;

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
    fn round_trip_all_forms() {
        let a = zmat(&[&[2, -1, -2, -2], &[1, 2, -1, 1], &[2, -2, -4, -3]]);

        for form in [
            Form::RowEchelon,
            Form::ColEchelon,
            Form::RowHermite,
            Form::ColHermite,
            Form::Diagonal,
            Form::Smith,
        ] {
            let e = eliminate(&a, form);

            let lar = &(&e.left() * &a) * &e.right();
            assert_eq!(lar, *e.matrix(), "L·A·R mismatch for {:?}", form);

            let back = &(&e.left_inverse() * e.matrix()) * &e.right_inverse();
            assert_eq!(back, a, "inverse replay mismatch for {:?}", form);
        }
    }

    #[test]
    fn transforms_are_inverses() {
        let a = zmat(&[&[6, 10], &[15, 4], &[0, 9]]);

        let e = eliminate(&a, Form::Smith);
        assert_eq!(&e.left() * &e.left_inverse(), Matrix::identity(3, Z));
        assert_eq!(&e.right_inverse() * &e.right(), Matrix::identity(2, Z));
    }

    #[test]
    fn kernel_is_annihilated() {
        // row 2 = row 0 + row 1, so the rank is 2 and the kernel has 2 columns
        let a = zmat(&[&[1, 2, 3, 4], &[0, 1, 1, 0], &[1, 3, 4, 4]]);

        let e = eliminate(&a, Form::Smith);
        assert_eq!(e.rank(), 2);

        let k = e.kernel();
        assert_eq!(k.ncols(), 2);
        assert!((&a * &k).is_zero());
    }

    #[test]
    fn image_spans_the_column_space() {
        let a = zmat(&[&[2, 4], &[3, 6], &[1, 2]]);

        let e = eliminate(&a, Form::Smith);
        assert_eq!(e.rank(), 1);

        let im = e.image();
        assert_eq!(im.ncols(), 1);
        // L⁻¹·N = A·R, so each image column is in the span of A's columns
        assert_eq!(
            &e.left_inverse() * e.matrix(),
            &a * &e.right()
        );
    }

    #[test]
    fn cokernel_decomposition() {
        let a = zmat(&[
            &[-20, -7, -27, 2, 29],
            &[17, 8, 14, -4, -10],
            &[13, 8, 10, -4, -6],
            &[-9, -2, -14, 0, 16],
            &[5, 0, 5, -1, -4],
        ]);

        let e = eliminate(&a, Form::Smith);
        let coker = e.cokernel();
        assert_eq!(coker.free_rank, 0);
        assert_eq!(coker.torsion, vec![Integer::from(2), Integer::from(60)]);
    }

    #[test]
    fn zero_matrix_subspaces() {
        let a = Matrix::new(4, 6, Z);

        let e = eliminate(&a, Form::Smith);
        assert_eq!(e.rank(), 0);
        assert_eq!(e.kernel(), Matrix::identity(6, Z));
        assert_eq!(e.image().ncols(), 0);

        let coker = e.cokernel();
        assert_eq!(coker.free_rank, 4);
        assert!(coker.torsion.is_empty());
    }
}
