use std::{
    fmt::Display,
    ops::{Add, Index, IndexMut, Mul, Neg, Sub},
    slice::Chunks,
};

use crate::domains::Ring;

/// A dense matrix with entries that are elements of a ring `F`, stored in
/// row-major order.
#[derive(Clone, Hash, PartialEq, Eq, Debug)]
pub struct Matrix<F: Ring> {
    pub(crate) data: Vec<F::Element>,
    pub(crate) nrows: u32,
    pub(crate) ncols: u32,
    pub(crate) field: F,
}

impl<F: Ring> Matrix<F> {
    /// Create a new zeroed matrix with `nrows` rows and `ncols` columns.
    pub fn new(nrows: u32, ncols: u32, field: F) -> Matrix<F> {
        Matrix {
            data: (0..nrows as usize * ncols as usize)
                .map(|_| field.zero())
                .collect(),
            nrows,
            ncols,
            field,
        }
    }

    /// Create a new square matrix with ones on the main diagonal and zeroes elsewhere.
    pub fn identity(nrows: u32, field: F) -> Matrix<F> {
        Matrix {
            data: (0..nrows as usize * nrows as usize)
                .map(|i| {
                    if i % nrows as usize == i / nrows as usize {
                        field.one()
                    } else {
                        field.zero()
                    }
                })
                .collect(),
            nrows,
            ncols: nrows,
            field,
        }
    }

    /// Create a new matrix with the scalars `diag` on the main diagonal and zeroes elsewhere.
    pub fn eye(diag: &[F::Element], field: F) -> Matrix<F> {
        let mut m = Matrix::new(diag.len() as u32, diag.len() as u32, field);
        for (i, e) in diag.iter().enumerate() {
            m[(i as u32, i as u32)] = e.clone();
        }
        m
    }

    /// Convert a linear representation of a matrix to a `Matrix`.
    pub fn from_linear(
        data: Vec<F::Element>,
        nrows: u32,
        ncols: u32,
        field: F,
    ) -> Result<Matrix<F>, String> {
        if data.len() == nrows as usize * ncols as usize {
            Ok(Matrix {
                data,
                nrows,
                ncols,
                field,
            })
        } else {
            Err(format!(
                "Data length does not match matrix dimensions: {} vs ({},{})",
                data.len(),
                nrows,
                ncols
            ))
        }
    }

    /// Create a new matrix from a 2-dimensional vector of scalars.
    pub fn from_nested_vec(matrix: Vec<Vec<F::Element>>, field: F) -> Result<Matrix<F>, String> {
        let mut data = vec![];

        let cols = matrix.first().map(|r| r.len()).unwrap_or(0);

        for d in matrix {
            if d.len() != cols {
                return Err("Matrix is not rectangular".to_string());
            }

            data.extend(d);
        }

        Ok(Matrix {
            nrows: (data.len() / cols.max(1)) as u32,
            ncols: cols as u32,
            data,
            field,
        })
    }

    /// Create a matrix of the given shape from `(row, col, value)` triplets.
    /// Unmentioned positions are zero.
    pub fn from_entries(
        nrows: u32,
        ncols: u32,
        entries: impl IntoIterator<Item = (u32, u32, F::Element)>,
        field: F,
    ) -> Result<Matrix<F>, String> {
        let mut m = Matrix::new(nrows, ncols, field);
        for (r, c, v) in entries {
            if r >= nrows || c >= ncols {
                return Err(format!(
                    "Entry ({},{}) is outside of a ({},{}) matrix",
                    r, c, nrows, ncols
                ));
            }
            m[(r, c)] = v;
        }
        Ok(m)
    }

    /// Return the number of rows.
    pub fn nrows(&self) -> usize {
        self.nrows as usize
    }

    /// Return the number of columns.
    pub fn ncols(&self) -> usize {
        self.ncols as usize
    }

    /// Return the field of the matrix entries.
    pub fn field(&self) -> &F {
        &self.field
    }

    /// Return an iterator over the rows of the matrix.
    pub fn row_iter(&self) -> Chunks<'_, F::Element> {
        self.data.chunks(self.ncols.max(1) as usize)
    }

    /// Return true iff every entry in the matrix is zero.
    pub fn is_zero(&self) -> bool {
        self.data.iter().all(|e| F::is_zero(e))
    }

    /// Return true iff every non-main-diagonal entry in the matrix is zero.
    pub fn is_diagonal(&self) -> bool {
        self.data
            .iter()
            .enumerate()
            .all(|(i, e)| i as u32 % self.ncols == i as u32 / self.ncols || F::is_zero(e))
    }

    /// Transpose the matrix.
    pub fn transpose(&self) -> Matrix<F> {
        let mut m = Matrix::new(self.ncols, self.nrows, self.field.clone());
        for i in 0..self.nrows {
            for j in 0..self.ncols {
                m[(j, i)] = self[(i, j)].clone();
            }
        }
        m
    }

    /// Swap rows `r1` and `r2`.
    pub fn swap_rows(&mut self, r1: u32, r2: u32) {
        if r1 == r2 {
            return;
        }
        for c in 0..self.ncols {
            self.data.swap(
                (r1 * self.ncols + c) as usize,
                (r2 * self.ncols + c) as usize,
            );
        }
    }

    /// Swap columns `c1` and `c2`.
    pub fn swap_cols(&mut self, c1: u32, c2: u32) {
        if c1 == c2 {
            return;
        }
        for r in 0..self.nrows {
            self.data.swap(
                (r * self.ncols + c1) as usize,
                (r * self.ncols + c2) as usize,
            );
        }
    }

    /// Extract the block spanned by the given half-open row and column ranges.
    pub fn submatrix(
        &self,
        rows: std::ops::Range<u32>,
        cols: std::ops::Range<u32>,
    ) -> Matrix<F> {
        assert!(
            rows.end <= self.nrows && cols.end <= self.ncols,
            "Block ({:?},{:?}) is outside of a ({},{}) matrix",
            rows,
            cols,
            self.nrows,
            self.ncols
        );

        let mut data = Vec::with_capacity(rows.len() * cols.len());
        for r in rows.clone() {
            for c in cols.clone() {
                data.push(self[(r, c)].clone());
            }
        }

        Matrix {
            data,
            nrows: rows.len() as u32,
            ncols: cols.len() as u32,
            field: self.field.clone(),
        }
    }
}

impl<F: Ring> Index<(u32, u32)> for Matrix<F> {
    type Output = F::Element;

    /// Get the `i`th row and `j`th column of the matrix, where `index=(i,j)`.
    #[inline]
    fn index(&self, index: (u32, u32)) -> &Self::Output {
        &self.data[(index.0 * self.ncols + index.1) as usize]
    }
}

impl<F: Ring> IndexMut<(u32, u32)> for Matrix<F> {
    /// Get the `i`th row and `j`th column of the matrix, where `index=(i,j)`.
    #[inline]
    fn index_mut(&mut self, index: (u32, u32)) -> &mut F::Element {
        &mut self.data[(index.0 * self.ncols + index.1) as usize]
    }
}

impl<F: Ring> Display for Matrix<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("{")?;
        for (i, row) in self.row_iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            f.write_str("{")?;
            for (j, e) in row.iter().enumerate() {
                if j > 0 {
                    f.write_str(",")?;
                }
                e.fmt(f)?;
            }
            f.write_str("}")?;
        }
        f.write_str("}")
    }
}

impl<F: Ring> Add<&Matrix<F>> for &Matrix<F> {
    type Output = Matrix<F>;

    /// Add two matrices.
    fn add(self, rhs: &Matrix<F>) -> Self::Output {
        if self.nrows != rhs.nrows || self.ncols != rhs.ncols {
            panic!(
                "Cannot add matrices of different dimensions: ({},{}) vs ({},{})",
                self.nrows, self.ncols, rhs.nrows, rhs.ncols
            );
        }

        let mut m = Matrix::new(self.nrows, self.ncols, self.field.clone());
        for (c, (a, b)) in m.data.iter_mut().zip(self.data.iter().zip(rhs.data.iter())) {
            *c = self.field.add(a, b);
        }

        m
    }
}

impl<F: Ring> Sub<&Matrix<F>> for &Matrix<F> {
    type Output = Matrix<F>;

    /// Subtract two matrices.
    fn sub(self, rhs: &Matrix<F>) -> Self::Output {
        if self.nrows != rhs.nrows || self.ncols != rhs.ncols {
            panic!(
                "Cannot subtract matrices of different dimensions: ({},{}) vs ({},{})",
                self.nrows, self.ncols, rhs.nrows, rhs.ncols
            );
        }

        let mut m = Matrix::new(self.nrows, self.ncols, self.field.clone());
        for (c, (a, b)) in m.data.iter_mut().zip(self.data.iter().zip(rhs.data.iter())) {
            *c = self.field.sub(a, b);
        }

        m
    }
}

impl<F: Ring> Mul<&Matrix<F>> for &Matrix<F> {
    type Output = Matrix<F>;

    /// Multiply two matrices.
    fn mul(self, rhs: &Matrix<F>) -> Self::Output {
        if self.ncols != rhs.nrows {
            panic!(
                "Cannot multiply matrices because of a dimension mismatch: ({},{}) vs ({},{})",
                self.nrows, self.ncols, rhs.nrows, rhs.ncols
            );
        }

        let mut m = Matrix::new(self.nrows, rhs.ncols, self.field.clone());

        for i in 0..self.nrows {
            for j in 0..rhs.ncols {
                let sum = &mut m[(i, j)];
                for k in 0..self.ncols {
                    self.field.add_mul_assign(sum, &self[(i, k)], &rhs[(k, j)]);
                }
            }
        }

        m
    }
}

impl<F: Ring> Neg for Matrix<F> {
    type Output = Matrix<F>;

    /// Negate each entry of the matrix.
    fn neg(mut self) -> Self::Output {
        for e in &mut self.data {
            *e = self.field.neg(e);
        }

        self
    }
}

#[cfg(test)]
mod test {
    use rug::Integer;

    use crate::domains::integer::{IntegerRing, Z};

    use super::Matrix;

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
    fn basics() {
        let a = zmat(&[&[1, 2, 3], &[4, 5, 6]]);

        assert_eq!(a.transpose(), zmat(&[&[1, 4], &[2, 5], &[3, 6]]));
        assert_eq!(-a.clone(), zmat(&[&[-1, -2, -3], &[-4, -5, -6]]));
        assert!((&a - &a).is_zero());

        let b = zmat(&[&[7, 8], &[9, 10], &[11, 12]]);
        let c = &a * &b;
        assert_eq!(c, zmat(&[&[58, 64], &[139, 154]]));
        assert_eq!(c[(1, 0)], 139);

        assert_eq!(&a + &a, zmat(&[&[2, 4, 6], &[8, 10, 12]]));
    }

    #[test]
    fn constructors() {
        let i = Matrix::identity(3, Z);
        assert!(i.is_diagonal());

        let e = Matrix::eye(&[1.into(), 2.into()], Z);
        assert_eq!(e, zmat(&[&[1, 0], &[0, 2]]));

        let s = Matrix::from_entries(2, 3, vec![(0, 1, Integer::from(5))], Z).unwrap();
        assert_eq!(s, zmat(&[&[0, 5, 0], &[0, 0, 0]]));
        assert!(Matrix::from_entries(2, 3, vec![(2, 0, Integer::from(1))], Z).is_err());

        assert!(Matrix::from_linear(vec![Integer::from(1)], 1, 2, Z).is_err());
    }

    #[test]
    fn block_ops() {
        let mut a = zmat(&[&[1, 2], &[3, 4]]);
        a.swap_rows(0, 1);
        assert_eq!(a, zmat(&[&[3, 4], &[1, 2]]));
        a.swap_cols(0, 1);
        assert_eq!(a, zmat(&[&[4, 3], &[2, 1]]));

        let b = zmat(&[&[1, 2, 3], &[4, 5, 6], &[7, 8, 9]]);
        assert_eq!(b.submatrix(0..2, 1..3), zmat(&[&[2, 3], &[5, 6]]));
    }
}
