//! The mutable sparse matrix state the eliminator works on.

use ahash::AHashSet;
use rayon::prelude::*;

use crate::domains::Ring;
use crate::tensors::matrix::Matrix;

use super::sparse_row::SparseRow;

/// Batches with fewer targets than this are processed sequentially.
const PAR_THRESHOLD: usize = 4;

/// Incremental pivot-selection statistics: the weight of every row and,
/// per column, the set of rows whose head sits in that column.
#[derive(Clone, Debug)]
pub struct Tracker {
    row_weight: Vec<u64>,
    col_heads: Vec<AHashSet<u32>>,
}

/// A matrix under reduction, stored as sparse rows.
///
/// Every mutation goes through one of the elementary-operation methods so
/// that the optional [Tracker] stays consistent with the rows.
#[derive(Clone, Debug)]
pub struct Worker<F: Ring> {
    field: F,
    nrows: u32,
    ncols: u32,
    rows: Vec<SparseRow<F>>,
    tracker: Option<Tracker>,
}

impl<F: Ring> Worker<F> {
    pub fn from_matrix(matrix: &Matrix<F>) -> Worker<F> {
        let rows = matrix
            .row_iter()
            .map(|r| {
                SparseRow::from_sorted_entries(
                    r.iter()
                        .enumerate()
                        .filter(|(_, e)| !F::is_zero(e))
                        .map(|(c, e)| (c as u32, e.clone()))
                        .collect(),
                )
            })
            .collect();

        Worker {
            field: matrix.field().clone(),
            nrows: matrix.nrows() as u32,
            ncols: matrix.ncols() as u32,
            rows,
            tracker: None,
        }
    }

    /// An empty worker, used to temporarily vacate an eliminator.
    pub fn empty(field: F) -> Worker<F> {
        Worker {
            field,
            nrows: 0,
            ncols: 0,
            rows: vec![],
            tracker: None,
        }
    }

    pub fn nrows(&self) -> u32 {
        self.nrows
    }

    pub fn ncols(&self) -> u32 {
        self.ncols
    }

    pub fn field(&self) -> &F {
        &self.field
    }

    /// The leftmost nonzero entry of row `row`.
    pub fn head(&self, row: u32) -> Option<(u32, &F::Element)> {
        self.rows[row as usize].head()
    }

    pub fn entry(&self, row: u32, col: u32) -> Option<&F::Element> {
        self.rows[row as usize].get(col)
    }

    /// The rows whose head sits in column `col`, in ascending row order.
    pub fn heads_in_col(&self, col: u32) -> Vec<u32> {
        match &self.tracker {
            Some(t) => {
                let mut rows: Vec<u32> = t.col_heads[col as usize].iter().copied().collect();
                rows.sort_unstable();
                rows
            }
            None => (0..self.nrows)
                .filter(|&r| self.rows[r as usize].head_col() == Some(col))
                .collect(),
        }
    }

    /// The summed element weight of row `row`.
    pub fn row_weight(&self, row: u32) -> u64 {
        match &self.tracker {
            Some(t) => t.row_weight[row as usize],
            None => self.rows[row as usize].weight(&self.field),
        }
    }

    /// Start maintaining pivot-selection statistics. A no-op if they are
    /// already being maintained.
    pub fn enable_tracker(&mut self) {
        if self.tracker.is_some() {
            return;
        }

        let mut col_heads = vec![AHashSet::new(); self.ncols as usize];
        for (i, r) in self.rows.iter().enumerate() {
            if let Some(c) = r.head_col() {
                col_heads[c as usize].insert(i as u32);
            }
        }

        self.tracker = Some(Tracker {
            row_weight: self
                .rows
                .iter()
                .map(|r| r.weight(&self.field))
                .collect(),
            col_heads,
        });
    }

    fn tracker_update(&mut self, row: u32, old_head: Option<u32>, delta: i64) {
        if let Some(t) = &mut self.tracker {
            t.row_weight[row as usize] =
                (t.row_weight[row as usize] as i64 + delta) as u64;

            let new_head = self.rows[row as usize].head_col();
            if old_head != new_head {
                if let Some(c) = old_head {
                    t.col_heads[c as usize].remove(&row);
                }
                if let Some(c) = new_head {
                    t.col_heads[c as usize].insert(row);
                }
            }
        }
    }

    /// Add `mult` times row `src` to row `dst`.
    pub fn add_row_multiple(&mut self, src: u32, dst: u32, mult: &F::Element) {
        if src == dst {
            panic!("Cannot add row {} to itself", src);
        }

        let old_head = self.rows[dst as usize].head_col();

        let (s, d) = if src < dst {
            let (a, b) = self.rows.split_at_mut(dst as usize);
            (&a[src as usize], &mut b[0])
        } else {
            let (a, b) = self.rows.split_at_mut(src as usize);
            (&b[0], &mut a[dst as usize])
        };

        let delta = d.add_scaled(&self.field, s, mult);
        self.tracker_update(dst, old_head, delta);
    }

    /// Add multiples of row `src` to several rows at once, fanning the row
    /// combinations out over a thread pool when the batch is large enough.
    pub fn batch_add_row(&mut self, src: u32, targets: &[(u32, F::Element)])
    where
        F: Sync,
        F::Element: Send + Sync,
    {
        if targets.len() < PAR_THRESHOLD {
            for (dst, mult) in targets {
                self.add_row_multiple(src, *dst, mult);
            }
            return;
        }

        let mut taken: Vec<(u32, Option<u32>, SparseRow<F>, &F::Element, i64)> = targets
            .iter()
            .map(|(dst, mult)| {
                assert_ne!(*dst, src, "Cannot add row {} to itself", src);
                let old_head = self.rows[*dst as usize].head_col();
                (
                    *dst,
                    old_head,
                    std::mem::take(&mut self.rows[*dst as usize]),
                    mult,
                    0,
                )
            })
            .collect();

        {
            let field = &self.field;
            let src_row = &self.rows[src as usize];
            taken
                .par_iter_mut()
                .for_each(|(_, _, row, mult, delta)| {
                    *delta = row.add_scaled(field, src_row, mult);
                });
        }

        for (dst, old_head, row, _, delta) in taken {
            self.rows[dst as usize] = row;
            self.tracker_update(dst, old_head, delta);
        }
    }

    /// Multiply row `row` by `unit`. The caller must guarantee `unit` is a
    /// unit of the ring, so that no entry vanishes.
    pub fn mul_row(&mut self, row: u32, unit: &F::Element) {
        let old_head = self.rows[row as usize].head_col();
        let delta = self.rows[row as usize].scale(&self.field, unit);
        self.tracker_update(row, old_head, delta);
    }

    pub fn swap_rows(&mut self, r1: u32, r2: u32) {
        if r1 == r2 {
            return;
        }

        if let Some(t) = &mut self.tracker {
            t.row_weight.swap(r1 as usize, r2 as usize);

            let h1 = self.rows[r1 as usize].head_col();
            let h2 = self.rows[r2 as usize].head_col();
            if h1 != h2 {
                if let Some(c) = h1 {
                    t.col_heads[c as usize].remove(&r1);
                    t.col_heads[c as usize].insert(r2);
                }
                if let Some(c) = h2 {
                    t.col_heads[c as usize].remove(&r2);
                    t.col_heads[c as usize].insert(r1);
                }
            }
        }

        self.rows.swap(r1 as usize, r2 as usize);
    }

    /// Overwrite the worker with the diagonal matrix carrying `diag`.
    /// Statistics are dropped, as this ends a reduction.
    pub fn set_diagonal(&mut self, diag: &[F::Element]) {
        assert!(
            diag.len() as u32 <= self.nrows.min(self.ncols),
            "Diagonal of length {} does not fit in a ({},{}) matrix",
            diag.len(),
            self.nrows,
            self.ncols
        );

        self.tracker = None;
        for (i, row) in self.rows.iter_mut().enumerate() {
            row.clear();
            if let Some(e) = diag.get(i) {
                if !F::is_zero(e) {
                    *row = SparseRow::from_sorted_entries(vec![(i as u32, e.clone())]);
                }
            }
        }
    }

    /// Return true iff every nonzero entry sits on the main diagonal.
    pub fn is_diagonal(&self) -> bool {
        self.rows.iter().enumerate().all(|(i, r)| {
            r.len() == 0 || (r.len() == 1 && r.head_col() == Some(i as u32))
        })
    }

    /// Physically transpose the worker. Statistics are dropped.
    pub fn into_transposed(self) -> Worker<F> {
        let mut cols: Vec<Vec<(u32, F::Element)>> = vec![vec![]; self.ncols as usize];
        for (i, row) in self.rows.into_iter().enumerate() {
            for (c, e) in row.iter() {
                cols[c as usize].push((i as u32, e.clone()));
            }
        }

        Worker {
            field: self.field,
            nrows: self.ncols,
            ncols: self.nrows,
            rows: cols.into_iter().map(SparseRow::from_sorted_entries).collect(),
            tracker: None,
        }
    }

    /// Densify the worker back into a matrix.
    pub fn to_matrix(&self) -> Matrix<F> {
        let mut m = Matrix::new(self.nrows, self.ncols, self.field.clone());
        for (i, row) in self.rows.iter().enumerate() {
            for (c, e) in row.iter() {
                m[(i as u32, c)] = e.clone();
            }
        }
        m
    }

    #[cfg(test)]
    fn validate_tracker(&self) {
        let t = self.tracker.as_ref().unwrap();
        for (i, row) in self.rows.iter().enumerate() {
            assert_eq!(t.row_weight[i], row.weight(&self.field));
        }
        for c in 0..self.ncols {
            let expected: AHashSet<u32> = (0..self.nrows)
                .filter(|&r| self.rows[r as usize].head_col() == Some(c))
                .collect();
            assert_eq!(t.col_heads[c as usize], expected);
        }
    }
}
