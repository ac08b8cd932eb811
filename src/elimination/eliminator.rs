//! The elimination state machine.
//!
//! Every normal form is computed by a [Stage]: a small state object with a
//! prepare / step / finalize lifecycle driven by [run_stage]. The compound
//! forms compose stages, with column-sided work delegated to a sub-eliminator
//! running on the transposed worker.

use smallvec::SmallVec;
use tracing::{debug, trace};

use crate::domains::{EuclideanDomain, Ring};
use crate::tensors::matrix::Matrix;

use super::result::EliminationResult;
use super::worker::Worker;
use super::{ColOp, Form, RowOp};

/// Control flow of a stage step.
enum Flow {
    /// More steps may be needed.
    Proceed,
    /// The stage is finished regardless of what `is_done` reports.
    Abort,
}

/// One elimination algorithm, driven by [run_stage]. The stage owns its
/// cursor state; the eliminator owns the matrix and the operation logs.
trait Stage<F>
where
    F: EuclideanDomain + Sync,
    F::Element: Send + Sync,
{
    fn prepare(&mut self, _elim: &mut Eliminator<F>) {}
    fn is_done(&self, elim: &Eliminator<F>) -> bool;
    fn step(&mut self, elim: &mut Eliminator<F>) -> Flow;
    fn finalize(&mut self, _elim: &mut Eliminator<F>) {}
}

fn run_stage<F, S: Stage<F>>(elim: &mut Eliminator<F>, stage: &mut S)
where
    F: EuclideanDomain + Sync,
    F::Element: Send + Sync,
{
    stage.prepare(elim);
    while !stage.is_done(elim) {
        if let Flow::Abort = stage.step(elim) {
            break;
        }
    }
    stage.finalize(elim);
}

/// Reduces a matrix to a normal form while logging every elementary
/// operation. Construct one with [Eliminator::from_matrix] and consume it
/// with [Eliminator::run].
pub struct Eliminator<F: Ring> {
    field: F,
    worker: Worker<F>,
    row_ops: Vec<RowOp<F>>,
    col_ops: Vec<ColOp<F>>,
}

impl<F> Eliminator<F>
where
    F: EuclideanDomain + Sync,
    F::Element: Send + Sync,
{
    pub fn from_matrix(matrix: &Matrix<F>) -> Eliminator<F> {
        Eliminator {
            field: matrix.field().clone(),
            worker: Worker::from_matrix(matrix),
            row_ops: vec![],
            col_ops: vec![],
        }
    }

    /// Reduce to `form` and return the normal form with the operation logs.
    pub fn run(mut self, form: Form) -> EliminationResult<F> {
        debug!(
            ?form,
            nrows = self.worker.nrows(),
            ncols = self.worker.ncols(),
            "starting elimination"
        );

        match form {
            Form::RowEchelon => run_stage(&mut self, &mut EchelonStage::new(false)),
            Form::RowHermite => run_stage(&mut self, &mut EchelonStage::new(true)),
            Form::ColEchelon => self.transposed_subrun(|child| {
                run_stage(child, &mut EchelonStage::new(false));
            }),
            Form::ColHermite => self.transposed_subrun(|child| {
                run_stage(child, &mut EchelonStage::new(true));
            }),
            Form::Diagonal => run_stage(&mut self, &mut DiagonalStage),
            Form::Smith => run_stage(&mut self, &mut SmithStage::new()),
        }

        debug!(
            row_ops = self.row_ops.len(),
            col_ops = self.col_ops.len(),
            "elimination finished"
        );

        EliminationResult::new(form, self.worker.to_matrix(), self.row_ops, self.col_ops)
    }

    fn batch_add_row(&mut self, src: u32, targets: Vec<(u32, F::Element)>) {
        self.worker.batch_add_row(src, &targets);
        for (dst, mult) in targets {
            self.row_ops.push(RowOp::Add { src, dst, mult });
        }
    }

    fn mul_row(&mut self, row: u32, unit: F::Element) {
        self.worker.mul_row(row, &unit);
        self.row_ops.push(RowOp::Mul { row, unit });
    }

    fn swap_rows(&mut self, r1: u32, r2: u32) {
        if r1 == r2 {
            return;
        }
        self.worker.swap_rows(r1, r2);
        self.row_ops.push(RowOp::Swap(r1, r2));
    }

    /// Run `f` on a sub-eliminator holding the transposed worker, then fold
    /// its transposed operation logs back into this eliminator's.
    ///
    /// Row and column operations act as multiplications on opposite sides,
    /// so folding the interleaved child log into two separate parent logs
    /// preserves the product.
    fn transposed_subrun(&mut self, f: impl FnOnce(&mut Eliminator<F>)) {
        let worker = std::mem::replace(&mut self.worker, Worker::empty(self.field.clone()));

        let mut child = Eliminator {
            field: self.field.clone(),
            worker: worker.into_transposed(),
            row_ops: vec![],
            col_ops: vec![],
        };
        f(&mut child);

        self.worker = child.worker.into_transposed();
        self.col_ops
            .extend(child.row_ops.into_iter().map(RowOp::transpose));
        self.row_ops
            .extend(child.col_ops.into_iter().map(ColOp::transpose));
    }
}

/// Row echelon reduction; with `reduced` also brings the entries above each
/// pivot into canonical residues, yielding the (row) Hermite normal form.
struct EchelonStage {
    reduced: bool,
    row: u32,
    col: u32,
}

impl EchelonStage {
    fn new(reduced: bool) -> EchelonStage {
        EchelonStage {
            reduced,
            row: 0,
            col: 0,
        }
    }
}

impl<F> Stage<F> for EchelonStage
where
    F: EuclideanDomain + Sync,
    F::Element: Send + Sync,
{
    fn prepare(&mut self, elim: &mut Eliminator<F>) {
        elim.worker.enable_tracker();
    }

    fn is_done(&self, elim: &Eliminator<F>) -> bool {
        self.row >= elim.worker.nrows() || self.col >= elim.worker.ncols()
    }

    fn step(&mut self, elim: &mut Eliminator<F>) -> Flow {
        let candidates: SmallVec<[u32; 8]> = elim
            .worker
            .heads_in_col(self.col)
            .into_iter()
            .filter(|&i| i >= self.row)
            .collect();

        if candidates.is_empty() {
            self.col += 1;
            return Flow::Proceed;
        }

        // the cheap-row preference is a fill-in heuristic; any pick is correct
        let mut pivot = candidates
            .iter()
            .copied()
            .min_by_key(|&i| {
                let (_, v) = elim.worker.head(i).unwrap();
                (elim.field.degree(v), elim.worker.row_weight(i), i)
            })
            .unwrap();
        let mut pivot_val = elim.worker.head(pivot).unwrap().1.clone();

        // the degree measure may saturate for huge elements, so the minimum
        // above is only a first guess: a zero quotient against a nonzero head
        // exposes a strictly smaller candidate, which takes over as pivot
        let mut targets = Vec::with_capacity(candidates.len() - 1);
        'select: loop {
            targets.clear();
            for &i in &candidates {
                if i == pivot {
                    continue;
                }
                let v = elim.worker.head(i).unwrap().1;
                let (q, _) = elim.field.quot_rem(v, &pivot_val);
                if F::is_zero(&q) {
                    pivot = i;
                    pivot_val = v.clone();
                    continue 'select;
                }
                targets.push((i, elim.field.neg(&q)));
            }
            break;
        }

        trace!(row = self.row, col = self.col, pivot, "pivot selected");

        if !targets.is_empty() {
            // nonzero remainders keep their head in this column and are
            // reduced against a smaller pivot on the next step
            elim.batch_add_row(pivot, targets);
            return Flow::Proceed;
        }

        let unit = elim.field.normalizing_unit(&pivot_val);
        if !elim.field.is_one(&unit) {
            elim.mul_row(pivot, unit);
        }
        elim.swap_rows(pivot, self.row);

        if self.reduced && self.row > 0 {
            let pivot_val = elim.worker.head(self.row).unwrap().1.clone();
            let mut above = Vec::new();
            for i in 0..self.row {
                if let Some(v) = elim.worker.entry(i, self.col) {
                    let (q, _) = elim.field.quot_rem(v, &pivot_val);
                    if !F::is_zero(&q) {
                        above.push((i, elim.field.neg(&q)));
                    }
                }
            }
            elim.batch_add_row(self.row, above);
        }

        self.row += 1;
        self.col += 1;
        Flow::Proceed
    }
}

/// Alternates reduced row and column echelon passes until only the main
/// diagonal is populated.
struct DiagonalStage;

impl<F> Stage<F> for DiagonalStage
where
    F: EuclideanDomain + Sync,
    F::Element: Send + Sync,
{
    fn is_done(&self, elim: &Eliminator<F>) -> bool {
        elim.worker.is_diagonal()
    }

    fn step(&mut self, elim: &mut Eliminator<F>) -> Flow {
        run_stage(elim, &mut EchelonStage::new(true));
        if elim.worker.is_diagonal() {
            return Flow::Abort;
        }

        elim.transposed_subrun(|child| {
            run_stage(child, &mut EchelonStage::new(true));
        });
        Flow::Proceed
    }
}

/// Diagonalizes, then repairs the divisibility chain of the diagonal.
///
/// The chain repair works on a cached copy of the diagonal: each logged
/// operation is mirrored on the cache, and `finalize` writes the cache back
/// into the worker. This keeps the quadratic dense updates of the combine
/// steps out of the sparse rows.
struct SmithStage<F: Ring> {
    index: u32,
    diag: Vec<F::Element>,
}

impl<F: Ring> SmithStage<F> {
    fn new() -> SmithStage<F> {
        SmithStage {
            index: 0,
            diag: vec![],
        }
    }
}

impl<F> Stage<F> for SmithStage<F>
where
    F: EuclideanDomain + Sync,
    F::Element: Send + Sync,
{
    fn prepare(&mut self, elim: &mut Eliminator<F>) {
        run_stage(elim, &mut DiagonalStage);

        let n = elim.worker.nrows().min(elim.worker.ncols());
        self.diag = (0..n)
            .map(|i| {
                elim.worker
                    .entry(i, i)
                    .cloned()
                    .unwrap_or_else(|| elim.field.zero())
            })
            .collect();
    }

    fn is_done(&self, _elim: &Eliminator<F>) -> bool {
        self.diag[self.index as usize..].iter().all(F::is_zero)
    }

    fn step(&mut self, elim: &mut Eliminator<F>) -> Flow {
        let field = elim.field.clone();
        let n = self.diag.len() as u32;

        let Some(k) = (self.index..n)
            .filter(|&i| !F::is_zero(&self.diag[i as usize]))
            .min_by_key(|&i| (field.degree(&self.diag[i as usize]), i))
        else {
            return Flow::Abort;
        };
        let a = self.diag[k as usize].clone();

        let partner = (self.index..n).find(|&j| {
            j != k
                && !F::is_zero(&self.diag[j as usize])
                && !F::is_zero(&field.rem(&self.diag[j as usize], &a))
        });

        let Some(j) = partner else {
            // the pivot divides every remaining entry; fix it as the next
            // invariant factor
            let unit = field.normalizing_unit(&a);
            if !field.is_one(&unit) {
                self.diag[k as usize] = field.mul(&a, &unit);
                elim.row_ops.push(RowOp::Mul { row: k, unit });
            }
            if k != self.index {
                self.diag.swap(k as usize, self.index as usize);
                elim.row_ops.push(RowOp::Swap(k, self.index));
                elim.col_ops.push(ColOp::Swap(k, self.index));
            }
            self.index += 1;
            return Flow::Proceed;
        };

        let b = self.diag[j as usize].clone();
        trace!(index = self.index, pivot = k, partner = j, "combining diagonal pair");

        // Replace the pair (a, b) by (gcd, ±lcm) with five elementary
        // operations on rows/columns k and j. With g = s·a + t·b the 2x2
        // block [[a,0],[0,b]] evolves as
        //   [[a,0],[s·a,b]] -> [[a,0],[g,b]] -> [[0,m],[g,b]]
        //   -> [[0,m],[g,0]] -> [[g,0],[0,m]]
        // where m = -(a/g)·b.
        let (g, s, t) = field.extended_gcd(&a, &b);
        let (a_g, _) = field.quot_rem(&a, &g);
        let (b_g, _) = field.quot_rem(&b, &g);

        elim.row_ops.push(RowOp::Add {
            src: k,
            dst: j,
            mult: s,
        });
        elim.col_ops.push(ColOp::Add {
            src: j,
            dst: k,
            mult: t,
        });
        elim.row_ops.push(RowOp::Add {
            src: j,
            dst: k,
            mult: field.neg(&a_g),
        });
        elim.col_ops.push(ColOp::Add {
            src: k,
            dst: j,
            mult: field.neg(&b_g),
        });
        elim.row_ops.push(RowOp::Swap(k, j));

        self.diag[j as usize] = field.neg(&field.mul(&a_g, &b));
        self.diag[k as usize] = g;

        Flow::Proceed
    }

    fn finalize(&mut self, elim: &mut Eliminator<F>) {
        elim.worker.set_diagonal(&self.diag);
    }
}

#[cfg(test)]
mod test {
    use rug::Integer;

    use crate::domains::finite_field::Zp;
    use crate::domains::integer::{IntegerRing, Z};
    use crate::domains::rational::Q;
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

    fn check_row_echelon(m: &Matrix<IntegerRing>, reduced: bool) {
        let mut last_head: Option<u32> = None;
        for (i, row) in m.row_iter().enumerate() {
            let head = row.iter().position(|e| *e != 0).map(|c| c as u32);
            if let Some(c) = head {
                assert!(
                    last_head.is_none() || last_head.unwrap() < c,
                    "head columns do not increase strictly"
                );
                let pivot = &row[c as usize];
                assert!(*pivot > 0, "pivot not normalized");
                if reduced {
                    for r in 0..i {
                        let above = &m[(r as u32, c)];
                        assert!(
                            *above >= 0 && above < pivot,
                            "entry above pivot not a canonical residue"
                        );
                    }
                }
            } else {
                for later in m.row_iter().skip(i) {
                    assert!(later.iter().all(|e| *e == 0), "zero row above nonzero row");
                }
                break;
            }
            last_head = head;
        }
    }

    #[test]
    fn row_echelon() {
        let a = zmat(&[&[2, 4, 4], &[-6, 6, 12], &[10, 4, 16]]);

        let e = eliminate(&a, Form::RowEchelon);
        check_row_echelon(e.matrix(), false);
        assert_eq!(e.rank(), 3);
        assert!(e.col_ops().is_empty());

        let h = eliminate(&a, Form::RowHermite);
        check_row_echelon(h.matrix(), true);
    }

    #[test]
    fn echelon_with_wide_integers() {
        // heads wider than 64 bits, where the degree measure saturates and
        // pivot selection must fall back on exact quotients
        let a = Matrix::from_nested_vec(
            vec![
                vec![Integer::from(1) << 70, Integer::from(1) << 300],
                vec![Integer::from(1) << 80, Integer::from(0)],
            ],
            Z,
        )
        .unwrap();

        let e = eliminate(&a, Form::RowEchelon);
        check_row_echelon(e.matrix(), false);
        assert_eq!(e.rank(), 2);
        assert_eq!(&(&e.left() * &a) * &e.right(), *e.matrix());

        let s = eliminate(&a, Form::Smith);
        assert_eq!(
            s.invariant_factors(),
            vec![Integer::from(1) << 70, Integer::from(1) << 310]
        );
    }

    #[test]
    fn hermite_is_idempotent() {
        let a = zmat(&[&[5, -8, 3], &[0, 4, 1], &[3, 3, 3], &[1, 1, 1]]);

        let h = eliminate(&a, Form::RowHermite);
        check_row_echelon(h.matrix(), true);

        let again = eliminate(h.matrix(), Form::RowHermite);
        assert_eq!(again.matrix(), h.matrix());
        assert!(again.row_ops().is_empty());
        assert!(again.col_ops().is_empty());
    }

    #[test]
    fn col_echelon_transposes_row_echelon() {
        let a = zmat(&[&[2, 4, 4], &[-6, 6, 12], &[10, 4, 16]]);

        let e = eliminate(&a, Form::ColHermite);
        assert!(e.row_ops().is_empty());
        check_row_echelon(&e.matrix().transpose(), true);
    }

    #[test]
    fn diagonal_form() {
        let a = zmat(&[&[2, 4, 4], &[-6, 6, 12], &[10, 4, 16]]);

        let d = eliminate(&a, Form::Diagonal);
        assert!(d.matrix().is_diagonal());
        assert_eq!(d.rank(), 3);
    }

    fn check_smith(m: &Matrix<IntegerRing>, diag: &[i64]) {
        assert_eq!(
            *m,
            Matrix::from_entries(
                m.nrows() as u32,
                m.ncols() as u32,
                diag.iter()
                    .enumerate()
                    .map(|(i, &d)| (i as u32, i as u32, Integer::from(d))),
                Z,
            )
            .unwrap()
        );
    }

    #[test]
    fn smith_unimodular() {
        let a = zmat(&[
            &[2, -1, -2, -2, -3],
            &[1, 2, -1, 1, -1],
            &[2, -2, -4, -3, -6],
            &[1, 7, 1, 5, 3],
            &[1, -12, -6, -10, -11],
        ]);

        let e = eliminate(&a, Form::Smith);
        check_smith(e.matrix(), &[1, 1, 1, 1, 1]);
    }

    #[test]
    fn smith_rank_deficient() {
        let a = zmat(&[
            &[3, -5, -22, 20, 8],
            &[6, -11, -50, 45, 18],
            &[-1, 2, 10, -9, -3],
            &[3, -6, -30, 27, 10],
            &[-1, 2, 7, -6, -3],
        ]);

        let e = eliminate(&a, Form::Smith);
        check_smith(e.matrix(), &[1, 1, 1, 1, 0]);
        assert_eq!(e.rank(), 4);
    }

    #[test]
    fn smith_torsion() {
        let a = zmat(&[
            &[-20, -7, -27, 2, 29],
            &[17, 8, 14, -4, -10],
            &[13, 8, 10, -4, -6],
            &[-9, -2, -14, 0, 16],
            &[5, 0, 5, -1, -4],
        ]);

        let e = eliminate(&a, Form::Smith);
        check_smith(e.matrix(), &[1, 1, 1, 2, 60]);
        assert_eq!(
            e.invariant_factors(),
            vec![
                Integer::from(1),
                Integer::from(1),
                Integer::from(1),
                Integer::from(2),
                Integer::from(60)
            ]
        );
    }

    #[test]
    fn smith_zero_matrix() {
        let a = Matrix::new(4, 6, Z);

        let e = eliminate(&a, Form::Smith);
        assert!(e.matrix().is_zero());
        assert_eq!(e.rank(), 0);
        assert!(e.row_ops().is_empty());
        assert!(e.col_ops().is_empty());
    }

    #[test]
    fn smith_divisibility_chain() {
        let a = zmat(&[&[4, 0, 0], &[0, 6, 0], &[0, 0, 10]]);

        let e = eliminate(&a, Form::Smith);
        let f = e.invariant_factors();
        assert_eq!(f.len(), 3);
        for w in f.windows(2) {
            assert!((w[1].clone() % w[0].clone()) == 0, "chain violated");
        }
        assert_eq!(f[0], Integer::from(2));
    }

    #[test]
    fn rational_full_rank_smith_is_identity() {
        // triangular with nonzero diagonal, so full rank by construction
        let a = Matrix::from_nested_vec(
            vec![
                vec![(1, 2).into(), 3.into(), 0.into(), 1.into(), 2.into()],
                vec![0.into(), (2, 3).into(), 1.into(), 0.into(), 1.into()],
                vec![0.into(), 0.into(), (5, 7).into(), 2.into(), 0.into()],
                vec![0.into(), 0.into(), 0.into(), (3, 4).into(), 1.into()],
                vec![0.into(), 0.into(), 0.into(), 0.into(), (1, 5).into()],
            ],
            Q,
        )
        .unwrap();

        let e = eliminate(&a, Form::Smith);
        assert_eq!(*e.matrix(), Matrix::identity(5, Q));
    }

    #[test]
    fn prime_field_reduced_echelon() {
        let a = Matrix::from_nested_vec(
            vec![vec![2, 3, 1], vec![4, 6, 5], vec![1, 0, 2]],
            Zp::new(7),
        )
        .unwrap();

        let e = eliminate(&a, Form::RowHermite);
        // over a field the reduced row form is the RREF
        assert_eq!(e.matrix()[(0, 0)], 1);
        assert_eq!(e.matrix()[(0, 1)], 0);
        assert_eq!(e.rank(), 3);
    }
}
