//! Sparse rows for the elimination worker.

use crate::domains::Ring;

/// A sparse row: the nonzero entries of one matrix row, sorted by column.
///
/// The row does not know its logical width; the [Worker](super::worker::Worker)
/// holding it does. All arithmetic keeps the entry list sorted and free of
/// explicit zeroes.
#[derive(Clone, PartialEq, Eq, Debug, Hash)]
pub struct SparseRow<F: Ring> {
    entries: Vec<(u32, F::Element)>,
}

impl<F: Ring> Default for SparseRow<F> {
    fn default() -> Self {
        SparseRow { entries: vec![] }
    }
}

impl<F: Ring> SparseRow<F> {
    /// Build a row from entries that are already sorted by column and nonzero.
    pub fn from_sorted_entries(entries: Vec<(u32, F::Element)>) -> SparseRow<F> {
        debug_assert!(entries.windows(2).all(|w| w[0].0 < w[1].0));
        debug_assert!(entries.iter().all(|(_, e)| !F::is_zero(e)));
        SparseRow { entries }
    }

    /// The leftmost nonzero entry, if any.
    pub fn head(&self) -> Option<(u32, &F::Element)> {
        self.entries.first().map(|(c, e)| (*c, e))
    }

    /// The column of the leftmost nonzero entry, if any.
    pub fn head_col(&self) -> Option<u32> {
        self.entries.first().map(|(c, _)| *c)
    }

    /// Look up the entry in column `col`.
    pub fn get(&self, col: u32) -> Option<&F::Element> {
        self.entries
            .binary_search_by_key(&col, |(c, _)| *c)
            .ok()
            .map(|i| &self.entries[i].1)
    }

    /// Iterate over the nonzero entries in column order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, &F::Element)> {
        self.entries.iter().map(|(c, e)| (*c, e))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// The summed element weight of the row.
    pub fn weight(&self, field: &F) -> u64 {
        self.entries
            .iter()
            .map(|(_, e)| field.element_weight(e))
            .sum()
    }

    /// Compute `self += mult * src` with a sorted merge walk and return the
    /// change in row weight.
    pub fn add_scaled(&mut self, field: &F, src: &SparseRow<F>, mult: &F::Element) -> i64 {
        if F::is_zero(mult) || src.is_empty() {
            return 0;
        }

        let mut delta = 0i64;
        let mut merged = Vec::with_capacity(self.entries.len() + src.entries.len());
        let mut a = self.entries.drain(..).peekable();
        let mut b = src.entries.iter().peekable();

        loop {
            match (a.peek(), b.peek()) {
                (Some((ca, _)), Some((cb, _))) if ca < cb => {
                    merged.push(a.next().unwrap());
                }
                (Some((ca, _)), Some((cb, _))) if ca > cb => {
                    let (c, e) = b.next().unwrap();
                    let e = field.mul(mult, e);
                    delta += field.element_weight(&e) as i64;
                    merged.push((*c, e));
                }
                (Some(_), Some(_)) => {
                    let (c, mut e) = a.next().unwrap();
                    let (_, s) = b.next().unwrap();
                    delta -= field.element_weight(&e) as i64;
                    field.add_mul_assign(&mut e, mult, s);
                    if !F::is_zero(&e) {
                        delta += field.element_weight(&e) as i64;
                        merged.push((c, e));
                    }
                }
                (Some(_), None) => {
                    merged.push(a.next().unwrap());
                }
                (None, Some(_)) => {
                    let (c, e) = b.next().unwrap();
                    let e = field.mul(mult, e);
                    delta += field.element_weight(&e) as i64;
                    merged.push((*c, e));
                }
                (None, None) => break,
            }
        }

        drop(a);
        self.entries = merged;

        delta
    }

    /// Multiply every entry by `unit` and return the change in row weight.
    /// The caller must guarantee `unit` is nonzero.
    pub fn scale(&mut self, field: &F, unit: &F::Element) -> i64 {
        let mut delta = 0i64;
        for (_, e) in &mut self.entries {
            delta -= field.element_weight(e) as i64;
            field.mul_assign(e, unit);
            delta += field.element_weight(e) as i64;
        }
        debug_assert!(self.entries.iter().all(|(_, e)| !F::is_zero(e)));

        delta
    }

    /// Drop every stored entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod test {
    use rug::Integer;

    use crate::domains::integer::{IntegerRing, Z};

    use super::SparseRow;

    fn row(entries: &[(u32, i64)]) -> SparseRow<IntegerRing> {
        SparseRow::from_sorted_entries(
            entries
                .iter()
                .map(|&(c, e)| (c, Integer::from(e)))
                .collect(),
        )
    }

    #[test]
    fn basics() {
        let r = row(&[(1, 3), (4, -2)]);
        assert_eq!(r.head_col(), Some(1));
        assert_eq!(r.get(4), Some(&Integer::from(-2)));
        assert_eq!(r.get(2), None);
        assert!(!r.is_empty());
        assert!(SparseRow::<IntegerRing>::default().is_empty());
    }

    #[test]
    fn add_scaled_merges_and_cancels() {
        let mut a = row(&[(0, 2), (2, 4), (5, 1)]);
        let b = row(&[(1, 1), (2, 2), (5, 3)]);

        // a += -2 * b cancels column 2 and introduces column 1
        a.add_scaled(&Z, &b, &Integer::from(-2));
        assert_eq!(a, row(&[(0, 2), (1, -2), (5, -5)]));

        // adding with multiplier zero is a no-op
        let before = a.clone();
        assert_eq!(a.add_scaled(&Z, &b, &Integer::from(0)), 0);
        assert_eq!(a, before);
    }

    #[test]
    fn weight_deltas() {
        let mut a = row(&[(0, 1)]);
        let b = row(&[(1, 255)]);

        // weight of 1 is one bit, of 255 eight bits
        assert_eq!(a.weight(&Z), 1);
        let delta = a.add_scaled(&Z, &b, &Integer::from(1));
        assert_eq!(delta, 8);
        assert_eq!(a.weight(&Z), 9);

        let delta = a.scale(&Z, &Integer::from(-1));
        assert_eq!(delta, 0);

        // a cancelled entry gives back exactly its old weight
        let delta = a.add_scaled(&Z, &b, &Integer::from(1));
        assert_eq!(delta, -8);
        assert_eq!(a, row(&[(0, -1)]));
        assert_eq!(a.weight(&Z), 1);
    }
}
