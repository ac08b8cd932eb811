use std::cmp::Ordering;
use std::fmt::{Display, Formatter};

use rug::{Complete, Integer as MultiPrecisionInteger};

use super::{EuclideanDomain, Ring};

/// The integer ring.
pub type Z = IntegerRing;
/// The integer ring.
pub const Z: IntegerRing = IntegerRing::new();

/// The ring of arbitrary-precision integers, with [rug::Integer] elements.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub struct IntegerRing;

impl IntegerRing {
    pub const fn new() -> IntegerRing {
        IntegerRing
    }
}

impl Display for IntegerRing {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str("ℤ")
    }
}

impl Ring for IntegerRing {
    type Element = MultiPrecisionInteger;

    #[inline]
    fn add(&self, a: &Self::Element, b: &Self::Element) -> Self::Element {
        (a + b).complete()
    }

    #[inline]
    fn sub(&self, a: &Self::Element, b: &Self::Element) -> Self::Element {
        (a - b).complete()
    }

    #[inline]
    fn mul(&self, a: &Self::Element, b: &Self::Element) -> Self::Element {
        (a * b).complete()
    }

    #[inline]
    fn add_assign(&self, a: &mut Self::Element, b: &Self::Element) {
        *a += b;
    }

    #[inline]
    fn sub_assign(&self, a: &mut Self::Element, b: &Self::Element) {
        *a -= b;
    }

    #[inline]
    fn mul_assign(&self, a: &mut Self::Element, b: &Self::Element) {
        *a *= b;
    }

    #[inline]
    fn add_mul_assign(&self, a: &mut Self::Element, b: &Self::Element, c: &Self::Element) {
        *a += (b * c).complete();
    }

    #[inline]
    fn sub_mul_assign(&self, a: &mut Self::Element, b: &Self::Element, c: &Self::Element) {
        *a -= (b * c).complete();
    }

    #[inline]
    fn neg(&self, a: &Self::Element) -> Self::Element {
        (-a).complete()
    }

    #[inline]
    fn zero(&self) -> Self::Element {
        MultiPrecisionInteger::new()
    }

    #[inline]
    fn one(&self) -> Self::Element {
        MultiPrecisionInteger::from(1)
    }

    #[inline]
    fn nth(&self, n: i64) -> Self::Element {
        MultiPrecisionInteger::from(n)
    }

    #[inline]
    fn is_zero(a: &Self::Element) -> bool {
        *a == 0
    }

    #[inline]
    fn is_one(&self, a: &Self::Element) -> bool {
        *a == 1
    }

    #[inline]
    fn element_weight(&self, a: &Self::Element) -> u64 {
        // charge by bit length so the tracker steers away from huge entries
        a.significant_bits().max(1) as u64
    }
}

impl EuclideanDomain for IntegerRing {
    #[inline]
    fn rem(&self, a: &Self::Element, b: &Self::Element) -> Self::Element {
        self.quot_rem(a, b).1
    }

    /// Euclidean division: the remainder is in `[0, |b|)`.
    #[inline]
    fn quot_rem(&self, a: &Self::Element, b: &Self::Element) -> (Self::Element, Self::Element) {
        assert!(*b != 0, "Cannot divide by zero");
        a.clone().div_rem_euc(b.clone())
    }

    #[inline]
    fn gcd(&self, a: &Self::Element, b: &Self::Element) -> Self::Element {
        a.clone().gcd(b)
    }

    fn extended_gcd(
        &self,
        a: &Self::Element,
        b: &Self::Element,
    ) -> (Self::Element, Self::Element, Self::Element) {
        a.clone()
            .extended_gcd(b.clone(), MultiPrecisionInteger::new())
    }

    #[inline]
    fn degree(&self, a: &Self::Element) -> u64 {
        a.clone().abs().to_u64().unwrap_or(u64::MAX)
    }

    #[inline]
    fn normalizing_unit(&self, a: &Self::Element) -> Self::Element {
        if a.cmp0() == Ordering::Less {
            MultiPrecisionInteger::from(-1)
        } else {
            MultiPrecisionInteger::from(1)
        }
    }

    #[inline]
    fn inv_unit(&self, u: &Self::Element) -> Self::Element {
        if *u == 1 || *u == -1 {
            u.clone()
        } else {
            panic!("{} is not a unit in ℤ", u);
        }
    }
}
