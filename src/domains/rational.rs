use std::cmp::Ordering;
use std::fmt::{Display, Formatter};

use rug::{Complete, Rational as MultiPrecisionRational};

use super::{EuclideanDomain, Field, Ring};

/// The field of rational numbers.
pub type Q = RationalField;
/// The field of rational numbers.
pub const Q: RationalField = RationalField::new();

/// The field of arbitrary-precision rationals, with [rug::Rational] elements.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub struct RationalField;

impl RationalField {
    pub const fn new() -> RationalField {
        RationalField
    }
}

impl Display for RationalField {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str("ℚ")
    }
}

impl Ring for RationalField {
    type Element = MultiPrecisionRational;

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
        MultiPrecisionRational::new()
    }

    #[inline]
    fn one(&self) -> Self::Element {
        MultiPrecisionRational::from(1)
    }

    #[inline]
    fn nth(&self, n: i64) -> Self::Element {
        MultiPrecisionRational::from(n)
    }

    #[inline]
    fn is_zero(a: &Self::Element) -> bool {
        a.cmp0() == Ordering::Equal
    }

    #[inline]
    fn is_one(&self, a: &Self::Element) -> bool {
        *a == 1
    }

    #[inline]
    fn element_weight(&self, a: &Self::Element) -> u64 {
        (a.numer().significant_bits() + a.denom().significant_bits()).max(1) as u64
    }
}

impl EuclideanDomain for RationalField {
    #[inline]
    fn rem(&self, _a: &Self::Element, b: &Self::Element) -> Self::Element {
        assert!(
            b.cmp0() != Ordering::Equal,
            "Cannot divide by zero"
        );
        self.zero()
    }

    #[inline]
    fn quot_rem(&self, a: &Self::Element, b: &Self::Element) -> (Self::Element, Self::Element) {
        (self.div(a, b), self.zero())
    }

    fn gcd(&self, a: &Self::Element, b: &Self::Element) -> Self::Element {
        if Self::is_zero(a) && Self::is_zero(b) {
            self.zero()
        } else {
            self.one()
        }
    }

    fn extended_gcd(
        &self,
        a: &Self::Element,
        b: &Self::Element,
    ) -> (Self::Element, Self::Element, Self::Element) {
        if !Self::is_zero(a) {
            (self.one(), self.inv(a), self.zero())
        } else if !Self::is_zero(b) {
            (self.one(), self.zero(), self.inv(b))
        } else {
            (self.zero(), self.zero(), self.zero())
        }
    }

    #[inline]
    fn degree(&self, a: &Self::Element) -> u64 {
        if Self::is_zero(a) {
            0
        } else {
            1
        }
    }

    #[inline]
    fn normalizing_unit(&self, a: &Self::Element) -> Self::Element {
        if Self::is_zero(a) {
            self.one()
        } else {
            self.inv(a)
        }
    }

    #[inline]
    fn inv_unit(&self, u: &Self::Element) -> Self::Element {
        self.inv(u)
    }
}

impl Field for RationalField {
    #[inline]
    fn div(&self, a: &Self::Element, b: &Self::Element) -> Self::Element {
        assert!(
            b.cmp0() != Ordering::Equal,
            "Cannot divide by zero"
        );
        (a / b).complete()
    }

    #[inline]
    fn div_assign(&self, a: &mut Self::Element, b: &Self::Element) {
        assert!(
            b.cmp0() != Ordering::Equal,
            "Cannot divide by zero"
        );
        *a /= b;
    }

    #[inline]
    fn inv(&self, a: &Self::Element) -> Self::Element {
        assert!(
            a.cmp0() != Ordering::Equal,
            "Cannot invert zero"
        );
        a.clone().recip()
    }
}

#[cfg(test)]
mod test {
    use rug::Rational;

    use crate::domains::{EuclideanDomain, Field, Ring};

    use super::{RationalField, Q};

    #[test]
    fn field_arithmetic() {
        let a = Rational::from((3, 4));
        let b = Rational::from((2, 5));

        assert_eq!(Q.add(&a, &b), Rational::from((23, 20)));
        assert_eq!(Q.mul(&a, &b), Rational::from((3, 10)));
        assert_eq!(Q.div(&a, &b), Rational::from((15, 8)));
        assert_eq!(Q.mul(&a, &Q.inv(&a)), 1);
    }

    #[test]
    fn euclidean_structure() {
        let a = Rational::from((3, 4));
        let (q, r) = Q.quot_rem(&a, &Rational::from(2));
        assert_eq!(q, Rational::from((3, 8)));
        assert!(RationalField::is_zero(&r));

        assert_eq!(Q.degree(&a), 1);
        assert_eq!(Q.degree(&Rational::new()), 0);
        // the normalizing unit scales every nonzero element to one
        assert_eq!(Q.mul(&a, &Q.normalizing_unit(&a)), 1);
    }
}
