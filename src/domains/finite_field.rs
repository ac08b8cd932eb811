use std::fmt::{Display, Formatter};

use super::{EuclideanDomain, Field, Ring};

/// A prime field `ℤ/p` with `u64` residue elements in `[0, p)`.
///
/// The modulus is carried by the field value, not by the elements, so
/// elements of different primes must never be mixed; the matrix structures
/// guarantee this by construction.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Zp {
    prime: u64,
}

impl Zp {
    /// Create the field `ℤ/p`. The primality of `p` is the caller's
    /// responsibility; a composite modulus breaks inversion.
    pub fn new(prime: u64) -> Zp {
        assert!(prime >= 2, "Moduli smaller than 2 are not supported");
        Zp { prime }
    }

    pub fn get_prime(&self) -> u64 {
        self.prime
    }

    /// Reduce an arbitrary signed integer into the field.
    pub fn to_element(&self, a: i64) -> u64 {
        a.rem_euclid(self.prime as i64) as u64
    }
}

impl Display for Zp {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "𝔽_{}", self.prime)
    }
}

impl Ring for Zp {
    type Element = u64;

    #[inline]
    fn add(&self, a: &Self::Element, b: &Self::Element) -> Self::Element {
        ((*a as u128 + *b as u128) % self.prime as u128) as u64
    }

    #[inline]
    fn sub(&self, a: &Self::Element, b: &Self::Element) -> Self::Element {
        self.add(a, &self.neg(b))
    }

    #[inline]
    fn mul(&self, a: &Self::Element, b: &Self::Element) -> Self::Element {
        ((*a as u128 * *b as u128) % self.prime as u128) as u64
    }

    #[inline]
    fn add_assign(&self, a: &mut Self::Element, b: &Self::Element) {
        *a = self.add(a, b);
    }

    #[inline]
    fn sub_assign(&self, a: &mut Self::Element, b: &Self::Element) {
        *a = self.sub(a, b);
    }

    #[inline]
    fn mul_assign(&self, a: &mut Self::Element, b: &Self::Element) {
        *a = self.mul(a, b);
    }

    #[inline]
    fn add_mul_assign(&self, a: &mut Self::Element, b: &Self::Element, c: &Self::Element) {
        *a = self.add(a, &self.mul(b, c));
    }

    #[inline]
    fn sub_mul_assign(&self, a: &mut Self::Element, b: &Self::Element, c: &Self::Element) {
        *a = self.sub(a, &self.mul(b, c));
    }

    #[inline]
    fn neg(&self, a: &Self::Element) -> Self::Element {
        if *a == 0 {
            0
        } else {
            self.prime - *a
        }
    }

    #[inline]
    fn zero(&self) -> Self::Element {
        0
    }

    #[inline]
    fn one(&self) -> Self::Element {
        1
    }

    #[inline]
    fn nth(&self, n: i64) -> Self::Element {
        let p = self.prime as i128;
        ((n as i128 % p + p) % p) as u64
    }

    #[inline]
    fn is_zero(a: &Self::Element) -> bool {
        *a == 0
    }

    #[inline]
    fn is_one(&self, a: &Self::Element) -> bool {
        *a == 1
    }
}

impl EuclideanDomain for Zp {
    #[inline]
    fn rem(&self, _a: &Self::Element, b: &Self::Element) -> Self::Element {
        assert!(*b != 0, "Cannot divide by zero");
        0
    }

    #[inline]
    fn quot_rem(&self, a: &Self::Element, b: &Self::Element) -> (Self::Element, Self::Element) {
        (self.div(a, b), 0)
    }

    fn gcd(&self, a: &Self::Element, b: &Self::Element) -> Self::Element {
        if *a == 0 && *b == 0 {
            0
        } else {
            1
        }
    }

    fn extended_gcd(
        &self,
        a: &Self::Element,
        b: &Self::Element,
    ) -> (Self::Element, Self::Element, Self::Element) {
        if *a != 0 {
            (1, self.inv(a), 0)
        } else if *b != 0 {
            (1, 0, self.inv(b))
        } else {
            (0, 0, 0)
        }
    }

    #[inline]
    fn degree(&self, a: &Self::Element) -> u64 {
        if *a == 0 {
            0
        } else {
            1
        }
    }

    #[inline]
    fn normalizing_unit(&self, a: &Self::Element) -> Self::Element {
        if *a == 0 {
            1
        } else {
            self.inv(a)
        }
    }

    #[inline]
    fn inv_unit(&self, u: &Self::Element) -> Self::Element {
        self.inv(u)
    }
}

impl Field for Zp {
    #[inline]
    fn div(&self, a: &Self::Element, b: &Self::Element) -> Self::Element {
        self.mul(a, &self.inv(b))
    }

    #[inline]
    fn div_assign(&self, a: &mut Self::Element, b: &Self::Element) {
        *a = self.div(a, b);
    }

    /// Invert via the extended Euclidean algorithm.
    fn inv(&self, a: &Self::Element) -> Self::Element {
        assert!(*a != 0, "Cannot invert zero in {}", self);

        let (mut r0, mut r1) = (self.prime as i128, *a as i128);
        let (mut s0, mut s1) = (0i128, 1i128);
        while r1 != 0 {
            let q = r0 / r1;
            (r0, r1) = (r1, r0 - q * r1);
            (s0, s1) = (s1, s0 - q * s1);
        }
        assert!(r0 == 1, "{} is not invertible modulo {}", a, self.prime);

        let p = self.prime as i128;
        ((s0 % p + p) % p) as u64
    }
}

#[cfg(test)]
mod test {
    use crate::domains::{Field, Ring};

    use super::Zp;

    #[test]
    fn arithmetic() {
        let f = Zp::new(7);
        assert_eq!(f.add(&5, &4), 2);
        assert_eq!(f.sub(&2, &5), 4);
        assert_eq!(f.mul(&3, &5), 1);
        assert_eq!(f.neg(&3), 4);
        assert_eq!(f.nth(-8), 6);
    }

    #[test]
    fn inversion() {
        let f = Zp::new(101);
        for a in 1..101u64 {
            assert_eq!(f.mul(&a, &f.inv(&a)), 1);
        }
    }
}
