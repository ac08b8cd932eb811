//! Defines the algebraic traits the elimination engine is generic over.
//!
//! The core trait is [Ring], which has two binary operations, addition and
//! multiplication. Each ring has an associated element type that should not
//! be confused with the ring type itself:
//! - The ring of integers [Z](const@integer::Z) has elements of type [rug::Integer].
//! - The field of rationals [Q](const@rational::Q) has elements of type [rug::Rational].
//! - A prime field [Zp](finite_field::Zp) has elements of type `u64`.
//!
//! The ring elements do not implement operations such as addition or
//! multiplication themselves; the ring does. All matrix structures are
//! generic over the ring type.
//!
//! [EuclideanDomain] extends [Ring] with division with remainder, gcds and
//! the unit bookkeeping that normal-form computations need; [Field] further
//! adds division and inversion.

pub mod finite_field;
pub mod integer;
pub mod rational;

use std::fmt::{Debug, Display};
use std::hash::Hash;

/// A ring is a set with two binary operations, addition and multiplication.
///
/// The ring is a value object and performs all arithmetic on its elements;
/// this allows rings that carry data (such as the prime of a finite field)
/// to share one element representation.
pub trait Ring: Clone + PartialEq + Eq + Hash + Debug + Display {
    type Element: Clone + PartialEq + Eq + Hash + Debug + Display;

    fn add(&self, a: &Self::Element, b: &Self::Element) -> Self::Element;
    fn sub(&self, a: &Self::Element, b: &Self::Element) -> Self::Element;
    fn mul(&self, a: &Self::Element, b: &Self::Element) -> Self::Element;
    fn add_assign(&self, a: &mut Self::Element, b: &Self::Element);
    fn sub_assign(&self, a: &mut Self::Element, b: &Self::Element);
    fn mul_assign(&self, a: &mut Self::Element, b: &Self::Element);
    /// Compute `a += b * c`.
    fn add_mul_assign(&self, a: &mut Self::Element, b: &Self::Element, c: &Self::Element);
    /// Compute `a -= b * c`.
    fn sub_mul_assign(&self, a: &mut Self::Element, b: &Self::Element, c: &Self::Element);
    fn neg(&self, a: &Self::Element) -> Self::Element;
    fn zero(&self) -> Self::Element;
    fn one(&self) -> Self::Element;
    /// Return the nth element by computing `n * 1`.
    fn nth(&self, n: i64) -> Self::Element;
    fn is_zero(a: &Self::Element) -> bool;
    fn is_one(&self, a: &Self::Element) -> bool;

    /// A computational cost estimate for storing and combining `a`,
    /// used by the elimination tracker to prefer cheap pivot rows.
    /// Any positive measure works; the default charges every element equally.
    fn element_weight(&self, _a: &Self::Element) -> u64 {
        1
    }
}

/// A Euclidean domain is a ring with division with remainder: for `b != 0`,
/// `quot_rem(a, b) = (q, r)` with `a = q·b + r` and `degree(r) < degree(b)`.
///
/// The strictly decreasing degree is what makes echelon and Smith reductions
/// terminate; supplying a ring that violates it is a contract violation and
/// may loop forever.
pub trait EuclideanDomain: Ring {
    fn rem(&self, a: &Self::Element, b: &Self::Element) -> Self::Element;
    fn quot_rem(&self, a: &Self::Element, b: &Self::Element) -> (Self::Element, Self::Element);
    fn gcd(&self, a: &Self::Element, b: &Self::Element) -> Self::Element;

    /// Return `(g, s, t)` with `g = gcd(a, b) = s·a + t·b`.
    fn extended_gcd(
        &self,
        a: &Self::Element,
        b: &Self::Element,
    ) -> (Self::Element, Self::Element, Self::Element);

    /// The Euclidean size measure, with `degree(0) = 0`. Only comparisons
    /// between degrees are meaningful; pivot selection prefers small ones.
    fn degree(&self, a: &Self::Element) -> u64;

    /// A unit `u` such that `a·u` is the canonical associate of `a`
    /// (for the integers: `±1` so that `a·u >= 0`; for a field: `a⁻¹`).
    /// Returns `1` for `a = 0`.
    fn normalizing_unit(&self, a: &Self::Element) -> Self::Element;

    /// The multiplicative inverse of a unit. Panics if `u` is not a unit.
    fn inv_unit(&self, u: &Self::Element) -> Self::Element;
}

/// A field is a ring where every nonzero element is invertible.
pub trait Field: EuclideanDomain {
    fn div(&self, a: &Self::Element, b: &Self::Element) -> Self::Element;
    fn div_assign(&self, a: &mut Self::Element, b: &Self::Element);
    fn inv(&self, a: &Self::Element) -> Self::Element;
}
