//! Sub-domain capability contract.
//!
//! Every slot of a [`Product`][crate::product::Product] is governed by an
//! [`AbstractDomain`]. The product never looks inside a slot's value: it only
//! calls the operations below.

use std::collections::BTreeMap;
use std::fmt::Debug;

/// Abstract domain interface.
///
/// An abstract domain represents a lattice structure used for
/// approximating program states in static analysis.
///
/// # Lattice Properties
///
/// An abstract domain must satisfy:
/// - Reflexivity: `∀a. a ⊑ a`
/// - Transitivity: `∀a,b,c. a ⊑ b ∧ b ⊑ c ⇒ a ⊑ c`
/// - Identity: `∀a. a ⊔ ⊥ = a`
/// - Upper bound: `∀a,b. a ⊑ a ⊔ b`
///
/// # Parts
///
/// A *part* is a query addressing a nested piece of an element, for example
/// "every member of this set". The addressed piece has type [`Focus`].
/// The product uses parts to fold, transform and partition the value stored
/// under one slot without knowing how that value is represented.
///
/// [`Focus`]: AbstractDomain::Focus
pub trait AbstractDomain: Clone + Debug + Sized {
    /// The type representing abstract elements.
    type Element: Clone + Debug + PartialEq;

    /// Query addressing a nested piece of an element.
    type Part: Clone + Debug;

    /// The nested piece addressed by a [`Part`][AbstractDomain::Part].
    type Focus;

    /// Create the bottom element (⊥): represents "no information".
    fn bottom(&self) -> Self::Element;

    /// Check if an element is bottom.
    fn is_bottom(&self, elem: &Self::Element) -> bool;

    /// Partial order: `elem1 ⊑ elem2` (elem1 is more precise than elem2).
    fn le(&self, elem1: &Self::Element, elem2: &Self::Element) -> bool;

    /// Join (`⊔`): least upper bound, over-approximation.
    fn join(&self, elem1: &Self::Element, elem2: &Self::Element) -> Self::Element;

    /// Widening (`∇`): accelerates convergence in fixpoint computation.
    ///
    /// `iteration` counts the fixpoint iterations performed so far, which
    /// lets a domain switch strategy after a number of rounds (for example,
    /// widen straight to top).
    /// Must satisfy: `previous ⊑ previous ∇ next`.
    fn widen(&self, iteration: usize, previous: &Self::Element, next: &Self::Element) -> Self::Element;

    /// Human-readable rendering of an element.
    fn show(&self, elem: &Self::Element) -> String {
        format!("{:?}", elem)
    }

    /// Fold `f` over every piece of `elem` addressed by `part`.
    fn fold<A, F>(&self, part: &Self::Part, elem: &Self::Element, init: A, f: F) -> A
    where
        F: FnMut(A, &Self::Focus) -> A;

    /// Rewrite every piece of `elem` addressed by `part` with `f`.
    fn transform<F>(&self, part: &Self::Part, elem: Self::Element, f: F) -> Self::Element
    where
        F: FnMut(Self::Focus) -> Self::Focus;

    /// Split `elem` into buckets keyed by `f` applied to the pieces addressed by `part`.
    ///
    /// Each bucket holds the element restricted to the pieces that share a key.
    fn partition<K, F>(&self, part: &Self::Part, elem: Self::Element, f: F) -> BTreeMap<K, Self::Element>
    where
        K: Ord,
        F: FnMut(&Self::Focus) -> K;

    /// Check equality of abstract elements.
    fn eq(&self, elem1: &Self::Element, elem2: &Self::Element) -> bool {
        self.le(elem1, elem2) && self.le(elem2, elem1)
    }

    /// Join multiple elements.
    fn join_many<I>(&self, elems: I) -> Self::Element
    where
        I: IntoIterator<Item = Self::Element>,
    {
        elems.into_iter().fold(self.bottom(), |acc, e| self.join(&acc, &e))
    }
}
