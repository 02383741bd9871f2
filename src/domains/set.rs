//! Powerset domain.
//!
//! # Lattice Structure
//!
//! ```text
//!        {a, b}
//!        /    \
//!      {a}    {b}
//!        \    /
//!         {} (Bottom)
//! ```
//!
//! Join is union and the order is inclusion. Widening is join, which only
//! terminates over a finite universe of members.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::marker::PhantomData;

use super::{show_members, Members};
use crate::domain::AbstractDomain;

/// Powerset lattice over `T`.
pub struct SetDomain<T> {
    _marker: PhantomData<fn() -> T>,
}

impl<T> SetDomain<T> {
    pub const fn new() -> Self {
        Self { _marker: PhantomData }
    }
}

impl<T> Default for SetDomain<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for SetDomain<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for SetDomain<T> {}

impl<T> fmt::Debug for SetDomain<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SetDomain")
    }
}

impl<T> AbstractDomain for SetDomain<T>
where
    T: Ord + Clone + fmt::Debug,
{
    type Element = BTreeSet<T>;
    type Part = Members;
    type Focus = T;

    fn bottom(&self) -> Self::Element {
        BTreeSet::new()
    }

    fn is_bottom(&self, elem: &Self::Element) -> bool {
        elem.is_empty()
    }

    fn le(&self, elem1: &Self::Element, elem2: &Self::Element) -> bool {
        elem1.is_subset(elem2)
    }

    fn join(&self, elem1: &Self::Element, elem2: &Self::Element) -> Self::Element {
        elem1.union(elem2).cloned().collect()
    }

    fn widen(&self, _iteration: usize, previous: &Self::Element, next: &Self::Element) -> Self::Element {
        self.join(previous, next)
    }

    fn show(&self, elem: &Self::Element) -> String {
        show_members(elem)
    }

    fn fold<A, F>(&self, _part: &Members, elem: &Self::Element, init: A, f: F) -> A
    where
        F: FnMut(A, &Self::Focus) -> A,
    {
        elem.iter().fold(init, f)
    }

    fn transform<F>(&self, _part: &Members, elem: Self::Element, f: F) -> Self::Element
    where
        F: FnMut(Self::Focus) -> Self::Focus,
    {
        elem.into_iter().map(f).collect()
    }

    fn partition<K, F>(&self, _part: &Members, elem: Self::Element, mut f: F) -> BTreeMap<K, Self::Element>
    where
        K: Ord,
        F: FnMut(&Self::Focus) -> K,
    {
        let mut buckets: BTreeMap<K, Self::Element> = BTreeMap::new();
        for v in elem {
            buckets.entry(f(&v)).or_default().insert(v);
        }
        buckets
    }
}
