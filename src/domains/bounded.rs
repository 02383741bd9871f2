//! Powerset domain with an explicit top and iteration-bounded widening.
//!
//! # Elements
//!
//! - `Set(s)`: exactly the members of `s`; `Set({})` is bottom
//! - `Top`: any value
//!
//! A join whose result would exceed `max_size` members goes to `Top`. A
//! `Set` built by hand with more than `max_size` members is read as `Top` by
//! every domain operation, so it compares equal to `Top` and renders as `⊤`.
//! Widening joins for the first `widen_after` iterations; after that, any
//! growth jumps straight to `Top`, which bounds every ascending chain.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::marker::PhantomData;

use super::{show_members, Members};
use crate::domain::AbstractDomain;

/// Element of [`BoundedSetDomain`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoundedSet<T> {
    Set(BTreeSet<T>),
    Top,
}

impl<T: Ord> BoundedSet<T> {
    pub fn is_top(&self) -> bool {
        matches!(self, BoundedSet::Top)
    }
}

/// Piece of a [`BoundedSet`] addressed by [`Members`].
///
/// `Top` has no enumerable members; it is seen as a single `Any`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum Member<T> {
    Known(T),
    Any,
}

/// Bounded powerset lattice over `T`.
pub struct BoundedSetDomain<T> {
    max_size: usize,
    widen_after: usize,
    _marker: PhantomData<fn() -> T>,
}

impl<T> BoundedSetDomain<T> {
    pub const fn new(max_size: usize, widen_after: usize) -> Self {
        Self {
            max_size,
            widen_after,
            _marker: PhantomData,
        }
    }

    /// Largest set kept exactly; anything bigger is `Top`.
    pub fn max_size(&self) -> usize {
        self.max_size
    }

    /// First iteration at which widening stops joining and jumps to `Top`.
    pub fn widen_after(&self) -> usize {
        self.widen_after
    }
}

impl<T> Clone for BoundedSetDomain<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for BoundedSetDomain<T> {}

impl<T> fmt::Debug for BoundedSetDomain<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundedSetDomain")
            .field("max_size", &self.max_size)
            .field("widen_after", &self.widen_after)
            .finish()
    }
}

impl<T: Ord> BoundedSetDomain<T> {
    fn bounded(&self, set: BTreeSet<T>) -> BoundedSet<T> {
        if set.len() > self.max_size {
            BoundedSet::Top
        } else {
            BoundedSet::Set(set)
        }
    }

    /// Members of `elem`, or `None` if it denotes `Top`.
    fn members<'a>(&self, elem: &'a BoundedSet<T>) -> Option<&'a BTreeSet<T>> {
        match elem {
            BoundedSet::Set(s) if s.len() <= self.max_size => Some(s),
            _ => None,
        }
    }

    /// Whether `elem` denotes `Top`.
    pub fn covers_all(&self, elem: &BoundedSet<T>) -> bool {
        self.members(elem).is_none()
    }
}

impl<T> AbstractDomain for BoundedSetDomain<T>
where
    T: Ord + Clone + fmt::Debug,
{
    type Element = BoundedSet<T>;
    type Part = Members;
    type Focus = Member<T>;

    fn bottom(&self) -> Self::Element {
        BoundedSet::Set(BTreeSet::new())
    }

    fn is_bottom(&self, elem: &Self::Element) -> bool {
        self.members(elem).is_some_and(|s| s.is_empty())
    }

    fn le(&self, elem1: &Self::Element, elem2: &Self::Element) -> bool {
        match (self.members(elem1), self.members(elem2)) {
            (_, None) => true,
            (None, Some(_)) => false,
            (Some(a), Some(b)) => a.is_subset(b),
        }
    }

    fn join(&self, elem1: &Self::Element, elem2: &Self::Element) -> Self::Element {
        match (self.members(elem1), self.members(elem2)) {
            (Some(a), Some(b)) => self.bounded(a.union(b).cloned().collect()),
            _ => BoundedSet::Top,
        }
    }

    fn widen(&self, iteration: usize, previous: &Self::Element, next: &Self::Element) -> Self::Element {
        let joined = self.join(previous, next);
        if iteration >= self.widen_after && !self.le(&joined, previous) {
            BoundedSet::Top
        } else {
            joined
        }
    }

    fn show(&self, elem: &Self::Element) -> String {
        match self.members(elem) {
            None => "⊤".to_string(),
            Some(s) => show_members(s),
        }
    }

    fn fold<A, F>(&self, _part: &Members, elem: &Self::Element, init: A, mut f: F) -> A
    where
        F: FnMut(A, &Self::Focus) -> A,
    {
        match self.members(elem) {
            None => f(init, &Member::Any),
            Some(s) => s.iter().fold(init, |acc, v| f(acc, &Member::Known(v.clone()))),
        }
    }

    fn transform<F>(&self, _part: &Members, elem: Self::Element, mut f: F) -> Self::Element
    where
        F: FnMut(Self::Focus) -> Self::Focus,
    {
        let members = match elem {
            BoundedSet::Set(s) if s.len() <= self.max_size => s.into_iter().map(|v| f(Member::Known(v))).collect(),
            _ => vec![f(Member::Any)],
        };
        let mut result = BTreeSet::new();
        for member in members {
            match member {
                Member::Known(v) => {
                    result.insert(v);
                }
                Member::Any => return BoundedSet::Top,
            }
        }
        self.bounded(result)
    }

    fn partition<K, F>(&self, _part: &Members, elem: Self::Element, mut f: F) -> BTreeMap<K, Self::Element>
    where
        K: Ord,
        F: FnMut(&Self::Focus) -> K,
    {
        let mut buckets = BTreeMap::new();
        match elem {
            BoundedSet::Set(s) if s.len() <= self.max_size => {
                let mut sets: BTreeMap<K, BTreeSet<T>> = BTreeMap::new();
                for v in s {
                    let key = f(&Member::Known(v.clone()));
                    sets.entry(key).or_default().insert(v);
                }
                buckets.extend(sets.into_iter().map(|(key, set)| (key, BoundedSet::Set(set))));
            }
            _ => {
                buckets.insert(f(&Member::Any), BoundedSet::Top);
            }
        }
        buckets
    }
}
