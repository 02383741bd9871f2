//! Element-level operations.
//!
//! An element is a value of a registry enum: a slot paired with a value of
//! that slot's type. Binary lattice operations require both sides to be the
//! same slot. Part-addressed operations act only on elements of the part's
//! slot and let every other element through unchanged.

use std::collections::BTreeMap;

use log::trace;

use crate::domain::AbstractDomain;
use crate::error::ProductError;
use crate::part::{Focus, Part};
use crate::slot::{Registry, Slot, SlotValue, SlotVisitor};
use crate::witness::{self, Projection};

/// Lattice operations on registry elements, forwarded to each slot's domain.
///
/// Implemented for every [`Registry`].
pub trait Element: Registry {
    /// Whether the element holds its domain's bottom.
    fn is_bottom(&self) -> bool {
        self.accept(IsBottom)
    }

    /// Render the element's value with its domain.
    fn show(&self) -> String {
        self.accept(Show)
    }

    /// Join two elements of the same slot.
    fn join(&self, other: &Self) -> Result<Self, ProductError> {
        self.accept(Join { other })
    }

    /// Widen `previous` by `next`, both of the same slot.
    fn widen(iteration: usize, previous: &Self, next: &Self) -> Result<Self, ProductError> {
        previous.accept(Widen { iteration, next })
    }

    /// `self ⊑ other`, both of the same slot.
    fn le(&self, other: &Self) -> Result<bool, ProductError> {
        self.accept(LessOrEqual { other })
    }
}

impl<R: Registry> Element for R {}

/// Bottom value of `slot`'s domain.
pub fn get_bottom<S: Slot>(_slot: S) -> SlotValue<S> {
    S::DOMAIN.bottom()
}

/// Element of `slot` holding its domain's bottom.
pub fn bottom_element<S: Slot>(slot: S) -> S::Registry {
    slot.inject(get_bottom(slot))
}

fn counterpart<S: Slot>(slot: S, other: &S::Registry) -> Result<&SlotValue<S>, ProductError> {
    match witness::project(slot, other)? {
        Projection::Matched(value) => Ok(value),
        Projection::Unmatched(other) => Err(ProductError::unmatched(S::NAME, other.name())),
    }
}

struct IsBottom;

impl<R: Registry> SlotVisitor<R> for IsBottom {
    type Output = bool;

    fn visit<S: Slot<Registry = R>>(self, _slot: S, value: &SlotValue<S>) -> bool {
        S::DOMAIN.is_bottom(value)
    }
}

struct Show;

impl<R: Registry> SlotVisitor<R> for Show {
    type Output = String;

    fn visit<S: Slot<Registry = R>>(self, _slot: S, value: &SlotValue<S>) -> String {
        S::DOMAIN.show(value)
    }
}

struct Join<'a, R> {
    other: &'a R,
}

impl<R: Registry> SlotVisitor<R> for Join<'_, R> {
    type Output = Result<R, ProductError>;

    fn visit<S: Slot<Registry = R>>(self, slot: S, value: &SlotValue<S>) -> Self::Output {
        let other = counterpart(slot, self.other)?;
        Ok(slot.inject(S::DOMAIN.join(value, other)))
    }
}

struct Widen<'a, R> {
    iteration: usize,
    next: &'a R,
}

impl<R: Registry> SlotVisitor<R> for Widen<'_, R> {
    type Output = Result<R, ProductError>;

    fn visit<S: Slot<Registry = R>>(self, slot: S, value: &SlotValue<S>) -> Self::Output {
        let next = counterpart(slot, self.next)?;
        Ok(slot.inject(S::DOMAIN.widen(self.iteration, value, next)))
    }
}

struct LessOrEqual<'a, R> {
    other: &'a R,
}

impl<R: Registry> SlotVisitor<R> for LessOrEqual<'_, R> {
    type Output = Result<bool, ProductError>;

    fn visit<S: Slot<Registry = R>>(self, slot: S, value: &SlotValue<S>) -> Self::Output {
        let other = counterpart(slot, self.other)?;
        Ok(S::DOMAIN.le(value, other))
    }
}

/// Fold `f` over the pieces of `element` addressed by `part`.
///
/// An element of another slot leaves `init` unchanged.
pub fn fold<S, A, F>(part: &Part<S>, element: &S::Registry, init: A, f: F) -> Result<A, ProductError>
where
    S: Slot,
    F: FnMut(A, &Focus<S>) -> A,
{
    match witness::project(part.slot(), element)? {
        Projection::Matched(value) => Ok(S::DOMAIN.fold(part.query(), value, init, f)),
        Projection::Unmatched(_) => Ok(init),
    }
}

/// Rewrite the pieces of `element` addressed by `part` with `f`.
///
/// An element of another slot is returned unchanged.
pub fn transform<S, F>(part: &Part<S>, element: S::Registry, f: F) -> Result<S::Registry, ProductError>
where
    S: Slot,
    F: FnMut(Focus<S>) -> Focus<S>,
{
    match witness::project_owned(part.slot(), element)? {
        Projection::Matched(value) => {
            trace!("transform: {} matches {:?}", S::NAME, part.query());
            Ok(part.slot().inject(S::DOMAIN.transform(part.query(), value, f)))
        }
        Projection::Unmatched(element) => Ok(element),
    }
}

/// Result of partitioning a single element.
#[derive(Debug, Clone, PartialEq)]
pub enum Partitioned<K, E> {
    /// The element belongs to the part's slot: one sub-element per key.
    Matched(BTreeMap<K, E>),
    /// The element belongs to another slot and was not split.
    Unmatched(E),
}

/// Split `element` into buckets keyed by `f` applied to the pieces addressed by `part`.
pub fn partition<S, K, F>(part: &Part<S>, element: S::Registry, f: F) -> Result<Partitioned<K, S::Registry>, ProductError>
where
    S: Slot,
    K: Ord,
    F: FnMut(&Focus<S>) -> K,
{
    match witness::project_owned(part.slot(), element)? {
        Projection::Matched(value) => {
            let slot = part.slot();
            let buckets = S::DOMAIN
                .partition(part.query(), value, f)
                .into_iter()
                .map(|(key, value)| (key, slot.inject(value)))
                .collect();
            Ok(Partitioned::Matched(buckets))
        }
        Projection::Unmatched(element) => Ok(Partitioned::Unmatched(element)),
    }
}
