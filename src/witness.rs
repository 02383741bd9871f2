//! Typed witness: runtime slot identity with static type recovery.
//!
//! Slots are compared by tag, never by name. When two slots agree, the
//! caller gets a typed path to the value through the registry enum: the
//! value is injected as one slot's variant and projected back out as the
//! other's. No value is ever reinterpreted as a different type.

use crate::error::ProductError;
use crate::slot::{Registry, Slot, SlotValue};

/// Returns `true` if `a` and `b` denote the same slot.
pub fn same_slot<A, B>(_a: A, _b: B) -> bool
where
    A: Slot,
    B: Slot<Registry = A::Registry>,
{
    A::TAG == B::TAG
}

/// Proof that slots `A` and `B` are the same slot.
///
/// Obtained from [`witness`].
#[derive(Debug, Clone, Copy)]
pub struct Refl<A, B> {
    from: A,
    to: B,
}

/// Decide whether `from` and `to` are the same slot, producing a [`Refl`] if so.
pub fn witness<A, B>(from: A, to: B) -> Option<Refl<A, B>>
where
    A: Slot,
    B: Slot<Registry = A::Registry>,
{
    if same_slot(from, to) {
        Some(Refl { from, to })
    } else {
        None
    }
}

impl<A, B> Refl<A, B>
where
    A: Slot,
    B: Slot<Registry = A::Registry>,
{
    /// Move a value of slot `A` into the type of slot `B`.
    ///
    /// Fails only if the registry's `inject`/`project` disagree with its tags.
    pub fn cast(&self, value: SlotValue<A>) -> Result<SlotValue<B>, ProductError> {
        self.to
            .project_owned(self.from.inject(value))
            .map_err(|_| ProductError::mistagged((A::NAME, A::TAG), (B::NAME, B::TAG)))
    }

    /// The inverse proof.
    pub fn flip(self) -> Refl<B, A> {
        Refl {
            from: self.to,
            to: self.from,
        }
    }
}

/// Outcome of looking for a slot's value inside an element.
#[derive(Debug, Clone, PartialEq)]
pub enum Projection<T, E> {
    /// The element belongs to the requested slot.
    Matched(T),
    /// The element belongs to some other slot; it is handed back unchanged.
    Unmatched(E),
}

/// Borrow the value of `element` as slot `S`.
///
/// An element of another slot is [`Projection::Unmatched`]. An element whose
/// tag says `S` but whose variant does not is an invariant violation.
pub fn project<S: Slot>(slot: S, element: &S::Registry) -> Result<Projection<&SlotValue<S>, &S::Registry>, ProductError> {
    if element.tag() != S::TAG {
        return Ok(Projection::Unmatched(element));
    }
    slot.project(element)
        .map(Projection::Matched)
        .ok_or_else(|| ProductError::mistagged((S::NAME, S::TAG), (element.name(), element.tag())))
}

/// Owned version of [`project`].
pub fn project_owned<S: Slot>(slot: S, element: S::Registry) -> Result<Projection<SlotValue<S>, S::Registry>, ProductError> {
    if element.tag() != S::TAG {
        return Ok(Projection::Unmatched(element));
    }
    match slot.project_owned(element) {
        Ok(value) => Ok(Projection::Matched(value)),
        Err(element) => Err(ProductError::mistagged((S::NAME, S::TAG), (element.name(), element.tag()))),
    }
}
