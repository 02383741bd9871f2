//! Slot registry contract.
//!
//! A *registry* is a closed enum with one variant per slot. Each variant
//! carries a value of the slot's domain, so a registry value is an *element*:
//! a slot paired with a value of exactly that slot's type.
//!
//! A *slot* is a zero-sized marker type naming one variant of the registry.
//! It knows the slot's display name, the sub-domain that governs its values,
//! and how to move a value in and out of the registry enum.
//!
//! Both traits are normally implemented by the
//! [`slot_registry!`][crate::slot_registry] macro.

use std::fmt::Debug;
use std::hash::Hash;

use crate::domain::AbstractDomain;

/// Value type stored under slot `S`.
pub type SlotValue<S> = <<S as Slot>::Domain as AbstractDomain>::Element;

/// Closed sum over all slots of a composite domain.
pub trait Registry: Clone + Debug + PartialEq + Sized + 'static {
    /// Discriminant identifying a slot. Products are keyed by it.
    type Tag: Copy + Debug + Eq + Ord + Hash;

    /// The slot this element belongs to.
    fn tag(&self) -> Self::Tag;

    /// Call `visitor` with the statically-typed slot and value of this element.
    fn accept<V: SlotVisitor<Self>>(&self, visitor: V) -> V::Output;

    /// Display name of the slot this element belongs to.
    fn name(&self) -> &'static str {
        self.accept(NameOf)
    }
}

/// A statically-typed slot of registry [`Slot::Registry`].
pub trait Slot: Copy + Debug + 'static {
    type Registry: Registry;

    /// Sub-domain governing the values stored under this slot.
    type Domain: AbstractDomain;

    /// Unique display name.
    const NAME: &'static str;

    /// Identity of the slot within its registry.
    const TAG: <Self::Registry as Registry>::Tag;

    /// The sub-domain instance.
    const DOMAIN: Self::Domain;

    /// Wrap `value` into the registry variant of this slot.
    fn inject(self, value: SlotValue<Self>) -> Self::Registry;

    /// Borrow the value of `element` if it is this slot's variant.
    fn project(self, element: &Self::Registry) -> Option<&SlotValue<Self>>;

    /// Take the value out of `element` if it is this slot's variant,
    /// handing the element back otherwise.
    fn project_owned(self, element: Self::Registry) -> Result<SlotValue<Self>, Self::Registry>;
}

/// Operation dispatched on the concrete slot of an element.
///
/// Implementors get the slot marker as a type parameter, which recovers the
/// value type statically.
pub trait SlotVisitor<R: Registry> {
    type Output;

    fn visit<S: Slot<Registry = R>>(self, slot: S, value: &SlotValue<S>) -> Self::Output;
}

struct NameOf;

impl<R: Registry> SlotVisitor<R> for NameOf {
    type Output = &'static str;

    fn visit<S: Slot<Registry = R>>(self, _slot: S, _value: &SlotValue<S>) -> Self::Output {
        S::NAME
    }
}
