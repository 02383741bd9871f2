//! Part descriptors addressing one slot of a product.

use crate::domain::AbstractDomain;
use crate::slot::Slot;

/// Query type of slot `S`'s domain.
pub type Query<S> = <<S as Slot>::Domain as AbstractDomain>::Part;

/// Piece of a slot `S` value addressed by a [`Query<S>`].
pub type Focus<S> = <<S as Slot>::Domain as AbstractDomain>::Focus;

/// A slot together with a query into that slot's own domain.
///
/// Traversals driven by a `Part` touch only the entry of `slot`; every other
/// entry of a product passes through untouched.
#[derive(Debug, Clone)]
pub struct Part<S: Slot> {
    slot: S,
    query: Query<S>,
}

impl<S: Slot> Part<S> {
    pub fn new(slot: S, query: Query<S>) -> Self {
        Self { slot, query }
    }

    pub fn slot(&self) -> S {
        self.slot
    }

    pub fn query(&self) -> &Query<S> {
        &self.query
    }
}
