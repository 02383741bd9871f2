//! # slot-product: sparse products of abstract domains
//!
//! **`slot-product`** composes a fixed set of independent abstract domains into a single
//! composite domain, so that an analysis can track several facts at a program point at once
//! (say, "which variables are tainted" and "which call sites reach here") without writing
//! new lattice plumbing for every combination.
//!
//! ## Key Concepts
//!
//! - **Slot**: one component of the composite domain. A slot has a display name and a
//!   sub-domain implementing [`AbstractDomain`][crate::domain::AbstractDomain].
//! - **Registry**: a closed enum with one variant per slot, declared with
//!   [`slot_registry!`]. A value of the enum is an *element*: a slot paired with a value of
//!   exactly that slot's type.
//! - **Product**: a sparse map from slot to element. A missing slot holds bottom.
//!   See [`Product`][crate::product::Product].
//! - **Part**: a slot plus a query into that slot's domain, used to fold, transform or
//!   partition one slot of a product. See [`Part`][crate::part::Part].
//!
//! Slots are identified by their enum tag, never by name, and a slot's value type is
//! recovered by pattern matching on the registry enum (see [`witness`]). Operations that
//! find two different slots where one is required fail with
//! [`ProductError`][crate::error::ProductError].
//!
//! ## Basic Usage
//!
//! ```rust
//! use std::collections::BTreeSet;
//!
//! use slot_product::domains::{Members, SetDomain};
//! use slot_product::{Part, Product};
//!
//! slot_product::slot_registry! {
//!     pub enum Facts(FactsTag) {
//!         Tainted(Tainted): SetDomain<&'static str> = SetDomain::new(),
//!         Callers(Callers): SetDomain<u32> = SetDomain::new(),
//!     }
//! }
//!
//! // 1. Build facts for two branches
//! let then_branch = Product::singleton(Tainted, BTreeSet::from(["x"])).update(Callers, BTreeSet::from([10]));
//! let else_branch = Product::singleton(Tainted, BTreeSet::from(["y"])).update(Callers, BTreeSet::from([20]));
//!
//! // 2. Merge them
//! let merged = then_branch.join(&else_branch).unwrap();
//! assert_eq!(merged.get(Tainted).unwrap(), BTreeSet::from(["x", "y"]));
//! assert!(then_branch.le(&merged).unwrap());
//!
//! // 3. Split the state back by call site
//! let by_caller = merged.partition(&Part::new(Callers, Members), |site| *site).unwrap();
//! assert_eq!(by_caller[&10].get(Callers).unwrap(), BTreeSet::from([10]));
//! assert_eq!(by_caller[&10].get(Tainted).unwrap(), BTreeSet::from(["x", "y"]));
//! ```

pub mod domain;
pub mod domains;
pub mod element;
pub mod error;
mod macros;
pub mod part;
pub mod product;
pub mod slot;
pub mod witness;

#[cfg(test)]
mod fixtures;

pub use domain::AbstractDomain;
pub use element::Element;
pub use error::ProductError;
pub use part::Part;
pub use product::Product;
pub use slot::{Registry, Slot, SlotValue};
