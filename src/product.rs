//! The product map: one optional element per slot.
//!
//! # Sparse representation
//!
//! A [`Product`] maps slot tags to elements. A slot with no entry holds the
//! bottom of its domain, so the empty map is the bottom of the product.
//! [`transform`][Product::transform] and [`fold`][Product::fold] materialize
//! an explicit bottom entry for the part's slot before visiting entries; such
//! a product is *not* [`is_bottom`][Product::is_bottom] even though it
//! denotes the same value as the empty one.
//!
//! # Immutability
//!
//! Every operation takes `&self` and returns a new product.
//!
//! # Example
//!
//! ```
//! use std::collections::BTreeSet;
//!
//! use slot_product::domains::SetDomain;
//! use slot_product::Product;
//!
//! slot_product::slot_registry! {
//!     pub enum Facts(FactsTag) {
//!         X(XSlot): SetDomain<i64> = SetDomain::new(),
//!         Y(YSlot): SetDomain<i64> = SetDomain::new(),
//!     }
//! }
//!
//! let a = Product::singleton(XSlot, BTreeSet::from([1, 2]));
//! let b = Product::singleton(YSlot, BTreeSet::from([3]));
//! let ab = a.join(&b).unwrap();
//!
//! assert_eq!(ab.get(XSlot).unwrap(), BTreeSet::from([1, 2]));
//! assert_eq!(ab.get(YSlot).unwrap(), BTreeSet::from([3]));
//! assert_eq!(ab.to_string(), "X: {1, 2}, Y: {3}");
//! ```

use std::collections::BTreeMap;
use std::fmt;

use log::{debug, trace};

use crate::element::{self, Element, Partitioned};
use crate::error::ProductError;
use crate::part::{Focus, Part};
use crate::slot::{Registry, Slot, SlotValue};
use crate::witness::{self, Projection};

/// Composite abstract value over registry `R`.
#[derive(Debug, Clone, PartialEq)]
pub struct Product<R: Registry> {
    entries: BTreeMap<R::Tag, R>,
}

impl<R: Registry> Default for Product<R> {
    fn default() -> Self {
        Self::bottom()
    }
}

impl<R: Registry> Product<R> {
    /// The empty product.
    pub fn bottom() -> Self {
        Self { entries: BTreeMap::new() }
    }

    /// Returns `true` if the product has no entries.
    pub fn is_bottom(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of materialized entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether `slot` has a materialized entry.
    pub fn contains<S: Slot<Registry = R>>(&self, _slot: S) -> bool {
        self.entries.contains_key(&S::TAG)
    }

    /// Materialized entries, in slot declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &R> {
        self.entries.values()
    }

    /// Product holding `value` at `slot` and bottom everywhere else.
    pub fn singleton<S: Slot<Registry = R>>(slot: S, value: SlotValue<S>) -> Self {
        Self::bottom().update(slot, value)
    }

    /// Copy of this product with `slot` bound to `value`.
    ///
    /// Any previous entry for `slot` is overwritten.
    pub fn update<S: Slot<Registry = R>>(&self, slot: S, value: SlotValue<S>) -> Self {
        let mut entries = self.entries.clone();
        entries.insert(S::TAG, slot.inject(value));
        Self { entries }
    }

    /// Build a product from a list of elements.
    ///
    /// Fails with [`ProductError::DuplicateSlot`] if two elements share a slot.
    pub fn make<I>(elements: I) -> Result<Self, ProductError>
    where
        I: IntoIterator<Item = R>,
    {
        let mut entries = BTreeMap::new();
        for element in elements {
            let name = element.name();
            if entries.insert(element.tag(), element).is_some() {
                return Err(ProductError::DuplicateSlot { name });
            }
        }
        Ok(Self { entries })
    }

    /// Value stored at `slot`, or the bottom of its domain if absent.
    pub fn get<S: Slot<Registry = R>>(&self, slot: S) -> Result<SlotValue<S>, ProductError> {
        match self.entries.get(&S::TAG) {
            None => Ok(element::get_bottom(slot)),
            Some(stored) => match witness::project(slot, stored)? {
                Projection::Matched(value) => Ok(value.clone()),
                Projection::Unmatched(stored) => Err(ProductError::mistagged((S::NAME, S::TAG), (stored.name(), stored.tag()))),
            },
        }
    }

    /// Least upper bound, slot by slot.
    ///
    /// A slot present on one side only passes through unchanged.
    pub fn join(&self, other: &Self) -> Result<Self, ProductError> {
        debug!("join({} entries, {} entries)", self.len(), other.len());
        self.merge(other, |left, right| left.join(right))
    }

    /// Join several products.
    pub fn join_many<'a, I>(products: I) -> Result<Self, ProductError>
    where
        I: IntoIterator<Item = &'a Self>,
    {
        products.into_iter().try_fold(Self::bottom(), |acc, p| acc.join(p))
    }

    /// Widening, slot by slot, passing `iteration` down to every sub-domain.
    pub fn widen(iteration: usize, previous: &Self, next: &Self) -> Result<Self, ProductError> {
        debug!(
            "widen(iteration = {}, {} entries, {} entries)",
            iteration,
            previous.len(),
            next.len()
        );
        previous.merge(next, |left, right| <R as Element>::widen(iteration, left, right))
    }

    fn merge<F>(&self, other: &Self, mut combine: F) -> Result<Self, ProductError>
    where
        F: FnMut(&R, &R) -> Result<R, ProductError>,
    {
        let mut entries = self.entries.clone();
        for (tag, right) in &other.entries {
            let merged = match entries.get(tag) {
                Some(left) => combine(left, right)?,
                None => right.clone(),
            };
            entries.insert(*tag, merged);
        }
        Ok(Self { entries })
    }

    /// Partial order: `self ⊑ other`.
    ///
    /// A slot absent on the left is bottom and always fits. A slot present
    /// on the left but absent on the right makes the comparison false.
    pub fn le(&self, other: &Self) -> Result<bool, ProductError> {
        for (tag, left) in &self.entries {
            let Some(right) = other.entries.get(tag) else {
                trace!("le: {} missing on the right", left.name());
                return Ok(false);
            };
            if !left.le(right)? {
                trace!("le: {} is not below", left.name());
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Diagnostic rendering: `name: value` pairs ordered by slot name.
    pub fn show(&self) -> String {
        let mut items: Vec<(&'static str, String)> =
            self.entries.values().map(|e| (e.name(), e.show())).collect();
        items.sort_by(|a, b| a.0.cmp(b.0));
        items
            .into_iter()
            .map(|(name, value)| format!("{}: {}", name, value))
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn ensure_slot<S: Slot<Registry = R>>(&self, slot: S) -> BTreeMap<R::Tag, R> {
        let mut entries = self.entries.clone();
        entries.entry(S::TAG).or_insert_with(|| {
            trace!("materializing bottom for {}", S::NAME);
            element::bottom_element(slot)
        });
        entries
    }

    /// Rewrite the pieces addressed by `part` with `f`.
    ///
    /// The part's slot is materialized first, so `f` also runs on its bottom.
    pub fn transform<S, F>(&self, part: &Part<S>, mut f: F) -> Result<Self, ProductError>
    where
        S: Slot<Registry = R>,
        F: FnMut(Focus<S>) -> Focus<S>,
    {
        debug!("transform({}, {:?})", S::NAME, part.query());
        let mut entries = BTreeMap::new();
        for (tag, entry) in self.ensure_slot(part.slot()) {
            entries.insert(tag, element::transform(part, entry, &mut f)?);
        }
        Ok(Self { entries })
    }

    /// Fold `f` over the pieces addressed by `part`.
    pub fn fold<S, A, F>(&self, part: &Part<S>, init: A, mut f: F) -> Result<A, ProductError>
    where
        S: Slot<Registry = R>,
        F: FnMut(A, &Focus<S>) -> A,
    {
        debug!("fold({}, {:?})", S::NAME, part.query());
        self.ensure_slot(part.slot())
            .values()
            .try_fold(init, |acc, entry| element::fold(part, entry, acc, &mut f))
    }

    /// Split the product by `f` applied to the pieces addressed by `part`.
    ///
    /// Every bucket holds all entries of the other slots unchanged, plus
    /// the part's slot restricted to the pieces mapped to that bucket's key.
    /// A product without an entry for the part's slot has no buckets.
    pub fn partition<S, K, F>(&self, part: &Part<S>, mut f: F) -> Result<BTreeMap<K, Self>, ProductError>
    where
        S: Slot<Registry = R>,
        K: Ord,
        F: FnMut(&Focus<S>) -> K,
    {
        debug!("partition({}, {:?})", S::NAME, part.query());
        let mut base: BTreeMap<R::Tag, R> = BTreeMap::new();
        let mut buckets: BTreeMap<K, R> = BTreeMap::new();
        for (tag, entry) in &self.entries {
            match element::partition(part, entry.clone(), &mut f)? {
                Partitioned::Matched(split) => buckets.extend(split),
                Partitioned::Unmatched(entry) => {
                    base.insert(*tag, entry);
                }
            }
        }
        trace!("partition: {} buckets over {} shared entries", buckets.len(), base.len());
        Ok(buckets
            .into_iter()
            .map(|(key, entry)| {
                let mut entries = base.clone();
                entries.insert(S::TAG, entry);
                (key, Self { entries })
            })
            .collect())
    }
}

impl<R: Registry> fmt::Display for Product<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.show())
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;
    use crate::domains::{BoundedSet, Member, Members};
    use crate::fixtures::{Facts, X, Y, Z};
    use std::collections::BTreeSet;

    fn set(values: &[i64]) -> BTreeSet<i64> {
        values.iter().copied().collect()
    }

    #[test]
    fn test_bottom() {
        let p = Product::<Facts>::bottom();
        assert!(p.is_bottom());
        assert_eq!(p.len(), 0);
        assert_eq!(p.get(X), Ok(set(&[])));
        assert_eq!(p.get(Z), Ok(BoundedSet::Set(BTreeSet::new())));
        assert_eq!(p.show(), "");
        assert_eq!(Product::<Facts>::default(), p);
    }

    #[test]
    fn test_singleton_get() {
        let p = Product::singleton(X, set(&[1, 2]));
        assert!(!p.is_bottom());
        assert!(p.contains(X));
        assert!(!p.contains(Y));
        assert_eq!(p.get(X), Ok(set(&[1, 2])));
        assert_eq!(p.get(Y), Ok(set(&[])));
    }

    #[test]
    fn test_update_overwrites() {
        let p = Product::singleton(X, set(&[1, 2]));
        let q = p.update(X, set(&[5]));
        assert_eq!(q.get(X), Ok(set(&[5])));
        // The original is untouched.
        assert_eq!(p.get(X), Ok(set(&[1, 2])));
        assert_eq!(q.update(X, set(&[5])), q);
    }

    #[test]
    fn test_make() {
        let p = Product::make([Facts::Y(set(&[3])), Facts::X(set(&[1]))]).unwrap();
        assert_eq!(p.get(X), Ok(set(&[1])));
        assert_eq!(p.get(Y), Ok(set(&[3])));
        assert_eq!(p.iter().map(|e| e.name()).collect::<Vec<_>>(), vec!["X", "Y"]);

        let err = Product::make([Facts::X(set(&[1])), Facts::X(set(&[2]))]).unwrap_err();
        assert_eq!(err, ProductError::DuplicateSlot { name: "X" });
    }

    #[test]
    fn test_join() {
        let a = Product::singleton(X, set(&[1])).update(Y, set(&[7]));
        let b = Product::singleton(X, set(&[2])).update(Z, BoundedSet::Top);
        let ab = a.join(&b).unwrap();
        assert_eq!(ab.get(X), Ok(set(&[1, 2])));
        assert_eq!(ab.get(Y), Ok(set(&[7])));
        assert_eq!(ab.get(Z), Ok(BoundedSet::Top));
        assert_eq!(b.join(&a).unwrap(), ab);
    }

    #[test]
    fn test_join_many() {
        let products = [
            Product::singleton(X, set(&[1])),
            Product::singleton(X, set(&[2])),
            Product::singleton(Y, set(&[3])),
        ];
        let joined = Product::join_many(&products).unwrap();
        assert_eq!(joined.to_string(), "X: {1, 2}, Y: {3}");
        assert!(Product::<Facts>::join_many([]).unwrap().is_bottom());
    }

    #[test]
    fn test_widen() {
        let previous = Product::singleton(Z, BoundedSet::Set(set(&[1]))).update(X, set(&[1]));
        let next = Product::singleton(Z, BoundedSet::Set(set(&[2]))).update(Y, set(&[4]));

        let early = Product::widen(0, &previous, &next).unwrap();
        assert_eq!(early.get(Z), Ok(BoundedSet::Set(set(&[1, 2]))));
        assert_eq!(early.get(X), Ok(set(&[1])));
        assert_eq!(early.get(Y), Ok(set(&[4])));

        let late = Product::widen(100, &previous, &next).unwrap();
        assert_eq!(late.get(Z), Ok(BoundedSet::Top));
    }

    #[test]
    fn test_le() {
        let bottom = Product::<Facts>::bottom();
        let a = Product::singleton(X, set(&[1]));
        let b = Product::singleton(X, set(&[1, 2])).update(Y, set(&[3]));

        assert_eq!(bottom.le(&a), Ok(true));
        assert_eq!(a.le(&a), Ok(true));
        assert_eq!(a.le(&b), Ok(true));
        assert_eq!(b.le(&a), Ok(false));
        // Present on the left only.
        assert_eq!(Product::singleton(Y, set(&[3])).le(&a), Ok(false));
        assert_eq!(a.le(&bottom), Ok(false));
    }

    #[test]
    fn test_show_is_ordered_by_name() {
        let p = Product::singleton(Z, BoundedSet::Top)
            .update(Y, set(&[3]))
            .update(X, set(&[2, 1]));
        assert_eq!(p.show(), "X: {1, 2}, Y: {3}, Z: ⊤");
        assert_eq!(format!("{}", p), p.show());
    }

    #[test]
    fn test_transform() {
        let part = Part::new(X, Members);
        let p = Product::singleton(X, set(&[1, 2])).update(Y, set(&[1, 2]));
        let q = p.transform(&part, |v| v + 10).unwrap();
        assert_eq!(q.get(X), Ok(set(&[11, 12])));
        assert_eq!(q.get(Y), Ok(set(&[1, 2])));
    }

    #[test]
    fn test_transform_materializes_bottom() {
        let part = Part::new(X, Members);
        let p = Product::<Facts>::bottom().transform(&part, |v| v).unwrap();
        assert!(p.contains(X));
        assert!(!p.is_bottom());
        assert_eq!(p.get(X), Ok(set(&[])));

        // An empty set has no members, so `f` never runs on it.
        let part = Part::new(Z, Members);
        let p = Product::singleton(X, set(&[1])).transform(&part, |_| Member::Any).unwrap();
        assert!(p.contains(Z));
        assert_eq!(p.get(Z), Ok(BoundedSet::Set(BTreeSet::new())));
    }

    #[test]
    fn test_fold() {
        let part = Part::new(Y, Members);
        let p = Product::singleton(X, set(&[100])).update(Y, set(&[1, 2, 3]));
        assert_eq!(p.fold(&part, 0, |acc, v| acc + v), Ok(6));
        assert_eq!(Product::<Facts>::bottom().fold(&part, 0, |acc, v| acc + v), Ok(0));
    }

    #[test]
    fn test_partition() {
        let part = Part::new(X, Members);
        let p = Product::singleton(X, set(&[1, 2, 3])).update(Y, set(&[9]));

        let buckets = p.partition(&part, |v| v % 2).unwrap();
        assert_eq!(buckets.len(), 2);
        assert_eq!(buckets[&0].get(X), Ok(set(&[2])));
        assert_eq!(buckets[&1].get(X), Ok(set(&[1, 3])));
        for bucket in buckets.values() {
            assert_eq!(bucket.get(Y), Ok(set(&[9])));
        }

        let empty = Product::singleton(Y, set(&[9])).partition(&part, |v| v % 2).unwrap();
        assert!(empty.is_empty());
    }

    // A hand-written registry whose slot `B` claims tag `A` but injects variant `B`.
    mod mistagged {
        use std::collections::BTreeSet;

        use crate::domains::SetDomain;
        use crate::slot::{Registry, Slot, SlotValue, SlotVisitor};

        #[derive(Debug, Clone, PartialEq)]
        pub enum Skewed {
            A(BTreeSet<i64>),
            B(BTreeSet<i64>),
        }

        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub enum SkewedTag {
            A,
            B,
        }

        #[derive(Debug, Clone, Copy)]
        pub struct SA;

        #[derive(Debug, Clone, Copy)]
        pub struct SB;

        impl Registry for Skewed {
            type Tag = SkewedTag;

            fn tag(&self) -> SkewedTag {
                match self {
                    Skewed::A(_) => SkewedTag::A,
                    Skewed::B(_) => SkewedTag::B,
                }
            }

            fn accept<V: SlotVisitor<Self>>(&self, visitor: V) -> V::Output {
                match self {
                    Skewed::A(value) => visitor.visit(SA, value),
                    Skewed::B(value) => visitor.visit(SB, value),
                }
            }
        }

        impl Slot for SA {
            type Registry = Skewed;
            type Domain = SetDomain<i64>;
            const NAME: &'static str = "A";
            const TAG: SkewedTag = SkewedTag::A;
            const DOMAIN: SetDomain<i64> = SetDomain::new();

            fn inject(self, value: SlotValue<Self>) -> Skewed {
                Skewed::A(value)
            }

            fn project(self, element: &Skewed) -> Option<&SlotValue<Self>> {
                match element {
                    Skewed::A(value) => Some(value),
                    _ => None,
                }
            }

            fn project_owned(self, element: Skewed) -> Result<SlotValue<Self>, Skewed> {
                match element {
                    Skewed::A(value) => Ok(value),
                    other => Err(other),
                }
            }
        }

        impl Slot for SB {
            type Registry = Skewed;
            type Domain = SetDomain<i64>;
            const NAME: &'static str = "B";
            const TAG: SkewedTag = SkewedTag::A;
            const DOMAIN: SetDomain<i64> = SetDomain::new();

            fn inject(self, value: SlotValue<Self>) -> Skewed {
                Skewed::B(value)
            }

            fn project(self, element: &Skewed) -> Option<&SlotValue<Self>> {
                match element {
                    Skewed::B(value) => Some(value),
                    _ => None,
                }
            }

            fn project_owned(self, element: Skewed) -> Result<SlotValue<Self>, Skewed> {
                match element {
                    Skewed::B(value) => Ok(value),
                    other => Err(other),
                }
            }
        }
    }

    #[test]
    fn test_get_mistagged_entry() {
        use self::mistagged::{SA, SB};

        // `SB` files its variant under tag `A`.
        let p = Product::singleton(SB, set(&[1]));

        let err = p.get(SA).unwrap_err();
        assert!(matches!(err, ProductError::UnmatchedSlots { .. }));
        assert_eq!(err.to_string(), "unmatched slots: `A [A]` and `B [B]`");

        let err = p.get(SB).unwrap_err();
        assert_eq!(
            err,
            ProductError::UnmatchedSlots {
                left: "B [A]".to_string(),
                right: "B [B]".to_string(),
            }
        );
    }

    #[test]
    fn test_project_mistagged_element() {
        use self::mistagged::{Skewed, SA, SB};

        // Tag `A` matches `SB`, but the variant does not.
        let element = Skewed::A(set(&[1]));
        let err = witness::project(SB, &element).unwrap_err();
        assert_eq!(err.to_string(), "unmatched slots: `B [A]` and `A [A]`");
        assert!(matches!(
            witness::project_owned(SB, element.clone()),
            Err(ProductError::UnmatchedSlots { .. })
        ));
        assert_eq!(witness::project(SA, &element), Ok(Projection::Matched(&set(&[1]))));

        // The two slots share a tag, so a witness exists but cannot cast.
        let refl = witness::witness(SA, SB).unwrap();
        assert!(matches!(refl.cast(set(&[1])), Err(ProductError::UnmatchedSlots { .. })));
    }
}
