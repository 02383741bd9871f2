//! Registry shared by unit tests.

use crate::domains::{BoundedSetDomain, SetDomain};

crate::slot_registry! {
    /// Two powerset slots and one bounded slot.
    pub enum Facts(FactsTag) {
        X(X): SetDomain<i64> = SetDomain::new(),
        Y(Y): SetDomain<i64> = SetDomain::new(),
        Z(Z): BoundedSetDomain<i64> = BoundedSetDomain::new(8, 3),
    }
}
