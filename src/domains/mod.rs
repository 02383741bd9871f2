//! Stock sub-domains.
//!
//! Small lattices that are useful as slots on their own and serve as
//! reference implementations of [`AbstractDomain`][crate::domain::AbstractDomain].

pub mod bounded;
pub mod set;

pub use bounded::{BoundedSet, BoundedSetDomain, Member};
pub use set::SetDomain;

/// Part addressing every member of a set-like element.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Members;

fn show_members<'a, T: std::fmt::Debug + 'a>(members: impl IntoIterator<Item = &'a T>) -> String {
    let items: Vec<String> = members.into_iter().map(|v| format!("{:?}", v)).collect();
    format!("{{{}}}", items.join(", "))
}
