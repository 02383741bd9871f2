//! Invariant violations raised by product operations.

use std::fmt::Debug;

use thiserror::Error;

/// Error raised when a product operation detects a broken invariant.
///
/// Both variants signal a caller bug (for example, mixing elements that were
/// built for different slots), never an expected runtime condition.
/// A slot missing from a product is not an error: it reads as bottom.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProductError {
    /// Two elements expected to belong to the same slot do not.
    ///
    /// When a registry's tags disagree with its variants, each side also
    /// carries its tag, as in ``unmatched slots: `B [A]` and `B [B]` ``.
    #[error("unmatched slots: `{left}` and `{right}`")]
    UnmatchedSlots { left: String, right: String },

    /// Two elements passed to [`Product::make`][crate::product::Product::make] claim the same slot.
    #[error("duplicate slot `{name}`")]
    DuplicateSlot { name: &'static str },
}

impl ProductError {
    pub(crate) fn unmatched(left: impl Into<String>, right: impl Into<String>) -> Self {
        ProductError::UnmatchedSlots {
            left: left.into(),
            right: right.into(),
        }
    }

    /// Like [`unmatched`][Self::unmatched], labelling each side with its tag.
    pub(crate) fn mistagged<T: Debug>(left: (&str, T), right: (&str, T)) -> Self {
        Self::unmatched(
            format!("{} [{:?}]", left.0, left.1),
            format!("{} [{:?}]", right.0, right.1),
        )
    }
}
