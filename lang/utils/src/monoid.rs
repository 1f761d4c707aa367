use std::ops::Add;

/// Merge semantics shared by patch maps and store deltas: `+` folds later
/// edits over earlier ones, and [`Default`] is the empty edit.
pub trait Monoid: Default + Add<Output = Self> + Sized {
    /// Fold a sequence of edits over this one, left to right.
    fn extend(self, others: impl IntoIterator<Item = Self>) -> Self {
        others.into_iter().fold(self, Self::add)
    }
    /// Merge a whole sequence of edits, starting from the empty one.
    fn concat(others: impl IntoIterator<Item = Self>) -> Self {
        Self::default().extend(others)
    }
}
