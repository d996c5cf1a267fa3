//! Plain records exchanged by two-value sequences and by
//! [`Seq::zip`].
//!
//! [`Seq::zip`]: crate::Seq::zip

/// An immutable pair of values.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Pair<A, B> {
    pub v1: A,
    pub v2: B,
}

impl<A, B> Pair<A, B> {
    pub fn new(v1: A, v2: B) -> Self {
        Self { v1, v2 }
    }
}

impl<A, B> From<(A, B)> for Pair<A, B> {
    fn from((v1, v2): (A, B)) -> Self {
        Self { v1, v2 }
    }
}

impl<A, B> From<Pair<A, B>> for (A, B) {
    fn from(pair: Pair<A, B>) -> Self {
        (pair.v1, pair.v2)
    }
}

/// One aligned step across two sequences of possibly different
/// lengths.
///
/// A `None` side means that the matching sequence already ended.
/// Zipped sequences never yield a record with both sides `None`.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Zipped<A, B> {
    pub v1: Option<A>,
    pub v2: Option<B>,
}

impl<A, B> Zipped<A, B> {
    pub fn new(v1: Option<A>, v2: Option<B>) -> Self {
        Self { v1, v2 }
    }

    /// Returns the pair of values if both sides are present.
    pub fn both(self) -> Option<(A, B)> {
        Some((self.v1?, self.v2?))
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.v1.is_none() && self.v2.is_none()
    }
}
