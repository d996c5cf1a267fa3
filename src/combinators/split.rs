//! Split sequences, routing each value to one of two consumers.

use std::ops::ControlFlow;

use crate::Seq;

/// A sequence yielding each value to exactly one of two callbacks.
///
/// Which callback receives a value is decided when the value is
/// produced. A break from either callback stops the whole sequence.
pub trait SplitSeq {
    type Left;
    type Right;

    fn each_split<L, R>(&self, left: L, right: R) -> ControlFlow<()>
    where
        L: FnMut(Self::Left) -> ControlFlow<()>,
        R: FnMut(Self::Right) -> ControlFlow<()>;

    /// Collects both sides into their own vector.
    fn collect_split(&self) -> (Vec<Self::Left>, Vec<Self::Right>) {
        let mut lefts = Vec::new();
        let mut rights = Vec::new();

        let _ = self.each_split(
            |value| {
                lefts.push(value);
                ControlFlow::Continue(())
            },
            |value| {
                rights.push(value);
                ControlFlow::Continue(())
            },
        );

        (lefts, rights)
    }
}

/// See [`Seq::split`].
#[derive(Clone, Debug)]
pub struct Split<S, F> {
    seq: S,
    f: F,
}

impl<S, F> Split<S, F> {
    pub fn new(seq: S, f: F) -> Self {
        Self { seq, f }
    }
}

impl<S, F> SplitSeq for Split<S, F>
where
    S: Seq,
    F: Fn(&S::Item) -> bool,
{
    type Left = S::Item;
    type Right = S::Item;

    fn each_split<L, R>(&self, mut left: L, mut right: R) -> ControlFlow<()>
    where
        L: FnMut(S::Item) -> ControlFlow<()>,
        R: FnMut(S::Item) -> ControlFlow<()>,
    {
        self.seq.each(|value| {
            if (self.f)(&value) {
                left(value)
            } else {
                right(value)
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use std::ops::ControlFlow;

    use crate::{iter, Seq};

    use super::SplitSeq;

    #[test]
    fn collect_split() {
        let _ = env_logger::try_init();

        let (evens, odds) = iter(1..=6).split(|n| n % 2 == 0).collect_split();

        assert_eq!(evens, vec![2, 4, 6]);
        assert_eq!(odds, vec![1, 3, 5]);
    }

    #[test]
    fn break_from_one_side_stops_both() {
        let _ = env_logger::try_init();

        let mut lefts = Vec::new();
        let mut rights = Vec::new();

        let flow = iter(1..=6).split(|n| *n < 3).each_split(
            |n| {
                lefts.push(n);
                ControlFlow::Continue(())
            },
            |n| {
                rights.push(n);
                ControlFlow::Break(())
            },
        );

        assert!(flow.is_break());
        assert_eq!(lefts, vec![1, 2]);
        assert_eq!(rights, vec![3]);
    }
}
