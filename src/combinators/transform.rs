//! Stateless transformers wrapping one or two sequences.

use std::ops::ControlFlow;

use crate::{pair::Pair, Seq};

/// See [`Seq::map`].
#[derive(Clone, Debug)]
pub struct Map<S, F> {
    seq: S,
    f: F,
}

impl<S, F> Map<S, F> {
    pub fn new(seq: S, f: F) -> Self {
        Self { seq, f }
    }
}

impl<S, F, U> Seq for Map<S, F>
where
    S: Seq,
    F: Fn(S::Item) -> U,
{
    type Item = U;

    fn each<G>(&self, mut f: G) -> ControlFlow<()>
    where
        G: FnMut(U) -> ControlFlow<()>,
    {
        self.seq.each(|value| f((self.f)(value)))
    }
}

/// See [`Seq::filter`].
#[derive(Clone, Debug)]
pub struct Filter<S, F> {
    seq: S,
    f: F,
}

impl<S, F> Filter<S, F> {
    pub fn new(seq: S, f: F) -> Self {
        Self { seq, f }
    }
}

impl<S, F> Seq for Filter<S, F>
where
    S: Seq,
    F: Fn(&S::Item) -> bool,
{
    type Item = S::Item;

    fn each<G>(&self, mut f: G) -> ControlFlow<()>
    where
        G: FnMut(S::Item) -> ControlFlow<()>,
    {
        self.seq.each(|value| {
            if (self.f)(&value) {
                f(value)
            } else {
                ControlFlow::Continue(())
            }
        })
    }
}

/// See [`Seq::filter_map`].
#[derive(Clone, Debug)]
pub struct FilterMap<S, F> {
    seq: S,
    f: F,
}

impl<S, F> FilterMap<S, F> {
    pub fn new(seq: S, f: F) -> Self {
        Self { seq, f }
    }
}

impl<S, F, U> Seq for FilterMap<S, F>
where
    S: Seq,
    F: Fn(S::Item) -> Option<U>,
{
    type Item = U;

    fn each<G>(&self, mut f: G) -> ControlFlow<()>
    where
        G: FnMut(U) -> ControlFlow<()>,
    {
        self.seq.each(|value| match (self.f)(value) {
            Some(value) => f(value),
            None => ControlFlow::Continue(()),
        })
    }
}

/// See [`Seq::limit`].
#[derive(Clone, Debug)]
pub struct Limit<S> {
    seq: S,
    n: usize,
}

impl<S> Limit<S> {
    pub fn new(seq: S, n: usize) -> Self {
        Self { seq, n }
    }
}

impl<S: Seq> Seq for Limit<S> {
    type Item = S::Item;

    fn each<F>(&self, mut f: F) -> ControlFlow<()>
    where
        F: FnMut(S::Item) -> ControlFlow<()>,
    {
        if self.n == 0 {
            return ControlFlow::Continue(());
        }

        let mut remaining = self.n;
        let mut stopped = false;

        let _ = self.seq.each(|value| {
            if f(value).is_break() {
                stopped = true;
                return ControlFlow::Break(());
            }

            remaining -= 1;

            if remaining == 0 {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        });

        // reaching the limit ends the sequence, it does not stop it
        if stopped {
            ControlFlow::Break(())
        } else {
            ControlFlow::Continue(())
        }
    }
}

/// See [`Seq::skip`].
#[derive(Clone, Debug)]
pub struct Skip<S> {
    seq: S,
    n: usize,
}

impl<S> Skip<S> {
    pub fn new(seq: S, n: usize) -> Self {
        Self { seq, n }
    }
}

impl<S: Seq> Seq for Skip<S> {
    type Item = S::Item;

    fn each<F>(&self, mut f: F) -> ControlFlow<()>
    where
        F: FnMut(S::Item) -> ControlFlow<()>,
    {
        let mut skipped = 0;

        self.seq.each(|value| {
            if skipped < self.n {
                skipped += 1;
                ControlFlow::Continue(())
            } else {
                f(value)
            }
        })
    }
}

/// See [`Seq::chain`].
#[derive(Clone, Debug)]
pub struct Chain<A, B> {
    first: A,
    second: B,
}

impl<A, B> Chain<A, B> {
    pub fn new(first: A, second: B) -> Self {
        Self { first, second }
    }
}

impl<A, B> Seq for Chain<A, B>
where
    A: Seq,
    B: Seq<Item = A::Item>,
{
    type Item = A::Item;

    fn each<F>(&self, mut f: F) -> ControlFlow<()>
    where
        F: FnMut(A::Item) -> ControlFlow<()>,
    {
        self.first.each(&mut f)?;
        self.second.each(f)
    }
}

/// See [`concat`].
#[derive(Clone, Debug)]
pub struct Concat<S> {
    seqs: Vec<S>,
}

/// Yields the values of each of the given sequences in turn.
pub fn concat<S: Seq>(seqs: impl IntoIterator<Item = S>) -> Concat<S> {
    let seqs = seqs.into_iter().collect();
    Concat { seqs }
}

impl<S: Seq> Seq for Concat<S> {
    type Item = S::Item;

    fn each<F>(&self, mut f: F) -> ControlFlow<()>
    where
        F: FnMut(S::Item) -> ControlFlow<()>,
    {
        for seq in &self.seqs {
            seq.each(&mut f)?;
        }

        ControlFlow::Continue(())
    }
}

/// See [`Seq::or`].
#[derive(Clone, Debug)]
pub struct Or<A, B> {
    first: A,
    fallback: B,
}

impl<A, B> Or<A, B> {
    pub fn new(first: A, fallback: B) -> Self {
        Self { first, fallback }
    }
}

impl<A, B> Seq for Or<A, B>
where
    A: Seq,
    B: Seq<Item = A::Item>,
{
    type Item = A::Item;

    fn each<F>(&self, mut f: F) -> ControlFlow<()>
    where
        F: FnMut(A::Item) -> ControlFlow<()>,
    {
        let mut produced = false;

        let flow = self.first.each(|value| {
            produced = true;
            f(value)
        });

        if produced {
            flow
        } else {
            self.fallback.each(f)
        }
    }
}

/// See [`Seq::enumerate`].
#[derive(Clone, Debug)]
pub struct Enumerate<S> {
    seq: S,
}

impl<S> Enumerate<S> {
    pub fn new(seq: S) -> Self {
        Self { seq }
    }
}

impl<S: Seq> Seq for Enumerate<S> {
    type Item = (usize, S::Item);

    fn each<F>(&self, mut f: F) -> ControlFlow<()>
    where
        F: FnMut(Self::Item) -> ControlFlow<()>,
    {
        let mut index = 0;

        self.seq.each(|value| {
            let item = (index, value);
            index += 1;
            f(item)
        })
    }
}

/// See [`Seq::pairs`].
#[derive(Clone, Debug)]
pub struct Pairs<S> {
    seq: S,
}

impl<S> Pairs<S> {
    pub fn new(seq: S) -> Self {
        Self { seq }
    }
}

impl<S, A, B> Seq for Pairs<S>
where
    S: Seq<Item = (A, B)>,
{
    type Item = Pair<A, B>;

    fn each<F>(&self, mut f: F) -> ControlFlow<()>
    where
        F: FnMut(Pair<A, B>) -> ControlFlow<()>,
    {
        self.seq.each(|value| f(Pair::from(value)))
    }
}

/// See [`Seq::tuples`].
#[derive(Clone, Debug)]
pub struct Tuples<S> {
    seq: S,
}

impl<S> Tuples<S> {
    pub fn new(seq: S) -> Self {
        Self { seq }
    }
}

impl<S, A, B> Seq for Tuples<S>
where
    S: Seq<Item = Pair<A, B>>,
{
    type Item = (A, B);

    fn each<F>(&self, mut f: F) -> ControlFlow<()>
    where
        F: FnMut((A, B)) -> ControlFlow<()>,
    {
        self.seq.each(|pair| f(pair.into()))
    }
}
