//! Windows and chunks over a reusable buffer.
//!
//! These combinators own a single buffer which is handed to the
//! consumer by reference at each step, then overwritten at the next
//! one. They are therefore not [`Seq`]s but [`SliceSeq`]s: the
//! borrowed slice cannot outlive the callback, consumers willing to
//! keep a window must copy it, for example with
//! [`SliceSeq::to_vecs`].

use std::{marker::PhantomData, ops::ControlFlow};

use log::trace;
use thiserror::Error;

use crate::Seq;

/// Errors that can occur when creating windows.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum WindowsError {
    /// Windows need to hold at least one value.
    #[error("Invalid window size: expected at least 1, got {0}")]
    InvalidSize(usize),
}

/// Errors that can occur when creating chunks.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum ChunksError {
    /// Chunks need to hold at least one value.
    #[error("Invalid chunk size: expected at least 1, got {0}")]
    InvalidSize(usize),
}

/// A sequence lending slices of a buffer it owns.
pub trait SliceSeq {
    /// The type of the values held by the slices.
    type Elem;

    /// Pushes every slice of the sequence into `f`, until `f` breaks.
    fn each_slice<F>(&self, f: F) -> ControlFlow<()>
    where
        F: FnMut(&[Self::Elem]) -> ControlFlow<()>;

    /// Turns every borrowed slice into an owned value.
    fn map<U, F>(self, f: F) -> MapSlices<Self, F, U>
    where
        Self: Sized,
        F: Fn(&[Self::Elem]) -> U,
    {
        MapSlices {
            seq: self,
            f,
            item: PhantomData,
        }
    }

    /// Copies every slice into its own vector.
    fn to_vecs(self) -> ToVecs<Self>
    where
        Self: Sized,
        Self::Elem: Clone,
    {
        ToVecs { seq: self }
    }
}

/// See [`SliceSeq::map`].
#[derive(Clone, Debug)]
pub struct MapSlices<S, F, U> {
    seq: S,
    f: F,
    item: PhantomData<fn() -> U>,
}

impl<S, F, U> Seq for MapSlices<S, F, U>
where
    S: SliceSeq,
    F: Fn(&[S::Elem]) -> U,
{
    type Item = U;

    fn each<G>(&self, mut f: G) -> ControlFlow<()>
    where
        G: FnMut(U) -> ControlFlow<()>,
    {
        self.seq.each_slice(|slice| f((self.f)(slice)))
    }
}

/// See [`SliceSeq::to_vecs`].
#[derive(Clone, Debug)]
pub struct ToVecs<S> {
    seq: S,
}

impl<S> Seq for ToVecs<S>
where
    S: SliceSeq,
    S::Elem: Clone,
{
    type Item = Vec<S::Elem>;

    fn each<F>(&self, mut f: F) -> ControlFlow<()>
    where
        F: FnMut(Vec<S::Elem>) -> ControlFlow<()>,
    {
        self.seq.each_slice(|slice| f(slice.to_vec()))
    }
}

/// See [`Seq::windows`].
///
/// Over m values, yields the max(0, m - size + 1) windows of exactly
/// `size` values, each one overlapping the previous one by `size - 1`
/// values. An input shorter than `size` yields one partial window
/// holding all of it, unless it is empty.
#[derive(Clone, Debug)]
pub struct Windows<S> {
    seq: S,
    size: usize,
}

impl<S> Windows<S> {
    pub fn new(seq: S, size: usize) -> Result<Self, WindowsError> {
        if size == 0 {
            return Err(WindowsError::InvalidSize(size));
        }

        Ok(Self { seq, size })
    }
}

impl<S: Seq> SliceSeq for Windows<S> {
    type Elem = S::Item;

    fn each_slice<F>(&self, mut f: F) -> ControlFlow<()>
    where
        F: FnMut(&[S::Item]) -> ControlFlow<()>,
    {
        let size = self.size;
        let mut window = Vec::with_capacity(size);

        self.seq.each(|value| {
            if window.len() < size {
                window.push(value);
            } else {
                window.rotate_left(1);
                window[size - 1] = value;
            }

            if window.len() == size {
                f(&window)
            } else {
                ControlFlow::Continue(())
            }
        })?;

        if !window.is_empty() && window.len() < size {
            trace!("yield partial window of {}/{size} values", window.len());
            f(&window)?;
        }

        ControlFlow::Continue(())
    }
}

/// See [`Seq::chunks`].
///
/// Yields disjoint chunks of `size` values, the last one possibly
/// shorter.
#[derive(Clone, Debug)]
pub struct Chunks<S> {
    seq: S,
    size: usize,
}

impl<S> Chunks<S> {
    pub fn new(seq: S, size: usize) -> Result<Self, ChunksError> {
        if size == 0 {
            return Err(ChunksError::InvalidSize(size));
        }

        Ok(Self { seq, size })
    }
}

impl<S: Seq> SliceSeq for Chunks<S> {
    type Elem = S::Item;

    fn each_slice<F>(&self, mut f: F) -> ControlFlow<()>
    where
        F: FnMut(&[S::Item]) -> ControlFlow<()>,
    {
        let size = self.size;
        let mut chunk = Vec::with_capacity(size);

        self.seq.each(|value| {
            chunk.push(value);

            if chunk.len() < size {
                return ControlFlow::Continue(());
            }

            let flow = f(&chunk);
            chunk.clear();
            flow
        })?;

        if !chunk.is_empty() {
            f(&chunk)?;
        }

        ControlFlow::Continue(())
    }
}

/// See [`Seq::chunks_by`].
///
/// A new chunk starts whenever the key of a value differs from the
/// key of the previous one.
#[derive(Clone, Debug)]
pub struct ChunksBy<S, F> {
    seq: S,
    key: F,
}

impl<S, F> ChunksBy<S, F> {
    pub fn new(seq: S, key: F) -> Self {
        Self { seq, key }
    }
}

impl<S, F, K> SliceSeq for ChunksBy<S, F>
where
    S: Seq,
    F: Fn(&S::Item) -> K,
    K: PartialEq,
{
    type Elem = S::Item;

    fn each_slice<G>(&self, mut f: G) -> ControlFlow<()>
    where
        G: FnMut(&[S::Item]) -> ControlFlow<()>,
    {
        let mut chunk = Vec::new();
        let mut current: Option<K> = None;

        self.seq.each(|value| {
            let key = (self.key)(&value);

            if current.as_ref().is_some_and(|current| *current != key) {
                f(&chunk)?;
                chunk.clear();
            }

            current = Some(key);
            chunk.push(value);
            ControlFlow::Continue(())
        })?;

        if !chunk.is_empty() {
            f(&chunk)?;
        }

        ControlFlow::Continue(())
    }
}
