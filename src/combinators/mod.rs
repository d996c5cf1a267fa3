//! Collection of sequence combinators.
//!
//! Combinators wrap one or more sequences and are sequences
//! themselves. They are usually built with the adapter methods of
//! [`Seq`], and only run when the resulting sequence is traversed.
//!
//! Combinators needing one value at a time from several sequences
//! (merging, zipping, look-back) drive them through [coroutines].
//!
//! [`Seq`]: crate::Seq
//! [coroutines]: crate::coroutines

mod heap;
pub mod memo;
pub mod merge;
pub mod sort;
pub mod split;
pub mod transform;
pub mod windows;
pub mod zip;

#[doc(inline)]
pub use self::{
    memo::{Cache, Dedup, Uniq},
    merge::Merge,
    sort::Sorted,
    split::{Split, SplitSeq},
    transform::{
        concat, Chain, Concat, Enumerate, Filter, FilterMap, Limit, Map, Or, Pairs, Skip, Tuples,
    },
    windows::{Chunks, ChunksBy, ChunksError, MapSlices, SliceSeq, ToVecs, Windows, WindowsError},
    zip::{Zip, ZipThreaded},
};
