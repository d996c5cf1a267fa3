#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

pub mod channels;
pub mod combinators;
pub mod coroutines;
pub mod pair;
mod seq;

#[doc(inline)]
pub use self::{
    combinators::{concat, ChunksError, SliceSeq, SplitSeq, WindowsError},
    coroutines::{Coroutine, Pull, Push},
    pair::{Pair, Zipped},
    seq::{empty, from_fn, iter, once, CmpFn, Empty, EqFn, FromFn, Iter, Once, Seq},
};
