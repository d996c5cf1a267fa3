//! Bridges between push-style sequences and on-demand consumers.
//!
//! Sequences push their values, which suits most consumers but not
//! the ones needing a value at a time from several sequences at once
//! (merging, zipping), nor the ones only able to push values
//! themselves. Coroutines fill the gap: the sequence runs on a
//! worker thread suspended at each value until the consumer asks for
//! the next one.
//!
//! - [`Coroutine`] is the two-way primitive: each resume sends an
//!   input and receives an output, and the body returns a final
//!   result.
//! - [`Pull`] drives a [`Seq`] as an [`Iterator`].
//! - [`Push`] drives a sequence consumer with values pushed one by
//!   one.
//!
//! Every handle must be stopped or dropped to release its worker
//! thread. Both operations wait for the worker to exit.
//!
//! [`Seq`]: crate::Seq

pub mod coroutine;
pub mod pull;
pub mod push;

#[doc(inline)]
pub use self::{
    coroutine::{Coroutine, Suspend},
    pull::Pull,
    push::{Push, Pushed},
};
