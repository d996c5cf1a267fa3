//! Collection of channel integrations.
//!
//! A channel integration turns the receiving half of a channel into a
//! [`Seq`], and sends the values of a [`Seq`] into the sending half
//! of a channel. They let sequences cross thread boundaries.
//!
//! If you miss an integration matching your requirements, you can
//! easily implement your own by taking example on the existing ones.
//!
//! [`Seq`]: crate::Seq

pub mod crossbeam;
#[cfg(feature = "tokio")]
pub mod tokio;
