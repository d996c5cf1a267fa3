//! Sequences over [`tokio::sync::mpsc`] channels.
//!
//! Both functions block the current thread, they must be called from
//! outside of any Tokio runtime, for example from a thread spawned
//! with `tokio::task::spawn_blocking`.

use std::ops::ControlFlow;

use log::trace;
use parking_lot::Mutex;
use tokio::sync::mpsc::{Receiver, Sender};

use crate::Seq;

/// See [`recv`].
///
/// Values are consumed from the channel: a second traversal goes on
/// where the first one stopped.
#[derive(Debug)]
pub struct Recv<T> {
    rx: Mutex<Receiver<T>>,
}

/// Builds a sequence receiving values from the given channel, until
/// all its senders are dropped.
pub fn recv<T>(rx: Receiver<T>) -> Recv<T> {
    Recv { rx: Mutex::new(rx) }
}

impl<T> Recv<T> {
    /// Gives back the underlying receiver.
    pub fn into_inner(self) -> Receiver<T> {
        self.rx.into_inner()
    }
}

impl<T> Seq for Recv<T> {
    type Item = T;

    fn each<F>(&self, mut f: F) -> ControlFlow<()>
    where
        F: FnMut(T) -> ControlFlow<()>,
    {
        loop {
            // the lock is not held while calling f
            let value = self.rx.lock().blocking_recv();

            match value {
                Some(value) => f(value)?,
                None => {
                    trace!("channel closed");
                    break ControlFlow::Continue(());
                }
            }
        }
    }
}

/// Sends every value of the sequence into the given channel.
///
/// Sending stops as soon as the channel gets closed, in which case
/// [`ControlFlow::Break`] is returned.
pub fn send<S>(seq: &S, tx: &Sender<S::Item>) -> ControlFlow<()>
where
    S: Seq + ?Sized,
{
    seq.each(|value| match tx.blocking_send(value) {
        Ok(()) => ControlFlow::Continue(()),
        Err(_) => {
            trace!("channel closed, stop sending");
            ControlFlow::Break(())
        }
    })
}

#[cfg(test)]
mod tests {
    use std::thread;

    use tokio::sync::mpsc;

    use crate::{iter, Seq};

    use super::{recv, send};

    #[test]
    fn send_then_recv() {
        let _ = env_logger::try_init();

        let (tx, rx) = mpsc::channel(1);

        let handle = thread::spawn(move || send(&iter(0..4), &tx));

        assert_eq!(recv(rx).collect(), vec![0, 1, 2, 3]);
        assert!(handle.join().unwrap().is_continue());
    }

    #[test]
    fn recv_stops_early() {
        let _ = env_logger::try_init();

        let (tx, rx) = mpsc::channel(8);
        for n in 0..5 {
            tx.blocking_send(n).unwrap();
        }
        drop(tx);

        let seq = recv(rx);
        assert_eq!((&seq).limit(2).collect(), vec![0, 1]);
        assert_eq!(seq.collect(), vec![2, 3, 4]);
    }

    #[test]
    fn send_stops_when_closed() {
        let _ = env_logger::try_init();

        let (tx, rx) = mpsc::channel(1);
        drop(rx);

        assert!(send(&iter(0..), &tx).is_break());
    }
}
