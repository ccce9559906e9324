//! Cancellable contexts.
//!
//! A [`Context`] is a cheap, cloneable cancellation handle. Cancelling a
//! context cancels every child derived from it. Waiters select on
//! [`Context::done`], a channel that disconnects when the context is
//! cancelled, so cancellation composes with other crossbeam channels.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;

use crossbeam_channel::{select, Receiver, Sender};
use parking_lot::Mutex;
use thiserror::Error;

/// The context was cancelled while waiting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("context cancelled")]
pub struct Cancelled;

struct Inner {
    cancelled: AtomicBool,
    // Never sent on; dropping it disconnects `done`.
    trigger: Mutex<Option<Sender<()>>>,
    done: Receiver<()>,
    children: Mutex<Vec<Weak<Inner>>>,
}

impl Inner {
    fn cancel(&self) {
        if self.cancelled.swap(true, Ordering::SeqCst) {
            return;
        }
        self.trigger.lock().take();

        let children = std::mem::take(&mut *self.children.lock());
        for child in children.iter().filter_map(Weak::upgrade) {
            child.cancel();
        }
    }
}

/// A cancellable context shared by a unit of work and everything it spawns.
#[derive(Clone)]
pub struct Context {
    inner: Arc<Inner>,
}

impl Context {
    /// Create a new root context.
    pub fn new() -> Self {
        let (trigger, done) = crossbeam_channel::bounded(0);
        Self {
            inner: Arc::new(Inner {
                cancelled: AtomicBool::new(false),
                trigger: Mutex::new(Some(trigger)),
                done,
                children: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Derive a child context, cancelled together with this one.
    ///
    /// A child of an already-cancelled context starts out cancelled.
    pub fn child(&self) -> Self {
        let child = Self::new();
        {
            let mut children = self.inner.children.lock();
            children.retain(|c| c.strong_count() > 0);
            children.push(Arc::downgrade(&child.inner));
        }
        if self.is_cancelled() {
            child.cancel();
        }
        child
    }

    /// Cancel this context and all of its children. Idempotent.
    pub fn cancel(&self) {
        self.inner.cancel();
    }

    /// Returns true once the context has been cancelled.
    pub fn is_cancelled(&self) -> bool {
        self.inner.cancelled.load(Ordering::SeqCst)
    }

    /// Returns `Err(Cancelled)` if the context has been cancelled.
    pub fn check(&self) -> Result<(), Cancelled> {
        if self.is_cancelled() {
            Err(Cancelled)
        } else {
            Ok(())
        }
    }

    /// A receiver that becomes disconnected when the context is cancelled.
    ///
    /// Use it as a `recv` arm in `crossbeam_channel::select!`.
    pub fn done(&self) -> &Receiver<()> {
        &self.inner.done
    }

    /// Sleep for `duration`, waking early on cancellation.
    pub fn sleep(&self, duration: Duration) -> Result<(), Cancelled> {
        select! {
            recv(self.done()) -> _ => Err(Cancelled),
            default(duration) => Ok(()),
        }
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}
