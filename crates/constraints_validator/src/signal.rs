//! Revalidate signal.
//!
//! A broadcast channel fired whenever constraints or presentation classes change,
//! so that consumers can re-run validation for the fields they display. Listeners
//! run synchronously on the broadcasting thread, each exactly once per broadcast,
//! in no particular order.

use serde::Serialize;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, Weak};

/// Name of the signal, for hosts that route events by name.
pub const REVALIDATE_SIGNAL: &str = "constraints-changed";

/// What triggered a broadcast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeReason {
    /// Constraints were added, loaded or cleared
    ConstraintsChanged,
    /// Presentation classes were replaced
    ClassesChanged,
}

/// Event delivered to listeners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RevalidateEvent {
    /// What triggered the broadcast
    pub reason: ChangeReason,
}

impl RevalidateEvent {
    /// Creates an event for the given reason.
    pub fn new(reason: ChangeReason) -> Self {
        Self { reason }
    }

    /// Returns the signal name.
    pub fn name(&self) -> &'static str {
        REVALIDATE_SIGNAL
    }
}

type Listener = Arc<dyn Fn(&RevalidateEvent) + Send + Sync>;

#[derive(Default)]
struct SignalInner {
    next_id: AtomicU64,
    listeners: Mutex<Vec<(u64, Listener)>>,
}

/// Observer list for constraint changes.
///
/// Cloning the signal yields another handle to the same listener list.
///
/// # Example
///
/// ```rust
/// use constraints_validator::{ChangeReason, RevalidateEvent, RevalidateSignal};
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use std::sync::Arc;
///
/// let signal = RevalidateSignal::new();
/// let calls = Arc::new(AtomicUsize::new(0));
///
/// let counter = calls.clone();
/// let subscription = signal.subscribe(move |_event| {
///     counter.fetch_add(1, Ordering::SeqCst);
/// });
///
/// signal.broadcast(RevalidateEvent::new(ChangeReason::ConstraintsChanged));
/// subscription.unsubscribe();
/// signal.broadcast(RevalidateEvent::new(ChangeReason::ConstraintsChanged));
///
/// assert_eq!(calls.load(Ordering::SeqCst), 1);
/// ```
#[derive(Clone, Default)]
pub struct RevalidateSignal {
    inner: Arc<SignalInner>,
}

impl RevalidateSignal {
    /// Creates a signal without listeners.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a listener.
    ///
    /// The listener stays registered until [`Subscription::unsubscribe`] is called;
    /// dropping the subscription handle does not remove it.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&RevalidateEvent) + Send + Sync + 'static,
    {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        self.lock().push((id, Arc::new(listener)));
        Subscription {
            id,
            signal: Arc::downgrade(&self.inner),
        }
    }

    /// Invokes every registered listener once.
    ///
    /// Listeners are called after the listener list is released, so a listener may
    /// subscribe, unsubscribe or trigger further broadcasts.
    pub fn broadcast(&self, event: RevalidateEvent) {
        let listeners: Vec<Listener> = self
            .lock()
            .iter()
            .map(|(_, listener)| listener.clone())
            .collect();

        for listener in listeners {
            listener(&event);
        }
    }

    /// Returns the number of registered listeners.
    pub fn subscriber_count(&self) -> usize {
        self.lock().len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<(u64, Listener)>> {
        self.inner
            .listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for RevalidateSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RevalidateSignal")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

/// Handle returned by [`RevalidateSignal::subscribe`].
#[derive(Debug)]
pub struct Subscription {
    id: u64,
    signal: Weak<SignalInner>,
}

impl Subscription {
    /// Removes the listener.
    ///
    /// Returns false if the listener was already gone (e.g. the signal was dropped).
    pub fn unsubscribe(self) -> bool {
        let Some(inner) = self.signal.upgrade() else {
            return false;
        };
        let mut listeners = inner
            .listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let before = listeners.len();
        listeners.retain(|(id, _)| *id != self.id);
        listeners.len() != before
    }
}
