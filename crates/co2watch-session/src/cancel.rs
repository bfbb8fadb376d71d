use std::sync::{Arc, Condvar, Mutex, PoisonError};
use std::time::Duration;

/// Cooperative cancellation signal shared between the caller and the
/// polling loop.
///
/// Clones share one flag. Cancellation is one-way and idempotent: once
/// fired it stays fired.
#[derive(Clone, Debug, Default)]
pub struct CancelToken {
    state: Arc<(Mutex<bool>, Condvar)>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fire the signal. Safe to call from any thread, any number of times.
    pub fn cancel(&self) {
        let (flag, cvar) = &*self.state;
        let mut cancelled = flag.lock().unwrap_or_else(PoisonError::into_inner);
        *cancelled = true;
        cvar.notify_all();
    }

    pub fn is_cancelled(&self) -> bool {
        let (flag, _) = &*self.state;
        *flag.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Block until the signal fires or `timeout` elapses, whichever comes
    /// first. Returns true if cancelled.
    ///
    /// This is the polling loop's tick wait: a full timeout is a tick, an
    /// early return is a cancellation.
    pub(crate) fn wait_timeout(&self, timeout: Duration) -> bool {
        let (flag, cvar) = &*self.state;
        let cancelled = flag.lock().unwrap_or_else(PoisonError::into_inner);
        let (cancelled, _) = cvar
            .wait_timeout_while(cancelled, timeout, |cancelled| !*cancelled)
            .unwrap_or_else(PoisonError::into_inner);
        *cancelled
    }
}
