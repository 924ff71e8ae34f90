//! Caller-owned cancellation signals for in-flight API requests.

use tokio::sync::watch;

/// Sender half of a cancellation signal. Held by the caller; firing it
/// aborts the request(s) watching the paired [`CancelSignal`].
#[derive(Debug)]
pub struct CancelHandle {
    tx: watch::Sender<bool>,
}

impl CancelHandle {
    /// Requests cancellation. Safe to call more than once.
    pub fn cancel(&self) {
        let _ = self.tx.send(true);
    }
}

/// Receiver half of a cancellation signal, passed to the request client.
/// Cloneable so a single handle can govern several requests.
#[derive(Debug, Clone)]
pub struct CancelSignal {
    rx: watch::Receiver<bool>,
}

impl CancelSignal {
    /// Creates a connected handle/signal pair.
    pub fn new() -> (CancelHandle, CancelSignal) {
        let (tx, rx) = watch::channel(false);
        (CancelHandle { tx }, CancelSignal { rx })
    }

    /// Returns true if the handle has already fired.
    pub fn is_cancelled(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolves once the handle fires, including when it fired before this
    /// future was awaited. A handle dropped without firing never resolves
    /// this future, so the governed request runs to completion.
    pub(crate) async fn cancelled(mut self) {
        if self.rx.wait_for(|fired| *fired).await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_cancel_fires_signal() {
        let (handle, signal) = CancelSignal::new();
        assert!(!signal.is_cancelled());

        handle.cancel();
        assert!(signal.is_cancelled());
        signal.cancelled().await; // resolves immediately
    }

    #[tokio::test]
    async fn test_cancel_before_await_still_resolves() {
        let (handle, signal) = CancelSignal::new();
        handle.cancel();

        let resolved = tokio::time::timeout(Duration::from_millis(100), signal.cancelled()).await;
        assert!(resolved.is_ok());
    }

    #[tokio::test]
    async fn test_dropped_handle_never_resolves() {
        let (handle, signal) = CancelSignal::new();
        drop(handle);

        let resolved = tokio::time::timeout(Duration::from_millis(50), signal.cancelled()).await;
        assert!(resolved.is_err());
    }

    #[tokio::test]
    async fn test_cloned_signals_share_one_handle() {
        let (handle, signal) = CancelSignal::new();
        let other = signal.clone();

        handle.cancel();
        signal.cancelled().await;
        other.cancelled().await;
    }
}
