//! Cooperative cancellation handle for in-flight chat requests.
//!
//! Two independent sources can end a request: the caller's [`CancelSource`]
//! and the wrapper's own timeout. Both feed the same observation point; the
//! first to fire wins and the source only matters for message text.

use tokio::sync::watch;

/// Caller-held side; dropping it without cancelling leaves the request alone
#[derive(Debug, Clone)]
pub struct CancelSource {
    tx: watch::Sender<bool>,
}

/// Request-held side, raced against the response future
#[derive(Debug, Clone)]
pub struct CancelToken {
    rx: watch::Receiver<bool>,
}

/// Create a linked source/token pair
pub fn cancel_pair() -> (CancelSource, CancelToken) {
    let (tx, rx) = watch::channel(false);
    (CancelSource { tx }, CancelToken { rx })
}

impl CancelSource {
    pub fn cancel(&self) {
        // receivers may already be gone; nothing to do then
        let _ = self.tx.send(true);
    }
}

impl CancelToken {
    pub fn is_cancelled(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolve once cancellation is requested. Never resolves if the source
    /// is dropped without cancelling.
    pub async fn cancelled(&mut self) {
        loop {
            if *self.rx.borrow() {
                return;
            }
            if self.rx.changed().await.is_err() {
                std::future::pending::<()>().await;
            }
        }
    }
}
