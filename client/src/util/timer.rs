//! Retry delays on the browser event loop.

use std::time::Duration;

use futures::future::LocalBoxFuture;
use shell::Timer;

/// [`Timer`] backed by `setTimeout`.
#[derive(Debug, Default, Clone, Copy)]
pub struct BrowserTimer;

impl Timer for BrowserTimer {
    #[cfg_attr(not(feature = "csr"), allow(unused_variables))]
    fn sleep(&self, duration: Duration) -> LocalBoxFuture<'static, ()> {
        #[cfg(feature = "csr")]
        {
            Box::pin(gloo_timers::future::sleep(duration))
        }
        // No event loop to wait on off the browser; the delay elapses at once.
        #[cfg(not(feature = "csr"))]
        {
            Box::pin(futures::future::ready(()))
        }
    }
}
