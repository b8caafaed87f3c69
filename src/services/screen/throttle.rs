//! Leading + trailing throttling of a stream of values.
//!
//! The first value of a burst is emitted at once and opens a window. Values
//! arriving inside the window replace a single pending value, which is
//! emitted when the window closes. A trailing emission opens a new window.

use std::future;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::{sleep_until, Instant};

#[derive(Debug, Clone)]
pub struct Throttle<T> {
    window: Duration,
    window_end: Option<Instant>,
    pending: Option<T>,
}

impl<T> Throttle<T> {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            window_end: None,
            pending: None,
        }
    }

    /// Offer a new value at `now`. Returns it if it must be emitted now.
    pub fn offer(&mut self, value: T, now: Instant) -> Option<T> {
        match self.window_end {
            Some(end) if now < end => {
                self.pending = Some(value);
                None
            }
            _ => {
                // Anything still pending is older than `value`.
                self.pending = None;
                self.window_end = Some(now + self.window);
                Some(value)
            }
        }
    }

    /// When the pending value is due, if there is one.
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().and(self.window_end)
    }

    /// Close an elapsed window, returning the trailing value to emit.
    pub fn flush(&mut self, now: Instant) -> Option<T> {
        match self.window_end {
            Some(end) if now >= end => match self.pending.take() {
                Some(value) => {
                    self.window_end = Some(now + self.window);
                    Some(value)
                }
                None => {
                    self.window_end = None;
                    None
                }
            },
            _ => None,
        }
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }
}

/// Forward `input` to `output` through a [`Throttle`] until `input` closes.
pub(crate) async fn throttle_latest<T>(
    mut input: watch::Receiver<T>,
    output: watch::Sender<T>,
    window: Duration,
) where
    T: Copy + Send + Sync,
{
    let mut throttle = Throttle::new(window);

    loop {
        let deadline = throttle.deadline();
        tokio::select! {
            changed = input.changed() => {
                if changed.is_err() {
                    break;
                }
                let value = *input.borrow_and_update();
                if let Some(value) = throttle.offer(value, Instant::now()) {
                    output.send_replace(value);
                }
            }
            _ = wait_for(deadline) => {
                if let Some(value) = throttle.flush(Instant::now()) {
                    output.send_replace(value);
                }
            }
        }
    }
}

async fn wait_for(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => sleep_until(deadline).await,
        None => future::pending().await,
    }
}
