use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::runtime::{Builder, Handle, Runtime};

const WORKER_THREADS: usize = 2;

/// Background threads hosting the throttled visible-set recompute.
///
/// Created once by the view that needs it; dropping it shuts the threads
/// down without waiting for in-flight work.
#[derive(Debug)]
pub struct ThrottleDispatcher {
    handle: Handle,
    runtime: Option<Runtime>,
}

impl ThrottleDispatcher {
    pub fn new() -> Result<Self> {
        let count = Arc::new(AtomicUsize::new(0));
        let runtime = Builder::new_multi_thread()
            .worker_threads(WORKER_THREADS)
            .thread_name_fn(move || {
                let n = count.fetch_add(1, Ordering::Relaxed);
                format!("timetable-screen-state-{n}")
            })
            .enable_time()
            .build()
            .context("failed to start timetable worker threads")?;

        log::info!("Started throttle dispatcher with {WORKER_THREADS} worker threads");
        Ok(Self {
            handle: runtime.handle().clone(),
            runtime: Some(runtime),
        })
    }

    pub fn handle(&self) -> Handle {
        self.handle.clone()
    }
}

impl Drop for ThrottleDispatcher {
    fn drop(&mut self) {
        if let Some(runtime) = self.runtime.take() {
            runtime.shutdown_background();
            log::info!("Throttle dispatcher shut down");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_workers_are_named() {
        let dispatcher = ThrottleDispatcher::new().unwrap();
        let name = dispatcher
            .handle()
            .block_on(async {
                tokio::spawn(async { std::thread::current().name().map(str::to_owned) })
                    .await
                    .unwrap()
            })
            .unwrap();
        assert!(name.starts_with("timetable-screen-state-"), "{name}");
    }
}
