//! Periodic current-reading refresh.
//!
//! # Invariants
//! - The first refresh happens immediately on start.
//! - `cancel` and `Drop` stop and join the worker before returning.
//! - A failed refresh keeps the previous current reading and the ticker
//!   keeps running.

use crate::service::converter::{CalendarConverter, InstantSource};
use crate::service::reading_service::{ReadingService, SessionSnapshot};
use crossbeam_channel::{bounded, RecvTimeoutError, Sender};
use log::{debug, warn};
use std::io;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

const TICKER_THREAD_NAME: &str = "wuxing-current-reading";

/// Called with the fresh snapshot after every successful refresh.
pub type RefreshListener = Box<dyn Fn(Arc<SessionSnapshot>) + Send + 'static>;

/// Background refresher for the current reading.
pub struct CurrentReadingTicker {
    stop: Option<Sender<()>>,
    worker: Option<JoinHandle<u64>>,
}

impl CurrentReadingTicker {
    pub fn start<C>(
        service: Arc<ReadingService<C>>,
        source: Arc<dyn InstantSource>,
        interval: Duration,
        listener: Option<RefreshListener>,
    ) -> io::Result<Self>
    where
        C: CalendarConverter + 'static,
    {
        let (stop_tx, stop_rx) = bounded::<()>(1);
        let worker = thread::Builder::new()
            .name(TICKER_THREAD_NAME.to_string())
            .spawn(move || {
                let mut refreshes = 0u64;
                loop {
                    match service.refresh_current(source.as_ref()) {
                        Ok(reading) => {
                            refreshes += 1;
                            debug!(
                                "event=current_refresh module=service status=ok pillars=\"{reading}\""
                            );
                            if let Some(listener) = &listener {
                                listener(service.snapshot());
                            }
                        }
                        Err(err) => {
                            warn!("event=current_refresh module=service status=error error={err}");
                        }
                    }
                    match stop_rx.recv_timeout(interval) {
                        Err(RecvTimeoutError::Timeout) => continue,
                        Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                    }
                }
                refreshes
            })?;

        Ok(Self {
            stop: Some(stop_tx),
            worker: Some(worker),
        })
    }

    pub fn is_running(&self) -> bool {
        self.worker
            .as_ref()
            .is_some_and(|worker| !worker.is_finished())
    }

    /// Stops the ticker and returns the number of successful refreshes.
    pub fn cancel(mut self) -> u64 {
        self.shutdown()
    }

    fn shutdown(&mut self) -> u64 {
        if let Some(stop) = self.stop.take() {
            let _ = stop.try_send(());
        }
        match self.worker.take().map(JoinHandle::join) {
            Some(Ok(refreshes)) => refreshes,
            Some(Err(_)) => {
                warn!("event=current_ticker_stop module=service status=error reason=panicked");
                0
            }
            None => 0,
        }
    }
}

impl Drop for CurrentReadingTicker {
    fn drop(&mut self) {
        self.shutdown();
    }
}
