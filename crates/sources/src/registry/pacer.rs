//! Fixed spacing between successive source requests.
//!
//! Sources are fetched one after another; the pacer only makes sure the next
//! fetch starts no sooner than `interval` after the previous one started.

use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

use log::{debug, warn};

pub struct RequestPacer {
    interval: Duration,
    last_start: Mutex<Option<Instant>>,
}

impl RequestPacer {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_start: Mutex::new(None),
        }
    }

    fn lock_last_start(&self) -> MutexGuard<'_, Option<Instant>> {
        self.last_start.lock().unwrap_or_else(|poisoned| {
            warn!("Request pacer mutex was poisoned, recovering");
            poisoned.into_inner()
        })
    }

    /// Time left before the next request may start.
    pub fn time_until_ready(&self) -> Duration {
        match *self.lock_last_start() {
            Some(last) => self.interval.saturating_sub(last.elapsed()),
            None => Duration::ZERO,
        }
    }

    /// Wait out the remaining interval, then mark a request as started.
    pub async fn wait(&self) {
        let wait_time = self.time_until_ready();
        if wait_time > Duration::ZERO {
            debug!("Pacer: waiting {:?} before next request", wait_time);
            tokio::time::sleep(wait_time).await;
        }
        *self.lock_last_start() = Some(Instant::now());
    }
}
