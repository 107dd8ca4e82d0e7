//! Minimum-spacing gate for calls to a rate-limited service.

use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::{sleep_until, Instant};

/// Admits one caller at a time, no sooner than `interval` after the previous
/// admission.
///
/// Waiters queue on the inner mutex, so admissions are serialized in arrival
/// order however many tasks share the gate.
#[derive(Debug)]
pub struct RateGate {
    interval: Duration,
    next_slot: Mutex<Option<Instant>>,
}

impl RateGate {
    #[must_use]
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            next_slot: Mutex::new(None),
        }
    }

    /// Wait for the next slot. The first call is admitted immediately.
    pub async fn acquire(&self) {
        let mut next_slot = self.next_slot.lock().await;
        if let Some(at) = *next_slot {
            sleep_until(at).await;
        }
        *next_slot = Some(Instant::now() + self.interval);
    }
}
