//! Card reader: retrying bring-up and bounded reads over a [`ProximityPort`].

use crate::{
    error::{HardwareError, Result},
    traits::ProximityPort,
};
use doorkeep_core::CardId;
use doorkeep_core::constants::{INIT_BACKOFF_MS, POLL_RETRY_PAUSE_MS, SUB_POLL_WINDOW_MS};
use std::time::Duration;
use tokio::time::{Instant, sleep};
use tracing::{info, warn};

/// Proximity-card reader.
///
/// Wraps the raw chip port with the device's read discipline: a retrying
/// initialization protocol and a bounded, sub-polled read operation. The
/// sub-poll window stays well below the read timeout so callers waiting on
/// [`read_once`](CardReader::read_once) remain responsive to cancellation
/// instead of sitting in one long blocking call.
pub struct CardReader<P: ProximityPort> {
    port: P,
    sub_poll: Duration,
}

impl<P: ProximityPort> CardReader<P> {
    /// Create a reader with the default sub-poll window.
    pub fn new(port: P) -> Self {
        Self::with_sub_poll(port, Duration::from_millis(SUB_POLL_WINDOW_MS))
    }

    /// Create a reader with a custom sub-poll window (tests compress it).
    pub fn with_sub_poll(port: P, sub_poll: Duration) -> Self {
        CardReader { port, sub_poll }
    }

    /// Bring up the reader chip, retrying with a fixed backoff.
    ///
    /// This is the one unrecoverable failure in the system: a process that
    /// cannot talk to its reader has nothing to do, so exhaustion is fatal
    /// to the caller.
    ///
    /// # Errors
    /// Returns `HardwareError::InitializationFailed` after `max_attempts`
    /// failed bring-up attempts.
    pub async fn initialize(&mut self, max_attempts: u32) -> Result<()> {
        for attempt in 1..=max_attempts {
            match self.port.bring_up().await {
                Ok(()) => {
                    info!(attempt, "reader chip initialized");
                    return Ok(());
                }
                Err(e) => {
                    warn!(attempt, max_attempts, error = %e, "reader bring-up failed");
                    if attempt < max_attempts {
                        sleep(Duration::from_millis(INIT_BACKOFF_MS)).await;
                    }
                }
            }
        }
        Err(HardwareError::initialization_failed(
            max_attempts,
            "reader chip did not respond; check wiring",
        ))
    }

    /// Read one card identifier within `timeout`.
    ///
    /// Polls the chip in short sub-intervals until an identifier is returned
    /// or the budget is spent. A quiet timeout is the normal case and yields
    /// `None`, never an error. Transient poll faults are logged and retried
    /// within the same budget; worst-case blocking is `timeout` plus one
    /// sub-poll window.
    pub async fn read_once(&mut self, timeout: Duration) -> Option<CardId> {
        let deadline = Instant::now() + timeout;
        while Instant::now() < deadline {
            match self.port.poll(self.sub_poll).await {
                Ok(Some(card)) => return Some(card),
                Ok(None) => {}
                Err(e) => {
                    warn!(error = %e, "transient card poll fault");
                    sleep(Duration::from_millis(POLL_RETRY_PAUSE_MS)).await;
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockPort;

    fn reader(port: MockPort) -> CardReader<MockPort> {
        CardReader::with_sub_poll(port, Duration::from_millis(50))
    }

    #[tokio::test(start_paused = true)]
    async fn test_initialize_first_attempt() {
        let (port, _handle) = MockPort::new();
        let mut reader = reader(port);

        reader.initialize(3).await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_initialize_retries_with_backoff() {
        let (port, handle) = MockPort::new();
        handle.fail_bring_up(2);
        let mut reader = reader(port);

        let start = Instant::now();
        reader.initialize(3).await.unwrap();

        // Two failures mean two backoff pauses before the third attempt.
        assert!(start.elapsed() >= Duration::from_millis(2 * INIT_BACKOFF_MS));
    }

    #[tokio::test(start_paused = true)]
    async fn test_initialize_exhaustion_is_fatal() {
        let (port, handle) = MockPort::new();
        handle.fail_bring_up(3);
        let mut reader = reader(port);

        let result = reader.initialize(3).await;
        assert!(matches!(
            result,
            Err(HardwareError::InitializationFailed { attempts: 3, .. })
        ));
    }

    #[tokio::test]
    async fn test_read_once_returns_presented_card() {
        let (port, handle) = MockPort::new();
        let mut reader = reader(port);

        handle.present_card("04aa".parse().unwrap()).await.unwrap();

        let card = reader.read_once(Duration::from_secs(1)).await;
        assert_eq!(card.unwrap().to_hex(), "04aa");
    }

    #[tokio::test(start_paused = true)]
    async fn test_read_once_times_out_to_none() {
        let (port, _handle) = MockPort::new();
        let mut reader = reader(port);

        let timeout = Duration::from_millis(300);
        let start = Instant::now();
        let card = reader.read_once(timeout).await;

        assert!(card.is_none());
        // Bounded by the timeout plus at most one sub-poll window.
        assert!(start.elapsed() <= timeout + Duration::from_millis(50));
    }

    #[tokio::test(start_paused = true)]
    async fn test_read_once_survives_transient_fault() {
        let (port, handle) = MockPort::new();
        let mut reader = reader(port);

        handle.inject_fault("field collision").await.unwrap();
        handle.present_card("ffbb".parse().unwrap()).await.unwrap();

        let card = reader.read_once(Duration::from_secs(1)).await;
        assert_eq!(card.unwrap().to_hex(), "ffbb");
    }
}
