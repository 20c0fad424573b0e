//! Mock proximity-card port driven through an mpsc handle.

use crate::{
    error::{HardwareError, Result},
    traits::ProximityPort,
};
use doorkeep_core::CardId;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;
use tokio::sync::mpsc;

#[derive(Debug, Clone)]
enum PortEvent {
    Card(CardId),
    Fault(String),
}

/// Mock reader chip for tests and the emulator shell.
///
/// Card presentations and transient faults are injected through the paired
/// [`MockPortHandle`]; a quiet poll window simply times out to `Ok(None)`.
///
/// # Examples
///
/// ```
/// use doorkeep_hardware::mock::MockPort;
/// use doorkeep_hardware::traits::ProximityPort;
/// use std::time::Duration;
///
/// #[tokio::main]
/// async fn main() -> doorkeep_hardware::Result<()> {
///     let (mut port, handle) = MockPort::new();
///
///     handle.present_card("04aa".parse().unwrap()).await?;
///
///     let card = port.poll(Duration::from_millis(100)).await?;
///     assert_eq!(card.unwrap().to_hex(), "04aa");
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct MockPort {
    events: mpsc::Receiver<PortEvent>,
    bring_up_failures: Arc<AtomicU32>,
}

impl MockPort {
    /// Create a mock port and its control handle.
    pub fn new() -> (Self, MockPortHandle) {
        let (event_tx, event_rx) = mpsc::channel(32);
        let bring_up_failures = Arc::new(AtomicU32::new(0));

        (
            MockPort {
                events: event_rx,
                bring_up_failures: Arc::clone(&bring_up_failures),
            },
            MockPortHandle {
                event_tx,
                bring_up_failures,
            },
        )
    }
}

impl ProximityPort for MockPort {
    async fn bring_up(&mut self) -> Result<()> {
        let remaining = self.bring_up_failures.load(Ordering::SeqCst);
        if remaining > 0 {
            self.bring_up_failures.store(remaining - 1, Ordering::SeqCst);
            return Err(HardwareError::communication("chip not responding"));
        }
        Ok(())
    }

    async fn poll(&mut self, window: Duration) -> Result<Option<CardId>> {
        match tokio::time::timeout(window, self.events.recv()).await {
            Ok(Some(PortEvent::Card(card))) => Ok(Some(card)),
            Ok(Some(PortEvent::Fault(message))) => Err(HardwareError::card_read(message)),
            Ok(None) => Err(HardwareError::disconnected("mock port handle dropped")),
            Err(_) => Ok(None),
        }
    }
}

/// Control handle for a [`MockPort`].
#[derive(Debug, Clone)]
pub struct MockPortHandle {
    event_tx: mpsc::Sender<PortEvent>,
    bring_up_failures: Arc<AtomicU32>,
}

impl MockPortHandle {
    /// Present a card to the reader field.
    ///
    /// # Errors
    /// Returns an error if the port side has been dropped.
    pub async fn present_card(&self, card: CardId) -> Result<()> {
        self.event_tx
            .send(PortEvent::Card(card))
            .await
            .map_err(|_| HardwareError::disconnected("mock port dropped"))
    }

    /// Inject one transient read fault into the next poll.
    ///
    /// # Errors
    /// Returns an error if the port side has been dropped.
    pub async fn inject_fault(&self, message: impl Into<String>) -> Result<()> {
        self.event_tx
            .send(PortEvent::Fault(message.into()))
            .await
            .map_err(|_| HardwareError::disconnected("mock port dropped"))
    }

    /// Make the next `times` bring-up attempts fail.
    pub fn fail_bring_up(&self, times: u32) {
        self.bring_up_failures.store(times, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_present_and_poll() {
        let (mut port, handle) = MockPort::new();

        handle.present_card("04abcdef".parse().unwrap()).await.unwrap();

        let card = port.poll(Duration::from_millis(100)).await.unwrap();
        assert_eq!(card.unwrap().to_hex(), "04abcdef");
    }

    #[tokio::test(start_paused = true)]
    async fn test_quiet_window_times_out_to_none() {
        let (mut port, _handle) = MockPort::new();

        let card = port.poll(Duration::from_millis(100)).await.unwrap();
        assert!(card.is_none());
    }

    #[tokio::test]
    async fn test_injected_fault_surfaces_as_error() {
        let (mut port, handle) = MockPort::new();

        handle.inject_fault("field collision").await.unwrap();

        let result = port.poll(Duration::from_millis(100)).await;
        assert!(matches!(
            result,
            Err(HardwareError::CardReadError { .. })
        ));
    }

    #[tokio::test]
    async fn test_bring_up_failure_budget() {
        let (mut port, handle) = MockPort::new();
        handle.fail_bring_up(2);

        assert!(port.bring_up().await.is_err());
        assert!(port.bring_up().await.is_err());
        assert!(port.bring_up().await.is_ok());
    }
}
