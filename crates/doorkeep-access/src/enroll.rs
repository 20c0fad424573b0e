//! HTTP-triggered card enrollment.
//!
//! Each enrollment attempt is one request/response exchange: the HTTP layer
//! calls [`Enroller::enroll_once`], which prompts the person at the reader,
//! captures one card, and registers it with the directory. The reader sits
//! behind a lock so concurrent enrollment requests serialize instead of
//! fighting over the chip.

use doorkeep_core::{CardId, Error};
use doorkeep_core::constants::ENROLL_READ_TIMEOUT_MS;
use doorkeep_directory::DirectoryClient;
use doorkeep_hardware::{Actuator, CardReader, GpioBank, ProximityPort};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{info, warn};

/// Result of one enrollment attempt.
#[derive(Debug)]
pub enum EnrollmentOutcome {
    /// The card was captured and the directory accepted it.
    Enrolled(CardId),

    /// No card was presented within the capture window.
    ReadTimeout,

    /// The card was captured but the directory did not accept it.
    Rejected(Error),
}

/// Enrollment flow of an enroller-mode unit.
pub struct Enroller<P: ProximityPort, G: GpioBank> {
    reader: Mutex<CardReader<P>>,
    directory: DirectoryClient,
    actuator: Arc<Actuator<G>>,
    read_timeout: Duration,
}

impl<P: ProximityPort, G: GpioBank> Enroller<P, G> {
    /// Build an enroller over an initialized reader and a shared actuator.
    pub fn new(
        reader: CardReader<P>,
        directory: DirectoryClient,
        actuator: Arc<Actuator<G>>,
    ) -> Self {
        Enroller {
            reader: Mutex::new(reader),
            directory,
            actuator,
            read_timeout: Duration::from_millis(ENROLL_READ_TIMEOUT_MS),
        }
    }

    /// Override the capture window (tests compress it).
    #[must_use]
    pub fn with_read_timeout(mut self, read_timeout: Duration) -> Self {
        self.read_timeout = read_timeout;
        self
    }

    /// Run one prompt/capture/register exchange.
    ///
    /// Indication failures never abort an attempt in progress; they are
    /// logged and the flow continues.
    pub async fn enroll_once(&self) -> EnrollmentOutcome {
        // Hold the reader for the whole capture so overlapping requests
        // serialize.
        let mut reader = self.reader.lock().await;

        if let Err(e) = self.actuator.indicate_enrollment_start().await {
            warn!(error = %e, "enrollment-start indication failed");
        }

        let card = reader.read_once(self.read_timeout).await;
        drop(reader);

        let Some(card) = card else {
            info!("enrollment capture timed out");
            self.indicate_failure().await;
            return EnrollmentOutcome::ReadTimeout;
        };

        match self.directory.enroll(&card).await {
            Ok(()) => {
                info!(card = %card, "card enrolled");
                if let Err(e) = self.actuator.indicate_success().await {
                    warn!(error = %e, "success indication failed");
                }
                EnrollmentOutcome::Enrolled(card)
            }
            Err(e) => {
                warn!(card = %card, error = %e, "enrollment rejected");
                self.indicate_failure().await;
                EnrollmentOutcome::Rejected(e)
            }
        }
    }

    async fn indicate_failure(&self) {
        if let Err(e) = self.actuator.indicate_failure().await {
            warn!(error = %e, "failure indication failed");
        }
    }
}
