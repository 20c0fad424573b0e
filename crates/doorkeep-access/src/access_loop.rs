//! Reader-mode access loop.
//!
//! Ties `CardReader` → verifier/`DirectoryClient` → `Actuator` into the
//! continuous cycle that runs for the life of a reader-mode process. Every
//! per-cycle failure (directory outage, hardware fault) is absorbed at this
//! boundary: it becomes a failure indication and a log line, and the loop
//! carries on with its next iteration. The only way out is cancellation,
//! honored while waiting for a card and between iterations, never
//! mid-actuation.

use crate::state::{AccessState, StateMachine};
use chrono::Utc;
use doorkeep_core::CardId;
use doorkeep_core::constants::LOOP_DEBOUNCE_MS;
use doorkeep_directory::{AccessLogEntry, DirectoryClient, decide};
use doorkeep_hardware::{Actuator, CardReader, GpioBank, ProximityPort};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// The continuous card-polling state machine of a reader-mode unit.
pub struct AccessLoop<P: ProximityPort, G: GpioBank> {
    reader: CardReader<P>,
    directory: DirectoryClient,
    actuator: Arc<Actuator<G>>,
    card_read_timeout: Duration,
    debounce: Duration,
    cancel: CancellationToken,
    machine: StateMachine,
}

impl<P: ProximityPort, G: GpioBank> AccessLoop<P, G> {
    /// Build a loop over an initialized reader and a shared actuator.
    pub fn new(
        reader: CardReader<P>,
        directory: DirectoryClient,
        actuator: Arc<Actuator<G>>,
        card_read_timeout: Duration,
        cancel: CancellationToken,
    ) -> Self {
        AccessLoop {
            reader,
            directory,
            actuator,
            card_read_timeout,
            debounce: Duration::from_millis(LOOP_DEBOUNCE_MS),
            cancel,
            machine: StateMachine::new(),
        }
    }

    /// Override the post-decision debounce pause (tests compress it).
    #[must_use]
    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    /// Run until cancelled.
    ///
    /// A quiet read timeout loops straight back to waiting; a presented card
    /// runs one full decide/actuate/indicate cycle followed by the debounce
    /// pause. Cancellation is observed while polling and between iterations;
    /// an in-flight door cycle always completes first.
    pub async fn run(mut self) {
        info!("access loop started");
        let cancel = self.cancel.clone();
        loop {
            let card = tokio::select! {
                _ = cancel.cancelled() => break,
                card = self.reader.read_once(self.card_read_timeout) => card,
            };

            let Some(card) = card else {
                // Nothing presented; poll again immediately.
                continue;
            };

            self.handle_card(card).await;
            sleep(self.debounce).await;
        }
        info!("access loop stopped");
    }

    /// One decided cycle for a presented card. Never lets an error escape.
    async fn handle_card(&mut self, card: CardId) {
        debug!(card = %card, "card presented");
        self.enter(AccessState::Verifying);

        let users = match self.directory.fetch_users().await {
            Ok(users) => users,
            Err(e) => {
                // Directory unreachable: deny with indication, log nothing.
                // There is nowhere to log to.
                warn!(error = %e, "directory unreachable; denying access");
                self.indicate_failure().await;
                self.enter(AccessState::WaitingForCard);
                return;
            }
        };

        let decision = decide(&card, &users, Utc::now());
        match decision.matched_user {
            Some(user) => {
                info!(card = %card, user_id = user.id, "access granted");
                self.directory
                    .log_access(&AccessLogEntry::granted(user.id))
                    .await;

                self.enter(AccessState::Actuating);
                if let Err(e) = self.actuator.open_and_close().await {
                    warn!(error = %e, "door cycle failed");
                    self.indicate_failure().await;
                    self.enter(AccessState::WaitingForCard);
                    return;
                }

                self.enter(AccessState::Indicating);
                if let Err(e) = self.actuator.indicate_success().await {
                    warn!(error = %e, "success indication failed");
                }
            }
            None => {
                info!(card = %card, "access denied: unknown card or outside window");
                self.directory.log_access(&AccessLogEntry::denied()).await;
                self.indicate_failure().await;
            }
        }
        self.enter(AccessState::WaitingForCard);
    }

    async fn indicate_failure(&mut self) {
        self.enter(AccessState::Indicating);
        if let Err(e) = self.actuator.indicate_failure().await {
            warn!(error = %e, "failure indication failed");
        }
    }

    fn enter(&mut self, state: AccessState) {
        if let Err(e) = self.machine.transition_to(state) {
            // The fixed cycle above should make this unreachable; resync
            // rather than poison the loop.
            error!(error = %e, "access state machine out of step; resetting");
            self.machine = StateMachine::new();
        }
    }
}
