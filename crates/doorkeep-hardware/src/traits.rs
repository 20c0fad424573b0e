//! Hardware device trait definitions.
//!
//! These traits establish the contract between the orchestration core and
//! the physical door unit: a discrete GPIO bank (motor windings, indicator
//! LEDs, buzzer) and the proximity-card reader chip. Mock implementations
//! live in [`crate::mock`]; real drivers substitute behind the same traits.
//!
//! Trait methods that touch the reader chip use native `async fn`
//! (Rust 1.90 + Edition 2024 RPITIT), so no `async_trait` macro is needed.

#![allow(async_fn_in_trait)]

use crate::error::Result;
use doorkeep_core::CardId;
use std::future::Future;
use std::time::Duration;

/// Output pins of the door unit.
///
/// The motor is an H-bridge: `MotorForward` and `MotorReverse` drive the two
/// windings. They must never be high at the same instant; sequencing is the
/// [`Actuator`](crate::actuator::Actuator)'s job, not the pin driver's.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pin {
    MotorForward,
    MotorReverse,
    GreenLed,
    RedLed,
    Buzzer,
}

impl std::fmt::Display for Pin {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let name = match self {
            Pin::MotorForward => "motor_forward",
            Pin::MotorReverse => "motor_reverse",
            Pin::GreenLed => "green_led",
            Pin::RedLed => "red_led",
            Pin::Buzzer => "buzzer",
        };
        write!(f, "{name}")
    }
}

/// Logic level of an output pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Low,
    High,
}

/// Discrete pin driver under the door unit.
///
/// Pin writes are instantaneous register operations, so this trait is
/// synchronous; all timing (drive durations, pulse lengths) lives in the
/// actuator above it.
pub trait GpioBank: Send {
    /// Drive one output pin to the given level.
    ///
    /// # Errors
    /// Returns an error if the underlying driver rejects the write (e.g.
    /// the bank has been released or the bus faulted).
    fn write(&mut self, pin: Pin, level: Level) -> Result<()>;

    /// Release underlying pin resources.
    ///
    /// Must be safe to call more than once; called once at shutdown.
    ///
    /// # Errors
    /// Returns an error if the driver fails to release cleanly.
    fn release(&mut self) -> Result<()>;
}

/// Proximity-card reader chip.
///
/// The contract is deliberately small: one bring-up operation and one
/// bounded poll. Retry policy (bring-up backoff, transient-fault absorption,
/// sub-poll cadence) belongs to [`CardReader`](crate::reader::CardReader).
pub trait ProximityPort: Send {
    /// Perform hardware bring-up of the reader chip.
    ///
    /// # Errors
    /// Returns an error if the chip does not respond; the caller retries
    /// with backoff.
    fn bring_up(&mut self) -> impl Future<Output = Result<()>> + Send;

    /// Wait up to `window` for one card to enter the field.
    ///
    /// Returns `Ok(None)` on a quiet window; this is the normal case and not
    /// an error.
    ///
    /// # Errors
    /// Returns an error on a transient read fault; the caller logs and
    /// retries within its own budget.
    fn poll(
        &mut self,
        window: Duration,
    ) -> impl Future<Output = Result<Option<CardId>>> + Send;
}
