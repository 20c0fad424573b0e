//! Door actuator: motor cycle and indicator sequences over a [`GpioBank`].
//!
//! The actuator owns the single exclusive lock around the physical door
//! unit. Every public operation acquires the lock for its full duration, so
//! a motor or indicator sequence in progress always completes before another
//! begins. Concurrent callers (the access loop and the remote-open HTTP
//! handler share one actuator) serialize here instead of interleaving pin
//! writes into undefined motor behavior.

use crate::{
    error::Result,
    traits::{GpioBank, Level, Pin},
};
use doorkeep_core::constants::{
    BEEP_GAP_MS, BEEP_MS, DEFAULT_MOTOR_DRIVE_MS, ENROLL_PULSE_MS, LED_HOLD_MS,
    MOTOR_CLOSE_MARGIN_MS, MOTOR_SETTLE_MS,
};
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::sleep;
use tracing::{debug, warn};

/// Timing profile for motor and indicator sequences.
///
/// Defaults are the production values; tests compress them.
#[derive(Debug, Clone)]
pub struct Timing {
    /// Forward (and base backward) motor drive time.
    pub drive: Duration,

    /// Pause between the forward and backward strokes.
    pub settle: Duration,

    /// Extra backward drive past the forward stop point, to guarantee full
    /// mechanical closure.
    pub close_margin: Duration,

    /// Buzzer pulse length.
    pub beep: Duration,

    /// Gap between the two failure beeps.
    pub beep_gap: Duration,

    /// How long the green/red result LED is held.
    pub led_hold: Duration,

    /// Length of the "now scan a card" green pulse.
    pub enroll_pulse: Duration,
}

impl Timing {
    /// Production timing with a site-configured motor drive duration.
    #[must_use]
    pub fn with_drive(drive: Duration) -> Self {
        Timing {
            drive,
            ..Timing::default()
        }
    }
}

impl Default for Timing {
    fn default() -> Self {
        Timing {
            drive: Duration::from_millis(DEFAULT_MOTOR_DRIVE_MS),
            settle: Duration::from_millis(MOTOR_SETTLE_MS),
            close_margin: Duration::from_millis(MOTOR_CLOSE_MARGIN_MS),
            beep: Duration::from_millis(BEEP_MS),
            beep_gap: Duration::from_millis(BEEP_GAP_MS),
            led_hold: Duration::from_millis(LED_HOLD_MS),
            enroll_pulse: Duration::from_millis(ENROLL_PULSE_MS),
        }
    }
}

/// Door motor plus success/failure indicators.
///
/// Wrap in an [`std::sync::Arc`] and hand clones to every task that needs
/// the door; the internal lock provides the required mutual exclusion. The
/// lock is released unconditionally (guard drop) even when a sequence fails
/// partway; on a failed motor sequence both windings are driven low
/// best-effort before the error propagates.
pub struct Actuator<G: GpioBank> {
    bank: Mutex<G>,
    timing: Timing,
}

impl<G: GpioBank> Actuator<G> {
    /// Create an actuator over a pin bank with the given timing profile.
    pub fn new(bank: G, timing: Timing) -> Self {
        Actuator {
            bank: Mutex::new(bank),
            timing,
        }
    }

    /// The timing profile in effect.
    #[must_use]
    pub fn timing(&self) -> &Timing {
        &self.timing
    }

    /// Run one full door cycle: forward stroke, settle, backward stroke.
    ///
    /// Blocks (asynchronously) for the whole cycle, roughly
    /// `2 * drive + settle + close_margin` wall-clock.
    ///
    /// # Errors
    /// Returns an error if a pin write fails; the motor is halted
    /// best-effort first.
    pub async fn open_and_close(&self) -> Result<()> {
        let mut bank = self.bank.lock().await;
        let result = self.drive_cycle(&mut *bank).await;
        if result.is_err() {
            // Do not leave a winding energized behind a failed sequence.
            let _ = bank.write(Pin::MotorForward, Level::Low);
            let _ = bank.write(Pin::MotorReverse, Level::Low);
        }
        result
    }

    async fn drive_cycle(&self, bank: &mut G) -> Result<()> {
        debug!("door cycle: forward stroke");
        bank.write(Pin::MotorForward, Level::High)?;
        bank.write(Pin::MotorReverse, Level::Low)?;
        sleep(self.timing.drive).await;
        Self::halt_motor(bank)?;

        sleep(self.timing.settle).await;

        debug!("door cycle: backward stroke");
        bank.write(Pin::MotorForward, Level::Low)?;
        bank.write(Pin::MotorReverse, Level::High)?;
        sleep(self.timing.drive + self.timing.close_margin).await;
        Self::halt_motor(bank)?;

        debug!("door cycle: complete");
        Ok(())
    }

    fn halt_motor(bank: &mut G) -> Result<()> {
        bank.write(Pin::MotorForward, Level::Low)?;
        bank.write(Pin::MotorReverse, Level::Low)
    }

    /// Success indication: one short beep, then the green LED held.
    ///
    /// # Errors
    /// Returns an error if a pin write fails; indicator pins are driven low
    /// best-effort first.
    pub async fn indicate_success(&self) -> Result<()> {
        let mut bank = self.bank.lock().await;
        let result = async {
            Self::pulse(&mut *bank, Pin::Buzzer, self.timing.beep).await?;
            Self::pulse(&mut *bank, Pin::GreenLed, self.timing.led_hold).await
        }
        .await;
        if result.is_err() {
            Self::quiesce_indicators(&mut *bank);
        }
        result
    }

    /// Failure indication: two short beeps, then the red LED held.
    ///
    /// # Errors
    /// Returns an error if a pin write fails; indicator pins are driven low
    /// best-effort first.
    pub async fn indicate_failure(&self) -> Result<()> {
        let mut bank = self.bank.lock().await;
        let result = async {
            Self::pulse(&mut *bank, Pin::Buzzer, self.timing.beep).await?;
            sleep(self.timing.beep_gap).await;
            Self::pulse(&mut *bank, Pin::Buzzer, self.timing.beep).await?;
            Self::pulse(&mut *bank, Pin::RedLed, self.timing.led_hold).await
        }
        .await;
        if result.is_err() {
            Self::quiesce_indicators(&mut *bank);
        }
        result
    }

    /// Enrollment-start indication: a short green pulse ("now scan a card").
    ///
    /// # Errors
    /// Returns an error if a pin write fails; indicator pins are driven low
    /// best-effort first.
    pub async fn indicate_enrollment_start(&self) -> Result<()> {
        let mut bank = self.bank.lock().await;
        let result = Self::pulse(&mut *bank, Pin::GreenLed, self.timing.enroll_pulse).await;
        if result.is_err() {
            Self::quiesce_indicators(&mut *bank);
        }
        result
    }

    /// Release underlying pin resources. Idempotent; called once at shutdown.
    ///
    /// # Errors
    /// Returns an error if the pin driver fails to release cleanly.
    pub async fn release(&self) -> Result<()> {
        let mut bank = self.bank.lock().await;
        bank.release()
    }

    async fn pulse(bank: &mut G, pin: Pin, hold: Duration) -> Result<()> {
        bank.write(pin, Level::High)?;
        sleep(hold).await;
        bank.write(pin, Level::Low)
    }

    fn quiesce_indicators(bank: &mut G) {
        for pin in [Pin::Buzzer, Pin::GreenLed, Pin::RedLed] {
            if let Err(e) = bank.write(pin, Level::Low) {
                warn!(%pin, error = %e, "failed to quiesce indicator");
            }
        }
    }
}
