//! Fixed timing and protocol constants for the access-control endpoint.
//!
//! Values that operators tune per site (directory URL, motor drive time,
//! card-read timeout, listen address) live in [`crate::config::Config`];
//! everything here is a fixed property of the device behavior.

// ============================================================================
// Outbound directory requests
// ============================================================================

/// Default timeout for one directory round trip (milliseconds).
///
/// Applied to every outbound request; expiry surfaces as
/// `Error::DirectoryUnavailable` at the caller. No retries at the client
/// layer; the access loop's own polling cadence is the retry policy.
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 5000;

// ============================================================================
// Card reading
// ============================================================================

/// Default budget for one `read_once` call in reader mode (milliseconds).
pub const DEFAULT_CARD_READ_TIMEOUT_MS: u64 = 1000;

/// Card-read budget for an enrollment capture (milliseconds).
///
/// Longer than the reader-mode budget: a person is being walked through
/// "now scan a card" and needs time to react.
pub const ENROLL_READ_TIMEOUT_MS: u64 = 10_000;

/// Single sub-poll window against the reader chip (milliseconds).
///
/// Kept well below any read timeout so the loop stays responsive to
/// cancellation between sub-polls instead of sitting in one long blocking
/// call.
pub const SUB_POLL_WINDOW_MS: u64 = 400;

/// Pause after a transient poll fault before the next sub-poll (milliseconds).
pub const POLL_RETRY_PAUSE_MS: u64 = 100;

/// Backoff between reader bring-up attempts (milliseconds).
pub const INIT_BACKOFF_MS: u64 = 2000;

/// Default number of reader bring-up attempts before giving up.
///
/// Exhaustion is the one fatal error in the system: the process cannot do
/// anything useful without a reader.
pub const DEFAULT_INIT_ATTEMPTS: u32 = 3;

// ============================================================================
// Door motor
// ============================================================================

/// Default forward/backward motor drive time (milliseconds).
pub const DEFAULT_MOTOR_DRIVE_MS: u64 = 1000;

/// Pause between the forward and backward strokes (milliseconds).
pub const MOTOR_SETTLE_MS: u64 = 500;

/// Extra backward drive past the forward stop point (milliseconds).
///
/// Guarantees full mechanical closure; without it the door can rest a few
/// degrees short of the latch.
pub const MOTOR_CLOSE_MARGIN_MS: u64 = 30;

// ============================================================================
// Indications
// ============================================================================

/// Buzzer pulse length (milliseconds).
pub const BEEP_MS: u64 = 100;

/// Gap between the two failure beeps (milliseconds).
pub const BEEP_GAP_MS: u64 = 100;

/// How long the green/red result LED is held (milliseconds).
pub const LED_HOLD_MS: u64 = 2000;

/// Length of the "now scan a card" green pulse (milliseconds).
pub const ENROLL_PULSE_MS: u64 = 500;

// ============================================================================
// Access loop
// ============================================================================

/// Debounce pause at the end of every decided loop iteration (milliseconds).
///
/// Prevents one card presentation from being read twice back to back.
pub const LOOP_DEBOUNCE_MS: u64 = 500;

// ============================================================================
// HTTP surface
// ============================================================================

/// Default bind address for the inbound HTTP surface.
pub const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:5000";
