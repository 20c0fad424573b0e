//! Remote directory integration for the doorkeep access-control endpoint.
//!
//! All authority over who may pass lives in the remote directory; this crate
//! holds the three pieces that talk to or reason about it:
//!
//! - [`DirectoryClient`]: a thin REST client. Fetch the authorized user
//!   list, post an access-log entry (fire-and-forget), submit an enrollment.
//!   One HTTP round trip per call, a fixed request timeout, no retries;
//!   retry policy belongs to the calling loop's own cadence.
//! - Wire [`models`]: [`UserRecord`] and [`AccessLogEntry`] exactly as the
//!   directory serves and accepts them.
//! - The [`verifier`]: the pure authorize/deny decision over a fetched user
//!   list, kept free of I/O so it is independently testable.

pub mod client;
pub mod models;
pub mod verifier;

pub use client::DirectoryClient;
pub use models::{AccessLogEntry, UserRecord};
pub use verifier::{AccessDecision, decide};
