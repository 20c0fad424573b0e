//! Hardware abstraction layer for the doorkeep access-control endpoint.
//!
//! This crate isolates the orchestration core from physical hardware behind
//! two small trait boundaries:
//!
//! - [`GpioBank`](traits::GpioBank): the discrete pin driver under the door
//!   motor, indicator LEDs and buzzer. The [`Actuator`](actuator::Actuator)
//!   builds the full motor and indication sequences on top of it and owns the
//!   exclusive lock that keeps concurrent callers from interleaving pin
//!   writes mid-sequence.
//! - [`ProximityPort`](traits::ProximityPort): the card-reading chip. The
//!   [`CardReader`](reader::CardReader) adds the retrying bring-up protocol
//!   and the bounded, sub-polled read operation on top of it.
//!
//! All I/O-shaped operations are async using native `async fn` in traits
//! (Edition 2024 RPITIT); no `async_trait` macro is needed. Mock
//! implementations for development and testing live in [`mock`]; real driver
//! backends plug in behind the same traits (feature names reserved above).

pub mod actuator;
pub mod error;
pub mod mock;
pub mod reader;
pub mod traits;

pub use actuator::{Actuator, Timing};
pub use error::{HardwareError, Result};
pub use reader::CardReader;
pub use traits::{GpioBank, Level, Pin, ProximityPort};
