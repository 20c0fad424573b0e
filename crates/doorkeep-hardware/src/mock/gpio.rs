//! Mock GPIO bank that records every pin transition.

use crate::{
    error::{HardwareError, Result},
    traits::{GpioBank, Level, Pin},
};
use std::sync::{Arc, Mutex};

#[derive(Debug, Default)]
struct MockGpioState {
    /// Every successful pin write, in order.
    events: Vec<(Pin, Level)>,

    /// Total write attempts seen so far (successful or not).
    writes: u64,

    /// Write index (0-based) at which to fail exactly once.
    fail_at: Option<u64>,

    released: bool,
}

/// Mock pin driver for tests: records transitions instead of toggling
/// hardware.
#[derive(Debug)]
pub struct MockGpio {
    state: Arc<Mutex<MockGpioState>>,
}

impl MockGpio {
    /// Create a mock bank and its observation handle.
    pub fn new() -> (Self, MockGpioHandle) {
        let state = Arc::new(Mutex::new(MockGpioState::default()));
        (
            MockGpio {
                state: Arc::clone(&state),
            },
            MockGpioHandle { state },
        )
    }
}

impl GpioBank for MockGpio {
    fn write(&mut self, pin: Pin, level: Level) -> Result<()> {
        let mut state = self.state.lock().expect("mock gpio state poisoned");
        if state.released {
            return Err(HardwareError::disconnected("gpio bank released"));
        }
        let index = state.writes;
        state.writes += 1;
        if state.fail_at.take_if(|at| *at == index).is_some() {
            return Err(HardwareError::communication(format!(
                "injected write fault at {pin}"
            )));
        }
        state.events.push((pin, level));
        Ok(())
    }

    fn release(&mut self) -> Result<()> {
        self.state.lock().expect("mock gpio state poisoned").released = true;
        Ok(())
    }
}

/// Observation handle for a [`MockGpio`].
#[derive(Debug, Clone)]
pub struct MockGpioHandle {
    state: Arc<Mutex<MockGpioState>>,
}

impl MockGpioHandle {
    /// All recorded pin transitions, in write order.
    pub fn transitions(&self) -> Vec<(Pin, Level)> {
        self.state
            .lock()
            .expect("mock gpio state poisoned")
            .events
            .clone()
    }

    /// Discard recorded transitions.
    pub fn clear(&self) {
        self.state
            .lock()
            .expect("mock gpio state poisoned")
            .events
            .clear();
    }

    /// Fail the `index`-th write attempt (0-based), once.
    pub fn fail_write_at(&self, index: u64) {
        self.state.lock().expect("mock gpio state poisoned").fail_at = Some(index);
    }

    /// Whether the bank has been released.
    pub fn is_released(&self) -> bool {
        self.state.lock().expect("mock gpio state poisoned").released
    }
}
