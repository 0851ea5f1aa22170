use std::sync::Mutex;

use crate::bus::StatusBus;
use crate::error::ConfigError;
use crate::types::ControlState;

/// Control-side Idle/Running gate, shared by the orchestrator and whatever
/// front end drives it. A run flips it to Running on acceptance; the
/// orchestrator's all-agents-done signal flips it back to Idle exactly once,
/// accompanied by one final status event. There is no cancel transition.
pub struct LifecycleController {
    state: Mutex<ControlState>,
    bus: StatusBus,
}

impl LifecycleController {
    pub fn new(bus: StatusBus) -> Self {
        Self {
            state: Mutex::new(ControlState::Idle),
            bus,
        }
    }

    pub fn state(&self) -> ControlState {
        *self.state.lock().unwrap()
    }

    pub fn is_idle(&self) -> bool {
        self.state() == ControlState::Idle
    }

    /// Idle → Running. Fails if a run is already active.
    pub fn begin(&self) -> Result<(), ConfigError> {
        let mut state = self.state.lock().unwrap();
        match *state {
            ControlState::Idle => {
                *state = ControlState::Running;
                Ok(())
            }
            ControlState::Running => Err(ConfigError::RunInProgress),
        }
    }

    /// Running → Idle, with the run's closing status event.
    pub fn finish(&self) {
        let mut state = self.state.lock().unwrap();
        match *state {
            ControlState::Running => {
                *state = ControlState::Idle;
                self.bus
                    .info("run", "all agents finished, engine idle again");
            }
            ControlState::Idle => {
                log::warn!("finish() called while already idle");
            }
        }
    }
}
