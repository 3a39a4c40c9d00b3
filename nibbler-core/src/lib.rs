//! # Nibbler Core
//!
//! Cycle-level model of the Nibbler microcontroller core.
//!
//! All sequential state lives in one [`CoreState`] value that advances one
//! clock at a time. [`step`] is the pure form of that transition; the
//! debug multiplexer is a pure projection of the state.
//!
//! ## Components
//!
//! - **Memory bank**: 2048 nibble cells, one write port, two read ports
//! - **SPI programming interface**: 16-bit frames, sample on SCK fall,
//!   shift on SCK rise, commit on chip-select release
//! - **Debug multiplexer**: eight selectable (8-bit, 3-bit) signal pairs
//! - **Execution engine**: IDLE/RUNNING single-step state machine
//!
//! ## Example
//!
//! ```rust
//! use nibbler_core::{Driver, Mode};
//! use nibbler_spec::{Address, Config, Nibble, Opcode};
//!
//! let mut driver = Driver::new(Config::default());
//! driver.reset();
//! driver.write(Address::code(0), Opcode::Stop.to_cell());
//! driver.set_mode(Mode::Execution);
//!
//! let step = driver.step().unwrap();
//! assert_eq!(step.opcode, Opcode::Stop);
//! assert_eq!(step.next_ip, 1);
//! ```

pub mod error;
pub mod edge;
pub mod pins;
pub mod memory;
pub mod spi;
pub mod engine;
pub mod mux;
pub mod event;
pub mod state;
pub mod driver;

pub use error::{CoreError, Result};
pub use pins::{Inputs, Mode, Outputs};
pub use memory::MemoryBank;
pub use spi::{PortLatch, SpiInterface, SpiOutcome};
pub use engine::{EngineState, ExecutionEngine, Transition};
pub use mux::{project, DebugOutput, DebugSource, OutCtrl};
pub use event::{CoreEvent, EventKind};
pub use state::{step, CoreState};
pub use driver::{Driver, StepObservation};

#[cfg(test)]
mod tests {
    use super::*;
    use nibbler_spec::Config;

    #[test]
    fn test_public_exports() {
        let _ = Inputs::default();
        let _ = OutCtrl::default();
        let _ = EngineState::Idle;
        let _ = Mode::Programming;
    }

    #[test]
    fn test_core_state_new() {
        let core = CoreState::new(Config::default());
        assert_eq!(core.cycle(), 0);
        assert_eq!(core.engine().state(), EngineState::Idle);
    }

    #[test]
    fn test_step_is_pure() {
        let core = CoreState::new(Config::default());
        let next = step(&core, &Inputs::default());
        assert_eq!(core.cycle(), 0);
        assert_eq!(next.cycle(), 1);
    }

    #[test]
    fn test_core_error_reexport() {
        let err = CoreError::StepLimitExceeded { limit: 3 };
        assert!(matches!(err, CoreError::StepLimitExceeded { limit: 3 }));
    }
}
