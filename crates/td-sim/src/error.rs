use thiserror::Error;

use td_core::CoreError;
use td_dispatch::DispatchError;
use td_fleet::FleetError;
use td_grid::GridError;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("world configuration error: {0}")]
    Config(String),

    #[error("{what} length {got} does not match taxi count {expected}")]
    CountMismatch {
        expected: usize,
        got:      usize,
        what:     &'static str,
    },

    /// A tick panicked while holding a world lock.  The world is no longer
    /// consistent; every later call reports this.
    #[error("world state poisoned by a panicking tick")]
    Poisoned,

    #[error("failed to start the stepper thread: {0}")]
    Spawn(#[from] std::io::Error),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Grid(#[from] GridError),

    #[error(transparent)]
    Fleet(#[from] FleetError),

    #[error(transparent)]
    Dispatch(#[from] DispatchError),
}

pub type SimResult<T> = Result<T, SimError>;
