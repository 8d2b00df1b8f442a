//! Explicit finite-difference heat diffusion on a plate with a circular
//! low-diffusivity inclusion, plus the 1-D rod variant.
//!
//! ```no_run
//! use heat_core::{Simulation, SimulationConfig};
//!
//! let config = SimulationConfig::new(2.0, 2.0, 0.1, 0.001, 0.1, 200.0);
//! let result = Simulation::new(config)?.run();
//! println!("{:?}", result.summary(result.state().len() - 1));
//! # Ok::<(), heat_core::ConfigurationError>(())
//! ```

pub mod boundary;
pub mod config;
pub mod diffusivity;
pub mod engine;
pub mod error;
pub mod grid;
pub mod rod;
pub mod state;

pub use boundary::BoundaryConditions;
pub use config::SimulationConfig;
pub use diffusivity::{DiffusivityField, DiffusivityMap};
pub use engine::{Execution, Frames, Simulation, SimulationResult, Stepper, step_plane};
pub use error::ConfigurationError;
pub use grid::{Grid, STABILITY_LIMIT_2D, linspace};
pub use rod::{RodConfig, RodHistory, STABILITY_LIMIT_1D, simulate_rod};
pub use state::{SliceSummary, SliceView, TemperatureState};
