use crate::boundary::BoundaryConditions;
use crate::diffusivity::DiffusivityField;
use serde::{Deserialize, Serialize};

/// Physical and numerical inputs of a plate run.
///
/// Nothing is checked here; `Grid::from_config` validates the whole record
/// before a simulation can be built from it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    pub length_x: f64,
    pub length_y: f64,
    /// Space step, shared by x and y.
    pub dx: f64,
    pub dt: f64,
    pub total_time: f64,
    pub boundary: BoundaryConditions,
    #[serde(default)]
    pub diffusivity: DiffusivityField,
    /// Temperature of every interior cell at t = 0.
    #[serde(default)]
    pub initial_temperature: f64,
}

impl SimulationConfig {
    /// All four edges at `boundary_temperature`, default inclusion field, cold interior.
    pub fn new(
        length_x: f64,
        length_y: f64,
        dx: f64,
        dt: f64,
        total_time: f64,
        boundary_temperature: f64,
    ) -> Self {
        SimulationConfig {
            length_x,
            length_y,
            dx,
            dt,
            total_time,
            boundary: BoundaryConditions::uniform(boundary_temperature),
            diffusivity: DiffusivityField::default(),
            initial_temperature: 0.0,
        }
    }

    pub fn with_boundary(mut self, boundary: BoundaryConditions) -> Self {
        self.boundary = boundary;
        self
    }

    pub fn with_diffusivity(mut self, diffusivity: DiffusivityField) -> Self {
        self.diffusivity = diffusivity;
        self
    }

    pub fn with_initial_temperature(mut self, temperature: f64) -> Self {
        self.initial_temperature = temperature;
        self
    }

    /// `dt / dx^2 * max(k)`; must stay at or below `STABILITY_LIMIT_2D`.
    pub fn stability_ratio(&self) -> f64 {
        self.dt / (self.dx * self.dx) * self.diffusivity.max_value()
    }
}

/// The `surface` plate from the original demo: 2 x 2, 200 degree edges,
/// low-diffusivity disc at (1.5, 1.5).
impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig::new(2.0, 2.0, 0.025, 0.00125, 5.0, 200.0)
    }
}
