use crate::config::SimulationConfig;
use crate::diffusivity::DiffusivityMap;
use crate::error::ConfigurationError;
use crate::grid::Grid;
use crate::state::{SliceSummary, SliceView, TemperatureState};
use rayon::prelude::*;

/// How the interior cells of one time step are visited.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Execution {
    #[default]
    Serial,
    /// One rayon task per interior row. Every step completes before the next starts.
    Parallel,
}

/// A validated plate run, ready to step.
#[derive(Clone, Debug)]
pub struct Simulation {
    config: SimulationConfig,
    grid: Grid,
    map: DiffusivityMap,
}

impl Simulation {
    pub fn new(config: SimulationConfig) -> Result<Simulation, ConfigurationError> {
        let grid = Grid::from_config(&config)?;
        let map = DiffusivityMap::sample(&config.diffusivity, &grid);
        Ok(Simulation { config, grid, map })
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Slice 0: interior at the initial temperature, edges at their boundary values.
    pub fn initial_plane(&self) -> Vec<f64> {
        let (nx, ny) = (self.grid.x_points(), self.grid.y_points());
        let mut plane = vec![self.config.initial_temperature; nx * ny];
        self.config.boundary.apply(&mut plane, nx, ny);
        plane
    }

    pub fn run(self) -> SimulationResult {
        self.run_with(Execution::Serial)
    }

    /// Fill the whole `t_points x y_points x x_points` history.
    pub fn run_with(self, execution: Execution) -> SimulationResult {
        let (nx, ny) = (self.grid.x_points(), self.grid.y_points());
        let t_points = self.grid.t_points();
        log::info!(
            "running {} steps on a {nx}x{ny} plate ({execution:?})",
            t_points - 1
        );

        let mut state = TemperatureState::zeros(t_points, ny, nx);
        state.plane_mut(0).copy_from_slice(&self.initial_plane());
        for t in 1..t_points {
            self.config.boundary.apply(state.plane_mut(t), nx, ny);
        }

        for t in 0..t_points - 1 {
            let (current, next) = state.split_step(t);
            step_plane(current, next, &self.map, execution);
        }

        log::info!("finished at t = {}", self.grid.time(t_points - 1));
        SimulationResult {
            config: self.config,
            grid: self.grid,
            state,
        }
    }

    /// Two-slice rolling buffer over the same run.
    pub fn into_stepper(self) -> Stepper {
        let current = self.initial_plane();
        let next = current.clone();
        Stepper {
            sim: self,
            current,
            next,
            time_index: 0,
            execution: Execution::Serial,
        }
    }
}

/// Completed run handed to a renderer or summarized headlessly.
#[derive(Clone, Debug)]
pub struct SimulationResult {
    config: SimulationConfig,
    grid: Grid,
    state: TemperatureState,
}

impl SimulationResult {
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn state(&self) -> &TemperatureState {
        &self.state
    }

    pub fn slice(&self, t: usize) -> SliceView<'_> {
        self.state.slice(t)
    }

    pub fn final_slice(&self) -> SliceView<'_> {
        self.state.slice(self.state.len() - 1)
    }

    pub fn summary(&self, t: usize) -> SliceSummary {
        self.state.slice(t).summary(t, self.grid.time(t))
    }
}

/// Advances a run while keeping only the current and next slices.
#[derive(Clone, Debug)]
pub struct Stepper {
    sim: Simulation,
    current: Vec<f64>,
    next: Vec<f64>,
    time_index: usize,
    execution: Execution,
}

impl Stepper {
    pub fn new(config: SimulationConfig) -> Result<Stepper, ConfigurationError> {
        Ok(Simulation::new(config)?.into_stepper())
    }

    pub fn with_execution(mut self, execution: Execution) -> Stepper {
        self.execution = execution;
        self
    }

    pub fn grid(&self) -> &Grid {
        self.sim.grid()
    }

    pub fn time_index(&self) -> usize {
        self.time_index
    }

    pub fn time(&self) -> f64 {
        self.sim.grid.time(self.time_index)
    }

    /// Steps left before the configured `t_points - 1` are done.
    pub fn remaining(&self) -> usize {
        (self.sim.grid.t_points() - 1).saturating_sub(self.time_index)
    }

    pub fn is_finished(&self) -> bool {
        self.remaining() == 0
    }

    pub fn current(&self) -> SliceView<'_> {
        SliceView::new(&self.current, self.sim.grid.x_points(), self.sim.grid.y_points())
    }

    pub fn summary(&self) -> SliceSummary {
        self.current().summary(self.time_index, self.time())
    }

    /// One explicit step. Keeps going past the configured run length if called.
    pub fn step(&mut self) {
        step_plane(&self.current, &mut self.next, &self.sim.map, self.execution);
        self.swap_buffers();
        self.time_index += 1;
        log::trace!("step {} done", self.time_index);
    }

    /// Run the remaining configured steps.
    pub fn finish(&mut self) {
        while !self.is_finished() {
            self.step();
        }
    }

    pub fn reset(&mut self) {
        self.current = self.sim.initial_plane();
        self.next.copy_from_slice(&self.current);
        self.time_index = 0;
    }

    /// Owned copies of every slice still to come, starting with the current one.
    pub fn frames(self) -> Frames {
        Frames {
            stepper: self,
            started: false,
        }
    }

    // Both buffers carry the boundary values from construction and the
    // stencil never writes the border, so swapping keeps them intact.
    fn swap_buffers(&mut self) {
        std::mem::swap(&mut self.current, &mut self.next);
    }
}

/// Lazy sequence of `(time_index, slice)` pairs from a `Stepper`.
pub struct Frames {
    stepper: Stepper,
    started: bool,
}

impl Iterator for Frames {
    type Item = (usize, Vec<f64>);

    fn next(&mut self) -> Option<Self::Item> {
        if self.started {
            if self.stepper.is_finished() {
                return None;
            }
            self.stepper.step();
        }
        self.started = true;
        Some((self.stepper.time_index, self.stepper.current.clone()))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.stepper.remaining() + usize::from(!self.started);
        (n, Some(n))
    }
}

impl ExactSizeIterator for Frames {}

/// Write the interior of `next` from `current` with the five-point stencil.
///
/// `current` and `next` must be distinct buffers; border cells of `next` are
/// left untouched.
pub fn step_plane(current: &[f64], next: &mut [f64], map: &DiffusivityMap, execution: Execution) {
    let (nx, ny) = (map.nx(), map.ny());
    debug_assert_eq!(current.len(), nx * ny);
    debug_assert_eq!(next.len(), nx * ny);
    let coeff = map.as_slice();

    match execution {
        Execution::Serial => {
            for (y, out) in next.chunks_exact_mut(nx).enumerate() {
                if y == 0 || y == ny - 1 {
                    continue;
                }
                update_row(current, coeff, out, y, nx);
            }
        }
        Execution::Parallel => {
            next.par_chunks_exact_mut(nx)
                .enumerate()
                .filter(|(y, _)| *y != 0 && *y != ny - 1)
                .for_each(|(y, out)| update_row(current, coeff, out, y, nx));
        }
    }
}

fn update_row(current: &[f64], coeff: &[f64], out: &mut [f64], y: usize, nx: usize) {
    let row = y * nx;
    for x in 1..(nx - 1) {
        let i = row + x;

        let u = current[i];
        let down = current[i + nx];
        let up = current[i - nx];
        let right = current[i + 1];
        let left = current[i - 1];

        let lap = down + up + right + left - 4.0 * u;
        out[x] = u + coeff[i] * lap;
        debug_assert!(out[x].is_finite(), "non-finite temperature at ({y}, {x})");
    }
}
