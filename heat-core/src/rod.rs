//! One-dimensional rod with both ends held at fixed temperatures.

use crate::error::{ConfigurationError, check_finite, check_positive};
use crate::grid::{history_len, linspace, point_count, steps_in};
use crate::state::SliceSummary;
use serde::{Deserialize, Serialize};

/// Largest `dt / dx^2 * k` for which the 1-D explicit scheme stays stable.
pub const STABILITY_LIMIT_1D: f64 = 0.5;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RodConfig {
    pub length: f64,
    pub dx: f64,
    pub dt: f64,
    pub total_time: f64,
    pub diffusivity: f64,
    pub left: f64,
    pub right: f64,
    #[serde(default)]
    pub initial_temperature: f64,
}

/// The rod from the original demo: 2 m, k = 0.466, both ends at 200.
impl Default for RodConfig {
    fn default() -> Self {
        RodConfig {
            length: 2.0,
            dx: 0.1,
            dt: 0.001,
            total_time: 4.0,
            diffusivity: 0.466,
            left: 200.0,
            right: 200.0,
            initial_temperature: 0.0,
        }
    }
}

impl RodConfig {
    pub fn stability_ratio(&self) -> f64 {
        self.dt / (self.dx * self.dx) * self.diffusivity
    }

    fn validate(&self) -> Result<(usize, usize), ConfigurationError> {
        check_positive("length", self.length)?;
        check_positive("dx", self.dx)?;
        check_positive("dt", self.dt)?;
        check_positive("total_time", self.total_time)?;
        check_finite("left", self.left)?;
        check_finite("right", self.right)?;
        check_finite("initial_temperature", self.initial_temperature)?;
        if !self.diffusivity.is_finite() || self.diffusivity < 0.0 {
            return Err(ConfigurationError::InvalidDiffusivity {
                reason: format!("k must be finite and >= 0 (got {})", self.diffusivity),
            });
        }

        let too_large = || ConfigurationError::TooLarge {
            cells: (self.length / self.dx + 1.0) * (self.total_time / self.dt),
        };
        let (x_points, t_points) = match (
            point_count(self.length, self.dx),
            steps_in(self.total_time, self.dt),
        ) {
            (Some(x), Some(t)) => (x, t),
            _ => return Err(too_large()),
        };
        if history_len(&[t_points, x_points]).is_none() {
            return Err(too_large());
        }

        if x_points < 3 {
            return Err(ConfigurationError::GridTooSmall {
                axis: "x",
                points: x_points,
            });
        }
        if t_points == 0 {
            return Err(ConfigurationError::NoTimeSteps {
                total_time: self.total_time,
                dt: self.dt,
            });
        }

        let ratio = self.stability_ratio();
        if ratio > STABILITY_LIMIT_1D {
            return Err(ConfigurationError::Unstable {
                ratio,
                limit: STABILITY_LIMIT_1D,
                max_diffusivity: self.diffusivity,
            });
        }
        Ok((x_points, t_points))
    }
}

/// Temperature profile of the rod at every time index.
#[derive(Clone, Debug, PartialEq)]
pub struct RodHistory {
    x: Vec<f64>,
    dt: f64,
    data: Vec<f64>,
}

impl RodHistory {
    pub fn x(&self) -> &[f64] {
        &self.x
    }

    pub fn len(&self) -> usize {
        self.data.len() / self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn profile(&self, t: usize) -> &[f64] {
        let n = self.x.len();
        &self.data[t * n..(t + 1) * n]
    }

    pub fn summary(&self, t: usize) -> SliceSummary {
        let p = self.profile(t);
        let min = p.iter().copied().fold(f64::INFINITY, f64::min);
        let max = p.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        SliceSummary {
            time_index: t,
            time: t as f64 * self.dt,
            min,
            max,
            mean: p.iter().sum::<f64>() / p.len() as f64,
            center: p[p.len() / 2],
        }
    }
}

pub fn simulate_rod(config: &RodConfig) -> Result<RodHistory, ConfigurationError> {
    let (n, t_points) = config.validate()?;
    let c = config.diffusivity * config.dt / (config.dx * config.dx);
    log::info!("rod: {n} points, {} steps, ratio {c:.4}", t_points - 1);

    let mut data = vec![config.initial_temperature; t_points * n];
    for profile in data.chunks_exact_mut(n) {
        profile[0] = config.left;
        profile[n - 1] = config.right;
    }

    for t in 0..t_points - 1 {
        let (done, rest) = data.split_at_mut((t + 1) * n);
        let u = &done[t * n..];
        let next = &mut rest[..n];
        for j in 1..(n - 1) {
            next[j] = u[j] + c * (u[j + 1] - 2.0 * u[j] + u[j - 1]);
        }
    }

    Ok(RodHistory {
        x: linspace(0.0, config.length, n),
        dt: config.dt,
        data,
    })
}
