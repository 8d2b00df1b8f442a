use crate::config::SimulationConfig;
use crate::error::{ConfigurationError, check_finite, check_positive};

/// Largest `dt / dx^2 * k` for which the 2-D explicit scheme stays stable.
pub const STABILITY_LIMIT_2D: f64 = 0.25;

/// Discretization derived from a validated `SimulationConfig`.
#[derive(Clone, Debug, PartialEq)]
pub struct Grid {
    x: Vec<f64>,
    y: Vec<f64>,
    t_points: usize,
    dx: f64,
    dt: f64,
}

impl Grid {
    /// Validate `config` and derive point counts and coordinates.
    pub fn from_config(config: &SimulationConfig) -> Result<Grid, ConfigurationError> {
        check_positive("length_x", config.length_x)?;
        check_positive("length_y", config.length_y)?;
        check_positive("dx", config.dx)?;
        check_positive("dt", config.dt)?;
        check_positive("total_time", config.total_time)?;
        for (name, value) in config.boundary.values() {
            check_finite(name, value)?;
        }
        check_finite("initial_temperature", config.initial_temperature)?;
        config.diffusivity.validate()?;

        let too_large = || ConfigurationError::TooLarge {
            cells: (config.length_x / config.dx + 1.0)
                * (config.length_y / config.dx + 1.0)
                * (config.total_time / config.dt),
        };
        let (x_points, y_points, t_points) = match (
            point_count(config.length_x, config.dx),
            point_count(config.length_y, config.dx),
            steps_in(config.total_time, config.dt),
        ) {
            (Some(x), Some(y), Some(t)) => (x, y, t),
            _ => return Err(too_large()),
        };
        if history_len(&[t_points, y_points, x_points]).is_none() {
            return Err(too_large());
        }

        if x_points < 3 {
            return Err(ConfigurationError::GridTooSmall {
                axis: "x",
                points: x_points,
            });
        }
        if y_points < 3 {
            return Err(ConfigurationError::GridTooSmall {
                axis: "y",
                points: y_points,
            });
        }

        if t_points == 0 {
            return Err(ConfigurationError::NoTimeSteps {
                total_time: config.total_time,
                dt: config.dt,
            });
        }

        let ratio = config.stability_ratio();
        if ratio > STABILITY_LIMIT_2D {
            return Err(ConfigurationError::Unstable {
                ratio,
                limit: STABILITY_LIMIT_2D,
                max_diffusivity: config.diffusivity.max_value(),
            });
        }

        log::debug!(
            "grid {x_points}x{y_points}, {t_points} time points, stability ratio {ratio:.4}"
        );

        Ok(Grid {
            x: linspace(0.0, config.length_x, x_points),
            y: linspace(0.0, config.length_y, y_points),
            t_points,
            dx: config.dx,
            dt: config.dt,
        })
    }

    pub fn x(&self) -> &[f64] {
        &self.x
    }

    pub fn y(&self) -> &[f64] {
        &self.y
    }

    pub fn x_points(&self) -> usize {
        self.x.len()
    }

    pub fn y_points(&self) -> usize {
        self.y.len()
    }

    pub fn t_points(&self) -> usize {
        self.t_points
    }

    pub fn dx(&self) -> f64 {
        self.dx
    }

    pub fn dt(&self) -> f64 {
        self.dt
    }

    /// Simulated time of slice `t`.
    pub fn time(&self, t: usize) -> f64 {
        t as f64 * self.dt
    }

    /// Cells in one time slice.
    pub fn plane_len(&self) -> usize {
        self.x.len() * self.y.len()
    }
}

/// `floor(length / step) + 1`, or `None` if it does not fit in `usize`.
pub(crate) fn point_count(length: f64, step: f64) -> Option<usize> {
    steps_in(length, step)?.checked_add(1)
}

/// `floor(span / step)`, or `None` if it does not fit in `usize`.
pub(crate) fn steps_in(span: f64, step: f64) -> Option<usize> {
    let n = (span / step).floor();
    // Values below `usize::MAX as f64` convert without saturating.
    if n < usize::MAX as f64 { Some(n as usize) } else { None }
}

/// Product of `dims` when that many `f64` values can be allocated at once.
pub(crate) fn history_len(dims: &[usize]) -> Option<usize> {
    let len = dims.iter().try_fold(1usize, |acc, &d| acc.checked_mul(d))?;
    let bytes = len.checked_mul(std::mem::size_of::<f64>())?;
    (bytes <= isize::MAX as usize).then_some(len)
}

/// `n` evenly spaced values from `start` to `stop`, both included.
///
/// Each value is computed from its index rather than by accumulating the
/// step, and the last one is pinned to `stop`.
pub fn linspace(start: f64, stop: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (stop - start) / (n - 1) as f64;
            let mut out: Vec<f64> = (0..n).map(|i| start + i as f64 * step).collect();
            out[n - 1] = stop;
            out
        }
    }
}
