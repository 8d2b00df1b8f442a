use crate::error::ConfigurationError;
use crate::grid::Grid;
use serde::{Deserialize, Serialize};

/// Thermal diffusivity as a function of position.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DiffusivityField {
    Uniform { k: f64 },
    /// `inside` within `radius` of the center (boundary included), `outside` elsewhere.
    CircularInclusion {
        center_x: f64,
        center_y: f64,
        radius: f64,
        inside: f64,
        outside: f64,
    },
}

impl Default for DiffusivityField {
    fn default() -> Self {
        DiffusivityField::CircularInclusion {
            center_x: 1.5,
            center_y: 1.5,
            radius: 0.5,
            inside: 0.01,
            outside: 0.1,
        }
    }
}

impl DiffusivityField {
    pub fn uniform(k: f64) -> Self {
        DiffusivityField::Uniform { k }
    }

    pub fn inclusion(center: (f64, f64), radius: f64, inside: f64, outside: f64) -> Self {
        DiffusivityField::CircularInclusion {
            center_x: center.0,
            center_y: center.1,
            radius,
            inside,
            outside,
        }
    }

    pub fn at(&self, x: f64, y: f64) -> f64 {
        match *self {
            DiffusivityField::Uniform { k } => k,
            DiffusivityField::CircularInclusion {
                center_x,
                center_y,
                radius,
                inside,
                outside,
            } => {
                let dist = ((x - center_x).powi(2) + (y - center_y).powi(2)).sqrt();
                if dist <= radius { inside } else { outside }
            }
        }
    }

    /// Upper bound of `at` over the plane, used by the stability check.
    pub fn max_value(&self) -> f64 {
        match *self {
            DiffusivityField::Uniform { k } => k,
            DiffusivityField::CircularInclusion { inside, outside, .. } => inside.max(outside),
        }
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigurationError> {
        let values: Vec<(&str, f64)> = match self {
            DiffusivityField::Uniform { k } => vec![("k", *k)],
            DiffusivityField::CircularInclusion {
                center_x,
                center_y,
                radius,
                inside,
                outside,
            } => {
                if !center_x.is_finite() || !center_y.is_finite() {
                    return Err(ConfigurationError::InvalidDiffusivity {
                        reason: format!("inclusion center ({center_x}, {center_y}) is not finite"),
                    });
                }
                if !radius.is_finite() || *radius < 0.0 {
                    return Err(ConfigurationError::InvalidDiffusivity {
                        reason: format!("inclusion radius must be >= 0 (got {radius})"),
                    });
                }
                vec![("inside", *inside), ("outside", *outside)]
            }
        };
        for (name, value) in values {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigurationError::InvalidDiffusivity {
                    reason: format!("{name} must be finite and >= 0 (got {value})"),
                });
            }
        }
        Ok(())
    }
}

/// Per-cell stencil coefficient `k(x[j], y[i]) * dt / dx^2`, row-major.
///
/// The field does not change over time, so it is sampled once per run.
#[derive(Clone, Debug)]
pub struct DiffusivityMap {
    nx: usize,
    ny: usize,
    coeff: Vec<f64>,
}

impl DiffusivityMap {
    pub fn sample(field: &DiffusivityField, grid: &Grid) -> DiffusivityMap {
        let (nx, ny) = (grid.x_points(), grid.y_points());
        let scale = grid.dt() / (grid.dx() * grid.dx());
        let mut coeff = vec![0.0; nx * ny];
        for (i, &y) in grid.y().iter().enumerate() {
            let row = i * nx;
            for (j, &x) in grid.x().iter().enumerate() {
                coeff[row + j] = field.at(x, y) * scale;
            }
        }
        DiffusivityMap { nx, ny, coeff }
    }

    pub fn nx(&self) -> usize {
        self.nx
    }

    pub fn ny(&self) -> usize {
        self.ny
    }

    pub fn coefficient(&self, row: usize, col: usize) -> f64 {
        self.coeff[row * self.nx + col]
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.coeff
    }
}

#[cfg(test)]
mod unit_test {
    use super::*;
    use crate::config::SimulationConfig;
    use float_cmp::assert_approx_eq;

    #[test]
    fn inclusion_is_closed_disc() {
        let field = DiffusivityField::default();
        assert_eq!(field.at(1.5, 1.5), 0.01);
        assert_eq!(field.at(1.5, 1.0), 0.01);
        assert_eq!(field.at(1.0, 1.0), 0.1);
        assert_eq!(field.at(0.0, 0.0), 0.1);
        assert_eq!(field.max_value(), 0.1);
    }

    #[test]
    fn zero_radius_only_hits_center() {
        let field = DiffusivityField::inclusion((1.0, 1.0), 0.0, 5.0, 0.2);
        assert_eq!(field.at(1.0, 1.0), 5.0);
        assert_eq!(field.at(1.0, 1.0 + 1e-12), 0.2);
        assert_eq!(field.max_value(), 5.0);
    }

    #[test]
    fn rejects_bad_values() {
        assert!(DiffusivityField::uniform(-0.1).validate().is_err());
        assert!(DiffusivityField::uniform(f64::INFINITY).validate().is_err());
        assert!(
            DiffusivityField::inclusion((0.0, 0.0), -1.0, 0.01, 0.1)
                .validate()
                .is_err()
        );
        assert!(
            DiffusivityField::inclusion((f64::NAN, 0.0), 1.0, 0.01, 0.1)
                .validate()
                .is_err()
        );
        assert!(DiffusivityField::default().validate().is_ok());
    }

    #[test]
    fn map_holds_scaled_coefficients() {
        let config = SimulationConfig::new(2.0, 2.0, 0.1, 0.001, 0.1, 200.0);
        let grid = Grid::from_config(&config).unwrap();
        let map = DiffusivityMap::sample(&config.diffusivity, &grid);
        assert_eq!(map.nx(), 21);
        assert_eq!(map.ny(), 21);
        // (x, y) = (1.5, 1.5) sits inside the inclusion, (0.5, 0.5) outside.
        assert_approx_eq!(f64, map.coefficient(15, 15), 0.01 * 0.1, epsilon = 1e-12);
        assert_approx_eq!(f64, map.coefficient(5, 5), 0.1 * 0.1, epsilon = 1e-12);
    }

    #[test]
    fn serde_tagged_form() {
        let field: DiffusivityField = serde_json::from_str(r#"{"kind":"uniform","k":0.2}"#).unwrap();
        assert_eq!(field, DiffusivityField::uniform(0.2));
    }
}
