/// Rejected simulation parameters.
///
/// Every variant is produced while deriving the grid, before any state is
/// allocated or any step is taken.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigurationError {
    #[error("{name} must be > 0 (got {value})")]
    NonPositive { name: &'static str, value: f64 },

    #[error("{name} must be finite (got {value})")]
    NonFinite { name: &'static str, value: f64 },

    #[error("invalid diffusivity: {reason}")]
    InvalidDiffusivity { reason: String },

    #[error("grid needs at least 3 points along {axis} (got {points})")]
    GridTooSmall { axis: &'static str, points: usize },

    #[error("total_time {total_time} is shorter than one time step dt {dt}")]
    NoTimeSteps { total_time: f64, dt: f64 },

    #[error("simulation needs about {cells:e} values, more than can be allocated")]
    TooLarge { cells: f64 },

    #[error(
        "unstable explicit scheme: dt/dx^2 * max_k = {ratio} exceeds {limit} (max_k = {max_diffusivity})"
    )]
    Unstable {
        ratio: f64,
        limit: f64,
        max_diffusivity: f64,
    },
}

/// Positive and finite, or the matching error.
pub(crate) fn check_positive(name: &'static str, value: f64) -> Result<(), ConfigurationError> {
    if !value.is_finite() {
        return Err(ConfigurationError::NonFinite { name, value });
    }
    if value <= 0.0 {
        return Err(ConfigurationError::NonPositive { name, value });
    }
    Ok(())
}

pub(crate) fn check_finite(name: &'static str, value: f64) -> Result<(), ConfigurationError> {
    if !value.is_finite() {
        return Err(ConfigurationError::NonFinite { name, value });
    }
    Ok(())
}

#[cfg(test)]
mod unit_test {
    use super::*;

    #[test]
    fn positive_checks() {
        assert!(check_positive("dx", 0.1).is_ok());
        assert_eq!(
            check_positive("dx", 0.0),
            Err(ConfigurationError::NonPositive { name: "dx", value: 0.0 })
        );
        assert!(matches!(
            check_positive("dt", f64::NAN),
            Err(ConfigurationError::NonFinite { name: "dt", .. })
        ));
        assert!(check_finite("boundary.top", -40.0).is_ok());
    }

    #[test]
    fn message_names_the_parameter() {
        let err = ConfigurationError::NonPositive {
            name: "total_time",
            value: -1.0,
        };
        assert!(err.to_string().contains("total_time"));

        let err = ConfigurationError::Unstable {
            ratio: 0.5,
            limit: 0.25,
            max_diffusivity: 1.0,
        };
        assert!(err.to_string().contains("0.25"));
    }
}
