use thiserror::Error;

/// Configuration for the Dormand–Prince solver.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Config {
    rel_tol: f64,
    abs_tol: f64,
    max_steps: usize,
    first_step: Option<f64>,
}

/// Errors that can occur when validating a Dormand–Prince solver config.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    #[error("rel_tol must be finite and non-negative")]
    RelTol,

    #[error("abs_tol must be finite and non-negative")]
    AbsTol,

    #[error("rel_tol and abs_tol cannot both be zero")]
    ZeroTolerances,

    #[error("max_steps must be greater than zero")]
    MaxSteps,

    #[error("first_step must be finite and positive")]
    FirstStep,
}

impl Default for Config {
    fn default() -> Self {
        // Known-good values, unwrap is safe
        Self::new(1e-3, 1e-6, 1_000_000).unwrap()
    }
}

impl Config {
    /// Creates a new config with validated tolerances and step budget.
    ///
    /// The local error of each step is held below
    /// `abs_tol + rel_tol * |y|`, componentwise. `max_steps` bounds the
    /// total number of attempted steps, accepted or rejected.
    ///
    /// # Errors
    ///
    /// Returns an error if a tolerance is negative or non-finite, if both
    /// tolerances are zero, or if `max_steps` is zero.
    pub fn new(rel_tol: f64, abs_tol: f64, max_steps: usize) -> Result<Self, ConfigError> {
        if !rel_tol.is_finite() || rel_tol < 0.0 {
            return Err(ConfigError::RelTol);
        }
        if !abs_tol.is_finite() || abs_tol < 0.0 {
            return Err(ConfigError::AbsTol);
        }
        if rel_tol == 0.0 && abs_tol == 0.0 {
            return Err(ConfigError::ZeroTolerances);
        }
        if max_steps == 0 {
            return Err(ConfigError::MaxSteps);
        }

        Ok(Self {
            rel_tol,
            abs_tol,
            max_steps,
            first_step: None,
        })
    }

    /// Sets an explicit first step size, bypassing automatic selection.
    ///
    /// The solver still clamps the value to the integration span.
    ///
    /// # Errors
    ///
    /// Returns an error if `first_step` is zero, negative, or non-finite.
    pub fn with_first_step(mut self, first_step: f64) -> Result<Self, ConfigError> {
        if !first_step.is_finite() || first_step <= 0.0 {
            return Err(ConfigError::FirstStep);
        }
        self.first_step = Some(first_step);
        Ok(self)
    }

    /// Returns the relative tolerance.
    #[must_use]
    pub fn rel_tol(&self) -> f64 {
        self.rel_tol
    }

    /// Returns the absolute tolerance.
    #[must_use]
    pub fn abs_tol(&self) -> f64 {
        self.abs_tol
    }

    /// Returns the bound on attempted steps.
    #[must_use]
    pub fn max_steps(&self) -> usize {
        self.max_steps
    }

    /// Returns the explicit first step size, if one was set.
    #[must_use]
    pub fn first_step(&self) -> Option<f64> {
        self.first_step
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        let config = Config::default();
        assert_eq!(config.rel_tol(), 1e-3);
        assert_eq!(config.abs_tol(), 1e-6);
        assert_eq!(config.max_steps(), 1_000_000);
        assert_eq!(config.first_step(), None);
    }

    #[test]
    fn rejects_bad_rel_tol() {
        assert_eq!(Config::new(-1e-3, 1e-6, 100), Err(ConfigError::RelTol));
        assert_eq!(Config::new(f64::NAN, 1e-6, 100), Err(ConfigError::RelTol));
        assert_eq!(
            Config::new(f64::INFINITY, 1e-6, 100),
            Err(ConfigError::RelTol)
        );
    }

    #[test]
    fn rejects_bad_abs_tol() {
        assert_eq!(Config::new(1e-3, -1e-6, 100), Err(ConfigError::AbsTol));
        assert_eq!(Config::new(1e-3, f64::NAN, 100), Err(ConfigError::AbsTol));
    }

    #[test]
    fn rejects_both_tolerances_zero() {
        assert_eq!(Config::new(0.0, 0.0, 100), Err(ConfigError::ZeroTolerances));
        assert!(Config::new(0.0, 1e-9, 100).is_ok());
        assert!(Config::new(1e-9, 0.0, 100).is_ok());
    }

    #[test]
    fn rejects_zero_max_steps() {
        assert_eq!(Config::new(1e-3, 1e-6, 0), Err(ConfigError::MaxSteps));
    }

    #[test]
    fn first_step_must_be_positive_and_finite() {
        let config = Config::default();
        assert_eq!(config.with_first_step(0.0), Err(ConfigError::FirstStep));
        assert_eq!(config.with_first_step(-0.1), Err(ConfigError::FirstStep));
        assert_eq!(
            config.with_first_step(f64::NAN),
            Err(ConfigError::FirstStep)
        );

        let config = config.with_first_step(0.25).unwrap();
        assert_eq!(config.first_step(), Some(0.25));
    }
}
