//! Construction-time knobs shared by every backend.
use crate::error::{Result, TableError};

/// Parameters accepted by [`crate::NewTable::with_config`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TableConfig {
    /// Number of entries the table must hold without growing.
    pub initial_capacity: usize,
    /// Maximum ratio of used buckets to reserved buckets, `None` keeps the backend default.
    pub max_load_factor: Option<f32>,
}

impl TableConfig {
    pub fn with_initial_capacity(mut self, initial_capacity: usize) -> Self {
        self.initial_capacity = initial_capacity;
        self
    }

    pub fn with_max_load_factor(mut self, max_load_factor: f32) -> Self {
        self.max_load_factor = Some(max_load_factor);
        self
    }

    /// Rejects load factors outside of `(0.0, 1.0)`.
    pub fn validate(&self) -> Result<()> {
        match self.max_load_factor {
            Some(load) if !(load > 0.0 && load < 1.0) => Err(TableError::InvalidConfig(format!(
                r#""max_load_factor" must be in (0.0, 1.0), got {load}"#
            ))),
            _ => Ok(()),
        }
    }

    /// Resolves the effective load factor against a backend default.
    pub fn load_factor_or(&self, default: f32) -> f32 {
        self.max_load_factor.unwrap_or(default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_default() {
        assert_eq!(TableConfig::default().validate(), Ok(()));
    }

    #[test]
    fn test_validate_rejects_out_of_range_load() {
        for load in [0.0, 1.0, -0.5, 1.5, f32::NAN] {
            let config = TableConfig::default().with_max_load_factor(load);
            assert!(
                matches!(config.validate(), Err(TableError::InvalidConfig(_))),
                "Load factor {load} must be rejected"
            );
        }
    }

    #[test]
    fn test_load_factor_or() {
        let config = TableConfig::default();
        assert_eq!(config.load_factor_or(0.8), 0.8);
        assert_eq!(config.with_max_load_factor(0.5).load_factor_or(0.8), 0.5);
    }
}
