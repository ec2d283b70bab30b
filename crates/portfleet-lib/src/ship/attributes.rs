//! Ship attributes: the fixed physical limits of a vessel.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Ship physical attributes loaded from the fleet dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShipAttributes {
    pub name: String,
    /// Hull fuel burn per kilometre; only charged when `FuelConfig::include_hull_consumption` is set.
    pub fuel_per_km: f64,
    pub max_weight_kg: f64,
    pub max_containers: usize,
    pub max_heavy_containers: usize,
}

impl ShipAttributes {
    /// Validate ship attributes for correctness.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::ShipDataValidation {
                message: "ship name must not be empty".to_string(),
            });
        }

        if !self.max_weight_kg.is_finite() || self.max_weight_kg <= 0.0 {
            return Err(Error::ShipDataValidation {
                message: "max_weight_kg must be a finite positive number".to_string(),
            });
        }

        if !self.fuel_per_km.is_finite() || self.fuel_per_km < 0.0 {
            return Err(Error::ShipDataValidation {
                message: "fuel_per_km must be finite and non-negative".to_string(),
            });
        }

        if self.max_heavy_containers > self.max_containers {
            return Err(Error::ShipDataValidation {
                message: format!(
                    "max_heavy_containers ({}) exceeds max_containers ({})",
                    self.max_heavy_containers, self.max_containers
                ),
            });
        }

        Ok(())
    }
}
