//! Fuel calculation and projection types.
//!
//! This module handles fuel requirements for a single voyage: the per-container
//! cargo cost summed over a manifest, and the projection of a ship's fuel level
//! once that cost is paid.

use serde::{Deserialize, Serialize};

use crate::container::Container;
use crate::error::{Error, Result};

use super::attributes::ShipAttributes;

/// Fuel calculation configuration.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FuelConfig {
    /// Also charge the ship's own `fuel_per_km` for every kilometre sailed.
    ///
    /// Off by default: voyage cost is then purely the cargo cost, so an empty
    /// ship repositions for free.
    pub include_hull_consumption: bool,
}

/// Fuel projection for a single voyage.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FuelProjection {
    /// Fuel units the voyage consumes.
    pub required: f64,
    /// Fuel on board before departure.
    pub available: f64,
    /// Fuel left after the voyage, or `None` when the ship cannot depart.
    pub remaining: Option<f64>,
    /// Fuel missing to make the voyage; zero when feasible.
    pub shortfall: f64,
}

impl FuelProjection {
    pub fn is_feasible(&self) -> bool {
        self.remaining.is_some()
    }
}

/// Project a ship's fuel level across a voyage needing `required` units.
///
/// # Examples
/// ```
/// use portfleet_lib::ship::project_fuel;
///
/// let ok = project_fuel(400.0, 1000.0);
/// assert_eq!(ok.remaining, Some(600.0));
/// assert_eq!(ok.shortfall, 0.0);
///
/// let short = project_fuel(3750.0, 1000.0);
/// assert_eq!(short.remaining, None);
/// assert_eq!(short.shortfall, 2750.0);
/// ```
///
/// The comparison is exact: a ship short by any amount cannot depart.
pub fn project_fuel(required: f64, available: f64) -> FuelProjection {
    if available < required {
        FuelProjection {
            required,
            available,
            remaining: None,
            shortfall: required - available,
        }
    } else {
        FuelProjection {
            required,
            available,
            remaining: Some(available - required),
            shortfall: 0.0,
        }
    }
}

/// Calculate the fuel a ship needs to carry `manifest` over `distance_km`.
///
/// Formula: Σ coefficient(kind) × (weight_kg / 1000) × distance_km, plus
/// `fuel_per_km × distance_km` when hull consumption is enabled.
pub fn calculate_voyage_fuel(
    ship: &ShipAttributes,
    manifest: &[Container],
    distance_km: f64,
    config: &FuelConfig,
) -> Result<f64> {
    if !distance_km.is_finite() || distance_km < 0.0 {
        return Err(Error::ShipDataValidation {
            message: format!(
                "distance must be finite and non-negative, got {}",
                distance_km
            ),
        });
    }

    let cargo: f64 = manifest
        .iter()
        .map(|c| c.fuel_consumption(distance_km))
        .sum();

    let hull = if config.include_hull_consumption {
        ship.fuel_per_km * distance_km
    } else {
        0.0
    };

    Ok(cargo + hull)
}
