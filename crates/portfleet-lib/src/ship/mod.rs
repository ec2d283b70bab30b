//! Ship data types, limits, and fuel calculations.
//!
//! This module is organized into focused submodules:
//!
//! - [`attributes`] - Ship physical limits (weight, count, heavy count, hull burn)
//! - [`state`] - The mutable ship: location, fuel level and manifest
//! - [`fuel`] - Voyage fuel calculation and projection types
//! - [`constants`] - Shared constants used across calculations
//!
//! # Example
//!
//! ```
//! use portfleet_lib::container::{Container, ContainerKind};
//! use portfleet_lib::ship::{calculate_voyage_fuel, FuelConfig, ShipAttributes};
//!
//! let ship = ShipAttributes {
//!     name: "Aegean Star".to_string(),
//!     fuel_per_km: 0.0,
//!     max_weight_kg: 3000.0,
//!     max_containers: 2,
//!     max_heavy_containers: 1,
//! };
//! let manifest = vec![Container::new(1, ContainerKind::Standard, 1000.0).unwrap()];
//! let fuel = calculate_voyage_fuel(&ship, &manifest, 100.0, &FuelConfig::default()).unwrap();
//! assert_eq!(fuel, 2000.0);
//! ```

pub mod attributes;
pub mod constants;
pub mod fuel;
pub mod state;

pub use attributes::ShipAttributes;
pub use constants::{DEFAULT_HEAVY_THRESHOLD_KG, FUEL_EPSILON, KG_PER_TONNE};
pub use fuel::{calculate_voyage_fuel, project_fuel, FuelConfig, FuelProjection};
pub use state::{Ship, ShipId};
