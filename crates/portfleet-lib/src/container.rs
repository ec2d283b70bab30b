//! Cargo containers and their fuel classification.
//!
//! Every container belongs to one [`ContainerKind`], and the kind alone fixes
//! how much fuel it costs to carry per tonne and kilometre:
//!
//! | kind         | fuel / tonne / km |
//! |--------------|-------------------|
//! | standard     | 20                |
//! | refrigerated | 35                |
//! | liquid       | 27                |

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::port::PortId;
use crate::ship::KG_PER_TONNE;

/// Numeric identifier for a container.
pub type ContainerId = u32;

/// Category of a container, fixed at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContainerKind {
    Standard,
    Refrigerated,
    Liquid,
}

impl ContainerKind {
    /// Fuel units burned per tonne of cargo per kilometre.
    pub const fn fuel_coefficient(self) -> f64 {
        match self {
            ContainerKind::Standard => 20.0,
            ContainerKind::Refrigerated => 35.0,
            ContainerKind::Liquid => 27.0,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ContainerKind::Standard => "standard",
            ContainerKind::Refrigerated => "refrigerated",
            ContainerKind::Liquid => "liquid",
        }
    }
}

impl fmt::Display for ContainerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ContainerKind {
    type Err = String;

    fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "standard" | "simple" | "basic" => Ok(ContainerKind::Standard),
            "refrigerated" | "reefer" => Ok(ContainerKind::Refrigerated),
            "liquid" => Ok(ContainerKind::Liquid),
            other => Err(format!(
                "unknown container kind '{other}'; expected standard, refrigerated or liquid"
            )),
        }
    }
}

/// A single cargo unit.
///
/// Containers are deliberately not `Copy`: a container value lives in exactly
/// one port queue or ship manifest and is moved between them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Container {
    id: ContainerId,
    kind: ContainerKind,
    weight_kg: f64,
    destination: Option<PortId>,
}

impl Container {
    /// Create a container, rejecting non-finite or non-positive weights.
    pub fn new(id: ContainerId, kind: ContainerKind, weight_kg: f64) -> Result<Self> {
        if !weight_kg.is_finite() || weight_kg <= 0.0 {
            return Err(Error::InvalidWeight {
                container: id,
                weight: weight_kg,
            });
        }

        Ok(Self {
            id,
            kind,
            weight_kg,
            destination: None,
        })
    }

    /// Attach the port this container has to be delivered to.
    pub fn with_destination(mut self, destination: PortId) -> Self {
        self.destination = Some(destination);
        self
    }

    pub fn id(&self) -> ContainerId {
        self.id
    }

    pub fn kind(&self) -> ContainerKind {
        self.kind
    }

    pub fn weight_kg(&self) -> f64 {
        self.weight_kg
    }

    pub fn destination(&self) -> Option<PortId> {
        self.destination
    }

    /// Whether the container counts against a ship's heavy-container limit.
    pub fn is_heavy(&self, threshold_kg: f64) -> bool {
        self.weight_kg > threshold_kg
    }

    /// Fuel needed to carry this container over `distance_km`.
    pub fn fuel_consumption(&self, distance_km: f64) -> f64 {
        fuel_consumption(self.kind, self.weight_kg, distance_km)
    }
}

/// Fuel for `weight_kg` of cargo of the given kind over `distance_km`.
///
/// Formula: coefficient × (weight_kg / 1000) × distance_km
pub fn fuel_consumption(kind: ContainerKind, weight_kg: f64, distance_km: f64) -> f64 {
    kind.fuel_coefficient() * (weight_kg / KG_PER_TONNE) * distance_km
}
