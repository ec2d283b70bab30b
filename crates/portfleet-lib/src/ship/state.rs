//! Mutable ship state: location, fuel and manifest.

use serde::{Deserialize, Serialize};

use crate::container::{Container, ContainerId};
use crate::error::{Error, Result};
use crate::loader::{LoadConfig, ManifestTotals};
use crate::port::PortId;

use super::attributes::ShipAttributes;

/// Numeric identifier for a ship.
pub type ShipId = u32;

/// A ship with fixed limits and a mutable location, fuel level and manifest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ship {
    id: ShipId,
    attributes: ShipAttributes,
    port: PortId,
    fuel: f64,
    fuel_added: f64,
    manifest: Vec<Container>,
}

impl Ship {
    /// Create a ship docked at `port` with an empty manifest.
    pub fn new(id: ShipId, attributes: ShipAttributes, port: PortId, fuel: f64) -> Result<Self> {
        attributes.validate()?;
        if !fuel.is_finite() || fuel < 0.0 {
            return Err(Error::ShipDataValidation {
                message: format!("ship {id} initial fuel must be finite and non-negative"),
            });
        }

        Ok(Self {
            id,
            attributes,
            port,
            fuel,
            fuel_added: 0.0,
            manifest: Vec::new(),
        })
    }

    pub fn id(&self) -> ShipId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.attributes.name
    }

    pub fn attributes(&self) -> &ShipAttributes {
        &self.attributes
    }

    /// Port the ship is currently docked at.
    pub fn port(&self) -> PortId {
        self.port
    }

    pub fn fuel(&self) -> f64 {
        self.fuel
    }

    /// Total fuel taken on board since the fleet was loaded or last restored.
    pub fn fuel_added(&self) -> f64 {
        self.fuel_added
    }

    pub fn manifest(&self) -> &[Container] {
        &self.manifest
    }

    /// Running weight/count/heavy totals of the current manifest.
    pub fn totals(&self, config: &LoadConfig) -> ManifestTotals {
        ManifestTotals::of(&self.manifest, config)
    }

    /// Check whether one more container fits without breaking a limit.
    pub fn check_fits(&self, container: &Container, config: &LoadConfig) -> Result<()> {
        match self.totals(config).admit(container, &self.attributes, config) {
            Ok(_) => Ok(()),
            Err(limit) => Err(Error::CapacityExceeded {
                ship: self.id,
                container: container.id(),
                limit,
            }),
        }
    }

    /// Add fuel while docked. No tank capacity is modelled.
    pub fn add_fuel(&mut self, amount: f64) -> Result<()> {
        if !amount.is_finite() || amount < 0.0 {
            return Err(Error::InvalidFuelAmount { amount });
        }
        self.fuel += amount;
        self.fuel_added += amount;
        Ok(())
    }

    pub(crate) fn burn_fuel(&mut self, amount: f64) {
        self.fuel -= amount;
    }

    pub(crate) fn set_port(&mut self, port: PortId) {
        self.port = port;
    }

    pub(crate) fn push_containers(&mut self, containers: Vec<Container>) {
        self.manifest.extend(containers);
    }

    /// Remove manifest containers matching `predicate`, preserving manifest order.
    pub(crate) fn take_where<F>(&mut self, mut predicate: F) -> Vec<Container>
    where
        F: FnMut(&Container) -> bool,
    {
        let (taken, kept): (Vec<_>, Vec<_>) =
            std::mem::take(&mut self.manifest).into_iter().partition(|c| predicate(c));
        self.manifest = kept;
        taken
    }

    pub(crate) fn replace_state(
        &mut self,
        port: PortId,
        fuel: f64,
        fuel_added: f64,
        manifest: Vec<Container>,
    ) {
        self.port = port;
        self.fuel = fuel;
        self.fuel_added = fuel_added;
        self.manifest = manifest;
    }

    pub(crate) fn manifest_ids(&self) -> Vec<ContainerId> {
        self.manifest.iter().map(Container::id).collect()
    }
}
