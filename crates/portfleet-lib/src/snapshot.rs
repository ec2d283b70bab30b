//! Fleet snapshots for resetting the world between simulation runs.
//!
//! A [`FleetSnapshot`] owns deep copies of every port queue, docked-ship set,
//! and ship location, fuel level and manifest. Nothing a later run does to the
//! fleet can alias into it, and restoring it puts every container back in
//! exactly the queue or manifest it occupied at capture time.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::container::Container;
use crate::error::{Error, Result};
use crate::fleet::Fleet;
use crate::port::PortId;
use crate::ship::ShipId;

/// Mutable state of one port.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortState {
    pub containers: Vec<Container>,
    pub docked: BTreeSet<ShipId>,
}

/// Mutable state of one ship.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShipState {
    pub port: PortId,
    pub fuel: f64,
    pub fuel_added: f64,
    pub manifest: Vec<Container>,
}

/// Deep copy of all mutable fleet state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FleetSnapshot {
    pub ports: BTreeMap<PortId, PortState>,
    pub ships: BTreeMap<ShipId, ShipState>,
}

impl FleetSnapshot {
    /// Capture the current state of every port and ship.
    pub fn capture(fleet: &Fleet) -> Self {
        let ports = fleet
            .ports()
            .map(|p| {
                (
                    p.id(),
                    PortState {
                        containers: p.containers().to_vec(),
                        docked: p.docked_ships().clone(),
                    },
                )
            })
            .collect();

        let ships = fleet
            .ships()
            .map(|s| {
                (
                    s.id(),
                    ShipState {
                        port: s.port(),
                        fuel: s.fuel(),
                        fuel_added: s.fuel_added(),
                        manifest: s.manifest().to_vec(),
                    },
                )
            })
            .collect();

        Self { ports, ships }
    }

    /// Overwrite the fleet's mutable state with this snapshot.
    ///
    /// The snapshot must describe exactly the fleet's ports and ships; a
    /// mismatch is reported before anything is changed.
    pub fn restore(&self, fleet: &mut Fleet) -> Result<()> {
        self.check_matches(fleet)?;

        for (id, state) in &self.ports {
            fleet
                .port_mut(*id)?
                .replace_state(state.containers.clone(), state.docked.clone());
        }
        for (id, state) in &self.ships {
            fleet.ship_mut(*id)?.replace_state(
                state.port,
                state.fuel,
                state.fuel_added,
                state.manifest.clone(),
            );
        }

        debug!(
            ports = self.ports.len(),
            ships = self.ships.len(),
            "restored fleet snapshot"
        );
        Ok(())
    }

    fn check_matches(&self, fleet: &Fleet) -> Result<()> {
        let fleet_ports: BTreeSet<PortId> = fleet.ports().map(|p| p.id()).collect();
        let fleet_ships: BTreeSet<ShipId> = fleet.ships().map(|s| s.id()).collect();
        let snapshot_ports: BTreeSet<PortId> = self.ports.keys().copied().collect();
        let snapshot_ships: BTreeSet<ShipId> = self.ships.keys().copied().collect();

        if fleet_ports != snapshot_ports {
            return Err(Error::SnapshotMismatch {
                message: format!(
                    "snapshot has ports {:?}, fleet has {:?}",
                    snapshot_ports, fleet_ports
                ),
            });
        }
        if fleet_ships != snapshot_ships {
            return Err(Error::SnapshotMismatch {
                message: format!(
                    "snapshot has ships {:?}, fleet has {:?}",
                    snapshot_ships, fleet_ships
                ),
            });
        }
        if let Some((id, state)) = self
            .ships
            .iter()
            .find(|(_, state)| !snapshot_ports.contains(&state.port))
        {
            return Err(Error::SnapshotMismatch {
                message: format!("ship {id} is placed at unknown port {}", state.port),
            });
        }
        Ok(())
    }
}
