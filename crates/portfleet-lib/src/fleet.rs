//! Fleet registry: the arena of ports and ships.
//!
//! Ports and ships are stored by id in ordered maps so every iteration over
//! the fleet is deterministic. Ships refer to their port by id rather than by
//! reference; containers are owned values living in exactly one port queue or
//! ship manifest.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::container::{Container, ContainerId};
use crate::error::{Error, Result};
use crate::port::{Port, PortId};
use crate::ship::{Ship, ShipId};

/// Maximum number of "did you mean" suggestions returned for unknown port names.
const MAX_SUGGESTIONS: usize = 3;

/// Minimum Jaro-Winkler similarity for a port name to be suggested.
const SUGGESTION_THRESHOLD: f64 = 0.8;

/// Where a container currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "id")]
pub enum ContainerLocation {
    Port(PortId),
    Ship(ShipId),
}

/// The complete mutable world a simulation runs over.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Fleet {
    ports: BTreeMap<PortId, Port>,
    ships: BTreeMap<ShipId, Ship>,
}

impl Fleet {
    /// Assemble a fleet from ports (with their waiting containers) and ships.
    ///
    /// Every ship is docked at the port it names. Fails on duplicate ids,
    /// ships or container destinations naming unknown ports, and container
    /// ids held by more than one location.
    pub fn new(ports: Vec<Port>, ships: Vec<Ship>) -> Result<Self> {
        let mut port_map = BTreeMap::new();
        for port in ports {
            let id = port.id();
            if port_map.insert(id, port).is_some() {
                return Err(Error::DuplicateId { entity: "port", id });
            }
        }

        let mut ship_map = BTreeMap::new();
        for ship in ships {
            let id = ship.id();
            if !port_map.contains_key(&ship.port()) {
                return Err(Error::UnknownPortId { id: ship.port() });
            }
            if ship_map.insert(id, ship).is_some() {
                return Err(Error::DuplicateId { entity: "ship", id });
            }
        }

        for port in port_map.values_mut() {
            port.clear_docked();
        }
        for ship in ship_map.values() {
            if let Some(port) = port_map.get_mut(&ship.port()) {
                port.dock(ship.id());
            }
        }

        let fleet = Self {
            ports: port_map,
            ships: ship_map,
        };
        fleet.validate_containers()?;
        Ok(fleet)
    }

    fn validate_containers(&self) -> Result<()> {
        let mut seen = BTreeSet::new();
        for container in self.all_containers() {
            if !seen.insert(container.id()) {
                return Err(Error::DuplicateId {
                    entity: "container",
                    id: container.id(),
                });
            }
            if let Some(dest) = container.destination() {
                if !self.ports.contains_key(&dest) {
                    return Err(Error::UnknownPortId { id: dest });
                }
            }
        }
        Ok(())
    }

    /// Put a new container into a port's waiting queue.
    pub fn place_container(&mut self, port: PortId, container: Container) -> Result<()> {
        if self.locate_container(container.id()).is_some() {
            return Err(Error::DuplicateId {
                entity: "container",
                id: container.id(),
            });
        }
        if let Some(dest) = container.destination() {
            if !self.ports.contains_key(&dest) {
                return Err(Error::UnknownPortId { id: dest });
            }
        }
        self.port_mut(port)?.push_container(container);
        Ok(())
    }

    pub fn port(&self, id: PortId) -> Result<&Port> {
        self.ports.get(&id).ok_or(Error::UnknownPortId { id })
    }

    pub fn ship(&self, id: ShipId) -> Result<&Ship> {
        self.ships.get(&id).ok_or(Error::UnknownShip { id })
    }

    pub(crate) fn port_mut(&mut self, id: PortId) -> Result<&mut Port> {
        self.ports.get_mut(&id).ok_or(Error::UnknownPortId { id })
    }

    pub(crate) fn ship_mut(&mut self, id: ShipId) -> Result<&mut Ship> {
        self.ships.get_mut(&id).ok_or(Error::UnknownShip { id })
    }

    /// Ports ascending by id.
    pub fn ports(&self) -> impl Iterator<Item = &Port> + '_ {
        self.ports.values()
    }

    /// Ships ascending by id.
    pub fn ships(&self) -> impl Iterator<Item = &Ship> + '_ {
        self.ships.values()
    }

    pub fn ship_ids(&self) -> Vec<ShipId> {
        self.ships.keys().copied().collect()
    }

    /// Resolve a port by case-insensitive name, suggesting close matches on failure.
    pub fn resolve_port(&self, name: &str) -> Result<PortId> {
        let wanted = name.trim().to_lowercase();
        if let Some(port) = self
            .ports
            .values()
            .find(|p| p.name().to_lowercase() == wanted)
        {
            return Ok(port.id());
        }

        Err(Error::UnknownPort {
            name: name.to_string(),
            suggestions: self.fuzzy_port_matches(&wanted, MAX_SUGGESTIONS),
        })
    }

    /// Port names most similar to `name`, best first.
    pub fn fuzzy_port_matches(&self, name: &str, limit: usize) -> Vec<String> {
        let needle = name.to_lowercase();
        let mut scored: Vec<(f64, &str)> = self
            .ports
            .values()
            .map(|p| (strsim::jaro_winkler(&needle, &p.name().to_lowercase()), p.name()))
            .filter(|(score, _)| *score >= SUGGESTION_THRESHOLD)
            .collect();
        scored.sort_by(|a, b| b.0.total_cmp(&a.0).then_with(|| a.1.cmp(b.1)));
        scored
            .into_iter()
            .take(limit)
            .map(|(_, name)| name.to_string())
            .collect()
    }

    /// Great-circle distance between two ports in kilometres.
    pub fn distance(&self, from: PortId, to: PortId) -> Result<f64> {
        Ok(self.port(from)?.distance_to(self.port(to)?))
    }

    pub fn locate_container(&self, id: ContainerId) -> Option<ContainerLocation> {
        if let Some(port) = self.ports.values().find(|p| p.has_container(id)) {
            return Some(ContainerLocation::Port(port.id()));
        }
        self.ships
            .values()
            .find(|s| s.manifest().iter().any(|c| c.id() == id))
            .map(|s| ContainerLocation::Ship(s.id()))
    }

    /// Every container in the fleet, port queues first, then manifests.
    pub fn all_containers(&self) -> impl Iterator<Item = &Container> + '_ {
        self.ports
            .values()
            .flat_map(|p| p.containers().iter())
            .chain(self.ships.values().flat_map(|s| s.manifest().iter()))
    }

    pub fn container_count(&self) -> usize {
        self.all_containers().count()
    }

    /// Routed containers that have reached their destination port, ascending by id.
    pub fn delivered_ids(&self) -> Vec<ContainerId> {
        let mut ids: Vec<_> = self
            .ports
            .values()
            .flat_map(|p| {
                p.containers()
                    .iter()
                    .filter(move |c| c.destination() == Some(p.id()))
            })
            .map(Container::id)
            .collect();
        ids.sort_unstable();
        ids
    }

    /// Routed containers not yet at their destination, ascending by id.
    pub fn undelivered_ids(&self) -> Vec<ContainerId> {
        let mut ids: Vec<_> = self
            .ports
            .values()
            .flat_map(|p| p.undelivered())
            .chain(
                self.ships
                    .values()
                    .flat_map(|s| s.manifest().iter())
                    .filter(|c| c.destination().is_some()),
            )
            .map(Container::id)
            .collect();
        ids.sort_unstable();
        ids
    }

    pub fn all_delivered(&self) -> bool {
        self.undelivered_ids().is_empty()
    }
}
