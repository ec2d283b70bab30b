use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::container::{Container, ContainerId};
use crate::error::Result;
use crate::geo::Coordinate;
use crate::ship::ShipId;

/// Numeric identifier for a port.
pub type PortId = u32;

/// A geolocated port holding waiting containers and docked ships.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Port {
    id: PortId,
    name: String,
    coordinate: Coordinate,
    containers: Vec<Container>,
    docked: BTreeSet<ShipId>,
}

impl Port {
    /// Create an empty port, validating its coordinate.
    pub fn new(id: PortId, name: impl Into<String>, lat: f64, lon: f64) -> Result<Self> {
        Ok(Self {
            id,
            name: name.into(),
            coordinate: Coordinate::new(lat, lon)?,
            containers: Vec::new(),
            docked: BTreeSet::new(),
        })
    }

    pub fn id(&self) -> PortId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn coordinate(&self) -> Coordinate {
        self.coordinate
    }

    /// Great-circle distance to another port in kilometres.
    pub fn distance_to(&self, other: &Port) -> f64 {
        self.coordinate.distance_to(&other.coordinate)
    }

    /// Containers waiting at this port, in arrival order.
    pub fn containers(&self) -> &[Container] {
        &self.containers
    }

    /// Ships currently docked here, ascending by id.
    pub fn docked_ships(&self) -> &BTreeSet<ShipId> {
        &self.docked
    }

    pub fn has_container(&self, id: ContainerId) -> bool {
        self.containers.iter().any(|c| c.id() == id)
    }

    /// Containers waiting here that still have to travel elsewhere.
    pub fn undelivered(&self) -> impl Iterator<Item = &Container> + '_ {
        self.containers
            .iter()
            .filter(move |c| c.destination().is_some_and(|dest| dest != self.id))
    }

    pub(crate) fn push_container(&mut self, container: Container) {
        self.containers.push(container);
    }

    /// Remove the containers with the given ids, returning them in the order requested.
    ///
    /// Callers must have verified that every id is present.
    pub(crate) fn take_containers(&mut self, ids: &[ContainerId]) -> Vec<Container> {
        let mut taken = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(pos) = self.containers.iter().position(|c| c.id() == *id) {
                taken.push(self.containers.remove(pos));
            }
        }
        taken
    }

    pub(crate) fn restore_queue(&mut self, containers: Vec<Container>) {
        self.containers = containers;
    }

    pub(crate) fn dock(&mut self, ship: ShipId) {
        self.docked.insert(ship);
    }

    pub(crate) fn undock(&mut self, ship: ShipId) {
        self.docked.remove(&ship);
    }

    pub(crate) fn clear_docked(&mut self) {
        self.docked.clear();
    }

    pub(crate) fn replace_state(&mut self, containers: Vec<Container>, docked: BTreeSet<ShipId>) {
        self.containers = containers;
        self.docked = docked;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::ContainerKind;

    #[test]
    fn take_containers_preserves_request_order() {
        let mut port = Port::new(0, "Piraeus", 37.94, 23.65).unwrap();
        for id in [3, 1, 2] {
            port.push_container(Container::new(id, ContainerKind::Standard, 100.0).unwrap());
        }

        let taken = port.take_containers(&[1, 3]);
        assert_eq!(taken.iter().map(Container::id).collect::<Vec<_>>(), [1, 3]);
        assert_eq!(port.containers().len(), 1);
        assert!(port.has_container(2));
    }

    #[test]
    fn undelivered_skips_local_and_unrouted_cargo() {
        let mut port = Port::new(4, "Rotterdam", 51.92, 4.48).unwrap();
        let routed = Container::new(1, ContainerKind::Liquid, 500.0)
            .unwrap()
            .with_destination(0);
        let arrived = Container::new(2, ContainerKind::Liquid, 500.0)
            .unwrap()
            .with_destination(4);
        let idle = Container::new(3, ContainerKind::Liquid, 500.0).unwrap();
        port.push_container(routed);
        port.push_container(arrived);
        port.push_container(idle);

        let ids: Vec<_> = port.undelivered().map(Container::id).collect();
        assert_eq!(ids, [1]);
    }

    #[test]
    fn rejects_invalid_coordinates() {
        assert!(Port::new(0, "Nowhere", 120.0, 0.0).is_err());
    }
}
