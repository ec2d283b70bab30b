//! Dispatch strategies implementing the Strategy pattern.
//!
//! The controller computes the candidate legs a ship could sail this step;
//! a [`DispatchStrategy`] only ranks them. Candidates are built in ascending
//! port id order and every ranking breaks ties on port id, so a strategy is a
//! pure function of the fleet state.

use std::cmp::Ordering;

use serde::Serialize;

use crate::container::Container;
use crate::error::Result;
use crate::fleet::Fleet;
use crate::loader::{select_containers, LoadConfig, Selection};
use crate::port::PortId;
use crate::ship::{calculate_voyage_fuel, FuelConfig, Ship, ShipId};

use super::SimulationKind;

/// A destination the ship can sail to with cargo bound for it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegCandidate {
    pub destination: PortId,
    pub distance_km: f64,
    /// Containers the loader would take for this destination.
    pub selection: Selection,
    /// Fuel needed to carry the current manifest plus the selection.
    pub required_fuel: f64,
}

impl LegCandidate {
    pub fn loaded(&self) -> usize {
        self.selection.selected.len()
    }

    pub fn fuel_per_container(&self) -> f64 {
        self.required_fuel / self.loaded().max(1) as f64
    }
}

/// A port the ship could reposition to, empty, to pick up cargo.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RepositionCandidate {
    pub destination: PortId,
    pub distance_km: f64,
    /// Undelivered containers waiting at the destination.
    pub waiting: usize,
}

/// Trait for dispatch strategies.
///
/// Rankings are best first. The controller sails the first candidate the
/// ship can afford, so a strategy never has to know about fuel limits.
pub trait DispatchStrategy: Send + Sync {
    /// The simulation this strategy drives.
    fn kind(&self) -> SimulationKind;

    /// Order the loaded legs, best first.
    fn rank_legs<'a>(&self, legs: &'a [LegCandidate]) -> Vec<&'a LegCandidate>;

    /// Order the empty repositioning moves, best first.
    fn rank_repositions<'a>(
        &self,
        candidates: &'a [RepositionCandidate],
    ) -> Vec<&'a RepositionCandidate>;

    /// Pick the loaded leg to sail, if any.
    fn choose_leg<'a>(&self, legs: &'a [LegCandidate]) -> Option<&'a LegCandidate> {
        self.rank_legs(legs).into_iter().next()
    }

    /// Pick a port to reposition to when no loaded leg exists.
    fn choose_reposition<'a>(
        &self,
        candidates: &'a [RepositionCandidate],
    ) -> Option<&'a RepositionCandidate> {
        self.rank_repositions(candidates).into_iter().next()
    }
}

/// Simulation A: spend as little fuel per container moved as possible.
#[derive(Debug, Clone, Copy, Default)]
pub struct FuelSaverStrategy;

impl DispatchStrategy for FuelSaverStrategy {
    fn kind(&self) -> SimulationKind {
        SimulationKind::FuelSaver
    }

    fn rank_legs<'a>(&self, legs: &'a [LegCandidate]) -> Vec<&'a LegCandidate> {
        ranked(legs, |a, b| {
            a.fuel_per_container()
                .total_cmp(&b.fuel_per_container())
                .then_with(|| a.distance_km.total_cmp(&b.distance_km))
                .then_with(|| a.destination.cmp(&b.destination))
        })
    }

    fn rank_repositions<'a>(
        &self,
        candidates: &'a [RepositionCandidate],
    ) -> Vec<&'a RepositionCandidate> {
        ranked(candidates, nearest_first)
    }
}

/// Simulation B: move as many containers per voyage as possible.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThroughputStrategy;

impl DispatchStrategy for ThroughputStrategy {
    fn kind(&self) -> SimulationKind {
        SimulationKind::Throughput
    }

    fn rank_legs<'a>(&self, legs: &'a [LegCandidate]) -> Vec<&'a LegCandidate> {
        ranked(legs, |a, b| {
            b.loaded()
                .cmp(&a.loaded())
                .then_with(|| a.required_fuel.total_cmp(&b.required_fuel))
                .then_with(|| a.destination.cmp(&b.destination))
        })
    }

    fn rank_repositions<'a>(
        &self,
        candidates: &'a [RepositionCandidate],
    ) -> Vec<&'a RepositionCandidate> {
        ranked(candidates, |a, b| {
            b.waiting.cmp(&a.waiting).then_with(|| nearest_first(a, b))
        })
    }
}

fn ranked<T, F>(items: &[T], mut compare: F) -> Vec<&T>
where
    F: FnMut(&T, &T) -> Ordering,
{
    let mut ranked: Vec<&T> = items.iter().collect();
    ranked.sort_by(|a, b| compare(*a, *b));
    ranked
}

fn nearest_first(a: &RepositionCandidate, b: &RepositionCandidate) -> Ordering {
    a.distance_km
        .total_cmp(&b.distance_km)
        .then_with(|| a.destination.cmp(&b.destination))
}

/// Select the strategy for a simulation kind.
pub fn select_strategy(kind: SimulationKind) -> Box<dyn DispatchStrategy> {
    match kind {
        SimulationKind::FuelSaver => Box::new(FuelSaverStrategy),
        SimulationKind::Throughput => Box::new(ThroughputStrategy),
    }
}

/// Legs from the ship's port to every port its waiting cargo is bound for.
///
/// Destinations for which the loader would take nothing are left out.
pub fn loaded_legs(
    fleet: &Fleet,
    ship: ShipId,
    load: &LoadConfig,
    fuel: &FuelConfig,
) -> Result<Vec<LegCandidate>> {
    let vessel = fleet.ship(ship)?;
    let origin = fleet.port(vessel.port())?;

    let mut destinations: Vec<PortId> = origin
        .undelivered()
        .filter_map(Container::destination)
        .collect();
    destinations.sort_unstable();
    destinations.dedup();

    let mut legs = Vec::with_capacity(destinations.len());
    for destination in destinations {
        let selection = select_containers(
            vessel.attributes(),
            vessel.manifest(),
            origin.containers(),
            load,
            |c| c.destination() == Some(destination),
        );
        if selection.is_empty() {
            continue;
        }

        let cargo: Vec<Container> = vessel
            .manifest()
            .iter()
            .chain(
                origin
                    .containers()
                    .iter()
                    .filter(|c| selection.selected.contains(&c.id())),
            )
            .cloned()
            .collect();
        let distance_km = fleet.distance(origin.id(), destination)?;
        let required_fuel = calculate_voyage_fuel(vessel.attributes(), &cargo, distance_km, fuel)?;

        legs.push(LegCandidate {
            destination,
            distance_km,
            selection,
            required_fuel,
        });
    }
    Ok(legs)
}

/// Ports holding undelivered cargo this ship could load and no docked ship can.
pub fn reposition_legs(
    fleet: &Fleet,
    ship: ShipId,
    load: &LoadConfig,
) -> Result<Vec<RepositionCandidate>> {
    let vessel = fleet.ship(ship)?;
    let origin = vessel.port();

    let mut candidates = Vec::new();
    for port in fleet.ports().filter(|p| p.id() != origin) {
        let waiting = port.undelivered().count();
        if waiting == 0 || !can_take_cargo(vessel, port.containers(), port.id(), load) {
            continue;
        }

        let mut served = false;
        for docked in port.docked_ships() {
            if can_take_cargo(fleet.ship(*docked)?, port.containers(), port.id(), load) {
                served = true;
                break;
            }
        }
        if served {
            continue;
        }

        candidates.push(RepositionCandidate {
            destination: port.id(),
            distance_km: fleet.distance(origin, port.id())?,
            waiting,
        });
    }
    Ok(candidates)
}

fn can_take_cargo(ship: &Ship, queue: &[Container], port: PortId, load: &LoadConfig) -> bool {
    !select_containers(ship.attributes(), ship.manifest(), queue, load, |c| {
        c.destination().is_some_and(|dest| dest != port)
    })
    .is_empty()
}
