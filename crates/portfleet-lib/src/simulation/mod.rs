//! Simulation controller driving the fleet with a dispatch strategy.
//!
//! This module provides:
//! - [`SimulationKind`] - The two competing strategies (A: fuel saver, B: throughput)
//! - [`SimulationConfig`] - Step limit, refuel allowance and loader/fuel settings
//! - [`advance`] - One step as a pure function of fleet state
//! - [`run_simulation`] - Run a strategy to termination
//! - [`SimulationReport`] / [`SimulationComparison`] - Run results
//!
//! # Steps
//!
//! A step visits every ship in ascending id order. Each ship first unloads
//! cargo destined for the port it is docked at, then the strategy picks a
//! loaded leg (or, failing that, an empty repositioning leg), the loader fills
//! the ship for that destination and the voyage engine sails it. A voyage
//! short of fuel is refuelled once if the ship's refuel allowance covers the
//! shortfall; otherwise the freshly loaded cargo goes back to the port and
//! the ship is stranded for the step.
//!
//! # Example
//!
//! ```
//! use portfleet_lib::container::{Container, ContainerKind};
//! use portfleet_lib::fleet::Fleet;
//! use portfleet_lib::port::Port;
//! use portfleet_lib::ship::{Ship, ShipAttributes};
//! use portfleet_lib::simulation::{run_simulation, SimulationConfig, SimulationKind, TerminationReason};
//!
//! let piraeus = Port::new(0, "Piraeus", 37.94, 23.65).unwrap();
//! let rotterdam = Port::new(1, "Rotterdam", 51.92, 4.48).unwrap();
//! let attrs = ShipAttributes {
//!     name: "Aegean Star".to_string(),
//!     fuel_per_km: 0.0,
//!     max_weight_kg: 3000.0,
//!     max_containers: 2,
//!     max_heavy_containers: 1,
//! };
//! let ship = Ship::new(0, attrs, 0, 0.0).unwrap();
//! let mut fleet = Fleet::new(vec![piraeus, rotterdam], vec![ship]).unwrap();
//! let cargo = Container::new(1, ContainerKind::Standard, 1000.0).unwrap().with_destination(1);
//! fleet.place_container(0, cargo).unwrap();
//!
//! let report = run_simulation(&mut fleet, SimulationKind::FuelSaver, &SimulationConfig::default()).unwrap();
//! assert_eq!(report.termination, TerminationReason::AllDelivered);
//! assert_eq!(report.delivered, [1]);
//! ```

mod strategy;

pub use strategy::{
    loaded_legs, reposition_legs, select_strategy, DispatchStrategy, FuelSaverStrategy,
    LegCandidate, RepositionCandidate, ThroughputStrategy,
};

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::container::ContainerId;
use crate::error::{Error, Result};
use crate::fleet::Fleet;
use crate::loader::{apply_load, revert_load, unload_ship, LoadConfig, LoadPlan};
use crate::port::PortId;
use crate::ship::{FuelConfig, ShipId, FUEL_EPSILON};
use crate::voyage::{refuel, sail, VoyageRecord};

/// Default upper bound on simulation steps.
pub const DEFAULT_MAX_STEPS: usize = 1000;

/// The competing dispatch strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SimulationKind {
    /// Simulation A: minimise fuel per container moved.
    FuelSaver,
    /// Simulation B: maximise containers moved per voyage.
    Throughput,
}

impl SimulationKind {
    /// Single-letter label used in reports.
    pub fn letter(self) -> char {
        match self {
            SimulationKind::FuelSaver => 'A',
            SimulationKind::Throughput => 'B',
        }
    }
}

impl fmt::Display for SimulationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            SimulationKind::FuelSaver => "fuel-saver",
            SimulationKind::Throughput => "throughput",
        };
        f.write_str(value)
    }
}

impl FromStr for SimulationKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "a" | "fuel-saver" | "fuel_saver" => Ok(SimulationKind::FuelSaver),
            "b" | "throughput" => Ok(SimulationKind::Throughput),
            other => Err(Error::InvalidConfig {
                message: format!("unknown simulation '{other}' (expected a or b)"),
            }),
        }
    }
}

/// Settings shared by both strategies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub max_steps: usize,
    /// Fuel each ship may take on during a run; `None` means unlimited.
    pub refuel_allowance: Option<f64>,
    pub load: LoadConfig,
    pub fuel: FuelConfig,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            max_steps: DEFAULT_MAX_STEPS,
            refuel_allowance: None,
            load: LoadConfig::default(),
            fuel: FuelConfig::default(),
        }
    }
}

impl SimulationConfig {
    pub fn validate(&self) -> Result<()> {
        if self.max_steps == 0 {
            return Err(Error::InvalidConfig {
                message: "max_steps must be at least 1".to_string(),
            });
        }
        if let Some(allowance) = self.refuel_allowance {
            if !allowance.is_finite() || allowance < 0.0 {
                return Err(Error::InvalidConfig {
                    message: format!(
                        "refuel_allowance must be finite and non-negative, got {allowance}"
                    ),
                });
            }
        }
        self.load.validate()
    }

    fn may_refuel(&self, already_added: f64, amount: f64) -> bool {
        self.refuel_allowance
            .map_or(true, |cap| already_added + amount <= cap + FUEL_EPSILON)
    }
}

/// Why a simulation stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerminationReason {
    /// Every routed container reached its destination.
    AllDelivered,
    /// A full step neither moved a ship nor delivered a container.
    Stalled,
    /// The configured step limit was reached.
    StepLimit,
}

impl fmt::Display for TerminationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            TerminationReason::AllDelivered => "all containers delivered",
            TerminationReason::Stalled => "stalled",
            TerminationReason::StepLimit => "step limit reached",
        };
        f.write_str(value)
    }
}

/// Fuel taken on to cover a voyage shortfall.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RefuelEvent {
    pub ship: ShipId,
    pub port: PortId,
    pub amount: f64,
}

/// What happened during one step.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct StepOutcome {
    pub voyages: Vec<VoyageRecord>,
    pub delivered: Vec<ContainerId>,
    pub refuels: Vec<RefuelEvent>,
    pub stranded: Vec<ShipId>,
}

impl StepOutcome {
    /// True when the step neither moved a ship nor delivered anything.
    pub fn is_idle(&self) -> bool {
        self.voyages.is_empty() && self.delivered.is_empty()
    }
}

/// Result of running one strategy to termination.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationReport {
    pub kind: SimulationKind,
    pub steps: usize,
    pub termination: TerminationReason,
    pub voyages: Vec<VoyageRecord>,
    pub total_fuel_burned: f64,
    pub total_fuel_added: f64,
    pub total_distance_km: f64,
    pub delivered: Vec<ContainerId>,
    pub undelivered: Vec<ContainerId>,
    /// Ships stranded at least once during the run.
    pub stranded_ships: Vec<ShipId>,
}

impl SimulationReport {
    pub fn voyage_count(&self) -> usize {
        self.voyages.len()
    }

    /// Fuel burned per delivered container, if anything was delivered.
    pub fn fuel_per_delivery(&self) -> Option<f64> {
        (!self.delivered.is_empty()).then(|| self.total_fuel_burned / self.delivered.len() as f64)
    }
}

/// Side-by-side comparison of two runs from the same starting state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationComparison {
    pub first: SimulationKind,
    pub second: SimulationKind,
    /// `second - first` fuel burned.
    pub fuel_burned_delta: f64,
    /// `second - first` containers delivered.
    pub delivered_delta: i64,
    /// `second - first` steps taken.
    pub steps_delta: i64,
    /// Run with the lower fuel burn per delivered container, if they differ.
    pub more_fuel_efficient: Option<SimulationKind>,
}

impl SimulationComparison {
    pub fn between(first: &SimulationReport, second: &SimulationReport) -> Self {
        let more_fuel_efficient = match (first.fuel_per_delivery(), second.fuel_per_delivery()) {
            (Some(a), Some(b)) if (a - b).abs() > FUEL_EPSILON => {
                Some(if a < b { first.kind } else { second.kind })
            }
            (Some(_), None) => Some(first.kind),
            (None, Some(_)) => Some(second.kind),
            _ => None,
        };

        Self {
            first: first.kind,
            second: second.kind,
            fuel_burned_delta: second.total_fuel_burned - first.total_fuel_burned,
            delivered_delta: second.delivered.len() as i64 - first.delivered.len() as i64,
            steps_delta: second.steps as i64 - first.steps as i64,
            more_fuel_efficient,
        }
    }
}

/// Run one step on a copy of `fleet`, returning the new state and what happened.
pub fn advance(
    strategy: &dyn DispatchStrategy,
    fleet: &Fleet,
    config: &SimulationConfig,
) -> Result<(Fleet, StepOutcome)> {
    let mut next = fleet.clone();
    let outcome = step_in_place(strategy, &mut next, config)?;
    Ok((next, outcome))
}

/// Run one step, mutating `fleet`.
///
/// Each ship tries its ranked candidates in order and sails the first one it
/// can afford. A ship is stranded only when every candidate fails.
pub fn step_in_place(
    strategy: &dyn DispatchStrategy,
    fleet: &mut Fleet,
    config: &SimulationConfig,
) -> Result<StepOutcome> {
    let mut outcome = StepOutcome::default();

    for ship in fleet.ship_ids() {
        let port = fleet.ship(ship)?.port();
        outcome
            .delivered
            .extend(unload_ship(fleet, ship, |c| c.destination() == Some(port))?);

        let legs = loaded_legs(fleet, ship, &config.load, &config.fuel)?;
        if !legs.is_empty() {
            let mut sailed = false;
            for leg in strategy.rank_legs(&legs) {
                let queue = fleet.port(port)?.containers().to_vec();
                let plan = LoadPlan {
                    ship,
                    port,
                    selection: leg.selection.clone(),
                };
                let load = apply_load(fleet, &plan, &config.load)?;

                let record = dispatch(fleet, ship, leg.destination, config, &mut outcome)?;
                if let Some(record) = record {
                    let destination = leg.destination;
                    outcome.voyages.push(record);
                    outcome.delivered.extend(unload_ship(fleet, ship, |c| {
                        c.destination() == Some(destination)
                    })?);
                    sailed = true;
                    break;
                }
                revert_load(fleet, &load, queue)?;
            }
            if !sailed {
                warn!(ship, port, legs = legs.len(), "ship stranded: no affordable leg");
                outcome.stranded.push(ship);
            }
            continue;
        }

        let candidates = reposition_legs(fleet, ship, &config.load)?;
        if candidates.is_empty() {
            continue;
        }
        let mut sailed = false;
        for target in strategy.rank_repositions(&candidates) {
            let record = dispatch(fleet, ship, target.destination, config, &mut outcome)?;
            if let Some(record) = record {
                outcome.voyages.push(record);
                sailed = true;
                break;
            }
        }
        if !sailed {
            warn!(ship, port, "ship stranded: cannot afford to reposition");
            outcome.stranded.push(ship);
        }
    }

    outcome.delivered.sort_unstable();
    Ok(outcome)
}

/// Sail, refuelling once if the allowance covers the shortfall.
///
/// Returns `None`, leaving the fleet unchanged, when the refuel allowance
/// does not cover the shortfall.
fn dispatch(
    fleet: &mut Fleet,
    ship: ShipId,
    destination: PortId,
    config: &SimulationConfig,
    outcome: &mut StepOutcome,
) -> Result<Option<VoyageRecord>> {
    let (required, available) = match sail(fleet, ship, destination, &config.fuel) {
        Ok(record) => return Ok(Some(record)),
        Err(Error::InsufficientFuel {
            required,
            available,
            ..
        }) => (required, available),
        Err(err) => return Err(err),
    };

    let amount = top_up_amount(available, required);
    let vessel = fleet.ship(ship)?;
    let port = vessel.port();
    if !config.may_refuel(vessel.fuel_added(), amount) {
        debug!(
            ship,
            port,
            destination,
            shortfall = required - available,
            "refuel allowance does not cover voyage"
        );
        return Ok(None);
    }

    refuel(fleet, ship, amount)?;
    outcome.refuels.push(RefuelEvent { ship, port, amount });

    match sail(fleet, ship, destination, &config.fuel) {
        Ok(record) => Ok(Some(record)),
        Err(Error::InsufficientFuel { .. }) => {
            warn!(ship, port, destination, "voyage still short after refuelling");
            Ok(None)
        }
        Err(err) => Err(err),
    }
}

/// Fuel to add to `fuel` so the tank holds at least `required`.
///
/// `fuel + (required - fuel)` can round to just below `required`; one extra
/// step of `required * f64::EPSILON` covers that.
fn top_up_amount(fuel: f64, required: f64) -> f64 {
    let amount = required - fuel;
    if fuel + amount < required {
        amount + required * f64::EPSILON
    } else {
        amount
    }
}

/// Run the strategy for `kind` on `fleet` until it terminates.
///
/// The fleet is left in its post-run state; capture a
/// [`FleetSnapshot`](crate::snapshot::FleetSnapshot) beforehand to reset it.
pub fn run_simulation(
    fleet: &mut Fleet,
    kind: SimulationKind,
    config: &SimulationConfig,
) -> Result<SimulationReport> {
    config.validate()?;
    let strategy = select_strategy(kind);

    info!(
        simulation = %kind,
        ships = fleet.ship_ids().len(),
        containers = fleet.container_count(),
        "starting simulation"
    );

    let mut steps = 0;
    let mut voyages = Vec::new();
    let mut total_fuel_added = 0.0;
    let mut stranded = BTreeSet::new();

    let termination = loop {
        if fleet.all_delivered() {
            break TerminationReason::AllDelivered;
        }
        if steps >= config.max_steps {
            break TerminationReason::StepLimit;
        }

        let outcome = step_in_place(strategy.as_ref(), fleet, config)?;
        steps += 1;
        total_fuel_added += outcome.refuels.iter().map(|r| r.amount).sum::<f64>();
        stranded.extend(outcome.stranded.iter().copied());
        let idle = outcome.is_idle();
        voyages.extend(outcome.voyages);

        if idle {
            break TerminationReason::Stalled;
        }
    };

    let report = SimulationReport {
        kind,
        steps,
        termination,
        total_fuel_burned: voyages.iter().map(|v: &VoyageRecord| v.fuel_used).sum(),
        total_distance_km: voyages.iter().map(|v: &VoyageRecord| v.distance_km).sum(),
        voyages,
        total_fuel_added,
        delivered: fleet.delivered_ids(),
        undelivered: fleet.undelivered_ids(),
        stranded_ships: stranded.into_iter().collect(),
    };

    info!(
        simulation = %kind,
        steps = report.steps,
        termination = %report.termination,
        voyages = report.voyage_count(),
        delivered = report.delivered.len(),
        undelivered = report.undelivered.len(),
        fuel_burned = report.total_fuel_burned,
        "simulation finished"
    );

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::{Container, ContainerKind};
    use crate::fleet::ContainerLocation;
    use crate::port::Port;
    use crate::ship::{Ship, ShipAttributes};
    use crate::snapshot::FleetSnapshot;

    fn attrs(name: &str, max_containers: usize) -> ShipAttributes {
        ShipAttributes {
            name: name.to_string(),
            fuel_per_km: 0.0,
            max_weight_kg: 10_000.0,
            max_containers,
            max_heavy_containers: 1,
        }
    }

    fn cargo(id: ContainerId, kind: ContainerKind, weight: f64, dest: PortId) -> Container {
        Container::new(id, kind, weight).unwrap().with_destination(dest)
    }

    /// Piraeus hub with cargo for Rotterdam (close) and Singapore (far).
    fn hub_fleet(fuel: f64) -> Fleet {
        let ports = vec![
            Port::new(0, "Piraeus", 37.94, 23.65).unwrap(),
            Port::new(1, "Rotterdam", 51.92, 4.48).unwrap(),
            Port::new(2, "Singapore", 1.26, 103.84).unwrap(),
        ];
        let ships = vec![Ship::new(0, attrs("Aegean Star", 3), 0, fuel).unwrap()];
        let mut fleet = Fleet::new(ports, ships).unwrap();
        fleet
            .place_container(0, cargo(1, ContainerKind::Standard, 1000.0, 1))
            .unwrap();
        fleet
            .place_container(0, cargo(2, ContainerKind::Standard, 1000.0, 2))
            .unwrap();
        fleet
            .place_container(0, cargo(3, ContainerKind::Liquid, 1000.0, 2))
            .unwrap();
        fleet
    }

    #[test]
    fn kind_parses_letters_and_names() {
        assert_eq!("a".parse::<SimulationKind>().unwrap(), SimulationKind::FuelSaver);
        assert_eq!("B".parse::<SimulationKind>().unwrap(), SimulationKind::Throughput);
        assert_eq!(
            "fuel-saver".parse::<SimulationKind>().unwrap(),
            SimulationKind::FuelSaver
        );
        assert!("c".parse::<SimulationKind>().is_err());
        assert_eq!(SimulationKind::Throughput.letter(), 'B');
    }

    #[test]
    fn config_validation() {
        assert!(SimulationConfig::default().validate().is_ok());
        let config = SimulationConfig {
            max_steps: 0,
            ..SimulationConfig::default()
        };
        assert!(config.validate().is_err());
        let config = SimulationConfig {
            refuel_allowance: Some(-1.0),
            ..SimulationConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn config_deserialises_with_defaults() {
        let config: SimulationConfig =
            serde_json::from_str(r#"{"refuel_allowance": 50.0, "load": {}}"#).unwrap();
        assert_eq!(config.max_steps, DEFAULT_MAX_STEPS);
        assert_eq!(config.refuel_allowance, Some(50.0));
        assert_eq!(config.load, LoadConfig::default());
    }

    #[test]
    fn fuel_saver_takes_cheapest_leg_first() {
        let fleet = hub_fleet(0.0);
        let (next, outcome) =
            advance(&FuelSaverStrategy, &fleet, &SimulationConfig::default()).unwrap();

        assert_eq!(outcome.voyages.len(), 1);
        assert_eq!(outcome.voyages[0].destination, 1);
        assert_eq!(outcome.delivered, [1]);
        assert_eq!(outcome.refuels.len(), 1);
        assert_eq!(next.ship(0).unwrap().port(), 1);
        // the input state is untouched
        assert_eq!(fleet.ship(0).unwrap().port(), 0);
    }

    #[test]
    fn throughput_takes_largest_load_first() {
        let fleet = hub_fleet(0.0);
        let (next, outcome) =
            advance(&ThroughputStrategy, &fleet, &SimulationConfig::default()).unwrap();

        assert_eq!(outcome.voyages[0].destination, 2);
        assert_eq!(outcome.delivered, [2, 3]);
        assert!(next.port(2).unwrap().has_container(3));
    }

    #[test]
    fn zero_allowance_strands_and_rolls_back() {
        let mut fleet = hub_fleet(0.0);
        let config = SimulationConfig {
            refuel_allowance: Some(0.0),
            ..SimulationConfig::default()
        };

        let report = run_simulation(&mut fleet, SimulationKind::FuelSaver, &config).unwrap();
        assert_eq!(report.termination, TerminationReason::Stalled);
        assert_eq!(report.steps, 1);
        assert_eq!(report.stranded_ships, [0]);
        assert!(report.voyages.is_empty());
        assert_eq!(report.undelivered, [1, 2, 3]);

        // every failed leg is rolled back, queue order included
        assert_eq!(fleet, hub_fleet(0.0));
        assert_eq!(fleet.locate_container(1), Some(ContainerLocation::Port(0)));
    }

    /// Piraeus with cargo for a port 100 km north and for Singapore.
    fn short_range_fleet(fuel: f64) -> Fleet {
        let north = 37.94 + 100.0 / 6371.0 * (180.0 / std::f64::consts::PI);
        let ports = vec![
            Port::new(0, "Piraeus", 37.94, 23.65).unwrap(),
            Port::new(1, "Chalkida", north, 23.65).unwrap(),
            Port::new(2, "Singapore", 1.26, 103.84).unwrap(),
        ];
        let ships = vec![Ship::new(0, attrs("Aegean Star", 3), 0, fuel).unwrap()];
        let mut fleet = Fleet::new(ports, ships).unwrap();
        for container in [
            cargo(1, ContainerKind::Standard, 1000.0, 1),
            cargo(2, ContainerKind::Standard, 1000.0, 2),
            cargo(3, ContainerKind::Standard, 1000.0, 2),
        ] {
            fleet.place_container(0, container).unwrap();
        }
        fleet
    }

    #[test]
    fn unaffordable_first_choice_falls_back_to_next_leg() {
        let fleet = short_range_fleet(3000.0);
        let config = SimulationConfig {
            refuel_allowance: Some(0.0),
            ..SimulationConfig::default()
        };
        let legs = loaded_legs(&fleet, 0, &config.load, &config.fuel).unwrap();
        assert_eq!(ThroughputStrategy.choose_leg(&legs).unwrap().destination, 2);

        let (next, outcome) = advance(&ThroughputStrategy, &fleet, &config).unwrap();
        assert!(outcome.stranded.is_empty());
        assert_eq!(outcome.voyages.len(), 1);
        assert_eq!(outcome.voyages[0].destination, 1);
        assert_eq!(outcome.delivered, [1]);

        let ship = next.ship(0).unwrap();
        assert_eq!(ship.fuel(), 3000.0 - outcome.voyages[0].fuel_used);
        assert!(ship.fuel() > 0.0);
        // the Singapore cargo is back where it was
        assert_eq!(
            next.port(0).unwrap().containers().iter().map(|c| c.id()).collect::<Vec<_>>(),
            [2, 3]
        );
    }

    #[test]
    fn run_continues_past_an_unaffordable_leg() {
        let mut fleet = short_range_fleet(3000.0);
        let config = SimulationConfig {
            refuel_allowance: Some(0.0),
            ..SimulationConfig::default()
        };
        let report = run_simulation(&mut fleet, SimulationKind::Throughput, &config).unwrap();

        assert_eq!(report.delivered, [1]);
        assert_eq!(report.undelivered, [2, 3]);
        assert_eq!(report.termination, TerminationReason::Stalled);
        assert_eq!(report.stranded_ships, [0]);
    }

    #[test]
    fn top_up_covers_rounding() {
        let fuel = 547.4431364717968;
        let required = 3124.0104207623813;
        assert!(fuel + (required - fuel) < required);
        assert!(fuel + top_up_amount(fuel, required) >= required);
        assert_eq!(top_up_amount(0.0, 3750.0), 3750.0);
    }

    #[test]
    fn refuel_after_rounding_shortfall_sails() {
        let mut fleet = short_range_fleet(0.0);
        let required = loaded_legs(&fleet, 0, &LoadConfig::default(), &FuelConfig::default())
            .unwrap()
            .into_iter()
            .find(|leg| leg.destination == 1)
            .unwrap()
            .required_fuel;
        refuel(&mut fleet, 0, required - 5e-10).unwrap();

        let (_, outcome) =
            advance(&FuelSaverStrategy, &fleet, &SimulationConfig::default()).unwrap();
        assert_eq!(outcome.voyages[0].destination, 1);
        assert_eq!(outcome.refuels.len(), 1);
        assert!(outcome.voyages[0].fuel_remaining >= 0.0);
    }

    #[test]
    fn runs_to_delivery_with_repositioning() {
        let mut fleet = hub_fleet(0.0);
        let report =
            run_simulation(&mut fleet, SimulationKind::FuelSaver, &SimulationConfig::default())
                .unwrap();

        assert_eq!(report.termination, TerminationReason::AllDelivered);
        assert_eq!(report.delivered, [1, 2, 3]);
        assert!(report.undelivered.is_empty());
        assert!((report.total_fuel_added - report.total_fuel_burned).abs() < 1e-6);
        // Piraeus -> Rotterdam, Rotterdam -> Piraeus empty, Piraeus -> Singapore
        assert_eq!(report.voyage_count(), 3);
        assert_eq!(report.voyages[1].fuel_used, 0.0);
    }

    #[test]
    fn step_limit_terminates() {
        let mut fleet = hub_fleet(0.0);
        let config = SimulationConfig {
            max_steps: 1,
            ..SimulationConfig::default()
        };
        let report = run_simulation(&mut fleet, SimulationKind::Throughput, &config).unwrap();
        assert_eq!(report.termination, TerminationReason::StepLimit);
        assert_eq!(report.steps, 1);
        assert_eq!(report.undelivered, [1]);
    }

    #[test]
    fn nothing_to_deliver_terminates_immediately() {
        let mut fleet = Fleet::new(
            vec![Port::new(0, "Piraeus", 37.94, 23.65).unwrap()],
            vec![Ship::new(0, attrs("Aegean Star", 2), 0, 10.0).unwrap()],
        )
        .unwrap();
        let report =
            run_simulation(&mut fleet, SimulationKind::FuelSaver, &SimulationConfig::default())
                .unwrap();
        assert_eq!(report.steps, 0);
        assert_eq!(report.termination, TerminationReason::AllDelivered);
    }

    #[test]
    fn runs_are_independent_after_reset() {
        let config = SimulationConfig::default();
        let initial = hub_fleet(0.0);

        let mut alone_b = initial.clone();
        let expected_b = run_simulation(&mut alone_b, SimulationKind::Throughput, &config).unwrap();

        let mut fleet = initial.clone();
        let snapshot = FleetSnapshot::capture(&fleet);
        let a = run_simulation(&mut fleet, SimulationKind::FuelSaver, &config).unwrap();
        snapshot.restore(&mut fleet).unwrap();
        assert_eq!(fleet, initial);
        let b = run_simulation(&mut fleet, SimulationKind::Throughput, &config).unwrap();

        assert_eq!(b, expected_b);
        assert_eq!(fleet, alone_b);

        let mut alone_a = initial.clone();
        assert_eq!(
            run_simulation(&mut alone_a, SimulationKind::FuelSaver, &config).unwrap(),
            a
        );
    }

    #[test]
    fn comparison_prefers_lower_fuel_per_delivery() {
        let config = SimulationConfig::default();
        let mut fleet = hub_fleet(0.0);
        let snapshot = FleetSnapshot::capture(&fleet);
        let a = run_simulation(&mut fleet, SimulationKind::FuelSaver, &config).unwrap();
        snapshot.restore(&mut fleet).unwrap();
        let b = run_simulation(&mut fleet, SimulationKind::Throughput, &config).unwrap();

        let comparison = SimulationComparison::between(&a, &b);
        assert_eq!(comparison.first, SimulationKind::FuelSaver);
        assert_eq!(comparison.delivered_delta, 0);
        assert!((comparison.fuel_burned_delta - (b.total_fuel_burned - a.total_fuel_burned)).abs() < 1e-9);
    }
}
