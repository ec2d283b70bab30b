//! Voyage engine: fuel accounting and ship relocation.

use serde::Serialize;
use tracing::debug;

use crate::container::ContainerId;
use crate::error::{Error, Result};
use crate::fleet::Fleet;
use crate::port::PortId;
use crate::ship::{calculate_voyage_fuel, project_fuel, FuelConfig, FuelProjection, ShipId};

/// A voyage evaluated against the current fleet without moving anything.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VoyagePlan {
    pub ship: ShipId,
    pub origin: PortId,
    pub destination: PortId,
    pub distance_km: f64,
    pub fuel: FuelProjection,
}

impl VoyagePlan {
    pub fn is_feasible(&self) -> bool {
        self.fuel.is_feasible()
    }
}

/// A completed voyage.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VoyageRecord {
    pub ship: ShipId,
    pub origin: PortId,
    pub destination: PortId,
    pub distance_km: f64,
    pub fuel_used: f64,
    pub fuel_remaining: f64,
    /// Manifest carried on this voyage.
    pub containers: Vec<ContainerId>,
}

/// Evaluate sailing `ship` with its current manifest to `destination`.
pub fn plan_voyage(
    fleet: &Fleet,
    ship: ShipId,
    destination: PortId,
    config: &FuelConfig,
) -> Result<VoyagePlan> {
    let vessel = fleet.ship(ship)?;
    let origin = vessel.port();
    if origin == destination {
        return Err(Error::AlreadyDocked {
            ship,
            port: destination,
        });
    }

    let distance_km = fleet.distance(origin, destination)?;
    let required = calculate_voyage_fuel(vessel.attributes(), vessel.manifest(), distance_km, config)?;

    Ok(VoyagePlan {
        ship,
        origin,
        destination,
        distance_km,
        fuel: project_fuel(required, vessel.fuel()),
    })
}

/// Sail `ship` to `destination`, burning the fuel its manifest requires.
///
/// Fails with [`Error::InsufficientFuel`] and leaves the fleet untouched when
/// the ship cannot cover the voyage. The manifest travels with the ship and
/// is not unloaded here.
pub fn sail(
    fleet: &mut Fleet,
    ship: ShipId,
    destination: PortId,
    config: &FuelConfig,
) -> Result<VoyageRecord> {
    let plan = plan_voyage(fleet, ship, destination, config)?;
    let Some(remaining) = plan.fuel.remaining else {
        return Err(Error::InsufficientFuel {
            ship,
            destination,
            required: plan.fuel.required,
            available: plan.fuel.available,
        });
    };

    let vessel = fleet.ship_mut(ship)?;
    vessel.burn_fuel(plan.fuel.required);
    vessel.set_port(destination);
    let containers = vessel.manifest_ids();

    fleet.port_mut(plan.origin)?.undock(ship);
    fleet.port_mut(destination)?.dock(ship);

    debug!(
        ship,
        origin = plan.origin,
        destination,
        distance_km = plan.distance_km,
        fuel_used = plan.fuel.required,
        fuel_remaining = remaining,
        "voyage completed"
    );

    Ok(VoyageRecord {
        ship,
        origin: plan.origin,
        destination,
        distance_km: plan.distance_km,
        fuel_used: plan.fuel.required,
        fuel_remaining: remaining,
        containers,
    })
}

/// Add fuel to a docked ship, returning its new fuel level.
pub fn refuel(fleet: &mut Fleet, ship: ShipId, amount: f64) -> Result<f64> {
    let vessel = fleet.ship_mut(ship)?;
    vessel.add_fuel(amount)?;
    debug!(ship, amount, fuel = vessel.fuel(), "refuelled");
    Ok(vessel.fuel())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::{Container, ContainerKind};
    use crate::loader::{load_ship, LoadConfig};
    use crate::port::Port;
    use crate::ship::{Ship, ShipAttributes};

    fn fleet(fuel: f64) -> Fleet {
        let mut piraeus = Port::new(0, "Piraeus", 37.94, 23.65).unwrap();
        piraeus.push_container(Container::new(1, ContainerKind::Standard, 1000.0).unwrap());
        let rotterdam = Port::new(1, "Rotterdam", 51.92, 4.48).unwrap();
        let attrs = ShipAttributes {
            name: "Aegean Star".to_string(),
            fuel_per_km: 0.5,
            max_weight_kg: 3000.0,
            max_containers: 2,
            max_heavy_containers: 1,
        };
        let ship = Ship::new(0, attrs, 0, fuel).unwrap();
        Fleet::new(vec![piraeus, rotterdam], vec![ship]).unwrap()
    }

    #[test]
    fn successful_voyage_burns_fuel_and_relocates() {
        let mut fleet = fleet(100_000.0);
        load_ship(&mut fleet, 0, &LoadConfig::default(), |_| true).unwrap();
        let distance = fleet.distance(0, 1).unwrap();
        let expected = 20.0 * 1.0 * distance;

        let record = sail(&mut fleet, 0, 1, &FuelConfig::default()).unwrap();
        assert!((record.fuel_used - expected).abs() < 1e-9);
        assert!((record.fuel_remaining - (100_000.0 - expected)).abs() < 1e-9);
        assert_eq!(record.containers, [1]);

        let ship = fleet.ship(0).unwrap();
        assert_eq!(ship.port(), 1);
        assert_eq!(ship.manifest().len(), 1);
        assert!(fleet.port(1).unwrap().docked_ships().contains(&0));
        assert!(!fleet.port(0).unwrap().docked_ships().contains(&0));
    }

    #[test]
    fn insufficient_fuel_leaves_state_unchanged() {
        let mut fleet = fleet(10.0);
        load_ship(&mut fleet, 0, &LoadConfig::default(), |_| true).unwrap();
        let before = fleet.clone();

        let err = sail(&mut fleet, 0, 1, &FuelConfig::default()).unwrap_err();
        assert!(matches!(err, Error::InsufficientFuel { ship: 0, destination: 1, .. }));
        assert_eq!(fleet, before);
    }

    #[test]
    fn fuel_a_hair_short_is_rejected() {
        let mut empty = fleet(0.0);
        load_ship(&mut empty, 0, &LoadConfig::default(), |_| true).unwrap();
        let required = plan_voyage(&empty, 0, 1, &FuelConfig::default())
            .unwrap()
            .fuel
            .required;

        let mut fleet = fleet(required - 5e-10);
        load_ship(&mut fleet, 0, &LoadConfig::default(), |_| true).unwrap();
        assert!(fleet.ship(0).unwrap().fuel() < required);
        let before = fleet.clone();

        let err = sail(&mut fleet, 0, 1, &FuelConfig::default()).unwrap_err();
        assert!(matches!(err, Error::InsufficientFuel { .. }));
        assert_eq!(fleet, before);
    }

    #[test]
    fn exact_fuel_lands_on_zero() {
        let mut fleet = fleet(0.0);
        load_ship(&mut fleet, 0, &LoadConfig::default(), |_| true).unwrap();
        let required = plan_voyage(&fleet, 0, 1, &FuelConfig::default())
            .unwrap()
            .fuel
            .required;
        refuel(&mut fleet, 0, required).unwrap();

        let record = sail(&mut fleet, 0, 1, &FuelConfig::default()).unwrap();
        assert_eq!(record.fuel_remaining, 0.0);
        assert_eq!(fleet.ship(0).unwrap().fuel(), 0.0);
    }

    #[test]
    fn empty_ship_sails_free_unless_hull_counted() {
        let mut fleet = fleet(0.0);
        let config = FuelConfig {
            include_hull_consumption: true,
        };
        assert!(!plan_voyage(&fleet, 0, 1, &config).unwrap().is_feasible());

        let record = sail(&mut fleet, 0, 1, &FuelConfig::default()).unwrap();
        assert_eq!(record.fuel_used, 0.0);
        assert_eq!(fleet.ship(0).unwrap().port(), 1);
    }

    #[test]
    fn sailing_to_current_port_is_rejected() {
        let mut fleet = fleet(0.0);
        assert!(matches!(
            sail(&mut fleet, 0, 0, &FuelConfig::default()),
            Err(Error::AlreadyDocked { ship: 0, port: 0 })
        ));
    }

    #[test]
    fn refuel_then_sail() {
        let mut fleet = fleet(0.0);
        load_ship(&mut fleet, 0, &LoadConfig::default(), |_| true).unwrap();
        let plan = plan_voyage(&fleet, 0, 1, &FuelConfig::default()).unwrap();
        assert!(!plan.is_feasible());

        let level = refuel(&mut fleet, 0, plan.fuel.shortfall).unwrap();
        assert!((level - plan.fuel.required).abs() < 1e-9);
        let record = sail(&mut fleet, 0, 1, &FuelConfig::default()).unwrap();
        assert!(record.fuel_remaining.abs() < 1e-6);
        assert!(refuel(&mut fleet, 0, f64::NAN).is_err());
    }
}
