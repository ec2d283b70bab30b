//! PortFleet library entry points.
//!
//! This crate models a container-shipping fleet (ports, ships and containers),
//! loads it from CSV, and runs the two competing dispatch simulations over it.
//! Higher-level consumers (the CLI) should only depend on the functions
//! exported here instead of reimplementing behavior.
//!
//! The usual sequence is load → capture → run A → restore → run B → compare:
//!
//! ```no_run
//! use portfleet_lib::{load_fleet, run_simulation, FleetSnapshot, SimulationConfig, SimulationKind};
//!
//! let mut fleet = load_fleet(std::path::Path::new("data"))?;
//! let snapshot = FleetSnapshot::capture(&fleet);
//! let config = SimulationConfig::default();
//! let a = run_simulation(&mut fleet, SimulationKind::FuelSaver, &config)?;
//! snapshot.restore(&mut fleet)?;
//! let b = run_simulation(&mut fleet, SimulationKind::Throughput, &config)?;
//! println!("A burned {:.1}, B burned {:.1}", a.total_fuel_burned, b.total_fuel_burned);
//! # Ok::<(), portfleet_lib::Error>(())
//! ```

#![deny(warnings)]

pub mod container;
pub mod dataset;
pub mod error;
pub mod fleet;
pub mod geo;
pub mod loader;
pub mod output;
pub mod port;
pub mod ship;
pub mod simulation;
pub mod snapshot;
pub mod voyage;

pub use container::{Container, ContainerId, ContainerKind};
pub use dataset::{load_fleet, resolve_data_dir, DatasetPaths};
pub use error::{Error, Result};
pub use fleet::{ContainerLocation, Fleet};
pub use geo::{distance, Coordinate};
pub use loader::{load_ship, unload_ship, CapacityLimit, LoadConfig, LoadReport};
pub use port::{Port, PortId};
pub use ship::{FuelConfig, Ship, ShipAttributes, ShipId};
pub use simulation::{
    advance, run_simulation, SimulationComparison, SimulationConfig, SimulationKind,
    SimulationReport, StepOutcome, TerminationReason,
};
pub use snapshot::FleetSnapshot;
pub use voyage::{plan_voyage, refuel, sail, VoyagePlan, VoyageRecord};
