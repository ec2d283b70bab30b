use std::path::PathBuf;

use thiserror::Error;

use crate::container::ContainerId;
use crate::loader::CapacityLimit;
use crate::port::PortId;
use crate::ship::ShipId;

/// Convenient result alias for the PortFleet library.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level library error type.
#[derive(Debug, Error)]
pub enum Error {
    /// Raised when a latitude/longitude pair is out of range or not finite.
    #[error("invalid coordinate ({lat}, {lon}); latitude must be within [-90, 90] and longitude within [-180, 180]")]
    InvalidCoordinate { lat: f64, lon: f64 },

    /// Raised when a container weight is not a finite positive number.
    #[error("container {container} has invalid weight {weight} kg")]
    InvalidWeight { container: ContainerId, weight: f64 },

    /// Raised when ship data fails validation.
    #[error("invalid ship data: {message}")]
    ShipDataValidation { message: String },

    /// Raised when a single container cannot be placed on a ship without breaking a limit.
    #[error("container {container} does not fit on ship {ship}: {limit} limit reached")]
    CapacityExceeded {
        ship: ShipId,
        container: ContainerId,
        limit: CapacityLimit,
    },

    /// Raised when a ship lacks the fuel to complete a voyage.
    #[error("ship {ship} needs {required:.2} fuel to reach port {destination} but holds {available:.2}")]
    InsufficientFuel {
        ship: ShipId,
        destination: PortId,
        required: f64,
        available: f64,
    },

    /// Raised when a refuel amount is negative or not finite.
    #[error("invalid fuel amount {amount}; must be finite and non-negative")]
    InvalidFuelAmount { amount: f64 },

    /// Raised when a ship is asked to sail to the port it is already docked at.
    #[error("ship {ship} is already docked at port {port}")]
    AlreadyDocked { ship: ShipId, port: PortId },

    /// Raised when a ship is expected at a port it is not docked at.
    #[error("ship {ship} is not docked at port {port}")]
    ShipNotDocked { ship: ShipId, port: PortId },

    /// Raised when a port name could not be resolved.
    #[error("unknown port name: {name}{}", format_suggestions(.suggestions))]
    UnknownPort {
        name: String,
        suggestions: Vec<String>,
    },

    /// Raised when a port id is not present in the fleet.
    #[error("unknown port id: {id}")]
    UnknownPortId { id: PortId },

    /// Raised when a ship id is not present in the fleet.
    #[error("unknown ship id: {id}")]
    UnknownShip { id: ShipId },

    /// Raised when a container id is not present in the fleet.
    #[error("unknown container id: {id}")]
    UnknownContainer { id: ContainerId },

    /// Raised when two entities of the same kind share an id.
    #[error("duplicate {entity} id encountered: {id}")]
    DuplicateId { entity: &'static str, id: u32 },

    /// Raised when a container is expected at a port but is held elsewhere.
    #[error("container {container} is not waiting at port {port}")]
    ContainerNotAtPort { container: ContainerId, port: PortId },

    /// Raised when a snapshot does not describe the fleet it is restored onto.
    #[error("snapshot does not match fleet: {message}")]
    SnapshotMismatch { message: String },

    /// Raised when a simulation configuration value is out of range.
    #[error("invalid simulation config: {message}")]
    InvalidConfig { message: String },

    /// Raised when a dataset file cannot be parsed.
    #[error("failed to parse {path}: {message}")]
    DatasetParse { path: PathBuf, message: String },

    /// Wrapper for IO errors.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

fn format_suggestions(suggestions: &[String]) -> String {
    if suggestions.is_empty() {
        String::new()
    } else if suggestions.len() == 1 {
        format!(". Did you mean '{}'?", suggestions[0])
    } else {
        format!(
            ". Did you mean one of: {}?",
            suggestions
                .iter()
                .map(|s| format!("'{}'", s))
                .collect::<Vec<_>>()
                .join(", ")
        )
    }
}
