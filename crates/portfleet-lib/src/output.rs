use std::fmt::Write;

use serde::Serialize;

use crate::container::{ContainerId, ContainerKind};
use crate::error::Result;
use crate::fleet::Fleet;
use crate::port::PortId;
use crate::ship::ShipId;
use crate::simulation::{SimulationComparison, SimulationKind, SimulationReport, TerminationReason};

/// Presentation style for turning summaries into text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    PlainText,
    RichText,
}

/// A container as shown in status listings.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ContainerStatus {
    pub id: ContainerId,
    pub kind: ContainerKind,
    pub weight_kg: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PortStatus {
    pub id: PortId,
    pub name: String,
    pub lat: f64,
    pub lon: f64,
    pub containers: Vec<ContainerStatus>,
    pub docked_ships: Vec<ShipId>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ShipStatus {
    pub id: ShipId,
    pub name: String,
    pub port: String,
    pub fuel: f64,
    pub fuel_added: f64,
    pub manifest: Vec<ContainerStatus>,
    pub cargo_weight_kg: f64,
}

/// Snapshot of every port and ship suitable for printing or serialising.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FleetStatus {
    pub ports: Vec<PortStatus>,
    pub ships: Vec<ShipStatus>,
    pub delivered: usize,
    pub undelivered: usize,
}

impl FleetStatus {
    pub fn from_fleet(fleet: &Fleet) -> Result<Self> {
        let describe = |c: &crate::container::Container| -> Result<ContainerStatus> {
            let destination = match c.destination() {
                Some(id) => Some(fleet.port(id)?.name().to_string()),
                None => None,
            };
            Ok(ContainerStatus {
                id: c.id(),
                kind: c.kind(),
                weight_kg: c.weight_kg(),
                destination,
            })
        };

        let ports = fleet
            .ports()
            .map(|port| {
                Ok(PortStatus {
                    id: port.id(),
                    name: port.name().to_string(),
                    lat: port.coordinate().lat,
                    lon: port.coordinate().lon,
                    containers: port.containers().iter().map(&describe).collect::<Result<_>>()?,
                    docked_ships: port.docked_ships().iter().copied().collect(),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let ships = fleet
            .ships()
            .map(|ship| {
                Ok(ShipStatus {
                    id: ship.id(),
                    name: ship.name().to_string(),
                    port: fleet.port(ship.port())?.name().to_string(),
                    fuel: ship.fuel(),
                    fuel_added: ship.fuel_added(),
                    manifest: ship.manifest().iter().map(&describe).collect::<Result<_>>()?,
                    cargo_weight_kg: ship.manifest().iter().map(|c| c.weight_kg()).sum(),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            ports,
            ships,
            delivered: fleet.delivered_ids().len(),
            undelivered: fleet.undelivered_ids().len(),
        })
    }

    pub fn render(&self, mode: RenderMode) -> String {
        match mode {
            RenderMode::PlainText => self.render_plain(),
            RenderMode::RichText => self.render_rich(),
        }
    }

    fn render_plain(&self) -> String {
        let mut buffer = String::new();
        let _ = writeln!(
            buffer,
            "Fleet: {} ports, {} ships ({} delivered, {} undelivered)",
            self.ports.len(),
            self.ships.len(),
            self.delivered,
            self.undelivered
        );
        let _ = writeln!(buffer, "Ports:");
        for port in &self.ports {
            let _ = writeln!(
                buffer,
                "{:>4}: {} ({:.2}, {:.2}) - {} containers, ships docked: {}",
                port.id,
                port.name,
                port.lat,
                port.lon,
                port.containers.len(),
                join_ids(&port.docked_ships)
            );
            for container in &port.containers {
                let _ = writeln!(buffer, "        {}", container_line(container));
            }
        }
        let _ = writeln!(buffer, "Ships:");
        for ship in &self.ships {
            let _ = writeln!(
                buffer,
                "{:>4}: {} at {} - fuel {:.2}, {} containers ({:.0} kg)",
                ship.id,
                ship.name,
                ship.port,
                ship.fuel,
                ship.manifest.len(),
                ship.cargo_weight_kg
            );
            for container in &ship.manifest {
                let _ = writeln!(buffer, "        {}", container_line(container));
            }
        }
        buffer
    }

    fn render_rich(&self) -> String {
        let mut buffer = String::new();
        let _ = writeln!(buffer, "**Ports**");
        for port in &self.ports {
            let _ = writeln!(
                buffer,
                "* **{}** (`{}`): {} containers, docked [{}]",
                port.name,
                port.id,
                port.containers.len(),
                join_ids(&port.docked_ships)
            );
        }
        let _ = writeln!(buffer, "**Ships**");
        for ship in &self.ships {
            let _ = writeln!(
                buffer,
                "* **{}** (`{}`) at _{}_: fuel `{:.2}`, {} containers",
                ship.name,
                ship.id,
                ship.port,
                ship.fuel,
                ship.manifest.len()
            );
        }
        buffer
    }
}

fn container_line(container: &ContainerStatus) -> String {
    match &container.destination {
        Some(dest) => format!(
            "#{} {} {:.0} kg -> {}",
            container.id, container.kind, container.weight_kg, dest
        ),
        None => format!(
            "#{} {} {:.0} kg",
            container.id, container.kind, container.weight_kg
        ),
    }
}

fn join_ids(ids: &[u32]) -> String {
    if ids.is_empty() {
        return "none".to_string();
    }
    ids.iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// One voyage with port and ship names resolved.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct VoyageLine {
    pub ship: String,
    pub origin: String,
    pub destination: String,
    pub distance_km: f64,
    pub fuel_used: f64,
    pub containers: Vec<ContainerId>,
}

/// Structured representation of a finished simulation run.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SimulationSummary {
    pub kind: SimulationKind,
    pub steps: usize,
    pub termination: TerminationReason,
    pub voyages: Vec<VoyageLine>,
    pub total_fuel_burned: f64,
    pub total_fuel_added: f64,
    pub total_distance_km: f64,
    pub delivered: Vec<ContainerId>,
    pub undelivered: Vec<ContainerId>,
    pub stranded_ships: Vec<String>,
}

impl SimulationSummary {
    /// Resolve names in `report` against the fleet it ran on.
    pub fn from_report(report: &SimulationReport, fleet: &Fleet) -> Result<Self> {
        let voyages = report
            .voyages
            .iter()
            .map(|voyage| {
                Ok(VoyageLine {
                    ship: fleet.ship(voyage.ship)?.name().to_string(),
                    origin: fleet.port(voyage.origin)?.name().to_string(),
                    destination: fleet.port(voyage.destination)?.name().to_string(),
                    distance_km: voyage.distance_km,
                    fuel_used: voyage.fuel_used,
                    containers: voyage.containers.clone(),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let stranded_ships = report
            .stranded_ships
            .iter()
            .map(|id| Ok(fleet.ship(*id)?.name().to_string()))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            kind: report.kind,
            steps: report.steps,
            termination: report.termination,
            voyages,
            total_fuel_burned: report.total_fuel_burned,
            total_fuel_added: report.total_fuel_added,
            total_distance_km: report.total_distance_km,
            delivered: report.delivered.clone(),
            undelivered: report.undelivered.clone(),
            stranded_ships,
        })
    }

    pub fn render(&self, mode: RenderMode) -> String {
        let mut buffer = String::new();
        let title = format!("Simulation {} ({})", self.kind.letter(), self.kind);
        match mode {
            RenderMode::PlainText => {
                let _ = writeln!(buffer, "{title}: {} after {} steps", self.termination, self.steps);
            }
            RenderMode::RichText => {
                let _ = writeln!(
                    buffer,
                    "**{title}**: _{}_ after {} steps",
                    self.termination, self.steps
                );
            }
        }

        for (index, voyage) in self.voyages.iter().enumerate() {
            let _ = writeln!(
                buffer,
                "{:>4}: {} {} -> {} ({:.1} km, fuel {:.2}, containers: {})",
                index + 1,
                voyage.ship,
                voyage.origin,
                voyage.destination,
                voyage.distance_km,
                voyage.fuel_used,
                join_ids(&voyage.containers)
            );
        }

        let _ = writeln!(
            buffer,
            "Voyages: {}, distance {:.1} km, fuel burned {:.2}, fuel added {:.2}",
            self.voyages.len(),
            self.total_distance_km,
            self.total_fuel_burned,
            self.total_fuel_added
        );
        let _ = writeln!(
            buffer,
            "Delivered: {} [{}]; undelivered: {} [{}]",
            self.delivered.len(),
            join_ids(&self.delivered),
            self.undelivered.len(),
            join_ids(&self.undelivered)
        );
        if !self.stranded_ships.is_empty() {
            let _ = writeln!(buffer, "Stranded: {}", self.stranded_ships.join(", "));
        }
        buffer
    }
}

/// Render a comparison of two runs.
pub fn render_comparison(comparison: &SimulationComparison) -> String {
    let mut buffer = String::new();
    let _ = writeln!(
        buffer,
        "Comparison {} vs {}:",
        comparison.first.letter(),
        comparison.second.letter()
    );
    let _ = writeln!(
        buffer,
        "  fuel burned: {:+.2}, delivered: {:+}, steps: {:+}",
        comparison.fuel_burned_delta, comparison.delivered_delta, comparison.steps_delta
    );
    match comparison.more_fuel_efficient {
        Some(kind) => {
            let _ = writeln!(
                buffer,
                "  more fuel efficient: Simulation {} ({kind})",
                kind.letter()
            );
        }
        None => {
            let _ = writeln!(buffer, "  fuel efficiency: tie");
        }
    }
    buffer
}
