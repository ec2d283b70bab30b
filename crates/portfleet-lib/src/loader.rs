//! Capacity-constrained loading and unloading of ships.
//!
//! Loading is first-fit greedy: the port's waiting containers are considered
//! in ascending id order and each is taken if the ship's weight, count and
//! heavy-count totals all stay within limits; otherwise it is skipped and
//! left at the port. This is not an optimal knapsack; it is reproducible and
//! identical for every dispatch strategy.
//!
//! Planning ([`plan_load`]) is pure. Committing a plan ([`apply_load`])
//! re-verifies every limit before touching the fleet, so either every
//! selected container moves onto the ship or none does.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::container::{Container, ContainerId};
use crate::error::{Error, Result};
use crate::fleet::Fleet;
use crate::port::PortId;
use crate::ship::{ShipAttributes, ShipId, DEFAULT_HEAVY_THRESHOLD_KG};

/// The ship limit a container would break.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CapacityLimit {
    Count,
    Weight,
    HeavyCount,
}

impl fmt::Display for CapacityLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            CapacityLimit::Count => "container count",
            CapacityLimit::Weight => "weight",
            CapacityLimit::HeavyCount => "heavy container",
        };
        f.write_str(value)
    }
}

/// Loader configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadConfig {
    /// Containers strictly heavier than this count against `max_heavy_containers`.
    pub heavy_threshold_kg: f64,
}

impl Default for LoadConfig {
    fn default() -> Self {
        Self {
            heavy_threshold_kg: DEFAULT_HEAVY_THRESHOLD_KG,
        }
    }
}

impl LoadConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.heavy_threshold_kg.is_finite() || self.heavy_threshold_kg < 0.0 {
            return Err(Error::InvalidConfig {
                message: format!(
                    "heavy_threshold_kg must be finite and non-negative, got {}",
                    self.heavy_threshold_kg
                ),
            });
        }
        Ok(())
    }
}

/// Running totals of a manifest measured against ship limits.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct ManifestTotals {
    pub weight_kg: f64,
    pub count: usize,
    pub heavy: usize,
}

impl ManifestTotals {
    pub fn of(containers: &[Container], config: &LoadConfig) -> Self {
        containers.iter().fold(Self::default(), |totals, c| Self {
            weight_kg: totals.weight_kg + c.weight_kg(),
            count: totals.count + 1,
            heavy: totals.heavy + usize::from(c.is_heavy(config.heavy_threshold_kg)),
        })
    }

    /// Totals after adding `container`, or the first limit it would break.
    ///
    /// Limits are checked in the order count, weight, heavy count.
    pub fn admit(
        &self,
        container: &Container,
        ship: &ShipAttributes,
        config: &LoadConfig,
    ) -> std::result::Result<Self, CapacityLimit> {
        let next = Self {
            weight_kg: self.weight_kg + container.weight_kg(),
            count: self.count + 1,
            heavy: self.heavy + usize::from(container.is_heavy(config.heavy_threshold_kg)),
        };

        if next.count > ship.max_containers {
            Err(CapacityLimit::Count)
        } else if next.weight_kg > ship.max_weight_kg {
            Err(CapacityLimit::Weight)
        } else if next.heavy > ship.max_heavy_containers {
            Err(CapacityLimit::HeavyCount)
        } else {
            Ok(next)
        }
    }
}

/// A container the loader left at the port, and why.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SkippedContainer {
    pub container: ContainerId,
    pub limit: CapacityLimit,
}

/// Outcome of a greedy selection over a port queue.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Selection {
    pub selected: Vec<ContainerId>,
    pub skipped: Vec<SkippedContainer>,
    /// Manifest totals once the selected containers are on board.
    pub totals: ManifestTotals,
}

impl Selection {
    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }
}

/// Greedy first-fit selection of `queue` containers accepted by `filter`.
pub fn select_containers<F>(
    ship: &ShipAttributes,
    manifest: &[Container],
    queue: &[Container],
    config: &LoadConfig,
    filter: F,
) -> Selection
where
    F: Fn(&Container) -> bool,
{
    let mut candidates: Vec<&Container> = queue.iter().filter(|c| filter(c)).collect();
    candidates.sort_by_key(|c| c.id());

    let mut selection = Selection {
        totals: ManifestTotals::of(manifest, config),
        ..Selection::default()
    };

    for container in candidates {
        match selection.totals.admit(container, ship, config) {
            Ok(next) => {
                selection.totals = next;
                selection.selected.push(container.id());
            }
            Err(limit) => selection.skipped.push(SkippedContainer {
                container: container.id(),
                limit,
            }),
        }
    }

    selection
}

/// A load computed against the current fleet but not yet applied.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoadPlan {
    pub ship: ShipId,
    pub port: PortId,
    #[serde(flatten)]
    pub selection: Selection,
}

/// Result of applying a load to the fleet.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoadReport {
    pub ship: ShipId,
    pub port: PortId,
    pub loaded: Vec<ContainerId>,
    pub skipped: Vec<SkippedContainer>,
    pub totals: ManifestTotals,
}

/// Plan which containers waiting at the ship's port it would take.
pub fn plan_load<F>(fleet: &Fleet, ship: ShipId, config: &LoadConfig, filter: F) -> Result<LoadPlan>
where
    F: Fn(&Container) -> bool,
{
    let vessel = fleet.ship(ship)?;
    let port = fleet.port(vessel.port())?;
    let selection = select_containers(
        vessel.attributes(),
        vessel.manifest(),
        port.containers(),
        config,
        filter,
    );

    Ok(LoadPlan {
        ship,
        port: port.id(),
        selection,
    })
}

/// Move the planned containers from the port queue onto the ship, all or nothing.
pub fn apply_load(fleet: &mut Fleet, plan: &LoadPlan, config: &LoadConfig) -> Result<LoadReport> {
    let vessel = fleet.ship(plan.ship)?;
    if vessel.port() != plan.port {
        return Err(Error::ShipNotDocked {
            ship: plan.ship,
            port: plan.port,
        });
    }

    let port = fleet.port(plan.port)?;
    let mut totals = vessel.totals(config);
    for id in &plan.selection.selected {
        let container = port
            .containers()
            .iter()
            .find(|c| c.id() == *id)
            .ok_or(Error::ContainerNotAtPort {
                container: *id,
                port: plan.port,
            })?;
        totals = totals
            .admit(container, vessel.attributes(), config)
            .map_err(|limit| Error::CapacityExceeded {
                ship: plan.ship,
                container: *id,
                limit,
            })?;
    }

    let moved = fleet
        .port_mut(plan.port)?
        .take_containers(&plan.selection.selected);
    fleet.ship_mut(plan.ship)?.push_containers(moved);

    debug!(
        ship = plan.ship,
        port = plan.port,
        loaded = plan.selection.selected.len(),
        skipped = plan.selection.skipped.len(),
        weight_kg = totals.weight_kg,
        "loaded containers"
    );

    Ok(LoadReport {
        ship: plan.ship,
        port: plan.port,
        loaded: plan.selection.selected.clone(),
        skipped: plan.selection.skipped.clone(),
        totals,
    })
}

/// Undo an [`apply_load`] whose voyage did not happen.
///
/// The loaded containers come off the ship and the port queue is put back to
/// `queue`, the order it had before the load.
pub(crate) fn revert_load(
    fleet: &mut Fleet,
    report: &LoadReport,
    queue: Vec<Container>,
) -> Result<()> {
    let vessel = fleet.ship_mut(report.ship)?;
    if vessel.port() != report.port {
        return Err(Error::ShipNotDocked {
            ship: report.ship,
            port: report.port,
        });
    }
    vessel.take_where(|c| report.loaded.contains(&c.id()));
    fleet.port_mut(report.port)?.restore_queue(queue);

    debug!(
        ship = report.ship,
        port = report.port,
        returned = report.loaded.len(),
        "reverted load"
    );
    Ok(())
}

/// Plan and apply a load in one call.
pub fn load_ship<F>(
    fleet: &mut Fleet,
    ship: ShipId,
    config: &LoadConfig,
    filter: F,
) -> Result<LoadReport>
where
    F: Fn(&Container) -> bool,
{
    let plan = plan_load(fleet, ship, config, filter)?;
    apply_load(fleet, &plan, config)
}

/// Move manifest containers matching `predicate` into the queue of the ship's port.
///
/// Returns the ids unloaded, in manifest order.
pub fn unload_ship<F>(fleet: &mut Fleet, ship: ShipId, predicate: F) -> Result<Vec<ContainerId>>
where
    F: FnMut(&Container) -> bool,
{
    let vessel = fleet.ship_mut(ship)?;
    let port_id = vessel.port();
    let unloaded = vessel.take_where(predicate);
    let ids: Vec<_> = unloaded.iter().map(Container::id).collect();

    let port = fleet.port_mut(port_id)?;
    for container in unloaded {
        port.push_container(container);
    }

    if !ids.is_empty() {
        debug!(ship, port = port_id, unloaded = ids.len(), "unloaded containers");
    }
    Ok(ids)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::ContainerKind;
    use crate::port::Port;
    use crate::ship::Ship;

    fn piraeus_fleet() -> Fleet {
        let mut piraeus = Port::new(0, "Piraeus", 37.94, 23.65).unwrap();
        piraeus.push_container(Container::new(1, ContainerKind::Standard, 1000.0).unwrap());
        piraeus.push_container(Container::new(2, ContainerKind::Refrigerated, 500.0).unwrap());
        piraeus.push_container(Container::new(3, ContainerKind::Liquid, 2000.0).unwrap());
        let attrs = ShipAttributes {
            name: "S0".to_string(),
            fuel_per_km: 0.0,
            max_weight_kg: 3000.0,
            max_containers: 2,
            max_heavy_containers: 1,
        };
        let ship = Ship::new(0, attrs, 0, 1000.0).unwrap();
        Fleet::new(vec![piraeus], vec![ship]).unwrap()
    }

    #[test]
    fn greedy_load_skips_container_over_count_limit() {
        let mut fleet = piraeus_fleet();
        let report = load_ship(&mut fleet, 0, &LoadConfig::default(), |_| true).unwrap();

        assert_eq!(report.loaded, [1, 2]);
        assert_eq!(
            report.skipped,
            [SkippedContainer {
                container: 3,
                limit: CapacityLimit::Count
            }]
        );
        assert_eq!(report.totals.weight_kg, 1500.0);
        assert_eq!(report.totals.count, 2);

        let port = fleet.port(0).unwrap();
        assert_eq!(port.containers().len(), 1);
        assert!(port.has_container(3));
        assert_eq!(fleet.ship(0).unwrap().manifest().len(), 2);
    }

    #[test]
    fn heavy_limit_applies_with_low_threshold() {
        let mut fleet = piraeus_fleet();
        let config = LoadConfig {
            heavy_threshold_kg: 400.0,
        };
        let report = load_ship(&mut fleet, 0, &config, |_| true).unwrap();

        assert_eq!(report.loaded, [1]);
        assert_eq!(report.skipped[0].limit, CapacityLimit::HeavyCount);
        assert_eq!(report.totals.heavy, 1);
    }

    #[test]
    fn filter_restricts_candidates() {
        let mut fleet = piraeus_fleet();
        let report = load_ship(&mut fleet, 0, &LoadConfig::default(), |c| {
            c.kind() == ContainerKind::Liquid
        })
        .unwrap();
        assert_eq!(report.loaded, [3]);
        assert!(report.skipped.is_empty());
    }

    #[test]
    fn stale_plan_is_rejected_without_mutation() {
        let mut fleet = piraeus_fleet();
        let config = LoadConfig::default();
        let plan = plan_load(&fleet, 0, &config, |_| true).unwrap();
        load_ship(&mut fleet, 0, &config, |c| c.id() == 1).unwrap();

        let before = fleet.clone();
        let err = apply_load(&mut fleet, &plan, &config).unwrap_err();
        assert!(matches!(err, Error::ContainerNotAtPort { container: 1, .. }));
        assert_eq!(fleet, before);
    }

    #[test]
    fn reverted_load_restores_queue_order() {
        let mut fleet = piraeus_fleet();
        let config = LoadConfig::default();
        let before = fleet.clone();
        let queue = fleet.port(0).unwrap().containers().to_vec();

        let report = load_ship(&mut fleet, 0, &config, |c| c.id() == 2).unwrap();
        assert_eq!(report.loaded, [2]);
        revert_load(&mut fleet, &report, queue).unwrap();

        assert_eq!(fleet, before);
    }

    #[test]
    fn unload_returns_containers_to_port() {
        let mut fleet = piraeus_fleet();
        load_ship(&mut fleet, 0, &LoadConfig::default(), |_| true).unwrap();

        let unloaded = unload_ship(&mut fleet, 0, |c| c.id() == 2).unwrap();
        assert_eq!(unloaded, [2]);
        assert!(fleet.port(0).unwrap().has_container(2));
        assert_eq!(fleet.ship(0).unwrap().manifest_ids(), [1]);
    }

    #[test]
    fn selection_is_independent_of_queue_order() {
        let attrs = ShipAttributes {
            name: "S1".to_string(),
            fuel_per_km: 0.0,
            max_weight_kg: 1500.0,
            max_containers: 5,
            max_heavy_containers: 0,
        };
        let queue = vec![
            Container::new(9, ContainerKind::Standard, 1000.0).unwrap(),
            Container::new(4, ContainerKind::Standard, 1000.0).unwrap(),
        ];
        let selection = select_containers(&attrs, &[], &queue, &LoadConfig::default(), |_| true);
        assert_eq!(selection.selected, [4]);
        assert_eq!(selection.skipped[0].container, 9);
    }
}
