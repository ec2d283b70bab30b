//! Ship-related constants used across loading and fuel calculations.

/// Kilograms per metric tonne; container fuel coefficients are quoted per tonne.
pub const KG_PER_TONNE: f64 = 1000.0;

/// Default weight above which a container counts as heavy.
///
/// The fleet data carries no heavy-cargo classification of its own, so the
/// cutoff is an explicit, configurable value (see `LoadConfig`). A container is
/// heavy when its weight strictly exceeds this many kilograms.
pub const DEFAULT_HEAVY_THRESHOLD_KG: f64 = 3000.0;

/// Tolerance for comparing accumulated fuel totals, such as refuel
/// allowances and fuel burned per delivery.
///
/// Voyage feasibility never uses it: a ship must hold at least the required
/// fuel exactly.
pub const FUEL_EPSILON: f64 = 1e-9;
