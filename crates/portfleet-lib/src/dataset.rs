//! CSV dataset loading.
//!
//! A dataset is a directory holding three files:
//!
//! - `ports.csv`: `id,name,lat,lon`
//! - `ships.csv`: `id,name,fuel_per_km,max_weight,max_containers,max_heavy_containers,port[,fuel]`
//! - `containers.csv`: `id,kind,weight[,port][,destination]`
//!
//! Headers are matched case-insensitively with a few synonyms, fields are
//! trimmed, and ports are referenced by name. Containers without a `port`
//! column start at the first port listed in `ports.csv`.

use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use csv::{ReaderBuilder, StringRecord, Trim};
use tracing::{debug, info};

use crate::container::{Container, ContainerKind};
use crate::error::{Error, Result};
use crate::fleet::Fleet;
use crate::port::{Port, PortId};
use crate::ship::{Ship, ShipAttributes};

/// Environment variable naming the default dataset directory.
pub const DATA_DIR_ENV: &str = "PORTFLEET_DATA_DIR";

pub const PORTS_FILE: &str = "ports.csv";
pub const SHIPS_FILE: &str = "ships.csv";
pub const CONTAINERS_FILE: &str = "containers.csv";

/// Paths to the three dataset files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetPaths {
    pub ports: PathBuf,
    pub ships: PathBuf,
    pub containers: PathBuf,
}

impl DatasetPaths {
    /// The standard file names inside `dir`.
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            ports: dir.join(PORTS_FILE),
            ships: dir.join(SHIPS_FILE),
            containers: dir.join(CONTAINERS_FILE),
        }
    }
}

/// Resolve the dataset directory: explicit path, then `PORTFLEET_DATA_DIR`, then `.`.
pub fn resolve_data_dir(explicit: Option<&Path>) -> PathBuf {
    if let Some(path) = explicit {
        return path.to_path_buf();
    }
    if let Some(env_path) = env::var_os(DATA_DIR_ENV) {
        let path = PathBuf::from(env_path);
        debug!(path = %path.display(), env = DATA_DIR_ENV, "using dataset directory from environment");
        return path;
    }
    PathBuf::from(".")
}

/// Load a fleet from the dataset files in `dir`.
pub fn load_fleet(dir: &Path) -> Result<Fleet> {
    load_fleet_from_paths(&DatasetPaths::in_dir(dir))
}

pub fn load_fleet_from_paths(paths: &DatasetPaths) -> Result<Fleet> {
    let fleet = fleet_from_readers(
        Source::new(&paths.ports, fs::File::open(&paths.ports)?),
        Source::new(&paths.ships, fs::File::open(&paths.ships)?),
        Source::new(&paths.containers, fs::File::open(&paths.containers)?),
    )?;

    info!(
        ports = fleet.ports().count(),
        ships = fleet.ship_ids().len(),
        containers = fleet.container_count(),
        path = %paths.ports.parent().unwrap_or(Path::new(".")).display(),
        "loaded dataset"
    );
    Ok(fleet)
}

/// A named CSV input; the name is used in error messages.
#[derive(Debug)]
pub struct Source<R> {
    path: PathBuf,
    reader: R,
}

impl<R: Read> Source<R> {
    pub fn new(path: impl Into<PathBuf>, reader: R) -> Self {
        Self {
            path: path.into(),
            reader,
        }
    }
}

/// Build a fleet from three CSV sources.
pub fn fleet_from_readers<P, S, C>(
    ports: Source<P>,
    ships: Source<S>,
    containers: Source<C>,
) -> Result<Fleet>
where
    P: Read,
    S: Read,
    C: Read,
{
    let ports = parse_ports(ports)?;
    let hub = ports.first().map(Port::id);
    let mut fleet = Fleet::new(ports, Vec::new())?;

    let ships = parse_ships(ships, &fleet)?;
    let mut placements = Vec::new();
    parse_containers(containers, &fleet, hub, &mut placements)?;

    let ports: Vec<Port> = fleet.ports().cloned().collect();
    fleet = Fleet::new(ports, ships)?;
    for (port, container) in placements {
        fleet.place_container(port, container)?;
    }
    Ok(fleet)
}

const PORT_COLUMNS: &[(&str, &[&str])] = &[
    ("id", &["id", "port_id"]),
    ("name", &["name", "port", "port_name"]),
    ("lat", &["lat", "latitude"]),
    ("lon", &["lon", "lng", "long", "longitude"]),
];

const SHIP_COLUMNS: &[(&str, &[&str])] = &[
    ("id", &["id", "ship_id"]),
    ("name", &["name", "ship_name"]),
    (
        "fuel_per_km",
        &["fuel_per_km", "fuel_consumption_per_km", "fuelperkm"],
    ),
    ("max_weight", &["max_weight", "max_weight_kg", "total_weight_capacity"]),
    (
        "max_containers",
        &["max_containers", "max_number_of_all_containers"],
    ),
    (
        "max_heavy_containers",
        &["max_heavy_containers", "max_number_of_heavy_containers"],
    ),
    ("port", &["port", "current_port", "port_name"]),
    ("fuel", &["fuel", "initial_fuel"]),
];

const CONTAINER_COLUMNS: &[(&str, &[&str])] = &[
    ("id", &["id", "container_id"]),
    ("kind", &["kind", "type", "category"]),
    ("weight", &["weight", "weight_kg"]),
    ("port", &["port", "origin", "port_name"]),
    ("destination", &["destination", "dest", "destination_port"]),
];

fn parse_ports<R: Read>(source: Source<R>) -> Result<Vec<Port>> {
    let mut table = Table::open(source, PORT_COLUMNS, &["id", "name", "lat", "lon"])?;
    let mut ports = Vec::new();
    while let Some(row) = table.next_row()? {
        let id = row.parse("id")?;
        let name = row.required("name")?;
        let lat = row.parse("lat")?;
        let lon = row.parse("lon")?;
        ports.push(Port::new(id, name, lat, lon).map_err(|err| row.error(err))?);
    }
    debug!(count = ports.len(), "parsed ports");
    Ok(ports)
}

fn parse_ships<R: Read>(source: Source<R>, fleet: &Fleet) -> Result<Vec<Ship>> {
    let required = [
        "id",
        "name",
        "fuel_per_km",
        "max_weight",
        "max_containers",
        "max_heavy_containers",
        "port",
    ];
    let mut table = Table::open(source, SHIP_COLUMNS, &required)?;
    let mut ships = Vec::new();
    while let Some(row) = table.next_row()? {
        let attributes = ShipAttributes {
            name: row.required("name")?.to_string(),
            fuel_per_km: row.parse("fuel_per_km")?,
            max_weight_kg: row.parse("max_weight")?,
            max_containers: row.parse("max_containers")?,
            max_heavy_containers: row.parse("max_heavy_containers")?,
        };
        let port = fleet
            .resolve_port(row.required("port")?)
            .map_err(|err| row.error(err))?;
        let fuel = row.parse_optional("fuel")?.unwrap_or(0.0);
        let ship = Ship::new(row.parse("id")?, attributes, port, fuel).map_err(|err| row.error(err))?;
        ships.push(ship);
    }
    debug!(count = ships.len(), "parsed ships");
    Ok(ships)
}

fn parse_containers<R: Read>(
    source: Source<R>,
    fleet: &Fleet,
    hub: Option<PortId>,
    placements: &mut Vec<(PortId, Container)>,
) -> Result<()> {
    let mut table = Table::open(source, CONTAINER_COLUMNS, &["id", "kind", "weight"])?;
    while let Some(row) = table.next_row()? {
        let kind: ContainerKind = row.parse("kind")?;
        let mut container =
            Container::new(row.parse("id")?, kind, row.parse("weight")?).map_err(|err| row.error(err))?;

        let port = match row.optional("port") {
            Some(name) => fleet.resolve_port(name).map_err(|err| row.error(err))?,
            None => hub.ok_or_else(|| row.message("no ports defined to place container at"))?,
        };
        if let Some(name) = row.optional("destination") {
            let destination = fleet.resolve_port(name).map_err(|err| row.error(err))?;
            container = container.with_destination(destination);
        }
        placements.push((port, container));
    }
    debug!(count = placements.len(), "parsed containers");
    Ok(())
}

/// A CSV file with its columns mapped to canonical field names.
struct Table<R> {
    path: PathBuf,
    reader: csv::Reader<R>,
    columns: BTreeMap<&'static str, usize>,
    record: StringRecord,
    row: usize,
}

impl<R: Read> Table<R> {
    fn open(
        source: Source<R>,
        synonyms: &[(&'static str, &[&str])],
        required: &[&str],
    ) -> Result<Self> {
        let path = source.path;
        let mut reader = ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .from_reader(source.reader);

        let headers = reader
            .headers()
            .map_err(|err| Error::DatasetParse {
                path: path.clone(),
                message: format!("failed to read headers: {err}"),
            })?
            .clone();
        let normalized: Vec<String> = headers.iter().map(normalize_header).collect();

        let mut columns = BTreeMap::new();
        for (canonical, alternatives) in synonyms {
            if let Some(index) = alternatives
                .iter()
                .find_map(|alt| normalized.iter().position(|h| h == &normalize_header(alt)))
            {
                columns.insert(*canonical, index);
            }
        }

        let missing: Vec<&str> = required
            .iter()
            .copied()
            .filter(|field| !columns.contains_key(field))
            .collect();
        if !missing.is_empty() {
            return Err(Error::DatasetParse {
                path,
                message: format!(
                    "missing required columns: {}. Available: {}",
                    missing.join(", "),
                    headers.iter().collect::<Vec<_>>().join(", ")
                ),
            });
        }

        Ok(Self {
            path,
            reader,
            columns,
            record: StringRecord::new(),
            // header is line 1
            row: 1,
        })
    }

    fn next_row(&mut self) -> Result<Option<Row<'_>>> {
        loop {
            let more = self
                .reader
                .read_record(&mut self.record)
                .map_err(|err| Error::DatasetParse {
                    path: self.path.clone(),
                    message: err.to_string(),
                })?;
            if !more {
                return Ok(None);
            }
            self.row += 1;
            if self.record.iter().any(|field| !field.is_empty()) {
                break;
            }
        }

        Ok(Some(Row {
            path: &self.path,
            columns: &self.columns,
            record: &self.record,
            row: self.row,
        }))
    }
}

struct Row<'a> {
    path: &'a Path,
    columns: &'a BTreeMap<&'static str, usize>,
    record: &'a StringRecord,
    row: usize,
}

impl Row<'_> {
    fn optional(&self, field: &str) -> Option<&str> {
        self.columns
            .get(field)
            .and_then(|&i| self.record.get(i))
            .filter(|value| !value.is_empty())
    }

    fn required(&self, field: &str) -> Result<&str> {
        self.optional(field)
            .ok_or_else(|| self.message(format!("missing {field}")))
    }

    fn parse<T>(&self, field: &str) -> Result<T>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        let value = self.required(field)?;
        value
            .parse()
            .map_err(|err| self.message(format!("invalid {field} '{value}': {err}")))
    }

    fn parse_optional<T>(&self, field: &str) -> Result<Option<T>>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        self.optional(field).map(|_| self.parse(field)).transpose()
    }

    fn message(&self, message: impl std::fmt::Display) -> Error {
        Error::DatasetParse {
            path: self.path.to_path_buf(),
            message: format!("row {}: {message}", self.row),
        }
    }

    fn error(&self, err: Error) -> Error {
        self.message(err)
    }
}

fn normalize_header(header: &str) -> String {
    header
        .to_ascii_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
        .collect()
}
