mod common;

use common::{fixture_fleet, TestDataset};
use portfleet_lib::{load_fleet, ContainerKind, ContainerLocation, Error};

#[test]
fn fixture_dataset_loads() {
    let fleet = fixture_fleet();

    assert_eq!(fleet.ports().count(), 5);
    assert_eq!(fleet.ship_ids(), [0, 1, 2]);
    assert_eq!(fleet.container_count(), 14);

    let new_york = fleet.resolve_port("new york").expect("port resolves");
    assert_eq!(new_york, 4);
    assert_eq!(fleet.ship(2).unwrap().fuel(), 0.0);
    assert_eq!(fleet.ship(1).unwrap().attributes().max_heavy_containers, 3);
}

#[test]
fn containers_without_port_start_at_hub() {
    let fleet = fixture_fleet();
    assert_eq!(fleet.locate_container(12), Some(ContainerLocation::Port(0)));

    let piraeus = fleet.port(0).unwrap();
    let unrouted = piraeus
        .containers()
        .iter()
        .find(|c| c.id() == 10)
        .expect("container 10 at Piraeus");
    assert_eq!(unrouted.destination(), None);
    assert_eq!(unrouted.kind(), ContainerKind::Standard);
}

#[test]
fn missing_file_is_an_io_error() {
    let dataset = TestDataset::new();
    std::fs::remove_file(dataset.dir.path().join("ships.csv")).unwrap();
    assert!(matches!(load_fleet(dataset.dir.path()), Err(Error::Io(_))));
}

#[test]
fn bad_rows_name_file_and_row() {
    let dataset = TestDataset::new();
    dataset.write(
        "containers.csv",
        "id,kind,weight,port,destination\n1,standard,1000,Piraeus,Rotterdam\n2,standard,abc,Piraeus,\n",
    );

    let err = load_fleet(dataset.dir.path()).unwrap_err();
    let message = err.to_string();
    assert!(matches!(err, Error::DatasetParse { .. }));
    assert!(message.contains("containers.csv"), "{message}");
    assert!(message.contains("row 3: invalid weight 'abc'"), "{message}");
}

#[test]
fn unknown_destination_suggests_port() {
    let dataset = TestDataset::new();
    dataset.write(
        "containers.csv",
        "id,kind,weight,port,destination\n1,standard,1000,Piraeus,Singapur\n",
    );

    let message = load_fleet(dataset.dir.path()).unwrap_err().to_string();
    assert!(message.contains("Did you mean 'Singapore'?"), "{message}");
}
