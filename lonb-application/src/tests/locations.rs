use super::prelude::*;

#[test]
fn create_location_resolves_missing_address() {
    let storage = sqlite_storage();
    let geocoding = FixedAddress(Some("Königstraße 1, Stuttgart"));
    let location = flows::create_location(
        &storage,
        Some(&geocoding),
        "alice",
        new_location("Schlossplatz", 48.7784, 9.1800),
    )
    .unwrap();
    assert_eq!(Some("Königstraße 1, Stuttgart"), location.address.as_deref());

    let mut with_address = new_location("Hauptbahnhof", 48.7840, 9.1819);
    with_address.address = Some("Arnulf-Klett-Platz 2".into());
    let location =
        flows::create_location(&storage, Some(&geocoding), "alice", with_address).unwrap();
    assert_eq!(Some("Arnulf-Klett-Platz 2"), location.address.as_deref());
}

#[test]
fn create_location_without_resolved_address() {
    let storage = Storage::in_memory();
    let location = flows::create_location(
        &storage,
        Some(&FixedAddress(None)),
        "alice",
        new_location("Nowhere", 0.0, 0.0),
    )
    .unwrap();
    assert_eq!(None, location.address);
    let location =
        flows::create_location(&storage, None, "alice", new_location("Elsewhere", 1.0, 1.0))
            .unwrap();
    assert_eq!(None, location.address);
}

#[test]
fn invalid_location_is_not_stored() {
    let storage = sqlite_storage();
    let err = flows::create_location(&storage, None, "alice", new_location("x", 91.0, 0.0))
        .unwrap_err();
    assert!(matches!(
        err,
        AppError::Business(usecases::Error::Coordinates)
    ));
    assert_eq!(0, storage.count_locations().unwrap());
}

#[test]
fn users_only_see_their_own_locations() {
    let storage = sqlite_storage();
    let alice = flows::create_location(&storage, None, "alice", new_location("A", 1.0, 1.0))
        .unwrap();
    flows::create_location(&storage, None, "bob", new_location("B", 2.0, 2.0)).unwrap();

    let locations = flows::load_locations(&storage, "alice").unwrap();
    assert_eq!(1, locations.len());
    assert_eq!(alice.id, locations[0].id);

    let err = flows::delete_location(&storage, None, "bob", alice.id.as_str()).unwrap_err();
    assert!(matches!(
        err,
        AppError::Business(usecases::Error::LocationNotFound)
    ));
    assert_eq!(2, storage.count_locations().unwrap());
}

#[test]
fn locations_with_distance() {
    let storage = Storage::in_memory();
    flows::create_location(&storage, None, "alice", new_location("Mannheim", 49.4836, 8.4630))
        .unwrap();
    let stuttgart = MapPoint::try_from_lat_lng_deg(48.7755, 9.1827).unwrap();
    let locations = flows::load_locations_with_distance(&storage, "alice", stuttgart).unwrap();
    assert_eq!(1, locations.len());
    let km = locations[0].1.to_km();
    assert!(km > 94.0 && km < 95.0);
}

#[test]
fn delete_location_removes_photos_best_effort() {
    let storage = sqlite_storage();
    let location = Location::build()
        .id("a")
        .user_id("alice")
        .photo("p1")
        .photo("p2")
        .finish();
    storage
        .write(|repo| Ok(repo.create_location(&location)?))
        .unwrap();

    let photo_storage = FakePhotoStorage {
        fail_delete: true,
        ..Default::default()
    };
    let deleted = flows::delete_location(&storage, Some(&photo_storage), "alice", "a").unwrap();
    assert_eq!(2, deleted.photos.len());
    assert_eq!(vec!["p1", "p2"], *photo_storage.deleted.lock());
    assert_eq!(0, storage.count_locations().unwrap());
}

#[test]
fn import_and_export() {
    let storage = sqlite_storage();
    let existing =
        flows::create_location(&storage, None, "alice", new_location("Old", 1.0, 1.0)).unwrap();
    let entries = vec![
        usecases::ImportLocation {
            id: Some(existing.id.to_string()),
            location: new_location("Renamed", 1.0, 1.0),
            ..Default::default()
        },
        usecases::ImportLocation {
            location: new_location("New", 2.0, 2.0),
            created_at: Timestamp::try_from_millis(1_000),
            ..Default::default()
        },
    ];
    let summary = flows::import_locations(&storage, "alice", entries).unwrap();
    assert_eq!(1, summary.created);
    assert_eq!(1, summary.updated);

    let exported = flows::export_locations(&storage, "alice").unwrap();
    let names: Vec<_> = exported.iter().map(|l| l.name.as_str()).collect();
    assert_eq!(vec!["Renamed", "New"], names);
    assert!(flows::export_locations(&storage, "bob").unwrap().is_empty());
}

#[test]
fn failed_import_leaves_storage_untouched() {
    let storage = sqlite_storage();
    let entries = vec![
        usecases::ImportLocation {
            location: new_location("Valid", 2.0, 2.0),
            ..Default::default()
        },
        usecases::ImportLocation {
            location: usecases::NewLocation::default(),
            ..Default::default()
        },
    ];
    let err = flows::import_locations(&storage, "alice", entries).unwrap_err();
    assert!(matches!(
        err,
        AppError::Business(usecases::Error::MissingFields)
    ));
    assert_eq!(0, storage.count_locations().unwrap());
}
