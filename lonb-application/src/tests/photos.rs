use super::prelude::*;

fn storage_with_location() -> (Storage, Location) {
    let storage = sqlite_storage();
    let location =
        flows::create_location(&storage, None, "alice", new_location("Park", 52.5, 13.4))
            .unwrap();
    (storage, location)
}

#[test]
fn upload_and_delete_photos() {
    let (storage, location) = storage_with_location();
    let photo_storage = FakePhotoStorage::default();

    let photos = flows::upload_photos(
        &storage,
        &photo_storage,
        "alice",
        location.id.as_str(),
        vec![jpeg("a.jpg"), jpeg("b.jpg")],
    )
    .unwrap();
    assert_eq!(2, photos.len());
    assert_eq!("a.jpg", photos[0].original_name);
    assert_eq!(2, photo_storage.uploaded.lock().len());

    let public_id = photos[0].public_id.clone();
    let deleted = flows::delete_photo(
        &storage,
        &photo_storage,
        "alice",
        location.id.as_str(),
        &public_id,
    )
    .unwrap();
    assert_eq!(public_id, deleted.public_id);
    assert_eq!(vec![public_id], *photo_storage.deleted.lock());

    let stored = flows::load_locations(&storage, "alice").unwrap();
    assert_eq!(1, stored[0].photos.len());
    assert_eq!("b.jpg", stored[0].photos[0].original_name);
}

#[test]
fn invalid_batches_are_not_uploaded() {
    let (storage, location) = storage_with_location();
    let photo_storage = FakePhotoStorage::default();

    let too_many = (0..6).map(|i| jpeg(&format!("{i}.jpg"))).collect();
    let err = flows::upload_photos(
        &storage,
        &photo_storage,
        "alice",
        location.id.as_str(),
        too_many,
    )
    .unwrap_err();
    assert!(matches!(
        err,
        AppError::Business(usecases::Error::TooManyPhotos { .. })
    ));

    let mut pdf = jpeg("doc.pdf");
    pdf.content_type = "application/pdf".into();
    let err = flows::upload_photos(
        &storage,
        &photo_storage,
        "alice",
        location.id.as_str(),
        vec![jpeg("ok.jpg"), pdf],
    )
    .unwrap_err();
    assert!(matches!(
        err,
        AppError::Business(usecases::Error::PhotoType(_))
    ));
    assert!(photo_storage.uploaded.lock().is_empty());
}

#[test]
fn photos_of_foreign_locations_are_not_uploaded() {
    let (storage, location) = storage_with_location();
    let photo_storage = FakePhotoStorage::default();
    let err = flows::upload_photos(
        &storage,
        &photo_storage,
        "bob",
        location.id.as_str(),
        vec![jpeg("a.jpg")],
    )
    .unwrap_err();
    assert!(matches!(
        err,
        AppError::Business(usecases::Error::LocationNotFound)
    ));
    assert!(photo_storage.uploaded.lock().is_empty());
}

#[test]
fn failed_upload_discards_previous_uploads() {
    let (storage, location) = storage_with_location();
    let photo_storage = FakePhotoStorage {
        fail_upload_after: Some(1),
        ..Default::default()
    };
    let err = flows::upload_photos(
        &storage,
        &photo_storage,
        "alice",
        location.id.as_str(),
        vec![jpeg("a.jpg"), jpeg("b.jpg")],
    )
    .unwrap_err();
    assert!(matches!(err, AppError::Other(_)));
    assert_eq!(*photo_storage.uploaded.lock(), *photo_storage.deleted.lock());
    let stored = flows::load_locations(&storage, "alice").unwrap();
    assert!(stored[0].photos.is_empty());
}

#[test]
fn delete_missing_photo() {
    let (storage, location) = storage_with_location();
    let photo_storage = FakePhotoStorage::default();
    let err = flows::delete_photo(
        &storage,
        &photo_storage,
        "alice",
        location.id.as_str(),
        "unknown",
    )
    .unwrap_err();
    assert!(matches!(
        err,
        AppError::Business(usecases::Error::PhotoNotFound)
    ));
    assert!(photo_storage.deleted.lock().is_empty());
}
