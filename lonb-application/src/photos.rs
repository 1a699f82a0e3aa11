use super::*;
use crate::delete_location::remove_stored_photo;
use anyhow::Context as _;
use lonb_core::gateways::photos::{NewPhoto, PhotoStorageGateway};

/// Uploads photos and attaches them to a location of the user.
///
/// Nothing is uploaded if the batch is invalid or the location is not
/// accessible. Photos that have already been uploaded are removed
/// again if the batch cannot be stored completely.
pub fn upload_photos(
    storage: &Storage,
    photo_storage: &dyn PhotoStorageGateway,
    user_id: &str,
    location_id: &str,
    new_photos: Vec<NewPhoto>,
) -> Result<Vec<Photo>> {
    usecases::validate_new_photos(&new_photos)?;
    storage.read(|repo| usecases::load_owned_location(repo, user_id, location_id))?;

    let mut uploaded = Vec::with_capacity(new_photos.len());
    for new_photo in new_photos {
        let stored = photo_storage
            .upload_photo(&new_photo)
            .with_context(|| format!("Failed to upload photo '{}'", new_photo.original_name));
        match stored {
            Ok(stored) => {
                uploaded.push(usecases::new_photo(stored, new_photo.original_name));
            }
            Err(err) => {
                discard_uploaded_photos(photo_storage, &uploaded);
                return Err(err.into());
            }
        }
    }

    let photos = uploaded.clone();
    if let Err(err) =
        storage.write(|repo| usecases::add_photos(repo, user_id, location_id, photos))
    {
        discard_uploaded_photos(photo_storage, &uploaded);
        return Err(err);
    }
    log::info!(
        "Added {} photo(s) to location {location_id}",
        uploaded.len()
    );
    Ok(uploaded)
}

fn discard_uploaded_photos(photo_storage: &dyn PhotoStorageGateway, photos: &[Photo]) {
    for photo in photos {
        remove_stored_photo(photo_storage, &photo.public_id);
    }
}

/// Detaches a photo from a location and removes it from the photo storage.
pub fn delete_photo(
    storage: &Storage,
    photo_storage: &dyn PhotoStorageGateway,
    user_id: &str,
    location_id: &str,
    public_id: &str,
) -> Result<Photo> {
    let photo =
        storage.write(|repo| usecases::delete_photo(repo, user_id, location_id, public_id))?;
    remove_stored_photo(photo_storage, &photo.public_id);
    Ok(photo)
}
