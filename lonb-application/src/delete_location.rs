use super::*;
use lonb_core::gateways::photos::PhotoStorageGateway;

/// Deletes a location and afterwards all of its photos.
///
/// Photos that could not be removed from the photo storage are
/// only logged.
pub fn delete_location(
    storage: &Storage,
    photo_storage: Option<&dyn PhotoStorageGateway>,
    user_id: &str,
    id: &str,
) -> Result<Location> {
    let location = storage.write(|repo| usecases::delete_location(repo, user_id, id))?;
    log::info!("Deleted location {} of user {user_id}", location.id);
    if location.photos.is_empty() {
        return Ok(location);
    }
    match photo_storage {
        Some(photo_storage) => {
            for photo in &location.photos {
                remove_stored_photo(photo_storage, &photo.public_id);
            }
        }
        None => {
            log::warn!(
                "Unable to remove {} photo(s) of location {}: photo storage is not configured",
                location.photos.len(),
                location.id
            );
        }
    }
    Ok(location)
}

pub(crate) fn remove_stored_photo(photo_storage: &dyn PhotoStorageGateway, public_id: &str) {
    match photo_storage.delete_photo(public_id) {
        Ok(()) => log::debug!("Removed photo {public_id} from photo storage"),
        Err(err) => log::warn!("Failed to remove photo {public_id} from photo storage: {err}"),
    }
}
