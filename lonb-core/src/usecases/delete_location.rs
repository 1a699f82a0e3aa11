use super::{load_locations::load_owned_location, prelude::*};
use crate::repositories;

/// Deletes a location of the given user and returns it,
/// including all photos that still need to be removed
/// from the storage provider.
pub fn delete_location<R>(repo: &R, user_id: &str, id: &str) -> Result<Location>
where
    R: LocationRepo + ?Sized,
{
    let location = load_owned_location(repo, user_id, id)?;
    repo.delete_location(location.id.as_str())
        .map_err(|err| match err {
            repositories::Error::NotFound => Error::LocationNotFound,
            err => Error::Repo(err),
        })?;
    log::debug!(
        "Deleted location {} with {} photo(s)",
        location.id,
        location.photos.len()
    );
    Ok(location)
}
