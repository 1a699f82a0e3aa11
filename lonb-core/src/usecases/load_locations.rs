use super::prelude::*;
use crate::repositories;

/// All locations of a user, newest first.
pub fn load_locations_of_user<R>(repo: &R, user_id: &str) -> Result<Vec<Location>>
where
    R: LocationRepo + ?Sized,
{
    let mut locations = repo.get_locations_of_user(user_id)?;
    debug_assert!(locations.iter().all(|l| l.is_owned_by(user_id)));
    locations.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Ok(locations)
}

/// Loads a location on behalf of a user.
///
/// Locations of other users are reported as missing.
pub fn load_owned_location<R>(repo: &R, user_id: &str, id: &str) -> Result<Location>
where
    R: LocationRepo + ?Sized,
{
    match repo.get_location(id) {
        Ok(location) if location.is_owned_by(user_id) => Ok(location),
        Ok(_) => {
            log::debug!("Denied access to location {id} for user {user_id}");
            Err(Error::LocationNotFound)
        }
        Err(repositories::Error::NotFound) => Err(Error::LocationNotFound),
        Err(err) => Err(err.into()),
    }
}
