use super::*;

pub fn load_locations(storage: &Storage, user_id: &str) -> Result<Vec<Location>> {
    storage.read(|repo| usecases::load_locations_of_user(repo, user_id))
}

/// All locations of a user, each with its distance from the given position.
pub fn load_locations_with_distance(
    storage: &Storage,
    user_id: &str,
    origin: MapPoint,
) -> Result<Vec<(Location, Distance)>> {
    let locations = load_locations(storage, user_id)?;
    Ok(locations
        .into_iter()
        .map(|location| {
            let distance = origin.distance_to(&location.pos);
            (location, distance)
        })
        .collect())
}
