use super::*;

pub use usecases::{ImportLocation, ImportSummary};

/// Imports previously exported locations of a user.
///
/// Either all or none of the locations are imported.
pub fn import_locations(
    storage: &Storage,
    user_id: &str,
    locations: Vec<ImportLocation>,
) -> Result<ImportSummary> {
    storage.write(|repo| usecases::import_locations(repo, user_id, locations))
}

/// All locations of a user in the order they are exported.
pub fn export_locations(storage: &Storage, user_id: &str) -> Result<Vec<Location>> {
    let locations = storage.read(|repo| usecases::load_locations_of_user(repo, user_id))?;
    log::info!(
        "Exporting {} location(s) of user {user_id}",
        locations.len()
    );
    Ok(locations)
}
