use super::*;
use lonb_core::gateways::geocode::ReverseGeoCodingGateway;

pub fn create_location(
    storage: &Storage,
    geocoding: Option<&dyn ReverseGeoCodingGateway>,
    user_id: &str,
    new_location: usecases::NewLocation,
) -> Result<Location> {
    let mut storable = usecases::prepare_new_location(user_id, new_location)?;

    // Resolve the address before locking the storage for writing
    if let Some(geocoding) = geocoding.filter(|_| storable.needs_address()) {
        let pos = storable.location().pos;
        if let Some(address) = geocoding.resolve_lat_lng_address(pos) {
            storable.set_address(address);
        } else {
            log::info!("No address found for {}", pos.to_lat_lng_string());
        }
    }

    let location = storage.write(|repo| usecases::store_new_location(repo, storable))?;
    log::info!(
        "Created location {} for user {} in {} storage",
        location.id,
        user_id,
        storage.source()
    );
    Ok(location)
}
