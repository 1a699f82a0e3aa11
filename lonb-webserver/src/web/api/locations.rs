use lonb_application::prelude as flows;
use lonb_core::{
    entities::MapPoint,
    gateways::{geocode::ReverseGeoCodingGateway, photos::PhotoStorageGateway},
    usecases::Error as ParameterError,
};
use rocket::{delete, get, post, State};

use super::*;
use crate::{
    adapters::json::{self, from_json, to_json},
    web::storage::Storage,
};

type Created<T> = result::Result<(Status, Json<T>), ApiError>;

#[get("/locations?<lat>&<lng>")]
pub async fn get_locations(
    auth: Auth,
    storage: Storage,
    lat: Option<f64>,
    lng: Option<f64>,
) -> Result<ApiResponse<Vec<json::Location>>> {
    let origin = match lat.zip(lng) {
        Some((lat, lng)) => {
            Some(MapPoint::try_from_lat_lng_deg(lat, lng).ok_or(ParameterError::Coordinates)?)
        }
        None => None,
    };
    let user_id = auth.user.google_id;
    blocking(move || {
        let locations: Vec<json::Location> = match origin {
            Some(origin) => flows::load_locations_with_distance(&storage, &user_id, origin)?
                .into_iter()
                .map(to_json::location_with_distance)
                .collect(),
            None => flows::load_locations(&storage, &user_id)?
                .into_iter()
                .map(json::Location::from)
                .collect(),
        };
        Ok(Json(
            ApiResponse::data(locations).with_source(storage.source().as_str()),
        ))
    })
    .await
    .on_server_error("Failed to retrieve locations")
}

#[post("/locations", data = "<new_location>")]
pub async fn post_location(
    auth: Auth,
    storage: Storage,
    geocoding: &State<GeoCoding>,
    cfg: &State<Cfg>,
    new_location: JsonResult<'_, json::NewLocation>,
) -> Created<ApiResponse<json::Location>> {
    let new_location = from_json::new_location(new_location?.into_inner());
    let geocoding = geocoding.0.clone().filter(|_| cfg.resolve_addresses);
    let user_id = auth.user.google_id;
    blocking(move || {
        let geocoding = geocoding
            .as_deref()
            .map(|gw| gw as &dyn ReverseGeoCodingGateway);
        let location = flows::create_location(&storage, geocoding, &user_id, new_location)?;
        info!("User {user_id} saved location {}", location.id);
        let response =
            ApiResponse::success("Location saved successfully", json::Location::from(location))
                .with_source(storage.source().as_str());
        Ok((Status::Created, Json(response)))
    })
    .await
    .on_server_error("Failed to save location")
}

#[delete("/locations/<id>")]
pub async fn delete_location(
    auth: Auth,
    storage: Storage,
    photo_storage: &State<PhotoStorage>,
    id: String,
) -> Result<ApiResponse<json::Location>> {
    let photo_storage = photo_storage.0.clone();
    let user_id = auth.user.google_id;
    blocking(move || {
        let photo_storage = photo_storage
            .as_deref()
            .map(|gw| gw as &dyn PhotoStorageGateway);
        let location = flows::delete_location(&storage, photo_storage, &user_id, &id)?;
        info!("User {user_id} deleted location {id}");
        let response =
            ApiResponse::success("Location deleted successfully", json::Location::from(location))
                .with_source(storage.source().as_str());
        Ok(Json(response))
    })
    .await
    .on_server_error("Failed to delete location")
}

#[get("/locations/export")]
pub async fn get_export(auth: Auth, storage: Storage) -> Result<Vec<json::Location>> {
    let user_id = auth.user.google_id;
    blocking(move || {
        let locations = flows::export_locations(&storage, &user_id)?;
        Ok(Json(locations.into_iter().map(json::Location::from).collect()))
    })
    .await
    .on_server_error("Failed to export locations")
}

#[post("/locations/import", data = "<entries>")]
pub async fn post_import(
    auth: Auth,
    storage: Storage,
    entries: JsonResult<'_, Vec<json::ImportLocation>>,
) -> Result<ApiResponse<json::ImportResult>> {
    let entries = entries
        .map_err(|err| {
            debug!("Rejected import: {err}");
            ApiError::bad_request("Invalid data format")
        })?
        .into_inner();
    let entries: Vec<_> = entries.into_iter().map(from_json::import_location).collect();
    let user_id = auth.user.google_id;
    blocking(move || {
        let summary = flows::import_locations(&storage, &user_id, entries)?;
        info!(
            "User {user_id} imported {} locations ({} new, {} updated)",
            summary.total(),
            summary.created,
            summary.updated
        );
        let result = json::ImportResult {
            imported: summary.total(),
            created: summary.created,
            updated: summary.updated,
        };
        let message = format!("{} location(s) imported successfully", result.imported);
        Ok(Json(
            ApiResponse::success(message, result).with_source(storage.source().as_str()),
        ))
    })
    .await
    .on_server_error("Failed to import locations")
}
