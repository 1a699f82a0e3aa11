use lonb_core::{entities::MapPoint, usecases::Error as ParameterError};
use rocket::{get, State};

use super::*;
use crate::adapters::json;

#[get("/geocoding/reverse?<lat>&<lng>")]
pub async fn get_reverse_geocoding(
    _auth: Auth,
    geocoding: &State<GeoCoding>,
    lat: Option<f64>,
    lng: Option<f64>,
) -> Result<ApiResponse<json::ReverseGeocoding>> {
    let (lat, lng) = lat
        .zip(lng)
        .ok_or_else(|| ApiError::bad_request("Latitude and longitude are required"))?;
    let pos = MapPoint::try_from_lat_lng_deg(lat, lng).ok_or(ParameterError::Coordinates)?;
    let address = match geocoding.0.clone() {
        Some(gateway) => blocking(move || Ok(gateway.resolve_lat_lng_address(pos)))
            .await
            .on_server_error("Failed to resolve address")?,
        None => {
            debug!("Reverse geocoding is not configured");
            None
        }
    };
    Ok(Json(ApiResponse::data(json::ReverseGeocoding { address })))
}
