use std::result;

use rocket::{
    self, catch, catchers,
    http::Status,
    response::{self, Responder},
    routes,
    serde::json::{Error as JsonError, Json},
    Catcher, Request, Route,
};

use super::{guards::*, Cfg};
use crate::adapters::json::{ApiResponse, RouteNotFound};

mod auth;
mod error;
mod geocoding;
mod locations;
mod photos;
mod system;

pub use self::error::{Error as ApiError, OnServerError};


type Result<T> = result::Result<Json<T>, ApiError>;
type JsonResult<'a, T> = result::Result<Json<T>, JsonError<'a>>;

pub fn routes() -> Vec<Route> {
    routes![
        // ---   auth   --- //
        auth::get_google_login,
        auth::get_google_callback,
        auth::get_current_user,
        auth::post_logout,
        // ---   locations   --- //
        locations::get_locations,
        locations::post_location,
        locations::delete_location,
        locations::get_export,
        locations::post_import,
        // ---   photos   --- //
        photos::post_photos,
        photos::post_photos_without_form,
        photos::delete_photo,
        // ---   geocoding   --- //
        geocoding::get_reverse_geocoding,
        // ---   system   --- //
        system::get_health,
        system::get_cloudinary_test,
    ]
}

pub fn catchers() -> Vec<Catcher> {
    catchers![unauthorized, not_found, server_error, default_catcher]
}

/// Runs blocking work (database access, HTTP gateways) outside of the async runtime.
async fn blocking<T, F>(f: F) -> result::Result<T, ApiError>
where
    F: FnOnce() -> result::Result<T, ApiError> + Send + 'static,
    T: Send + 'static,
{
    rocket::tokio::task::spawn_blocking(f)
        .await
        .map_err(|err| ApiError::Other(err.into()))?
}

fn json_error_response<'r, 'o: 'r>(
    req: &'r Request<'_>,
    message: &str,
    detail: Option<String>,
    status: Status,
) -> response::Result<'o> {
    let development = req
        .rocket()
        .state::<Cfg>()
        .is_some_and(|cfg| cfg.environment.is_development());
    let error = detail.filter(|_| development);
    Json(ApiResponse::failure(message, error))
        .respond_to(req)
        .map(|mut res| {
            res.set_status(status);
            res
        })
}

#[catch(401)]
fn unauthorized(req: &Request) -> Json<ApiResponse<()>> {
    let AuthFailure(err) = req.local_cache(AuthFailure::default);
    let message = err.unwrap_or(AuthError::MissingToken).message();
    Json(ApiResponse::failure(message, None))
}

#[catch(404)]
fn not_found(req: &Request) -> Json<RouteNotFound> {
    Json(RouteNotFound {
        success: false,
        message: "API endpoint not found".into(),
        requested_path: req.uri().to_string(),
        method: req.method().to_string(),
    })
}

#[catch(500)]
fn server_error() -> Json<ApiResponse<()>> {
    Json(ApiResponse::failure(error::SERVER_ERROR, None))
}

#[catch(default)]
fn default_catcher(status: Status, _: &Request) -> Json<ApiResponse<()>> {
    let message = status.reason().unwrap_or(error::SERVER_ERROR);
    Json(ApiResponse::failure(message, None))
}
