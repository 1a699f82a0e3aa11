use std::{io, sync::Arc};

use lonb_application::prelude as flows;
use lonb_core::{
    gateways::photos::{NewPhoto, PhotoStorageGateway},
    usecases::Error as ParameterError,
};
use rocket::{
    delete,
    form::{Errors, Form, FromForm},
    fs::TempFile,
    post,
    tokio::io::AsyncReadExt,
    State,
};

use super::*;
use crate::{
    adapters::json::{self, to_json},
    web::storage::Storage,
};

#[derive(FromForm)]
pub struct PhotoUpload<'r> {
    #[field(default = Vec::new())]
    photos: Vec<TempFile<'r>>,
}

fn configured(
    photo_storage: &PhotoStorage,
) -> result::Result<Arc<dyn PhotoStorageGateway + Send + Sync>, ApiError> {
    photo_storage.0.clone().ok_or_else(|| {
        ApiError::WithStatus(
            Status::InternalServerError,
            "Photo storage is not configured".into(),
        )
    })
}

async fn read_photo(file: &TempFile<'_>) -> io::Result<NewPhoto> {
    let original_name = file
        .raw_name()
        .map(|name| name.dangerous_unsafe_unsanitized_raw().as_str().to_owned())
        .unwrap_or_default();
    let content_type = file
        .content_type()
        .map(ToString::to_string)
        .unwrap_or_default();
    let mut data = Vec::with_capacity(usize::try_from(file.len()).unwrap_or_default());
    let reader = file.open().await?;
    rocket::tokio::pin!(reader);
    reader.read_to_end(&mut data).await?;
    Ok(NewPhoto {
        original_name,
        content_type,
        data,
    })
}

#[post("/locations/<location_id>/photos", data = "<upload>")]
pub async fn post_photos(
    auth: Auth,
    storage: Storage,
    photo_storage: &State<PhotoStorage>,
    location_id: String,
    upload: result::Result<Form<PhotoUpload<'_>>, Errors<'_>>,
) -> result::Result<(Status, Json<ApiResponse<json::UploadedPhotos>>), ApiError> {
    let upload = upload.map_err(|errs| {
        debug!("Rejected photo upload: {errs}");
        ApiError::bad_request(format!("Invalid photo upload: {errs}"))
    })?;
    let photo_storage = configured(photo_storage)?;

    let mut new_photos = Vec::with_capacity(upload.photos.len());
    for file in &upload.photos {
        let photo = read_photo(file)
            .await
            .on_server_error("Failed to upload photos")?;
        new_photos.push(photo);
    }

    let user_id = auth.user.google_id;
    blocking(move || {
        let photos = flows::upload_photos(
            &storage,
            photo_storage.as_ref(),
            &user_id,
            &location_id,
            new_photos,
        )?;
        info!(
            "User {user_id} uploaded {} photo(s) to location {location_id}",
            photos.len()
        );
        let message = format!("{} photo(s) uploaded successfully", photos.len());
        let uploaded = json::UploadedPhotos {
            location_id,
            photos: to_json::photos(photos),
        };
        let response =
            ApiResponse::success(message, uploaded).with_source(storage.source().as_str());
        Ok((Status::Created, Json(response)))
    })
    .await
    .on_server_error("Failed to upload photos")
}

/// Uploads that are not sent as a form do not contain any photos.
#[post("/locations/<_>/photos", rank = 2)]
pub fn post_photos_without_form(_auth: Auth) -> result::Result<(), ApiError> {
    Err(ParameterError::NoPhotos.into())
}

#[delete("/locations/<location_id>/photos/<photo_id>")]
pub async fn delete_photo(
    auth: Auth,
    storage: Storage,
    photo_storage: &State<PhotoStorage>,
    location_id: String,
    photo_id: String,
) -> Result<ApiResponse<json::DeletedPhoto>> {
    let photo_storage = configured(photo_storage)?;
    let user_id = auth.user.google_id;
    blocking(move || {
        let photo = flows::delete_photo(
            &storage,
            photo_storage.as_ref(),
            &user_id,
            &location_id,
            &photo_id,
        )?;
        info!(
            "User {user_id} deleted photo {} of location {location_id}",
            photo.public_id
        );
        let deleted = json::DeletedPhoto {
            location_id,
            deleted_photo_id: photo.public_id,
        };
        Ok(Json(
            ApiResponse::success("Photo deleted successfully", deleted)
                .with_source(storage.source().as_str()),
        ))
    })
    .await
    .on_server_error("Failed to delete photo")
}
