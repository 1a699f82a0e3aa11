use super::{load_locations::load_owned_location, prelude::*};
use crate::gateways::photos::{NewPhoto, StoredPhoto};

pub const MAX_PHOTOS_PER_UPLOAD: usize = 5;
pub const MAX_PHOTO_SIZE_BYTES: usize = 5 * 1024 * 1024;

/// Checks a batch of uploads before anything is sent
/// to the storage provider.
pub fn validate_new_photos(photos: &[NewPhoto]) -> Result<()> {
    if photos.is_empty() {
        return Err(Error::NoPhotos);
    }
    if photos.len() > MAX_PHOTOS_PER_UPLOAD {
        return Err(Error::TooManyPhotos {
            max: MAX_PHOTOS_PER_UPLOAD,
        });
    }
    for photo in photos {
        if !is_image_content_type(&photo.content_type) {
            return Err(Error::PhotoType(photo.original_name.clone()));
        }
        if photo.data.len() > MAX_PHOTO_SIZE_BYTES {
            return Err(Error::PhotoSize {
                name: photo.original_name.clone(),
                max_bytes: MAX_PHOTO_SIZE_BYTES,
            });
        }
    }
    Ok(())
}

fn is_image_content_type(content_type: &str) -> bool {
    content_type
        .trim()
        .to_ascii_lowercase()
        .strip_prefix("image/")
        .is_some_and(|subtype| !subtype.is_empty())
}

pub fn new_photo(stored: StoredPhoto, original_name: String) -> Photo {
    let StoredPhoto { url, public_id } = stored;
    Photo {
        url,
        public_id,
        original_name,
        uploaded_at: Timestamp::now(),
    }
}

/// Appends already stored photos to a location of the given user.
pub fn add_photos<R: LocationRepo + ?Sized>(
    repo: &R,
    user_id: &str,
    location_id: &str,
    photos: Vec<Photo>,
) -> Result<Location> {
    let mut location = load_owned_location(repo, user_id, location_id)?;
    location.photos.extend(photos);
    repo.update_location(&location)?;
    Ok(location)
}

/// Detaches a photo from a location of the given user and returns it.
pub fn delete_photo<R: LocationRepo + ?Sized>(
    repo: &R,
    user_id: &str,
    location_id: &str,
    public_id: &str,
) -> Result<Photo> {
    let mut location = load_owned_location(repo, user_id, location_id)?;
    let photo = location.take_photo(public_id).ok_or(Error::PhotoNotFound)?;
    repo.update_location(&location)?;
    Ok(photo)
}
