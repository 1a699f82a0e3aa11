use crate::repositories;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Name, latitude and longitude fields are required")]
    MissingFields,
    #[error("Invalid coordinates")]
    Coordinates,
    #[error("No photos provided")]
    NoPhotos,
    #[error("Too many photos: at most {max} files are allowed per upload")]
    TooManyPhotos { max: usize },
    #[error("Only image files are allowed: {0}")]
    PhotoType(String),
    #[error("Photo exceeds the size limit of {max_bytes} bytes: {name}")]
    PhotoSize { name: String, max_bytes: usize },
    #[error("Location not found or access denied")]
    LocationNotFound,
    #[error("Photo not found")]
    PhotoNotFound,
    #[error(transparent)]
    Repo(#[from] repositories::Error),
}
