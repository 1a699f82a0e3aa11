// Low-level database access traits.
// Photos are embedded into their location and are
// always loaded and stored together with it.

use crate::entities::*;
use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("The requested object could not be found")]
    NotFound,
    #[error("The object already exists")]
    AlreadyExists,
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

type Result<T> = std::result::Result<T, Error>;

pub trait LocationRepo {
    fn create_location(&self, location: &Location) -> Result<()>;

    /// Replaces all fields and photos of an existing location.
    fn update_location(&self, location: &Location) -> Result<()>;

    fn delete_location(&self, id: &str) -> Result<()>;

    fn get_location(&self, id: &str) -> Result<Location>;

    /// All locations of a user in no particular order.
    fn get_locations_of_user(&self, user_id: &str) -> Result<Vec<Location>>;

    fn count_locations(&self) -> Result<usize>;
}
