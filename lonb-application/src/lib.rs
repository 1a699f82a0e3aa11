mod create_location;
mod delete_location;
mod import_locations;
mod load_locations;
mod photos;

pub mod prelude {
    pub use super::{
        create_location::*, delete_location::*, import_locations::*, load_locations::*,
        photos::*,
    };
}

pub mod error;
pub mod storage;

pub type Result<T> = std::result::Result<T, error::AppError>;

pub(crate) use lonb_core::{entities::*, usecases};
pub(crate) use storage::Storage;

#[cfg(test)]
pub(crate) mod tests;

pub(crate) mod sqlite {
    pub use lonb_db_sqlite::Connections;
}
