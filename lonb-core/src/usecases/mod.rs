mod create_location;
mod delete_location;
mod error;
mod import_locations;
mod load_locations;
mod photos;

#[cfg(test)]
pub mod tests;

pub use self::{
    create_location::*, delete_location::*, error::Error, import_locations::*,
    load_locations::*, photos::*,
};

mod prelude {
    pub use super::error::Error;
    pub type Result<T> = std::result::Result<T, Error>;
    pub use crate::{entities::*, repositories::*};
}
