pub mod entities {
    pub use lonb_entities::{geo::*, id::*, location::*, photo::*, time::*, user::*};
}

pub mod gateways;
pub mod repositories;
pub mod usecases;
