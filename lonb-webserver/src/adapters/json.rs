pub use lonb_boundary::*;

use lonb_core::{entities as e, usecases};

pub mod from_json {
    //! JSON -> Entity

    use super::*;

    // NOTE:
    // We cannot impl From<T> here, because the JSON structs
    // and the usecase parameters both are outside this crate.

    pub fn new_location(from: NewLocation) -> usecases::NewLocation {
        let NewLocation {
            name,
            latitude,
            longitude,
            description,
            address,
        } = from;
        usecases::NewLocation {
            name,
            lat: latitude,
            lng: longitude,
            description,
            address,
        }
    }

    pub fn import_location(from: ImportLocation) -> usecases::ImportLocation {
        let ImportLocation {
            id,
            name,
            latitude,
            longitude,
            description,
            address,
            timestamp,
            photos,
        } = from;
        usecases::ImportLocation {
            id,
            location: usecases::NewLocation {
                name,
                lat: latitude,
                lng: longitude,
                description,
                address,
            },
            created_at: timestamp.map(e::Timestamp::from),
            photos: photos.into_iter().map(e::Photo::from).collect(),
        }
    }
}

pub mod to_json {
    //! Entity -> JSON

    use super::*;

    pub fn location_with_distance((location, distance): (e::Location, e::Distance)) -> Location {
        Location {
            distance: Some(distance.to_km()),
            ..Location::from(location)
        }
    }

    pub fn photos(photos: Vec<e::Photo>) -> Vec<Photo> {
        photos.into_iter().map(Photo::from).collect()
    }
}
