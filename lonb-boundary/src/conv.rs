use super::*;
use lonb_entities as e;

impl From<e::photo::Photo> for Photo {
    fn from(from: e::photo::Photo) -> Self {
        let e::photo::Photo {
            url,
            public_id,
            original_name,
            uploaded_at,
        } = from;
        Self {
            url,
            public_id,
            original_name,
            uploaded_at: uploaded_at.into(),
        }
    }
}

impl From<Photo> for e::photo::Photo {
    fn from(from: Photo) -> Self {
        let Photo {
            url,
            public_id,
            original_name,
            uploaded_at,
        } = from;
        Self {
            url,
            public_id,
            original_name,
            uploaded_at: uploaded_at.into(),
        }
    }
}

impl From<e::location::Location> for Location {
    fn from(from: e::location::Location) -> Self {
        let e::location::Location {
            id,
            user_id,
            name,
            pos,
            description,
            address,
            created_at,
            photos,
        } = from;
        Self {
            id: id.into(),
            user_id,
            name,
            latitude: pos.lat(),
            longitude: pos.lng(),
            description,
            address,
            timestamp: created_at.into(),
            photos: photos.into_iter().map(Photo::from).collect(),
            distance: None,
        }
    }
}

impl From<e::user::User> for User {
    fn from(from: e::user::User) -> Self {
        let e::user::User {
            google_id,
            email,
            name,
            picture,
        } = from;
        Self {
            google_id,
            email,
            name,
            picture,
        }
    }
}

impl From<User> for e::user::User {
    fn from(from: User) -> Self {
        let User {
            google_id,
            email,
            name,
            picture,
        } = from;
        Self {
            google_id,
            email,
            name,
            picture,
        }
    }
}
