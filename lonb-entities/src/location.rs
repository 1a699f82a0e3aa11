use crate::{geo::*, id::*, photo::*, time::*};

/// A geotagged journal entry owned by exactly one user.
#[rustfmt::skip]
#[derive(Debug, Clone, PartialEq)]
pub struct Location {
    pub id          : Id,
    pub user_id     : String,
    pub name        : String,
    pub pos         : MapPoint,
    pub description : String,
    pub address     : Option<String>,
    pub created_at  : Timestamp,
    pub photos      : Vec<Photo>,
}

impl Location {
    pub fn is_owned_by(&self, user_id: &str) -> bool {
        self.user_id == user_id
    }

    pub fn photo(&self, public_id: &str) -> Option<&Photo> {
        self.photos.iter().find(|p| p.public_id == public_id)
    }

    /// Removes the photo with the given public id and returns it.
    pub fn take_photo(&mut self, public_id: &str) -> Option<Photo> {
        let index = self.photos.iter().position(|p| p.public_id == public_id)?;
        Some(self.photos.remove(index))
    }
}
