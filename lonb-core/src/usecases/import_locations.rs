use super::{
    create_location::{validate_new_location, NewLocation, ValidLocation},
    prelude::*,
};
use crate::repositories;

/// A previously exported location.
#[derive(Debug, Clone, Default)]
pub struct ImportLocation {
    pub id: Option<String>,
    pub location: NewLocation,
    pub created_at: Option<Timestamp>,
    pub photos: Vec<Photo>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub created: usize,
    pub updated: usize,
}

impl ImportSummary {
    pub fn total(&self) -> usize {
        self.created + self.updated
    }
}

/// Imports locations on behalf of a user.
///
/// All entries are validated before anything is written. Entries
/// whose id matches an existing location of the same user replace
/// it, ids that are unknown or belong to someone else are
/// (re)assigned.
///
/// Only photos that are already attached to the replaced location
/// are kept. All other photos of the document are dropped, because
/// deleting the location would also delete them at the photo storage.
pub fn import_locations<R: LocationRepo + ?Sized>(
    repo: &R,
    user_id: &str,
    entries: Vec<ImportLocation>,
) -> Result<ImportSummary> {
    let mut valid = Vec::with_capacity(entries.len());
    for entry in entries {
        let ImportLocation {
            id,
            location,
            created_at,
            photos,
        } = entry;
        let ValidLocation {
            name,
            pos,
            description,
            address,
        } = validate_new_location(location)?;
        let location = Location {
            id: id.map(Id::from).filter(Id::is_valid).unwrap_or_default(),
            user_id: user_id.to_owned(),
            name,
            pos,
            description,
            address,
            created_at: created_at.unwrap_or_else(Timestamp::now),
            photos,
        };
        valid.push(location);
    }

    let mut summary = ImportSummary::default();
    for mut location in valid {
        let existing = if location.id.is_valid() {
            match repo.get_location(location.id.as_str()) {
                Ok(existing) => Some(existing),
                Err(repositories::Error::NotFound) => None,
                Err(err) => return Err(err.into()),
            }
        } else {
            None
        };
        let imported_photos = std::mem::take(&mut location.photos);
        match existing {
            Some(existing) if existing.is_owned_by(user_id) => {
                location.photos = attached_photos(imported_photos, existing.photos);
                repo.update_location(&location)?;
                summary.updated += 1;
            }
            other => {
                if other.is_some() || !location.id.is_valid() {
                    location.id = Id::new();
                }
                if !imported_photos.is_empty() {
                    log::warn!(
                        "Dropped {} unknown photo(s) of imported location '{}'",
                        imported_photos.len(),
                        location.name
                    );
                }
                repo.create_location(&location)?;
                summary.created += 1;
            }
        }
    }
    log::info!(
        "Imported {} location(s) for user {user_id}: {} created, {} updated",
        summary.total(),
        summary.created,
        summary.updated
    );
    Ok(summary)
}

/// The stored photos that are referenced by the imported ones,
/// in the imported order and without duplicates.
fn attached_photos(imported: Vec<Photo>, mut stored: Vec<Photo>) -> Vec<Photo> {
    let mut photos = Vec::with_capacity(imported.len());
    for photo in imported {
        if let Some(index) = stored.iter().position(|p| p.public_id == photo.public_id) {
            photos.push(stored.remove(index));
        }
    }
    let dropped = stored.len();
    if dropped > 0 {
        log::debug!("{dropped} stored photo(s) are no longer referenced by the import");
    }
    photos
}
