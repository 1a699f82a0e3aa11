//! Flat-file storage of locations in a single JSON document.
//!
//! The document uses the same shape as the JSON API and
//! the export format, keyed by location id.

use anyhow::anyhow;
use jfs::Store;
use lonb_boundary as json;
use lonb_core::{
    entities::*,
    repositories::{self as repo, LocationRepo},
};
use parking_lot::Mutex;
use std::{
    io,
    path::{Path, PathBuf},
};

pub const DATA_FILE_NAME: &str = "location_notebook_data.json";

type Result<T> = std::result::Result<T, repo::Error>;

pub struct JsonFileDb {
    store: Store,
    // Serializes check-then-write sequences
    lock: Mutex<()>,
}

impl JsonFileDb {
    pub fn try_new<P: AsRef<Path>>(directory: P) -> io::Result<Self> {
        let directory = directory.as_ref();
        std::fs::create_dir_all(directory)?;
        let cfg = jfs::Config {
            single: true,
            pretty: true,
            ..Default::default()
        };
        let store = Store::new_with_cfg(directory.join(DATA_FILE_NAME), cfg)?;
        log::debug!("Opened JSON file store {}", store.path().display());
        Ok(Self {
            store,
            lock: Mutex::new(()),
        })
    }

    pub fn path(&self) -> PathBuf {
        self.store.path().to_path_buf()
    }

    fn try_load(&self, id: &str) -> Result<Option<Location>> {
        match self.store.get::<json::Location>(id) {
            Ok(doc) => Ok(Some(location_from_json(doc)?)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn save(&self, location: &Location) -> Result<()> {
        let doc = json::Location::from(location.clone());
        self.store.save_with_id(&doc, location.id.as_str())?;
        Ok(())
    }
}

fn location_from_json(from: json::Location) -> Result<Location> {
    let json::Location {
        id,
        user_id,
        name,
        latitude,
        longitude,
        description,
        address,
        timestamp,
        photos,
        distance: _,
    } = from;
    let pos = MapPoint::try_from_lat_lng_deg(latitude, longitude)
        .ok_or_else(|| anyhow!("Invalid position of location {id}: {latitude}, {longitude}"))?;
    Ok(Location {
        id: id.into(),
        user_id,
        name,
        pos,
        description,
        address,
        created_at: timestamp.into(),
        photos: photos.into_iter().map(Photo::from).collect(),
    })
}

impl LocationRepo for JsonFileDb {
    fn create_location(&self, location: &Location) -> Result<()> {
        let _guard = self.lock.lock();
        if self.try_load(location.id.as_str())?.is_some() {
            return Err(repo::Error::AlreadyExists);
        }
        self.save(location)
    }

    fn update_location(&self, location: &Location) -> Result<()> {
        let _guard = self.lock.lock();
        if self.try_load(location.id.as_str())?.is_none() {
            return Err(repo::Error::NotFound);
        }
        self.save(location)
    }

    fn delete_location(&self, id: &str) -> Result<()> {
        let _guard = self.lock.lock();
        if self.try_load(id)?.is_none() {
            return Err(repo::Error::NotFound);
        }
        self.store.delete(id)?;
        Ok(())
    }

    fn get_location(&self, id: &str) -> Result<Location> {
        self.try_load(id)?.ok_or(repo::Error::NotFound)
    }

    fn get_locations_of_user(&self, user_id: &str) -> Result<Vec<Location>> {
        self.store
            .all::<json::Location>()?
            .into_values()
            .filter(|doc| doc.user_id == user_id)
            .map(location_from_json)
            .collect()
    }

    fn count_locations(&self) -> Result<usize> {
        Ok(self.store.all::<json::Location>()?.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lonb_entities::builders::*;

    #[test]
    fn crud_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let db = JsonFileDb::try_new(dir.path()).unwrap();
        let location = Location::build()
            .id("a")
            .user_id("alice")
            .photo("p1")
            .finish();
        db.create_location(&location).unwrap();
        assert!(matches!(
            db.create_location(&location),
            Err(repo::Error::AlreadyExists)
        ));
        assert_eq!(location, db.get_location("a").unwrap());

        let mut updated = location.clone();
        updated.photos.clear();
        db.update_location(&updated).unwrap();
        assert!(db.get_location("a").unwrap().photos.is_empty());

        db.delete_location("a").unwrap();
        assert!(matches!(db.get_location("a"), Err(repo::Error::NotFound)));
        assert!(matches!(db.delete_location("a"), Err(repo::Error::NotFound)));
    }

    #[test]
    fn persist_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        {
            let db = JsonFileDb::try_new(dir.path()).unwrap();
            db.create_location(&Location::build().id("a").user_id("alice").finish())
                .unwrap();
            db.create_location(&Location::build().id("b").user_id("bob").finish())
                .unwrap();
        }
        let db = JsonFileDb::try_new(dir.path()).unwrap();
        assert_eq!(2, db.count_locations().unwrap());
        let alice = db.get_locations_of_user("alice").unwrap();
        assert_eq!(1, alice.len());
        assert_eq!("a", alice[0].id.as_str());
    }
}
