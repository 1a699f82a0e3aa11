use lonb_core::{
    entities::*,
    repositories::{Error as RepoError, LocationRepo},
};
use parking_lot::RwLock;

type RepoResult<T> = std::result::Result<T, RepoError>;

/// Volatile storage that is lost when the process exits.
#[derive(Debug, Default)]
pub struct InMemoryDb {
    locations: RwLock<Vec<Location>>,
}

impl InMemoryDb {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LocationRepo for InMemoryDb {
    fn create_location(&self, location: &Location) -> RepoResult<()> {
        let mut locations = self.locations.write();
        if locations.iter().any(|l| l.id == location.id) {
            return Err(RepoError::AlreadyExists);
        }
        locations.push(location.clone());
        Ok(())
    }

    fn update_location(&self, location: &Location) -> RepoResult<()> {
        let mut locations = self.locations.write();
        let existing = locations
            .iter_mut()
            .find(|l| l.id == location.id)
            .ok_or(RepoError::NotFound)?;
        *existing = location.clone();
        Ok(())
    }

    fn delete_location(&self, id: &str) -> RepoResult<()> {
        let mut locations = self.locations.write();
        let len = locations.len();
        locations.retain(|l| l.id.as_str() != id);
        if locations.len() == len {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }

    fn get_location(&self, id: &str) -> RepoResult<Location> {
        self.locations
            .read()
            .iter()
            .find(|l| l.id.as_str() == id)
            .cloned()
            .ok_or(RepoError::NotFound)
    }

    fn get_locations_of_user(&self, user_id: &str) -> RepoResult<Vec<Location>> {
        Ok(self
            .locations
            .read()
            .iter()
            .filter(|l| l.is_owned_by(user_id))
            .cloned()
            .collect())
    }

    fn count_locations(&self) -> RepoResult<usize> {
        Ok(self.locations.read().len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lonb_entities::builders::*;
    use std::{sync::Arc, thread};

    #[test]
    fn create_update_delete() {
        let db = InMemoryDb::new();
        let location = Location::build().id("a").user_id("alice").finish();
        db.create_location(&location).unwrap();
        assert!(matches!(
            db.create_location(&location),
            Err(RepoError::AlreadyExists)
        ));

        let mut renamed = location.clone();
        renamed.name = "Renamed".into();
        db.update_location(&renamed).unwrap();
        assert_eq!("Renamed", db.get_location("a").unwrap().name);

        db.delete_location("a").unwrap();
        assert!(matches!(db.get_location("a"), Err(RepoError::NotFound)));
        assert!(matches!(db.delete_location("a"), Err(RepoError::NotFound)));
        assert!(matches!(
            db.update_location(&renamed),
            Err(RepoError::NotFound)
        ));
    }

    #[test]
    fn concurrent_writers() {
        let db = Arc::new(InMemoryDb::new());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let db = Arc::clone(&db);
                thread::spawn(move || {
                    for j in 0..25 {
                        let id = format!("{i}-{j}");
                        let location = Location::build().id(&id).user_id("alice").finish();
                        db.create_location(&location).unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(200, db.count_locations().unwrap());
        assert_eq!(200, db.get_locations_of_user("alice").unwrap().len());
        assert!(db.get_locations_of_user("bob").unwrap().is_empty());
    }
}
