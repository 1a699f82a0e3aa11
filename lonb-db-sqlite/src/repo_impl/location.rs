use super::*;
use std::{cell::RefMut, collections::HashMap};

impl<'a> DbConnection<'a> {
    fn writable(&self) -> Result<RefMut<'_, &'a mut SqliteConnection>> {
        if self.access == Access::ReadOnly {
            return Err(anyhow!("Writing inside a read-only session").into());
        }
        Ok(self.conn.borrow_mut())
    }
}

impl LocationRepo for DbConnection<'_> {
    fn create_location(&self, location: &Location) -> Result<()> {
        create_location(&mut **self.writable()?, location)
    }
    fn update_location(&self, location: &Location) -> Result<()> {
        update_location(&mut **self.writable()?, location)
    }
    fn delete_location(&self, id: &str) -> Result<()> {
        delete_location(&mut **self.writable()?, id)
    }

    fn get_location(&self, id: &str) -> Result<Location> {
        get_location(&mut self.conn.borrow_mut(), id)
    }
    fn get_locations_of_user(&self, user_id: &str) -> Result<Vec<Location>> {
        get_locations_of_user(&mut self.conn.borrow_mut(), user_id)
    }
    fn count_locations(&self) -> Result<usize> {
        count_locations(&mut self.conn.borrow_mut())
    }
}

fn create_location(conn: &mut SqliteConnection, location: &Location) -> Result<()> {
    conn.transaction::<_, DieselError, _>(|conn| {
        let new_location = models::NewLocation {
            id: location.id.as_str(),
            user_id: &location.user_id,
            name: &location.name,
            lat: location.pos.lat(),
            lng: location.pos.lng(),
            description: &location.description,
            address: location.address.as_deref(),
            created_at: location.created_at.into_millis(),
        };
        diesel::insert_into(schema::locations::table)
            .values(&new_location)
            .execute(conn)?;
        let rowid = resolve_location_rowid(conn, location.id.as_str())?;
        insert_photos(conn, rowid, &location.photos)?;
        Ok(())
    })
    .map_err(from_diesel_err)
}

fn update_location(conn: &mut SqliteConnection, location: &Location) -> Result<()> {
    use schema::locations::dsl;
    conn.transaction::<_, DieselError, _>(|conn| {
        let rowid = resolve_location_rowid(conn, location.id.as_str())?;
        diesel::update(schema::locations::table.filter(dsl::rowid.eq(rowid)))
            .set((
                dsl::user_id.eq(&location.user_id),
                dsl::name.eq(&location.name),
                dsl::lat.eq(location.pos.lat()),
                dsl::lng.eq(location.pos.lng()),
                dsl::description.eq(&location.description),
                dsl::address.eq(location.address.as_deref()),
                dsl::created_at.eq(location.created_at.into_millis()),
            ))
            .execute(conn)?;
        delete_photos(conn, rowid)?;
        insert_photos(conn, rowid, &location.photos)?;
        Ok(())
    })
    .map_err(from_diesel_err)
}

fn delete_location(conn: &mut SqliteConnection, id: &str) -> Result<()> {
    use schema::locations::dsl;
    conn.transaction::<_, DieselError, _>(|conn| {
        let rowid = resolve_location_rowid(conn, id)?;
        // Foreign key enforcement is a per-connection setting in SQLite,
        // don't rely on cascading deletes here.
        delete_photos(conn, rowid)?;
        diesel::delete(schema::locations::table.filter(dsl::rowid.eq(rowid))).execute(conn)?;
        Ok(())
    })
    .map_err(from_diesel_err)
}

fn get_location(conn: &mut SqliteConnection, id: &str) -> Result<Location> {
    use schema::locations::dsl;
    let location = schema::locations::table
        .filter(dsl::id.eq(id))
        .first::<models::Location>(conn)
        .map_err(from_diesel_err)?;
    let photos = load_photos(conn, &[location.rowid])?
        .remove(&location.rowid)
        .unwrap_or_default();
    load_location(location, photos)
}

fn get_locations_of_user(conn: &mut SqliteConnection, user_id: &str) -> Result<Vec<Location>> {
    use schema::locations::dsl;
    let locations = schema::locations::table
        .filter(dsl::user_id.eq(user_id))
        .order_by(dsl::created_at.desc())
        .load::<models::Location>(conn)
        .map_err(from_diesel_err)?;
    let rowids: Vec<_> = locations.iter().map(|l| l.rowid).collect();
    let mut photos = load_photos(conn, &rowids)?;
    locations
        .into_iter()
        .map(|l| {
            let photos = photos.remove(&l.rowid).unwrap_or_default();
            load_location(l, photos)
        })
        .collect()
}

fn count_locations(conn: &mut SqliteConnection) -> Result<usize> {
    let count = schema::locations::table
        .count()
        .get_result::<i64>(conn)
        .map_err(from_diesel_err)?;
    Ok(count as usize)
}

fn resolve_location_rowid(conn: &mut SqliteConnection, id: &str) -> QueryResult<i64> {
    use schema::locations::dsl;
    schema::locations::table
        .select(dsl::rowid)
        .filter(dsl::id.eq(id))
        .first::<i64>(conn)
}

fn insert_photos(conn: &mut SqliteConnection, parent_rowid: i64, photos: &[Photo]) -> QueryResult<()> {
    if photos.is_empty() {
        return Ok(());
    }
    let new_photos: Vec<_> = photos
        .iter()
        .enumerate()
        .map(|(position, photo)| models::NewLocationPhoto {
            parent_rowid,
            position: position as i64,
            public_id: &photo.public_id,
            url: &photo.url,
            original_name: &photo.original_name,
            uploaded_at: photo.uploaded_at.into_millis(),
        })
        .collect();
    diesel::insert_into(schema::location_photos::table)
        .values(&new_photos)
        .execute(conn)?;
    Ok(())
}

fn delete_photos(conn: &mut SqliteConnection, parent_rowid: i64) -> QueryResult<usize> {
    use schema::location_photos::dsl;
    diesel::delete(schema::location_photos::table.filter(dsl::parent_rowid.eq(parent_rowid)))
        .execute(conn)
}

/// Loads the photos of multiple locations, grouped by parent in upload order.
fn load_photos(
    conn: &mut SqliteConnection,
    parent_rowids: &[i64],
) -> Result<HashMap<i64, Vec<Photo>>> {
    use schema::location_photos::dsl;
    if parent_rowids.is_empty() {
        return Ok(HashMap::new());
    }
    let rows = schema::location_photos::table
        .select((
            dsl::parent_rowid,
            dsl::public_id,
            dsl::url,
            dsl::original_name,
            dsl::uploaded_at,
        ))
        .filter(dsl::parent_rowid.eq_any(parent_rowids))
        .order_by((dsl::parent_rowid, dsl::position))
        .load::<models::LocationPhoto>(conn)
        .map_err(from_diesel_err)?;
    let mut photos: HashMap<i64, Vec<Photo>> = HashMap::new();
    for row in rows {
        let models::LocationPhoto {
            parent_rowid,
            public_id,
            url,
            original_name,
            uploaded_at,
        } = row;
        photos.entry(parent_rowid).or_default().push(Photo {
            url,
            public_id,
            original_name,
            uploaded_at: load_timestamp(uploaded_at)?,
        });
    }
    Ok(photos)
}

fn load_location(location: models::Location, photos: Vec<Photo>) -> Result<Location> {
    let models::Location {
        rowid: _,
        id,
        user_id,
        name,
        lat,
        lng,
        description,
        address,
        created_at,
    } = location;
    Ok(Location {
        id: id.into(),
        user_id,
        name,
        pos: load_map_point(lat, lng)?,
        description,
        address,
        created_at: load_timestamp(created_at)?,
        photos,
    })
}
