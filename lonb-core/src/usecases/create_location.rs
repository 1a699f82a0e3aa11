use super::prelude::*;

#[rustfmt::skip]
#[derive(Default, Debug, Clone)]
pub struct NewLocation {
    pub name        : Option<String>,
    pub lat         : Option<f64>,
    pub lng         : Option<f64>,
    pub description : Option<String>,
    pub address     : Option<String>,
}

#[derive(Debug, Clone)]
pub struct Storable(Location);

impl Storable {
    pub fn location(&self) -> &Location {
        &self.0
    }

    pub fn needs_address(&self) -> bool {
        self.0.address.is_none()
    }

    pub fn set_address(&mut self, address: String) {
        self.0.address = Some(address);
    }
}

pub(crate) fn validate_new_location(new_location: NewLocation) -> Result<ValidLocation> {
    let NewLocation {
        name,
        lat,
        lng,
        description,
        address,
    } = new_location;
    let name = name
        .map(|n| n.trim().to_owned())
        .filter(|n| !n.is_empty())
        .ok_or(Error::MissingFields)?;
    let (lat, lng) = lat.zip(lng).ok_or(Error::MissingFields)?;
    let pos = MapPoint::try_from_lat_lng_deg(lat, lng).ok_or(Error::Coordinates)?;
    let description = description.unwrap_or_default();
    let address = address
        .map(|a| a.trim().to_owned())
        .filter(|a| !a.is_empty());
    Ok(ValidLocation {
        name,
        pos,
        description,
        address,
    })
}

pub(crate) struct ValidLocation {
    pub name: String,
    pub pos: MapPoint,
    pub description: String,
    pub address: Option<String>,
}

pub fn prepare_new_location(user_id: &str, new_location: NewLocation) -> Result<Storable> {
    let ValidLocation {
        name,
        pos,
        description,
        address,
    } = validate_new_location(new_location)?;
    let location = Location {
        id: Id::new(),
        user_id: user_id.to_owned(),
        name,
        pos,
        description,
        address,
        created_at: Timestamp::now(),
        photos: vec![],
    };
    Ok(Storable(location))
}

pub fn store_new_location<R>(repo: &R, s: Storable) -> Result<Location>
where
    R: LocationRepo + ?Sized,
{
    let Storable(location) = s;
    log::debug!(
        "Storing new location: id = {}, user = {}",
        location.id,
        location.user_id
    );
    repo.create_location(&location)?;
    Ok(location)
}
