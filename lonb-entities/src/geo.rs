use std::fmt;

/// Mean earth radius in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// A validated WGS84 position in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapPoint {
    lat: f64,
    lng: f64,
}

impl MapPoint {
    pub const fn min_lat_deg() -> f64 {
        -90.0
    }

    pub const fn max_lat_deg() -> f64 {
        90.0
    }

    pub const fn min_lng_deg() -> f64 {
        -180.0
    }

    pub const fn max_lng_deg() -> f64 {
        180.0
    }

    pub fn is_valid_lat_deg(lat: f64) -> bool {
        lat.is_finite() && (Self::min_lat_deg()..=Self::max_lat_deg()).contains(&lat)
    }

    pub fn is_valid_lng_deg(lng: f64) -> bool {
        lng.is_finite() && (Self::min_lng_deg()..=Self::max_lng_deg()).contains(&lng)
    }

    pub fn try_from_lat_lng_deg(lat: f64, lng: f64) -> Option<Self> {
        if Self::is_valid_lat_deg(lat) && Self::is_valid_lng_deg(lng) {
            Some(Self { lat, lng })
        } else {
            None
        }
    }

    pub const fn lat(&self) -> f64 {
        self.lat
    }

    pub const fn lng(&self) -> f64 {
        self.lng
    }

    /// Great-circle distance using the haversine formula.
    pub fn distance(p1: MapPoint, p2: MapPoint) -> Distance {
        let lat1 = p1.lat.to_radians();
        let lat2 = p2.lat.to_radians();
        let d_lat = (p2.lat - p1.lat).to_radians();
        let d_lng = (p2.lng - p1.lng).to_radians();

        let a = (d_lat / 2.0).sin().powi(2)
            + lat1.cos() * lat2.cos() * (d_lng / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

        Distance::from_km(EARTH_RADIUS_KM * c)
    }

    pub fn distance_to(&self, other: &MapPoint) -> Distance {
        Self::distance(*self, *other)
    }

    /// Both coordinates with six decimal places, i.e. `"48.775500, 9.182700"`.
    pub fn to_lat_lng_string(&self) -> String {
        format!("{:.6}, {:.6}", self.lat, self.lng)
    }

    pub fn google_maps_url(&self) -> String {
        format!("https://maps.google.com/?q={},{}", self.lat, self.lng)
    }

    pub fn apple_maps_url(&self) -> String {
        format!("https://maps.apple.com/?q={},{}", self.lat, self.lng)
    }
}

/// A distance in meters.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct Distance(f64);

impl Distance {
    pub const fn from_meters(meters: f64) -> Self {
        Self(meters)
    }

    pub fn from_km(km: f64) -> Self {
        Self(km * 1000.0)
    }

    pub const fn to_meters(self) -> f64 {
        self.0
    }

    pub fn to_km(self) -> f64 {
        self.0 / 1000.0
    }
}

impl fmt::Display for Distance {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.0 < 1000.0 {
            write!(f, "{:.0}m", self.0)
        } else {
            write!(f, "{:.1}km", self.to_km())
        }
    }
}
