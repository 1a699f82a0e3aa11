use lonb_entities::geo::MapPoint;

pub trait ReverseGeoCodingGateway {
    /// Resolves a human readable address for the given position.
    ///
    /// Returns `None` if no address could be found.
    fn resolve_lat_lng_address(&self, pos: MapPoint) -> Option<String>;
}
