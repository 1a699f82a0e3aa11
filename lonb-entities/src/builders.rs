pub trait Builder {
    type Build;
    fn build() -> Self::Build;
}

pub use self::location_builder::*;

pub mod location_builder {

    use super::*;
    use crate::{geo::*, id::*, location::*, photo::*, time::*};

    #[derive(Debug)]
    pub struct LocationBuild {
        location: Location,
    }

    impl LocationBuild {
        pub fn id(mut self, id: &str) -> Self {
            self.location.id = id.into();
            self
        }
        pub fn user_id(mut self, user_id: &str) -> Self {
            self.location.user_id = user_id.into();
            self
        }
        pub fn name(mut self, name: &str) -> Self {
            self.location.name = name.into();
            self
        }
        pub fn description(mut self, desc: &str) -> Self {
            self.location.description = desc.into();
            self
        }
        pub fn pos(mut self, pos: MapPoint) -> Self {
            self.location.pos = pos;
            self
        }
        pub fn created_at(mut self, created_at: Timestamp) -> Self {
            self.location.created_at = created_at;
            self
        }
        pub fn photo(mut self, public_id: &str) -> Self {
            self.location.photos.push(Photo {
                url: format!("https://img.example.com/{public_id}.jpg"),
                public_id: public_id.into(),
                original_name: format!("{public_id}.jpg"),
                uploaded_at: Timestamp::now(),
            });
            self
        }
        pub fn finish(self) -> Location {
            self.location
        }
    }

    impl Builder for Location {
        type Build = LocationBuild;
        fn build() -> LocationBuild {
            LocationBuild {
                location: Location {
                    id: Id::new(),
                    user_id: "user".into(),
                    name: "Somewhere".into(),
                    pos: MapPoint::try_from_lat_lng_deg(0.0, 0.0).unwrap(),
                    description: String::new(),
                    address: None,
                    created_at: Timestamp::now(),
                    photos: vec![],
                },
            }
        }
    }
}
