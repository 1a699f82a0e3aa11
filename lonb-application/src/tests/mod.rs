mod locations;
mod photos;

pub mod prelude {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use anyhow::anyhow;
    use parking_lot::Mutex;

    pub use lonb_core::{
        entities::*,
        gateways::{
            geocode::ReverseGeoCodingGateway,
            photos::{NewPhoto, PhotoStorageGateway, StoredPhoto},
        },
        usecases,
    };
    pub use lonb_entities::builders::*;

    pub use crate::{error::AppError, prelude as flows, storage::Storage};

    pub fn sqlite_storage() -> Storage {
        let connections = crate::sqlite::Connections::open(":memory:", 1).unwrap();
        Storage::sqlite(connections, ":memory:")
    }

    pub fn new_location(name: &str, lat: f64, lng: f64) -> usecases::NewLocation {
        usecases::NewLocation {
            name: Some(name.into()),
            lat: Some(lat),
            lng: Some(lng),
            ..Default::default()
        }
    }

    pub fn jpeg(name: &str) -> NewPhoto {
        NewPhoto {
            original_name: name.into(),
            content_type: "image/jpeg".into(),
            data: vec![0xFF, 0xD8, 0xFF],
        }
    }

    pub struct FixedAddress(pub Option<&'static str>);

    impl ReverseGeoCodingGateway for FixedAddress {
        fn resolve_lat_lng_address(&self, _: MapPoint) -> Option<String> {
            self.0.map(ToOwned::to_owned)
        }
    }

    /// Records all calls and fails on demand.
    #[derive(Default)]
    pub struct FakePhotoStorage {
        pub uploaded: Mutex<Vec<String>>,
        pub deleted: Mutex<Vec<String>>,
        pub fail_upload_after: Option<usize>,
        pub fail_delete: bool,
        pub counter: AtomicUsize,
    }

    impl PhotoStorageGateway for FakePhotoStorage {
        fn upload_photo(&self, photo: &NewPhoto) -> anyhow::Result<StoredPhoto> {
            let n = self.counter.fetch_add(1, Ordering::SeqCst);
            if self.fail_upload_after.is_some_and(|max| n >= max) {
                return Err(anyhow!("upload quota exceeded"));
            }
            let public_id = format!("location-tracker/{n}-{}", photo.original_name);
            self.uploaded.lock().push(public_id.clone());
            Ok(StoredPhoto {
                url: format!("https://res.example.com/{public_id}"),
                public_id,
            })
        }

        fn delete_photo(&self, public_id: &str) -> anyhow::Result<()> {
            self.deleted.lock().push(public_id.to_owned());
            if self.fail_delete {
                return Err(anyhow!("provider unavailable"));
            }
            Ok(())
        }

        fn ping(&self) -> anyhow::Result<()> {
            Ok(())
        }
    }
}
