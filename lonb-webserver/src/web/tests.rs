use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::anyhow;
use lonb_application::storage::Storage as StorageSwitch;
use lonb_core::{
    entities::{MapPoint, User},
    gateways::{
        geocode::ReverseGeoCodingGateway,
        identity::IdentityGateway,
        photos::{NewPhoto, PhotoStorageGateway, StoredPhoto},
    },
};
use parking_lot::Mutex;
use rocket::{config::Config as RocketCfg, local::blocking::Client};

use super::{jwt::JwtState, Cfg, Gateways};

pub mod prelude {
    pub use rocket::{
        http::{ContentType, Header, Status},
        local::blocking::{Client, LocalResponse},
    };

    pub use super::{
        rocket_test_setup, rocket_test_setup_with, FakeIdentity, FakePhotoStorage, FixedAddress,
        TestEnv,
    };
}

pub const JWT_SECRET: &str = "test-secret";

pub struct TestEnv {
    pub client: Client,
    pub storage: StorageSwitch,
}

impl TestEnv {
    pub fn token_for(&self, user: &User) -> String {
        self.client
            .rocket()
            .state::<JwtState>()
            .unwrap()
            .generate_token(user)
            .unwrap()
    }
}

pub fn rocket_test_setup() -> TestEnv {
    rocket_test_setup_with(Cfg::default(), Gateways::default())
}

pub fn rocket_test_setup_with(cfg: Cfg, gateways: Gateways) -> TestEnv {
    let connections = lonb_db_sqlite::Connections::open(":memory:", 1).unwrap();
    let storage = StorageSwitch::sqlite(connections, ":memory:");
    let mut rocket_cfg = RocketCfg::debug_default();
    rocket_cfg.limits = super::limits();
    let options = super::InstanceOptions {
        mounts: super::mounts(),
        rocket_cfg,
        cfg,
    };
    let rocket = super::rocket_instance(
        options,
        storage.clone(),
        gateways,
        JwtState::new(Some(JWT_SECRET)),
    );
    let client = Client::tracked(rocket).unwrap();
    TestEnv { client, storage }
}

/// Records all calls and fails on demand.
#[derive(Default)]
pub struct FakePhotoStorage {
    pub uploaded: Mutex<Vec<String>>,
    pub deleted: Mutex<Vec<String>>,
    pub fail_delete: bool,
    pub counter: AtomicUsize,
}

impl PhotoStorageGateway for FakePhotoStorage {
    fn upload_photo(&self, photo: &NewPhoto) -> anyhow::Result<StoredPhoto> {
        let n = self.counter.fetch_add(1, Ordering::SeqCst);
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

pub struct FixedAddress(pub &'static str);

impl ReverseGeoCodingGateway for FixedAddress {
    fn resolve_lat_lng_address(&self, _: MapPoint) -> Option<String> {
        Some(self.0.to_owned())
    }
}

/// Accepts a single authorization code.
pub struct FakeIdentity {
    pub code: &'static str,
    pub user: User,
}

impl IdentityGateway for FakeIdentity {
    fn authorization_url(&self, state: &str) -> String {
        format!("https://accounts.example.com/o/oauth2/auth?response_type=code&state={state}")
    }

    fn authenticate(&self, code: &str) -> anyhow::Result<User> {
        if code == self.code {
            Ok(self.user.clone())
        } else {
            Err(anyhow!("invalid_grant"))
        }
    }
}
