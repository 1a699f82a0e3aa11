use std::{
    net::{IpAddr, Ipv4Addr},
    sync::Arc,
};

use lonb_application::storage::Storage as StorageSwitch;
use lonb_core::gateways::{
    geocode::ReverseGeoCodingGateway, identity::IdentityGateway, photos::PhotoStorageGateway,
};
use rocket::{
    config::{Config as RocketCfg, SecretKey},
    data::{Limits, ToByteUnit},
    Rocket, Route,
};
use rocket_cors::{AllowedOrigins, CorsOptions};

pub mod api;
mod guards;
pub mod jwt;
mod storage;

#[cfg(test)]
pub mod tests;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Production,
    Development,
}

impl Environment {
    pub const fn is_development(self) -> bool {
        matches!(self, Self::Development)
    }
}

/// How the photo storage credentials were provided.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CloudinaryConfigMethod {
    Url,
    IndividualVariables,
    #[default]
    NotConfigured,
}

impl CloudinaryConfigMethod {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Url => "CLOUDINARY_URL",
            Self::IndividualVariables => "Individual Variables",
            Self::NotConfigured => "NOT_CONFIGURED",
        }
    }
}

/// Which photo storage settings were present at startup.
#[derive(Debug, Clone, Default)]
pub struct PhotoStorageInfo {
    pub method: CloudinaryConfigMethod,
    pub cloudinary_url_set: bool,
    pub cloud_name_set: bool,
    pub api_key_set: bool,
    pub api_secret_set: bool,
}

#[derive(Debug, Clone)]
pub struct Cfg {
    pub address: IpAddr,
    pub port: u16,
    /// Target of the redirects after a login attempt.
    pub frontend_url: String,
    pub environment: Environment,
    /// Accept requests from any origin instead of the frontend only.
    pub enable_cors: bool,
    /// Resolve the address of new locations that have none.
    pub resolve_addresses: bool,
    pub photo_storage: PhotoStorageInfo,
}

impl Default for Cfg {
    fn default() -> Self {
        Self {
            address: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: 5000,
            frontend_url: "http://localhost:3000".into(),
            environment: Environment::default(),
            enable_cors: false,
            resolve_addresses: true,
            photo_storage: PhotoStorageInfo::default(),
        }
    }
}

impl Cfg {
    fn frontend_url(&self, path: &str) -> String {
        format!("{}{path}", self.frontend_url.trim_end_matches('/'))
    }
}

#[derive(Default, Clone)]
pub struct Gateways {
    pub photo_storage: Option<Arc<dyn PhotoStorageGateway + Send + Sync>>,
    pub geocoding: Option<Arc<dyn ReverseGeoCodingGateway + Send + Sync>>,
    pub identity: Option<Arc<dyn IdentityGateway + Send + Sync>>,
}

pub(crate) struct InstanceOptions {
    mounts: Vec<(&'static str, Vec<Route>)>,
    rocket_cfg: RocketCfg,
    cfg: Cfg,
}

pub(crate) fn rocket_instance(
    options: InstanceOptions,
    storage: StorageSwitch,
    gateways: Gateways,
    jwt_state: jwt::JwtState,
) -> Rocket<rocket::Build> {
    let InstanceOptions {
        mounts,
        rocket_cfg,
        cfg,
    } = options;
    let Gateways {
        photo_storage,
        geocoding,
        identity,
    } = gateways;

    info!("Serving locations from {} storage", storage.source());

    let mut instance = rocket::custom(rocket_cfg)
        .manage(storage::Storage::from(storage))
        .manage(jwt_state)
        .manage(guards::PhotoStorage(photo_storage))
        .manage(guards::GeoCoding(geocoding))
        .manage(guards::Identity(identity))
        .manage(cfg)
        .register("/", api::catchers());

    for (m, r) in mounts {
        instance = instance.mount(m, r);
    }
    instance
}

fn mounts() -> Vec<(&'static str, Vec<Route>)> {
    vec![("/api", api::routes())]
}

fn limits() -> Limits {
    Limits::default()
        .limit("json", 5.mebibytes())
        .limit("file", 6.mebibytes())
        .limit("data-form", 32.mebibytes())
}

fn rocket_cfg(cfg: &Cfg) -> RocketCfg {
    let mut rocket_cfg = if cfg.environment.is_development() {
        RocketCfg::debug_default()
    } else {
        RocketCfg::release_default()
    };
    rocket_cfg.address = cfg.address;
    rocket_cfg.port = cfg.port;
    rocket_cfg.limits = limits();
    // Private cookies only need to survive the OAuth round trip
    match SecretKey::generate() {
        Some(key) => rocket_cfg.secret_key = key,
        None => warn!("Unable to generate a secret key for private cookies"),
    }
    rocket_cfg
}

fn cors(cfg: &Cfg) -> anyhow::Result<rocket_cors::Cors> {
    let options = if cfg.enable_cors {
        CorsOptions::default()
    } else {
        CorsOptions {
            allowed_origins: AllowedOrigins::some_exact(&[cfg.frontend_url.as_str()]),
            allow_credentials: true,
            ..Default::default()
        }
    };
    Ok(options.to_cors()?)
}

pub async fn run(
    cfg: Cfg,
    storage: StorageSwitch,
    gateways: Gateways,
    jwt_state: jwt::JwtState,
) -> anyhow::Result<()> {
    let cors = cors(&cfg)?;
    let options = InstanceOptions {
        mounts: mounts(),
        rocket_cfg: rocket_cfg(&cfg),
        cfg,
    };
    let instance = rocket_instance(options, storage, gateways, jwt_state);
    if let Err(err) = instance.attach(cors).launch().await {
        error!("Unable to run web server: {err}");
        return Err(anyhow::anyhow!("{err}"));
    }
    Ok(())
}
