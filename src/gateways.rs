use std::sync::Arc;

use lonb_core::gateways::{
    geocode::ReverseGeoCodingGateway, identity::IdentityGateway, photos::PhotoStorageGateway,
};
use lonb_gateways::{
    cloudinary::{Cloudinary, Credentials},
    geocoding::ReverseGeoCoding,
    google_oauth::GoogleOAuth,
};
use lonb_webserver::{CloudinaryConfigMethod, Gateways, PhotoStorageInfo};

use crate::config;

pub fn gateways(cfg: &config::Config) -> (Gateways, PhotoStorageInfo) {
    let (photo_storage, info) = photo_storage(&cfg.photos);
    let gateways = Gateways {
        photo_storage,
        geocoding: geocoding(&cfg.geocoding),
        identity: identity(&cfg.auth),
    };
    (gateways, info)
}

/// Credentials from `CLOUDINARY_URL` take precedence over the individual variables.
fn cloudinary_credentials(
    cfg: &config::Cloudinary,
) -> (Option<Credentials>, CloudinaryConfigMethod) {
    if let Some(url) = &cfg.url {
        match Credentials::from_url(url) {
            Ok(credentials) => return (Some(credentials), CloudinaryConfigMethod::Url),
            Err(err) => log::error!("Invalid CLOUDINARY_URL: {err}"),
        }
    }
    match (&cfg.cloud_name, &cfg.api_key, &cfg.api_secret) {
        (Some(cloud_name), Some(api_key), Some(api_secret)) => {
            let credentials = Credentials {
                cloud_name: cloud_name.clone(),
                api_key: api_key.clone(),
                api_secret: api_secret.clone(),
            };
            (
                Some(credentials),
                CloudinaryConfigMethod::IndividualVariables,
            )
        }
        _ => (None, CloudinaryConfigMethod::NotConfigured),
    }
}

fn photo_storage(
    cfg: &config::Photos,
) -> (
    Option<Arc<dyn PhotoStorageGateway + Send + Sync>>,
    PhotoStorageInfo,
) {
    let (credentials, method) = cloudinary_credentials(&cfg.cloudinary);
    let info = PhotoStorageInfo {
        method,
        cloudinary_url_set: cfg.cloudinary.url.is_some(),
        cloud_name_set: cfg.cloudinary.cloud_name.is_some(),
        api_key_set: cfg.cloudinary.api_key.is_some(),
        api_secret_set: cfg.cloudinary.api_secret.is_some(),
    };
    let Some(credentials) = credentials else {
        log::warn!("Cloudinary was not configured: photo uploads are disabled");
        return (None, info);
    };
    log::info!(
        "Use Cloudinary photo storage of cloud '{}' (configured by {})",
        credentials.cloud_name,
        method.as_str()
    );
    let gw = match Cloudinary::try_new(credentials, cfg.folder.clone()) {
        Ok(gw) => gw,
        Err(err) => {
            log::error!("Unable to create the Cloudinary client: {err}");
            return (None, info);
        }
    };
    match gw.ping() {
        Ok(()) => log::info!("Cloudinary connection successful"),
        Err(err) => log::warn!("Cloudinary connection failed: {err}"),
    }
    (Some(Arc::new(gw)), info)
}

fn geocoding(
    cfg: &config::Geocoding,
) -> Option<Arc<dyn ReverseGeoCodingGateway + Send + Sync>> {
    if !cfg.enabled {
        log::info!("Reverse geocoding is disabled");
        return None;
    }
    match ReverseGeoCoding::try_new(cfg.language.clone(), cfg.google_api_key.clone()) {
        Ok(gw) => {
            log::info!(
                "Use reverse geocoding: {}",
                gw.provider_names().join(" -> ")
            );
            if cfg.google_api_key.is_none() {
                log::info!("No Google geocoding API key found");
            }
            Some(Arc::new(gw))
        }
        Err(err) => {
            log::error!("Unable to create the reverse geocoding client: {err}");
            None
        }
    }
}

fn identity(cfg: &config::Auth) -> Option<Arc<dyn IdentityGateway + Send + Sync>> {
    let Some((client_id, client_secret)) = cfg.google_client() else {
        log::warn!("Google OAuth was not configured: login is disabled");
        return None;
    };
    match GoogleOAuth::try_new(
        client_id.to_owned(),
        client_secret.to_owned(),
        cfg.google_callback_url.clone(),
    ) {
        Ok(gw) => {
            log::info!("Use Google OAuth ({})", cfg.google_callback_url);
            Some(Arc::new(gw))
        }
        Err(err) => {
            log::error!("Unable to create the Google OAuth client: {err}");
            None
        }
    }
}
