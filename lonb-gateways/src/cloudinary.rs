use anyhow::{anyhow, Result};
use itertools::Itertools;
use lonb_core::gateways::photos::{NewPhoto, PhotoStorageGateway, StoredPhoto};
use reqwest::blocking::{multipart, Client};
use serde::Deserialize;
use sha1::{Digest, Sha1};
use thiserror::Error;
use time::OffsetDateTime;

pub const DEFAULT_API_BASE_URL: &str = "https://api.cloudinary.com/v1_1";
pub const DEFAULT_FOLDER: &str = "location-tracker";

const ALLOWED_FORMATS: &str = "jpeg,jpg,png,gif,webp";
// Resize into 800x600 and optimize the quality
const TRANSFORMATION: &str = "w_800,h_600,c_limit/q_auto:good";

#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
}

// Never print the secret
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("cloud_name", &self.cloud_name)
            .field("api_key", &self.api_key)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CredentialsError {
    #[error("The URL must start with 'cloudinary://'")]
    Scheme,
    #[error("The URL must have the form 'cloudinary://<api_key>:<api_secret>@<cloud_name>'")]
    Format,
}

impl Credentials {
    /// Parses `cloudinary://<api_key>:<api_secret>@<cloud_name>`.
    pub fn from_url(url: &str) -> Result<Self, CredentialsError> {
        let rest = url
            .trim()
            .strip_prefix("cloudinary://")
            .ok_or(CredentialsError::Scheme)?;
        let (user_info, cloud_name) = rest.rsplit_once('@').ok_or(CredentialsError::Format)?;
        let (api_key, api_secret) = user_info.split_once(':').ok_or(CredentialsError::Format)?;
        let cloud_name = cloud_name.trim_end_matches('/');
        if api_key.is_empty() || api_secret.is_empty() || cloud_name.is_empty() {
            return Err(CredentialsError::Format);
        }
        Ok(Self {
            cloud_name: cloud_name.to_owned(),
            api_key: api_key.to_owned(),
            api_secret: api_secret.to_owned(),
        })
    }
}

/// Photo storage on cloudinary.com.
#[derive(Debug, Clone)]
pub struct Cloudinary {
    credentials: Credentials,
    folder: String,
    api_base_url: String,
    client: Client,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: String,
    public_id: String,
}

#[derive(Debug, Deserialize)]
struct DestroyResponse {
    result: String,
}

#[derive(Debug, Deserialize, Error)]
#[error("{message}")]
struct JsonError {
    message: String,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: JsonError,
}

impl Cloudinary {
    pub fn try_new(credentials: Credentials, folder: Option<String>) -> Result<Self> {
        Ok(Self {
            credentials,
            folder: folder.unwrap_or_else(|| DEFAULT_FOLDER.to_owned()),
            api_base_url: DEFAULT_API_BASE_URL.to_owned(),
            client: crate::http_client()?,
        })
    }

    pub fn folder(&self) -> &str {
        &self.folder
    }

    fn image_endpoint(&self, action: &str) -> String {
        format!(
            "{}/{}/image/{action}",
            self.api_base_url, self.credentials.cloud_name
        )
    }

    /// Adds `api_key` and `signature` to the given parameters.
    fn signed_params(&self, mut params: Vec<(&'static str, String)>) -> Vec<(&'static str, String)> {
        let signature = api_sign_request(&params, &self.credentials.api_secret);
        params.push(("api_key", self.credentials.api_key.clone()));
        params.push(("signature", signature));
        params
    }
}

/// Signs request parameters as required by the Cloudinary upload API.
///
/// The parameters are sorted by name and joined as `name=value` pairs
/// with `&`. The SHA-1 digest of this string followed by the API secret
/// is the signature. Parameters with empty values are not signed.
pub fn api_sign_request(params: &[(&str, String)], api_secret: &str) -> String {
    let to_sign = params
        .iter()
        .filter(|(_, value)| !value.is_empty())
        .sorted_by_key(|(name, _)| *name)
        .map(|(name, value)| format!("{name}={value}"))
        .join("&");
    let mut hasher = Sha1::new();
    hasher.update(to_sign.as_bytes());
    hasher.update(api_secret.as_bytes());
    hex::encode(hasher.finalize())
}

fn unix_timestamp() -> String {
    OffsetDateTime::now_utc().unix_timestamp().to_string()
}

fn error_from_response(response: reqwest::blocking::Response) -> anyhow::Error {
    let status = response.status();
    match response.json::<ErrorResponse>() {
        Ok(ErrorResponse { error }) => anyhow!("Cloudinary request failed ({status}): {error}"),
        Err(_) => anyhow!("Cloudinary request failed ({status})"),
    }
}

impl PhotoStorageGateway for Cloudinary {
    fn upload_photo(&self, photo: &NewPhoto) -> Result<StoredPhoto> {
        let params = self.signed_params(vec![
            ("allowed_formats", ALLOWED_FORMATS.to_owned()),
            ("folder", self.folder.clone()),
            ("timestamp", unix_timestamp()),
            ("transformation", TRANSFORMATION.to_owned()),
        ]);
        let file = multipart::Part::bytes(photo.data.clone())
            .file_name(photo.original_name.clone())
            .mime_str(&photo.content_type)?;
        let form = params
            .into_iter()
            .fold(multipart::Form::new(), |form, (name, value)| {
                form.text(name, value)
            })
            .part("file", file);
        log::debug!(
            "Uploading photo '{}' ({} bytes) to Cloudinary",
            photo.original_name,
            photo.data.len()
        );
        let response = self
            .client
            .post(self.image_endpoint("upload"))
            .multipart(form)
            .send()?;
        if !response.status().is_success() {
            return Err(error_from_response(response));
        }
        let UploadResponse {
            secure_url,
            public_id,
        } = response.json()?;
        Ok(StoredPhoto {
            url: secure_url,
            public_id,
        })
    }

    fn delete_photo(&self, public_id: &str) -> Result<()> {
        let params = self.signed_params(vec![
            ("public_id", public_id.to_owned()),
            ("timestamp", unix_timestamp()),
        ]);
        let response = self
            .client
            .post(self.image_endpoint("destroy"))
            .form(&params)
            .send()?;
        if !response.status().is_success() {
            return Err(error_from_response(response));
        }
        let DestroyResponse { result } = response.json()?;
        match result.as_str() {
            "ok" => Ok(()),
            // Already gone
            "not found" => {
                log::info!("Photo {public_id} did not exist on Cloudinary");
                Ok(())
            }
            _ => Err(anyhow!("Unable to delete photo {public_id}: {result}")),
        }
    }

    fn ping(&self) -> Result<()> {
        let url = format!("{}/{}/ping", self.api_base_url, self.credentials.cloud_name);
        let response = self
            .client
            .get(url)
            .basic_auth(&self.credentials.api_key, Some(&self.credentials.api_secret))
            .send()?;
        if !response.status().is_success() {
            return Err(error_from_response(response));
        }
        Ok(())
    }
}
