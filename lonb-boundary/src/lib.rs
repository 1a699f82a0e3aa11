use serde::{Deserialize, Deserializer, Serialize};
use time::OffsetDateTime;

#[cfg(feature = "entity-conversions")]
mod conv;

#[rustfmt::skip]
#[derive(Serialize, Deserialize)]
#[cfg_attr(feature = "extra-derive", derive(Debug, Clone, PartialEq))]
#[serde(rename_all = "camelCase")]
pub struct Location {
    #[serde(rename = "_id")]
    pub id          : String,
    pub user_id     : String,
    pub name        : String,
    pub latitude    : f64,
    pub longitude   : f64,
    pub description : String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address     : Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp   : OffsetDateTime,
    pub photos      : Vec<Photo>,
    /// Distance in kilometers from a reference position, if requested.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance    : Option<f64>,
}

#[rustfmt::skip]
#[derive(Serialize, Deserialize)]
#[cfg_attr(feature = "extra-derive", derive(Debug, Clone, PartialEq))]
#[serde(rename_all = "camelCase")]
pub struct Photo {
    pub url           : String,
    pub public_id     : String,
    #[serde(default)]
    pub original_name : String,
    #[serde(with = "time::serde::rfc3339")]
    pub uploaded_at   : OffsetDateTime,
}

/// Request body for creating a location.
///
/// All fields are optional to be able to respond with
/// a meaningful validation error instead of a parser error.
#[derive(Default, Serialize, Deserialize)]
#[cfg_attr(feature = "extra-derive", derive(Debug, Clone, PartialEq))]
pub struct NewLocation {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_lenient_f64")]
    pub latitude: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_lenient_f64")]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
}

/// A single entry of an exported location document.
#[derive(Default, Serialize, Deserialize)]
#[cfg_attr(feature = "extra-derive", derive(Debug, Clone, PartialEq))]
#[serde(rename_all = "camelCase")]
pub struct ImportLocation {
    #[serde(default, rename = "_id", alias = "id")]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_lenient_f64")]
    pub latitude: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_lenient_f64")]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub timestamp: Option<OffsetDateTime>,
    #[serde(default)]
    pub photos: Vec<Photo>,
}

/// Accepts numbers as well as numeric strings, i.e. values
/// that come directly from HTML form inputs.
fn deserialize_lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Lenient {
        Number(f64),
        Text(String),
    }
    Ok(match Option::<Lenient>::deserialize(deserializer)? {
        Some(Lenient::Number(n)) => Some(n),
        Some(Lenient::Text(s)) => s.trim().parse().ok(),
        None => None,
    })
}

/// The envelope of every API response.
#[derive(Serialize, Deserialize)]
#[cfg_attr(feature = "extra-derive", derive(Debug, Clone, PartialEq))]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default = "Option::default", skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            data: Some(data),
            error: None,
            source: None,
        }
    }

    /// A successful response without message.
    pub fn data(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data: Some(data),
            error: None,
            source: None,
        }
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

impl ApiResponse<()> {
    pub fn failure(message: impl Into<String>, error: Option<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
            data: None,
            error,
            source: None,
        }
    }

    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            data: None,
            error: None,
            source: None,
        }
    }
}

#[derive(Serialize, Deserialize)]
#[cfg_attr(feature = "extra-derive", derive(Debug, Clone, PartialEq))]
#[serde(rename_all = "camelCase")]
pub struct UploadedPhotos {
    pub location_id: String,
    pub photos: Vec<Photo>,
}

#[derive(Serialize, Deserialize)]
#[cfg_attr(feature = "extra-derive", derive(Debug, Clone, PartialEq))]
#[serde(rename_all = "camelCase")]
pub struct DeletedPhoto {
    pub location_id: String,
    pub deleted_photo_id: String,
}

#[derive(Serialize, Deserialize)]
#[cfg_attr(feature = "extra-derive", derive(Debug, Clone, PartialEq))]
pub struct ImportResult {
    pub imported: usize,
    pub created: usize,
    pub updated: usize,
}

#[derive(Serialize, Deserialize)]
#[cfg_attr(feature = "extra-derive", derive(Debug, Clone, PartialEq))]
pub struct ReverseGeocoding {
    pub address: Option<String>,
}

/// The identity carried by an access token.
#[rustfmt::skip]
#[derive(Serialize, Deserialize)]
#[cfg_attr(feature = "extra-derive", derive(Debug, Clone, PartialEq))]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub google_id : String,
    pub email     : String,
    pub name      : String,
    #[serde(default)]
    pub picture   : Option<String>,
}

#[derive(Serialize, Deserialize)]
#[cfg_attr(feature = "extra-derive", derive(Debug, Clone, PartialEq))]
pub struct HealthStatus {
    pub success: bool,
    pub message: String,
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
    pub database: DatabaseStatus,
}

#[derive(Serialize, Deserialize)]
#[cfg_attr(feature = "extra-derive", derive(Debug, Clone, PartialEq))]
pub struct DatabaseStatus {
    /// Connection details of the primary store, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary: Option<StoreStatus>,
    pub storage: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locations_count: Option<usize>,
}

#[derive(Serialize, Deserialize)]
#[cfg_attr(feature = "extra-derive", derive(Debug, Clone, PartialEq))]
pub struct StoreStatus {
    pub backend: String,
    pub status: String,
    pub url: String,
}

#[derive(Serialize, Deserialize)]
#[cfg_attr(feature = "extra-derive", derive(Debug, Clone, PartialEq))]
pub struct PhotoStorageStatus {
    pub success: bool,
    pub cloudinary_configured: bool,
    pub configuration_method: String,
    pub cloudinary_url: String,
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
}

/// Response for requests that did not match any route.
#[derive(Serialize, Deserialize)]
#[cfg_attr(feature = "extra-derive", derive(Debug, Clone, PartialEq))]
#[serde(rename_all = "camelCase")]
pub struct RouteNotFound {
    pub success: bool,
    pub message: String,
    pub requested_path: String,
    pub method: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_location_accepts_numeric_strings() {
        let json = r#"{"name":"Cafe","latitude":"48.5","longitude":9.25}"#;
        let new: NewLocation = serde_json::from_str(json).unwrap();
        assert_eq!(Some(48.5), new.latitude);
        assert_eq!(Some(9.25), new.longitude);
        assert_eq!(None, new.description);
    }

    #[test]
    fn new_location_with_missing_or_garbage_coordinates() {
        let new: NewLocation = serde_json::from_str(r#"{"latitude":"north"}"#).unwrap();
        assert_eq!(None, new.name);
        assert_eq!(None, new.latitude);
        assert_eq!(None, new.longitude);
        let new: NewLocation = serde_json::from_str(r#"{"latitude":null}"#).unwrap();
        assert_eq!(None, new.latitude);
    }

    #[test]
    fn import_location_accepts_both_id_spellings() {
        let a: ImportLocation = serde_json::from_str(r#"{"_id":"x"}"#).unwrap();
        let b: ImportLocation = serde_json::from_str(r#"{"id":"x"}"#).unwrap();
        assert_eq!(Some("x"), a.id.as_deref());
        assert_eq!(a.id, b.id);
        assert!(a.photos.is_empty());
        assert!(a.timestamp.is_none());
    }

    #[test]
    fn envelope_omits_empty_fields() {
        let json = serde_json::to_value(ApiResponse::failure("Invalid coordinates", None)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "success": false, "message": "Invalid coordinates" })
        );
        let json =
            serde_json::to_value(ApiResponse::success("ok", 42).with_source("memory")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "success": true, "message": "ok", "data": 42, "source": "memory" })
        );
    }
}
