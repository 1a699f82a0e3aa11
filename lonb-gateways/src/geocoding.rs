//! Reverse geocoding with a fixed chain of providers.

use anyhow::{anyhow, Result};
use itertools::Itertools;
use lonb_core::{entities::MapPoint, gateways::geocode::ReverseGeoCodingGateway};
use reqwest::{blocking::Client, Url};
use serde_json::Value;

const BIGDATACLOUD_URL: &str = "https://api.bigdatacloud.net/data/reverse-geocode-client";
const NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org/reverse";
const GOOGLE_GEOCODE_URL: &str = "https://maps.googleapis.com/maps/api/geocode/json";

pub const DEFAULT_LANGUAGE: &str = "tr";

/// A single reverse geocoding service.
trait Provider {
    fn name(&self) -> &'static str;
    fn request_url(&self, pos: MapPoint) -> Result<Url>;
    fn address_from_json(&self, json: &Value) -> Option<String>;
}

pub struct BigDataCloud {
    pub language: String,
}

impl Provider for BigDataCloud {
    fn name(&self) -> &'static str {
        "BigDataCloud"
    }

    fn request_url(&self, pos: MapPoint) -> Result<Url> {
        let params = [
            ("latitude", pos.lat().to_string()),
            ("longitude", pos.lng().to_string()),
            ("localityLanguage", self.language.clone()),
        ];
        Ok(Url::parse_with_params(BIGDATACLOUD_URL, &params)?)
    }

    fn address_from_json(&self, json: &Value) -> Option<String> {
        bigdatacloud_address(json)
    }
}

fn non_empty_str<'a>(json: &'a Value, key: &str) -> Option<&'a str> {
    json[key].as_str().map(str::trim).filter(|s| !s.is_empty())
}

fn bigdatacloud_address(json: &Value) -> Option<String> {
    let street_name = non_empty_str(json, "streetName");
    let street_number = non_empty_str(json, "streetNumber");
    let locality = non_empty_str(json, "locality");
    let city = non_empty_str(json, "city");

    let mut address = match (street_name, street_number) {
        (Some(name), Some(number)) => format!("{name} {number}"),
        (Some(name), None) => name.to_owned(),
        _ => locality.unwrap_or_default().to_owned(),
    };
    if let Some(city) = city {
        if address.is_empty() {
            address = city.to_owned();
        } else if address != city {
            address = format!("{address}, {city}");
        }
    }
    Some(address).filter(|a| !a.is_empty())
}

pub struct Nominatim {
    pub language: String,
}

impl Provider for Nominatim {
    fn name(&self) -> &'static str {
        "Nominatim"
    }

    fn request_url(&self, pos: MapPoint) -> Result<Url> {
        let params = [
            ("format", "json".to_owned()),
            ("lat", pos.lat().to_string()),
            ("lon", pos.lng().to_string()),
            ("accept-language", self.language.clone()),
        ];
        Ok(Url::parse_with_params(NOMINATIM_URL, &params)?)
    }

    fn address_from_json(&self, json: &Value) -> Option<String> {
        nominatim_address(json)
    }
}

/// The first three parts of the display name.
fn nominatim_address(json: &Value) -> Option<String> {
    let display_name = non_empty_str(json, "display_name")?;
    let address = display_name
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .take(3)
        .join(", ");
    Some(address).filter(|a| !a.is_empty())
}

pub struct GoogleGeocoding {
    pub api_key: String,
    pub language: String,
}

impl Provider for GoogleGeocoding {
    fn name(&self) -> &'static str {
        "Google"
    }

    fn request_url(&self, pos: MapPoint) -> Result<Url> {
        let params = [
            ("latlng", format!("{},{}", pos.lat(), pos.lng())),
            ("language", self.language.clone()),
            ("key", self.api_key.clone()),
        ];
        Ok(Url::parse_with_params(GOOGLE_GEOCODE_URL, &params)?)
    }

    fn address_from_json(&self, json: &Value) -> Option<String> {
        google_address(json)
    }
}

fn google_address(json: &Value) -> Option<String> {
    non_empty_str(&json["results"][0], "formatted_address").map(ToOwned::to_owned)
}

/// Answers address requests for a single service.
trait AddressLookup {
    fn name(&self) -> &'static str;
    fn lookup_address(&self, pos: MapPoint) -> Result<Option<String>>;
}

type BoxedLookup = Box<dyn AddressLookup + Send + Sync>;

/// Queries a provider with a plain GET request.
struct HttpLookup<P> {
    provider: P,
    client: Client,
}

impl<P> HttpLookup<P>
where
    P: Provider + Send + Sync + 'static,
{
    fn boxed(provider: P, client: &Client) -> BoxedLookup {
        Box::new(Self {
            provider,
            client: client.clone(),
        })
    }
}

impl<P: Provider> AddressLookup for HttpLookup<P> {
    fn name(&self) -> &'static str {
        self.provider.name()
    }

    fn lookup_address(&self, pos: MapPoint) -> Result<Option<String>> {
        let url = self.provider.request_url(pos)?;
        let response = self.client.get(url).send()?;
        if !response.status().is_success() {
            return Err(anyhow!("Unexpected response status {}", response.status()));
        }
        let json: Value = response.json()?;
        Ok(self.provider.address_from_json(&json))
    }
}

/// Tries all providers in order and returns the first address found.
///
/// Failing providers are logged and skipped.
pub struct ReverseGeoCoding {
    lookups: Vec<BoxedLookup>,
}

impl ReverseGeoCoding {
    /// BigDataCloud, then Nominatim, then Google if an API key is available.
    pub fn try_new(language: Option<String>, google_api_key: Option<String>) -> Result<Self> {
        let language = language.unwrap_or_else(|| DEFAULT_LANGUAGE.to_owned());
        let client = crate::http_client()?;
        let mut lookups = vec![
            HttpLookup::boxed(
                BigDataCloud {
                    language: language.clone(),
                },
                &client,
            ),
            HttpLookup::boxed(
                Nominatim {
                    language: language.clone(),
                },
                &client,
            ),
        ];
        if let Some(api_key) = google_api_key.filter(|key| !key.is_empty()) {
            lookups.push(HttpLookup::boxed(
                GoogleGeocoding { api_key, language },
                &client,
            ));
        }
        Ok(Self { lookups })
    }

    pub fn provider_names(&self) -> Vec<&'static str> {
        self.lookups.iter().map(|l| l.name()).collect()
    }
}

impl ReverseGeoCodingGateway for ReverseGeoCoding {
    fn resolve_lat_lng_address(&self, pos: MapPoint) -> Option<String> {
        for lookup in &self.lookups {
            match lookup.lookup_address(pos) {
                Ok(Some(address)) => {
                    log::debug!(
                        "Resolved address of {} with {}: {address}",
                        pos.to_lat_lng_string(),
                        lookup.name()
                    );
                    return Some(address);
                }
                Ok(None) => {
                    log::debug!("{} returned no address", lookup.name());
                }
                Err(err) => {
                    log::warn!("Reverse geocoding with {} failed: {err}", lookup.name());
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::{Arc, Mutex};

    type Calls = Arc<Mutex<Vec<&'static str>>>;

    struct FakeLookup {
        name: &'static str,
        answer: std::result::Result<Option<&'static str>, &'static str>,
        calls: Calls,
    }

    impl AddressLookup for FakeLookup {
        fn name(&self) -> &'static str {
            self.name
        }

        fn lookup_address(&self, _: MapPoint) -> Result<Option<String>> {
            self.calls.lock().unwrap().push(self.name);
            match self.answer {
                Ok(address) => Ok(address.map(ToOwned::to_owned)),
                Err(msg) => Err(anyhow!(msg)),
            }
        }
    }

    fn chain(
        answers: Vec<(
            &'static str,
            std::result::Result<Option<&'static str>, &'static str>,
        )>,
    ) -> (ReverseGeoCoding, Calls) {
        let calls = Calls::default();
        let lookups = answers
            .into_iter()
            .map(|(name, answer)| {
                Box::new(FakeLookup {
                    name,
                    answer,
                    calls: Arc::clone(&calls),
                }) as BoxedLookup
            })
            .collect();
        (ReverseGeoCoding { lookups }, calls)
    }

    fn pos() -> MapPoint {
        MapPoint::try_from_lat_lng_deg(41.0, 29.0).unwrap()
    }

    #[test]
    fn first_address_wins() {
        let (geocoding, calls) = chain(vec![
            ("first", Ok(Some("Moda, Istanbul"))),
            ("second", Ok(Some("Kadıköy"))),
        ]);
        assert_eq!(
            Some("Moda, Istanbul".to_owned()),
            geocoding.resolve_lat_lng_address(pos())
        );
        assert_eq!(vec!["first"], *calls.lock().unwrap());
    }

    #[test]
    fn failing_and_empty_providers_are_skipped() {
        let (geocoding, calls) = chain(vec![
            ("first", Err("timeout")),
            ("second", Ok(None)),
            ("third", Ok(Some("Fatih"))),
            ("fourth", Ok(Some("unused"))),
        ]);
        assert_eq!(
            Some("Fatih".to_owned()),
            geocoding.resolve_lat_lng_address(pos())
        );
        assert_eq!(vec!["first", "second", "third"], *calls.lock().unwrap());
    }

    #[test]
    fn no_address_if_all_providers_fail() {
        let (geocoding, calls) = chain(vec![
            ("first", Ok(None)),
            ("second", Err("HTTP 500")),
        ]);
        assert_eq!(None, geocoding.resolve_lat_lng_address(pos()));
        assert_eq!(vec!["first", "second"], *calls.lock().unwrap());

        let (geocoding, _) = chain(vec![]);
        assert_eq!(None, geocoding.resolve_lat_lng_address(pos()));
    }

    #[test]
    fn bigdatacloud_street_with_number_and_city() {
        let json = json!({
            "latitude": 41.0082,
            "longitude": 28.9784,
            "city": "Istanbul",
            "locality": "Fatih",
            "streetName": "Divan Yolu Caddesi",
            "streetNumber": "12",
            "countryName": "Türkiye"
        });
        assert_eq!(
            Some("Divan Yolu Caddesi 12, Istanbul".to_owned()),
            bigdatacloud_address(&json)
        );
    }

    #[test]
    fn bigdatacloud_falls_back_to_locality() {
        let json = json!({ "locality": "Kadıköy", "city": "Istanbul", "streetName": "" });
        assert_eq!(
            Some("Kadıköy, Istanbul".to_owned()),
            bigdatacloud_address(&json)
        );
        let json = json!({ "locality": "Ankara", "city": "Ankara" });
        assert_eq!(Some("Ankara".to_owned()), bigdatacloud_address(&json));
        let json = json!({ "city": "Izmir" });
        assert_eq!(Some("Izmir".to_owned()), bigdatacloud_address(&json));
        assert_eq!(None, bigdatacloud_address(&json!({ "countryName": "" })));
    }

    #[test]
    fn nominatim_takes_first_three_parts() {
        let json = json!({
            "place_id": 123,
            "display_name": "12, Divan Yolu Caddesi, Alemdar, Fatih, İstanbul, 34110, Türkiye"
        });
        assert_eq!(
            Some("12, Divan Yolu Caddesi, Alemdar".to_owned()),
            nominatim_address(&json)
        );
        assert_eq!(None, nominatim_address(&json!({ "error": "Unable to geocode" })));
    }

    #[test]
    fn google_formatted_address() {
        let json = json!({
            "results": [
                { "formatted_address": "Divan Yolu Cd. No:12, 34110 Fatih/İstanbul, Türkiye" },
                { "formatted_address": "Fatih/İstanbul, Türkiye" }
            ],
            "status": "OK"
        });
        assert_eq!(
            Some("Divan Yolu Cd. No:12, 34110 Fatih/İstanbul, Türkiye".to_owned()),
            google_address(&json)
        );
        assert_eq!(
            None,
            google_address(&json!({ "results": [], "status": "ZERO_RESULTS" }))
        );
    }

    #[test]
    fn request_urls() {
        let pos = MapPoint::try_from_lat_lng_deg(41.5, 28.25).unwrap();
        let url = BigDataCloud {
            language: "tr".into(),
        }
        .request_url(pos)
        .unwrap();
        assert_eq!(
            "https://api.bigdatacloud.net/data/reverse-geocode-client?latitude=41.5&longitude=28.25&localityLanguage=tr",
            url.as_str()
        );
        let url = GoogleGeocoding {
            api_key: "key".into(),
            language: "en".into(),
        }
        .request_url(pos)
        .unwrap();
        assert_eq!(
            "https://maps.googleapis.com/maps/api/geocode/json?latlng=41.5%2C28.25&language=en&key=key",
            url.as_str()
        );
    }

    #[test]
    fn google_is_only_used_with_api_key() {
        let chain = ReverseGeoCoding::try_new(None, None).unwrap();
        assert_eq!(vec!["BigDataCloud", "Nominatim"], chain.provider_names());
        let chain = ReverseGeoCoding::try_new(None, Some("key".into())).unwrap();
        assert_eq!(
            vec!["BigDataCloud", "Nominatim", "Google"],
            chain.provider_names()
        );
    }
}
