use std::time::Duration;

pub mod cloudinary;
pub mod geocoding;
pub mod google_oauth;

/// Sent with every request to third-party services.
pub const USER_AGENT: &str = "LocationNotebook/1.0";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

fn http_client() -> reqwest::Result<reqwest::blocking::Client> {
    reqwest::blocking::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(REQUEST_TIMEOUT)
        .build()
}
