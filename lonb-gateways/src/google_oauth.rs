//! Google sign-in with the OAuth2 authorization code flow.

use anyhow::{anyhow, Result};
use lonb_core::{entities::User, gateways::identity::IdentityGateway};
use reqwest::{blocking::Client, Url};
use serde::Deserialize;

const AUTHORIZATION_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const USER_INFO_URL: &str = "https://www.googleapis.com/oauth2/v3/userinfo";

const SCOPE: &str = "profile email";

#[derive(Debug, Clone)]
pub struct GoogleOAuth {
    client_id: String,
    client_secret: String,
    callback_url: String,
    client: Client,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct TokenError {
    error: String,
    error_description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UserInfo {
    sub: String,
    email: Option<String>,
    name: Option<String>,
    picture: Option<String>,
}

impl TryFrom<UserInfo> for User {
    type Error = anyhow::Error;

    fn try_from(from: UserInfo) -> Result<Self> {
        let UserInfo {
            sub,
            email,
            name,
            picture,
        } = from;
        let email = email
            .filter(|email| !email.is_empty())
            .ok_or_else(|| anyhow!("No email address provided for Google account {sub}"))?;
        // Accounts without a display name are shown with their address
        let name = name
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| email.clone());
        Ok(User {
            google_id: sub,
            email,
            name,
            picture: picture.filter(|url| !url.is_empty()),
        })
    }
}

impl GoogleOAuth {
    pub fn try_new(client_id: String, client_secret: String, callback_url: String) -> Result<Self> {
        Ok(Self {
            client_id,
            client_secret,
            callback_url,
            client: crate::http_client()?,
        })
    }

    fn exchange_code(&self, code: &str) -> Result<String> {
        let params = [
            ("code", code),
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("redirect_uri", self.callback_url.as_str()),
            ("grant_type", "authorization_code"),
        ];
        let response = self.client.post(TOKEN_URL).form(&params).send()?;
        let status = response.status();
        if !status.is_success() {
            let reason = match response.json::<TokenError>() {
                Ok(TokenError {
                    error,
                    error_description: Some(description),
                }) => format!("{error}: {description}"),
                Ok(TokenError { error, .. }) => error,
                Err(_) => status.to_string(),
            };
            return Err(anyhow!("Google token exchange failed: {reason}"));
        }
        let TokenResponse { access_token } = response.json()?;
        Ok(access_token)
    }

    fn fetch_user_info(&self, access_token: &str) -> Result<UserInfo> {
        let response = self
            .client
            .get(USER_INFO_URL)
            .bearer_auth(access_token)
            .send()?;
        if !response.status().is_success() {
            return Err(anyhow!(
                "Unable to fetch Google user profile: {}",
                response.status()
            ));
        }
        Ok(response.json()?)
    }
}

impl IdentityGateway for GoogleOAuth {
    fn authorization_url(&self, state: &str) -> String {
        let params = [
            ("client_id", self.client_id.as_str()),
            ("redirect_uri", self.callback_url.as_str()),
            ("response_type", "code"),
            ("scope", SCOPE),
            ("state", state),
        ];
        match Url::parse_with_params(AUTHORIZATION_URL, &params) {
            Ok(url) => url.into(),
            Err(err) => {
                log::error!("Invalid authorization URL: {err}");
                AUTHORIZATION_URL.to_owned()
            }
        }
    }

    fn authenticate(&self, code: &str) -> Result<User> {
        let access_token = self.exchange_code(code)?;
        let user_info = self.fetch_user_info(&access_token)?;
        let user = User::try_from(user_info)?;
        log::debug!("Authenticated Google user {}", user.google_id);
        Ok(user)
    }
}
