use std::collections::HashSet;

use anyhow::{anyhow, Result};
use jwt_service::{JwtService, Key};
use lonb_core::entities::User;
use parking_lot::{Mutex, MutexGuard};
use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
    google_id: String,
    email: String,
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    picture: Option<String>,
    /// Expiry time as Unix timestamp
    exp: i64,
}

impl From<Claims> for User {
    fn from(from: Claims) -> Self {
        let Claims {
            google_id,
            email,
            name,
            picture,
            exp: _,
        } = from;
        Self {
            google_id,
            email,
            name,
            picture,
        }
    }
}

pub struct JwtState {
    jwt_service: JwtService,
    time_valid: Duration,
    blacklist: Mutex<HashSet<String>>,
}

impl JwtState {
    /// Signs tokens with the given secret or with a random
    /// one that is only valid for the lifetime of the process.
    pub fn new(secret: Option<&str>) -> Self {
        let key = match secret.filter(|s| !s.is_empty()) {
            Some(secret) => Key::new(secret),
            None => {
                warn!("No JWT secret configured: issued tokens become invalid on restart");
                Key::random()
            }
        };
        Self {
            jwt_service: JwtService::new(key),
            time_valid: Duration::days(7),
            blacklist: Mutex::new(HashSet::new()),
        }
    }

    pub fn generate_token(&self, user: &User) -> Result<String> {
        let exp = (OffsetDateTime::now_utc() + self.time_valid).unix_timestamp();
        let User {
            google_id,
            email,
            name,
            picture,
        } = user.clone();
        let claims = Claims {
            google_id,
            email,
            name,
            picture,
            exp,
        };
        self.jwt_service.encode(&claims)
    }

    pub fn validate_token(&self, token: &str) -> Result<User> {
        if self.is_on_blacklist(token) {
            return Err(anyhow!("Token is no longer valid"));
        }
        let claims = self.jwt_service.decode(token)?;
        Ok(claims.into())
    }

    pub fn blacklist_token(&self, token: String) {
        self.remove_invalid_tokens(); // do housekeeping
        self.lock().insert(token);
    }

    fn is_on_blacklist(&self, token: &str) -> bool {
        self.lock().contains(token)
    }

    /// Expired tokens are rejected anyway and can be forgotten.
    fn remove_invalid_tokens(&self) {
        self.blacklist
            .lock()
            .retain(|token| self.jwt_service.decode(token).is_ok());
    }

    fn lock(&self) -> MutexGuard<HashSet<String>> {
        self.blacklist.lock()
    }
}

mod jwt_service {
    use super::{Claims, Result};
    use base64::{engine::general_purpose::STANDARD, Engine as _};
    use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};

    pub struct Key {
        encoding_key: EncodingKey,
        decoding_key: DecodingKey,
    }

    impl Key {
        pub fn new(secret: &str) -> Self {
            let encoding_key = EncodingKey::from_secret(secret.as_ref());
            let decoding_key = DecodingKey::from_secret(secret.as_ref());
            Self {
                encoding_key,
                decoding_key,
            }
        }

        /// 256 random bits, base64 encoded
        pub fn random() -> Self {
            let secret = STANDARD.encode(rand::random::<[u8; 32]>());
            Self::new(&secret)
        }
    }

    pub struct JwtService {
        key: Key,
    }

    impl JwtService {
        pub fn new(key: Key) -> Self {
            Self { key }
        }
        pub fn encode(&self, claims: &Claims) -> Result<String> {
            let token = encode(&Header::default(), claims, &self.key.encoding_key)?;
            Ok(token)
        }
        pub fn decode(&self, token: &str) -> Result<Claims> {
            let token_data =
                decode::<Claims>(token, &self.key.decoding_key, &Validation::default())?;
            Ok(token_data.claims)
        }
    }
}
