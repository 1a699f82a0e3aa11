use std::sync::Arc;

use rocket::{
    http::Status,
    request::{FromRequest, Outcome, Request},
};

use crate::web::jwt;
use lonb_core::{
    entities::User,
    gateways::{
        geocode::ReverseGeoCodingGateway, identity::IdentityGateway, photos::PhotoStorageGateway,
    },
};

fn get_bearer_token(auth_header_val: &str) -> Option<&str> {
    auth_header_val
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

fn bearer_token_from_header(request: &Request) -> Option<String> {
    request
        .headers()
        .get_one("Authorization")
        .and_then(get_bearer_token)
        .map(ToOwned::to_owned)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthError {
    MissingToken,
    InvalidToken,
}

impl AuthError {
    pub const fn message(self) -> &'static str {
        match self {
            Self::MissingToken => "Access denied. No token provided.",
            Self::InvalidToken => "Invalid token.",
        }
    }
}

/// Why the last authentication of a request failed.
#[derive(Debug, Default)]
pub struct AuthFailure(pub Option<AuthError>);

/// An authenticated user.
#[derive(Debug)]
pub struct Auth {
    pub user: User,
}

impl Auth {
    fn fail(request: &Request<'_>, err: AuthError) -> Outcome<Self, AuthError> {
        request.local_cache(|| AuthFailure(Some(err)));
        Outcome::Error((Status::Unauthorized, err))
    }
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for Auth {
    type Error = AuthError;

    async fn from_request(request: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        let Some(token) = bearer_token_from_header(request) else {
            return Self::fail(request, AuthError::MissingToken);
        };
        let Some(jwt_state) = request.rocket().state::<jwt::JwtState>() else {
            error!("No token verification available");
            return Outcome::Error((Status::InternalServerError, AuthError::InvalidToken));
        };
        match jwt_state.validate_token(&token) {
            Ok(user) => Outcome::Success(Self { user }),
            Err(err) => {
                debug!("Rejected bearer token: {err}");
                Self::fail(request, AuthError::InvalidToken)
            }
        }
    }
}

/// The bearer token of a request, if any, without validating it.
#[derive(Debug)]
pub struct BearerToken(pub Option<String>);

#[rocket::async_trait]
impl<'r> FromRequest<'r> for BearerToken {
    type Error = ();

    async fn from_request(request: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        Outcome::Success(Self(bearer_token_from_header(request)))
    }
}

pub struct PhotoStorage(pub Option<Arc<dyn PhotoStorageGateway + Send + Sync>>);

pub struct GeoCoding(pub Option<Arc<dyn ReverseGeoCodingGateway + Send + Sync>>);

pub struct Identity(pub Option<Arc<dyn IdentityGateway + Send + Sync>>);
