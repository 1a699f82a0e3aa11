use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use rocket::{
    get,
    http::{Cookie, CookieJar, SameSite},
    post,
    response::Redirect,
    State,
};

use super::*;
use crate::{adapters::json, web::jwt};

const COOKIE_OAUTH_STATE_KEY: &str = "lonb-oauth-state";

fn random_state() -> String {
    URL_SAFE_NO_PAD.encode(rand::random::<[u8; 32]>())
}

fn login_failed(cfg: &Cfg) -> Redirect {
    Redirect::to(cfg.frontend_url("/login"))
}

#[get("/auth/google")]
pub fn get_google_login(
    identity: &State<Identity>,
    cookies: &CookieJar<'_>,
    cfg: &State<Cfg>,
) -> Redirect {
    let Some(identity) = identity.0.as_deref() else {
        warn!("Google login has been requested, but OAuth is not configured");
        return login_failed(cfg);
    };
    let state = random_state();
    cookies.add_private(
        Cookie::build((COOKIE_OAUTH_STATE_KEY, state.clone()))
            .http_only(true)
            .same_site(SameSite::Lax),
    );
    Redirect::to(identity.authorization_url(&state))
}

#[get("/auth/google/callback?<code>&<state>")]
pub async fn get_google_callback(
    code: Option<String>,
    state: Option<String>,
    identity: &State<Identity>,
    jwt_state: &State<jwt::JwtState>,
    cookies: &CookieJar<'_>,
    cfg: &State<Cfg>,
) -> Redirect {
    let expected_state = cookies
        .get_private(COOKIE_OAUTH_STATE_KEY)
        .map(|cookie| cookie.value().to_owned());
    cookies.remove_private(COOKIE_OAUTH_STATE_KEY);

    let Some(code) = code else {
        warn!("OAuth callback without authorization code");
        return login_failed(cfg);
    };
    if state.is_none() || state != expected_state {
        warn!("OAuth callback with unexpected state");
        return login_failed(cfg);
    }
    let Some(identity) = identity.0.clone() else {
        return login_failed(cfg);
    };

    let user = match rocket::tokio::task::spawn_blocking(move || identity.authenticate(&code)).await
    {
        Ok(Ok(user)) => user,
        Ok(Err(err)) => {
            warn!("Google authentication failed: {err:#}");
            return login_failed(cfg);
        }
        Err(err) => {
            error!("Google authentication aborted: {err}");
            return login_failed(cfg);
        }
    };
    match jwt_state.generate_token(&user) {
        Ok(token) => {
            info!("User {} logged in", user.email);
            Redirect::to(cfg.frontend_url(&format!("/auth-success?token={token}")))
        }
        Err(err) => {
            error!("Unable to issue token for {}: {err:#}", user.email);
            login_failed(cfg)
        }
    }
}

#[get("/auth/me")]
pub fn get_current_user(auth: Auth) -> Json<ApiResponse<json::User>> {
    Json(ApiResponse::data(auth.user.into()))
}

#[post("/auth/logout")]
pub fn post_logout(
    bearer: BearerToken,
    jwt_state: &State<jwt::JwtState>,
) -> Json<ApiResponse<()>> {
    if let BearerToken(Some(token)) = bearer {
        jwt_state.blacklist_token(token);
    }
    Json(ApiResponse::message("Logged out successfully"))
}
