use anyhow::Result;
use lonb_entities::user::User;

/// An OAuth2 identity provider using the authorization code flow.
pub trait IdentityGateway {
    /// The URL of the consent page the user agent is redirected to.
    fn authorization_url(&self, state: &str) -> String;

    /// Exchanges an authorization code for the identity of the user.
    fn authenticate(&self, code: &str) -> Result<User>;
}
