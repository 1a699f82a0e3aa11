/// The identity asserted by the OAuth provider.
///
/// Users are not persisted; they only live inside signed tokens.
#[rustfmt::skip]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub google_id : String,
    pub email     : String,
    pub name      : String,
    pub picture   : Option<String>,
}
