use anyhow::Result;

/// An uploaded image that has not been stored yet.
#[derive(Debug, Clone)]
pub struct NewPhoto {
    pub original_name: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredPhoto {
    pub url: String,
    pub public_id: String,
}

pub trait PhotoStorageGateway {
    fn upload_photo(&self, photo: &NewPhoto) -> Result<StoredPhoto>;
    fn delete_photo(&self, public_id: &str) -> Result<()>;
    /// Checks that the provider is reachable with the configured credentials.
    fn ping(&self) -> Result<()>;
}
