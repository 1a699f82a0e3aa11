use crate::time::Timestamp;

/// An image attached to a [`Location`](crate::location::Location).
///
/// The binary content lives at an external storage provider,
/// `public_id` is the handle that provider assigned to it.
#[rustfmt::skip]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Photo {
    pub url           : String,
    pub public_id     : String,
    pub original_name : String,
    pub uploaded_at   : Timestamp,
}
