pub mod geocode;
pub mod identity;
pub mod photos;
