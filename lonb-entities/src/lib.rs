#![deny(missing_debug_implementations)]
#![deny(rustdoc::broken_intra_doc_links)]
#![cfg_attr(test, deny(warnings))]

//! # lonb-entities
//!
//! Reusable, agnostic domain entities for Location Notebook.
//!
//! The entities only contain generic functionality that does not reveal any application-specific business logic.

pub mod geo;
pub mod id;
pub mod location;
pub mod photo;
pub mod time;
pub mod user;

#[cfg(any(test, feature = "builders"))]
pub mod builders;
