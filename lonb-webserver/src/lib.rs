#![recursion_limit = "128"]

#[macro_use]
extern crate log;

mod adapters;
mod web;

pub use adapters::json;
pub use web::{
    jwt::JwtState, run, CloudinaryConfigMethod, Cfg, Environment, Gateways, PhotoStorageInfo,
};
