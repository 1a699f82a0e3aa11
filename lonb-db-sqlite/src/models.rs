#![allow(clippy::extra_unused_lifetimes)]

// NOTE:
// All timestamps with the `_at` postfix are stored
// as unix timestamp in **milli**seconds.

use super::schema::*;
use diesel::prelude::*;

#[derive(Insertable)]
#[diesel(table_name = locations)]
pub struct NewLocation<'a> {
    pub id: &'a str,
    pub user_id: &'a str,
    pub name: &'a str,
    pub lat: f64,
    pub lng: f64,
    pub description: &'a str,
    pub address: Option<&'a str>,
    pub created_at: i64,
}

#[derive(Queryable)]
pub struct Location {
    pub rowid: i64,
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub lat: f64,
    pub lng: f64,
    pub description: String,
    pub address: Option<String>,
    pub created_at: i64,
}

#[derive(Insertable)]
#[diesel(table_name = location_photos)]
pub struct NewLocationPhoto<'a> {
    pub parent_rowid: i64,
    pub position: i64,
    pub public_id: &'a str,
    pub url: &'a str,
    pub original_name: &'a str,
    pub uploaded_at: i64,
}

#[derive(Queryable)]
pub struct LocationPhoto {
    pub parent_rowid: i64,
    pub public_id: String,
    pub url: String,
    pub original_name: String,
    pub uploaded_at: i64,
}
