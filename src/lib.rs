//! Read-only REST API over a catalog of spaceflight launch records.
//!
//! Requests flow handler → [`services::LaunchService`] → [`repo::RecordStore`].
//! Filtering, ordering, pagination and statistics are pure functions over a
//! snapshot fetched once per request.
pub mod config;
pub mod domain;
pub mod errors;
pub mod handlers;
pub mod repo;
pub mod routes;
pub mod services;
pub mod utils;
