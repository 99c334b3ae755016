//! Data-access layer for events and bookings on MongoDB.
//!
//! Writes go through [`store::EventStore`] and [`store::BookingStore`], which
//! validate and normalize a record before handing it to a repository.

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod repository;
pub mod routes;
pub mod store;
pub mod utils;

pub use error::{DataError, DataResult};
