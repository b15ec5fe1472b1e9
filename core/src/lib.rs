//! Core library for the progreso fitness tracker: entity models, the
//! single-blob persistent store, and the data layer that joins flat tables
//! into view objects.

pub mod db;
pub mod models;
pub mod store;
