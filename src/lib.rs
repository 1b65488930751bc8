//! Folio - A personal portfolio and blog backend
//!
//! This library provides the core functionality for the Folio backend.

pub mod api;
pub mod cache;
pub mod config;
pub mod models;
pub mod services;
pub mod store;
