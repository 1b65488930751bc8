//! Table store layer
//!
//! This module provides storage abstraction for the Folio backend.
//! It supports:
//! - SQLite (default, for single-binary deployment)
//! - A hosted REST table service (for serverless deployment)
//!
//! The store driver is selected based on configuration at construction
//! time; there is no runtime switch.
//!
//! # Architecture
//!
//! The store layer uses a trait-based abstraction (`TableStore`) that
//! allows repositories to work with either backend without knowing the
//! specific one. Repositories dispatch on `store.driver()` to
//! backend-specific implementations.
//!
//! # Usage
//!
//! ```ignore
//! use folio::config::StoreConfig;
//! use folio::store::{create_store, migrations};
//!
//! let config = StoreConfig::default();
//! let store = create_store(&config).await?;
//! migrations::run_migrations(&store).await?;
//! store.ping().await?;
//! ```

pub mod backend;
pub mod migrations;
pub mod remote;
pub mod repositories;

pub use backend::{create_store, create_test_store, DynTableStore, SqliteStore, TableStore};
pub use remote::RemoteTables;
