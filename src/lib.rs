//! # Cadhub
//!
//! Version-control metadata for CAD design files: projects, branches and a
//! commit graph, served over a REST API. Usable both as a standalone binary
//! and as a library.
//!
//! ## Library Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use cadhub::config::ServerConfig;
//! use cadhub::server::{AppState, create_router};
//! use cadhub::store::{SqliteStore, Store};
//!
//! let config = ServerConfig::default();
//! let store = SqliteStore::new(config.db_path()).unwrap();
//! store.initialize().unwrap();
//!
//! let state = Arc::new(AppState::new(Arc::new(store), config));
//! let router = create_router(state);
//! // Serve with axum...
//! ```
//!
//! ## Feature Flags
//!
//! - `cli` (default): Builds the `cadhub` binary. Disable with `default-features = false`.

pub mod config;
pub mod error;
pub mod files;
pub mod graph;
pub mod seed;
pub mod server;
pub mod service;
pub mod store;
pub mod types;
