//! Folio - portfolio page renderer
//!
//! Populates the anchor regions of an HTML template from a JSON profile.
//! This library exposes modules for integration testing.

pub mod api;
pub mod assets;
pub mod error;
pub mod models;
pub mod rendering;
pub mod server;
pub mod services;
