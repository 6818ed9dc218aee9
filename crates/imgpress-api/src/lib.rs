//! imgpress API Library
//!
//! This crate provides the HTTP handlers, error rendering and application setup
//! of the upload-compress gateway.

mod api_doc;
mod handlers;
mod utils;

pub mod constants;
pub mod error;
pub mod setup;
pub mod state;

pub use api_doc::ApiDoc;
pub use error::HttpAppError;
pub use state::AppState;
