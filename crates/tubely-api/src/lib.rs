//! Tubely API Library
//!
//! HTTP handlers, authentication and application setup for the video upload service.

mod api_doc;
mod handlers;
mod telemetry;

pub mod auth;
pub mod error;
pub mod services;
pub mod setup;
pub mod state;

pub use api_doc::ApiDoc;
pub use error::{ErrorResponse, HttpAppError};
