//! Video and thumbnail upload pipeline
//!
//! authorize → admit → stage → classify → derive key → transform → place → persist → respond

mod admission;
mod service;
mod staging;

pub use service::{UploadLimits, VideoUploadService};
pub use staging::StagedUpload;
