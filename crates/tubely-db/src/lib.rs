//! Tubely database layer
//!
//! The metadata store for video records, behind the [`VideoStore`] trait.

pub mod db;

pub use db::{migrate, InMemoryVideoStore, PgVideoRepository, VideoStore};
