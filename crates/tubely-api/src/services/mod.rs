pub mod signing;
pub mod upload;
pub mod videos;
