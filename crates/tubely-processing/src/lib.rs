//! Tubely Processing Library
//!
//! Wrappers around the external media tools used by the upload pipeline:
//! `ffprobe` for stream geometry and `ffmpeg` for the fast-start remux. Both
//! sit behind traits so callers can substitute deterministic fakes.

pub mod error;
pub mod video;

pub use error::ProcessingError;
pub use video::{
    FastStartTransformer, FfmpegFastStart, FfprobeIntrospector, MediaIntrospector, StreamInfo,
    TransformedMedia,
};
