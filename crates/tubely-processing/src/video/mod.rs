//! Video processing module

pub mod processor;
pub mod transformer;

pub use processor::{FfprobeIntrospector, MediaIntrospector, StreamInfo};
pub use transformer::{FastStartTransformer, FfmpegFastStart, TransformedMedia};

use crate::ProcessingError;

/// Reject tool paths containing shell metacharacters.
pub(crate) fn validate_tool_path(path: &str) -> Result<(), ProcessingError> {
    let dangerous_chars = [';', '|', '&', '$', '`', '(', ')', '<', '>', '\n', '\r'];
    if path.is_empty() || path.chars().any(|c| dangerous_chars.contains(&c)) {
        return Err(ProcessingError::InvalidToolPath(path.to_string()));
    }
    Ok(())
}
