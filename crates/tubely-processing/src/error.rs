use tubely_core::AppError;

#[derive(Debug, thiserror::Error)]
pub enum ProcessingError {
    #[error("no video stream found")]
    NoVideoStream,

    #[error("invalid video dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("media introspection failed: {0}")]
    IntrospectionFailed(String),

    #[error("fast-start transform failed: {0}")]
    TransformFailed(String),

    #[error("invalid tool path: {0}")]
    InvalidToolPath(String),
}

impl From<ProcessingError> for AppError {
    fn from(err: ProcessingError) -> Self {
        match err {
            ProcessingError::NoVideoStream | ProcessingError::InvalidDimensions { .. } => {
                AppError::IntrospectionFailed(err.to_string())
            }
            ProcessingError::IntrospectionFailed(msg) => AppError::IntrospectionFailed(msg),
            ProcessingError::TransformFailed(msg) => AppError::TransformFailed(msg),
            ProcessingError::InvalidToolPath(_) => AppError::Internal(err.to_string()),
        }
    }
}
