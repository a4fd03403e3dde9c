use thiserror::Error;

#[derive(Error, Debug)]
pub enum StegoError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Image error: {0}")]
    Image(String),

    #[error("Message needs {needed} carrier positions but only {available} are available")]
    CapacityExceeded { needed: usize, available: usize },

    #[error("{0} uses a lossy image format that destroys hidden bits; save as PNG or BMP, or allow lossy output")]
    LossyFormat(String),

    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),

    #[error("Unit index {index} out of range for carrier of {unit_count} units")]
    OutOfRange { index: usize, unit_count: usize },

    #[error("No message terminator found after reading {consumed} bits")]
    TerminatorNotFound { consumed: usize },

    #[error("Invalid strategy: {0}. Expected all, nth:N (N >= 1) or diagonal")]
    InvalidStrategy(String),

    #[error("Invalid channel: {0}. Expected red, green or blue")]
    InvalidChannel(String),

    #[error("Invalid extraction policy: {0}. Expected lenient or strict")]
    InvalidPolicy(String),
}

pub type Result<T> = std::result::Result<T, StegoError>;
