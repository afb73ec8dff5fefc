use thiserror::Error;

/// Rejected criteria. Raised before any filtering work starts.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Please enter a valid percentile or rank")]
    MissingThreshold,

    #[error("Threshold is not a number: {0}")]
    InvalidThreshold(String),

    #[error("Threshold must be a finite number, got {0}")]
    NonFiniteThreshold(f64),

    #[error("Percentile must be between 0 and 100, got {0}")]
    PercentileOutOfRange(f64),

    #[error("Result limit must be \"all\" or a whole number, got {0}")]
    InvalidLimit(String),

    #[error("Unknown filter mode: {0} (expected \"rank\" or \"percentile\")")]
    UnknownMode(String),

    #[error("Unknown college type: {0}")]
    UnknownCollegeType(String),
}

/// Dataset fetch or decode failure. No partial dataset is ever returned.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Failed to read dataset file: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Dataset request to {url} returned status {status}")]
    HttpStatus { status: u16, url: String },

    #[error("JSON deserialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Dataset has no collection named \"{0}\"")]
    MissingCollection(String),

    #[error("Dataset entry {index} is malformed: {message}")]
    InvalidRecord { index: usize, message: String },
}

#[derive(Error, Debug)]
pub enum PredictorError {
    #[error("Failed to load college data: {0}")]
    Load(#[from] LoadError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Export failed: {0}")]
    Export(String),
}

pub type Result<T> = std::result::Result<T, PredictorError>;
