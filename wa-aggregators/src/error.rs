//! Aggregator error taxonomy.

use core::fmt;

#[derive(Debug)]
pub enum AggregatorError {
    /// A record's filename would contain whitespace or an extension
    /// without a leading dot.
    InvalidRecord { reason: String },
    /// The tar archive could not be built or read.
    TarError { reason: String },
}

impl fmt::Display for AggregatorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidRecord { reason } => write!(f, "invalid record: {}", reason),
            Self::TarError { reason } => write!(f, "tar error: {}", reason),
        }
    }
}

impl std::error::Error for AggregatorError {}

impl From<std::io::Error> for AggregatorError {
    fn from(e: std::io::Error) -> Self {
        Self::TarError { reason: e.to_string() }
    }
}
