use thiserror::Error;

/// Failure signal returned by every fetch in this crate.
///
/// Unresolved region names are not represented here: they are excluded from
/// the snapshot and listed in [`crate::models::snapshot::Snapshot::dropped`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TrackerError {
    #[error("network error: {0}")]
    Network(String),

    #[error("upstream returned HTTP {status} for {url}")]
    Status { status: u16, url: String },

    #[error("malformed payload from {url}: {reason}")]
    MalformedPayload { url: String, reason: String },

    #[error("unknown region: {0}")]
    UnknownRegion(String),

    #[error("invalid day window: {0} (must be at least 1)")]
    InvalidDays(u32),

    #[error("configuration error: {0}")]
    Config(String),
}

impl TrackerError {
    /// Timeouts and connection failures; a later attempt may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, TrackerError::Network(_))
    }
}

pub type Result<T> = std::result::Result<T, TrackerError>;
