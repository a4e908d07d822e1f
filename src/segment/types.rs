//! Segment types and resolution errors.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A coarse user classification label such as `p1`.
///
/// Offers may carry any label, so this is an open newtype rather than an enum.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Segment(String);

impl Segment {
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Segment {
    fn from(label: &str) -> Self {
        Self::new(label)
    }
}

impl PartialEq<str> for Segment {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for Segment {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Errors that can occur while asking a segment service.
#[derive(Debug, Error)]
pub enum SegmentError {
    /// Connection or request failed.
    #[error("segment service unreachable: {0}")]
    Transport(String),

    /// The attempt exceeded its deadline.
    #[error("segment service timed out after {0} ms")]
    Timeout(u64),

    /// The service answered with a non-success status.
    #[error("segment service returned status {0}")]
    Status(u16),

    /// The body was not the expected JSON document.
    #[error("invalid segment response: {0}")]
    Decode(String),

    /// The body decoded but carried no usable segment.
    #[error("segment response had no segment")]
    Missing,
}

impl SegmentError {
    /// Short label for metrics.
    pub fn reason(&self) -> &'static str {
        match self {
            SegmentError::Transport(_) => "transport",
            SegmentError::Timeout(_) => "timeout",
            SegmentError::Status(_) => "status",
            SegmentError::Decode(_) => "decode",
            SegmentError::Missing => "missing",
        }
    }

    /// Whether another attempt could plausibly succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            SegmentError::Transport(_) | SegmentError::Timeout(_) => true,
            SegmentError::Status(code) => *code >= 500 || *code == 429,
            SegmentError::Decode(_) | SegmentError::Missing => false,
        }
    }
}

/// Result type for segment resolution.
pub type SegmentResult<T> = Result<T, SegmentError>;

/// Wire format of the segment endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SegmentResponse {
    #[serde(default)]
    pub segment: Option<Segment>,
}
