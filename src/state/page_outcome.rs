/// Per-page outcome definitions
use std::fmt;

/// How processing a single dequeued URL ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageOutcome {
    /// Page was rendered, extracted and persisted
    ///
    /// `quiescent` is false when the network quiescence wait timed out and the
    /// page was extracted from partial markup.
    Processed { quiescent: bool },

    /// Page could not be processed; it is still counted as visited
    Failed { reason: String },
}

impl PageOutcome {
    /// Returns true if the page was processed successfully
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Processed { .. })
    }

    /// Returns the failure reason, if any
    pub fn failure_reason(&self) -> Option<&str> {
        match self {
            Self::Failed { reason } => Some(reason),
            Self::Processed { .. } => None,
        }
    }

    /// Short status string used in the page manifest
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Processed { quiescent: true } => "processed",
            Self::Processed { quiescent: false } => "partial",
            Self::Failed { .. } => "failed",
        }
    }
}

impl fmt::Display for PageOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Failed { reason } => write!(f, "failed: {}", reason),
            other => f.write_str(other.as_str()),
        }
    }
}
