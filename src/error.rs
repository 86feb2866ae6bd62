//! Error types for the recommendation core and its collaborators.
//!
//! Only genuine failures live here. Zero-magnitude vectors, unknown context
//! labels and oversized counts are handled by fallbacks, not errors.

use thiserror::Error;

/// Errors surfaced by the scoring core.
#[derive(Debug, Error)]
pub enum RecommendError {
    /// A catalog record carried an enumerated field outside the fixed sets,
    /// an empty mood set, or a duplicate identifier.
    #[error("Invalid track data for `{track_id}`: {reason}")]
    InvalidTrackData { track_id: String, reason: String },

    #[error("Unknown user: {0}")]
    UnknownUser(String),

    #[error("Unknown track: {0}")]
    UnknownTrack(String),

    #[error("Profile store failure: {0}")]
    Store(#[from] StoreError),
}

impl RecommendError {
    pub(crate) fn invalid_track(track_id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidTrackData {
            track_id: track_id.into(),
            reason: reason.into(),
        }
    }
}

/// Errors raised by a [`crate::store::ProfileStore`] backend.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// A stored row no longer maps onto the current enumerations.
    #[error("Corrupt profile row for `{user_id}`: {reason}")]
    Corrupt { user_id: String, reason: String },
}

/// Errors raised while loading or validating [`crate::config::ScoringConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid scoring config: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_name_the_entity() {
        let err = RecommendError::invalid_track("t1", "unknown genre `polka`");
        assert_eq!(err.to_string(), "Invalid track data for `t1`: unknown genre `polka`");

        assert_eq!(RecommendError::UnknownUser("u9".into()).to_string(), "Unknown user: u9");
        assert_eq!(RecommendError::UnknownTrack("t9".into()).to_string(), "Unknown track: t9");
    }

    #[test]
    fn test_store_error_converts_into_core_error() {
        let store_err = StoreError::Corrupt {
            user_id: "u1".into(),
            reason: "bad genre".into(),
        };
        let err: RecommendError = store_err.into();
        assert!(matches!(err, RecommendError::Store(_)));
    }
}
