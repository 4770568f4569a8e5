use std::path::PathBuf;

/// Unified error type covering every failure mode in the yieldcast pipeline.
///
/// Load-time errors are recoverable: the store falls back to synthetic demo
/// data when the historical source cannot be read. Query-time validation
/// errors are raised by the calling layer before a query reaches the engine;
/// the engine itself never fails on a well-formed query.
#[derive(Debug, thiserror::Error)]
pub enum YieldError {
    // === Data source errors ===
    /// The historical dataset could not be opened or read.
    #[error("Historical data unavailable at {path}: {source}. Check YIELDCAST_DATA_PATH or --data.")]
    SourceUnavailable {
        /// Path that was attempted.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The dataset has no header line.
    #[error("Historical data at {path} is empty: expected a CSV header line.")]
    EmptySource {
        /// Path (or `<inline>`) of the empty source.
        path: PathBuf,
    },

    /// A required CSV column is absent from the header.
    #[error("Required column \"{column}\" missing from CSV header.")]
    MissingColumn {
        /// Column name as it appears in the source format.
        column: String,
    },

    // === Query errors ===
    /// A query field is outside its accepted range or not a finite number.
    #[error("{reason}")]
    InvalidQuery {
        /// Which query field.
        field: String,
        /// The rejected value.
        value: String,
        /// Human-readable explanation returned to API callers.
        reason: String,
    },

    /// The requested area or crop does not appear in the historical data.
    #[error("{kind} \"{value}\" not found. Available {}s: {available}", .kind.to_lowercase())]
    UnknownCategory {
        /// `Area` or `Crop`.
        kind: &'static str,
        /// The rejected value.
        value: String,
        /// Preview of the known values.
        available: String,
    },

    // === Configuration errors ===
    /// A configuration value is invalid.
    #[error("Invalid config: {field} = \"{value}\": {reason}")]
    InvalidConfig {
        /// Which config field.
        field: String,
        /// The invalid value.
        value: String,
        /// Why it is invalid.
        reason: String,
    },

    // === I/O errors ===
    /// Wraps `std::io::Error` for operations without a more specific variant.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl YieldError {
    /// Whether the error was caused by caller input rather than the service.
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        matches!(self, Self::InvalidQuery { .. } | Self::UnknownCategory { .. })
    }
}

/// Convenience alias used throughout the yieldcast crates.
pub type YieldResult<T> = Result<T, YieldError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<YieldError>();
    }

    #[test]
    fn io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: YieldError = io_err.into();
        assert!(matches!(err, YieldError::Io(_)));
        assert!(err.to_string().contains("gone"));
    }

    #[test]
    fn source_unavailable_preserves_source() {
        let err = YieldError::SourceUnavailable {
            path: PathBuf::from("/data/yield_df.csv"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
        };
        let msg = err.to_string();
        assert!(msg.contains("/data/yield_df.csv"));
        assert!(msg.contains("YIELDCAST_DATA_PATH"));
        assert!(err.source().is_some());
    }

    #[test]
    fn invalid_query_displays_reason_only() {
        let err = YieldError::InvalidQuery {
            field: "year".into(),
            value: "1800".into(),
            reason: "Year must be between 1990 and 2030".into(),
        };
        assert_eq!(err.to_string(), "Year must be between 1990 and 2030");
        assert!(err.is_client_error());
    }

    #[test]
    fn unknown_category_lists_available_values() {
        let err = YieldError::UnknownCategory {
            kind: "Area",
            value: "atlantis".into(),
            available: "[india, usa]...".into(),
        };
        assert_eq!(
            err.to_string(),
            "Area \"atlantis\" not found. Available areas: [india, usa]..."
        );
        assert!(err.is_client_error());
    }

    #[test]
    fn config_and_source_errors_are_not_client_errors() {
        let err = YieldError::InvalidConfig {
            field: "jitter_min".into(),
            value: "-1".into(),
            reason: "must be non-negative".into(),
        };
        assert!(err.to_string().contains("jitter_min"));
        assert!(!err.is_client_error());

        let err = YieldError::MissingColumn {
            column: "hg/ha_yield".into(),
        };
        assert!(err.to_string().contains("hg/ha_yield"));
        assert!(!err.is_client_error());
    }
}
