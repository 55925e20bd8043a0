use thiserror::Error;

// ─── Top-level error hierarchy ───────────────────────────────────────────────

/// Structured error hierarchy for `ferrygate`.
///
/// Every translator/relay failure is one of these variants; the HTTP layer
/// matches on them to pick a wire status while internal code keeps the full
/// kind for logging and tests. Bin paths continue to use `anyhow::Result`
/// for ad-hoc context chains.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Malformed inbound JSON or a missing required field.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// The backend answered with a non-2xx status.
    #[error("backend returned {status}")]
    Backend { status: u16, body: String },

    /// The outbound call exceeded its deadline.
    #[error("backend timed out: {0}")]
    BackendTimeout(String),

    /// The outbound call could not be made at all (DNS, refused, reset).
    #[error("backend unreachable: {0}")]
    BackendUnreachable(String),

    /// Credential store failure.
    #[error("storage: {0}")]
    Storage(#[from] StorageError),
}

// ─── Credential store errors ─────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed credential store at {path}: {message}")]
    Malformed { path: String, message: String },
}

impl GatewayError {
    /// Classify a reqwest failure on the outbound leg.
    pub fn from_outbound(error: &reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::BackendTimeout(error.to_string())
        } else {
            Self::BackendUnreachable(error.to_string())
        }
    }
}

/// Shorthand result type for the crate.
pub type Result<T> = std::result::Result<T, GatewayError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bad_request_displays_reason() {
        let err = GatewayError::BadRequest("missing field `model`".into());
        assert!(err.to_string().contains("missing field `model`"));
    }

    #[test]
    fn backend_error_displays_status() {
        let err = GatewayError::Backend {
            status: 503,
            body: "unavailable".into(),
        };
        assert!(err.to_string().contains("503"));
    }

    #[test]
    fn storage_error_converts_from_io() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: GatewayError = StorageError::from(io).into();
        assert!(matches!(err, GatewayError::Storage(StorageError::Io(_))));
    }

    #[test]
    fn malformed_store_names_the_path() {
        let err = StorageError::Malformed {
            path: "/tmp/cookies.json".into(),
            message: "expected value".into(),
        };
        assert!(err.to_string().contains("/tmp/cookies.json"));
    }
}
