//! Error types for seaweed client operations.

use std::fmt;

use reqwest::StatusCode;

/// Result type for seaweed client operations.
pub type SeaweedResult<T> = Result<T, SeaweedError>;

/// Discriminant of a [`SeaweedError`], for callers that branch on the kind of
/// failure rather than its details.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Config,
    Decode,
    NotFound,
    Request,
}

/// Errors that can occur while talking to a seaweed cluster.
#[derive(Debug)]
pub enum SeaweedError {
    /// The client was constructed without a usable master address.
    Config { reason: String },

    /// Malformed opaque filename or malformed response body.
    Decode {
        reason: String,
        source: Option<anyhow::Error>,
    },

    /// The master or volume server reported the content as absent, or the
    /// master knows no replica for the volume.
    NotFound { what: String },

    /// Unexpected status code or transport failure.
    Request {
        reason: String,
        status: Option<StatusCode>,
        source: Option<anyhow::Error>,
    },
}

impl SeaweedError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SeaweedError::Config { .. } => ErrorKind::Config,
            SeaweedError::Decode { .. } => ErrorKind::Decode,
            SeaweedError::NotFound { .. } => ErrorKind::NotFound,
            SeaweedError::Request { .. } => ErrorKind::Request,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }

    /// Status code returned by the cluster, if the failure carried one.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            SeaweedError::Request { status, .. } => *status,
            SeaweedError::NotFound { .. } => Some(StatusCode::NOT_FOUND),
            _ => None,
        }
    }

    pub(crate) fn config(reason: impl Into<String>) -> Self {
        SeaweedError::Config {
            reason: reason.into(),
        }
    }

    pub(crate) fn decode(reason: impl Into<String>, source: impl Into<anyhow::Error>) -> Self {
        SeaweedError::Decode {
            reason: reason.into(),
            source: Some(source.into()),
        }
    }

    pub(crate) fn not_found(what: impl Into<String>) -> Self {
        SeaweedError::NotFound { what: what.into() }
    }

    pub(crate) fn unexpected_status(status: StatusCode) -> Self {
        SeaweedError::Request {
            reason: format!("unexpected seaweed status {}", status),
            status: Some(status),
            source: None,
        }
    }

    pub(crate) fn transport(reason: impl Into<String>, source: impl Into<anyhow::Error>) -> Self {
        SeaweedError::Request {
            reason: reason.into(),
            status: None,
            source: Some(source.into()),
        }
    }
}

impl fmt::Display for SeaweedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeaweedError::Config { reason } => write!(f, "Configuration error: {}", reason),
            SeaweedError::Decode { reason, .. } => write!(f, "Decode error: {}", reason),
            SeaweedError::NotFound { what } => write!(f, "Not found: {}", what),
            SeaweedError::Request { reason, .. } => write!(f, "Request error: {}", reason),
        }
    }
}

impl std::error::Error for SeaweedError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SeaweedError::Decode {
                source: Some(source),
                ..
            } => Some(source.as_ref()),
            SeaweedError::Request {
                source: Some(source),
                ..
            } => Some(source.as_ref()),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for SeaweedError {
    fn from(err: reqwest::Error) -> Self {
        SeaweedError::Request {
            reason: err.to_string(),
            status: err.status(),
            source: Some(anyhow::Error::from(err)),
        }
    }
}

impl From<base64::DecodeError> for SeaweedError {
    fn from(err: base64::DecodeError) -> Self {
        SeaweedError::decode("invalid opaque filename", err)
    }
}

impl From<url::ParseError> for SeaweedError {
    fn from(err: url::ParseError) -> Self {
        SeaweedError::transport(format!("invalid seaweed url: {}", err), err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_discriminant() {
        assert_eq!(SeaweedError::config("x").kind(), ErrorKind::Config);
        assert_eq!(SeaweedError::not_found("3").kind(), ErrorKind::NotFound);
        assert_eq!(
            SeaweedError::unexpected_status(StatusCode::INTERNAL_SERVER_ERROR).kind(),
            ErrorKind::Request
        );
        assert!(SeaweedError::not_found("3").is_not_found());
    }

    #[test]
    fn test_status_carried() {
        let err = SeaweedError::unexpected_status(StatusCode::BAD_GATEWAY);
        assert_eq!(err.status(), Some(StatusCode::BAD_GATEWAY));
        assert_eq!(SeaweedError::config("x").status(), None);
    }

    #[test]
    fn test_source_chain() {
        let err: SeaweedError = url::Url::parse("http://[::1").unwrap_err().into();
        assert_eq!(err.kind(), ErrorKind::Request);
        assert!(std::error::Error::source(&err).is_some());
    }
}
