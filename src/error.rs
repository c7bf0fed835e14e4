use crate::model::PageNumber;

/// Failure talking to the document service.
///
/// Cloneable so one shared page fetch can hand the same error to every
/// caller waiting on it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ServiceError {
    #[error("request failed: {0}")]
    Transport(String),
    #[error("service responded with status {0}")]
    Status(u16),
    #[error("could not decode response: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for ServiceError {
    fn from(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            ServiceError::Status(status.as_u16())
        } else if err.is_decode() {
            ServiceError::Decode(err.to_string())
        } else {
            ServiceError::Transport(err.to_string())
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    #[error("page number must be positive, got {requested}")]
    InvalidPage { requested: i64 },
    #[error("failed to fetch page {page}: {source}")]
    FetchFailed {
        page: PageNumber,
        #[source]
        source: ServiceError,
    },
    #[error("failed to refresh annotations for page {page}: {source}")]
    AnnotationRefreshFailed {
        page: PageNumber,
        #[source]
        source: ServiceError,
    },
}
