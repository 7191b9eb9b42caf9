use thiserror::Error as ThisError;

/// Failures at the record-fetch boundary.
#[derive(Debug, ThisError)]
pub enum FetchError {
    /// The credential was rejected. Callers must send the user back to login.
    #[error("unauthorized: session expired or token rejected")]
    Unauthorized,

    #[error("network failure: {0}")]
    Network(String),

    #[error("quotation not found: {0}")]
    NotFound(String),
}

#[derive(Debug, ThisError)]
pub enum RenderError {
    #[error("malformed quotation record: {0}")]
    MalformedRecord(String),
}

#[derive(Debug, ThisError)]
pub enum ExportError {
    #[error("brand asset unavailable: {0}")]
    AssetUnavailable(String),

    #[error("PDF serialization failed: {0}")]
    Serialization(String),
}

#[derive(Debug, ThisError)]
pub enum Error {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error(transparent)]
    Export(#[from] ExportError),

    #[error("page {page} already carries a header/footer overlay")]
    AlreadyDecorated { page: usize },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// True when the run was aborted because the caller has to log in again.
    pub fn requires_login(&self) -> bool {
        matches!(self, Error::Fetch(FetchError::Unauthorized))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
