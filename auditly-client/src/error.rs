use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuditError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Audit service returned status {0}")]
    Status(u16),

    #[error("Could not build HTTP client: {0}")]
    ClientBuild(String),
}

pub type Result<T> = std::result::Result<T, AuditError>;
