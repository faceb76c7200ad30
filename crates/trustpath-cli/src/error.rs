use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("PKI error: {0}")]
    Pki(#[from] trustpath_pki::PkiError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Verification failed: {0}")]
    VerificationFailed(String),
}

pub type CliResult<T> = Result<T, CliError>;
