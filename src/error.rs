use thiserror::Error;

/// Errors raised by the document core.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid page range: {0}")]
    InvalidRange(String),

    #[error("document mutation failed: {0}")]
    DocumentMutation(String),

    #[error("incorrect password")]
    Password,

    #[error("documents protected by a non-empty user password are not supported")]
    UnsupportedEncryption,

    #[error("render failed: {0}")]
    Render(String),

    #[error("OCR failed: {0}")]
    Ocr(String),

    #[error(transparent)]
    Pdf(#[from] lopdf::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn not_open() -> Self {
        Error::DocumentMutation("no PDF document open".to_string())
    }
}
