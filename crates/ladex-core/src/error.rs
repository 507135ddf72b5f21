//! Error types for the ladex-core library.

use thiserror::Error;

/// Main error type for the ladex library.
#[derive(Error, Debug)]
pub enum LadexError {
    /// Text recognition (OCR) error.
    #[error("OCR error: {0}")]
    Ocr(#[from] OcrError),

    /// Remote extraction error.
    #[error("remote extraction error: {0}")]
    Remote(#[from] RemoteError),

    /// Output persistence error.
    #[error("output error: {0}")]
    Output(#[from] OutputError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors related to acquiring text from a document.
#[derive(Error, Debug)]
pub enum OcrError {
    /// Failed to read the input file.
    #[error("failed to read document: {0}")]
    Read(#[from] std::io::Error),

    /// Failed to extract or render PDF content.
    #[error("PDF processing failed: {0}")]
    Pdf(String),

    /// The external OCR engine failed.
    #[error("OCR engine failed: {0}")]
    Engine(String),

    /// Neither the PDF nor the image interpretation produced any text.
    #[error("no text recognized in document")]
    NoText,

    /// File extension not handled by the reader.
    #[error("unsupported document format: {0}")]
    UnsupportedFormat(String),
}

/// Errors from the remote (LLM) extractor adapter.
///
/// Quota exhaustion is deliberately *not* an error: the adapter reports it as
/// a [`crate::remote::RemoteOutcome::QuotaExhausted`] value so callers can
/// fall back without sniffing error messages.
#[derive(Error, Debug)]
pub enum RemoteError {
    /// No API credential configured.
    #[error("OPENAI_API_KEY missing - set it in the environment")]
    MissingCredential,

    /// Transport-level failure (connect, TLS, timeout).
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-retryable API error.
    #[error("API error (HTTP {status}): {detail}")]
    Api { status: u16, detail: String },

    /// Retryable statuses kept failing until the attempt budget ran out.
    #[error("gave up after {attempts} attempts (last HTTP {status})")]
    RetriesExhausted { attempts: u32, status: u16 },

    /// The completion did not contain a parsable JSON record.
    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

/// Reasons the net-weight derivation was skipped.
///
/// Surfaced as an explicit value so the silent-null behavior is a visible,
/// testable branch.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DerivationError {
    /// A required input field is null.
    #[error("missing input field: {0}")]
    MissingInput(&'static str),

    /// An input is NaN or infinite.
    #[error("non-finite value for {0}")]
    NonFinite(&'static str),
}

/// Errors from the output sink.
#[derive(Error, Debug)]
pub enum OutputError {
    /// Filesystem failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV serialization failure.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization failure.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for the ladex library.
pub type Result<T> = std::result::Result<T, LadexError>;
