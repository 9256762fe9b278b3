//! Error types for the TavernKit domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error variant.
//!
//! Note the propagation split: byte-level codec APIs return these typed
//! errors with `?`, while the file-level card codec catches them and
//! degrades to `None`/`false` plus a logged diagnostic, so one-shot
//! command handlers upstream never see a panic or a raw error chain.

use thiserror::Error;

/// The top-level error type for all TavernKit operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Card codec errors ---
    #[error("Card error: {0}")]
    Card(#[from] CardError),

    // --- PNG container errors ---
    #[error("PNG error: {0}")]
    Png(#[from] PngError),

    // --- Document store errors ---
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    // --- Chat backend errors ---
    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),

    // --- Configuration errors ---
    #[error("Configuration error: {message}")]
    Config { message: String },

    // --- Serialization ---
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // --- Generic ---
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

// --- Bounded context errors ---

/// Errors from the character-card codec layer.
#[derive(Debug, Error)]
pub enum CardError {
    /// No text chunk with the reserved keyword exists in the PNG.
    #[error("No PNG metadata for keyword '{keyword}'")]
    NotFound { keyword: String },

    /// The chunk payload is not valid base64 / UTF-8 / JSON.
    #[error("Malformed card payload: {0}")]
    MalformedPayload(String),

    #[error("PNG container error: {0}")]
    Png(#[from] PngError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors from the PNG chunk container.
#[derive(Debug, Error)]
pub enum PngError {
    #[error("Not a PNG: bad signature")]
    BadSignature,

    #[error("Truncated PNG: {0}")]
    Truncated(&'static str),

    #[error("CRC mismatch in '{kind}' chunk (stored {stored:#010x}, computed {computed:#010x})")]
    CrcMismatch {
        kind: String,
        stored: u32,
        computed: u32,
    },

    #[error("Chunk length {0} exceeds remaining input")]
    OversizedChunk(u32),
}

/// Errors from the document store boundary.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Document not found: {0}")]
    NotFound(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

/// Errors from the chat-completion backend boundary.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("API request failed: {message} (status: {status_code})")]
    ApiError { status_code: u16, message: String },

    #[error("Backend not configured: {0}")]
    NotConfigured(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Network error: {0}")]
    Network(String),
}
