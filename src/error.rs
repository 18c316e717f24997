//! Error types for the note-tutor library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`NoteError`] — **Fatal**: the request cannot produce an artifact (the PDF
//!   could not be fetched or rasterised, no evidence was supplied, the model
//!   call failed). Returned as `Err(NoteError)` from the pipeline entry points
//!   and mapped to an HTTP 400 by the server.
//!
//! * [`AssetError`] — **Non-fatal**: one image of a multi-image note could not
//!   be downloaded. The evidence normalizer skips it and records it in
//!   [`crate::pipeline::evidence::EvidenceReport::skipped`]; the request
//!   carries on with the images that did arrive.

use thiserror::Error;

/// All fatal errors returned by the note-tutor library.
#[derive(Debug, Error)]
pub enum NoteError {
    // ── Download errors ───────────────────────────────────────────────────
    /// GET failed at the network level or returned a non-success status.
    #[error("Failed to download '{url}': {reason}")]
    DownloadFailed { url: String, reason: String },

    /// Download exceeded the configured timeout.
    #[error("Download timed out after {secs}s for '{url}'")]
    DownloadTimeout { url: String, secs: u64 },

    // ── PDF errors ────────────────────────────────────────────────────────
    /// The bytes are not a PDF, or pdfium could not open them.
    #[error("PDF is corrupt or unreadable: {detail}")]
    CorruptPdf { detail: String },

    /// The PDF opened but has no pages to render.
    #[error("PDF contains no pages")]
    EmptyPdf,

    /// pdfium-render returned an error for a specific page.
    #[error("Rasterisation failed for page {page}: {detail}")]
    RasterisationFailed { page: usize, detail: String },

    /// Could not bind to a pdfium library.
    #[error(
        "Failed to bind to pdfium library: {0}\n\
Set PDFIUM_LIB_PATH=/path/to/libpdfium or place the library in the working directory."
    )]
    PdfiumBindingFailed(String),

    // ── Request errors ────────────────────────────────────────────────────
    /// Neither image references nor a PDF reference were supplied.
    #[error("imageUrls or pdfUrl is required")]
    MissingEvidence,

    // ── LLM errors ────────────────────────────────────────────────────────
    /// The configured provider could not be constructed (missing API key etc.).
    #[error("LLM provider '{provider}' is not configured.\n{hint}")]
    ProviderNotConfigured { provider: String, hint: String },

    /// The model call failed or returned nothing usable.
    #[error("Generation failed: {message}")]
    GenerationFailed { message: String },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl NoteError {
    /// `true` when the evidence for a request could not be produced at all
    /// (PDF download or rasterisation), as opposed to a model-side failure.
    pub fn is_unavailable(&self) -> bool {
        matches!(
            self,
            NoteError::DownloadFailed { .. }
                | NoteError::DownloadTimeout { .. }
                | NoteError::CorruptPdf { .. }
                | NoteError::EmptyPdf
                | NoteError::RasterisationFailed { .. }
                | NoteError::PdfiumBindingFailed(_)
        )
    }
}

/// A non-fatal error for a single image reference.
#[derive(Debug, Clone, Error, serde::Serialize)]
#[error("Skipped image '{reference}': {reason}")]
pub struct AssetError {
    /// The reference exactly as the caller supplied it.
    pub reference: String,
    pub reason: String,
}

impl AssetError {
    pub(crate) fn from_fetch(reference: &str, err: &NoteError) -> Self {
        Self {
            reference: reference.to_string(),
            reason: err.to_string(),
        }
    }
}
