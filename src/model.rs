//! Request-scoped data types shared by the pipeline and the HTTP layer.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of answer options every quiz question must carry.
pub const QUIZ_OPTION_COUNT: usize = 5;

/// A note submitted for summarisation or quiz generation.
///
/// Either `image_refs` or `pdf_ref` is expected to be populated. When both
/// are, the images win and the PDF is ignored.
#[derive(Debug, Clone, Default)]
pub struct NoteRequest {
    pub note_text: String,
    /// Absolute URLs or base-relative paths (leading `/`), in reading order.
    pub image_refs: Vec<String>,
    pub pdf_ref: Option<String>,
}

impl NoteRequest {
    pub fn new(note_text: impl Into<String>) -> Self {
        Self {
            note_text: note_text.into(),
            ..Default::default()
        }
    }

    pub fn with_images<I, S>(mut self, refs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.image_refs = refs.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_pdf(mut self, reference: impl Into<String>) -> Self {
        self.pdf_ref = Some(reference.into());
        self
    }

    /// `false` when neither images nor a PDF were supplied.
    pub fn has_evidence(&self) -> bool {
        !self.image_refs.is_empty() || self.pdf_ref.as_deref().is_some_and(|p| !p.is_empty())
    }
}

/// MIME type of an inline image sent to the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageMime {
    /// Directly downloaded images are assumed to be PNG.
    Png,
    /// Rasterised PDF pages are re-encoded as JPEG.
    Jpeg,
}

impl ImageMime {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageMime::Png => "image/png",
            ImageMime::Jpeg => "image/jpeg",
        }
    }
}

impl fmt::Display for ImageMime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One image of evidence, raw bytes plus the MIME type the model is told.
#[derive(Clone, PartialEq, Eq)]
pub struct ImagePayload {
    pub mime: ImageMime,
    pub data: Vec<u8>,
}

impl ImagePayload {
    pub fn png(data: Vec<u8>) -> Self {
        Self {
            mime: ImageMime::Png,
            data,
        }
    }

    pub fn jpeg(data: Vec<u8>) -> Self {
        Self {
            mime: ImageMime::Jpeg,
            data,
        }
    }
}

impl fmt::Debug for ImagePayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImagePayload")
            .field("mime", &self.mime)
            .field("bytes", &self.data.len())
            .finish()
    }
}

/// A single multiple-choice question.
///
/// Field names follow the JSON contract the model is asked to emit
/// (`answerIndex` in camelCase).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizItem {
    pub question: String,
    pub options: Vec<String>,
    pub answer_index: usize,
    pub explanation: String,
}

impl QuizItem {
    /// Exactly five options and an answer index that points into them.
    pub fn is_well_formed(&self) -> bool {
        self.options.len() == QUIZ_OPTION_COUNT && self.answer_index < self.options.len()
    }
}

/// The artifact produced by one generation call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationResult {
    /// Markdown summary, trimmed.
    Summary(String),
    /// Parsed quiz; may be empty when the model output was unusable.
    QuizList(Vec<QuizItem>),
}
