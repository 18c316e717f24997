//! # note-tutor
//!
//! Turn lecture notes into study material with a vision LLM: a Markdown
//! summary and a five-option multiple-choice quiz.
//!
//! A note is some text plus evidence: either a list of image references
//! (photos of handwritten pages) or a single PDF. The images or rasterised
//! PDF pages are sent to the model alongside a fixed Korean prompt.
//!
//! ## Pipeline Overview
//!
//! ```text
//! NoteRequest
//!  │
//!  ├─ 1. Fetch     GET each image / the PDF (relative refs resolved against API_URL)
//!  ├─ 2. Render    PDF pages → 2× raster → JPEG (pdfium, spawn_blocking)
//!  ├─ 3. Generate  prompt + every image, in order, in one model call
//!  └─ 4. Parse     summary: trimmed Markdown · quiz: JSON array, invalid items dropped
//! ```
//!
//! Broken image links are skipped; a PDF that cannot be downloaded or
//! rendered fails the request.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use note_tutor::{study_pack, AssetFetcher, LlmGenerator, NoteRequest, ServiceConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Credential read from GEMINI_API_KEY
//!     let config = ServiceConfig::builder()
//!         .base_url("http://localhost:8080")
//!         .build()?;
//!     let generator = LlmGenerator::from_config(&config)?;
//!     let fetcher = AssetFetcher::new(&config)?;
//!
//!     let request = NoteRequest::new("Virtual memory and paging")
//!         .with_images(["/files/notes/12/page1.png", "/files/notes/12/page2.png"]);
//!     let pack = study_pack(&request, &fetcher, &generator, None).await?;
//!     println!("{}", pack.summary);
//!     eprintln!("{} quiz items", pack.quiz.len());
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature  | Default | Description |
//! |----------|---------|-------------|
//! | `server` | on      | Enables the `note-tutor` binary (clap + anyhow + dotenv + tracing-subscriber) |
//!
//! The axum router itself is part of the library and always available.

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod error;
pub mod generate;
pub mod model;
pub mod pipeline;
pub mod prompts;
pub mod server;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ServiceConfig, ServiceConfigBuilder};
pub use error::{AssetError, NoteError};
pub use generate::{
    generate_artifact, generate_quiz, quiz_for_note, study_pack, summarize, ArtifactKind,
    StudyPack,
};
pub use model::{GenerationResult, ImageMime, ImagePayload, NoteRequest, QuizItem};
pub use pipeline::evidence::{collect_evidence, EvidenceReport, EvidenceSource};
pub use pipeline::fetch::AssetFetcher;
pub use pipeline::llm::{Generator, LlmGenerator};
pub use pipeline::parse::parse_quiz_array;
pub use server::{router, AppState};
