//! Pipeline stages that turn a note into model-ready evidence and back.
//!
//! Each submodule implements one step and is tested on its own.
//!
//! ## Data Flow
//!
//! ```text
//! fetch ──▶ render ──▶ encode ──▶ llm ──▶ parse
//! (HTTP)    (pdfium)   (JPEG/b64) (VLM)   (JSON array)
//!    └──────── evidence ────────┘
//! ```
//!
//! 1. [`fetch`]    — resolve a reference against the base URL and GET it
//! 2. [`render`]   — rasterise every PDF page at 2×; runs in `spawn_blocking`
//! 3. [`encode`]   — JPEG-encode pages, base64-wrap payloads for the request
//! 4. [`evidence`] — images (best effort) or PDF (all or nothing)
//! 5. [`llm`]      — one multimodal model call per artifact
//! 6. [`parse`]    — pull a quiz array out of free-form model output

pub mod encode;
pub mod evidence;
pub mod fetch;
pub mod llm;
pub mod parse;
pub mod render;
