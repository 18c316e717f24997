//! Evidence normalisation: turn a [`NoteRequest`] into ordered image payloads.
//!
//! Images and PDFs are treated asymmetrically. A broken link among several
//! note images is skipped and recorded; the rest still go to the model. A
//! PDF is a single source, so a failed download or render fails the request.
//!
//! When both images and a PDF are supplied, only the images are used.

use crate::error::{AssetError, NoteError};
use crate::model::{ImagePayload, NoteRequest};
use crate::pipeline::fetch::AssetFetcher;
use crate::pipeline::render::rasterize;
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// Where the evidence came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvidenceSource {
    /// Directly referenced images; `requested` counts every reference,
    /// including ones that were skipped.
    Images { requested: usize },
    /// Rasterised PDF pages.
    Pdf { pages: usize },
}

/// Outcome of evidence collection.
#[derive(Debug, Clone)]
pub struct EvidenceReport {
    /// Payloads in input (or page) order.
    pub payloads: Vec<ImagePayload>,
    /// Image references that could not be downloaded.
    pub skipped: Vec<AssetError>,
    pub source: EvidenceSource,
}

impl EvidenceReport {
    pub fn is_empty(&self) -> bool {
        self.payloads.is_empty()
    }
}

/// Collect the evidence for `request`.
///
/// Images are downloaded one at a time in the order given. Failures are
/// absorbed into [`EvidenceReport::skipped`], even when every image fails.
/// For a PDF, download and rasterisation errors are returned as-is
/// (see [`NoteError::is_unavailable`]).
pub async fn collect_evidence(
    request: &NoteRequest,
    fetcher: &AssetFetcher,
    pdfium_lib_path: Option<PathBuf>,
) -> Result<EvidenceReport, NoteError> {
    if !request.image_refs.is_empty() {
        return Ok(collect_images(&request.image_refs, fetcher).await);
    }

    match request.pdf_ref.as_deref() {
        Some(pdf_ref) if !pdf_ref.is_empty() => {
            let bytes = fetcher.fetch(pdf_ref).await?;
            let payloads = rasterize(bytes, pdfium_lib_path).await?;
            info!("Rasterised PDF '{}' into {} pages", pdf_ref, payloads.len());
            Ok(EvidenceReport {
                source: EvidenceSource::Pdf {
                    pages: payloads.len(),
                },
                payloads,
                skipped: Vec::new(),
            })
        }
        _ => Err(NoteError::MissingEvidence),
    }
}

async fn collect_images(refs: &[String], fetcher: &AssetFetcher) -> EvidenceReport {
    let mut payloads = Vec::with_capacity(refs.len());
    let mut skipped = Vec::new();

    for reference in refs {
        match fetcher.fetch(reference).await {
            Ok(bytes) => {
                debug!("Image '{}': {} bytes", reference, bytes.len());
                payloads.push(ImagePayload::png(bytes));
            }
            Err(e) => {
                warn!("Skipping image '{}': {}", reference, e);
                skipped.push(AssetError::from_fetch(reference, &e));
            }
        }
    }

    info!(
        "Collected {}/{} images ({} skipped)",
        payloads.len(),
        refs.len(),
        skipped.len()
    );

    EvidenceReport {
        payloads,
        skipped,
        source: EvidenceSource::Images {
            requested: refs.len(),
        },
    }
}
