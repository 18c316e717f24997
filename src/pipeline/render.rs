//! PDF rasterisation: every page of an in-memory PDF → JPEG [`ImagePayload`].
//!
//! ## Why spawn_blocking?
//!
//! The `pdfium-render` crate wraps the pdfium C++ library, which uses
//! thread-local state internally and is not safe to call from async contexts.
//! `tokio::task::spawn_blocking` moves the work onto the blocking pool so the
//! request-serving worker threads never stall on CPU-heavy rendering.
//!
//! ## All or nothing
//!
//! Page order is reading order for the model, so a document that fails on
//! page 4 of 10 yields an error, never the first three pages. The
//! `PdfDocument` handle is an RAII value scoped to one call; it is closed when
//! `rasterize_blocking` returns, on success and on every `?`. Only the bound
//! library itself is shared across requests.

use crate::config::RENDER_SCALE;
use crate::error::NoteError;
use crate::model::ImagePayload;
use crate::pipeline::encode::encode_jpeg;
use pdfium_render::prelude::*;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, info};

/// Process-wide pdfium instance. Dropping a `Pdfium` tears the library down,
/// so one instance is bound lazily and kept for the life of the process.
static PDFIUM: Mutex<Option<&'static Pdfium>> = Mutex::new(None);

/// Rasterise every page of `bytes`, in document order.
pub async fn rasterize(
    bytes: Vec<u8>,
    pdfium_lib_path: Option<PathBuf>,
) -> Result<Vec<ImagePayload>, NoteError> {
    tokio::task::spawn_blocking(move || rasterize_blocking(&bytes, pdfium_lib_path.as_deref()))
        .await
        .map_err(|e| NoteError::Internal(format!("Render task panicked: {}", e)))?
}

/// Bind to a pdfium library.
///
/// Resolution order: the explicit `lib_path`, then a library in the working
/// directory, then the system library path.
pub fn bind_pdfium(lib_path: Option<&Path>) -> Result<Pdfium, NoteError> {
    let bindings = match lib_path {
        Some(path) => Pdfium::bind_to_library(path),
        None => Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path("./"))
            .or_else(|_| Pdfium::bind_to_system_library()),
    }
    .map_err(|e| NoteError::PdfiumBindingFailed(format!("{:?}", e)))?;

    Ok(Pdfium::new(bindings))
}

/// The shared pdfium instance, binding it on first use.
///
/// `lib_path` only matters for the first successful call.
pub fn shared_pdfium(lib_path: Option<&Path>) -> Result<&'static Pdfium, NoteError> {
    let mut slot = PDFIUM
        .lock()
        .map_err(|_| NoteError::Internal("pdfium lock poisoned".into()))?;
    if let Some(pdfium) = *slot {
        return Ok(pdfium);
    }
    let pdfium: &'static Pdfium = Box::leak(Box::new(bind_pdfium(lib_path)?));
    info!("pdfium library bound");
    *slot = Some(pdfium);
    Ok(pdfium)
}

/// Blocking implementation of [`rasterize`].
pub fn rasterize_blocking(
    bytes: &[u8],
    pdfium_lib_path: Option<&Path>,
) -> Result<Vec<ImagePayload>, NoteError> {
    if bytes.len() < 4 || &bytes[..4] != b"%PDF" {
        return Err(NoteError::CorruptPdf {
            detail: format!(
                "missing %PDF header (first bytes: {:?})",
                &bytes[..bytes.len().min(4)]
            ),
        });
    }

    let pdfium = shared_pdfium(pdfium_lib_path)?;

    let document = pdfium
        .load_pdf_from_byte_slice(bytes, None)
        .map_err(|e| NoteError::CorruptPdf {
            detail: format!("{:?}", e),
        })?;

    let pages = document.pages();
    let total_pages = pages.len() as usize;
    info!("PDF loaded: {} pages", total_pages);

    if total_pages == 0 {
        return Err(NoteError::EmptyPdf);
    }

    let render_config = PdfRenderConfig::new().scale_page_by_factor(RENDER_SCALE);

    let mut payloads = Vec::with_capacity(total_pages);

    // Indexed access rather than `pages.iter()`: the iterator ends silently on
    // a page that fails to load, which would truncate the list.
    for idx in 0..total_pages {
        let page = pages
            .get(idx as u16)
            .map_err(|e| NoteError::RasterisationFailed {
                page: idx + 1,
                detail: format!("{:?}", e),
            })?;

        let bitmap = page.render_with_config(&render_config).map_err(|e| {
            NoteError::RasterisationFailed {
                page: idx + 1,
                detail: format!("{:?}", e),
            }
        })?;

        let image = bitmap.as_image();
        let jpeg = encode_jpeg(&image).map_err(|e| NoteError::RasterisationFailed {
            page: idx + 1,
            detail: format!("JPEG encoding failed: {}", e),
        })?;

        debug!(
            "Converted PDF page {} → {}x{} px, {} bytes",
            idx + 1,
            image.width(),
            image.height(),
            jpeg.len()
        );

        payloads.push(ImagePayload::jpeg(jpeg));
    }

    Ok(payloads)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ImageMime;

    /// Build a minimal, well-formed PDF with `pages` blank US-letter pages.
    ///
    /// Offsets in the xref table are computed exactly so pdfium does not need
    /// to fall back to its repair path.
    fn blank_pdf(pages: usize) -> Vec<u8> {
        let mut objects: Vec<String> = Vec::new();
        objects.push("<< /Type /Catalog /Pages 2 0 R >>".to_string());
        let kids: Vec<String> = (0..pages).map(|i| format!("{} 0 R", i + 3)).collect();
        objects.push(format!(
            "<< /Type /Pages /Kids [{}] /Count {} >>",
            kids.join(" "),
            pages
        ));
        for _ in 0..pages {
            objects.push("<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] >>".to_string());
        }

        let mut out = String::from("%PDF-1.4\n");
        let mut offsets = Vec::with_capacity(objects.len());
        for (i, body) in objects.iter().enumerate() {
            offsets.push(out.len());
            out.push_str(&format!("{} 0 obj\n{}\nendobj\n", i + 1, body));
        }
        let xref_at = out.len();
        out.push_str(&format!("xref\n0 {}\n", objects.len() + 1));
        out.push_str("0000000000 65535 f \n");
        for off in offsets {
            out.push_str(&format!("{:010} 00000 n \n", off));
        }
        out.push_str(&format!(
            "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
            objects.len() + 1,
            xref_at
        ));
        out.into_bytes()
    }

    /// `true` when a pdfium library can be bound on this machine.
    fn pdfium_available() -> bool {
        shared_pdfium(lib_path().as_deref()).is_ok()
    }

    fn lib_path() -> Option<PathBuf> {
        std::env::var_os("PDFIUM_LIB_PATH").map(PathBuf::from)
    }

    #[test]
    fn non_pdf_bytes_are_rejected_before_binding() {
        let err = rasterize_blocking(b"\x89PNG\r\n\x1a\n", None).unwrap_err();
        assert!(matches!(err, NoteError::CorruptPdf { .. }), "got {err:?}");
    }

    #[test]
    fn empty_input_is_corrupt() {
        let err = rasterize_blocking(&[], None).unwrap_err();
        assert!(matches!(err, NoteError::CorruptPdf { .. }));
    }

    #[test]
    fn renders_one_jpeg_per_page_in_order() {
        if !pdfium_available() {
            println!("SKIP — no pdfium library (set PDFIUM_LIB_PATH)");
            return;
        }
        let pdf = blank_pdf(3);
        let payloads = rasterize_blocking(&pdf, lib_path().as_deref()).expect("render");
        assert_eq!(payloads.len(), 3);
        for p in &payloads {
            assert_eq!(p.mime, ImageMime::Jpeg);
            let img = image::load_from_memory(&p.data).unwrap();
            // 612x792 pt at 2x
            assert!((1223..=1225).contains(&img.width()), "width {}", img.width());
            assert!((1583..=1585).contains(&img.height()), "height {}", img.height());
        }
    }

    #[test]
    fn truncated_pdf_fails_without_partial_output() {
        if !pdfium_available() {
            println!("SKIP — no pdfium library (set PDFIUM_LIB_PATH)");
            return;
        }
        let mut pdf = b"%PDF-1.4\n".to_vec();
        pdf.extend_from_slice(&[0x00, 0x13, 0x37, 0xFF].repeat(64));
        let err = rasterize_blocking(&pdf, lib_path().as_deref()).unwrap_err();
        assert!(err.is_unavailable(), "got {err:?}");
    }

    #[tokio::test]
    async fn async_wrapper_propagates_errors() {
        let err = rasterize(b"not a pdf".to_vec(), None).await.unwrap_err();
        assert!(matches!(err, NoteError::CorruptPdf { .. }));
    }
}
