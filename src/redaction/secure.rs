//! Secure redaction strategy using MuPDF.
//!
//! This strategy physically removes text from PDF documents using MuPDF's
//! redaction API, ensuring that redacted content cannot be recovered.

use super::strategy::{RedactionResult, RedactionStrategy};
use crate::error::{RedactorError, RedactorResult};
use regex::Regex;
use std::path::Path;

use mupdf::pdf::{PdfAnnotationType, PdfDocument, PdfPage};
use mupdf::Rect as MuRect;

/// Secure redaction strategy that physically removes text using MuPDF.
///
/// For every page:
/// 1. Runs each pattern over the page's extracted text
/// 2. Searches the page for every matched substring and creates a redaction
///    annotation over each hit
/// 3. Applies the page's redactions (black fill, content removed) before
///    moving on
///
/// **Security**: Redacted text is completely removed and cannot be extracted.
#[derive(Debug, Clone)]
pub struct SecureRedactionStrategy {
    /// Maximum search hits per matched substring on one page
    max_hits: u32,
}

impl Default for SecureRedactionStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl SecureRedactionStrategy {
    /// Creates a new secure redaction strategy with default settings.
    pub fn new() -> Self {
        Self { max_hits: 100 }
    }

    /// Sets the maximum number of search hits per matched substring.
    pub fn with_max_hits(mut self, max_hits: u32) -> Self {
        self.max_hits = max_hits;
        self
    }

    /// Collects distinct matched substrings on one page, in pattern order.
    fn page_needles(page_text: &str, patterns: &[Regex]) -> Vec<String> {
        let mut needles: Vec<String> = Vec::new();
        for pattern in patterns {
            for m in pattern.find_iter(page_text) {
                let needle = m.as_str().trim();
                if !needle.is_empty() && !needles.iter().any(|n| n == needle) {
                    needles.push(needle.to_string());
                }
            }
        }
        needles
    }

    /// Applies redactions to a PDF using MuPDF.
    fn apply_mupdf_redactions(
        &self,
        pdf_doc: &PdfDocument,
        page_texts: &[String],
        patterns: &[Regex],
    ) -> RedactorResult<RedactionResult> {
        let page_count = pdf_doc
            .page_count()
            .map_err(|e| RedactorError::BackendError {
                backend: "MuPDF".to_string(),
                message: format!("Failed to get page count: {}", e),
                source: Some(Box::new(e)),
            })?;

        let mut result = RedactionResult {
            pages_processed: page_count as usize,
            secure: true,
            ..Default::default()
        };

        for page_idx in 0..page_count {
            let page_text = page_texts
                .get(page_idx as usize)
                .map(String::as_str)
                .unwrap_or_default();
            let needles = Self::page_needles(page_text, patterns);
            if needles.is_empty() {
                continue;
            }

            let page = pdf_doc
                .load_page(page_idx)
                .map_err(|e| RedactorError::PdfProcessing {
                    message: format!("Failed to load page {}", page_idx + 1),
                    page: Some(page_idx as usize + 1),
                    source: Some(Box::new(e)),
                })?;

            // Convert to PDF page for annotation support
            let mut pdf_page = match PdfPage::try_from(page.clone()) {
                Ok(p) => p,
                Err(_) => continue,
            };

            let mut page_redactions = 0;

            for needle in &needles {
                let hits = page.search(needle, self.max_hits).map_err(|e| {
                    RedactorError::BackendError {
                        backend: "MuPDF".to_string(),
                        message: format!("Search failed on page {}", page_idx + 1),
                        source: Some(Box::new(e)),
                    }
                })?;

                for quad in hits {
                    let annot = pdf_page
                        .create_annotation(PdfAnnotationType::Redact)
                        .map_err(|e| RedactorError::PdfProcessing {
                            message: "Failed to create redaction annotation".to_string(),
                            page: Some(page_idx as usize + 1),
                            source: Some(Box::new(e)),
                        })?;

                    let rect = MuRect {
                        x0: quad.ul.x.min(quad.ll.x).min(quad.ur.x).min(quad.lr.x),
                        y0: quad.ul.y.min(quad.ll.y).min(quad.ur.y).min(quad.lr.y),
                        x1: quad.ul.x.max(quad.ll.x).max(quad.ur.x).max(quad.lr.x),
                        y1: quad.ul.y.max(quad.ll.y).max(quad.ur.y).max(quad.lr.y),
                    };

                    unsafe {
                        ffi::set_annotation_rect(&annot, rect);
                    }

                    page_redactions += 1;
                }
            }

            if page_redactions > 0 {
                pdf_page
                    .redact()
                    .map_err(|e| RedactorError::PdfProcessing {
                        message: format!("Failed to apply redactions on page {}", page_idx + 1),
                        page: Some(page_idx as usize + 1),
                        source: Some(Box::new(e)),
                    })?;

                tracing::debug!(
                    page = page_idx + 1,
                    redactions = page_redactions,
                    "Applied page redactions"
                );
                result.instances_redacted += page_redactions;
                result.pages_modified += 1;
            }
        }

        Ok(result)
    }
}

impl RedactionStrategy for SecureRedactionStrategy {
    fn redact(
        &self,
        input: &Path,
        output: &Path,
        patterns: &[Regex],
    ) -> RedactorResult<RedactionResult> {
        if patterns.is_empty() {
            std::fs::copy(input, output).map_err(|e| RedactorError::Io {
                path: output.to_path_buf(),
                source: e,
            })?;
            return Ok(RedactionResult::none());
        }

        let page_texts = self.extract_pages(input)?;

        let input_str = input.to_str().ok_or_else(|| RedactorError::InvalidInput {
            parameter: "input".to_string(),
            reason: "Path contains invalid UTF-8".to_string(),
        })?;

        let pdf_doc = PdfDocument::open(input_str).map_err(|e| RedactorError::PdfProcessing {
            message: "Failed to open PDF with MuPDF".to_string(),
            page: None,
            source: Some(Box::new(e)),
        })?;

        let result = self.apply_mupdf_redactions(&pdf_doc, &page_texts, patterns)?;

        if result.has_redactions() {
            let output_str = output.to_str().ok_or_else(|| RedactorError::InvalidInput {
                parameter: "output".to_string(),
                reason: "Path contains invalid UTF-8".to_string(),
            })?;

            pdf_doc
                .save(output_str)
                .map_err(|e| RedactorError::PdfProcessing {
                    message: "Failed to save redacted PDF".to_string(),
                    page: None,
                    source: Some(Box::new(e)),
                })?;
        } else {
            // Nothing matched: the output is the input, byte for byte
            std::fs::copy(input, output).map_err(|e| RedactorError::Io {
                path: output.to_path_buf(),
                source: e,
            })?;
        }

        Ok(result)
    }

    fn extract_pages(&self, input: &Path) -> RedactorResult<Vec<String>> {
        let bytes = std::fs::read(input).map_err(|e| RedactorError::Io {
            path: input.to_path_buf(),
            source: e,
        })?;

        pdf_extract::extract_text_from_mem_by_pages(&bytes).map_err(|e| {
            RedactorError::TextExtraction {
                path: input.to_path_buf(),
                reason: e.to_string(),
            }
        })
    }

    fn name(&self) -> &str {
        "SecureRedaction"
    }

    fn is_secure(&self) -> bool {
        true
    }
}

/// FFI helpers for MuPDF annotation operations.
mod ffi {
    use mupdf::pdf::PdfAnnotation;
    use mupdf::Rect;

    /// Sets the rectangle for a PDF annotation via FFI.
    ///
    /// # Safety
    /// The annotation must be valid and the context properly initialized.
    pub unsafe fn set_annotation_rect(annot: &PdfAnnotation, rect: Rect) {
        #[repr(C)]
        struct PdfAnnotRaw {
            inner: *mut mupdf_sys::pdf_annot,
        }

        let annot_raw = std::mem::transmute::<&PdfAnnotation, &PdfAnnotRaw>(annot);
        let ctx = mupdf_sys::mupdf_new_base_context();

        if !ctx.is_null() {
            let fz_rect = mupdf_sys::fz_rect {
                x0: rect.x0,
                y0: rect.y0,
                x1: rect.x1,
                y1: rect.y1,
            };

            mupdf_sys::pdf_set_annot_rect(ctx, annot_raw.inner, fz_rect);
            mupdf_sys::mupdf_drop_base_context(ctx);
        }
    }
}
