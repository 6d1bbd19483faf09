//! Test fixtures and PDF builders.
//!
//! Provides builders for clinical report PDFs with known identifier content,
//! following the Builder pattern for clean test setup.

use anyhow::Result;
use printpdf::*;
use std::fs;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

/// Builder for test PDFs, one text line per drawn row.
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// # use anyhow::Result;
/// # fn main() -> Result<()> {
/// let pdf = TestPdfBuilder::new()
///     .with_line("Patient: Ada Lovelace")
///     .with_line("Sex: Female")
///     .new_page()
///     .with_line("Findings: unremarkable")
///     .build(Path::new("/tmp/report.pdf"))?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct TestPdfBuilder {
    title: String,
    pages: Vec<Vec<String>>,
    page_width: Mm,
    page_height: Mm,
}

impl TestPdfBuilder {
    pub fn new() -> Self {
        Self {
            title: "Test Document".to_string(),
            pages: vec![Vec::new()],
            page_width: Mm(210.0),  // A4 width
            page_height: Mm(297.0), // A4 height
        }
    }

    pub fn with_title(mut self, title: &str) -> Self {
        self.title = title.to_string();
        self
    }

    /// Adds a line of text to the current page.
    pub fn with_line(mut self, line: &str) -> Self {
        if let Some(page) = self.pages.last_mut() {
            page.push(line.to_string());
        }
        self
    }

    pub fn with_lines(self, lines: &[&str]) -> Self {
        lines.iter().fold(self, |builder, line| builder.with_line(line))
    }

    /// Starts a new page; following lines land on it.
    pub fn new_page(mut self) -> Self {
        self.pages.push(Vec::new());
        self
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Builds the PDF and writes it to the specified path.
    pub fn build(self, output_path: &Path) -> Result<PathBuf> {
        let (doc, first_page, first_layer) =
            PdfDocument::new(&self.title, self.page_width, self.page_height, "Layer 1");
        let font = doc.add_builtin_font(BuiltinFont::Helvetica)?;

        for (index, lines) in self.pages.iter().enumerate() {
            let (page, layer) = if index == 0 {
                (first_page, first_layer)
            } else {
                doc.add_page(self.page_width, self.page_height, "Layer 1")
            };
            let layer = doc.get_page(page).get_layer(layer);

            for (row, line) in lines.iter().enumerate() {
                let y = 270.0 - 10.0 * row as f32;
                layer.use_text(line.as_str(), 12.0, Mm(20.0), Mm(y), &font);
            }
        }

        doc.save(&mut BufWriter::new(fs::File::create(output_path)?))?;
        Ok(output_path.to_path_buf())
    }

    /// Builds the PDF in memory.
    pub fn build_bytes(self) -> Result<Vec<u8>> {
        let dir = tempfile::TempDir::new()?;
        let path = self.build(&dir.path().join("fixture.pdf"))?;
        Ok(fs::read(path)?)
    }
}

impl Default for TestPdfBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub const PATIENT_NAME: &str = "Ada Lovelace";
pub const STUDY_ID: &str = "3f2b8c1e-9d4a-4e7b-8c2d-1a5f6e7b9c0d";

/// Clinical prose that must survive redaction.
pub const FINDINGS: &str = "Findings: mild degenerative changes";
pub const IMPRESSION: &str = "Impression: no acute abnormality";

/// A two-page imaging report with a full identifier header on page one and
/// the bare patient name repeated in the page-two header.
pub fn clinical_report() -> TestPdfBuilder {
    TestPdfBuilder::new()
        .with_title("Imaging Report")
        .with_lines(&[
            &format!("Patient: {}", PATIENT_NAME),
            "Sex: Female",
            "DOB: 1990-01-31",
            "Height: 170 cm",
            "Weight: 62 kg",
            "Scan Time: 2024-03-02 09:14",
            "Facility: Northside Imaging Center",
            &format!("Study: {}", STUDY_ID),
            FINDINGS,
        ])
        .new_page()
        .with_lines(&[PATIENT_NAME, IMPRESSION])
}

/// Writes [`clinical_report`] to `path`.
pub fn create_clinical_report(path: &Path) -> Result<PathBuf> {
    clinical_report().build(path)
}

/// A report that carries no `Patient:` line at all.
pub fn create_anonymous_report(path: &Path) -> Result<PathBuf> {
    TestPdfBuilder::new()
        .with_title("Lab Summary")
        .with_lines(&["Lab Summary", "Collected: 2024-05-06", FINDINGS])
        .build(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_builder_pattern() {
        let builder = TestPdfBuilder::new()
            .with_title("Test")
            .with_line("one")
            .new_page()
            .with_line("two");

        assert_eq!(builder.title, "Test");
        assert_eq!(builder.page_count(), 2);
    }

    #[test]
    fn test_create_clinical_report() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let pdf_path = temp_dir.path().join("report.pdf");

        create_clinical_report(&pdf_path)?;

        assert!(pdf_path.exists());
        Ok(())
    }
}
