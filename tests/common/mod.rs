pub mod fixtures;

use lopdf::Document as LopdfDocument;

pub type TestResult = Result<(), Box<dyn std::error::Error>>;

/// Wrapper around a generated PDF with helper methods.
pub struct GeneratedPdf {
    pub bytes: Vec<u8>,
    pub doc: LopdfDocument,
}

impl GeneratedPdf {
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, Box<dyn std::error::Error>> {
        let doc = LopdfDocument::load_mem(&bytes)?;
        Ok(Self { bytes, doc })
    }

    pub fn page_count(&self) -> usize {
        self.doc.get_pages().len()
    }

    /// Extracts the text content of every page, in page order.
    pub fn extract_text(&self) -> Result<String, Box<dyn std::error::Error>> {
        let mut text = String::new();
        let pages = self.doc.get_pages();
        for page_num in 1..=pages.len() {
            match self.doc.extract_text(&[page_num as u32]) {
                Ok(page_text) => {
                    text.push_str(&page_text);
                    text.push('\n');
                }
                Err(e) => {
                    eprintln!("Warning: could not extract text from page {}: {}", page_num, e);
                }
            }
        }
        Ok(text)
    }
}
