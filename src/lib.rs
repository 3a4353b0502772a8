pub mod api;
pub mod assets;
pub mod compose;
pub mod error;

pub use error::PipelineError;

use devis_idf::SharedData;
use devis_layout::LayoutEngine;
use devis_model::{Quote, QuoteInput};
use devis_render::PdfRenderer;

/// Renders a validated quote to PDF bytes. Pure apart from the logo
/// bytes handed in by the caller; writing the result anywhere is the
/// caller's business.
pub fn render_quote(quote: &Quote, logo: Option<SharedData>) -> Result<Vec<u8>, PipelineError> {
    let stylesheet = compose::document_stylesheet();
    let blocks = compose::quote_blocks(quote, logo);

    let mut engine = LayoutEngine::new(stylesheet.clone());
    engine.layout_blocks(&blocks);
    let pages = engine.into_pages();

    let mut renderer = PdfRenderer::new(&format!("Devis {}", quote.number));
    Ok(renderer.render(&pages, &stylesheet.page)?)
}

/// Parses, validates and renders a raw JSON record in one step.
pub fn render_quote_json(input: &[u8], logo: Option<SharedData>) -> Result<Vec<u8>, PipelineError> {
    let raw: QuoteInput = serde_json::from_slice(input)?;
    let quote = raw.validate()?;
    render_quote(&quote, logo)
}
