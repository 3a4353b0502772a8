use std::collections::HashMap;

use devis_layout::{
    ImageElement, LayoutElement, MarkElement, Page, PositionedElement, TextElement,
};
use devis_style::{Border, Color, FontWeight, PageLayout, PageSize};
use printpdf::graphics::{LinePoint, Point, Polygon, PolygonRing, WindingOrder};
use printpdf::text::TextItem;
use printpdf::xobject::{XObject, XObjectTransform};
use printpdf::{
    BuiltinFont, Mm, Op, PaintMode, PdfConformance, PdfDocument, PdfPage, PdfSaveOptions, Pt, Rgb,
    TextMatrix, XObjectId,
};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("failed to decode brand asset image: {0}")]
    AssetDecode(String),
    #[error("internal PDF error: {0}")]
    InternalPdf(String),
}

/// Serializes laid-out pages to PDF bytes with `printpdf`.
///
/// Text is set in the base-14 Helvetica faces, so the produced document
/// embeds no font programs and the output depends on nothing but the
/// input pages.
pub struct PdfRenderer {
    document: PdfDocument,
    image_xobjects: HashMap<usize, (XObjectId, (u32, u32))>,
}

impl PdfRenderer {
    pub fn new(title: &str) -> Self {
        let mut document = PdfDocument::new(title);
        document.metadata.info.conformance = PdfConformance::X3_2002_PDF_1_3;
        PdfRenderer { document, image_xobjects: HashMap::new() }
    }

    pub fn render(&mut self, pages: &[Page], page_layout: &PageLayout) -> Result<Vec<u8>, RenderError> {
        log::debug!("serializing {} page(s)", pages.len());
        self.document.pages.clear();
        let (width_mm, height_mm) = Self::page_dimensions_mm(page_layout);
        for page in pages {
            let mut ops = Vec::new();
            for element in &page.elements {
                self.render_element(element, page_layout, &mut ops)?;
            }
            self.document.pages.push(PdfPage::new(width_mm, height_mm, ops));
        }
        let mut warnings = Vec::new();
        Ok(self.document.save(&PdfSaveOptions::default(), &mut warnings))
    }

    fn render_element(
        &mut self,
        element: &PositionedElement,
        page_layout: &PageLayout,
        ops: &mut Vec<Op>,
    ) -> Result<(), RenderError> {
        let page_height = Self::page_height_pt(page_layout);
        match &element.element {
            LayoutElement::Text(text) => self.render_text(text, element, page_height, ops),
            LayoutElement::Rect(rect) => {
                draw_rectangle(
                    element.x,
                    element.y,
                    element.width,
                    element.height,
                    rect.fill.as_ref(),
                    rect.stroke.as_ref(),
                    page_height,
                    ops,
                );
                Ok(())
            }
            LayoutElement::Image(image) => {
                self.render_image(image, element, page_height, ops)
            }
            LayoutElement::Mark(mark) => {
                render_mark(mark, element, page_height, ops);
                Ok(())
            }
        }
    }

    fn render_text(
        &mut self,
        text: &TextElement,
        positioned: &PositionedElement,
        page_height: f32,
        ops: &mut Vec<Op>,
    ) -> Result<(), RenderError> {
        if text.lines.is_empty() {
            return Ok(());
        }
        let style = &positioned.style;
        let font = builtin_font(style.font_weight);

        ops.push(Op::StartTextSection);
        ops.push(Op::SetFillColor { col: to_pdf_color(&style.color) });
        ops.push(Op::SetFontSizeBuiltinFont { size: Pt(style.font_size), font });
        for line in &text.lines {
            if line.text.is_empty() {
                continue;
            }
            let pdf_y = page_height - line.y - style.font_size;
            ops.push(Op::SetTextMatrix { matrix: TextMatrix::Translate(Pt(line.x), Pt(pdf_y)) });
            ops.push(Op::WriteTextBuiltinFont {
                items: vec![TextItem::Text(line.text.clone())],
                font,
            });
        }
        ops.push(Op::EndTextSection);
        Ok(())
    }

    fn render_image(
        &mut self,
        image: &ImageElement,
        positioned: &PositionedElement,
        page_height: f32,
        ops: &mut Vec<Op>,
    ) -> Result<(), RenderError> {
        let key = std::sync::Arc::as_ptr(&image.data) as usize;
        let (xobj_id, (img_w, img_h)) = if let Some(cached) = self.image_xobjects.get(&key) {
            (cached.0.clone(), cached.1)
        } else {
            let mut warnings = Vec::new();
            let raw_image = printpdf::image::RawImage::decode_from_bytes(&image.data, &mut warnings)
                .map_err(|e| RenderError::AssetDecode(e.to_string()))?;
            let dims = (raw_image.width as u32, raw_image.height as u32);
            let xobj_id = XObjectId::new();
            self.document
                .resources
                .xobjects
                .map
                .insert(xobj_id.clone(), XObject::Image(raw_image));
            self.image_xobjects.insert(key, (xobj_id.clone(), dims));
            (xobj_id, dims)
        };

        let y = page_height - (positioned.y + positioned.height);
        let transform = XObjectTransform {
            translate_x: Some(Pt(positioned.x)),
            translate_y: Some(Pt(y)),
            scale_x: Some(positioned.width / (img_w as f32)),
            scale_y: Some(positioned.height / (img_h as f32)),
            rotate: None,
            dpi: Some(72.0),
        };
        ops.push(Op::UseXobject { id: xobj_id, transform });
        Ok(())
    }

    fn page_dimensions_mm(page_layout: &PageLayout) -> (Mm, Mm) {
        match page_layout.size {
            PageSize::A4 => (Mm(210.0), Mm(297.0)),
            PageSize::Custom { width, height } => (Pt(width).into(), Pt(height).into()),
        }
    }

    fn page_height_pt(page_layout: &PageLayout) -> f32 {
        page_layout.size.dimensions_pt().1
    }
}

fn builtin_font(weight: FontWeight) -> BuiltinFont {
    match weight {
        FontWeight::Regular => BuiltinFont::Helvetica,
        FontWeight::Bold => BuiltinFont::HelveticaBold,
    }
}

fn to_pdf_color(c: &Color) -> printpdf::color::Color {
    printpdf::color::Color::Rgb(Rgb::new(
        c.r as f32 / 255.0,
        c.g as f32 / 255.0,
        c.b as f32 / 255.0,
        None,
    ))
}

#[allow(clippy::too_many_arguments)]
fn draw_rectangle(
    x: f32,
    y: f32,
    width: f32,
    height: f32,
    fill: Option<&Color>,
    stroke: Option<&Border>,
    page_height: f32,
    ops: &mut Vec<Op>,
) {
    if fill.is_none() && stroke.is_none() {
        return;
    }
    let pdf_y = page_height - y - height;
    let points = vec![
        LinePoint { p: Point { x: Pt(x), y: Pt(pdf_y) }, bezier: false },
        LinePoint { p: Point { x: Pt(x + width), y: Pt(pdf_y) }, bezier: false },
        LinePoint { p: Point { x: Pt(x + width), y: Pt(pdf_y + height) }, bezier: false },
        LinePoint { p: Point { x: Pt(x), y: Pt(pdf_y + height) }, bezier: false },
    ];

    if let Some(fill_color) = fill {
        ops.push(Op::SetFillColor { col: to_pdf_color(fill_color) });
    }
    if let Some(border) = stroke {
        ops.push(Op::SetOutlineColor { col: to_pdf_color(&border.color) });
        ops.push(Op::SetOutlineThickness { pt: Pt(border.width) });
    }
    let mode = match (fill.is_some(), stroke.is_some()) {
        (true, true) => PaintMode::FillStroke,
        (false, true) => PaintMode::Stroke,
        _ => PaintMode::Fill,
    };
    ops.push(Op::DrawPolygon {
        polygon: Polygon {
            rings: vec![PolygonRing { points }],
            mode,
            winding_order: WindingOrder::NonZero,
        },
    });
}

/// Draws the synthesized brand mark: a filled circle with one centered
/// letter. The circle is four cubic Bézier arcs.
fn render_mark(mark: &MarkElement, positioned: &PositionedElement, page_height: f32, ops: &mut Vec<Op>) {
    let radius = positioned.width / 2.0;
    let cx = positioned.x + radius;
    let cy = page_height - (positioned.y + radius);
    // Distance from anchor to control point for a circular arc.
    let k = radius * 0.552_284_75;

    let anchor = |x: f32, y: f32| LinePoint { p: Point { x: Pt(x), y: Pt(y) }, bezier: false };
    let control = |x: f32, y: f32| LinePoint { p: Point { x: Pt(x), y: Pt(y) }, bezier: true };
    let points = vec![
        anchor(cx + radius, cy),
        control(cx + radius, cy + k),
        control(cx + k, cy + radius),
        anchor(cx, cy + radius),
        control(cx - k, cy + radius),
        control(cx - radius, cy + k),
        anchor(cx - radius, cy),
        control(cx - radius, cy - k),
        control(cx - k, cy - radius),
        anchor(cx, cy - radius),
        control(cx + k, cy - radius),
        control(cx + radius, cy - k),
        anchor(cx + radius, cy),
    ];
    ops.push(Op::SetFillColor { col: to_pdf_color(&mark.fill) });
    ops.push(Op::DrawPolygon {
        polygon: Polygon {
            rings: vec![PolygonRing { points }],
            mode: PaintMode::Fill,
            winding_order: WindingOrder::NonZero,
        },
    });

    let font = BuiltinFont::HelveticaBold;
    let letter = mark.letter.to_string();
    let letter_width =
        devis_layout::fonts::text_width(&letter, mark.font_size, FontWeight::Bold);
    let text_x = positioned.x + (positioned.width - letter_width) / 2.0;
    let text_top = positioned.y + (positioned.height - mark.font_size) / 2.0;
    let pdf_y = page_height - text_top - mark.font_size;

    ops.push(Op::StartTextSection);
    ops.push(Op::SetFillColor { col: to_pdf_color(&mark.letter_color) });
    ops.push(Op::SetFontSizeBuiltinFont { size: Pt(mark.font_size), font });
    ops.push(Op::SetTextMatrix { matrix: TextMatrix::Translate(Pt(text_x), Pt(pdf_y)) });
    ops.push(Op::WriteTextBuiltinFont { items: vec![TextItem::Text(letter)], font });
    ops.push(Op::EndTextSection);
}
