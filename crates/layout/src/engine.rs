use devis_idf::{Block, SharedData, TableBlock, TableRow};
use devis_style::{Border, Color, FontWeight, Margins, PageLayout, Stylesheet, TextAlign};

use crate::fonts;

/// Flows IDF blocks onto pages of absolutely positioned elements.
///
/// Coordinates are in points with the origin at the top-left of the
/// page; the renderer flips to PDF's bottom-left origin.
pub struct LayoutEngine {
    stylesheet: Stylesheet,
    page_layout: PageLayout,
    current_y: f32,
    pages: Vec<Page>,
}

#[derive(Debug)]
pub struct Page {
    pub number: usize,
    pub elements: Vec<PositionedElement>,
}

impl Page {
    fn new(number: usize) -> Self {
        Page { number, elements: Vec::new() }
    }
}

#[derive(Clone, Debug)]
pub struct PositionedElement {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub element: LayoutElement,
    pub style: ComputedStyle,
}

#[derive(Clone, Debug)]
pub enum LayoutElement {
    Text(TextElement),
    Rect(RectElement),
    Image(ImageElement),
    Mark(MarkElement),
}

#[derive(Clone, Debug)]
pub struct TextElement {
    pub lines: Vec<TextLine>,
}

/// One laid-out line of text. `y` is the top of the line box.
#[derive(Clone, Debug)]
pub struct TextLine {
    pub text: String,
    pub x: f32,
    pub y: f32,
    pub width: f32,
}

#[derive(Clone, Debug)]
pub struct RectElement {
    pub fill: Option<Color>,
    pub stroke: Option<Border>,
}

#[derive(Clone, Debug)]
pub struct ImageElement {
    pub data: SharedData,
}

#[derive(Clone, Debug)]
pub struct MarkElement {
    pub letter: char,
    pub fill: Color,
    pub letter_color: Color,
    pub font_size: f32,
}

/// A fully resolved style, after named-style lookup and defaulting.
#[derive(Clone, Debug, PartialEq)]
pub struct ComputedStyle {
    pub font_size: f32,
    pub font_weight: FontWeight,
    pub line_height: f32,
    pub text_align: TextAlign,
    pub color: Color,
    pub margin: Margins,
    pub padding: Margins,
    pub background_color: Option<Color>,
    pub border_bottom: Option<Border>,
}

impl Default for ComputedStyle {
    fn default() -> Self {
        ComputedStyle {
            font_size: 12.0,
            font_weight: FontWeight::Regular,
            line_height: 14.4,
            text_align: TextAlign::Left,
            color: Color::BLACK,
            margin: Margins::default(),
            padding: Margins::default(),
            background_color: None,
            border_bottom: None,
        }
    }
}

impl LayoutEngine {
    pub fn new(stylesheet: Stylesheet) -> Self {
        let page_layout = stylesheet.page.clone();
        let current_y = page_layout.margins.top;
        LayoutEngine { stylesheet, page_layout, current_y, pages: vec![Page::new(0)] }
    }

    pub fn layout_blocks(&mut self, blocks: &[Block]) {
        for block in blocks {
            self.layout_block(block);
        }
    }

    pub fn into_pages(self) -> Vec<Page> {
        self.pages
    }

    /// Vertical extent of the content laid out so far, from the top
    /// margin down. Used when a block sequence is laid out off-page to
    /// measure a column cell.
    fn content_extent(&self) -> f32 {
        self.current_y - self.page_layout.margins.top
    }

    fn layout_block(&mut self, block: &Block) {
        match block {
            Block::Heading { text, style } | Block::Paragraph { text, style } => {
                self.layout_text(text, style);
            }
            Block::Columns { widths, cells, align, style } => {
                self.layout_columns(widths, cells, *align, style.as_deref());
            }
            Block::Table(table) => self.layout_table(table),
            Block::Spacer { height } => self.current_y += height,
            Block::Image { data, width, height } => {
                let element = LayoutElement::Image(ImageElement { data: data.clone() });
                self.layout_fixed(*width, *height, element);
            }
            Block::VectorMark { letter, diameter, fill, letter_color, font_size } => {
                let element = LayoutElement::Mark(MarkElement {
                    letter: *letter,
                    fill: *fill,
                    letter_color: *letter_color,
                    font_size: *font_size,
                });
                self.layout_fixed(*diameter, *diameter, element);
            }
        }
    }

    fn layout_text(&mut self, text: &str, style_name: &str) {
        let style = self.compute_style(Some(style_name));
        let x = self.page_layout.margins.left + style.margin.left;
        let width = self.available_width() - style.margin.left - style.margin.right;
        let content_width = width - style.padding.left - style.padding.right;
        let lines = self.wrap_text(text, &style, content_width);

        let mut cursor = 0;
        while cursor < lines.len() {
            let first_line_height =
                style.margin.top + style.padding.top + style.line_height + style.padding.bottom;
            if self.needs_page_break(first_line_height) && !self.page_is_pristine() {
                self.new_page();
            }

            let space = self.remaining_height()
                - style.margin.top
                - style.padding.top
                - style.padding.bottom;
            let fitting = ((space / style.line_height).floor() as usize).max(1);
            let count = fitting.min(lines.len() - cursor);
            let chunk = &lines[cursor..cursor + count];

            let y = self.current_y + style.margin.top;
            let text_x = x + style.padding.left;
            let positioned_lines: Vec<TextLine> = chunk
                .iter()
                .enumerate()
                .map(|(i, line)| {
                    let line_width = fonts::text_width(line, style.font_size, style.font_weight);
                    let line_x = match style.text_align {
                        TextAlign::Left => text_x,
                        TextAlign::Right => text_x + content_width - line_width,
                        TextAlign::Center => text_x + (content_width - line_width) / 2.0,
                    };
                    TextLine {
                        text: line.clone(),
                        x: line_x,
                        y: y + style.padding.top + i as f32 * style.line_height,
                        width: line_width,
                    }
                })
                .collect();

            let height =
                chunk.len() as f32 * style.line_height + style.padding.top + style.padding.bottom;
            self.push_element(PositionedElement {
                x,
                y,
                width,
                height,
                element: LayoutElement::Text(TextElement { lines: positioned_lines }),
                style: style.clone(),
            });
            self.current_y = y + height + style.margin.bottom;
            cursor += count;

            if cursor < lines.len() {
                self.new_page();
            }
        }
    }

    fn layout_columns(
        &mut self,
        widths: &[f32],
        cells: &[Vec<Block>],
        align: TextAlign,
        style_name: Option<&str>,
    ) {
        let style = self.compute_style(style_name);
        let total_width: f32 = widths.iter().sum();
        let x0 = self.aligned_x(total_width, align);

        // Lay every cell out in its own coordinate space first, so the
        // row height is known before anything is placed.
        let mut laid_cells: Vec<(Vec<PositionedElement>, f32)> = Vec::new();
        for (cell, cell_width) in cells.iter().zip(widths) {
            laid_cells.push(self.layout_detached(cell, *cell_width));
        }
        let row_height = laid_cells.iter().map(|(_, h)| *h).fold(0.0, f32::max);
        let block_height = style.padding.top + row_height + style.padding.bottom;
        let rule_height = style.border_bottom.map(|b| b.width).unwrap_or(0.0);
        let full_height = style.margin.top + block_height + rule_height + style.margin.bottom;

        if full_height > self.content_height() {
            log::warn!("columns row is taller than the page content area and will overflow");
        }
        if self.needs_page_break(full_height) && !self.page_is_pristine() {
            self.new_page();
        }

        let top = self.current_y + style.margin.top;
        if let Some(fill) = style.background_color {
            self.push_element(rect(x0, top, total_width, block_height, Some(fill), None));
        }

        let content_top = top + style.padding.top;
        let mut cell_x = x0;
        for ((elements, _), cell_width) in laid_cells.into_iter().zip(widths) {
            for element in elements {
                self.push_element(translate(element, cell_x, content_top));
            }
            cell_x += cell_width;
        }

        if let Some(border) = style.border_bottom {
            let rule_y = top + block_height;
            self.push_element(rect(x0, rule_y, total_width, border.width, Some(border.color), None));
        }

        self.current_y = top + block_height + rule_height + style.margin.bottom;
    }

    /// Lays a block sequence out against a given width in a detached
    /// coordinate space (origin at 0,0, unbounded height). Returns the
    /// elements and the occupied height.
    fn layout_detached(&self, blocks: &[Block], width: f32) -> (Vec<PositionedElement>, f32) {
        let detached_sheet = Stylesheet {
            page: PageLayout {
                size: devis_style::PageSize::Custom { width, height: f32::MAX },
                margins: Margins::default(),
            },
            styles: self.stylesheet.styles.clone(),
        };
        let mut child = LayoutEngine::new(detached_sheet);
        child.layout_blocks(blocks);
        let height = child.content_extent();
        let mut pages = child.into_pages();
        let elements = pages.swap_remove(0).elements;
        (elements, height)
    }

    fn layout_table(&mut self, table: &TableBlock) {
        let total_width: f32 = table.columns.iter().map(|c| c.width).sum();
        let x0 = self.aligned_x(total_width, table.align);

        let body_start = if table.header.is_some() { 1 } else { 0 };
        let all_rows: Vec<&TableRow> =
            table.header.iter().chain(table.rows.iter()).collect();

        for (idx, row) in all_rows.iter().enumerate() {
            let height = self.row_height(table, row);
            if self.needs_page_break(height) && !self.page_is_pristine() {
                self.new_page();
            }
            let y = self.current_y;
            let is_body = idx >= body_start;

            if is_body {
                if let Some((even, odd)) = table.style.banded_rows {
                    let fill = if (idx - body_start) % 2 == 0 { even } else { odd };
                    self.push_element(rect(x0, y, total_width, height, Some(fill), None));
                }
                if idx + 1 == all_rows.len() {
                    if let Some(border) = table.style.rule_above_last {
                        self.push_element(rect(
                            x0,
                            y,
                            total_width,
                            border.width,
                            Some(border.color),
                            None,
                        ));
                    }
                }
            }

            let mut cell_x = x0;
            for (cell, column) in row.cells.iter().zip(&table.columns) {
                let mut style = self.compute_style(cell.style.as_deref());
                if style.text_align == TextAlign::Left {
                    style.text_align = column.align;
                }

                if let Some(fill) = style.background_color {
                    self.push_element(rect(cell_x, y, column.width, height, Some(fill), None));
                }
                if let Some(grid) = table.style.grid {
                    self.push_element(rect(cell_x, y, column.width, height, None, Some(grid)));
                }

                let content_width = column.width - style.padding.left - style.padding.right;
                let lines = self.wrap_text(&cell.text, &style, content_width);
                let text_x = cell_x + style.padding.left;
                let positioned_lines: Vec<TextLine> = lines
                    .iter()
                    .enumerate()
                    .map(|(i, line)| {
                        let line_width =
                            fonts::text_width(line, style.font_size, style.font_weight);
                        let line_x = match style.text_align {
                            TextAlign::Left => text_x,
                            TextAlign::Right => text_x + content_width - line_width,
                            TextAlign::Center => text_x + (content_width - line_width) / 2.0,
                        };
                        TextLine {
                            text: line.clone(),
                            x: line_x,
                            y: y + style.padding.top + i as f32 * style.line_height,
                            width: line_width,
                        }
                    })
                    .collect();

                self.push_element(PositionedElement {
                    x: cell_x,
                    y,
                    width: column.width,
                    height,
                    element: LayoutElement::Text(TextElement { lines: positioned_lines }),
                    style,
                });
                cell_x += column.width;
            }

            self.current_y = y + height;
        }
    }

    fn row_height(&self, table: &TableBlock, row: &TableRow) -> f32 {
        let mut height = 0.0f32;
        for (cell, column) in row.cells.iter().zip(&table.columns) {
            let style = self.compute_style(cell.style.as_deref());
            let content_width = column.width - style.padding.left - style.padding.right;
            let lines = self.wrap_text(&cell.text, &style, content_width);
            let cell_height = lines.len().max(1) as f32 * style.line_height
                + style.padding.top
                + style.padding.bottom;
            height = height.max(cell_height);
        }
        height
    }

    fn layout_fixed(&mut self, width: f32, height: f32, element: LayoutElement) {
        if self.needs_page_break(height) && !self.page_is_pristine() {
            self.new_page();
        }
        let x = self.page_layout.margins.left;
        let y = self.current_y;
        self.push_element(PositionedElement {
            x,
            y,
            width,
            height,
            element,
            style: ComputedStyle::default(),
        });
        self.current_y = y + height;
    }

    /// Greedy word wrap against real font metrics. Explicit newlines in
    /// the input are preserved as line breaks.
    pub fn wrap_text(&self, text: &str, style: &ComputedStyle, max_width: f32) -> Vec<String> {
        if max_width <= 0.0 {
            return text.lines().map(str::to_string).collect();
        }
        let mut lines = Vec::new();
        for paragraph in text.lines() {
            if paragraph.trim().is_empty() {
                lines.push(String::new());
                continue;
            }
            let mut current = String::new();
            for word in paragraph.split_whitespace() {
                let candidate = if current.is_empty() {
                    word.to_string()
                } else {
                    format!("{current} {word}")
                };
                let width = fonts::text_width(&candidate, style.font_size, style.font_weight);
                if width > max_width && !current.is_empty() {
                    lines.push(current);
                    current = word.to_string();
                } else {
                    current = candidate;
                }
            }
            if !current.is_empty() {
                lines.push(current);
            }
        }
        lines
    }

    pub fn compute_style(&self, style_name: Option<&str>) -> ComputedStyle {
        let mut computed = ComputedStyle::default();
        if let Some(name) = style_name {
            if let Some(def) = self.stylesheet.styles.get(name) {
                if let Some(size) = def.font_size {
                    computed.font_size = size;
                    if def.line_height.is_none() {
                        computed.line_height = size * 1.2;
                    }
                }
                if let Some(weight) = def.font_weight {
                    computed.font_weight = weight;
                }
                if let Some(line_height) = def.line_height {
                    computed.line_height = line_height;
                }
                if let Some(align) = def.text_align {
                    computed.text_align = align;
                }
                if let Some(color) = def.color {
                    computed.color = color;
                }
                if let Some(margin) = def.margin {
                    computed.margin = margin;
                }
                if let Some(padding) = def.padding {
                    computed.padding = padding;
                }
                if def.background_color.is_some() {
                    computed.background_color = def.background_color;
                }
                if def.border_bottom.is_some() {
                    computed.border_bottom = def.border_bottom;
                }
            } else {
                log::warn!("unknown style name: {name}");
            }
        }
        computed
    }

    fn aligned_x(&self, block_width: f32, align: TextAlign) -> f32 {
        let left = self.page_layout.margins.left;
        let available = self.available_width();
        match align {
            TextAlign::Left => left,
            TextAlign::Center => left + (available - block_width) / 2.0,
            TextAlign::Right => left + available - block_width,
        }
    }

    fn available_width(&self) -> f32 {
        let (page_width, _) = self.page_layout.size.dimensions_pt();
        page_width - self.page_layout.margins.left - self.page_layout.margins.right
    }

    fn content_height(&self) -> f32 {
        let (_, page_height) = self.page_layout.size.dimensions_pt();
        page_height - self.page_layout.margins.top - self.page_layout.margins.bottom
    }

    fn remaining_height(&self) -> f32 {
        let (_, page_height) = self.page_layout.size.dimensions_pt();
        page_height - self.current_y - self.page_layout.margins.bottom
    }

    fn needs_page_break(&self, required: f32) -> bool {
        self.remaining_height() < required
    }

    fn page_is_pristine(&self) -> bool {
        self.pages
            .last()
            .map(|p| p.elements.is_empty() && self.current_y <= self.page_layout.margins.top)
            .unwrap_or(false)
    }

    fn new_page(&mut self) {
        let number = self.pages.len();
        self.pages.push(Page::new(number));
        self.current_y = self.page_layout.margins.top;
    }

    fn push_element(&mut self, element: PositionedElement) {
        if let Some(page) = self.pages.last_mut() {
            page.elements.push(element);
        }
    }
}

fn rect(
    x: f32,
    y: f32,
    width: f32,
    height: f32,
    fill: Option<Color>,
    stroke: Option<Border>,
) -> PositionedElement {
    PositionedElement {
        x,
        y,
        width,
        height,
        element: LayoutElement::Rect(RectElement { fill, stroke }),
        style: ComputedStyle::default(),
    }
}

fn translate(mut element: PositionedElement, dx: f32, dy: f32) -> PositionedElement {
    element.x += dx;
    element.y += dy;
    if let LayoutElement::Text(text) = &mut element.element {
        for line in &mut text.lines {
            line.x += dx;
            line.y += dy;
        }
    }
    element
}
