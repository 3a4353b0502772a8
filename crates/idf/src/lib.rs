//! Intermediate Document Format (IDF)
//!
//! The in-memory representation of a document between composition and
//! layout: an ordered sequence of block-level nodes. Composition builds
//! this tree from a validated record; the layout engine consumes it and
//! never sees the record itself.

use std::sync::Arc;

use devis_style::{Border, Color, TextAlign};

/// A reference-counted container for shared, immutable data like images.
pub type SharedData = Arc<Vec<u8>>;

/// A block-level element in the document flow.
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    /// A section heading.
    Heading { text: String, style: String },
    /// A run of text. Embedded `\n` characters force line breaks;
    /// longer lines wrap at layout time.
    Paragraph { text: String, style: String },
    /// Side-by-side cells, each a block sequence of its own. The
    /// `style` may contribute a bottom border and padding around the
    /// whole row.
    Columns {
        widths: Vec<f32>,
        cells: Vec<Vec<Block>>,
        align: TextAlign,
        style: Option<String>,
    },
    /// A grid of text cells with fixed column widths.
    Table(TableBlock),
    /// Fixed vertical whitespace.
    Spacer { height: f32 },
    /// A raster image placed at a fixed size.
    Image { data: SharedData, width: f32, height: f32 },
    /// A synthesized vector mark: a filled circle bearing one centered
    /// letter. Used when no raster brand asset is available.
    VectorMark {
        letter: char,
        diameter: f32,
        fill: Color,
        letter_color: Color,
        font_size: f32,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableBlock {
    pub columns: Vec<TableColumn>,
    pub header: Option<TableRow>,
    pub rows: Vec<TableRow>,
    pub align: TextAlign,
    pub style: TableStyle,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableColumn {
    pub width: f32,
    pub align: TextAlign,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableRow {
    pub cells: Vec<TableCell>,
}

impl TableRow {
    pub fn new<I, S>(cells: I) -> Self
    where
        I: IntoIterator<Item = (S, Option<S>)>,
        S: Into<String>,
    {
        TableRow {
            cells: cells
                .into_iter()
                .map(|(text, style)| TableCell { text: text.into(), style: style.map(Into::into) })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableCell {
    pub text: String,
    /// Named style for this cell; falls back to the layout defaults.
    pub style: Option<String>,
}

/// Visual treatment of a table as a whole.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TableStyle {
    /// Cell grid lines.
    pub grid: Option<Border>,
    /// Alternating body-row fills, applied in row order starting with
    /// the first color.
    pub banded_rows: Option<(Color, Color)>,
    /// A rule drawn above the last body row.
    pub rule_above_last: Option<Border>,
}
