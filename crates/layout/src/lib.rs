pub mod engine;
pub mod fonts;

pub use engine::{
    ComputedStyle, ImageElement, LayoutElement, LayoutEngine, MarkElement, Page,
    PositionedElement, RectElement, TextElement, TextLine,
};
