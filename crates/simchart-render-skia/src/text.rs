// File: crates/simchart-render-skia/src/text.rs
// Summary: Text shaping for scene labels using Skia textlayout, with anchor alignment.

use skia_safe as skia;
use skia::textlayout::{FontCollection, Paragraph, ParagraphBuilder, ParagraphStyle, TextStyle};

use simchart_core::{TextAlign, TextBaseline, TextNode};

use crate::to_skia_color;

pub struct TextShaper {
    fonts: FontCollection,
}

impl TextShaper {
    pub fn new() -> Self {
        let mut fc = FontCollection::new();
        fc.set_default_font_manager(skia::FontMgr::default(), None);
        Self { fonts: fc }
    }

    fn make_style(size: f32, color: skia::Color) -> TextStyle {
        let mut ts = TextStyle::new();
        ts.set_font_size(size.max(1.0));
        ts.set_color(color);
        // Tabular digits keep scrolling labels from jittering.
        ts.set_font_families(&["Roboto Mono", "Consolas", "Menlo", "DejaVu Sans Mono", "monospace"]);
        ts
    }

    pub fn layout(&self, text: &str, size: f32, color: skia::Color) -> Paragraph {
        let mut pstyle = ParagraphStyle::new();
        pstyle.set_text_align(skia::textlayout::TextAlign::Left);
        let mut builder = ParagraphBuilder::new(&pstyle, &self.fonts);
        builder.push_style(&Self::make_style(size, color));
        builder.add_text(text);
        let mut paragraph = builder.build();
        paragraph.layout(10_000.0);
        paragraph
    }

    pub fn measure_width(&self, text: &str, size: f32) -> f32 {
        self.layout(text, size, skia::Color::TRANSPARENT).longest_line()
    }

    /// Paint `node` so that its anchor point honors the node's alignment.
    pub fn draw(&self, canvas: &skia::Canvas, node: &TextNode, scale: f32) {
        let size = node.size as f32 * scale;
        let mut p = self.layout(&node.text, size, to_skia_color(node.color));
        let w = p.longest_line();
        let h = p.height();
        let x = node.at.x as f32 * scale;
        let y = node.at.y as f32 * scale;
        let left = match node.align {
            TextAlign::Left => x,
            TextAlign::Center => x - w / 2.0,
            TextAlign::Right => x - w,
        };
        let top = match node.baseline {
            TextBaseline::Top => y,
            TextBaseline::Middle => y - h / 2.0,
            TextBaseline::Bottom => y - h,
        };
        p.paint(canvas, (left, top));
    }
}

impl Default for TextShaper {
    fn default() -> Self { Self::new() }
}
