// File: crates/simchart-render-skia/src/lib.rs
// Summary: Rasterizes simchart scenes with Skia CPU surfaces (RGBA buffers and PNG output).

pub mod text;

use anyhow::{anyhow, Context, Result};
use skia_safe as skia;
use tracing::debug;

use simchart_core::{Color, Primitive, Rect, Scene, Stroke};

pub use text::TextShaper;

#[derive(Clone, Debug, PartialEq)]
pub struct RenderOptions {
    /// Device pixels per scene unit. Default: 1.
    pub scale: f32,
    /// Used when the scene has no background of its own. Default: white.
    pub background: Color,
    /// Paint text nodes. Disable for pixel comparisons across platforms. Default: true.
    pub draw_text: bool,
    /// Default: true.
    pub anti_alias: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self { scale: 1.0, background: Color::WHITE, draw_text: true, anti_alias: true }
    }
}

pub(crate) fn to_skia_color(c: Color) -> skia::Color {
    skia::Color::from_argb(c.a, c.r, c.g, c.b)
}

fn to_skia_rect(r: Rect, scale: f32) -> skia::Rect {
    skia::Rect::from_ltrb(
        r.left as f32 * scale,
        r.top as f32 * scale,
        r.right as f32 * scale,
        r.bottom as f32 * scale,
    )
}

pub struct SkiaRenderer {
    text: TextShaper,
}

impl SkiaRenderer {
    pub fn new() -> Self {
        Self { text: TextShaper::new() }
    }

    fn surface_for(scene: &Scene, opts: &RenderOptions) -> Result<skia::Surface> {
        let w = (scene.width as f32 * opts.scale).ceil() as i32;
        let h = (scene.height as f32 * opts.scale).ceil() as i32;
        if w <= 0 || h <= 0 {
            return Err(anyhow!("scene has no area: {}x{}", scene.width, scene.height));
        }
        skia::surfaces::raster_n32_premul((w, h)).ok_or_else(|| anyhow!("failed to create {w}x{h} raster surface"))
    }

    fn paint_scene(&self, canvas: &skia::Canvas, scene: &Scene, opts: &RenderOptions) {
        canvas.clear(to_skia_color(scene.background.unwrap_or(opts.background)));
        for p in scene.primitives() {
            self.draw_primitive(canvas, p, opts);
        }
    }

    fn stroke_paint(stroke: Stroke, opts: &RenderOptions) -> skia::Paint {
        let mut paint = skia::Paint::default();
        paint.set_anti_alias(opts.anti_alias);
        paint.set_style(skia::paint::Style::Stroke);
        paint.set_stroke_width(stroke.width as f32 * opts.scale);
        paint.set_color(to_skia_color(stroke.color));
        paint
    }

    fn fill_paint(color: Color, opts: &RenderOptions) -> skia::Paint {
        let mut paint = skia::Paint::default();
        paint.set_anti_alias(opts.anti_alias);
        paint.set_style(skia::paint::Style::Fill);
        paint.set_color(to_skia_color(color));
        paint
    }

    fn draw_primitive(&self, canvas: &skia::Canvas, primitive: &Primitive, opts: &RenderOptions) {
        let s = opts.scale;
        match primitive {
            Primitive::Rect { rect, fill, stroke } => {
                let r = to_skia_rect(*rect, s);
                if let Some(fill) = fill.filter(|c| !c.is_transparent()) {
                    canvas.draw_rect(r, &Self::fill_paint(fill, opts));
                }
                if let Some(stroke) = stroke {
                    canvas.draw_rect(r, &Self::stroke_paint(*stroke, opts));
                }
            }
            Primitive::Line { from, to, stroke } => {
                canvas.draw_line(
                    (from.x as f32 * s, from.y as f32 * s),
                    (to.x as f32 * s, to.y as f32 * s),
                    &Self::stroke_paint(*stroke, opts),
                );
            }
            Primitive::Polyline { runs, stroke } => {
                let paint = Self::stroke_paint(*stroke, opts);
                for run in runs {
                    let Some((first, rest)) = run.split_first() else { continue };
                    if rest.is_empty() {
                        // A lone sample still shows up as a dot.
                        let dot = Self::fill_paint(stroke.color, opts);
                        canvas.draw_circle((first.x as f32 * s, first.y as f32 * s), stroke.width as f32 * s, &dot);
                        continue;
                    }
                    let mut path = skia::Path::new();
                    path.move_to((first.x as f32 * s, first.y as f32 * s));
                    for p in rest {
                        path.line_to((p.x as f32 * s, p.y as f32 * s));
                    }
                    canvas.draw_path(&path, &paint);
                }
            }
            Primitive::Circle { center, radius, fill } => {
                canvas.draw_circle(
                    (center.x as f32 * s, center.y as f32 * s),
                    *radius as f32 * s,
                    &Self::fill_paint(*fill, opts),
                );
            }
            Primitive::Text(node) => {
                if opts.draw_text {
                    self.text.draw(canvas, node, s);
                }
            }
            Primitive::Group { clip, children } => {
                canvas.save();
                if let Some(clip) = clip {
                    canvas.clip_rect(to_skia_rect(*clip, s), skia::ClipOp::Intersect, opts.anti_alias);
                }
                for child in children {
                    self.draw_primitive(canvas, child, opts);
                }
                canvas.restore();
            }
        }
    }

    /// Render into an RGBA8 (unpremultiplied) buffer. Returns `(pixels, width, height, row_bytes)`.
    pub fn render_to_rgba8(&self, scene: &Scene, opts: &RenderOptions) -> Result<(Vec<u8>, u32, u32, usize)> {
        let mut surface = Self::surface_for(scene, opts)?;
        self.paint_scene(surface.canvas(), scene, opts);
        let (w, h) = (surface.width(), surface.height());
        let info = skia::ImageInfo::new((w, h), skia::ColorType::RGBA8888, skia::AlphaType::Unpremul, None);
        let row_bytes = info.min_row_bytes();
        let mut pixels = vec![0u8; row_bytes * h as usize];
        if !surface.read_pixels(&info, &mut pixels, row_bytes, (0, 0)) {
            return Err(anyhow!("reading back {w}x{h} pixels failed"));
        }
        Ok((pixels, w as u32, h as u32, row_bytes))
    }

    pub fn render_to_png_bytes(&self, scene: &Scene, opts: &RenderOptions) -> Result<Vec<u8>> {
        let mut surface = Self::surface_for(scene, opts)?;
        self.paint_scene(surface.canvas(), scene, opts);
        let image = surface.image_snapshot();
        #[allow(deprecated)]
        let data = image
            .encode_to_data(skia::EncodedImageFormat::PNG)
            .ok_or_else(|| anyhow!("encode PNG failed"))?;
        debug!(primitives = scene.len(), bytes = data.as_bytes().len(), "scene encoded");
        Ok(data.as_bytes().to_vec())
    }

    /// Render `scene` to a PNG at `path`, creating parent directories.
    pub fn render_to_png(&self, scene: &Scene, opts: &RenderOptions, path: impl AsRef<std::path::Path>) -> Result<()> {
        let path = path.as_ref();
        let bytes = self.render_to_png_bytes(scene, opts)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).with_context(|| format!("creating {}", parent.display()))?;
        }
        std::fs::write(path, bytes).with_context(|| format!("writing {}", path.display()))?;
        Ok(())
    }
}

impl Default for SkiaRenderer {
    fn default() -> Self { Self::new() }
}
