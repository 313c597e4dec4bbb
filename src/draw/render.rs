//! Cairo-based rendering of the source image, annotations, and selection chrome.
//!
//! Cairo drawing errors are ignored the same way everywhere: a failed stroke
//! or fill leaves that primitive missing rather than aborting the frame.

use super::annotation::{Annotation, AnnotationKind, Style};
use super::bitmap::Bitmap;
use super::color::{BLACK, Color, WHITE};
use super::effect::{EffectKind, EffectRegion, HIGHLIGHT_ALPHA};
use super::font::FontDescriptor;
use super::geometry::{Bounds, Point};
use crate::util;
use std::f64::consts::PI;

/// Offset of drop shadows, in pixels.
pub const SHADOW_OFFSET: f64 = 3.0;

const SHADOW_COLOR: Color = Color {
    r: 0.0,
    g: 0.0,
    b: 0.0,
    a: 0.35,
};

const PLACEHOLDER_COLOR: Color = Color {
    r: 0.5,
    g: 0.5,
    b: 0.5,
    a: 0.35,
};

/// Paints the source bitmap at the origin.
pub fn render_source(ctx: &cairo::Context, source: &Bitmap) {
    match source.to_surface() {
        Ok(surface) => {
            if ctx.set_source_surface(&surface, 0.0, 0.0).is_ok() {
                let _ = ctx.paint();
            }
        }
        Err(err) => log::warn!("Skipping source bitmap: {}", err),
    }
}

/// Renders annotations in z-order (first element = bottom layer).
///
/// `canvas` is the logical canvas size, needed by effects that darken
/// everything outside their own bounds.
pub fn render_annotations(ctx: &cairo::Context, annotations: &[Annotation], canvas: (f64, f64)) {
    for annotation in annotations {
        render_annotation(ctx, annotation, canvas);
    }
}

/// Renders a single annotation, including its drop shadow when enabled.
pub fn render_annotation(ctx: &cairo::Context, annotation: &Annotation, canvas: (f64, f64)) {
    if annotation.style.shadow && casts_shadow(&annotation.kind) {
        ctx.save().ok();
        ctx.translate(SHADOW_OFFSET, SHADOW_OFFSET);
        render_body(ctx, annotation, Some(SHADOW_COLOR), canvas);
        ctx.restore().ok();
    }
    render_body(ctx, annotation, None, canvas);
}

fn casts_shadow(kind: &AnnotationKind) -> bool {
    !matches!(
        kind,
        AnnotationKind::Crop
            | AnnotationKind::CutOut { .. }
            | AnnotationKind::Effect(_)
            | AnnotationKind::SmartEraser { .. }
    )
}

/// Draws the annotation; `tint` replaces every color when drawing a shadow.
fn render_body(
    ctx: &cairo::Context,
    annotation: &Annotation,
    tint: Option<Color>,
    canvas: (f64, f64),
) {
    let style = &annotation.style;
    let stroke = tint.unwrap_or(style.stroke_color);
    let fill = style.fill_color.map(|c| tint.unwrap_or(c));
    let bounds = annotation.bounds();

    match &annotation.kind {
        AnnotationKind::Rectangle => {
            ctx.rectangle(bounds.x, bounds.y, bounds.width, bounds.height);
            fill_and_stroke(ctx, fill, stroke, style.stroke_width);
        }
        AnnotationKind::Ellipse => {
            if bounds.width > 0.0 && bounds.height > 0.0 {
                let c = bounds.center();
                ctx.save().ok();
                ctx.translate(c.x, c.y);
                ctx.scale(bounds.width / 2.0, bounds.height / 2.0);
                ctx.arc(0.0, 0.0, 1.0, 0.0, 2.0 * PI);
                ctx.restore().ok();
                fill_and_stroke(ctx, fill, stroke, style.stroke_width);
            }
        }
        AnnotationKind::Line => {
            render_line(ctx, annotation.start, annotation.end, stroke, style.stroke_width);
        }
        AnnotationKind::Arrow {
            head_length,
            head_angle,
        } => render_arrow(
            ctx,
            annotation.start,
            annotation.end,
            stroke,
            style.stroke_width,
            *head_length,
            *head_angle,
        ),
        AnnotationKind::Freehand { points } | AnnotationKind::SmartEraser { points } => {
            render_freehand_borrowed(ctx, points, stroke, style.stroke_width);
        }
        AnnotationKind::Text {
            text,
            font_size,
            font,
        } => {
            if let Some(bg) = fill {
                ctx.rectangle(bounds.x, bounds.y, bounds.width, bounds.height);
                set_color(ctx, bg);
                let _ = ctx.fill();
            }
            render_text(ctx, &bounds, text, stroke, *font_size, font);
        }
        AnnotationKind::SpeechBalloon {
            tail,
            text,
            font_size,
            font,
        } => {
            let body_fill = fill.unwrap_or(tint.unwrap_or(WHITE));
            render_speech_balloon(ctx, &bounds, *tail, body_fill, stroke, style.stroke_width);
            if tint.is_none() {
                let padding = *font_size * 0.4;
                render_text(ctx, &bounds.inflate(-padding), text, stroke, *font_size, font);
            }
        }
        AnnotationKind::Step { number, font_size } => {
            render_step(ctx, &bounds, *number, *font_size, stroke, tint.is_none());
        }
        AnnotationKind::Crop => {
            ctx.save().ok();
            ctx.set_dash(&[6.0, 4.0], 0.0);
            ctx.rectangle(bounds.x, bounds.y, bounds.width, bounds.height);
            set_color(ctx, stroke);
            ctx.set_line_width(style.stroke_width.max(1.0));
            let _ = ctx.stroke();
            ctx.restore().ok();
        }
        AnnotationKind::CutOut { vertical } => {
            let band = if *vertical {
                Bounds {
                    x: bounds.x,
                    y: 0.0,
                    width: bounds.width,
                    height: canvas.1,
                }
            } else {
                Bounds {
                    x: 0.0,
                    y: bounds.y,
                    width: canvas.0,
                    height: bounds.height,
                }
            };
            ctx.rectangle(band.x, band.y, band.width, band.height);
            set_color(ctx, stroke.with_alpha(0.3));
            let _ = ctx.fill();
        }
        AnnotationKind::Effect(region) => render_effect(ctx, region, &bounds, style, canvas),
        AnnotationKind::Image { bitmap } => render_image(ctx, bitmap, &bounds),
    }
}

fn set_color(ctx: &cairo::Context, color: Color) {
    ctx.set_source_rgba(color.r, color.g, color.b, color.a);
}

/// Fills (if requested) then strokes the current path.
fn fill_and_stroke(ctx: &cairo::Context, fill: Option<Color>, stroke: Color, width: f64) {
    if let Some(fill) = fill {
        set_color(ctx, fill);
        let _ = ctx.fill_preserve();
    }
    set_color(ctx, stroke);
    ctx.set_line_width(width);
    ctx.set_line_join(cairo::LineJoin::Miter);
    let _ = ctx.stroke();
}

/// Render freehand stroke (polyline through points)
///
/// Accepts a borrowed slice so in-progress strokes render without cloning.
pub fn render_freehand_borrowed(ctx: &cairo::Context, points: &[Point], color: Color, width: f64) {
    let Some((first, rest)) = points.split_first() else {
        return;
    };

    set_color(ctx, color);
    ctx.set_line_width(width);
    ctx.set_line_cap(cairo::LineCap::Round);
    ctx.set_line_join(cairo::LineJoin::Round);

    ctx.move_to(first.x, first.y);
    if rest.is_empty() {
        // A single click still leaves a dot.
        ctx.line_to(first.x, first.y);
    }
    for p in rest {
        ctx.line_to(p.x, p.y);
    }

    let _ = ctx.stroke();
}

fn render_line(ctx: &cairo::Context, from: Point, to: Point, color: Color, width: f64) {
    set_color(ctx, color);
    ctx.set_line_width(width);
    ctx.set_line_cap(cairo::LineCap::Round);

    ctx.move_to(from.x, from.y);
    ctx.line_to(to.x, to.y);
    let _ = ctx.stroke();
}

/// Render an arrow (line with a V head at `end`)
fn render_arrow(
    ctx: &cairo::Context,
    start: Point,
    end: Point,
    color: Color,
    width: f64,
    head_length: f64,
    head_angle: f64,
) {
    render_line(ctx, start, end, color, width);

    let [left, right] = util::calculate_arrowhead_custom(end, start, head_length, head_angle);

    set_color(ctx, color);
    ctx.set_line_width(width);
    ctx.set_line_cap(cairo::LineCap::Round);
    ctx.set_line_join(cairo::LineJoin::Round);
    ctx.move_to(left.x, left.y);
    ctx.line_to(end.x, end.y);
    ctx.line_to(right.x, right.y);
    let _ = ctx.stroke();
}

/// Renders wrapped text inside `bounds` using Pango.
///
/// The layout starts at the top-left corner and wraps to the bounds width.
/// Text is clipped to the bounds so oversized content never bleeds onto
/// neighbouring annotations.
pub fn render_text(
    ctx: &cairo::Context,
    bounds: &Bounds,
    text: &str,
    color: Color,
    size: f64,
    font: &FontDescriptor,
) {
    if text.is_empty() || bounds.width <= 0.0 || bounds.height <= 0.0 {
        return;
    }

    ctx.save().ok();
    // Gray antialiasing; subpixel fringes on transparent output.
    ctx.set_antialias(cairo::Antialias::Best);
    ctx.rectangle(bounds.x, bounds.y, bounds.width, bounds.height);
    ctx.clip();

    let layout = pangocairo::functions::create_layout(ctx);
    let desc = font.to_pango(size);
    layout.set_font_description(Some(&desc));
    layout.set_width((bounds.width * pango::SCALE as f64) as i32);
    layout.set_wrap(pango::WrapMode::WordChar);
    layout.set_text(text);

    ctx.move_to(bounds.x, bounds.y);
    set_color(ctx, color);
    pangocairo::functions::show_layout(ctx, &layout);

    ctx.restore().ok();
}

/// Rounded body with a triangular tail pointing at `tail`.
fn render_speech_balloon(
    ctx: &cairo::Context,
    body: &Bounds,
    tail: Point,
    fill: Color,
    stroke: Color,
    width: f64,
) {
    if body.width <= 0.0 || body.height <= 0.0 {
        return;
    }
    let radius = (body.width.min(body.height) * 0.2).min(16.0);
    let c = body.center();
    let base_half = (body.width.min(body.height) * 0.15).max(4.0);
    // Tail base sits across the body center, perpendicular to the tail direction.
    let (dx, dy) = (tail.x - c.x, tail.y - c.y);
    let len = (dx * dx + dy * dy).sqrt().max(1.0);
    let (nx, ny) = (-dy / len * base_half, dx / len * base_half);

    let outline = |ctx: &cairo::Context| {
        rounded_rect(ctx, body, radius);
        ctx.move_to(c.x + nx, c.y + ny);
        ctx.line_to(tail.x, tail.y);
        ctx.line_to(c.x - nx, c.y - ny);
        ctx.close_path();
    };

    // Stroke first at double width, then fill over the inner half so the
    // seam between body and tail disappears.
    outline(ctx);
    set_color(ctx, stroke);
    ctx.set_line_width(width * 2.0);
    ctx.set_line_join(cairo::LineJoin::Round);
    let _ = ctx.stroke();

    outline(ctx);
    ctx.set_fill_rule(cairo::FillRule::Winding);
    set_color(ctx, fill);
    let _ = ctx.fill();
}

fn rounded_rect(ctx: &cairo::Context, b: &Bounds, radius: f64) {
    let (l, t, r, btm) = (b.x, b.y, b.right(), b.bottom());
    ctx.new_sub_path();
    ctx.arc(r - radius, t + radius, radius, -PI / 2.0, 0.0);
    ctx.arc(r - radius, btm - radius, radius, 0.0, PI / 2.0);
    ctx.arc(l + radius, btm - radius, radius, PI / 2.0, PI);
    ctx.arc(l + radius, t + radius, radius, PI, 1.5 * PI);
    ctx.close_path();
}

/// Filled numbered circle.
fn render_step(
    ctx: &cairo::Context,
    bounds: &Bounds,
    number: u32,
    font_size: f64,
    color: Color,
    with_label: bool,
) {
    let radius = bounds.width.min(bounds.height) / 2.0;
    if radius <= 0.0 {
        return;
    }
    let c = bounds.center();
    ctx.arc(c.x, c.y, radius, 0.0, 2.0 * PI);
    set_color(ctx, color);
    let _ = ctx.fill();

    if !with_label {
        return;
    }

    // Dark label on light badges, light label on dark ones.
    let brightness = color.r * 0.299 + color.g * 0.587 + color.b * 0.114;
    let label_color = if brightness > 0.6 { BLACK } else { WHITE };

    let layout = pangocairo::functions::create_layout(ctx);
    let desc = FontDescriptor::default().to_pango(font_size.min(radius * 1.2));
    layout.set_font_description(Some(&desc));
    layout.set_text(&number.to_string());
    let (_, logical) = layout.pixel_extents();

    ctx.move_to(
        c.x - logical.width() as f64 / 2.0,
        c.y - logical.height() as f64 / 2.0,
    );
    set_color(ctx, label_color);
    pangocairo::functions::show_layout(ctx, &layout);
}

fn render_effect(
    ctx: &cairo::Context,
    region: &EffectRegion,
    bounds: &Bounds,
    style: &Style,
    canvas: (f64, f64),
) {
    match region.kind {
        EffectKind::Blur | EffectKind::Pixelate | EffectKind::Magnify => {
            match region.fresh_cache(bounds) {
                Some(cache) => match cache.bitmap.to_surface() {
                    Ok(surface) => {
                        let (x, y) = (cache.rect.x as f64, cache.rect.y as f64);
                        if ctx.set_source_surface(&surface, x, y).is_ok() {
                            let _ = ctx.paint();
                        }
                    }
                    Err(err) => log::warn!("Effect cache not drawable: {}", err),
                },
                None => {
                    ctx.rectangle(bounds.x, bounds.y, bounds.width, bounds.height);
                    set_color(ctx, PLACEHOLDER_COLOR);
                    let _ = ctx.fill();
                }
            }
            if region.kind == EffectKind::Magnify {
                ctx.rectangle(bounds.x, bounds.y, bounds.width, bounds.height);
                set_color(ctx, style.stroke_color);
                ctx.set_line_width(style.stroke_width);
                let _ = ctx.stroke();
            }
        }
        EffectKind::Highlight => {
            ctx.rectangle(bounds.x, bounds.y, bounds.width, bounds.height);
            set_color(
                ctx,
                style
                    .stroke_color
                    .with_alpha(HIGHLIGHT_ALPHA as f64 / 255.0),
            );
            let _ = ctx.fill();
        }
        EffectKind::Spotlight => {
            ctx.save().ok();
            ctx.set_fill_rule(cairo::FillRule::EvenOdd);
            ctx.rectangle(0.0, 0.0, canvas.0, canvas.1);
            ctx.rectangle(bounds.x, bounds.y, bounds.width, bounds.height);
            set_color(ctx, BLACK.with_alpha(region.amount.clamp(0.0, 1.0)));
            let _ = ctx.fill();
            ctx.restore().ok();
        }
    }
}

/// Paints an embedded bitmap scaled into `bounds`.
fn render_image(ctx: &cairo::Context, bitmap: &Bitmap, bounds: &Bounds) {
    if bitmap.is_empty() || bounds.width <= 0.0 || bounds.height <= 0.0 {
        return;
    }
    let surface = match bitmap.to_surface() {
        Ok(surface) => surface,
        Err(err) => {
            log::warn!("Embedded image not drawable: {}", err);
            return;
        }
    };
    ctx.save().ok();
    ctx.translate(bounds.x, bounds.y);
    ctx.scale(
        bounds.width / bitmap.width() as f64,
        bounds.height / bitmap.height() as f64,
    );
    if ctx.set_source_surface(&surface, 0.0, 0.0).is_ok() {
        let _ = ctx.paint();
    }
    ctx.restore().ok();
}

/// Draws the selection outline and resize handles for `annotation`.
pub fn render_selection(ctx: &cairo::Context, annotation: &Annotation, handle_size: f64) {
    let outline = annotation
        .bounds()
        .inflate(annotation.style.stroke_width / 2.0 + 2.0);

    ctx.save().ok();
    ctx.set_dash(&[4.0, 4.0], 0.0);
    ctx.set_line_width(1.0);
    ctx.rectangle(outline.x, outline.y, outline.width, outline.height);
    set_color(ctx, Color::new(0.2, 0.5, 1.0, 0.9));
    let _ = ctx.stroke();
    ctx.set_dash(&[], 0.0);

    let half = handle_size / 2.0;
    for (_, center) in annotation.handles() {
        ctx.rectangle(center.x - half, center.y - half, handle_size, handle_size);
        set_color(ctx, WHITE);
        let _ = ctx.fill_preserve();
        set_color(ctx, Color::new(0.2, 0.5, 1.0, 1.0));
        let _ = ctx.stroke();
    }
    ctx.restore().ok();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::annotation::{AnnotationDefaults, AnnotationId};
    use crate::draw::color::RED;
    use crate::editor::Tool;

    fn draw(annotations: &[Annotation], width: u32, height: u32) -> Bitmap {
        let source = Bitmap::filled(width, height, [255, 255, 255, 255]);
        let mut surface = source.to_surface().unwrap();
        {
            let ctx = cairo::Context::new(&surface).unwrap();
            render_annotations(&ctx, annotations, (width as f64, height as f64));
        }
        Bitmap::from_surface(&mut surface).unwrap()
    }

    fn drawn(tool: Tool, from: Point, to: Point) -> Annotation {
        let mut a = Annotation::for_tool(AnnotationId(1), tool, from, &AnnotationDefaults::default())
            .unwrap();
        a.extend_to(to);
        a
    }

    #[test]
    fn rectangle_strokes_outline_only() {
        let rect = drawn(Tool::Rectangle, Point::new(10.0, 10.0), Point::new(30.0, 30.0));
        let out = draw(&[rect], 40, 40);
        assert_eq!(out.pixel(10, 20), Some(RED.to_rgba8()));
        assert_eq!(out.pixel(20, 20), Some([255, 255, 255, 255]));
    }

    #[test]
    fn highlight_tints_with_fixed_alpha() {
        let highlight = drawn(Tool::Highlight, Point::new(0.0, 0.0), Point::new(20.0, 20.0));
        let out = draw(&[highlight], 20, 20);
        let [r, g, _, a] = out.pixel(10, 10).unwrap();
        assert_eq!(a, 255);
        assert_eq!(r, 255);
        // White under red at 0x55 alpha keeps about two thirds of green.
        assert!(g > 150 && g < 190, "g = {g}");
    }

    #[test]
    fn spotlight_darkens_outside_only() {
        let spot = drawn(Tool::Spotlight, Point::new(10.0, 10.0), Point::new(20.0, 20.0));
        let out = draw(&[spot], 30, 30);
        assert_eq!(out.pixel(15, 15), Some([255, 255, 255, 255]));
        assert!(out.pixel(2, 2).unwrap()[0] < 200);
    }

    #[test]
    fn stale_effect_draws_placeholder() {
        let blur = drawn(Tool::Blur, Point::new(0.0, 0.0), Point::new(10.0, 10.0));
        let out = draw(&[blur], 10, 10);
        let [r, ..] = out.pixel(5, 5).unwrap();
        assert!(r < 255);
    }
}
