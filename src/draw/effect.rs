//! Raster effect regions (blur, pixelate, magnify, highlight, spotlight).
//!
//! Blur, pixelate, and magnify derive a cached bitmap from the source image.
//! The cache is always sized to the region's rounded bounds; pixels of the
//! region that fall outside the source stay transparent. Highlight and
//! spotlight are pure render-time effects and never cache anything.

use super::bitmap::Bitmap;
use super::geometry::Bounds;
use crate::util::Rect;
use image::imageops::{self, FilterType};
use serde::{Deserialize, Serialize};

/// Fixed alpha used for highlight fills, independent of the stroke color's alpha.
pub const HIGHLIGHT_ALPHA: u8 = 0x55;

/// Which raster effect a region applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EffectKind {
    Blur,
    Pixelate,
    Magnify,
    Highlight,
    Spotlight,
}

impl EffectKind {
    /// Whether this effect renders from a cached bitmap.
    pub fn uses_cache(self) -> bool {
        matches!(self, EffectKind::Blur | EffectKind::Pixelate | EffectKind::Magnify)
    }
}

/// A cached effect result tagged with the inputs it was computed from.
#[derive(Debug, Clone, PartialEq)]
pub struct EffectCache {
    pub bitmap: Bitmap,
    pub rect: Rect,
    pub amount: f64,
}

/// Effect-specific data of a raster-effect annotation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EffectRegion {
    pub kind: EffectKind,
    /// Strength: blur radius, pixel block size, zoom factor, or spotlight opacity.
    pub amount: f64,
    #[serde(skip)]
    pub cache: Option<EffectCache>,
}

impl EffectRegion {
    pub fn new(kind: EffectKind, amount: f64) -> Self {
        Self {
            kind,
            amount,
            cache: None,
        }
    }

    /// True when the cache was computed for exactly these bounds and the current amount.
    pub fn is_fresh(&self, bounds: &Bounds) -> bool {
        match (&self.cache, bounds.to_pixel_rect()) {
            (Some(cache), Some(rect)) => cache.rect == rect && cache.amount == self.amount,
            _ => false,
        }
    }

    /// Cached bitmap, only if it still matches `bounds`.
    pub fn fresh_cache(&self, bounds: &Bounds) -> Option<&EffectCache> {
        if self.is_fresh(bounds) {
            self.cache.as_ref()
        } else {
            None
        }
    }

    /// Recomputes the cache for `bounds` from `source`.
    ///
    /// Any failure (no source, empty region, no overlap) leaves no cache so the
    /// renderer falls back to a placeholder.
    pub fn update(&mut self, bounds: &Bounds, source: Option<&Bitmap>) {
        // Drop the stale buffer before computing the replacement.
        self.cache = None;
        if !self.kind.uses_cache() {
            return;
        }
        let Some(source) = source else {
            log::debug!("{:?} effect skipped: no source bitmap", self.kind);
            return;
        };
        let Some(rect) = bounds.to_pixel_rect() else {
            return;
        };

        let bitmap = match self.kind {
            EffectKind::Blur => blur_region(source, &rect, self.amount),
            EffectKind::Pixelate => pixelate_region(source, &rect, self.amount),
            EffectKind::Magnify => magnify_region(source, bounds, &rect, self.amount),
            EffectKind::Highlight | EffectKind::Spotlight => None,
        };

        match bitmap {
            Some(bitmap) => {
                self.cache = Some(EffectCache {
                    bitmap,
                    rect,
                    amount: self.amount,
                });
            }
            None => log::debug!("{:?} effect produced no pixels for {:?}", self.kind, rect),
        }
    }
}

/// Maps a blur radius to the Gaussian sigma passed to `imageops::blur`.
pub fn blur_sigma(radius: f64) -> f32 {
    (radius / 2.0).max(0.5) as f32
}

/// Gaussian blur of `rect ∩ source`, composited into a transparent `rect`-sized result.
pub fn blur_region(source: &Bitmap, rect: &Rect, radius: f64) -> Option<Bitmap> {
    let (crop, offset) = crop_with_offset(source, rect)?;
    let processed = if radius > 0.0 {
        Bitmap::from_image(imageops::blur(crop.as_image(), blur_sigma(radius)))
    } else {
        crop
    };
    Some(compose(rect, &processed, offset))
}

/// Block-averaged pixelation of `rect ∩ source`.
///
/// Each `block × block` cell (clipped at the crop edge) is replaced by the
/// area average of its pixels, which is exactly an area-averaging downscale
/// followed by a nearest-neighbour upscale back to the crop size.
pub fn pixelate_region(source: &Bitmap, rect: &Rect, amount: f64) -> Option<Bitmap> {
    let (crop, offset) = crop_with_offset(source, rect)?;
    let block = amount.round().max(1.0) as u32;
    let (width, height) = crop.size();
    let mut out = Bitmap::new(width, height);

    for by in (0..height).step_by(block as usize) {
        for bx in (0..width).step_by(block as usize) {
            let bw = block.min(width - bx);
            let bh = block.min(height - by);
            let mut sum = [0u64; 4];
            for y in by..by + bh {
                for x in bx..bx + bw {
                    if let Some(px) = crop.pixel(x, y) {
                        for (acc, c) in sum.iter_mut().zip(px) {
                            *acc += c as u64;
                        }
                    }
                }
            }
            let count = (bw * bh) as u64;
            let avg = sum.map(|s| ((s + count / 2) / count) as u8);
            for y in by..by + bh {
                for x in bx..bx + bw {
                    out.put_pixel(x, y, avg);
                }
            }
        }
    }

    Some(compose(rect, &out, offset))
}

/// Zoomed view: captures `bounds / zoom` around the bounds center and scales it to `rect`.
///
/// Near the source edge the capture is clipped first and the remaining piece
/// still fills all of `rect`, so the zoom is stretched along the clipped axis.
pub fn magnify_region(source: &Bitmap, bounds: &Bounds, rect: &Rect, zoom: f64) -> Option<Bitmap> {
    let zoom = zoom.max(1.0);
    let center = bounds.center();
    let capture_w = bounds.width / zoom;
    let capture_h = bounds.height / zoom;
    let capture = Bounds {
        x: center.x - capture_w / 2.0,
        y: center.y - capture_h / 2.0,
        width: capture_w,
        height: capture_h,
    }
    .to_pixel_rect()?;

    let crop = source.crop(&capture)?;
    let scaled = imageops::resize(
        crop.as_image(),
        rect.width as u32,
        rect.height as u32,
        FilterType::Triangle,
    );
    Some(Bitmap::from_image(scaled))
}

fn crop_with_offset(source: &Bitmap, rect: &Rect) -> Option<(Bitmap, (i64, i64))> {
    let inter = source.rect()?.intersection(rect)?;
    let crop = source.crop(&inter)?;
    Some((crop, ((inter.x - rect.x) as i64, (inter.y - rect.y) as i64)))
}

fn compose(rect: &Rect, content: &Bitmap, offset: (i64, i64)) -> Bitmap {
    let mut result = Bitmap::new(rect.width as u32, rect.height as u32);
    result.replace_region(content, offset.0, offset.1);
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::geometry::Point;

    fn bounds(x0: f64, y0: f64, x1: f64, y1: f64) -> Bounds {
        Bounds::from_corners(Point::new(x0, y0), Point::new(x1, y1))
    }

    #[test]
    fn magnify_clipped_at_edge_still_fills_window() {
        let mut source = Bitmap::filled(10, 10, [0, 0, 0, 255]);
        source.put_pixel(9, 9, [255, 255, 255, 255]);
        let b = bounds(0.0, 0.0, 20.0, 20.0);
        let rect = b.to_pixel_rect().unwrap();

        // Capture (5,5)-(15,15) is clipped to (5,5)-(10,10) and stretched 4x.
        let out = magnify_region(&source, &b, &rect, 2.0).unwrap();
        assert_eq!(out.size(), (20, 20));
        assert!(out.pixel(19, 19).unwrap()[0] > 200);
        assert_eq!(out.pixel(0, 0).unwrap()[0], 0);
    }

    #[test]
    fn blur_cache_matches_bounds_and_leaves_outside_transparent() {
        let source = Bitmap::filled(15, 15, [200, 10, 10, 255]);
        let mut region = EffectRegion::new(EffectKind::Blur, 4.0);
        let b = bounds(0.0, 0.0, 20.0, 20.0);
        region.update(&b, Some(&source));

        let cache = region.fresh_cache(&b).expect("blur cache");
        assert_eq!(cache.bitmap.size(), (20, 20));
        for y in 0..20 {
            for x in 0..20 {
                if x >= 15 || y >= 15 {
                    assert_eq!(cache.bitmap.pixel(x, y).unwrap()[3], 0, "({x},{y})");
                }
            }
        }
        assert!(cache.bitmap.pixel(7, 7).unwrap()[3] > 200);
    }

    #[test]
    fn cache_goes_stale_on_move_or_amount_change() {
        let source = Bitmap::filled(40, 40, [1, 2, 3, 255]);
        let mut region = EffectRegion::new(EffectKind::Pixelate, 4.0);
        let b = bounds(0.0, 0.0, 10.0, 10.0);
        region.update(&b, Some(&source));
        assert!(region.is_fresh(&b));
        assert!(!region.is_fresh(&bounds(1.0, 0.0, 11.0, 10.0)));
        region.amount = 6.0;
        assert!(!region.is_fresh(&b));
    }

    #[test]
    fn pixelate_averages_blocks() {
        let mut source = Bitmap::new(4, 2);
        for y in 0..2 {
            source.put_pixel(0, y, [0, 0, 0, 255]);
            source.put_pixel(1, y, [100, 100, 100, 255]);
            source.put_pixel(2, y, [10, 10, 10, 255]);
            source.put_pixel(3, y, [10, 10, 10, 255]);
        }
        let out = pixelate_region(&source, &Rect::new(0, 0, 4, 2).unwrap(), 2.0).unwrap();
        assert_eq!(out.pixel(0, 0), Some([50, 50, 50, 255]));
        assert_eq!(out.pixel(1, 1), Some([50, 50, 50, 255]));
        assert_eq!(out.pixel(3, 0), Some([10, 10, 10, 255]));
    }

    #[test]
    fn pixelate_composites_at_offset() {
        let source = Bitmap::filled(10, 10, [9, 9, 9, 255]);
        let out = pixelate_region(&source, &Rect::new(-2, 0, 6, 4).unwrap(), 3.0).unwrap();
        assert_eq!(out.size(), (6, 4));
        assert_eq!(out.pixel(0, 0).unwrap()[3], 0);
        assert_eq!(out.pixel(2, 0), Some([9, 9, 9, 255]));
    }

    #[test]
    fn magnify_fills_window_from_center() {
        let mut source = Bitmap::filled(40, 40, [0, 0, 0, 255]);
        for y in 15..25 {
            for x in 15..25 {
                source.put_pixel(x, y, [255, 255, 255, 255]);
            }
        }
        let b = bounds(10.0, 10.0, 30.0, 30.0);
        let out = magnify_region(&source, &b, &b.to_pixel_rect().unwrap(), 2.0).unwrap();
        assert_eq!(out.size(), (20, 20));
        // 2x zoom of the 10x10 white center fills the whole window.
        assert!(out.pixel(1, 1).unwrap()[0] > 250);
        assert!(out.pixel(18, 18).unwrap()[0] > 250);
    }

    #[test]
    fn no_source_or_no_overlap_leaves_no_cache() {
        let mut region = EffectRegion::new(EffectKind::Blur, 2.0);
        let b = bounds(0.0, 0.0, 10.0, 10.0);
        region.update(&b, None);
        assert!(region.cache.is_none());

        let source = Bitmap::filled(5, 5, [0, 0, 0, 255]);
        region.update(&bounds(50.0, 50.0, 60.0, 60.0), Some(&source));
        assert!(region.cache.is_none());
    }

    #[test]
    fn render_only_effects_never_cache() {
        let source = Bitmap::filled(5, 5, [0, 0, 0, 255]);
        let mut region = EffectRegion::new(EffectKind::Highlight, 1.0);
        region.update(&bounds(0.0, 0.0, 4.0, 4.0), Some(&source));
        assert!(region.cache.is_none());
    }
}
