//! Owned RGBA bitmaps.
//!
//! [`Bitmap`] is the single owner of a pixel buffer. Replacing a field that
//! holds one drops the previous buffer, so there is no separate dispose step.
//! Pixels are straight-alpha RGBA8; conversion to cairo's premultiplied
//! ARGB32 happens only at the render boundary.

use crate::error::{MarkupError, Result};
use crate::util::Rect;
use image::{RgbaImage, imageops};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::Cursor;

/// Uniquely owned RGBA8 pixel buffer.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "RawBitmap", try_from = "RawBitmap")]
pub struct Bitmap {
    image: RgbaImage,
}

/// Field-for-field form used by serializers.
#[derive(Serialize, Deserialize)]
struct RawBitmap {
    width: u32,
    height: u32,
    rgba: Vec<u8>,
}

impl From<Bitmap> for RawBitmap {
    fn from(bitmap: Bitmap) -> Self {
        let (width, height) = bitmap.size();
        Self {
            width,
            height,
            rgba: bitmap.image.into_raw(),
        }
    }
}

impl TryFrom<RawBitmap> for Bitmap {
    type Error = MarkupError;

    fn try_from(raw: RawBitmap) -> Result<Self> {
        let (width, height) = (raw.width, raw.height);
        RgbaImage::from_raw(width, height, raw.rgba)
            .map(Bitmap::from_image)
            .ok_or(MarkupError::InvalidDimensions { width, height })
    }
}

impl fmt::Debug for Bitmap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bitmap")
            .field("width", &self.width())
            .field("height", &self.height())
            .finish()
    }
}

impl Bitmap {
    /// Creates a fully transparent bitmap.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image: RgbaImage::new(width, height),
        }
    }

    /// Creates a bitmap filled with a single straight-alpha RGBA value.
    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        Self {
            image: RgbaImage::from_pixel(width, height, image::Rgba(rgba)),
        }
    }

    pub fn from_image(image: RgbaImage) -> Self {
        Self { image }
    }

    /// Decodes any format the `image` crate was built with.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let decoded = image::load_from_memory(bytes).map_err(MarkupError::Decode)?;
        Ok(Self::from_image(decoded.to_rgba8()))
    }

    /// Encodes the bitmap as PNG.
    pub fn encode_png(&self) -> Result<Vec<u8>> {
        let mut out = Cursor::new(Vec::new());
        self.image
            .write_to(&mut out, image::ImageFormat::Png)
            .map_err(MarkupError::Encode)?;
        Ok(out.into_inner())
    }

    pub fn as_image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn size(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }

    /// Full extent of the bitmap as a pixel rectangle, `None` when empty.
    pub fn rect(&self) -> Option<Rect> {
        Rect::new(0, 0, self.width() as i32, self.height() as i32)
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        self.image.get_pixel_checked(x, y).map(|p| p.0)
    }

    pub fn put_pixel(&mut self, x: u32, y: u32, rgba: [u8; 4]) {
        if x < self.width() && y < self.height() {
            self.image.put_pixel(x, y, image::Rgba(rgba));
        }
    }

    /// Copies the region `rect ∩ self` into a new bitmap.
    ///
    /// Returns `None` when the clamped region is empty.
    pub fn crop(&self, rect: &Rect) -> Option<Bitmap> {
        let region = self.rect()?.intersection(rect)?;
        let view = imageops::crop_imm(
            &self.image,
            region.x as u32,
            region.y as u32,
            region.width as u32,
            region.height as u32,
        );
        Some(Bitmap::from_image(view.to_image()))
    }

    /// Removes the band `[from, to)` along one axis and joins the remaining pieces.
    ///
    /// `vertical` removes a column band (x range); otherwise a row band (y range).
    /// Returns `None` when the clamped band is empty or would consume the whole bitmap.
    pub fn cut_out(&self, vertical: bool, from: i32, to: i32) -> Option<Bitmap> {
        let (width, height) = self.size();
        let extent = if vertical { width } else { height } as i32;
        let start = from.min(to).clamp(0, extent);
        let end = from.max(to).clamp(0, extent);
        let band = end - start;
        if band <= 0 || band >= extent {
            return None;
        }

        let (out_w, out_h) = if vertical {
            (width - band as u32, height)
        } else {
            (width, height - band as u32)
        };
        let mut out = RgbaImage::new(out_w, out_h);

        let (lead_w, lead_h, tail_x, tail_y, tail_w, tail_h) = if vertical {
            (start as u32, height, end as u32, 0, width - end as u32, height)
        } else {
            (width, start as u32, 0, end as u32, width, height - end as u32)
        };

        if lead_w > 0 && lead_h > 0 {
            let lead = imageops::crop_imm(&self.image, 0, 0, lead_w, lead_h).to_image();
            imageops::replace(&mut out, &lead, 0, 0);
        }
        if tail_w > 0 && tail_h > 0 {
            let tail = imageops::crop_imm(&self.image, tail_x, tail_y, tail_w, tail_h).to_image();
            let (dx, dy) = if vertical {
                (start as i64, 0)
            } else {
                (0, start as i64)
            };
            imageops::replace(&mut out, &tail, dx, dy);
        }

        Some(Bitmap::from_image(out))
    }

    /// Copies `src` over this bitmap at the given offset, replacing pixels (no blending).
    pub fn replace_region(&mut self, src: &Bitmap, x: i64, y: i64) {
        imageops::replace(&mut self.image, &src.image, x, y);
    }

    /// Converts to a premultiplied ARGB32 cairo surface.
    pub fn to_surface(&self) -> Result<cairo::ImageSurface> {
        let (width, height) = self.size();
        if self.is_empty() {
            return Err(MarkupError::InvalidDimensions { width, height });
        }
        let mut surface =
            cairo::ImageSurface::create(cairo::Format::ARgb32, width as i32, height as i32)?;
        let stride = surface.stride() as usize;
        {
            let mut data = surface.data()?;
            for (x, y, px) in self.image.enumerate_pixels() {
                let [r, g, b, a] = px.0;
                let argb = (a as u32) << 24
                    | (premultiply(r, a) as u32) << 16
                    | (premultiply(g, a) as u32) << 8
                    | premultiply(b, a) as u32;
                let offset = y as usize * stride + x as usize * 4;
                data[offset..offset + 4].copy_from_slice(&argb.to_ne_bytes());
            }
        }
        Ok(surface)
    }

    /// Reads a premultiplied ARGB32 cairo surface back into straight-alpha RGBA.
    ///
    /// The surface must not be referenced by a live `cairo::Context`.
    pub fn from_surface(surface: &mut cairo::ImageSurface) -> Result<Bitmap> {
        surface.flush();
        let width = surface.width().max(0) as u32;
        let height = surface.height().max(0) as u32;
        let stride = surface.stride() as usize;
        let data = surface.data()?;
        let mut image = RgbaImage::new(width, height);
        for (x, y, px) in image.enumerate_pixels_mut() {
            let offset = y as usize * stride + x as usize * 4;
            let mut word = [0u8; 4];
            word.copy_from_slice(&data[offset..offset + 4]);
            let argb = u32::from_ne_bytes(word);
            let a = (argb >> 24) as u8;
            px.0 = [
                unpremultiply((argb >> 16) as u8, a),
                unpremultiply((argb >> 8) as u8, a),
                unpremultiply(argb as u8, a),
                a,
            ];
        }
        Ok(Bitmap::from_image(image))
    }
}

fn premultiply(c: u8, a: u8) -> u8 {
    ((c as u32 * a as u32 + 127) / 255) as u8
}

fn unpremultiply(c: u8, a: u8) -> u8 {
    if a == 0 {
        0
    } else {
        ((c as u32 * 255 + a as u32 / 2) / a as u32).min(255) as u8
    }
}
