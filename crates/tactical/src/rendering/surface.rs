use std::path::Path;

use image::RgbaImage;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SurfaceError {
    #[error("surface is busy and cannot be locked")]
    Busy,
    #[error("surface has zero size ({width}x{height})")]
    ZeroSized { width: u32, height: u32 },
    #[error("failed to write screenshot to {path}: {source}")]
    Save {
        path: String,
        #[source]
        source: image::ImageError,
    },
}

/// Software RGBA back buffer the tactical view draws into.
///
/// The buffer persists between frames so unchanged cells keep their pixels;
/// that is what makes incremental repaint and the scroll blit possible.
#[derive(Debug, Clone)]
pub struct Surface {
    width: u32,
    height: u32,
    rgba: Vec<u8>,
    busy: bool,
}

impl Surface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            rgba: vec![0; width as usize * height as usize * 4],
            busy: false,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.rgba = vec![0; width as usize * height as usize * 4];
    }

    /// Marks the buffer as held elsewhere (for example while it is being
    /// presented); locks fail until released.
    pub fn set_busy(&mut self, busy: bool) {
        self.busy = busy;
    }

    pub fn lock(&mut self) -> Result<Canvas<'_>, SurfaceError> {
        if self.busy {
            return Err(SurfaceError::Busy);
        }
        if self.width == 0 || self.height == 0 {
            return Err(SurfaceError::ZeroSized {
                width: self.width,
                height: self.height,
            });
        }
        let (width, height) = (self.width as i32, self.height as i32);
        Ok(Canvas {
            width,
            height,
            clip: ClipRect::full(width, height),
            rgba: &mut self.rgba,
        })
    }

    pub fn pixels(&self) -> &[u8] {
        &self.rgba
    }

    pub fn pixel(&self, x: i32, y: i32) -> Option<[u8; 4]> {
        let offset = pixel_offset(self.width as i32, self.height as i32, x, y)?;
        let mut color = [0; 4];
        color.copy_from_slice(&self.rgba[offset..offset + 4]);
        Some(color)
    }

    pub fn save_png(&self, path: &Path) -> Result<(), SurfaceError> {
        let save_error = |source| SurfaceError::Save {
            path: path.display().to_string(),
            source,
        };
        let image = RgbaImage::from_raw(self.width, self.height, self.rgba.clone()).ok_or(
            SurfaceError::ZeroSized {
                width: self.width,
                height: self.height,
            },
        )?;
        image.save(path).map_err(save_error)
    }
}

fn pixel_offset(width: i32, height: i32, x: i32, y: i32) -> Option<usize> {
    if x < 0 || y < 0 || x >= width || y >= height {
        return None;
    }
    let pixel = (y as usize).checked_mul(width as usize)?.checked_add(x as usize)?;
    pixel.checked_mul(4)
}

/// Half-open pixel rectangle `[left, right) x [top, bottom)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ClipRect {
    left: i32,
    top: i32,
    right: i32,
    bottom: i32,
}

impl ClipRect {
    fn full(width: i32, height: i32) -> Self {
        Self {
            left: 0,
            top: 0,
            right: width,
            bottom: height,
        }
    }

    fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.left && x < self.right && y >= self.top && y < self.bottom
    }
}

/// Locked drawing view of a [`Surface`]. The pixel primitives clip to the
/// current clip rectangle, which starts as the whole buffer.
#[derive(Debug)]
pub struct Canvas<'a> {
    width: i32,
    height: i32,
    clip: ClipRect,
    rgba: &'a mut [u8],
}

impl<'a> Canvas<'a> {
    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    /// Restricts later drawing to the given rectangle, intersected with the
    /// buffer. `blit_within` and `clear` ignore the clip.
    pub fn set_clip(&mut self, x: i32, y: i32, width: i32, height: i32) {
        let full = ClipRect::full(self.width, self.height);
        self.clip = ClipRect {
            left: x.max(full.left),
            top: y.max(full.top),
            right: x.saturating_add(width.max(0)).min(full.right),
            bottom: y.saturating_add(height.max(0)).min(full.bottom),
        };
    }

    pub fn reset_clip(&mut self) {
        self.clip = ClipRect::full(self.width, self.height);
    }

    pub fn put_pixel(&mut self, x: i32, y: i32, color: [u8; 4]) {
        if !self.clip.contains(x, y) {
            return;
        }
        if let Some(offset) = pixel_offset(self.width, self.height, x, y) {
            self.rgba[offset..offset + 4].copy_from_slice(&color);
        }
    }

    /// Darkens a pixel toward black; `level` 0..=255 is how much light remains.
    pub fn shade_pixel(&mut self, x: i32, y: i32, level: u8) {
        if !self.clip.contains(x, y) {
            return;
        }
        if let Some(offset) = pixel_offset(self.width, self.height, x, y) {
            for channel in &mut self.rgba[offset..offset + 3] {
                *channel = ((*channel as u16 * level as u16) / 255) as u8;
            }
        }
    }

    pub fn fill_rect(&mut self, x: i32, y: i32, width: i32, height: i32, color: [u8; 4]) {
        let left = x.max(self.clip.left);
        let top = y.max(self.clip.top);
        let right = (x + width).min(self.clip.right);
        let bottom = (y + height).min(self.clip.bottom);
        for row in top..bottom {
            for column in left..right {
                self.put_pixel(column, row, color);
            }
        }
    }

    /// Outline between two corners, inclusive.
    pub fn draw_rect(&mut self, x1: i32, y1: i32, x2: i32, y2: i32, color: [u8; 4]) {
        let (left, right) = (x1.min(x2), x1.max(x2));
        let (top, bottom) = (y1.min(y2), y1.max(y2));
        for x in left..=right {
            self.put_pixel(x, top, color);
            self.put_pixel(x, bottom, color);
        }
        for y in top..=bottom {
            self.put_pixel(left, y, color);
            self.put_pixel(right, y, color);
        }
    }

    pub fn draw_square_outline(&mut self, cx: i32, cy: i32, half_size: i32, color: [u8; 4]) {
        self.draw_rect(
            cx - half_size,
            cy - half_size,
            cx + half_size,
            cy + half_size,
            color,
        );
    }

    /// Copies a block of the canvas onto another part of itself. Overlapping
    /// rectangles are handled by choosing the row order.
    pub fn blit_within(
        &mut self,
        src_x: i32,
        src_y: i32,
        dst_x: i32,
        dst_y: i32,
        width: i32,
        height: i32,
    ) {
        let mut src_x = src_x;
        let mut src_y = src_y;
        let mut dst_x = dst_x;
        let mut dst_y = dst_y;
        let mut width = width;
        let mut height = height;

        for (src, dst, len) in [
            (&mut src_x, &mut dst_x, &mut width),
            (&mut src_y, &mut dst_y, &mut height),
        ] {
            let shift = (-*src).max(-*dst).max(0);
            *src += shift;
            *dst += shift;
            *len -= shift;
        }
        width = width.min(self.width - src_x).min(self.width - dst_x);
        height = height.min(self.height - src_y).min(self.height - dst_y);
        if width <= 0 || height <= 0 {
            return;
        }

        let stride = self.width as usize * 4;
        let row_bytes = width as usize * 4;
        let copy_row = |rgba: &mut [u8], row: i32| {
            let src = (src_y + row) as usize * stride + src_x as usize * 4;
            let dst = (dst_y + row) as usize * stride + dst_x as usize * 4;
            rgba.copy_within(src..src + row_bytes, dst);
        };
        if dst_y > src_y {
            for row in (0..height).rev() {
                copy_row(&mut *self.rgba, row);
            }
        } else {
            for row in 0..height {
                copy_row(&mut *self.rgba, row);
            }
        }
    }

    pub fn clear(&mut self, color: [u8; 4]) {
        for chunk in self.rgba.chunks_exact_mut(4) {
            chunk.copy_from_slice(&color);
        }
    }
}
