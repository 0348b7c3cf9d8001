use crate::{BoundingBox, ImageSize};

/// Borrowed interleaved RGB8 image, row-major, `len = width * height * 3`.
#[derive(Clone, Copy, Debug)]
pub struct RgbImageView<'a> {
    pub width: usize,
    pub height: usize,
    pub data: &'a [u8],
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum RgbImageViewError {
    #[error("invalid RGB buffer length (expected {expected} bytes, got {got})")]
    InvalidBuffer { expected: usize, got: usize },
}

impl<'a> RgbImageView<'a> {
    pub fn new(width: usize, height: usize, data: &'a [u8]) -> Result<Self, RgbImageViewError> {
        let expected = width * height * 3;
        if data.len() != expected {
            return Err(RgbImageViewError::InvalidBuffer {
                expected,
                got: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    pub fn size(&self) -> ImageSize {
        ImageSize::new(self.width as u32, self.height as u32)
    }

    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> [u8; 3] {
        let i = (y * self.width + x) * 3;
        [self.data[i], self.data[i + 1], self.data[i + 2]]
    }

    /// Integer pixel window `[x0, x1) × [y0, y1)` of a box, clamped to the image.
    ///
    /// Box coordinates are truncated toward zero, as integer crops are.
    /// Returns `None` when the clamped window is empty.
    pub fn crop_window(&self, bbox: &BoundingBox) -> Option<(usize, usize, usize, usize)> {
        let clamp_x = |v: f64| (v.max(0.0) as usize).min(self.width);
        let clamp_y = |v: f64| (v.max(0.0) as usize).min(self.height);
        let (x0, x1) = (clamp_x(bbox.x1), clamp_x(bbox.x2));
        let (y0, y1) = (clamp_y(bbox.y1), clamp_y(bbox.y2));
        if x0 >= x1 || y0 >= y1 {
            return None;
        }
        Some((x0, y0, x1, y1))
    }
}
