//! Raster [`Renderer`] over two `image::RgbImage` canvases.

use crate::core::{
    Canvas, DrawCommand, OverlayTag, Renderer, Rgb, RgbImageView, PITCH_HEIGHT, PITCH_MIDLINE_X,
    PITCH_WIDTH,
};
use ::image::{Rgb as Pixel, RgbImage};
use imageproc::drawing::{
    draw_filled_circle_mut, draw_filled_rect_mut, draw_hollow_circle_mut, draw_hollow_rect_mut,
    draw_line_segment_mut,
};
use imageproc::rect::Rect;
use nalgebra::Point2;

/// Size of the offside tag sprite.
pub const TAG_WIDTH: u32 = 130;
pub const TAG_HEIGHT: u32 = 60;

const GRASS: Pixel<u8> = Pixel([58, 140, 62]);
const CHALK: Pixel<u8> = Pixel([245, 245, 245]);
const TAG_FILL: Pixel<u8> = Pixel([200, 20, 20]);

/// Borrow an `image::RgbImage` as the lightweight core view.
pub fn rgb_view(img: &RgbImage) -> RgbImageView<'_> {
    RgbImageView {
        width: img.width() as usize,
        height: img.height() as usize,
        data: img.as_raw(),
    }
}

/// A plain top-down pitch: grass, touchlines, halfway line and center circle.
pub fn blank_pitch() -> RgbImage {
    let (w, h) = (PITCH_WIDTH as u32, PITCH_HEIGHT as u32);
    let mut img = RgbImage::from_pixel(w, h, GRASS);
    draw_hollow_rect_mut(&mut img, Rect::at(0, 0).of_size(w, h), CHALK);
    let mid = PITCH_MIDLINE_X as f32;
    draw_line_segment_mut(&mut img, (mid, 0.0), (mid, h as f32 - 1.0), CHALK);
    draw_hollow_circle_mut(&mut img, (mid as i32, (h / 2) as i32), 92, CHALK);
    img
}

#[inline]
fn pixel(c: Rgb) -> Pixel<u8> {
    Pixel(c.to_u8())
}

#[inline]
fn to_f32(p: Point2<f64>) -> (f32, f32) {
    (p.x as f32, p.y as f32)
}

/// Draw a segment `thickness` pixels wide as a bundle of parallel 1px lines.
fn draw_thick_line(
    img: &mut RgbImage,
    from: Point2<f64>,
    to: Point2<f64>,
    color: Pixel<u8>,
    thickness: u32,
) {
    let d = to - from;
    let len = d.norm();
    if len <= f64::EPSILON || thickness <= 1 {
        draw_line_segment_mut(img, to_f32(from), to_f32(to), color);
        return;
    }
    let normal = nalgebra::Vector2::new(-d.y, d.x) / len;
    let half = (thickness as f64 - 1.0) / 2.0;
    let steps = thickness * 2 - 1;
    for i in 0..steps {
        let off = normal * (-half + i as f64 * 0.5);
        draw_line_segment_mut(img, to_f32(from + off), to_f32(to + off), color);
    }
}

fn draw_tag(img: &mut RgbImage, tag: OverlayTag, top_left: Point2<i64>) {
    match tag {
        OverlayTag::Offside => {
            let (x, y) = (top_left.x as i32, top_left.y as i32);
            let rect = Rect::at(x, y).of_size(TAG_WIDTH, TAG_HEIGHT);
            draw_filled_rect_mut(img, rect, TAG_FILL);
            let inner = Rect::at(x + 4, y + 4).of_size(TAG_WIDTH - 8, TAG_HEIGHT - 8);
            draw_hollow_rect_mut(img, inner, CHALK);
        }
    }
}

/// Rasterizes draw commands onto a frame copy and a pitch image.
pub struct RasterRenderer {
    frame: RgbImage,
    pitch: RgbImage,
}

impl RasterRenderer {
    pub fn new(frame: RgbImage, pitch: RgbImage) -> Self {
        Self { frame, pitch }
    }

    /// Draw over `frame` and a [`blank_pitch`].
    pub fn with_blank_pitch(frame: RgbImage) -> Self {
        Self::new(frame, blank_pitch())
    }

    pub fn frame(&self) -> &RgbImage {
        &self.frame
    }

    pub fn pitch(&self) -> &RgbImage {
        &self.pitch
    }

    pub fn into_images(self) -> (RgbImage, RgbImage) {
        (self.frame, self.pitch)
    }

    fn canvas_mut(&mut self, canvas: Canvas) -> &mut RgbImage {
        match canvas {
            Canvas::Frame => &mut self.frame,
            Canvas::Pitch => &mut self.pitch,
        }
    }
}

impl Renderer for RasterRenderer {
    fn draw(&mut self, command: DrawCommand) {
        let img = self.canvas_mut(command.canvas());
        match command {
            DrawCommand::FilledCircle {
                center,
                radius,
                color,
                ..
            } => {
                let c = (center.x as i32, center.y as i32);
                draw_filled_circle_mut(img, c, radius.round() as i32, pixel(color));
            }
            DrawCommand::Polyline {
                points,
                color,
                closed,
                ..
            } => {
                let px = pixel(color);
                for pair in points.windows(2) {
                    draw_line_segment_mut(img, to_f32(pair[0]), to_f32(pair[1]), px);
                }
                if closed && points.len() > 2 {
                    if let (Some(first), Some(last)) = (points.first(), points.last()) {
                        draw_line_segment_mut(img, to_f32(*last), to_f32(*first), px);
                    }
                }
            }
            DrawCommand::Line {
                from,
                to,
                color,
                thickness,
                ..
            } => draw_thick_line(img, from, to, pixel(color), thickness),
            DrawCommand::Overlay { tag, top_left, .. } => draw_tag(img, tag, top_left),
        }
    }
}
