#![allow(dead_code)]

use offside::core::{BoundingBox, ClassLabel, Detection, ImageSize, RgbImageView};
use offside::io::RawDetection;

pub const FRAME: ImageSize = ImageSize::new(1050, 680);
pub const GRASS: [u8; 3] = [40, 140, 50];
pub const RED: [u8; 3] = [220, 30, 30];
pub const WHITE: [u8; 3] = [240, 240, 240];
pub const KEEPER: [u8; 3] = [250, 200, 20];

/// Feet positions; with the identity homography on a 1050×680 frame these
/// are also pitch coordinates.
pub const ATTACKERS: [(f64, f64); 3] = [(120.0, 500.0), (400.0, 100.0), (600.0, 600.0)];
pub const DEFENDERS: [(f64, f64); 5] = [
    (150.0, 200.0),
    (160.0, 300.0),
    (170.0, 400.0),
    (200.0, 350.0),
    (180.0, 250.0),
];
pub const GOALKEEPER: (f64, f64) = (60.0, 340.0);

/// 20×40 box standing on `(x, y)`.
pub fn feet(x: f64, y: f64) -> BoundingBox {
    BoundingBox::new(x - 10.0, y - 40.0, x + 10.0, y)
}

pub struct Scene {
    pub data: Vec<u8>,
    pub detections: Vec<Detection>,
}

impl Scene {
    pub fn view(&self) -> RgbImageView<'_> {
        RgbImageView::new(FRAME.width as usize, FRAME.height as usize, &self.data).unwrap()
    }

    pub fn raw_detections(&self) -> Vec<RawDetection> {
        self.detections
            .iter()
            .map(|d| RawDetection {
                bbox: [d.bbox.x1, d.bbox.y1, d.bbox.x2, d.bbox.y2],
                class_id: d.label.class_id() as f32,
                confidence: Some(0.9),
            })
            .collect()
    }
}

fn paint(data: &mut [u8], bbox: &BoundingBox, color: [u8; 3]) {
    let w = FRAME.width as usize;
    // jersey stripe inside the box, grass around it
    let (x0, x1) = (bbox.x1 as usize + 4, bbox.x2 as usize - 4);
    let (y0, y1) = (bbox.y1 as usize + 5, bbox.y1 as usize + 25);
    for y in y0..y1 {
        for x in x0..x1 {
            let i = (y * w + x) * 3;
            data[i..i + 3].copy_from_slice(&color);
        }
    }
}

pub fn scene() -> Scene {
    let n = FRAME.width as usize * FRAME.height as usize;
    let mut data: Vec<u8> = GRASS.iter().copied().cycle().take(n * 3).collect();
    let mut detections = Vec::new();

    // interleave the teams so input order says nothing about team
    for (i, &(x, y)) in DEFENDERS.iter().enumerate() {
        let b = feet(x, y);
        paint(&mut data, &b, WHITE);
        detections.push(Detection::new(b, ClassLabel::Player));
        if let Some(&(ax, ay)) = ATTACKERS.get(i) {
            let b = feet(ax, ay);
            paint(&mut data, &b, RED);
            detections.push(Detection::new(b, ClassLabel::Player));
        }
    }
    let gk = feet(GOALKEEPER.0, GOALKEEPER.1);
    paint(&mut data, &gk, KEEPER);
    detections.push(Detection::new(gk, ClassLabel::Goalkeeper));

    Scene { data, detections }
}
