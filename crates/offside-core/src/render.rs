//! Draw primitives and the sink that consumes them.
//!
//! Analysis code never touches pixel buffers; it emits [`DrawCommand`]s and
//! a [`Renderer`] decides how (and whether) to rasterize them.

use crate::Rgb;
use nalgebra::Point2;
use serde::{Deserialize, Serialize};

/// Target surface of a draw command.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Canvas {
    /// The broadcast frame, in frame pixels.
    Frame,
    /// The top-down pitch template, in pitch-template pixels.
    Pitch,
}

/// Small sprites placed with their top-left corner at a pixel position.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverlayTag {
    Offside,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DrawCommand {
    FilledCircle {
        canvas: Canvas,
        center: Point2<f64>,
        radius: f64,
        color: Rgb,
    },
    Polyline {
        canvas: Canvas,
        points: Vec<Point2<f64>>,
        color: Rgb,
        closed: bool,
    },
    Line {
        canvas: Canvas,
        from: Point2<f64>,
        to: Point2<f64>,
        color: Rgb,
        thickness: u32,
    },
    Overlay {
        canvas: Canvas,
        tag: OverlayTag,
        top_left: Point2<i64>,
    },
}

impl DrawCommand {
    pub fn canvas(&self) -> Canvas {
        match self {
            DrawCommand::FilledCircle { canvas, .. }
            | DrawCommand::Polyline { canvas, .. }
            | DrawCommand::Line { canvas, .. }
            | DrawCommand::Overlay { canvas, .. } => *canvas,
        }
    }
}

/// Sink for draw primitives.
pub trait Renderer {
    fn draw(&mut self, command: DrawCommand);
}

impl<R: Renderer + ?Sized> Renderer for &mut R {
    fn draw(&mut self, command: DrawCommand) {
        (**self).draw(command)
    }
}

/// Renderer that only records what it was asked to draw.
#[derive(Clone, Debug, Default)]
pub struct RecordingRenderer {
    pub commands: Vec<DrawCommand>,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(&self, canvas: Canvas) -> impl Iterator<Item = &DrawCommand> {
        self.commands.iter().filter(move |c| c.canvas() == canvas)
    }

    pub fn overlays(&self) -> impl Iterator<Item = (OverlayTag, Point2<i64>)> + '_ {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Overlay { tag, top_left, .. } => Some((*tag, *top_left)),
            _ => None,
        })
    }

    pub fn lines(&self, canvas: Canvas) -> Vec<(Point2<f64>, Point2<f64>)> {
        self.on(canvas)
            .filter_map(|c| match c {
                DrawCommand::Line { from, to, .. } => Some((*from, *to)),
                _ => None,
            })
            .collect()
    }
}

impl Renderer for RecordingRenderer {
    fn draw(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }
}
