use super::vec2::Vec2;

pub const RED: u32 = 0xff0000;
pub const GREEN: u32 = 0x00ff00;
pub const BLUE: u32 = 0x0000ff;
pub const WHITE: u32 = 0xffffff;
pub const DARK_RED: u32 = 0x770000;
pub const DARK_GREEN: u32 = 0x007700;
pub const TRANSPARENT_RED: u32 = 0x7fff0000;

/// Drawing side channel for human visualization. Strictly write-only: the
/// strategy never reads anything back, so a sink can drop everything.
pub trait DebugSink {
    fn line(&mut self, a: Vec2, b: Vec2, color: u32) {
        let _ = (a, b, color);
    }

    fn square(&mut self, center: Vec2, size: f64, color: u32) {
        let _ = (center, size, color);
    }

    fn rect(&mut self, bottom_left: Vec2, top_right: Vec2, color: u32) {
        let _ = (bottom_left, top_right, color);
    }
}

/// Default sink that draws nothing.
pub struct NoDebug;

impl DebugSink for NoDebug {}

/// Sink that records every shape, for sinks that render a frame at a time
/// (and for asserting on drawn output in tests).
#[derive(Default)]
pub struct RecordingDebug {
    pub shapes: Vec<Shape>,
}

#[derive(Debug, Clone, Copy)]
pub enum Shape {
    Line { a: Vec2, b: Vec2, color: u32 },
    Square { center: Vec2, size: f64, color: u32 },
    Rect { bottom_left: Vec2, top_right: Vec2, color: u32 },
}

impl RecordingDebug {
    pub fn new() -> Self {
        RecordingDebug::default()
    }

    pub fn clear(&mut self) {
        self.shapes.clear();
    }
}

impl DebugSink for RecordingDebug {
    fn line(&mut self, a: Vec2, b: Vec2, color: u32) {
        self.shapes.push(Shape::Line { a, b, color });
    }

    fn square(&mut self, center: Vec2, size: f64, color: u32) {
        self.shapes.push(Shape::Square { center, size, color });
    }

    fn rect(&mut self, bottom_left: Vec2, top_right: Vec2, color: u32) {
        self.shapes.push(Shape::Rect {
            bottom_left,
            top_right,
            color,
        });
    }
}
