//! Retained drawing surface.

use glam::Vec2;

use crate::{Color, Surface};

/// Single recorded drawing operation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DrawOp {
    /// Whole-canvas fill.
    Clear {
        /// Fill color.
        color: Color,
    },
    /// Stroked line segment.
    Line {
        /// Start point in canvas pixels.
        from: Vec2,
        /// End point in canvas pixels.
        to: Vec2,
        /// Stroke width in pixels.
        width: f32,
        /// Stroke color.
        color: Color,
    },
    /// Filled rectangle.
    Rect {
        /// Top-left corner in canvas pixels.
        origin: Vec2,
        /// Width and height in pixels.
        size: Vec2,
        /// Fill color.
        color: Color,
    },
}

/// [`Surface`] that records operations for later replay or inspection.
///
/// Clearing discards previously recorded operations, so the list always holds
/// exactly the latest frame.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DisplayList {
    width: u32,
    height: u32,
    ops: Vec<DrawOp>,
}

impl DisplayList {
    /// Creates an empty list with a zero-sized canvas.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Canvas size set by the most recent resize.
    #[must_use]
    pub const fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Operations of the current frame in drawing order.
    #[must_use]
    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    /// Recorded rectangle fills.
    pub fn rects(&self) -> impl Iterator<Item = (Vec2, Vec2, Color)> + '_ {
        self.ops.iter().filter_map(|op| match *op {
            DrawOp::Rect {
                origin,
                size,
                color,
            } => Some((origin, size, color)),
            _ => None,
        })
    }

    /// Number of recorded line strokes.
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.ops
            .iter()
            .filter(|op| matches!(op, DrawOp::Line { .. }))
            .count()
    }
}

impl Surface for DisplayList {
    fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }

    fn clear(&mut self, color: Color) {
        self.ops.clear();
        self.ops.push(DrawOp::Clear { color });
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2, width: f32, color: Color) {
        self.ops.push(DrawOp::Line {
            from,
            to,
            width,
            color,
        });
    }

    fn fill_rect(&mut self, origin: Vec2, size: Vec2, color: Color) {
        self.ops.push(DrawOp::Rect {
            origin,
            size,
            color,
        });
    }
}
