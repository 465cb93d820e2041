// SPDX-License-Identifier: MIT OR Apache-2.0
//! Link curves.
//!
//! A link is drawn as a horizontal cubic Bezier from the output socket to
//! the input socket. Both control points are pushed out horizontally by
//! half the horizontal distance between the endpoints.

use egui::Pos2;
use std::fmt::Write as _;

/// A cubic Bezier curve
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicBezier {
    /// Start point
    pub start: Pos2,
    /// First control point
    pub ctrl1: Pos2,
    /// Second control point
    pub ctrl2: Pos2,
    /// End point
    pub end: Pos2,
}

impl CubicBezier {
    /// Curve for a link whose output end is at `output` and input end at `input`
    pub fn link(output: Pos2, input: Pos2) -> Self {
        let offset = (output.x - input.x).abs() * 0.5;
        Self {
            start: output,
            ctrl1: Pos2::new(output.x + offset, output.y),
            ctrl2: Pos2::new(input.x - offset, input.y),
            end: input,
        }
    }

    /// Point on the curve at parameter `t` in `[0, 1]`
    pub fn point_at(&self, t: f32) -> Pos2 {
        let t = t.clamp(0.0, 1.0);
        let mt = 1.0 - t;
        let a = mt * mt * mt;
        let b = 3.0 * mt * mt * t;
        let c = 3.0 * mt * t * t;
        let d = t * t * t;
        Pos2::new(
            a * self.start.x + b * self.ctrl1.x + c * self.ctrl2.x + d * self.end.x,
            a * self.start.y + b * self.ctrl1.y + c * self.ctrl2.y + d * self.end.y,
        )
    }

    /// `segments + 1` evenly spaced points from start to end
    pub fn flatten(&self, segments: usize) -> Vec<Pos2> {
        let segments = segments.max(1);
        (0..=segments)
            .map(|i| self.point_at(i as f32 / segments as f32))
            .collect()
    }

    /// SVG path data, e.g. `M 10 20 C 75 20 75 80 140 80`
    pub fn to_svg_path(&self) -> String {
        let mut path = String::new();
        let _ = write!(
            path,
            "M {} {} C {} {} {} {} {} {}",
            self.start.x,
            self.start.y,
            self.ctrl1.x,
            self.ctrl1.y,
            self.ctrl2.x,
            self.ctrl2.y,
            self.end.x,
            self.end.y
        );
        path
    }
}
