// SPDX-License-Identifier: MIT OR Apache-2.0
//! Socket colors by pin type tag.

use egui::Color32;
use indexmap::IndexMap;
use nodify_graph::{Pin, PinKind};

/// Color for tags without an entry
pub const FALLBACK_COLOR: Color32 = Color32::GRAY;

/// Socket color table
#[derive(Debug, Clone)]
pub struct PinStyles {
    colors: IndexMap<String, Color32>,
}

impl Default for PinStyles {
    fn default() -> Self {
        let colors = [
            (PinKind::This, Color32::from_rgb(244, 196, 32)),
            (PinKind::Boolean, Color32::from_rgb(255, 47, 47)),
            (PinKind::Number, Color32::from_rgb(102, 227, 33)),
            (PinKind::String, Color32::from_rgb(239, 43, 205)),
            (PinKind::Object, Color32::from_rgb(47, 157, 255)),
        ]
        .into_iter()
        .map(|(kind, color)| (kind.tag().to_string(), color))
        .collect();
        Self { colors }
    }
}

impl PinStyles {
    /// Set the color for a type tag
    pub fn set(&mut self, tag: impl Into<String>, color: Color32) {
        self.colors.insert(tag.into(), color);
    }

    /// Color for a type tag
    pub fn color(&self, tag: &str) -> Color32 {
        self.colors.get(tag).copied().unwrap_or(FALLBACK_COLOR)
    }

    /// Color for a pin's socket
    pub fn pin_color(&self, pin: &Pin) -> Color32 {
        self.color(pin.type_tag())
    }
}
