use egui::Color32;
use serde::{Deserialize, Serialize};

pub const MIN_STROKE_WIDTH: f32 = 1.0;
pub const MAX_STROKE_WIDTH: f32 = 50.0;

pub const DEFAULT_STROKE_COLOR: Color32 = Color32::from_rgb(0x65, 0x56, 0xcd);
pub const DEFAULT_STROKE_WIDTH: f32 = 6.0;
pub const DEFAULT_BACKGROUND_COLOR: Color32 = Color32::from_rgb(0xde, 0xde, 0xde);
pub const DEFAULT_ERASER_WIDTH: f32 = 6.0;

/// Color and width captured into a point at the moment it is sampled
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointStyle {
    pub color: Color32,
    pub size: f32,
}

impl PointStyle {
    pub fn new(color: Color32, size: f32) -> Self {
        Self {
            color,
            size: clamp_width(size).unwrap_or(MIN_STROKE_WIDTH),
        }
    }
}

/// The user-controlled drawing settings.
///
/// The recorder never holds on to these: each new point copies the active
/// [`PointStyle`] out of the settings, so later changes only affect points
/// sampled after them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasSettings {
    stroke_color: Color32,
    stroke_width: f32,
    background_color: Color32,
    eraser: bool,
    eraser_width: f32,
}

impl Default for CanvasSettings {
    fn default() -> Self {
        Self {
            stroke_color: DEFAULT_STROKE_COLOR,
            stroke_width: DEFAULT_STROKE_WIDTH,
            background_color: DEFAULT_BACKGROUND_COLOR,
            eraser: false,
            eraser_width: DEFAULT_ERASER_WIDTH,
        }
    }
}

impl CanvasSettings {
    /// The style a point sampled right now would receive.
    ///
    /// In eraser mode points paint with the background color at the eraser width.
    pub fn point_style(&self) -> PointStyle {
        if self.eraser {
            PointStyle::new(self.background_color, self.eraser_width)
        } else {
            PointStyle::new(self.stroke_color, self.stroke_width)
        }
    }

    pub fn stroke_color(&self) -> Color32 {
        self.stroke_color
    }

    pub fn set_stroke_color(&mut self, color: Color32) {
        self.stroke_color = color;
    }

    pub fn stroke_width(&self) -> f32 {
        self.stroke_width
    }

    /// Set the stroke width, clamped to `[1, 50]`.
    ///
    /// Returns false (and leaves the width alone) for NaN or infinite input.
    pub fn set_stroke_width(&mut self, width: f32) -> bool {
        match clamp_width(width) {
            Some(width) => {
                self.stroke_width = width;
                true
            }
            None => false,
        }
    }

    pub fn background_color(&self) -> Color32 {
        self.background_color
    }

    pub fn set_background_color(&mut self, color: Color32) {
        self.background_color = color;
    }

    pub fn eraser(&self) -> bool {
        self.eraser
    }

    pub fn set_eraser(&mut self, eraser: bool) {
        self.eraser = eraser;
    }

    /// Fix up values that did not come through the setters (e.g. deserialized ones)
    pub fn sanitized(mut self) -> Self {
        self.stroke_width = clamp_width(self.stroke_width).unwrap_or(DEFAULT_STROKE_WIDTH);
        self.eraser_width = clamp_width(self.eraser_width).unwrap_or(DEFAULT_ERASER_WIDTH);
        self
    }
}

fn clamp_width(width: f32) -> Option<f32> {
    width
        .is_finite()
        .then(|| width.clamp(MIN_STROKE_WIDTH, MAX_STROKE_WIDTH))
}
