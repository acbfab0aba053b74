use egui::{Color32, Pos2};
use std::sync::Arc;

use crate::settings::PointStyle;

/// A single sampled pointer location plus the style active when it was captured
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pos: Pos2,
    color: Color32,
    size: f32,
}

impl Point {
    pub fn new(pos: Pos2, style: PointStyle) -> Self {
        Self {
            pos,
            color: style.color,
            size: style.size,
        }
    }

    pub fn pos(&self) -> Pos2 {
        self.pos
    }

    pub fn x(&self) -> f32 {
        self.pos.x
    }

    pub fn y(&self) -> f32 {
        self.pos.y
    }

    pub fn color(&self) -> Color32 {
        self.color
    }

    pub fn size(&self) -> f32 {
        self.size
    }
}

// Immutable path, shared between history and renderer
#[derive(Debug, Clone, PartialEq)]
pub struct Path {
    points: Vec<Point>,
}

pub type PathRef = Arc<Path>;

impl Path {
    /// Returns `None` for an empty point list: empty paths are never committed.
    pub fn new(points: Vec<Point>) -> Option<Self> {
        (!points.is_empty()).then_some(Self { points })
    }

    pub fn new_ref(points: Vec<Point>) -> Option<PathRef> {
        Self::new(points).map(Arc::new)
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Consecutive point pairs in drawing order
    pub fn segments(&self) -> impl Iterator<Item = (&Point, &Point)> {
        self.points.windows(2).map(|pair| (&pair[0], &pair[1]))
    }
}

// Growable path for the stroke currently being drawn
#[derive(Debug, Clone, Default)]
pub struct MutablePath {
    points: Vec<Point>,
}

impl MutablePath {
    pub fn new() -> Self {
        Self { points: Vec::new() }
    }

    pub fn add_point(&mut self, point: Point) {
        self.points.push(point);
    }

    pub fn last_point(&self) -> Option<&Point> {
        self.points.last()
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Freeze into a shareable path; `None` if nothing was recorded
    pub fn into_path_ref(self) -> Option<PathRef> {
        Path::new_ref(self.points)
    }
}
