use egui::Pos2;

use crate::error::{CanvasError, CanvasResult};
use crate::settings::PointStyle;
use crate::stroke::{MutablePath, PathRef, Point};

/// Captures pointer samples into the path currently being drawn.
///
/// The recorder only collects points. Drawing the live segment and committing
/// the finished path are left to the caller, which receives everything it
/// needs from the return values.
#[derive(Debug, Default)]
pub struct StrokeRecorder {
    // Transient state: the stroke being drawn (if any)
    current: Option<MutablePath>,
}

impl StrokeRecorder {
    pub fn new() -> Self {
        Self { current: None }
    }

    /// Open a new path at `pos`, returning its first point.
    ///
    /// Fails with [`CanvasError::InvalidState`] if a stroke is already open.
    pub fn begin(&mut self, pos: Pos2, style: PointStyle) -> CanvasResult<Point> {
        if self.current.is_some() {
            return Err(CanvasError::InvalidState(
                "a stroke is already in progress".to_owned(),
            ));
        }
        Ok(self.open(pos, style))
    }

    /// Discard any open path and start over at `pos`.
    pub fn restart(&mut self, pos: Pos2, style: PointStyle) -> Point {
        if let Some(discarded) = self.current.take() {
            log::debug!("Discarding open stroke with {} point(s)", discarded.points().len());
        }
        self.open(pos, style)
    }

    /// Append a point to the open path.
    ///
    /// Returns the new segment (previous point, new point) for incremental
    /// drawing, or `None` when no stroke is open.
    pub fn extend(&mut self, pos: Pos2, style: PointStyle) -> Option<(Point, Point)> {
        let path = self.current.as_mut()?;
        let point = Point::new(pos, style);
        let previous = path.last_point().copied().unwrap_or(point);
        path.add_point(point);
        Some((previous, point))
    }

    /// Close the open path, returning it for commit if it holds any points.
    pub fn end(&mut self) -> Option<PathRef> {
        self.current.take().and_then(MutablePath::into_path_ref)
    }

    /// Whether a stroke is currently open
    pub fn is_drawing(&self) -> bool {
        self.current.is_some()
    }

    /// Points recorded so far in the open stroke
    pub fn current_points(&self) -> &[Point] {
        match &self.current {
            Some(path) => path.points(),
            None => &[],
        }
    }

    fn open(&mut self, pos: Pos2, style: PointStyle) -> Point {
        let point = Point::new(pos, style);
        let mut path = MutablePath::new();
        path.add_point(point);
        self.current = Some(path);
        point
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::Color32;

    fn style(color: Color32) -> PointStyle {
        PointStyle::new(color, 3.0)
    }

    #[test]
    fn test_begin_extend_end() {
        let mut recorder = StrokeRecorder::new();
        recorder.begin(Pos2::new(10.0, 10.0), style(Color32::BLACK)).unwrap();
        let (from, to) = recorder
            .extend(Pos2::new(20.0, 20.0), style(Color32::BLACK))
            .unwrap();
        assert_eq!(from.pos(), Pos2::new(10.0, 10.0));
        assert_eq!(to.pos(), Pos2::new(20.0, 20.0));

        let path = recorder.end().unwrap();
        assert_eq!(path.points().len(), 2);
        assert!(!recorder.is_drawing());
    }

    #[test]
    fn test_double_begin_is_invalid_state() {
        let mut recorder = StrokeRecorder::new();
        recorder.begin(Pos2::ZERO, style(Color32::BLACK)).unwrap();
        assert!(matches!(
            recorder.begin(Pos2::ZERO, style(Color32::BLACK)),
            Err(CanvasError::InvalidState(_))
        ));
        // The open stroke survives the rejected begin
        assert_eq!(recorder.current_points().len(), 1);
    }

    #[test]
    fn test_restart_discards_open_path() {
        let mut recorder = StrokeRecorder::new();
        recorder.begin(Pos2::ZERO, style(Color32::BLACK)).unwrap();
        recorder.extend(Pos2::new(1.0, 1.0), style(Color32::BLACK));
        recorder.restart(Pos2::new(5.0, 5.0), style(Color32::BLACK));

        let path = recorder.end().unwrap();
        assert_eq!(path.points().len(), 1);
        assert_eq!(path.points()[0].pos(), Pos2::new(5.0, 5.0));
    }

    #[test]
    fn test_stray_extend_and_end_are_ignored() {
        let mut recorder = StrokeRecorder::new();
        assert!(recorder.extend(Pos2::new(1.0, 1.0), style(Color32::BLACK)).is_none());
        assert!(recorder.end().is_none());
        assert!(recorder.current_points().is_empty());
    }

    #[test]
    fn test_click_without_movement_yields_one_point_path() {
        let mut recorder = StrokeRecorder::new();
        recorder.begin(Pos2::new(4.0, 4.0), style(Color32::BLACK)).unwrap();
        let path = recorder.end().unwrap();
        assert_eq!(path.points().len(), 1);
    }

    #[test]
    fn test_style_is_captured_per_point() {
        let mut recorder = StrokeRecorder::new();
        recorder.begin(Pos2::ZERO, style(Color32::RED)).unwrap();
        recorder.extend(Pos2::new(1.0, 0.0), style(Color32::BLUE));
        let path = recorder.end().unwrap();

        let colors: Vec<_> = path.points().iter().map(Point::color).collect();
        assert_eq!(colors, vec![Color32::RED, Color32::BLUE]);
    }
}
