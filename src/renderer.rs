use egui::Color32;
use image::{Rgba, RgbaImage};
use tiny_skia as sk;

use crate::error::RenderError;
use crate::stroke::{Path, PathRef, Point};

/// A pixel surface that committed paths can be replayed onto
pub trait Renderer {
    /// Surface size in pixels
    fn size(&self) -> (u32, u32);

    /// Reallocate the surface at a new size and replay `paths` onto it.
    ///
    /// On failure the current surface is kept as it was.
    fn resize(
        &mut self,
        width: u32,
        height: u32,
        paths: &[PathRef],
        background: Color32,
    ) -> Result<(), RenderError>;

    /// Clear to `background` and redraw every path in order
    fn replay(&mut self, paths: &[PathRef], background: Color32) -> Result<(), RenderError>;

    /// Draw one segment of the stroke in progress on top of the current pixels
    fn draw_segment(&mut self, from: &Point, to: &Point) -> Result<(), RenderError>;

    /// Draw a single point as a filled circle of diameter `point.size()`
    fn draw_dot(&mut self, point: &Point) -> Result<(), RenderError>;

    /// Point-in-time copy of the surface as straight (non-premultiplied) RGBA
    fn snapshot(&self) -> RgbaImage;
}

/// CPU rasterizer backed by a `tiny_skia` pixmap
pub struct RasterRenderer {
    pixmap: sk::Pixmap,
    anti_alias: bool,
}

impl std::fmt::Debug for RasterRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RasterRenderer")
            .field("width", &self.pixmap.width())
            .field("height", &self.pixmap.height())
            .field("anti_alias", &self.anti_alias)
            .finish()
    }
}

impl RasterRenderer {
    /// Creates a transparent surface of the given size
    pub fn new(width: u32, height: u32) -> Result<Self, RenderError> {
        Ok(Self {
            pixmap: allocate(width, height)?,
            anti_alias: true,
        })
    }

    /// Disable anti-aliasing, so strokes cover whole pixels only
    pub fn with_anti_alias(mut self, anti_alias: bool) -> Self {
        self.anti_alias = anti_alias;
        self
    }

    /// Straight-alpha color of a single pixel
    pub fn pixel(&self, x: u32, y: u32) -> Option<Color32> {
        self.pixmap.pixel(x, y).map(|p| {
            let c = p.demultiply();
            Color32::from_rgba_unmultiplied(c.red(), c.green(), c.blue(), c.alpha())
        })
    }

    /// Surface contents as an egui image, for uploading as a texture
    pub fn to_color_image(&self) -> egui::ColorImage {
        let snapshot = self.snapshot();
        let size = [snapshot.width() as usize, snapshot.height() as usize];
        egui::ColorImage::from_rgba_unmultiplied(size, snapshot.as_raw())
    }
}

impl Renderer for RasterRenderer {
    fn size(&self) -> (u32, u32) {
        (self.pixmap.width(), self.pixmap.height())
    }

    fn resize(
        &mut self,
        width: u32,
        height: u32,
        paths: &[PathRef],
        background: Color32,
    ) -> Result<(), RenderError> {
        self.pixmap = render(width, height, self.anti_alias, paths, background)?;
        Ok(())
    }

    fn replay(&mut self, paths: &[PathRef], background: Color32) -> Result<(), RenderError> {
        let (width, height) = self.size();
        self.pixmap = render(width, height, self.anti_alias, paths, background)?;
        Ok(())
    }

    fn draw_segment(&mut self, from: &Point, to: &Point) -> Result<(), RenderError> {
        stroke_segment(&mut self.pixmap, self.anti_alias, from, to);
        Ok(())
    }

    fn draw_dot(&mut self, point: &Point) -> Result<(), RenderError> {
        fill_dot(&mut self.pixmap, self.anti_alias, point);
        Ok(())
    }

    fn snapshot(&self) -> RgbaImage {
        let width = self.pixmap.width();
        let pixels = self.pixmap.pixels();
        RgbaImage::from_fn(width, self.pixmap.height(), |x, y| {
            let c = pixels[(y * width + x) as usize].demultiply();
            Rgba([c.red(), c.green(), c.blue(), c.alpha()])
        })
    }
}

fn allocate(width: u32, height: u32) -> Result<sk::Pixmap, RenderError> {
    sk::Pixmap::new(width, height).ok_or(RenderError::SurfaceUnavailable { width, height })
}

// Draws into a fresh pixmap so a failure leaves the visible surface as it was
fn render(
    width: u32,
    height: u32,
    anti_alias: bool,
    paths: &[PathRef],
    background: Color32,
) -> Result<sk::Pixmap, RenderError> {
    let mut pixmap = allocate(width, height)?;
    let [r, g, b, a] = background.to_srgba_unmultiplied();
    pixmap.fill(sk::Color::from_rgba8(r, g, b, a));

    for path in paths {
        draw_path(&mut pixmap, anti_alias, path);
    }

    log::trace!("Replayed {} path(s) onto {}x{} surface", paths.len(), width, height);
    Ok(pixmap)
}

fn paint(color: Color32, anti_alias: bool) -> sk::Paint<'static> {
    let [r, g, b, a] = color.to_srgba_unmultiplied();
    let mut paint = sk::Paint::default();
    paint.set_color_rgba8(r, g, b, a);
    paint.anti_alias = anti_alias;
    paint
}

// Same sequence as live drawing: a dot at the first point, then each segment
fn draw_path(pixmap: &mut sk::Pixmap, anti_alias: bool, path: &Path) {
    if let Some(first) = path.points().first() {
        fill_dot(pixmap, anti_alias, first);
    }
    for (from, to) in path.segments() {
        stroke_segment(pixmap, anti_alias, from, to);
    }
}

// Geometry tiny-skia cannot build (e.g. bounds overflowing f32) draws nothing
fn stroke_segment(pixmap: &mut sk::Pixmap, anti_alias: bool, from: &Point, to: &Point) {
    // A zero-length line rasterizes to nothing, so it becomes a dot
    if from.pos() == to.pos() {
        fill_dot(pixmap, anti_alias, to);
        return;
    }

    let mut builder = sk::PathBuilder::new();
    builder.move_to(from.x(), from.y());
    builder.line_to(to.x(), to.y());
    let Some(line) = builder.finish() else {
        log::warn!("Skipping undrawable segment {:?} -> {:?}", from.pos(), to.pos());
        return;
    };

    let stroke = sk::Stroke {
        width: to.size(),
        line_cap: sk::LineCap::Round,
        line_join: sk::LineJoin::Round,
        ..sk::Stroke::default()
    };
    pixmap.stroke_path(
        &line,
        &paint(to.color(), anti_alias),
        &stroke,
        sk::Transform::identity(),
        None,
    );
}

fn fill_dot(pixmap: &mut sk::Pixmap, anti_alias: bool, point: &Point) {
    let Some(circle) = sk::PathBuilder::from_circle(point.x(), point.y(), point.size() / 2.0) else {
        log::warn!("Skipping undrawable dot at {:?}", point.pos());
        return;
    };
    pixmap.fill_path(
        &circle,
        &paint(point.color(), anti_alias),
        sk::FillRule::Winding,
        sk::Transform::identity(),
        None,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::PointStyle;
    use egui::Pos2;

    const BG: Color32 = Color32::WHITE;

    fn point(x: f32, y: f32, color: Color32, size: f32) -> Point {
        Point::new(Pos2::new(x, y), PointStyle::new(color, size))
    }

    #[test]
    fn test_zero_size_surface_is_unavailable() {
        assert!(matches!(
            RasterRenderer::new(0, 10),
            Err(RenderError::SurfaceUnavailable { width: 0, height: 10 })
        ));
    }

    #[test]
    fn test_replay_fills_background() {
        let mut renderer = RasterRenderer::new(8, 8).unwrap();
        renderer.replay(&[], Color32::from_rgb(10, 20, 30)).unwrap();
        assert_eq!(renderer.pixel(0, 0), Some(Color32::from_rgb(10, 20, 30)));
        assert_eq!(renderer.pixel(7, 7), Some(Color32::from_rgb(10, 20, 30)));
    }

    #[test]
    fn test_single_point_draws_dot_of_stroke_width() {
        let mut renderer = RasterRenderer::new(40, 40).unwrap().with_anti_alias(false);
        let dot = Path::new_ref(vec![point(20.0, 20.0, Color32::BLACK, 10.0)]).unwrap();
        renderer.replay(&[dot], BG).unwrap();

        assert_eq!(renderer.pixel(20, 20), Some(Color32::BLACK));
        assert_eq!(renderer.pixel(17, 20), Some(Color32::BLACK));
        assert_eq!(renderer.pixel(20, 23), Some(Color32::BLACK));
        // Outside the 5px radius
        assert_eq!(renderer.pixel(27, 20), Some(BG));
        assert_eq!(renderer.pixel(20, 12), Some(BG));
    }

    #[test]
    fn test_segment_uses_later_point_style() {
        let mut renderer = RasterRenderer::new(40, 20).unwrap().with_anti_alias(false);
        let path = Path::new_ref(vec![
            point(5.0, 10.0, Color32::RED, 4.0),
            point(35.0, 10.0, Color32::BLUE, 4.0),
        ])
        .unwrap();
        renderer.replay(&[path], BG).unwrap();

        assert_eq!(renderer.pixel(20, 10), Some(Color32::BLUE));
    }

    #[test]
    fn test_repeated_point_in_path_still_visible() {
        let mut renderer = RasterRenderer::new(20, 20).unwrap().with_anti_alias(false);
        let path = Path::new_ref(vec![
            point(10.0, 10.0, Color32::BLACK, 6.0),
            point(10.0, 10.0, Color32::BLACK, 6.0),
        ])
        .unwrap();
        renderer.replay(&[path], BG).unwrap();
        assert_eq!(renderer.pixel(10, 10), Some(Color32::BLACK));
    }

    #[test]
    fn test_replay_is_idempotent() {
        let mut renderer = RasterRenderer::new(64, 64).unwrap();
        let paths = vec![
            Path::new_ref(vec![
                point(3.0, 4.0, Color32::RED, 3.0),
                point(40.0, 50.0, Color32::GREEN, 7.0),
                point(60.0, 10.0, Color32::BLUE, 2.0),
            ])
            .unwrap(),
            Path::new_ref(vec![point(30.0, 30.0, Color32::BLACK, 9.0)]).unwrap(),
        ];

        renderer.replay(&paths, BG).unwrap();
        let first = renderer.snapshot();
        renderer.replay(&paths, BG).unwrap();
        assert_eq!(first, renderer.snapshot());
    }

    #[test]
    fn test_incremental_drawing_matches_replay() {
        let a = point(5.0, 5.0, Color32::BLACK, 5.0);
        let b = point(25.0, 15.0, Color32::RED, 7.0);
        let c = point(12.0, 28.0, Color32::BLUE, 3.0);

        let mut incremental = RasterRenderer::new(32, 32).unwrap();
        incremental.replay(&[], BG).unwrap();
        incremental.draw_dot(&a).unwrap();
        incremental.draw_segment(&a, &b).unwrap();
        incremental.draw_segment(&b, &c).unwrap();

        let mut replayed = RasterRenderer::new(32, 32).unwrap();
        replayed.replay(&[Path::new_ref(vec![a, b, c]).unwrap()], BG).unwrap();

        assert_eq!(incremental.snapshot(), replayed.snapshot());
    }

    #[test]
    fn test_resize_replays_onto_new_surface() {
        let mut renderer = RasterRenderer::new(10, 10).unwrap().with_anti_alias(false);
        let dot = Path::new_ref(vec![point(20.0, 5.0, Color32::BLACK, 4.0)]).unwrap();
        renderer.resize(30, 12, &[dot], BG).unwrap();

        assert_eq!(renderer.snapshot().dimensions(), (30, 12));
        assert_eq!(renderer.pixel(20, 5), Some(Color32::BLACK));
        assert_eq!(renderer.pixel(2, 2), Some(BG));
    }

    #[test]
    fn test_failed_resize_keeps_surface() {
        let mut renderer = RasterRenderer::new(10, 10).unwrap();
        renderer.replay(&[], Color32::RED).unwrap();

        assert!(renderer.resize(0, 0, &[], BG).is_err());
        assert_eq!(renderer.size(), (10, 10));
        assert_eq!(renderer.pixel(3, 3), Some(Color32::RED));
    }

    #[test]
    fn test_overflowing_geometry_is_skipped() {
        let mut renderer = RasterRenderer::new(20, 20).unwrap().with_anti_alias(false);
        let huge = Path::new_ref(vec![
            point(-2e38, 10.0, Color32::RED, 4.0),
            point(2e38, 10.0, Color32::RED, 4.0),
        ])
        .unwrap();
        let dot = Path::new_ref(vec![point(10.0, 10.0, Color32::BLACK, 6.0)]).unwrap();

        renderer.replay(&[huge.clone(), dot], BG).unwrap();
        assert_eq!(renderer.pixel(10, 10), Some(Color32::BLACK));
        assert_eq!(renderer.pixel(2, 10), Some(BG));

        let from = huge.points()[0];
        let to = huge.points()[1];
        assert!(renderer.draw_segment(&from, &to).is_ok());
    }
}
