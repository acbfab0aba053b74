use std::collections::VecDeque;

use egui::{Color32, Pos2};
use futures::future::BoxFuture;

use crate::color::{parse_color, to_hex};
use crate::command::History;
use crate::config::CanvasConfig;
use crate::error::{CanvasResult, RenderError};
use crate::export::{ExportFormat, ExportedImage, Exporter};
use crate::renderer::{RasterRenderer, Renderer};
use crate::settings::CanvasSettings;
use crate::stroke::{PathRef, Point};
use crate::tools::StrokeRecorder;

/// A freehand drawing surface with linear undo/redo.
///
/// All operations are expected to run on a single UI thread, one at a time.
/// Committed paths are the source of truth; the pixel surface is rebuilt from
/// them by a full replay whenever history changes, and only the stroke in
/// progress is drawn incrementally.
#[derive(Debug)]
pub struct DrawingCanvas<R = RasterRenderer> {
    settings: CanvasSettings,
    default_background: Color32,
    recorder: StrokeRecorder,
    history: History,
    renderer: R,
    exporter: Exporter,
    /// Bumped whenever the surface pixels change
    revision: u64,
}

impl DrawingCanvas<RasterRenderer> {
    /// Creates a canvas backed by the CPU rasterizer
    pub fn new(config: &CanvasConfig) -> CanvasResult<Self> {
        let renderer = RasterRenderer::new(config.width, config.height)?;
        Self::with_renderer(renderer, config)
    }
}

impl<R: Renderer> DrawingCanvas<R> {
    /// Creates a canvas on top of an existing surface and paints the background
    pub fn with_renderer(renderer: R, config: &CanvasConfig) -> CanvasResult<Self> {
        let settings = config.settings.sanitized();
        let mut canvas = Self {
            settings,
            default_background: settings.background_color(),
            recorder: StrokeRecorder::new(),
            history: History::new(),
            renderer,
            exporter: Exporter::new(config.jpeg_quality),
            revision: 0,
        };
        canvas.replay_committed()?;
        Ok(canvas)
    }

    // --- Stroke recording ---

    /// Pointer pressed at canvas-local `(x, y)`.
    ///
    /// A begin while a stroke is already open is treated as a missed pointer-up:
    /// the open stroke is discarded and a new one starts here.
    pub fn begin(&mut self, x: f32, y: f32) {
        let Some(pos) = finite_pos(x, y) else {
            log::warn!("Ignoring pointer down at non-finite position ({x}, {y})");
            return;
        };

        let style = self.settings.point_style();
        match self.recorder.begin(pos, style) {
            Ok(first) => {
                log::debug!("Stroke started at {pos:?}");
                self.draw_incremental(|renderer| renderer.draw_dot(&first));
            }
            Err(err) => {
                log::warn!("{err}; restarting stroke at {pos:?}");
                self.recorder.restart(pos, style);
                // Wipes the abandoned stroke's pixels and repaints the new first point
                if let Err(err) = self.replay_committed() {
                    log::error!("Failed to redraw after restarting stroke: {err}");
                }
            }
        }
    }

    /// Pointer moved to canvas-local `(x, y)`; ignored when no stroke is open
    pub fn extend(&mut self, x: f32, y: f32) {
        let Some(pos) = finite_pos(x, y) else {
            log::warn!("Ignoring pointer move to non-finite position ({x}, {y})");
            return;
        };

        if let Some((from, to)) = self.recorder.extend(pos, self.settings.point_style()) {
            self.draw_incremental(|renderer| renderer.draw_segment(&from, &to));
        }
    }

    /// Pointer released: commits the open stroke, if any.
    ///
    /// Returns true if a path was committed.
    pub fn end(&mut self) -> bool {
        match self.recorder.end() {
            Some(path) => {
                log::debug!("Committing stroke with {} point(s)", path.points().len());
                self.history.commit(path);
                true
            }
            None => false,
        }
    }

    /// Pointer left the canvas; behaves like [`Self::end`] so no stroke stays open
    pub fn leave(&mut self) -> bool {
        self.end()
    }

    pub fn is_drawing(&self) -> bool {
        self.recorder.is_drawing()
    }

    // --- History ---

    /// Remove the newest stroke. Returns `Ok(false)` when there is nothing to undo.
    pub fn undo(&mut self) -> CanvasResult<bool> {
        let background = self.settings.background_color();
        let renderer = &mut self.renderer;
        let undone = self.history.undo(|paths| renderer.replay(paths, background))?;
        if undone {
            self.after_replay();
        }
        Ok(undone)
    }

    /// Restore the most recently undone stroke. Returns `Ok(false)` when there is nothing to redo.
    pub fn redo(&mut self) -> CanvasResult<bool> {
        let background = self.settings.background_color();
        let renderer = &mut self.renderer;
        let redone = self.history.redo(|paths| renderer.replay(paths, background))?;
        if redone {
            self.after_replay();
        }
        Ok(redone)
    }

    /// Drop all strokes, leaving a blank canvas in the current background color
    pub fn clear(&mut self) -> CanvasResult<()> {
        self.clear_with_background(self.settings.background_color())?;
        log::info!("Canvas cleared");
        Ok(())
    }

    /// Drop all strokes and restore the default background color
    pub fn reset(&mut self) -> CanvasResult<()> {
        self.clear_with_background(self.default_background)?;
        log::info!("Canvas reset");
        Ok(())
    }

    pub fn committed(&self) -> &[PathRef] {
        self.history.committed()
    }

    pub fn redo_buffer(&self) -> &VecDeque<PathRef> {
        self.history.redo_buffer()
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    // --- Settings ---

    pub fn settings(&self) -> &CanvasSettings {
        &self.settings
    }

    /// Set the color for points sampled from now on, from a hex or named color
    pub fn set_stroke_color(&mut self, color: &str) -> CanvasResult<()> {
        let color = parse_color(color).inspect_err(|err| log::warn!("{err}"))?;
        self.set_stroke_color32(color);
        Ok(())
    }

    pub fn set_stroke_color32(&mut self, color: Color32) {
        self.settings.set_stroke_color(color);
    }

    /// Set the stroke width, clamped to `[1, 50]`; non-finite input is ignored
    pub fn set_stroke_width(&mut self, width: f32) -> bool {
        let applied = self.settings.set_stroke_width(width);
        if !applied {
            log::warn!("Ignoring non-finite stroke width {width}");
        }
        applied
    }

    /// Change the background color. This clears the drawing, history included.
    pub fn set_background_color(&mut self, color: &str) -> CanvasResult<()> {
        let color = parse_color(color).inspect_err(|err| log::warn!("{err}"))?;
        self.set_background_color32(color)
    }

    pub fn set_background_color32(&mut self, color: Color32) -> CanvasResult<()> {
        self.clear_with_background(color)?;
        log::info!("Background changed to {}; history cleared", to_hex(color));
        Ok(())
    }

    pub fn set_eraser(&mut self, eraser: bool) {
        self.settings.set_eraser(eraser);
    }

    // --- Surface ---

    pub fn size(&self) -> (u32, u32) {
        self.renderer.size()
    }

    /// Reallocate the surface and replay every committed stroke onto it.
    ///
    /// On failure the canvas keeps its previous size and pixels.
    pub fn resize(&mut self, width: u32, height: u32) -> CanvasResult<()> {
        if self.renderer.size() == (width, height) {
            return Ok(());
        }
        let background = self.settings.background_color();
        self.renderer
            .resize(width, height, self.history.committed(), background)?;
        self.after_replay();
        log::debug!("Canvas resized to {width}x{height}");
        Ok(())
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Counter that changes whenever the surface pixels change
    pub fn revision(&self) -> u64 {
        self.revision
    }

    // --- Export ---

    /// Encode the current surface; `format` must be `"png"` or `"jpeg"`
    pub fn export(&self, format: &str) -> CanvasResult<ExportedImage> {
        self.export_as(format.parse()?)
    }

    pub fn export_as(&self, format: ExportFormat) -> CanvasResult<ExportedImage> {
        self.exporter.encode(&self.renderer.snapshot(), format)
    }

    /// Snapshot the surface now and encode it in the background.
    ///
    /// Strokes drawn while the future is pending do not appear in the result.
    pub fn export_async(
        &self,
        format: &str,
    ) -> CanvasResult<BoxFuture<'static, CanvasResult<ExportedImage>>> {
        let format: ExportFormat = format.parse()?;
        Ok(self.exporter.encode_async(self.renderer.snapshot(), format))
    }

    // --- Internals ---

    fn clear_with_background(&mut self, background: Color32) -> CanvasResult<()> {
        let renderer = &mut self.renderer;
        self.history.clear(|paths| renderer.replay(paths, background))?;
        self.settings.set_background_color(background);
        self.after_replay();
        Ok(())
    }

    fn replay_committed(&mut self) -> CanvasResult<()> {
        self.renderer
            .replay(self.history.committed(), self.settings.background_color())?;
        self.after_replay();
        Ok(())
    }

    /// A full replay wipes the live stroke; paint it back on top
    fn after_replay(&mut self) {
        self.revision += 1;

        let points: Vec<Point> = self.recorder.current_points().to_vec();
        if let Some(first) = points.first() {
            self.draw_incremental(|renderer| renderer.draw_dot(first));
        }
        for pair in points.windows(2) {
            self.draw_incremental(|renderer| renderer.draw_segment(&pair[0], &pair[1]));
        }
    }

    // Incremental drawing is a fast path only; failures are logged, not surfaced
    fn draw_incremental<F>(&mut self, draw: F)
    where
        F: FnOnce(&mut R) -> Result<(), RenderError>,
    {
        match draw(&mut self.renderer) {
            Ok(()) => self.revision += 1,
            Err(err) => log::error!("Incremental draw failed: {err}"),
        }
    }
}

fn finite_pos(x: f32, y: f32) -> Option<Pos2> {
    (x.is_finite() && y.is_finite()).then(|| Pos2::new(x, y))
}
