use std::task::{Context, Poll};

use futures::future::{BoxFuture, FutureExt};

use crate::canvas::DrawingCanvas;
use crate::config::CanvasConfig;
use crate::error::CanvasResult;
use crate::export::ExportedImage;
use crate::input::InputHandler;
use crate::panels::{central_panel, tools_panel, ToolbarAction};

type PendingExport = BoxFuture<'static, CanvasResult<ExportedImage>>;

/// Nothing here is persisted: every session starts from the configured
/// defaults with a blank canvas.
pub struct PaintApp {
    canvas: Option<DrawingCanvas>,
    input: InputHandler,
    texture: Option<egui::TextureHandle>,
    uploaded_revision: Option<u64>,
    pending_exports: Vec<PendingExport>,
    status: Option<String>,
}

impl Default for PaintApp {
    fn default() -> Self {
        Self::with_config(&CanvasConfig::default())
    }
}

impl PaintApp {
    /// Called once before the first frame.
    pub fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        Self::default()
    }

    pub fn with_config(config: &CanvasConfig) -> Self {
        let (canvas, status) = match DrawingCanvas::new(config) {
            Ok(canvas) => (Some(canvas), None),
            Err(err) => {
                log::error!("Failed to create canvas: {err}");
                (None, Some(format!("Canvas unavailable: {err}")))
            }
        };
        Self {
            canvas,
            input: InputHandler::new(),
            texture: None,
            uploaded_revision: None,
            pending_exports: Vec::new(),
            status,
        }
    }

    fn apply(&mut self, action: ToolbarAction) {
        let Some(canvas) = &mut self.canvas else {
            return;
        };

        match action {
            ToolbarAction::Command(command) => {
                if let Err(err) = command.execute(canvas) {
                    log::error!("{command:?} failed: {err}");
                    self.status = Some(err.to_string());
                }
            }
            ToolbarAction::Export(format) => match canvas.export_async(format.extension()) {
                Ok(pending) => self.pending_exports.push(pending),
                Err(err) => {
                    log::error!("Export as {format} failed: {err}");
                    self.status = Some(err.to_string());
                }
            },
        }
    }

    /// Poll in-flight exports without blocking the frame
    fn poll_exports(&mut self, ctx: &egui::Context) {
        if self.pending_exports.is_empty() {
            return;
        }

        let waker = futures::task::noop_waker_ref();
        let mut task_cx = Context::from_waker(waker);
        let mut still_pending = Vec::new();

        for mut pending in self.pending_exports.drain(..) {
            match pending.poll_unpin(&mut task_cx) {
                Poll::Ready(Ok(image)) => {
                    self.status = Some(match save_export(&image) {
                        Ok(()) => format!("Saved {}", image.file_name()),
                        Err(err) => {
                            log::error!("Failed to save {}: {err}", image.file_name());
                            format!("Failed to save {}: {err}", image.file_name())
                        }
                    });
                }
                Poll::Ready(Err(err)) => {
                    log::error!("Export failed: {err}");
                    self.status = Some(err.to_string());
                }
                Poll::Pending => still_pending.push(pending),
            }
        }

        self.pending_exports = still_pending;
        if !self.pending_exports.is_empty() {
            ctx.request_repaint();
        }
    }
}

impl eframe::App for PaintApp {
    /// Called each time the UI needs repainting, which may be many times per second.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_exports(ctx);

        let actions = match &self.canvas {
            Some(canvas) => tools_panel(ctx, canvas),
            None => Vec::new(),
        };
        for action in actions {
            self.apply(action);
        }

        if let Some(status) = &self.status {
            egui::TopBottomPanel::top("status").show(ctx, |ui| {
                ui.label(status.as_str());
            });
        }

        if let Some(canvas) = &mut self.canvas {
            central_panel(
                ctx,
                canvas,
                &mut self.input,
                &mut self.texture,
                &mut self.uploaded_revision,
            );
        }
    }
}

/// Hand the encoded image to the platform as `canvas.<format>`
#[cfg(not(target_arch = "wasm32"))]
fn save_export(image: &ExportedImage) -> std::io::Result<()> {
    let path = std::path::PathBuf::from(image.file_name());
    std::fs::write(&path, image.bytes())?;
    log::info!("Wrote {} ({} bytes)", path.display(), image.bytes().len());
    Ok(())
}

/// Hand the encoded image to the platform as `canvas.<format>`
#[cfg(target_arch = "wasm32")]
fn save_export(image: &ExportedImage) -> std::io::Result<()> {
    use eframe::wasm_bindgen::JsCast as _;

    let unavailable = |what: &str| std::io::Error::other(what.to_owned());

    let document = web_sys::window()
        .and_then(|window| window.document())
        .ok_or_else(|| unavailable("no document"))?;
    let link = document
        .create_element("a")
        .map_err(|_| unavailable("cannot create link"))?
        .dyn_into::<web_sys::HtmlAnchorElement>()
        .map_err(|_| unavailable("not an anchor element"))?;

    link.set_href(&image.to_data_uri());
    link.set_download(&image.file_name());
    link.click();
    Ok(())
}
