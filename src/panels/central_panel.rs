use crate::canvas::DrawingCanvas;
use crate::command::CanvasCommand;
use crate::input::{route_event, InputHandler};

/// Shows the canvas surface, keeps it sized to the panel and feeds it input.
///
/// `texture` is re-uploaded only when the canvas revision moved past
/// `uploaded_revision`.
pub fn central_panel(
    ctx: &egui::Context,
    canvas: &mut DrawingCanvas,
    input: &mut InputHandler,
    texture: &mut Option<egui::TextureHandle>,
    uploaded_revision: &mut Option<u64>,
) {
    egui::CentralPanel::default()
        .frame(egui::Frame::none())
        .show(ctx, |ui| {
            let available = ui.available_size();
            let (width, height) = (available.x.max(1.0) as u32, available.y.max(1.0) as u32);
            if canvas.size() != (width, height) {
                let resize = CanvasCommand::Resize { width, height };
                if let Err(err) = resize.execute(canvas) {
                    log::error!("Failed to resize canvas to {width}x{height}: {err}");
                }
            }

            let (response, painter) = ui.allocate_painter(available, egui::Sense::drag());
            let rect = response.rect;
            input.set_canvas_rect(rect);

            for event in input.process_input(ctx) {
                if let Err(err) = route_event(&event, canvas) {
                    log::error!("Failed to handle {event:?}: {err}");
                }
            }

            if *uploaded_revision != Some(canvas.revision()) {
                let image = canvas.renderer().to_color_image();
                match texture {
                    Some(handle) => handle.set(image, egui::TextureOptions::NEAREST),
                    None => {
                        *texture = Some(ctx.load_texture("canvas", image, egui::TextureOptions::NEAREST));
                    }
                }
                *uploaded_revision = Some(canvas.revision());
            }

            if let Some(handle) = texture {
                let (w, h) = canvas.size();
                let image_rect = egui::Rect::from_min_size(rect.min, egui::vec2(w as f32, h as f32));
                let uv = egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0));
                painter.image(handle.id(), image_rect, uv, egui::Color32::WHITE);
            }

            if canvas.is_drawing() {
                ui.ctx().set_cursor_icon(egui::CursorIcon::Crosshair);
            }
        });
}
