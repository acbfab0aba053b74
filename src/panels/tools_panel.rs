use egui::color_picker::{color_edit_button_srgba, Alpha};

use crate::canvas::DrawingCanvas;
use crate::command::CanvasCommand;
use crate::export::ExportFormat;
use crate::renderer::Renderer;
use crate::settings::{MAX_STROKE_WIDTH, MIN_STROKE_WIDTH};

/// Something the user asked for from the toolbar
#[derive(Debug, Clone, PartialEq)]
pub enum ToolbarAction {
    Command(CanvasCommand),
    Export(ExportFormat),
}

impl From<CanvasCommand> for ToolbarAction {
    fn from(command: CanvasCommand) -> Self {
        Self::Command(command)
    }
}

/// Toolbar with history buttons, export buttons and the drawing settings.
///
/// Nothing is applied here; the returned actions are executed by the app.
pub fn tools_panel<R: Renderer>(ctx: &egui::Context, canvas: &DrawingCanvas<R>) -> Vec<ToolbarAction> {
    let mut actions = Vec::new();

    egui::TopBottomPanel::bottom("tools_panel").show(ctx, |ui| {
        ui.horizontal_wrapped(|ui| {
            if ui.add_enabled(canvas.can_undo(), egui::Button::new("Undo")).clicked() {
                actions.push(CanvasCommand::Undo.into());
            }
            if ui.add_enabled(canvas.can_redo(), egui::Button::new("Redo")).clicked() {
                actions.push(CanvasCommand::Redo.into());
            }
            if ui.button("Clear").clicked() {
                actions.push(CanvasCommand::Clear.into());
            }
            if ui.button("Reset").clicked() {
                actions.push(CanvasCommand::Reset.into());
            }

            ui.separator();

            let settings = canvas.settings();

            let mut stroke_color = settings.stroke_color();
            ui.label("Stroke:");
            if color_edit_button_srgba(ui, &mut stroke_color, Alpha::Opaque).changed() {
                actions.push(CanvasCommand::SetStrokeColor(stroke_color).into());
            }

            let mut width = settings.stroke_width();
            let slider = egui::Slider::new(&mut width, MIN_STROKE_WIDTH..=MAX_STROKE_WIDTH)
                .integer()
                .text("Width");
            if ui.add(slider).changed() {
                actions.push(CanvasCommand::SetStrokeWidth(width).into());
            }

            let mut background = settings.background_color();
            ui.label("Canvas:");
            if color_edit_button_srgba(ui, &mut background, Alpha::Opaque)
                .on_hover_text("Changing the canvas color clears the drawing")
                .changed()
            {
                actions.push(CanvasCommand::SetBackgroundColor(background).into());
            }

            let eraser_label = if settings.eraser() { "Draw" } else { "Eraser" };
            if ui.button(eraser_label).clicked() {
                actions.push(CanvasCommand::SetEraser(!settings.eraser()).into());
            }

            ui.separator();

            for format in ExportFormat::ALL {
                if ui.button(format!("Export {}", format.extension().to_uppercase())).clicked() {
                    actions.push(ToolbarAction::Export(format));
                }
            }

            ui.separator();

            let history = canvas.history();
            ui.label(format!(
                "Strokes: {} | Redoable: {}",
                history.committed().len(),
                history.redo_buffer().len()
            ));
        });
    });

    actions
}
