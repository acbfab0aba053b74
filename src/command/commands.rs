use egui::Color32;
use serde::{Deserialize, Serialize};

use crate::canvas::DrawingCanvas;
use crate::error::CanvasResult;
use crate::renderer::Renderer;

/// Toolbar actions that can be queued by the UI and applied to a canvas
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CanvasCommand {
    /// Remove the newest stroke
    Undo,

    /// Restore the most recently undone stroke
    Redo,

    /// Drop all strokes, keeping the background color
    Clear,

    /// Drop all strokes and restore the default background color
    Reset,

    /// Change the color of points drawn from now on
    SetStrokeColor(Color32),

    /// Change the width of points drawn from now on
    SetStrokeWidth(f32),

    /// Change the background color (clears history)
    SetBackgroundColor(Color32),

    /// Switch between drawing and erasing
    SetEraser(bool),

    /// Resize the pixel surface, replaying committed strokes
    Resize { width: u32, height: u32 },
}

impl CanvasCommand {
    /// Apply this command to `canvas`
    pub fn execute<R: Renderer>(&self, canvas: &mut DrawingCanvas<R>) -> CanvasResult<()> {
        match self {
            Self::Undo => {
                canvas.undo()?;
            }
            Self::Redo => {
                canvas.redo()?;
            }
            Self::Clear => canvas.clear()?,
            Self::Reset => canvas.reset()?,
            Self::SetStrokeColor(color) => canvas.set_stroke_color32(*color),
            Self::SetStrokeWidth(width) => {
                canvas.set_stroke_width(*width);
            }
            Self::SetBackgroundColor(color) => canvas.set_background_color32(*color)?,
            Self::SetEraser(eraser) => canvas.set_eraser(*eraser),
            Self::Resize { width, height } => canvas.resize(*width, *height)?,
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CanvasConfig;

    #[test]
    fn test_commands_drive_canvas() {
        let mut canvas = DrawingCanvas::new(&CanvasConfig::default()).unwrap();
        canvas.begin(10.0, 10.0);
        canvas.end();

        CanvasCommand::Undo.execute(&mut canvas).unwrap();
        assert!(canvas.committed().is_empty());
        CanvasCommand::Redo.execute(&mut canvas).unwrap();
        assert_eq!(canvas.committed().len(), 1);

        CanvasCommand::SetStrokeWidth(80.0).execute(&mut canvas).unwrap();
        assert_eq!(canvas.settings().stroke_width(), 50.0);

        CanvasCommand::SetEraser(true).execute(&mut canvas).unwrap();
        assert!(canvas.settings().eraser());

        CanvasCommand::Clear.execute(&mut canvas).unwrap();
        assert!(!canvas.can_undo());
    }

    #[test]
    fn test_undo_on_empty_canvas_is_not_an_error() {
        let mut canvas = DrawingCanvas::new(&CanvasConfig::default()).unwrap();
        assert!(CanvasCommand::Undo.execute(&mut canvas).is_ok());
        assert!(CanvasCommand::Redo.execute(&mut canvas).is_ok());
    }
}
