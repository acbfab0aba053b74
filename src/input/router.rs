use egui::{Key, Modifiers, PointerButton};

use crate::canvas::DrawingCanvas;
use crate::command::CanvasCommand;
use crate::error::CanvasResult;
use crate::renderer::Renderer;

use super::InputEvent;

/// Routes an input event to the canvas.
///
/// Primary-button presses on the canvas start a stroke, drags extend it, and
/// release or leaving the canvas ends it. Undo/redo shortcuts are applied as
/// commands.
pub fn route_event<R: Renderer>(event: &InputEvent, canvas: &mut DrawingCanvas<R>) -> CanvasResult<()> {
    match event {
        InputEvent::PointerDown {
            location,
            button: PointerButton::Primary,
        } if location.is_in_canvas => {
            canvas.begin(location.position.x, location.position.y);
        }
        InputEvent::PointerMove {
            location,
            held_buttons,
        } if held_buttons.contains(&PointerButton::Primary) => {
            canvas.extend(location.position.x, location.position.y);
        }
        InputEvent::PointerUp {
            button: PointerButton::Primary,
            ..
        } => {
            canvas.end();
        }
        InputEvent::PointerLeave { .. } => {
            canvas.leave();
        }
        InputEvent::KeyDown { key, modifiers } => {
            if let Some(command) = shortcut(*key, *modifiers) {
                log::debug!("Shortcut {:?}", command);
                command.execute(canvas)?;
            }
        }
        _ => {}
    }
    Ok(())
}

fn shortcut(key: Key, modifiers: Modifiers) -> Option<CanvasCommand> {
    if !modifiers.command {
        return None;
    }
    match key {
        Key::Z if modifiers.shift => Some(CanvasCommand::Redo),
        Key::Z => Some(CanvasCommand::Undo),
        Key::Y => Some(CanvasCommand::Redo),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CanvasConfig;
    use crate::input::InputLocation;
    use egui::pos2;

    fn at(x: f32, y: f32) -> InputLocation {
        InputLocation {
            position: pos2(x, y),
            is_in_canvas: true,
        }
    }

    fn canvas() -> DrawingCanvas {
        DrawingCanvas::new(&CanvasConfig::default()).unwrap()
    }

    fn drag(canvas: &mut DrawingCanvas, from: (f32, f32), to: (f32, f32)) {
        let events = [
            InputEvent::PointerDown {
                location: at(from.0, from.1),
                button: PointerButton::Primary,
            },
            InputEvent::PointerMove {
                location: at(to.0, to.1),
                held_buttons: vec![PointerButton::Primary],
            },
            InputEvent::PointerUp {
                location: at(to.0, to.1),
                button: PointerButton::Primary,
            },
        ];
        for event in &events {
            route_event(event, canvas).unwrap();
        }
    }

    #[test]
    fn test_drag_commits_stroke() {
        let mut canvas = canvas();
        drag(&mut canvas, (10.0, 10.0), (20.0, 20.0));

        assert_eq!(canvas.committed().len(), 1);
        let points: Vec<_> = canvas.committed()[0].points().iter().map(|p| p.pos()).collect();
        assert_eq!(points, vec![pos2(10.0, 10.0), pos2(20.0, 20.0)]);
    }

    #[test]
    fn test_hover_without_button_does_not_draw() {
        let mut canvas = canvas();
        route_event(
            &InputEvent::PointerMove {
                location: at(5.0, 5.0),
                held_buttons: Vec::new(),
            },
            &mut canvas,
        )
        .unwrap();
        assert!(!canvas.is_drawing());
    }

    #[test]
    fn test_press_outside_canvas_is_ignored() {
        let mut canvas = canvas();
        let location = InputLocation {
            position: pos2(-5.0, 3.0),
            is_in_canvas: false,
        };
        route_event(
            &InputEvent::PointerDown {
                location,
                button: PointerButton::Primary,
            },
            &mut canvas,
        )
        .unwrap();
        assert!(!canvas.is_drawing());
    }

    #[test]
    fn test_leave_ends_stroke() {
        let mut canvas = canvas();
        route_event(
            &InputEvent::PointerDown {
                location: at(1.0, 1.0),
                button: PointerButton::Primary,
            },
            &mut canvas,
        )
        .unwrap();
        route_event(
            &InputEvent::PointerLeave {
                last_known_location: at(0.0, 1.0),
            },
            &mut canvas,
        )
        .unwrap();

        assert!(!canvas.is_drawing());
        assert_eq!(canvas.committed().len(), 1);
    }

    #[test]
    fn test_undo_redo_shortcuts() {
        let mut canvas = canvas();
        drag(&mut canvas, (1.0, 1.0), (2.0, 2.0));

        let key = |key, modifiers| InputEvent::KeyDown { key, modifiers };
        route_event(&key(Key::Z, Modifiers::COMMAND), &mut canvas).unwrap();
        assert!(canvas.committed().is_empty());

        route_event(&key(Key::Z, Modifiers::COMMAND | Modifiers::SHIFT), &mut canvas).unwrap();
        assert_eq!(canvas.committed().len(), 1);

        route_event(&key(Key::Z, Modifiers::NONE), &mut canvas).unwrap();
        assert_eq!(canvas.committed().len(), 1);
    }
}
