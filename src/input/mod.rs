use egui::{Context, Key, Modifiers, PointerButton, Pos2, Rect};

mod router;
pub use router::route_event;

/// Where an input event happened, relative to the drawing surface
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InputLocation {
    /// Position in canvas-local pixel coordinates
    pub position: Pos2,
    /// Whether the position lies on the canvas
    pub is_in_canvas: bool,
}

/// Pointer and keyboard events, already translated to canvas coordinates
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// Mouse button was pressed
    PointerDown {
        location: InputLocation,
        button: PointerButton,
    },
    /// Mouse button was released
    PointerUp {
        location: InputLocation,
        button: PointerButton,
    },
    /// Mouse moved (with or without buttons pressed)
    PointerMove {
        location: InputLocation,
        /// Buttons that are currently held down
        held_buttons: Vec<PointerButton>,
    },
    /// Pointer moved onto the canvas
    PointerEnter { location: InputLocation },
    /// Pointer moved off the canvas (or out of the window)
    PointerLeave { last_known_location: InputLocation },
    /// Key was pressed
    KeyDown { key: Key, modifiers: Modifiers },
}

const TRACKED_BUTTONS: [PointerButton; 3] = [
    PointerButton::Primary,
    PointerButton::Secondary,
    PointerButton::Middle,
];

/// Converts raw egui input into [`InputEvent`]s for the canvas
#[derive(Debug, Default)]
pub struct InputHandler {
    last_pointer_pos: Option<Pos2>,
    was_in_canvas: bool,
    canvas_rect: Option<Rect>,
}

impl InputHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Update the screen rectangle the canvas texture is shown in
    pub fn set_canvas_rect(&mut self, rect: Rect) {
        self.canvas_rect = Some(rect);
    }

    /// Translate a screen position into canvas coordinates
    pub fn make_location(&self, screen_pos: Pos2) -> InputLocation {
        match self.canvas_rect {
            Some(rect) => InputLocation {
                position: (screen_pos - rect.min).to_pos2(),
                is_in_canvas: rect.contains(screen_pos),
            },
            None => InputLocation {
                position: screen_pos,
                is_in_canvas: false,
            },
        }
    }

    /// Process raw egui input and generate our InputEvents
    pub fn process_input(&mut self, ctx: &Context) -> Vec<InputEvent> {
        let mut events = Vec::new();

        ctx.input(|input| {
            let hover = input.pointer.hover_pos();

            if let Some(pos) = hover {
                let location = self.make_location(pos);

                if location.is_in_canvas && !self.was_in_canvas {
                    events.push(InputEvent::PointerEnter { location });
                }

                // Moves are reported before the leave so the final sample is recorded
                if Some(pos) != self.last_pointer_pos {
                    let held_buttons = TRACKED_BUTTONS
                        .into_iter()
                        .filter(|button| input.pointer.button_down(*button))
                        .collect();
                    events.push(InputEvent::PointerMove {
                        location,
                        held_buttons,
                    });
                }

                if !location.is_in_canvas && self.was_in_canvas {
                    events.push(InputEvent::PointerLeave {
                        last_known_location: location,
                    });
                }

                self.was_in_canvas = location.is_in_canvas;
                self.last_pointer_pos = Some(pos);
            } else if let Some(last) = self.last_pointer_pos.take() {
                // Pointer left the window
                if self.was_in_canvas {
                    events.push(InputEvent::PointerLeave {
                        last_known_location: self.make_location(last),
                    });
                }
                self.was_in_canvas = false;
            }

            if let Some(pos) = hover {
                for button in TRACKED_BUTTONS {
                    if input.pointer.button_pressed(button) {
                        events.push(InputEvent::PointerDown {
                            location: self.make_location(pos),
                            button,
                        });
                    }
                    if input.pointer.button_released(button) {
                        events.push(InputEvent::PointerUp {
                            location: self.make_location(pos),
                            button,
                        });
                    }
                }
            }

            for event in &input.events {
                if let egui::Event::Key {
                    key,
                    pressed: true,
                    repeat: false,
                    modifiers,
                    ..
                } = event
                {
                    events.push(InputEvent::KeyDown {
                        key: *key,
                        modifiers: *modifiers,
                    });
                }
            }
        });

        events
    }
}
