//! Window and device event handling for GameState.

use winit::event::{DeviceEvent, WindowEvent};

use crate::state::GameState;

impl GameState {
    /// Handle a window event. Returns true if the app should exit.
    pub(crate) fn handle_window_event(&mut self, event: WindowEvent) -> bool {
        match event {
            WindowEvent::CloseRequested => {
                self.running = false;
                true
            }
            WindowEvent::Focused(false) => {
                // Keys released while unfocused never reach us.
                self.input.release_all();
                false
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if let winit::keyboard::PhysicalKey::Code(key) = event.physical_key {
                    if !event.repeat {
                        self.input.process_keyboard(key, event.state);
                    }
                }
                false
            }
            WindowEvent::MouseInput { state, button, .. } => {
                self.input.process_mouse_button(button, state);
                false
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.input.process_cursor_position((position.x, position.y));
                false
            }
            WindowEvent::Touch(touch) => {
                let size = self.window_size();
                self.input.process_touch(
                    touch.id,
                    touch.phase,
                    (touch.location.x, touch.location.y),
                    size,
                );
                false
            }
            WindowEvent::RedrawRequested => {
                self.update();
                self.window.request_redraw();
                !self.running
            }
            _ => false,
        }
    }

    /// Handle device events. Nothing here drives gameplay yet.
    pub(crate) fn handle_device_event(&mut self, event: DeviceEvent) {
        if let DeviceEvent::Removed = event {
            self.input.release_all();
        }
    }
}
