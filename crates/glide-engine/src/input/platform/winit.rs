use ::winit::dpi::PhysicalPosition;
use ::winit::event::{ElementState, MouseScrollDelta, TouchPhase as WinitTouchPhase, WindowEvent};
use ::winit::keyboard::{KeyCode, PhysicalKey};
use ::winit::window::Window;

use crate::input::{MouseWheelDelta, ScrollInput, ScrollKey, TouchPhase};

/// Translates a winit `WindowEvent` into a [`ScrollInput`].
///
/// Returns `None` for events that do not scroll the page.
pub(crate) fn translate_window_event(window: &Window, event: &WindowEvent) -> Option<ScrollInput> {
    match event {
        WindowEvent::MouseWheel { delta, .. } => {
            // winit reports "content moves down" as positive; pages scroll the other way.
            let delta = match delta {
                MouseScrollDelta::LineDelta(x, y) => MouseWheelDelta::Line { x: -*x, y: -*y },
                MouseScrollDelta::PixelDelta(p) => {
                    let (x, y) = to_logical_f32(window, *p);
                    MouseWheelDelta::Pixel { x: -x, y: -y }
                }
            };
            Some(ScrollInput::Wheel(delta))
        }

        WindowEvent::Touch(touch) => {
            let (_, y) = to_logical_f32(window, touch.location);
            let phase = match touch.phase {
                WinitTouchPhase::Started => TouchPhase::Started,
                WinitTouchPhase::Moved => TouchPhase::Moved,
                WinitTouchPhase::Ended => TouchPhase::Ended,
                WinitTouchPhase::Cancelled => TouchPhase::Cancelled,
            };
            Some(ScrollInput::Touch { id: touch.id, phase, y })
        }

        WindowEvent::KeyboardInput { event, .. } if event.state == ElementState::Pressed => {
            map_key(event.physical_key).map(ScrollInput::Key)
        }

        _ => None,
    }
}

fn to_logical_f32(window: &Window, pos: PhysicalPosition<f64>) -> (f32, f32) {
    let scale = window.scale_factor();
    let logical = pos.to_logical::<f64>(scale);
    (logical.x as f32, logical.y as f32)
}

fn map_key(pk: PhysicalKey) -> Option<ScrollKey> {
    let PhysicalKey::Code(code) = pk else { return None };
    match code {
        KeyCode::ArrowUp => Some(ScrollKey::ArrowUp),
        KeyCode::ArrowDown => Some(ScrollKey::ArrowDown),
        KeyCode::PageUp => Some(ScrollKey::PageUp),
        KeyCode::PageDown => Some(ScrollKey::PageDown),
        KeyCode::Home => Some(ScrollKey::Home),
        KeyCode::End => Some(ScrollKey::End),
        KeyCode::Space => Some(ScrollKey::Space),
        _ => None,
    }
}
