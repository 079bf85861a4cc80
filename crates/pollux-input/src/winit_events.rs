//! Translation from winit window events to [`InputEvent`]s.
//!
//! Forward every [`WindowEvent`] through [`event_from_window_event`] and push
//! the result into the tracker's [`EventQueue`](crate::EventQueue).

use crate::event::{InputEvent, MouseButton};
use winit::event::{ElementState, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

/// Translate a window event, or `None` for events the tracker ignores.
pub fn event_from_window_event(event: &WindowEvent) -> Option<InputEvent> {
    match event {
        WindowEvent::KeyboardInput { event, .. } => {
            key_event(event.physical_key, event.state, event.repeat)
        }
        WindowEvent::MouseInput { state, button, .. } => {
            let button = mouse_button_code(*button);
            Some(match state {
                ElementState::Pressed => InputEvent::MouseDown(button),
                ElementState::Released => InputEvent::MouseUp(button),
            })
        }
        WindowEvent::CursorMoved { position, .. } => Some(InputEvent::MouseMove {
            x: position.x,
            y: position.y,
        }),
        _ => None,
    }
}

/// Translate a physical key transition.
///
/// Keys winit cannot identify (`PhysicalKey::Unidentified`) are dropped.
pub fn key_event(key: PhysicalKey, state: ElementState, repeat: bool) -> Option<InputEvent> {
    let PhysicalKey::Code(code) = key else {
        return None;
    };
    let code = w3c_code(code);
    Some(match state {
        ElementState::Pressed => InputEvent::KeyDown { code, repeat },
        ElementState::Released => InputEvent::KeyUp { code },
    })
}

/// W3C `KeyboardEvent.code` name of a winit key code.
///
/// Most `KeyCode` Debug names already match; winit's `Super*` keys are the
/// W3C `Meta*` keys.
pub fn w3c_code(code: KeyCode) -> String {
    match code {
        KeyCode::SuperLeft => "MetaLeft".to_string(),
        KeyCode::SuperRight => "MetaRight".to_string(),
        code => format!("{code:?}"),
    }
}

/// Map a winit mouse button to the browser button numbering.
pub fn mouse_button_code(button: winit::event::MouseButton) -> MouseButton {
    use winit::event::MouseButton as Winit;
    match button {
        Winit::Left => MouseButton::LEFT,
        Winit::Middle => MouseButton::MIDDLE,
        Winit::Right => MouseButton::RIGHT,
        Winit::Back => MouseButton::BACK,
        Winit::Forward => MouseButton::FORWARD,
        Winit::Other(code) => MouseButton(code),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::keyboard::NativeKeyCode;

    #[test]
    fn test_key_code_names() {
        let down = key_event(
            PhysicalKey::Code(KeyCode::KeyW),
            ElementState::Pressed,
            false,
        );
        assert_eq!(
            down,
            Some(InputEvent::KeyDown {
                code: "KeyW".to_string(),
                repeat: false
            })
        );
        let up = key_event(
            PhysicalKey::Code(KeyCode::ArrowUp),
            ElementState::Released,
            false,
        );
        assert_eq!(
            up,
            Some(InputEvent::KeyUp {
                code: "ArrowUp".to_string()
            })
        );
    }

    #[test]
    fn test_super_keys_use_meta_names() {
        assert_eq!(w3c_code(KeyCode::SuperLeft), "MetaLeft");
        assert_eq!(w3c_code(KeyCode::SuperRight), "MetaRight");
        assert_eq!(w3c_code(KeyCode::ShiftLeft), "ShiftLeft");
        let down = key_event(
            PhysicalKey::Code(KeyCode::SuperLeft),
            ElementState::Pressed,
            false,
        );
        assert_eq!(
            down,
            Some(InputEvent::KeyDown {
                code: "MetaLeft".to_string(),
                repeat: false
            })
        );
    }

    #[test]
    fn test_repeat_flag_preserved() {
        let event = key_event(PhysicalKey::Code(KeyCode::Space), ElementState::Pressed, true);
        assert!(matches!(event, Some(InputEvent::KeyDown { repeat: true, .. })));
    }

    #[test]
    fn test_unidentified_key_dropped() {
        let key = PhysicalKey::Unidentified(NativeKeyCode::Unidentified);
        assert_eq!(key_event(key, ElementState::Pressed, false), None);
    }

    #[test]
    fn test_mouse_button_numbering() {
        use winit::event::MouseButton as Winit;
        assert_eq!(mouse_button_code(Winit::Left), MouseButton(0));
        assert_eq!(mouse_button_code(Winit::Middle), MouseButton(1));
        assert_eq!(mouse_button_code(Winit::Right), MouseButton(2));
        assert_eq!(mouse_button_code(Winit::Back), MouseButton(3));
        assert_eq!(mouse_button_code(Winit::Forward), MouseButton(4));
        assert_eq!(mouse_button_code(Winit::Other(9)), MouseButton(9));
    }
}
