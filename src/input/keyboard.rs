// Keyboard source: asynchronous key state polling.

use windows::Win32::UI::Input::KeyboardAndMouse::{
    GetAsyncKeyState, VIRTUAL_KEY, VK_ESCAPE, VK_LEFT, VK_RIGHT, VK_SPACE,
};

use super::{Action, ActionSignals, InputSource};

/// Default key bindings.
pub const DEFAULT_BINDINGS: [(VIRTUAL_KEY, Action); 4] = [
    (VK_LEFT, Action::Decrease),
    (VK_RIGHT, Action::Increase),
    (VK_SPACE, Action::ToggleMode),
    (VK_ESCAPE, Action::Quit),
];

pub struct KeyboardSource {
    bindings: Vec<(VIRTUAL_KEY, Action)>,
}

impl Default for KeyboardSource {
    fn default() -> Self {
        Self::new(DEFAULT_BINDINGS.to_vec())
    }
}

impl KeyboardSource {
    pub fn new(bindings: Vec<(VIRTUAL_KEY, Action)>) -> Self {
        Self { bindings }
    }
}

fn is_key_down(key: VIRTUAL_KEY) -> bool {
    // SAFETY: GetAsyncKeyState only reads global input state.
    let state = unsafe { GetAsyncKeyState(key.0 as i32) };
    // high bit = currently down
    (state as u16 & 0x8000) != 0
}

impl InputSource for KeyboardSource {
    fn name(&self) -> &str {
        "keyboard"
    }

    fn sample(&mut self, signals: &mut ActionSignals) {
        for &(key, action) in &self.bindings {
            if is_key_down(key) {
                signals.press(action);
            }
        }
    }
}
