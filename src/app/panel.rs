//! Operator panel: two debounced buttons mapped to a requested state.

use super::ports::PanelPort;
use super::state::SystemState;
use crate::drivers::debounce::DebouncedInput;

pub struct CommandPanel {
    up: DebouncedInput,
    down: DebouncedInput,
}

impl CommandPanel {
    pub fn new(input_delay_ms: u32, now_ms: u32) -> Self {
        Self {
            up: DebouncedInput::new(input_delay_ms, false, now_ms),
            down: DebouncedInput::new(input_delay_ms, false, now_ms),
        }
    }

    /// Poll the buttons and translate them into a request.
    ///
    /// Both held asks for calibration. A failed read counts as both
    /// released, which asks the lift to stop.
    pub fn request<P: PanelPort>(&mut self, panel: &mut P, now_ms: u32) -> SystemState {
        let (up_raw, down_raw) = panel.read_command_buttons().unwrap_or((false, false));
        let up = self.up.update(up_raw, now_ms);
        let down = self.down.update(down_raw, now_ms);

        match (up, down) {
            (true, true) => SystemState::Calibrating,
            (true, false) => SystemState::MovingUp,
            (false, true) => SystemState::MovingDown,
            (false, false) => SystemState::Stopping,
        }
    }
}
