use tileworld_common::PlayerIntent;

use crate::Action;

/// Held-control state across steps.
///
/// Movement is level-triggered; jump fires only on the step the jump
/// control goes from released to pressed.
#[derive(Debug, Clone, Default)]
pub struct Controls {
    left: bool,
    right: bool,
    jump: bool,
    jump_was_held: bool,
}

impl Controls {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&mut self, action: Action) {
        self.set(action, true);
    }

    pub fn release(&mut self, action: Action) {
        self.set(action, false);
    }

    /// Replace the held set with exactly `actions`.
    pub fn hold_only(&mut self, actions: &[Action]) {
        self.left = false;
        self.right = false;
        self.jump = false;
        for &action in actions {
            self.press(action);
        }
    }

    fn set(&mut self, action: Action, held: bool) {
        match action {
            Action::MoveLeft => self.left = held,
            Action::MoveRight => self.right = held,
            Action::Jump => self.jump = held,
            Action::Noop => {}
        }
    }

    /// Intent for the coming step. Call once per step.
    pub fn intent(&mut self) -> PlayerIntent {
        let intent = PlayerIntent {
            move_left: self.left,
            move_right: self.right,
            jump: self.jump && !self.jump_was_held,
        };
        self.jump_was_held = self.jump;
        if intent.jump {
            tracing::trace!("jump edge");
        }
        intent
    }
}
