use crate::utils::Position;

/// Interface to the engine's camera system: text boxes only need the
/// world-space offset to subtract when building their transform. An
/// inactive camera reads as the origin, which pins HUD text to the screen.
#[derive(Debug, Default)]
pub struct Camera {
    position: Position,
    activated: bool,
}

impl Camera {
    pub fn new(position: Position) -> Self {
        Self {
            position,
            activated: false,
        }
    }

    pub fn activate(&mut self) {
        self.activated = true;
    }

    pub fn deactivate(&mut self) {
        self.activated = false;
    }

    pub fn get_pos(&self) -> Position {
        if self.activated {
            self.position
        } else {
            Position { x: 0.0, y: 0.0 }
        }
    }

    pub fn set_pos(&mut self, new_pos: Position) {
        self.position = new_pos;
    }
}
