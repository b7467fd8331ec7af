use glam::DVec2;

/// Speed set on the tracked body for each held direction.
pub const DRIVE_SPEED: f64 = 20.0;
/// Angular speed set on the tracked body while a rotation key is held.
pub const DRIVE_SPIN: f64 = 0.5;

/// Held keys reported by an input collaborator for one frame.
///
/// The tracked body's velocity is overwritten, not accelerated: releasing
/// every key on an axis stops the body on that axis. When opposite keys are
/// held, `down`, `right` and `rotate_cw` win. Screen coordinates grow
/// downward, so `up` means negative y.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InputState {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    pub rotate_ccw: bool,
    pub rotate_cw: bool,
}

impl InputState {
    pub fn velocity(&self) -> DVec2 {
        DVec2::new(
            axis(self.left, self.right) * DRIVE_SPEED,
            axis(self.up, self.down) * DRIVE_SPEED,
        )
    }

    pub fn angular_velocity(&self) -> f64 {
        axis(self.rotate_ccw, self.rotate_cw) * DRIVE_SPIN
    }
}

fn axis(negative: bool, positive: bool) -> f64 {
    if positive {
        1.0
    } else if negative {
        -1.0
    } else {
        0.0
    }
}
