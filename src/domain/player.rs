//! Player status effects granted by explosions and rainbow blobs.

/// Timer decrement per frame (seconds at the nominal 60 Hz tick)
pub const PLAYER_TIMER_STEP: f32 = 0.016;

pub const SUN_DURATION: f32 = 10.0;
pub const RAINBOW_DURATION: f32 = 5.0;
pub const JUMP_DURATION: f32 = 0.5;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PlayerState {
    /// Set by an explosive detonation; strengthens the mouse pull
    pub sun_mode: bool,
    pub sun_timer: f32,
    /// Set by absorbing a rainbow blob
    pub rainbow: bool,
    pub rainbow_timer: f32,
    pub jump_timer: f32,
}

impl PlayerState {
    pub fn start_sun(&mut self) {
        self.sun_mode = true;
        self.sun_timer = SUN_DURATION;
    }

    pub fn start_rainbow(&mut self) {
        self.rainbow = true;
        self.rainbow_timer = RAINBOW_DURATION;
        self.jump_timer = JUMP_DURATION;
    }

    /// Count every timer down one frame, clearing flags that run out
    pub fn tick(&mut self) {
        if self.sun_mode {
            self.sun_timer -= PLAYER_TIMER_STEP;
            if self.sun_timer <= 0.0 {
                self.sun_mode = false;
                self.sun_timer = 0.0;
            }
        }
        if self.rainbow {
            self.rainbow_timer -= PLAYER_TIMER_STEP;
            if self.rainbow_timer <= 0.0 {
                self.rainbow = false;
                self.rainbow_timer = 0.0;
            }
        }
        if self.jump_timer > 0.0 {
            self.jump_timer = (self.jump_timer - PLAYER_TIMER_STEP).max(0.0);
        }
    }
}
