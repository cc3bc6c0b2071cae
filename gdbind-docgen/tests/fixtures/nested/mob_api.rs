use godot::prelude::*;

use super::mob::Mob;

#[godot_api]
impl Mob {
    /// Frees the mob once it leaves the screen.
    #[func]
    fn on_visibility_screen_exited(&mut self) {
        self.base_mut().queue_free();
    }
}

/// Score bookkeeping without a struct in this crate.
#[godot_api]
impl ScoreBoard {
    /// Number of points awarded per second survived.
    #[constant]
    const POINTS_PER_SECOND: i64 = 1;
}
