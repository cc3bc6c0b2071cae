use godot::classes::{Area2D, IArea2D};
use godot::prelude::*;

/// The player character.
///
/// Moves in all four directions and collides with mobs.
/// See [the tutorial](https://docs.godotengine.org/en/stable/getting_started/first_2d_game/).
#[derive(GodotClass)]
#[class(base = Area2D, init)]
pub struct Player {
    /// How fast the player moves, in pixels per second.
    #[export]
    #[init(val = 400.0)]
    speed: f32,

    screen_size: Vector2,

    base: Base<Area2D>,
}

#[godot_api]
impl Player {
    /// Emitted when a mob hits the player.
    #[signal]
    fn hit();

    /// Places the player at `pos` and shows it.
    #[func]
    pub fn start(&mut self, pos: Vector2) {
        self.base_mut().set_global_position(pos);
        self.base_mut().show();
    }
}

#[godot_api]
impl IArea2D for Player {
    /// Hides the player until [`Player::start`] is called.
    fn ready(&mut self) {
        self.base_mut().hide();
    }

    fn process(&mut self, delta: f64) {}
}
