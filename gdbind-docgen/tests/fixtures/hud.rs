//! Heads-up display.

use godot::classes::{CanvasLayer, ICanvasLayer};
use godot::prelude::*;

/// Shows score and messages.
///
/// @experimental Layout is not final.
#[derive(GodotClass)]
#[class(base = CanvasLayer, rename = GameHud)]
pub struct Hud {
    /// Shown in the top-left corner.
    #[var]
    score: i64,

    base: Base<CanvasLayer>,
}

#[godot_api]
impl Hud {
    /// Emitted when the start button is pressed.
    #[signal]
    fn start_game();

    /// Maximum score that can be displayed.
    #[constant]
    const MAX_SCORE: i64 = 9999;

    /// Shows a message for two seconds.
    ///
    /// @deprecated Use `show_message_for` instead.
    #[func]
    pub fn show_message(&self, text: GString) {}

    /// Shows the game-over sequence.
    #[func]
    fn show_game_over(&mut self) -> Array<GString> {
        Array::new()
    }
}

#[cfg(test)]
mod tests {
    /// Never part of the docs.
    #[derive(GodotClass)]
    struct TestHud {}
}
