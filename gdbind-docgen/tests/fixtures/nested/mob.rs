use godot::classes::RigidBody2D;
use godot::prelude::*;

thread_local! {
    static SPAWNED: std::cell::Cell<u32> = const { std::cell::Cell::new(0) };
}

/// An enemy that crosses the screen.
#[derive(GodotClass)]
#[class(base = RigidBody2D, init)]
pub struct Mob {
    base: Base<RigidBody2D>,
}
