/// Must not be picked up: hidden directory.
#[derive(GodotClass)]
struct Hidden {}
