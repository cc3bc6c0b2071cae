/*
 * Copyright (c) godot-rust; Bromeon and contributors.
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

//! Built-in types that are implemented purely on the Rust side.
//!
//! The engine-backed variants of these types live behind the ABI layer; the types here mirror the engine's parsing
//! and formatting rules so that they can be used in tooling, tests and registration code without a running engine.

mod node_path;

pub use node_path::{NodePath, NodePathError};
