/*
 * Copyright (c) godot-rust; Bromeon and contributors.
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

//! Engine-independent parts of the gdbind GDExtension bindings.
//!
//! * [`builtin`]: scene-tree paths ([`NodePath`][builtin::NodePath]).
//! * [`docs`]: class documentation, from the generated library file to the XML the editor help consumes.

pub mod builtin;
pub mod docs;
