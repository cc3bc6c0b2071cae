/*
 * Copyright (c) godot-rust; Bromeon and contributors.
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::path::Path;

use super::*;

fn preloaded_player() -> LibraryDocs {
    LibraryDocs::new(vec![ClassDoc {
        name: "Player".to_string(),
        inherits: "Area2D".to_string(),
        brief_description: "The player character.".to_string(),
        description: "Moves with the arrow keys.".to_string(),
        members: vec![MemberDoc {
            name: "speed".to_string(),
            ty: "f32".to_string(),
            default: "400.0".to_string(),
            description: "Pixels per second.".to_string(),
            ..Default::default()
        }],
        methods: vec![MethodDoc {
            name: "start".to_string(),
            description: "Resets the player.".to_string(),
            ..Default::default()
        }],
        ..Default::default()
    }])
}

#[test]
fn registration_keeps_preloaded_docs() {
    let mut registry = DocsRegistry::new();
    registry.preload(preloaded_player());

    registry.register(
        ClassRegistration::new("Player", "Area2D")
            .with_property("speed", "float")
            .with_method("start"),
    );

    let player = registry.class("Player").unwrap();
    assert_eq!(player.brief_description, "The player character.");
    assert_eq!(player.members.len(), 1);
    assert_eq!(player.members[0].ty, "float", "type comes from registration");
    assert_eq!(player.members[0].default, "400.0");
    assert_eq!(player.members[0].description, "Pixels per second.");
    assert_eq!(player.methods[0].description, "Resets the player.");
}

#[test]
fn inherits_comes_from_registration() {
    let mut registry = DocsRegistry::new();
    registry.preload(preloaded_player());

    registry.register(ClassRegistration::new("Player", "CharacterBody2D"));

    assert_eq!(registry.class("Player").unwrap().inherits, "CharacterBody2D");
}

#[test]
fn overrides_replace_descriptions() {
    let mut registry = DocsRegistry::new();
    registry.preload(preloaded_player());

    registry.register(
        ClassRegistration::new("Player", "Area2D")
            .with_property("speed", "float")
            .with_property("lives", "int")
            .with_method("start")
            .with_docs([
                ("speed", "\tHow fast.\n"),
                ("lives", "Remaining lives."),
                ("start", "  Starts a round.  "),
                ("Player", "Hero.\n\nControlled by the user."),
            ]),
    );

    let player = registry.class("Player").unwrap();
    assert_eq!(player.brief_description, "Hero.");
    assert_eq!(player.description, "Controlled by the user.");
    assert_eq!(player.members[0].description, "How fast.");
    assert_eq!(player.members[1].name, "lives");
    assert_eq!(player.members[1].ty, "int");
    assert_eq!(player.members[1].description, "Remaining lives.");
    assert_eq!(player.methods[0].description, "Starts a round.");
}

#[test]
fn undocumented_methods_are_skipped() {
    let mut registry = DocsRegistry::new();

    registry.register(
        ClassRegistration::new("Mob", "RigidBody2D")
            .with_method("hidden_helper")
            .with_method("on_screen_exited")
            .with_docs([("on_screen_exited", "Frees the mob.")]),
    );

    let mob = registry.class("Mob").unwrap();
    assert_eq!(mob.methods.len(), 1);
    assert_eq!(mob.methods[0].name, "on_screen_exited");
}

#[test]
fn signals_are_added_once() {
    let mut registry = DocsRegistry::new();
    registry.preload(LibraryDocs::new(vec![ClassDoc {
        name: "Hud".to_string(),
        signals: vec![SignalDoc {
            name: "start_game".to_string(),
            description: "Emitted on start.".to_string(),
            ..Default::default()
        }],
        ..Default::default()
    }]));

    registry.register(
        ClassRegistration::new("Hud", "CanvasLayer")
            .with_signal("start_game")
            .with_signal("game_over")
            .with_docs([("game_over", "Emitted when all lives are lost.")]),
    );

    let hud = registry.class("Hud").unwrap();
    assert_eq!(hud.signals.len(), 2);
    assert_eq!(hud.signals[0].description, "Emitted on start.");
    assert_eq!(hud.signals[1].description, "Emitted when all lives are lost.");
}

#[test]
fn unregistered_classes_are_not_delivered() {
    let mut registry = DocsRegistry::new();
    registry.preload(preloaded_player());
    registry.register(ClassRegistration::new("Mob", "RigidBody2D"));
    registry.register(ClassRegistration::new("Hud", "CanvasLayer"));

    let mut sink: Vec<String> = Vec::new();
    let count = registry.deliver(&mut sink);

    assert_eq!(count, 2);
    assert!(!registry.is_registered("Player"));
    assert!(sink[0].contains(r#"<class name="Hud""#), "sorted by name");
    assert!(sink[1].contains(r#"<class name="Mob""#));
}

#[test]
fn preloaded_version_is_used() {
    let mut registry = DocsRegistry::new();
    registry.preload(LibraryDocs {
        version: "4.3".to_string(),
        classes: vec![],
    });
    registry.register(ClassRegistration::new("Mob", "RigidBody2D"));

    let xml = registry.gather_xml_docs().next().unwrap();
    assert!(xml.contains(r#"version="4.3""#));
}

#[test]
fn blank_overrides_keep_existing_docs() {
    let mut registry = DocsRegistry::new();
    registry.preload(preloaded_player());

    registry.register(
        ClassRegistration::new("Player", "Area2D")
            .with_property("speed", "float")
            .with_method("start")
            .with_docs([("start", " \t\n"), ("speed", ""), ("Player", "   ")]),
    );

    let player = registry.class("Player").unwrap();
    assert_eq!(player.brief_description, "The player character.");
    assert_eq!(player.members[0].description, "Pixels per second.");
    assert_eq!(player.methods[0].description, "Resets the player.");
}

#[test]
fn default_registry_has_format_version() {
    let mut registry = DocsRegistry::default();
    registry.register(ClassRegistration::new("Mob", "RigidBody2D"));

    let xml = registry.gather_xml_docs().next().unwrap();
    assert!(xml.contains(&format!(r#"version="{DOCS_FORMAT_VERSION}""#)));
}

/// Per-process directory, so that concurrent test runs do not share files.
fn temp_dir(name: &str) -> std::path::PathBuf {
    let dir = std::env::temp_dir()
        .join("gdbind-core-tests")
        .join(format!("{name}-{}", std::process::id()));

    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn load_beside_missing_file() {
    let dir = temp_dir("docs-missing");

    let loaded = LibraryDocs::load_beside(&dir.join("libextension.so")).unwrap();
    assert!(loaded.is_none());
}

#[test]
fn load_beside_reads_xml() {
    let dir = temp_dir("docs-present");
    std::fs::write(dir.join(LibraryDocs::FILE_NAME), preloaded_player().to_xml()).unwrap();

    let loaded = LibraryDocs::load_beside(&dir.join("libextension.so"))
        .unwrap()
        .unwrap();

    // Members keep their order; methods come back sorted, and there is only one here.
    assert_eq!(loaded.version, DOCS_FORMAT_VERSION);
    let player = loaded.class("Player").unwrap();
    assert_eq!(player.brief_description, "The player character.");
    assert_eq!(player.members[0].default, "400.0");
    assert_eq!(player.methods[0].description, "Resets the player.");
    assert_eq!(player.methods[0].return_type, "void");
}

#[test]
fn load_beside_ignores_json_file() {
    let dir = temp_dir("docs-json-only");
    std::fs::write(dir.join(LibraryDocs::JSON_FILE_NAME), preloaded_player().to_json()).unwrap();

    let loaded = LibraryDocs::load_beside(&dir.join("libextension.so")).unwrap();
    assert!(loaded.is_none());
}

#[test]
fn load_beside_malformed_file() {
    let dir = temp_dir("docs-malformed");
    std::fs::write(dir.join(LibraryDocs::FILE_NAME), "<class name=\"Player\">").unwrap();

    let err = LibraryDocs::load_beside(Path::new(&dir.join("lib.dll"))).unwrap_err();
    assert!(matches!(err, DocsError::Xml { .. }));
}
