/*
 * Copyright (c) godot-rust; Bromeon and contributors.
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::path::{Path, PathBuf};

use gdbind_core::docs::{ClassRegistration, DocsRegistry, LibraryDocs};
use gdbind_docgen::{DocgenConfig, StopWatch, generate, merge_fragments, write_outputs};

fn fixtures_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests").join("fixtures")
}

/// Fresh output directory per test, so tests can run in parallel.
fn output_dir(test_name: &str) -> PathBuf {
    let dir = std::env::temp_dir()
        .join("gdbind-docgen-tests")
        .join(format!("{test_name}-{}", std::process::id()));

    let _ = std::fs::remove_dir_all(&dir);
    dir
}

fn config(test_name: &str) -> DocgenConfig {
    let out = output_dir(test_name);
    DocgenConfig {
        source_dir: fixtures_dir(),
        output_dir: out.join("bin"),
        xml_dir: Some(out.join("doc_classes")),
        json: false,
    }
}

fn generate_fixtures() -> LibraryDocs {
    let mut watch = StopWatch::start();
    generate(&config("generate"), &mut watch).expect("fixtures are valid")
}

#[test]
fn classes_are_sorted_by_engine_name() {
    let docs = generate_fixtures();

    let names: Vec<_> = docs.classes.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, ["GameHud", "Mob", "Player", "ScoreBoard"]);
}

#[test]
fn hidden_directories_and_test_modules_are_skipped() {
    let docs = generate_fixtures();

    assert!(docs.class("Hidden").is_none());
    assert!(docs.class("TestHud").is_none());
}

#[test]
fn player_class() {
    let docs = generate_fixtures();
    let player = docs.class("Player").unwrap();

    assert_eq!(player.inherits, "Area2D");
    assert_eq!(player.brief_description, "The player character.");
    assert!(
        player.description.starts_with("Moves in all four directions"),
        "description: {}",
        player.description
    );
    assert!(player.description.contains("[url="));

    assert_eq!(player.members.len(), 1);
    let speed = &player.members[0];
    assert_eq!(speed.name, "speed");
    assert_eq!(speed.ty, "float");
    assert_eq!(speed.default, "400.0");

    assert_eq!(player.signals.len(), 1);
    assert_eq!(player.signals[0].name, "hit");

    let methods: Vec<_> = player
        .methods
        .iter()
        .map(|m| (m.name.as_str(), m.qualifiers.as_str()))
        .collect();
    assert_eq!(methods, [("_ready", "virtual"), ("start", "")]);
}

#[test]
fn renamed_class_with_annotations() {
    let docs = generate_fixtures();
    let hud = docs.class("GameHud").unwrap();

    assert_eq!(hud.inherits, "CanvasLayer");
    assert_eq!(hud.brief_description, "Shows score and messages.");
    assert_eq!(hud.experimental, "Layout is not final.");
    assert!(hud.deprecated.is_empty());

    assert_eq!(hud.members[0].name, "score");
    assert_eq!(hud.members[0].ty, "int");

    assert_eq!(hud.constants.len(), 1);
    assert_eq!(hud.constants[0].name, "MAX_SCORE");
    assert_eq!(hud.constants[0].value, "9999");

    let show_message = hud.methods.iter().find(|m| m.name == "show_message").unwrap();
    assert_eq!(
        show_message.deprecated,
        "Use [code]show_message_for[/code] instead."
    );
    assert_eq!(show_message.params[0].ty, "String");

    let game_over = hud.methods.iter().find(|m| m.name == "show_game_over").unwrap();
    assert_eq!(game_over.return_type, "String[]");
}

#[test]
fn impl_blocks_merge_across_files() {
    let docs = generate_fixtures();

    let mob = docs.class("Mob").unwrap();
    assert_eq!(mob.inherits, "RigidBody2D");
    assert_eq!(mob.brief_description, "An enemy that crosses the screen.");
    assert_eq!(mob.methods.len(), 1);
    assert_eq!(mob.methods[0].name, "on_visibility_screen_exited");

    // No struct anywhere: falls back to the default base.
    let score = docs.class("ScoreBoard").unwrap();
    assert_eq!(score.inherits, "RefCounted");
    assert_eq!(score.constants[0].name, "POINTS_PER_SECOND");
}

#[test]
fn paragraphs_and_annotations_stay_apart() {
    let docs = generate_fixtures();

    let player = docs.class("Player").unwrap();
    assert!(!player.description.contains("The player character."));

    // The class docs end with an @experimental paragraph.
    let hud = docs.class("GameHud").unwrap();
    assert!(hud.description.is_empty());

    let show_message = hud.methods.iter().find(|m| m.name == "show_message").unwrap();
    assert_eq!(show_message.description, "Shows a message for two seconds.");
}

#[test]
fn merge_without_fragments() {
    let docs = merge_fragments(Vec::new());

    assert!(docs.classes.is_empty());
    assert!(!docs.version.is_empty());
}

#[test]
fn missing_source_dir_is_an_error() {
    let config = DocgenConfig {
        source_dir: fixtures_dir().join("does-not-exist"),
        output_dir: output_dir("missing"),
        xml_dir: None,
        json: false,
    };

    let err = generate(&config, &mut StopWatch::start()).unwrap_err();
    assert!(err.to_string().contains("does-not-exist"), "{err}");
}

#[test]
fn outputs_are_written_and_loadable() {
    let config = DocgenConfig {
        json: true,
        ..config("outputs")
    };
    let mut watch = StopWatch::start();

    let docs = generate(&config, &mut watch).unwrap();
    let written = write_outputs(&docs, &config).unwrap();

    // Library XML, library JSON, one XML per class.
    assert_eq!(written.len(), 2 + docs.classes.len());
    assert_eq!(written[0], config.output_dir.join(LibraryDocs::FILE_NAME));

    let json = std::fs::read_to_string(config.output_dir.join(LibraryDocs::JSON_FILE_NAME)).unwrap();
    assert_eq!(LibraryDocs::from_json(&json).unwrap(), docs);

    let xml_dir = config.xml_dir.as_ref().unwrap();
    let player_xml = std::fs::read_to_string(xml_dir.join("Player.xml")).unwrap();
    assert!(player_xml.contains(r#"<class name="Player" inherits="Area2D""#));
    assert!(player_xml.contains(r#"<method name="_ready" qualifiers="virtual">"#));

    // The runtime finds the XML file next to the library.
    let library = config.output_dir.join("libgame.so");
    let loaded = LibraryDocs::load_beside(&library).unwrap().expect("file was written");
    assert_eq!(loaded, docs);

    let _ = std::fs::remove_dir_all(config.output_dir.parent().unwrap());
}

#[test]
fn generated_docs_feed_the_runtime_registry() {
    let docs = generate_fixtures();

    let mut registry = DocsRegistry::new();
    registry.preload(docs);
    registry.register(
        ClassRegistration::new("Player", "Area2D")
            .with_property("speed", "float")
            .with_signal("hit")
            .with_method("start")
            .with_method("_ready"),
    );

    let mut delivered: Vec<String> = Vec::new();
    assert_eq!(registry.deliver(&mut delivered), 1);
    assert!(delivered[0].contains("The player character."));
    assert!(delivered[0].contains(r#"<member name="speed" type="float" default="400.0">"#));
}
