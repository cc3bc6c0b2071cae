/*
 * Copyright (c) godot-rust; Bromeon and contributors.
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

//! Build-time extraction of editor documentation from extension sources.
//!
//! Doc comments on `#[derive(GodotClass)]` structs and their `#[godot_api]` impl blocks are collected into a
//! [`LibraryDocs`] file that the runtime loads through [`gdbind_core::docs::DocsRegistry`].

pub mod attrs;
pub mod extract;
pub mod markdown_converter;
pub mod source;
pub mod type_names;

mod error;
mod watch;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use gdbind_core::docs::{ClassDoc, DOCS_FORMAT_VERSION, LibraryDocs, class_to_xml};

pub use error::DocgenError;
pub use watch::StopWatch;

use crate::extract::{DEFAULT_BASE, FileDocs, ImplFragment};

/// Where to read sources from and where to put the results.
#[derive(Clone, Debug)]
pub struct DocgenConfig {
    /// Root of the extension sources, usually the crate's `src` directory.
    pub source_dir: PathBuf,
    /// Directory receiving [`LibraryDocs::FILE_NAME`]; typically the one containing the built library.
    pub output_dir: PathBuf,
    /// If set, one `<Class>.xml` per class is written here as well.
    pub xml_dir: Option<PathBuf>,
    /// Also write [`LibraryDocs::JSON_FILE_NAME`] into `output_dir`.
    pub json: bool,
}

/// Extracts documentation from all sources below `config.source_dir`.
pub fn generate(config: &DocgenConfig, watch: &mut StopWatch) -> Result<LibraryDocs, DocgenError> {
    let files = source::discover_sources(&config.source_dir)?;
    watch.record("discover_sources");
    tracing::info!(count = files.len(), dir = %config.source_dir.display(), "found source files");

    let mut fragments = Vec::with_capacity(files.len());
    for path in &files {
        fragments.push(extract_path(path)?);
    }
    watch.record("extract_docs");

    let docs = merge_fragments(fragments);
    watch.record("merge_classes");

    Ok(docs)
}

fn extract_path(path: &Path) -> Result<FileDocs, DocgenError> {
    let source = std::fs::read_to_string(path).map_err(|source| DocgenError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let docs = extract::extract_file(&source).map_err(|err| DocgenError::Lex {
        path: path.to_path_buf(),
        message: err.to_string(),
    })?;

    tracing::debug!(
        path = %path.display(),
        structs = docs.structs.len(),
        impls = docs.impls.len(),
        skipped = docs.skipped,
        "extracted"
    );
    if docs.skipped > 0 {
        tracing::warn!(path = %path.display(), skipped = docs.skipped, "some items could not be parsed");
    }

    Ok(docs)
}

/// Combines per-file fragments into one document per class, ordered by class name.
///
/// Impl blocks are matched to structs by Rust type name, so they may live in any file.
pub fn merge_fragments(files: Vec<FileDocs>) -> LibraryDocs {
    // Keyed by Rust type name.
    let mut classes: BTreeMap<String, ClassDoc> = BTreeMap::new();
    let mut impls: Vec<ImplFragment> = Vec::new();

    for file in files {
        for fragment in file.structs {
            if classes.contains_key(&fragment.rust_name) {
                tracing::warn!(class = %fragment.rust_name, "class declared more than once; keeping the first");
                continue;
            }
            classes.insert(fragment.rust_name, fragment.class);
        }
        impls.extend(file.impls);
    }

    for fragment in impls {
        let class = classes.entry(fragment.rust_name.clone()).or_insert_with(|| {
            tracing::warn!(
                class = %fragment.rust_name,
                "#[godot_api] impl without #[derive(GodotClass)] struct; assuming base {DEFAULT_BASE}"
            );
            ClassDoc {
                name: fragment.rust_name.clone(),
                inherits: DEFAULT_BASE.to_string(),
                ..Default::default()
            }
        });

        class.methods.extend(fragment.methods);
        class.signals.extend(fragment.signals);
        class.constants.extend(fragment.constants);
    }

    let mut classes: Vec<ClassDoc> = classes.into_values().collect();
    // Renamed classes may sort differently than their Rust names.
    classes.sort_by(|a, b| a.name.cmp(&b.name));

    // Same order as in the class reference XML. Members keep declaration order.
    for class in &mut classes {
        class.methods.sort_by(|a, b| a.name.cmp(&b.name));
        class.signals.sort_by(|a, b| a.name.cmp(&b.name));
        class.constants.sort_by(|a, b| a.name.cmp(&b.name));
    }

    LibraryDocs::new(classes)
}

/// Writes the library documentation file, plus JSON and per-class XML files if configured. Returns all written paths.
pub fn write_outputs(docs: &LibraryDocs, config: &DocgenConfig) -> Result<Vec<PathBuf>, DocgenError> {
    let mut written = Vec::new();

    create_dir(&config.output_dir)?;
    let library_path = config.output_dir.join(LibraryDocs::FILE_NAME);
    write_file(&library_path, &docs.to_xml())?;
    written.push(library_path);

    if config.json {
        let json_path = config.output_dir.join(LibraryDocs::JSON_FILE_NAME);
        write_file(&json_path, &docs.to_json())?;
        written.push(json_path);
    }

    if let Some(xml_dir) = &config.xml_dir {
        create_dir(xml_dir)?;

        let version = if docs.version.is_empty() {
            DOCS_FORMAT_VERSION
        } else {
            docs.version.as_str()
        };

        for class in &docs.classes {
            let path = xml_dir.join(format!("{}.xml", class.name));
            write_file(&path, &class_to_xml(class, version))?;
            written.push(path);
        }
    }

    Ok(written)
}

fn create_dir(dir: &Path) -> Result<(), DocgenError> {
    std::fs::create_dir_all(dir).map_err(|source| DocgenError::Write {
        path: dir.to_path_buf(),
        source,
    })
}

fn write_file(path: &Path, content: &str) -> Result<(), DocgenError> {
    std::fs::write(path, content).map_err(|source| DocgenError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(path = %path.display(), bytes = content.len(), "written");
    Ok(())
}
