/*
 * Copyright (c) godot-rust; Bromeon and contributors.
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

//! Class documentation shown in the Godot editor help.
//!
//! Documentation reaches the editor in two steps:
//!
//! 1. At build time, `gdbind-docgen` extracts doc comments from the extension's sources into a [`LibraryDocs`] file,
//!    stored next to the shared library.
//! 2. At registration time, the binding layer describes every class it registers ([`ClassRegistration`]). The
//!    [`DocsRegistry`] merges that information (names, engine types, explicit overrides) with the preloaded file and
//!    hands one XML document per class to a [`DocsSink`].

mod model;
mod xml;

use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;

pub use model::{
    ClassDoc, ConstantDoc, DOCS_FORMAT_VERSION, LibraryDocs, MemberDoc, MethodDoc, ParamDoc,
    SignalDoc,
};
pub use xml::{class_to_xml, xml_escape};

/// Errors while reading library documentation.
#[derive(Debug, thiserror::Error)]
pub enum DocsError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed library documentation XML: {message}")]
    Xml { message: String },

    #[error("malformed library documentation JSON: {message}")]
    Json { message: String },
}

/// Receives finished class reference documents.
///
/// Implemented by the binding layer on top of the engine's `editor_help_load_xml_from_utf8_chars_and_len`.
pub trait DocsSink {
    fn load_class_xml(&mut self, xml: &str);
}

impl DocsSink for Vec<String> {
    fn load_class_xml(&mut self, xml: &str) {
        self.push(xml.to_string());
    }
}

// ----------------------------------------------------------------------------------------------------------------------------------------------
// Registration-side information

/// Exported property as seen by the registration code.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PropertyRegistration {
    pub name: String,
    /// Engine type name, e.g. `"float"` or `"Node2D"`.
    pub ty: String,
}

/// Everything the binding layer knows about a class at the moment it is registered with ClassDB.
///
/// Overrides map a symbol name (property, signal or method; the class name for the class itself) to documentation
/// text, taking precedence over doc comments extracted at build time.
#[derive(Clone, Debug, Default)]
pub struct ClassRegistration {
    pub name: String,
    pub inherits: String,
    pub properties: Vec<PropertyRegistration>,
    pub signals: Vec<String>,
    pub methods: Vec<String>,
    pub overrides: HashMap<String, String>,
}

impl ClassRegistration {
    pub fn new(name: impl Into<String>, inherits: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            inherits: inherits.into(),
            ..Default::default()
        }
    }

    pub fn with_property(mut self, name: impl Into<String>, ty: impl Into<String>) -> Self {
        self.properties.push(PropertyRegistration {
            name: name.into(),
            ty: ty.into(),
        });
        self
    }

    pub fn with_signal(mut self, name: impl Into<String>) -> Self {
        self.signals.push(name.into());
        self
    }

    pub fn with_method(mut self, name: impl Into<String>) -> Self {
        self.methods.push(name.into());
        self
    }

    pub fn with_docs<K, V>(mut self, docs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.overrides
            .extend(docs.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Blank overrides count as absent, so they never erase existing documentation.
    fn override_for(&self, symbol: &str) -> Option<String> {
        self.overrides
            .get(symbol)
            .map(|text| normalize_doc(text))
            .filter(|text| !text.is_empty())
    }
}

/// Tabs come from indented raw strings; they carry no meaning in the editor.
fn normalize_doc(text: &str) -> String {
    text.replace('\t', "").trim().to_string()
}

/// Splits at the first paragraph break into (brief, rest).
fn split_brief<'a>(text: &'a str, separator: &str) -> (&'a str, &'a str) {
    match text.split_once(separator) {
        Some((brief, rest)) => (brief.trim(), rest.trim_start_matches(separator).trim()),
        None => (text.trim(), ""),
    }
}

// ----------------------------------------------------------------------------------------------------------------------------------------------
// Registry

/// Godot editor documentation for all classes registered by one extension.
pub struct DocsRegistry {
    version: String,
    preloaded: HashMap<String, ClassDoc>,
    registered: BTreeMap<String, ClassDoc>,
}

impl DocsRegistry {
    pub fn new() -> Self {
        Self {
            version: DOCS_FORMAT_VERSION.to_string(),
            preloaded: HashMap::new(),
            registered: BTreeMap::new(),
        }
    }

    /// Makes build-time documentation available to subsequent [`register()`][Self::register] calls.
    pub fn preload(&mut self, library: LibraryDocs) {
        if !library.version.is_empty() {
            self.version = library.version;
        }

        for class in library.classes {
            self.preloaded.insert(class.name.clone(), class);
        }
    }

    pub fn is_registered(&self, class_name: &str) -> bool {
        self.registered.contains_key(class_name)
    }

    pub fn class(&self, class_name: &str) -> Option<&ClassDoc> {
        self.registered.get(class_name)
    }

    /// Merges the registration into the preloaded documentation of that class.
    pub fn register(&mut self, registration: ClassRegistration) {
        let mut class = self
            .preloaded
            .get(&registration.name)
            .cloned()
            .unwrap_or_default();

        class.name = registration.name.clone();
        class.inherits = registration.inherits.clone();

        if let Some(docs) = registration.override_for(&registration.name) {
            let (brief, description) = split_brief(&docs, "\n\n");
            class.brief_description = brief.to_string();
            class.description = description.to_string();
        }

        merge_properties(&mut class, &registration);
        merge_signals(&mut class, &registration);
        merge_methods(&mut class, &registration);

        tracing::debug!(
            class = %class.name,
            methods = class.methods.len(),
            members = class.members.len(),
            signals = class.signals.len(),
            "registered class documentation"
        );

        self.registered.insert(class.name.clone(), class);
    }

    /// Returns one XML document per registered class, ordered by class name.
    pub fn gather_xml_docs(&self) -> impl Iterator<Item = String> + '_ {
        self.registered
            .values()
            .map(|class| class_to_xml(class, &self.version))
    }

    /// Hands all documents to `sink`, returning how many were delivered.
    pub fn deliver(&self, sink: &mut dyn DocsSink) -> usize {
        let mut count = 0;
        for xml in self.gather_xml_docs() {
            sink.load_class_xml(&xml);
            count += 1;
        }
        count
    }
}

impl Default for DocsRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn merge_properties(class: &mut ClassDoc, registration: &ClassRegistration) {
    for property in &registration.properties {
        let index = match class.members.iter().position(|m| m.name == property.name) {
            Some(index) => index,
            None => {
                class.members.push(MemberDoc {
                    name: property.name.clone(),
                    ..Default::default()
                });
                class.members.len() - 1
            }
        };

        let member = &mut class.members[index];
        member.ty = property.ty.clone();
        if let Some(docs) = registration.override_for(&property.name) {
            member.description = docs;
        }
    }
}

fn merge_signals(class: &mut ClassDoc, registration: &ClassRegistration) {
    for name in &registration.signals {
        let docs = registration.override_for(name);

        match class.signals.iter_mut().find(|s| &s.name == name) {
            Some(signal) => {
                if let Some(docs) = docs {
                    signal.description = docs;
                }
            }
            None => class.signals.push(SignalDoc {
                name: name.clone(),
                description: docs.unwrap_or_default(),
                ..Default::default()
            }),
        }
    }
}

fn merge_methods(class: &mut ClassDoc, registration: &ClassRegistration) {
    for name in &registration.methods {
        let docs = registration.override_for(name);
        let existing = class.methods.iter_mut().find(|m| &m.name == name);

        match (existing, docs) {
            (Some(method), Some(docs)) => method.description = docs,
            (Some(_), None) => {}
            (None, Some(docs)) => class.methods.push(MethodDoc {
                name: name.clone(),
                description: docs,
                ..Default::default()
            }),
            // Undocumented methods are left to the editor's own introspection.
            (None, None) => {}
        }
    }
}

#[cfg(test)]
mod tests;
