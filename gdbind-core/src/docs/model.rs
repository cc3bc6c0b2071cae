/*
 * Copyright (c) godot-rust; Bromeon and contributors.
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

#![allow(clippy::question_mark)] // in #[derive(DeJson)]

use std::path::Path;

use nanoserde::{DeJson, SerJson};

use super::{DocsError, xml};

/// Class reference version written into every generated `<class>` element.
pub const DOCS_FORMAT_VERSION: &str = "4.0";

// ----------------------------------------------------------------------------------------------------------------------------------------------
// Models (XML through `xml.rs`, JSON through nanoserde)
//
// All text fields hold unescaped BBCode; escaping happens when rendering XML.

/// Documentation of all classes of one extension library, as written by `gdbind-docgen`.
#[derive(Clone, Debug, Default, PartialEq, SerJson, DeJson)]
pub struct LibraryDocs {
    #[nserde(default)]
    pub version: String,
    #[nserde(default)]
    pub classes: Vec<ClassDoc>,
}

#[derive(Clone, Debug, Default, PartialEq, SerJson, DeJson)]
pub struct ClassDoc {
    pub name: String,
    #[nserde(default)]
    pub inherits: String,
    #[nserde(default)]
    pub brief_description: String,
    #[nserde(default)]
    pub description: String,
    #[nserde(default)]
    pub deprecated: String,
    #[nserde(default)]
    pub experimental: String,
    #[nserde(default)]
    pub methods: Vec<MethodDoc>,
    #[nserde(default)]
    pub members: Vec<MemberDoc>,
    #[nserde(default)]
    pub signals: Vec<SignalDoc>,
    #[nserde(default)]
    pub constants: Vec<ConstantDoc>,
}

#[derive(Clone, Debug, Default, PartialEq, SerJson, DeJson)]
pub struct MethodDoc {
    pub name: String,
    /// Space-separated, e.g. `"virtual"` or `"static"`. Empty for regular methods.
    #[nserde(default)]
    pub qualifiers: String,
    #[nserde(default)]
    pub return_type: String,
    #[nserde(default)]
    pub params: Vec<ParamDoc>,
    #[nserde(default)]
    pub description: String,
    #[nserde(default)]
    pub deprecated: String,
    #[nserde(default)]
    pub experimental: String,
}

#[derive(Clone, Debug, Default, PartialEq, SerJson, DeJson)]
pub struct MemberDoc {
    pub name: String,
    #[nserde(rename = "type")]
    #[nserde(default)]
    pub ty: String,
    #[nserde(default)]
    pub default: String,
    #[nserde(default)]
    pub description: String,
    #[nserde(default)]
    pub deprecated: String,
    #[nserde(default)]
    pub experimental: String,
}

#[derive(Clone, Debug, Default, PartialEq, SerJson, DeJson)]
pub struct SignalDoc {
    pub name: String,
    #[nserde(default)]
    pub params: Vec<ParamDoc>,
    #[nserde(default)]
    pub description: String,
    #[nserde(default)]
    pub deprecated: String,
    #[nserde(default)]
    pub experimental: String,
}

#[derive(Clone, Debug, Default, PartialEq, SerJson, DeJson)]
pub struct ConstantDoc {
    pub name: String,
    #[nserde(default)]
    pub value: String,
    #[nserde(default)]
    pub description: String,
    #[nserde(default)]
    pub deprecated: String,
    #[nserde(default)]
    pub experimental: String,
}

#[derive(Clone, Debug, Default, PartialEq, SerJson, DeJson)]
pub struct ParamDoc {
    pub name: String,
    #[nserde(rename = "type")]
    pub ty: String,
}

// ----------------------------------------------------------------------------------------------------------------------------------------------
// Loading and saving

impl LibraryDocs {
    /// File name of the library documentation, placed next to the extension's shared library.
    pub const FILE_NAME: &'static str = "library_documentation.xml";

    /// Optional JSON rendition of the same content, for tooling.
    pub const JSON_FILE_NAME: &'static str = "library_documentation.json";

    pub fn new(classes: Vec<ClassDoc>) -> Self {
        Self {
            version: DOCS_FORMAT_VERSION.to_string(),
            classes,
        }
    }

    /// Parses the content of [`FILE_NAME`][Self::FILE_NAME]: one class reference document per class.
    pub fn from_xml(content: &str) -> Result<Self, DocsError> {
        xml::library_from_xml(content)
    }

    pub fn to_xml(&self) -> String {
        xml::library_to_xml(self)
    }

    pub fn from_json(json: &str) -> Result<Self, DocsError> {
        Self::deserialize_json(json).map_err(|err| DocsError::Json {
            message: err.to_string(),
        })
    }

    pub fn to_json(&self) -> String {
        self.serialize_json()
    }

    /// Loads the documentation file that sits in the same directory as `library_path`.
    ///
    /// Returns `Ok(None)` if there is no such file; extensions built without docs are common.
    pub fn load_beside(library_path: &Path) -> Result<Option<Self>, DocsError> {
        let dir = library_path.parent().unwrap_or_else(|| Path::new("."));
        let path = dir.join(Self::FILE_NAME);

        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no library documentation found");
                return Ok(None);
            }
            Err(source) => return Err(DocsError::Io { path, source }),
        };

        let docs = Self::from_xml(&content)?;
        tracing::debug!(
            path = %path.display(),
            classes = docs.classes.len(),
            "loaded library documentation"
        );
        Ok(Some(docs))
    }

    pub fn class(&self, name: &str) -> Option<&ClassDoc> {
        self.classes.iter().find(|class| class.name == name)
    }
}
