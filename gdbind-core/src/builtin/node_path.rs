/*
 * Copyright (c) godot-rust; Bromeon and contributors.
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::fmt;
use std::str::FromStr;

/// A pre-parsed scene tree path.
///
/// A path consists of node _names_ separated by `/`, optionally followed by property _sub-names_, each introduced by `:`.
/// A leading `/` makes the path absolute (relative to the scene tree root).
///
/// ```
/// # use gdbind_core::builtin::NodePath;
/// let path = NodePath::parse("/root/Level/Sprite2D:texture:resource_name").unwrap();
///
/// assert!(path.is_absolute());
/// assert_eq!(path.names(), ["root", "Level", "Sprite2D"]);
/// assert_eq!(path.subnames(), ["texture", "resource_name"]);
/// assert_eq!(path.concatenated_names(), "/root/Level/Sprite2D");
/// ```
///
/// Parsing follows the engine: repeated slashes collapse, and a single trailing `:` is accepted. Empty sub-names in the
/// middle of a path are rejected with [`NodePathError`].
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct NodePath {
    absolute: bool,
    names: Vec<String>,
    subnames: Vec<String>,
}

impl NodePath {
    /// Builds a path directly from its parts.
    pub fn new<N, S>(names: N, subnames: S, absolute: bool) -> Self
    where
        N: IntoIterator,
        N::Item: Into<String>,
        S: IntoIterator,
        S::Item: Into<String>,
    {
        Self {
            absolute,
            names: names.into_iter().map(Into::into).collect(),
            subnames: subnames.into_iter().map(Into::into).collect(),
        }
    }

    /// Parses the textual representation, e.g. `"../Player:position:x"`.
    pub fn parse(path: &str) -> Result<Self, NodePathError> {
        if path.is_empty() {
            return Ok(Self::default());
        }

        let absolute = path.starts_with('/');

        let (node_part, subnames) = match path.split_once(':') {
            Some((node_part, sub_part)) => (node_part, parse_subnames(path, sub_part)?),
            None => (path, Vec::new()),
        };

        let names = node_part
            .split('/')
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .collect();

        Ok(Self {
            absolute,
            names,
            subnames,
        })
    }

    pub fn is_absolute(&self) -> bool {
        self.absolute
    }

    /// True if the path has neither names nor sub-names and is relative.
    ///
    /// Note that `"/"` is not empty.
    pub fn is_empty(&self) -> bool {
        !self.absolute && self.names.is_empty() && self.subnames.is_empty()
    }

    pub fn name_count(&self) -> usize {
        self.names.len()
    }

    pub fn subname_count(&self) -> usize {
        self.subnames.len()
    }

    /// Number of names plus number of sub-names.
    pub fn total_name_count(&self) -> usize {
        self.names.len() + self.subnames.len()
    }

    pub fn name(&self, index: usize) -> Option<&str> {
        self.names.get(index).map(String::as_str)
    }

    pub fn subname(&self, index: usize) -> Option<&str> {
        self.subnames.get(index).map(String::as_str)
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn subnames(&self) -> &[String] {
        &self.subnames
    }

    /// All node names joined by `/`, with a leading `/` for absolute paths.
    ///
    /// `"/root/Level:position"` yields `"/root/Level"`.
    pub fn concatenated_names(&self) -> String {
        let joined = self.names.join("/");
        if self.absolute {
            format!("/{joined}")
        } else {
            joined
        }
    }

    /// All sub-names joined by `:`, without a leading colon.
    ///
    /// `"Sprite2D:texture:load_path"` yields `"texture:load_path"`.
    pub fn concatenated_subnames(&self) -> String {
        self.subnames.join(":")
    }

    /// Turns the path into a pure property path relative to the current node.
    ///
    /// The node names are merged into the first sub-name, so `"Sprite2D:texture"` becomes `":Sprite2D:texture"`,
    /// and `"/root/Level"` becomes `":root/Level"`.
    pub fn as_property_path(&self) -> NodePath {
        if self.names.is_empty() {
            return self.clone();
        }

        let mut subnames = Vec::with_capacity(self.subnames.len() + 1);
        subnames.push(self.names.join("/"));
        subnames.extend(self.subnames.iter().cloned());

        NodePath {
            absolute: false,
            names: Vec::new(),
            subnames,
        }
    }

    /// Returns the part of the path between `begin` (inclusive) and `end` (exclusive).
    ///
    /// Indices address names first, then sub-names. Negative values count from the end; out-of-range values are clamped.
    /// Use `i64::MAX` as `end` to slice up to the end. The result is absolute only if it starts at the first name of an
    /// absolute path.
    pub fn slice(&self, begin: i64, end: i64) -> NodePath {
        let name_count = self.names.len();
        let total = self.total_name_count();

        let begin = resolve_index(begin, total);
        let end = resolve_index(end, total);

        let sub_begin = begin.saturating_sub(name_count);
        let sub_end = end.saturating_sub(name_count);

        NodePath {
            absolute: self.absolute && begin == 0,
            names: slice_vec(&self.names, begin, end),
            subnames: slice_vec(&self.subnames, sub_begin, sub_end),
        }
    }

    /// Removes `.` segments and resolves `name/..` pairs.
    ///
    /// A path consisting of a single name is returned as-is. Leading `..` segments that cannot be resolved are kept,
    /// and a path whose names cancel out entirely becomes `"."`.
    pub fn simplified(&self) -> NodePath {
        let mut names = self.names.clone();

        let mut i = 0;
        while i < names.len() {
            if names.len() == 1 {
                break;
            }

            if names[i] == "." {
                names.remove(i);
                continue;
            }

            if i > 0 && names[i] == ".." && names[i - 1] != "." && names[i - 1] != ".." {
                names.drain(i - 1..=i);
                i -= 1;

                if names.is_empty() {
                    names.push(".".to_string());
                    break;
                }
                continue;
            }

            i += 1;
        }

        NodePath {
            absolute: self.absolute,
            names,
            subnames: self.subnames.clone(),
        }
    }
}

fn parse_subnames(full_path: &str, sub_part: &str) -> Result<Vec<String>, NodePathError> {
    let pieces: Vec<&str> = sub_part.split(':').collect();
    let last = pieces.len() - 1;

    let mut subnames = Vec::with_capacity(pieces.len());
    for (i, piece) in pieces.into_iter().enumerate() {
        if piece.is_empty() {
            // A single `:` at the very end is tolerated.
            if i == last {
                continue;
            }
            return Err(NodePathError::EmptySubname {
                path: full_path.to_string(),
            });
        }
        subnames.push(piece.to_string());
    }

    Ok(subnames)
}

fn resolve_index(index: i64, total: usize) -> usize {
    let total = i64::try_from(total).unwrap_or(i64::MAX);
    let clamped = index.clamp(-total, total);
    let resolved = if clamped < 0 { clamped + total } else { clamped };

    // Non-negative after the adjustment above.
    resolved as usize
}

fn slice_vec(items: &[String], begin: usize, end: usize) -> Vec<String> {
    let end = end.min(items.len());
    if begin >= end {
        return Vec::new();
    }
    items[begin..end].to_vec()
}

// ----------------------------------------------------------------------------------------------------------------------------------------------
// Formatting and conversions

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.absolute {
            f.write_str("/")?;
        }
        f.write_str(&self.names.join("/"))?;
        for subname in &self.subnames {
            write!(f, ":{subname}")?;
        }
        Ok(())
    }
}

/// Uses literal syntax from GDScript: `^"node_path"`
impl fmt::Debug for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "^\"{self}\"")
    }
}

impl FromStr for NodePath {
    type Err = NodePathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<&str> for NodePath {
    type Error = NodePathError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Self::parse(s)
    }
}

impl TryFrom<String> for NodePath {
    type Error = NodePathError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<NodePath> for String {
    fn from(path: NodePath) -> Self {
        path.to_string()
    }
}

/// Error returned when a string is not a valid [`NodePath`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NodePathError {
    /// Two `:` separators without a sub-name between them, e.g. `"Node::x"`.
    EmptySubname { path: String },
}

impl fmt::Display for NodePathError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptySubname { path } => {
                write!(f, "invalid NodePath '{path}': empty sub-name")
            }
        }
    }
}

impl std::error::Error for NodePathError {}

#[cfg(feature = "serde")]
mod serialize {
    use super::*;
    use serde::de::{Error, Visitor};
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::fmt::Formatter;

    impl Serialize for NodePath {
        #[inline]
        fn serialize<S>(
            &self,
            serializer: S,
        ) -> Result<<S as Serializer>::Ok, <S as Serializer>::Error>
        where
            S: Serializer,
        {
            serializer.serialize_newtype_struct("NodePath", &*self.to_string())
        }
    }

    impl<'de> Deserialize<'de> for NodePath {
        #[inline]
        fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
        where
            D: Deserializer<'de>,
        {
            struct NodePathVisitor;

            impl<'de> Visitor<'de> for NodePathVisitor {
                type Value = NodePath;

                fn expecting(&self, formatter: &mut Formatter) -> fmt::Result {
                    formatter.write_str("a NodePath")
                }

                fn visit_str<E>(self, s: &str) -> Result<Self::Value, E>
                where
                    E: Error,
                {
                    NodePath::parse(s).map_err(Error::custom)
                }

                fn visit_newtype_struct<D>(
                    self,
                    deserializer: D,
                ) -> Result<Self::Value, <D as Deserializer<'de>>::Error>
                where
                    D: Deserializer<'de>,
                {
                    deserializer.deserialize_str(self)
                }
            }

            deserializer.deserialize_newtype_struct("NodePath", NodePathVisitor)
        }
    }
}

// ----------------------------------------------------------------------------------------------------------------------------------------------


#[cfg(all(test, feature = "proptest"))]
mod proptests {
    use proptest::collection::vec;
    use proptest::prelude::*;

    use super::*;

    fn segment() -> impl Strategy<Value = String> {
        "[A-Za-z0-9_.]{1,8}"
    }

    proptest! {
        #[test]
        fn display_then_parse_is_identity(
            absolute in any::<bool>(),
            names in vec(segment(), 0..5),
            subnames in vec(segment(), 0..4),
        ) {
            let original = NodePath::new(names, subnames, absolute);
            let reparsed = NodePath::parse(&original.to_string()).unwrap();

            prop_assert_eq!(reparsed, original);
        }

        #[test]
        fn slice_never_exceeds_total(
            names in vec(segment(), 0..5),
            subnames in vec(segment(), 0..4),
            begin in -10i64..10,
            end in -10i64..10,
        ) {
            let path = NodePath::new(names, subnames, false);
            let sliced = path.slice(begin, end);

            prop_assert!(sliced.total_name_count() <= path.total_name_count());
        }
    }
}
