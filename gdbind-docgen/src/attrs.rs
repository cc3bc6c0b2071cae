/*
 * Copyright (c) godot-rust; Bromeon and contributors.
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

//! Reading attributes: `#[doc]` content and `#[key(k = v, flag)]` argument lists.

use std::collections::HashMap;

use proc_macro2::{TokenStream, TokenTree};

use crate::markdown_converter::{self, PARAGRAPH_BREAK};

/// Doc comment content of one item, converted to BBCode.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ItemDocs {
    pub description: String,
    /// Paragraph annotated with `@deprecated`.
    pub deprecated: String,
    /// Paragraph annotated with `@experimental`.
    pub experimental: String,
}

impl ItemDocs {
    pub fn is_empty(&self) -> bool {
        self.description.is_empty() && self.deprecated.is_empty() && self.experimental.is_empty()
    }

    /// Splits the description into the first paragraph and the remainder.
    pub fn brief_and_rest(&self) -> (String, String) {
        match self.description.split_once(PARAGRAPH_BREAK) {
            Some((brief, rest)) => (brief.to_string(), rest.to_string()),
            None => (self.description.clone(), String::new()),
        }
    }
}

pub fn find_attr<'a>(attributes: &'a [venial::Attribute], name: &str) -> Option<&'a venial::Attribute> {
    attributes
        .iter()
        .find(|attr| attr.get_single_path_segment().is_some_and(|seg| seg == name))
}

pub fn has_attr(attributes: &[venial::Attribute], name: &str) -> bool {
    find_attr(attributes, name).is_some()
}

/// True for `#[derive(..., Name, ...)]`, also when `Name` is written as a path.
pub fn has_derive(attributes: &[venial::Attribute], name: &str) -> bool {
    attributes
        .iter()
        .filter(|attr| attr.get_single_path_segment().is_some_and(|seg| seg == "derive"))
        .any(|attr| {
            attr.value
                .get_value_tokens()
                .iter()
                .any(|tt| matches!(tt, TokenTree::Ident(ident) if ident == name))
        })
}

/// `///` is expanded to `#[doc = "…"]`.
///
/// This function goes through and extracts the "…" part.
fn extract_docs_from_attributes(doc: &[venial::Attribute]) -> impl Iterator<Item = String> + '_ {
    doc.iter()
        // Find #[doc].
        .filter(|x| x.get_single_path_segment().is_some_and(|x| x == "doc"))
        // Limit to occurrences with syntax #[doc = "…"].
        .filter_map(|x| match &x.value {
            venial::AttributeValue::Equals(_, doc) => Some(doc),
            _ => None,
        })
        .flat_map(|doc| {
            doc.iter().map(|token_tree| {
                litrs::StringLit::try_from(token_tree)
                    .map_or_else(|_| token_tree.to_string(), |parsed| parsed.into_value())
            })
        })
        // A single doc attribute may span several lines (block comments, `#[doc = "a\nb"]`).
        // Empty lines from a bare `///` must survive, they end paragraphs.
        .flat_map(|text| {
            text.split('\n')
                .map(|line| line.trim_end_matches('\r').to_string())
                .collect::<Vec<_>>()
        })
}

#[derive(Copy, Clone, PartialEq, Eq)]
enum Bucket {
    Docs,
    Deprecated,
    Experimental,
}

/// Groups doc lines into user documentation and paragraphs annotated with `@deprecated` or `@experimental`.
fn docs_with_attributes(doc: &[venial::Attribute]) -> (String, String, String) {
    let (mut docs, mut deprecated, mut experimental) =
        (String::new(), String::new(), String::new());
    let mut bucket = Bucket::Docs;

    for line in extract_docs_from_attributes(doc) {
        let trimmed = line.trim_start();

        // End of the paragraph (`#[doc=""]` or `///`).
        if trimmed.is_empty() {
            // Annotated paragraphs end here; don't double newlines after them.
            if bucket == Bucket::Docs {
                docs.push('\n');
            } else {
                bucket = Bucket::Docs;
            }
            continue;
        }

        if let Some(rest) = trimmed.strip_prefix("@deprecated") {
            bucket = Bucket::Deprecated;
            deprecated.push_str(rest.trim_start());
        } else if let Some(rest) = trimmed.strip_prefix("@experimental") {
            bucket = Bucket::Experimental;
            experimental.push_str(rest.trim_start());
        } else {
            // `/// text` yields " text"; drop exactly that one space so that Markdown indentation survives.
            let line = line.strip_prefix(' ').unwrap_or(&line);
            let target = match bucket {
                Bucket::Docs => &mut docs,
                Bucket::Deprecated => &mut deprecated,
                Bucket::Experimental => &mut experimental,
            };
            if bucket != Bucket::Docs && !target.is_empty() {
                target.push(' ');
            }
            target.push_str(line);
            if bucket == Bucket::Docs {
                target.push('\n');
            }
        }
    }

    (docs, deprecated, experimental)
}

/// Converts attribute docs to a form suitable for the class reference.
pub fn item_docs(attributes: &[venial::Attribute]) -> ItemDocs {
    let (docs, deprecated, experimental) = docs_with_attributes(attributes);

    let to_bbcode = |piece: String| {
        if piece.trim().is_empty() {
            String::new()
        } else {
            markdown_converter::to_bbcode(&piece)
        }
    };

    ItemDocs {
        description: to_bbcode(docs),
        deprecated: to_bbcode(deprecated),
        experimental: to_bbcode(experimental),
    }
}

// ----------------------------------------------------------------------------------------------------------------------------------------------
// Key-value attributes

/// Arguments of an attribute like `#[class(base = Node2D, init, rename = "Hero")]`.
///
/// Keys without a value map to `None`. Values are kept as source text; string literals are unquoted.
#[derive(Debug, Default)]
pub struct KvArgs {
    map: HashMap<String, Option<String>>,
}

impl KvArgs {
    /// Returns the arguments of `#[name(...)]`, or `None` if the attribute is absent.
    ///
    /// `#[name]` without parentheses yields empty arguments.
    pub fn parse(attributes: &[venial::Attribute], name: &str) -> Option<Self> {
        let attr = find_attr(attributes, name)?;
        Some(Self::from_tokens(attr.value.get_value_tokens()))
    }

    fn from_tokens(tokens: &[TokenTree]) -> Self {
        let mut map = HashMap::new();

        for entry in split_top_level_commas(tokens) {
            let Some((TokenTree::Ident(key), rest)) = entry.split_first() else {
                continue;
            };

            let value = match rest.split_first() {
                Some((TokenTree::Punct(eq), value)) if eq.as_char() == '=' => {
                    Some(value_to_string(value))
                }
                _ => None,
            };

            map.insert(key.to_string(), value);
        }

        Self { map }
    }

    pub fn has(&self, key: &str) -> bool {
        self.map.contains_key(key)
    }

    pub fn value(&self, key: &str) -> Option<&str> {
        self.map.get(key)?.as_deref()
    }
}

fn split_top_level_commas(tokens: &[TokenTree]) -> Vec<&[TokenTree]> {
    tokens
        .split(|tt| matches!(tt, TokenTree::Punct(p) if p.as_char() == ','))
        .filter(|entry| !entry.is_empty())
        .collect()
}

fn value_to_string(tokens: &[TokenTree]) -> String {
    if let [single] = tokens {
        if let Ok(lit) = litrs::StringLit::try_from(single) {
            return lit.into_value();
        }
    }

    tokens.iter().cloned().collect::<TokenStream>().to_string()
}
