/*
 * Copyright (c) godot-rust; Bromeon and contributors.
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

//! Finding source files and cutting them into items.
//!
//! `venial` parses exactly one item at a time, so a file's token stream is first split at item boundaries.

use std::path::{Path, PathBuf};

use proc_macro2::{Delimiter, TokenStream, TokenTree};
use walkdir::WalkDir;

use crate::DocgenError;

/// Returns all `*.rs` files below `root`, sorted for deterministic output.
///
/// Hidden directories and `target` directories are skipped.
pub fn discover_sources(root: &Path) -> Result<Vec<PathBuf>, DocgenError> {
    if !root.is_dir() {
        return Err(DocgenError::MissingSourceDir(root.to_path_buf()));
    }

    let walker = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| {
            // Never filter the root itself, even if it is called `target` or `.something`.
            if entry.depth() == 0 || !entry.file_type().is_dir() {
                return true;
            }
            let name = entry.file_name().to_string_lossy();
            !name.starts_with('.') && name != "target"
        });

    let mut files = Vec::new();
    for entry in walker {
        let entry = entry.map_err(|source| DocgenError::Walk {
            path: root.to_path_buf(),
            source,
        })?;

        let path = entry.path();
        if entry.file_type().is_file() && path.extension().is_some_and(|ext| ext == "rs") {
            files.push(path.to_path_buf());
        }
    }

    Ok(files)
}

/// One top-level item of a source file, still unparsed.
#[derive(Clone, Debug)]
pub struct ItemChunk {
    /// The item keyword (`struct`, `impl`, `mod`, ...), if one was found.
    pub keyword: Option<String>,
    pub tokens: TokenStream,
}

impl ItemChunk {
    /// For `mod name { ... }`: the tokens inside the braces.
    pub fn module_body(&self) -> Option<TokenStream> {
        if self.keyword.as_deref() != Some("mod") {
            return None;
        }

        match self.tokens.clone().into_iter().last()? {
            TokenTree::Group(group) if group.delimiter() == Delimiter::Brace => Some(group.stream()),
            _ => None,
        }
    }

    /// True if the item carries `#[cfg(test)]`.
    pub fn is_cfg_test(&self) -> bool {
        let mut iter = self.tokens.clone().into_iter();
        while let Some(tt) = iter.next() {
            match tt {
                TokenTree::Punct(p) if p.as_char() == '#' => {}
                TokenTree::Group(group) if group.delimiter() == Delimiter::Bracket => {
                    let text = group.stream().to_string().replace(' ', "");
                    if text == "cfg(test)" {
                        return true;
                    }
                }
                // Attributes always come first.
                _ => return false,
            }
        }
        false
    }
}

const ITEM_KEYWORDS: &[&str] = &[
    "struct",
    "enum",
    "union",
    "impl",
    "trait",
    "fn",
    "mod",
    "const",
    "static",
    "use",
    "type",
    "extern",
    "macro_rules",
];

/// Items of these kinds end at `;`, even if they contain braces (`use a::{b, c};`, `const X: S = S { .. };`).
const SEMICOLON_KEYWORDS: &[&str] = &["const", "static", "use", "type"];

/// Splits the tokens of a file (or module body) into top-level items.
///
/// An item ends at a top-level `;`, or at a top-level `{ ... }` group unless it is a semicolon-terminated kind.
/// Brace-bodied macro calls (`thread_local! { ... }`) form chunks without keyword. Every chunk holds at most one item.
/// Inner attributes such as `//!` docs are dropped.
pub fn split_items(tokens: TokenStream) -> Vec<ItemChunk> {
    let mut chunks = Vec::new();

    let mut current: Vec<TokenTree> = Vec::new();
    let mut keyword: Option<String> = None;
    let mut semicolon_only = false;

    let mut iter = tokens.into_iter().peekable();
    while let Some(tt) = iter.next() {
        // Inner attribute `#![...]` before any item tokens.
        if current.is_empty() && is_punct(&tt, '#') {
            if let Some(next) = iter.peek() {
                if is_punct(next, '!') {
                    iter.next();
                    iter.next(); // [...]
                    continue;
                }
            }
        }

        let ends_item = match &tt {
            TokenTree::Punct(p) if p.as_char() == ';' => true,
            // Without a keyword, this is a macro call such as `thread_local! { ... }`, which ends at its body.
            TokenTree::Group(group) if group.delimiter() == Delimiter::Brace => !semicolon_only,
            TokenTree::Ident(ident) => {
                let name = ident.to_string();
                if keyword.is_none() && ITEM_KEYWORDS.contains(&name.as_str()) {
                    semicolon_only = SEMICOLON_KEYWORDS.contains(&name.as_str());
                    keyword = Some(name);
                } else if name == "fn" && semicolon_only && follows_fn_qualifier(&current) {
                    // `const fn`, `const unsafe fn`, `const extern "C" fn`.
                    semicolon_only = false;
                    keyword = Some(name);
                }
                false
            }
            _ => false,
        };

        current.push(tt);

        if ends_item {
            chunks.push(ItemChunk {
                keyword: keyword.take(),
                tokens: current.drain(..).collect(),
            });
            semicolon_only = false;
        }
    }

    if !current.is_empty() {
        tracing::debug!(
            tokens = current.len(),
            "ignoring trailing tokens without item terminator"
        );
    }

    chunks
}

/// Distinguishes `const fn f()` from a function pointer type such as `const F: fn() = f;`.
fn follows_fn_qualifier(current: &[TokenTree]) -> bool {
    match current.last() {
        Some(TokenTree::Ident(ident)) => {
            ident == "const" || ident == "unsafe" || ident == "async" || ident == "extern"
        }
        Some(TokenTree::Literal(_)) => true,
        _ => false,
    }
}

fn is_punct(tt: &TokenTree, c: char) -> bool {
    match tt {
        TokenTree::Punct(punct) => punct.as_char() == c,
        _ => false,
    }
}
