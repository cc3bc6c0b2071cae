/*
 * Copyright (c) godot-rust; Bromeon and contributors.
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

//! Converts [Markdown](https://en.wikipedia.org/wiki/Markdown) to [BBCode](https://en.wikipedia.org/wiki/BBCode),
//! the markup understood by the editor's class reference.

use std::collections::HashMap;

use markdown::mdast::Node;
use markdown::{ParseOptions, to_mdast};

/// Paragraph separator in the generated BBCode.
pub const PARAGRAPH_BREAK: &str = "[br][br]";

pub fn to_bbcode(md: &str) -> String {
    let root = match to_mdast(md, &ParseOptions::gfm()) {
        Ok(root) => root,
        Err(err) => {
            // Only MDX constructs can fail to parse; GFM input always yields a tree.
            tracing::warn!(%err, "doc comment is not valid Markdown, keeping it verbatim");
            return md.trim().to_string();
        }
    };

    let definitions = root
        .children()
        .map(|children| {
            children
                .iter()
                .filter_map(|n| match n {
                    Node::Definition(definition) => {
                        Some((&*definition.identifier, &*definition.url))
                    }
                    _ => None,
                })
                .collect::<HashMap<_, _>>()
        })
        .unwrap_or_default();

    walk_node(&root, &definitions).unwrap_or_default()
}

fn walk_node(node: &Node, definitions: &HashMap<&str, &str>) -> Option<String> {
    use Node::*;
    let bbcode = match node {
        Root(root) => walk_nodes(&root.children, definitions, PARAGRAPH_BREAK),
        InlineCode(markdown::mdast::InlineCode { value, .. }) => format!("[code]{value}[/code]"),
        Delete(delete) => format!("[s]{}[/s]", walk_nodes(&delete.children, definitions, "")),
        Emphasis(emphasis) => format!("[i]{}[/i]", walk_nodes(&emphasis.children, definitions, "")),
        Image(markdown::mdast::Image { url, .. }) => format!("[img]{url}[/img]",),
        ImageReference(image) => match definitions.get(&*image.identifier) {
            Some(url) => format!("[img]{url}[/img]"),
            None => image.alt.clone(),
        },
        Link(markdown::mdast::Link { url, children, .. }) => {
            format!("[url={url}]{}[/url]", walk_nodes(children, definitions, ""))
        }
        LinkReference(markdown::mdast::LinkReference {
            identifier,
            children,
            ..
        }) => {
            let text = walk_nodes(children, definitions, "");
            match definitions.get(&**identifier) {
                Some(url) => format!("[url={url}]{text}[/url]"),
                // Intra-doc links such as [`Player`] have no definition; keep their text.
                None => text,
            }
        }
        Strong(strong) => format!("[b]{}[/b]", walk_nodes(&strong.children, definitions, "")),
        Text(text) => text.value.clone(),
        Break(_) => "[br]".into(),
        Code(markdown::mdast::Code { value, lang, .. }) => match lang {
            Some(lang) => format!("[codeblock lang={lang}]{value}[/codeblock]"),
            None => format!("[codeblock]{value}[/codeblock]"),
        },
        Paragraph(paragraph) => walk_nodes(&paragraph.children, definitions, ""),
        // BBCode supports lists, but the class reference does not.
        List(_) | Blockquote(_) | FootnoteReference(_) | FootnoteDefinition(_) | Table(_) => {
            "".into()
        }
        Definition(_) => return None,
        Html(html) => html.value.clone(),
        _ => walk_nodes(node.children()?, definitions, ""),
    };
    Some(bbcode)
}

/// Calls [`walk_node`] over every node it is given, joining the non-empty results with the supplied separator.
fn walk_nodes(nodes: &[Node], definitions: &HashMap<&str, &str>, separator: &str) -> String {
    nodes
        .iter()
        .filter_map(|n| walk_node(n, definitions))
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(separator)
}
