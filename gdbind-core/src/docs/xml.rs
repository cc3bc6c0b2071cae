/*
 * Copyright (c) godot-rust; Bromeon and contributors.
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

//! Godot class reference XML, the format read by the editor help.
//!
//! The library documentation file is a sequence of such class documents, one per class.

use std::borrow::Cow;
use std::fmt::Write;

use roxmltree::Node;

use super::DocsError;
use super::model::{
    ClassDoc, ConstantDoc, DOCS_FORMAT_VERSION, LibraryDocs, MemberDoc, MethodDoc, ParamDoc,
    SignalDoc,
};

pub fn xml_escape(value: &str) -> Cow<'_, str> {
    // Most strings have no special characters, so this check helps avoid unnecessary string copying.
    if !value.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(value);
    }

    let mut result = String::with_capacity(value.len());

    for c in value.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#39;"),
            c => result.push(c),
        }
    }

    Cow::Owned(result)
}

/// Produces one complete XML document for `class`.
pub fn class_to_xml(class: &ClassDoc, version: &str) -> String {
    let mut methods: Vec<&MethodDoc> = class.methods.iter().collect();
    methods.sort_by(|a, b| a.name.cmp(&b.name));
    let mut signals: Vec<&SignalDoc> = class.signals.iter().collect();
    signals.sort_by(|a, b| a.name.cmp(&b.name));
    let mut constants: Vec<&ConstantDoc> = class.constants.iter().collect();
    constants.sort_by(|a, b| a.name.cmp(&b.name));

    let methods_block = wrap_in_xml_block("methods", methods.into_iter().map(format_method_xml));
    let members_block = wrap_in_xml_block("members", class.members.iter().map(format_member_xml));
    let signals_block = wrap_in_xml_block("signals", signals.into_iter().map(format_signal_xml));
    let constants_block =
        wrap_in_xml_block("constants", constants.into_iter().map(format_constant_xml));

    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<class name="{name}" inherits="{inherits}" version="{version}"{deprecated}{experimental} xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance" xsi:noNamespaceSchemaLocation="../class.xsd">
<brief_description>{brief}</brief_description>
<description>{description}</description>
{methods_block}{members_block}{signals_block}{constants_block}</class>"#,
        name = xml_escape(&class.name),
        inherits = xml_escape(&class.inherits),
        version = xml_escape(version),
        deprecated = xml_attribute("deprecated", &class.deprecated),
        experimental = xml_attribute("experimental", &class.experimental),
        brief = xml_escape(&class.brief_description),
        description = xml_escape(&class.description),
    )
}

fn wrap_in_xml_block(tag: &str, elements: impl Iterator<Item = String>) -> String {
    let content = String::from_iter(elements);

    if content.is_empty() {
        String::new()
    } else {
        format!("<{tag}>\n{content}</{tag}>\n")
    }
}

/// Mind the whitespace before the attribute; empty values produce no attribute at all.
fn xml_attribute(attribute: &str, value: &str) -> String {
    if value.is_empty() {
        String::new()
    } else {
        format!(r#" {attribute}="{}""#, xml_escape(value))
    }
}

fn format_params_xml(params: &[ParamDoc]) -> String {
    let mut output = String::new();
    for (index, param) in params.iter().enumerate() {
        // Writing to a String cannot fail.
        let _ = writeln!(
            output,
            r#"<param index="{index}" name="{name}" type="{ty}" />"#,
            name = xml_escape(&param.name),
            ty = xml_escape(&param.ty),
        );
    }
    output
}

fn format_method_xml(method: &MethodDoc) -> String {
    let return_ty = if method.return_type.is_empty() {
        "void"
    } else {
        &method.return_type
    };

    format!(
        r#"<method name="{name}"{qualifiers}{deprecated}{experimental}>
<return type="{return_ty}" />
{params}<description>{description}</description>
</method>
"#,
        name = xml_escape(&method.name),
        qualifiers = xml_attribute("qualifiers", &method.qualifiers),
        deprecated = xml_attribute("deprecated", &method.deprecated),
        experimental = xml_attribute("experimental", &method.experimental),
        return_ty = xml_escape(return_ty),
        params = format_params_xml(&method.params),
        description = xml_escape(&method.description),
    )
}

fn format_member_xml(member: &MemberDoc) -> String {
    format!(
        r#"<member name="{name}" type="{ty}"{default}{deprecated}{experimental}>{description}</member>
"#,
        name = xml_escape(&member.name),
        ty = xml_escape(&member.ty),
        default = xml_attribute("default", &member.default),
        deprecated = xml_attribute("deprecated", &member.deprecated),
        experimental = xml_attribute("experimental", &member.experimental),
        description = xml_escape(&member.description),
    )
}

fn format_signal_xml(signal: &SignalDoc) -> String {
    format!(
        r#"<signal name="{name}"{deprecated}{experimental}>
{params}<description>{description}</description>
</signal>
"#,
        name = xml_escape(&signal.name),
        deprecated = xml_attribute("deprecated", &signal.deprecated),
        experimental = xml_attribute("experimental", &signal.experimental),
        params = format_params_xml(&signal.params),
        description = xml_escape(&signal.description),
    )
}

fn format_constant_xml(constant: &ConstantDoc) -> String {
    format!(
        r#"<constant name="{name}" value="{value}"{deprecated}{experimental}>{description}</constant>
"#,
        name = xml_escape(&constant.name),
        value = xml_escape(&constant.value),
        deprecated = xml_attribute("deprecated", &constant.deprecated),
        experimental = xml_attribute("experimental", &constant.experimental),
        description = xml_escape(&constant.description),
    )
}

// ----------------------------------------------------------------------------------------------------------------------------------------------
// Library documentation file

/// All class documents of `library`, one after the other.
pub fn library_to_xml(library: &LibraryDocs) -> String {
    let version = if library.version.is_empty() {
        DOCS_FORMAT_VERSION
    } else {
        library.version.as_str()
    };

    library
        .classes
        .iter()
        .map(|class| class_to_xml(class, version))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Reads a sequence of class documents as written by [`library_to_xml()`].
///
/// The library version is taken from the first class. Unknown elements and attributes are ignored.
pub fn library_from_xml(xml: &str) -> Result<LibraryDocs, DocsError> {
    // Each class document carries its own declaration; a single synthetic root makes the sequence well-formed.
    let mut body = String::with_capacity(xml.len() + 32);
    body.push_str("<library>");

    let mut rest = xml.trim_start_matches('\u{feff}');
    while let Some(start) = rest.find("<?xml") {
        body.push_str(&rest[..start]);

        let Some(end) = rest[start..].find("?>") else {
            return Err(DocsError::Xml {
                message: "unterminated XML declaration".to_string(),
            });
        };
        rest = &rest[start + end + 2..];
    }
    body.push_str(rest);
    body.push_str("</library>");

    let document = roxmltree::Document::parse(&body).map_err(|err| DocsError::Xml {
        message: err.to_string(),
    })?;

    let class_nodes: Vec<Node> = document
        .root_element()
        .children()
        .filter(|node| node.has_tag_name("class"))
        .collect();

    let version = class_nodes
        .first()
        .and_then(|class| class.attribute("version"))
        .unwrap_or(DOCS_FORMAT_VERSION)
        .to_string();

    Ok(LibraryDocs {
        version,
        classes: class_nodes.into_iter().map(parse_class).collect(),
    })
}

fn parse_class(node: Node) -> ClassDoc {
    ClassDoc {
        name: attribute(node, "name"),
        inherits: attribute(node, "inherits"),
        brief_description: child_text(node, "brief_description"),
        description: child_text(node, "description"),
        deprecated: attribute(node, "deprecated"),
        experimental: attribute(node, "experimental"),
        methods: block_items(node, "methods", "method")
            .map(parse_method)
            .collect(),
        members: block_items(node, "members", "member")
            .map(|member| MemberDoc {
                name: attribute(member, "name"),
                ty: attribute(member, "type"),
                default: attribute(member, "default"),
                description: text(member),
                deprecated: attribute(member, "deprecated"),
                experimental: attribute(member, "experimental"),
            })
            .collect(),
        signals: block_items(node, "signals", "signal")
            .map(|signal| SignalDoc {
                name: attribute(signal, "name"),
                params: parse_params(signal),
                description: child_text(signal, "description"),
                deprecated: attribute(signal, "deprecated"),
                experimental: attribute(signal, "experimental"),
            })
            .collect(),
        constants: block_items(node, "constants", "constant")
            .map(|constant| ConstantDoc {
                name: attribute(constant, "name"),
                value: attribute(constant, "value"),
                description: text(constant),
                deprecated: attribute(constant, "deprecated"),
                experimental: attribute(constant, "experimental"),
            })
            .collect(),
    }
}

fn parse_method(node: Node) -> MethodDoc {
    let return_type = node
        .children()
        .find(|child| child.has_tag_name("return"))
        .map(|ret| attribute(ret, "type"))
        .unwrap_or_default();

    MethodDoc {
        name: attribute(node, "name"),
        qualifiers: attribute(node, "qualifiers"),
        return_type,
        params: parse_params(node),
        description: child_text(node, "description"),
        deprecated: attribute(node, "deprecated"),
        experimental: attribute(node, "experimental"),
    }
}

fn parse_params(node: Node) -> Vec<ParamDoc> {
    node.children()
        .filter(|child| child.has_tag_name("param"))
        .map(|param| ParamDoc {
            name: attribute(param, "name"),
            ty: attribute(param, "type"),
        })
        .collect()
}

/// Elements `<item>` inside `<block>`, e.g. all `<method>`s of `<methods>`.
fn block_items<'a, 'input>(
    node: Node<'a, 'input>,
    block: &'static str,
    item: &'static str,
) -> impl Iterator<Item = Node<'a, 'input>> {
    node.children()
        .filter(move |child| child.has_tag_name(block))
        .flat_map(move |container| {
            container
                .children()
                .filter(move |child| child.has_tag_name(item))
        })
}

fn attribute(node: Node, name: &str) -> String {
    node.attribute(name).unwrap_or_default().to_string()
}

fn text(node: Node) -> String {
    node.text().unwrap_or_default().to_string()
}

fn child_text(node: Node, tag: &str) -> String {
    node.children()
        .find(|child| child.has_tag_name(tag))
        .map(text)
        .unwrap_or_default()
}
