/*
 * Copyright (c) godot-rust; Bromeon and contributors.
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

//! Turns parsed items into documentation fragments.
//!
//! A class is spread over several items: the `#[derive(GodotClass)]` struct, any number of `#[godot_api] impl`
//! blocks, and possibly one `#[godot_api] impl ITrait for Class` block. Each produces a fragment keyed by the Rust
//! type name; fragments are combined in [`crate::generate()`].

use std::str::FromStr;

use gdbind_core::docs::{ClassDoc, ConstantDoc, MemberDoc, MethodDoc, ParamDoc, SignalDoc};
use proc_macro2::{TokenStream, TokenTree};
use quote::ToTokens;

use crate::attrs::{KvArgs, has_attr, has_derive, item_docs};
use crate::source::{ItemChunk, split_items};
use crate::type_names::{engine_type_name, engine_type_name_of_tokens};

/// Base class of `#[derive(GodotClass)]` structs without `#[class(base = ...)]`.
pub const DEFAULT_BASE: &str = "RefCounted";

/// Documentation found in a single source file.
#[derive(Debug, Default)]
pub struct FileDocs {
    pub structs: Vec<StructFragment>,
    pub impls: Vec<ImplFragment>,
    /// Items that looked relevant but could not be parsed.
    pub skipped: usize,
}

/// From `#[derive(GodotClass)] struct`.
#[derive(Debug)]
pub struct StructFragment {
    pub rust_name: String,
    /// Class name, members and description; method-like lists are empty.
    pub class: ClassDoc,
}

/// From `#[godot_api] impl`.
#[derive(Debug, Default)]
pub struct ImplFragment {
    pub rust_name: String,
    pub methods: Vec<MethodDoc>,
    pub signals: Vec<SignalDoc>,
    pub constants: Vec<ConstantDoc>,
}

/// Tokenizes `source` and extracts all class fragments, including those in inline modules.
///
/// `#[cfg(test)]` modules are ignored.
pub fn extract_file(source: &str) -> Result<FileDocs, proc_macro2::LexError> {
    let tokens = TokenStream::from_str(source)?;

    let mut docs = FileDocs::default();
    extract_tokens(tokens, &mut docs);
    Ok(docs)
}

fn extract_tokens(tokens: TokenStream, docs: &mut FileDocs) {
    for chunk in split_items(tokens) {
        if chunk.is_cfg_test() {
            continue;
        }

        if let Some(body) = chunk.module_body() {
            extract_tokens(body, docs);
            continue;
        }

        extract_chunk(chunk, docs);
    }
}

fn extract_chunk(chunk: ItemChunk, docs: &mut FileDocs) {
    if !matches!(chunk.keyword.as_deref(), Some("struct" | "impl")) {
        return;
    }

    let item = match venial::parse_item(chunk.tokens) {
        Ok(item) => item,
        Err(err) => {
            tracing::warn!(%err, "skipping item that could not be parsed");
            docs.skipped += 1;
            return;
        }
    };

    match item {
        venial::Item::Struct(class) if has_derive(&class.attributes, "GodotClass") => {
            docs.structs.push(document_struct(&class));
        }
        venial::Item::Impl(block) if has_attr(&block.attributes, "godot_api") => {
            if let Some(fragment) = document_impl(&block) {
                docs.impls.push(fragment);
            }
        }
        _ => {}
    }
}

// ----------------------------------------------------------------------------------------------------------------------------------------------
// Structs

fn document_struct(class: &venial::Struct) -> StructFragment {
    let rust_name = class.name.to_string();
    let args = KvArgs::parse(&class.attributes, "class").unwrap_or_default();

    let name = args.value("rename").unwrap_or(&rust_name).to_string();
    // `base = godot::classes::Node2D` names the class `Node2D`.
    let inherits = args
        .value("base")
        .map(last_path_segment)
        .unwrap_or(DEFAULT_BASE)
        .to_string();

    let docs = item_docs(&class.attributes);
    let (brief_description, description) = docs.brief_and_rest();

    let members = match &class.fields {
        venial::Fields::Named(named) => named
            .fields
            .iter()
            .filter_map(|(field, _punct)| document_field(field))
            .collect(),
        _ => Vec::new(),
    };

    StructFragment {
        rust_name,
        class: ClassDoc {
            name,
            inherits,
            brief_description,
            description,
            deprecated: docs.deprecated,
            experimental: docs.experimental,
            members,
            ..Default::default()
        },
    }
}

/// Only documented `#[var]`/`#[export]` fields become members.
fn document_field(field: &venial::NamedField) -> Option<MemberDoc> {
    let var = KvArgs::parse(&field.attributes, "var");
    let export = KvArgs::parse(&field.attributes, "export");
    if var.is_none() && export.is_none() {
        return None;
    }

    let ty = engine_type_name(&field.ty);
    if ty == "Base" {
        return None;
    }

    let docs = item_docs(&field.attributes);
    if docs.is_empty() {
        return None;
    }

    let name = var
        .as_ref()
        .and_then(|var| var.value("rename"))
        .map(str::to_string)
        .unwrap_or_else(|| field.name.to_string());

    let default = KvArgs::parse(&field.attributes, "init")
        .and_then(|init| init.value("val").map(str::to_string))
        .unwrap_or_default();

    Some(MemberDoc {
        name,
        ty,
        default,
        description: docs.description,
        deprecated: docs.deprecated,
        experimental: docs.experimental,
    })
}

// ----------------------------------------------------------------------------------------------------------------------------------------------
// Impl blocks

fn document_impl(block: &venial::Impl) -> Option<ImplFragment> {
    let Some(rust_name) = type_ident(&block.self_ty.to_token_stream()) else {
        tracing::warn!("#[godot_api] impl with unsupported self type, skipping");
        return None;
    };

    let mut fragment = ImplFragment {
        rust_name,
        ..Default::default()
    };

    let is_interface_impl = block.trait_ty.is_some();

    for member in &block.body_items {
        match member {
            venial::ImplMember::AssocFunction(function) if is_interface_impl => {
                if let Some(method) = document_virtual_method(function) {
                    fragment.methods.push(method);
                }
            }
            venial::ImplMember::AssocFunction(function) => {
                if has_attr(&function.attributes, "signal") {
                    fragment.signals.extend(document_signal(function));
                } else if let Some(func) = KvArgs::parse(&function.attributes, "func") {
                    fragment.methods.extend(document_method(function, &func));
                }
            }
            venial::ImplMember::AssocConstant(constant)
                if !is_interface_impl && has_attr(&constant.attributes, "constant") =>
            {
                fragment.constants.extend(document_constant(constant));
            }
            _ => {}
        }
    }

    Some(fragment)
}

fn document_method(function: &venial::Function, func: &KvArgs) -> Option<MethodDoc> {
    let docs = item_docs(&function.attributes);
    if docs.is_empty() {
        return None;
    }

    let name = func
        .value("rename")
        .map(str::to_string)
        .unwrap_or_else(|| function.name.to_string());

    let has_receiver = function
        .params
        .iter()
        .any(|(param, _punct)| matches!(param, venial::FnParam::Receiver(_)));

    Some(MethodDoc {
        name,
        qualifiers: if has_receiver { "" } else { "static" }.to_string(),
        return_type: return_type(function),
        params: document_params(&function.params),
        description: docs.description,
        deprecated: docs.deprecated,
        experimental: docs.experimental,
    })
}

fn document_virtual_method(function: &venial::Function) -> Option<MethodDoc> {
    let docs = item_docs(&function.attributes);
    if docs.is_empty() {
        return None;
    }

    if !docs.deprecated.is_empty() || !docs.experimental.is_empty() {
        tracing::warn!(
            method = %function.name,
            "virtual methods cannot be @deprecated or @experimental; ignoring annotation"
        );
    }

    Some(MethodDoc {
        name: format!("_{}", function.name),
        qualifiers: "virtual".to_string(),
        return_type: return_type(function),
        params: document_params(&function.params),
        description: docs.description,
        ..Default::default()
    })
}

fn document_signal(function: &venial::Function) -> Option<SignalDoc> {
    let docs = item_docs(&function.attributes);
    if docs.is_empty() {
        return None;
    }

    Some(SignalDoc {
        name: function.name.to_string(),
        params: document_params(&function.params),
        description: docs.description,
        deprecated: docs.deprecated,
        experimental: docs.experimental,
    })
}

fn document_constant(constant: &venial::Constant) -> Option<ConstantDoc> {
    let docs = item_docs(&constant.attributes);
    if docs.is_empty() {
        return None;
    }

    let value = constant
        .initializer
        .as_ref()
        .map(|x| x.to_token_stream().to_string())
        .unwrap_or_else(|| "null".to_string());

    Some(ConstantDoc {
        name: constant.name.to_string(),
        value,
        description: docs.description,
        deprecated: docs.deprecated,
        experimental: docs.experimental,
    })
}

fn document_params(params: &venial::Punctuated<venial::FnParam>) -> Vec<ParamDoc> {
    params
        .iter()
        .filter_map(|(param, _punct)| match param {
            venial::FnParam::Receiver(_) => None,
            venial::FnParam::Typed(p) => Some(ParamDoc {
                name: p.name.to_string(),
                ty: engine_type_name(&p.ty),
            }),
        })
        .collect()
}

fn return_type(function: &venial::Function) -> String {
    match &function.return_ty {
        Some(ty) => engine_type_name(ty),
        None => engine_type_name_of_tokens(TokenStream::new()),
    }
}

fn last_path_segment(path: &str) -> &str {
    path.rsplit("::").next().unwrap_or(path).trim()
}

/// Last identifier of a path type, ignoring generic arguments: `crate::game::Player<T>` -> `Player`.
fn type_ident(tokens: &TokenStream) -> Option<String> {
    let mut last = None;
    for tt in tokens.clone() {
        match tt {
            TokenTree::Ident(ident) => last = Some(ident.to_string()),
            TokenTree::Punct(p) if p.as_char() == '<' => break,
            TokenTree::Punct(p) if p.as_char() == ':' => {}
            _ => return None,
        }
    }
    last
}
