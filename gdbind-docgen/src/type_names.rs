/*
 * Copyright (c) godot-rust; Bromeon and contributors.
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

//! Maps Rust types as written in extension code to the type names shown in the class reference.

use proc_macro2::{TokenStream, TokenTree};
use quote::ToTokens;

pub fn engine_type_name(ty: &venial::TypeExpr) -> String {
    engine_type_name_of_tokens(ty.to_token_stream())
}

pub fn engine_type_name_of_tokens(tokens: TokenStream) -> String {
    let compact = strip_references(tokens)
        .to_string()
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>();

    map_type(&compact)
}

/// Drops `&`, `&mut` and lifetimes, which have no engine counterpart.
fn strip_references(tokens: TokenStream) -> TokenStream {
    let mut output = Vec::new();
    let mut iter = tokens.into_iter().peekable();

    while let Some(tt) = iter.next() {
        match &tt {
            TokenTree::Punct(p) if p.as_char() == '&' => continue,
            TokenTree::Punct(p) if p.as_char() == '\'' => {
                // Lifetime: skip the following identifier as well.
                iter.next();
                continue;
            }
            TokenTree::Ident(ident) if ident == "mut" || ident == "dyn" => continue,
            _ => output.push(tt),
        }
    }

    output.into_iter().collect()
}

fn map_type(ty: &str) -> String {
    if ty.is_empty() || ty == "()" {
        return "void".to_string();
    }

    let (path, args) = split_generics(ty);
    let name = path.rsplit("::").next().unwrap_or(path);

    let mapped = match name {
        "i8" | "i16" | "i32" | "i64" | "isize" | "u8" | "u16" | "u32" | "u64" | "usize" => "int",
        "f32" | "f64" | "real" => "float",
        "bool" => "bool",
        "String" | "GString" | "str" => "String",
        "VarArray" => "Array",
        "Dictionary" | "VarDictionary" => "Dictionary",

        // Wrappers that are transparent in the engine's type system.
        "Gd" | "Option" | "OnEditor" | "OnReady" | "Box" | "DynGd" => {
            return match args.first() {
                Some(inner) => map_type(inner),
                None => name.to_string(),
            };
        }

        "Array" | "Vec" => {
            return match args.first() {
                Some(inner) => format!("{}[]", map_type(inner)),
                None => "Array".to_string(),
            };
        }

        _ if name.starts_with('(') => "Variant",
        other => other,
    };

    mapped.to_string()
}

/// `Foo<A, B<C>>` -> (`Foo`, [`A`, `B<C>`]).
fn split_generics(ty: &str) -> (&str, Vec<&str>) {
    let Some(open) = ty.find('<') else {
        return (ty, Vec::new());
    };
    let Some(close) = ty.rfind('>') else {
        return (ty, Vec::new());
    };
    if close <= open {
        return (ty, Vec::new());
    }

    let path = ty[..open].trim_end_matches("::");
    let inner = &ty[open + 1..close];

    let mut args = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, c) in inner.char_indices() {
        match c {
            '<' | '(' | '[' => depth += 1,
            '>' | ')' | ']' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                args.push(&inner[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    if start < inner.len() {
        args.push(&inner[start..]);
    }

    (path, args)
}
