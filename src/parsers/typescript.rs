//! TypeScript/JavaScript extraction using tree-sitter
//!
//! Collects every import-like statement (static imports, re-exports, dynamic
//! `import()` and `require()`) and every top-level export, together with the
//! imported identifiers and named types each export's declaration refers to.

use super::{ExtractError, Extraction};
use crate::models::{ExportInfo, ExportKind};
use rustc_hash::FxHashSet;
use tree_sitter::{Language, Node, Parser};

/// Language-provided generic and utility types. Sharing these says nothing
/// about two files belonging together.
const BUILTIN_TYPES: &[&str] = &[
    "Array",
    "ReadonlyArray",
    "Promise",
    "PromiseLike",
    "Awaited",
    "Record",
    "Partial",
    "Required",
    "Readonly",
    "Pick",
    "Omit",
    "Exclude",
    "Extract",
    "NonNullable",
    "ReturnType",
    "Parameters",
    "InstanceType",
    "Map",
    "Set",
    "WeakMap",
    "WeakSet",
    "Date",
    "Error",
    "RegExp",
    "Function",
    "Object",
    "String",
    "Number",
    "Boolean",
    "Symbol",
    "Iterable",
    "Iterator",
    "AsyncIterable",
    "Generator",
    "AsyncGenerator",
];

/// Parse TypeScript/JavaScript source and extract imports and exports
pub fn parse_source(source: &str, ext: &str) -> Result<Extraction, ExtractError> {
    let language: Language = match ext {
        "tsx" => tree_sitter_typescript::LANGUAGE_TSX.into(),
        "js" | "jsx" | "mjs" | "cjs" => tree_sitter_javascript::LANGUAGE.into(),
        _ => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
    };

    let mut parser = Parser::new();
    parser.set_language(&language)?;

    let tree = parser.parse(source, None).ok_or(ExtractError::NoTree)?;
    let root = tree.root_node();
    if root.has_error() {
        return Err(ExtractError::Syntax {
            line: first_error_line(&root).unwrap_or(0),
        });
    }

    let source = source.as_bytes();
    let mut result = Extraction::default();
    let mut bindings = FxHashSet::default();

    collect_imports(&root, source, &mut result, &mut bindings);

    for child in root.named_children(&mut root.walk()) {
        if child.kind() == "export_statement" {
            extract_export_statement(&child, source, &bindings, &mut result.exports);
        }
    }

    Ok(result)
}

/// Line (1-based) of the first error or missing node
fn first_error_line(node: &Node) -> Option<usize> {
    if node.is_error() || node.is_missing() {
        return Some(node.start_position().row + 1);
    }
    for child in node.children(&mut node.walk()) {
        if child.has_error() {
            if let Some(line) = first_error_line(&child) {
                return Some(line);
            }
        }
    }
    None
}

/// Text of a string literal node without its quotes
fn string_value(node: &Node, source: &[u8]) -> Option<String> {
    let text = node.utf8_text(source).ok()?;
    let value = text
        .trim_start_matches(['"', '\'', '`'])
        .trim_end_matches(['"', '\'', '`']);
    Some(value.to_string())
}

/// Walk the whole tree for import-like constructs, recording local bindings
/// introduced by import statements along the way.
fn collect_imports(
    node: &Node,
    source: &[u8],
    result: &mut Extraction,
    bindings: &mut FxHashSet<String>,
) {
    match node.kind() {
        "import_statement" => {
            if let Some(value) = node
                .child_by_field_name("source")
                .and_then(|s| string_value(&s, source))
            {
                result.push_import(&value);
            }
            for child in node.named_children(&mut node.walk()) {
                match child.kind() {
                    "import_clause" => collect_import_bindings(&child, source, bindings),
                    "import_require_clause" => {
                        if let Some(ident) = child
                            .named_children(&mut child.walk())
                            .find(|c| c.kind() == "identifier")
                        {
                            if let Ok(name) = ident.utf8_text(source) {
                                bindings.insert(name.to_string());
                            }
                        }
                        if let Some(value) = child
                            .child_by_field_name("source")
                            .and_then(|s| string_value(&s, source))
                        {
                            result.push_import(&value);
                        }
                    }
                    _ => {}
                }
            }
            return;
        }
        "export_statement" => {
            if let Some(value) = node
                .child_by_field_name("source")
                .and_then(|s| string_value(&s, source))
            {
                result.push_import(&value);
            }
        }
        "call_expression" => {
            if let Some(target) = dynamic_import_target(node, source) {
                result.push_import(&target);
            }
        }
        _ => {}
    }

    for child in node.children(&mut node.walk()) {
        collect_imports(&child, source, result, bindings);
    }
}

/// Local names bound by `import a, { b as c } from ...` / `import * as ns from ...`
fn collect_import_bindings(clause: &Node, source: &[u8], bindings: &mut FxHashSet<String>) {
    for child in clause.named_children(&mut clause.walk()) {
        match child.kind() {
            "identifier" => {
                if let Ok(name) = child.utf8_text(source) {
                    bindings.insert(name.to_string());
                }
            }
            "namespace_import" => {
                if let Some(ident) = child
                    .named_children(&mut child.walk())
                    .find(|c| c.kind() == "identifier")
                {
                    if let Ok(name) = ident.utf8_text(source) {
                        bindings.insert(name.to_string());
                    }
                }
            }
            "named_imports" => {
                for spec in child.named_children(&mut child.walk()) {
                    if spec.kind() != "import_specifier" {
                        continue;
                    }
                    let local = spec
                        .child_by_field_name("alias")
                        .or_else(|| spec.child_by_field_name("name"));
                    if let Some(Ok(name)) = local.map(|n| n.utf8_text(source)) {
                        bindings.insert(name.to_string());
                    }
                }
            }
            _ => {}
        }
    }
}

/// Target of `import('x')` or `require('x')` when called with a string literal
fn dynamic_import_target(call: &Node, source: &[u8]) -> Option<String> {
    let function = call.child_by_field_name("function")?;
    let is_import = match function.kind() {
        "import" => true,
        "identifier" => function.utf8_text(source).ok()? == "require",
        _ => false,
    };
    if !is_import {
        return None;
    }

    let arguments = call.child_by_field_name("arguments")?;
    let first = arguments.named_children(&mut arguments.walk()).next()?;
    if first.kind() != "string" {
        return None;
    }
    string_value(&first, source)
}

/// Extract the exports declared by one `export ...` statement
fn extract_export_statement(
    stmt: &Node,
    source: &[u8],
    bindings: &FxHashSet<String>,
    exports: &mut Vec<ExportInfo>,
) {
    let is_default = stmt
        .children(&mut stmt.walk())
        .any(|c| c.kind() == "default");

    if let Some(mut decl) = stmt.child_by_field_name("declaration") {
        // `export declare function f(): void;`
        if decl.kind() == "ambient_declaration" {
            match decl.named_children(&mut decl.walk()).next() {
                Some(inner) => decl = inner,
                None => return,
            }
        }

        match decl.kind() {
            "lexical_declaration" | "variable_declaration" => {
                for declarator in decl.named_children(&mut decl.walk()) {
                    if declarator.kind() != "variable_declarator" {
                        continue;
                    }
                    let Some(name_node) = declarator.child_by_field_name("name") else {
                        continue;
                    };
                    if name_node.kind() != "identifier" {
                        continue;
                    }
                    let Ok(name) = name_node.utf8_text(source) else {
                        continue;
                    };
                    let kind = if is_default {
                        ExportKind::Default
                    } else {
                        ExportKind::Const
                    };
                    exports.push(build_export(name, kind, &declarator, source, bindings));
                }
            }
            kind => {
                let Some(export_kind) = declaration_kind(kind) else {
                    return;
                };
                let name = decl
                    .child_by_field_name("name")
                    .and_then(|n| n.utf8_text(source).ok());
                let (name, export_kind) = match (is_default, name) {
                    (true, Some(name)) => (name, ExportKind::Default),
                    (true, None) => ("default", ExportKind::Default),
                    (false, Some(name)) => (name, export_kind),
                    (false, None) => return,
                };
                exports.push(build_export(name, export_kind, &decl, source, bindings));
            }
        }
        return;
    }

    if let Some(value) = stmt.child_by_field_name("value") {
        // `export default function handler() {}` may surface as a named expression
        let name = match value.kind() {
            "function_expression" | "function" | "generator_function" | "class" => value
                .child_by_field_name("name")
                .and_then(|n| n.utf8_text(source).ok()),
            _ => None,
        };
        exports.push(build_export(
            name.unwrap_or("default"),
            ExportKind::Default,
            &value,
            source,
            bindings,
        ));
        return;
    }

    for child in stmt.named_children(&mut stmt.walk()) {
        match child.kind() {
            "export_clause" => {
                for spec in child.named_children(&mut child.walk()) {
                    if spec.kind() != "export_specifier" {
                        continue;
                    }
                    let exported = spec
                        .child_by_field_name("alias")
                        .or_else(|| spec.child_by_field_name("name"));
                    if let Some(Ok(name)) = exported.map(|n| n.utf8_text(source)) {
                        let kind = if name == "default" {
                            ExportKind::Default
                        } else {
                            ExportKind::Const
                        };
                        exports.push(ExportInfo::new(name, kind));
                    }
                }
            }
            // `export * as ns from './x'`
            "namespace_export" => {
                if let Some(ident) = child
                    .named_children(&mut child.walk())
                    .find(|c| c.kind() == "identifier")
                {
                    if let Ok(name) = ident.utf8_text(source) {
                        exports.push(ExportInfo::new(name, ExportKind::Const));
                    }
                }
            }
            _ => {}
        }
    }
}

fn declaration_kind(node_kind: &str) -> Option<ExportKind> {
    match node_kind {
        "function_declaration" | "generator_function_declaration" | "function_signature" => {
            Some(ExportKind::Function)
        }
        "class_declaration" | "abstract_class_declaration" | "class" => Some(ExportKind::Class),
        "type_alias_declaration" | "enum_declaration" => Some(ExportKind::Type),
        "interface_declaration" => Some(ExportKind::Interface),
        "internal_module" | "module" => Some(ExportKind::Const),
        _ => None,
    }
}

fn build_export(
    name: &str,
    kind: ExportKind,
    body: &Node,
    source: &[u8],
    bindings: &FxHashSet<String>,
) -> ExportInfo {
    let mut refs = References::default();
    refs.collect(body, source, bindings);

    let mut export = ExportInfo::new(name, kind);
    export.imports = refs.imports;
    export.type_references = refs
        .types
        .into_iter()
        .filter(|t| t != name && !refs.type_params.contains(t))
        .collect();
    export
}

/// Identifiers and types referenced inside one declaration
#[derive(Default)]
struct References {
    imports: Vec<String>,
    types: Vec<String>,
    type_params: FxHashSet<String>,
}

impl References {
    fn collect(&mut self, node: &Node, source: &[u8], bindings: &FxHashSet<String>) {
        match node.kind() {
            "identifier" | "type_identifier" | "shorthand_property_identifier" => {
                if let Ok(text) = node.utf8_text(source) {
                    if bindings.contains(text) && !self.imports.iter().any(|i| i == text) {
                        self.imports.push(text.to_string());
                    }
                    if node.kind() == "type_identifier"
                        && !BUILTIN_TYPES.contains(&text)
                        && !self.types.iter().any(|t| t == text)
                    {
                        self.types.push(text.to_string());
                    }
                }
            }
            "type_parameter" => {
                if let Some(Ok(param)) = node
                    .child_by_field_name("name")
                    .map(|n| n.utf8_text(source))
                {
                    self.type_params.insert(param.to_string());
                }
            }
            _ => {}
        }

        for child in node.children(&mut node.walk()) {
            self.collect(&child, source, bindings);
        }
    }
}
