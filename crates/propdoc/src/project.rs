//! deno_ast-backed type-query engine
//!
//! [`SwcProject`] loads TypeScript sources, indexes their top-level type
//! aliases and interfaces by name, and resolves the property list of a
//! declared type syntactically. Resolution follows:
//!
//! - type literals and interface bodies (own members, then `extends`)
//! - intersections, left to right
//! - unions (properties common to every member)
//! - parenthesized types
//! - references to other indexed types, preferring the referencing file
//! - `Pick`, `Omit`, `Partial`, `Required` and `Readonly`
//!
//! Anything else (mapped types, conditional types, external library types)
//! contributes no properties. When the same name is reached twice, the
//! first occurrence wins, which matches how an intersection exposes a
//! property in the order it first appears.

use crate::decl::Declaration;
use crate::diagnostics::{PropdocError, Result};
use crate::parser::{extract_declarations, find_type_decl, type_decls, TypeDeclRef};
use crate::query::{PropertySymbol, TypeQuery};
use crate::utils::swc::{
    collapse_whitespace, expr_to_name, parse_typescript_file, parse_typescript_source,
    wtf8_to_string, ParsedModule,
};
use deno_ast::swc::ast as swc_ast;
use deno_ast::swc::common::{Span, Spanned};
use indexmap::IndexMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, trace};

/// Maximum reference depth followed while resolving a type
const MAX_DEPTH: usize = 32;

type PropList = IndexMap<String, PropertySymbol>;

/// A set of parsed TypeScript files answering [`TypeQuery`] requests
#[derive(Debug, Default)]
pub struct SwcProject {
    /// Parsed files keyed by absolute path, in load order
    files: IndexMap<PathBuf, ParsedModule>,
    /// Type name to the first file declaring it
    index: IndexMap<String, PathBuf>,
}

impl SwcProject {
    /// Create an empty project
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a file from disk and add it to the project
    pub fn add_source_file(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let parsed = parse_typescript_file(path)?;
        self.insert(parsed);
        Ok(())
    }

    /// Parse in-memory source text and add it to the project
    pub fn add_source(&mut self, path: impl AsRef<Path>, text: impl Into<Arc<str>>) -> Result<()> {
        let parsed = parse_typescript_source(path, text)?;
        self.insert(parsed);
        Ok(())
    }

    /// Check whether a file is loaded
    pub fn contains(&self, path: &Path) -> bool {
        self.get(path).is_some()
    }

    /// Number of loaded files
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Whether no file is loaded
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    fn insert(&mut self, parsed: ParsedModule) {
        let path = parsed.path().to_path_buf();
        for decl in type_decls(&parsed) {
            self.index.entry(decl.name()).or_insert_with(|| path.clone());
        }
        trace!(path = %path.display(), "indexed source file");
        self.files.insert(path, parsed);
    }

    fn get(&self, path: &Path) -> Option<&ParsedModule> {
        if let Some(parsed) = self.files.get(path) {
            return Some(parsed);
        }
        let absolute = std::path::absolute(path).ok()?;
        self.files.get(&absolute)
    }

    /// Find a named type, looking in the referencing file first
    fn lookup<'a>(&'a self, name: &str, from: &'a ParsedModule) -> Option<(&'a ParsedModule, TypeDeclRef<'a>)> {
        if let Some(decl) = find_type_decl(from, name) {
            return Some((from, decl));
        }
        let parsed = self.files.get(self.index.get(name)?)?;
        find_type_decl(parsed, name).map(|decl| (parsed, decl))
    }

    fn collect_decl(&self, parsed: &ParsedModule, decl: TypeDeclRef<'_>, depth: usize, out: &mut PropList) {
        match decl {
            TypeDeclRef::Alias(alias) => self.collect_type(parsed, &alias.type_ann, depth, out),
            TypeDeclRef::Interface(iface) => {
                collect_members(parsed, &iface.body.body, out);
                for parent in &iface.extends {
                    if let swc_ast::Expr::Ident(ident) = parent.expr.as_ref() {
                        let args = parent
                            .type_args
                            .as_ref()
                            .map(|a| a.params.as_slice())
                            .unwrap_or_default();
                        self.collect_named(parsed, &ident.sym, args, depth + 1, out);
                    }
                }
            }
        }
    }

    fn collect_type(&self, parsed: &ParsedModule, ty: &swc_ast::TsType, depth: usize, out: &mut PropList) {
        if depth > MAX_DEPTH {
            debug!(path = %parsed.path().display(), "type resolution depth exceeded");
            return;
        }

        match ty {
            swc_ast::TsType::TsTypeLit(lit) => collect_members(parsed, &lit.members, out),
            swc_ast::TsType::TsParenthesizedType(paren) => {
                self.collect_type(parsed, &paren.type_ann, depth, out)
            }
            swc_ast::TsType::TsUnionOrIntersectionType(union_inter) => match union_inter {
                swc_ast::TsUnionOrIntersectionType::TsIntersectionType(i) => {
                    for member in &i.types {
                        self.collect_type(parsed, member, depth + 1, out);
                    }
                }
                swc_ast::TsUnionOrIntersectionType::TsUnionType(u) => {
                    let lists: Vec<PropList> = u
                        .types
                        .iter()
                        .map(|member| {
                            let mut list = PropList::new();
                            self.collect_type(parsed, member, depth + 1, &mut list);
                            list
                        })
                        .collect();
                    if let Some((first, rest)) = lists.split_first() {
                        for (name, symbol) in first {
                            if rest.iter().all(|list| list.contains_key(name)) {
                                merge(out, symbol.clone());
                            }
                        }
                    }
                }
            },
            swc_ast::TsType::TsTypeRef(type_ref) => {
                let swc_ast::TsEntityName::Ident(ident) = &type_ref.type_name else {
                    return;
                };
                let args = type_ref
                    .type_params
                    .as_ref()
                    .map(|p| p.params.as_slice())
                    .unwrap_or_default();
                self.collect_named(parsed, &ident.sym, args, depth + 1, out);
            }
            _ => {}
        }
    }

    fn collect_named(
        &self,
        parsed: &ParsedModule,
        name: &str,
        args: &[Box<swc_ast::TsType>],
        depth: usize,
        out: &mut PropList,
    ) {
        match name {
            "Partial" | "Required" | "Readonly" => {
                if let Some(inner) = args.first() {
                    self.collect_type(parsed, inner, depth, out);
                }
            }
            "Pick" | "Omit" => {
                let (Some(inner), Some(keys)) = (args.first(), args.get(1)) else {
                    return;
                };
                let keys = literal_keys(keys);
                let mut list = PropList::new();
                self.collect_type(parsed, inner, depth, &mut list);
                let keep_listed = name == "Pick";
                for (key, symbol) in list {
                    if keys.contains(&key) == keep_listed {
                        merge(out, symbol);
                    }
                }
            }
            _ => match self.lookup(name, parsed) {
                Some((decl_parsed, decl)) => self.collect_decl(decl_parsed, decl, depth, out),
                None => trace!(name, "unresolved type reference"),
            },
        }
    }
}

impl TypeQuery for SwcProject {
    fn declarations(&self, file: &Path) -> Result<Vec<Declaration>> {
        let parsed = self
            .get(file)
            .ok_or_else(|| PropdocError::FileNotFound(file.to_path_buf()))?;
        Ok(extract_declarations(parsed))
    }

    fn properties(&self, decl: &Declaration) -> Result<Vec<PropertySymbol>> {
        let parsed = self
            .get(&decl.file)
            .ok_or_else(|| PropdocError::FileNotFound(decl.file.clone()))?;
        let type_decl = find_type_decl(parsed, &decl.name).ok_or_else(|| {
            PropdocError::parse(&decl.file, format!("type `{}` is not declared here", decl.name))
        })?;

        let mut out = PropList::new();
        self.collect_decl(parsed, type_decl, 0, &mut out);
        Ok(out.into_values().collect())
    }
}

/// Whether a path names a TypeScript source file
pub fn is_typescript_path(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("ts") | Some("tsx")
    )
}

fn merge(out: &mut PropList, symbol: PropertySymbol) {
    out.entry(symbol.name.clone()).or_insert(symbol);
}

fn collect_members(parsed: &ParsedModule, members: &[swc_ast::TsTypeElement], out: &mut PropList) {
    for member in members {
        let symbol = match member {
            swc_ast::TsTypeElement::TsPropertySignature(prop) => {
                if prop.computed {
                    continue;
                }
                let Some(name) = expr_to_name(&prop.key) else {
                    continue;
                };
                let type_text = prop
                    .type_ann
                    .as_ref()
                    .map(|t| collapse_whitespace(parsed.text_for_span(t.type_ann.span())))
                    .unwrap_or_else(|| "any".to_string());
                PropertySymbol {
                    name,
                    docs: parsed.jsdoc_blocks_for_span(prop.span),
                    type_text,
                }
            }
            swc_ast::TsTypeElement::TsMethodSignature(method) => {
                if method.computed {
                    continue;
                }
                let Some(name) = expr_to_name(&method.key) else {
                    continue;
                };
                let params: Vec<String> = method
                    .params
                    .iter()
                    .map(|p| param_text(parsed, p))
                    .collect();
                let return_text = method
                    .type_ann
                    .as_ref()
                    .map(|t| collapse_whitespace(parsed.text_for_span(t.type_ann.span())))
                    .unwrap_or_else(|| "void".to_string());
                PropertySymbol {
                    name,
                    docs: parsed.jsdoc_blocks_for_span(method.span),
                    type_text: format!("({}) => {}", params.join(", "), return_text),
                }
            }
            _ => continue,
        };
        merge(out, symbol);
    }
}

/// Display text of a method signature parameter, type annotation included
fn param_text(parsed: &ParsedModule, param: &swc_ast::TsFnParam) -> String {
    let (span, type_ann) = match param {
        swc_ast::TsFnParam::Ident(binding) => {
            let mut text = binding.id.sym.to_string();
            if binding.id.optional {
                text.push('?');
            }
            return match &binding.type_ann {
                Some(ann) => format!(
                    "{}: {}",
                    text,
                    collapse_whitespace(parsed.text_for_span(ann.type_ann.span()))
                ),
                None => text,
            };
        }
        swc_ast::TsFnParam::Array(pat) => (pat.span, pat.type_ann.as_ref()),
        swc_ast::TsFnParam::Rest(pat) => (pat.span, pat.type_ann.as_ref()),
        swc_ast::TsFnParam::Object(pat) => (pat.span, pat.type_ann.as_ref()),
    };
    let hi = type_ann.map_or(span.hi, |ann| ann.span.hi.max(span.hi));
    collapse_whitespace(parsed.text_for_span(Span::new(span.lo, hi)))
}

/// String literal keys of a `Pick`/`Omit` key argument
fn literal_keys(ty: &swc_ast::TsType) -> Vec<String> {
    match ty {
        swc_ast::TsType::TsLitType(lit) => match &lit.lit {
            swc_ast::TsLit::Str(s) => vec![wtf8_to_string(s)],
            _ => Vec::new(),
        },
        swc_ast::TsType::TsUnionOrIntersectionType(
            swc_ast::TsUnionOrIntersectionType::TsUnionType(u),
        ) => u.types.iter().flat_map(|t| literal_keys(t)).collect(),
        swc_ast::TsType::TsParenthesizedType(paren) => literal_keys(&paren.type_ann),
        _ => Vec::new(),
    }
}
