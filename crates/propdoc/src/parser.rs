//! Top-level declaration walk over parsed TypeScript modules
//!
//! Maps SWC module items onto the closed [`DeclKind`] set and locates the
//! type alias or interface behind a type name.

use crate::decl::{DeclKind, Declaration};
use crate::utils::swc::{wtf8_to_string, ParsedModule};
use deno_ast::swc::ast as swc_ast;
use deno_ast::swc::common::Spanned;

/// A named type-level declaration inside a parsed module
#[derive(Debug, Clone, Copy)]
pub enum TypeDeclRef<'a> {
    /// `type X = ...`
    Alias(&'a swc_ast::TsTypeAliasDecl),
    /// `interface X { ... }`
    Interface(&'a swc_ast::TsInterfaceDecl),
}

impl<'a> TypeDeclRef<'a> {
    /// Declared name
    pub fn name(&self) -> String {
        match self {
            TypeDeclRef::Alias(a) => a.id.sym.to_string(),
            TypeDeclRef::Interface(i) => i.id.sym.to_string(),
        }
    }
}

/// Extract every top-level declaration of a parsed module, in source order
pub fn extract_declarations(parsed: &ParsedModule) -> Vec<Declaration> {
    let Some(module) = parsed.module() else {
        return Vec::new();
    };

    module
        .body
        .iter()
        .filter_map(|item| declaration_from_item(parsed, item))
        .collect()
}

fn declaration_from_item(parsed: &ParsedModule, item: &swc_ast::ModuleItem) -> Option<Declaration> {
    match item {
        swc_ast::ModuleItem::ModuleDecl(decl) => match decl {
            swc_ast::ModuleDecl::ExportDecl(export) => declaration_from_decl(parsed, &export.decl),
            swc_ast::ModuleDecl::ExportDefaultDecl(export) => {
                let (kind, name) = match &export.decl {
                    swc_ast::DefaultDecl::TsInterfaceDecl(iface) => {
                        (DeclKind::Interface, iface.id.sym.to_string())
                    }
                    swc_ast::DefaultDecl::Fn(f) => (
                        DeclKind::Other,
                        f.ident
                            .as_ref()
                            .map(|i| i.sym.to_string())
                            .unwrap_or_else(|| "default".to_string()),
                    ),
                    swc_ast::DefaultDecl::Class(c) => (
                        DeclKind::Other,
                        c.ident
                            .as_ref()
                            .map(|i| i.sym.to_string())
                            .unwrap_or_else(|| "default".to_string()),
                    ),
                };
                Some(Declaration::new(kind, name, parsed.path()).at_line(parsed.line_of(export.span)))
            }
            swc_ast::ModuleDecl::ExportDefaultExpr(export) => Some(
                Declaration::new(DeclKind::Unrecognized, "default", parsed.path())
                    .at_line(parsed.line_of(export.span)),
            ),
            // Imports and re-exports declare nothing locally
            _ => None,
        },
        swc_ast::ModuleItem::Stmt(swc_ast::Stmt::Decl(decl)) => declaration_from_decl(parsed, decl),
        swc_ast::ModuleItem::Stmt(_) => None,
    }
}

fn declaration_from_decl(parsed: &ParsedModule, decl: &swc_ast::Decl) -> Option<Declaration> {
    let (kind, name) = match decl {
        swc_ast::Decl::TsTypeAlias(alias) => (DeclKind::TypeAlias, alias.id.sym.to_string()),
        swc_ast::Decl::TsInterface(iface) => (DeclKind::Interface, iface.id.sym.to_string()),
        swc_ast::Decl::Class(c) => (DeclKind::Other, c.ident.sym.to_string()),
        swc_ast::Decl::Fn(f) => (DeclKind::Other, f.ident.sym.to_string()),
        swc_ast::Decl::TsEnum(e) => (DeclKind::Other, e.id.sym.to_string()),
        swc_ast::Decl::Var(v) => {
            let name = v.decls.first().and_then(|d| match &d.name {
                swc_ast::Pat::Ident(i) => Some(i.sym.to_string()),
                _ => None,
            });
            match name {
                Some(name) => (DeclKind::Other, name),
                None => (DeclKind::Unrecognized, String::new()),
            }
        }
        swc_ast::Decl::TsModule(m) => {
            let name = match &m.id {
                swc_ast::TsModuleName::Ident(i) => i.sym.to_string(),
                swc_ast::TsModuleName::Str(s) => wtf8_to_string(s),
            };
            (DeclKind::Unrecognized, name)
        }
        swc_ast::Decl::Using(_) => return None,
    };

    Some(Declaration::new(kind, name, parsed.path()).at_line(parsed.line_of(decl.span())))
}

/// Every type alias and interface declared at the top level, in source order
pub fn type_decls(parsed: &ParsedModule) -> Vec<TypeDeclRef<'_>> {
    let Some(module) = parsed.module() else {
        return Vec::new();
    };

    module
        .body
        .iter()
        .filter_map(|item| {
            let decl = match item {
                swc_ast::ModuleItem::ModuleDecl(swc_ast::ModuleDecl::ExportDecl(export)) => {
                    &export.decl
                }
                swc_ast::ModuleItem::Stmt(swc_ast::Stmt::Decl(decl)) => decl,
                _ => return None,
            };
            match decl {
                swc_ast::Decl::TsTypeAlias(alias) => Some(TypeDeclRef::Alias(alias)),
                swc_ast::Decl::TsInterface(iface) => Some(TypeDeclRef::Interface(iface)),
                _ => None,
            }
        })
        .collect()
}

/// Find the first type alias or interface with the given name
pub fn find_type_decl<'a>(parsed: &'a ParsedModule, name: &str) -> Option<TypeDeclRef<'a>> {
    type_decls(parsed).into_iter().find(|d| d.name() == name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::swc::parse_typescript_source;

    const SOURCE: &str = r#"
import { BoxOptions } from "../Box/Box";

export type DialogOptions = BoxOptions & { modal?: boolean };
type DialogHTMLProps = {};
export interface DialogRef { focus(): void }
export function useDialog() {}
export const Dialog = createComponent();
declare module "foo" {}
export default Dialog;
"#;

    #[test]
    fn test_extract_declarations() {
        let parsed = parse_typescript_source("/tmp/Dialog.ts", SOURCE).unwrap();
        let decls = extract_declarations(&parsed);

        let summary: Vec<(DeclKind, &str)> =
            decls.iter().map(|d| (d.kind, d.name.as_str())).collect();
        assert_eq!(
            summary,
            vec![
                (DeclKind::TypeAlias, "DialogOptions"),
                (DeclKind::TypeAlias, "DialogHTMLProps"),
                (DeclKind::Interface, "DialogRef"),
                (DeclKind::Other, "useDialog"),
                (DeclKind::Other, "Dialog"),
                (DeclKind::Unrecognized, "foo"),
                (DeclKind::Unrecognized, "default"),
            ]
        );
        assert_eq!(decls[0].line, 4);
    }

    #[test]
    fn test_find_type_decl() {
        let parsed = parse_typescript_source("/tmp/Dialog.ts", SOURCE).unwrap();

        assert!(matches!(
            find_type_decl(&parsed, "DialogOptions"),
            Some(TypeDeclRef::Alias(_))
        ));
        assert!(matches!(
            find_type_decl(&parsed, "DialogRef"),
            Some(TypeDeclRef::Interface(_))
        ));
        assert!(find_type_decl(&parsed, "useDialog").is_none());
        assert_eq!(type_decls(&parsed).len(), 3);
    }
}
