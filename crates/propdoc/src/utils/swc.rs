//! SWC/deno_ast TypeScript parsing utilities
//!
//! This module provides utilities for parsing TypeScript files using deno_ast
//! (which wraps SWC). It handles:
//! - Parsing TypeScript/TSX files
//! - Extracting JSDoc blocks attached to a node
//! - Source text extraction for type annotations

use crate::diagnostics::{PropdocError, Result};
use crate::js_doc::JsDoc;
use deno_ast::swc::ast as swc_ast;
use deno_ast::swc::common::comments::{Comment, CommentKind};
use deno_ast::swc::common::{BytePos, Span};
use deno_ast::{MediaType, ParseParams, ParsedSource, SourcePos, SourceRange, SourceTextInfo};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Information about the source file
#[derive(Debug, Clone)]
pub struct SourceInfo {
    /// The file path
    pub path: PathBuf,
    /// The source text
    pub text: Arc<str>,
    /// Source text info for location lookups
    pub text_info: SourceTextInfo,
}

impl SourceInfo {
    /// Create source info from a file path and content
    pub fn new(path: impl Into<PathBuf>, text: impl Into<Arc<str>>) -> Self {
        let text: Arc<str> = text.into();
        let text_info = SourceTextInfo::new(text.clone());
        Self {
            path: path.into(),
            text,
            text_info,
        }
    }

    /// 1-indexed line of a byte position
    pub fn line_of(&self, pos: BytePos) -> usize {
        // Positions handed out by SWC are converted with the unsafe constructor
        let source_pos = SourcePos::unsafely_from_byte_pos(pos);
        self.text_info.line_and_column_index(source_pos).line_index + 1
    }

    /// Extract source text for a span
    pub fn text_for_span(&self, span: Span) -> &str {
        let range = SourceRange::new(
            SourcePos::unsafely_from_byte_pos(span.lo),
            SourcePos::unsafely_from_byte_pos(span.hi),
        );
        self.text_info.range_text(&range)
    }
}

/// A parsed TypeScript module with source information
#[derive(Debug)]
pub struct ParsedModule {
    /// The parsed source from deno_ast
    pub source: ParsedSource,
    /// Source information for location lookups
    pub source_info: SourceInfo,
}

impl ParsedModule {
    /// Get the module AST
    ///
    /// `None` only when the source was parsed as a script.
    pub fn module(&self) -> Option<&swc_ast::Module> {
        match self.source.program_ref() {
            deno_ast::ProgramRef::Module(m) => Some(m),
            deno_ast::ProgramRef::Script(_) => None,
        }
    }

    /// Get the file path
    pub fn path(&self) -> &Path {
        &self.source_info.path
    }

    /// Extract source text for a span
    pub fn text_for_span(&self, span: Span) -> &str {
        self.source_info.text_for_span(span)
    }

    /// 1-indexed line of a span start
    pub fn line_of(&self, span: Span) -> usize {
        self.source_info.line_of(span.lo)
    }

    /// Get leading comments for a position
    pub fn leading_comments(&self, pos: BytePos) -> Vec<Comment> {
        let source_pos = SourcePos::unsafely_from_byte_pos(pos);
        self.source
            .comments()
            .get_leading(source_pos)
            .map(|v| v.to_vec())
            .unwrap_or_default()
    }

    /// Get every JSDoc block leading a span, in source order
    pub fn jsdoc_blocks_for_span(&self, span: Span) -> Vec<JsDoc> {
        self.leading_comments(span.lo)
            .iter()
            .filter(|c| c.kind == CommentKind::Block && c.text.starts_with('*'))
            .map(|c| JsDoc::parse(&c.text))
            .collect()
    }
}

/// Parse a TypeScript file from disk
pub fn parse_typescript_file(path: impl AsRef<Path>) -> Result<ParsedModule> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|e| {
        PropdocError::Io(std::io::Error::new(
            e.kind(),
            format!("Failed to read {}: {}", path.display(), e),
        ))
    })?;

    parse_typescript_source(path, text)
}

/// Parse TypeScript source code from a string
pub fn parse_typescript_source(
    path: impl AsRef<Path>,
    source: impl Into<Arc<str>>,
) -> Result<ParsedModule> {
    let path = std::path::absolute(path.as_ref())?;
    let source: Arc<str> = source.into();

    let media_type = MediaType::from_path(&path);

    // deno_ast requires absolute file specifiers
    let specifier = deno_ast::ModuleSpecifier::from_file_path(&path)
        .map_err(|_| PropdocError::InvalidPath(path.display().to_string()))?;

    let parsed = deno_ast::parse_module(ParseParams {
        specifier,
        text: source.clone(),
        media_type,
        capture_tokens: true,
        scope_analysis: false,
        maybe_syntax: None,
    })
    .map_err(|e| PropdocError::TypeScriptParse(format!("{}: {}", path.display(), e)))?;

    let source_info = SourceInfo::new(path, source);

    Ok(ParsedModule {
        source: parsed,
        source_info,
    })
}

/// Helper to convert Wtf8Atom to String
pub fn wtf8_to_string(s: &swc_ast::Str) -> String {
    String::from_utf8_lossy(s.value.as_bytes()).into_owned()
}

/// Get the name from a property key expression
pub fn expr_to_name(expr: &swc_ast::Expr) -> Option<String> {
    match expr {
        swc_ast::Expr::Ident(i) => Some(i.sym.to_string()),
        swc_ast::Expr::Lit(swc_ast::Lit::Str(s)) => Some(wtf8_to_string(s)),
        swc_ast::Expr::Lit(swc_ast::Lit::Num(n)) => Some(n.value.to_string()),
        _ => None,
    }
}

/// Collapse runs of whitespace (including newlines) to a single space
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
