//! Type-level declarations and their classification
//!
//! A [`Declaration`] is what the type-query engine reports for each
//! top-level construct of a source file. Only type aliases can be
//! documented; [`DeclRole::classify`] decides which role one plays.

use crate::naming::{INITIAL_STATE_SUFFIX, OPTIONS_SUFFIX, STATE_RETURN_SUFFIX};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Kind of a top-level declaration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DeclKind {
    /// `type X = ...`
    TypeAlias,
    /// `interface X { ... }`
    Interface,
    /// Functions, classes, variables, enums
    Other,
    /// Anything the parser could not map to a named declaration
    Unrecognized,
}

/// A top-level declaration found in a source file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Declaration {
    /// Declaration kind
    pub kind: DeclKind,
    /// Declared identifier as written in the source
    pub name: String,
    /// File the declaration lives in
    pub file: PathBuf,
    /// 1-indexed line of the declaration
    pub line: usize,
}

impl Declaration {
    /// Create a new declaration
    pub fn new(kind: DeclKind, name: impl Into<String>, file: impl Into<PathBuf>) -> Self {
        Self {
            kind,
            name: name.into(),
            file: file.into(),
            line: 0,
        }
    }

    /// Create a type alias declaration
    pub fn type_alias(name: impl Into<String>, file: impl Into<PathBuf>) -> Self {
        Self::new(DeclKind::TypeAlias, name, file)
    }

    /// Set the line
    pub fn at_line(mut self, line: usize) -> Self {
        self.line = line;
        self
    }

    fn is_alias_ending_with(&self, suffix: &str) -> bool {
        self.kind == DeclKind::TypeAlias && self.name.ends_with(suffix)
    }
}

/// Type alias named `XOptions`
pub fn is_options_decl(decl: &Declaration) -> bool {
    decl.is_alias_ending_with(OPTIONS_SUFFIX)
}

/// Type alias named `XInitialState`
pub fn is_initial_state_decl(decl: &Declaration) -> bool {
    decl.is_alias_ending_with(INITIAL_STATE_SUFFIX)
}

/// Type alias named `XStateReturn`
pub fn is_state_return_decl(decl: &Declaration) -> bool {
    decl.is_alias_ending_with(STATE_RETURN_SUFFIX)
}

/// Options or InitialState declaration
pub fn is_props_decl(decl: &Declaration) -> bool {
    is_options_decl(decl) || is_initial_state_decl(decl)
}

/// Role a declaration plays in prop extraction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeclRole {
    /// `XStateReturn`: values returned by a state hook
    StateReturn,
    /// `XInitialState`: seed values accepted by a state hook
    InitialState,
    /// `XOptions`: props accepted by a component
    Options,
}

impl DeclRole {
    /// Classify a declaration.
    ///
    /// StateReturn is checked first, then InitialState, then Options; the
    /// first match wins.
    pub fn classify(decl: &Declaration) -> Option<Self> {
        if is_state_return_decl(decl) {
            Some(DeclRole::StateReturn)
        } else if is_initial_state_decl(decl) {
            Some(DeclRole::InitialState)
        } else if is_options_decl(decl) {
            Some(DeclRole::Options)
        } else {
            None
        }
    }
}
