//! propdoc: prop tables and key lists for component library packages
//!
//! This crate reads the TypeScript sources of a component library and:
//! - Finds `XOptions`, `XInitialState` and `XStateReturn` type aliases
//!   using deno_ast/SWC
//! - Splits each component's props into its own props and the props it
//!   takes from a composed state hook
//! - Injects the resulting prop tables into README files
//! - Writes `__keys.ts` modules listing every module's prop keys, with
//!   lists that contain another module's keys referencing that module
//! - Writes entry-point proxy folders and the package `.gitignore`
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐    ┌──────────────────┐
//! │ src/**/*.ts     │    │ package.json     │
//! │ (SWC parse)     │    │ propdoc.toml     │
//! └────────┬────────┘    └────────┬─────────┘
//!          ▼                      │
//!   ┌──────────────┐              │
//!   │  TypeQuery   │              │
//!   └──────┬───────┘              │
//!          ▼                      │
//!   ┌──────────────┐              │
//!   │  aggregate   │              │
//!   └──────┬───────┘              │
//!     ┌────┴──────┐               │
//!     ▼           ▼               ▼
//! ┌────────┐ ┌─────────┐  ┌──────────────┐
//! │ README │ │ __keys  │  │ proxies      │
//! │ tables │ │ modules │  │ .gitignore   │
//! └────────┘ └─────────┘  └──────────────┘
//! ```
//!
//! # Usage
//!
//! ```no_run
//! use propdoc::{PackageBuilder, Task};
//!
//! PackageBuilder::from_root("packages/reakit")
//!     .expect("Failed to load config")
//!     .build(&Task::ALL)
//!     .expect("Failed to build package");
//! ```

// Core types
pub mod decl;
pub mod js_doc;
pub mod naming;
pub mod props;
pub mod query;

// Extraction engine
pub mod aggregate;
pub mod keys;
pub mod parser;
pub mod project;

// Package access and configuration
pub mod config;
pub mod diagnostics;
pub mod manifest;
pub mod public_files;

// Output
pub mod builder;
pub mod docgen;
pub mod printer;
pub mod utils;

// Re-exports for convenience
pub use aggregate::{aggregate_keys, aggregate_module, ModulePropMap, ModuleProps, StateTypes};
pub use config::DocsConfig;
pub use decl::{DeclKind, DeclRole, Declaration};
pub use diagnostics::{Diagnostic, DiagnosticSeverity, DiagnosticsCollector, PropdocError, Result};
pub use js_doc::{JsDoc, JsDocTag};
pub use keys::{
    dedupe_keys, expand_references, render_keys_module, replace_subset_in_object,
    sort_state_sets, KeyMap,
};
pub use manifest::PackageManifest;
pub use naming::{const_key_name_of, module_name_of, reference_token};
pub use project::SwcProject;
pub use props::{extract_properties, type_label, PropertyDescriptor};
pub use query::{PropertySymbol, TypeQuery};

// Terminal output
pub use printer::ReportPrinter;

// Builder API
pub use builder::{BuildOutput, PackageBuilder, Task};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
