//! Package manifest access
//!
//! Only the package name and the output entry fields of `package.json`
//! matter. Entry fields are reduced to the directory that holds them.

use crate::diagnostics::{PropdocError, Result};
use serde::Deserialize;
use std::path::Path;

/// Manifest file name
pub const MANIFEST_FILE: &str = "package.json";

#[derive(Debug, Deserialize)]
struct RawManifest {
    name: String,
    main: Option<String>,
    module: Option<String>,
    unpkg: Option<String>,
    types: Option<String>,
    typings: Option<String>,
}

/// Output layout of a package
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackageManifest {
    /// Package name
    pub name: String,
    /// Directory of the CommonJS entry
    pub main_dir: Option<String>,
    /// Directory of the ES module entry
    pub module_dir: Option<String>,
    /// Directory of the UMD bundle
    pub unpkg_dir: Option<String>,
    /// Directory of the type declarations (`types`, else `typings`)
    pub types_dir: Option<String>,
}

impl PackageManifest {
    /// Parse manifest text
    pub fn from_json(file: &Path, content: &str) -> Result<Self> {
        let raw: RawManifest =
            serde_json::from_str(content).map_err(|e| PropdocError::manifest(file, e.to_string()))?;

        Ok(Self {
            name: raw.name,
            main_dir: raw.main.as_deref().and_then(containing_dir),
            module_dir: raw.module.as_deref().and_then(containing_dir),
            unpkg_dir: raw.unpkg.as_deref().and_then(containing_dir),
            types_dir: raw
                .types
                .or(raw.typings)
                .as_deref()
                .and_then(containing_dir),
        })
    }

    /// Read `package.json` from a package root
    pub fn load(root: &Path) -> Result<Self> {
        let path = root.join(MANIFEST_FILE);
        if !path.is_file() {
            return Err(PropdocError::FileNotFound(path));
        }
        let content = std::fs::read_to_string(&path)?;
        Self::from_json(&path, &content)
    }

    /// Output directories in `main`, `module`, `unpkg`, `types` order
    pub fn output_dirs(&self) -> Vec<&str> {
        let mut dirs: Vec<&str> = Vec::new();
        for dir in [&self.main_dir, &self.module_dir, &self.unpkg_dir, &self.types_dir]
            .into_iter()
            .flatten()
        {
            if !dirs.contains(&dir.as_str()) {
                dirs.push(dir);
            }
        }
        dirs
    }
}

/// Directory part of an entry path; `None` for files at the package root
fn containing_dir(entry: &str) -> Option<String> {
    let entry = entry.trim_start_matches("./");
    let dir = Path::new(entry).parent()?.to_str()?;
    if dir.is_empty() || dir == "." {
        None
    } else {
        Some(dir.replace('\\', "/"))
    }
}
