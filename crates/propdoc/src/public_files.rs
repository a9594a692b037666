//! Public module discovery
//!
//! A public module is a JavaScript/TypeScript file or a directory whose
//! name does not start with `__`. Listings are sorted at every level so the
//! result does not depend on the order the filesystem reports entries in.

use crate::diagnostics::Result;
use indexmap::IndexMap;
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

lazy_static! {
    static ref SCRIPT_EXTENSION: Regex = Regex::new(r"(?i)\.[jt]sx?$").unwrap();
}

/// Module key (path without extension, `/`-separated) to file path
pub type PublicFiles = BTreeMap<String, PathBuf>;

/// Whether a directory entry is a public module
pub fn is_public_module(name: &str, is_dir: bool) -> bool {
    !name.starts_with("__") && (is_dir || SCRIPT_EXTENSION.is_match(name))
}

/// Sorted names of the entries of a directory
fn sorted_entries(dir: &Path) -> Result<Vec<(String, PathBuf, bool)>> {
    let mut entries = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().into_owned();
        let is_dir = entry.file_type()?.is_dir();
        entries.push((name, entry.path(), is_dir));
    }
    entries.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(entries)
}

fn strip_script_extension(name: &str) -> &str {
    match SCRIPT_EXTENSION.find(name) {
        Some(m) => &name[..m.start()],
        None => name,
    }
}

/// Collect the public files below a directory.
///
/// Directories contribute their public files; files are keyed by their
/// path relative to `root` without the extension.
pub fn get_public_files(root: &Path) -> Result<PublicFiles> {
    let mut files = PublicFiles::new();
    collect_public_files(root, "", &mut files)?;
    Ok(files)
}

fn collect_public_files(dir: &Path, prefix: &str, files: &mut PublicFiles) -> Result<()> {
    for (name, path, is_dir) in sorted_entries(dir)? {
        if !is_public_module(&name, is_dir) {
            continue;
        }
        let key = if prefix.is_empty() {
            name.clone()
        } else {
            format!("{}/{}", prefix, name)
        };
        if is_dir {
            collect_public_files(&path, &key, files)?;
        } else {
            files
                .entry(strip_script_extension(&key).to_string())
                .or_insert(path);
        }
    }
    Ok(())
}

/// Folders that get an entry-point proxy `package.json`.
///
/// Every public module key with a trailing `/index` removed; the root
/// `index` has no proxy.
pub fn get_proxy_folders(src: &Path) -> Result<Vec<String>> {
    let mut folders: Vec<String> = Vec::new();
    for key in get_public_files(src)?.into_keys() {
        let folder = key.strip_suffix("/index").unwrap_or(&key).to_string();
        if folder != "index" && !folders.contains(&folder) {
            folders.push(folder);
        }
    }
    Ok(folders)
}

/// Public files grouped by their top-level module directory.
///
/// Files directly in `src` belong to no module and are left out.
pub fn public_files_by_module(src: &Path) -> Result<IndexMap<PathBuf, Vec<PathBuf>>> {
    let mut modules: IndexMap<PathBuf, Vec<PathBuf>> = IndexMap::new();
    for (key, path) in get_public_files(src)? {
        if let Some((dir, _)) = key.split_once('/') {
            modules.entry(src.join(dir)).or_default().push(path);
        }
    }
    Ok(modules)
}

/// Every `README.md` below a directory, in sorted traversal order
pub fn find_readmes(src: &Path) -> Result<Vec<PathBuf>> {
    let mut readmes = Vec::new();
    for entry in WalkDir::new(src).sort_by_file_name() {
        let entry = entry?;
        if entry.file_type().is_file() && entry.file_name() == "README.md" {
            readmes.push(entry.into_path());
        }
    }
    Ok(readmes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::TempDir;

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "").unwrap();
    }

    fn fixture(files: &[&str]) -> TempDir {
        let dir = TempDir::new().unwrap();
        for file in files {
            touch(dir.path(), file);
        }
        dir
    }

    const LAYOUT: &[&str] = &[
        "index.ts",
        "Button/index.ts",
        "Button/Button.tsx",
        "Button/README.md",
        "Button/__tests__/Button-test.tsx",
        "Button/__keys.ts",
        "Dialog/DialogState.ts",
        "Dialog/Dialog.ts",
        "Dialog/README.md",
        "utils/helpers.js",
        "styles.css",
    ];

    #[test]
    fn test_is_public_module() {
        assert!(is_public_module("Button.tsx", false));
        assert!(is_public_module("helpers.JS", false));
        assert!(is_public_module("Button", true));
        assert!(!is_public_module("__keys.ts", false));
        assert!(!is_public_module("__tests__", true));
        assert!(!is_public_module("README.md", false));
    }

    #[test]
    fn test_get_public_files() {
        let dir = fixture(LAYOUT);
        let files = get_public_files(dir.path()).unwrap();
        let keys: Vec<&String> = files.keys().collect();
        assert_eq!(
            keys,
            vec![
                "Button/Button",
                "Button/index",
                "Dialog/Dialog",
                "Dialog/DialogState",
                "index",
                "utils/helpers",
            ]
        );
        assert_eq!(files["Dialog/Dialog"], dir.path().join("Dialog/Dialog.ts"));
    }

    #[test]
    fn test_order_is_independent_of_creation_order() {
        let mut reversed = LAYOUT.to_vec();
        reversed.reverse();
        let a = fixture(LAYOUT);
        let b = fixture(&reversed);

        let keys_a: Vec<String> = get_public_files(a.path()).unwrap().into_keys().collect();
        let keys_b: Vec<String> = get_public_files(b.path()).unwrap().into_keys().collect();
        assert_eq!(keys_a, keys_b);
    }

    #[test]
    fn test_get_proxy_folders() {
        let dir = fixture(LAYOUT);
        assert_eq!(
            get_proxy_folders(dir.path()).unwrap(),
            vec!["Button/Button", "Button", "Dialog/Dialog", "Dialog/DialogState", "utils/helpers"]
        );
    }

    #[test]
    fn test_public_files_by_module() {
        let dir = fixture(LAYOUT);
        let modules = public_files_by_module(dir.path()).unwrap();
        let names: Vec<&Path> = modules.keys().map(|p| p.strip_prefix(dir.path()).unwrap()).collect();
        assert_eq!(names, vec![Path::new("Button"), Path::new("Dialog"), Path::new("utils")]);
        assert_eq!(modules[&dir.path().join("Dialog")].len(), 2);
    }

    #[test]
    fn test_find_readmes() {
        let dir = fixture(LAYOUT);
        let readmes = find_readmes(dir.path()).unwrap();
        assert_eq!(
            readmes,
            vec![dir.path().join("Button/README.md"), dir.path().join("Dialog/README.md")]
        );
    }
}
