//! PackageBuilder - orchestration of the generated package artifacts
//!
//! This module provides the builder pattern API for running the build
//! tasks of one package: README prop tables, key modules, entry-point
//! proxies, `.gitignore` and cleanup.

use crate::aggregate::{aggregate_keys, aggregate_module};
use crate::config::DocsConfig;
use crate::diagnostics::{Diagnostic, DiagnosticsCollector, PropdocError, Result};
use crate::docgen::{headings, inject_section, MarkdownRenderer};
use crate::keys::{dedupe_keys, expand_references, render_keys_module, KeyMap};
use crate::manifest::PackageManifest;
use crate::project::{is_typescript_path, SwcProject};
use crate::public_files::{find_readmes, get_proxy_folders, get_public_files, public_files_by_module};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// First line of the generated `.gitignore`
pub const GITIGNORE_HEADER: &str = "# Automatically generated";

/// A build task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Task {
    /// Inject prop tables into READMEs
    Props,
    /// Write `__keys.ts` modules
    Keys,
    /// Write entry-point proxy folders
    Proxies,
    /// Write `.gitignore`
    Gitignore,
    /// Remove proxy folders and output directories
    Clean,
}

impl Task {
    /// Tasks run by a full build, in order
    pub const ALL: [Task; 4] = [Task::Proxies, Task::Gitignore, Task::Keys, Task::Props];
}

/// Build output listing the files each task touched
#[derive(Debug, Default)]
pub struct BuildOutput {
    /// Package name from the manifest
    pub package_name: String,
    /// READMEs that received prop tables
    pub readmes: Vec<PathBuf>,
    /// Generated key modules
    pub keys_files: Vec<PathBuf>,
    /// Generated proxy `package.json` files
    pub proxy_files: Vec<PathBuf>,
    /// Generated `.gitignore`
    pub gitignore: Option<PathBuf>,
    /// Removed folders
    pub removed: Vec<PathBuf>,
    /// Non-fatal findings
    pub diagnostics: DiagnosticsCollector,
}

impl BuildOutput {
    /// Get all generated files
    pub fn all_files(&self) -> impl Iterator<Item = &PathBuf> {
        self.readmes
            .iter()
            .chain(self.keys_files.iter())
            .chain(self.proxy_files.iter())
            .chain(self.gitignore.iter())
    }
}

/// Contents of an entry-point proxy `package.json`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ProxyPackage {
    name: String,
    private: bool,
    side_effects: bool,
    main: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    module: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    types: Option<String>,
}

/// Builder for running the tasks of one package
///
/// # Example
///
/// ```no_run
/// use propdoc::builder::{PackageBuilder, Task};
///
/// let output = PackageBuilder::from_root("packages/reakit")
///     .expect("Failed to load config")
///     .build(&Task::ALL)
///     .expect("Failed to build package");
/// println!("{} files", output.all_files().count());
/// ```
#[derive(Debug, Clone)]
pub struct PackageBuilder {
    /// Package root (holds `package.json`)
    pub root: PathBuf,
    /// Build settings
    pub config: DocsConfig,
}

impl PackageBuilder {
    /// Create a builder with default settings
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            config: DocsConfig::default(),
        }
    }

    /// Create a builder with the settings of the package's `propdoc.toml`
    pub fn from_root(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        let config = DocsConfig::load(&root)?;
        Ok(Self { root, config })
    }

    /// Replace the settings
    pub fn config(mut self, config: DocsConfig) -> Self {
        self.config = config;
        self
    }

    /// Document `@private` props
    pub fn include_private(mut self, include: bool) -> Self {
        self.config.include_private = include;
        self
    }

    /// Absolute source directory
    pub fn source_path(&self) -> PathBuf {
        self.config.source_path(&self.root)
    }

    /// Read the package manifest
    pub fn manifest(&self) -> Result<PackageManifest> {
        PackageManifest::load(&self.root)
    }

    /// Whether the package is written in TypeScript
    pub fn has_tsconfig(&self) -> bool {
        self.root.join("tsconfig.json").is_file()
    }

    /// Run the given tasks in order
    pub fn build(&self, tasks: &[Task]) -> Result<BuildOutput> {
        let manifest = self.manifest()?;
        let mut output = BuildOutput {
            package_name: manifest.name.clone(),
            ..BuildOutput::default()
        };

        for task in tasks {
            debug!(?task, package = %manifest.name, "running task");
            match task {
                Task::Props | Task::Keys if !self.has_tsconfig() => {
                    output.diagnostics.add(
                        Diagnostic::info(format!("{:?} skipped: no tsconfig.json", task))
                            .in_file(&self.root),
                    );
                }
                Task::Props => {
                    output.readmes = self.inject_prop_types(&mut output.diagnostics)?;
                }
                Task::Keys => output.keys_files = self.make_keys()?,
                Task::Proxies => {
                    output.proxy_files = self.write_proxies(&manifest, &mut output.diagnostics)?;
                }
                Task::Gitignore => output.gitignore = Some(self.write_gitignore(&manifest)?),
                Task::Clean => output.removed = self.remove_build_dirs(&manifest)?,
            }
        }

        Ok(output)
    }

    /// Inject prop tables into every README with a props heading.
    ///
    /// Failures are recorded as warnings; the README is left untouched and
    /// not reported.
    pub fn inject_prop_types(&self, diagnostics: &mut DiagnosticsCollector) -> Result<Vec<PathBuf>> {
        let project = self.load_project()?;
        let mut injected = Vec::new();

        for readme in find_readmes(&self.source_path())? {
            match self.inject_readme(&project, &readme) {
                Ok(true) => injected.push(readme),
                Ok(false) => {}
                Err(err) => {
                    warn!(readme = %readme.display(), error = %err, "prop injection failed");
                    diagnostics.add(Diagnostic::warning(err.to_string()).in_file(&readme));
                }
            }
        }

        info!(count = injected.len(), "injected prop types");
        Ok(injected)
    }

    fn inject_readme(&self, project: &SwcProject, readme: &Path) -> Result<bool> {
        let markdown = std::fs::read_to_string(readme)?;
        let heading = &self.config.props_heading;
        if !headings(&markdown).iter().any(|h| &h.title == heading) {
            return Ok(false);
        }

        let dir = readme
            .parent()
            .ok_or_else(|| PropdocError::InvalidPath(readme.display().to_string()))?;
        let files = typescript_files(get_public_files(dir)?.into_values());
        let map = aggregate_module(project, &files, self.config.include_private)?;
        if map.is_empty() {
            debug!(readme = %readme.display(), "no documented types");
            return Ok(false);
        }

        let fragment = MarkdownRenderer::new().render(&map);
        let Some(updated) = inject_section(readme, &markdown, heading, &fragment)? else {
            return Ok(false);
        };
        if updated != markdown {
            std::fs::write(readme, updated)?;
        }
        Ok(true)
    }

    /// Parse every public TypeScript file of the source directory.
    ///
    /// Types are resolved across module directories, so one project serves
    /// every README and key module of a run.
    pub fn load_project(&self) -> Result<SwcProject> {
        let files = typescript_files(get_public_files(&self.source_path())?.into_values());
        let mut project = SwcProject::new();
        for file in &files {
            project.add_source_file(file)?;
        }
        debug!(files = project.len(), "loaded source project");
        Ok(project)
    }

    /// Key maps of every module directory, before and after deduplication
    fn module_keys(&self) -> Result<Vec<(PathBuf, KeyMap, KeyMap)>> {
        let project = self.load_project()?;
        let mut modules = Vec::new();

        for (dir, files) in public_files_by_module(&self.source_path())? {
            let files = typescript_files(files);
            if files.is_empty() {
                continue;
            }
            let keys = aggregate_keys(&project, &files)?;
            if keys.is_empty() {
                continue;
            }
            let deduped = dedupe_keys(keys.clone());
            modules.push((dir.join(&self.config.keys_file), keys, deduped));
        }

        Ok(modules)
    }

    /// Write a key module into every module directory with keys
    pub fn make_keys(&self) -> Result<Vec<PathBuf>> {
        let mut written = Vec::new();

        for (path, _, deduped) in self.module_keys()? {
            let content = render_keys_module(&deduped);
            if std::fs::read_to_string(&path).ok().as_deref() != Some(content.as_str()) {
                std::fs::write(&path, content)?;
            }
            written.push(path);
        }

        info!(count = written.len(), "generated key modules");
        Ok(written)
    }

    /// Key modules that are missing or out of date, without writing.
    ///
    /// A deduplicated module whose references do not expand back to its
    /// keys is reported as an error.
    pub fn check_keys(&self, diagnostics: &mut DiagnosticsCollector) -> Result<Vec<PathBuf>> {
        let mut stale = Vec::new();

        for (path, keys, deduped) in self.module_keys()? {
            let expanded = expand_references(&deduped);
            for (module, original) in &keys {
                let same_members = expanded.get(module).is_some_and(|list| {
                    list.len() == original.len() && original.iter().all(|k| list.contains(k))
                });
                if !same_members {
                    diagnostics.add(
                        Diagnostic::error(format!("keys of `{}` do not expand back", module))
                            .in_file(&path),
                    );
                }
            }

            let content = render_keys_module(&deduped);
            if std::fs::read_to_string(&path).ok().as_deref() != Some(content.as_str()) {
                stale.push(path);
            }
        }

        Ok(stale)
    }

    /// Write an entry-point proxy `package.json` for every proxy folder
    pub fn make_proxies(&self) -> Result<Vec<PathBuf>> {
        let manifest = self.manifest()?;
        self.write_proxies(&manifest, &mut DiagnosticsCollector::new())
    }

    fn write_proxies(
        &self,
        manifest: &PackageManifest,
        diagnostics: &mut DiagnosticsCollector,
    ) -> Result<Vec<PathBuf>> {
        let Some(main_dir) = &manifest.main_dir else {
            diagnostics.add(
                Diagnostic::info("proxies skipped: package.json has no `main` directory")
                    .in_file(&self.root),
            );
            return Ok(Vec::new());
        };

        let mut written = Vec::new();
        for folder in get_proxy_folders(&self.source_path())? {
            let prefix = "../".repeat(folder.split('/').count());
            let proxy = ProxyPackage {
                name: format!("{}/{}", manifest.name, folder),
                private: true,
                side_effects: false,
                main: format!("{}{}/{}", prefix, main_dir, folder),
                module: manifest
                    .module_dir
                    .as_ref()
                    .map(|dir| format!("{}{}/{}", prefix, dir, folder)),
                types: manifest
                    .types_dir
                    .as_ref()
                    .map(|dir| format!("{}{}/{}", prefix, dir, folder)),
            };

            let dir = self.root.join(&folder);
            std::fs::create_dir_all(&dir)?;
            let path = dir.join("package.json");
            let mut json = serde_json::to_string_pretty(&proxy)?;
            json.push('\n');
            std::fs::write(&path, json)?;
            written.push(path);
        }

        info!(count = written.len(), "generated proxies");
        Ok(written)
    }

    /// `.gitignore` contents: proxy folders, then output directories
    pub fn gitignore_contents(&self, manifest: &PackageManifest) -> Result<String> {
        let mut entries: Vec<String> = Vec::new();
        let folders = get_proxy_folders(&self.source_path())?;
        let dirs = manifest.output_dirs().into_iter().map(String::from);

        for entry in folders.into_iter().chain(dirs) {
            let line = format!("/{}", entry);
            if !entries.contains(&line) {
                entries.push(line);
            }
        }

        let mut contents = String::from(GITIGNORE_HEADER);
        contents.push('\n');
        for line in entries {
            contents.push_str(&line);
            contents.push('\n');
        }
        Ok(contents)
    }

    /// Write the package `.gitignore`
    pub fn make_gitignore(&self) -> Result<PathBuf> {
        let manifest = self.manifest()?;
        self.write_gitignore(&manifest)
    }

    fn write_gitignore(&self, manifest: &PackageManifest) -> Result<PathBuf> {
        let path = self.root.join(".gitignore");
        std::fs::write(&path, self.gitignore_contents(manifest)?)?;
        Ok(path)
    }

    /// Remove proxy folders and manifest output directories
    pub fn clean_build(&self) -> Result<Vec<PathBuf>> {
        let manifest = self.manifest()?;
        self.remove_build_dirs(&manifest)
    }

    fn remove_build_dirs(&self, manifest: &PackageManifest) -> Result<Vec<PathBuf>> {
        let source = self.source_path();
        let folders = get_proxy_folders(&source)?;
        let dirs = manifest.output_dirs().into_iter().map(String::from);

        let mut removed = Vec::new();
        for entry in folders.into_iter().chain(dirs) {
            let path = self.root.join(&entry);
            // Nested proxy folders may already be gone with their parent
            if !path.is_dir() || path == self.root || source.starts_with(&path) {
                continue;
            }
            std::fs::remove_dir_all(&path)?;
            debug!(path = %path.display(), "removed");
            removed.push(path);
        }

        info!(count = removed.len(), "cleaned build output");
        Ok(removed)
    }
}

fn typescript_files(files: impl IntoIterator<Item = PathBuf>) -> Vec<PathBuf> {
    files.into_iter().filter(|p| is_typescript_path(p)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::TempDir;

    const MANIFEST: &str = r#"{
  "name": "reakit",
  "main": "lib/index.js",
  "module": "es/index.js",
  "unpkg": "dist/reakit.min.js",
  "types": "ts/index.d.ts"
}"#;

    fn package(files: &[(&str, &str)]) -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("package.json"), MANIFEST).unwrap();
        for (rel, content) in files {
            let path = dir.path().join(rel);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, content).unwrap();
        }
        dir
    }

    #[test]
    fn test_builder_configuration() {
        let builder = PackageBuilder::new("packages/reakit").include_private(true);
        assert_eq!(builder.root, PathBuf::from("packages/reakit"));
        assert!(builder.config.include_private);
        assert_eq!(builder.source_path(), PathBuf::from("packages/reakit/src"));
    }

    #[test]
    fn test_make_proxies() {
        let dir = package(&[("src/index.ts", ""), ("src/Button/index.ts", ""), ("src/Button/Button.ts", "")]);
        let builder = PackageBuilder::new(dir.path());

        let written = builder.make_proxies().unwrap();
        assert_eq!(
            written,
            vec![
                dir.path().join("Button/Button/package.json"),
                dir.path().join("Button/package.json"),
            ]
        );

        let proxy = fs::read_to_string(dir.path().join("Button/Button/package.json")).unwrap();
        assert_eq!(
            proxy,
            r#"{
  "name": "reakit/Button/Button",
  "private": true,
  "sideEffects": false,
  "main": "../../lib/Button/Button",
  "module": "../../es/Button/Button",
  "types": "../../ts/Button/Button"
}
"#
        );
    }

    #[test]
    fn test_gitignore_contents() {
        let dir = package(&[("src/index.ts", ""), ("src/Button/index.ts", ""), ("src/Box.ts", "")]);
        let builder = PackageBuilder::new(dir.path());
        let manifest = builder.manifest().unwrap();

        let expected = "# Automatically generated\n/Box\n/Button\n/lib\n/es\n/dist\n/ts\n";
        assert_eq!(builder.gitignore_contents(&manifest).unwrap(), expected);

        let path = builder.make_gitignore().unwrap();
        assert_eq!(path, dir.path().join(".gitignore"));
        assert_eq!(fs::read_to_string(path).unwrap(), expected);
    }

    #[test]
    fn test_clean_build() {
        let dir = package(&[("src/Button/index.ts", ""), ("lib/index.js", ""), ("Button/package.json", "{}")]);
        let builder = PackageBuilder::new(dir.path());

        let removed = builder.clean_build().unwrap();
        assert_eq!(removed, vec![dir.path().join("Button"), dir.path().join("lib")]);
        assert!(!dir.path().join("lib").exists());
        assert!(dir.path().join("src/Button/index.ts").exists());
    }

    #[test]
    fn test_props_and_keys_need_tsconfig() {
        let dir = package(&[("src/Button/README.md", "## Props\n")]);
        let output = PackageBuilder::new(dir.path())
            .build(&[Task::Props, Task::Keys])
            .unwrap();
        assert!(output.readmes.is_empty());
        assert_eq!(output.diagnostics.diagnostics().len(), 2);
        assert_eq!(output.package_name, "reakit");
    }

    #[test]
    fn test_injection_failure_is_a_warning() {
        let dir = package(&[
            ("tsconfig.json", "{}"),
            ("src/Button/README.md", "# Button\n\n### Props\n"),
            ("src/Button/Button.ts", "export type ButtonOptions = { disabled?: boolean };\n"),
        ]);
        let output = PackageBuilder::new(dir.path()).build(&[Task::Props]).unwrap();

        assert!(output.readmes.is_empty());
        assert_eq!(output.diagnostics.warning_count(), 1);
        assert_eq!(
            fs::read_to_string(dir.path().join("src/Button/README.md")).unwrap(),
            "# Button\n\n### Props\n"
        );
    }
}
