//! Per-module aggregation of props and keys
//!
//! A module directory holds a component's source files. Its `XStateReturn`
//! declarations define the state hook's values; `XOptions` types that
//! compose that state get their inherited properties split off into
//! `state_props`. Files whose name mentions `State` are visited first so the
//! state names are known before any options type is split.

use crate::decl::{DeclRole, Declaration};
use crate::diagnostics::Result;
use crate::keys::KeyMap;
use crate::naming::module_name_of;
use crate::props::{extract_properties, PropertyDescriptor};
use crate::query::TypeQuery;
use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Props documented for one module
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleProps {
    /// Own props
    pub props: Vec<PropertyDescriptor>,
    /// Props inherited from the composed state hook
    pub state_props: Vec<PropertyDescriptor>,
}

impl ModuleProps {
    /// Whether there is nothing to document
    pub fn is_empty(&self) -> bool {
        self.props.is_empty() && self.state_props.is_empty()
    }

    fn push_state_props(&mut self, props: Vec<PropertyDescriptor>) {
        for prop in props {
            if !self.state_props.iter().any(|p| p.name == prop.name) {
                self.state_props.push(prop);
            }
        }
    }
}

/// Module name to its props, in insertion order
pub type ModulePropMap = IndexMap<String, ModuleProps>;

/// Names returned by the state hooks of the module being aggregated
#[derive(Debug, Clone, Default)]
pub struct StateTypes {
    names: IndexSet<String>,
}

impl StateTypes {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the names not seen yet
    pub fn extend<'a>(&mut self, names: impl IntoIterator<Item = &'a str>) {
        for name in names {
            if !self.names.contains(name) {
                self.names.insert(name.to_string());
            }
        }
    }

    /// Whether a name is returned by a state hook
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    /// Names in first-seen order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    /// Split props into own props and props provided by the state hook
    pub fn partition(
        &self,
        props: Vec<PropertyDescriptor>,
    ) -> (Vec<PropertyDescriptor>, Vec<PropertyDescriptor>) {
        props.into_iter().partition(|p| !self.contains(&p.name))
    }
}

fn base_name(path: &Path) -> &str {
    path.file_name().and_then(|n| n.to_str()).unwrap_or_default()
}

/// Sort source files: names containing `State` first, then by base name
pub fn sort_source_files(files: &mut [PathBuf]) {
    files.sort_by(|a, b| {
        let (a, b) = (base_name(a), base_name(b));
        (!a.contains("State"), a).cmp(&(!b.contains("State"), b))
    });
}

/// Classified declarations of the given files, in visiting order
fn classified_declarations(
    query: &dyn TypeQuery,
    files: &[PathBuf],
) -> Result<Vec<(DeclRole, Declaration)>> {
    let mut files = files.to_vec();
    sort_source_files(&mut files);

    let mut classified = Vec::new();
    for file in &files {
        for decl in query.declarations(file)? {
            if let Some(role) = DeclRole::classify(&decl) {
                classified.push((role, decl));
            }
        }
    }
    Ok(classified)
}

/// Aggregate the documented props of one module directory
pub fn aggregate_module(
    query: &dyn TypeQuery,
    files: &[PathBuf],
    include_private: bool,
) -> Result<ModulePropMap> {
    let mut map = ModulePropMap::new();
    let mut state_types = StateTypes::new();

    for (role, decl) in classified_declarations(query, files)? {
        let module = module_name_of(&decl.name);

        match role {
            // State hook values never include private props
            DeclRole::StateReturn => {
                let props = extract_properties(query, &decl, false)?;
                state_types.extend(props.iter().map(|p| p.name.as_str()));
                map.entry(module).or_default().props = props;
            }
            // Seed values are stored whole, never split against the state
            DeclRole::InitialState => {
                let props = extract_properties(query, &decl, include_private)?;
                map.entry(module).or_default().props = props;
            }
            DeclRole::Options => {
                let props = extract_properties(query, &decl, include_private)?;
                let (own, inherited) = state_types.partition(props);
                if !map.contains_key(&module) {
                    map.insert(
                        module.clone(),
                        ModuleProps {
                            props: own,
                            state_props: Vec::new(),
                        },
                    );
                }
                if let Some(entry) = map.get_mut(&module) {
                    entry.push_state_props(inherited);
                }
            }
        }
    }

    debug!(modules = map.len(), "aggregated module props");
    Ok(map)
}

/// Aggregate the prop keys of one module directory.
///
/// `XStateReturn` and `XOptions` declarations contribute every property
/// name, private ones included. `XInitialState` declarations contribute
/// nothing.
pub fn aggregate_keys(query: &dyn TypeQuery, files: &[PathBuf]) -> Result<KeyMap> {
    let mut map = KeyMap::new();

    for (role, decl) in classified_declarations(query, files)? {
        if role == DeclRole::InitialState {
            continue;
        }
        let props = extract_properties(query, &decl, true)?;
        let keys = map.entry(module_name_of(&decl.name)).or_default();
        for prop in props {
            if !keys.contains(&prop.name) {
                keys.push(prop.name);
            }
        }
    }

    Ok(map)
}
