//! Naming conventions for declarations, modules and key constants
//!
//! Declarations follow the `XOptions` / `XInitialState` / `XStateReturn`
//! convention. Everything that derives a module or constant name from a
//! declared identifier goes through this module so the README headings and
//! the generated key constants always agree.

use heck::ToShoutySnakeCase;

/// Prefix marking an experimental (unstable) API
pub const EXPERIMENTAL_PREFIX: &str = "unstable_";

/// Suffix of component options declarations
pub const OPTIONS_SUFFIX: &str = "Options";

/// Suffix of state hook initial state declarations
pub const INITIAL_STATE_SUFFIX: &str = "InitialState";

/// Suffix of state hook return declarations
pub const STATE_RETURN_SUFFIX: &str = "StateReturn";

/// Suffix appended to every generated key constant
pub const KEYS_SUFFIX: &str = "_KEYS";

/// Prefix of a reference token inside a key list
pub const SPREAD_PREFIX: &str = "...";

/// Check whether a name carries the experimental marker
pub fn is_experimental(name: &str) -> bool {
    name.starts_with(EXPERIMENTAL_PREFIX)
}

/// Strip the experimental marker, if present
pub fn strip_experimental(name: &str) -> &str {
    name.strip_prefix(EXPERIMENTAL_PREFIX).unwrap_or(name)
}

/// Map a declaration name to the module it documents.
///
/// - `DialogInitialState` → `useDialogState`
/// - `DialogStateReturn` → `DialogState`
/// - `DialogOptions` → `Dialog`
///
/// The experimental marker is dropped first. Names matching none of the
/// suffixes are returned unchanged.
pub fn module_name_of(decl_name: &str) -> String {
    let name = strip_experimental(decl_name);

    if let Some(base) = name.strip_suffix(INITIAL_STATE_SUFFIX) {
        if !base.is_empty() {
            return format!("use{}State", upper_first(base));
        }
    }
    if let Some(base) = name.strip_suffix(STATE_RETURN_SUFFIX) {
        if !base.is_empty() {
            return format!("{}State", base);
        }
    }
    if let Some(base) = name.strip_suffix(OPTIONS_SUFFIX) {
        if !base.is_empty() {
            return base.to_string();
        }
    }

    name.to_string()
}

/// Constant identifier holding a module's key list (`DialogState` → `DIALOG_STATE_KEYS`)
pub fn const_key_name_of(module_name: &str) -> String {
    format!("{}{}", module_name.to_shouty_snake_case(), KEYS_SUFFIX)
}

/// Reference token standing for a module's whole key list
pub fn reference_token(module_name: &str) -> String {
    format!("{}{}", SPREAD_PREFIX, const_key_name_of(module_name))
}

/// Check whether a key list entry is a reference token
pub fn is_reference_token(key: &str) -> bool {
    key.starts_with(SPREAD_PREFIX)
}

fn upper_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
