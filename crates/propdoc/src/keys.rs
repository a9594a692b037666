//! Subset-key deduplication and key-module rendering
//!
//! Key lists of related modules overlap heavily: every `XOptions` type that
//! composes a state hook repeats the hook's keys. Before a key module is
//! written, lists that contain another module's whole list get that part
//! replaced with a reference token (`...X_KEYS`), which renders as an array
//! spread in the generated TypeScript.

use crate::naming::{const_key_name_of, is_reference_token, reference_token, SPREAD_PREFIX};
use indexmap::IndexMap;
use std::cmp::Ordering;
use std::fmt::Write;
use tracing::trace;

/// Module name to its ordered keys
pub type KeyMap = IndexMap<String, Vec<String>>;

/// First line of every generated key module
pub const GENERATED_HEADER: &str = "// Automatically generated";

fn is_subset(a: &[String], b: &[String]) -> bool {
    a.iter().all(|k| b.contains(k))
}

fn is_state_module(name: &str) -> bool {
    name.ends_with("State")
}

/// Partial order over `*State` entries: subsets first.
///
/// Pairs that are not both non-empty `*State` lists, or that are unrelated,
/// compare equal.
fn compare_state_sets(a: (&str, &[String]), b: (&str, &[String])) -> Ordering {
    let ((a_name, a_keys), (b_name, b_keys)) = (a, b);
    if !is_state_module(a_name) || !is_state_module(b_name) || a_keys.is_empty() || b_keys.is_empty()
    {
        return Ordering::Equal;
    }
    if is_subset(a_keys, b_keys) {
        Ordering::Less
    } else if is_subset(b_keys, a_keys) {
        Ordering::Greater
    } else {
        Ordering::Equal
    }
}

/// Move `*State` lists before the `*State` lists that contain them.
///
/// Stable insertion sort; an entry only moves left past entries that
/// compare greater, so unrelated entries keep their relative order.
pub fn sort_state_sets(map: KeyMap) -> KeyMap {
    let mut entries: Vec<(String, Vec<String>)> = map.into_iter().collect();

    for i in 1..entries.len() {
        let mut j = i;
        while j > 0 {
            let order = compare_state_sets(
                (&entries[j - 1].0, &entries[j - 1].1),
                (&entries[j].0, &entries[j].1),
            );
            if order != Ordering::Greater {
                break;
            }
            entries.swap(j - 1, j);
            j -= 1;
        }
    }

    entries.into_iter().collect()
}

/// One rewrite pass; returns whether anything changed
fn replace_pass(map: &KeyMap) -> (KeyMap, bool) {
    let mut placed = KeyMap::new();
    let mut changed = false;

    for (module, keys) in map {
        let mut remaining = keys.clone();
        let mut tokens = Vec::new();

        for (placed_module, placed_keys) in &placed {
            if !placed_keys.is_empty() && is_subset(placed_keys, &remaining) {
                remaining.retain(|k| !placed_keys.contains(k));
                tokens.push(reference_token(placed_module));
            }
        }

        let list = if tokens.is_empty() {
            keys.clone()
        } else {
            trace!(module = %module, references = ?tokens, "replaced covered keys");
            changed = true;
            tokens.extend(remaining);
            tokens
        };
        placed.insert(module.clone(), list);
    }

    (placed, changed)
}

/// Replace key runs covered by earlier modules with reference tokens.
///
/// Each pass walks the map in order. For every module, each already placed
/// module whose current list is a non-empty subset of the module's
/// remaining keys is replaced by one reference token. Tokens come first, in
/// placement order, followed by the uncovered keys in their original order.
/// Passes repeat until nothing changes.
pub fn replace_subset_in_object(map: &KeyMap) -> KeyMap {
    let mut current = map.clone();
    let mut passes = 0usize;
    loop {
        let (next, changed) = replace_pass(&current);
        passes += 1;
        current = next;
        if !changed {
            trace!(passes, "subset rewrite reached a fixpoint");
            return current;
        }
    }
}

/// Expand reference tokens back into the keys they stand for.
///
/// Tokens naming no module of the map are kept as they are.
pub fn expand_references(map: &KeyMap) -> KeyMap {
    let by_const: IndexMap<String, &String> = map
        .keys()
        .map(|module| (const_key_name_of(module), module))
        .collect();

    map.iter()
        .map(|(module, keys)| {
            let mut out = Vec::new();
            expand_into(map, &by_const, keys, map.len(), &mut out);
            (module.clone(), out)
        })
        .collect()
}

fn expand_into(
    map: &KeyMap,
    by_const: &IndexMap<String, &String>,
    keys: &[String],
    depth: usize,
    out: &mut Vec<String>,
) {
    for key in keys {
        let target = key
            .strip_prefix(SPREAD_PREFIX)
            .and_then(|name| by_const.get(name))
            .and_then(|module| map.get(*module));
        match target {
            Some(referenced) if depth > 0 => expand_into(map, by_const, referenced, depth - 1, out),
            _ => out.push(key.clone()),
        }
    }
}

/// Sort, deduplicate and render a key map in one go
pub fn dedupe_keys(map: KeyMap) -> KeyMap {
    replace_subset_in_object(&sort_state_sets(map))
}

/// Render a key map as a TypeScript module.
///
/// Every module becomes one constant; `*State` constants stay private to
/// the file. Reference tokens render as spreads; a list that is exactly
/// one token renders as the referenced constant.
pub fn render_keys_module(map: &KeyMap) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", GENERATED_HEADER);

    for (module, keys) in map {
        let export = if is_state_module(module) { "" } else { "export " };
        let name = const_key_name_of(module);

        match keys.as_slice() {
            [only] if is_reference_token(only) => {
                let _ = writeln!(
                    out,
                    "{}const {} = {};",
                    export,
                    name,
                    &only[SPREAD_PREFIX.len()..]
                );
            }
            [] => {
                let _ = writeln!(out, "{}const {} = [] as const;", export, name);
            }
            _ => {
                let _ = writeln!(out, "{}const {} = [", export, name);
                for key in keys {
                    if is_reference_token(key) {
                        let _ = writeln!(out, "  {},", key);
                    } else {
                        let _ = writeln!(out, "  {},", quote(key));
                    }
                }
                let _ = writeln!(out, "] as const;");
            }
        }
    }

    out
}

fn quote(key: &str) -> String {
    serde_json::to_string(key).unwrap_or_else(|_| format!("\"{}\"", key))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::mock_key_map;
    use pretty_assertions::assert_eq;

    fn modules(map: &KeyMap) -> Vec<&str> {
        map.keys().map(String::as_str).collect()
    }

    #[test]
    fn test_sort_state_sets_moves_subsets_first() {
        let map = mock_key_map(&[
            ("CompositeState", &["a", "b", "c"]),
            ("Composite", &["a", "z"]),
            ("IdState", &["a"]),
        ]);
        let sorted = sort_state_sets(map);
        // Composite compares equal to both, so IdState cannot pass it
        assert_eq!(modules(&sorted), vec!["CompositeState", "Composite", "IdState"]);

        let map = mock_key_map(&[
            ("CompositeState", &["a", "b", "c"]),
            ("IdState", &["a"]),
            ("Composite", &["a", "z"]),
        ]);
        let sorted = sort_state_sets(map);
        assert_eq!(modules(&sorted), vec!["IdState", "CompositeState", "Composite"]);
    }

    #[test]
    fn test_sort_state_sets_ignores_empty_and_unrelated() {
        let map = mock_key_map(&[
            ("BState", &["x", "y"]),
            ("AState", &[]),
            ("CState", &["q"]),
            ("DState", &["x"]),
        ]);
        let sorted = sort_state_sets(map);
        // DState cannot move past CState, which compares equal to it
        assert_eq!(modules(&sorted), vec!["BState", "AState", "CState", "DState"]);
    }

    #[test]
    fn test_sort_state_sets_chain() {
        let map = mock_key_map(&[
            ("CState", &["a", "b", "c"]),
            ("BState", &["a", "b"]),
            ("AState", &["a"]),
        ]);
        let sorted = sort_state_sets(map);
        assert_eq!(modules(&sorted), vec!["AState", "BState", "CState"]);
    }

    #[test]
    fn test_replace_subset() {
        let map = mock_key_map(&[("A", &["x", "y"]), ("B", &["x", "y", "z"])]);
        let replaced = replace_subset_in_object(&map);
        assert_eq!(
            replaced,
            mock_key_map(&[("A", &["x", "y"]), ("B", &["...A_KEYS", "z"])])
        );
    }

    #[test]
    fn test_replace_subset_uses_placed_lists() {
        let map = mock_key_map(&[
            ("IdState", &["baseId"]),
            ("CompositeState", &["baseId", "items", "move"]),
            ("Composite", &["baseId", "items", "move", "orientation"]),
            ("CompositeItem", &["baseId", "items", "move", "orientation"]),
        ]);
        let replaced = replace_subset_in_object(&map);
        assert_eq!(
            replaced,
            mock_key_map(&[
                ("IdState", &["baseId"]),
                ("CompositeState", &["...ID_STATE_KEYS", "items", "move"]),
                ("Composite", &["...COMPOSITE_STATE_KEYS", "orientation"]),
                ("CompositeItem", &["...COMPOSITE_KEYS"]),
            ])
        );
    }

    #[test]
    fn test_replace_subset_is_a_fixpoint() {
        let map = mock_key_map(&[
            ("AState", &["a"]),
            ("BState", &["a", "b"]),
            ("C", &["c", "b", "a", "d"]),
            ("D", &["b", "a"]),
        ]);
        let once = replace_subset_in_object(&map);
        assert_eq!(replace_subset_in_object(&once), once);
    }

    #[test]
    fn test_expand_references_restores_keys() {
        let map = mock_key_map(&[
            ("IdState", &["baseId"]),
            ("CompositeState", &["baseId", "items", "move"]),
            ("Composite", &["baseId", "items", "move", "orientation"]),
            ("Other", &["orientation", "baseId"]),
        ]);
        let replaced = replace_subset_in_object(&map);
        let expanded = expand_references(&replaced);

        // Covered keys lead these lists, so order is kept
        for module in ["IdState", "CompositeState", "Composite"] {
            assert_eq!(expanded[module], map[module]);
        }
        // Membership is always kept
        let mut other = expanded["Other"].clone();
        other.sort();
        assert_eq!(other, vec!["baseId", "orientation"]);
    }

    #[test]
    fn test_expand_keeps_unknown_tokens() {
        let map = mock_key_map(&[("A", &["...MISSING_KEYS", "x"])]);
        assert_eq!(expand_references(&map), map);
    }

    #[test]
    fn test_render_keys_module() {
        let map = mock_key_map(&[
            ("DialogState", &["visible", "hide"]),
            ("Dialog", &["...DIALOG_STATE_KEYS", "modal"]),
            ("DialogBackdrop", &["...DIALOG_KEYS"]),
            ("Empty", &[]),
        ]);
        let rendered = render_keys_module(&map);
        assert_eq!(
            rendered,
            r#"// Automatically generated
const DIALOG_STATE_KEYS = [
  "visible",
  "hide",
] as const;
export const DIALOG_KEYS = [
  ...DIALOG_STATE_KEYS,
  "modal",
] as const;
export const DIALOG_BACKDROP_KEYS = DIALOG_KEYS;
export const EMPTY_KEYS = [] as const;
"#
        );
    }

    #[test]
    fn test_dedupe_keys() {
        let map = mock_key_map(&[
            ("DialogState", &["visible", "hide", "toggle"]),
            ("DisclosureState", &["visible", "hide"]),
            ("Dialog", &["visible", "hide", "toggle", "modal"]),
        ]);
        let deduped = dedupe_keys(map);
        assert_eq!(modules(&deduped), vec!["DisclosureState", "DialogState", "Dialog"]);
        assert_eq!(
            deduped,
            mock_key_map(&[
                ("DisclosureState", &["visible", "hide"]),
                ("DialogState", &["...DISCLOSURE_STATE_KEYS", "toggle"]),
                ("Dialog", &["...DIALOG_STATE_KEYS", "modal"]),
            ])
        );
    }
}
