//! Property extraction and type-label rendering
//!
//! Turns the property symbols a [`TypeQuery`] reports for a declaration
//! into [`PropertyDescriptor`]s ready for the prop tables.

use crate::decl::Declaration;
use crate::diagnostics::Result;
use crate::js_doc::JsDoc;
use crate::query::{PropertySymbol, TypeQuery};
use serde::{Deserialize, Serialize};
use std::fmt::Write;
use tracing::trace;

/// Type text longer than this is truncated in the label
pub const MAX_TYPE_LENGTH: usize = 50;

/// Characters kept from a truncated type text
pub const TRUNCATED_TYPE_LENGTH: usize = 47;

/// A documented property of an `Options`, `InitialState` or `StateReturn` type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyDescriptor {
    /// Property name
    pub name: String,
    /// Trimmed description of the trailing JSDoc block, empty when absent
    pub description: String,
    /// Pre-rendered inline HTML code element
    #[serde(rename = "type")]
    pub type_label: String,
}

impl PropertyDescriptor {
    /// Create a descriptor from raw type text
    pub fn new(name: impl Into<String>, description: impl Into<String>, type_text: &str) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            type_label: type_label(type_text),
        }
    }

    fn from_symbol(symbol: &PropertySymbol) -> Self {
        let description = symbol
            .doc()
            .and_then(JsDoc::description)
            .map(str::trim)
            .unwrap_or_default();
        Self::new(symbol.name.clone(), description, &symbol.type_text)
    }
}

/// Extract the properties of a declaration, in declaration order.
///
/// Properties tagged `@private` are dropped unless `include_private` is set.
pub fn extract_properties(
    query: &dyn TypeQuery,
    decl: &Declaration,
    include_private: bool,
) -> Result<Vec<PropertyDescriptor>> {
    let symbols = query.properties(decl)?;
    let props: Vec<PropertyDescriptor> = symbols
        .iter()
        .filter(|s| include_private || !s.is_private())
        .map(PropertyDescriptor::from_symbol)
        .collect();

    trace!(
        decl = %decl.name,
        total = symbols.len(),
        kept = props.len(),
        "extracted properties"
    );
    Ok(props)
}

/// Render type text as an inline `<code>` element.
///
/// Text longer than [`MAX_TYPE_LENGTH`] characters is cut to
/// [`TRUNCATED_TYPE_LENGTH`] characters plus `...`, with the full text in
/// the `title` attribute. Lengths are measured before escaping.
pub fn type_label(type_text: &str) -> String {
    if type_text.chars().count() > MAX_TYPE_LENGTH {
        let head: String = type_text.chars().take(TRUNCATED_TYPE_LENGTH).collect();
        format!(
            "<code title=\"{}\">{}...</code>",
            escape_html(type_text),
            escape_html(&head)
        )
    } else {
        format!("<code>{}</code>", escape_html(type_text))
    }
}

/// Escape markup characters and encode non-ASCII as numeric references
pub fn escape_html(text: &str) -> String {
    let escaped = html_escape::encode_quoted_attribute(text);
    let mut out = String::with_capacity(escaped.len());
    for c in escaped.chars() {
        if c == '\'' {
            out.push_str("&#x27;");
        } else if c.is_ascii() {
            out.push(c);
        } else {
            let _ = write!(out, "&#{};", c as u32);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::{mock_property, MockTypeQuery};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_short_type_label() {
        assert_eq!(type_label("boolean"), "<code>boolean</code>");
        assert_eq!(
            type_label("\"top\" | \"bottom\""),
            "<code>&quot;top&quot; | &quot;bottom&quot;</code>"
        );
    }

    #[test]
    fn test_truncated_type_label() {
        let text = "a".repeat(60);
        let label = type_label(&text);
        assert_eq!(
            label,
            format!("<code title=\"{}\">{}...</code>", text, "a".repeat(47))
        );
    }

    #[test]
    fn test_truncation_cuts_raw_text_then_escapes() {
        let text = format!("{}<T>{}", "x".repeat(46), "y".repeat(11));
        assert_eq!(text.chars().count(), 60);
        assert_eq!(
            type_label(&text),
            format!(
                "<code title=\"{}&lt;T&gt;{}\">{}&lt;...</code>",
                "x".repeat(46),
                "y".repeat(11),
                "x".repeat(46)
            )
        );
    }

    #[test]
    fn test_exactly_fifty_chars_is_not_truncated() {
        let text = "b".repeat(50);
        assert_eq!(type_label(&text), format!("<code>{}</code>", text));
    }

    #[test]
    fn test_truncation_measured_before_escaping() {
        // 48 characters, escaping would push it over the limit
        let text = format!("{}<T>", "x".repeat(45));
        assert_eq!(text.len(), 48);
        assert_eq!(
            type_label(&text),
            format!("<code>{}&lt;T&gt;</code>", "x".repeat(45))
        );
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html("Record<'a', \"b\"> & é"),
            "Record&lt;&#x27;a&#x27;, &quot;b&quot;&gt; &amp; &#233;"
        );
    }

    #[test]
    fn test_extract_properties_filters_private() {
        let decl = Declaration::type_alias("DialogOptions", "/src/Dialog/Dialog.ts");
        let query = MockTypeQuery::new().with_properties(
            &decl,
            vec![
                mock_property("modal", "boolean", "  Toggles modal state.  "),
                mock_property("unstable_ref", "any", "Ref.").with_doc(JsDoc::parse("* @private")),
                mock_property("hide", "() => void", ""),
            ],
        );

        let props = extract_properties(&query, &decl, false).unwrap();
        assert_eq!(
            props,
            vec![
                PropertyDescriptor::new("modal", "Toggles modal state.", "boolean"),
                PropertyDescriptor::new("hide", "", "() => void"),
            ]
        );

        let all = extract_properties(&query, &decl, true).unwrap();
        assert_eq!(all.len(), 3);
        // The trailing block carries no description
        assert_eq!(all[1].description, "");
    }
}
