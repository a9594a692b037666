//! Markdown rendering of prop tables
//!
//! Renders a [`ModulePropMap`] as the Markdown fragment placed under a
//! README's props heading: one `###` section per module, props as a bullet
//! list, inherited state props folded into a `<details>` block.

use crate::aggregate::{ModuleProps, ModulePropMap};
use crate::naming::is_experimental;
use crate::props::PropertyDescriptor;

/// Marker rendered after experimental prop names
pub const EXPERIMENTAL_MARKER: &str = r#"<span title="Experimental">⚠️</span>"#;

/// Placeholder for a module with nothing to document
pub const NO_PROPS: &str = "No props to show";

/// Sentence introducing the inherited state props
pub const STATE_PROPS_NOTE: &str = "These props are returned by the state hook. You can spread them into this component (`{...state}`) or pass them separately. You can also provide these props from your own state logic.";

/// Markdown renderer for prop tables
#[derive(Debug, Clone)]
pub struct MarkdownRenderer {
    /// Heading level of module sections
    pub heading_level: usize,
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self { heading_level: 3 }
    }
}

impl MarkdownRenderer {
    /// Create a new markdown renderer
    pub fn new() -> Self {
        Self::default()
    }

    /// Render every module, in map order
    pub fn render(&self, map: &ModulePropMap) -> String {
        map.iter()
            .map(|(name, props)| self.render_module(name, props))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Render one module section
    pub fn render_module(&self, name: &str, module: &ModuleProps) -> String {
        let mut md = format!("{} {}\n\n", "#".repeat(self.heading_level), name);

        if module.is_empty() {
            md.push_str(NO_PROPS);
            md.push('\n');
            return md;
        }

        md.push_str(&render_props(&module.props));

        if !module.state_props.is_empty() {
            if !module.props.is_empty() {
                md.push('\n');
            }
            md.push_str(&format!(
                "<details><summary>{} state props</summary>\n\n",
                module.state_props.len()
            ));
            md.push_str(&format!("> {}\n\n", STATE_PROPS_NOTE));
            md.push_str(&render_props(&module.state_props));
            md.push_str("\n</details>\n");
        }

        md
    }
}

fn render_props(props: &[PropertyDescriptor]) -> String {
    props
        .iter()
        .map(render_prop)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Render one prop as a list item
pub fn render_prop(prop: &PropertyDescriptor) -> String {
    let mut md = format!("- **`{}`**", prop.name);
    if is_experimental(&prop.name) {
        md.push(' ');
        md.push_str(EXPERIMENTAL_MARKER);
    }
    md.push_str("\n  ");
    md.push_str(&prop.type_label);
    md.push('\n');

    if !prop.description.is_empty() {
        md.push('\n');
        md.push_str(&indent(&prop.description, "  "));
        md.push('\n');
    }
    md
}

/// Indent every non-blank line
fn indent(text: &str, prefix: &str) -> String {
    text.lines()
        .map(|line| {
            if line.trim().is_empty() {
                String::new()
            } else {
                format!("{}{}", prefix, line)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}
