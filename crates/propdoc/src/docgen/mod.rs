//! Prop documentation generation
//!
//! Renders aggregated module props as Markdown and splices the result into
//! README files under their props heading.

pub mod inject;
mod markdown;

pub use inject::{headings, inject_section, HeadingSpan};
pub use markdown::{
    render_prop, MarkdownRenderer, EXPERIMENTAL_MARKER, NO_PROPS, STATE_PROPS_NOTE,
};
