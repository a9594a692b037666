//! README section injection
//!
//! Locates a heading with comrak and replaces everything between it and
//! the next heading of the same or a higher level. Text outside the section
//! is kept byte for byte, so injecting the same fragment twice yields the
//! same document.

use crate::diagnostics::{PropdocError, Result};
use comrak::nodes::{AstNode, NodeValue};
use comrak::{parse_document, Arena, Options};
use std::path::Path;

/// A heading found in a Markdown document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadingSpan {
    /// Heading level, 1 to 6
    pub level: u8,
    /// 1-indexed first line of the heading
    pub start_line: usize,
    /// 1-indexed last line of the heading (setext headings span two)
    pub end_line: usize,
    /// Plain text of the heading
    pub title: String,
}

fn heading_text<'a>(node: &'a AstNode<'a>) -> String {
    let mut text = String::new();
    for descendant in node.descendants() {
        match &descendant.data.borrow().value {
            NodeValue::Text(t) => text.push_str(t),
            NodeValue::Code(code) => text.push_str(&code.literal),
            _ => {}
        }
    }
    text.trim().to_string()
}

/// Top-level headings of a document, in order
pub fn headings(markdown: &str) -> Vec<HeadingSpan> {
    let arena = Arena::new();
    let options = Options::default();
    let root = parse_document(&arena, markdown, &options);

    root.children()
        .filter_map(|node| {
            let data = node.data.borrow();
            match &data.value {
                NodeValue::Heading(heading) => Some(HeadingSpan {
                    level: heading.level,
                    start_line: data.sourcepos.start.line,
                    end_line: data.sourcepos.end.line,
                    title: heading_text(node),
                }),
                _ => None,
            }
        })
        .collect()
}

/// Replace the section under `heading` with `fragment`.
///
/// Returns `Ok(None)` when the document has no such heading. The section
/// must be a level 1 or 2 heading, since the fragment may bring its own
/// level 3 headings.
pub fn inject_section(
    file: &Path,
    markdown: &str,
    heading: &str,
    fragment: &str,
) -> Result<Option<String>> {
    let headings = headings(markdown);
    let Some(index) = headings.iter().position(|h| h.title == heading) else {
        return Ok(None);
    };
    let target = &headings[index];

    if target.level > 2 {
        return Err(PropdocError::markdown(
            file,
            format!(
                "heading `{}` is level {}, expected level 1 or 2",
                heading, target.level
            ),
        ));
    }

    let next_line = headings[index + 1..]
        .iter()
        .find(|h| h.level <= target.level)
        .map(|h| h.start_line);

    let lines: Vec<&str> = markdown.split_inclusive('\n').collect();
    if target.end_line > lines.len() {
        return Err(PropdocError::markdown(
            file,
            format!("heading `{}` lies outside the document", heading),
        ));
    }

    let mut out: String = lines[..target.end_line].concat();
    if !out.ends_with('\n') {
        out.push('\n');
    }
    out.push('\n');
    out.push_str(fragment.trim_end_matches('\n'));
    out.push('\n');

    if let Some(next) = next_line {
        out.push('\n');
        out.push_str(&lines[next - 1..].concat());
    }

    Ok(Some(out))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const README: &str = "# Dialog\n\nIntro.\n\n## Props\n\nOld table.\n\n```md\n## Not a heading\n```\n\n### Stale\n\n## Related\n\nLinks.\n";

    #[test]
    fn test_headings() {
        let found = headings(README);
        let titles: Vec<(&str, u8, usize)> = found
            .iter()
            .map(|h| (h.title.as_str(), h.level, h.start_line))
            .collect();
        assert_eq!(
            titles,
            vec![("Dialog", 1, 1), ("Props", 2, 5), ("Stale", 3, 13), ("Related", 2, 15)]
        );
    }

    #[test]
    fn test_inject_section() {
        let out = inject_section(Path::new("README.md"), README, "Props", "### Dialog\n\nNo props to show\n")
            .unwrap()
            .unwrap();
        assert_eq!(
            out,
            "# Dialog\n\nIntro.\n\n## Props\n\n### Dialog\n\nNo props to show\n\n## Related\n\nLinks.\n"
        );
    }

    #[test]
    fn test_inject_is_idempotent() {
        let fragment = "### Dialog\n\n- **`modal`**\n  <code>boolean</code>\n";
        let once = inject_section(Path::new("README.md"), README, "Props", fragment)
            .unwrap()
            .unwrap();
        let twice = inject_section(Path::new("README.md"), &once, "Props", fragment)
            .unwrap()
            .unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_inject_at_end_of_document() {
        let readme = "# Button\n\n## Props";
        let out = inject_section(Path::new("README.md"), readme, "Props", "### Button\n")
            .unwrap()
            .unwrap();
        assert_eq!(out, "# Button\n\n## Props\n\n### Button\n");
    }

    #[test]
    fn test_missing_heading() {
        let out = inject_section(Path::new("README.md"), "# Title\n", "Props", "x").unwrap();
        assert!(out.is_none());
    }

    #[test]
    fn test_deep_heading_is_an_error() {
        let result = inject_section(Path::new("README.md"), "### Props\n", "Props", "x");
        assert!(matches!(result, Err(PropdocError::Markdown { .. })));
    }
}
