//! JSDoc parsing and representation
//!
//! Property documentation in the prop tables comes from the JSDoc block
//! attached to each property signature. Only the description and the tag
//! names matter here: `@private` hides a property, every other tag is kept
//! by name with its raw text.

use serde::{Deserialize, Serialize};

/// Parsed JSDoc documentation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JsDoc {
    /// Main description text
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub description: Option<String>,

    /// Parsed JSDoc tags
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub tags: Vec<JsDocTag>,
}

impl JsDoc {
    /// Create from description only
    pub fn from_description(desc: impl Into<String>) -> Self {
        Self {
            description: Some(desc.into()),
            tags: Vec::new(),
        }
    }

    /// Parse JSDoc from a comment string
    ///
    /// Accepts the comment body as handed out by SWC (leading `*` kept,
    /// delimiters removed) as well as a full `/** ... */` block.
    pub fn parse(comment: &str) -> Self {
        let cleaned = clean_jsdoc_comment(comment);
        let description = extract_description(&cleaned);
        let tags = parse_tags(&cleaned);

        Self { description, tags }
    }

    /// Get the main description
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Check if marked @private
    pub fn is_private(&self) -> bool {
        self.tags.iter().any(|t| matches!(t, JsDocTag::Private))
    }
}

/// JSDoc tag types
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum JsDocTag {
    /// @private
    Private,

    /// Any other tag, kept by name
    #[serde(rename_all = "camelCase")]
    Unknown { tag: String, value: String },
}

/// Clean JSDoc comment by removing delimiters and leading `*`
///
/// Blank lines are kept so descriptions keep their paragraphs.
fn clean_jsdoc_comment(comment: &str) -> String {
    let mut lines = Vec::new();

    for line in comment.lines() {
        let trimmed = line.trim();

        if trimmed == "/**" || trimmed == "*/" {
            continue;
        }

        let mut content = trimmed;

        if content.starts_with("/**") {
            content = content.trim_start_matches("/**").trim_start();
        }

        if content.starts_with("* ") {
            content = &content[2..];
        } else if content.starts_with('*') {
            content = &content[1..];
        }

        if content.ends_with("*/") {
            content = content.trim_end_matches("*/").trim_end();
        }

        lines.push(content.trim_end());
    }

    lines.join("\n").trim().to_string()
}

/// Extract description text before the first tag
fn extract_description(text: &str) -> Option<String> {
    let first_tag_pos = text
        .find("\n@")
        .or_else(|| if text.starts_with('@') { Some(0) } else { None });

    let desc = match first_tag_pos {
        Some(0) => return None,
        Some(pos) => &text[..pos],
        None => text,
    };

    let trimmed = desc.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Parse all JSDoc tags from the comment
fn parse_tags(text: &str) -> Vec<JsDocTag> {
    let mut tags = Vec::new();
    let mut current_tag: Option<(String, String)> = None;

    for line in text.lines() {
        let trimmed = line.trim();

        if let Some(after_at) = trimmed.strip_prefix('@') {
            if let Some((tag_name, content)) = current_tag.take() {
                tags.push(parse_single_tag(&tag_name, &content));
            }

            current_tag = Some(match after_at.split_once(char::is_whitespace) {
                Some((name, rest)) => (name.to_string(), rest.to_string()),
                None => (after_at.to_string(), String::new()),
            });
        } else if let Some((_, ref mut content)) = current_tag {
            if !content.is_empty() {
                content.push('\n');
            }
            content.push_str(trimmed);
        }
    }

    if let Some((tag_name, content)) = current_tag {
        tags.push(parse_single_tag(&tag_name, &content));
    }

    tags
}

/// Parse a single JSDoc tag
fn parse_single_tag(tag_name: &str, content: &str) -> JsDocTag {
    match tag_name {
        "private" => JsDocTag::Private,
        _ => JsDocTag::Unknown {
            tag: tag_name.to_string(),
            value: content.trim().to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_description_only() {
        let doc = JsDoc::parse("* Whether it's visible or not. ");
        assert_eq!(doc.description(), Some("Whether it's visible or not."));
        assert!(doc.tags.is_empty());
    }

    #[test]
    fn test_parse_multiline_keeps_paragraphs() {
        let doc = JsDoc::parse(
            "*\n * First paragraph.\n *\n * Second paragraph\n * continues here.\n ",
        );
        assert_eq!(
            doc.description(),
            Some("First paragraph.\n\nSecond paragraph\ncontinues here.")
        );
    }

    #[test]
    fn test_parse_private_tag() {
        let doc = JsDoc::parse("*\n * Internal ref.\n * @private\n ");
        assert_eq!(doc.description(), Some("Internal ref."));
        assert!(doc.is_private());
        assert_eq!(doc.tags, vec![JsDocTag::Private]);
    }

    #[test]
    fn test_parse_full_block() {
        let doc = JsDoc::parse("/**\n * Placement.\n * @default \"bottom\"\n */");
        assert_eq!(doc.description(), Some("Placement."));
        assert_eq!(
            doc.tags,
            vec![JsDocTag::Unknown {
                tag: "default".to_string(),
                value: "\"bottom\"".to_string()
            }]
        );
        assert!(!doc.is_private());
    }

    #[test]
    fn test_parse_tag_only() {
        let doc = JsDoc::parse("* @deprecated use `modal` instead");
        assert!(doc.description().is_none());
        assert_eq!(doc.tags.len(), 1);
        assert!(!doc.is_private());
    }

    #[test]
    fn test_unknown_tag() {
        let doc = JsDoc::parse("* @since 1.0");
        assert_eq!(
            doc.tags,
            vec![JsDocTag::Unknown {
                tag: "since".to_string(),
                value: "1.0".to_string()
            }]
        );
    }
}
