//! Recommendation block parsing.
//!
//! The model may embed a follow-up proposal anywhere in its reply:
//!
//! ```text
//! <recommendation>
//! <title>Clean up build artifacts</title>
//! <description>The target directory is large and stale.</description>
//! <actions>
//! - delete the target directory
//! - run cargo clean
//! </actions>
//! </recommendation>
//! ```
//!
//! Each `-`-prefixed line inside `<actions>` is one follow-up action
//! description. A block whose actions normalize to nothing is treated as no
//! recommendation at all.

/// A model-proposed set of follow-up actions requiring separate consent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recommendation {
    pub title: String,
    pub description: String,
    /// Ordered free-text action descriptions
    pub actions: Vec<String>,
}

/// Extract a recommendation block from assistant text.
///
/// Returns `None` when no block is present, the block is malformed, or no
/// non-empty action lines survive normalization.
pub fn parse_recommendation(text: &str) -> Option<Recommendation> {
    let block = section(text, "recommendation")?;

    let title = section(&block, "title")
        .map(|s| s.trim().to_string())
        .unwrap_or_default();
    let description = section(&block, "description")
        .map(|s| s.trim().to_string())
        .unwrap_or_default();

    let actions: Vec<String> = section(&block, "actions")
        .map(|body| {
            body.lines()
                .filter_map(|line| {
                    let line = line.trim();
                    line.strip_prefix('-').map(|rest| rest.trim().to_string())
                })
                .filter(|item| !item.is_empty())
                .collect()
        })
        .unwrap_or_default();

    if actions.is_empty() {
        return None;
    }

    Some(Recommendation {
        title,
        description,
        actions,
    })
}

/// Slice the body between `<tag>` and `</tag>`, if both are present in order.
fn section(text: &str, tag: &str) -> Option<String> {
    let open = format!("<{}>", tag);
    let close = format!("</{}>", tag);

    let start = text.find(&open)? + open.len();
    let end = text[start..].find(&close)? + start;
    Some(text[start..end].to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_block() {
        let text = r#"Done! The file is created.

<recommendation>
<title>Add a README</title>
<description>New projects usually want one.</description>
<actions>
- create a README.md with a short project summary
- list the directory to confirm
</actions>
</recommendation>"#;

        let rec = parse_recommendation(text).unwrap();
        assert_eq!(rec.title, "Add a README");
        assert_eq!(rec.description, "New projects usually want one.");
        assert_eq!(rec.actions.len(), 2);
        assert_eq!(rec.actions[0], "create a README.md with a short project summary");
    }

    #[test]
    fn test_block_embedded_in_prose() {
        let text = "prefix prose <recommendation><title>T</title><description>D</description><actions>\n- one\n</actions></recommendation> suffix";
        let rec = parse_recommendation(text).unwrap();
        assert_eq!(rec.actions, vec!["one".to_string()]);
    }

    #[test]
    fn test_no_block_returns_none() {
        assert_eq!(parse_recommendation("just a normal reply"), None);
    }

    #[test]
    fn test_empty_actions_returns_none() {
        let text = "<recommendation><title>T</title><description>D</description><actions>\n</actions></recommendation>";
        assert_eq!(parse_recommendation(text), None);
    }

    #[test]
    fn test_blank_dash_lines_are_dropped() {
        let text = "<recommendation><title>T</title><description>D</description><actions>\n- \n-\n- real action\n</actions></recommendation>";
        let rec = parse_recommendation(text).unwrap();
        assert_eq!(rec.actions, vec!["real action".to_string()]);
    }

    #[test]
    fn test_non_dash_lines_are_ignored() {
        let text = "<recommendation><title>T</title><description>D</description><actions>\nsome preamble\n- only this\n</actions></recommendation>";
        let rec = parse_recommendation(text).unwrap();
        assert_eq!(rec.actions, vec!["only this".to_string()]);
    }

    #[test]
    fn test_missing_title_defaults_empty() {
        let text = "<recommendation><actions>\n- act\n</actions></recommendation>";
        let rec = parse_recommendation(text).unwrap();
        assert_eq!(rec.title, "");
        assert_eq!(rec.actions.len(), 1);
    }

    #[test]
    fn test_unclosed_block_returns_none() {
        let text = "<recommendation><title>T</title><actions>\n- a\n</actions>";
        assert_eq!(parse_recommendation(text), None);
    }
}
