//! Markdown to Jira wiki markup
//!
//! A fixed replacement table, not a Markdown parser. Each rule replaces every
//! occurrence and the rules run in order; the `hcl` fence must be rewritten
//! before bare fences, since a bare fence is a prefix of it.

use super::model::SourceIssue;

/// Label in front of the issue link at the top of every description
pub const SOURCE_LABEL: &str = "GitHub issue";

const CODE_TOKEN: &str = "{code}";

/// Replacement table, applied top to bottom
const RULES: &[(&str, &str)] = &[
    ("- [X] ", "✅ "),
    ("###", "h3."),
    ("```hcl", CODE_TOKEN),
    ("```", CODE_TOKEN),
];

/// Header linking the ticket back to its source issue
pub fn header(url: &str) -> String {
    format!("{}: {}\n\n---\n\n", SOURCE_LABEL, url)
}

/// Apply the replacement table to `text`
pub fn apply_markup(text: &str) -> String {
    RULES
        .iter()
        .fold(text.to_string(), |acc, (from, to)| acc.replace(from, to))
}

/// Jira description for an issue: link header plus the converted body
pub fn translate(issue: &SourceIssue) -> String {
    apply_markup(&format!("{}{}", header(&issue.url), issue.body))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn issue(body: &str) -> SourceIssue {
        SourceIssue {
            number: 9,
            title: "Fix typo".to_string(),
            body: body.to_string(),
            url: "https://github.com/acme/widgets/issues/9".to_string(),
            labels: Default::default(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_header_then_body() {
        assert_eq!(
            translate(&issue("line one")),
            "GitHub issue: https://github.com/acme/widgets/issues/9\n\n---\n\nline one"
        );
    }

    #[test]
    fn test_empty_body() {
        assert_eq!(
            translate(&issue("")),
            "GitHub issue: https://github.com/acme/widgets/issues/9\n\n---\n\n"
        );
    }

    #[test]
    fn test_checkbox_and_heading() {
        let out = translate(&issue("### Heading\n- [X] done\n- [ ] todo\n- [x] lower"));
        assert!(out.contains("h3. Heading"));
        assert!(out.contains("✅ done"));
        assert!(!out.contains("- [X] "));
        // only the capital X form is converted
        assert!(out.contains("- [ ] todo"));
        assert!(out.contains("- [x] lower"));
    }

    #[test]
    fn test_hcl_fence_before_bare_fence() {
        let out = apply_markup("```hcl\nresource \"x\" {}\n```\n```\nplain\n```");
        assert_eq!(out, "{code}\nresource \"x\" {}\n{code}\n{code}\nplain\n{code}");
        assert!(!out.contains("hcl"));
        assert!(!out.contains('`'));
    }

    #[test]
    fn test_other_fence_languages_keep_their_tag() {
        // Only hcl is special-cased; other tags survive after the fence token
        assert_eq!(apply_markup("```rust\nfn main() {}\n```"), "{code}rust\nfn main() {}\n{code}");
    }

    #[test]
    fn test_markup_is_idempotent() {
        let samples = [
            "plain text",
            "### A\n- [X] b\n```hcl\nc\n```",
            "#####\n```\n```hcl```",
            "- [X] - [X] ######",
        ];
        for sample in samples {
            let once = apply_markup(sample);
            assert_eq!(apply_markup(&once), once, "sample: {:?}", sample);
        }
    }

    #[test]
    fn test_clean_body_only_gets_header() {
        let body = "Nothing to convert here.\n\n* bullet\n**bold**";
        assert_eq!(translate(&issue(body)), format!("{}{}", header(&issue(body).url), body));
    }
}
