//! Sync gate
//!
//! Decides from the label set alone whether an issue is mirrored. The labels
//! are the only sync state: `accepted` opts an issue in, `synced` records that
//! a ticket already exists. `synced` always wins.

use super::model::SourceIssue;
use std::fmt;

/// Why an issue was not mirrored
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    AlreadySynced,
    NotAccepted,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::AlreadySynced => write!(f, "already synced"),
            SkipReason::NotAccepted => write!(f, "not accepted"),
        }
    }
}

/// Gate verdict for one issue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    Mirror,
    Skip(SkipReason),
}

/// Evaluate the gate for an issue
pub fn evaluate(issue: &SourceIssue, accepted_label: &str, synced_label: &str) -> GateDecision {
    if issue.has_label(synced_label) {
        GateDecision::Skip(SkipReason::AlreadySynced)
    } else if !issue.has_label(accepted_label) {
        GateDecision::Skip(SkipReason::NotAccepted)
    } else {
        GateDecision::Mirror
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn issue_with(labels: &[&str]) -> SourceIssue {
        SourceIssue {
            number: 1,
            title: "t".to_string(),
            body: String::new(),
            url: "https://github.com/acme/widgets/issues/1".to_string(),
            labels: labels.iter().map(|l| l.to_string()).collect(),
            updated_at: Utc::now(),
        }
    }

    fn mirrors(issue: &SourceIssue) -> bool {
        evaluate(issue, "accepted", "synced") == GateDecision::Mirror
    }

    /// Every subset of a small label universe
    fn label_sets() -> Vec<Vec<&'static str>> {
        let universe = ["accepted", "synced", "bug", "Accepted"];
        (0..1u32 << universe.len())
            .map(|mask| {
                universe
                    .iter()
                    .enumerate()
                    .filter(|(i, _)| mask & (1 << i) != 0)
                    .map(|(_, l)| *l)
                    .collect()
            })
            .collect()
    }

    #[test]
    fn test_synced_takes_priority() {
        for labels in label_sets() {
            let issue = issue_with(&labels);
            if labels.contains(&"synced") {
                assert!(!mirrors(&issue), "{:?}", labels);
                assert_eq!(
                    evaluate(&issue, "accepted", "synced"),
                    GateDecision::Skip(SkipReason::AlreadySynced)
                );
            }
        }
    }

    #[test]
    fn test_unsynced_mirrors_iff_accepted() {
        for labels in label_sets() {
            if labels.contains(&"synced") {
                continue;
            }
            let issue = issue_with(&labels);
            assert_eq!(
                mirrors(&issue),
                labels.contains(&"accepted"),
                "{:?}",
                labels
            );
        }
    }

    #[test]
    fn test_not_accepted_reason() {
        let issue = issue_with(&[]);
        assert_eq!(
            evaluate(&issue, "accepted", "synced"),
            GateDecision::Skip(SkipReason::NotAccepted)
        );
        assert_eq!(SkipReason::NotAccepted.to_string(), "not accepted");
    }

    #[test]
    fn test_label_match_is_case_sensitive() {
        let issue = issue_with(&["Accepted"]);
        assert!(!mirrors(&issue));
    }

    #[test]
    fn test_accepted_and_synced() {
        let issue = issue_with(&["accepted", "synced"]);
        assert_eq!(SkipReason::AlreadySynced.to_string(), "already synced");
        assert_eq!(
            evaluate(&issue, "accepted", "synced"),
            GateDecision::Skip(SkipReason::AlreadySynced)
        );
    }
}
