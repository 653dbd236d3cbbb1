//! Property-based tests for ticket extraction, name validation and templating.
//!
//! Uses `proptest` to verify invariants across many random inputs.

#![allow(clippy::expect_used)]

use std::collections::HashSet;

use proptest::prelude::*;

use fct_cli::application::services::maintenance;
use fct_cli::domain::{project, template, tickets};

// ============================================================================
// extract_ticket_ids()
// ============================================================================

proptest! {
    /// Every id referenced anywhere is reported exactly once.
    #[test]
    fn prop_extracted_ids_are_unique_and_complete(
        ids in proptest::collection::vec(1u32..5000, 0..20),
        filler in "[a-z ]{0,12}",
    ) {
        let subjects: Vec<String> = ids
            .iter()
            .map(|id| format!("{filler}#{id} {filler}"))
            .collect();
        let extracted = tickets::extract_ticket_ids(&subjects);

        let unique: HashSet<&String> = extracted.iter().collect();
        prop_assert_eq!(unique.len(), extracted.len());
        let expected: HashSet<String> = ids.iter().map(ToString::to_string).collect();
        let got: HashSet<String> = extracted.iter().cloned().collect();
        prop_assert_eq!(got, expected);
    }

    /// The first mention decides the position.
    #[test]
    fn prop_extraction_keeps_first_seen_order(ids in proptest::collection::vec(1u32..50, 1..30)) {
        let subjects: Vec<String> = ids.iter().map(|id| format!("fix #{id}")).collect();
        let extracted = tickets::extract_ticket_ids(&subjects);

        let mut seen = HashSet::new();
        let expected: Vec<String> = ids
            .iter()
            .map(ToString::to_string)
            .filter(|id| seen.insert(id.clone()))
            .collect();
        prop_assert_eq!(extracted, expected);
    }

    /// Subjects without `#` never yield ids.
    #[test]
    fn prop_no_hash_no_ids(subjects in proptest::collection::vec("[a-zA-Z0-9 ]{0,40}", 0..10)) {
        prop_assert!(tickets::extract_ticket_ids(&subjects).is_empty());
    }
}

// ============================================================================
// validate_name()
// ============================================================================

proptest! {
    /// Names with shell metacharacters are always rejected.
    #[test]
    fn prop_names_with_metacharacters_rejected(
        prefix in "[a-z]{1,10}",
        bad in "[ ;&|$`'\"/\\\\]",
        suffix in "[a-z]{0,10}",
    ) {
        let name = format!("{prefix}{bad}{suffix}");
        prop_assert!(project::validate_name("project slug", &name).is_err(), "accepted {}", name);
    }

    /// Plain slugs are accepted.
    #[test]
    fn prop_plain_slugs_accepted(name in "[a-z][a-z0-9_-]{0,30}") {
        prop_assert!(project::validate_name("project slug", &name).is_ok(), "rejected {}", name);
    }
}

// ============================================================================
// template::substitute() and prune_command()
// ============================================================================

proptest! {
    /// Text without placeholders passes through unchanged.
    #[test]
    fn prop_substitute_is_identity_without_placeholders(text in "[^{}]{0,80}") {
        let ctx = template::context([("project", "shop")]);
        prop_assert_eq!(template::substitute(&text, &ctx), text);
    }

    /// One refspec per branch.
    #[test]
    fn prop_prune_command_has_one_refspec_per_branch(
        branches in proptest::collection::vec("[a-z][a-z0-9-]{0,15}", 1..10),
    ) {
        let cmd = maintenance::prune_command(&branches).expect("non-empty");
        prop_assert!(cmd.starts_with("git push origin "));
        prop_assert_eq!(cmd.matches(" :").count(), branches.len());
    }
}
