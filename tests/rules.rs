//! Tests for rule construction and policy resolution.

mod util;

use chrono::TimeDelta;
use chronosweep::{Action, Error, FolderRule, PatternRule};
use std::path::{Path, PathBuf};
use util::scratch;

fn days(n: i64) -> TimeDelta {
    TimeDelta::days(n)
}

#[test]
fn action_round_trips_config_spelling() {
    for action in [Action::Delete, Action::Trash, Action::SystemTrash] {
        assert_eq!(action.as_str().parse::<Action>().unwrap(), action);
    }
    assert_eq!(Action::SystemTrash.to_string(), "system_trash");
    assert_eq!(Action::default(), Action::Delete);
}

#[test]
fn action_rejects_unknown_names() {
    let err = "shred".parse::<Action>().unwrap_err();
    assert!(matches!(err, Error::InvalidAction(ref s) if s == "shred"));
    assert!("Trash".parse::<Action>().is_err());
}

#[test]
fn folder_rule_defaults() {
    let (_dir, base) = scratch();
    let rule = FolderRule::builder(&base, days(10)).build().unwrap();
    assert_eq!(rule.path(), base);
    assert_eq!(rule.retention(), days(10));
    assert_eq!(rule.notify_before(), &[TimeDelta::zero()]);
    assert_eq!(rule.action(), Action::Delete);
    assert!(rule.exemptions().is_empty());
    assert!(rule.patterns().is_empty());
}

#[test]
fn folder_rule_rejects_negative_durations() {
    let (_dir, base) = scratch();
    let err = FolderRule::builder(&base, days(-1)).build().unwrap_err();
    assert!(matches!(err, Error::NegativeDuration(_)));

    let err = FolderRule::builder(&base, days(1))
        .notify_before([days(1), TimeDelta::hours(-2)])
        .build()
        .unwrap_err();
    assert!(matches!(err, Error::NegativeDuration(_)));
}

#[test]
fn lead_times_are_sorted_and_deduplicated() {
    let (_dir, base) = scratch();
    let rule = FolderRule::builder(&base, days(10))
        .notify_before([days(5), days(2), days(5), TimeDelta::hours(48)])
        .build()
        .unwrap();
    assert_eq!(rule.notify_before(), &[days(2), days(5)]);
}

#[test]
fn path_is_canonicalized() {
    let (_dir, base) = scratch();
    std::fs::create_dir_all(base.join("a/b")).unwrap();
    let rule = FolderRule::builder(base.join("a/b/.."), days(1))
        .build()
        .unwrap();
    assert_eq!(rule.path(), base.join("a"));
}

#[test]
fn missing_path_is_made_absolute() {
    let rule = FolderRule::builder("does-not-exist-here", days(1))
        .build()
        .unwrap();
    assert!(rule.path().is_absolute());
    assert!(rule.path().ends_with("does-not-exist-here"));
    assert!(!rule.is_active());
}

#[test]
fn exemptions_are_trimmed_and_normalized() {
    let (_dir, base) = scratch();
    let rule = FolderRule::builder(&base, days(1))
        .exemptions(["  keep.txt ", "", "./projects/keep", "keep.txt", "   "])
        .build()
        .unwrap();
    assert_eq!(
        rule.exemptions(),
        &[PathBuf::from("keep.txt"), PathBuf::from("projects/keep")]
    );
}

#[test]
fn pattern_rule_validates() {
    let pattern = PatternRule::builder("  ^ScreenShot ", days(1))
        .notify_before([days(1), TimeDelta::zero(), days(1)])
        .action(Action::Trash)
        .build()
        .unwrap();
    assert_eq!(pattern.pattern(), "^ScreenShot");
    assert_eq!(pattern.notify_before(), &[TimeDelta::zero(), days(1)]);
    assert_eq!(pattern.action(), Action::Trash);

    let err = PatternRule::builder("([unclosed", days(1)).build().unwrap_err();
    assert!(matches!(err, Error::InvalidPattern { .. }));

    let err = PatternRule::builder("^x", days(-3)).build().unwrap_err();
    assert!(matches!(err, Error::NegativeDuration(_)));
}

#[test]
fn pattern_matching_is_prefix_anchored() {
    let screen = PatternRule::builder("^Screen", days(1)).build().unwrap();
    assert!(screen.matches("ScreenShot_1.png"));
    assert!(screen.matches("Screenish.txt"));
    assert!(!screen.matches("MyScreenShot.png"));

    // No leading caret still anchors at the start, like a `match` call.
    let shot = PatternRule::builder("Shot", days(1)).build().unwrap();
    assert!(shot.matches("Shot.png"));
    assert!(!shot.matches("ScreenShot.png"));

    let alternation = PatternRule::builder("a|b", days(1)).build().unwrap();
    assert!(alternation.matches("b.txt"));
    assert!(!alternation.matches("cb.txt"));
}

#[test]
fn first_matching_pattern_wins_and_replaces_lead_times() {
    let (_dir, base) = scratch();
    let rule = FolderRule::builder(&base, days(10))
        .notify_before([days(2), days(5)])
        .action(Action::Trash)
        .pattern(
            PatternRule::builder("^Screen", days(1))
                .notify_before([TimeDelta::hours(6)])
                .build()
                .unwrap(),
        )
        .pattern(
            PatternRule::builder("^ScreenShot", days(3))
                .action(Action::SystemTrash)
                .build()
                .unwrap(),
        )
        .build()
        .unwrap();

    let shot = rule.effective_policy(Path::new("nested/ScreenShot_1.png"));
    assert_eq!(shot.retention, days(1));
    assert_eq!(shot.action, Action::Delete);
    assert_eq!(shot.notify_before, &[TimeDelta::hours(6)]);

    let other = rule.effective_policy(Path::new("generic.txt"));
    assert_eq!(other.retention, days(10));
    assert_eq!(other.action, Action::Trash);
    assert_eq!(other.notify_before, &[days(2), days(5)]);
}

#[test]
fn policy_matches_base_name_not_relative_path() {
    let (_dir, base) = scratch();
    let rule = FolderRule::builder(&base, days(10))
        .pattern(PatternRule::builder("^tmp", days(1)).build().unwrap())
        .build()
        .unwrap();
    assert_eq!(rule.effective_policy(Path::new("tmp/file.txt")).retention, days(10));
    assert_eq!(rule.effective_policy(Path::new("a/tmp_1")).retention, days(1));
}

#[test]
fn bare_name_exemption_matches_at_any_depth() {
    let (_dir, base) = scratch();
    let rule = FolderRule::builder(&base, days(1))
        .exemption("keep.log")
        .build()
        .unwrap();
    assert!(rule.is_exempt(Path::new("keep.log")));
    assert!(rule.is_exempt(Path::new("a/b/c/keep.log")));
    assert!(!rule.is_exempt(Path::new("keep.log.bak")));
    assert!(!rule.is_exempt(Path::new("a/keeper.log")));
}

#[test]
fn relative_exemption_covers_subtree() {
    let (_dir, base) = scratch();
    let rule = FolderRule::builder(&base, days(1))
        .exemption("projects/keep")
        .build()
        .unwrap();
    assert!(rule.is_exempt(Path::new("projects/keep")));
    assert!(rule.is_exempt(Path::new("projects/keep/src/main.rs")));
    assert!(!rule.is_exempt(Path::new("projects")));
    assert!(!rule.is_exempt(Path::new("projects/keeper")));
    // Last component doubles as a bare name.
    assert!(rule.is_exempt(Path::new("elsewhere/keep")));
}

#[test]
fn absolute_exemption_needs_exact_match() {
    let (_dir, base) = scratch();
    let rule = FolderRule::builder(&base, days(1))
        .exemption("/abs/keep")
        .build()
        .unwrap();
    assert!(!rule.is_exempt(Path::new("abs/keep")));
    assert!(!rule.is_exempt(Path::new("other/file")));
}
