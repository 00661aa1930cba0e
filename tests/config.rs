//! Tests for config parsing and rule building.

mod util;

use chrono::TimeDelta;
use chronosweep::{Action, Config, Error};
use std::fs;
use std::path::Path;
use util::scratch;

fn sample_toml(base: &Path) -> String {
    format!(
        r#"
trash_dir = "{base}/trash"
system_trash_dir = "{base}/os-trash"

[general]
level = "debug"
colors = false

[[notifications]]
type = "console"

[[rules]]
path = "{base}/downloads"
retention_time = "5d"
notify_before = ["2d", "5d"]
action = "trash"
exemptions = ["keep.txt", "./projects/keep"]

[[rules.patterns]]
pattern = "^ScreenShot"
retention_time = "1d"
action = "delete"

[[rules]]
path = "{base}/tmp"
retention = "12h"
notify_days_before = 1
"#,
        base = base.display()
    )
}

#[test]
fn toml_config_builds_rules() {
    let (_dir, base) = scratch();
    let config = Config::from_toml_str(&sample_toml(&base)).unwrap();
    assert_eq!(config.general.level, "debug");
    assert!(!config.general.colors);

    let settings = config.build().unwrap();
    assert_eq!(settings.trash_dir, base.join("trash"));
    assert_eq!(settings.system_trash_dir, Some(base.join("os-trash")));
    assert_eq!(settings.notifications.len(), 1);
    assert_eq!(settings.notifications[0].kind, "console");
    assert_eq!(settings.rules.len(), 2);

    let downloads = &settings.rules[0];
    assert_eq!(downloads.path(), base.join("downloads"));
    assert_eq!(downloads.retention(), TimeDelta::days(5));
    assert_eq!(
        downloads.notify_before(),
        &[TimeDelta::days(2), TimeDelta::days(5)]
    );
    assert_eq!(downloads.action(), Action::Trash);
    assert_eq!(downloads.exemptions().len(), 2);

    let pattern = &downloads.patterns()[0];
    assert_eq!(pattern.pattern(), "^ScreenShot");
    assert_eq!(pattern.retention(), TimeDelta::days(1));
    assert_eq!(pattern.action(), Action::Delete);
    assert_eq!(
        pattern.notify_before(),
        &[TimeDelta::days(2), TimeDelta::days(5)]
    );

    let tmp = &settings.rules[1];
    assert_eq!(tmp.retention(), TimeDelta::hours(12));
    assert_eq!(tmp.notify_before(), &[TimeDelta::days(1)]);
    assert_eq!(tmp.action(), Action::Delete);
}

#[test]
fn json_config_is_detected_by_extension() {
    let (_dir, base) = scratch();
    let path = base.join("config.json");
    let json = serde_json::json!({
        "trash_dir": base.join("trash"),
        "system_trash_dir": base.join("os-trash"),
        "notifications": [{ "type": "macos", "options": { "title": "Sweep" } }],
        "rules": [{
            "path": base.join("inbox"),
            "retention_days": 1.5,
            "notify_before": "6h",
            "action": "system_trash"
        }]
    });
    fs::write(&path, json.to_string()).unwrap();

    let config = Config::load_from(&path).unwrap();
    assert_eq!(config.notifications[0].kind, "macos");
    assert_eq!(
        config.notifications[0].options.title.as_deref(),
        Some("Sweep")
    );

    let settings = config.build().unwrap();
    let rule = &settings.rules[0];
    assert_eq!(rule.retention(), TimeDelta::hours(36));
    assert_eq!(rule.notify_before(), &[TimeDelta::hours(6)]);
    assert_eq!(rule.action(), Action::SystemTrash);
}

#[test]
fn toml_is_the_default_format() {
    let (_dir, base) = scratch();
    let path = base.join("chronosweep.conf");
    fs::write(&path, sample_toml(&base)).unwrap();
    assert_eq!(Config::load_from(&path).unwrap().rules.len(), 2);
}

#[test]
fn retention_key_precedence() {
    let config = Config::from_toml_str(
        r#"
[[rules]]
path = "/tmp/a"
retention_time = "2h"
retention = "3d"
retention_days = 9
"#,
    )
    .unwrap();
    let settings = config.build().unwrap();
    assert_eq!(settings.rules[0].retention(), TimeDelta::hours(2));
}

#[test]
fn integer_retention_means_days() {
    let config = Config::from_toml_str(
        r#"
[[rules]]
path = "/tmp/a"
retention = 7
"#,
    )
    .unwrap();
    assert_eq!(
        config.build().unwrap().rules[0].retention(),
        TimeDelta::days(7)
    );
}

#[test]
fn boolean_retention_is_rejected() {
    let config = Config::from_toml_str(
        r#"
[[rules]]
path = "/tmp/a"
retention_time = true
"#,
    )
    .unwrap();
    assert!(matches!(config.build(), Err(Error::InvalidDuration(_))));
}

#[test]
fn missing_retention_is_an_error() {
    let config = Config::from_toml_str("[[rules]]\npath = \"/tmp/a\"\n").unwrap();
    assert!(matches!(
        config.build(),
        Err(Error::MissingRetention(ref path)) if path == "/tmp/a"
    ));

    let config = Config::from_toml_str(
        r#"
[[rules]]
path = "/tmp/a"
retention = "1d"

[[rules.patterns]]
pattern = "^x"
"#,
    )
    .unwrap();
    assert!(matches!(
        config.build(),
        Err(Error::MissingRetention(ref pattern)) if pattern == "^x"
    ));
}

#[test]
fn invalid_values_are_reported() {
    let bad_action = "[[rules]]\npath = \"/tmp/a\"\nretention = \"1d\"\naction = \"shred\"\n";
    assert!(matches!(
        Config::from_toml_str(bad_action).unwrap().build(),
        Err(Error::InvalidAction(_))
    ));

    let negative = "[[rules]]\npath = \"/tmp/a\"\nretention_days = -1.5\n";
    assert!(matches!(
        Config::from_toml_str(negative).unwrap().build(),
        Err(Error::InvalidDuration(_))
    ));

    let bad_unit = "[[rules]]\npath = \"/tmp/a\"\nretention = \"5m\"\n";
    assert!(matches!(
        Config::from_toml_str(bad_unit).unwrap().build(),
        Err(Error::InvalidDuration(_))
    ));

    let bad_regex = r#"
[[rules]]
path = "/tmp/a"
retention = "1d"

[[rules.patterns]]
pattern = "(["
retention = "1h"
"#;
    assert!(matches!(
        Config::from_toml_str(bad_regex).unwrap().build(),
        Err(Error::InvalidPattern { .. })
    ));

    assert!(matches!(
        Config::from_toml_str("rules = 3"),
        Err(Error::ConfigParse(_))
    ));
    assert!(matches!(
        Config::from_json_str("{ not json"),
        Err(Error::JsonParse(_))
    ));
}

#[test]
fn pattern_inherits_rule_action_and_lead_times() {
    let config = Config::from_toml_str(
        r#"
[[rules]]
path = "/tmp/a"
retention = "10d"
notify_before = "1d"
action = "trash"

[[rules.patterns]]
pattern = "^inherit"
retention = "2d"

[[rules.patterns]]
pattern = "^own"
retention = "3d"
notify_before = ["12h", "1d"]
action = "system_trash"
"#,
    )
    .unwrap();
    let settings = config.build().unwrap();
    let patterns = settings.rules[0].patterns();

    assert_eq!(patterns[0].action(), Action::Trash);
    assert_eq!(patterns[0].notify_before(), &[TimeDelta::days(1)]);
    assert_eq!(patterns[1].action(), Action::SystemTrash);
    assert_eq!(
        patterns[1].notify_before(),
        &[TimeDelta::hours(12), TimeDelta::days(1)]
    );
}

#[test]
fn default_lead_time_is_zero() {
    let config =
        Config::from_toml_str("[[rules]]\npath = \"/tmp/a\"\nretention = \"1d\"\n").unwrap();
    assert_eq!(
        config.build().unwrap().rules[0].notify_before(),
        &[TimeDelta::zero()]
    );
}

#[test]
fn empty_config_has_defaults() {
    let config = Config::from_toml_str("").unwrap();
    assert_eq!(config.general.level, "info");
    assert!(config.general.colors);
    assert!(config.rules.is_empty());
    assert!(config.notifications.is_empty());
}

#[test]
fn settings_become_a_cleaner() {
    let (_dir, base) = scratch();
    let settings = Config::from_toml_str(&sample_toml(&base))
        .unwrap()
        .build()
        .unwrap();

    let cleaner = settings.clone().into_cleaner().unwrap();
    assert_eq!(cleaner.rules().len(), 2);
    assert_eq!(cleaner.notifiers().len(), 1);
    assert_eq!(cleaner.notifiers()[0].name(), "console");
    assert_eq!(cleaner.disposer().trash_dir(), Some(base.join("trash").as_path()));
    assert_eq!(
        cleaner.disposer().system_trash_dir(),
        Some(base.join("os-trash").as_path())
    );

    let silent = settings.into_cleaner_with(|_| None).unwrap();
    assert!(silent.notifiers().is_empty());
}

#[test]
fn unknown_notifier_kind_still_notifies() {
    let config = Config::from_toml_str(
        r#"
system_trash_dir = "/tmp/os-trash"

[[notifications]]
type = "carrier-pigeon"
"#,
    )
    .unwrap();
    let cleaner = config.build().unwrap().into_cleaner().unwrap();
    assert_eq!(cleaner.notifiers()[0].name(), "console");
}
