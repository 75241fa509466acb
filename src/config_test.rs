use std::collections::HashMap;

use super::*;

fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
        .collect();
    move |key: &str| map.get(key).cloned()
}

// =============================================================================
// AppConfig
// =============================================================================

#[test]
fn from_lookup_defaults_when_unset() {
    let cfg = AppConfig::from_lookup(lookup_from(&[])).unwrap();
    assert_eq!(cfg, AppConfig::default());
    assert_eq!(cfg.alias_domain, "webhookmail.mmoat.io");
    assert_eq!(cfg.attachments_bucket, "email-attachments");
    assert_eq!(cfg.port, 3000);
    assert!(!cfg.cookie_secure);
}

#[test]
fn from_lookup_applies_overrides() {
    let cfg = AppConfig::from_lookup(lookup_from(&[
        ("ALIAS_DOMAIN", "mail.example.test"),
        ("ATTACHMENTS_BUCKET", "inbox-files"),
        ("PORT", "8080"),
        ("COOKIE_SECURE", "yes"),
    ]))
    .unwrap();
    assert_eq!(cfg.alias_domain, "mail.example.test");
    assert_eq!(cfg.attachments_bucket, "inbox-files");
    assert_eq!(cfg.port, 8080);
    assert!(cfg.cookie_secure);
}

#[test]
fn from_lookup_blank_values_fall_back_to_defaults() {
    let cfg = AppConfig::from_lookup(lookup_from(&[("ALIAS_DOMAIN", "   "), ("ATTACHMENTS_BUCKET", ""), ("PORT", "")]))
        .unwrap();
    assert_eq!(cfg.alias_domain, DEFAULT_ALIAS_DOMAIN);
    assert_eq!(cfg.attachments_bucket, DEFAULT_ATTACHMENTS_BUCKET);
    assert_eq!(cfg.port, DEFAULT_PORT);
}

#[test]
fn from_lookup_trims_values() {
    let cfg = AppConfig::from_lookup(lookup_from(&[("ALIAS_DOMAIN", " alias.test "), ("PORT", " 4000 ")])).unwrap();
    assert_eq!(cfg.alias_domain, "alias.test");
    assert_eq!(cfg.port, 4000);
}

#[test]
fn from_lookup_invalid_port_errors() {
    let err = AppConfig::from_lookup(lookup_from(&[("PORT", "http")])).unwrap_err();
    assert_eq!(err, ConfigError::InvalidPort("http".into()));
}

#[test]
fn from_lookup_port_out_of_range_errors() {
    assert!(AppConfig::from_lookup(lookup_from(&[("PORT", "70000")])).is_err());
}

#[test]
fn from_lookup_unrecognised_cookie_secure_is_false() {
    let cfg = AppConfig::from_lookup(lookup_from(&[("COOKIE_SECURE", "maybe")])).unwrap();
    assert!(!cfg.cookie_secure);
}

// =============================================================================
// parse_bool
// =============================================================================

#[test]
fn parse_bool_true_variants() {
    for val in ["1", "true", "yes", "on", "TRUE", "On"] {
        assert_eq!(parse_bool(val), Some(true), "expected true for {val:?}");
    }
}

#[test]
fn parse_bool_false_variants() {
    for val in ["0", "false", "no", "off", "OFF"] {
        assert_eq!(parse_bool(val), Some(false), "expected false for {val:?}");
    }
}

#[test]
fn parse_bool_whitespace_trimmed() {
    assert_eq!(parse_bool("  off  "), Some(false));
}

#[test]
fn parse_bool_invalid_returns_none() {
    assert_eq!(parse_bool("maybe"), None);
    assert_eq!(parse_bool(""), None);
}

// =============================================================================
// from_env: reads the real process environment.
// =============================================================================

#[test]
fn from_env_succeeds_without_port_override() {
    if std::env::var("PORT").is_err() {
        assert!(AppConfig::from_env().is_ok());
    }
}
