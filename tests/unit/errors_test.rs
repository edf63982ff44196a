//! Unit tests for error types: display formatting and trait object usage.

use newtab::types::errors::{FaviconError, IconError, LinkError, SettingsError};

#[test]
fn test_link_error_display() {
    assert_eq!(
        LinkError::NotFound("abc".to_string()).to_string(),
        "Link not found: abc"
    );
    assert_eq!(
        LinkError::ChildNotFound("xyz".to_string()).to_string(),
        "Child link not found: xyz"
    );
    assert_eq!(
        LinkError::ParentNotFound("p1".to_string()).to_string(),
        "Parent link not found: p1"
    );
    assert_eq!(
        LinkError::MissingField("label").to_string(),
        "Missing required field: label"
    );
    assert_eq!(
        LinkError::DatabaseError("disk full".to_string()).to_string(),
        "Link database error: disk full"
    );
}

#[test]
fn test_settings_error_display() {
    assert_eq!(
        SettingsError::InvalidKey("bogus".to_string()).to_string(),
        "Invalid settings key: bogus"
    );
    assert!(SettingsError::InvalidValue("sortMode".to_string())
        .to_string()
        .contains("sortMode"));
}

#[test]
fn test_icon_error_display() {
    assert_eq!(
        IconError::NotConfigured.to_string(),
        "Icon storage is not configured"
    );
    assert!(IconError::NetworkError("timeout".to_string())
        .to_string()
        .contains("timeout"));
    assert!(IconError::ServiceError("500".to_string())
        .to_string()
        .contains("500"));
}

#[test]
fn test_favicon_error_display() {
    assert_eq!(
        FaviconError::InvalidUrl("not a url".to_string()).to_string(),
        "Cannot extract domain from: not a url"
    );
}

#[test]
fn test_errors_work_as_trait_objects() {
    let errors: Vec<Box<dyn std::error::Error>> = vec![
        Box::new(LinkError::NotFound("a".to_string())),
        Box::new(SettingsError::DatabaseError("b".to_string())),
        Box::new(IconError::NotConfigured),
        Box::new(FaviconError::NetworkError("c".to_string())),
    ];
    for err in errors {
        assert!(!err.to_string().is_empty());
    }
}
