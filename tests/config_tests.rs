//! Integration tests for configuration loading

use netfacts::{CollectorConfig, FactError};
use std::io::Write;
use std::time::Duration;

#[test]
fn test_load_toml_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"
[snmp]
community = "noc-ro"
timeout_secs = 5
retries = 2
max_concurrent_walks = 2

[classifier]
firewall_vendors = ["fortinet", "sonicwall"]
l3_switch_min_interfaces = 24

[autodetect]
enabled = true
ssh_port = 2222
username = "netops"
password = "s3cret"
"#
    )
    .unwrap();

    let config = CollectorConfig::from_toml_file(file.path()).unwrap();
    assert_eq!(config.snmp.community, "noc-ro");
    assert_eq!(config.snmp.timeout(), Duration::from_secs(5));
    assert_eq!(config.snmp.process_budget(), Duration::from_secs(16));
    assert_eq!(config.snmp.walk_workers(), 2);
    // untouched keys keep their defaults
    assert_eq!(config.snmp.snmpbulkwalk_path, "snmpbulkwalk");
    assert!(config.classifier.is_firewall_vendor("sonicwall"));
    assert!(!config.classifier.is_firewall_vendor("paloalto"));
    assert_eq!(config.classifier.l3_switch_min_interfaces, 24);
    assert!(config.classifier.vlan_implies_switch);
    assert_eq!(config.autodetect.ssh_port, 2222);
    assert_eq!(config.autodetect.password.as_deref(), Some("s3cret"));
    assert!(config.validate().is_ok());
}

#[test]
fn test_password_never_serialized() {
    let config = CollectorConfig::default().with_ssh_credentials("netops", Some("s3cret".to_string()));
    let json = serde_json::to_string(&config).unwrap();
    assert!(json.contains("netops"));
    assert!(!json.contains("s3cret"));
}

#[test]
fn test_invalid_toml_is_config_error() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[snmp\ncommunity = ").unwrap();

    let err = CollectorConfig::from_toml_file(file.path()).unwrap_err();
    assert!(matches!(err, FactError::ConfigError(_)));
}

#[test]
fn test_missing_file_is_config_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = CollectorConfig::from_toml_file(dir.path().join("absent.toml")).unwrap_err();
    assert!(matches!(err, FactError::ConfigError(_)));
}

#[test]
fn test_validation_rejects_unusable_settings() {
    assert!(CollectorConfig::default().with_community("").validate().is_err());
    assert!(CollectorConfig::default().with_timeout(0).validate().is_err());
    assert!(CollectorConfig::default().with_max_concurrent_walks(0).validate().is_err());

    let mut config = CollectorConfig::default();
    config.autodetect.enabled = true;
    assert!(config.validate().is_err());
}
