//! Integration tests for legacy flat environment files.

use irods_env::config::keywords::*;
use irods_env::config::{PropertyValue, Role, load_legacy_file, parse_legacy};
use irods_env::logging::LogLevelFilter;
use irods_env::resolver::{ResolveContext, resolve};
use irods_env::tokenizer::{ScanOutcome, parse_line};
use std::collections::HashMap;
use tempfile::TempDir;

const LEGACY_ENV: &str = "\
irodsHost 'icat.example.org'
irodsPort 1247
irodsUserName alice
irodsZone=tempZone
irodsDefResource \"demo resc\"
irodsSSLVerifyServer cert
irodsLogLevel LOG_NOTICE
";

#[test]
fn test_tokenizer_quoted_and_unterminated() {
    let (name, scan) = parse_line(r#"key="value with spaces""#).unwrap();
    assert_eq!(name, "key");
    assert_eq!(scan.token, "value with spaces");
    assert_eq!(scan.outcome, ScanOutcome::Token);

    let (_, scan) = parse_line(r#"key="abc"#).unwrap();
    assert_eq!(scan.token, "\"abc");
    assert_eq!(scan.outcome, ScanOutcome::RecoveredUnterminatedQuote);
}

#[test]
fn test_legacy_names_map_to_canonical_keys() {
    let store = parse_legacy(LEGACY_ENV);
    assert_eq!(store.get_string(KW_CFG_IRODS_HOST).unwrap(), "icat.example.org");
    assert_eq!(store.get_int(KW_CFG_IRODS_PORT).unwrap(), 1247);
    assert_eq!(store.get_string(KW_CFG_IRODS_ZONE).unwrap(), "tempZone");
    assert_eq!(store.get_string(KW_CFG_IRODS_DEFAULT_RESOURCE).unwrap(), "demo resc");
    assert_eq!(store.get_string(KW_CFG_IRODS_SSL_VERIFY_SERVER).unwrap(), "cert");
    assert_eq!(
        store.get(KW_CFG_IRODS_LOG_LEVEL).unwrap(),
        &PropertyValue::Integer(7)
    );
}

#[test]
fn test_unknown_names_are_kept_verbatim() {
    let store = parse_legacy("customSetting on\n\n");
    assert_eq!(store.get_string("customSetting").unwrap(), "on");
    assert_eq!(store.len(), 1);
}

#[test]
fn test_legacy_file_resolves() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join(".irodsEnv");
    std::fs::write(&path, LEGACY_ENV).unwrap();

    let store = load_legacy_file(&path).unwrap();
    let filter = LogLevelFilter::default();
    let env: HashMap<String, String> = HashMap::new();
    let ctx = ResolveContext::new(&store)
        .with_env(&env)
        .with_log_filter(&filter);
    let res = resolve(Role::Client, &ctx).unwrap();

    assert_eq!(res.environment.host, "icat.example.org");
    assert_eq!(res.environment.port, 1247);
    assert_eq!(res.environment.home, "/tempZone/home/alice");
    assert_eq!(res.environment.default_resource, "demo resc");
    // LOG_NOTICE sits below the floor.
    assert_eq!(res.applied_log_level, Some(10));
}

#[test]
fn test_missing_legacy_file_is_an_error() {
    let temp = TempDir::new().unwrap();
    let err = load_legacy_file(&temp.path().join("absent")).unwrap_err();
    assert!(err.to_string().contains("absent"));
}
