//! Credential resolution tests
//!
//! Exercise the `.env` search order with real files in temporary directories.

use ferro_predict::credentials::{CredentialResolver, KeySource};
use ferro_predict::PredictError;
use std::fs;
use std::path::PathBuf;

const VAR: &str = "FERRO_PREDICT_CREDENTIAL_TEST_KEY";

fn no_env(_: &str) -> Option<String> {
    None
}

#[test]
fn test_environment_wins_over_files() {
    let dir = tempfile::tempdir().unwrap();
    let env_file = dir.path().join(".env");
    fs::write(&env_file, format!("{}=from-file\n", VAR)).unwrap();

    let resolver = CredentialResolver::new(VAR).with_search_paths(vec![env_file]);
    let (key, source) = resolver
        .resolve_with(|name| (name == VAR).then(|| "from-env".to_string()))
        .unwrap();

    assert_eq!(key.expose(), "from-env");
    assert_eq!(source, KeySource::Environment);
}

#[test]
fn test_first_file_with_key_wins() {
    let dir = tempfile::tempdir().unwrap();
    let empty = dir.path().join("empty.env");
    let first = dir.path().join("first.env");
    let second = dir.path().join("second.env");
    fs::write(&empty, "# nothing here\nOTHER=1\n").unwrap();
    fs::write(&first, format!("export {}=\"quoted-key\"\n", VAR)).unwrap();
    fs::write(&second, format!("{}=second-key\n", VAR)).unwrap();

    let resolver =
        CredentialResolver::new(VAR).with_search_paths(vec![empty, first.clone(), second]);
    let (key, source) = resolver.resolve_with(no_env).unwrap();

    assert_eq!(key.expose(), "quoted-key");
    assert_eq!(source, KeySource::File(first));
}

#[test]
fn test_missing_files_are_skipped() {
    let dir = tempfile::tempdir().unwrap();
    let present = dir.path().join(".env");
    fs::write(&present, format!("{}='single'\n", VAR)).unwrap();

    let resolver = CredentialResolver::new(VAR)
        .with_search_paths(vec![PathBuf::from("/nonexistent/ferro/.env"), present]);
    let (key, _) = resolver.resolve_with(no_env).unwrap();

    assert_eq!(key.expose(), "single");
}

#[test]
fn test_empty_value_is_not_a_key() {
    let dir = tempfile::tempdir().unwrap();
    let env_file = dir.path().join(".env");
    fs::write(&env_file, format!("{}=\n", VAR)).unwrap();

    let resolver = CredentialResolver::new(VAR).with_search_paths(vec![env_file]);
    assert!(resolver
        .resolve_with(|_| Some("   ".to_string()))
        .is_none());
}

#[test]
fn test_require_reports_variable_name() {
    let resolver = CredentialResolver::new(VAR).with_search_paths(Vec::new());
    match resolver.require() {
        Err(PredictError::MissingCredential { name }) => assert_eq!(name, VAR),
        other => panic!("expected missing credential, got {:?}", other),
    }
}

#[test]
fn test_debug_never_shows_key() {
    let dir = tempfile::tempdir().unwrap();
    let env_file = dir.path().join(".env");
    fs::write(&env_file, format!("{}=super-secret-value\n", VAR)).unwrap();

    let resolver = CredentialResolver::new(VAR).with_search_paths(vec![env_file]);
    let (key, _) = resolver.resolve_with(no_env).unwrap();

    assert!(!format!("{:?}", key).contains("super-secret-value"));
}

#[test]
fn test_default_search_paths_include_home_env() {
    let resolver = CredentialResolver::new(VAR);
    let paths = resolver.search_paths();

    assert_eq!(paths[0], PathBuf::from(".env"));
    assert_eq!(paths[1], PathBuf::from("../.env"));
    if let Some(home) = std::env::var("HOME")
        .ok()
        .filter(|h| !h.is_empty())
        .map(PathBuf::from)
        .or_else(dirs::home_dir)
    {
        assert_eq!(paths.len(), 3);
        assert_eq!(paths[2], home.join(".env"));
    }
}
