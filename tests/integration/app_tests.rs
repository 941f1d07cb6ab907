use clap::Parser;
use dupescan::cli::Cli;
use dupescan::duplicates::FinderError;
use dupescan::error::ExitCode;
use std::fs;
use std::path::Path;
use tempfile::{tempdir, TempDir};

// Empty config file so the user's own config does not leak into tests
fn empty_config(dir: &TempDir) -> String {
    let path = dir.path().join("config.toml");
    fs::write(&path, "").unwrap();
    path.to_string_lossy().into_owned()
}

fn cli(config: &str, root: &Path, extra: &[&str]) -> Cli {
    let root = root.to_string_lossy().into_owned();
    let mut args = vec!["dupescan", "--quiet", "--config", config];
    args.extend_from_slice(extra);
    args.push(&root);
    Cli::try_parse_from(args).unwrap()
}

#[test]
fn test_run_app_success() {
    let config_dir = tempdir().unwrap();
    let config = empty_config(&config_dir);
    let root = tempdir().unwrap();
    fs::write(root.path().join("a"), "hello").unwrap();
    fs::write(root.path().join("b"), "hello").unwrap();

    let code = dupescan::run_app(cli(&config, root.path(), &["--sort"])).unwrap();
    assert_eq!(code, ExitCode::Success);
}

#[test]
fn test_run_app_missing_root_is_error() {
    let config_dir = tempdir().unwrap();
    let config = empty_config(&config_dir);
    let missing = config_dir.path().join("missing");

    let err = dupescan::run_app(cli(&config, &missing, &[])).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<FinderError>(),
        Some(FinderError::PathNotFound(_))
    ));
}

#[test]
fn test_run_app_invalid_config_is_error() {
    let config_dir = tempdir().unwrap();
    let bad = config_dir.path().join("bad.toml");
    fs::write(&bad, "io_threads = \"many\"").unwrap();
    let root = tempdir().unwrap();

    let result = dupescan::run_app(cli(&bad.to_string_lossy(), root.path(), &[]));
    assert!(result.is_err());
}

#[cfg(unix)]
#[test]
fn test_run_app_strict_partial_success() {
    use std::os::unix::fs::PermissionsExt;

    let config_dir = tempdir().unwrap();
    let config = empty_config(&config_dir);
    let root = tempdir().unwrap();
    fs::write(root.path().join("a"), "hello").unwrap();
    fs::write(root.path().join("b"), "hello").unwrap();
    let locked = root.path().join("locked");
    fs::write(&locked, "hello").unwrap();
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

    if fs::read(&locked).is_ok() {
        return;
    }

    let lenient = dupescan::run_app(cli(&config, root.path(), &[]));
    let strict = dupescan::run_app(cli(&config, root.path(), &["--strict"]));
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o644)).unwrap();

    assert_eq!(lenient.unwrap(), ExitCode::Success);
    assert_eq!(strict.unwrap(), ExitCode::PartialSuccess);
    assert_eq!(ExitCode::PartialSuccess.as_i32(), 3);
}
