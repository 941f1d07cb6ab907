use dupescan::duplicates::{DuplicateFinder, FinderConfig, FinderError};
use dupescan::output::TextOutput;
use dupescan::scanner::{HashError, ScanError};
use std::fs;
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tempfile::tempdir;

#[test]
fn test_missing_files_are_recorded_and_scan_continues() {
    let dir = tempdir().unwrap();
    let real_a = dir.path().join("a");
    let real_b = dir.path().join("b");
    fs::write(&real_a, "same").unwrap();
    fs::write(&real_b, "same").unwrap();

    let files = vec![
        real_a.clone(),
        PathBuf::from("nonexistent_1.txt"),
        real_b.clone(),
        PathBuf::from("nonexistent_2.txt"),
    ];
    let finder = DuplicateFinder::new(FinderConfig::default().with_sort(true));
    let (groups, summary) = finder.find_duplicates_in_files(files).unwrap();

    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].files, vec![real_a, real_b]);
    assert_eq!(summary.total_files, 4);
    assert_eq!(summary.hashed_files, 2);
    assert_eq!(summary.failed_files, 2);
    assert_eq!(summary.errors.len(), 2);

    for err in &summary.errors {
        match err {
            ScanError::Hash(HashError::NotFound(_)) => {}
            _ => panic!("Expected NotFound HashError, got: {:?}", err),
        }
    }
}

#[cfg(unix)]
#[test]
fn test_unreadable_file_produces_one_diagnostic() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), "hello").unwrap();
    fs::write(dir.path().join("b.txt"), "hello").unwrap();
    let locked = dir.path().join("locked.txt");
    fs::write(&locked, "hello").unwrap();
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

    // Permission bits do not apply to root
    if fs::read(&locked).is_ok() {
        return;
    }

    let finder = DuplicateFinder::new(FinderConfig::default().with_sort(true));
    let result = finder.find_duplicates(dir.path());
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o644)).unwrap();
    let (groups, summary) = result.unwrap();

    assert_eq!(groups.len(), 1);
    assert_eq!(
        groups[0].files,
        vec![dir.path().join("a.txt"), dir.path().join("b.txt")]
    );
    assert_eq!(summary.failed_files, 1);
    assert_eq!(summary.errors.len(), 1);
    assert!(matches!(
        &summary.errors[0],
        ScanError::Hash(HashError::PermissionDenied(p)) if *p == locked
    ));

    let output = TextOutput::new(&groups, &summary.errors);
    let mut diag = Vec::new();
    output.write_diagnostics(&mut diag).unwrap();
    assert_eq!(
        String::from_utf8(diag).unwrap(),
        format!("error: {}: permission denied\n", locked.display())
    );
    assert!(!output.groups_to_string().contains("locked.txt"));
}

#[cfg(unix)]
#[test]
fn test_unreadable_subdirectory_is_skipped() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempdir().unwrap();
    let private = dir.path().join("private");
    fs::create_dir(&private).unwrap();
    fs::write(private.join("secret"), "dup").unwrap();
    fs::write(dir.path().join("x"), "dup").unwrap();
    fs::write(dir.path().join("y"), "dup").unwrap();
    fs::set_permissions(&private, fs::Permissions::from_mode(0o000)).unwrap();

    if fs::read_dir(&private).is_ok() {
        fs::set_permissions(&private, fs::Permissions::from_mode(0o755)).unwrap();
        return;
    }

    let finder = DuplicateFinder::new(FinderConfig::default().with_sort(true));
    let result = finder.find_duplicates(dir.path());
    fs::set_permissions(&private, fs::Permissions::from_mode(0o755)).unwrap();
    let (groups, summary) = result.unwrap();

    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].len(), 2);
    assert_eq!(summary.skipped_entries, 1);
    assert!(matches!(&summary.errors[..], [ScanError::Traversal { .. }]));
}

#[test]
fn test_missing_root_is_fatal() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("does-not-exist");

    let result = DuplicateFinder::with_defaults().find_duplicates(&missing);

    assert!(matches!(result, Err(FinderError::PathNotFound(p)) if p == missing));
}

#[test]
fn test_file_root_is_fatal() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("plain.txt");
    fs::write(&file, "x").unwrap();

    let result = DuplicateFinder::with_defaults().find_duplicates(&file);

    assert!(matches!(result, Err(FinderError::NotADirectory(_))));
}

#[test]
fn test_shutdown_before_scan_interrupts() {
    let dir = tempdir().unwrap();
    for i in 0..20 {
        fs::write(dir.path().join(format!("f{}", i)), "same").unwrap();
    }

    let flag = Arc::new(AtomicBool::new(true));
    let finder = DuplicateFinder::new(FinderConfig::default().with_shutdown_flag(flag));

    let result = finder.find_duplicates(dir.path());
    assert!(matches!(result, Err(FinderError::Interrupted)));
}
