use dupescan::duplicates::{DuplicateFinder, FinderConfig};
use dupescan::output::TextOutput;
use dupescan::scanner::{HashAlgorithm, Hasher, WalkerConfig};
use std::collections::BTreeSet;
use std::fs;
use std::path::PathBuf;
use tempfile::tempdir;

fn sorted_finder() -> DuplicateFinder {
    DuplicateFinder::new(FinderConfig::default().with_sort(true))
}

#[test]
fn test_scan_empty_directory() {
    let dir = tempdir().unwrap();

    let (groups, summary) = sorted_finder().find_duplicates(dir.path()).unwrap();

    assert!(groups.is_empty());
    assert_eq!(summary.total_files, 0);
    assert_eq!(summary.duplicate_groups, 0);
    assert!(!summary.has_errors());
    assert_eq!(TextOutput::new(&groups, &summary.errors).groups_to_string(), "");
}

#[test]
fn test_scan_unique_files() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), "content a").unwrap();
    fs::write(dir.path().join("b.txt"), "content b").unwrap();
    fs::write(dir.path().join("c.txt"), "content c").unwrap();

    let (groups, summary) = sorted_finder().find_duplicates(dir.path()).unwrap();

    assert!(groups.is_empty());
    assert_eq!(summary.total_files, 3);
    assert_eq!(summary.hashed_files, 3);
}

#[test]
fn test_scan_hello_world_report() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), "hello").unwrap();
    fs::write(dir.path().join("b.txt"), "hello").unwrap();
    fs::write(dir.path().join("c.txt"), "world").unwrap();

    let (groups, summary) = sorted_finder().find_duplicates(dir.path()).unwrap();

    assert_eq!(groups.len(), 1);
    assert_eq!(
        groups[0].files,
        vec![dir.path().join("a.txt"), dir.path().join("b.txt")]
    );
    assert_eq!(summary.total_files, 3);
    assert_eq!(summary.duplicate_groups, 1);
    assert_eq!(summary.duplicate_files, 1);

    let digest = Hasher::new().hash(&dir.path().join("a.txt")).unwrap();
    assert_eq!(groups[0].digest, digest);

    let report = TextOutput::new(&groups, &summary.errors).groups_to_string();
    let expected = format!(
        "Duplicate group ({}):\n  {}\n  {}\n\n",
        digest,
        dir.path().join("a.txt").display(),
        dir.path().join("b.txt").display()
    );
    assert_eq!(report, expected);
    assert!(!report.contains("c.txt"));
}

#[test]
fn test_scan_nested_duplicates() {
    let dir = tempdir().unwrap();
    let deep = dir.path().join("one").join("two").join("three");
    fs::create_dir_all(&deep).unwrap();
    fs::write(dir.path().join("top.bin"), "same bytes").unwrap();
    fs::write(dir.path().join("one").join("mid.bin"), "same bytes").unwrap();
    fs::write(deep.join("bottom.bin"), "same bytes").unwrap();
    fs::write(deep.join("other.bin"), "different").unwrap();

    let (groups, summary) = sorted_finder().find_duplicates(dir.path()).unwrap();

    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].len(), 3);
    assert_eq!(summary.total_files, 4);
    assert_eq!(summary.duplicate_files, 2);
}

#[test]
fn test_empty_files_group_together() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("empty1"), "").unwrap();
    fs::write(dir.path().join("empty2"), "").unwrap();
    fs::write(dir.path().join("full"), "x").unwrap();

    let (groups, _) = sorted_finder().find_duplicates(dir.path()).unwrap();

    assert_eq!(groups.len(), 1);
    assert_eq!(
        groups[0].files,
        vec![dir.path().join("empty1"), dir.path().join("empty2")]
    );
}

#[test]
fn test_many_duplicates_high_thread_count() {
    let dir = tempdir().unwrap();
    for i in 0..200 {
        let sub = dir.path().join(format!("d{}", i % 7));
        fs::create_dir_all(&sub).unwrap();
        fs::write(sub.join(format!("f{}.dat", i)), format!("payload-{}", i % 10)).unwrap();
    }

    let finder = DuplicateFinder::new(
        FinderConfig::default()
            .with_io_threads(32)
            .with_sort(true),
    );
    let (groups, summary) = finder.find_duplicates(dir.path()).unwrap();

    assert_eq!(summary.total_files, 200);
    assert_eq!(summary.hashed_files, 200);
    assert_eq!(groups.len(), 10);
    assert!(groups.iter().all(|g| g.len() == 20));
    assert_eq!(summary.duplicate_files, 190);

    // Every file lands in exactly one group
    let all: BTreeSet<PathBuf> = groups.iter().flat_map(|g| g.files.clone()).collect();
    assert_eq!(all.len(), 200);
}

#[test]
fn test_thread_count_does_not_change_result() {
    let dir = tempdir().unwrap();
    for i in 0..60 {
        fs::write(dir.path().join(format!("f{:02}", i)), format!("{}", i % 6)).unwrap();
    }

    let run = |threads| {
        DuplicateFinder::new(
            FinderConfig::default()
                .with_io_threads(threads)
                .with_sort(true),
        )
        .find_duplicates(dir.path())
        .unwrap()
        .0
    };

    let single = run(1);
    let many = run(16);
    assert_eq!(single, many);
    assert_eq!(single.len(), 6);
}

#[test]
fn test_sorted_output_is_stable() {
    let dir = tempdir().unwrap();
    for name in ["z", "m", "a", "q"] {
        fs::write(dir.path().join(name), "dup").unwrap();
    }
    for name in ["y", "b"] {
        fs::write(dir.path().join(name), "other").unwrap();
    }

    let (groups, _) = sorted_finder().find_duplicates(dir.path()).unwrap();

    assert_eq!(groups.len(), 2);
    // Groups are ordered by their first path, members by path
    assert_eq!(groups[0].files[0], dir.path().join("a"));
    assert_eq!(groups[1].files[0], dir.path().join("b"));
    for group in &groups {
        let mut sorted = group.files.clone();
        sorted.sort();
        assert_eq!(group.files, sorted);
    }
}

#[test]
fn test_sha256_algorithm() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a"), "abc").unwrap();
    fs::write(dir.path().join("b"), "abc").unwrap();

    let finder = DuplicateFinder::new(FinderConfig::default().with_algorithm(HashAlgorithm::Sha256));
    let (groups, _) = finder.find_duplicates(dir.path()).unwrap();

    assert_eq!(groups.len(), 1);
    assert_eq!(
        groups[0].digest.as_str(),
        "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
    );
}

#[test]
fn test_ignore_patterns_and_hidden() {
    let dir = tempdir().unwrap();
    fs::create_dir(dir.path().join(".cache")).unwrap();
    fs::write(dir.path().join("keep1.txt"), "x").unwrap();
    fs::write(dir.path().join("keep2.txt"), "x").unwrap();
    fs::write(dir.path().join("drop.tmp"), "x").unwrap();
    fs::write(dir.path().join(".cache").join("hidden.txt"), "x").unwrap();

    let finder = DuplicateFinder::new(
        FinderConfig::default()
            .with_sort(true)
            .with_walker_config(WalkerConfig::new(true, vec!["*.tmp".to_string()])),
    );
    let (groups, summary) = finder.find_duplicates(dir.path()).unwrap();

    assert_eq!(summary.total_files, 2);
    assert_eq!(groups.len(), 1);
    assert_eq!(
        groups[0].files,
        vec![dir.path().join("keep1.txt"), dir.path().join("keep2.txt")]
    );
}

#[test]
fn test_root_gitignore_does_not_hide_duplicates() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join(".gitignore"), "*.txt\n").unwrap();
    fs::write(dir.path().join("a.txt"), "hello").unwrap();
    fs::write(dir.path().join("b.txt"), "hello").unwrap();

    let (groups, summary) = sorted_finder().find_duplicates(dir.path()).unwrap();

    assert_eq!(summary.total_files, 3);
    assert_eq!(groups.len(), 1);
    assert_eq!(
        groups[0].files,
        vec![dir.path().join("a.txt"), dir.path().join("b.txt")]
    );
}

#[test]
fn test_root_gitignore_applied_when_enabled() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join(".gitignore"), "*.txt\n").unwrap();
    fs::write(dir.path().join("a.txt"), "hello").unwrap();
    fs::write(dir.path().join("b.txt"), "hello").unwrap();

    let finder = DuplicateFinder::new(
        FinderConfig::default()
            .with_sort(true)
            .with_walker_config(WalkerConfig::default().with_respect_gitignore(true)),
    );
    let (groups, summary) = finder.find_duplicates(dir.path()).unwrap();

    assert_eq!(summary.total_files, 1);
    assert!(groups.is_empty());
}

#[cfg(unix)]
#[test]
fn test_symlinks_are_not_followed() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("real.txt"), "linked").unwrap();
    std::os::unix::fs::symlink(dir.path().join("real.txt"), dir.path().join("link.txt")).unwrap();

    let (groups, summary) = sorted_finder().find_duplicates(dir.path()).unwrap();

    assert!(groups.is_empty());
    assert_eq!(summary.total_files, 1);
}
