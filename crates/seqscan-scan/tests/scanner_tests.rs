use seqscan_scan::{
    DirectoryErrorKind, FrameRange, ScanConfig, ScanEngine, ScanError, Scanner,
};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn touch(path: &Path) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, "").unwrap();
}

/// `kz.0000.tif` .. `kz.0010.tif` without frame 5, plus a `readme`.
fn create_kz_dir() -> TempDir {
    let temp = TempDir::new().unwrap();
    for frame in (0..=10).filter(|&f| f != 5) {
        touch(&temp.path().join(format!("kz.{frame:04}.tif")));
    }
    touch(&temp.path().join("readme"));
    temp
}

fn create_shot_tree() -> TempDir {
    let temp = TempDir::new().unwrap();
    let root = temp.path();

    for frame in 1001..=1003 {
        touch(&root.join(format!("sh010/comp/comp_v001.{frame}.exr")));
        touch(&root.join(format!("sh010/plates/bg.{frame}.dpx")));
    }
    touch(&root.join("sh010/comp/comp_v001.1001.jpg"));
    touch(&root.join("sh010/notes.txt"));
    touch(&root.join("cover_01.png"));
    fs::create_dir_all(root.join("sh020/empty")).unwrap();

    temp
}

#[test]
fn test_kz_directory() {
    let temp = create_kz_dir();
    let result = Scanner::get_seq(temp.path(), false).unwrap();

    assert_eq!(result.seqs.len(), 1);
    let seq = &result.seqs[0];
    assert_eq!(seq.pattern(), "kz.####.tif");
    assert_eq!((seq.start, seq.end), (0, 10));
    assert_eq!(seq.missing(), &[FrameRange::new(5, 5)]);
    assert_eq!(seq.directory(), temp.path());
    assert_eq!(seq.get_file(3), Some(temp.path().join("kz.0003.tif").as_path()));
    assert!(seq.get_file(5).is_none());

    assert_eq!(result.orphans, vec![temp.path().join("readme")]);
    assert!(result.errors.is_empty());
    assert!(!result.cancelled);
}

#[test]
fn test_every_file_is_grouped_or_orphaned() {
    let temp = create_shot_tree();
    let result = Scanner::get_seq(temp.path(), true).unwrap();

    let mut seen: Vec<PathBuf> = result
        .seqs
        .iter()
        .flat_map(|s| s.members().values().cloned())
        .chain(result.orphans.iter().cloned())
        .collect();
    seen.sort();
    let before = seen.len();
    seen.dedup();
    assert_eq!(seen.len(), before);

    let mut on_disk: Vec<PathBuf> = walk_files(temp.path());
    on_disk.sort();
    assert_eq!(seen, on_disk);
    assert_eq!(result.total_files(), on_disk.len());
    assert_eq!(result.stats.files_matched as usize, on_disk.len());
}

fn walk_files(dir: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir).unwrap() {
        let path = entry.unwrap().path();
        if path.is_dir() {
            files.extend(walk_files(&path));
        } else {
            files.push(path);
        }
    }
    files
}

#[test]
fn test_recursive_and_flat() {
    let temp = create_shot_tree();

    let flat = Scanner::get_seq(temp.path(), false).unwrap();
    assert_eq!(flat.seqs.len(), 1);
    assert_eq!(flat.seqs[0].pattern(), "cover_##.png");
    assert_eq!(flat.stats.dirs_scanned, 1);

    let deep = Scanner::get_seq(temp.path(), true).unwrap();
    let patterns: Vec<&str> = deep.seqs.iter().map(|s| s.pattern()).collect();
    assert_eq!(
        patterns,
        vec!["cover_##.png", "comp_v001.####.exr", "comp_v001.####.jpg", "bg.####.dpx"]
    );
    assert_eq!(deep.orphans, vec![temp.path().join("sh010/notes.txt")]);
    assert_eq!(deep.stats.dirs_scanned, 6);
}

#[test]
fn test_extension_separates_sequences() {
    let temp = create_shot_tree();
    let result = Scanner::get_seq(temp.path().join("sh010/comp"), false).unwrap();

    assert_eq!(result.seqs.len(), 2);
    assert_eq!(result.seqs[0].frame_count(), 3);
    assert_eq!(result.seqs[1].frame_count(), 1);
}

#[test]
fn test_scan_is_repeatable() {
    let temp = create_shot_tree();
    let first = Scanner::get_seq(temp.path(), true).unwrap();
    let second = Scanner::get_seq(temp.path(), true).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_min_len_filters_short_runs() {
    let temp = TempDir::new().unwrap();
    for frame in 1..=3 {
        touch(&temp.path().join(format!("take{frame}.wav")));
        touch(&temp.path().join(format!("plate.{frame:04}.exr")));
    }

    let scanner = Scanner::new([temp.path()], false, "*", 2).unwrap();
    assert_eq!(scanner.len(), 1);
    assert_eq!(scanner.result.seqs[0].pattern(), "plate.####.exr");
    assert_eq!(scanner.result.orphans.len(), 3);
}

#[test]
fn test_mask_and_extensions() {
    let temp = create_shot_tree();

    let masked = Scanner::new([temp.path()], true, "*.exr", 1).unwrap();
    assert_eq!(masked.len(), 1);
    assert!(masked.result.orphans.is_empty());

    let config = Scanner::path(temp.path())
        .extensions(vec!["DPX".to_string(), ".jpg".to_string()])
        .build()
        .unwrap();
    let filtered = Scanner::with_config(config).unwrap();
    let patterns: Vec<&str> = filtered.iter().map(|s| s.pattern()).collect();
    assert_eq!(patterns, vec!["comp_v001.####.jpg", "bg.####.dpx"]);
}

#[test]
fn test_multiple_roots_keep_order() {
    let temp = create_shot_tree();
    let plates = temp.path().join("sh010/plates");
    let comp = temp.path().join("sh010/comp");

    let result = Scanner::get_seqs([&plates, &comp], false).unwrap();
    assert_eq!(result.seqs[0].directory(), plates);
    assert_eq!(result.seqs[1].directory(), comp);

    let reversed = Scanner::get_seqs([&comp, &plates], false).unwrap();
    assert_eq!(reversed.seqs[0].directory(), comp);
}

#[test]
fn test_missing_root_is_recorded() {
    let temp = create_kz_dir();
    let missing = temp.path().join("not_there");

    let result = Scanner::get_seqs([missing.as_path(), temp.path()], false).unwrap();
    assert_eq!(result.seqs.len(), 1);
    assert_eq!(result.errors.len(), 1);
    assert_eq!(result.errors[0].path, missing);
    assert_eq!(result.errors[0].kind, DirectoryErrorKind::NotFound);
}

#[test]
fn test_from_file_matches_directory_scan() {
    let temp = create_kz_dir();
    let file = temp.path().join("kz.0007.tif");

    let scanner = Scanner::from_file(&file).unwrap();
    let seq = scanner.result.find(&file).unwrap();
    assert_eq!(seq.pattern(), "kz.####.tif");
    assert_eq!(scanner.result, Scanner::get_seq(temp.path(), false).unwrap());
    assert!(!scanner.config().recursive);

    let only = Scanner::sequence_of(&file).unwrap().unwrap();
    assert_eq!(&only, seq);
}

#[test]
fn test_from_file_errors() {
    let temp = create_kz_dir();

    let err = Scanner::from_file(temp.path().join("kz.0005.tif")).unwrap_err();
    assert!(matches!(err, ScanError::FileNotFound { .. }));

    let err = Scanner::from_file(temp.path()).unwrap_err();
    assert!(matches!(err, ScanError::NotARegularFile { .. }));
}

#[test]
fn test_invalid_config() {
    let temp = create_kz_dir();
    let err = Scanner::new([temp.path()], false, "*", 0).unwrap_err();
    assert!(matches!(err, ScanError::InvalidConfig { .. }));

    let err = Scanner::new([temp.path()], false, "kz.[", 1).unwrap_err();
    assert!(matches!(err, ScanError::InvalidConfig { .. }));
}

#[test]
fn test_cancelled_engine_returns_partial_result() {
    let temp = create_shot_tree();
    let engine = ScanEngine::new();
    engine.cancel_token().cancel();

    let result = engine.scan(&ScanConfig::new([temp.path()])).unwrap();
    assert!(result.cancelled);
    assert!(result.seqs.len() < 4);
}

#[test]
fn test_progress_is_broadcast() {
    let temp = create_shot_tree();
    let engine = ScanEngine::new();
    let mut rx = engine.subscribe();

    engine.scan(&ScanConfig::new([temp.path()])).unwrap();

    let mut dirs = 0;
    while let Ok(progress) = rx.try_recv() {
        dirs = dirs.max(progress.dirs_scanned);
    }
    assert_eq!(dirs, 6);
}

#[cfg(unix)]
#[test]
fn test_symlink_cycle_terminates() {
    let temp = create_shot_tree();
    std::os::unix::fs::symlink(temp.path(), temp.path().join("sh010/loop")).unwrap();

    let result = Scanner::get_seq(temp.path(), true).unwrap();
    assert_eq!(result.seqs.len(), 4);
    assert!(
        result
            .errors
            .iter()
            .any(|e| e.kind == DirectoryErrorKind::SymlinkCycle)
    );
}

#[cfg(unix)]
#[test]
fn test_unreadable_directory_is_recorded() {
    use std::os::unix::fs::PermissionsExt;

    let temp = create_shot_tree();
    let locked = temp.path().join("sh020");
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

    // Root ignores permission bits.
    if fs::read_dir(&locked).is_ok() {
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
        return;
    }

    let result = Scanner::get_seq(temp.path(), true).unwrap();
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

    assert_eq!(result.seqs.len(), 4);
    assert!(
        result
            .errors
            .iter()
            .any(|e| e.kind == DirectoryErrorKind::PermissionDenied)
    );
}

#[test]
fn test_recursive_default_scan_of_nested_tree() {
    let temp = TempDir::new().unwrap();
    for frame in 1..=3 {
        touch(&temp.path().join(format!("v003/beauty.{frame:04}.exr")));
    }

    let result = Scanner::get_seq(temp.path(), true).unwrap();
    assert!(result.errors.is_empty());
    assert_eq!(result.seqs.len(), 1);
    assert_eq!(result.seqs[0].directory(), temp.path().join("v003"));
    assert_eq!((result.seqs[0].start, result.seqs[0].end), (1, 3));
}

#[test]
fn test_kz_directory_recursive_matches_flat() {
    let temp = create_kz_dir();
    let flat = Scanner::get_seq(temp.path(), false).unwrap();
    let deep = Scanner::get_seq(temp.path(), true).unwrap();
    assert_eq!(flat, deep);
}

#[cfg(unix)]
#[test]
fn test_directory_alias_is_not_a_cycle() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    for frame in 1..=3 {
        touch(&root.join(format!("v003/beauty.{frame:04}.exr")));
    }
    std::os::unix::fs::symlink(root.join("v003"), root.join("latest")).unwrap();

    let result = Scanner::get_seq(root, true).unwrap();
    assert!(result.errors.is_empty());

    let dirs: Vec<PathBuf> = result.seqs.iter().map(|s| s.directory().to_path_buf()).collect();
    assert_eq!(dirs, vec![root.join("latest"), root.join("v003")]);

    let file = root.join("v003/beauty.0002.exr");
    let from_file = Scanner::sequence_of(&file).unwrap().unwrap();
    assert_eq!(result.find(&file), Some(&from_file));
}

#[cfg(unix)]
#[test]
fn test_partition_under_symlinked_directory() {
    let temp = create_shot_tree();
    let elsewhere = TempDir::new().unwrap();
    for frame in 1..=2 {
        touch(&elsewhere.path().join(format!("fx.{frame}.exr")));
    }
    touch(&elsewhere.path().join("fx_notes.txt"));
    std::os::unix::fs::symlink(elsewhere.path(), temp.path().join("sh010/fx")).unwrap();

    let result = Scanner::get_seq(temp.path(), true).unwrap();
    assert!(result.errors.is_empty());

    let mut seen: Vec<PathBuf> = result
        .seqs
        .iter()
        .flat_map(|s| s.members().values().cloned())
        .chain(result.orphans.iter().cloned())
        .collect();
    seen.sort();

    // `walk_files` descends through the link as well.
    let mut expected = walk_files(temp.path());
    expected.sort();
    assert!(expected.contains(&temp.path().join("sh010/fx/fx_notes.txt")));
    assert_eq!(seen, expected);

    let fx = result
        .seqs
        .iter()
        .find(|s| s.directory() == temp.path().join("sh010/fx"))
        .unwrap();
    assert_eq!(fx.pattern(), "fx.#.exr");
}

#[cfg(unix)]
#[test]
fn test_broken_link_is_an_orphan() {
    let temp = create_kz_dir();
    std::os::unix::fs::symlink(
        temp.path().join("missing_target"),
        temp.path().join("kz.0005.tif"),
    )
    .unwrap();

    let result = Scanner::get_seq(temp.path(), true).unwrap();
    assert!(result.errors.is_empty());
    assert_eq!(result.seqs[0].missing(), &[FrameRange::new(5, 5)]);
    assert!(result.orphans.contains(&temp.path().join("kz.0005.tif")));
}
