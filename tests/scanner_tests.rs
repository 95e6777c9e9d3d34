// 孤立文件判定核心的集成测试

use qbit_orphan_cleaner::error::CleanerError;
use qbit_orphan_cleaner::scanner::{detect_orphans, LivePathSet};
use qbit_orphan_cleaner::types::TorrentRecord;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn write_file(root: &Path, relative: &str, size: usize) -> PathBuf {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, vec![0u8; size]).unwrap();
    path
}

fn record(name: &str, save_path: &Path, files: &[&str]) -> TorrentRecord {
    TorrentRecord {
        name: name.to_string(),
        save_path: save_path.to_path_buf(),
        files: files.iter().map(|s| s.to_string()).collect(),
    }
}

#[tokio::test]
async fn detects_unreferenced_files_sorted_by_size() {
    let dl = TempDir::new().unwrap();
    write_file(dl.path(), "movie/a.mkv", 1000);
    write_file(dl.path(), "movie/b.nfo", 50);
    write_file(dl.path(), "other/c.txt", 200);

    let records = vec![record("movie", &dl.path().join("movie"), &["a.mkv"])];
    let result = detect_orphans(&records, dl.path()).await.unwrap();

    assert_eq!(result.scanned_files, 3);
    assert_eq!(result.orphans.len(), 2);
    assert_eq!(result.orphans[0].path.file_name().unwrap(), "c.txt");
    assert_eq!(result.orphans[0].size, 200);
    assert_eq!(result.orphans[1].path.file_name().unwrap(), "b.nfo");
    assert_eq!(result.orphans[1].size, 50);
    assert_eq!(result.total_size, 250);
    assert!(result.skipped_subtrees.is_empty());
    assert_eq!(result.unknown_size_count, 0);
}

#[tokio::test]
async fn live_files_survive_messy_path_spelling() {
    let dl = TempDir::new().unwrap();
    write_file(dl.path(), "movie/season 1/a.mkv", 10);

    // 保存路径带"./"和末尾分隔符，相对路径使用反斜杠分隔
    let messy_save = PathBuf::from(format!(
        "{}/./movie/",
        dl.path().display()
    ));
    let records = vec![record("movie", &messy_save, &["season 1\\a.mkv"])];

    let result = detect_orphans(&records, dl.path()).await.unwrap();
    assert!(
        result.orphans.is_empty(),
        "活跃文件被误判为孤立: {:?}",
        result.orphans
    );
}

#[tokio::test]
async fn zero_torrents_marks_every_file_orphaned() {
    let dl = TempDir::new().unwrap();
    write_file(dl.path(), "a.bin", 1);
    write_file(dl.path(), "sub/b.bin", 2);
    write_file(dl.path(), "sub/deep/c.bin", 3);

    let result = detect_orphans(&[], dl.path()).await.unwrap();

    assert_eq!(result.orphans.len(), 3);
    assert_eq!(result.total_size, 6);
}

#[tokio::test]
async fn empty_directory_yields_empty_result() {
    let dl = TempDir::new().unwrap();
    let records = vec![record("t", &dl.path().join("t"), &["a.bin", "b.bin"])];

    let result = detect_orphans(&records, dl.path()).await.unwrap();

    assert!(result.orphans.is_empty());
    assert_eq!(result.total_size, 0);
    assert_eq!(result.scanned_files, 0);
}

#[tokio::test]
async fn detection_is_idempotent() {
    let dl = TempDir::new().unwrap();
    write_file(dl.path(), "movie/a.mkv", 100);
    write_file(dl.path(), "movie/b.nfo", 50);
    write_file(dl.path(), "c.txt", 50);

    let records = vec![record("movie", &dl.path().join("movie"), &["a.mkv"])];

    let first = detect_orphans(&records, dl.path()).await.unwrap();
    let second = detect_orphans(&records, dl.path()).await.unwrap();

    assert_eq!(first, second);
}

#[tokio::test]
async fn covering_torrent_removes_orphans() {
    let dl = TempDir::new().unwrap();
    write_file(dl.path(), "movie/a.mkv", 1000);
    write_file(dl.path(), "movie/b.nfo", 50);

    let mut records = vec![record("movie", &dl.path().join("movie"), &["a.mkv"])];
    let before = detect_orphans(&records, dl.path()).await.unwrap();
    assert_eq!(before.orphans.len(), 1);

    // 新增的种子覆盖了此前的孤立文件
    records.push(record("extras", &dl.path().join("movie"), &["b.nfo"]));
    let after = detect_orphans(&records, dl.path()).await.unwrap();

    assert!(after.orphans.is_empty());
    assert!(after.orphans.len() < before.orphans.len());
}

#[tokio::test]
async fn missing_root_is_a_distinct_fatal_error() {
    let dl = TempDir::new().unwrap();
    let missing = dl.path().join("nope");

    match detect_orphans(&[], &missing).await {
        Err(CleanerError::TargetDirMissing(path)) => assert_eq!(path, missing),
        other => panic!("预期TargetDirMissing，实际为 {:?}", other),
    }
}

#[tokio::test]
async fn non_directory_root_is_rejected() {
    let dl = TempDir::new().unwrap();
    let file = write_file(dl.path(), "plain.txt", 1);

    match detect_orphans(&[], &file).await {
        Err(CleanerError::TargetDirNotDir(path)) => assert_eq!(path, file),
        other => panic!("预期TargetDirNotDir，实际为 {:?}", other),
    }
}

#[tokio::test]
async fn save_path_outside_root_never_intersects_the_walk() {
    let dl = TempDir::new().unwrap();
    let elsewhere = TempDir::new().unwrap();
    write_file(dl.path(), "a.bin", 10);

    // 保存路径在目标目录之外的种子参与集合构建，但不影响分类
    let records = vec![record("remote", elsewhere.path(), &["a.bin"])];
    let result = detect_orphans(&records, dl.path()).await.unwrap();

    assert_eq!(result.orphans.len(), 1);
    assert_eq!(result.orphans[0].size, 10);
}

#[test]
fn live_path_set_tracks_ancestor_directories() {
    let records = vec![record("t", Path::new("/dl/t"), &["a/b/c.bin"])];
    let set = LivePathSet::build(&records);

    assert!(set.is_live(Path::new("/dl/t/a/b/c.bin")));
    assert!(!set.is_live(Path::new("/dl/t/a/b")));

    // 祖先目录登记到保存路径为止（不含保存路径本身）
    assert!(set.live_dirs().contains(Path::new("/dl/t/a/b")));
    assert!(set.live_dirs().contains(Path::new("/dl/t/a")));
    assert!(!set.live_dirs().contains(Path::new("/dl/t")));
    assert!(!set.live_dirs().contains(Path::new("/dl")));
}

#[test]
fn live_path_set_counts_files_across_records() {
    let records = vec![
        record("one", Path::new("/dl/one"), &["a.bin", "b.bin"]),
        record("two", Path::new("/dl/two"), &["c.bin"]),
    ];
    let set = LivePathSet::build(&records);

    assert_eq!(set.file_count(), 3);
    assert!(set.is_live(Path::new("/dl/two/c.bin")));
}
