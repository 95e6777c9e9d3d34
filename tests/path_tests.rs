// 路径规范化工具测试

use qbit_orphan_cleaner::util::{
    clean_path, format_bytes, join_normalized, normalize_separators, parse_daemon_path,
};
use std::path::{Path, PathBuf};

#[test]
fn normalize_separators_unifies_mixed_slashes() {
    let normalized = normalize_separators("movie\\season 1/episode.mkv");
    if cfg!(windows) {
        assert_eq!(normalized, "movie\\season 1\\episode.mkv");
    } else {
        assert_eq!(normalized, "movie/season 1/episode.mkv");
    }
}

#[test]
fn parse_daemon_path_handles_foreign_separators() {
    let path = parse_daemon_path("downloads\\movies");
    assert_eq!(path, Path::new("downloads").join("movies"));
}

#[test]
fn clean_path_removes_redundant_components() {
    assert_eq!(clean_path(Path::new("/dl/./movie")), PathBuf::from("/dl/movie"));
    assert_eq!(
        clean_path(Path::new("/dl/movie/../other")),
        PathBuf::from("/dl/other")
    );
    // 末尾分隔符不产生额外成分
    assert_eq!(clean_path(Path::new("/dl/movie/")), PathBuf::from("/dl/movie"));
}

#[test]
fn clean_path_empty_result_is_current_dir() {
    assert_eq!(clean_path(Path::new("a/..")), PathBuf::from("."));
}

#[test]
fn join_normalized_is_spelling_insensitive() {
    // 同一个文件的不同写法必须得到同一个路径
    let a = join_normalized(Path::new("/dl/movie"), "season 1/a.mkv");
    let b = join_normalized(Path::new("/dl/./movie/"), "season 1\\a.mkv");
    assert_eq!(a, b);
}

#[test]
fn join_normalized_resolves_redundant_relative_segments() {
    let joined = join_normalized(Path::new("/dl/movie"), "./extras/../a.mkv");
    assert_eq!(joined, PathBuf::from("/dl/movie/a.mkv"));
}

#[test]
fn format_bytes_is_human_readable() {
    assert_eq!(format_bytes(0), "0 B");
    assert_eq!(format_bytes(999), "999 B");
    assert!(format_bytes(4 * 1024).contains("KiB"));
    assert!(format_bytes(3 * 1024 * 1024 * 1024).contains("GiB"));
}
