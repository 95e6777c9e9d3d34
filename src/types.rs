use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// 种子概要信息，对应 GET /api/v2/torrents/info 的单个元素
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TorrentInfo {
    pub hash: String,
    pub name: String,
    pub save_path: String,
}

/// 种子内的单个文件，对应 GET /api/v2/torrents/files 的单个元素
/// name是相对保存路径的路径，分隔符由守护进程决定
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TorrentContent {
    pub name: String,
    pub size: u64,
}

/// 一个种子的元数据记录：每次运行时从守护进程重新获取，获取后不再变更
#[derive(Debug, Clone)]
pub struct TorrentRecord {
    pub name: String,
    pub save_path: PathBuf,
    pub files: Vec<String>,
}

/// 目录扫描中发现的孤立文件
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrphanEntry {
    pub path: PathBuf,
    pub size: u64,
}

/// 一次扫描的完整结果，按大小降序排列
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScanResult {
    pub orphans: Vec<OrphanEntry>,
    pub total_size: u64,
    pub scanned_files: usize,
    pub unknown_size_count: usize,
    pub skipped_subtrees: Vec<PathBuf>,
}

/// 删除操作的结果计数，bytes_freed只统计删除成功的条目
#[derive(Debug, Clone, Default)]
pub struct DeletionOutcome {
    pub deleted: usize,
    pub failed: usize,
    pub bytes_freed: u64,
}
