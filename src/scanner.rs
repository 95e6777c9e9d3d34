use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, warn};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::error::CleanerError;
use crate::logger::MULTI_PROGRESS;
use crate::types::{OrphanEntry, ScanResult, TorrentRecord};
use crate::util::{clean_path, join_normalized, try_canonicalize};

/// 当前被任何种子引用的绝对路径集合。
/// 每次运行根据全部种子记录构建一次，之后只读。
#[derive(Debug, Default)]
pub struct LivePathSet {
    files: HashSet<PathBuf>,
    dirs: HashSet<PathBuf>,
}

impl LivePathSet {
    pub fn build(records: &[TorrentRecord]) -> Self {
        let mut set = LivePathSet::default();

        for record in records {
            // 保存路径的规范化方式必须与join_normalized内部一致，
            // 向上登记祖先目录时才能恰好停在保存路径这一层
            let save_path = try_canonicalize(&clean_path(&record.save_path));

            for relative in &record.files {
                let file_path = join_normalized(&record.save_path, relative);

                // 从文件的父目录向上登记到保存路径（不含）为止的每一级目录
                let mut parent = file_path.parent();
                while let Some(dir) = parent {
                    if dir == save_path {
                        break;
                    }
                    set.dirs.insert(dir.to_path_buf());
                    parent = dir.parent();
                }

                set.files.insert(file_path);
            }
        }

        set
    }

    /// 判断一个已规范化的绝对路径是否被某个种子引用
    pub fn is_live(&self, path: &Path) -> bool {
        self.files.contains(path)
    }

    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    /// 活跃文件的祖先目录集合。
    /// 仅用于目录级判断，文件分类只看files
    pub fn live_dirs(&self) -> &HashSet<PathBuf> {
        &self.dirs
    }
}

/// 扫描目标目录，对每个常规文件做孤立判定并累计大小。
/// 目录本身永远不参与判定，也不会被删除。
pub async fn detect_orphans(
    records: &[TorrentRecord],
    root_dir: &Path,
) -> Result<ScanResult, CleanerError> {
    if !root_dir.exists() {
        return Err(CleanerError::TargetDirMissing(root_dir.to_path_buf()));
    }
    if !root_dir.is_dir() {
        return Err(CleanerError::TargetDirNotDir(root_dir.to_path_buf()));
    }

    let live = LivePathSet::build(records);
    debug!("活跃路径集合: {} 个文件", live.file_count());

    // 遍历侧使用与集合构建侧相同的规范化规则处理根目录，
    // 之后逐级拼接的条目路径自然保持同一套写法
    let root = try_canonicalize(&clean_path(root_dir));
    let mut result = ScanResult::default();

    let pb = MULTI_PROGRESS.add(ProgressBar::new_spinner());
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner} 已扫描 {pos} 个文件")
            .unwrap(),
    );

    let mut queue = vec![root];

    while let Some(dir) = queue.pop() {
        let mut entries = match fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(e) => {
                // 子树不可读只影响该子树，已收集的条目保留，
                // 最终报告会提示孤立文件数可能被低估
                warn!("无法读取目录 {}，其下文件未参与扫描: {}", dir.display(), e);
                result.skipped_subtrees.push(dir);
                continue;
            }
        };

        loop {
            let entry = match entries.next_entry().await {
                Ok(Some(entry)) => entry,
                Ok(None) => break,
                Err(e) => {
                    warn!("遍历目录 {} 中断，剩余条目未参与扫描: {}", dir.display(), e);
                    result.skipped_subtrees.push(dir.clone());
                    break;
                }
            };

            let path = entry.path();
            let file_type = match entry.file_type().await {
                Ok(file_type) => file_type,
                Err(e) => {
                    warn!("无法读取 {} 的元数据，已跳过: {}", path.display(), e);
                    continue;
                }
            };

            if file_type.is_dir() {
                queue.push(path);
                continue;
            }
            if !file_type.is_file() {
                // 符号链接等非常规文件不参与判定
                continue;
            }

            result.scanned_files += 1;
            pb.inc(1);

            if live.is_live(&path) {
                continue;
            }

            // 大小读取失败的条目按0字节计入，但绝不因此从报告中消失
            let size = match entry.metadata().await {
                Ok(metadata) => metadata.len(),
                Err(e) => {
                    warn!("无法读取孤立文件 {} 的大小，按0字节计入: {}", path.display(), e);
                    result.unknown_size_count += 1;
                    0
                }
            };

            result.total_size += size;
            result.orphans.push(OrphanEntry { path, size });
        }
    }
    pb.finish_and_clear();

    // 按大小降序排列；稳定排序保证同尺寸条目维持发现顺序
    result.orphans.sort_by(|a, b| b.size.cmp(&a.size));

    Ok(result)
}
