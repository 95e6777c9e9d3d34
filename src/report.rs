use anyhow::Result;
use chrono::Local;
use colored::Colorize;
use dialoguer::{theme::ColorfulTheme, Confirm, Input};
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info};
use std::fs;
use std::path::{Path, PathBuf};

use crate::constants::{REPORT_FILE_NAME, TOP_DISPLAY_COUNT};
use crate::logger::MULTI_PROGRESS;
use crate::types::{DeletionOutcome, OrphanEntry, ScanResult};
use crate::util::{clean_path, format_bytes, try_canonicalize};

/// 在终端渲染扫描报告，纯格式化，无副作用
pub fn render_report(result: &ScanResult, root_dir: &Path) {
    let root = try_canonicalize(&clean_path(root_dir));

    println!();
    println!("{}", "=".repeat(60));
    println!("{}", "孤立文件报告".bold());
    println!("{}", "=".repeat(60));
    println!("孤立文件总数: {}", result.orphans.len());
    println!("总大小: {}", format_bytes(result.total_size));
    println!("{}", "=".repeat(60));

    if !result.skipped_subtrees.is_empty() {
        println!(
            "{}",
            format!(
                "警告: {} 个子目录未能读取，孤立文件数可能被低估",
                result.skipped_subtrees.len()
            )
            .yellow()
        );
    }
    if result.unknown_size_count > 0 {
        println!(
            "{}",
            format!(
                "警告: {} 个条目大小读取失败，已按0字节计入总大小",
                result.unknown_size_count
            )
            .yellow()
        );
    }

    if result.orphans.is_empty() {
        println!();
        println!("{}", "没有发现孤立文件！下载目录很干净。".green());
        return;
    }

    let shown = result.orphans.len().min(TOP_DISPLAY_COUNT);
    println!();
    println!("最大的 {} 个孤立文件:", shown);
    for (i, entry) in result.orphans.iter().take(TOP_DISPLAY_COUNT).enumerate() {
        println!(
            "{:3}. {:>10} - {}",
            i + 1,
            format_bytes(entry.size),
            display_path(&entry.path, &root)
        );
    }
    if result.orphans.len() > TOP_DISPLAY_COUNT {
        println!();
        println!("... 以及另外 {} 个文件", result.orphans.len() - TOP_DISPLAY_COUNT);
    }
}

/// 将完整报告写入用户主目录下的固定位置，每次运行整体覆盖
pub fn save_report(result: &ScanResult, root_dir: &Path, version: &str) -> Result<PathBuf> {
    let home = dirs::home_dir().ok_or_else(|| anyhow::anyhow!("无法确定用户主目录"))?;
    let output = home.join(REPORT_FILE_NAME);
    write_report(&output, result, root_dir, version)?;
    Ok(output)
}

/// 报告文件的实际写入逻辑，输出位置由调用方指定
pub fn write_report(
    output: &Path,
    result: &ScanResult,
    root_dir: &Path,
    version: &str,
) -> Result<()> {
    let root = try_canonicalize(&clean_path(root_dir));

    let mut content = String::new();
    content.push_str("孤立文件报告\n");
    content.push_str(&format!("生成工具: qbit-orphan-cleaner {}\n", version));
    content.push_str(&format!(
        "生成时间: {}\n",
        Local::now().format("%Y-%m-%d %H:%M:%S")
    ));
    content.push_str(&format!("下载目录: {}\n", root.display()));
    content.push_str(&format!("文件总数: {}\n", result.orphans.len()));
    content.push_str(&format!("总大小: {}\n", format_bytes(result.total_size)));
    content.push_str(&"=".repeat(60));
    content.push_str("\n\n");

    for entry in &result.orphans {
        content.push_str(&format!(
            "{:>10} - {}\n",
            format_bytes(entry.size),
            display_path(&entry.path, &root)
        ));
    }

    fs::write(output, content)?;
    Ok(())
}

/// 删除前的双重确认：先是yes/no询问，再要求输入字面量确认令牌。
/// 删除不可撤销，报告步骤本身就是预演。
pub fn confirm_deletion(result: &ScanResult) -> Result<bool> {
    let theme = ColorfulTheme::default();

    let proceed = Confirm::with_theme(&theme)
        .with_prompt("是否删除这些孤立文件?")
        .default(false)
        .interact()?;
    if !proceed {
        return Ok(false);
    }

    let token: String = Input::with_theme(&theme)
        .with_prompt(format!(
            "即将删除 {} 个文件 ({})，输入 DELETE 确认",
            result.orphans.len(),
            format_bytes(result.total_size)
        ))
        .allow_empty(true)
        .interact_text()?;

    Ok(token == "DELETE")
}

/// 逐个删除孤立文件。
/// 单个条目删除失败只计入失败数，不影响其余条目。
pub async fn delete_all(entries: &[OrphanEntry]) -> DeletionOutcome {
    let mut outcome = DeletionOutcome::default();

    let pb = MULTI_PROGRESS.add(ProgressBar::new(entries.len() as u64));
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{bar:40.cyan/blue}] {pos}/{len} 个文件")
            .unwrap()
            .progress_chars("=>-"),
    );

    for entry in entries {
        match tokio::fs::remove_file(&entry.path).await {
            Ok(()) => {
                info!("{}", format!("已删除: {}", entry.path.display()).dimmed());
                outcome.deleted += 1;
                outcome.bytes_freed += entry.size;
            }
            Err(e) => {
                error!("删除 {} 失败: {}", entry.path.display(), e);
                outcome.failed += 1;
            }
        }
        pb.inc(1);
    }
    pb.finish_and_clear();

    outcome
}

// 相对下载目录显示路径，无法相对化时退回绝对路径
fn display_path(path: &Path, root: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .display()
        .to_string()
}
