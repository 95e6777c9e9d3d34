use anyhow::Result;
use colored::Colorize;
use log::{debug, error, info, warn};

use crate::client::QbClient;
use crate::config::Config;
use crate::error::CleanerError;
use crate::report;
use crate::scanner::detect_orphans;
use crate::util::format_bytes;

pub async fn bootstrap(version: &str) -> Result<()> {
    // 打印启动信息
    info!(
        "{}",
        format!("qBittorrent孤立文件清理工具 {}", version).green()
    );

    // 解析配置，环境变量缺失的项交互式补全
    let config = Config::resolve()?;

    // 连接并登录WebUI
    info!("正在连接 {} ...", config.base_url());
    let client = QbClient::new(&config)?;

    if let Err(e) = client.login(&config.username, &config.password).await {
        print_remediation(&e);
        return Err(e.into());
    }

    match client.app_version().await {
        Ok(v) => info!("{}", format!("已连接到qBittorrent {}", v).green()),
        Err(e) => warn!("无法获取qBittorrent版本: {}", e),
    }

    // 获取种子元数据
    info!("正在扫描种子...");
    let records = match client.fetch_records().await {
        Ok(records) => records,
        Err(e) => {
            print_remediation(&e);
            logout(&client).await;
            return Err(e.into());
        }
    };

    // 扫描下载目录
    info!("正在扫描目录: {}", config.download_dir.display());
    let result = match detect_orphans(&records, &config.download_dir).await {
        Ok(result) => result,
        Err(e) => {
            print_remediation(&e);
            logout(&client).await;
            return Err(e.into());
        }
    };
    info!("共扫描 {} 个文件", result.scanned_files);

    // 渲染报告；报告步骤本身即是删除前的预演
    report::render_report(&result, &config.download_dir);

    if !result.orphans.is_empty() {
        match report::save_report(&result, &config.download_dir, version) {
            Ok(path) => info!("完整列表已保存到: {}", path.display()),
            Err(e) => warn!("无法保存报告文件: {}", e),
        }

        // 双重确认后删除
        if report::confirm_deletion(&result)? {
            info!("开始删除文件...");
            let outcome = report::delete_all(&result.orphans).await;

            info!(
                "{}",
                format!(
                    "已删除 {} 个文件，释放 {}",
                    outcome.deleted,
                    format_bytes(outcome.bytes_freed)
                )
                .green()
            );
            if outcome.failed > 0 {
                warn!("{} 个文件删除失败，请检查权限", outcome.failed);
            }
        } else {
            info!("删除已取消");
        }
    }

    logout(&client).await;
    info!("完成");

    Ok(())
}

// 登出失败不影响运行结果
async fn logout(client: &QbClient) {
    if let Err(e) = client.logout().await {
        debug!("登出失败: {}", e);
    }
}

/// 针对致命错误打印可操作的排查提示
fn print_remediation(err: &CleanerError) {
    error!("{}", err);

    match err {
        CleanerError::Connection { url, .. } => {
            error!("可能的原因:");
            error!("  1. qBittorrent未运行");
            error!("  2. WebUI未启用");
            error!("  3. 地址或端口错误 ({})", url);
            error!("  4. 防火墙拦截了连接");
            error!("检查qBittorrent是否在运行: systemctl status qbittorrent-nox");
            error!("检查qBittorrent监听的端口: sudo netstat -tlnp | grep qbittorrent");
        }
        CleanerError::AuthFailed => {
            error!("可能的原因:");
            error!("  1. 用户名或密码错误");
            error!("  2. WebUI认证未启用");
            error!("请打开qBittorrent → 工具 → 选项 → Web UI，确认用户界面已启用且凭据正确");
        }
        CleanerError::Banned => {
            error!("多次登录失败后来源IP会被暂时封禁，请稍后重试或重启qBittorrent");
        }
        CleanerError::TargetDirMissing(_) | CleanerError::TargetDirNotDir(_) => {
            error!("请确认下载目录路径填写正确且当前用户有读取权限");
        }
        CleanerError::Api { .. } => {}
    }
}
