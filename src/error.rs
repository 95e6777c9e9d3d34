use std::path::PathBuf;
use thiserror::Error;

/// 错误分类：连接、认证、目标目录错误会中止整个运行，
/// 其余错误按条目累计并在最终报告中呈现
#[derive(Debug, Error)]
pub enum CleanerError {
    #[error("无法连接到qBittorrent WebUI ({url}): {source}")]
    Connection {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("登录失败: 用户名或密码错误，或WebUI认证未启用")]
    AuthFailed,

    #[error("登录被拒绝: 多次登录失败后IP已被qBittorrent暂时封禁")]
    Banned,

    #[error("qBittorrent API请求失败: {status} - {body}")]
    Api {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("目标目录不存在: {}", .0.display())]
    TargetDirMissing(PathBuf),

    #[error("目标路径不是目录: {}", .0.display())]
    TargetDirNotDir(PathBuf),
}
