use lazy_static::lazy_static;
use std::time::Duration;

pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_PORT: u16 = 8080;

// 终端报告最多展示的条目数，完整列表写入报告文件
pub const TOP_DISPLAY_COUNT: usize = 20;

// 报告文件名，写入用户主目录，每次运行整体覆盖
pub const REPORT_FILE_NAME: &str = "qbittorrent_orphaned_files.txt";

lazy_static! {
    pub static ref DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
    pub static ref DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
}
