use anyhow::Result;
use dotenv::dotenv;
use log::{error, info};
use qbit_orphan_cleaner::bootstrap::bootstrap;
use qbit_orphan_cleaner::logger;
use tokio::signal;

#[tokio::main]
async fn main() -> Result<()> {
    // 加载环境变量
    dotenv().ok();

    // 初始化日志
    logger::init_logger()?;

    // 获取版本信息
    let version = env!("CARGO_PKG_VERSION");

    // 操作员中断在顶层统一捕获，删除阶段被打断时已删除的文件不会回滚
    tokio::select! {
        result = bootstrap(version) => {
            if let Err(e) = result {
                error!("运行错误: {}", e);
                std::process::exit(1);
            }
        }
        _ = signal::ctrl_c() => {
            info!("收到中断信号，程序退出");
            std::process::exit(0);
        }
    }

    Ok(())
}
