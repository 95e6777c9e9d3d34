use anyhow::Result;
use chrono::Local;
use env_logger::fmt::Color;
use indicatif::MultiProgress;
use log::{Level, LevelFilter};
use std::io::{self, Write};

// 全局MultiProgress实例，可以被其他模块共享使用
lazy_static::lazy_static! {
    pub static ref MULTI_PROGRESS: MultiProgress = MultiProgress::new();
}

pub fn init_logger() -> Result<()> {
    // 设置日志级别
    if std::env::var("RUST_LOG").is_err() {
        // 默认日志级别为INFO，但可以通过RUST_LOG环境变量覆盖
        std::env::set_var("RUST_LOG", "info");
    }

    // 写日志前临时隐藏所有进度条，避免两种输出互相穿插
    struct SuspendingWriter {
        console: io::Stdout,
    }

    impl Write for SuspendingWriter {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            let multi_progress = MULTI_PROGRESS.clone();
            multi_progress.suspend(|| self.console.write(buf))
        }

        fn flush(&mut self) -> io::Result<()> {
            self.console.flush()
        }
    }

    // 配置环境日志格式
    env_logger::Builder::new()
        .format(|buf, record| {
            let mut style = buf.style();
            let level_color = match record.level() {
                Level::Error => Color::Red,
                Level::Warn => Color::Yellow,
                Level::Info => Color::Green,
                Level::Debug => Color::Blue,
                Level::Trace => Color::Cyan,
            };

            style.set_color(level_color);

            let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S%.3f");

            let level_str = style.value(format!("{:<5}", record.level()));

            writeln!(
                buf,
                "[{} {}] {}",
                timestamp,
                level_str,
                record.args()
            )
        })
        .filter(None, LevelFilter::Info)
        // 应用RUST_LOG环境变量指定的过滤器
        .parse_env("RUST_LOG")
        .target(env_logger::Target::Pipe(Box::new(SuspendingWriter {
            console: io::stdout(),
        })))
        .init();

    Ok(())
}
