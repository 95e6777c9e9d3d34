use anyhow::Result;
use dialoguer::{theme::ColorfulTheme, Input, Password};
use log::info;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::constants::{DEFAULT_HOST, DEFAULT_PORT};

/// 连接与扫描目标配置。
/// 启动时一次性解析完成，之后按值传入各组件，不使用全局可变状态。
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub download_dir: PathBuf,
}

impl Config {
    // 创建默认的.env文件模板（如果不存在）
    fn create_default_env_file() -> Result<()> {
        let env_path = ".env";
        if !Path::new(env_path).exists() {
            let env_content =
                "# 以下配置项留空时会在启动时交互式询问\n\
                 # qBittorrent WebUI主机地址（可选，默认localhost）\n\
                 # QBT_HOST=localhost\n\
                 # WebUI端口（可选，默认8080）\n\
                 # QBT_PORT=8080\n\
                 # WebUI用户名\n\
                 # QBT_USERNAME=\n\
                 # WebUI密码\n\
                 # QBT_PASSWORD=\n\
                 # 要扫描的下载目录\n\
                 # QBT_DOWNLOAD_DIR=\n";

            fs::write(env_path, env_content)?;
            info!("已创建.env文件模板，可在其中填写连接配置以跳过交互式询问");
        }
        Ok(())
    }

    /// 从环境变量读取配置，缺失项通过交互式提示补全
    pub fn resolve() -> Result<Self> {
        Self::create_default_env_file()?;

        let theme = ColorfulTheme::default();

        let host = match env::var("QBT_HOST") {
            Ok(v) if !v.trim().is_empty() => v.trim().to_string(),
            _ => Input::with_theme(&theme)
                .with_prompt("qBittorrent主机地址")
                .default(DEFAULT_HOST.to_string())
                .interact_text()?,
        };

        let port = match env::var("QBT_PORT") {
            Ok(v) if !v.trim().is_empty() => match v.trim().parse::<u16>() {
                Ok(port) if port >= 1 => port,
                _ => {
                    return Err(anyhow::anyhow!(
                        "QBT_PORT必须是1-65535之间的端口号，当前值: {}",
                        v
                    ));
                }
            },
            _ => Input::with_theme(&theme)
                .with_prompt("WebUI端口")
                .default(DEFAULT_PORT.to_string())
                .validate_with(|input: &String| match input.trim().parse::<u16>() {
                    Ok(port) if port >= 1 => Ok(()),
                    _ => Err("端口必须在1-65535之间"),
                })
                .interact_text()?
                .trim()
                .parse::<u16>()?,
        };

        let username = match env::var("QBT_USERNAME") {
            Ok(v) if !v.trim().is_empty() => v.trim().to_string(),
            _ => Input::with_theme(&theme)
                .with_prompt("qBittorrent用户名")
                .validate_with(|input: &String| {
                    if input.trim().is_empty() {
                        Err("用户名不能为空")
                    } else {
                        Ok(())
                    }
                })
                .interact_text()?
                .trim()
                .to_string(),
        };

        let password = match env::var("QBT_PASSWORD") {
            Ok(v) if !v.is_empty() => v,
            // Password默认不允许空输入，会自动重新询问
            _ => Password::with_theme(&theme)
                .with_prompt("qBittorrent密码")
                .interact()?,
        };

        let download_dir = match env::var("QBT_DOWNLOAD_DIR") {
            Ok(v) if !v.trim().is_empty() => expand_home(v.trim()),
            _ => {
                let input: String = Input::with_theme(&theme)
                    .with_prompt("下载目录路径")
                    .validate_with(|input: &String| {
                        let path = expand_home(input.trim());
                        if input.trim().is_empty() {
                            Err("下载目录不能为空")
                        } else if !path.exists() {
                            Err("目录不存在")
                        } else if !path.is_dir() {
                            Err("该路径不是目录")
                        } else {
                            Ok(())
                        }
                    })
                    .interact_text()?;
                expand_home(input.trim())
            }
        };

        Ok(Config {
            host,
            port,
            username,
            password,
            download_dir,
        })
    }

    /// WebUI基础地址；QBT_HOST可以直接带协议前缀
    pub fn base_url(&self) -> String {
        if self.host.starts_with("http://") || self.host.starts_with("https://") {
            format!("{}:{}", self.host, self.port)
        } else {
            format!("http://{}:{}", self.host, self.port)
        }
    }
}

// 展开路径开头的"~"为用户主目录
fn expand_home(input: &str) -> PathBuf {
    if input == "~" {
        if let Some(home) = dirs::home_dir() {
            return home;
        }
    } else if let Some(rest) = input.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(input)
}
