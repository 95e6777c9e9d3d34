use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info, warn};
use reqwest::Client;
use url::Url;

use crate::config::Config;
use crate::constants::{DEFAULT_CONNECT_TIMEOUT, DEFAULT_REQUEST_TIMEOUT};
use crate::error::CleanerError;
use crate::logger::MULTI_PROGRESS;
use crate::types::{TorrentContent, TorrentInfo, TorrentRecord};
use crate::util::parse_daemon_path;

/// qBittorrent WebUI API客户端。
/// 只读消费守护进程的状态，登录成功后会话Cookie(SID)保存在客户端内部。
pub struct QbClient {
    client: Client,
    base_url: String,
}

impl QbClient {
    pub fn new(config: &Config) -> Result<Self> {
        let base_url = config.base_url();

        // 提前校验地址格式，避免把格式错误当作连接失败上报
        Url::parse(&base_url)
            .map_err(|e| anyhow::anyhow!("无效的WebUI地址 {}: {}", base_url, e))?;

        // 创建HTTP客户端
        let client = Client::builder()
            .cookie_store(true)
            .connect_timeout(*DEFAULT_CONNECT_TIMEOUT)
            .timeout(*DEFAULT_REQUEST_TIMEOUT)
            .build()?;

        Ok(QbClient { client, base_url })
    }

    fn api_url(&self, endpoint: &str) -> String {
        format!("{}/api/v2/{}", self.base_url, endpoint)
    }

    fn connection_error(&self, source: reqwest::Error) -> CleanerError {
        CleanerError::Connection {
            url: self.base_url.clone(),
            source,
        }
    }

    /// 登录WebUI
    pub async fn login(&self, username: &str, password: &str) -> Result<(), CleanerError> {
        let url = self.api_url("auth/login");
        let params = [("username", username), ("password", password)];

        let response = self
            .client
            .post(&url)
            .form(&params)
            .send()
            .await
            .map_err(|e| self.connection_error(e))?;

        // 多次登录失败后qBittorrent会返回403并暂时封禁来源IP
        if response.status() == reqwest::StatusCode::FORBIDDEN {
            return Err(CleanerError::Banned);
        }

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(CleanerError::Api { status, body });
        }

        // 凭据错误时登录接口返回200，响应体为"Fails."
        let body = response.text().await.map_err(|e| self.connection_error(e))?;
        if body.trim() != "Ok." {
            return Err(CleanerError::AuthFailed);
        }

        debug!("登录成功，会话Cookie已保存");
        Ok(())
    }

    /// 登出WebUI，退出前尽力而为地调用
    pub async fn logout(&self) -> Result<(), CleanerError> {
        let url = self.api_url("auth/logout");
        self.client
            .post(&url)
            .send()
            .await
            .map_err(|e| self.connection_error(e))?;
        Ok(())
    }

    /// 获取qBittorrent应用版本，用于连接成功后的诊断输出
    pub async fn app_version(&self) -> Result<String, CleanerError> {
        let url = self.api_url("app/version");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| self.connection_error(e))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(CleanerError::Api { status, body });
        }

        response.text().await.map_err(|e| self.connection_error(e))
    }

    /// 获取守护进程当前记录的全部种子，无论其处于何种状态
    pub async fn fetch_torrents(&self) -> Result<Vec<TorrentInfo>, CleanerError> {
        let url = self.api_url("torrents/info");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| self.connection_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CleanerError::Api { status, body });
        }

        let bytes = response.bytes().await.map_err(|e| self.connection_error(e))?;
        serde_json::from_slice::<Vec<TorrentInfo>>(&bytes).map_err(|e| CleanerError::Api {
            status,
            body: format!("响应解析失败: {}", e),
        })
    }

    /// 获取单个种子的文件列表
    pub async fn fetch_files(&self, hash: &str) -> Result<Vec<TorrentContent>, CleanerError> {
        let url = format!("{}?hash={}", self.api_url("torrents/files"), hash);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| self.connection_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CleanerError::Api { status, body });
        }

        let bytes = response.bytes().await.map_err(|e| self.connection_error(e))?;
        serde_json::from_slice::<Vec<TorrentContent>>(&bytes).map_err(|e| CleanerError::Api {
            status,
            body: format!("响应解析失败: {}", e),
        })
    }

    /// 获取全部种子的元数据记录。
    /// 单个种子的文件列表获取失败只跳过该种子并继续，
    /// 否则一次瞬时故障会让整个目录的真实文件全部被误判为孤立文件。
    pub async fn fetch_records(&self) -> Result<Vec<TorrentRecord>, CleanerError> {
        let torrents = self.fetch_torrents().await?;

        let pb = MULTI_PROGRESS.add(ProgressBar::new(torrents.len() as u64));
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{bar:40.cyan/blue}] {pos}/{len} 个种子 | {msg}")
                .unwrap()
                .progress_chars("=>-"),
        );

        let mut records = Vec::with_capacity(torrents.len());
        for torrent in &torrents {
            pb.set_message(torrent.name.clone());

            match self.fetch_files(&torrent.hash).await {
                Ok(files) => {
                    records.push(TorrentRecord {
                        name: torrent.name.clone(),
                        save_path: parse_daemon_path(&torrent.save_path),
                        files: files.into_iter().map(|f| f.name).collect(),
                    });
                }
                Err(e) => {
                    warn!("无法获取种子 '{}' 的文件列表，已跳过: {}", torrent.name, e);
                }
            }

            pb.inc(1);
        }
        pb.finish_and_clear();

        let file_count: usize = records.iter().map(|r| r.files.len()).sum();
        info!("共 {} 个种子，{} 个活跃文件", records.len(), file_count);

        Ok(records)
    }
}
