/// 网页抓取客户端
///
/// 单次 GET，不重试，不设置额外超时
use reqwest::header::USER_AGENT;
use tracing::debug;

use crate::config::Config;
use crate::error::{AppResult, FetchError};

/// 网页抓取客户端
#[derive(Clone)]
pub struct PageFetcher {
    http: reqwest::Client,
    user_agent: String,
}

impl PageFetcher {
    /// 创建新的抓取客户端
    pub fn new(config: &Config) -> Self {
        Self {
            http: reqwest::Client::new(),
            user_agent: config.user_agent.clone(),
        }
    }

    /// 获取网页 HTML
    ///
    /// # 参数
    /// - `url`: 网页地址
    ///
    /// # 返回
    /// 返回响应正文；网络错误或非 2xx 状态码返回 `FetchError`
    pub async fn fetch_html(&self, url: &str) -> AppResult<String> {
        debug!("抓取网页: {}", url);

        let response = self
            .http
            .get(url)
            .header(USER_AGENT, &self.user_agent)
            .send()
            .await
            .map_err(|source| FetchError::RequestFailed {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::BadStatus {
                url: url.to_string(),
                status: status.as_u16(),
            }
            .into());
        }

        let body = response
            .text()
            .await
            .map_err(|source| FetchError::BodyReadFailed {
                url: url.to_string(),
                source,
            })?;

        debug!("抓取完成: {} ({} 字节)", url, body.len());
        Ok(body)
    }
}
