// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// 抓取错误类型
#[derive(Error, Debug)]
pub enum FetchError {
    /// 非2xx状态码
    #[error("Status code: {0}")]
    BadStatus(u16),
    /// 请求或导航超时
    #[error("Timeout")]
    Timeout,
    /// 重试次数耗尽
    #[error("{url} failed after {attempts} attempts: {last_error}")]
    Exhausted {
        url: String,
        attempts: u32,
        last_error: String,
    },
    /// 请求失败
    #[error("Request failed: {0}")]
    RequestFailed(reqwest::Error),
    /// 浏览器错误
    #[error("Browser error: {0}")]
    Browser(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            FetchError::Timeout
        } else {
            FetchError::RequestFailed(error)
        }
    }
}

impl FetchError {
    /// 是否为超时错误
    pub fn is_timeout(&self) -> bool {
        matches!(self, FetchError::Timeout)
    }

    /// 判断错误是否可重试
    ///
    /// 只有已经耗尽重试次数的错误不可再重试
    pub fn is_retryable(&self) -> bool {
        !matches!(self, FetchError::Exhausted { .. })
    }
}

/// 请求上下文
///
/// 每次抓取调用创建一次，携带本次使用的客户端标识与超时时间
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// 目标URL
    pub url: Url,
    /// 本次请求使用的User-Agent
    pub user_agent: String,
    /// 超时时间
    pub timeout: Duration,
}

impl RequestContext {
    pub fn new(url: Url, user_agent: impl Into<String>, timeout: Duration) -> Self {
        Self {
            url,
            user_agent: user_agent.into(),
            timeout,
        }
    }
}

/// 抓取响应
#[derive(Debug, Clone)]
pub struct RawContent {
    /// 最终URL（跟随重定向后）
    pub url: Url,
    /// HTTP状态码
    pub status_code: u16,
    /// 响应内容
    pub content: String,
    /// 内容类型
    pub content_type: String,
    /// 响应时间（毫秒）
    pub response_time_ms: u64,
}

/// 页面抓取器特质
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// 抓取单个URL，非2xx状态码视为失败
    async fn fetch(&self, context: &RequestContext) -> Result<RawContent, FetchError>;

    /// 引擎名称
    fn name(&self) -> &'static str;
}

/// 浏览器渲染后的页面
#[derive(Debug, Clone)]
pub struct RenderedPage {
    /// 导航完成后的当前URL
    pub url: Url,
    /// 渲染后的DOM序列化结果
    pub content: String,
}

/// 浏览器会话
///
/// 同一站点的所有页面复用一个会话，一次只导航一个页面
#[async_trait]
pub trait BrowserSession: Send {
    /// 导航到URL并返回渲染后的页面
    async fn navigate(&mut self, url: &Url) -> Result<RenderedPage, FetchError>;

    /// 关闭会话，释放浏览器资源
    async fn close(&mut self);
}

/// 浏览器启动器
#[async_trait]
pub trait BrowserLauncher: Send + Sync {
    /// 以指定User-Agent打开新的浏览器会话
    async fn launch(&self, user_agent: &str) -> Result<Box<dyn BrowserSession>, FetchError>;

    /// 引擎名称
    fn name(&self) -> &'static str;
}
