// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::engines::traits::{BrowserLauncher, BrowserSession, FetchError, RenderedPage};
use async_trait::async_trait;
use chromiumoxide::error::CdpError;
use chromiumoxide::{Browser, BrowserConfig, Page};
use futures::StreamExt;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use url::Url;

/// Playwright引擎
///
/// 基于chromiumoxide实现的无头浏览器启动器，每个站点任务打开一个新会话
pub struct PlaywrightEngine {
    /// 单次导航的超时时间
    navigation_timeout: Duration,
    /// 远程Chrome调试地址，设置后不在本地启动浏览器
    remote_debugging_url: Option<String>,
    /// 是否禁用沙箱（容器内运行时需要）
    no_sandbox: bool,
}

impl PlaywrightEngine {
    /// 创建在本地启动无头Chromium的引擎
    pub fn new(navigation_timeout: Duration) -> Self {
        Self {
            navigation_timeout,
            remote_debugging_url: None,
            no_sandbox: true,
        }
    }

    /// 连接到已运行的Chrome DevTools端点
    pub fn with_remote_url(mut self, remote_debugging_url: Option<String>) -> Self {
        self.remote_debugging_url = remote_debugging_url.filter(|u| !u.trim().is_empty());
        self
    }

    pub fn with_sandbox(mut self, enabled: bool) -> Self {
        self.no_sandbox = !enabled;
        self
    }

    /// 单次导航的超时时间
    pub fn navigation_timeout(&self) -> Duration {
        self.navigation_timeout
    }

    /// 是否连接远程浏览器
    pub fn is_remote(&self) -> bool {
        self.remote_debugging_url.is_some()
    }

    async fn open_browser(&self) -> Result<(Browser, JoinHandle<()>), FetchError> {
        let (browser, mut handler) = if let Some(ref url) = self.remote_debugging_url {
            info!("Connecting to remote Chrome instance at: {}", url);
            Browser::connect(url.as_str()).await.map_err(|e| {
                FetchError::Browser(format!("Failed to connect to remote Chrome: {}", e))
            })?
        } else {
            let mut builder = BrowserConfig::builder()
                .request_timeout(self.navigation_timeout)
                .arg("--disable-gpu")
                .arg("--disable-dev-shm-usage");
            if self.no_sandbox {
                builder = builder.no_sandbox();
            }
            let config = builder.build().map_err(FetchError::Browser)?;
            Browser::launch(config)
                .await
                .map_err(|e| FetchError::Browser(format!("Failed to launch Chromium: {}", e)))?
        };

        // Spawn a handler to process browser events
        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        Ok((browser, handler_task))
    }
}

#[async_trait]
impl BrowserLauncher for PlaywrightEngine {
    /// 打开浏览器会话
    ///
    /// # 参数
    ///
    /// * `user_agent` - 会话内所有页面使用的User-Agent
    ///
    /// # 返回值
    ///
    /// * `Ok(Box<dyn BrowserSession>)` - 已打开空白页的会话
    /// * `Err(FetchError)` - 启动或连接浏览器失败
    async fn launch(&self, user_agent: &str) -> Result<Box<dyn BrowserSession>, FetchError> {
        let (browser, handler_task) = self.open_browser().await?;

        let mut session = PlaywrightSession {
            browser,
            page: None,
            handler_task,
            navigation_timeout: self.navigation_timeout,
            remote: self.is_remote(),
            closed: false,
        };

        let page = match session.browser.new_page("about:blank").await {
            Ok(page) => page,
            Err(e) => {
                session.close().await;
                return Err(map_cdp_error(e));
            }
        };
        if let Err(e) = page.set_user_agent(user_agent).await {
            session.page = Some(page);
            session.close().await;
            return Err(map_cdp_error(e));
        }
        session.page = Some(page);

        Ok(Box::new(session))
    }

    fn name(&self) -> &'static str {
        "playwright"
    }
}

/// 浏览器会话
///
/// 持有一个浏览器实例和一个页面，同一站点的所有页面依次在其中导航
pub struct PlaywrightSession {
    browser: Browser,
    page: Option<Page>,
    handler_task: JoinHandle<()>,
    navigation_timeout: Duration,
    remote: bool,
    closed: bool,
}

#[async_trait]
impl BrowserSession for PlaywrightSession {
    async fn navigate(&mut self, url: &Url) -> Result<RenderedPage, FetchError> {
        let page = self
            .page
            .as_ref()
            .ok_or_else(|| FetchError::Browser("Session has no open page".to_string()))?;

        // goto waits for the load event
        let navigation = async {
            page.goto(url.as_str()).await.map_err(map_cdp_error)?;
            let current = page
                .url()
                .await
                .map_err(map_cdp_error)?
                .and_then(|u| Url::parse(&u).ok())
                .unwrap_or_else(|| url.clone());
            let content = page.content().await.map_err(map_cdp_error)?;
            Ok::<_, FetchError>(RenderedPage {
                url: current,
                content,
            })
        };

        tokio::time::timeout(self.navigation_timeout, navigation)
            .await
            .map_err(|_| FetchError::Timeout)?
    }

    async fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;

        if let Some(page) = self.page.take() {
            if let Err(e) = page.close().await {
                debug!("Failed to close page: {}", e);
            }
        }
        // A remote browser is shared with other clients, only our page is closed
        if !self.remote {
            if let Err(e) = self.browser.close().await {
                warn!("Failed to close browser: {}", e);
            }
            if let Err(e) = self.browser.wait().await {
                debug!("Failed to wait for browser exit: {}", e);
            }
        }
        self.handler_task.abort();
    }
}

/// 将CDP错误映射为抓取错误，请求超时映射为 `FetchError::Timeout`
pub fn map_cdp_error(error: CdpError) -> FetchError {
    match error {
        CdpError::Timeout => FetchError::Timeout,
        other => FetchError::Browser(other.to_string()),
    }
}
