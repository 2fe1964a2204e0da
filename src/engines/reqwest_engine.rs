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

use crate::engines::traits::{FetchError, PageFetcher, RawContent, RequestContext};
use async_trait::async_trait;
use std::time::Instant;
use tracing::debug;

/// 抓取引擎
///
/// 基于reqwest实现的静态HTML抓取引擎
pub struct ReqwestEngine;

#[async_trait]
impl PageFetcher for ReqwestEngine {
    /// 执行HTTP抓取
    ///
    /// # 参数
    ///
    /// * `context` - 请求上下文
    ///
    /// # 返回值
    ///
    /// * `Ok(RawContent)` - 2xx响应的内容
    /// * `Err(FetchError)` - 非2xx状态码、超时或传输错误
    async fn fetch(&self, context: &RequestContext) -> Result<RawContent, FetchError> {
        // Each request gets a fresh client so no identity or cookie leaks between attempts
        let client = reqwest::Client::builder()
            .user_agent(context.user_agent.as_str())
            .timeout(context.timeout)
            .cookie_store(true)
            .build()?;

        let start = Instant::now();
        let response = client.get(context.url.clone()).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::BadStatus(status.as_u16()));
        }

        let url = response.url().clone();
        let content_type = response
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.trim().is_empty())
            .unwrap_or("text/html")
            .to_string();

        let content = response.text().await?;
        let response_time_ms = start.elapsed().as_millis() as u64;
        debug!(
            "Fetched {} ({} bytes, {} ms)",
            url,
            content.len(),
            response_time_ms
        );

        Ok(RawContent {
            url,
            status_code: status.as_u16(),
            content,
            content_type,
            response_time_ms,
        })
    }

    /// 获取引擎名称
    fn name(&self) -> &'static str {
        "reqwest"
    }
}

#[cfg(test)]
#[path = "reqwest_engine_test.rs"]
mod tests;
