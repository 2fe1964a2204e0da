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

use crate::{
    application::dto::run_summary::{RunSummary, SiteOutcome},
    config::settings::Settings,
    domain::{
        models::site_job::{FileNaming, SiteJob},
        services::extraction_service::ExtractionService,
    },
    engines::{
        identity::IdentityProvider,
        traits::{FetchError, PageFetcher, RequestContext},
    },
    infrastructure::storage::{CsvStorage, FailureLog},
    utils::{
        rate_limiter::{FixedIntervalGate, Pacer, Sleeper},
        retry_policy::{retry_with_policy, RetryPolicy},
    },
};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};

/// 静态抓取流程的运行参数
#[derive(Debug, Clone)]
pub struct StaticScrapeConfig {
    pub retry: RetryPolicy,
    /// 单次请求超时
    pub timeout: Duration,
    /// 每处理多少个站点暂停一次
    pub sites_per_break: usize,
    pub break_duration: Duration,
}

impl Default for StaticScrapeConfig {
    fn default() -> Self {
        Self {
            retry: RetryPolicy::static_fetch(),
            timeout: Duration::from_secs(15),
            sites_per_break: 20,
            break_duration: Duration::from_secs(20),
        }
    }
}

impl StaticScrapeConfig {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            retry: settings.static_retry_policy(),
            timeout: settings.static_timeout(),
            sites_per_break: settings.pacing.sites_per_break,
            break_duration: settings.break_duration(),
        }
    }
}

/// 静态抓取用例
///
/// 逐个站点执行 抓取 → 表格/块级元素提取 → 写出CSV，
/// 抓取重试耗尽时写入失败日志
pub struct StaticScrapeUseCase<F, I> {
    fetcher: Arc<F>,
    identity: Arc<I>,
    sleeper: Arc<dyn Sleeper>,
    extraction: ExtractionService,
    storage: CsvStorage,
    failure_log: FailureLog,
    config: StaticScrapeConfig,
}

impl<F, I> StaticScrapeUseCase<F, I>
where
    F: PageFetcher + 'static,
    I: IdentityProvider + 'static,
{
    pub fn new(
        fetcher: Arc<F>,
        identity: Arc<I>,
        sleeper: Arc<dyn Sleeper>,
        storage: CsvStorage,
        failure_log: FailureLog,
        config: StaticScrapeConfig,
    ) -> Self {
        Self {
            fetcher,
            identity,
            sleeper,
            extraction: ExtractionService::new(),
            storage,
            failure_log,
            config,
        }
    }

    /// 按输入顺序处理所有站点
    ///
    /// 单个站点的失败不会中断整个运行
    pub async fn run(&self, urls: &[String]) -> RunSummary {
        let mut summary = RunSummary::default();
        let mut pacer = FixedIntervalGate::new(
            self.config.sites_per_break,
            self.config.break_duration,
            Arc::clone(&self.sleeper),
        )
        .with_unit("sites");

        for line in urls {
            let outcome = self.process_site(line).await;
            summary.record(outcome);
            pacer.tick().await;
        }

        info!(
            "Done. All CSVs saved in the '{}' folder. {}",
            self.storage.base_path().display(),
            summary
        );
        summary
    }

    /// 处理单个站点
    pub async fn process_site(&self, line: &str) -> SiteOutcome {
        let job = match SiteJob::new(line, FileNaming::HostUnderscored) {
            Ok(job) => job,
            Err(e) => {
                error!("Skipping invalid input line {:?}: {}", line, e);
                self.log_failure(line, 0).await;
                return SiteOutcome::Failed;
            }
        };

        let html = match self.fetch_with_retry(&job).await {
            Ok(html) => html,
            Err(FetchError::Exhausted {
                url,
                attempts,
                last_error,
            }) => {
                error!(
                    "{} failed after {} attempts: {}",
                    url, attempts, last_error
                );
                self.log_failure(&url, attempts).await;
                return SiteOutcome::Failed;
            }
            Err(e) => {
                error!("Error on {}: {}", job.source(), e);
                self.log_failure(job.source(), 1).await;
                return SiteOutcome::Failed;
            }
        };

        let records = self.extraction.extract(&html);
        match self.storage.write_rows(job.file_name(), &records).await {
            Ok(path) => {
                info!("Saved {} domains to {}", records.len(), path.display());
                if records.is_empty() {
                    SiteOutcome::Empty
                } else {
                    SiteOutcome::Saved(records.len())
                }
            }
            Err(e) => {
                error!("Failed to write {}: {}", job.file_name(), e);
                SiteOutcome::Failed
            }
        }
    }

    async fn fetch_with_retry(&self, job: &SiteJob) -> Result<String, FetchError> {
        let policy = self.config.retry;
        retry_with_policy(&policy, self.sleeper.as_ref(), job.source(), |attempt| {
            info!("Fetching {} (attempt {})", job.url(), attempt);
            // Identity is rotated on every attempt
            let context = RequestContext::new(
                job.url().clone(),
                self.identity.next_identity(),
                self.config.timeout,
            );
            let fetcher = Arc::clone(&self.fetcher);
            async move { fetcher.fetch(&context).await.map(|raw| raw.content) }
        })
        .await
    }

    async fn log_failure(&self, url: &str, attempts: u32) {
        if let Err(e) = self.failure_log.append(url, attempts).await {
            error!(
                "Failed to append {} to {}: {}",
                url,
                self.failure_log.path().display(),
                e
            );
        }
    }
}
