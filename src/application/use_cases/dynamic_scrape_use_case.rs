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
        models::{
            domain_record::DomainRecord,
            site_job::{FileNaming, SiteJob},
        },
        services::crawl_service::CrawlService,
    },
    engines::{
        identity::IdentityProvider,
        traits::{BrowserLauncher, BrowserSession, FetchError},
    },
    infrastructure::storage::{CsvStorage, FailureLog, StorageError},
    utils::{
        rate_limiter::{FixedIntervalGate, Pacer, Sleeper},
        retry_policy::{retry_with_policy, RetryPolicy},
    },
};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

/// 动态抓取流程的运行参数
#[derive(Debug, Clone)]
pub struct DynamicScrapeConfig {
    /// 浏览器启动的重试策略
    pub retry: RetryPolicy,
    pub max_pages_per_site: usize,
    /// 每写入多少条记录暂停一次
    pub records_per_break: usize,
    pub break_duration: Duration,
}

impl Default for DynamicScrapeConfig {
    fn default() -> Self {
        Self {
            retry: RetryPolicy::browser_launch(),
            max_pages_per_site: 200,
            records_per_break: 20,
            break_duration: Duration::from_secs(20),
        }
    }
}

impl DynamicScrapeConfig {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            retry: settings.launch_retry_policy(),
            max_pages_per_site: settings.effective_max_pages(),
            records_per_break: settings.pacing.records_per_break,
            break_duration: settings.break_duration(),
        }
    }
}

/// 动态抓取用例
///
/// 每个站点打开一个新的浏览器会话，沿分页链接广度优先爬取，
/// 汇总所有页面的记录后写出带表头的CSV
pub struct DynamicScrapeUseCase<L, I> {
    launcher: Arc<L>,
    identity: Arc<I>,
    sleeper: Arc<dyn Sleeper>,
    crawler: CrawlService,
    storage: CsvStorage,
    failure_log: FailureLog,
    config: DynamicScrapeConfig,
}

impl<L, I> DynamicScrapeUseCase<L, I>
where
    L: BrowserLauncher + 'static,
    I: IdentityProvider + 'static,
{
    pub fn new(
        launcher: Arc<L>,
        identity: Arc<I>,
        sleeper: Arc<dyn Sleeper>,
        storage: CsvStorage,
        failure_log: FailureLog,
        config: DynamicScrapeConfig,
    ) -> Self {
        Self {
            launcher,
            identity,
            sleeper,
            crawler: CrawlService::new(config.max_pages_per_site),
            storage,
            failure_log,
            config,
        }
    }

    /// 按输入顺序处理所有站点
    pub async fn run(&self, urls: &[String]) -> RunSummary {
        let mut summary = RunSummary::default();
        for line in urls {
            info!("Processing {}", line);
            let outcome = self.process_site(line).await;
            summary.record(outcome);
        }
        info!("Done. {}", summary);
        summary
    }

    /// 处理单个站点
    pub async fn process_site(&self, line: &str) -> SiteOutcome {
        let job = match SiteJob::new(line, FileNaming::SiteName) {
            Ok(job) => job,
            Err(e) => {
                error!("Skipping invalid input line {:?}: {}", line, e);
                self.log_failure(line, 0).await;
                return SiteOutcome::Failed;
            }
        };

        let mut session = match self.launch_with_retry(&job).await {
            Ok(session) => session,
            Err(FetchError::Exhausted {
                url,
                attempts,
                last_error,
            }) => {
                error!(
                    "Could not open a browser for {} after {} attempts: {}",
                    url, attempts, last_error
                );
                self.log_failure(&url, attempts).await;
                return SiteOutcome::Failed;
            }
            Err(e) => {
                error!("Error scraping {}: {}", job.source(), e);
                self.log_failure(job.source(), 1).await;
                return SiteOutcome::Failed;
            }
        };

        let report = self.crawler.crawl(job.url(), session.as_mut()).await;
        session.close().await;
        info!(
            "Crawled {} pages on {} ({} failed), {} records",
            report.pages_visited,
            job.source(),
            report.pages_failed,
            report.records.len()
        );

        if report.records.is_empty() {
            warn!("No data found for {}", job.source());
            return SiteOutcome::Empty;
        }

        match self.write_table(&job, &report.records).await {
            Ok(path) => {
                info!("Data saved to {}", path.display());
                SiteOutcome::Saved(report.records.len())
            }
            Err(e) => {
                error!("Failed to write {}: {}", job.file_name(), e);
                SiteOutcome::Failed
            }
        }
    }

    async fn launch_with_retry(
        &self,
        job: &SiteJob,
    ) -> Result<Box<dyn BrowserSession>, FetchError> {
        retry_with_policy(
            &self.config.retry,
            self.sleeper.as_ref(),
            job.source(),
            |_| {
                let user_agent = self.identity.next_identity();
                let launcher = Arc::clone(&self.launcher);
                async move { launcher.launch(&user_agent).await }
            },
        )
        .await
    }

    /// 逐条写入记录，每写满 `records_per_break` 条且仍有剩余记录时暂停一次
    async fn write_table(
        &self,
        job: &SiteJob,
        records: &[DomainRecord],
    ) -> Result<PathBuf, StorageError> {
        let Some((first, rest)) = records.split_first() else {
            return Ok(self.storage.base_path().join(job.file_name()));
        };

        let mut pacer = FixedIntervalGate::new(
            self.config.records_per_break,
            self.config.break_duration,
            Arc::clone(&self.sleeper),
        )
        .with_unit("records");

        let mut table = self.storage.open_table(job.file_name(), first).await?;
        for record in rest {
            pacer.tick().await;
            table.write(record).await?;
        }
        table.finish().await
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
