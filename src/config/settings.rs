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

use crate::domain::models::crawl_state::MAX_PAGES_HARD_LIMIT;
use crate::utils::retry_policy::RetryPolicy;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, Environment, File, Map};
use serde::Deserialize;
use std::time::Duration;

/// 环境变量前缀，例如 `DOMAIN_SCRAPER__CRAWL__MAX_PAGES_PER_SITE=50`
pub const ENV_PREFIX: &str = "DOMAIN_SCRAPER";

/// 环境变量中User-Agent列表的分隔符
pub const USER_AGENT_SEPARATOR: &str = "|";

/// 应用程序配置设置
///
/// 包含抓取、节奏控制、爬取、输出、输入和浏览器等所有配置项
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// 抓取与重试配置
    pub fetch: FetchSettings,
    /// 节奏控制配置
    pub pacing: PacingSettings,
    /// 动态爬取配置
    pub crawl: CrawlSettings,
    /// 输出配置
    pub output: OutputSettings,
    /// 输入配置
    pub input: InputSettings,
    /// 浏览器配置
    pub browser: BrowserSettings,
}

/// 抓取与重试配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct FetchSettings {
    /// 每个站点的最大尝试次数
    pub max_attempts: u32,
    /// 静态抓取单次请求超时（秒）
    pub static_timeout_secs: u64,
    /// 静态抓取重试间隔（秒）
    pub static_retry_delay_secs: u64,
    /// 浏览器单次导航超时（秒）
    pub navigation_timeout_secs: u64,
    /// 浏览器启动重试间隔（秒）
    pub dynamic_retry_delay_secs: u64,
    /// 自定义User-Agent池，为空时使用内置池
    #[serde(default)]
    pub user_agents: Vec<String>,
}

/// 节奏控制配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct PacingSettings {
    /// 静态流程每处理多少个站点暂停一次，0表示不暂停
    pub sites_per_break: usize,
    /// 动态流程每写入多少条记录暂停一次，0表示不暂停
    pub records_per_break: usize,
    /// 暂停时长（秒）
    pub break_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CrawlSettings {
    /// 每个站点最多访问的页面数
    pub max_pages_per_site: usize,
}

/// 输出配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct OutputSettings {
    /// 静态流程输出目录
    pub static_dir: String,
    /// 动态流程输出目录
    pub dynamic_dir: String,
    /// 失败日志路径
    pub failure_log: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InputSettings {
    /// 动态流程默认输入文件
    pub dynamic_file: String,
}

/// 浏览器配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct BrowserSettings {
    /// 远程Chrome DevTools地址，设置后不启动本地浏览器
    #[serde(default)]
    pub remote_debugging_url: Option<String>,
    /// 是否以 `--no-sandbox` 启动
    pub no_sandbox: bool,
}

impl Settings {
    /// 创建新的配置实例
    ///
    /// 依次合并内置默认值、`config/default`、`config/{APP_ENVIRONMENT}`
    /// 以及 `DOMAIN_SCRAPER__` 前缀的环境变量
    ///
    /// # 返回值
    ///
    /// * `Ok(Settings)` - 成功加载的配置
    /// * `Err(ConfigError)` - 配置加载失败
    pub fn new() -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "default".to_string());
        Self::defaults()?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(Self::environment())
            .build()?
            .try_deserialize()
    }

    /// 从指定配置文件和环境变量映射加载，不读取进程环境
    pub fn from_sources(
        file: Option<&str>,
        env: Map<String, String>,
    ) -> Result<Self, ConfigError> {
        let mut builder = Self::defaults()?;
        if let Some(file) = file {
            builder = builder.add_source(File::with_name(file).required(false));
        }
        builder
            .add_source(Self::environment().source(Some(env)))
            .build()?
            .try_deserialize()
    }

    /// 环境变量来源
    ///
    /// `fetch.user_agents` 以 `|` 分隔，User-Agent 本身常含逗号
    fn environment() -> Environment {
        Environment::with_prefix(ENV_PREFIX)
            .separator("__")
            .try_parsing(true)
            .list_separator(USER_AGENT_SEPARATOR)
            .with_list_parse_key("fetch.user_agents")
    }

    fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        Config::builder()
            // Fetch and retry
            .set_default("fetch.max_attempts", 5)?
            .set_default("fetch.static_timeout_secs", 15)?
            .set_default("fetch.static_retry_delay_secs", 5)?
            .set_default("fetch.navigation_timeout_secs", 60)?
            .set_default("fetch.dynamic_retry_delay_secs", 2)?
            .set_default("fetch.user_agents", Vec::<String>::new())?
            // Pacing
            .set_default("pacing.sites_per_break", 20)?
            .set_default("pacing.records_per_break", 20)?
            .set_default("pacing.break_secs", 20)?
            // Crawl
            .set_default("crawl.max_pages_per_site", 200)?
            // Output
            .set_default("output.static_dir", "output_domains")?
            .set_default("output.dynamic_dir", ".")?
            .set_default("output.failure_log", "failed_sites.log")?
            // Input
            .set_default("input.dynamic_file", "file.txt")?
            // Browser
            .set_default("browser.no_sandbox", true)
    }

    /// 静态抓取的重试策略
    pub fn static_retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.fetch.max_attempts,
            Duration::from_secs(self.fetch.static_retry_delay_secs),
        )
    }

    /// 浏览器启动的重试策略
    pub fn launch_retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.fetch.max_attempts,
            Duration::from_secs(self.fetch.dynamic_retry_delay_secs),
        )
    }

    pub fn static_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch.static_timeout_secs)
    }

    pub fn navigation_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch.navigation_timeout_secs)
    }

    pub fn break_duration(&self) -> Duration {
        Duration::from_secs(self.pacing.break_secs)
    }

    /// 生效的单站点页面上限，限制在 `1..=MAX_PAGES_HARD_LIMIT`
    pub fn effective_max_pages(&self) -> usize {
        self.crawl.max_pages_per_site.clamp(1, MAX_PAGES_HARD_LIMIT)
    }
}

#[cfg(test)]
#[path = "settings_test.rs"]
mod tests;
