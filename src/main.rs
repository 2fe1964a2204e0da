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

use clap::Parser;
use domain_scraper::application::use_cases::dynamic_scrape_use_case::{
    DynamicScrapeConfig, DynamicScrapeUseCase,
};
use domain_scraper::application::use_cases::static_scrape_use_case::{
    StaticScrapeConfig, StaticScrapeUseCase,
};
use domain_scraper::config::settings::Settings;
use domain_scraper::engines::identity::RandomUserAgentProvider;
use domain_scraper::engines::playwright_engine::PlaywrightEngine;
use domain_scraper::engines::reqwest_engine::ReqwestEngine;
use domain_scraper::infrastructure::storage::{
    read_url_list, CsvStorage, FailureLog, StorageError,
};
use domain_scraper::presentation::cli::{prompt_for_path, Cli, Command};
use domain_scraper::utils::rate_limiter::{Sleeper, TokioSleeper};
use domain_scraper::utils::telemetry;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

/// 主函数
///
/// 解析命令行，加载配置并按子命令运行对应的抓取流程
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize logging
    telemetry::init_telemetry();

    // 2. Parse arguments and load configuration
    let cli = Cli::parse();
    let settings = Settings::new()?;
    info!("Configuration loaded");

    let identity = Arc::new(RandomUserAgentProvider::new(
        settings.fetch.user_agents.clone(),
    ));
    let sleeper: Arc<dyn Sleeper> = Arc::new(TokioSleeper);
    let failure_log = FailureLog::new(&settings.output.failure_log);

    // 3. Run the selected pipeline
    match cli.command {
        Command::Static { input, output_dir } => {
            let input = match input {
                Some(path) => path,
                None => prompt_for_path(&mut std::io::stdin().lock(), &mut std::io::stdout())?,
            };
            let urls = load_urls(&input).await?;
            let output_dir =
                output_dir.unwrap_or_else(|| PathBuf::from(&settings.output.static_dir));
            info!("Static scrape of {} sites into {}", urls.len(), output_dir.display());

            let use_case = StaticScrapeUseCase::new(
                Arc::new(ReqwestEngine),
                identity,
                sleeper,
                CsvStorage::new(output_dir),
                failure_log,
                StaticScrapeConfig::from_settings(&settings),
            );
            use_case.run(&urls).await;
        }
        Command::Dynamic { input, output_dir } => {
            let input = input.unwrap_or_else(|| PathBuf::from(&settings.input.dynamic_file));
            let urls = load_urls(&input).await?;
            let output_dir =
                output_dir.unwrap_or_else(|| PathBuf::from(&settings.output.dynamic_dir));
            info!("Dynamic scrape of {} sites into {}", urls.len(), output_dir.display());

            let engine = PlaywrightEngine::new(settings.navigation_timeout())
                .with_remote_url(settings.browser.remote_debugging_url.clone())
                .with_sandbox(!settings.browser.no_sandbox);
            let use_case = DynamicScrapeUseCase::new(
                Arc::new(engine),
                identity,
                sleeper,
                CsvStorage::new(output_dir),
                failure_log,
                DynamicScrapeConfig::from_settings(&settings),
            );
            use_case.run(&urls).await;
        }
    }

    Ok(())
}

/// 读取输入文件，文件不存在时直接退出
async fn load_urls(path: &Path) -> anyhow::Result<Vec<String>> {
    match read_url_list(path).await {
        Ok(urls) => Ok(urls),
        Err(StorageError::InputNotFound(_)) => {
            eprintln!("File not found.");
            std::process::exit(1);
        }
        Err(e) => Err(e.into()),
    }
}
