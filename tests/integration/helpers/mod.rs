// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use domain_scraper::engines::traits::{BrowserLauncher, BrowserSession, FetchError, RenderedPage};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use url::Url;

/// 写入输入URL文件
pub fn write_url_file(dir: &Path, lines: &[&str]) -> PathBuf {
    let path = dir.join("urls.txt");
    std::fs::write(&path, lines.join("\n")).unwrap();
    path
}

/// 列出目录下所有CSV文件名（排序后）
pub fn csv_files(dir: &Path) -> Vec<String> {
    if !dir.exists() {
        return Vec::new();
    }
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.file_name().to_string_lossy().to_string())
        .filter(|name| name.ends_with(".csv"))
        .collect();
    names.sort();
    names
}

/// 内存中的站点：URL到HTML的映射，记录每次导航
#[derive(Clone, Default)]
pub struct FakeSite {
    pages: Arc<HashMap<String, String>>,
    visits: Arc<Mutex<Vec<String>>>,
    sessions_closed: Arc<Mutex<usize>>,
}

impl FakeSite {
    pub fn new(pages: &[(&str, &str)]) -> Self {
        Self {
            pages: Arc::new(
                pages
                    .iter()
                    .map(|(url, html)| (url.to_string(), html.to_string()))
                    .collect(),
            ),
            ..Default::default()
        }
    }

    pub fn visits(&self) -> Vec<String> {
        self.visits.lock().unwrap().clone()
    }

    pub fn sessions_closed(&self) -> usize {
        *self.sessions_closed.lock().unwrap()
    }
}

#[async_trait]
impl BrowserLauncher for FakeSite {
    async fn launch(&self, _user_agent: &str) -> Result<Box<dyn BrowserSession>, FetchError> {
        Ok(Box::new(FakeSession { site: self.clone() }))
    }

    fn name(&self) -> &'static str {
        "fake"
    }
}

pub struct FakeSession {
    site: FakeSite,
}

#[async_trait]
impl BrowserSession for FakeSession {
    async fn navigate(&mut self, url: &Url) -> Result<RenderedPage, FetchError> {
        self.site.visits.lock().unwrap().push(url.to_string());
        match self.site.pages.get(url.as_str()) {
            Some(content) => Ok(RenderedPage {
                url: url.clone(),
                content: content.clone(),
            }),
            None => Err(FetchError::Timeout),
        }
    }

    async fn close(&mut self) {
        *self.site.sessions_closed.lock().unwrap() += 1;
    }
}
