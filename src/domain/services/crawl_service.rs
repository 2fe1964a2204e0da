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

use crate::domain::models::crawl_state::CrawlState;
use crate::domain::models::domain_record::DomainRecord;
use crate::domain::services::domain_matcher::{DomainMatcher, PatternMatcher};
use crate::engines::traits::BrowserSession;
use crate::utils::url_utils::resolve_url;
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Node, Selector};
use tracing::{debug, error, info, warn};
use url::Url;

static ANCHOR_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("a").expect("valid anchor selector"));

/// Elements whose text is never rendered as page content.
const SKIPPED_ELEMENTS: [&str; 6] = ["head", "script", "style", "noscript", "template", "svg"];

/// 爬取报告
#[derive(Debug, Default)]
pub struct CrawlReport {
    /// 所有页面提取到的记录，按访问顺序聚合
    pub records: Vec<DomainRecord>,
    /// 已访问（尝试导航）的页面数
    pub pages_visited: usize,
    /// 导航失败被跳过的页面数
    pub pages_failed: usize,
    /// 是否因页面上限而提前停止
    pub hit_page_limit: bool,
}

/// 爬取服务
///
/// 在一个浏览器会话中从入口URL出发，沿分页链接做广度优先爬取，
/// 扫描每个页面的文本节点并用宽松的模式匹配识别域名
pub struct CrawlService<M: DomainMatcher = PatternMatcher> {
    /// 域名匹配器
    matcher: M,
    /// 单个站点最多访问的页面数
    max_pages: usize,
}

impl CrawlService<PatternMatcher> {
    /// 创建新的爬取服务实例
    ///
    /// # 参数
    ///
    /// * `max_pages` - 单个站点最多访问的页面数
    pub fn new(max_pages: usize) -> Self {
        Self {
            matcher: PatternMatcher,
            max_pages,
        }
    }
}

impl<M: DomainMatcher> CrawlService<M> {
    /// 使用自定义匹配器创建爬取服务实例
    pub fn with_matcher(matcher: M, max_pages: usize) -> Self {
        Self { matcher, max_pages }
    }

    /// 爬取站点
    ///
    /// 单个页面导航失败（包括超时）只会被记录并跳过，不会中止整个爬取。
    /// 队列耗尽或达到页面上限时结束。
    ///
    /// # 参数
    ///
    /// * `entry` - 入口URL
    /// * `session` - 浏览器会话
    ///
    /// # 返回值
    ///
    /// 聚合了所有页面记录的爬取报告
    pub async fn crawl(&self, entry: &Url, session: &mut dyn BrowserSession) -> CrawlReport {
        let mut state = CrawlState::new(entry.clone(), self.max_pages);
        let mut report = CrawlReport::default();

        while let Some(current) = state.next_url() {
            let page = match session.navigate(&current).await {
                Ok(page) => page,
                Err(e) if e.is_timeout() => {
                    error!("Timeout on {}", current);
                    report.pages_failed += 1;
                    continue;
                }
                Err(e) => {
                    error!("Error loading {}: {}", current, e);
                    report.pages_failed += 1;
                    continue;
                }
            };

            info!("Parsing: {}", page.url);
            if state.visited_count() == 1 && !page.content.to_lowercase().contains("domain") {
                warn!(
                    "No domain-related content detected on {}. Attempting deep search...",
                    page.url
                );
            }

            let scan = scan_page(&page.content, &page.url);
            let before = report.records.len();
            report.records.extend(
                scan.texts
                    .iter()
                    .filter_map(|text| self.matcher.match_candidate(text))
                    .map(DomainRecord::from_match),
            );

            let mut discovered = 0;
            for link in scan.links {
                if state.enqueue(link) {
                    discovered += 1;
                }
            }
            debug!(
                "{}: {} records, {} new pagination links",
                page.url,
                report.records.len() - before,
                discovered
            );
        }

        report.pages_visited = state.visited_count();
        report.hit_page_limit = state.hit_page_limit();
        if report.hit_page_limit {
            warn!(
                "Stopped crawling {} after {} pages ({} links left unvisited)",
                entry,
                report.pages_visited,
                state.pending_count()
            );
        }
        report
    }
}

/// 单个页面的扫描结果
#[derive(Debug, Default)]
pub struct PageScan {
    /// 含句点的最内层元素文本
    pub texts: Vec<String>,
    /// 分页链接（绝对URL）
    pub links: Vec<Url>,
}

/// 解析一次页面，同时收集候选文本和分页链接
pub fn scan_page(html_content: &str, base_url: &Url) -> PageScan {
    let document = Html::parse_document(html_content);
    PageScan {
        texts: TextNodeScanner::scan(&document),
        links: LinkDiscoverer::pagination_links(&document, base_url),
    }
}

/// 文本节点扫描器
///
/// 找出文本中含有句点的最内层元素，返回其折叠空白后的文本
pub struct TextNodeScanner;

impl TextNodeScanner {
    /// 扫描HTML内容
    pub fn scan_html(html_content: &str) -> Vec<String> {
        Self::scan(&Html::parse_document(html_content))
    }

    /// 扫描已解析的文档
    pub fn scan(document: &Html) -> Vec<String> {
        let mut texts = Vec::new();
        collect_innermost(document.root_element(), &mut texts);
        texts
    }
}

fn is_skipped(element: &ElementRef) -> bool {
    SKIPPED_ELEMENTS.contains(&element.value().name())
}

/// Returns whether the subtree of `element` produced a match.
fn collect_innermost(element: ElementRef, texts: &mut Vec<String>) -> bool {
    if is_skipped(&element) {
        return false;
    }

    let mut child_matched = false;
    for child in element.children().filter_map(ElementRef::wrap) {
        child_matched |= collect_innermost(child, texts);
    }
    if child_matched {
        return true;
    }

    let text = visible_text(element);
    if text.contains('.') {
        texts.push(text);
        return true;
    }
    false
}

fn visible_text(element: ElementRef) -> String {
    let mut raw = String::new();
    push_text(element, &mut raw);
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn push_text(element: ElementRef, raw: &mut String) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => raw.push_str(text),
            Node::Element(_) => {
                if let Some(child) = ElementRef::wrap(child) {
                    if !is_skipped(&child) {
                        push_text(child, raw);
                    }
                }
            }
            _ => {}
        }
    }
}

/// 链接发现器
///
/// 负责从HTML内容中提取分页链接
pub struct LinkDiscoverer;

impl LinkDiscoverer {
    /// 判断href是否像分页链接
    ///
    /// 包含 `page`（区分大小写）或 `next`（不区分大小写）
    pub fn is_pagination_href(href: &str) -> bool {
        href.contains("page") || href.to_lowercase().contains("next")
    }

    /// 从HTML内容中提取分页链接
    ///
    /// # 参数
    ///
    /// * `html_content` - HTML内容
    /// * `base_url` - 当前页面URL，用于解析相对路径
    ///
    /// # 返回值
    ///
    /// 按文档顺序排列的绝对URL；无法解析的链接被跳过
    pub fn extract_pagination_links(html_content: &str, base_url: &Url) -> Vec<Url> {
        Self::pagination_links(&Html::parse_document(html_content), base_url)
    }

    fn pagination_links(document: &Html, base_url: &Url) -> Vec<Url> {
        let mut links = Vec::new();
        for element in document.select(&ANCHOR_SELECTOR) {
            let Some(href) = element.value().attr("href").map(str::trim) else {
                continue;
            };
            if !Self::is_pagination_href(href) {
                continue;
            }

            match resolve_url(base_url, href) {
                Ok(mut url) => {
                    // Only keep http/https links
                    if url.scheme() != "http" && url.scheme() != "https" {
                        continue;
                    }
                    // Remove fragment to improve deduplication
                    url.set_fragment(None);
                    links.push(url);
                }
                Err(e) => debug!("Skipping malformed href {:?} on {}: {}", href, base_url, e),
            }
        }
        links
    }
}

#[cfg(test)]
#[path = "crawl_service_test.rs"]
mod tests;
