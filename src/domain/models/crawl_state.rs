// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::collections::{HashSet, VecDeque};
use url::Url;

/// 单个站点可访问页面数的硬上限，配置值会被截断到此值
pub const MAX_PAGES_HARD_LIMIT: usize = 10_000;

/// 爬取状态
///
/// 一个站点任务独占的FIFO待访问队列与已访问集合。
/// 队列耗尽或达到页面上限时终止。
#[derive(Debug)]
pub struct CrawlState {
    visited: HashSet<String>,
    queued: HashSet<String>,
    queue: VecDeque<Url>,
    max_pages: usize,
}

impl CrawlState {
    /// 以入口URL初始化爬取状态
    pub fn new(entry: Url, max_pages: usize) -> Self {
        let mut state = Self {
            visited: HashSet::new(),
            queued: HashSet::new(),
            queue: VecDeque::new(),
            max_pages: max_pages.clamp(1, MAX_PAGES_HARD_LIMIT),
        };
        state.enqueue(entry);
        state
    }

    /// 取出下一个未访问的URL并标记为已访问
    ///
    /// 达到页面上限后返回 `None`，即使队列中仍有URL
    pub fn next_url(&mut self) -> Option<Url> {
        while self.visited.len() < self.max_pages {
            let url = self.queue.pop_front()?;
            let key = url.as_str().to_string();
            self.queued.remove(&key);
            if self.visited.insert(key) {
                return Some(url);
            }
        }
        None
    }

    /// 将URL加入队列，已访问或已在队列中的URL会被忽略
    pub fn enqueue(&mut self, url: Url) -> bool {
        let key = url.as_str().to_string();
        if self.visited.contains(&key) || !self.queued.insert(key) {
            return false;
        }
        self.queue.push_back(url);
        true
    }

    /// 是否已访问过该URL
    pub fn is_visited(&self, url: &Url) -> bool {
        self.visited.contains(url.as_str())
    }

    /// 已访问的页面数
    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }

    /// 队列中剩余的URL数
    pub fn pending_count(&self) -> usize {
        self.queue.len()
    }

    /// 是否因页面上限而停止（队列中仍有未访问的URL）
    pub fn hit_page_limit(&self) -> bool {
        self.visited.len() >= self.max_pages && !self.queue.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn test_fifo_order_and_visit_once() {
        let mut state = CrawlState::new(url("https://a.test/"), 10);
        assert_eq!(state.next_url(), Some(url("https://a.test/")));

        assert!(state.enqueue(url("https://a.test/page/2")));
        assert!(state.enqueue(url("https://a.test/page/3")));
        assert!(!state.enqueue(url("https://a.test/page/2")));
        assert!(!state.enqueue(url("https://a.test/")));

        assert_eq!(state.next_url(), Some(url("https://a.test/page/2")));
        assert_eq!(state.next_url(), Some(url("https://a.test/page/3")));
        assert_eq!(state.next_url(), None);
        assert_eq!(state.visited_count(), 3);
    }

    #[test]
    fn test_page_limit_stops_crawl() {
        let mut state = CrawlState::new(url("https://a.test/"), 2);
        state.next_url();
        state.enqueue(url("https://a.test/page/2"));
        state.enqueue(url("https://a.test/page/3"));
        assert!(state.next_url().is_some());
        assert_eq!(state.next_url(), None);
        assert!(state.hit_page_limit());
        assert_eq!(state.pending_count(), 1);
    }

    #[test]
    fn test_zero_limit_is_clamped_to_one() {
        let mut state = CrawlState::new(url("https://a.test/"), 0);
        assert!(state.next_url().is_some());
        assert!(state.is_visited(&url("https://a.test/")));
        assert_eq!(state.next_url(), None);
    }
}
