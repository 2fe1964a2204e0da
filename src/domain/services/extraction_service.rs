// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::domain_record::DomainRecord;
use crate::domain::services::domain_matcher::{DomainMatcher, PublicSuffixMatcher};
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};

static TABLE_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("table").expect("valid table selector"));
static ROW_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("tr").expect("valid row selector"));
static CELL_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("td, th").expect("valid cell selector"));
static BLOCK_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div, span, li, p").expect("valid block selector"));

/// 提取服务
///
/// 负责从静态HTML中启发式地提取域名列表：
/// 页面中存在表格时逐行检查单元格，否则退回到扫描 div/span/li/p 元素。
/// 提取过程没有内部状态，对同一内容多次调用结果相同。
pub struct ExtractionService<M: DomainMatcher = PublicSuffixMatcher> {
    /// 域名匹配器
    matcher: M,
}

impl Default for ExtractionService<PublicSuffixMatcher> {
    fn default() -> Self {
        Self::new()
    }
}

impl ExtractionService<PublicSuffixMatcher> {
    /// 创建使用公共后缀校验的提取服务
    pub fn new() -> Self {
        Self {
            matcher: PublicSuffixMatcher,
        }
    }
}

impl<M: DomainMatcher> ExtractionService<M> {
    /// 使用自定义匹配器创建提取服务
    pub fn with_matcher(matcher: M) -> Self {
        Self { matcher }
    }

    /// 提取域名记录
    ///
    /// # 参数
    ///
    /// * `html_content` - 页面HTML
    ///
    /// # 返回值
    ///
    /// 按文档顺序排列的记录；空文档返回空列表
    pub fn extract(&self, html_content: &str) -> Vec<DomainRecord> {
        let document = Html::parse_document(html_content);
        let tables: Vec<ElementRef> = document.select(&TABLE_SELECTOR).collect();

        if tables.is_empty() {
            self.extract_blocks(&document)
        } else {
            self.extract_tables(&tables)
        }
    }

    fn extract_tables(&self, tables: &[ElementRef]) -> Vec<DomainRecord> {
        let mut records = Vec::new();
        for table in tables {
            for row in table.select(&ROW_SELECTOR) {
                let cells: Vec<String> = row.select(&CELL_SELECTOR).map(stripped_text).collect();
                if let Some(domain) = cells
                    .iter()
                    .find_map(|cell| self.matcher.match_candidate(cell))
                {
                    records.push(DomainRecord::from_row(domain, cells));
                }
            }
        }
        records
    }

    fn extract_blocks(&self, document: &Html) -> Vec<DomainRecord> {
        document
            .select(&BLOCK_SELECTOR)
            .filter_map(|element| {
                let text = stripped_text(element);
                self.matcher
                    .match_candidate(&text)
                    .map(|domain| DomainRecord::from_text(domain, text))
            })
            .collect()
    }
}

/// 元素的文本内容：每个文本节点去掉首尾空白后直接拼接，空节点被丢弃
pub fn stripped_text(element: ElementRef) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect()
}

#[cfg(test)]
#[path = "extraction_service_test.rs"]
mod tests;
