// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::fmt;

/// 单个站点的处理结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SiteOutcome {
    /// 已写出文件，包含的记录数
    Saved(usize),
    /// 没有提取到任何记录
    Empty,
    /// 抓取失败、输入无效或写入失败
    Failed,
}

/// 一次运行的汇总
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    /// 处理过的站点数
    pub sites: usize,
    /// 写出了非空文件的站点数
    pub saved: usize,
    /// 没有记录的站点数
    pub empty: usize,
    /// 失败的站点数
    pub failed: usize,
    /// 写出的记录总数
    pub records: usize,
}

impl RunSummary {
    pub fn record(&mut self, outcome: SiteOutcome) {
        self.sites += 1;
        match outcome {
            SiteOutcome::Saved(records) => {
                self.saved += 1;
                self.records += records;
            }
            SiteOutcome::Empty => self.empty += 1,
            SiteOutcome::Failed => self.failed += 1,
        }
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} sites processed: {} saved, {} empty, {} failed, {} records",
            self.sites, self.saved, self.empty, self.failed, self.records
        )
    }
}
