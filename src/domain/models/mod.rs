// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域模型模块
///
/// - 域名记录（domain_record）：从页面中提取出的一条观测结果
/// - 站点任务（site_job）：一个输入URL及其派生的输出文件名
/// - 爬取状态（crawl_state）：动态爬取时的队列与已访问集合
pub mod crawl_state;
pub mod domain_record;
pub mod site_job;
