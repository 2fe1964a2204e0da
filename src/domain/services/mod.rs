// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域服务模块
///
/// 包含的服务：
/// - 域名匹配（domain_matcher）：判断一段文本是否像域名的两种策略
/// - 提取服务（extraction_service）：从静态HTML中按表格或块元素提取记录
/// - 爬取服务（crawl_service）：在浏览器会话中沿分页链接做广度优先爬取
pub mod crawl_service;
pub mod domain_matcher;
pub mod extraction_service;
