// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 用例模块
///
/// 包含应用程序的所有业务用例实现
/// 每个用例代表一条完整的抓取流程，按输入顺序逐站点执行
pub mod dynamic_scrape_use_case;
pub mod static_scrape_use_case;
