// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域层模块
///
/// 该模块包含系统的核心业务逻辑，包括：
/// - 领域模型（models）：域名记录、站点任务与爬取状态
/// - 服务（services）：域名匹配、静态提取与分页爬取
///
/// 领域层不依赖于网络或文件系统的具体实现。
pub mod models;
pub mod services;
