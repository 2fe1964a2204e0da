// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 应用程序模块
///
/// 包含静态与动态抓取流程的用例
pub mod application;

/// 配置模块
///
/// 处理应用程序的配置设置和环境变量
pub mod config;

/// 领域模块
///
/// 包含域名记录、站点任务、爬取状态以及提取与爬取服务
pub mod domain;

/// 引擎模块
///
/// 实现静态HTTP抓取引擎与无头浏览器引擎
pub mod engines;

/// 基础设施模块
///
/// 提供CSV输出、失败日志与输入文件读取
pub mod infrastructure;

/// 表示层模块
///
/// 命令行参数解析与交互输入
pub mod presentation;

/// 工具模块
///
/// 提供通用的工具函数和辅助功能
pub mod utils;
