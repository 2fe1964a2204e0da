// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 基础设施层模块
///
/// 该模块包含系统的技术实现细节，负责与文件系统的交互。
///
/// 包含的子模块：
/// - 存储（storage）：CSV输出文件、失败日志以及输入URL列表
pub mod storage;
