// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::path::PathBuf;
use thiserror::Error;

/// 存储层错误类型
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("输入文件不存在: {}", .0.display())]
    InputNotFound(PathBuf),

    #[error("IO错误: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV错误: {0}")]
    Csv(#[from] csv::Error),

    #[error("第{row}条记录的字段 {found:?} 与表头 {expected:?} 不一致")]
    SchemaMismatch {
        row: usize,
        expected: Vec<String>,
        found: Vec<String>,
    },
}
