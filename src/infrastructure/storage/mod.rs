// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 存储模块
///
/// 负责CSV输出、失败日志以及输入URL列表的读取
pub mod csv_storage;
pub mod failure_log;
pub mod url_list;

pub use crate::utils::errors::StorageError;
pub use csv_storage::{CsvStorage, TableWriter};
pub use failure_log::FailureLog;
pub use url_list::read_url_list;
