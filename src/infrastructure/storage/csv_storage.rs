// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::domain_record::DomainRecord;
use crate::utils::errors::StorageError;
use std::path::{Path, PathBuf};
use tokio::fs::{self, File};
use tokio::io::AsyncWriteExt;

/// CSV文件存储
///
/// 所有文件都写在 `base_path` 目录下，目录不存在时自动创建
#[derive(Debug, Clone)]
pub struct CsvStorage {
    base_path: PathBuf,
}

impl CsvStorage {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    fn get_full_path(&self, file_name: &str) -> PathBuf {
        self.base_path.join(file_name)
    }

    /// 一次性写入不等长的行，不写表头
    ///
    /// 空记录列表也会生成一个空文件
    pub async fn write_rows(
        &self,
        file_name: &str,
        records: &[DomainRecord],
    ) -> Result<PathBuf, StorageError> {
        let full_path = self.get_full_path(file_name);
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let mut writer = csv::WriterBuilder::new()
            .flexible(true)
            .has_headers(false)
            .from_writer(Vec::new());
        for record in records {
            writer.write_record(&record.cells)?;
        }
        let data = into_bytes(writer)?;

        fs::write(&full_path, data).await?;
        Ok(full_path)
    }

    /// 打开带表头的表格文件
    ///
    /// 表头取自第一条记录的字段名，第一条记录同时被写入
    pub async fn open_table(
        &self,
        file_name: &str,
        first: &DomainRecord,
    ) -> Result<TableWriter, StorageError> {
        let full_path = self.get_full_path(file_name);
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let header: Vec<String> = first
            .field_names()
            .iter()
            .map(|name| name.to_string())
            .collect();

        let mut file = File::create(&full_path).await?;
        file.write_all(&encode_row(&header)?).await?;

        let mut table = TableWriter {
            path: full_path,
            header,
            file,
            rows: 0,
        };
        table.write(first).await?;
        Ok(table)
    }
}

fn into_bytes(writer: csv::Writer<Vec<u8>>) -> Result<Vec<u8>, StorageError> {
    writer
        .into_inner()
        .map_err(|e| StorageError::Io(e.into_error()))
}

/// 把单行编码为CSV字节
fn encode_row<I, T>(fields: I) -> Result<Vec<u8>, StorageError>
where
    I: IntoIterator<Item = T>,
    T: AsRef<[u8]>,
{
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());
    writer.write_record(fields)?;
    into_bytes(writer)
}

/// 带表头的逐行写入器
pub struct TableWriter {
    path: PathBuf,
    header: Vec<String>,
    file: File,
    rows: usize,
}

impl TableWriter {
    /// 写入一条记录，字段集合必须与表头一致
    pub async fn write(&mut self, record: &DomainRecord) -> Result<(), StorageError> {
        let names = record.field_names();
        if names.len() != self.header.len()
            || names.iter().zip(&self.header).any(|(a, b)| *a != b.as_str())
        {
            return Err(StorageError::SchemaMismatch {
                row: self.rows + 1,
                expected: self.header.clone(),
                found: names.iter().map(|n| n.to_string()).collect(),
            });
        }

        let row = encode_row(record.field_values())?;
        self.file.write_all(&row).await?;
        self.file.flush().await?;
        self.rows += 1;
        Ok(())
    }

    /// 已写入的数据行数（不含表头）
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// 同步到磁盘并关闭文件，返回文件路径
    pub async fn finish(mut self) -> Result<PathBuf, StorageError> {
        self.file.flush().await?;
        self.file.sync_all().await?;
        Ok(self.path)
    }
}
