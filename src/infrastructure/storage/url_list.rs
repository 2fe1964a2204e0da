// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::utils::errors::StorageError;
use std::path::Path;

/// 读取输入URL列表
///
/// 每行一个URL，去除首尾空白并跳过空行，保持文件中的顺序。
/// 路径不存在或不是普通文件时返回 `StorageError::InputNotFound`
pub async fn read_url_list(path: impl AsRef<Path>) -> Result<Vec<String>, StorageError> {
    let path = path.as_ref();
    let is_file = match tokio::fs::metadata(path).await {
        Ok(meta) => meta.is_file(),
        Err(_) => false,
    };
    if !is_file {
        return Err(StorageError::InputNotFound(path.to_path_buf()));
    }

    let content = tokio::fs::read_to_string(path).await?;
    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_read_url_list_trims_and_skips_blanks() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("urls.txt");
        std::fs::write(&path, "  https://a.test/list \n\n\t\nb.test\r\n").unwrap();

        let urls = read_url_list(&path).await.unwrap();

        assert_eq!(urls, vec!["https://a.test/list", "b.test"]);
    }

    #[tokio::test]
    async fn test_read_url_list_missing_file() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("missing.txt");

        match read_url_list(&missing).await {
            Err(StorageError::InputNotFound(path)) => assert_eq!(path, missing),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_read_url_list_directory_is_not_input() {
        let dir = tempdir().unwrap();
        let result = read_url_list(dir.path()).await;
        assert!(matches!(result, Err(StorageError::InputNotFound(_))));
    }
}
