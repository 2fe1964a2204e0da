// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::utils::errors::StorageError;
use std::path::{Path, PathBuf};
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;

/// 失败站点日志
///
/// 每次追加时打开文件，写入一行后立即关闭
#[derive(Debug, Clone)]
pub struct FailureLog {
    path: PathBuf,
}

impl FailureLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 追加一行 `"{url} failed after {attempts} attempts"`
    pub async fn append(&self, url: &str, attempts: u32) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(format!("{} failed after {} attempts\n", url, attempts).as_bytes())
            .await?;
        file.flush().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_append_creates_and_appends() {
        let dir = tempdir().unwrap();
        let log = FailureLog::new(dir.path().join("failed_sites.log"));

        log.append("https://a.test/list", 5).await.unwrap();
        log.append("https://b.test", 5).await.unwrap();

        let content = std::fs::read_to_string(log.path()).unwrap();
        assert_eq!(
            content,
            "https://a.test/list failed after 5 attempts\nhttps://b.test failed after 5 attempts\n"
        );
    }

    #[tokio::test]
    async fn test_append_keeps_existing_lines() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("failed_sites.log");
        std::fs::write(&path, "old failed after 5 attempts\n").unwrap();

        FailureLog::new(&path).append("new", 3).await.unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            content.lines().collect::<Vec<_>>(),
            vec!["old failed after 5 attempts", "new failed after 3 attempts"]
        );
    }
}
