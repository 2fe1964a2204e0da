// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::utils::url_utils::{normalize_input_url, sanitize_file_name};
use thiserror::Error;
use url::Url;

/// 站点任务错误类型
#[derive(Error, Debug, PartialEq, Eq)]
pub enum SiteJobError {
    /// 无法解析为URL
    #[error("Invalid URL '{0}': {1}")]
    InvalidUrl(String, String),
    /// 不支持的协议
    #[error("Unsupported scheme '{0}'")]
    UnsupportedScheme(String),
    /// URL中没有主机名
    #[error("URL '{0}' has no host")]
    MissingHost(String),
}

/// 输出文件命名方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileNaming {
    /// 主机名（含端口）中的点替换为下划线
    HostUnderscored,
    /// 去掉前导 `www.` 后再替换点
    SiteName,
}

/// 站点任务
///
/// 一个输入URL及其派生的输出文件名，创建后不可变
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteJob {
    source: String,
    url: Url,
    file_name: String,
}

impl SiteJob {
    /// 从输入文件的一行创建站点任务
    pub fn new(line: &str, naming: FileNaming) -> Result<Self, SiteJobError> {
        let source = line.trim().to_string();
        let url = normalize_input_url(&source)
            .map_err(|e| SiteJobError::InvalidUrl(source.clone(), e.to_string()))?;

        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(SiteJobError::UnsupportedScheme(url.scheme().to_string()));
        }

        let host = url
            .host_str()
            .filter(|h| !h.is_empty())
            .ok_or_else(|| SiteJobError::MissingHost(source.clone()))?;

        let stem = match naming {
            FileNaming::HostUnderscored => match url.port() {
                Some(port) => format!("{}:{}", host, port),
                None => host.to_string(),
            },
            FileNaming::SiteName => host.strip_prefix("www.").unwrap_or(host).to_string(),
        };
        let file_name = format!("{}.csv", sanitize_file_name(&stem.replace('.', "_")));

        Ok(Self {
            source,
            url,
            file_name,
        })
    }

    /// 输入文件中的原始文本
    pub fn source(&self) -> &str {
        &self.source
    }

    /// 规范化后的URL
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// 输出文件名
    pub fn file_name(&self) -> &str {
        &self.file_name
    }
}
