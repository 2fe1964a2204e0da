// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use url::{ParseError, Url};

/// Characters that are not allowed in output file names.
const RESERVED_FILE_CHARS: [char; 9] = ['\\', '/', '*', '?', ':', '"', '<', '>', '|'];

/// 将可能为相对路径的URL转换为绝对路径URL
pub fn resolve_url(base_url: &Url, path: &str) -> Result<Url, ParseError> {
    base_url.join(path)
}

/// 规范化输入URL
///
/// 不以 `http` 开头的输入会被补上 `https://`
pub fn normalize_input_url(raw: &str) -> Result<Url, ParseError> {
    let raw = raw.trim();
    if raw.to_ascii_lowercase().starts_with("http") {
        Url::parse(raw)
    } else {
        Url::parse(&format!("https://{}", raw))
    }
}

/// 将文件名中的保留字符替换为下划线
pub fn sanitize_file_name(name: &str) -> String {
    name.chars()
        .map(|c| {
            if RESERVED_FILE_CHARS.contains(&c) {
                '_'
            } else {
                c
            }
        })
        .collect()
}
