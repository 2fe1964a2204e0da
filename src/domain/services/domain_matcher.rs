// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use once_cell::sync::Lazy;
use regex::Regex;

/// A period followed by at least two word characters.
static TLD_LIKE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\.\w{2,}").expect("valid regex"));

/// 域名候选匹配器
///
/// 判断一段文本是否包含域名，并返回记录中使用的域名值
pub trait DomainMatcher: Send + Sync {
    /// 匹配候选文本，不是域名时返回 `None`
    fn match_candidate(&self, text: &str) -> Option<String>;

    /// 匹配策略名称
    fn name(&self) -> &'static str;
}

/// 公共后缀匹配器
///
/// 严格策略：整段文本必须能分解为非空的可注册标签加上公共后缀列表中的已知后缀，
/// 返回规范化（小写）的可注册域名
#[derive(Debug, Clone, Copy, Default)]
pub struct PublicSuffixMatcher;

impl DomainMatcher for PublicSuffixMatcher {
    fn match_candidate(&self, text: &str) -> Option<String> {
        parse_registrable_domain(text)
    }

    fn name(&self) -> &'static str {
        "public_suffix"
    }
}

/// 模式匹配器
///
/// 宽松策略：文本中只要出现句点加两个以上单词字符即视为域名，返回原文本。
/// 不查询公共后缀列表，因此会接受 `v1.00` 之类的文本
#[derive(Debug, Clone, Copy, Default)]
pub struct PatternMatcher;

impl DomainMatcher for PatternMatcher {
    fn match_candidate(&self, text: &str) -> Option<String> {
        let text = text.trim();
        if text.is_empty() || !TLD_LIKE.is_match(text) {
            return None;
        }
        Some(text.to_string())
    }

    fn name(&self) -> &'static str {
        "pattern"
    }
}

/// 解析可注册域名
///
/// 接受裸主机名或URL形式的文本（会去掉协议、路径、用户信息与端口），
/// 主机名必须由合法标签组成，且后缀在公共后缀列表中
///
/// # 返回值
///
/// * `Some(String)` - 小写的可注册域名，例如 `example.co.uk`
/// * `None` - 文本不是域名
pub fn parse_registrable_domain(text: &str) -> Option<String> {
    let lower = text.trim().to_lowercase();
    if lower.is_empty() {
        return None;
    }

    let rest = match lower.find("://") {
        Some(idx) => &lower[idx + 3..],
        None => lower.strip_prefix("//").unwrap_or(&lower),
    };
    let authority = rest.split(&['/', '?', '#'][..]).next().unwrap_or_default();
    let host_port = authority.rsplit('@').next().unwrap_or(authority);
    let host = match host_port.rfind(':') {
        Some(idx) if host_port[idx + 1..].chars().all(|c| c.is_ascii_digit()) => {
            &host_port[..idx]
        }
        _ => host_port,
    };
    let host = host.trim_end_matches('.');

    if !is_hostname(host) {
        return None;
    }

    let domain = psl::domain(host.as_bytes())?;
    if !domain.suffix().is_known() {
        return None;
    }
    std::str::from_utf8(domain.as_bytes())
        .ok()
        .map(str::to_string)
}

/// 主机名标签只允许字母、数字与连字符，带下划线的标签不算主机名
fn is_hostname(host: &str) -> bool {
    if host.is_empty() || host.len() > 253 {
        return false;
    }
    host.split('.').all(|label| {
        !label.is_empty()
            && label.len() <= 63
            && !label.starts_with('-')
            && !label.ends_with('-')
            && label.chars().all(|c| c.is_alphanumeric() || c == '-')
    })
}
