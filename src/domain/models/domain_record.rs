// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 表头中域名列的名称
pub const DOMAIN_FIELD: &str = "Domain";
/// 表头中上下文列的名称
pub const CONTEXT_FIELD: &str = "Context";

/// 域名记录
///
/// 从页面中提取出的一条观测结果。同一页面上的重复记录会被原样保留。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainRecord {
    /// 域名（静态提取时为规范化的可注册域名，动态爬取时为匹配到的原始文本）
    pub domain: String,
    /// 周围的原始文本
    pub context: Option<String>,
    /// 原始单元格文本，按页面顺序排列，列数不固定
    pub cells: Vec<String>,
}

impl DomainRecord {
    /// 由表格行创建记录，保留整行单元格
    pub fn from_row(domain: impl Into<String>, cells: Vec<String>) -> Self {
        Self {
            domain: domain.into(),
            context: None,
            cells,
        }
    }

    /// 由块级元素文本创建两列记录 `[domain, text]`
    pub fn from_text(domain: impl Into<String>, text: impl Into<String>) -> Self {
        let domain = domain.into();
        let text = text.into();
        Self {
            cells: vec![domain.clone(), text.clone()],
            domain,
            context: Some(text),
        }
    }

    /// 由动态页面中匹配到的文本节点创建单列记录
    pub fn from_match(text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            cells: vec![text.clone()],
            domain: text,
            context: None,
        }
    }

    /// 表格输出时使用的字段名
    pub fn field_names(&self) -> Vec<&'static str> {
        match self.context {
            Some(_) => vec![DOMAIN_FIELD, CONTEXT_FIELD],
            None => vec![DOMAIN_FIELD],
        }
    }

    /// 与 `field_names` 一一对应的字段值
    pub fn field_values(&self) -> Vec<&str> {
        let mut values = vec![self.domain.as_str()];
        if let Some(context) = &self.context {
            values.push(context.as_str());
        }
        values
    }
}
