//! 可分辨名称
//!
//! 名称保存为有序的属性/值对列表，以单行形式
//! `/DC=org/DC=ruby-lang/CN=CA1` 书写。查找颁发者时
//! 按名称精确比较。

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::{PkiError, Result};

/// X.500 可分辨名称
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Name {
    entries: Vec<(String, String)>,
}

impl Name {
    /// 空名称
    pub fn new() -> Self {
        Self::default()
    }

    /// 解析单行形式，例如 `/DC=org/DC=ruby-lang/CN=CA1`。
    ///
    /// 反斜杠转义下一个字符，因此 `/CN=a\/b` 的值为
    /// `a/b`。
    pub fn parse(input: &str) -> Result<Self> {
        if input.is_empty() {
            return Ok(Self::new());
        }
        let Some(rest) = input.strip_prefix('/') else {
            return Err(PkiError::InvalidName(format!(
                "name must start with '/': {input}"
            )));
        };

        let mut entries = Vec::new();
        for component in split_unescaped(rest) {
            if component.is_empty() {
                continue;
            }
            let (attribute, value) = component
                .split_once('=')
                .ok_or_else(|| PkiError::InvalidName(format!("missing '=' in {component:?}")))?;
            let attribute = attribute.trim();
            if attribute.is_empty()
                || !attribute
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-')
            {
                return Err(PkiError::InvalidName(format!(
                    "invalid attribute type {attribute:?}"
                )));
            }
            entries.push((attribute.to_string(), unescape(value)));
        }
        Ok(Self { entries })
    }

    /// 追加属性（构建器风格）
    pub fn with(mut self, attribute: impl Into<String>, value: impl Into<String>) -> Self {
        self.entries.push((attribute.into(), value.into()));
        self
    }

    pub fn entries(&self) -> &[(String, String)] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 最后一个CN属性的值
    pub fn common_name(&self) -> Option<&str> {
        self.entries
            .iter()
            .rev()
            .find(|(attribute, _)| attribute.eq_ignore_ascii_case("CN"))
            .map(|(_, value)| value.as_str())
    }
}

fn split_unescaped(input: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut escaped = false;
    for c in input.chars() {
        if escaped {
            current.push('\\');
            current.push(c);
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if c == '/' {
            parts.push(std::mem::take(&mut current));
        } else {
            current.push(c);
        }
    }
    if escaped {
        current.push('\\');
    }
    parts.push(current);
    parts
}

fn unescape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some(next) => out.push(next),
                None => out.push('\\'),
            }
        } else {
            out.push(c);
        }
    }
    out
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (attribute, value) in &self.entries {
            write!(f, "/{attribute}=")?;
            for c in value.chars() {
                if c == '/' || c == '\\' {
                    f.write_str("\\")?;
                }
                write!(f, "{c}")?;
            }
        }
        Ok(())
    }
}

impl FromStr for Name {
    type Err = PkiError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Name {
    type Error = PkiError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<Name> for String {
    fn from(value: Name) -> Self {
        value.to_string()
    }
}
