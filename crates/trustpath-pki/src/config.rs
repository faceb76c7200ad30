use std::path::Path;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{
    error::Result as PkiResult,
    types::{Purpose, VerifyFlags},
};

/// 目标与信任锚之间中间证书数量的默认上限
pub const DEFAULT_MAX_DEPTH: usize = 100;

/// 信任存储持有的验证配置
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifyConfig {
    #[serde(default)]
    pub purpose: Purpose,
    #[serde(default)]
    pub flags: VerifyFlags,
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
    /// 固定验证时间；未设置时使用当前时间
    #[serde(
        default,
        with = "time::serde::rfc3339::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub verification_time: Option<OffsetDateTime>,
}

fn default_max_depth() -> usize {
    DEFAULT_MAX_DEPTH
}

impl Default for VerifyConfig {
    fn default() -> Self {
        Self {
            purpose: Purpose::Any,
            flags: VerifyFlags::NONE,
            max_depth: DEFAULT_MAX_DEPTH,
            verification_time: None,
        }
    }
}

impl VerifyConfig {
    pub fn from_json(json: &str) -> PkiResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> PkiResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    pub fn to_json(&self) -> PkiResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// 验证运行所依据的时间点
    pub fn effective_time(&self) -> OffsetDateTime {
        self.verification_time
            .unwrap_or_else(OffsetDateTime::now_utc)
    }
}
