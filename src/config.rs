//! 配置文件.
//!
//! JSON 格式, 所有字段均可省略:
//! ```json
//! {
//!     "logging": { "level": "debug", "directory": "logs" },
//!     "decode": { "strict_frame_table": false }
//! }
//! ```

use std::path::Path;

use anyhow::{Context, Result};
use flip_format::OpenOptions;
use serde::{Deserialize, Serialize};

use crate::logging::LoggingConfig;

/// 顶层配置
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct FlipConfig {
    /// 日志配置, 为空时不初始化日志
    pub logging: Option<LoggingConfig>,
    /// 解码配置
    pub decode: DecodeConfig,
}

/// 解码配置
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct DecodeConfig {
    /// 偏移表长度与帧数不一致时是否报错
    pub strict_frame_table: bool,
}

impl Default for DecodeConfig {
    fn default() -> Self {
        Self {
            strict_frame_table: true,
        }
    }
}

impl From<DecodeConfig> for OpenOptions {
    fn from(config: DecodeConfig) -> Self {
        OpenOptions {
            strict_frame_table: config.strict_frame_table,
        }
    }
}

impl FlipConfig {
    /// 从 JSON 文件加载
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("读取配置文件失败, path={}", path.display()))?;
        Self::from_json_str(&text)
            .with_context(|| format!("解析配置文件失败, path={}", path.display()))
    }

    /// 从 JSON 文本解析
    pub fn from_json_str(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// 打开选项
    pub fn open_options(&self) -> OpenOptions {
        self.decode.into()
    }
}
