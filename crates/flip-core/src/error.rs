//! 统一错误类型定义.
//!
//! 所有 Flip crate 共用的错误类型, 支持跨模块传播.
//! 除 I/O 类错误外, 每个变体都表示文件损坏或调用方传入了非法索引, 不应重试.

use thiserror::Error;

/// Flip 框架统一错误类型
#[derive(Debug, Error)]
pub enum FlipError {
    /// 文件头或元数据损坏 (魔数不符 / 固定字段被截断)
    #[error("文件头损坏: {0}")]
    MalformedHeader(String),

    /// 帧偏移表与帧数不一致
    #[error("帧偏移表损坏: {0}")]
    MalformedAnimationTable(String),

    /// 帧索引越界
    #[error("帧索引越界: {index} (共 {count} 帧)")]
    FrameIndexOutOfRange {
        /// 请求的帧索引
        index: usize,
        /// 文档中的帧数
        count: usize,
    },

    /// 帧数据被截断
    #[error("帧 {0} 的数据被截断")]
    TruncatedFrameData(usize),

    /// 缩略图数据被截断
    #[error("缩略图数据被截断")]
    TruncatedThumbnail,

    /// 不支持的播放速度码 (合法范围 1..=8)
    #[error("不支持的速度码: {0}")]
    UnsupportedSpeedCode(i16),

    /// I/O 错误
    #[error("I/O 错误: {0}")]
    Io(#[from] std::io::Error),

    /// 已到达流末尾
    #[error("已到达流末尾")]
    Eof,
}

impl FlipError {
    /// 是否为流末尾错误
    ///
    /// 各解析阶段据此把底层的 `Eof` 转换为带上下文的截断错误.
    pub fn is_eof(&self) -> bool {
        match self {
            Self::Eof => true,
            Self::Io(e) => e.kind() == std::io::ErrorKind::UnexpectedEof,
            _ => false,
        }
    }
}

/// Flip 框架统一 Result 类型
pub type FlipResult<T> = Result<T, FlipError>;
