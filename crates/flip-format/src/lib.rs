//! # flip-format
//!
//! Flip 解码框架容器解析库, 负责 PPM 文件的固定布局部分:
//! 文件头、作者元数据、帧偏移表与音频头, 并提供面向调用方的 [`PpmDocument`].
//!
//! 文件布局 (小端):
//! ```text
//! 0x0000  文件头: "PARA" + 动画段大小 + 音频段大小 + 帧数-1 + 版本
//! 0x0010  元数据: 锁定标志、缩略图帧、作者名/ID、文件名、时间戳
//! 0x00A0  缩略图: 64x48 4bpp, 1536 字节
//! 0x06A0  动画头: 偏移表大小 + 标志 + 帧偏移表, 之后为帧数据
//! ......  音频头: 动画段 + 每帧音效标志之后, 按 4 字节对齐
//! ```

pub mod animation;
pub mod container;
pub mod document;
pub mod sound;

// 重导出常用类型
pub use animation::{AnimationFlags, AnimationHeader};
pub use container::{ContainerHeader, FileName, Metadata};
pub use document::{OpenOptions, PpmDocument, PpmInfo};
pub use sound::SoundHeader;
