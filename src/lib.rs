//! # Flip
//!
//! 纯 Rust 实现的 Flipnote Studio PPM 动画解码库.
//!
//! Flip 负责把 PPM 文件还原为可显示的帧:
//! - **容器解析**: 文件头, 元数据, 帧偏移表, 音频头
//! - **帧解码**: 行编码双图层位图, 关键帧与差分帧重建
//! - **调色板**: 每帧纸面与画笔颜色
//! - **缩略图**: 64x48 的 16 色预览图
//!
//! # 快速开始
//!
//! ```rust,no_run
//! use flip::format::PpmDocument;
//!
//! let mut doc = PpmDocument::open_path("F78DA8_14768882B56B8_030.ppm")?;
//! println!("{} 帧, {} fps", doc.frame_count(), doc.framerate());
//! let pixels = doc.composite(doc.frame_count() - 1)?;
//! let colors = doc.palette_for(doc.frame_count() - 1)?.to_rgb();
//! println!("{}", colors[usize::from(pixels.get(0, 0))]);
//! # Ok::<(), flip::core::FlipError>(())
//! ```
//!
//! # Crate 结构
//!
//! | Crate | 功能 |
//! |-------|------|
//! | `flip-core` | 错误类型, 字节流, 光栅缓冲 |
//! | `flip-codec` | 帧头, 行解码, 差分重建, 调色板, 缩略图 |
//! | `flip-format` | PPM 容器解析与文档句柄 |

/// 核心类型与工具
pub use flip_core as core;

/// 帧解码
pub use flip_codec as codec;

/// 容器解析
pub use flip_format as format;

pub mod config;
pub mod logging;

/// 获取 Flip 版本号
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
