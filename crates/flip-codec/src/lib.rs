//! # flip-codec
//!
//! Flip 解码框架帧解码库, 负责从 PPM 帧数据中还原双图层光栅.
//!
//! ## 组成
//!
//! - **帧头** ([`frame_header`]): 关键帧标志、纸面颜色、画笔选择、平移量
//! - **扫描线码流** ([`scanline`]): 按行类型解码两个 256x192 位平面
//! - **帧差分引擎** ([`decoder`]): 随机访问解码, 自动回溯前驱帧并做带平移的异或
//! - **调色板与合成** ([`palette`]): 帧调色板选择与双图层合成
//! - **缩略图** ([`thumbnail`]): 64x48 4bpp 分块位图
//!
//! ## 使用示例
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use flip_codec::FrameDecoder;
//! use flip_core::IoContext;
//!
//! let mut io = IoContext::open_read("sample.ppm").unwrap();
//! // 帧偏移通常由 flip-format 的偏移表解析得到
//! let offsets: Arc<[u64]> = Arc::from(vec![0x06A8u64]);
//! let mut decoder = FrameDecoder::new(offsets);
//! let layers = decoder.resolve(&mut io, 0).unwrap();
//! println!("图层 1 置位像素: {}", layers.layer(0).count_set());
//! ```

pub mod decoder;
pub mod frame_header;
pub mod palette;
pub mod scanline;
pub mod thumbnail;

// 重导出常用类型
pub use decoder::FrameDecoder;
pub use frame_header::FrameHeader;
pub use palette::{FramePalette, PaperColor, PenColor};
pub use scanline::LineType;
pub use thumbnail::Thumbnail;
