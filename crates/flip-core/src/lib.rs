//! # flip-core
//!
//! Flip 解码框架核心库, 提供错误处理、I/O 抽象、位平面与颜色等基础类型.
//!
//! 本 crate 为 `flip-codec` (帧解码) 与 `flip-format` (容器解析) 提供底层基础设施.

pub mod color;
pub mod error;
pub mod io;
pub mod raster;

// 重导出常用类型
pub use color::Rgb;
pub use error::{FlipError, FlipResult};
pub use io::IoContext;
pub use raster::{Bitplane, CompositeBuffer, LayerPair, SCREEN_HEIGHT, SCREEN_WIDTH};
