//! 帧头解析.
//!
//! 每帧数据以 1 字节帧头开始:
//! ```text
//! bit 7     : 关键帧 (新帧) 标志
//! bit 5-6   : 平移标志, 非 0 时紧跟 2 个有符号字节 (dx, dy)
//! bit 3-4   : 图层 2 画笔选择
//! bit 1-2   : 图层 1 画笔选择
//! bit 0     : 纸面颜色
//! ```

use bitflags::bitflags;
use flip_core::{FlipResult, IoContext};

use crate::palette::{PaperColor, PenColor};

bitflags! {
    /// 帧头标志位
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct FrameFlags: u8 {
        /// 纸面颜色位
        const PAPER       = 0b0000_0001;
        /// 图层 1 画笔选择 (2 位)
        const LAYER_1_PEN = 0b0000_0110;
        /// 图层 2 画笔选择 (2 位)
        const LAYER_2_PEN = 0b0001_1000;
        /// 平移标志 (2 位)
        const TRANSLATION = 0b0110_0000;
        /// 关键帧标志
        const KEYFRAME    = 0b1000_0000;
    }
}

/// 解析后的帧头
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHeader {
    /// 原始标志位
    pub flags: FrameFlags,
    /// 水平平移量 (像素)
    pub dx: i8,
    /// 垂直平移量 (像素)
    pub dy: i8,
}

impl FrameHeader {
    /// 仅从帧头字节解析 (平移量置 0)
    pub fn from_byte(byte: u8) -> Self {
        Self {
            flags: FrameFlags::from_bits_retain(byte),
            dx: 0,
            dy: 0,
        }
    }

    /// 从流中读取帧头, 包括可选的平移字节
    ///
    /// 流必须位于帧起始偏移处, 读取完成后位于行类型块之前.
    pub fn read(io: &mut IoContext) -> FlipResult<Self> {
        let mut header = Self::from_byte(io.read_u8()?);
        if header.has_translation() {
            header.dx = io.read_i8()?;
            header.dy = io.read_i8()?;
        }
        Ok(header)
    }

    /// 是否为关键帧 (无需与前一帧做差分)
    pub fn is_keyframe(&self) -> bool {
        self.flags.contains(FrameFlags::KEYFRAME)
    }

    /// 平移标志的原始值 (0..=3)
    ///
    /// 1/2/3 的区别未知, 解码时只区分是否为 0.
    pub fn translation_flag(&self) -> u8 {
        (self.flags.bits() >> 5) & 0x03
    }

    /// 是否带平移字节
    pub fn has_translation(&self) -> bool {
        self.translation_flag() != 0
    }

    /// 帧头之后的字节数 (1 或 3)
    pub fn encoded_len(&self) -> usize {
        if self.has_translation() { 3 } else { 1 }
    }

    /// 纸面颜色
    pub fn paper(&self) -> PaperColor {
        PaperColor::from_bit(self.flags.contains(FrameFlags::PAPER))
    }

    /// 图层 1 画笔
    pub fn layer_1_pen(&self) -> PenColor {
        PenColor::from_selector((self.flags.bits() >> 1) & 0x03)
    }

    /// 图层 2 画笔
    pub fn layer_2_pen(&self) -> PenColor {
        PenColor::from_selector((self.flags.bits() >> 3) & 0x03)
    }
}
