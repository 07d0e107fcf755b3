//! 帧调色板.
//!
//! 每帧只有 3 种颜色: 纸面、图层 1 画笔、图层 2 画笔.
//! 纸面在白/黑之间二选一, 画笔从 {保留, 纸面反色, 红, 蓝} 中选择.
//! 合成缓冲区中的像素索引 0/1/2 与 [`FramePalette::to_rgb`] 的下标一一对应.

use flip_core::Rgb;

use crate::frame_header::FrameHeader;

/// 纸面颜色
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PaperColor {
    /// 白纸 (纸面位 = 0)
    White,
    /// 黑纸 (纸面位 = 1)
    Black,
}

impl PaperColor {
    /// 从帧头纸面位转换 (0 白纸, 1 黑纸)
    ///
    /// 部分现有导出工具按相反极性解释该位, 与它们对比输出时需注意.
    pub fn from_bit(bit: bool) -> Self {
        if bit { Self::Black } else { Self::White }
    }

    /// 纸面 RGB
    pub fn rgb(self) -> Rgb {
        match self {
            Self::White => Rgb::WHITE,
            Self::Black => Rgb::BLACK,
        }
    }

    /// 默认画笔颜色 (纸面反色)
    pub fn inverse_rgb(self) -> Rgb {
        match self {
            Self::White => Rgb::BLACK,
            Self::Black => Rgb::WHITE,
        }
    }
}

/// 画笔颜色选择
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PenColor {
    /// 选择码 0, 设备不会写出
    Reserved,
    /// 纸面反色 (白纸黑笔 / 黑纸白笔)
    Inverse,
    /// 红
    Red,
    /// 蓝
    Blue,
}

impl PenColor {
    /// 从 2 位选择码转换
    pub fn from_selector(selector: u8) -> Self {
        match selector & 0x03 {
            0 => Self::Reserved,
            1 => Self::Inverse,
            2 => Self::Red,
            _ => Self::Blue,
        }
    }

    /// 在给定纸面下的 RGB, 保留值返回 None
    pub fn rgb(self, paper: PaperColor) -> Option<Rgb> {
        match self {
            Self::Reserved => None,
            Self::Inverse => Some(paper.inverse_rgb()),
            Self::Red => Some(Rgb::RED),
            Self::Blue => Some(Rgb::BLUE),
        }
    }
}

/// 单帧调色板
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FramePalette {
    /// 纸面
    pub paper: PaperColor,
    /// 图层 1 画笔
    pub layer_1: PenColor,
    /// 图层 2 画笔
    pub layer_2: PenColor,
}

impl FramePalette {
    /// 从帧头提取调色板
    pub fn from_header(header: &FrameHeader) -> Self {
        Self {
            paper: header.paper(),
            layer_1: header.layer_1_pen(),
            layer_2: header.layer_2_pen(),
        }
    }

    /// 转换为 3 色 RGB 表 (纸面, 图层 1, 图层 2)
    ///
    /// 保留画笔按纸面反色输出, 保证导出时始终有 3 个有效颜色.
    pub fn to_rgb(&self) -> [Rgb; 3] {
        let fallback = self.paper.inverse_rgb();
        [
            self.paper.rgb(),
            self.layer_1.rgb(self.paper).unwrap_or(fallback),
            self.layer_2.rgb(self.paper).unwrap_or(fallback),
        ]
    }
}
