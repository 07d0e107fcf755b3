//! 颜色定义与固定调色板.

use std::fmt;

/// 8 位 RGB 颜色
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// 纸面/笔迹黑色 (略微偏灰, 与设备显示一致)
    pub const BLACK: Self = Self(0x0E, 0x0E, 0x0E);
    /// 纸面/笔迹白色
    pub const WHITE: Self = Self(0xFF, 0xFF, 0xFF);
    /// 红色笔
    pub const RED: Self = Self(0xFF, 0x2A, 0x2A);
    /// 蓝色笔
    pub const BLUE: Self = Self(0x0A, 0x39, 0xFF);

    /// 转换为 `[r, g, b]` 字节数组
    pub const fn to_array(self) -> [u8; 3] {
        [self.0, self.1, self.2]
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.0, self.1, self.2)
    }
}

/// 缩略图固定 16 色调色板
///
/// 索引 7, 11, 13, 14, 15 在设备上未使用, 显示为纯绿.
pub const THUMBNAIL_PALETTE: [Rgb; 16] = [
    Rgb(0xFF, 0xFF, 0xFF),
    Rgb(0x52, 0x52, 0x52),
    Rgb(0xFF, 0xFF, 0xFF),
    Rgb(0x9C, 0x9C, 0x9C),
    Rgb(0xFF, 0x48, 0x44),
    Rgb(0xC8, 0x51, 0x4F),
    Rgb(0xFF, 0xAD, 0xAC),
    Rgb(0x00, 0xFF, 0x00),
    Rgb(0x48, 0x40, 0xFF),
    Rgb(0x51, 0x4F, 0xB8),
    Rgb(0xAD, 0xAB, 0xFF),
    Rgb(0x00, 0xFF, 0x00),
    Rgb(0xB6, 0x57, 0xB7),
    Rgb(0x00, 0xFF, 0x00),
    Rgb(0x00, 0xFF, 0x00),
    Rgb(0x00, 0xFF, 0x00),
];
