//! 扫描线码流解码.
//!
//! 每个图层有一个 48 字节的行类型块, 共 192 个 2 位行类型码,
//! 每字节 4 个, 低位在前. 行数据按行号顺序紧随两个行类型块之后,
//! 图层 1 的全部行先于图层 2.
//!
//! 行类型:
//! - 0: 空行, 不占用数据, 保持全 0
//! - 1: 掩码压缩行, 4 字节大端块掩码 + 被掩码选中的字节
//! - 2: 同 1, 但行预先填满 1
//! - 3: 原始行, 32 字节覆盖整行
//!
//! 像素字节按 LSB 在前展开, 每字节覆盖 8 个像素.

use flip_core::raster::{Bitplane, LayerPair, SCREEN_HEIGHT, SCREEN_WIDTH};
use flip_core::{FlipResult, IoContext};
use log::trace;

/// 单个图层的行类型块长度 (字节)
pub const LINE_TYPE_BLOCK_SIZE: usize = SCREEN_HEIGHT / 4;

/// 原始行的字节数
const RAW_LINE_SIZE: usize = SCREEN_WIDTH / 8;

/// 行类型块
pub type LineTypeBlock = [u8; LINE_TYPE_BLOCK_SIZE];

/// 行编码类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineType {
    /// 空行
    Blank,
    /// 掩码压缩, 默认像素 0
    Masked,
    /// 掩码压缩, 默认像素 1
    MaskedInverted,
    /// 原始整行
    Raw,
}

impl LineType {
    /// 从 2 位类型码转换
    pub fn from_code(code: u8) -> Self {
        match code & 0x03 {
            0 => Self::Blank,
            1 => Self::Masked,
            2 => Self::MaskedInverted,
            _ => Self::Raw,
        }
    }

    /// 转换为 2 位类型码
    pub fn code(self) -> u8 {
        match self {
            Self::Blank => 0,
            Self::Masked => 1,
            Self::MaskedInverted => 2,
            Self::Raw => 3,
        }
    }
}

/// 读取某行的行类型
pub fn line_type_at(block: &LineTypeBlock, line: usize) -> LineType {
    LineType::from_code(block[line / 4] >> ((line % 4) * 2))
}

/// 遍历行类型块中的 192 个行类型
pub fn line_types(block: &LineTypeBlock) -> impl Iterator<Item = (usize, LineType)> + '_ {
    (0..SCREEN_HEIGHT).map(move |line| (line, line_type_at(block, line)))
}

/// 读取两个图层的行类型块
pub fn read_line_type_blocks(io: &mut IoContext) -> FlipResult<[LineTypeBlock; 2]> {
    let layer_1: LineTypeBlock = io.read_array()?;
    let layer_2: LineTypeBlock = io.read_array()?;
    Ok([layer_1, layer_2])
}

/// 解码两个图层的原始位平面
///
/// 流必须位于行类型块之后. 目标图层会被完整覆盖,
/// 调用前无需清零.
pub fn decode_layers(
    io: &mut IoContext,
    blocks: &[LineTypeBlock; 2],
    out: &mut LayerPair,
) -> FlipResult<()> {
    for (block, plane) in blocks.iter().zip(out.layers.iter_mut()) {
        decode_layer(io, block, plane)?;
    }
    Ok(())
}

/// 解码单个图层
pub fn decode_layer(
    io: &mut IoContext,
    block: &LineTypeBlock,
    plane: &mut Bitplane,
) -> FlipResult<()> {
    for (line, line_type) in line_types(block) {
        decode_line(io, line_type, plane.row_mut(line))?;
    }
    Ok(())
}

/// 解码一行
///
/// `row` 长度必须为 256.
pub fn decode_line(io: &mut IoContext, line_type: LineType, row: &mut [u8]) -> FlipResult<()> {
    match line_type {
        LineType::Blank => row.fill(0),
        LineType::Masked | LineType::MaskedInverted => {
            let default = u8::from(line_type == LineType::MaskedInverted);
            row.fill(default);

            let mut chunk_usage = io.read_u32_be()?;
            trace!("掩码行: chunk_usage=0x{:08X}", chunk_usage);
            for group in row.chunks_exact_mut(8) {
                if chunk_usage & 0x8000_0000 != 0 {
                    unpack_byte(io.read_u8()?, group);
                }
                chunk_usage <<= 1;
            }
        }
        LineType::Raw => {
            let bytes: [u8; RAW_LINE_SIZE] = io.read_array()?;
            for (&byte, group) in bytes.iter().zip(row.chunks_exact_mut(8)) {
                unpack_byte(byte, group);
            }
        }
    }
    Ok(())
}

/// 按 LSB 在前展开 8 个像素
#[inline]
fn unpack_byte(byte: u8, group: &mut [u8]) {
    for (bit, pixel) in group.iter_mut().enumerate() {
        *pixel = (byte >> bit) & 1;
    }
}
