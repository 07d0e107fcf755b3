//! 缩略图解码.
//!
//! 缩略图位于文件偏移 0xA0, 尺寸 64x48, 每像素 4 位.
//! 数据按 8x8 分块存储, 块按行优先排列 (每行 8 块, 共 6 行),
//! 块内每行 4 字节, 每字节 2 个像素, 低半字节在前.

use flip_core::color::THUMBNAIL_PALETTE;
use flip_core::{FlipError, FlipResult, IoContext, Rgb};

/// 缩略图在文件中的偏移
pub const THUMBNAIL_OFFSET: u64 = 0xA0;
/// 缩略图宽度
pub const THUMBNAIL_WIDTH: usize = 64;
/// 缩略图高度
pub const THUMBNAIL_HEIGHT: usize = 48;
/// 缩略图数据长度 (字节)
pub const THUMBNAIL_SIZE: usize = THUMBNAIL_WIDTH * THUMBNAIL_HEIGHT / 2;

const TILE_SIZE: usize = 8;
const TILES_PER_ROW: usize = THUMBNAIL_WIDTH / TILE_SIZE;

/// 解码后的缩略图 (调色板索引)
#[derive(Clone, PartialEq, Eq)]
pub struct Thumbnail {
    /// 行优先的 4 位调色板索引
    indices: Vec<u8>,
}

impl Thumbnail {
    /// 从文件中读取并解码缩略图
    pub fn read(io: &mut IoContext) -> FlipResult<Self> {
        io.seek_to(THUMBNAIL_OFFSET)?;
        let mut data = [0u8; THUMBNAIL_SIZE];
        io.read_exact(&mut data).map_err(|e| {
            if e.is_eof() {
                FlipError::TruncatedThumbnail
            } else {
                e
            }
        })?;
        Self::decode(&data)
    }

    /// 从 1536 字节的分块数据解码
    pub fn decode(data: &[u8]) -> FlipResult<Self> {
        if data.len() < THUMBNAIL_SIZE {
            return Err(FlipError::TruncatedThumbnail);
        }

        let mut indices = vec![0u8; THUMBNAIL_WIDTH * THUMBNAIL_HEIGHT];
        // 每块 32 字节
        for (tile_index, tile) in data[..THUMBNAIL_SIZE]
            .chunks_exact(TILE_SIZE * TILE_SIZE / 2)
            .enumerate()
        {
            let tile_x = tile_index % TILES_PER_ROW * TILE_SIZE;
            let tile_y = tile_index / TILES_PER_ROW * TILE_SIZE;
            for (line, bytes) in tile.chunks_exact(TILE_SIZE / 2).enumerate() {
                let row_start = (tile_y + line) * THUMBNAIL_WIDTH + tile_x;
                for (i, &byte) in bytes.iter().enumerate() {
                    indices[row_start + i * 2] = byte & 0x0F;
                    indices[row_start + i * 2 + 1] = byte >> 4;
                }
            }
        }
        Ok(Self { indices })
    }

    /// 读取像素索引
    pub fn get(&self, x: usize, y: usize) -> u8 {
        self.indices[y * THUMBNAIL_WIDTH + x]
    }

    /// 全部像素索引 (行优先)
    pub fn indices(&self) -> &[u8] {
        &self.indices
    }

    /// 通过固定 16 色调色板转换为 RGB
    pub fn to_rgb(&self) -> Vec<Rgb> {
        self.indices
            .iter()
            .map(|&i| THUMBNAIL_PALETTE[usize::from(i)])
            .collect()
    }
}

impl std::fmt::Debug for Thumbnail {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Thumbnail({}x{})", THUMBNAIL_WIDTH, THUMBNAIL_HEIGHT)
    }
}
