//! 动画头与帧偏移表.
//!
//! 动画头位于 0x06A0:
//! ```text
//! u16 偏移表大小 (字节)
//! u16 未使用
//! u32 标志
//! u32 x (偏移表大小 / 4) 帧相对偏移
//! ```
//! 相对偏移以偏移表结尾为基准, 绝对偏移 = 相对偏移 + 0x06A0 + 8 + 偏移表大小.

use std::sync::Arc;

use bitflags::bitflags;
use flip_core::{FlipError, FlipResult, IoContext};
use log::{debug, warn};

use crate::container::truncated_header;

/// 动画头偏移
pub const ANIMATION_HEADER_OFFSET: u64 = 0x06A0;
/// 动画头固定部分长度
const ANIMATION_HEADER_SIZE: u64 = 8;

bitflags! {
    /// 动画标志位
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct AnimationFlags: u32 {
        /// 循环播放
        const LOOP            = 1 << 1;
        /// 图层 2 可见
        const LAYER_2_VISIBLE = 1 << 10;
        /// 图层 1 可见
        const LAYER_1_VISIBLE = 1 << 11;
    }
}

/// 动画头
#[derive(Debug, Clone)]
pub struct AnimationHeader {
    /// 偏移表大小 (字节)
    pub table_size: u16,
    /// 标志位 (保留未知位)
    pub flags: AnimationFlags,
    /// 每帧的绝对偏移
    pub offsets: Arc<[u64]>,
}

impl AnimationHeader {
    /// 读取动画头与偏移表
    ///
    /// `strict` 为 false 时, 偏移表长度与帧数不一致只记录警告,
    /// 按两者较小值截取.
    pub fn read(io: &mut IoContext, frame_count: usize, strict: bool) -> FlipResult<Self> {
        io.seek_to(ANIMATION_HEADER_OFFSET)?;
        let table_size = io
            .read_u16_le()
            .map_err(|e| truncated_header(e, "动画头"))?;
        let _unused = io
            .read_u16_le()
            .map_err(|e| truncated_header(e, "动画头"))?;
        let flags = AnimationFlags::from_bits_retain(
            io.read_u32_le()
                .map_err(|e| truncated_header(e, "动画头"))?,
        );

        if table_size % 4 != 0 {
            return Err(FlipError::MalformedAnimationTable(format!(
                "偏移表大小 {} 不是 4 的倍数",
                table_size
            )));
        }

        let table_len = usize::from(table_size) / 4;
        let count = if table_len == frame_count {
            frame_count
        } else if strict {
            return Err(FlipError::MalformedAnimationTable(format!(
                "偏移表包含 {} 项, 但帧数为 {}",
                table_len, frame_count
            )));
        } else {
            warn!(
                "偏移表包含 {} 项, 但帧数为 {}, 按 {} 帧处理",
                table_len,
                frame_count,
                table_len.min(frame_count)
            );
            table_len.min(frame_count)
        };

        let base = ANIMATION_HEADER_OFFSET + ANIMATION_HEADER_SIZE + u64::from(table_size);
        let mut offsets = Vec::with_capacity(count);
        for index in 0..count {
            let relative = io.read_u32_le().map_err(|e| {
                if e.is_eof() {
                    FlipError::MalformedAnimationTable(format!("偏移表在第 {} 项被截断", index))
                } else {
                    e
                }
            })?;
            offsets.push(base + u64::from(relative));
        }

        debug!(
            "动画头: 偏移表={} 字节, 帧数={}, flags={:?}",
            table_size, count, flags
        );

        Ok(Self {
            table_size,
            flags,
            offsets: Arc::from(offsets),
        })
    }

    /// 帧数 (偏移表长度)
    pub fn frame_count(&self) -> usize {
        self.offsets.len()
    }

    /// 帧数据起始偏移
    pub fn frame_data_offset(&self) -> u64 {
        ANIMATION_HEADER_OFFSET + ANIMATION_HEADER_SIZE + u64::from(self.table_size)
    }

    /// 图层 1 是否可见
    pub fn layer_1_visible(&self) -> bool {
        self.flags.contains(AnimationFlags::LAYER_1_VISIBLE)
    }

    /// 图层 2 是否可见
    pub fn layer_2_visible(&self) -> bool {
        self.flags.contains(AnimationFlags::LAYER_2_VISIBLE)
    }

    /// 是否循环播放
    pub fn is_looping(&self) -> bool {
        self.flags.contains(AnimationFlags::LOOP)
    }
}
