//! 音频头解析.
//!
//! 音频头位于动画段与每帧音效标志之后, 按 4 字节对齐:
//! ```text
//! u32 BGM 大小, u32 SE1 大小, u32 SE2 大小, u32 SE3 大小
//! u8  帧播放速度, u8 录制 BGM 时的帧速度
//! ```
//! 速度字段存储为 `8 - 速度码`, 速度码 1..=8 对应固定帧率表.
//! 这里只解析元数据, 不解码 ADPCM 音频.

use flip_core::{FlipError, FlipResult, IoContext};
use log::debug;

use crate::animation::ANIMATION_HEADER_OFFSET;
use crate::container::truncated_header;

/// 速度码 1..=8 对应的帧率 (帧/秒)
pub const FRAMERATES: [f64; 8] = [0.5, 1.0, 2.0, 4.0, 6.0, 12.0, 20.0, 30.0];

/// 速度码转换为帧率
pub fn framerate_for_speed(speed: u8) -> FlipResult<f64> {
    match speed {
        1..=8 => Ok(FRAMERATES[usize::from(speed - 1)]),
        _ => Err(FlipError::UnsupportedSpeedCode(i16::from(speed))),
    }
}

/// 从存储字节还原速度码并校验
fn decode_speed(stored: u8) -> FlipResult<u8> {
    let speed = 8 - i16::from(stored);
    if (1..=8).contains(&speed) {
        Ok(speed as u8)
    } else {
        Err(FlipError::UnsupportedSpeedCode(speed))
    }
}

/// 音频头
#[derive(Debug, Clone, PartialEq)]
pub struct SoundHeader {
    /// 背景音乐大小 (字节)
    pub bgm_size: u32,
    /// 音效 1 大小 (字节)
    pub se1_size: u32,
    /// 音效 2 大小 (字节)
    pub se2_size: u32,
    /// 音效 3 大小 (字节)
    pub se3_size: u32,
    /// 帧播放速度码 (1..=8)
    pub frame_speed: u8,
    /// 录制 BGM 时的帧速度码 (1..=8)
    pub bgm_speed: u8,
}

impl SoundHeader {
    /// 计算音频头偏移
    pub fn offset(animation_data_size: u32, frame_count: usize) -> u64 {
        let offset = ANIMATION_HEADER_OFFSET + u64::from(animation_data_size) + frame_count as u64;
        offset.next_multiple_of(4)
    }

    /// 读取音频头
    pub fn read(io: &mut IoContext, animation_data_size: u32, frame_count: usize) -> FlipResult<Self> {
        let offset = Self::offset(animation_data_size, frame_count);
        io.seek_to(offset)?;

        let read_fields = |io: &mut IoContext| -> FlipResult<([u32; 4], u8, u8)> {
            Ok((
                [
                    io.read_u32_le()?,
                    io.read_u32_le()?,
                    io.read_u32_le()?,
                    io.read_u32_le()?,
                ],
                io.read_u8()?,
                io.read_u8()?,
            ))
        };
        let ([bgm_size, se1_size, se2_size, se3_size], frame_stored, bgm_stored) =
            read_fields(io).map_err(|e| truncated_header(e, "音频头"))?;

        let header = Self {
            bgm_size,
            se1_size,
            se2_size,
            se3_size,
            frame_speed: decode_speed(frame_stored)?,
            bgm_speed: decode_speed(bgm_stored)?,
        };
        debug!(
            "音频头 @0x{:X}: bgm={} 字节, 速度码={}, bgm 速度码={}",
            offset, header.bgm_size, header.frame_speed, header.bgm_speed
        );
        Ok(header)
    }

    /// 播放帧率
    pub fn framerate(&self) -> f64 {
        FRAMERATES[usize::from(self.frame_speed - 1)]
    }

    /// 录制 BGM 时的帧率
    pub fn bgm_framerate(&self) -> f64 {
        FRAMERATES[usize::from(self.bgm_speed - 1)]
    }

    /// 是否含背景音乐
    pub fn has_bgm(&self) -> bool {
        self.bgm_size > 0
    }
}
