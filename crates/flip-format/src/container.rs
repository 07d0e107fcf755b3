//! 文件头与元数据解析.
//!
//! 全部字段位于固定偏移, 解析时不依赖任何状态.
//!
//! 元数据布局 (偏移 0x10):
//! ```text
//! u16 lock, u16 thumbnail_index
//! 3 x 22 字节 UTF-16LE 作者名 (原作者 / 上一作者 / 当前作者)
//! u64 上一作者 ID, u64 当前作者 ID
//! 18 字节上一文件名, 18 字节当前文件名
//! u64 原作者 ID, u32 时间戳
//! ```

use std::fmt;

use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use flip_core::{FlipError, FlipResult, IoContext};
use log::debug;

/// PPM 魔数
pub const PPM_MAGIC: &[u8; 4] = b"PARA";

/// 元数据偏移
const METADATA_OFFSET: u64 = 0x10;
/// 作者名字段长度 (11 个 UTF-16 码元)
const AUTHOR_NAME_SIZE: usize = 22;
/// 文件名记录长度
const FILENAME_RECORD_SIZE: usize = 18;

/// 把流末尾错误转换为文件头损坏
pub(crate) fn truncated_header(err: FlipError, what: &str) -> FlipError {
    if err.is_eof() {
        FlipError::MalformedHeader(format!("{} 被截断", what))
    } else {
        err
    }
}

/// 文件头 (偏移 0x00)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerHeader {
    /// 魔数
    pub magic: [u8; 4],
    /// 动画段大小 (字节, 含动画头与偏移表)
    pub animation_data_size: u32,
    /// 音频段大小 (字节)
    pub sound_data_size: u32,
    /// 帧数 (文件中存储的是帧数 - 1)
    pub frame_count: usize,
    /// 格式版本
    pub version: u16,
}

impl ContainerHeader {
    /// 文件头长度
    pub const SIZE: usize = 16;

    /// 从流中读取文件头
    pub fn read(io: &mut IoContext) -> FlipResult<Self> {
        io.seek_to(0)?;
        let magic = io.read_tag().map_err(|e| truncated_header(e, "魔数"))?;
        if &magic != PPM_MAGIC {
            return Err(FlipError::MalformedHeader(format!(
                "魔数不匹配: {:02X?}",
                magic
            )));
        }

        let read_rest = |io: &mut IoContext| -> FlipResult<(u32, u32, u16, u16)> {
            Ok((
                io.read_u32_le()?,
                io.read_u32_le()?,
                io.read_u16_le()?,
                io.read_u16_le()?,
            ))
        };
        let (animation_data_size, sound_data_size, stored_frame_count, version) =
            read_rest(io).map_err(|e| truncated_header(e, "文件头"))?;

        let header = Self {
            magic,
            animation_data_size,
            sound_data_size,
            frame_count: usize::from(stored_frame_count) + 1,
            version,
        };
        debug!(
            "PPM 文件头: 动画段={} 字节, 音频段={} 字节, 帧数={}, 版本={}",
            header.animation_data_size, header.sound_data_size, header.frame_count, header.version,
        );
        Ok(header)
    }
}

/// 作者 ID (显示为 16 位大写十六进制)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct AuthorId(pub u64);

impl fmt::Display for AuthorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016X}", self.0)
    }
}

/// 复合文件名
///
/// 由设备 MAC 地址后 3 字节、13 字符标识串与编辑计数组成,
/// 显示为 `F78DA8_14768882B56B8_030`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileName {
    /// 设备标识片段 (MAC 地址后 3 字节)
    pub device_fragment: [u8; 3],
    /// 13 字符标识串
    pub ident: String,
    /// 编辑计数
    pub edits: u16,
}

impl FileName {
    /// 记录长度 (字节)
    pub const SIZE: usize = FILENAME_RECORD_SIZE;

    /// 从 18 字节记录解析
    pub fn parse(record: &[u8; FILENAME_RECORD_SIZE]) -> Self {
        let device_fragment = [record[0], record[1], record[2]];
        let ident = String::from_utf8_lossy(&record[3..16])
            .trim_end_matches('\0')
            .to_string();
        let edits = u16::from_le_bytes([record[16], record[17]]);
        Self {
            device_fragment,
            ident,
            edits,
        }
    }
}

impl fmt::Display for FileName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c] = self.device_fragment;
        write!(f, "{:02X}{:02X}{:02X}_{}_{:03}", a, b, c, self.ident, self.edits)
    }
}

/// 作者与文件元数据 (偏移 0x10)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Metadata {
    /// 是否锁定 (禁止他人编辑)
    pub lock: bool,
    /// 用作缩略图的帧索引
    pub thumbnail_index: u16,
    /// 原作者名
    pub root_author_name: String,
    /// 上一作者名
    pub parent_author_name: String,
    /// 当前作者名
    pub current_author_name: String,
    /// 上一作者 ID
    pub parent_author_id: AuthorId,
    /// 当前作者 ID
    pub current_author_id: AuthorId,
    /// 上一文件名
    pub parent_filename: FileName,
    /// 当前文件名
    pub current_filename: FileName,
    /// 原作者 ID
    pub root_author_id: AuthorId,
    /// 时间戳 (自 2000-01-01 00:00:00 起的秒数)
    pub timestamp: u32,
}

impl Metadata {
    /// 从流中读取元数据
    pub fn read(io: &mut IoContext) -> FlipResult<Self> {
        io.seek_to(METADATA_OFFSET)?;
        Self::read_fields(io).map_err(|e| truncated_header(e, "元数据"))
    }

    fn read_fields(io: &mut IoContext) -> FlipResult<Self> {
        let lock = io.read_u16_le()? != 0;
        let thumbnail_index = io.read_u16_le()?;
        let root_author_name = read_author_name(io)?;
        let parent_author_name = read_author_name(io)?;
        let current_author_name = read_author_name(io)?;
        let parent_author_id = AuthorId(io.read_u64_le()?);
        let current_author_id = AuthorId(io.read_u64_le()?);
        let parent_filename = FileName::parse(&io.read_array()?);
        let current_filename = FileName::parse(&io.read_array()?);
        let root_author_id = AuthorId(io.read_u64_le()?);
        let timestamp = io.read_u32_le()?;

        debug!(
            "PPM 元数据: 作者={}, 文件名={}, 缩略图帧={}",
            current_author_name, current_filename, thumbnail_index,
        );

        Ok(Self {
            lock,
            thumbnail_index,
            root_author_name,
            parent_author_name,
            current_author_name,
            parent_author_id,
            current_author_id,
            parent_filename,
            current_filename,
            root_author_id,
            timestamp,
        })
    }

    /// 创建时间
    pub fn created_at(&self) -> Option<NaiveDateTime> {
        let epoch = NaiveDate::from_ymd_opt(2000, 1, 1)?.and_hms_opt(0, 0, 0)?;
        epoch.checked_add_signed(TimeDelta::seconds(i64::from(self.timestamp)))
    }
}

/// 读取 22 字节 UTF-16LE 作者名, 去除尾部 NUL 填充
fn read_author_name(io: &mut IoContext) -> FlipResult<String> {
    let raw: [u8; AUTHOR_NAME_SIZE] = io.read_array()?;
    let (name, _had_errors) = encoding_rs::UTF_16LE.decode_without_bom_handling(&raw);
    Ok(name.trim_end_matches('\0').to_string())
}
