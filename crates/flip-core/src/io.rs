//! I/O 抽象层.
//!
//! 提供统一的带缓冲只读接口, 支持文件与内存缓冲区两种后端.
//! PPM 解码需要在帧偏移之间频繁跳转, 因此所有后端都必须支持 seek.

use std::io::{self, Read, Seek};
use std::path::Path;

use crate::{FlipError, FlipResult};

/// I/O 上下文
///
/// 封装底层 I/O 操作, 为容器解析与帧解码提供统一的数据读取接口.
pub struct IoContext {
    /// 内部 I/O 实现
    inner: Box<dyn IoBackend>,
    /// 读缓冲区
    buffer: Vec<u8>,
    /// 缓冲区中的有效数据长度
    buf_len: usize,
    /// 缓冲区当前读取位置
    buf_pos: usize,
}

/// I/O 后端 trait
///
/// 实现此 trait 以支持不同的数据来源 (文件、内存等).
pub trait IoBackend: Send {
    /// 读取数据到缓冲区
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize>;
    /// 定位 (seek)
    fn seek(&mut self, pos: io::SeekFrom) -> io::Result<u64>;
    /// 获取当前位置
    fn position(&mut self) -> io::Result<u64>;
}

/// 默认缓冲区大小 (8 KB, 大于绝大多数单帧数据)
const DEFAULT_BUFFER_SIZE: usize = 8 * 1024;

impl IoContext {
    /// 从 I/O 后端创建上下文
    pub fn new(backend: Box<dyn IoBackend>) -> Self {
        Self {
            inner: backend,
            buffer: vec![0u8; DEFAULT_BUFFER_SIZE],
            buf_len: 0,
            buf_pos: 0,
        }
    }

    /// 从文件路径打开 (只读)
    pub fn open_read(path: impl AsRef<Path>) -> FlipResult<Self> {
        let file = std::fs::File::open(path)?;
        Ok(Self::new(Box::new(FileBackend::new(file))))
    }

    /// 从内存数据创建
    pub fn from_memory(data: Vec<u8>) -> Self {
        Self::new(Box::new(MemoryBackend::from_data(data)))
    }

    // ========================
    // 读取方法
    // ========================

    /// 读取指定字节数
    pub fn read_exact(&mut self, buf: &mut [u8]) -> FlipResult<()> {
        let mut total_read = 0;
        while total_read < buf.len() {
            let buffered = self.buf_len - self.buf_pos;
            if buffered > 0 {
                let to_copy = buffered.min(buf.len() - total_read);
                buf[total_read..total_read + to_copy]
                    .copy_from_slice(&self.buffer[self.buf_pos..self.buf_pos + to_copy]);
                self.buf_pos += to_copy;
                total_read += to_copy;
            } else {
                self.buf_pos = 0;
                self.buf_len = self.inner.read(&mut self.buffer)?;
                if self.buf_len == 0 {
                    return Err(FlipError::Eof);
                }
            }
        }
        Ok(())
    }

    /// 读取 1 个字节
    pub fn read_u8(&mut self) -> FlipResult<u8> {
        if self.buf_pos < self.buf_len {
            let v = self.buffer[self.buf_pos];
            self.buf_pos += 1;
            return Ok(v);
        }
        let mut buf = [0u8; 1];
        self.read_exact(&mut buf)?;
        Ok(buf[0])
    }

    /// 读取 1 个有符号字节
    pub fn read_i8(&mut self) -> FlipResult<i8> {
        Ok(self.read_u8()? as i8)
    }

    /// 读取 u16 小端
    pub fn read_u16_le(&mut self) -> FlipResult<u16> {
        Ok(u16::from_le_bytes(self.read_array()?))
    }

    /// 读取 u32 小端
    pub fn read_u32_le(&mut self) -> FlipResult<u32> {
        Ok(u32::from_le_bytes(self.read_array()?))
    }

    /// 读取 u64 小端
    pub fn read_u64_le(&mut self) -> FlipResult<u64> {
        Ok(u64::from_le_bytes(self.read_array()?))
    }

    /// 读取 u32 大端
    pub fn read_u32_be(&mut self) -> FlipResult<u32> {
        Ok(u32::from_be_bytes(self.read_array()?))
    }

    /// 读取 4 字节标签 (魔数)
    pub fn read_tag(&mut self) -> FlipResult<[u8; 4]> {
        self.read_array()
    }

    /// 读取定长字节数组
    pub fn read_array<const N: usize>(&mut self) -> FlipResult<[u8; N]> {
        let mut buf = [0u8; N];
        self.read_exact(&mut buf)?;
        Ok(buf)
    }

    /// 跳过指定字节数
    pub fn skip(&mut self, count: usize) -> FlipResult<()> {
        // 先尝试消耗缓冲区中的数据
        let buffered = self.buf_len - self.buf_pos;
        if count <= buffered {
            self.buf_pos += count;
            return Ok(());
        }

        let remaining = count - buffered;
        self.buf_pos = 0;
        self.buf_len = 0;
        self.inner.seek(io::SeekFrom::Current(remaining as i64))?;
        Ok(())
    }

    // ========================
    // 定位方法
    // ========================

    /// 定位 (seek)
    ///
    /// 注意: seek 会清空读缓冲区.
    pub fn seek(&mut self, pos: io::SeekFrom) -> FlipResult<u64> {
        self.buf_pos = 0;
        self.buf_len = 0;
        Ok(self.inner.seek(pos)?)
    }

    /// 定位到绝对偏移
    pub fn seek_to(&mut self, offset: u64) -> FlipResult<()> {
        self.seek(io::SeekFrom::Start(offset))?;
        Ok(())
    }

    /// 获取当前位置
    ///
    /// 考虑读缓冲区中尚未消耗的数据量.
    pub fn position(&mut self) -> FlipResult<u64> {
        let raw_pos = self.inner.position()?;
        let buffered = (self.buf_len - self.buf_pos) as u64;
        Ok(raw_pos - buffered)
    }
}

/// 文件 I/O 后端
struct FileBackend {
    file: std::fs::File,
}

impl FileBackend {
    fn new(file: std::fs::File) -> Self {
        Self { file }
    }
}

impl IoBackend for FileBackend {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.file.read(buf)
    }

    fn seek(&mut self, pos: io::SeekFrom) -> io::Result<u64> {
        self.file.seek(pos)
    }

    fn position(&mut self) -> io::Result<u64> {
        self.file.stream_position()
    }
}

/// 内存 I/O 后端
///
/// 主要用于测试和已整体载入内存的文件.
pub struct MemoryBackend {
    data: Vec<u8>,
    pos: usize,
}

impl MemoryBackend {
    /// 从已有数据创建
    pub fn from_data(data: Vec<u8>) -> Self {
        Self { data, pos: 0 }
    }
}

impl IoBackend for MemoryBackend {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let available = self.data.len().saturating_sub(self.pos);
        let to_read = buf.len().min(available);
        if to_read == 0 {
            return Ok(0);
        }
        buf[..to_read].copy_from_slice(&self.data[self.pos..self.pos + to_read]);
        self.pos += to_read;
        Ok(to_read)
    }

    fn seek(&mut self, pos: io::SeekFrom) -> io::Result<u64> {
        let new_pos = match pos {
            io::SeekFrom::Start(offset) => offset as i64,
            io::SeekFrom::End(offset) => self.data.len() as i64 + offset,
            io::SeekFrom::Current(offset) => self.pos as i64 + offset,
        };
        if new_pos < 0 {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "seek 位置不能为负",
            ));
        }
        self.pos = new_pos as usize;
        Ok(self.pos as u64)
    }

    fn position(&mut self) -> io::Result<u64> {
        Ok(self.pos as u64)
    }
}
