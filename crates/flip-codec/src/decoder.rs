//! 帧差分引擎.
//!
//! PPM 中的非关键帧只保存与前一帧的差异 (可带平移), 因此解码任意帧前
//! 必须保证 "上一帧" 缓冲区中是其前驱帧的完整结果.
//!
//! 解码流程 (`resolve(index)`):
//! 1. 若上次解码的不是 `index - 1` 且本帧不是关键帧, 先回溯解码前驱帧
//! 2. 当前缓冲区成为上一帧快照, 新的当前缓冲区清零
//! 3. 读取帧头 (含可选平移量) 与两个行类型块
//! 4. 解码原始位平面
//! 5. 非关键帧: 与平移后的上一帧逐像素异或
//!
//! 回溯采用 "先向前找起点, 再顺序重放" 的迭代方式, 避免长链递归.

use std::sync::Arc;

use flip_core::raster::{Bitplane, LayerPair, SCREEN_HEIGHT, SCREEN_WIDTH};
use flip_core::{CompositeBuffer, FlipError, FlipResult, IoContext};
use log::{debug, trace};

use crate::frame_header::FrameHeader;
use crate::palette::FramePalette;
use crate::scanline;

/// 帧解码器
///
/// 独占一对当前/上一帧光栅缓冲区. 同一文档的不同帧若需并发解码,
/// 应为每个线程创建独立的解码器, 只共享帧偏移表.
pub struct FrameDecoder {
    /// 每帧数据的绝对偏移
    offsets: Arc<[u64]>,
    /// 当前帧光栅
    current: LayerPair,
    /// 上一帧光栅快照
    previous: LayerPair,
    /// 最近一次完整解码的帧索引
    last_index: Option<usize>,
}

impl FrameDecoder {
    /// 使用帧偏移表创建解码器
    pub fn new(offsets: Arc<[u64]>) -> Self {
        Self {
            offsets,
            current: LayerPair::new(),
            previous: LayerPair::new(),
            last_index: None,
        }
    }

    /// 帧数
    pub fn frame_count(&self) -> usize {
        self.offsets.len()
    }

    /// 帧偏移表
    pub fn offsets(&self) -> &Arc<[u64]> {
        &self.offsets
    }

    /// 最近一次完整解码的帧索引
    pub fn last_index(&self) -> Option<usize> {
        self.last_index
    }

    /// 当前光栅 (最近一次 `resolve` 的结果)
    pub fn current(&self) -> &LayerPair {
        &self.current
    }

    /// 丢弃全部解码状态
    pub fn reset(&mut self) {
        self.current.clear();
        self.previous.clear();
        self.last_index = None;
    }

    /// 获取帧的绝对偏移
    fn offset_of(&self, index: usize) -> FlipResult<u64> {
        self.offsets
            .get(index)
            .copied()
            .ok_or(FlipError::FrameIndexOutOfRange {
                index,
                count: self.offsets.len(),
            })
    }

    /// 只读取帧头字节, 不影响解码状态
    pub fn peek_header(&self, io: &mut IoContext, index: usize) -> FlipResult<FrameHeader> {
        let offset = self.offset_of(index)?;
        io.seek_to(offset)?;
        let byte = io.read_u8().map_err(|e| truncated(e, index))?;
        Ok(FrameHeader::from_byte(byte))
    }

    /// 帧是否为关键帧
    pub fn is_keyframe(&self, io: &mut IoContext, index: usize) -> FlipResult<bool> {
        Ok(self.peek_header(io, index)?.is_keyframe())
    }

    /// 帧调色板 (只读取帧头)
    pub fn palette_for(&self, io: &mut IoContext, index: usize) -> FlipResult<FramePalette> {
        Ok(FramePalette::from_header(&self.peek_header(io, index)?))
    }

    /// 解码并合成为索引像素缓冲区
    pub fn composite(&mut self, io: &mut IoContext, index: usize) -> FlipResult<CompositeBuffer> {
        Ok(self.resolve(io, index)?.composite())
    }

    /// 解码任意帧, 返回完整的双图层光栅
    ///
    /// 返回的引用在下一次调用前有效.
    pub fn resolve(&mut self, io: &mut IoContext, index: usize) -> FlipResult<&LayerPair> {
        self.offset_of(index)?;

        let start = self.replay_start(io, index)?;
        if start != index {
            trace!("帧 {} 需要从帧 {} 开始重放", index, start);
        }
        if start == 0 {
            // 重放链从第 0 帧开始时不继承任何旧状态
            self.current.clear();
        }

        for i in start..=index {
            if let Err(e) = self.decode_frame(io, i) {
                self.last_index = None;
                return Err(e);
            }
        }
        Ok(&self.current)
    }

    /// 查找重放起点
    ///
    /// 从 `index` 向前回溯, 直到遇到第 0 帧、关键帧或上次解码帧的后继.
    fn replay_start(&self, io: &mut IoContext, index: usize) -> FlipResult<usize> {
        let mut start = index;
        while start > 0
            && self.last_index != Some(start - 1)
            && !self.is_keyframe(io, start)?
        {
            start -= 1;
        }
        Ok(start)
    }

    /// 解码单帧, 前提是当前缓冲区中已是前驱帧
    fn decode_frame(&mut self, io: &mut IoContext, index: usize) -> FlipResult<()> {
        // 快照: 当前缓冲区成为上一帧, 旧的上一帧缓冲区复用为新的当前帧
        std::mem::swap(&mut self.current, &mut self.previous);
        self.current.clear();

        io.seek_to(self.offset_of(index)?)?;
        let header = FrameHeader::read(io).map_err(|e| truncated(e, index))?;
        let blocks = scanline::read_line_type_blocks(io).map_err(|e| truncated(e, index))?;
        scanline::decode_layers(io, &blocks, &mut self.current).map_err(|e| truncated(e, index))?;

        if !header.is_keyframe() {
            apply_delta(&mut self.current, &self.previous, header.dx, header.dy);
        }

        debug!(
            "解码帧 {}: keyframe={}, dx={}, dy={}",
            index,
            header.is_keyframe(),
            header.dx,
            header.dy
        );
        self.last_index = Some(index);
        Ok(())
    }
}

/// 把流末尾错误转换为帧截断错误
fn truncated(err: FlipError, index: usize) -> FlipError {
    if err.is_eof() {
        FlipError::TruncatedFrameData(index)
    } else {
        err
    }
}

/// 带平移的帧差分
///
/// 对每个像素 `(x, y)`, 若 `(x - dx, y - dy)` 在画面内, 则与上一帧该位置异或;
/// 源坐标越界的像素保持原始解码值.
pub fn apply_delta(current: &mut LayerPair, previous: &LayerPair, dx: i8, dy: i8) {
    for (cur, prev) in current.layers.iter_mut().zip(previous.layers.iter()) {
        xor_shifted(cur, prev, i32::from(dx), i32::from(dy));
    }
}

fn xor_shifted(current: &mut Bitplane, previous: &Bitplane, dx: i32, dy: i32) {
    let width = SCREEN_WIDTH as i32;
    let height = SCREEN_HEIGHT as i32;

    // 目标列范围: 0 <= x - dx < width
    let x_start = dx.max(0);
    let x_end = (width + dx).min(width);
    if x_start >= x_end {
        return;
    }
    let (x_start, x_end) = (x_start as usize, x_end as usize);
    let src_start = (x_start as i32 - dx) as usize;
    let span = x_end - x_start;

    for y in 0..height {
        let src_y = y - dy;
        if !(0..height).contains(&src_y) {
            continue;
        }
        let src = &previous.row(src_y as usize)[src_start..src_start + span];
        let dst = &mut current.row_mut(y as usize)[x_start..x_end];
        for (d, &s) in dst.iter_mut().zip(src) {
            *d ^= s;
        }
    }
}
