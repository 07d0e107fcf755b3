//! 测试辅助: 在内存中构造完整的 PPM 文件.
//!
//! 非空行按内容选择编码: 8 像素块全部非零时写原始行,
//! 过半为全 1 时写反转掩码行, 否则写掩码行.

#![allow(dead_code)]

use flip::core::{Bitplane, LayerPair, SCREEN_HEIGHT, SCREEN_WIDTH};

/// 关键帧标志
pub const KEYFRAME: u8 = 0x80;
/// 平移标志 (取值 1)
pub const TRANSLATED: u8 = 0x20;
/// 图层 1 画笔 = 反色, 图层 2 画笔 = 红
pub const PENS_INVERSE_RED: u8 = (1 << 1) | (2 << 3);

/// 单帧描述
pub struct FrameFixture {
    /// 帧头字节
    pub header: u8,
    /// 平移量, 需要与帧头平移位一致
    pub translation: Option<(i8, i8)>,
    /// 图层内容
    pub layers: LayerPair,
}

impl FrameFixture {
    /// 关键帧
    pub fn keyframe(layers: LayerPair) -> Self {
        Self {
            header: KEYFRAME | PENS_INVERSE_RED,
            translation: None,
            layers,
        }
    }

    /// 差分帧
    pub fn delta(layers: LayerPair) -> Self {
        Self {
            header: PENS_INVERSE_RED,
            translation: None,
            layers,
        }
    }

    /// 带平移的差分帧
    pub fn translated(layers: LayerPair, dx: i8, dy: i8) -> Self {
        Self {
            header: TRANSLATED | PENS_INVERSE_RED,
            translation: Some((dx, dy)),
            layers,
        }
    }

    /// 编码为帧数据
    pub fn encode(&self) -> Vec<u8> {
        let mut out = vec![self.header];
        if let Some((dx, dy)) = self.translation {
            out.push(dx as u8);
            out.push(dy as u8);
        }

        let mut line_data = Vec::new();
        for plane in &self.layers.layers {
            let mut block = [0u8; SCREEN_HEIGHT / 4];
            for y in 0..SCREEN_HEIGHT {
                let code = encode_line(plane.row(y), &mut line_data);
                block[y / 4] |= code << ((y % 4) * 2);
            }
            out.extend_from_slice(&block);
        }
        out.extend_from_slice(&line_data);
        out
    }
}

/// 编码一行, 返回行类型码
fn encode_line(row: &[u8], out: &mut Vec<u8>) -> u8 {
    let bytes: Vec<u8> = row
        .chunks_exact(8)
        .map(|group| {
            group
                .iter()
                .enumerate()
                .fold(0u8, |acc, (bit, &pixel)| acc | ((pixel & 1) << bit))
        })
        .collect();

    if bytes.iter().all(|&b| b == 0) {
        return 0;
    }
    if bytes.iter().all(|&b| b != 0) {
        out.extend_from_slice(&bytes);
        return 3;
    }

    // 反转掩码行预填 1, 只写出不是全 1 的块
    let inverted = bytes.iter().filter(|&&b| b == 0xFF).count() > bytes.len() / 2;
    let skipped = if inverted { 0xFF } else { 0x00 };

    let mut mask = 0u32;
    for (i, &b) in bytes.iter().enumerate() {
        if b != skipped {
            mask |= 0x8000_0000 >> i;
        }
    }
    out.extend_from_slice(&mask.to_be_bytes());
    out.extend(bytes.iter().copied().filter(|&b| b != skipped));
    if inverted { 2 } else { 1 }
}

/// PPM 文件构造器
pub struct PpmBuilder {
    frames: Vec<FrameFixture>,
    header_frame_count: Option<usize>,
    offset_overrides: Vec<(usize, u32)>,
    animation_flags: u32,
    thumbnail: Vec<u8>,
    author: String,
    timestamp: u32,
    frame_speed_stored: u8,
    bgm_speed_stored: u8,
}

impl Default for PpmBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl PpmBuilder {
    pub fn new() -> Self {
        Self {
            frames: Vec::new(),
            header_frame_count: None,
            offset_overrides: Vec::new(),
            animation_flags: (1 << 11) | (1 << 10),
            thumbnail: vec![0u8; 1536],
            author: "Flip".to_string(),
            timestamp: 0,
            // 速度码 8 (30 fps)
            frame_speed_stored: 0,
            bgm_speed_stored: 0,
        }
    }

    pub fn frame(mut self, frame: FrameFixture) -> Self {
        self.frames.push(frame);
        self
    }

    /// 覆盖文件头中的帧数
    pub fn header_frame_count(mut self, count: usize) -> Self {
        self.header_frame_count = Some(count);
        self
    }

    /// 覆盖偏移表中某帧的相对偏移
    pub fn frame_offset(mut self, index: usize, relative: u32) -> Self {
        self.offset_overrides.push((index, relative));
        self
    }

    pub fn animation_flags(mut self, flags: u32) -> Self {
        self.animation_flags = flags;
        self
    }

    pub fn thumbnail(mut self, data: Vec<u8>) -> Self {
        self.thumbnail = data;
        self
    }

    pub fn author(mut self, name: &str) -> Self {
        self.author = name.to_string();
        self
    }

    pub fn timestamp(mut self, seconds: u32) -> Self {
        self.timestamp = seconds;
        self
    }

    /// 按速度码设置帧率
    pub fn speed(mut self, frame_speed: u8, bgm_speed: u8) -> Self {
        self.frame_speed_stored = 8 - frame_speed;
        self.bgm_speed_stored = 8 - bgm_speed;
        self
    }

    /// 直接写入存储的速度字节
    pub fn stored_speed(mut self, frame: u8, bgm: u8) -> Self {
        self.frame_speed_stored = frame;
        self.bgm_speed_stored = bgm;
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let header_frame_count = self.header_frame_count.unwrap_or(self.frames.len());

        let mut frame_data = Vec::new();
        let mut table = Vec::new();
        for (index, frame) in self.frames.iter().enumerate() {
            let relative = self
                .offset_overrides
                .iter()
                .rev()
                .find(|(i, _)| *i == index)
                .map_or(frame_data.len() as u32, |&(_, r)| r);
            table.extend_from_slice(&relative.to_le_bytes());
            frame_data.extend_from_slice(&frame.encode());
        }
        let animation_size = 8 + table.len() + frame_data.len();

        let mut buf = Vec::new();
        buf.extend_from_slice(b"PARA");
        buf.extend_from_slice(&(animation_size as u32).to_le_bytes());
        buf.extend_from_slice(&0u32.to_le_bytes());
        buf.extend_from_slice(&((header_frame_count - 1) as u16).to_le_bytes());
        buf.extend_from_slice(&0x24u16.to_le_bytes());

        // 元数据
        buf.extend_from_slice(&0u16.to_le_bytes());
        buf.extend_from_slice(&0u16.to_le_bytes());
        for _ in 0..3 {
            buf.extend_from_slice(&utf16_name(&self.author));
        }
        buf.extend_from_slice(&0x1122_3344_5566_7788u64.to_le_bytes());
        buf.extend_from_slice(&0x0123_4567_89AB_CDEFu64.to_le_bytes());
        for edits in [1u16, 2] {
            buf.extend_from_slice(&[0xF7, 0x8D, 0xA8]);
            buf.extend_from_slice(b"14768882B56B8");
            buf.extend_from_slice(&edits.to_le_bytes());
        }
        buf.extend_from_slice(&0x0123_4567_89AB_CDEFu64.to_le_bytes());
        buf.extend_from_slice(&self.timestamp.to_le_bytes());
        buf.resize(0xA0, 0);

        buf.extend_from_slice(&self.thumbnail);
        buf.resize(0x06A0, 0);

        // 动画段
        buf.extend_from_slice(&(table.len() as u16).to_le_bytes());
        buf.extend_from_slice(&0u16.to_le_bytes());
        buf.extend_from_slice(&self.animation_flags.to_le_bytes());
        buf.extend_from_slice(&table);
        buf.extend_from_slice(&frame_data);

        // 每帧音效标志后按 4 字节对齐
        let sound_offset = (0x06A0 + animation_size + header_frame_count).next_multiple_of(4);
        buf.resize(sound_offset, 0);
        for _ in 0..4 {
            buf.extend_from_slice(&0u32.to_le_bytes());
        }
        buf.push(self.frame_speed_stored);
        buf.push(self.bgm_speed_stored);
        buf.extend_from_slice(&[0u8; 14]);
        buf
    }
}

fn utf16_name(name: &str) -> [u8; 22] {
    let mut out = [0u8; 22];
    for (i, unit) in name.encode_utf16().take(11).enumerate() {
        out[i * 2..i * 2 + 2].copy_from_slice(&unit.to_le_bytes());
    }
    out
}

/// 生成确定性的伪随机图层内容
pub fn pattern_layers(seed: u32, density: u32) -> LayerPair {
    let mut layers = LayerPair::new();
    let mut state = seed.wrapping_mul(2_654_435_761).wrapping_add(1);
    for index in 0..2 {
        let plane: &mut Bitplane = layers.layer_mut(index);
        for y in 0..SCREEN_HEIGHT {
            for x in 0..SCREEN_WIDTH {
                state ^= state << 13;
                state ^= state >> 17;
                state ^= state << 5;
                if state % 100 < density {
                    plane.set(x, y, 1);
                }
            }
        }
    }
    layers
}

/// 两个图层几乎全部置位: 每行清空一个 8 像素块并挖去一个像素
pub fn mostly_set_layers() -> LayerPair {
    let mut layers = LayerPair::new();
    for index in 0..2 {
        let plane = layers.layer_mut(index);
        for y in 0..SCREEN_HEIGHT {
            let row = plane.row_mut(y);
            row.fill(1);
            let chunk = (y + index * 7) % 32;
            row[chunk * 8..chunk * 8 + 8].fill(0);
            row[(chunk * 8 + 77 + y) % SCREEN_WIDTH] = 0;
        }
    }
    layers
}

/// 图层 1 所有像素置位
pub fn full_layer_1() -> LayerPair {
    let mut layers = LayerPair::new();
    for y in 0..SCREEN_HEIGHT {
        layers.layer_mut(0).row_mut(y).fill(1);
    }
    layers
}
