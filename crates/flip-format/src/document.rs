//! PPM 文档句柄.
//!
//! 打开时一次性解析文件头、元数据、帧偏移表与音频头 (不可变, 可跨实例共享),
//! 帧与缩略图在首次访问时才解码.
//!
//! 使用流程:
//! 1. 调用 `PpmDocument::open()` 打开文档
//! 2. 读取 `frame_count()` / `framerate()` 等播放参数
//! 3. 对任意帧调用 `composite()` 与 `palette_for()` 得到索引像素与调色板

use std::path::Path;
use std::sync::Arc;

use flip_codec::{FrameDecoder, FramePalette, Thumbnail};
use flip_core::{CompositeBuffer, FlipResult, IoContext, LayerPair};
use log::info;

use crate::animation::AnimationHeader;
use crate::container::{ContainerHeader, Metadata};
use crate::sound::SoundHeader;

/// 打开选项
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpenOptions {
    /// 偏移表长度与帧数不一致时是否报错
    ///
    /// 关闭后按较小值继续解码, 并记录警告.
    pub strict_frame_table: bool,
}

impl Default for OpenOptions {
    fn default() -> Self {
        Self {
            strict_frame_table: true,
        }
    }
}

/// 打开时解析出的全部不可变信息
#[derive(Debug, Clone)]
pub struct PpmInfo {
    /// 文件头
    pub header: ContainerHeader,
    /// 元数据
    pub metadata: Metadata,
    /// 动画头与帧偏移表
    pub animation: AnimationHeader,
    /// 音频头
    pub sound: SoundHeader,
}

impl PpmInfo {
    /// 从流中解析全部固定布局信息
    pub fn read(io: &mut IoContext, options: OpenOptions) -> FlipResult<Self> {
        let header = ContainerHeader::read(io)?;
        let metadata = Metadata::read(io)?;
        let animation = AnimationHeader::read(io, header.frame_count, options.strict_frame_table)?;
        let sound = SoundHeader::read(io, header.animation_data_size, header.frame_count)?;
        Ok(Self {
            header,
            metadata,
            animation,
            sound,
        })
    }
}

/// PPM 文档
///
/// 每个实例独占一个流与一个帧解码器, 不能被多个线程同时调用.
/// 需要并发解码时, 用 [`PpmDocument::fork`] 为每个线程创建独立实例.
pub struct PpmDocument {
    /// 数据流
    io: IoContext,
    /// 共享的不可变信息
    info: Arc<PpmInfo>,
    /// 帧解码器
    decoder: FrameDecoder,
}

impl PpmDocument {
    /// 以默认选项打开
    pub fn open(io: IoContext) -> FlipResult<Self> {
        Self::open_with(io, OpenOptions::default())
    }

    /// 从文件路径打开
    pub fn open_path(path: impl AsRef<Path>) -> FlipResult<Self> {
        Self::open(IoContext::open_read(path)?)
    }

    /// 以指定选项打开
    pub fn open_with(mut io: IoContext, options: OpenOptions) -> FlipResult<Self> {
        let info = PpmInfo::read(&mut io, options)?;
        info!(
            "打开 PPM: {} 帧, {} fps, 作者={}",
            info.animation.frame_count(),
            info.sound.framerate(),
            info.metadata.current_author_name,
        );
        Ok(Self::from_info(Arc::new(info), io))
    }

    /// 使用已解析的信息和新的数据流创建独立实例
    pub fn from_info(info: Arc<PpmInfo>, io: IoContext) -> Self {
        let decoder = FrameDecoder::new(Arc::clone(&info.animation.offsets));
        Self { io, info, decoder }
    }

    /// 创建共享解析结果、拥有独立解码状态的新实例
    ///
    /// `io` 必须指向同一文件的数据.
    pub fn fork(&self, io: IoContext) -> Self {
        Self::from_info(Arc::clone(&self.info), io)
    }

    /// 共享的不可变信息
    pub fn info(&self) -> &Arc<PpmInfo> {
        &self.info
    }

    pub fn header(&self) -> &ContainerHeader {
        &self.info.header
    }

    pub fn metadata(&self) -> &Metadata {
        &self.info.metadata
    }

    pub fn animation(&self) -> &AnimationHeader {
        &self.info.animation
    }

    pub fn sound(&self) -> &SoundHeader {
        &self.info.sound
    }

    /// 帧数
    pub fn frame_count(&self) -> usize {
        self.info.animation.frame_count()
    }

    /// 播放帧率
    pub fn framerate(&self) -> f64 {
        self.info.sound.framerate()
    }

    /// 录制 BGM 时的帧率
    pub fn bgm_framerate(&self) -> f64 {
        self.info.sound.bgm_framerate()
    }

    /// 是否循环播放
    pub fn is_looping(&self) -> bool {
        self.info.animation.is_looping()
    }

    /// 图层 1 是否可见
    pub fn layer_1_visible(&self) -> bool {
        self.info.animation.layer_1_visible()
    }

    /// 图层 2 是否可见
    pub fn layer_2_visible(&self) -> bool {
        self.info.animation.layer_2_visible()
    }

    /// 解码任意帧的双图层光栅
    ///
    /// 返回的引用在下一次解码前有效.
    pub fn resolve(&mut self, index: usize) -> FlipResult<&LayerPair> {
        self.decoder.resolve(&mut self.io, index)
    }

    /// 解码并合成为索引像素 (0 纸面, 1 图层 1, 2 图层 2)
    pub fn composite(&mut self, index: usize) -> FlipResult<CompositeBuffer> {
        self.decoder.composite(&mut self.io, index)
    }

    /// 帧调色板, 不影响解码状态
    pub fn palette_for(&mut self, index: usize) -> FlipResult<FramePalette> {
        self.decoder.palette_for(&mut self.io, index)
    }

    /// 帧是否为关键帧
    pub fn is_keyframe(&mut self, index: usize) -> FlipResult<bool> {
        self.decoder.is_keyframe(&mut self.io, index)
    }

    /// 解码缩略图
    pub fn thumbnail(&mut self) -> FlipResult<Thumbnail> {
        Thumbnail::read(&mut self.io)
    }
}
