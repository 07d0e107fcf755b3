//! 位平面与合成像素缓冲区.
//!
//! PPM 画面固定为 256x192, 由两个 1 位图层叠加而成.
//! 为方便逐像素异或与平移, 每个像素占用 1 字节, 取值 0 或 1.

/// 画面宽度 (像素)
pub const SCREEN_WIDTH: usize = 256;
/// 画面高度 (像素)
pub const SCREEN_HEIGHT: usize = 192;
/// 单个画面的像素总数
pub const SCREEN_PIXELS: usize = SCREEN_WIDTH * SCREEN_HEIGHT;

/// 单个 1 位图层 (192 行 x 256 列)
#[derive(Clone, PartialEq, Eq)]
pub struct Bitplane {
    /// 按行存储的像素值 (0 或 1)
    data: Vec<u8>,
}

impl Bitplane {
    /// 创建全 0 图层
    pub fn new() -> Self {
        Self {
            data: vec![0; SCREEN_PIXELS],
        }
    }

    /// 读取像素
    ///
    /// 坐标越界时 panic, 调用方负责裁剪.
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> u8 {
        self.data[y * SCREEN_WIDTH + x]
    }

    /// 写入像素 (非 0 值按 1 处理)
    #[inline]
    pub fn set(&mut self, x: usize, y: usize, value: u8) {
        self.data[y * SCREEN_WIDTH + x] = u8::from(value != 0);
    }

    /// 获取一行像素
    pub fn row(&self, y: usize) -> &[u8] {
        &self.data[y * SCREEN_WIDTH..(y + 1) * SCREEN_WIDTH]
    }

    /// 获取一行像素 (可写)
    pub fn row_mut(&mut self, y: usize) -> &mut [u8] {
        &mut self.data[y * SCREEN_WIDTH..(y + 1) * SCREEN_WIDTH]
    }

    /// 全部清零
    pub fn clear(&mut self) {
        self.data.fill(0);
    }

    /// 全部像素数据 (行优先)
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    /// 置位像素数量
    pub fn count_set(&self) -> usize {
        self.data.iter().filter(|&&p| p != 0).count()
    }
}

impl Default for Bitplane {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Bitplane {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Bitplane({}x{}, {} set)",
            SCREEN_WIDTH,
            SCREEN_HEIGHT,
            self.count_set()
        )
    }
}

/// 双图层光栅状态
///
/// 图层 1 (索引 0) 在合成时优先于图层 2 (索引 1).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LayerPair {
    /// 两个图层
    pub layers: [Bitplane; 2],
}

impl LayerPair {
    /// 创建全空的双图层
    pub fn new() -> Self {
        Self::default()
    }

    /// 获取图层 (0 = 图层 1, 1 = 图层 2)
    pub fn layer(&self, index: usize) -> &Bitplane {
        &self.layers[index]
    }

    /// 获取可写图层
    pub fn layer_mut(&mut self, index: usize) -> &mut Bitplane {
        &mut self.layers[index]
    }

    /// 清空两个图层
    pub fn clear(&mut self) {
        for layer in &mut self.layers {
            layer.clear();
        }
    }

    /// 合成为索引像素缓冲区
    ///
    /// 图层 1 置位输出 1, 否则图层 2 置位输出 2, 否则输出 0 (纸面).
    pub fn composite(&self) -> CompositeBuffer {
        let [layer_1, layer_2] = &self.layers;
        let data = layer_1
            .as_slice()
            .iter()
            .zip(layer_2.as_slice())
            .map(|(&a, &b)| {
                if a != 0 {
                    1
                } else if b != 0 {
                    2
                } else {
                    0
                }
            })
            .collect();
        CompositeBuffer { data }
    }
}

/// 合成后的索引像素缓冲区 (192x256, 取值 0/1/2)
#[derive(Clone, PartialEq, Eq)]
pub struct CompositeBuffer {
    data: Vec<u8>,
}

impl CompositeBuffer {
    /// 纸面
    pub const PAPER: u8 = 0;
    /// 图层 1 笔迹
    pub const LAYER_1: u8 = 1;
    /// 图层 2 笔迹
    pub const LAYER_2: u8 = 2;

    /// 读取像素索引
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> u8 {
        self.data[y * SCREEN_WIDTH + x]
    }

    /// 获取一行像素索引
    pub fn row(&self, y: usize) -> &[u8] {
        &self.data[y * SCREEN_WIDTH..(y + 1) * SCREEN_WIDTH]
    }

    /// 全部像素索引 (行优先), 可直接作为调色板图像数据导出
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    /// 取出内部数据
    pub fn into_vec(self) -> Vec<u8> {
        self.data
    }
}

impl std::fmt::Debug for CompositeBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "CompositeBuffer({}x{})", SCREEN_WIDTH, SCREEN_HEIGHT)
    }
}
