//! 调色板位打包数组解码
//!
//! 方块状态数组由 64 位字组成，按从低位到高位的顺序拼接成固定宽度的调色板索引序列。
//! 实际文件中存在两种打包方式：
//!
//! - [`Packing::Spanning`]：逐位紧密排列，条目可以跨越相邻两个字（Litematica）。
//! - [`Packing::Aligned`]：每个字只放整数个条目，剩余高位留空（1.16 之后的区块段）。
//!
//! 两种方式在 `64 % bits == 0` 时完全相同，其余情况下数组长度不同，
//! 因此 [`BitLayout::infer`] 用字数判定实际约定。

use crate::palette::BlockDescriptor;
use serde::{Deserialize, Serialize};

/// 每个字的位数
pub const WORD_BITS: u32 = 64;

/// 打包约定
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Packing {
    /// 按数组长度自动判定
    #[default]
    Auto,
    /// 条目可跨字
    Spanning,
    /// 条目不跨字
    Aligned,
}

/// 调色板大小对应的最小位宽：`max(1, ceil(log2(n)))`
pub fn bits_for(palette_len: usize) -> u32 {
    let n = palette_len.max(1);
    (usize::BITS - (n - 1).leading_zeros()).max(1)
}

/// 给定条目数、位宽与约定时需要的字数；超出 `usize` 时饱和
pub fn expected_words(entries: usize, bits: u32, packing: Packing) -> usize {
    let bits = bits.clamp(1, WORD_BITS) as usize;
    match packing {
        Packing::Aligned => {
            let per_word = WORD_BITS as usize / bits;
            entries.div_ceil(per_word)
        }
        Packing::Spanning | Packing::Auto => {
            entries.saturating_mul(bits).div_ceil(WORD_BITS as usize)
        }
    }
}

fn mask(bits: u32) -> u64 {
    if bits >= WORD_BITS {
        u64::MAX
    } else {
        (1u64 << bits) - 1
    }
}

/// 已确定的位宽与打包约定
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitLayout {
    pub bits: u32,
    /// 不会是 [`Packing::Auto`]
    pub packing: Packing,
}

impl BitLayout {
    pub fn new(bits: u32, packing: Packing) -> Self {
        let packing = match packing {
            Packing::Auto => Packing::Spanning,
            p => p,
        };
        Self {
            bits: bits.clamp(1, WORD_BITS),
            packing,
        }
    }

    /// 按字数推断布局，返回 `(布局, 是否精确匹配)`
    ///
    /// 候选位宽为 `bits_for(palette_len)`，当它为 1 时再尝试 Litematica 的最小位宽 2。
    /// 依次与每种约定的期望字数比较，第一个完全相等的胜出；都不相等时退回
    /// 基础位宽加首选约定（`Auto` 视为 `Spanning`）。
    pub fn infer(
        palette_len: usize,
        entries: usize,
        words: usize,
        preference: Packing,
    ) -> (Self, bool) {
        let base = bits_for(palette_len);
        let widths: &[u32] = if base == 1 { &[1, 2] } else { &[base] };
        let packings: &[Packing] = match preference {
            Packing::Auto => &[Packing::Spanning, Packing::Aligned],
            Packing::Spanning => &[Packing::Spanning],
            Packing::Aligned => &[Packing::Aligned],
        };
        for &bits in widths {
            for &packing in packings {
                if expected_words(entries, bits, packing) == words {
                    return (Self::new(bits, packing), true);
                }
            }
        }
        (Self::new(base, preference), false)
    }
}

/// 只读的位打包数组视图
#[derive(Debug, Clone, Copy)]
pub struct PackedArray<'a> {
    words: &'a [i64],
    layout: BitLayout,
    per_word: usize,
    mask: u64,
}

impl<'a> PackedArray<'a> {
    pub fn new(words: &'a [i64], layout: BitLayout) -> Self {
        Self {
            words,
            layout,
            per_word: (WORD_BITS / layout.bits) as usize,
            mask: mask(layout.bits),
        }
    }

    pub fn layout(&self) -> BitLayout {
        self.layout
    }

    /// 第 `index` 个条目；所需的字不存在时返回 `None`
    pub fn get(&self, index: usize) -> Option<u64> {
        let bits = self.layout.bits as usize;
        match self.layout.packing {
            Packing::Aligned => {
                let word = *self.words.get(index / self.per_word)? as u64;
                let offset = (index % self.per_word) * bits;
                Some((word >> offset) & self.mask)
            }
            Packing::Spanning | Packing::Auto => {
                let bit = index.checked_mul(bits)?;
                let word_index = bit / WORD_BITS as usize;
                let offset = bit % WORD_BITS as usize;
                let mut value = *self.words.get(word_index)? as u64 >> offset;
                if offset + bits > WORD_BITS as usize {
                    let high = *self.words.get(word_index + 1)? as u64;
                    value |= high << (WORD_BITS as usize - offset);
                }
                Some(value & self.mask)
            }
        }
    }

    /// 把索引序列按布局打包成字数组
    pub fn pack(values: &[u64], layout: BitLayout) -> Vec<i64> {
        let layout = BitLayout::new(layout.bits, layout.packing);
        let bits = layout.bits as usize;
        let mask = mask(layout.bits);
        let mut words = vec![0u64; expected_words(values.len(), layout.bits, layout.packing)];
        match layout.packing {
            Packing::Aligned => {
                let per_word = WORD_BITS as usize / bits;
                for (i, &v) in values.iter().enumerate() {
                    words[i / per_word] |= (v & mask) << ((i % per_word) * bits);
                }
            }
            Packing::Spanning | Packing::Auto => {
                for (i, &v) in values.iter().enumerate() {
                    let v = v & mask;
                    let bit = i * bits;
                    let word_index = bit / WORD_BITS as usize;
                    let offset = bit % WORD_BITS as usize;
                    words[word_index] |= v << offset;
                    if offset + bits > WORD_BITS as usize {
                        words[word_index + 1] |= v >> (WORD_BITS as usize - offset);
                    }
                }
            }
        }
        words.into_iter().map(|w| w as i64).collect()
    }
}

/// 区域内尺寸（x, y, z）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegionSize {
    pub x: u32,
    pub y: u32,
    pub z: u32,
}

impl RegionSize {
    pub fn new(x: u32, y: u32, z: u32) -> Self {
        Self { x, y, z }
    }

    /// 格子总数；乘积超出 `usize` 时返回 `None`
    pub fn volume(&self) -> Option<usize> {
        (self.x as usize)
            .checked_mul(self.y as usize)?
            .checked_mul(self.z as usize)
    }

    /// 线性索引到局部坐标：x 变化最快，其次 z，最后 y
    pub fn position(&self, index: usize) -> (u32, u32, u32) {
        let sx = self.x.max(1) as usize;
        let sz = self.z.max(1) as usize;
        let x = index % sx;
        let z = (index / sx) % sz;
        let y = index / sx.saturating_mul(sz);
        (x as u32, y as u32, z as u32)
    }
}

/// 解码得到的一个非空气方块（局部坐标）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodedBlock<'p> {
    pub index: usize,
    pub x: u32,
    pub y: u32,
    pub z: u32,
    pub block: &'p BlockDescriptor,
}

/// 惰性解码器：按线性索引遍历区域，跳过空气与越界索引
///
/// 只能消费一次。遍历结束后可用计数方法查看跳过了多少条目。
pub struct PaletteDecoder<'a> {
    palette: &'a [BlockDescriptor],
    array: PackedArray<'a>,
    size: RegionSize,
    volume: usize,
    next: usize,
    cap: usize,
    emitted: usize,
    out_of_range: usize,
    missing: usize,
    capped: bool,
}

impl<'a> PaletteDecoder<'a> {
    /// 体积溢出的区域不产生任何条目
    pub fn new(
        palette: &'a [BlockDescriptor],
        array: PackedArray<'a>,
        size: RegionSize,
        cap: usize,
    ) -> Self {
        Self {
            palette,
            array,
            size,
            volume: size.volume().unwrap_or(0),
            next: 0,
            cap,
            emitted: 0,
            out_of_range: 0,
            missing: 0,
            capped: false,
        }
    }

    /// 索引超出调色板的条目数
    pub fn out_of_range(&self) -> usize {
        self.out_of_range
    }

    /// 因数组过短而读不到的条目数
    pub fn missing(&self) -> usize {
        self.missing
    }

    /// 是否因输出上限提前停止
    pub fn capped(&self) -> bool {
        self.capped
    }

    pub fn emitted(&self) -> usize {
        self.emitted
    }

    pub fn layout(&self) -> BitLayout {
        self.array.layout()
    }
}

impl<'a> Iterator for PaletteDecoder<'a> {
    type Item = DecodedBlock<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let palette = self.palette;
        while self.next < self.volume {
            let index = self.next;
            self.next += 1;

            let Some(palette_index) = self.array.get(index) else {
                // 后续索引同样读不到
                self.missing += self.volume - index;
                self.next = self.volume;
                return None;
            };
            let Some(block) = usize::try_from(palette_index)
                .ok()
                .and_then(|i| palette.get(i))
            else {
                self.out_of_range += 1;
                continue;
            };
            if block.is_air() {
                continue;
            }
            if self.emitted >= self.cap {
                self.capped = true;
                self.next = self.volume;
                return None;
            }
            self.emitted += 1;
            let (x, y, z) = self.size.position(index);
            return Some(DecodedBlock {
                index,
                x,
                y,
                z,
                block,
            });
        }
        None
    }
}

/// 推断布局并构造解码器，返回解码器与布局是否精确匹配
pub fn decode<'a>(
    palette: &'a [BlockDescriptor],
    words: &'a [i64],
    size: RegionSize,
    packing: Packing,
    cap: usize,
) -> (PaletteDecoder<'a>, bool) {
    let entries = size.volume().unwrap_or(0);
    let (layout, exact) = BitLayout::infer(palette.len(), entries, words.len(), packing);
    let array = PackedArray::new(words, layout);
    (PaletteDecoder::new(palette, array, size, cap), exact)
}
