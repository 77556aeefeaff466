//! sse/xset — множество кросс-тегов (xtag set).
//!
//! Бакет выбирается по первым четырём байтам тега; проверка членства —
//! побайтовое сравнение внутри бакета.

use super::id::ID_SIZE;

/// Хэш-множество 16-байтных кросс-тегов.
pub struct XSet {
    base: Vec<Vec<[u8; ID_SIZE]>>,
}

impl XSet {
    /// Создать X-Set для базы с n вхождениями (keyword, doc).
    pub fn new(n: usize) -> Self {
        let buckets = (n.div_ceil(4)).max(1);
        Self {
            base: vec![Vec::new(); buckets],
        }
    }

    /// Добавить кросс-тег.
    pub fn add(&mut self, tag: [u8; ID_SIZE]) {
        let b = self.bucket(&tag);
        self.base[b].push(tag);
    }

    /// Проверить наличие кросс-тега.
    pub fn lookup(&self, tag: &[u8; ID_SIZE]) -> bool {
        let b = self.bucket(tag);
        self.base[b].iter().any(|x| x == tag)
    }

    fn bucket(&self, tag: &[u8; ID_SIZE]) -> usize {
        let h = (tag[0] as u32) << 24 | (tag[1] as u32) << 16 | (tag[2] as u32) << 8
            | tag[3] as u32;
        h as usize % self.base.len()
    }
}
