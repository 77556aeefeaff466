//! sse — searchable symmetric encryption (SKS и BXT поверх T-Set/X-Set).
//!
//! Входные данные протоколов — обратный индекс keyword -> список номеров
//! документов (его строит токенизатор, см. fti). Setup шифрует индекс,
//! search возвращает номера документов по ключевым словам без расшифровки
//! самих документов.

mod bxt;
mod encrypt;
mod id;
mod sks;
mod tset;
mod xset;

pub use bxt::Bxt;
pub use encrypt::Enc;
pub use id::{Id, ID_SIZE};
pub use sks::Sks;
pub use tset::TSet;
pub use xset::XSet;

use anyhow::Result;
use std::collections::HashMap;

/// Обратный индекс: ключевое слово -> номера документов.
pub type KeywordIndex = HashMap<String, Vec<u64>>;

/// Протокол searchable symmetric encryption.
pub trait Sse {
    /// Поиск по запросу; возвращает номера подошедших документов.
    fn search(&mut self, query: &[&str]) -> Result<Vec<u64>>;
}
