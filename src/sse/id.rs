//! sse/id — 16-байтный идентификатор объекта.

use byteorder::{BigEndian, ByteOrder};

/// Размер идентификатора (блок AES).
pub const ID_SIZE: usize = 16;

/// Идентификатор объекта: u64 в первых 8 байтах (BE), остальные байты
/// инициализирует владелец.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Id(pub [u8; ID_SIZE]);

impl Id {
    /// Записать u64-часть идентификатора.
    pub fn put_u64(&mut self, v: u64) {
        BigEndian::write_u64(&mut self.0[..8], v);
    }

    /// Прочитать u64-часть идентификатора.
    pub fn u64(&self) -> u64 {
        BigEndian::read_u64(&self.0[..8])
    }

    pub fn from_u64(v: u64) -> Self {
        let mut id = Id::default();
        id.put_u64(v);
        id
    }
}
