//! crypto — симметричные примитивы на базе AES-128.
//!
//! Содержит:
//! - Prf — потоковая PRF (AES-128-CBC-MAC, нулевой IV, нулевой паддинг);
//!   используется и как MAC root block'а (нулевой ключ), и как протокольная
//!   PRF в SSE-схемах.
//! - Hash — 512-битный дайджест на той же CBC-конструкции (нулевой ключ).
//!
//! Примечание:
//! - Это НЕ криптографические хэши общего назначения; формат и область
//!   применения зафиксированы форматом root block'а и SSE-протоколами.

mod hash;
mod prf;

pub use hash::Hash;
pub use prf::Prf;
