//! Общие константы форматов (root block, страницы, кэш).

// -------- Root block --------

/// Магия root pointer'а: ASCII "{Shades}" (BE u64).
pub const ROOT_PTR_MAGIC: u64 = 0x7b53_6861_6465_737d;

/// Размер одной копии RootPointer в root block'е.
pub const ROOT_PTR_SIZE: usize = 96;

/// Паддинг хвоста root block'а (циклически, по абсолютному смещению).
pub const ROOT_PTR_PADDING: &[u8] = b"mtr@iki.fi~";

// Формат RootPointer (BE):
// [magic u64][flags u16][depth u16][page_size u32]
// [timestamp u64][generation u64][next_physical u64][next_logical u64]
// [page_table u64][freelist u64][snapshots u64][user_data u64]
// [checksum 16B]  -- PRF-MAC (нулевой ключ) по байтам [0..80)
pub const ROOT_PTR_OFS_MAGIC: usize = 0;
pub const ROOT_PTR_OFS_FLAGS: usize = 8;
pub const ROOT_PTR_OFS_DEPTH: usize = 10;
pub const ROOT_PTR_OFS_PAGE_SIZE: usize = 12;
pub const ROOT_PTR_OFS_TIMESTAMP: usize = 16;
pub const ROOT_PTR_OFS_GENERATION: usize = 24;
pub const ROOT_PTR_OFS_NEXT_PHYSICAL: usize = 32;
pub const ROOT_PTR_OFS_NEXT_LOGICAL: usize = 40;
pub const ROOT_PTR_OFS_PAGE_TABLE: usize = 48;
pub const ROOT_PTR_OFS_FREELIST: usize = 56;
pub const ROOT_PTR_OFS_SNAPSHOTS: usize = 64;
pub const ROOT_PTR_OFS_USER_DATA: usize = 72;
pub const ROOT_PTR_OFS_CHECKSUM: usize = 80;

/// Диапазон байтов, покрываемый контрольной суммой.
pub const ROOT_PTR_CHECKSUM_RANGE: usize = 80;

// -------- Pages --------

/// Минимальный размер страницы (байт, степень двойки).
pub const MIN_PAGE_SIZE: usize = 1024;

/// Максимальный размер страницы (байт).
pub const MAX_PAGE_SIZE: usize = 1 << 20;

/// Размер страницы по умолчанию.
pub const DEFAULT_PAGE_SIZE: usize = 16 * 1024;

// -------- Page cache --------

/// Общий объём арены кэша страниц (байт); число слотов = арена / page_size.
pub const CACHE_ARENA_SIZE: usize = 128 * 1024 * 1024;
