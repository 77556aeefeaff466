//! db/params — параметры базы данных.

use anyhow::{anyhow, Result};

use crate::consts::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE, MIN_PAGE_SIZE};

/// Параметры базы. page_size выбирается при создании и сохраняется в root
/// block'е; при открытии реальное значение берётся оттуда.
#[derive(Debug, Clone, Copy)]
pub struct Params {
    pub page_size: usize,
}

impl Params {
    pub fn new() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl Default for Params {
    fn default() -> Self {
        Self::new()
    }
}

/// Проверка корректности размера страницы (2^n, 1 KiB .. 1 MiB).
pub fn validate_page_size(page_size: usize) -> Result<()> {
    if page_size < MIN_PAGE_SIZE
        || page_size > MAX_PAGE_SIZE
        || (page_size & (page_size - 1)) != 0
    {
        return Err(anyhow!(
            "page_size must be a power of two in [{} .. {}], got {}",
            MIN_PAGE_SIZE,
            MAX_PAGE_SIZE,
            page_size
        ));
    }
    Ok(())
}
