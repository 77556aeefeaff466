//! db/device — блочное устройство ввода-вывода.
//!
//! Device — позиционный интерфейс (read_at/write_at/sync/close), смещения в
//! байтах, выравнивание произвольное. Физическая страница p занимает байты
//! [p*page_size, (p+1)*page_size); страница 0 — root block.
//!
//! Реализации:
//! - MemDevice — буфер в памяти фиксированного размера (тестовый носитель).
//!   Клонируемый хэндл над общим буфером, чтобы тесты могли переоткрывать
//!   базу и инжектировать порчу байтов.
//! - std::fs::File — позиционный I/O (FileExt на Unix, seek-фолбэк иначе).

use anyhow::{anyhow, Result};
use std::sync::{Arc, Mutex};

/// Блочное устройство с позиционным доступом.
pub trait Device {
    fn read_at(&self, buf: &mut [u8], offset: u64) -> Result<()>;
    fn write_at(&self, buf: &[u8], offset: u64) -> Result<()>;
    fn sync(&self) -> Result<()>;
    fn close(&self) -> Result<()>;
}

/// Устройство в памяти: общий буфер фиксированного размера.
#[derive(Clone)]
pub struct MemDevice {
    buf: Arc<Mutex<Vec<u8>>>,
}

impl MemDevice {
    /// Создать устройство ёмкостью size байт (нули).
    pub fn new(size: usize) -> Self {
        Self {
            buf: Arc::new(Mutex::new(vec![0u8; size])),
        }
    }

    /// Ёмкость устройства в байтах.
    pub fn len(&self) -> usize {
        self.buf.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Прямой доступ к байтам носителя (тесты/диагностика: порча root block'а).
    pub fn with_bytes_mut<R>(&self, f: impl FnOnce(&mut [u8]) -> R) -> R {
        let mut g = self.buf.lock().unwrap();
        f(&mut g)
    }
}

impl Device for MemDevice {
    fn read_at(&self, buf: &mut [u8], offset: u64) -> Result<()> {
        let g = self.buf.lock().unwrap();
        let end = offset as usize + buf.len();
        if end > g.len() {
            return Err(anyhow!(
                "read beyond device capacity (offset {}, len {}, capacity {})",
                offset,
                buf.len(),
                g.len()
            ));
        }
        buf.copy_from_slice(&g[offset as usize..end]);
        Ok(())
    }

    fn write_at(&self, buf: &[u8], offset: u64) -> Result<()> {
        let mut g = self.buf.lock().unwrap();
        let end = offset as usize + buf.len();
        if end > g.len() {
            return Err(anyhow!(
                "write beyond device capacity (offset {}, len {}, capacity {})",
                offset,
                buf.len(),
                g.len()
            ));
        }
        g[offset as usize..end].copy_from_slice(buf);
        Ok(())
    }

    fn sync(&self) -> Result<()> {
        Ok(())
    }

    fn close(&self) -> Result<()> {
        Ok(())
    }
}

impl Device for std::fs::File {
    #[cfg(unix)]
    fn read_at(&self, buf: &mut [u8], offset: u64) -> Result<()> {
        use std::os::unix::fs::FileExt;
        FileExt::read_exact_at(self, buf, offset)
            .map_err(|e| anyhow!("read {} bytes at {}: {}", buf.len(), offset, e))
    }

    #[cfg(not(unix))]
    fn read_at(&self, buf: &mut [u8], offset: u64) -> Result<()> {
        use std::io::{Read, Seek, SeekFrom};
        let mut f = self;
        f.seek(SeekFrom::Start(offset))?;
        f.read_exact(buf)
            .map_err(|e| anyhow!("read {} bytes at {}: {}", buf.len(), offset, e))
    }

    #[cfg(unix)]
    fn write_at(&self, buf: &[u8], offset: u64) -> Result<()> {
        use std::os::unix::fs::FileExt;
        FileExt::write_all_at(self, buf, offset)
            .map_err(|e| anyhow!("write {} bytes at {}: {}", buf.len(), offset, e))
    }

    #[cfg(not(unix))]
    fn write_at(&self, buf: &[u8], offset: u64) -> Result<()> {
        use std::io::{Seek, SeekFrom, Write};
        let mut f = self;
        f.seek(SeekFrom::Start(offset))?;
        f.write_all(buf)
            .map_err(|e| anyhow!("write {} bytes at {}: {}", buf.len(), offset, e))
    }

    fn sync(&self) -> Result<()> {
        Ok(self.sync_all()?)
    }

    fn close(&self) -> Result<()> {
        // Дескриптор закроется при Drop; здесь только финальный fsync.
        Ok(self.sync_all()?)
    }
}
