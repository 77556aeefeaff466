//! db — слой хранения: устройство, кэш страниц, таблица страниц, транзакции.
//!
//! Разделение по подмодулям:
//! - device.rs      — Device (позиционный I/O), MemDevice, File
//! - params.rs      — Params + валидация размера страницы
//! - cache.rs       — кэш страниц (арена + clock), PageRef
//! - pagetable.rs   — Physical/LogicalId, RootPointer, root block, таблица
//! - transaction.rs — базовая транзакция (shadow paging)
//!
//! Db владеет устройством, кэшем и таблицей; PageRef делится между кэшем и
//! транзакцией через refcount. Однопоточная, однописательская модель: в
//! каждый момент не больше одной базовой транзакции.

pub mod cache;
pub mod device;
pub mod pagetable;
pub mod params;
pub mod transaction;

pub use cache::{Cache, PageRef};
pub use device::{Device, MemDevice};
pub use pagetable::{LogicalId, PhysicalId, RootPointer, ROOT_BLOCK};
pub use params::{validate_page_size, Params};
pub use transaction::Transaction;

use anyhow::{anyhow, Result};

use pagetable::{probe_root_pointer, PageTable};

/// База данных Shades: страничный стор с shadow paging.
pub struct Db {
    params: Params,
    pub(crate) device: Box<dyn Device>,
    pub(crate) cache: Cache,
    pub(crate) table: PageTable,
}

impl Db {
    /// Создать новую базу на пустом устройстве.
    pub fn create(params: Params, device: Box<dyn Device>) -> Result<Db> {
        validate_page_size(params.page_size)?;
        let mut cache = Cache::new(params.page_size)?;
        let table = PageTable::create(&mut cache, &*device, &params)?;
        Ok(Db {
            params,
            device,
            cache,
            table,
        })
    }

    /// Открыть существующую базу. Размер страницы определяется по root
    /// block'у; params.page_size игнорируется.
    pub fn open(params: Params, device: Box<dyn Device>) -> Result<Db> {
        let root = probe_root_pointer(&*device)?;
        let mut params = params;
        params.page_size = root.page_size as usize;
        let mut cache = Cache::new(params.page_size)?;
        let table = PageTable::open(&mut cache, &*device)?;
        Ok(Db {
            params,
            device,
            cache,
            table,
        })
    }

    /// Начать базовую транзакцию (rw=false — только чтение). Вторая
    /// одновременная транзакция — ошибка busy.
    pub fn new_transaction(&mut self, rw: bool) -> Result<Transaction> {
        self.table.begin()?;
        Ok(Transaction::new(rw))
    }

    // ---------------- Доступ к страницам ----------------

    /// Данные страницы только для чтения.
    pub fn page_read(&self, r: &PageRef) -> &[u8] {
        self.cache.read(r)
    }

    /// Данные страницы на запись (страница помечается грязной).
    pub fn page_data(&mut self, r: &PageRef) -> &mut [u8] {
        self.cache.data(r)
    }

    /// Дополнительное удержание ссылки.
    pub fn retain(&mut self, r: &PageRef) {
        self.cache.retain(r)
    }

    /// Вернуть ссылку кэшу. Обязателен на каждом пути выхода.
    pub fn release(&mut self, r: PageRef) {
        self.cache.release(r)
    }

    // ---------------- Низкоуровневые отображения ----------------
    //
    // Для вышележащих слоёв (объекты поверх meta/objectID) и тестов.

    /// Текущее отображение логического идентификатора.
    pub fn mapping_get(&mut self, id: LogicalId) -> Result<PhysicalId> {
        self.table.get(&mut self.cache, &*self.device, id)
    }

    /// Установить отображение id -> pid в рамках транзакции tr.
    pub fn mapping_set(
        &mut self,
        tr: &mut Transaction,
        id: LogicalId,
        pid: PhysicalId,
    ) -> Result<()> {
        if !tr.rw {
            return Err(anyhow!("read-only transaction"));
        }
        self.table.set(&mut self.cache, &*self.device, tr, id, pid)
    }

    // ---------------- Интроспекция ----------------

    pub fn page_size(&self) -> usize {
        self.params.page_size
    }

    /// Записей таблицы страниц в одном узле.
    pub fn ids_per_page(&self) -> u64 {
        self.params.page_size as u64 / 8
    }

    /// Текущая глубина дерева таблицы страниц.
    pub fn depth(&self) -> u16 {
        self.table.depth()
    }

    /// Поколение зафиксированного состояния.
    pub fn generation(&self) -> u64 {
        self.table.generation()
    }

    /// Закрыть базу: финальный sync + close устройства.
    pub fn close(self) -> Result<()> {
        self.device.sync()?;
        self.device.close()
    }
}
