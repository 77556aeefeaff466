//! db/pagetable — идентификаторы страниц, root block и таблица отображения
//! логических номеров страниц в физические.
//!
//! Таблица — сбалансированное дерево узлов; узел — страница из page_size/8
//! записей u64 (BE). Глубина D покрывает логические номера
//! [0, (page_size/8)^D); запись 0 означает «не отображено».
//!
//! Root block (физическая страница 0) несёт реплики 96-байтного
//! RootPointer'а; авторитетна реплика с максимальным generation и верной
//! контрольной суммой (PRF-MAC с нулевым ключом по байтам [0..80)).
//! Частично порванная запись страницы 0 не теряет состояние, пока цела хотя
//! бы одна реплика.
//!
//! Протокол изменений — shadow paging: set() копирует каждый узел пути в
//! свежие физические страницы, коммит становится атомарным через
//! единственную перезапись страницы 0.

use anyhow::{anyhow, Result};
use byteorder::{BigEndian, ByteOrder};
use log::{debug, info};
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::consts::*;
use crate::crypto::Prf;

use super::cache::{Cache, PageRef};
use super::device::Device;
use super::params::{validate_page_size, Params};
use super::transaction::Transaction;

// ---------------- Идентификаторы ----------------

/// Маски компонентов PhysicalId.
pub const PID_META_MASK: u64 = 0xffff_0000_0000_0000;
pub const PID_PAGENUM_MASK: u64 = 0x0000_ffff_ffff_ffff;

/// Физический идентификатор страницы: meta 16 бит + pagenum 48 бит.
/// pagenum 0 зарезервирован («не аллоцировано»); (0,0) — root block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct PhysicalId(pub u64);

/// Root block базы данных.
pub const ROOT_BLOCK: PhysicalId = PhysicalId(0);

impl PhysicalId {
    /// Собрать PhysicalId из компонентов. Паникует, если pagenum не
    /// помещается в 48 бит.
    pub fn new(meta: u16, pagenum: u64) -> Self {
        assert!(
            pagenum & PID_META_MASK == 0,
            "physical page number too big"
        );
        PhysicalId((meta as u64) << 48 | pagenum)
    }

    pub fn meta(self) -> u16 {
        (self.0 >> 48) as u16
    }

    pub fn pagenum(self) -> u64 {
        self.0 & PID_PAGENUM_MASK
    }
}

impl fmt::Display for PhysicalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04x}:{:012x}", self.meta(), self.pagenum())
    }
}

/// Маски компонентов LogicalId.
pub const ID_META_MASK: u64 = 0xc000_0000_0000_0000;
pub const ID_OBJECT_ID_MASK: u64 = 0x3fff_0000_0000_0000;
pub const ID_PAGENUM_MASK: u64 = 0x0000_ffff_ffff_ffff;

/// Логический идентификатор страницы: meta 2 бита + objectID 14 бит +
/// pagenum 48 бит. Таблица страниц транслирует только pagenum; meta и
/// objectID принадлежат вышележащим слоям.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct LogicalId(pub u64);

impl LogicalId {
    /// Собрать LogicalId из компонентов. Паникует при выходе компонентов за
    /// разрядность.
    pub fn new(meta: u8, object_id: u16, pagenum: u64) -> Self {
        assert!(meta & 0xfc == 0, "logical page meta too big");
        assert!(object_id & 0xc000 == 0, "logical page object ID too big");
        assert!(
            pagenum & (ID_META_MASK | ID_OBJECT_ID_MASK) == 0,
            "logical page number too big"
        );
        LogicalId((meta as u64) << 62 | (object_id as u64) << 48 | pagenum)
    }

    pub fn meta(self) -> u8 {
        (self.0 >> 62) as u8
    }

    pub fn object_id(self) -> u16 {
        ((self.0 & ID_OBJECT_ID_MASK) >> 48) as u16
    }

    pub fn pagenum(self) -> u64 {
        self.0 & ID_PAGENUM_MASK
    }
}

impl fmt::Display for LogicalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{:04x}:{:012x}",
            self.meta(),
            self.object_id(),
            self.pagenum()
        )
    }
}

// ---------------- RootPointer ----------------

/// Корневой указатель базы: описывает зафиксированное состояние и пишется
/// атомарно в страницу 0 (репликами).
#[derive(Debug, Clone, Copy)]
pub struct RootPointer {
    pub magic: u64,
    pub flags: u16,
    pub depth: u16,
    pub page_size: u32,
    pub timestamp: u64,
    pub generation: u64,
    pub next_physical: u64,
    pub next_logical: u64,
    pub page_table: PhysicalId,
    pub freelist: PhysicalId,
    pub snapshots: PhysicalId,
    pub user_data: u64,
}

impl RootPointer {
    /// Записей таблицы страниц в одном узле.
    pub fn ids_per_page(&self) -> u64 {
        self.page_size as u64 / 8
    }

    /// Ёмкость таблицы при текущей глубине.
    pub fn num_pages(&self) -> u64 {
        (0..self.depth).fold(1u64, |n, _| n.saturating_mul(self.ids_per_page()))
    }
}

/// Сформатировать root block: свежий timestamp, поля BE, PRF-MAC, реплики,
/// циклический паддинг хвоста.
fn format_root_block(rp: &mut RootPointer, hash: &mut Prf, buf: &mut [u8]) {
    rp.timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos() as u64;

    BigEndian::write_u64(&mut buf[ROOT_PTR_OFS_MAGIC..], rp.magic);
    BigEndian::write_u16(&mut buf[ROOT_PTR_OFS_FLAGS..], rp.flags);
    BigEndian::write_u16(&mut buf[ROOT_PTR_OFS_DEPTH..], rp.depth);
    BigEndian::write_u32(&mut buf[ROOT_PTR_OFS_PAGE_SIZE..], rp.page_size);
    BigEndian::write_u64(&mut buf[ROOT_PTR_OFS_TIMESTAMP..], rp.timestamp);
    BigEndian::write_u64(&mut buf[ROOT_PTR_OFS_GENERATION..], rp.generation);
    BigEndian::write_u64(&mut buf[ROOT_PTR_OFS_NEXT_PHYSICAL..], rp.next_physical);
    BigEndian::write_u64(&mut buf[ROOT_PTR_OFS_NEXT_LOGICAL..], rp.next_logical);
    BigEndian::write_u64(&mut buf[ROOT_PTR_OFS_PAGE_TABLE..], rp.page_table.0);
    BigEndian::write_u64(&mut buf[ROOT_PTR_OFS_FREELIST..], rp.freelist.0);
    BigEndian::write_u64(&mut buf[ROOT_PTR_OFS_SNAPSHOTS..], rp.snapshots.0);
    BigEndian::write_u64(&mut buf[ROOT_PTR_OFS_USER_DATA..], rp.user_data);

    let checksum = hash.data(&buf[..ROOT_PTR_CHECKSUM_RANGE]);
    buf[ROOT_PTR_OFS_CHECKSUM..ROOT_PTR_SIZE].copy_from_slice(&checksum);

    // Реплики указателя до границы страницы; все копии идентичны (включая
    // timestamp).
    let mut i = ROOT_PTR_SIZE;
    while i + ROOT_PTR_SIZE <= buf.len() {
        buf.copy_within(0..ROOT_PTR_SIZE, i);
        i += ROOT_PTR_SIZE;
    }
    while i < buf.len() {
        buf[i] = ROOT_PTR_PADDING[i % ROOT_PTR_PADDING.len()];
        i += 1;
    }
}

/// Разобрать одну 96-байтную реплику; ошибка при несходящейся контрольной
/// сумме, чужой магии или бессмысленном page_size.
fn parse_root_pointer(hash: &mut Prf, win: &[u8]) -> Result<RootPointer> {
    if win.len() < ROOT_PTR_SIZE {
        return Err(anyhow!("root pointer window too small"));
    }
    let checksum = hash.data(&win[..ROOT_PTR_CHECKSUM_RANGE]);
    if checksum[..] != win[ROOT_PTR_OFS_CHECKSUM..ROOT_PTR_SIZE] {
        return Err(anyhow!("invalid root pointer checksum"));
    }

    let rp = RootPointer {
        magic: BigEndian::read_u64(&win[ROOT_PTR_OFS_MAGIC..]),
        flags: BigEndian::read_u16(&win[ROOT_PTR_OFS_FLAGS..]),
        depth: BigEndian::read_u16(&win[ROOT_PTR_OFS_DEPTH..]),
        page_size: BigEndian::read_u32(&win[ROOT_PTR_OFS_PAGE_SIZE..]),
        timestamp: BigEndian::read_u64(&win[ROOT_PTR_OFS_TIMESTAMP..]),
        generation: BigEndian::read_u64(&win[ROOT_PTR_OFS_GENERATION..]),
        next_physical: BigEndian::read_u64(&win[ROOT_PTR_OFS_NEXT_PHYSICAL..]),
        next_logical: BigEndian::read_u64(&win[ROOT_PTR_OFS_NEXT_LOGICAL..]),
        page_table: PhysicalId(BigEndian::read_u64(&win[ROOT_PTR_OFS_PAGE_TABLE..])),
        freelist: PhysicalId(BigEndian::read_u64(&win[ROOT_PTR_OFS_FREELIST..])),
        snapshots: PhysicalId(BigEndian::read_u64(&win[ROOT_PTR_OFS_SNAPSHOTS..])),
        user_data: BigEndian::read_u64(&win[ROOT_PTR_OFS_USER_DATA..]),
    };
    if rp.magic != ROOT_PTR_MAGIC {
        return Err(anyhow!("bad root pointer magic {:#x}", rp.magic));
    }
    validate_page_size(rp.page_size as usize)?;
    if rp.depth == 0 {
        return Err(anyhow!("root pointer depth is zero"));
    }
    Ok(rp)
}

/// Выбрать из буфера авторитетную реплику: максимальный generation среди
/// прошедших проверку.
fn parse_root_block(hash: &mut Prf, buf: &[u8]) -> Result<RootPointer> {
    let mut best: Option<RootPointer> = None;
    for win in buf.chunks_exact(ROOT_PTR_SIZE) {
        if let Ok(rp) = parse_root_pointer(hash, win) {
            if best.map_or(true, |b| rp.generation > b.generation) {
                best = Some(rp);
            }
        }
    }
    best.ok_or_else(|| anyhow!("no valid root pointer found"))
}

/// Найти авторитетный root pointer, не зная размера страницы: пробные чтения
/// 1 KiB, 2 KiB, ... 1 MiB с начала устройства.
pub(crate) fn probe_root_pointer(dev: &dyn Device) -> Result<RootPointer> {
    let mut hash = Prf::new(&[0u8; 16])?;
    let mut best: Option<RootPointer> = None;

    let mut size = MIN_PAGE_SIZE;
    while size <= MAX_PAGE_SIZE {
        let mut buf = vec![0u8; size];
        if dev.read_at(&mut buf, 0).is_err() {
            // Устройство короче пробного размера: всё уже просканировано.
            break;
        }
        if let Ok(rp) = parse_root_block(&mut hash, &buf) {
            if best.map_or(true, |b| rp.generation > b.generation) {
                best = Some(rp);
            }
        }
        if let Some(b) = best {
            if b.page_size as usize <= size {
                break;
            }
        }
        size *= 2;
    }

    best.ok_or_else(|| anyhow!("no valid root pointer found"))
}

// ---------------- Таблица страниц ----------------

fn read_entry(buf: &[u8], idx: usize) -> u64 {
    BigEndian::read_u64(&buf[idx * 8..idx * 8 + 8])
}

fn write_entry(buf: &mut [u8], idx: usize, v: u64) {
    BigEndian::write_u64(&mut buf[idx * 8..idx * 8 + 8], v);
}

fn per_page_pow(per_page: u64, levels: u16) -> u64 {
    (0..levels).fold(1u64, |n, _| n.saturating_mul(per_page))
}

/// Таблица отображения логических страниц в физические плюс управление
/// root block'ом и счётчиками поколений.
pub struct PageTable {
    /// Зафиксированное состояние.
    root0: RootPointer,
    /// Строящееся состояние текущей транзакции.
    root1: RootPointer,
    /// Вечно удерживаемая ссылка на страницу 0.
    root_ref: PageRef,
    /// PRF контрольных сумм root block'а (нулевой ключ).
    hash: Prf,
}

impl PageTable {
    /// Создать таблицу на пустом устройстве: страница 0 — root block,
    /// страница 1 — пустой корневой узел, логический 0 зарезервирован.
    pub(crate) fn create(cache: &mut Cache, dev: &dyn Device, params: &Params) -> Result<PageTable> {
        let mut root1 = RootPointer {
            magic: ROOT_PTR_MAGIC,
            flags: 0,
            depth: 1,
            page_size: params.page_size as u32,
            timestamp: 0,
            generation: 1,
            next_physical: 2,
            next_logical: 1,
            page_table: PhysicalId::new(0, 1),
            freelist: PhysicalId(0),
            snapshots: PhysicalId(0),
            user_data: 0,
        };
        let mut hash = Prf::new(&[0u8; 16])?;

        let node = cache.new_page(dev, root1.page_table, None)?;
        cache.release(node);

        // Root block создаётся в кэше без чтения устройства (файл может быть
        // пустым).
        let root_ref = cache.new_page(dev, ROOT_BLOCK, None)?;
        format_root_block(&mut root1, &mut hash, cache.data(&root_ref));
        cache.flush(dev)?;
        dev.sync()?;

        info!(
            "created database: page_size={}, generation={}",
            params.page_size, root1.generation
        );
        Ok(PageTable {
            root0: root1,
            root1,
            root_ref,
            hash,
        })
    }

    /// Открыть таблицу: прочитать страницу 0 через кэш и выбрать
    /// авторитетную реплику.
    pub(crate) fn open(cache: &mut Cache, dev: &dyn Device) -> Result<PageTable> {
        let mut hash = Prf::new(&[0u8; 16])?;
        let root_ref = cache.get(dev, ROOT_BLOCK)?;
        let root = parse_root_block(&mut hash, cache.read(&root_ref))?;
        debug!(
            "open: generation={}, depth={}, next_physical={}",
            root.generation, root.depth, root.next_physical
        );
        Ok(PageTable {
            root0: root,
            root1: root,
            root_ref,
            hash,
        })
    }

    pub(crate) fn depth(&self) -> u16 {
        self.root1.depth
    }

    pub(crate) fn generation(&self) -> u64 {
        self.root0.generation
    }

    /// Транслировать логический идентификатор в текущий физический.
    pub(crate) fn get(&self, cache: &mut Cache, dev: &dyn Device, id: LogicalId) -> Result<PhysicalId> {
        let mut pagenum = id.pagenum();
        if pagenum >= self.root1.num_pages() {
            return Err(anyhow!("unmapped page {}", id));
        }

        let per_page = self.root1.ids_per_page();
        let mut per_id = per_page_pow(per_page, self.root1.depth - 1);
        let mut node = self.root1.page_table;

        for _level in 0..self.root1.depth {
            let r = cache.get(dev, node)?;
            let entry = read_entry(cache.read(&r), (pagenum / per_id) as usize);
            cache.release(r);
            if entry == 0 {
                return Err(anyhow!("unmapped page {}", id));
            }
            node = PhysicalId(entry);
            pagenum %= per_id;
            per_id /= per_page;
        }
        Ok(node)
    }

    /// Обновить отображение id -> pid. Все узлы пути копируются в тени
    /// текущей транзакции; недостающие промежуточные узлы аллоцируются.
    pub(crate) fn set(
        &mut self,
        cache: &mut Cache,
        dev: &dyn Device,
        tr: &mut Transaction,
        id: LogicalId,
        pid: PhysicalId,
    ) -> Result<()> {
        let mut pagenum = id.pagenum();
        let per_page = self.root1.ids_per_page();

        // [1] Нарастить глубину: новые корни с прежним корнем в записи 0.
        while pagenum >= self.root1.num_pages() {
            let new_root = self.alloc_physical_id()?;
            let r = cache.new_page(dev, new_root, None)?;
            write_entry(cache.data(&r), 0, self.root1.page_table.0);
            cache.release(r);
            tr.writable.insert(new_root, PhysicalId(0));
            self.root1.page_table = new_root;
            self.root1.depth += 1;
        }

        // [2] Теневая копия корневого узла.
        let shadow = self.make_writable(cache, dev, tr, self.root1.page_table)?;
        self.root1.page_table = shadow;

        // [3] Спуск до листа с теневым копированием пути.
        let mut node = self.root1.page_table;
        let mut per_id = per_page_pow(per_page, self.root1.depth - 1);

        for level in (1..=self.root1.depth).rev() {
            let idx = (pagenum / per_id) as usize;
            if level == 1 {
                let r = cache.get(dev, node)?;
                write_entry(cache.data(&r), idx, pid.0);
                cache.release(r);
                return Ok(());
            }

            let r = cache.get(dev, node)?;
            let entry = read_entry(cache.read(&r), idx);
            cache.release(r);

            let child = if entry == 0 {
                // Недостающий промежуточный узел.
                let c = self.alloc_physical_id()?;
                let nr = cache.new_page(dev, c, None)?;
                cache.release(nr);
                tr.writable.insert(c, PhysicalId(0));
                c
            } else {
                self.make_writable(cache, dev, tr, PhysicalId(entry))?
            };

            if child.0 != entry {
                let r = cache.get(dev, node)?;
                write_entry(cache.data(&r), idx, child.0);
                cache.release(r);
            }

            node = child;
            pagenum %= per_id;
            per_id /= per_page;
        }
        unreachable!("page table descent ended above the leaf level");
    }

    /// Сделать узел записываемым в транзакции: уже теневой возвращается как
    /// есть, иначе содержимое копируется в свежую физическую страницу.
    fn make_writable(
        &mut self,
        cache: &mut Cache,
        dev: &dyn Device,
        tr: &mut Transaction,
        pid: PhysicalId,
    ) -> Result<PhysicalId> {
        if tr.writable.contains_key(&pid) {
            return Ok(pid);
        }
        let new_pid = self.alloc_physical_id()?;
        let old = cache.get(dev, pid)?;
        let new = match cache.new_page(dev, new_pid, Some(&old)) {
            Ok(r) => r,
            Err(e) => {
                cache.release(old);
                return Err(e);
            }
        };
        cache.release(old);
        cache.release(new);
        tr.writable.insert(new_pid, pid);
        Ok(new_pid)
    }

    // ---------------- Аллокация ----------------

    pub(crate) fn alloc_physical_id(&mut self) -> Result<PhysicalId> {
        let n = self.root1.next_physical;
        if n & PID_META_MASK != 0 {
            return Err(anyhow!("out of physical page numbers"));
        }
        self.root1.next_physical += 1;
        Ok(PhysicalId::new(0, n))
    }

    pub(crate) fn alloc_logical_id(&mut self) -> Result<LogicalId> {
        let n = self.root1.next_logical;
        if n & (ID_META_MASK | ID_OBJECT_ID_MASK) != 0 {
            return Err(anyhow!("out of logical page numbers"));
        }
        self.root1.next_logical += 1;
        Ok(LogicalId::new(0, 0, n))
    }

    /// Возврат идентификаторов в свободный список: поля Freelist
    /// зарезервированы форматом, но пока не задействованы.
    pub(crate) fn free_physical_id(&mut self, _pid: PhysicalId) {}

    pub(crate) fn free_logical_id(&mut self, _id: LogicalId) {}

    // ---------------- Жизненный цикл транзакций ----------------

    /// Начать базовую транзакцию; вторая одновременная запрещена.
    pub(crate) fn begin(&mut self) -> Result<()> {
        if self.root1.generation > self.root0.generation {
            return Err(anyhow!("base transaction already active"));
        }
        self.root1.generation = self.root0.generation + 1;
        Ok(())
    }

    /// Зафиксировать транзакцию. Для read-write: сброс данных, затем
    /// перезапись root block'а — единственный атомарный шаг.
    pub(crate) fn commit(&mut self, cache: &mut Cache, dev: &dyn Device, tr: &Transaction) -> Result<()> {
        if !tr.rw {
            self.root1.generation = self.root0.generation;
            return Ok(());
        }

        // [1] Страницы данных и узлы таблицы должны быть долговечны до
        // перезаписи корня.
        cache.flush(dev)?;
        dev.sync()?;

        // [2] Root block из root1.
        format_root_block(&mut self.root1, &mut self.hash, cache.data(&self.root_ref));
        cache.flush(dev)?;
        dev.sync()?;

        self.root0 = self.root1;
        debug!("commit: generation {} durable", self.root0.generation);
        Ok(())
    }

    /// Откатить транзакцию. Структура root1 возвращается к root0; счётчики
    /// аллокации остаются продвинутыми (выданные ID текут — см. DESIGN.md),
    /// неиспользуемые грязные страницы выкидываются из кэша без записи.
    pub(crate) fn abort(&mut self, cache: &mut Cache, tr: &Transaction) -> Result<()> {
        for &new_pid in tr.writable.keys() {
            cache.discard(new_pid);
        }
        let next_physical = self.root1.next_physical;
        let next_logical = self.root1.next_logical;
        self.root1 = self.root0;
        self.root1.next_physical = next_physical;
        self.root1.next_logical = next_logical;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn physical_id_roundtrip() {
        for &meta in &[0u16, 1, 0xffff] {
            for &pagenum in &[0u64, 1, PID_PAGENUM_MASK] {
                let pid = PhysicalId::new(meta, pagenum);
                assert_eq!(pid.meta(), meta);
                assert_eq!(pid.pagenum(), pagenum);
            }
        }
    }

    #[test]
    #[should_panic(expected = "physical page number too big")]
    fn physical_id_pagenum_overflow() {
        PhysicalId::new(0, PID_PAGENUM_MASK + 1);
    }

    #[test]
    fn logical_id_roundtrip() {
        for &meta in &[0u8, 1, 2, 3] {
            for &object_id in &[0u16, 1, 0x3fff] {
                for &pagenum in &[0u64, 1, ID_PAGENUM_MASK] {
                    let id = LogicalId::new(meta, object_id, pagenum);
                    assert_eq!(id.meta(), meta);
                    assert_eq!(id.object_id(), object_id);
                    assert_eq!(id.pagenum(), pagenum);
                }
            }
        }
    }

    #[test]
    fn root_pointer_format_parse() {
        let mut rp = RootPointer {
            magic: ROOT_PTR_MAGIC,
            flags: 0,
            depth: 3,
            page_size: 1024,
            timestamp: 0,
            generation: 7,
            next_physical: 55,
            next_logical: 12,
            page_table: PhysicalId::new(0, 9),
            freelist: PhysicalId(0),
            snapshots: PhysicalId(0),
            user_data: 0xdead_beef,
        };
        let mut hash = Prf::new(&[0u8; 16]).unwrap();

        let mut buf = vec![0u8; 1024];
        format_root_block(&mut rp, &mut hash, &mut buf);

        let got = parse_root_block(&mut hash, &buf).unwrap();
        assert_eq!(got.generation, 7);
        assert_eq!(got.depth, 3);
        assert_eq!(got.page_size, 1024);
        assert_eq!(got.next_physical, 55);
        assert_eq!(got.next_logical, 12);
        assert_eq!(got.page_table, PhysicalId::new(0, 9));
        assert_eq!(got.user_data, 0xdead_beef);
        assert_eq!(got.timestamp, rp.timestamp);

        // Порча первой реплики: выживают остальные.
        buf[40] ^= 0xff;
        let got = parse_root_block(&mut hash, &buf).unwrap();
        assert_eq!(got.generation, 7);

        // Порча всех реплик — Corrupted.
        for b in buf.iter_mut() {
            *b ^= 0x55;
        }
        assert!(parse_root_block(&mut hash, &buf).is_err());
    }

    #[test]
    fn root_block_padding_tail() {
        let mut rp = RootPointer {
            magic: ROOT_PTR_MAGIC,
            flags: 0,
            depth: 1,
            page_size: 1024,
            timestamp: 0,
            generation: 1,
            next_physical: 2,
            next_logical: 1,
            page_table: PhysicalId::new(0, 1),
            freelist: PhysicalId(0),
            snapshots: PhysicalId(0),
            user_data: 0,
        };
        let mut hash = Prf::new(&[0u8; 16]).unwrap();
        let mut buf = vec![0u8; 1024];
        format_root_block(&mut rp, &mut hash, &mut buf);

        // 10 полных реплик по 96 байт, дальше циклический паддинг.
        let tail_start = (1024 / ROOT_PTR_SIZE) * ROOT_PTR_SIZE;
        for i in tail_start..1024 {
            assert_eq!(buf[i], ROOT_PTR_PADDING[i % ROOT_PTR_PADDING.len()]);
        }
    }
}
