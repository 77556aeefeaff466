//! db/transaction — базовая транзакция поверх кэша и таблицы страниц.
//!
//! В каждый момент существует не больше одной базовой транзакции (read-only
//! или read-write); попытка открыть вторую — ошибка busy на уровне
//! Db::new_transaction. Транзакция не держит ссылку на Db: все операции
//! принимают его явно, завершение — только commit() или abort().
//!
//! writable отображает new_pid -> old_pid теневых аллокаций; old_pid == 0
//! значит «страница новая, предшественника нет». По этой карте откат
//! выкидывает незафиксированные страницы, а повторный writable_page()
//! возвращает уже созданную тень.

use anyhow::{anyhow, Result};
use std::collections::HashMap;

use super::cache::PageRef;
use super::pagetable::{LogicalId, PhysicalId};
use super::Db;

/// Базовая транзакция.
#[derive(Debug)]
pub struct Transaction {
    pub(crate) rw: bool,
    pub(crate) writable: HashMap<PhysicalId, PhysicalId>,
}

impl Transaction {
    pub(crate) fn new(rw: bool) -> Self {
        Self {
            rw,
            writable: HashMap::new(),
        }
    }

    /// Транзакция открыта на запись?
    pub fn rw(&self) -> bool {
        self.rw
    }

    /// Аллоцировать новую страницу: свежие логический и физический
    /// идентификаторы, отображение в таблице, нулевая страница в кэше.
    /// Возвращённая ссылка принадлежит вызывающему.
    pub fn new_page(&mut self, db: &mut Db) -> Result<(PageRef, LogicalId)> {
        if !self.rw {
            return Err(anyhow!("read-only transaction"));
        }
        let id = db.table.alloc_logical_id()?;
        let pid = db.table.alloc_physical_id()?;
        db.table.set(&mut db.cache, &*db.device, self, id, pid)?;
        self.writable.insert(pid, PhysicalId(0));

        let r = match db.cache.new_page(&*db.device, pid, None) {
            Ok(r) => r,
            Err(e) => {
                self.writable.remove(&pid);
                db.table.free_physical_id(pid);
                db.table.free_logical_id(id);
                return Err(e);
            }
        };
        // Пин кэша поверх владения вызывающего.
        db.cache.retain(&r);
        Ok((r, id))
    }

    /// Ссылка на страницу id только для чтения.
    pub fn readable_page(&self, db: &mut Db, id: LogicalId) -> Result<PageRef> {
        let pid = db.table.get(&mut db.cache, &*db.device, id)?;
        db.cache.get(&*db.device, pid)
    }

    /// Записываемая ссылка на страницу id. Первый вызов создаёт теневую
    /// копию и перевешивает отображение; повторные возвращают ту же тень.
    pub fn writable_page(&mut self, db: &mut Db, id: LogicalId) -> Result<PageRef> {
        if !self.rw {
            return Err(anyhow!("read-only transaction"));
        }
        let pid = db.table.get(&mut db.cache, &*db.device, id)?;
        if self.writable.contains_key(&pid) {
            // Страница уже записываема в этой транзакции.
            return db.cache.get(&*db.device, pid);
        }

        // Теневая копия страницы.
        let new_pid = db.table.alloc_physical_id()?;
        let old = db.cache.get(&*db.device, pid)?;
        let new = match db.cache.new_page(&*db.device, new_pid, Some(&old)) {
            Ok(r) => r,
            Err(e) => {
                db.cache.release(old);
                db.table.free_physical_id(new_pid);
                return Err(e);
            }
        };
        db.cache.release(old);

        if let Err(e) = db.table.set(&mut db.cache, &*db.device, self, id, new_pid) {
            db.cache.release(new);
            db.table.free_physical_id(new_pid);
            return Err(e);
        }
        self.writable.insert(new_pid, pid);
        Ok(new)
    }

    /// Зафиксировать транзакцию.
    pub fn commit(self, db: &mut Db) -> Result<()> {
        db.table.commit(&mut db.cache, &*db.device, &self)
    }

    /// Откатить транзакцию.
    pub fn abort(self, db: &mut Db) -> Result<()> {
        db.table.abort(&mut db.cache, &self)
    }
}
