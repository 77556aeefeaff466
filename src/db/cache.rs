//! db/cache — кэш страниц: фиксированная арена + clock-вытеснение.
//!
//! Арена — один преаллоцированный буфер (CACHE_ARENA_SIZE байт), нарезанный
//! на слоты по page_size; cached отображает PhysicalId -> слот. Вытеснение —
//! однострелочный clock по слотам, пропускающий refcount > 0; грязный слот
//! перед вытеснением сбрасывается на устройство.
//!
//! Инварианты:
//! - PageRef с refcount >= 1 обязан быть освобождён на каждом пути выхода;
//!   на этом держится вытеснение.
//! - pid 0 (root block) никогда не сбрасывается и не выкидывается из cached
//!   вытеснением; слот с root block'ом не выбирается жертвой.
//! - data() помечает слот грязным; грязные страницы живут в кэше до flush().

use anyhow::{anyhow, Result};
use std::collections::HashMap;

use crate::consts::CACHE_ARENA_SIZE;

use super::device::Device;
use super::pagetable::{PhysicalId, ROOT_BLOCK};

/// Ссылка на закэшированную физическую страницу. Не копируется; владелец
/// обязан вернуть её через Cache::release.
#[derive(Debug)]
pub struct PageRef {
    pub(crate) slot: usize,
    pid: PhysicalId,
}

impl PageRef {
    pub fn pid(&self) -> PhysicalId {
        self.pid
    }
}

#[derive(Clone, Copy)]
struct Slot {
    pid: PhysicalId,
    refcount: u32,
    dirty: bool,
}

/// Кэш страниц базы данных.
pub struct Cache {
    page_size: usize,
    buffer: Vec<u8>,
    slots: Vec<Slot>,
    clock: usize,
    cached: HashMap<PhysicalId, usize>,
}

impl Cache {
    /// Создать кэш с ареной CACHE_ARENA_SIZE / page_size слотов.
    pub fn new(page_size: usize) -> Result<Self> {
        let num = CACHE_ARENA_SIZE / page_size;
        if num == 0 {
            return Err(anyhow!("page size {} exceeds cache arena", page_size));
        }
        Ok(Self {
            page_size,
            buffer: vec![0u8; num * page_size],
            slots: vec![
                Slot {
                    pid: PhysicalId(0),
                    refcount: 0,
                    dirty: false,
                };
                num
            ],
            clock: 0,
            cached: HashMap::new(),
        })
    }

    /// Получить ссылку на физическую страницу; на промахе читает её с
    /// устройства в освобождённый слот.
    pub fn get(&mut self, dev: &dyn Device, pid: PhysicalId) -> Result<PageRef> {
        if let Some(&slot) = self.cached.get(&pid) {
            self.slots[slot].refcount += 1;
            return Ok(PageRef { slot, pid });
        }

        let slot = self.victim(dev)?;
        let range = slot * self.page_size..(slot + 1) * self.page_size;
        dev.read_at(
            &mut self.buffer[range],
            pid.pagenum() * self.page_size as u64,
        )?;
        self.slots[slot] = Slot {
            pid,
            refcount: 1,
            dirty: false,
        };
        self.cached.insert(pid, slot);
        Ok(PageRef { slot, pid })
    }

    /// Установить новую страницу без чтения устройства: нули или копия init.
    /// pid не должен быть уже закэширован.
    pub fn new_page(
        &mut self,
        dev: &dyn Device,
        pid: PhysicalId,
        init: Option<&PageRef>,
    ) -> Result<PageRef> {
        if self.cached.contains_key(&pid) {
            return Err(anyhow!("page {} already cached", pid));
        }
        let src = init.map(|r| r.slot);
        let slot = self.victim(dev)?;
        let ps = self.page_size;
        match src {
            Some(s) => self.buffer.copy_within(s * ps..(s + 1) * ps, slot * ps),
            None => self.buffer[slot * ps..(slot + 1) * ps].fill(0),
        }
        self.slots[slot] = Slot {
            pid,
            refcount: 1,
            dirty: true,
        };
        self.cached.insert(pid, slot);
        Ok(PageRef { slot, pid })
    }

    /// Данные страницы только для чтения.
    pub fn read(&self, r: &PageRef) -> &[u8] {
        debug_assert_eq!(self.slots[r.slot].pid, r.pid);
        &self.buffer[r.slot * self.page_size..(r.slot + 1) * self.page_size]
    }

    /// Данные страницы на запись: слот помечается грязным и будет сброшен
    /// при flush().
    pub fn data(&mut self, r: &PageRef) -> &mut [u8] {
        debug_assert_eq!(self.slots[r.slot].pid, r.pid);
        self.slots[r.slot].dirty = true;
        &mut self.buffer[r.slot * self.page_size..(r.slot + 1) * self.page_size]
    }

    /// Дополнительное удержание ссылки.
    pub fn retain(&mut self, r: &PageRef) {
        self.slots[r.slot].refcount += 1;
    }

    /// Освободить ссылку.
    pub fn release(&mut self, r: PageRef) {
        let slot = &mut self.slots[r.slot];
        assert!(slot.refcount > 0, "releasing unreferenced page");
        slot.refcount -= 1;
    }

    /// Сбросить все грязные резидентные страницы; первая ошибка I/O
    /// прерывает проход.
    pub fn flush(&mut self, dev: &dyn Device) -> Result<()> {
        let ps = self.page_size;
        for slot in 0..self.slots.len() {
            let s = self.slots[slot];
            if !s.dirty || self.cached.get(&s.pid) != Some(&slot) {
                continue;
            }
            dev.write_at(
                &self.buffer[slot * ps..(slot + 1) * ps],
                s.pid.pagenum() * ps as u64,
            )?;
            self.slots[slot].dirty = false;
        }
        Ok(())
    }

    /// Выкинуть незанятую грязную страницу без записи (откат транзакции).
    pub fn discard(&mut self, pid: PhysicalId) {
        if let Some(&slot) = self.cached.get(&pid) {
            if self.slots[slot].refcount == 0 {
                self.slots[slot].dirty = false;
                self.cached.remove(&pid);
            }
        }
    }

    /// Число резидентных страниц (диагностика).
    pub fn len(&self) -> usize {
        self.cached.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cached.is_empty()
    }

    /// Найти и освободить слот-жертву: полный оборот clock'а без кандидата —
    /// рабочее множество не помещается в кэш.
    fn victim(&mut self, dev: &dyn Device) -> Result<usize> {
        let start = self.clock;
        loop {
            let slot = self.clock;
            let s = self.slots[slot];
            let is_root = s.pid == ROOT_BLOCK && self.cached.get(&ROOT_BLOCK) == Some(&slot);
            if s.refcount == 0 && !is_root {
                self.evict(dev, slot)?;
                return Ok(slot);
            }
            self.clock = (self.clock + 1) % self.slots.len();
            if self.clock == start {
                return Err(anyhow!("working set too big"));
            }
        }
    }

    /// Освободить занятый слот: сброс грязных данных и снятие отображения.
    /// Свободные слоты (нет записи в cached) не трогаются.
    fn evict(&mut self, dev: &dyn Device, slot: usize) -> Result<()> {
        let s = self.slots[slot];
        if self.cached.get(&s.pid) != Some(&slot) {
            return Ok(());
        }
        if s.dirty {
            let ps = self.page_size;
            dev.write_at(
                &self.buffer[slot * ps..(slot + 1) * ps],
                s.pid.pagenum() * ps as u64,
            )?;
            self.slots[slot].dirty = false;
        }
        self.cached.remove(&s.pid);
        Ok(())
    }
}
