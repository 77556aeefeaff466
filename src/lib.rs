// Базовые модули
pub mod consts;
pub mod crypto;

// Слой хранения (страницы, кэш, таблица, транзакции)
pub mod db; // src/db/{mod,device,params,cache,pagetable,transaction}.rs

// SSE-протоколы (SKS/BXT поверх T-Set/X-Set)
pub mod sse; // src/sse/{mod,id,encrypt,xset,tset,sks,bxt}.rs

// Токенизатор полнотекстового индекса
pub mod fti;

// Удобные реэкспорты
pub use db::{Db, Device, LogicalId, MemDevice, PageRef, Params, PhysicalId, Transaction};
pub use sse::{Bxt, KeywordIndex, Sks, Sse};
