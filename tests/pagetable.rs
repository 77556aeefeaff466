use anyhow::Result;
use rand::Rng;

use shades::{Db, LogicalId, MemDevice, Params, PhysicalId};

#[test]
fn open_rediscovers_page_size() -> Result<()> {
    let dev = MemDevice::new(1024 * 1024);
    let db = Db::create(Params::new(), Box::new(dev.clone()))?;
    assert_eq!(db.page_size(), 16 * 1024);
    drop(db);

    let mut params = Params::new();
    params.page_size = 1024;
    let db = Db::open(params, Box::new(dev.clone()))?;
    assert_eq!(db.page_size(), 16 * 1024);
    Ok(())
}

#[test]
fn unmapped_ids_fail() -> Result<()> {
    let dev = MemDevice::new(1024 * 1024);
    let mut db = Db::create(Params::new(), Box::new(dev.clone()))?;

    // Логический 0 зарезервирован и не отображён.
    let err = db.mapping_get(LogicalId::new(0, 0, 0)).unwrap_err();
    assert!(err.to_string().contains("unmapped page"));

    // За пределами ёмкости текущей глубины.
    let beyond = db.ids_per_page();
    let err = db.mapping_get(LogicalId::new(0, 0, beyond)).unwrap_err();
    assert!(err.to_string().contains("unmapped page"));
    Ok(())
}

#[test]
fn root_block_corruption_resilience() -> Result<()> {
    let dev = MemDevice::new(1024 * 1024);
    let db = Db::create(Params::new(), Box::new(dev.clone()))?;
    let page_size = db.page_size();
    drop(db);

    // До PageSize/96 - 1 испорченных байт в странице 0: хотя бы одна
    // реплика root pointer'а остаётся целой.
    let count = page_size / 96 - 1;
    let mut rng = rand::thread_rng();
    dev.with_bytes_mut(|bytes| {
        for _ in 0..count {
            let idx = rng.gen_range(0..page_size);
            bytes[idx] = bytes[idx].wrapping_add(1);
        }
    });

    let db = Db::open(Params::new(), Box::new(dev.clone()))?;
    assert_eq!(db.page_size(), page_size);
    Ok(())
}

#[test]
fn depth_grows_for_far_mapping() -> Result<()> {
    let dev = MemDevice::new(1024 * 1024);
    let mut params = Params::new();
    params.page_size = 1024;
    let mut db = Db::create(params, Box::new(dev.clone()))?;
    assert_eq!(db.depth(), 1);

    // pagenum = 128^3 - 1 требует три уровня; рост в одной транзакции.
    let per_page = db.ids_per_page();
    let target = per_page * per_page * per_page - 1;

    let mut tr = db.new_transaction(true)?;
    db.mapping_set(
        &mut tr,
        LogicalId::new(0, 0, target),
        PhysicalId::new(0, 4242),
    )?;
    tr.commit(&mut db)?;
    assert_eq!(db.depth(), 3);
    drop(db);

    let mut db = Db::open(Params::new(), Box::new(dev.clone()))?;
    assert_eq!(db.depth(), 3);
    assert_eq!(
        db.mapping_get(LogicalId::new(0, 0, target))?,
        PhysicalId::new(0, 4242)
    );
    Ok(())
}

#[test]
fn three_level_population_survives_reopen() -> Result<()> {
    let dev = MemDevice::new(1024 * 1024 * 1024);
    let mut params = Params::new();
    params.page_size = 1024;
    let mut db = Db::create(params, Box::new(dev.clone()))?;

    let per_page = db.ids_per_page();
    let count = per_page * per_page * per_page;

    // Отобразить первый и последний ID каждого листа.
    let mut tr = db.new_transaction(true)?;
    let mut i = 0u64;
    while i < count {
        db.mapping_set(&mut tr, LogicalId::new(0, 0, i), PhysicalId::new(0, i + 1))?;
        let last = i + per_page - 1;
        db.mapping_set(
            &mut tr,
            LogicalId::new(0, 0, last),
            PhysicalId::new(0, last + 1),
        )?;
        i += per_page;
    }
    tr.commit(&mut db)?;
    assert_eq!(db.depth(), 3);
    drop(db);

    let mut db = Db::open(Params::new(), Box::new(dev.clone()))?;
    let tr = db.new_transaction(false)?;
    let mut i = 0u64;
    while i < count {
        assert_eq!(
            db.mapping_get(LogicalId::new(0, 0, i))?.pagenum(),
            i + 1,
            "first of leaf at {}",
            i
        );
        let last = i + per_page - 1;
        assert_eq!(
            db.mapping_get(LogicalId::new(0, 0, last))?.pagenum(),
            last + 1,
            "last of leaf at {}",
            i
        );
        i += per_page;
    }
    tr.commit(&mut db)?;
    Ok(())
}
