use anyhow::Result;
use byteorder::{BigEndian, ByteOrder};

use shades::{Db, MemDevice, Params};

fn mem_db(page_size: usize, device_size: usize) -> (Db, MemDevice) {
    let dev = MemDevice::new(device_size);
    let mut params = Params::new();
    params.page_size = page_size;
    let db = Db::create(params, Box::new(dev.clone())).expect("create");
    (db, dev)
}

#[test]
fn readonly_transaction_rejects_writes() -> Result<()> {
    let (mut db, _dev) = mem_db(1024, 1024 * 1024);

    let mut tr = db.new_transaction(false)?;
    let err = tr.new_page(&mut db).unwrap_err();
    assert!(err.to_string().contains("read-only transaction"));
    tr.commit(&mut db)?;
    Ok(())
}

#[test]
fn second_base_transaction_is_busy() -> Result<()> {
    let (mut db, _dev) = mem_db(1024, 1024 * 1024);

    let tr = db.new_transaction(false)?;
    let err = db.new_transaction(false).unwrap_err();
    assert!(err.to_string().contains("base transaction already active"));
    tr.commit(&mut db)?;

    // После завершения транзакции база снова доступна.
    let tr = db.new_transaction(true)?;
    tr.commit(&mut db)?;
    Ok(())
}

#[test]
fn write_commit_reopen_read() -> Result<()> {
    let dev = MemDevice::new(1024 * 1024);
    let mut params = Params::new();
    params.page_size = 1024;
    let mut db = Db::create(params, Box::new(dev.clone()))?;

    // 1) Запись страницы: первые 8 байт — её логический ID, дальше i as u8.
    let mut tr = db.new_transaction(true)?;
    let (r, id) = tr.new_page(&mut db)?;
    {
        let buf = db.page_data(&r);
        BigEndian::write_u64(&mut buf[..8], id.0);
        for (i, b) in buf.iter_mut().enumerate().skip(8) {
            *b = i as u8;
        }
    }
    db.release(r);
    tr.commit(&mut db)?;
    drop(db);

    // 2) Переоткрытие: page_size из root block'а, чужой из params игнорируется.
    let mut params = Params::new();
    params.page_size = 64 * 1024;
    let mut db = Db::open(params, Box::new(dev.clone()))?;
    assert_eq!(db.page_size(), 1024);

    let tr = db.new_transaction(false)?;
    let r = tr.readable_page(&mut db, id)?;
    {
        let buf = db.page_read(&r);
        assert_eq!(BigEndian::read_u64(&buf[..8]), id.0);
        for (i, b) in buf.iter().enumerate().skip(8) {
            assert_eq!(*b, i as u8, "data[{}]", i);
        }
    }
    db.release(r);
    tr.commit(&mut db)?;
    Ok(())
}

#[test]
fn writable_page_shadow_is_reused() -> Result<()> {
    let (mut db, _dev) = mem_db(1024, 1024 * 1024);

    let mut tr = db.new_transaction(true)?;
    let (r, id) = tr.new_page(&mut db)?;
    db.page_data(&r)[8] = 0x11;
    db.release(r);
    tr.commit(&mut db)?;

    let original = db.mapping_get(id)?;

    // Двойная запись одного логического ID в одной транзакции: обе ссылки
    // указывают на одну и ту же тень.
    let mut tr = db.new_transaction(true)?;
    let r1 = tr.writable_page(&mut db, id)?;
    let shadow = r1.pid();
    assert_ne!(shadow, original);
    assert_eq!(db.page_read(&r1)[8], 0x11);
    db.page_data(&r1)[9] = 0x22;
    db.release(r1);

    let r2 = tr.writable_page(&mut db, id)?;
    assert_eq!(r2.pid(), shadow);
    assert_eq!(db.page_read(&r2)[9], 0x22);
    db.page_data(&r2)[10] = 0x33;
    db.release(r2);
    tr.commit(&mut db)?;

    // После коммита логический ID отображается в тень.
    assert_eq!(db.mapping_get(id)?, shadow);

    let tr = db.new_transaction(false)?;
    let r = tr.readable_page(&mut db, id)?;
    let buf = db.page_read(&r);
    assert_eq!(&buf[8..11], &[0x11, 0x22, 0x33]);
    db.release(r);
    tr.commit(&mut db)?;
    Ok(())
}

#[test]
fn abort_discards_changes() -> Result<()> {
    let (mut db, _dev) = mem_db(1024, 1024 * 1024);

    let mut tr = db.new_transaction(true)?;
    let (r, id) = tr.new_page(&mut db)?;
    db.page_data(&r)[8] = 0xaa;
    db.release(r);
    tr.commit(&mut db)?;

    let generation = db.generation();
    let original = db.mapping_get(id)?;

    let mut tr = db.new_transaction(true)?;
    let r = tr.writable_page(&mut db, id)?;
    db.page_data(&r)[8] = 0xbb;
    db.release(r);
    tr.abort(&mut db)?;

    // Откат: поколение и отображение не изменились, данные прежние.
    assert_eq!(db.generation(), generation);
    assert_eq!(db.mapping_get(id)?, original);

    let tr = db.new_transaction(false)?;
    let r = tr.readable_page(&mut db, id)?;
    assert_eq!(db.page_read(&r)[8], 0xaa);
    db.release(r);
    tr.commit(&mut db)?;
    Ok(())
}
