use anyhow::Result;
use std::fs::{self, OpenOptions};
use std::path::PathBuf;

use shades::{Db, Params};

fn unique_path(prefix: &str) -> PathBuf {
    let pid = std::process::id();
    let t = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("shades-{}-{}-{}.db", prefix, pid, t))
}

#[test]
fn file_device_end_to_end() -> Result<()> {
    let path = unique_path("filedev");

    let mut params = Params::new();
    params.page_size = 1024;

    // 1) Создание и запись в файл.
    let file = OpenOptions::new()
        .create_new(true)
        .read(true)
        .write(true)
        .open(&path)?;
    let mut db = Db::create(params, Box::new(file))?;

    let mut tr = db.new_transaction(true)?;
    let (r, id) = tr.new_page(&mut db)?;
    {
        let buf = db.page_data(&r);
        for (i, b) in buf.iter_mut().enumerate() {
            *b = (i % 251) as u8;
        }
    }
    db.release(r);
    tr.commit(&mut db)?;
    db.close()?;

    // 2) Переоткрытие того же файла и проверка.
    let file = OpenOptions::new().read(true).write(true).open(&path)?;
    let mut db = Db::open(Params::new(), Box::new(file))?;
    assert_eq!(db.page_size(), 1024);

    let tr = db.new_transaction(false)?;
    let r = tr.readable_page(&mut db, id)?;
    {
        let buf = db.page_read(&r);
        for (i, b) in buf.iter().enumerate() {
            assert_eq!(*b, (i % 251) as u8, "data[{}]", i);
        }
    }
    db.release(r);
    tr.commit(&mut db)?;
    db.close()?;

    fs::remove_file(&path)?;
    Ok(())
}
