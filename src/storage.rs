use anyhow::Result;
use lonb_application::storage::Storage;
use lonb_db_jfs::JsonFileDb;
use lonb_db_sqlite::Connections;

use crate::config::{Db, DbBackend};

/// Opens the configured primary store or falls back to memory.
pub fn open(cfg: &Db) -> Storage {
    let primary = match cfg.backend {
        DbBackend::Sqlite => open_sqlite(cfg).map_err(|err| {
            log::warn!(
                "Unable to open the sqlite database '{}': {err}",
                cfg.conn_sqlite
            );
        }),
        DbBackend::File => open_json_file(cfg).map_err(|err| {
            log::warn!(
                "Unable to open the JSON file store in '{}': {err}",
                cfg.file_dir.display()
            );
        }),
        DbBackend::Memory => Err(()),
    };
    primary.unwrap_or_else(|()| {
        log::warn!("Use the in-memory store: locations are lost on shutdown");
        Storage::in_memory()
    })
}

fn open_sqlite(cfg: &Db) -> Result<Storage> {
    let connections = Connections::open(&cfg.conn_sqlite, cfg.conn_pool_size)?;
    log::info!("Use sqlite database '{}'", cfg.conn_sqlite);
    Ok(Storage::sqlite(connections, cfg.conn_sqlite.clone()))
}

fn open_json_file(cfg: &Db) -> Result<Storage> {
    let db = JsonFileDb::try_new(&cfg.file_dir)?;
    log::info!("Use JSON file store '{}'", db.path().display());
    Ok(Storage::json_file(db))
}
