//! Ordered schema steps for the notes store.
//!
//! Step `n` brings the store from `PRAGMA user_version = n - 1` to `n`. All
//! pending steps of one open run inside a single transaction.

use crate::db::{DbError, DbResult};
use log::info;
use rusqlite::{Connection, Transaction};

#[derive(Debug, Clone, Copy)]
struct Migration {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        name: "users",
        sql: include_str!("0001_users.sql"),
    },
    Migration {
        version: 2,
        name: "notes",
        sql: include_str!("0002_notes.sql"),
    },
];

/// Schema version a fully migrated store reports.
pub fn latest_version() -> u32 {
    MIGRATIONS.last().map_or(0, |migration| migration.version)
}

/// Brings `conn` up to [`latest_version`].
///
/// Refuses stores written by a newer build instead of guessing at their shape.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let from_version = schema_version(conn)?;
    let latest = latest_version();

    if from_version > latest {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: from_version,
            latest_supported: latest,
        });
    }
    if from_version == latest {
        return Ok(());
    }

    let tx = conn.transaction()?;
    for migration in MIGRATIONS.iter().filter(|step| step.version > from_version) {
        run_step(&tx, migration)?;
    }
    tx.commit()?;

    info!(
        "event=db_migrate module=db status=ok from_version={} to_version={}",
        from_version, latest
    );
    Ok(())
}

fn run_step(tx: &Transaction<'_>, migration: &Migration) -> DbResult<()> {
    let bump = format!("PRAGMA user_version = {};", migration.version);
    tx.execute_batch(migration.sql)
        .and_then(|()| tx.execute_batch(&bump))
        .map_err(|source| DbError::Migration {
            version: migration.version,
            name: migration.name,
            source,
        })?;
    info!(
        "event=db_migrate_step module=db status=ok version={} name={}",
        migration.version, migration.name
    );
    Ok(())
}

fn schema_version(conn: &Connection) -> DbResult<u32> {
    Ok(conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?)
}
