//! Catalog schema versions.
//!
//! Each step is an embedded SQL script keyed by the `user_version` it leaves
//! behind. Pending steps run in order inside one transaction, so a store is
//! either at its previous version or fully upgraded, never in between.

use crate::db::{DbError, DbResult};
use log::{debug, info};
use rusqlite::Connection;
use std::cmp::Ordering;

struct SchemaStep {
    version: u32,
    name: &'static str,
    script: &'static str,
}

const SCHEMA_STEPS: &[SchemaStep] = &[
    SchemaStep {
        version: 1,
        name: "catalog_tables",
        script: include_str!("0001_init.sql"),
    },
    SchemaStep {
        version: 2,
        name: "builtin_roles",
        script: include_str!("0002_builtin_roles.sql"),
    },
];

/// Schema version a freshly opened catalog store ends up at.
pub fn latest_version() -> u32 {
    SCHEMA_STEPS.last().map_or(0, |step| step.version)
}

/// Brings the catalog schema on `conn` up to `latest_version()`.
///
/// # Errors
/// - `DbError::UnsupportedSchemaVersion` when the store was written by a
///   newer build; the store is left untouched.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let found = schema_version(conn)?;
    let latest = latest_version();

    match found.cmp(&latest) {
        Ordering::Greater => {
            return Err(DbError::UnsupportedSchemaVersion {
                db_version: found,
                latest_supported: latest,
            })
        }
        Ordering::Equal => {
            debug!("event=db_migrate module=db status=skipped version={found}");
            return Ok(());
        }
        Ordering::Less => {}
    }

    let tx = conn.transaction()?;
    for step in SCHEMA_STEPS.iter().skip_while(|step| step.version <= found) {
        tx.execute_batch(step.script)?;
        tx.pragma_update(None, "user_version", step.version)?;
        debug!(
            "event=db_migrate module=db status=step version={} name={}",
            step.version, step.name
        );
    }
    tx.commit()?;

    info!("event=db_migrate module=db status=ok from_version={found} to_version={latest}");
    Ok(())
}

fn schema_version(conn: &Connection) -> DbResult<u32> {
    Ok(conn.pragma_query_value(None, "user_version", |row| row.get(0))?)
}
