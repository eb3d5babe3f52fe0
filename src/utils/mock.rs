use std::{
    fs,
    path::PathBuf,
    sync::atomic::{AtomicU64, Ordering},
    time::{SystemTime, UNIX_EPOCH},
};

use tempfile::env::temp_dir;

use crate::{database::Database, types::error::Result};

static SEQUENCE: AtomicU64 = AtomicU64::new(0);

pub fn get_unix_timestamp_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("Time went backwards")
        .as_millis()
}

pub fn create_temp_db_path_with_prefix(prefix: &str) -> PathBuf {
    let mut temp_path = temp_dir();
    temp_path.push(format!(
        "{}_{}_{}.db",
        prefix,
        get_unix_timestamp_millis(),
        SEQUENCE.fetch_add(1, Ordering::Relaxed)
    ));
    temp_path
}

pub fn create_temp_db_path() -> PathBuf {
    create_temp_db_path_with_prefix("sqlt_test")
}

/// A scratch database file removed on drop, for tests.
pub struct TempDatabase {
    pub path: PathBuf,
    pub database: Option<Database>,
}

impl TempDatabase {
    pub fn new() -> Self {
        Self {
            path: create_temp_db_path(),
            database: None,
        }
    }

    pub fn with_prefix(prefix: &str) -> Self {
        Self {
            path: create_temp_db_path_with_prefix(prefix),
            database: None,
        }
    }

    pub fn open_database(&mut self) -> Result<&mut Database> {
        let database = Database::open(&self.path)?;
        self.database = Some(database);
        Ok(self.database.as_mut().unwrap())
    }

    pub fn get_database(&mut self) -> Option<&mut Database> {
        self.database.as_mut()
    }

    /// Close the open handle, flushing the header, without deleting the
    /// file; reopen with `open_database`.
    pub fn close_database(&mut self) -> Result<()> {
        if let Some(database) = self.database.take() {
            database.close()?;
        }
        Ok(())
    }
}

impl Default for TempDatabase {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for TempDatabase {
    fn drop(&mut self) {
        self.database = None;
        if self.path.exists() {
            let _ = fs::remove_file(&self.path);
        }
    }
}
