//! Shared SQLite connection tuning

use rusqlite::Connection;

/// WAL journal, relaxed sync, in-memory temp tables. For connections that write.
pub fn apply_optimized_pragmas(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        "PRAGMA journal_mode = WAL;
         PRAGMA synchronous = NORMAL;
         PRAGMA temp_store = MEMORY;
         PRAGMA cache_size = -16000;",
    )
}

/// Session-only tuning for read-only connections; never touches the file.
pub fn apply_read_pragmas(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        "PRAGMA temp_store = MEMORY;
         PRAGMA cache_size = -16000;
         PRAGMA query_only = ON;",
    )
}
