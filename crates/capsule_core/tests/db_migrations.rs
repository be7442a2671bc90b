use capsule_core::db::migrations::latest_version;
use capsule_core::db::{ensure_store_schema, open_db, open_db_in_memory, DbError, STORE_TABLE};
use rusqlite::Connection;

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn), latest_version());
    assert_table_exists(&conn, "kv_entries");
}

#[test]
fn opening_same_database_twice_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("capsules.db");

    let conn_first = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn_first), latest_version());
    drop(conn_first);

    let conn_second = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn_second), latest_version());
    assert_table_exists(&conn_second, "kv_entries");
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    match open_db(&path).unwrap_err() {
        DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        } => {
            assert_eq!(db_version, 999);
            assert_eq!(latest_supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn kv_entries_is_keyed_by_origin_then_key() {
    let conn = open_db_in_memory().unwrap();

    let mut stmt = conn
        .prepare("SELECT name, pk FROM pragma_table_info('kv_entries') WHERE pk > 0 ORDER BY pk;")
        .unwrap();
    let key_columns = stmt
        .query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?)))
        .unwrap()
        .collect::<Result<Vec<_>, _>>()
        .unwrap();

    assert_eq!(
        key_columns,
        vec![("origin".to_string(), 1), ("key".to_string(), 2)]
    );
}

#[test]
fn same_key_in_two_origins_occupies_two_rows() {
    let conn = open_db_in_memory().unwrap();
    conn.execute(
        "INSERT INTO kv_entries (origin, key, value, updated_at) VALUES ('a', 'visitCount', '1', 0), ('b', 'visitCount', '9', 0);",
        [],
    )
    .unwrap();

    let duplicate = conn.execute(
        "INSERT INTO kv_entries (origin, key, value, updated_at) VALUES ('a', 'visitCount', '2', 0);",
        [],
    );
    assert!(duplicate.is_err());
}

#[test]
fn store_schema_check_reports_missing_table_on_raw_connection() {
    let raw = Connection::open_in_memory().unwrap();
    match ensure_store_schema(&raw).unwrap_err() {
        DbError::MissingTable(table) => assert_eq!(table, STORE_TABLE),
        other => panic!("unexpected error: {other}"),
    }

    let migrated = open_db_in_memory().unwrap();
    ensure_store_schema(&migrated).unwrap();
}

fn schema_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
}

fn assert_table_exists(conn: &Connection, table_name: &str) {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1);",
            [table_name],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1, "expected table `{table_name}` to exist");
}
