use rusqlite::Connection;
use taskflow_core::db::open_db_in_memory;
use taskflow_core::{KeyValueRepository, RepoError, SqliteKvRepository};

fn repo() -> SqliteKvRepository {
    SqliteKvRepository::try_new(open_db_in_memory().unwrap()).unwrap()
}

#[test]
fn get_missing_key_returns_none() {
    assert_eq!(repo().get("@absent").unwrap(), None);
}

#[test]
fn set_overwrites_previous_value() {
    let repo = repo();

    repo.set("@k", "first").unwrap();
    repo.set("@k", "second").unwrap();

    assert_eq!(repo.get("@k").unwrap().as_deref(), Some("second"));
    let rows: i64 = repo
        .connection()
        .query_row("SELECT COUNT(*) FROM kv_store;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(rows, 1);
}

#[test]
fn remove_reports_whether_a_value_existed() {
    let repo = repo();
    repo.set("@k", "v").unwrap();

    assert!(repo.remove("@k").unwrap());
    assert!(!repo.remove("@k").unwrap());
    assert_eq!(repo.get("@k").unwrap(), None);
}

#[test]
fn blank_keys_are_rejected() {
    let repo = repo();

    assert!(matches!(repo.get("  "), Err(RepoError::InvalidData(_))));
    assert!(matches!(repo.set("", "v"), Err(RepoError::InvalidData(_))));
}

#[test]
fn try_new_rejects_unmigrated_connection() {
    let conn = Connection::open_in_memory().unwrap();

    let err = SqliteKvRepository::try_new(conn).err().unwrap();
    assert!(err.to_string().contains("kv_store"));
}
