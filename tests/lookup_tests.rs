use std::fmt::Write as _;
use std::fs::File;
use std::sync::Arc;

use arrow::array::{ArrayRef, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use lookup_viewer::storage::{LookupStore, StorageError, PAGE_SIZE};
use parquet::arrow::ArrowWriter;
use serde_json::Value;

fn write(dir: &tempfile::TempDir, name: &str, contents: &str) -> String {
    let path = dir.path().join(name);
    std::fs::write(&path, contents).unwrap();
    path.to_string_lossy().to_string()
}

fn lookup_csv(rows: usize) -> String {
    let mut csv = String::from("uuid,filepath,x\n");
    for i in 0..rows {
        writeln!(csv, "id-{i},/data/shard{},{i}", i % 4).unwrap();
    }
    csv
}

fn write_lookup_parquet(dir: &tempfile::TempDir, name: &str, rows: usize) -> String {
    let path = dir.path().join(name);
    let schema = Arc::new(Schema::new(vec![
        Field::new("uuid", DataType::Utf8, false),
        Field::new("filepath", DataType::Utf8, true),
        Field::new("x", DataType::Int64, false),
    ]));

    let uuids: Vec<String> = (0..rows).map(|i| format!("id-{i}")).collect();
    let filepaths: Vec<Option<String>> = (0..rows)
        .map(|i| (i % 5 != 0).then(|| format!("/data/shard{}", i % 2)))
        .collect();
    let xs: Vec<i64> = (0..rows as i64).collect();

    let batch = RecordBatch::try_new(
        Arc::clone(&schema),
        vec![
            Arc::new(StringArray::from(uuids)) as ArrayRef,
            Arc::new(StringArray::from(filepaths)),
            Arc::new(Int64Array::from(xs)),
        ],
    )
    .unwrap();

    let mut writer = ArrowWriter::try_new(File::create(&path).unwrap(), schema, None).unwrap();
    writer.write(&batch).unwrap();
    writer.close().unwrap();
    path.to_string_lossy().to_string()
}

#[test]
fn test_load_csv_summary() {
    let dir = tempfile::tempdir().unwrap();
    let store = LookupStore::new();
    let path = write(&dir, "lookup.csv", &lookup_csv(10));

    let summary = store.load(&path).unwrap();
    assert_eq!(summary.total_records, 10);
    assert_eq!(summary.unique_filepaths, 4);
    assert_eq!(summary.columns, vec!["uuid", "filepath", "x"]);
}

#[test]
fn test_load_extension_is_case_insensitive() {
    let dir = tempfile::tempdir().unwrap();
    let store = LookupStore::new();
    let path = write(&dir, "LOOKUP.CSV", &lookup_csv(3));

    assert_eq!(store.load(&path).unwrap().total_records, 3);
}

#[test]
fn test_load_parquet_summary_counts_null_filepath_once() {
    let dir = tempfile::tempdir().unwrap();
    let store = LookupStore::new();
    let path = write_lookup_parquet(&dir, "lookup.parquet", 20);

    let summary = store.load(&path).unwrap();
    assert_eq!(summary.total_records, 20);
    // shard0, shard1 and null
    assert_eq!(summary.unique_filepaths, 3);
    assert_eq!(summary.columns, vec!["uuid", "filepath", "x"]);

    let page = store.get_page(0).unwrap();
    assert_eq!(page[0]["filepath"], Value::Null);
    assert_eq!(page[1]["filepath"], "/data/shard1");
    assert_eq!(page[1]["x"], 1);
}

#[test]
fn test_pagination_over_250_rows() {
    let dir = tempfile::tempdir().unwrap();
    let store = LookupStore::new();
    let path = write(&dir, "lookup.csv", &lookup_csv(250));
    store.load(&path).unwrap();

    let first = store.get_page(0).unwrap();
    assert_eq!(first.len(), PAGE_SIZE);
    for (i, row) in first.iter().enumerate() {
        assert_eq!(row["uuid"], format!("id-{i}").as_str());
    }

    let last = store.get_page(2).unwrap();
    assert_eq!(last.len(), 50);
    assert_eq!(last[0]["uuid"], "id-200");
    assert_eq!(last[49]["uuid"], "id-249");

    assert!(store.get_page(3).unwrap().is_empty());
    assert!(store.get_page(usize::MAX).unwrap().is_empty());
}

#[test]
fn test_page_rows_keep_column_order() {
    let dir = tempfile::tempdir().unwrap();
    let store = LookupStore::new();
    let path = write(&dir, "lookup.csv", &lookup_csv(1));
    store.load(&path).unwrap();

    let page = store.get_page(0).unwrap();
    let keys: Vec<&str> = page[0].keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["uuid", "filepath", "x"]);
}

#[test]
fn test_page_without_table_fails() {
    let store = LookupStore::new();
    assert!(matches!(store.get_page(0), Err(StorageError::NoTableLoaded)));
}

#[test]
fn test_schema_error_still_replaces_table() {
    let dir = tempfile::tempdir().unwrap();
    let store = LookupStore::new();

    let good = write(&dir, "good.csv", &lookup_csv(5));
    store.load(&good).unwrap();

    let bad = write(&dir, "bad.csv", "uuid,other\na,1\nb,2\n");
    match store.load(&bad) {
        Err(StorageError::Schema { missing }) => assert_eq!(missing, vec!["filepath"]),
        other => panic!("expected schema error, got {other:?}"),
    }

    let page = store.get_page(0).unwrap();
    assert_eq!(page.len(), 2);
    assert_eq!(page[0]["uuid"], "a");
    assert!(page[0].get("filepath").is_none());
}

#[test]
fn test_schema_error_lists_all_missing_columns() {
    let dir = tempfile::tempdir().unwrap();
    let store = LookupStore::new();
    let path = write(&dir, "bad.csv", "a,b\n1,2\n");

    match store.load(&path) {
        Err(StorageError::Schema { missing }) => {
            assert_eq!(missing, vec!["uuid", "filepath"])
        }
        other => panic!("expected schema error, got {other:?}"),
    }
}

#[test]
fn test_missing_path_keeps_previous_table() {
    let dir = tempfile::tempdir().unwrap();
    let store = LookupStore::new();
    let good = write(&dir, "good.csv", &lookup_csv(5));
    store.load(&good).unwrap();

    let absent = dir.path().join("absent.csv").to_string_lossy().to_string();
    assert!(matches!(
        store.load(&absent),
        Err(StorageError::PathNotFound(p)) if p == absent
    ));
    assert_eq!(store.get_page(0).unwrap().len(), 5);
}

#[test]
fn test_unsupported_format() {
    let dir = tempfile::tempdir().unwrap();
    let store = LookupStore::new();
    let path = write(&dir, "lookup.json", "[]");

    assert!(matches!(
        store.load(&path),
        Err(StorageError::UnsupportedFormat)
    ));
    assert!(matches!(store.get_page(0), Err(StorageError::NoTableLoaded)));
}

#[test]
fn test_parse_failure_keeps_previous_table() {
    let dir = tempfile::tempdir().unwrap();
    let store = LookupStore::new();
    let good = write(&dir, "good.csv", &lookup_csv(5));
    store.load(&good).unwrap();

    let corrupt = write(&dir, "corrupt.parquet", "not a parquet file");
    assert!(matches!(
        store.load(&corrupt),
        Err(StorageError::Parquet(_))
    ));
    assert_eq!(store.get_page(0).unwrap().len(), 5);
}

#[test]
fn test_duplicate_uuids_are_tolerated() {
    let dir = tempfile::tempdir().unwrap();
    let store = LookupStore::new();
    let path = write(
        &dir,
        "dupes.csv",
        "uuid,filepath\nsame,/data/a\nsame,/data/a\nother,/data/b\n",
    );

    let summary = store.load(&path).unwrap();
    assert_eq!(summary.total_records, 3);
    assert_eq!(summary.unique_filepaths, 2);
}

#[test]
fn test_empty_path_is_bad_request() {
    let store = LookupStore::new();
    assert!(matches!(store.load(""), Err(StorageError::BadRequest(_))));
}
