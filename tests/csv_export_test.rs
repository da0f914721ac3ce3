//! CSVエクスポートの統合テスト
//!
//! 外部のCSVパーサー（csvクレート）で読み戻し、ラウンドトリップで
//! セル値が完全に復元されることを検証する

use snapsheet::csv::{escape_cell, export_csv, to_csv, DEFAULT_EXPORT_FILENAME};
use snapsheet::table::TableData;
use tempfile::tempdir;

fn table(rows: &[&[&str]]) -> TableData {
    TableData::new(
        rows.iter()
            .map(|r| r.iter().map(|c| c.to_string()).collect())
            .collect(),
    )
}

/// CSVテキストを独立したパーサーで読み戻す
fn parse_back(csv_text: &str) -> Vec<Vec<String>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(csv_text.as_bytes());

    reader
        .records()
        .map(|r| r.expect("CSVパース失敗").iter().map(String::from).collect())
        .collect()
}

#[test]
fn test_roundtrip_simple() {
    let original = table(&[&["Name", "Age"], &["Alice", "30"], &["Bob", "25"]]);
    let parsed = parse_back(&to_csv(&original));
    assert_eq!(parsed, original.rows);
}

#[test]
fn test_roundtrip_commas_quotes_newlines() {
    let original = table(&[
        &["header, with comma", "plain"],
        &["he said \"hi\"", "line1\nline2"],
        &["", "trailing,comma,"],
    ]);
    let parsed = parse_back(&to_csv(&original));
    assert_eq!(parsed, original.rows);
}

#[test]
fn test_roundtrip_japanese_cells() {
    let original = table(&[&["品名", "数量"], &["鉄筋 D13", "100"]]);
    let parsed = parse_back(&to_csv(&original));
    assert_eq!(parsed, original.rows);
}

#[test]
fn test_escaping_examples() {
    // 特殊文字なしはそのまま
    assert_eq!(escape_cell("hello"), "hello");
    // カンマ入り
    assert_eq!(escape_cell("a,b"), "\"a,b\"");
    // クォート入り（内部のクォートは2重になる）
    assert_eq!(escape_cell("he said \"hi\""), "\"he said \"\"hi\"\"\"");
}

#[test]
fn test_export_to_file_and_read_back() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("result.csv");

    let original = table(&[&["A", "B"], &["1,5", "x"]]);
    let written = export_csv(&original, Some(&path)).unwrap().unwrap();

    let content = std::fs::read_to_string(&written).unwrap();
    assert_eq!(parse_back(&content), original.rows);
}

#[test]
fn test_export_empty_table_creates_nothing() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("empty.csv");

    let result = export_csv(&TableData::default(), Some(&path)).unwrap();
    assert!(result.is_none());
    assert!(!path.exists());
}

#[test]
fn test_default_export_filename() {
    assert_eq!(DEFAULT_EXPORT_FILENAME, "snapsheet-export.csv");
}
