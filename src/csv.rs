//! CSVエクスポート
//!
//! 標準的なCSVクォート規則: カンマ・ダブルクォート・改行を含むセルは
//! ダブルクォートで囲み、内部のダブルクォートは2重にする

use crate::error::Result;
use crate::table::TableData;
use std::path::{Path, PathBuf};

/// 出力ファイル名（未指定時）
pub const DEFAULT_EXPORT_FILENAME: &str = "snapsheet-export.csv";

/// 1セルをCSV用にエスケープする
///
/// 特殊文字を含まないセルはそのまま返す
pub fn escape_cell(cell: &str) -> String {
    if cell.contains(',') || cell.contains('"') || cell.contains('\n') {
        format!("\"{}\"", cell.replace('"', "\"\""))
    } else {
        cell.to_string()
    }
}

/// 表全体をCSVテキストにシリアライズする
pub fn to_csv(table: &TableData) -> String {
    table
        .rows
        .iter()
        .map(|row| {
            row.iter()
                .map(|cell| escape_cell(cell))
                .collect::<Vec<_>>()
                .join(",")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// 表をCSVファイルとして書き出す
///
/// 空の表は警告を出して何もしない（空ファイルは作らない）。
/// 書き出したパスを返す
pub fn export_csv(table: &TableData, output: Option<&Path>) -> Result<Option<PathBuf>> {
    if table.is_empty() {
        eprintln!("⚠ エクスポートするデータがありません");
        return Ok(None);
    }

    let path = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_EXPORT_FILENAME));

    std::fs::write(&path, to_csv(table))?;
    Ok(Some(path))
}
