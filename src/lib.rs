//! snapsheet - 画像・PDFから表データをAI抽出するツール
//!
//! パイプライン: 入力ファイル収集 → Base64エンコード → Gemini APIで抽出
//! → 結合・状態遷移 → 表レンダリング / CSVエクスポート

pub mod batch;
pub mod cli;
pub mod config;
pub mod csv;
pub mod error;
pub mod extract;
pub mod files;
pub mod state;
pub mod table;

pub use error::{Result, SnapsheetError};
pub use table::{TableData, TableRow};
