//! 入力ファイルの収集とBase64エンコード
//!
//! 対応形式は画像（jpg/png/webp/gif）とPDFのみ。
//! 非対応ファイルはバッチから除外されるだけでエラーにはしない。

use crate::error::{Result, SnapsheetError};
use base64::Engine as _;
use std::path::{Path, PathBuf};
use tokio::task::JoinSet;
use walkdir::WalkDir;

/// ファイル種別
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Image,
    Document,
}

/// エンコード済み入力ファイル
///
/// 作成後は不変。リセット時に破棄される
#[derive(Debug, Clone)]
pub struct EncodedFile {
    pub file_name: String,
    pub mime_type: String,
    pub kind: FileKind,
    /// ファイル全体のBase64（STANDARDアルファベット）
    pub base64: String,
    /// 画像のみ: そのまま表示に使えるData URI
    pub preview_uri: Option<String>,
}

/// 拡張子からMIMEタイプを判定する
///
/// 対応外の拡張子は `None`
pub fn mime_type_for(path: &Path) -> Option<(&'static str, FileKind)> {
    let ext = path.extension()?.to_string_lossy().to_lowercase();
    match ext.as_str() {
        "jpg" | "jpeg" => Some(("image/jpeg", FileKind::Image)),
        "png" => Some(("image/png", FileKind::Image)),
        "webp" => Some(("image/webp", FileKind::Image)),
        "gif" => Some(("image/gif", FileKind::Image)),
        "pdf" => Some(("application/pdf", FileKind::Document)),
        _ => None,
    }
}

/// CLI引数（ファイルまたはフォルダ）を入力ファイル一覧に展開する
///
/// フォルダは直下のみスキャンし、対応形式をファイル名順に集める。
/// 存在しないパスはエラー
pub fn collect_inputs(inputs: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for input in inputs {
        if !input.exists() {
            return Err(SnapsheetError::FileNotFound(input.display().to_string()));
        }

        if input.is_file() {
            files.push(input.clone());
            continue;
        }

        let mut found: Vec<PathBuf> = WalkDir::new(input)
            .max_depth(1)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.path().is_file() && mime_type_for(e.path()).is_some())
            .map(|e| e.path().to_path_buf())
            .collect();
        found.sort();
        files.extend(found);
    }

    Ok(files)
}

/// 1ファイルを読み込んでBase64エンコードする
///
/// 非対応のMIMEタイプは `Ok(None)`（スキップ）、読み込み失敗はエラー
pub async fn encode_file(path: &Path) -> Result<Option<EncodedFile>> {
    let Some((mime_type, kind)) = mime_type_for(path) else {
        return Ok(None);
    };

    let bytes = tokio::fs::read(path).await?;
    let base64 = base64::engine::general_purpose::STANDARD.encode(&bytes);

    let preview_uri = match kind {
        FileKind::Image => Some(format!("data:{};base64,{}", mime_type, base64)),
        FileKind::Document => None,
    };

    Ok(Some(EncodedFile {
        file_name: path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default(),
        mime_type: mime_type.to_string(),
        kind,
        base64,
        preview_uri,
    }))
}

/// バッチ内の全ファイルを並行エンコードする
///
/// 非対応形式と読み込み失敗はstderrに記録してバッチから除外する
/// （バッチ全体は失敗させない）。結果の順序は提出順
pub async fn encode_batch(paths: &[PathBuf]) -> Result<Vec<EncodedFile>> {
    let mut set = JoinSet::new();

    for (index, path) in paths.iter().enumerate() {
        let path = path.clone();
        set.spawn(async move { (index, path.clone(), encode_file(&path).await) });
    }

    let mut slots: Vec<Option<EncodedFile>> = vec![None; paths.len()];

    while let Some(joined) = set.join_next().await {
        let (index, path, result) = joined
            .map_err(|e| SnapsheetError::Config(format!("エンコードタスクの実行に失敗: {}", e)))?;
        match result {
            Ok(Some(encoded)) => slots[index] = Some(encoded),
            Ok(None) => {
                eprintln!("⚠ 非対応の形式のためスキップ: {}", path.display());
            }
            Err(e) => {
                eprintln!("⚠ 読み込み失敗のためスキップ: {} ({})", path.display(), e);
            }
        }
    }

    Ok(slots.into_iter().flatten().collect())
}
